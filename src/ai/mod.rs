//! Oracle integration: prompt building and the Gemini-backed client that
//! turns natural language into a single PowerShell command.

pub mod client;
pub mod prompt;

pub use client::{OracleClient, OracleError};
