//! Execution of resolved commands in the target shell.

mod subprocess;

pub use subprocess::{run_command, CommandOutput};
