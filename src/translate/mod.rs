//! Input classification and bash → PowerShell translation.
//!
//! This is the decision core of psbridge: `classify` sorts each input line
//! into one of four categories, and `translate` rewrites bash idioms into
//! PowerShell using an ordered first-match-wins rule table.

mod classify;
mod rules;

pub use classify::{classify, InputKind};
pub use rules::{is_source_verb, translate};
