//! Rolling execution context for oracle prompts.
//!
//! This module maintains a bounded log of executed commands and their
//! captured outputs. The log is trimmed by entry count and by total
//! character footprint, and is rendered into a short numbered transcript
//! that gives the oracle enough history to resolve references like
//! "do that again".

mod cwd;

pub use cwd::{change_dir, expand_home, CurrentDir};

/// Maximum number of entries kept in the buffer.
pub const MAX_HISTORY: usize = 10;

/// Character budget across all commands and outputs. Eviction stops at one
/// entry: a single oversized entry is tolerated rather than emptying the
/// buffer.
pub const MAX_CONTEXT_CHARS: usize = 4000;

/// Per-entry cap on stored output.
const MAX_OUTPUT_CHARS: usize = 500;

/// Rendered in place of a transcript when nothing has run yet.
const EMPTY_HISTORY: &str = "No previous commands.";

/// One executed command and what it printed. Never mutated after creation;
/// removed only by eviction from the head of the buffer.
#[derive(Clone, Debug)]
pub struct HistoryEntry {
    pub command: String,
    pub output: String,
}

/// Bounded FIFO of recent command executions.
pub struct ContextBuffer {
    entries: Vec<HistoryEntry>,
}

impl Default for ContextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ContextBuffer {
    pub fn new() -> Self {
        Self {
            entries: Vec::with_capacity(MAX_HISTORY),
        }
    }

    /// Record an executed command. Output is truncated to the per-entry cap,
    /// then the oldest entries are evicted until both the count bound and
    /// the character budget hold.
    pub fn push(&mut self, command: impl Into<String>, output: &str) {
        self.entries.push(HistoryEntry {
            command: command.into(),
            output: truncate_chars(output, MAX_OUTPUT_CHARS),
        });

        while self.entries.len() > MAX_HISTORY {
            self.entries.remove(0);
        }
        while self.footprint() > MAX_CONTEXT_CHARS && self.entries.len() > 1 {
            self.entries.remove(0);
        }
    }

    /// Total character footprint across all entries.
    pub fn footprint(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.command.len() + e.output.len())
            .sum()
    }

    /// Render the most recent `max_entries` entries as a numbered
    /// transcript. Each entry shows at most the first two lines of its
    /// output, indented.
    pub fn format(&self, max_entries: usize) -> String {
        if self.entries.is_empty() {
            return EMPTY_HISTORY.to_string();
        }

        let start = self.entries.len().saturating_sub(max_entries);
        let mut lines = Vec::new();
        for (i, entry) in self.entries[start..].iter().enumerate() {
            lines.push(format!("{}. $ {}", i + 1, entry.command));
            for output_line in entry.output.trim().lines().take(2) {
                lines.push(format!("   {}", output_line));
            }
        }
        lines.join("\n")
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Truncate to a maximum number of characters on a char boundary.
fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
