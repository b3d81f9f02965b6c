//! Prompt building for the command oracle.
//!
//! The template is deterministic: a fixed role preamble, the working
//! directory, the formatted recent history, a fixed rules block, and the
//! raw user request. The history block is what lets the oracle resolve
//! references like "do that again".

/// Build the full prompt for one inference request.
pub fn build_prompt(user_text: &str, cwd: &str, history: &str) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a PowerShell command translator. Convert the user's request into a PowerShell command for Windows.\n",
    );
    prompt.push_str(&format!("Current directory: {cwd}\n\n"));

    prompt.push_str("Recent command history:\n");
    prompt.push_str(history);
    prompt.push_str("\n\n");

    prompt.push_str("Rules:\n");
    prompt.push_str("- Output ONLY the PowerShell command, nothing else\n");
    prompt.push_str("- No explanations, no markdown, no backticks\n");
    prompt.push_str("- If unclear, make a reasonable assumption\n");
    prompt.push_str("- Prefer simple, common PowerShell commands\n");
    prompt.push_str(
        "- Use the command history for context (e.g., \"do that again\", \"delete the file I just created\")\n",
    );
    prompt.push_str(
        "- For file operations, use PowerShell cmdlets like Get-ChildItem, Set-Location, etc.\n\n",
    );

    prompt.push_str(&format!("User request: {user_text}"));
    prompt
}
