//! Input classification: decide what kind of line the user typed before
//! anything is translated, inferred, or executed.

use super::rules::is_source_verb;

/// The four ways an input line can be interpreted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputKind {
    /// A `!`-prefixed built-in (help, setup, uninstall, direct execution).
    Meta,
    /// A bash verb the translation table knows about.
    SourceShell,
    /// Already explicit shell syntax; runs without translation or a gate.
    Native,
    /// Everything else goes to the oracle.
    NaturalLanguage,
}

/// PowerShell's own verb-noun prefixes. Input starting with one of these is
/// deliberate shell syntax, never natural language.
const NATIVE_VERB_PREFIXES: &[&str] = &[
    "Get-", "Set-", "New-", "Remove-", "Copy-", "Move-", "Select-", "Where-",
    "ForEach-", "Invoke-", "Test-",
];

/// Well-known tools, path shapes, and shell operators that mark a line as a
/// command rather than a request.
const NATIVE_STARTERS: &[&str] = &[
    "git ", "npm ", "node ", "npx ", "python ", "pip ", "docker ",
    "kubectl ", "aws ", "az ", "curl ", "wget ", "chmod ", "chown ",
    "sudo ", "code ", "./", "/", "~", "$", ">", ">>", "|", "&&",
];

/// Classify one trimmed input line. Rules are checked in order; the meta
/// sentinel wins over everything else.
pub fn classify(input: &str) -> InputKind {
    let trimmed = input.trim();

    if trimmed.starts_with('!') {
        return InputKind::Meta;
    }

    // A bare verb classifies the same as its argument-bearing form.
    let first = trimmed.split_whitespace().next().unwrap_or(trimmed);
    if is_source_verb(first) {
        return InputKind::SourceShell;
    }

    if NATIVE_VERB_PREFIXES.iter().any(|p| trimmed.starts_with(p)) {
        return InputKind::Native;
    }

    if NATIVE_STARTERS.iter().any(|p| trimmed.starts_with(p)) {
        return InputKind::Native;
    }

    InputKind::NaturalLanguage
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_sentinel_wins_over_everything() {
        assert_eq!(classify("!help"), InputKind::Meta);
        assert_eq!(classify("!api"), InputKind::Meta);
        // Even when the rest would match another category.
        assert_eq!(classify("!ls -la"), InputKind::Meta);
        assert_eq!(classify("!ps Get-Date"), InputKind::Meta);
        assert_eq!(classify("!git status"), InputKind::Meta);
    }

    #[test]
    fn test_source_shell_verbs() {
        assert_eq!(classify("ls -la"), InputKind::SourceShell);
        assert_eq!(classify("mkdir demo"), InputKind::SourceShell);
        assert_eq!(classify("cat notes.md"), InputKind::SourceShell);
        assert_eq!(classify("grep error log.txt"), InputKind::SourceShell);
        assert_eq!(classify("python3 build.py"), InputKind::SourceShell);
    }

    #[test]
    fn test_bare_verb_matches_argument_form() {
        assert_eq!(classify("cd"), classify("cd ~/projects"));
        assert_eq!(classify("ls"), classify("ls -la"));
        assert_eq!(classify("cd"), InputKind::SourceShell);
    }

    #[test]
    fn test_powershell_prefixes_are_native() {
        assert_eq!(classify("Get-ChildItem -Force"), InputKind::Native);
        assert_eq!(classify("Set-Location C:\\Users"), InputKind::Native);
        assert_eq!(classify("Invoke-WebRequest https://example.com"), InputKind::Native);
        assert_eq!(classify("Test-Path out.txt"), InputKind::Native);
    }

    #[test]
    fn test_known_tools_and_operators_are_native() {
        assert_eq!(classify("git status"), InputKind::Native);
        assert_eq!(classify("npm install"), InputKind::Native);
        assert_eq!(classify("docker ps -a"), InputKind::Native);
        assert_eq!(classify("./run.sh"), InputKind::Native);
        assert_eq!(classify("/usr/bin/env"), InputKind::Native);
        assert_eq!(classify("~/bin/tool"), InputKind::Native);
        assert_eq!(classify("$env:PATH"), InputKind::Native);
    }

    #[test]
    fn test_natural_language_fallback() {
        assert_eq!(classify("show me all pdf files here"), InputKind::NaturalLanguage);
        assert_eq!(classify("delete the file I just created"), InputKind::NaturalLanguage);
        assert_eq!(classify("what is taking up disk space"), InputKind::NaturalLanguage);
        // "list" is not in the verb table even though "ls" is.
        assert_eq!(classify("list all processes"), InputKind::NaturalLanguage);
    }
}
