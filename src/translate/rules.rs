//! Table-driven rewriting of bash idioms into PowerShell syntax.
//!
//! `translate` is a total function: input that matches nothing in the table
//! or the special cases is returned unchanged, which covers lines that are
//! already PowerShell.

use crate::context::expand_home;

/// How a rule matches the input line.
///
/// `Exact` matches a bare verb with no arguments and replaces the whole
/// line. `Prefix` matches a verb followed by arguments and replaces only the
/// verb, keeping the remainder verbatim.
#[derive(Clone, Copy, Debug)]
enum Matcher {
    Exact(&'static str),
    Prefix(&'static str),
}

struct TranslationRule {
    matcher: Matcher,
    replacement: &'static str,
}

impl TranslationRule {
    fn verb(&self) -> &'static str {
        match self.matcher {
            Matcher::Exact(verb) | Matcher::Prefix(verb) => verb,
        }
    }
}

/// Ordered bash → PowerShell verb table. The first matching rule wins.
///
/// `ls <args>` and `cd <path>` are deliberately absent: they get dedicated
/// handling below (flag mapping, home expansion + quoting).
const RULES: &[TranslationRule] = &[
    // File operations
    TranslationRule { matcher: Matcher::Exact("ls"), replacement: "Get-ChildItem" },
    TranslationRule { matcher: Matcher::Exact("pwd"), replacement: "Get-Location" },
    TranslationRule { matcher: Matcher::Exact("cd"), replacement: "Set-Location ~" },
    TranslationRule { matcher: Matcher::Prefix("mkdir"), replacement: "New-Item -ItemType Directory -Path" },
    TranslationRule { matcher: Matcher::Prefix("rm"), replacement: "Remove-Item" },
    TranslationRule { matcher: Matcher::Prefix("rmdir"), replacement: "Remove-Item" },
    TranslationRule { matcher: Matcher::Prefix("cp"), replacement: "Copy-Item" },
    TranslationRule { matcher: Matcher::Prefix("mv"), replacement: "Move-Item" },
    TranslationRule { matcher: Matcher::Prefix("cat"), replacement: "Get-Content" },
    TranslationRule { matcher: Matcher::Prefix("touch"), replacement: "New-Item -ItemType File -Path" },
    TranslationRule { matcher: Matcher::Prefix("head"), replacement: "Get-Content -TotalCount" },
    TranslationRule { matcher: Matcher::Prefix("tail"), replacement: "Get-Content -Tail" },
    // Python
    TranslationRule { matcher: Matcher::Prefix("python3"), replacement: "python" },
    TranslationRule { matcher: Matcher::Exact("python3"), replacement: "python" },
    // System
    TranslationRule { matcher: Matcher::Exact("clear"), replacement: "Clear-Host" },
    TranslationRule { matcher: Matcher::Exact("whoami"), replacement: "whoami" },
    TranslationRule { matcher: Matcher::Exact("date"), replacement: "Get-Date" },
    TranslationRule { matcher: Matcher::Prefix("echo"), replacement: "Write-Output" },
    // Search
    TranslationRule { matcher: Matcher::Prefix("grep"), replacement: "Select-String" },
    TranslationRule { matcher: Matcher::Prefix("find"), replacement: "Get-ChildItem -Recurse -Filter" },
    // Process
    TranslationRule { matcher: Matcher::Prefix("ps"), replacement: "Get-Process" },
    TranslationRule { matcher: Matcher::Prefix("kill"), replacement: "Stop-Process" },
];

/// Whether a token is one of the bash verbs this table knows about.
/// This is the classifier's source-shell vocabulary.
pub fn is_source_verb(token: &str) -> bool {
    RULES.iter().any(|rule| rule.verb() == token)
}

/// Translate one bash-flavored line into PowerShell.
///
/// Branches are tried in strict order and the first match wins; composite
/// forms (pipes, chains, redirections) recurse on their sub-parts.
pub fn translate(raw: &str) -> String {
    let line = raw.trim();

    // Pipe segments translate independently.
    if line.contains('|') {
        let parts: Vec<String> = line.split('|').map(translate).collect();
        return parts.join(" | ");
    }

    // "&&" becomes ";". PowerShell then runs the second half even when the
    // first fails - conditional chaining is not preserved.
    if line.contains("&&") {
        let parts: Vec<String> = line.split("&&").map(translate).collect();
        return parts.join("; ");
    }

    // Redirections: only the first occurrence splits command from file.
    if let Some((cmd, file)) = line.split_once(">>") {
        return format!("{} | Out-File -Append -FilePath {}", translate(cmd), file.trim());
    }
    if let Some((cmd, file)) = line.split_once('>') {
        return format!("{} | Out-File -FilePath {}", translate(cmd), file.trim());
    }

    if let Some(translated) = lookup(line) {
        return translated;
    }

    if let Some(args) = line.strip_prefix("ls ") {
        return translate_ls(args.trim());
    }

    if let Some(path) = line.strip_prefix("cd ") {
        return format!("Set-Location \"{}\"", expand_home(path.trim()));
    }

    // No translation found - likely PowerShell already.
    line.to_string()
}

fn lookup(line: &str) -> Option<String> {
    let (first, rest) = match line.split_once(char::is_whitespace) {
        Some((first, rest)) => (first, rest.trim_start()),
        None => (line, ""),
    };

    for rule in RULES {
        match rule.matcher {
            Matcher::Exact(verb) if line == verb => {
                return Some(rule.replacement.to_string());
            }
            Matcher::Prefix(verb) if first == verb && !rest.is_empty() => {
                return Some(format!("{} {}", rule.replacement, rest));
            }
            _ => {}
        }
    }
    None
}

/// Map `ls` flag clusters onto `Get-ChildItem`, independent of flag order:
/// `-a` forces hidden entries, `-l` appends a list-format pipe, `-h` has no
/// PowerShell analogue and is dropped. Anything else passes through.
fn translate_ls(args: &str) -> String {
    let mut force = false;
    let mut as_list = false;
    let mut passthrough: Vec<&str> = Vec::new();

    for token in args.split_whitespace() {
        if let Some(cluster) = token.strip_prefix('-') {
            if !cluster.is_empty() && cluster.chars().all(|c| matches!(c, 'a' | 'l' | 'h')) {
                for flag in cluster.chars() {
                    match flag {
                        'a' => force = true,
                        'l' => as_list = true,
                        _ => {}
                    }
                }
                continue;
            }
        }
        passthrough.push(token);
    }

    let mut command = String::from("Get-ChildItem");
    if force {
        command.push_str(" -Force");
    }
    for token in passthrough {
        command.push(' ');
        command.push_str(token);
    }
    if as_list {
        command.push_str(" | Format-List");
    }
    command
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_verbs() {
        assert_eq!(translate("ls"), "Get-ChildItem");
        assert_eq!(translate("pwd"), "Get-Location");
        assert_eq!(translate("cd"), "Set-Location ~");
        assert_eq!(translate("clear"), "Clear-Host");
        assert_eq!(translate("date"), "Get-Date");
        assert_eq!(translate("whoami"), "whoami");
        assert_eq!(translate("python3"), "python");
    }

    #[test]
    fn test_prefix_rules_keep_arguments() {
        assert_eq!(translate("mkdir projects"), "New-Item -ItemType Directory -Path projects");
        assert_eq!(translate("rm old.txt"), "Remove-Item old.txt");
        assert_eq!(translate("cp a.txt b.txt"), "Copy-Item a.txt b.txt");
        assert_eq!(translate("cat notes.md"), "Get-Content notes.md");
        assert_eq!(translate("grep TODO src"), "Select-String TODO src");
        assert_eq!(translate("python3 build.py"), "python build.py");
        assert_eq!(translate("kill 1234"), "Stop-Process 1234");
    }

    #[test]
    fn test_first_matching_rule_wins() {
        // "rm" appears before "rmdir" checks would matter; both map to
        // Remove-Item, but the first-token match must pick the right rule.
        assert_eq!(translate("rmdir build"), "Remove-Item build");
        assert_eq!(translate("rm -r build"), "Remove-Item -r build");
    }

    #[test]
    fn test_ls_flag_clusters() {
        assert_eq!(translate("ls -la"), "Get-ChildItem -Force | Format-List");
        assert_eq!(translate("ls -al"), "Get-ChildItem -Force | Format-List");
        assert_eq!(translate("ls -a"), "Get-ChildItem -Force");
        assert_eq!(translate("ls -l"), "Get-ChildItem | Format-List");
        assert_eq!(translate("ls -lah"), "Get-ChildItem -Force | Format-List");
    }

    #[test]
    fn test_ls_with_path_argument() {
        assert_eq!(translate("ls src"), "Get-ChildItem src");
        assert_eq!(translate("ls -la src"), "Get-ChildItem -Force src | Format-List");
    }

    #[test]
    fn test_cd_quotes_path() {
        assert_eq!(translate("cd /tmp/work"), "Set-Location \"/tmp/work\"");
        assert_eq!(translate("cd my dir"), "Set-Location \"my dir\"");
    }

    #[test]
    fn test_cd_expands_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(
                translate("cd ~/projects"),
                format!("Set-Location \"{}/projects\"", home.display())
            );
        }
    }

    #[test]
    fn test_pipe_segments_translate_independently() {
        assert_eq!(translate("ls | grep txt"), "Get-ChildItem | Select-String txt");
        assert_eq!(
            translate("cat log.txt | grep error | head -5"),
            "Get-Content log.txt | Select-String error | Get-Content -TotalCount -5"
        );
    }

    #[test]
    fn test_chain_becomes_sequential() {
        assert_eq!(
            translate("mkdir demo && cd demo"),
            "New-Item -ItemType Directory -Path demo; Set-Location \"demo\""
        );
    }

    #[test]
    fn test_append_redirection() {
        assert_eq!(
            translate("echo done >> build.log"),
            "Write-Output done | Out-File -Append -FilePath build.log"
        );
    }

    #[test]
    fn test_overwrite_redirection() {
        assert_eq!(
            translate("cat a.txt > b.txt"),
            "Get-Content a.txt | Out-File -FilePath b.txt"
        );
    }

    #[test]
    fn test_already_powershell_is_unchanged() {
        assert_eq!(translate("Get-ChildItem -Force"), "Get-ChildItem -Force");
        assert_eq!(
            translate("Get-ChildItem -Force | Format-List"),
            "Get-ChildItem -Force | Format-List"
        );
        assert_eq!(translate("Get-Date -Format yyyy"), "Get-Date -Format yyyy");
    }

    #[test]
    fn test_unknown_input_is_unchanged() {
        assert_eq!(translate("mkdir"), "mkdir");
        assert_eq!(translate("frobnicate --all"), "frobnicate --all");
    }

    #[test]
    fn test_source_verb_vocabulary() {
        for verb in ["ls", "cd", "pwd", "mkdir", "grep", "python3", "kill"] {
            assert!(is_source_verb(verb), "missing verb: {verb}");
        }
        assert!(!is_source_verb("git"));
        assert!(!is_source_verb("Get-ChildItem"));
        assert!(!is_source_verb("show"));
    }
}
