//! The resolution loop.
//!
//! Reads one line at a time, classifies it, resolves it to a single
//! PowerShell command (by translation, passthrough, or oracle inference),
//! shows translated and inferred candidates behind the confirmation gate,
//! executes, and records the outcome into the context buffer. Errors from a
//! single resolution never terminate the loop; only `!uninstall` or an
//! interrupt/end-of-input do.

use std::io::{self, Write as _};

use anyhow::Result;
use crossterm::style::Stylize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, info, warn};

use crate::ai::{OracleClient, OracleError};
use crate::config::{self, KeyStore};
use crate::context::{change_dir, ContextBuffer, CurrentDir};
use crate::shell;
use crate::translate::{classify, translate, InputKind};

/// Where a candidate command came from. Translated and inferred candidates
/// pass through the confirmation gate; native input is already deliberate
/// shell syntax and runs unconditionally.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Provenance {
    Translated,
    Native,
    Inferred,
}

/// A proposed command on its way to the confirmation gate. Consumed
/// immediately; never stored.
struct Candidate {
    command: String,
    provenance: Provenance,
}

enum Flow {
    Continue,
    Exit,
}

/// Owns every piece of session state: the line editor, the credential
/// store, the oracle client, and the context buffer. All mutation happens
/// on the loop's own thread of control.
pub struct Session {
    editor: DefaultEditor,
    keys: KeyStore,
    oracle: Option<OracleClient>,
    history: ContextBuffer,
}

impl Session {
    pub fn new() -> Result<Self> {
        let keys = KeyStore::open_default();
        let oracle = keys.load().map(|key| OracleClient::new(&key));
        Ok(Self {
            editor: DefaultEditor::new()?,
            keys,
            oracle,
            history: ContextBuffer::new(),
        })
    }

    /// Run the interactive loop until uninstall, interrupt, or end of input.
    pub async fn run(&mut self) -> Result<()> {
        if self.oracle.is_none() {
            if !self.setup_api_key()? {
                return Ok(());
            }
            println!(
                "{} - bash commands and natural language for PowerShell\n",
                "psbridge".bold()
            );
            print_help();
        }

        loop {
            let cwd = CurrentDir::capture();
            let prompt = format!("{} > ", cwd.base_name().green());

            match self.editor.readline(&prompt) {
                Ok(line) => {
                    let input = line.trim().to_string();
                    if input.is_empty() {
                        continue;
                    }
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        debug!("readline history: {e}");
                    }
                    match self.handle_line(&input, &cwd).await? {
                        Flow::Continue => {}
                        Flow::Exit => break,
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    println!("\nExiting...");
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }
        Ok(())
    }

    async fn handle_line(&mut self, input: &str, cwd: &CurrentDir) -> Result<Flow> {
        // Bare `cd` goes home directly: no confirmation, no subprocess, no
        // history entry.
        if input == "cd" {
            if let Err(e) = change_dir("~") {
                println!("cd: {e}");
            }
            return Ok(Flow::Continue);
        }

        match classify(input) {
            InputKind::Meta => self.handle_meta(input).await,
            InputKind::SourceShell => {
                self.gate_and_execute(Candidate {
                    command: translate(input),
                    provenance: Provenance::Translated,
                })
                .await
            }
            InputKind::Native => {
                self.gate_and_execute(Candidate {
                    command: input.to_string(),
                    provenance: Provenance::Native,
                })
                .await
            }
            InputKind::NaturalLanguage => self.infer_and_confirm(input, cwd).await,
        }
    }

    async fn handle_meta(&mut self, input: &str) -> Result<Flow> {
        match input {
            "!api" => {
                if let Err(e) = self.setup_api_key() {
                    println!("{}", format!("error: {e}").red());
                }
                Ok(Flow::Continue)
            }
            "!uninstall" => self.uninstall(),
            "!help" => {
                print_help();
                Ok(Flow::Continue)
            }
            _ => {
                // `!ps` must be matched before the generic sentinel, or it
                // would be swallowed as `ps ...`.
                if let Some(cmd) = input.strip_prefix("!ps ") {
                    self.execute_and_record(cmd.trim()).await;
                } else if let Some(cmd) = input.strip_prefix('!') {
                    let cmd = cmd.trim();
                    // The user opted out of inference; run it as-is.
                    if !cmd.is_empty() {
                        self.execute_and_record(cmd).await;
                    }
                }
                Ok(Flow::Continue)
            }
        }
    }

    /// The confirmation gate. Native candidates run unconditionally; for
    /// translated and inferred ones the candidate is shown and an empty
    /// reply accepts, anything else silently declines.
    async fn gate_and_execute(&mut self, candidate: Candidate) -> Result<Flow> {
        info!(provenance = ?candidate.provenance, command = %candidate.command, "resolved command");

        if candidate.provenance == Provenance::Native {
            self.execute_and_record(&candidate.command).await;
            return Ok(Flow::Continue);
        }

        let prompt = format!("{} [Enter] ", format!("→ {}", candidate.command).yellow());
        let answer = match self.editor.readline(&prompt) {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                println!("\nExiting...");
                return Ok(Flow::Exit);
            }
            Err(e) => return Err(e.into()),
        };

        if !answer.is_empty() {
            debug!(command = %candidate.command, "declined");
            return Ok(Flow::Continue);
        }

        self.execute_and_record(&candidate.command).await;
        Ok(Flow::Continue)
    }

    /// Execute a resolved command and record it with its output.
    ///
    /// Directory changes are intercepted by structural match and applied to
    /// this process instead: handed to the subprocess they would not
    /// persist, so they are neither executed there nor recorded.
    async fn execute_and_record(&mut self, command: &str) {
        if let Some(target) = set_location_target(command) {
            if let Err(e) = change_dir(&target) {
                println!("cd: {e}");
            }
            return;
        }

        let output = shell::run_command(command).await;
        print!("{}", output.stdout);
        if !output.stderr.is_empty() {
            eprint!("{}", output.stderr);
        }
        if let Err(e) = io::stdout().flush() {
            debug!("stdout flush: {e}");
        }

        self.history.push(command, &output.combined());
    }

    async fn infer_and_confirm(&mut self, request: &str, cwd: &CurrentDir) -> Result<Flow> {
        let inferred = {
            let Some(oracle) = &self.oracle else {
                println!("{}", OracleError::MissingKey.to_string().red());
                return Ok(Flow::Continue);
            };
            let history = self.history.format(5);
            oracle.infer(request, &cwd.path, &history).await
        };

        match inferred {
            Ok(command) => {
                self.gate_and_execute(Candidate {
                    command,
                    provenance: Provenance::Inferred,
                })
                .await
            }
            Err(e @ OracleError::RateLimited) => {
                println!("{}", e.to_string().red());
                Ok(Flow::Continue)
            }
            Err(e) => {
                println!("{}", format!("error: {e}").red());
                Ok(Flow::Continue)
            }
        }
    }

    /// Interactive key setup. Returns false when no key was provided.
    fn setup_api_key(&mut self) -> Result<bool> {
        println!();
        println!(
            "{}",
            "Get your free key at: https://aistudio.google.com/apikey".cyan()
        );
        println!();

        let key = match self
            .editor
            .readline(&format!("{} ", "Enter your Gemini API key:".yellow()))
        {
            Ok(line) => line.trim().to_string(),
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => String::new(),
            Err(e) => return Err(e.into()),
        };

        if key.is_empty() {
            println!("No API key provided.");
            return Ok(false);
        }

        self.keys.save(&key)?;
        self.oracle = Some(OracleClient::new(&key));
        println!("{}\n", "✓ API key saved!".green());
        Ok(true)
    }

    fn uninstall(&mut self) -> Result<Flow> {
        let answer = match self
            .editor
            .readline(&format!("{} ", "Remove psbridge? [y/N]".yellow()))
        {
            Ok(line) => line,
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                return Ok(Flow::Continue)
            }
            Err(e) => return Err(e.into()),
        };
        if !answer.trim().eq_ignore_ascii_case("y") {
            return Ok(Flow::Continue);
        }

        let dir = config::install_dir();
        if dir.exists() {
            if let Err(e) = std::fs::remove_dir_all(&dir) {
                warn!("uninstall failed: {e}");
                println!("{}", format!("uninstall failed: {e}").red());
                return Ok(Flow::Continue);
            }
        }
        println!("{}", "✓ psbridge uninstalled".green());
        println!("You may need to remove the PATH entry manually from your PowerShell profile.");
        Ok(Flow::Exit)
    }
}

/// Structural match for a working-directory change. Returns the target of
/// `Set-Location <path>`, with surrounding double quotes stripped.
fn set_location_target(command: &str) -> Option<String> {
    let rest = command.trim().strip_prefix("Set-Location")?;
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }
    let arg = rest.trim().trim_matches('"');
    if arg.is_empty() {
        return None;
    }
    Some(arg.to_string())
}

fn print_help() {
    println!("{} - Change API key", "!api".cyan());
    println!("{} - Remove psbridge", "!uninstall".cyan());
    println!("{} - Show this help", "!help".cyan());
    println!("{} - Run a command directly, no confirmation", "!<command>".cyan());
    println!("{} - Run a PowerShell command directly", "!ps <command>".cyan());
    println!();
}
