//! Interactive line-oriented session
//!
//! Every line is either an edit command or text to complete:
//! `+word` inserts, `-word` removes, `*` lists everything, `?` shows help,
//! `:q` leaves. Anything else is treated as the current input and answered
//! with suggestions; a leading `\` makes the rest of the line plain input,
//! so `\-ab` completes `-ab`. Unsaved changes are persisted when the
//! session ends.

use std::io::{BufRead, Write};

use tracing::{debug, instrument};

use crate::application::services::DictionaryService;
use crate::cli::error::CliResult;
use crate::infrastructure::InfraError;

pub const PROMPT: &str = "wordtree> ";

const HELP: &str = "\
  <text>   show suggestions for <text>
  +word    insert word
  -word    remove word
  \\<text>  show suggestions for <text> starting with + - * ? or :
  *        list all words
  ?        this help
  :q       save and quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Suggest(String),
    Insert(String),
    Remove(String),
    ListAll,
    Help,
    Quit,
    Empty,
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        match line {
            "" => ShellCommand::Empty,
            ":q" | ":quit" | ":exit" => ShellCommand::Quit,
            "*" => ShellCommand::ListAll,
            "?" => ShellCommand::Help,
            _ => {
                if let Some(text) = line.strip_prefix('\\') {
                    ShellCommand::Suggest(text.to_string())
                } else if let Some(word) = line.strip_prefix('+') {
                    ShellCommand::Insert(word.trim().to_string())
                } else if let Some(word) = line.strip_prefix('-') {
                    ShellCommand::Remove(word.trim().to_string())
                } else {
                    ShellCommand::Suggest(line.to_string())
                }
            }
        }
    }
}

/// Run the session until `:q` or end of input.
///
/// With `show_prompt` the prompt is written before every line.
#[instrument(level = "debug", skip_all)]
pub fn run_shell<R: BufRead, W: Write>(
    service: &mut DictionaryService,
    input: R,
    mut out: W,
    show_prompt: bool,
) -> CliResult<()> {
    let mut lines = input.lines();
    loop {
        if show_prompt {
            write!(out, "{PROMPT}").map_err(output_err)?;
            out.flush().map_err(output_err)?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.map_err(|e| InfraError::io("read shell input", e))?;

        let command = ShellCommand::parse(&line);
        debug!("shell command: {:?}", command);
        match command {
            ShellCommand::Empty => {}
            ShellCommand::Quit => break,
            ShellCommand::Help => writeln!(out, "{HELP}").map_err(output_err)?,
            ShellCommand::ListAll => {
                for word in service.tree() {
                    writeln!(out, "{word}").map_err(output_err)?;
                }
            }
            ShellCommand::Suggest(text) => {
                for word in service.on_text_changed(&text) {
                    writeln!(out, "{word}").map_err(output_err)?;
                }
            }
            ShellCommand::Insert(word) => {
                let message = if word.is_empty() {
                    "nothing to insert".to_string()
                } else if service.on_insert(&word)? {
                    format!("inserted '{word}'")
                } else {
                    format!("'{word}' already present")
                };
                writeln!(out, "{message}").map_err(output_err)?;
            }
            ShellCommand::Remove(word) => {
                let message = if word.is_empty() {
                    "nothing to remove".to_string()
                } else if service.on_remove(&word)? {
                    format!("removed '{word}'")
                } else {
                    format!("'{word}' not found")
                };
                writeln!(out, "{message}").map_err(output_err)?;
            }
        }
    }

    if service.persist_if_dirty()? {
        debug!("shell: saved on exit");
    }
    Ok(())
}

fn output_err(e: std::io::Error) -> InfraError {
    InfraError::io("write shell output", e)
}
