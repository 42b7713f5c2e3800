//! Tokenizer / command builder: turns one already-pipe-free command string
//! into a [`Command`] (an owned argv), honoring double-quoted spans.

use crate::error::{Result, ShellError};
use crate::limits::{ARG_MAX, CMD_MAX, EXE_MAX};

/// A single pipeline stage: an ordered, non-empty argument vector.
///
/// `argv` owns its strings rather than pointing into the line buffer that
/// produced them, so a `Command` can outlive the line it was parsed from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    argv: Vec<String>,
    /// Whether each argv entry contained any quoted content. A token built
    /// entirely or partly inside a quoted span keeps its literal
    /// characters but loses any special meaning they'd otherwise carry
    /// (see the redirection planner, which refuses to treat a quoted `">"`
    /// as an operator).
    quoted: Vec<bool>,
}

impl Command {
    /// The executable name: `argv[0]`.
    pub fn exe(&self) -> &str {
        &self.argv[0]
    }

    /// The arguments following the executable name.
    pub fn args(&self) -> &[String] {
        &self.argv[1..]
    }

    /// The full argument vector, exe included.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// Whether the argv entry at `index` contained any quoted content.
    pub(crate) fn was_quoted(&self, index: usize) -> bool {
        self.quoted[index]
    }

    /// Builds a `Command` directly from an argv, skipping the tokenizer.
    /// Used by the redirection planner, which produces a reduced argv none
    /// of whose remaining tokens can be operators anymore.
    pub(crate) fn from_argv(argv: Vec<String>) -> Command {
        let quoted = vec![false; argv.len()];
        Command { argv, quoted }
    }
}

/// Tokenizes one command string (no unquoted `|`) into a [`Command`].
///
/// A double quote toggles "inside quotes" mode; the quote characters are
/// consumed and never appear in any argv entry. Outside quotes, runs of
/// unquoted space/tab collapse into a single token separator. Inside
/// quotes, space and tab are literal.
pub fn tokenize(command_str: &str) -> Result<Command> {
    let mut argv = Vec::new();
    let mut quoted = Vec::new();
    let mut current = String::new();
    let mut current_started = false;
    let mut current_quoted = false;
    let mut in_quotes = false;

    for ch in command_str.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current_started = true;
                current_quoted = true;
            }
            ' ' | '\t' if !in_quotes => {
                if current_started {
                    argv.push(std::mem::take(&mut current));
                    quoted.push(current_quoted);
                    current_started = false;
                    current_quoted = false;
                }
            }
            c => {
                current.push(c);
                current_started = true;
            }
        }
    }
    if current_started {
        argv.push(current);
        quoted.push(current_quoted);
    }

    if argv.is_empty() {
        return Err(ShellError::NoCommands);
    }
    // Matches the source's build_cmd_buff, which (oddly) reuses CMD_MAX as
    // the per-command token-count ceiling rather than a dedicated ARGV_MAX.
    if argv.len() > CMD_MAX {
        return Err(ShellError::TooManyArgs);
    }

    let total_arg_bytes: usize = argv.iter().map(|s| s.len()).sum();
    if argv[0].len() > EXE_MAX || total_arg_bytes > ARG_MAX {
        return Err(ShellError::CommandTooBig);
    }

    Ok(Command { argv, quoted })
}
