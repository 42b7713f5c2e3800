//! Pipeline splitter: cuts a normalized command line at unquoted `|`
//! characters into an ordered list of command strings, then tokenizes each
//! into a [`Command`].

use crate::command::{Command, tokenize};
use crate::error::{Result, ShellError};
use crate::limits::CMD_MAX;
use crate::normalize::normalize;

/// An ordered, non-empty sequence of [`Command`]s whose stdio will be
/// wired together by the executor.
#[derive(Debug, Clone)]
pub struct Pipeline {
    stages: Vec<Command>,
}

impl Pipeline {
    /// The pipeline's stages, in left-to-right execution order.
    pub fn stages(&self) -> &[Command] {
        &self.stages
    }

    /// The number of stages in the pipeline.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    /// Whether the pipeline has no stages.
    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }
}

/// Splits `cmd_line` at every unquoted `|`, trims each piece, and tokenizes
/// it into a `Command`. Fails with [`ShellError::NoCommands`] on empty
/// input or [`ShellError::TooManyCommands`] if the line has more than
/// `CMD_MAX` stages.
pub fn build_pipeline(cmd_line: &str) -> Result<Pipeline> {
    let normalized = normalize(cmd_line);
    if normalized.is_empty() {
        return Err(ShellError::NoCommands);
    }

    let pieces = split_unquoted_pipes(normalized);
    if pieces.len() > CMD_MAX {
        return Err(ShellError::TooManyCommands(CMD_MAX));
    }

    let stages = pieces
        .iter()
        .map(|piece| tokenize(piece.trim_matches(|c: char| c.is_ascii_whitespace())))
        .collect::<Result<Vec<_>>>()?;

    Ok(Pipeline { stages })
}

/// Splits `line` at `|` characters that are not inside a double-quoted
/// span. The quoting state tracked here mirrors the tokenizer's own, so a
/// `|` inside quotes never ends up as a stage boundary.
fn split_unquoted_pipes(line: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (i, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            '|' if !in_quotes => {
                pieces.push(&line[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    pieces.push(&line[start..]);
    pieces
}
