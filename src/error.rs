//! Crate-wide error type.
//!
//! Parser and planner failures are recoverable: the shell loop matches on
//! the specific [`ShellError`] variant and decides whether to print a
//! message and continue, or to abort the current pipeline. Only
//! [`ShellError::Memory`] and the remote-communication variants are treated
//! as fatal by their callers.

use thiserror::Error;

/// Errors that can arise while parsing, planning or executing a pipeline,
/// or while speaking the remote-shell wire protocol.
#[derive(Debug, Error)]
pub enum ShellError {
    /// The input line contained no commands (all whitespace, or empty).
    #[error("warning: no commands provided")]
    NoCommands,

    /// The pipeline splitter produced more stages than `CMD_MAX`.
    #[error("error: piping limited to {0} commands")]
    TooManyCommands(usize),

    /// A command's argv entries exceeded `CMD_MAX`/`ARGV_MAX`.
    #[error("error: too many arguments in a single command")]
    TooManyArgs,

    /// A command's exe name or cumulative argument bytes exceeded the
    /// configured limits.
    #[error("error: command or arguments too big")]
    CommandTooBig,

    /// A redirection operator (`<`, `>`, `>>`) appeared with no following
    /// filename token.
    #[error("error: redirection operator `{0}` missing a filename")]
    DanglingRedirection(&'static str),

    /// Process creation, piping or file-descriptor plumbing failed.
    #[error("error: {0}")]
    Io(#[from] std::io::Error),

    /// A socket-level send/recv/accept call failed.
    #[error("error: remote communication failure: {0}")]
    RemoteCommunication(std::io::Error),

    /// The client could not connect to the requested server.
    #[error("error: could not connect to {0}")]
    RemoteClient(String),
}

/// Convenience alias used throughout the engine.
pub type Result<T> = std::result::Result<T, ShellError>;
