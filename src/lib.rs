//! A small Unix-style shell: a line-oriented command interpreter that
//! parses shell-like command lines into pipelines of external processes
//! and a fixed set of built-ins, runnable either as a local interactive
//! loop or as a TCP client/server pair.
//!
//! The pieces compose the same way a real shell's do:
//!
//! * [`normalize`] and [`command`] turn raw input into an owned argument
//!   vector, honoring double-quoted spans.
//! * [`pipeline`] splits a normalized line at unquoted `|` into an ordered
//!   list of [`command::Command`]s.
//! * [`redirect`] extracts `<`/`>`/`>>` operators from a command's argv
//!   into a plan of file actions.
//! * [`builtins`] recognizes and runs the handful of commands the shell
//!   handles itself rather than forking.
//! * [`exec`] wires pipeline stages together with pipes and runs them,
//!   forking and `exec`ing each external stage.
//! * [`shell`] is the local, interactive read-eval loop built on top of
//!   all of the above.
//! * [`protocol`], [`server`] and [`client`] implement the same pipeline
//!   execution over a TCP connection instead of a terminal.

#![warn(missing_docs)]

extern crate libc;

pub mod builtins;
pub mod client;
pub mod command;
pub mod dragon;
pub mod error;
pub mod exec;
pub mod limits;
pub mod normalize;
pub mod pipeline;
pub mod posix;
pub mod protocol;
pub mod redirect;
pub mod server;
pub mod session;
pub mod shell;

pub use error::{Result, ShellError};
