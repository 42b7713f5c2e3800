//! Redirection planner: extracts `<`, `>`, `>>` operators and their
//! filenames from a command's argv, producing a reduced argv plus the set
//! of file actions the executor must apply before `exec`.

use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;

use crate::command::Command;
use crate::error::{Result, ShellError};
use crate::posix;

const STDIN_FILENO: i32 = 0;
const STDOUT_FILENO: i32 = 1;

/// One file-descriptor action produced by the planner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RedirAction {
    /// `<file`: read stdin from `file`.
    In(String),
    /// `>file`: write stdout to `file`, truncating it first.
    OutTruncate(String),
    /// `>>file`: write stdout to `file`, appending and creating it if
    /// missing.
    OutAppend(String),
}

/// A command's argv with redirection operators removed, plus the actions
/// those operators requested.
#[derive(Debug, Clone)]
pub struct RedirectionPlan {
    argv: Vec<String>,
    actions: Vec<RedirAction>,
}

impl RedirectionPlan {
    /// The command's argv with every redirection operator and its filename
    /// removed.
    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    /// The file actions the operators requested, in the order they
    /// appeared.
    pub fn actions(&self) -> &[RedirAction] {
        &self.actions
    }

    /// Opens each action's file and `dup2`s it onto the matching standard
    /// stream. Called in the child, after the pipeline's own pipe-based
    /// dup2s, so a redirection always wins over pipe wiring for the stream
    /// it names.
    pub fn apply(&self) -> io::Result<()> {
        for action in &self.actions {
            let (fd, file) = match action {
                RedirAction::In(path) => (STDIN_FILENO, File::open(path)?),
                RedirAction::OutTruncate(path) => (
                    STDOUT_FILENO,
                    OpenOptions::new()
                        .write(true)
                        .create(true)
                        .truncate(true)
                        .mode(0o644)
                        .open(path)?,
                ),
                RedirAction::OutAppend(path) => (
                    STDOUT_FILENO,
                    OpenOptions::new()
                        .create(true)
                        .append(true)
                        .mode(0o644)
                        .open(path)?,
                ),
            };
            posix::dup2(file.as_raw_fd(), fd)?;
        }
        Ok(())
    }
}

/// Scans `cmd`'s argv left-to-right, pulling out `<`, `>` and `>>` and
/// their following filename token. Operators are matched as whole argv
/// entries, never as substrings of a larger token, so a quoted `">"`
/// argument is never mistaken for an operator.
pub fn plan_redirections(cmd: &Command) -> Result<RedirectionPlan> {
    let argv = cmd.argv();
    let mut reduced = Vec::with_capacity(argv.len());
    let mut actions = Vec::new();

    let mut i = 0;
    while i < argv.len() {
        let op = argv[i].as_str();
        let make_action: Option<fn(String) -> RedirAction> = if cmd.was_quoted(i) {
            // A quoted operator token lost its special meaning when it was
            // tokenized; treat it as an ordinary argument.
            None
        } else {
            match op {
                "<" => Some(RedirAction::In),
                ">" => Some(RedirAction::OutTruncate),
                ">>" => Some(RedirAction::OutAppend),
                _ => None,
            }
        };
        match make_action {
            Some(make) => {
                let path = argv
                    .get(i + 1)
                    .ok_or(ShellError::DanglingRedirection(leak_op(op)))?;
                actions.push(make(path.clone()));
                i += 2;
            }
            None => {
                reduced.push(argv[i].clone());
                i += 1;
            }
        }
    }

    Ok(RedirectionPlan {
        argv: reduced,
        actions,
    })
}

fn leak_op(op: &str) -> &'static str {
    match op {
        "<" => "<",
        ">" => ">",
        ">>" => ">>",
        _ => unreachable!("leak_op called on a non-operator token"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tokenize;

    #[test]
    fn truncate_redirection_removes_operator_and_filename() {
        let cmd = tokenize("cat > out.txt").unwrap();
        let plan = plan_redirections(&cmd).unwrap();
        assert_eq!(plan.argv(), &["cat"]);
        assert_eq!(
            plan.actions(),
            &[RedirAction::OutTruncate("out.txt".to_string())]
        );
    }

    #[test]
    fn append_and_input_redirection() {
        let cmd = tokenize("sort < in.txt >> out.txt").unwrap();
        let plan = plan_redirections(&cmd).unwrap();
        assert_eq!(plan.argv(), &["sort"]);
        assert_eq!(
            plan.actions(),
            &[
                RedirAction::In("in.txt".to_string()),
                RedirAction::OutAppend("out.txt".to_string()),
            ]
        );
    }

    #[test]
    fn reduced_argv_is_subsequence_of_input() {
        let cmd = tokenize("grep foo < in.txt").unwrap();
        let plan = plan_redirections(&cmd).unwrap();
        assert_eq!(plan.argv(), &["grep", "foo"]);
    }

    #[test]
    fn trailing_operator_without_filename_is_an_error() {
        let cmd = tokenize("cat >").unwrap();
        assert!(matches!(
            plan_redirections(&cmd),
            Err(ShellError::DanglingRedirection(">"))
        ));
    }

    #[test]
    fn quoted_angle_bracket_is_an_ordinary_argument() {
        let cmd = tokenize("echo \">\"").unwrap();
        let plan = plan_redirections(&cmd).unwrap();
        assert_eq!(plan.argv(), &["echo", ">"]);
        assert!(plan.actions().is_empty());
    }

    #[test]
    fn no_operators_leaves_argv_untouched() {
        let cmd = tokenize("ls -l -a").unwrap();
        let plan = plan_redirections(&cmd).unwrap();
        assert_eq!(plan.argv(), cmd.argv());
        assert!(plan.actions().is_empty());
    }
}
