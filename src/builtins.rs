//! Built-in registry: the fixed set of commands the shell process executes
//! itself rather than forking and exec'ing an external program.

use std::io::Write;

use crate::command::Command;
use crate::dragon;
use crate::session::Session;

/// The built-ins the shell recognizes, matched solely on `argv[0]`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuiltinKind {
    /// `exit`: terminates the shell loop (or, in a non-leader pipeline
    /// stage, just the forked child running it).
    Exit,
    /// `cd [dir]`: changes the shell process's working directory.
    Cd,
    /// `dragon`: prints the decorative banner.
    Dragon,
    /// `rc`: prints the most recent external command's exit status.
    Rc,
}

/// Recognizes `exe` as a built-in, if it is one.
pub fn match_builtin(exe: &str) -> Option<BuiltinKind> {
    match exe {
        "exit" => Some(BuiltinKind::Exit),
        "cd" => Some(BuiltinKind::Cd),
        "dragon" => Some(BuiltinKind::Dragon),
        "rc" => Some(BuiltinKind::Rc),
        _ => None,
    }
}

/// What running a built-in did to the shell's control flow.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BuiltinOutcome {
    /// The built-in ran; the shell loop continues.
    Ran,
    /// `exit` ran; the shell loop should terminate.
    Exit,
}

/// Executes `cmd` as a built-in in the calling process, writing any output
/// to `out`. Only called when `cmd` is the sole stage of its pipeline; a
/// built-in invoked from a non-leader pipeline stage runs in its forked
/// child instead, via the same dispatch, but its effects on that child are
/// discarded when the child exits (see the executor).
pub fn run_builtin(
    kind: BuiltinKind,
    cmd: &Command,
    session: &mut Session,
    out: &mut impl Write,
) -> std::io::Result<BuiltinOutcome> {
    match kind {
        BuiltinKind::Exit => Ok(BuiltinOutcome::Exit),
        BuiltinKind::Cd => {
            if let Some(dir) = cmd.args().first() {
                // A failed chdir is silently ignored: per the source, cd
                // always reports ok regardless of success.
                let _ = std::env::set_current_dir(dir);
            }
            Ok(BuiltinOutcome::Ran)
        }
        BuiltinKind::Dragon => {
            writeln!(out, "{}", dragon::BANNER)?;
            Ok(BuiltinOutcome::Ran)
        }
        BuiltinKind::Rc => {
            writeln!(out, "{}", session.last_rc())?;
            Ok(BuiltinOutcome::Ran)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tokenize;

    #[test]
    fn matches_all_four_builtins() {
        assert_eq!(match_builtin("exit"), Some(BuiltinKind::Exit));
        assert_eq!(match_builtin("cd"), Some(BuiltinKind::Cd));
        assert_eq!(match_builtin("dragon"), Some(BuiltinKind::Dragon));
        assert_eq!(match_builtin("rc"), Some(BuiltinKind::Rc));
        assert_eq!(match_builtin("ls"), None);
    }

    #[test]
    fn exit_reports_exit_outcome() {
        let cmd = tokenize("exit").unwrap();
        let mut session = Session::new();
        let mut buf = Vec::new();
        let outcome = run_builtin(BuiltinKind::Exit, &cmd, &mut session, &mut buf).unwrap();
        assert_eq!(outcome, BuiltinOutcome::Exit);
    }

    #[test]
    fn rc_prints_last_saved_status() {
        let cmd = tokenize("rc").unwrap();
        let mut session = Session::new();
        session.set_last_rc(42);
        let mut buf = Vec::new();
        run_builtin(BuiltinKind::Rc, &cmd, &mut session, &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "42\n");
    }

    #[test]
    fn cd_with_no_argument_is_a_no_op() {
        let cmd = tokenize("cd").unwrap();
        let mut session = Session::new();
        let mut buf = Vec::new();
        let before = std::env::current_dir().unwrap();
        run_builtin(BuiltinKind::Cd, &cmd, &mut session, &mut buf).unwrap();
        assert_eq!(std::env::current_dir().unwrap(), before);
    }
}
