//! Pipeline executor: wires N commands' stdio together with pipes, forks
//! and execs each external stage, and dispatches single-stage built-ins
//! without forking at all.

use std::os::unix::io::{AsRawFd, OwnedFd, RawFd};

use crate::builtins::{BuiltinOutcome, match_builtin, run_builtin};
use crate::command::Command;
use crate::error::Result;
use crate::limits::EXIT_SC;
use crate::pipeline::Pipeline;
use crate::posix::{self, ExitStatus};
use crate::redirect::plan_redirections;
use crate::session::Session;

const STDIN_FILENO: RawFd = 0;
const STDOUT_FILENO: RawFd = 1;

/// The terminal outcome of running one pipeline.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PipelineStatus {
    /// Every stage exited zero.
    Ok,
    /// A forked stage ran the `exit` built-in; the caller should terminate
    /// its own loop.
    OkExit,
    /// At least one stage failed; carries the last failing stage's code.
    Error(i32),
}

/// Runs `pipeline` to completion against the calling process's own
/// stdin/stdout/stderr. Callers that need a different destination (the
/// remote server) `dup2` their fds onto 0/1/2 before calling this, so every
/// forked child inherits the right streams without this function knowing
/// anything about sockets.
pub fn execute_pipeline(pipeline: &Pipeline, session: &mut Session) -> Result<PipelineStatus> {
    let stages = pipeline.stages();

    if stages.len() == 1
        && let Some(kind) = match_builtin(stages[0].exe())
    {
        let mut stdout = std::io::stdout();
        let outcome = run_builtin(kind, &stages[0], session, &mut stdout)?;
        return Ok(match outcome {
            BuiltinOutcome::Exit => PipelineStatus::OkExit,
            BuiltinOutcome::Ran => PipelineStatus::Ok,
        });
    }

    let mut pipes: Vec<(OwnedFd, OwnedFd)> = Vec::with_capacity(stages.len() - 1);
    for _ in 0..stages.len() - 1 {
        pipes.push(posix::pipe()?);
    }

    // Remembered alongside each pid so the wait loop below only ever
    // updates `last_rc` for an external command's status, never a
    // built-in's, per the same leader/non-leader split `exec_cmd` applies.
    let mut pids = Vec::with_capacity(stages.len());
    for (i, stage) in stages.iter().enumerate() {
        let is_external = match_builtin(stage.exe()).is_none();
        match unsafe { posix::fork() } {
            Ok(0) => run_child_stage(i, stage, &pipes, stages.len()),
            Ok(pid) => pids.push((pid, is_external)),
            Err(e) => {
                drop(pipes);
                for (pid, _) in pids {
                    posix::reap_nonblocking(pid);
                }
                return Err(e.into());
            }
        }
    }

    // The parent holds no end of any pipe open past this point; only the
    // children do, which is what lets a reader see EOF once its writer
    // exits.
    drop(pipes);

    let mut saw_exit = false;
    let mut last_error = None;
    for (pid, is_external) in pids {
        let exit = posix::waitpid(pid)?;
        match exit {
            ExitStatus::Exited(EXIT_SC) => saw_exit = true,
            other => {
                let code = other.code();
                // Every external stage's status is recorded, success or
                // not, so `rc` always reflects the most recent one.
                if is_external {
                    session.set_last_rc(code);
                }
                if code != 0 {
                    last_error = Some(code);
                }
            }
        }
    }

    Ok(if saw_exit {
        PipelineStatus::OkExit
    } else if let Some(code) = last_error {
        PipelineStatus::Error(code)
    } else {
        PipelineStatus::Ok
    })
}

/// Runs in the forked child for stage `i` of an `n`-stage pipeline. Never
/// returns: every path ends in `exec` or `exit_now`.
fn run_child_stage(i: usize, stage: &Command, pipes: &[(OwnedFd, OwnedFd)], n: usize) -> ! {
    if i > 0 {
        let _ = posix::dup2(pipes[i - 1].0.as_raw_fd(), STDIN_FILENO);
    }
    if i < n - 1 {
        let _ = posix::dup2(pipes[i].1.as_raw_fd(), STDOUT_FILENO);
    }
    // Every pipe fd, used or not, must be closed in this child: exec never
    // closes descriptors on its own, and a writer left open in a stage that
    // doesn't need it would keep a downstream reader from ever seeing EOF.
    for (read_end, write_end) in pipes {
        posix::close_fd(read_end.as_raw_fd());
        posix::close_fd(write_end.as_raw_fd());
    }

    let plan = match plan_redirections(stage) {
        Ok(plan) => plan,
        Err(e) => {
            eprintln!("{e}");
            posix::exit_now(1);
        }
    };
    if let Err(e) = plan.apply() {
        eprintln!("error: {e}");
        posix::exit_now(1);
    }

    let argv = plan.argv();
    if let Some(kind) = match_builtin(&argv[0]) {
        let reduced = Command::from_argv(argv.to_vec());
        let mut session = Session::new();
        let mut stdout = std::io::stdout();
        match run_builtin(kind, &reduced, &mut session, &mut stdout) {
            Ok(BuiltinOutcome::Exit) => posix::exit_now(EXIT_SC),
            Ok(BuiltinOutcome::Ran) => posix::exit_now(0),
            Err(_) => posix::exit_now(1),
        }
    }

    let err = posix::execvp(&argv[0], argv).unwrap_err();
    let errno = err.raw_os_error().unwrap_or(1);
    let message = match errno {
        e if e == posix::ENOENT => "Command not found in PATH",
        e if e == posix::EACCES => "Permission denied to execute command",
        _ => "Error executing external command",
    };
    eprintln!("{message}");
    posix::exit_now(errno);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::build_pipeline;

    #[test]
    fn single_external_command_succeeds() {
        let pipeline = build_pipeline("true").unwrap();
        let mut session = Session::new();
        let status = execute_pipeline(&pipeline, &mut session).unwrap();
        assert_eq!(status, PipelineStatus::Ok);
    }

    #[test]
    fn failing_command_reports_its_exit_code() {
        let pipeline = build_pipeline("false").unwrap();
        let mut session = Session::new();
        let status = execute_pipeline(&pipeline, &mut session).unwrap();
        assert_eq!(status, PipelineStatus::Error(1));
        assert_eq!(session.last_rc(), 1);
    }

    #[test]
    fn successful_command_after_a_failing_one_resets_last_rc() {
        let mut session = Session::new();
        execute_pipeline(&build_pipeline("false").unwrap(), &mut session).unwrap();
        assert_eq!(session.last_rc(), 1);
        execute_pipeline(&build_pipeline("true").unwrap(), &mut session).unwrap();
        assert_eq!(session.last_rc(), 0);
    }

    #[test]
    fn missing_command_reports_enoent_as_last_rc() {
        let pipeline = build_pipeline("this-command-does-not-exist-anywhere").unwrap();
        let mut session = Session::new();
        let status = execute_pipeline(&pipeline, &mut session).unwrap();
        assert_eq!(status, PipelineStatus::Error(posix::ENOENT));
    }

    #[test]
    fn single_stage_builtin_runs_without_forking() {
        let pipeline = build_pipeline("exit").unwrap();
        let mut session = Session::new();
        let status = execute_pipeline(&pipeline, &mut session).unwrap();
        assert_eq!(status, PipelineStatus::OkExit);
    }

    #[test]
    fn two_stage_pipeline_connects_stdout_to_stdin() {
        use std::fs;
        use tempfile::tempdir;

        let dir = tempdir().unwrap();
        let out_path = dir.path().join("out.txt");
        let pipeline =
            build_pipeline(&format!("echo hello | cat > {}", out_path.display())).unwrap();
        let mut session = Session::new();
        let status = execute_pipeline(&pipeline, &mut session).unwrap();
        assert_eq!(status, PipelineStatus::Ok);
        assert_eq!(fs::read_to_string(out_path).unwrap(), "hello\n");
    }

    #[test]
    fn builtin_in_non_leader_position_runs_in_its_own_child() {
        let pipeline = build_pipeline("exit | true").unwrap();
        let mut session = Session::new();
        // `exit` here forks like any other non-leader stage; its child
        // reports the sentinel code, which the pipeline surfaces as
        // `OkExit` even though the shell process itself never ran `exit`.
        let status = execute_pipeline(&pipeline, &mut session).unwrap();
        assert_eq!(status, PipelineStatus::OkExit);
    }
}
