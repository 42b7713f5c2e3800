//! Thin, safe-ish wrappers around the POSIX calls the executor needs:
//! `pipe`, `fork`, `execvp`, `waitpid`, `dup2` and `poll`. Kept separate
//! from the executor so the unsafe surface of the crate lives in one place.

use std::ffi::{CString, OsStr};
use std::io;
use std::os::unix::ffi::OsStrExt;
use std::os::unix::io::{AsRawFd, FromRawFd, OwnedFd, RawFd};

fn check_err(num: i32) -> io::Result<i32> {
    if num < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(num)
}

/// Exit status of a reaped child, as decoded from `waitpid`'s status word.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ExitStatus {
    /// The process called `exit` or returned from `main`, carrying its
    /// exit code.
    Exited(i32),
    /// The process was terminated by a signal, carrying the signal number.
    Signaled(i32),
    /// The raw status word didn't decode as either of the above.
    Other(i32),
}

impl ExitStatus {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        matches!(self, ExitStatus::Exited(0))
    }

    /// The value a shell would report for this status: the exit code if
    /// the process exited normally, or 128 + signal number otherwise.
    pub fn code(&self) -> i32 {
        match *self {
            ExitStatus::Exited(code) => code,
            ExitStatus::Signaled(sig) => 128 + sig,
            ExitStatus::Other(raw) => raw,
        }
    }
}

/// Creates an anonymous pipe, returning `(read_end, write_end)`.
pub fn pipe() -> io::Result<(OwnedFd, OwnedFd)> {
    let mut fds = [0 as libc::c_int; 2];
    check_err(unsafe { libc::pipe(fds.as_mut_ptr()) })?;
    Ok(unsafe { (OwnedFd::from_raw_fd(fds[0]), OwnedFd::from_raw_fd(fds[1])) })
}

/// Forks the current process. Returns `0` in the child, the child's pid in
/// the parent.
///
/// # Safety
/// Only async-signal-safe code may run between `fork` returning in the
/// child and the subsequent `exec`.
pub unsafe fn fork() -> io::Result<i32> {
    check_err(unsafe { libc::fork() })
}

fn os_to_cstring(s: &OsStr) -> io::Result<CString> {
    CString::new(s.as_bytes())
        .map_err(|_| io::Error::from_raw_os_error(libc::EINVAL))
}

/// Replaces the current process image with `cmd`, searching `PATH` as
/// `execvp(3)` does. Never returns on success.
pub fn execvp<S1: AsRef<OsStr>, S2: AsRef<OsStr>>(cmd: S1, args: &[S2]) -> io::Result<()> {
    let cmd_cstring = os_to_cstring(cmd.as_ref())?;
    let args_cstring = args
        .iter()
        .map(|a| os_to_cstring(a.as_ref()))
        .collect::<io::Result<Vec<_>>>()?;
    let mut argv: Vec<*const libc::c_char> =
        args_cstring.iter().map(|a| a.as_ptr()).collect();
    argv.push(std::ptr::null());

    check_err(unsafe { libc::execvp(cmd_cstring.as_ptr(), argv.as_ptr()) })?;
    unreachable!("execvp returns only on error, which check_err already caught");
}

/// Terminates the calling process immediately, bypassing `atexit` handlers.
/// Used by a forked child right before it would otherwise return into
/// shared parent state.
pub fn exit_now(status: i32) -> ! {
    unsafe { libc::_exit(status) }
}

/// Waits for a specific pid to change state, returning its decoded exit
/// status.
pub fn waitpid(pid: i32) -> io::Result<ExitStatus> {
    let mut status: libc::c_int = 0;
    check_err(unsafe { libc::waitpid(pid, &mut status, 0) })?;
    Ok(decode_exit_status(status))
}

/// Reaps a child without blocking if it hasn't exited yet; used to avoid
/// leaving zombies behind when a pipeline is aborted mid-fork.
pub fn reap_nonblocking(pid: i32) {
    let mut status: libc::c_int = 0;
    unsafe {
        libc::waitpid(pid, &mut status, libc::WNOHANG);
    }
}

fn decode_exit_status(status: libc::c_int) -> ExitStatus {
    if libc::WIFEXITED(status) {
        ExitStatus::Exited(libc::WEXITSTATUS(status))
    } else if libc::WIFSIGNALED(status) {
        ExitStatus::Signaled(libc::WTERMSIG(status))
    } else {
        ExitStatus::Other(status)
    }
}

/// Duplicates `oldfd` onto `newfd`, closing `newfd` first if it was open.
pub fn dup2(oldfd: RawFd, newfd: RawFd) -> io::Result<()> {
    check_err(unsafe { libc::dup2(oldfd, newfd) })?;
    Ok(())
}

/// Duplicates `fd`, returning a new owned descriptor pointing at the same
/// open file description. Used to stash the shell's original stdio before
/// a remote request temporarily rewires it onto the client socket.
pub fn dup(fd: RawFd) -> io::Result<OwnedFd> {
    let new_fd = check_err(unsafe { libc::dup(fd) })?;
    Ok(unsafe { OwnedFd::from_raw_fd(new_fd) })
}

/// A non-blocking check for whether a socket has hung up or errored,
/// mirroring the client's `poll(POLLHUP | POLLERR)` liveness probe.
pub fn poll_hup_or_err(fd: &impl AsRawFd) -> io::Result<bool> {
    let mut pfd = libc::pollfd {
        fd: fd.as_raw_fd(),
        events: libc::POLLIN,
        revents: 0,
    };
    check_err(unsafe { libc::poll(&mut pfd, 1, 0) })?;
    Ok(pfd.revents & (libc::POLLHUP | libc::POLLERR) != 0)
}

/// `errno` value for "no such file or directory", surfaced by `execvp`
/// when the executable can't be found on `PATH`.
pub const ENOENT: i32 = libc::ENOENT;
/// `errno` value for "permission denied", surfaced by `execvp` when the
/// executable is found but isn't runnable by this user.
pub const EACCES: i32 = libc::EACCES;

/// Closes a raw descriptor, ignoring errors. Used in a forked child to
/// drop pipe ends it doesn't need before `exec`, since `exec` does not
/// close non-`CLOEXEC` descriptors on its own.
pub fn close_fd(fd: RawFd) {
    unsafe {
        libc::close(fd);
    }
}
