//! Remote shell server: accepts TCP connections and runs each request line
//! through the same pipeline executor the local shell uses, with the
//! connection's socket temporarily standing in for stdin/stdout/stderr.

use std::io::{self, Write};
use std::net::{TcpListener, TcpStream};
use std::os::unix::io::AsRawFd;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::error::{Result, ShellError};
use crate::exec::{PipelineStatus, execute_pipeline};
use crate::limits::EOF_BYTE;
use crate::pipeline::build_pipeline;
use crate::posix;
use crate::protocol::{self, is_client_exit, is_stop_server};
use crate::session::Session;

const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Runs the remote shell server, accepting connections on `bind_addr:port`
/// until a client sends `stop-server`. When `threaded` is set, each
/// connection is handled on its own thread rather than serially.
pub fn run_server(bind_addr: &str, port: u16, threaded: bool) -> Result<()> {
    let addr = format!("{bind_addr}:{port}");
    let listener = TcpListener::bind(&addr)?;
    listener.set_nonblocking(true)?;
    info!(%addr, threaded, "remote shell server listening");

    let stop_flag = Arc::new(AtomicBool::new(false));
    // Guards the stdio-rewire+execute critical section in
    // `run_request_with_socket_as_stdio`: fds 0/1/2 are process-global, so
    // two threaded connections executing a pipeline at the same instant
    // would otherwise race on them. Accepting, reading and writing a
    // connection's own socket stays fully concurrent; only the brief window
    // where a request's dup2 stands in for stdio is serialized.
    let stdio_lock = Arc::new(Mutex::new(()));

    loop {
        if stop_flag.load(Ordering::SeqCst) {
            info!("stop-server received, shutting down");
            return Ok(());
        }

        match listener.accept() {
            Ok((stream, peer)) => {
                debug!(%peer, "accepted connection");
                if threaded {
                    let stop_flag = Arc::clone(&stop_flag);
                    let stdio_lock = Arc::clone(&stdio_lock);
                    thread::spawn(move || {
                        if let Err(e) = handle_connection(stream, &stop_flag, &stdio_lock) {
                            warn!(%peer, error = %e, "connection ended with an error");
                        }
                    });
                } else if let Err(e) = handle_connection(stream, &stop_flag, &stdio_lock) {
                    warn!(%peer, error = %e, "connection ended with an error");
                }
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_POLL_INTERVAL);
            }
            Err(e) => return Err(e.into()),
        }
    }
}

/// Serves one client connection until it disconnects, sends `exit`, or
/// sends `stop-server` (which also sets `stop_flag` for the accept loop).
fn handle_connection(
    mut stream: TcpStream,
    stop_flag: &AtomicBool,
    stdio_lock: &Mutex<()>,
) -> Result<()> {
    let mut session = Session::new();

    loop {
        let cmd_line = match protocol::read_request(&mut stream)? {
            Some(line) => line,
            None => return Ok(()),
        };

        if is_stop_server(&cmd_line) {
            stop_flag.store(true, Ordering::SeqCst);
            stream.write_all(b"exit")?;
            stream.write_all(&[EOF_BYTE])?;
            return Ok(());
        }
        if is_client_exit(&cmd_line) {
            stream.write_all(b"exit")?;
            stream.write_all(&[EOF_BYTE])?;
            return Ok(());
        }

        let status =
            run_request_with_socket_as_stdio(&mut stream, &cmd_line, &mut session, stdio_lock)?;
        stream.write_all(&[EOF_BYTE])?;
        if status == PipelineStatus::OkExit {
            return Ok(());
        }
    }
}

/// Temporarily rewires this process's stdin/stdout/stderr onto `stream`,
/// runs one pipeline, then restores the original descriptors. Every child
/// the executor forks inherits the socket automatically, exactly as it
/// would inherit a terminal in the local shell. `stdio_lock` is held for the
/// whole rewire-execute-restore window so a concurrent connection on another
/// thread can never observe or clobber these process-global descriptors
/// mid-flight.
fn run_request_with_socket_as_stdio(
    stream: &mut TcpStream,
    cmd_line: &str,
    session: &mut Session,
    stdio_lock: &Mutex<()>,
) -> Result<PipelineStatus> {
    let _guard = stdio_lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

    let saved_stdin = posix::dup(0)?;
    let saved_stdout = posix::dup(1)?;
    let saved_stderr = posix::dup(2)?;

    let sock_fd = stream.as_raw_fd();
    posix::dup2(sock_fd, 0)?;
    posix::dup2(sock_fd, 1)?;
    posix::dup2(sock_fd, 2)?;

    let outcome = match build_pipeline(cmd_line) {
        Ok(pipeline) => execute_pipeline(&pipeline, session),
        Err(ShellError::NoCommands) => {
            eprintln!("{}", ShellError::NoCommands);
            Ok(PipelineStatus::Ok)
        }
        Err(e) => {
            eprintln!("{e}");
            Ok(PipelineStatus::Ok)
        }
    };

    posix::dup2(saved_stdin.as_raw_fd(), 0)?;
    posix::dup2(saved_stdout.as_raw_fd(), 1)?;
    posix::dup2(saved_stderr.as_raw_fd(), 2)?;

    outcome
}
