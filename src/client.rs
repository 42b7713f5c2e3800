//! Remote shell client: connects once, then sends every line read from
//! `input` as a request and prints the matching response.

use std::io::{BufRead, Write};
use std::net::TcpStream;

use tracing::{info, warn};

use crate::error::{Result, ShellError};
use crate::posix;
use crate::protocol;

/// Connects to `host:port` and drives the session from `input`, writing
/// every response to `output`. Returns once the user sends `exit` or
/// `stop-server`, or `input` reaches EOF.
pub fn run_client(host: &str, port: u16, input: impl BufRead, mut output: impl Write) -> Result<()> {
    let addr = format!("{host}:{port}");
    let mut stream =
        TcpStream::connect(&addr).map_err(|_| ShellError::RemoteClient(addr.clone()))?;
    info!(%addr, "connected to remote shell server");

    for line in input.lines() {
        let line = line?;
        if line.trim().is_empty() {
            writeln!(output, "{}", ShellError::NoCommands)?;
            continue;
        }

        if posix::poll_hup_or_err(&stream).map_err(ShellError::RemoteCommunication)? {
            warn!("server closed the connection");
            return Ok(());
        }

        protocol::send_request(&mut stream, &line).map_err(ShellError::RemoteCommunication)?;
        let response = protocol::read_response(&mut stream).map_err(ShellError::RemoteCommunication)?;

        if response == b"exit" {
            return Ok(());
        }

        output.write_all(&response)?;
        output.flush()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::net::TcpListener;
    use std::thread;

    #[test]
    fn exits_cleanly_on_a_refused_connection() {
        // Port 0 never accepts connections, so `connect` fails immediately
        // and the client should report it as `RemoteClient`, not panic.
        let result = run_client("127.0.0.1", 0, Cursor::new(Vec::new()), Vec::new());
        assert!(matches!(result, Err(ShellError::RemoteClient(_))));
    }

    #[test]
    fn blank_line_prints_the_no_commands_warning_without_contacting_the_server() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            let req = protocol::read_request(&mut sock).unwrap().unwrap();
            assert_eq!(req, "exit");
            protocol::send_response(&mut sock, b"bye\n").unwrap();
        });

        let input = Cursor::new(b"\n\nexit\n".to_vec());
        let mut output = Vec::new();
        run_client("127.0.0.1", port, input, &mut output).unwrap();
        server.join().unwrap();

        let out = String::from_utf8(output).unwrap();
        assert_eq!(out.matches("warning: no commands provided").count(), 2);
        assert!(out.ends_with("bye\n"));
    }

    #[test]
    fn round_trips_one_command_against_a_fake_server() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let server = thread::spawn(move || {
            let (mut sock, _) = listener.accept().unwrap();
            let req = protocol::read_request(&mut sock).unwrap().unwrap();
            assert_eq!(req, "exit");
            protocol::send_response(&mut sock, b"bye\n").unwrap();
        });

        let input = Cursor::new(b"exit\n".to_vec());
        let mut output = Vec::new();
        run_client("127.0.0.1", port, input, &mut output).unwrap();
        server.join().unwrap();

        assert_eq!(String::from_utf8(output).unwrap(), "bye\n");
    }
}
