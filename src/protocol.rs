//! Wire framing shared by the remote client and server: requests are
//! terminated by a NUL byte, responses by [`EOF_BYTE`].

use std::io::{self, Read, Write};

use crate::limits::{EOF_BYTE, RDSH_COMM_BUFF_SZ, REQUEST_TERMINATOR};

/// Sends one command line as a request: the line's bytes followed by the
/// request terminator.
pub fn send_request(stream: &mut impl Write, cmd_line: &str) -> io::Result<()> {
    stream.write_all(cmd_line.as_bytes())?;
    stream.write_all(&[REQUEST_TERMINATOR])?;
    stream.flush()
}

/// Reads one request, stopping at the terminator byte. Returns `None` if
/// the peer closed the connection before sending anything.
pub fn read_request(stream: &mut impl Read) -> io::Result<Option<String>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; RDSH_COMM_BUFF_SZ];
    loop {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            return Ok(if buf.is_empty() {
                None
            } else {
                Some(String::from_utf8_lossy(&buf).into_owned())
            });
        }
        if let Some(pos) = chunk[..n].iter().position(|&b| b == REQUEST_TERMINATOR) {
            buf.extend_from_slice(&chunk[..pos]);
            return Ok(Some(String::from_utf8_lossy(&buf).into_owned()));
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Sends a response, appending the EOF marker byte that tells the client
/// this response is complete.
pub fn send_response(stream: &mut impl Write, data: &[u8]) -> io::Result<()> {
    stream.write_all(data)?;
    stream.write_all(&[EOF_BYTE])?;
    stream.flush()
}

/// Reads one response, accumulating bytes until the EOF marker is seen.
pub fn read_response(stream: &mut impl Read) -> io::Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; RDSH_COMM_BUFF_SZ];
    loop {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            return Ok(buf);
        }
        if let Some(pos) = chunk[..n].iter().position(|&b| b == EOF_BYTE) {
            buf.extend_from_slice(&chunk[..pos]);
            return Ok(buf);
        }
        buf.extend_from_slice(&chunk[..n]);
    }
}

/// Whether a request line asks the server to shut itself down entirely,
/// as opposed to just closing this one connection.
pub fn is_stop_server(cmd_line: &str) -> bool {
    cmd_line.trim() == "stop-server"
}

/// Whether a request line asks the server to close just this connection.
pub fn is_client_exit(cmd_line: &str) -> bool {
    cmd_line.trim() == "exit"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_round_trips_through_the_terminator() {
        let mut wire = Vec::new();
        send_request(&mut wire, "ls -l").unwrap();
        let mut cursor = io::Cursor::new(wire);
        assert_eq!(read_request(&mut cursor).unwrap().as_deref(), Some("ls -l"));
    }

    #[test]
    fn response_round_trips_through_eof_byte() {
        let mut wire = Vec::new();
        send_response(&mut wire, b"hello\n").unwrap();
        let mut cursor = io::Cursor::new(wire);
        assert_eq!(read_response(&mut cursor).unwrap(), b"hello\n");
    }

    #[test]
    fn empty_stream_yields_no_request() {
        let mut cursor = io::Cursor::new(Vec::new());
        assert_eq!(read_request(&mut cursor).unwrap(), None);
    }

    #[test]
    fn recognizes_the_two_sentinels() {
        assert!(is_stop_server("stop-server"));
        assert!(!is_stop_server("exit"));
        assert!(is_client_exit("exit"));
        assert!(!is_client_exit("stop-server"));
    }
}
