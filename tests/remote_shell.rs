//! End-to-end test driving the `dsh` binary in both server (`-s`) and
//! client (`-c`) modes, talking to each other over a real TCP socket.

use std::io::{BufRead, BufReader, Write};
use std::net::TcpListener;
use std::process::{Command, Stdio};
use std::thread;
use std::time::Duration;

fn free_port() -> u16 {
    TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap().port()
}

#[test]
fn client_and_server_round_trip_a_command() {
    let port = free_port();

    let mut server = Command::new(env!("CARGO_BIN_EXE_dsh"))
        .args(["-s", &format!("127.0.0.1:{port}")])
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()
        .unwrap();

    // Give the server a moment to bind before the client tries to connect.
    thread::sleep(Duration::from_millis(200));

    let mut client = Command::new(env!("CARGO_BIN_EXE_dsh"))
        .args(["-c", &format!("127.0.0.1:{port}")])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .unwrap();

    client
        .stdin
        .take()
        .unwrap()
        .write_all(b"echo hello-from-remote\nstop-server\n")
        .unwrap();

    let mut reader = BufReader::new(client.stdout.take().unwrap());
    let mut first_line = String::new();
    reader.read_line(&mut first_line).unwrap();
    assert_eq!(first_line.trim_end(), "hello-from-remote");

    client.wait().unwrap();
    server.wait().unwrap();
}
