//! Command-line entry point: runs the local interactive shell, or the
//! remote client/server, depending on the flags given.

use std::io::{self, Write};
use std::process::ExitCode;

use dsh::client::run_client;
use dsh::limits::{RDSH_DEF_PORT, RDSH_DEF_SVR_INTFACE};
use dsh::server::run_server;
use dsh::shell::run_local_shell;

enum Mode {
    Local,
    Client { host: String, port: u16 },
    Server { iface: String, port: u16, threaded: bool },
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Mode, String> {
    let mut mode = Mode::Local;
    let mut threaded = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-c" => {
                let target = args.next().ok_or("-c requires a HOST:PORT argument")?;
                let (host, port) = split_host_port(&target, None)?;
                mode = Mode::Client { host, port };
            }
            "-s" => {
                let target = args.next().unwrap_or_default();
                let (iface, port) = if target.is_empty() {
                    (RDSH_DEF_SVR_INTFACE.to_string(), RDSH_DEF_PORT)
                } else {
                    split_host_port(&target, Some(RDSH_DEF_SVR_INTFACE))?
                };
                mode = Mode::Server { iface, port, threaded: false };
            }
            "-t" => threaded = true,
            other => return Err(format!("unrecognized argument: {other}")),
        }
    }

    if let Mode::Server { threaded: t, .. } = &mut mode {
        *t = threaded;
    } else if threaded {
        return Err("-t is only valid alongside -s".to_string());
    }

    Ok(mode)
}

/// Splits a `[HOST:]PORT` argument, defaulting the host when `default_host`
/// is given (server mode) or requiring it otherwise (client mode).
fn split_host_port(spec: &str, default_host: Option<&str>) -> Result<(String, u16), String> {
    match spec.rsplit_once(':') {
        Some((host, port)) => {
            let port = port.parse().map_err(|_| format!("invalid port in `{spec}`"))?;
            Ok((host.to_string(), port))
        }
        None => match default_host {
            Some(host) => {
                let port = spec.parse().map_err(|_| format!("invalid port in `{spec}`"))?;
                Ok((host.to_string(), port))
            }
            None => Err(format!("`{spec}` must be in HOST:PORT form")),
        },
    }
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mode = match parse_args(std::env::args().skip(1)) {
        Ok(mode) => mode,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = match mode {
        Mode::Local => run_local_shell(io::stdin().lock(), io::stdout().lock()).map_err(Into::into),
        Mode::Client { host, port } => {
            run_client(&host, port, io::stdin().lock(), io::stdout().lock())
        }
        Mode::Server { iface, port, threaded } => run_server(&iface, port, threaded),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let _ = writeln!(io::stderr(), "{e}");
            ExitCode::FAILURE
        }
    }
}
