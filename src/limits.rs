//! Compile-time limits shared by the parser, executor and wire protocol.

/// Maximum length, in bytes, of a command's executable name (argv\[0\]).
pub const EXE_MAX: usize = 64;

/// Maximum cumulative byte length of a command's argument tokens.
pub const ARG_MAX: usize = 256;

/// Maximum number of stages in a single pipeline.
pub const CMD_MAX: usize = 8;

/// Maximum number of argv elements a single command can hold. Sized so that
/// even a command made up entirely of one-byte tokens separated by single
/// spaces still fits within `ARG_MAX` bytes.
pub const ARGV_MAX: usize = ARG_MAX / 2 + 1;

/// Size of the request/response buffer used by the remote protocol.
pub const RDSH_COMM_BUFF_SZ: usize = ARG_MAX + EXE_MAX;

/// Byte that terminates a request sent from client to server.
pub const REQUEST_TERMINATOR: u8 = 0x00;

/// Byte that terminates a response sent from server to client.
pub const EOF_BYTE: u8 = 0x04;

/// Default interface the server binds when none is given on the command line.
pub const RDSH_DEF_SVR_INTFACE: &str = "0.0.0.0";

/// Default port used by both client and server.
pub const RDSH_DEF_PORT: u16 = 1234;

/// The shell prompt string.
pub const SH_PROMPT: &str = "dsh> ";

/// Sentinel exit code used by a forked child to tell its parent that a
/// built-in `exit` ran inside a pipeline stage.
pub const EXIT_SC: i32 = 99;
