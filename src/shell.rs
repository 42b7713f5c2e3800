//! The interactive local shell loop: read a line, build a pipeline, run it,
//! repeat until `exit` or EOF.

use std::io::{self, BufRead, Write};

use crate::error::ShellError;
use crate::exec::{PipelineStatus, execute_pipeline};
use crate::limits::SH_PROMPT;
use crate::pipeline::build_pipeline;
use crate::session::Session;

/// Runs the local, interactive shell against `input`/`output` until `exit`
/// is run at the top level or the input stream reaches EOF.
pub fn run_local_shell(input: impl BufRead, mut output: impl Write) -> io::Result<()> {
    let mut session = Session::new();
    let mut lines = input.lines();

    loop {
        write!(output, "{SH_PROMPT}")?;
        output.flush()?;

        let line = match lines.next() {
            Some(line) => line?,
            None => return Ok(()),
        };

        match build_pipeline(&line) {
            Ok(pipeline) => match execute_pipeline(&pipeline, &mut session) {
                Ok(PipelineStatus::OkExit) => return Ok(()),
                Ok(_) => {}
                Err(e) => eprintln!("{e}"),
            },
            Err(ShellError::NoCommands) => writeln!(output, "{}", ShellError::NoCommands)?,
            Err(e) => eprintln!("{e}"),
        }
    }
}
