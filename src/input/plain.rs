use std::io::{BufRead, Write};

use super::{LineReader, ReadOutcome};
use crate::error::ShellError;

/// Line reader for pipes, files and tests: prints the prompt itself and
/// reads raw bytes up to the next newline.
pub struct PlainReader<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> PlainReader<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    #[cfg(test)]
    pub(crate) fn into_output(self) -> W {
        self.output
    }
}

impl<R: BufRead, W: Write> LineReader for PlainReader<R, W> {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        self.output
            .write_all(prompt.as_bytes())
            .and_then(|_| self.output.flush())
            .map_err(ShellError::Flush)?;

        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(ReadOutcome::Eof);
        }
        match String::from_utf8(buf) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(_) => Ok(ReadOutcome::Invalid),
        }
    }
}
