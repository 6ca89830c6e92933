mod editor;
mod plain;

pub use editor::Editor;
pub use plain::PlainReader;

use crate::error::ShellError;

/// Result of one blocking read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    Line(String),
    /// Input stream closed with nothing left to read.
    Eof,
    /// The user interrupted line editing.
    Interrupted,
    /// A line that is not valid UTF-8. It is dropped, not run.
    Invalid,
}

/// Shows the prompt and blocks for one line of input.
pub trait LineReader {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError>;
}

impl<R: LineReader + ?Sized> LineReader for Box<R> {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        (**self).read_line(prompt)
    }
}
