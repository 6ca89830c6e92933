use std::io;

use rustyline::config::Configurer;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

use super::{LineReader, ReadOutcome};
use crate::error::ShellError;

/// Interactive line editing for terminals.
pub struct Editor {
    editor: DefaultEditor,
}

impl Editor {
    /// `history` keeps entered lines for recall within this session.
    pub fn new(history: bool) -> Result<Self, ShellError> {
        let mut editor = DefaultEditor::new()?;
        editor.set_auto_add_history(history);
        Ok(Self { editor })
    }
}

impl LineReader for Editor {
    fn read_line(&mut self, prompt: &str) -> Result<ReadOutcome, ShellError> {
        match self.editor.readline(prompt) {
            Ok(line) => Ok(ReadOutcome::Line(line)),
            Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
            Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
            Err(ReadlineError::Io(e)) if e.kind() == io::ErrorKind::InvalidData => {
                Ok(ReadOutcome::Invalid)
            }
            Err(e) => Err(e.into()),
        }
    }
}
