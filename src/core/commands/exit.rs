use super::{Command, CommandError, Flow};
use std::io::Write;

/// Ends the loop. The process exits once the loop has unwound.
#[derive(Clone, Default)]
pub struct ExitCommand;

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ExitCommand {
    fn execute(&self, _args: &[String], _out: &mut dyn Write) -> Result<Flow, CommandError> {
        Ok(Flow::Exit)
    }
}
