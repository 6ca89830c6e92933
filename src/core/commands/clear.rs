use super::{Command, CommandError, Flow};
use std::io::Write;

/// Erase the display, then move the cursor to the top-left corner.
pub const CLEAR_SEQUENCE: &str = "\x1B[2J\x1B[1;1H";

#[derive(Clone, Default)]
pub struct ClearCommand;

impl ClearCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for ClearCommand {
    fn execute(&self, _args: &[String], out: &mut dyn Write) -> Result<Flow, CommandError> {
        out.write_all(CLEAR_SEQUENCE.as_bytes())?;
        out.flush()?;
        Ok(Flow::Continue)
    }
}
