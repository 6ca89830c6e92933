use std::collections::BTreeMap;
use std::io::Write;

mod cd;
mod clear;
mod exit;

pub use cd::{CdCommand, CdError, CdErrorKind};
pub use clear::ClearCommand;
pub use exit::ExitCommand;

use crate::process::{ProcessError, ProcessExecutor};
use crate::tokenizer::ArgVector;

/// What the loop does after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

#[derive(Debug)]
pub enum CommandError {
    NotFound(String),
    MissingOperand(&'static str),
    Cd(CdError),
    IoError(std::io::Error),
    ProcessError(ProcessError),
}

impl CommandError {
    /// Fatal errors end the shell; everything else is reported and the loop
    /// carries on.
    pub fn is_fatal(&self) -> bool {
        match self {
            CommandError::ProcessError(e) => e.is_fatal(),
            _ => false,
        }
    }
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::NotFound(cmd) => write!(f, "esh: command not found: {}", cmd),
            CommandError::MissingOperand(cmd) => write!(f, "{}: missing directory operand", cmd),
            CommandError::Cd(err) => write!(f, "{}", err),
            CommandError::IoError(err) => write!(f, "esh: IO error: {}", err),
            CommandError::ProcessError(err) => write!(f, "esh: {}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::IoError(err)
    }
}

impl From<ProcessError> for CommandError {
    fn from(err: ProcessError) -> Self {
        CommandError::ProcessError(err)
    }
}

impl From<CdError> for CommandError {
    fn from(err: CdError) -> Self {
        CommandError::Cd(err)
    }
}

pub trait Command {
    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<Flow, CommandError>;
}

#[derive(Clone)]
enum CommandType {
    Cd(CdCommand),
    Clear(ClearCommand),
    Exit(ExitCommand),
}

impl Command for CommandType {
    fn execute(&self, args: &[String], out: &mut dyn Write) -> Result<Flow, CommandError> {
        match self {
            CommandType::Cd(cmd) => cmd.execute(args, out),
            CommandType::Clear(cmd) => cmd.execute(args, out),
            CommandType::Exit(cmd) => cmd.execute(args, out),
        }
    }
}

/// Built-ins first, external programs otherwise.
#[derive(Clone)]
pub struct CommandExecutor {
    commands: BTreeMap<&'static str, CommandType>,
    process_executor: ProcessExecutor,
}

impl CommandExecutor {
    pub fn new(process_executor: ProcessExecutor) -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("cd", CommandType::Cd(CdCommand::new()));
        commands.insert("clear", CommandType::Clear(ClearCommand::new()));
        commands.insert("exit", CommandType::Exit(ExitCommand::new()));

        Self {
            commands,
            process_executor,
        }
    }

    /// An empty vector is a no-op.
    pub fn execute(&self, argv: &ArgVector, out: &mut dyn Write) -> Result<Flow, CommandError> {
        let Some(command) = argv.command() else {
            return Ok(Flow::Continue);
        };

        if let Some(cmd) = self.commands.get(command) {
            cmd.execute(argv.args(), out)
        } else {
            self.process_executor.spawn_process(argv)?;
            Ok(Flow::Continue)
        }
    }

    #[cfg(test)]
    pub(crate) fn is_builtin(&self, command: &str) -> bool {
        self.commands.contains_key(command)
    }
}
