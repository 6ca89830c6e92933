use std::fmt;
use std::io;

pub mod executor;
pub mod launcher;
pub mod resolver;
pub mod signal;

pub use executor::ProcessExecutor;
pub use launcher::{ChildHandle, Launcher, WaitStatus};
pub use resolver::Resolver;
pub use signal::Shutdown;

#[derive(Debug)]
pub enum ProcessError {
    Fork(io::Error),
    Wait(io::Error),
    InvalidArgument(String),
    SignalError(String),
    /// Shutdown began before the child could be started.
    Cancelled,
}

impl ProcessError {
    /// Errors after which the shell cannot safely continue.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ProcessError::Fork(_) | ProcessError::Wait(_))
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::Fork(e) => write!(f, "could not create child process: {}", e),
            ProcessError::Wait(e) => write!(f, "could not wait for child process: {}", e),
            ProcessError::InvalidArgument(arg) => {
                write!(f, "argument contains a NUL byte: {:?}", arg)
            }
            ProcessError::SignalError(msg) => write!(f, "signal error: {}", msg),
            ProcessError::Cancelled => write!(f, "shutting down, command not started"),
        }
    }
}

impl std::error::Error for ProcessError {}

impl From<ctrlc::Error> for ProcessError {
    fn from(err: ctrlc::Error) -> Self {
        ProcessError::SignalError(err.to_string())
    }
}
