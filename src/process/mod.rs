use std::fmt;

pub mod executor;

pub use executor::ProcessExecutor;

#[derive(Debug)]
pub enum ProcessError {
    CommandNotFound(String),
    Spawn(std::io::Error),
    Wait(std::io::Error),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::CommandNotFound(cmd) => write!(f, "command not found: {}", cmd),
            ProcessError::Spawn(e) => write!(f, "could not launch command: {}", e),
            ProcessError::Wait(e) => write!(f, "could not wait for child: {}", e),
        }
    }
}

impl std::error::Error for ProcessError {}
