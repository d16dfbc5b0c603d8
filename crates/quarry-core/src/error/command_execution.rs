use super::Error;

/// Error when one command of a batch fails.
///
/// Carries the zero-based position of the failing command and the driver
/// error that caused it. Commands after `index` were not dispatched.
#[derive(Debug)]
pub(super) struct CommandExecutionError {
    pub(super) index: usize,
    pub(super) cause: Error,
}

impl std::error::Error for CommandExecutionError {}

impl core::fmt::Display for CommandExecutionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "command {} in batch failed: {}", self.index, self.cause)
    }
}

impl Error {
    /// Creates a command execution error for the command at `index`.
    pub fn command_execution(index: usize, cause: Error) -> Error {
        Error::from(super::ErrorKind::CommandExecution(CommandExecutionError {
            index,
            cause,
        }))
    }

    /// Returns `true` if this error is a command execution error.
    pub fn is_command_execution(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::CommandExecution(_)))
    }

    /// Returns the index of the failing command when this error reports a
    /// batch command failure.
    pub fn command_index(&self) -> Option<usize> {
        self.chain().find_map(|err| match err.kind() {
            super::ErrorKind::CommandExecution(err) => Some(err.index),
            _ => None,
        })
    }
}
