use super::Error;

/// Error when a batch is used after it has been executed.
#[derive(Debug)]
pub(super) struct UseAfterDisposeError {
    what: &'static str,
}

impl std::error::Error for UseAfterDisposeError {}

impl core::fmt::Display for UseAfterDisposeError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "{} used after it was disposed", self.what)
    }
}

impl Error {
    /// Creates a use-after-dispose error.
    pub fn use_after_dispose(what: &'static str) -> Error {
        Error::from(super::ErrorKind::UseAfterDispose(UseAfterDisposeError {
            what,
        }))
    }

    /// Returns `true` if this error is a use-after-dispose error.
    pub fn is_use_after_dispose(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UseAfterDispose(_)))
    }
}
