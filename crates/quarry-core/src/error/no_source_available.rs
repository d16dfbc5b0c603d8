use super::Error;

/// Error when no registered source satisfies a request.
#[derive(Debug)]
pub(super) struct NoSourceAvailableError {
    class: Box<str>,
    access: &'static str,
}

impl std::error::Error for NoSourceAvailableError {}

impl core::fmt::Display for NoSourceAvailableError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "no {} source available for `{}`",
            self.access, self.class
        )
    }
}

impl Error {
    /// Creates a no-source-available error. `access` names the requested
    /// capability, e.g. `"readable"`.
    pub fn no_source_available(class: impl Into<String>, access: &'static str) -> Error {
        Error::from(super::ErrorKind::NoSourceAvailable(NoSourceAvailableError {
            class: class.into().into(),
            access,
        }))
    }

    /// Returns `true` if this error is a no-source-available error.
    pub fn is_no_source_available(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::NoSourceAvailable(_)))
    }
}
