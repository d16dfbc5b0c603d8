use super::Error;

/// Error when a mapping declares something twice.
///
/// This occurs when:
/// - the identity property is designated more than once
/// - two properties map to the same column name
/// - two mapping definitions are registered for the same class
#[derive(Debug)]
pub(super) struct DuplicateMappingError {
    class: Box<str>,
    message: Box<str>,
}

impl std::error::Error for DuplicateMappingError {}

impl core::fmt::Display for DuplicateMappingError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "duplicate mapping in `{}`: {}", self.class, self.message)
    }
}

impl Error {
    /// Creates a duplicate mapping error for `class`.
    pub fn duplicate_mapping(class: impl Into<String>, message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::DuplicateMapping(DuplicateMappingError {
            class: class.into().into(),
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a duplicate mapping error.
    pub fn is_duplicate_mapping(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::DuplicateMapping(_)))
    }
}
