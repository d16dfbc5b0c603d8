use super::Error;

/// Error when a source names a provider that is not registered.
///
/// Provider names match exactly and case-sensitively.
#[derive(Debug)]
pub(super) struct UnsupportedProviderError {
    provider: Box<str>,
    source_name: Box<str>,
}

impl std::error::Error for UnsupportedProviderError {}

impl core::fmt::Display for UnsupportedProviderError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "unsupported provider `{}` for source `{}`",
            self.provider, self.source_name
        )
    }
}

impl Error {
    /// Creates an unsupported provider error.
    pub fn unsupported_provider(
        provider: impl Into<String>,
        source_name: impl Into<String>,
    ) -> Error {
        Error::from(super::ErrorKind::UnsupportedProvider(
            UnsupportedProviderError {
                provider: provider.into().into(),
                source_name: source_name.into().into(),
            },
        ))
    }

    /// Returns `true` if this error is an unsupported provider error.
    pub fn is_unsupported_provider(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::UnsupportedProvider(_)))
    }
}
