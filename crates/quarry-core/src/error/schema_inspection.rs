use super::Error;

/// Error when the live schema of a source cannot be read.
///
/// This occurs when the source cannot be reached, the database does not
/// exist and may not be created, or the introspection queries fail.
#[derive(Debug)]
pub(super) struct SchemaInspectionError {
    source_name: Box<str>,
    pub(super) cause: Option<Error>,
}

impl std::error::Error for SchemaInspectionError {}

impl core::fmt::Display for SchemaInspectionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "failed to inspect source `{}`", self.source_name)?;
        if let Some(cause) = &self.cause {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl Error {
    /// Creates a schema inspection error for the named source.
    pub fn schema_inspection(source_name: impl Into<String>, cause: Option<Error>) -> Error {
        Error::from(super::ErrorKind::SchemaInspection(SchemaInspectionError {
            source_name: source_name.into().into(),
            cause,
        }))
    }

    /// Returns `true` if this error is a schema inspection error.
    pub fn is_schema_inspection(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::SchemaInspection(_)))
    }
}
