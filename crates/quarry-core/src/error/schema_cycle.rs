use super::Error;

/// Error when foreign keys between mapped tables form a cycle.
///
/// Tables are created base-first, so a cycle between two or more mapped
/// classes cannot be ordered. Self references are not cycles.
#[derive(Debug)]
pub(super) struct SchemaCycleError {
    tables: Vec<String>,
}

impl std::error::Error for SchemaCycleError {}

impl core::fmt::Display for SchemaCycleError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(
            f,
            "foreign keys form a cycle between tables: {}",
            self.tables.join(", ")
        )
    }
}

impl Error {
    /// Creates a schema cycle error naming the tables on the cycle.
    pub fn schema_cycle(tables: Vec<String>) -> Error {
        Error::from(super::ErrorKind::SchemaCycle(SchemaCycleError { tables }))
    }

    /// Returns `true` if this error is a schema cycle error.
    pub fn is_schema_cycle(&self) -> bool {
        self.any(|kind| matches!(kind, super::ErrorKind::SchemaCycle(_)))
    }
}
