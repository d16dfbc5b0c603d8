pub mod driver;
pub use driver::{Connection, Driver};

mod error;
pub use error::{Error, IntoError};

pub mod mapping;
pub use mapping::{MappingDefinition, MappingRegistry};

pub mod schema;

pub mod source;
pub use source::{SourceInfo, SourceRegistry};

pub mod stmt;

/// A Result type alias that uses Quarry's [`Error`] type.
pub type Result<T> = core::result::Result<T, Error>;

pub use async_trait::async_trait;
