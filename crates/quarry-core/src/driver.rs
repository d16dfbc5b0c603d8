mod capability;
pub use capability::{Capability, Flavor, IdentityReturn, StorageTypes};

mod response;
pub use response::{Response, Rows};

pub mod operation;
pub use operation::Operation;

use crate::{
    async_trait,
    schema::db::{Migration, Schema, SchemaDiff},
    source::SourceInfo,
};

use std::fmt::Debug;

/// A database engine: connects to its sources and speaks its DDL dialect.
///
/// Drivers are shared between every source of their provider name and must
/// not keep per-source state other than connection caches.
#[async_trait]
pub trait Driver: Debug + Send + Sync + 'static {
    /// Provider name sources select this driver by. Matched exactly.
    fn name(&self) -> &str;

    /// Describes the engine's dialect and supported features.
    fn capability(&self) -> &'static Capability;

    /// Opens a connection to `source`.
    async fn connect(&self, source: &SourceInfo) -> crate::Result<Box<dyn Connection>>;

    /// Returns `true` if the database named by the source's connection
    /// string exists.
    async fn source_exists(&self, source: &SourceInfo) -> crate::Result<bool>;

    /// Creates the database named by the source's connection string.
    async fn create_source(&self, source: &SourceInfo) -> crate::Result<()>;

    /// Renders the DDL statements applying `diff`, in order.
    fn generate_migration(&self, diff: &SchemaDiff) -> Migration;
}

/// An open connection.
#[async_trait]
pub trait Connection: Send + 'static {
    /// Execute a database operation.
    async fn exec(&mut self, op: Operation) -> crate::Result<Response>;

    /// Reads the tables, columns, and indices that currently exist.
    async fn inspect(&mut self) -> crate::Result<Schema>;
}
