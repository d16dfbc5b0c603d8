use crate::{
    driver::{Capability, Driver},
    schema::{Generator, SyncGates},
    Batch, MappingRegistry, SourceInfo,
};

use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

/// A database engine strategy: the entry point for running batches and
/// synchronizing schemas against the sources of one provider name.
///
/// Cloning is cheap; clones share the driver, its connection caches and the
/// schema gates. Every generator handed out by a provider or its clones
/// applies DDL to a given source name one at a time.
#[derive(Debug, Clone)]
pub struct QueryProvider {
    driver: Arc<dyn Driver>,
    gates: SyncGates,
}

impl QueryProvider {
    pub fn new(driver: impl Driver) -> QueryProvider {
        QueryProvider {
            driver: Arc::new(driver),
            gates: SyncGates::default(),
        }
    }

    /// The provider name sources select this provider by.
    pub fn name(&self) -> &str {
        self.driver.name()
    }

    pub fn capability(&self) -> &'static Capability {
        self.driver.capability()
    }

    pub fn driver(&self) -> &dyn Driver {
        &*self.driver
    }

    /// Starts an empty batch against `source`. No connection is opened
    /// until the batch is executed.
    pub fn batch(&self, source: Arc<SourceInfo>) -> Batch {
        Batch::new(self.driver.clone(), source)
    }

    /// A schema generator synchronizing `source` with the classes of
    /// `mappings` mapped on it.
    pub fn generator<'a>(
        &'a self,
        source: Arc<SourceInfo>,
        mappings: &'a MappingRegistry,
    ) -> Generator<'a> {
        Generator::new(self, source, mappings)
    }

    /// Waits for exclusive schema access to the source named `source`.
    pub(crate) async fn lock_schema(&self, source: &str) -> OwnedMutexGuard<()> {
        self.gates.get(source).await.lock_owned().await
    }
}

impl From<Box<dyn Driver>> for QueryProvider {
    fn from(driver: Box<dyn Driver>) -> Self {
        QueryProvider {
            driver: Arc::from(driver),
            gates: SyncGates::default(),
        }
    }
}
