use super::{Db, Shared};
use crate::{
    config::{Config, SchemaSettings},
    driver::{self, Driver},
    Error, MappingDefinition, MappingRegistry, QueryProvider, Result, SourceInfo, SourceRegistry,
};

use indexmap::IndexMap;
use std::sync::Arc;

/// Collects mappings, sources and providers, then checks them together in
/// [`build`](Builder::build).
#[derive(Debug, Default)]
pub struct Builder {
    mappings: MappingRegistry,
    sources: Vec<SourceInfo>,
    providers: Vec<QueryProvider>,
    settings: SchemaSettings,
}

impl Builder {
    /// Registers the mapping of one class. A class can only be registered
    /// once.
    pub fn register(&mut self, mapping: MappingDefinition) -> Result<&mut Self> {
        self.mappings.register(mapping)?;
        Ok(self)
    }

    pub fn source(&mut self, source: SourceInfo) -> &mut Self {
        self.sources.push(source);
        self
    }

    /// Registers a provider under its [`Driver::name`].
    ///
    /// Built-in providers enabled by crate features are registered by
    /// `build` unless a provider of the same name was registered here.
    pub fn provider(&mut self, driver: impl Driver) -> &mut Self {
        self.providers.push(QueryProvider::new(driver));
        self
    }

    /// Registers an existing provider. `Db`s built with clones of one
    /// provider share its driver and apply schema changes to a source one
    /// at a time.
    pub fn query_provider(&mut self, provider: QueryProvider) -> &mut Self {
        self.providers.push(provider);
        self
    }

    /// Adds the configured sources and takes the configured schema
    /// settings.
    pub fn config(&mut self, config: Config) -> &mut Self {
        self.sources.extend(config.sources);
        self.settings = config.schema;
        self
    }

    /// Synchronize every source when the `Db` is built.
    pub fn sync_on_build(&mut self, sync: bool) -> &mut Self {
        self.settings.sync_on_build = sync;
        self
    }

    /// Let schema synchronization drop unmapped columns and tables.
    pub fn destructive(&mut self, destructive: bool) -> &mut Self {
        self.settings.destructive = destructive;
        self
    }

    /// Let schema synchronization create missing databases.
    pub fn create_sources(&mut self, create_sources: bool) -> &mut Self {
        self.settings.create_sources = create_sources;
        self
    }

    /// Checks the configuration and builds the `Db`.
    ///
    /// Fails when two providers share a name, a source names a provider
    /// that is not registered, or a relation targets an unmapped class.
    pub async fn build(&mut self) -> Result<Db> {
        let config = Config {
            sources: std::mem::take(&mut self.sources),
            schema: self.settings,
        };
        config.validate()?;

        let providers = self.providers()?;

        let mut sources = SourceRegistry::new();
        for source in config.sources {
            if !providers.contains_key(&source.provider) {
                return Err(Error::unsupported_provider(&source.provider, &source.name));
            }
            sources.register(source);
        }

        let mut mappings = std::mem::take(&mut self.mappings);
        mappings.verify()?;

        tracing::debug!(
            mappings = mappings.len(),
            sources = sources.names().len(),
            providers = providers.len(),
            "built db"
        );

        let db = Db {
            shared: Arc::new(Shared {
                mappings,
                sources,
                providers,
                settings: self.settings,
            }),
        };

        if self.settings.sync_on_build {
            db.sync().await?;
        }

        Ok(db)
    }

    fn providers(&mut self) -> Result<IndexMap<String, QueryProvider>> {
        let mut providers = IndexMap::new();

        for provider in std::mem::take(&mut self.providers) {
            let name = provider.name().to_string();
            if providers.contains_key(&name) {
                return Err(Error::invalid_configuration(format!(
                    "provider `{name}` is registered twice"
                )));
            }
            providers.insert(name, provider);
        }

        for driver in driver::builtin() {
            if !providers.contains_key(driver.name()) {
                let provider = QueryProvider::from(driver);
                providers.insert(provider.name().to_string(), provider);
            }
        }

        Ok(providers)
    }
}
