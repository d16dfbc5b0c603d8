mod builder;
pub use builder::Builder;

use crate::{
    config::SchemaSettings,
    schema::{Generator, SyncReport},
    Access, Batch, Command, Error, MappingDefinition, MappingRegistry, Parameter, QueryProvider,
    Record, Result, SourceInfo, SourceRegistry, Value,
};

use indexmap::IndexMap;
use quarry_sql::CommandBuilder;
use std::sync::Arc;

/// Mappings, sources and providers of an application.
///
/// Cloning is cheap; clones share everything, including the providers'
/// schema gates.
#[derive(Debug, Clone)]
pub struct Db {
    shared: Arc<Shared>,
}

#[derive(Debug)]
struct Shared {
    mappings: MappingRegistry,
    sources: SourceRegistry,

    /// Providers keyed by their exact name
    providers: IndexMap<String, QueryProvider>,

    settings: SchemaSettings,
}

/// Where the commands of one class go.
struct Target<'a> {
    mappings: &'a MappingRegistry,
    mapping: &'a Arc<MappingDefinition>,
    source: Arc<SourceInfo>,
    provider: &'a QueryProvider,
}

impl Db {
    pub fn builder() -> Builder {
        Builder::default()
    }

    pub fn mappings(&self) -> &MappingRegistry {
        &self.shared.mappings
    }

    pub fn sources(&self) -> &SourceRegistry {
        &self.shared.sources
    }

    /// The provider registered under exactly `name`.
    pub fn provider(&self, name: &str) -> Option<&QueryProvider> {
        self.shared.providers.get(name)
    }

    fn provider_for(&self, source: &SourceInfo) -> Result<&QueryProvider> {
        self.provider(&source.provider)
            .ok_or_else(|| Error::unsupported_provider(&source.provider, &source.name))
    }

    /// Starts a batch on the preferred source named `source`.
    pub fn batch(&self, source: &str, access: Access) -> Result<Batch> {
        let source = self.resolve(source, access)?;
        Ok(self.provider_for(&source)?.batch(source))
    }

    /// A schema generator for `source`, using this `Db`'s schema settings.
    pub fn generator(&self, source: Arc<SourceInfo>) -> Result<Generator<'_>> {
        let provider = self.provider_for(&source)?;

        Ok(provider
            .generator(source, &self.shared.mappings)
            .destructive(self.shared.settings.destructive)
            .create_sources(self.shared.settings.create_sources))
    }

    /// Synchronizes the schema of every source, through the preferred
    /// writable entry of each source name.
    pub async fn sync(&self) -> Result<Vec<SyncReport>> {
        let mut reports = vec![];

        for name in self.shared.sources.names() {
            reports.push(self.sync_source(name).await?);
        }

        Ok(reports)
    }

    /// Synchronizes the schema of the source named `name`.
    pub async fn sync_source(&self, name: &str) -> Result<SyncReport> {
        let source = self.resolve(name, Access::Write)?;
        self.generator(source)?.sync().await
    }

    /// Every record of `class`.
    pub async fn all(&self, class: &str) -> Result<Vec<Record>> {
        let target = self.target(class, Access::Read)?;
        let command = target.commands().select_all(target.mapping);
        target.query(command).await
    }

    /// The record of `class` whose identity is `id`.
    pub async fn get(&self, class: &str, id: impl Into<Value>) -> Result<Option<Record>> {
        let target = self.target(class, Access::Read)?;
        let command = target.commands().select_by_id(target.mapping, id);
        Ok(target.query(command).await?.into_iter().next())
    }

    /// Records of `class` matching `filter`. Leaf parameter names are
    /// property names.
    pub async fn find(&self, class: &str, filter: Parameter) -> Result<Vec<Record>> {
        let target = self.target(class, Access::Read)?;
        let command = target.commands().select_where(target.mapping, filter);
        target.query(command).await
    }

    /// Number of records of `class`, optionally matching `filter`.
    pub async fn count(&self, class: &str, filter: Option<Parameter>) -> Result<u64> {
        let target = self.target(class, Access::Read)?;
        let command = target.commands().count(target.mapping, filter);

        let mut batch = target.batch();
        batch.push(command);
        let results = batch.execute().await?;

        let count = results[0]
            .first()
            .and_then(|row| row.get_index(0))
            .map(Value::to_i64)
            .transpose()?
            .unwrap_or_default();

        Ok(count.max(0) as u64)
    }

    /// Inserts `record`. A generated identity is written back into it.
    pub async fn insert(&self, record: &mut Record) -> Result<()> {
        let target = self.target(record.class(), Access::Write)?;
        let identity = target.mapping.identity();

        let mut batch = target.batch();
        for command in target.commands().insert(target.mapping, record) {
            batch.push(command);
        }

        let results = batch.execute().await?;

        let generated = results
            .last()
            .and_then(|rows| rows.first())
            .and_then(|row| row.get(identity.column_name()).or_else(|| row.get_index(0)));

        if let Some(id) = generated {
            record.set(identity.property(), id.clone().cast(identity.ty())?);
        }

        Ok(())
    }

    /// Writes the writable properties of `record` to its row. Returns the
    /// number of rows matched.
    pub async fn update(&self, record: &Record) -> Result<u64> {
        let target = self.target(record.class(), Access::Write)?;

        let Some(command) = target.commands().update(target.mapping, record)? else {
            return Ok(0);
        };

        target.execute([command], false).await
    }

    /// Inserts `record` when it has no identity or its row does not exist,
    /// updates it otherwise.
    pub async fn save(&self, record: &mut Record) -> Result<()> {
        let mapping = self.shared.mappings.mapping(record.class())?;
        let id = record.value(mapping.identity().property()).clone();

        if id.is_null() {
            return self.insert(record).await;
        }

        if self.update(record).await? == 0 && self.get(record.class(), id).await?.is_none() {
            self.insert(record).await?;
        }

        Ok(())
    }

    /// Deletes the record of `class` whose identity is `id`, along with its
    /// join rows and the records cascading from it. Returns the number of
    /// rows of `class` deleted.
    pub async fn delete(&self, class: &str, id: impl Into<Value>) -> Result<u64> {
        let target = self.target(class, Access::Write)?;
        let commands = target.commands().delete(target.mapping, id)?;
        target.execute(commands, true).await
    }

    /// Relates `owner` to `related` through the many-to-many `property` of
    /// `class`.
    pub async fn link(
        &self,
        class: &str,
        property: &str,
        owner: impl Into<Value>,
        related: impl Into<Value>,
    ) -> Result<()> {
        let target = self.target(class, Access::Write)?;
        let command = target
            .commands()
            .link(target.mapping, property, owner, related)?;
        target.execute([command], false).await?;
        Ok(())
    }

    /// Removes the relation between `owner` and `related`. Returns `true` if
    /// they were related.
    pub async fn unlink(
        &self,
        class: &str,
        property: &str,
        owner: impl Into<Value>,
        related: impl Into<Value>,
    ) -> Result<bool> {
        let target = self.target(class, Access::Write)?;
        let command = target
            .commands()
            .unlink(target.mapping, property, owner, related)?;
        Ok(target.execute([command], false).await? > 0)
    }

    fn resolve(&self, source: &str, access: Access) -> Result<Arc<SourceInfo>> {
        let mut sources = self
            .shared
            .sources
            .resolve_named(Some(source), source, access)?;
        Ok(sources.swap_remove(0))
    }

    fn target(&self, class: &str, access: Access) -> Result<Target<'_>> {
        let mapping = self.shared.mappings.mapping(class)?;
        let source = self.shared.sources.first(mapping, access)?;
        let provider = self.provider_for(&source)?;

        Ok(Target {
            mappings: &self.shared.mappings,
            mapping,
            source,
            provider,
        })
    }
}

impl Target<'_> {
    fn commands(&self) -> CommandBuilder<'_> {
        CommandBuilder::new(
            self.mappings,
            self.provider.capability(),
            &self.source.parameter_prefix,
        )
    }

    fn batch(&self) -> Batch {
        self.provider.batch(self.source.clone())
    }

    /// Runs one query and hydrates its rows.
    async fn query(&self, command: Command) -> Result<Vec<Record>> {
        let mut batch = self.batch();
        batch.push(command);

        let results = batch.execute().await?;
        results[0]
            .iter()
            .map(|row| self.mapping.hydrate(row))
            .collect()
    }

    /// Runs `commands` and returns the rows affected by the last one.
    async fn execute(
        &self,
        commands: impl IntoIterator<Item = Command>,
        transaction: bool,
    ) -> Result<u64> {
        let mut batch = self.batch();
        for command in commands {
            batch.push(command);
        }
        if transaction {
            batch.in_transaction();
        }

        let results = batch.execute().await?;
        Ok(results.last().map(|rows| rows.affected()).unwrap_or_default())
    }
}
