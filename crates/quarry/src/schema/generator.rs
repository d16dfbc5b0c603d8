use crate::{
    driver::Operation,
    schema::{db, Builder},
    Error, MappingRegistry, QueryProvider, Result, SourceInfo,
};

use quarry_core::{driver::Connection, schema::db::SchemaDiff};
use std::sync::Arc;

/// Progress of a [`Generator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Nothing has been read from the source yet.
    Unchecked,

    /// Reading the live schema.
    Inspecting,

    /// Comparing the live schema with the mapped classes.
    Diffing,

    /// Executing DDL.
    Applying,

    /// The live schema holds everything the mappings need.
    InSync,
}

/// Outcome of [`Generator::sync`].
#[derive(Debug, Clone, PartialEq)]
pub struct SyncReport {
    /// Name of the synchronized source.
    pub source: String,

    /// DDL statements executed, in order.
    pub statements: Vec<String>,
}

impl SyncReport {
    fn new(source: &SourceInfo) -> SyncReport {
        SyncReport {
            source: source.name.clone(),
            statements: vec![],
        }
    }

    /// `true` when the source was already in sync.
    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }
}

/// Brings the schema of one source in line with the classes mapped on it.
///
/// Missing tables, columns, indices and foreign keys are created in
/// dependency order. Unmapped columns and tables are only dropped when the
/// generator is destructive.
#[derive(Debug)]
pub struct Generator<'a> {
    provider: &'a QueryProvider,
    source: Arc<SourceInfo>,
    mappings: &'a MappingRegistry,
    destructive: bool,
    create_sources: bool,
    state: State,
}

impl<'a> Generator<'a> {
    pub(crate) fn new(
        provider: &'a QueryProvider,
        source: Arc<SourceInfo>,
        mappings: &'a MappingRegistry,
    ) -> Generator<'a> {
        Generator {
            provider,
            source,
            mappings,
            destructive: false,
            create_sources: false,
            state: State::Unchecked,
        }
    }

    /// Also drop columns and tables no mapping accounts for.
    pub fn destructive(mut self, destructive: bool) -> Self {
        self.destructive = destructive;
        self
    }

    /// Create the database when it does not exist instead of failing.
    pub fn create_sources(mut self, create_sources: bool) -> Self {
        self.create_sources = create_sources;
        self
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    /// Returns `true` if the source's database exists.
    pub async fn source_exists(&self) -> Result<bool> {
        self.provider.driver().source_exists(&self.source).await
    }

    /// Returns `true` if the live schema has a table named `table`,
    /// ignoring ASCII case.
    pub async fn table_exists(&mut self, table: &str) -> Result<bool> {
        let mut connection = self.connect().await?;
        let live = self.inspect(&mut *connection).await?;
        Ok(live.contains_table(table))
    }

    /// The schema the mappings need on this source.
    pub fn desired(&self) -> Result<db::Schema> {
        Builder::new(self.mappings, self.provider.capability()).build(&self.source.name)
    }

    /// Changes needed to bring the live schema in line with the mappings.
    pub async fn diff(&mut self) -> Result<SchemaDiff> {
        let mut connection = self.connect().await?;
        self.diff_with(&mut *connection).await
    }

    /// Applies every missing change and returns the statements executed.
    ///
    /// Running it again on a synchronized source only inspects. When a
    /// statement fails, the statements before it stay applied.
    pub async fn sync(&mut self) -> Result<SyncReport> {
        let mut connection = self.connect().await?;

        let diff = self.diff_with(&mut *connection).await?;
        if diff.is_empty() {
            self.state = State::InSync;
            return Ok(SyncReport::new(&self.source));
        }

        let _gate = self.provider.lock_schema(&self.source.name).await;

        // Another generator may have applied the same changes while this
        // one waited on the gate.
        let diff = self.diff_with(&mut *connection).await?;

        if diff.is_empty() {
            tracing::debug!(source = %self.source.name, "schema applied concurrently");
            self.state = State::InSync;
            return Ok(SyncReport::new(&self.source));
        }

        self.state = State::Applying;
        let migration = self.provider.driver().generate_migration(&diff);
        let mut report = SyncReport::new(&self.source);

        for statement in migration {
            tracing::info!(source = %self.source.name, sql = %statement, "applying schema change");

            connection
                .exec(Operation::Ddl(statement.clone()))
                .await
                .map_err(|err| {
                    err.context(format!(
                        "synchronizing source `{}` after {} statements",
                        self.source.name,
                        report.statements.len()
                    ))
                })?;

            report.statements.push(statement);
        }

        self.state = State::InSync;
        Ok(report)
    }

    /// Connects to the source, creating its database first when allowed.
    async fn connect(&mut self) -> Result<Box<dyn Connection>> {
        self.state = State::Inspecting;
        let driver = self.provider.driver();

        let exists = driver
            .source_exists(&self.source)
            .await
            .map_err(|err| Error::schema_inspection(&self.source.name, Some(err)))?;

        if !exists {
            if !self.create_sources {
                return Err(Error::schema_inspection(
                    &self.source.name,
                    Some(crate::err!("database does not exist")),
                ));
            }

            let _gate = self.provider.lock_schema(&self.source.name).await;

            if driver.source_exists(&self.source).await? {
                tracing::debug!(source = %self.source.name, "database created concurrently");
            } else {
                tracing::info!(source = %self.source.name, "creating missing database");
                driver.create_source(&self.source).await?;
            }
        }

        driver
            .connect(&self.source)
            .await
            .map_err(|err| Error::schema_inspection(&self.source.name, Some(err)))
    }

    async fn inspect(&mut self, connection: &mut dyn Connection) -> Result<db::Schema> {
        self.state = State::Inspecting;

        connection
            .inspect()
            .await
            .map_err(|err| Error::schema_inspection(&self.source.name, Some(err)))
    }

    async fn diff_with(&mut self, connection: &mut dyn Connection) -> Result<SchemaDiff> {
        let live = self.inspect(connection).await?;

        self.state = State::Diffing;
        let desired = self.desired()?;
        let diff = SchemaDiff::new(&live, &desired, self.destructive);

        tracing::debug!(
            source = %self.source.name,
            changes = diff.len(),
            "compared live schema with mappings"
        );
        Ok(diff)
    }
}
