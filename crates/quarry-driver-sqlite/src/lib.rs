mod inspect;

mod value;
pub(crate) use value::Value;

use quarry_core::{
    async_trait,
    driver::{
        operation::{Operation, Transaction},
        Capability, Driver, Flavor, Response,
    },
    schema::db::{Migration, Schema, SchemaDiff},
    stmt::Row,
    Error, Result, SourceInfo,
};
use quarry_sql as sql;
use rusqlite::Connection as RusqliteConnection;
use std::{
    collections::HashMap,
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::{Mutex, OwnedMutexGuard};
use url::Url;

/// Provider name sources use to select this driver.
pub const PROVIDER: &str = "sqlite";

/// SQLite driver.
///
/// Connection strings are `sqlite::memory:` for an in-memory database or
/// `sqlite:<path>` for a file. Every connection to the same in-memory
/// connection string shares one database, which lives as long as the
/// driver. A connection to it holds the database until dropped, so batches
/// on it run one after the other.
#[derive(Debug, Default)]
pub struct Sqlite {
    name: Option<String>,
    memory: Mutex<HashMap<String, Arc<Mutex<RusqliteConnection>>>>,
}

#[derive(Debug, PartialEq)]
enum Location {
    InMemory,
    File(PathBuf),
}

impl Sqlite {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the driver under a provider name other than `sqlite`.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }
}

fn location(connection: &str) -> Result<Location> {
    let url = Url::parse(connection)?;

    if url.scheme() != "sqlite" {
        return Err(Error::invalid_connection_url(format!(
            "connection URL does not have a `sqlite` scheme; url={connection}"
        )));
    }

    if url.path() == ":memory:" {
        return Ok(Location::InMemory);
    }

    let path = match url.host_str() {
        Some(host) => format!("{host}{}", url.path()),
        None => url.path().to_string(),
    };

    if path.is_empty() {
        return Err(Error::invalid_connection_url(format!(
            "missing database path in connection URL; url={connection}"
        )));
    }

    Ok(Location::File(PathBuf::from(path)))
}

fn open(path: &Path) -> Result<RusqliteConnection> {
    let connection = RusqliteConnection::open(path).map_err(Error::driver_operation_failed)?;
    enable_foreign_keys(&connection)?;
    Ok(connection)
}

fn enable_foreign_keys(connection: &RusqliteConnection) -> Result<()> {
    connection
        .execute_batch("PRAGMA foreign_keys = ON")
        .map_err(Error::driver_operation_failed)
}

#[async_trait]
impl Driver for Sqlite {
    fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(PROVIDER)
    }

    fn capability(&self) -> &'static Capability {
        &Capability::SQLITE
    }

    async fn connect(&self, source: &SourceInfo) -> Result<Box<dyn quarry_core::Connection>> {
        let connection = match location(&source.connection)? {
            Location::File(path) => Arc::new(Mutex::new(open(&path)?)),
            Location::InMemory => {
                let mut memory = self.memory.lock().await;
                match memory.get(&source.connection) {
                    Some(connection) => connection.clone(),
                    None => {
                        let connection = RusqliteConnection::open_in_memory()
                            .map_err(Error::driver_operation_failed)?;
                        enable_foreign_keys(&connection)?;

                        let connection = Arc::new(Mutex::new(connection));
                        memory.insert(source.connection.clone(), connection.clone());
                        connection
                    }
                }
            }
        };

        let connection = connection.lock_owned().await;

        tracing::debug!(source = %source.name, "connected to sqlite");
        Ok(Box::new(Connection { connection }))
    }

    async fn source_exists(&self, source: &SourceInfo) -> Result<bool> {
        Ok(match location(&source.connection)? {
            Location::InMemory => true,
            Location::File(path) => path.exists(),
        })
    }

    async fn create_source(&self, source: &SourceInfo) -> Result<()> {
        if let Location::File(path) = location(&source.connection)? {
            tracing::info!(path = %path.display(), "creating sqlite database");
            open(&path)?;
        }

        Ok(())
    }

    fn generate_migration(&self, diff: &SchemaDiff) -> Migration {
        sql::migration::migration(diff, &Capability::SQLITE)
    }
}

#[derive(Debug)]
pub struct Connection {
    connection: OwnedMutexGuard<RusqliteConnection>,
}

#[async_trait]
impl quarry_core::driver::Connection for Connection {
    async fn exec(&mut self, op: Operation) -> Result<Response> {
        let connection = &*self.connection;

        let command = match op {
            Operation::Command(command) => command,
            Operation::Transaction(transaction) => {
                connection
                    .execute_batch(transaction.sql(Flavor::Sqlite))
                    .map_err(Error::driver_operation_failed)?;

                // Cached statements must not outlive a rolled back schema change
                if transaction == Transaction::Rollback {
                    connection.flush_prepared_statement_cache();
                }
                return Ok(Response::empty());
            }
            Operation::Ddl(ddl) => {
                tracing::debug!(sql = %ddl, "applying ddl");
                connection
                    .execute_batch(&ddl)
                    .map_err(Error::driver_operation_failed)?;
                connection.flush_prepared_statement_cache();
                return Ok(Response::empty());
            }
        };

        let bound = sql::bind(&command, Flavor::Sqlite)?;
        tracing::debug!(sql = %bound.sql, params = bound.params.len(), "executing command");

        let params = bound
            .params
            .into_iter()
            .map(|tv| Value::from(tv.value))
            .collect::<Vec<_>>();

        let mut stmt = connection
            .prepare_cached(&bound.sql)
            .map_err(Error::driver_operation_failed)?;

        if stmt.column_count() == 0 {
            let count = stmt
                .execute(rusqlite::params_from_iter(params.iter()))
                .map_err(Error::driver_operation_failed)?;

            return Ok(Response::count(count as u64));
        }

        let columns: Arc<[String]> = stmt
            .column_names()
            .into_iter()
            .map(String::from)
            .collect();

        let mut rows = stmt
            .query(rusqlite::params_from_iter(params.iter()))
            .map_err(Error::driver_operation_failed)?;

        let mut ret = vec![];

        while let Some(row) = rows.next().map_err(Error::driver_operation_failed)? {
            let mut values = Vec::with_capacity(columns.len());

            for index in 0..columns.len() {
                values.push(Value::from_sql(row, index)?.into_inner());
            }

            ret.push(Row::new(columns.clone(), values));
        }

        Ok(Response::rows(ret))
    }

    async fn inspect(&mut self) -> Result<Schema> {
        inspect::schema(&self.connection)
    }
}
