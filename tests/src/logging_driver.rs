use quarry::driver::{Capability, Connection, Driver, Operation, Response};
use quarry_core::{
    async_trait, err,
    schema::db::{Migration, Schema, SchemaDiff},
    Result, SourceInfo,
};

use std::sync::{Arc, Mutex};

/// Wraps a driver and logs every operation its connections execute.
#[derive(Debug)]
pub struct LoggingDriver {
    inner: Box<dyn Driver>,

    /// Shared with every connection opened through this driver
    ops_log: Arc<Mutex<Vec<DriverOp>>>,

    /// The next DDL statement containing this text fails
    fail_ddl: Arc<Mutex<Option<String>>>,
}

impl LoggingDriver {
    pub fn new(driver: impl Driver) -> Self {
        Self {
            inner: Box::new(driver),
            ops_log: Arc::new(Mutex::new(Vec::new())),
            fail_ddl: Arc::new(Mutex::new(None)),
        }
    }

    /// Makes the next DDL statement containing `text` fail without reaching
    /// the database.
    pub fn fail_ddl_containing(self, text: impl Into<String>) -> Self {
        *self.fail_ddl.lock().expect("Failed to acquire fault lock") = Some(text.into());
        self
    }

    /// Get a handle to access the operations log
    pub fn ops_log_handle(&self) -> Arc<Mutex<Vec<DriverOp>>> {
        self.ops_log.clone()
    }

    pub fn exec_log(&self) -> crate::ExecLog {
        crate::ExecLog::new(self.ops_log_handle())
    }
}

#[async_trait]
impl Driver for LoggingDriver {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn capability(&self) -> &'static Capability {
        self.inner.capability()
    }

    async fn connect(&self, source: &SourceInfo) -> Result<Box<dyn Connection>> {
        Ok(Box::new(LoggingConnection {
            inner: self.inner.connect(source).await?,
            ops_log: self.ops_log_handle(),
            fail_ddl: self.fail_ddl.clone(),
        }))
    }

    async fn source_exists(&self, source: &SourceInfo) -> Result<bool> {
        self.inner.source_exists(source).await
    }

    async fn create_source(&self, source: &SourceInfo) -> Result<()> {
        self.inner.create_source(source).await
    }

    fn generate_migration(&self, diff: &SchemaDiff) -> Migration {
        self.inner.generate_migration(diff)
    }
}

#[derive(Debug)]
pub struct DriverOp {
    pub operation: Operation,

    /// `None` when the operation failed
    pub rows: Option<usize>,
}

struct LoggingConnection {
    inner: Box<dyn Connection>,
    ops_log: Arc<Mutex<Vec<DriverOp>>>,
    fail_ddl: Arc<Mutex<Option<String>>>,
}

impl LoggingConnection {
    fn log(&self, op: DriverOp) {
        self.ops_log
            .lock()
            .expect("Failed to acquire ops log lock")
            .push(op);
    }

    /// Takes the pending DDL fault if `operation` matches it.
    fn take_fault(&self, operation: &Operation) -> bool {
        let Operation::Ddl(sql) = operation else {
            return false;
        };

        let mut fail_ddl = self.fail_ddl.lock().expect("Failed to acquire fault lock");
        match fail_ddl.as_deref() {
            Some(text) if sql.contains(text) => {
                *fail_ddl = None;
                true
            }
            _ => false,
        }
    }
}

#[async_trait]
impl Connection for LoggingConnection {
    async fn exec(&mut self, operation: Operation) -> Result<Response> {
        if self.take_fault(&operation) {
            let err = err!("failed to apply {:?}", operation);
            self.log(DriverOp {
                operation,
                rows: None,
            });
            return Err(err);
        }

        let logged = operation.clone();
        let response = self.inner.exec(operation).await;

        let rows = response.as_ref().ok().map(|response| match &response.rows {
            quarry::driver::Rows::Count(count) => *count as usize,
            quarry::driver::Rows::Values(rows) => rows.len(),
        });

        self.log(DriverOp {
            operation: logged,
            rows,
        });

        response
    }

    async fn inspect(&mut self) -> Result<Schema> {
        self.inner.inspect().await
    }
}
