mod exec_log;
pub use exec_log::ExecLog;

mod logging_driver;
pub use logging_driver::{DriverOp, LoggingDriver};

pub mod models;

use quarry::{db::Builder, driver::Sqlite, Db, SourceInfo};

/// An in-memory SQLite source. Every `Db` gets its own database since the
/// in-memory store lives in the driver instance.
pub fn sqlite(name: &str) -> SourceInfo {
    SourceInfo::new(name, "sqlite::memory:", "sqlite")
}

/// Install a `tracing` subscriber filtered by `RUST_LOG`. Safe to call from
/// every test.
pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A `Db` test fixture that logs every operation sent to SQLite.
pub struct DbTest {
    log: ExecLog,
    builder: Builder,
}

impl DbTest {
    pub fn new() -> DbTest {
        DbTest::with_driver(LoggingDriver::new(Sqlite::new()))
    }

    /// A fixture running on `driver`, with a `Default` in-memory source.
    pub fn with_driver(driver: LoggingDriver) -> DbTest {
        init_logging();

        let log = driver.exec_log();

        let mut builder = Db::builder();
        builder.provider(driver).source(sqlite("Default"));

        DbTest { log, builder }
    }

    pub fn builder(&mut self) -> &mut Builder {
        &mut self.builder
    }

    /// Build the `Db` and synchronize its schema. Operations issued while
    /// setting up are cleared from the log.
    pub async fn setup_db(&mut self) -> Db {
        let db = self.builder.build().await.unwrap();
        db.sync().await.unwrap();
        self.log.clear();
        db
    }

    pub fn log(&self) -> &ExecLog {
        &self.log
    }
}

impl Default for DbTest {
    fn default() -> Self {
        DbTest::new()
    }
}
