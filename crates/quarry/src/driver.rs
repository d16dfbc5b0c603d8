//! Driver traits and the built-in providers enabled by crate features.

pub use quarry_core::driver::*;

#[cfg(feature = "mssql")]
pub use quarry_driver_mssql::Mssql;

#[cfg(feature = "mysql")]
pub use quarry_driver_mysql::MySQL;

#[cfg(feature = "postgresql")]
pub use quarry_driver_postgresql::PostgreSQL;

#[cfg(feature = "sqlite")]
pub use quarry_driver_sqlite::Sqlite;

/// One instance of every built-in provider compiled in.
pub(crate) fn builtin() -> Vec<Box<dyn Driver>> {
    #[allow(unused_mut)]
    let mut drivers: Vec<Box<dyn Driver>> = vec![];

    #[cfg(feature = "mssql")]
    drivers.push(Box::new(Mssql::new()));

    #[cfg(feature = "mysql")]
    drivers.push(Box::new(MySQL::new()));

    #[cfg(feature = "postgresql")]
    drivers.push(Box::new(PostgreSQL::new()));

    #[cfg(feature = "sqlite")]
    drivers.push(Box::new(Sqlite::new()));

    drivers
}
