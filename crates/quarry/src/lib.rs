mod batch;
pub use batch::{Batch, Results, RowSet};

pub mod config;
pub use config::Config;

pub mod db;
pub use db::Db;

pub mod driver;

mod provider;
pub use provider::QueryProvider;

pub mod schema;

pub use quarry_core::{
    err,
    mapping::{self, MappingDefinition, MappingRegistry, PropertyMapping},
    source::{self, Access, SourceInfo, SourceRegistry},
    stmt::{self, Command, CommandKind, Parameter, Record, Row, Type, Value},
    Error, Result,
};
