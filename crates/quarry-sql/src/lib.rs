mod bind;
pub use bind::{bind, BoundCommand, TypedValue};

mod command_builder;
pub use command_builder::CommandBuilder;

pub mod migration;
pub use migration::MigrationStatement;

pub mod serializer;
pub use serializer::Serializer;

pub mod stmt;
pub use stmt::Statement;

pub use quarry_core::driver::Flavor;
