mod column;
pub use column::Column;

mod diff;
pub use diff::{DiffItem, SchemaDiff};

mod foreign_key;
pub use foreign_key::ForeignKey;

mod index;
pub use index::Index;

mod migration;
pub use migration::Migration;

#[allow(clippy::module_inception)]
mod schema;
pub use schema::Schema;

mod table;
pub use table::Table;
pub(crate) use table::sort_by_dependencies;

mod ty;
pub use ty::Type;
