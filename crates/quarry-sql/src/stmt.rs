mod add_column;
pub use add_column::AddColumn;

mod add_foreign_key;
pub use add_foreign_key::AddForeignKey;

mod column_def;
pub use column_def::ColumnDef;

mod create_index;
pub use create_index::CreateIndex;

mod create_table;
pub use create_table::CreateTable;

mod drop_column;
pub use drop_column::DropColumn;

mod drop_table;
pub use drop_table::DropTable;

/// A DDL statement.
#[derive(Debug, Clone)]
pub enum Statement {
    AddColumn(AddColumn),
    AddForeignKey(AddForeignKey),
    CreateIndex(CreateIndex),
    CreateTable(CreateTable),
    DropColumn(DropColumn),
    DropTable(DropTable),
}
