use quarry_core::{
    driver::Capability,
    schema::db::{DiffItem, Migration, SchemaDiff},
};

use crate::{stmt::Statement, Serializer};

/// Turns a schema diff into DDL statements for one engine.
pub struct MigrationStatement {
    statement: Statement,
}

impl MigrationStatement {
    /// Statements applying `schema_diff`, in order.
    ///
    /// Items the engine cannot express are skipped with a warning: foreign
    /// keys on existing tables where constraints cannot be added, and
    /// dropped columns where columns cannot be dropped.
    pub fn from_diff(schema_diff: &SchemaDiff, capability: &Capability) -> Vec<Self> {
        let mut result = Vec::new();

        for item in schema_diff.items() {
            let statement = match item {
                DiffItem::CreateTable(table) => Statement::create_table(table),
                DiffItem::CreateIndex(index) => Statement::create_index(index),
                DiffItem::AddColumn { table, column } => Statement::add_column(table, column),
                DiffItem::AddForeignKey { table, foreign_key } => {
                    if !capability.add_foreign_key {
                        tracing::warn!(
                            table = %table,
                            foreign_key = %foreign_key.name,
                            "engine cannot add foreign keys to existing tables; skipping"
                        );
                        continue;
                    }
                    Statement::add_foreign_key(table, foreign_key)
                }
                DiffItem::DropColumn { table, column } => {
                    if !capability.drop_column {
                        tracing::warn!(
                            table = %table,
                            column = %column,
                            "engine cannot drop columns; skipping"
                        );
                        continue;
                    }
                    Statement::drop_column(table, column)
                }
                DiffItem::DropTable(table) => Statement::drop_table(table),
            };

            result.push(MigrationStatement { statement });
        }

        result
    }

    pub fn statement(&self) -> &Statement {
        &self.statement
    }
}

/// Serializes the statements applying `schema_diff` for the engine
/// described by `capability`.
pub fn migration(schema_diff: &SchemaDiff, capability: &Capability) -> Migration {
    let serializer = Serializer::new(capability.flavor);

    Migration::new(
        MigrationStatement::from_diff(schema_diff, capability)
            .iter()
            .map(|ms| serializer.serialize(ms.statement()))
            .collect(),
    )
}
