use super::{Column, ForeignKey, Index, Schema, Table};

use indexmap::IndexMap;

/// One change needed to bring a live schema in line with the mapped one.
#[derive(Debug, Clone, PartialEq)]
pub enum DiffItem {
    /// Create a table, including its primary and foreign keys.
    CreateTable(Table),

    CreateIndex(Index),

    /// Add a column to an existing table.
    AddColumn { table: String, column: Column },

    /// Add a foreign key to an existing table, after its column was added.
    AddForeignKey {
        table: String,
        foreign_key: ForeignKey,
    },

    DropColumn { table: String, column: String },

    DropTable(String),
}

/// Ordered changes between the `live` schema of a source and the `desired`
/// schema built from the mappings.
///
/// Tables are created in the order of `desired.tables`, which the schema
/// builder sorts so referenced tables come first. Nothing is dropped unless
/// the diff is destructive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaDiff {
    items: Vec<DiffItem>,
}

impl SchemaDiff {
    pub fn new(live: &Schema, desired: &Schema, destructive: bool) -> SchemaDiff {
        let mut items = vec![];

        for table in &desired.tables {
            let Some(existing) = live.table(&table.name) else {
                items.push(DiffItem::CreateTable(table.clone()));
                items.extend(table.indices.iter().cloned().map(DiffItem::CreateIndex));
                continue;
            };

            let added: Vec<&Column> = table
                .columns
                .iter()
                .filter(|column| !existing.has_column(&column.name))
                .collect();

            for column in &added {
                // Existing rows have no value for the new column.
                let column = Column {
                    nullable: true,
                    primary_key: false,
                    auto_increment: false,
                    ..Column::clone(column)
                };

                items.push(DiffItem::AddColumn {
                    table: existing.name.clone(),
                    column,
                });
            }

            let is_added = |name: &String| added.iter().any(|column| column.is_named(name));

            for foreign_key in &table.foreign_keys {
                if foreign_key.columns.iter().any(is_added) {
                    items.push(DiffItem::AddForeignKey {
                        table: existing.name.clone(),
                        foreign_key: foreign_key.clone(),
                    });
                }
            }

            for index in &table.indices {
                if index.columns.iter().any(is_added) {
                    items.push(DiffItem::CreateIndex(Index {
                        on: existing.name.clone(),
                        ..index.clone()
                    }));
                }
            }
        }

        if destructive {
            for existing in &live.tables {
                let Some(table) = desired.table(&existing.name) else {
                    continue;
                };

                for column in &existing.columns {
                    if !table.has_column(&column.name) {
                        items.push(DiffItem::DropColumn {
                            table: existing.name.clone(),
                            column: column.name.clone(),
                        });
                    }
                }
            }

            let mut unmapped: IndexMap<String, Table> = live
                .tables
                .iter()
                .filter(|existing| !desired.contains_table(&existing.name))
                .map(|existing| (existing.name.clone(), existing.clone()))
                .collect();

            // Tables referencing each other in a cycle go last in creation
            // order, so they are dropped first.
            let mut order = super::sort_by_dependencies(&mut unmapped);
            order.extend(unmapped.into_values());

            for table in order.iter().rev() {
                items.push(DiffItem::DropTable(table.name.clone()));
            }
        }

        SchemaDiff { items }
    }

    pub fn items(&self) -> &[DiffItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Removes the items `keep` returns false for.
    pub fn retain(&mut self, keep: impl FnMut(&DiffItem) -> bool) {
        self.items.retain(keep);
    }
}
