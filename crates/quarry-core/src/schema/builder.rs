use super::db::{self, Column, ForeignKey, Index, Table};
use crate::{
    driver,
    mapping::{MappingDefinition, MappingRegistry},
    Error, Result,
};

use indexmap::IndexMap;
use std::sync::Arc;

/// Builds the desired [`db::Schema`] of one source from the mappings.
#[derive(Debug)]
pub struct Builder<'a> {
    registry: &'a MappingRegistry,
    capability: &'a driver::Capability,
}

impl<'a> Builder<'a> {
    pub fn new(registry: &'a MappingRegistry, capability: &'a driver::Capability) -> Self {
        Self {
            registry,
            capability,
        }
    }

    /// Builds the tables of every class mapped on the source named
    /// `source`, plus the join tables of their many-to-many relations.
    ///
    /// Class tables are sorted so that a table comes after every table it
    /// holds a foreign key to. Join tables come last. A foreign key cycle
    /// between classes fails with a schema cycle error; a class referring
    /// to itself is fine.
    pub fn build(&self, source: &str) -> Result<db::Schema> {
        let mappings: Vec<&Arc<MappingDefinition>> = self
            .registry
            .iter()
            .filter(|mapping| mapping.is_mapped_on(source))
            .collect();

        let mut tables = IndexMap::new();
        for mapping in &mappings {
            tables.insert(mapping.table().to_string(), self.build_table(mapping, source));
        }

        let mut sorted = sort_tables(tables)?;

        for mapping in &mappings {
            for join_table in self.build_join_tables(mapping, source)? {
                if !sorted.iter().any(|table| table.is_named(&join_table.name)) {
                    sorted.push(join_table);
                }
            }
        }

        Ok(db::Schema { tables: sorted })
    }

    fn build_table(&self, mapping: &MappingDefinition, source: &str) -> Table {
        let mut table = Table::new(mapping.table());

        for property in mapping.columns() {
            let column = property.column_name();

            table.columns.push(Column {
                name: column.to_string(),
                ty: db::Type::from_app(
                    property.ty(),
                    property.length(),
                    &self.capability.storage_types,
                ),
                nullable: !property.is_not_null(),
                primary_key: property.is_identity(),
                auto_increment: property.is_identity() && property.is_auto_increment(),
            });

            if property.is_identity() {
                table.primary_key.push(column.to_string());
            }

            if property.is_unique() || property.is_indexed() {
                let prefix = if property.is_unique() { "UQ" } else { "IX" };
                table.indices.push(Index {
                    name: format!("{prefix}_{}_{column}", mapping.table()),
                    on: mapping.table().to_string(),
                    columns: vec![column.to_string()],
                    unique: property.is_unique(),
                });
            }
        }

        for property in mapping.foreign_keys() {
            let Some(target) = property
                .relation()
                .target()
                .and_then(|target| self.registry.get(target))
            else {
                continue;
            };

            if !target.is_mapped_on(source) {
                tracing::debug!(
                    class = mapping.class(),
                    property = property.property(),
                    target = target.class(),
                    "relation target lives on another source; no foreign key"
                );
                continue;
            }

            table.foreign_keys.push(ForeignKey {
                name: format!("FK_{}_{}", mapping.table(), property.column_name()),
                columns: vec![property.column_name().to_string()],
                references: target.table().to_string(),
                referenced_columns: vec![target.identity().column_name().to_string()],
                on_delete_cascade: property.is_cascade(),
            });
        }

        table
    }

    fn build_join_tables(&self, mapping: &MappingDefinition, source: &str) -> Result<Vec<Table>> {
        let mut tables = vec![];

        for property in mapping.many_to_many() {
            let join = self.registry.join_table(mapping, property)?;

            let target_on_source = property
                .relation()
                .target()
                .and_then(|target| self.registry.get(target))
                .is_some_and(|target| target.is_mapped_on(source));
            if !target_on_source {
                continue;
            }

            let mut table = Table::new(&join.name);
            let self_join = join.owner.table.eq_ignore_ascii_case(&join.target.table);

            for side in [&join.owner, &join.target] {
                table.columns.push(Column {
                    name: side.column.clone(),
                    ty: db::Type::from_app(side.ty, None, &self.capability.storage_types),
                    nullable: false,
                    primary_key: true,
                    auto_increment: false,
                });
                table.primary_key.push(side.column.clone());
            }

            for (side, cascade) in [(&join.owner, true), (&join.target, !self_join)] {
                // Two cascading paths into the same table are rejected by
                // SQL Server; join rows are deleted explicitly anyway.
                table.foreign_keys.push(ForeignKey {
                    name: format!("FK_{}_{}", join.name, side.column),
                    columns: vec![side.column.clone()],
                    references: side.table.clone(),
                    referenced_columns: vec![side.id_column.clone()],
                    on_delete_cascade: cascade,
                });
            }

            tables.push(table);
        }

        Ok(tables)
    }
}

fn sort_tables(mut pending: IndexMap<String, Table>) -> Result<Vec<Table>> {
    let sorted = db::sort_by_dependencies(&mut pending);

    if !pending.is_empty() {
        let tables = pending.into_keys().collect();
        return Err(Error::schema_cycle(tables));
    }

    Ok(sorted)
}
