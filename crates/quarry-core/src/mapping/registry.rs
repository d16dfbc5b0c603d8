use super::{JoinSide, JoinTable, MappingDefinition, PropertyMapping};
use crate::{Error, Result};

use indexmap::IndexMap;
use std::sync::Arc;

/// All mapping definitions of an application, keyed by class name.
#[derive(Debug, Default, Clone)]
pub struct MappingRegistry {
    mappings: IndexMap<String, Arc<MappingDefinition>>,
}

impl MappingRegistry {
    pub fn new() -> MappingRegistry {
        MappingRegistry::default()
    }

    /// Adds a definition. A class may only be registered once.
    pub fn register(&mut self, mapping: MappingDefinition) -> Result<()> {
        if self.mappings.contains_key(&mapping.class) {
            return Err(Error::duplicate_mapping(
                &mapping.class,
                "class is already registered",
            ));
        }

        self.mappings
            .insert(mapping.class.clone(), Arc::new(mapping));
        Ok(())
    }

    pub fn get(&self, class: &str) -> Option<&Arc<MappingDefinition>> {
        self.mappings.get(class)
    }

    /// Like [`get`](Self::get), failing with an invalid mapping error for
    /// unknown classes.
    pub fn mapping(&self, class: &str) -> Result<&Arc<MappingDefinition>> {
        self.get(class)
            .ok_or_else(|| Error::invalid_mapping(format!("class `{class}` is not mapped")))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<MappingDefinition>> {
        self.mappings.values()
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }

    /// Checks relations and resolves relation columns.
    ///
    /// Every relation target must be registered. Foreign key columns without
    /// an explicit name become `{property}_{target identity column}` and
    /// take the target identity's type. Column names are then checked for
    /// uniqueness again, now including the derived ones.
    pub fn verify(&mut self) -> Result<()> {
        let mut resolved = IndexMap::with_capacity(self.mappings.len());

        for mapping in self.mappings.values() {
            let mut mapping = MappingDefinition::clone(mapping);

            for property in &mut mapping.properties {
                let Some(target) = property.relation.target() else {
                    continue;
                };

                let Some(target) = self.mappings.get(target) else {
                    return Err(Error::invalid_mapping(format!(
                        "`{}.{}` relates to `{}`, which is not mapped",
                        mapping.class, property.property, target
                    )));
                };

                let target_identity = target.identity();
                property.ty = target_identity.ty;

                if property.relation.is_foreign_key() && !property.has_explicit_column() {
                    property.column = Some(format!(
                        "{}_{}",
                        property.property,
                        target_identity.column_name()
                    ));
                }
            }

            check_unique_columns(&mapping)?;
            resolved.insert(mapping.class.clone(), Arc::new(mapping));
        }

        self.mappings = resolved;
        Ok(())
    }

    /// Describes the join table of a many-to-many `property` of `mapping`.
    pub fn join_table(
        &self,
        mapping: &MappingDefinition,
        property: &PropertyMapping,
    ) -> Result<JoinTable> {
        let target = match property.relation.target() {
            Some(target) if property.relation.is_many_to_many() => self.mapping(target)?,
            _ => {
                return Err(Error::invalid_mapping(format!(
                    "`{}.{}` is not a many-to-many relation",
                    mapping.class, property.property
                )))
            }
        };

        let owner = JoinSide {
            column: format!("{}_{}", mapping.table, mapping.identity().column_name()),
            table: mapping.table.clone(),
            id_column: mapping.identity().column_name().to_string(),
            ty: mapping.identity().ty,
        };

        let mut target_column = format!("{}_{}", target.table, target.identity().column_name());
        if target_column.eq_ignore_ascii_case(&owner.column) {
            target_column.push('2');
        }

        Ok(JoinTable {
            name: format!("{}_{}", mapping.table, target.table),
            owner,
            target: JoinSide {
                column: target_column,
                table: target.table.clone(),
                id_column: target.identity().column_name().to_string(),
                ty: target.identity().ty,
            },
        })
    }

    /// Properties of other classes that reference `class` with a foreign key
    /// column, paired with their owning mapping.
    pub fn referencing<'a>(
        &'a self,
        class: &'a str,
    ) -> impl Iterator<Item = (&'a Arc<MappingDefinition>, &'a PropertyMapping)> + 'a {
        self.mappings.values().flat_map(move |mapping| {
            mapping
                .foreign_keys()
                .filter(move |property| property.relation.target() == Some(class))
                .map(move |property| (mapping, property))
        })
    }
}

fn check_unique_columns(mapping: &MappingDefinition) -> Result<()> {
    let columns: Vec<_> = mapping.columns().collect();

    for (i, property) in columns.iter().enumerate() {
        let column = property.column_name();
        if let Some(other) = columns[..i]
            .iter()
            .find(|other| other.column_name().eq_ignore_ascii_case(column))
        {
            return Err(Error::duplicate_mapping(
                &mapping.class,
                format!(
                    "properties `{}` and `{}` both map to column `{}`",
                    other.property, property.property, column
                ),
            ));
        }
    }

    Ok(())
}
