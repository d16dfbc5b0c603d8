use super::{Builder, PropertyMapping};
use crate::{
    stmt::{Record, Row, Value},
    Result,
};

/// How one class maps to a table: its properties, identity, and relations.
///
/// Created with [`MappingDefinition::builder`] and immutable afterwards.
#[derive(Debug, Clone)]
pub struct MappingDefinition {
    pub(super) class: String,
    pub(super) table: String,
    pub(super) source: Option<String>,
    pub(super) properties: Vec<PropertyMapping>,
    pub(super) identity: usize,
}

impl MappingDefinition {
    pub fn builder(class: impl Into<String>) -> Builder {
        Builder::new(class)
    }

    pub fn class(&self) -> &str {
        &self.class
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Name of the sources this class lives in, `None` for all of them.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Returns `true` if this class is mapped on the source named `name`.
    pub fn is_mapped_on(&self, name: &str) -> bool {
        self.source.as_deref().map_or(true, |source| source == name)
    }

    pub fn properties(&self) -> &[PropertyMapping] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&PropertyMapping> {
        self.properties.iter().find(|p| p.property == name)
    }

    pub fn identity(&self) -> &PropertyMapping {
        &self.properties[self.identity]
    }

    /// Properties stored as columns of this class's table.
    pub fn columns(&self) -> impl Iterator<Item = &PropertyMapping> {
        self.properties.iter().filter(|p| p.has_column())
    }

    /// Properties stored as foreign key columns.
    pub fn foreign_keys(&self) -> impl Iterator<Item = &PropertyMapping> {
        self.properties.iter().filter(|p| p.relation.is_foreign_key())
    }

    /// Many-to-many properties, each backed by a join table.
    pub fn many_to_many(&self) -> impl Iterator<Item = &PropertyMapping> {
        self.properties.iter().filter(|p| p.relation.is_many_to_many())
    }

    /// Creates a record for this class, evaluating every default thunk now.
    pub fn new_record(&self) -> Record {
        let mut record = Record::new(&self.class);

        for property in self.columns() {
            record.set(
                &property.property,
                property.eval_default().unwrap_or(Value::Null),
            );
        }

        record
    }

    /// Maps a result row back to a record.
    ///
    /// Write-only properties are not read. Columns missing from the row take
    /// the property's default, or null.
    pub fn hydrate(&self, row: &Row) -> Result<Record> {
        let mut record = Record::new(&self.class);

        for property in self.columns().filter(|p| p.is_readable()) {
            let value = match row.get(property.column_name()) {
                Some(value) => value.clone().cast(property.ty)?,
                None => property.eval_default().unwrap_or(Value::Null),
            };
            record.set(&property.property, value);
        }

        Ok(record)
    }
}
