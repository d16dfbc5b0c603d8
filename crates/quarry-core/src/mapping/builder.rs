use super::{MappingDefinition, PropertyMapping};
use crate::{stmt::Type, Error, Result};

/// Builds a [`MappingDefinition`] one property at a time.
///
/// Every call that adds a property validates it against the properties
/// added so far, so a duplicate identity or column is reported at the call
/// that introduced it.
#[derive(Debug)]
pub struct Builder {
    class: String,
    table: Option<String>,
    source: Option<String>,
    properties: Vec<PropertyMapping>,
}

impl Builder {
    pub(super) fn new(class: impl Into<String>) -> Builder {
        Builder {
            class: class.into(),
            table: None,
            source: None,
            properties: vec![],
        }
    }

    /// Table name. Defaults to the class name.
    pub fn table(mut self, table: impl Into<String>) -> Builder {
        self.table = Some(table.into());
        self
    }

    /// Restricts the class to sources with this name. Without it the class
    /// is available on every source.
    pub fn source(mut self, source: impl Into<String>) -> Builder {
        self.source = Some(source.into());
        self
    }

    /// Designates the identity property. Must be called exactly once.
    pub fn id(mut self, mut property: PropertyMapping) -> Result<Builder> {
        if let Some(existing) = self.properties.iter().find(|p| p.identity) {
            return Err(Error::duplicate_mapping(
                &self.class,
                format!(
                    "identity already set to `{}`, cannot also use `{}`",
                    existing.property, property.property
                ),
            ));
        }

        if property.relation.target().is_some() {
            return Err(Error::invalid_mapping(format!(
                "identity `{}.{}` cannot be a relation",
                self.class, property.property
            )));
        }

        if property.auto_increment && !property.ty.is_integer() {
            return Err(Error::invalid_mapping(format!(
                "auto-increment identity `{}.{}` must be an integer, found {}",
                self.class, property.property, property.ty
            )));
        }

        property.identity = true;
        property.not_null = true;
        self.push(property)
    }

    /// Maps one property.
    pub fn map(self, property: PropertyMapping) -> Result<Builder> {
        if property.identity {
            return self.id(property);
        }
        self.push(property)
    }

    /// Maps a plain property to a column of the same name.
    pub fn property(self, property: impl Into<String>, ty: Type) -> Result<Builder> {
        self.map(PropertyMapping::new(property, ty))
    }

    pub fn reference(
        self,
        property: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<Builder> {
        self.map(PropertyMapping::reference(property, target))
    }

    pub fn many_to_one(
        self,
        property: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<Builder> {
        self.map(PropertyMapping::many_to_one(property, target))
    }

    pub fn many_to_many(
        self,
        property: impl Into<String>,
        target: impl Into<String>,
    ) -> Result<Builder> {
        self.map(PropertyMapping::many_to_many(property, target))
    }

    /// Finishes the definition. Fails if no identity was designated.
    pub fn build(self) -> Result<MappingDefinition> {
        let Some(identity) = self.properties.iter().position(|p| p.identity) else {
            return Err(Error::invalid_mapping(format!(
                "`{}` has no identity property",
                self.class
            )));
        };

        let table = self.table.unwrap_or_else(|| self.class.clone());

        Ok(MappingDefinition {
            class: self.class,
            table,
            source: self.source,
            properties: self.properties,
            identity,
        })
    }

    fn push(mut self, property: PropertyMapping) -> Result<Builder> {
        if property.property.is_empty() {
            return Err(Error::invalid_mapping(format!(
                "`{}` maps a property with an empty name",
                self.class
            )));
        }

        if self.properties.iter().any(|p| p.property == property.property) {
            return Err(Error::duplicate_mapping(
                &self.class,
                format!("property `{}` is mapped twice", property.property),
            ));
        }

        // Derived relation columns are checked once the registry resolves them.
        if property.has_column() && (property.has_explicit_column() || !property.relation.is_foreign_key()) {
            let column = property.column_name();
            let taken = self.properties.iter().any(|p| {
                p.has_column()
                    && (p.has_explicit_column() || !p.relation.is_foreign_key())
                    && p.column_name().eq_ignore_ascii_case(column)
            });

            if taken {
                return Err(Error::duplicate_mapping(
                    &self.class,
                    format!(
                        "column `{}` of property `{}` is already mapped",
                        column, property.property
                    ),
                ));
            }
        }

        self.properties.push(property);
        Ok(self)
    }
}
