use super::Table;

/// Tables of one source, either inspected from the live database or built
/// from the mappings.
///
/// A schema built from mappings lists its tables in creation order:
/// referenced tables come before the tables holding foreign keys to them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    pub tables: Vec<Table>,
}

impl Schema {
    /// Finds a table by name, ignoring ASCII case.
    pub fn table(&self, name: &str) -> Option<&Table> {
        self.tables.iter().find(|table| table.is_named(name))
    }

    pub fn contains_table(&self, name: &str) -> bool {
        self.table(name).is_some()
    }
}
