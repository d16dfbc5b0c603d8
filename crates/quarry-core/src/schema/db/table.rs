use super::{Column, ForeignKey, Index};

use indexmap::IndexMap;

/// A database table
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    /// Name of the table
    pub name: String,

    /// The table's columns
    pub columns: Vec<Column>,

    /// Names of the primary key columns
    pub primary_key: Vec<String>,

    pub indices: Vec<Index>,

    pub foreign_keys: Vec<ForeignKey>,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Table {
        Table {
            name: name.into(),
            columns: vec![],
            primary_key: vec![],
            indices: vec![],
            foreign_keys: vec![],
        }
    }

    /// Finds a column by name, ignoring ASCII case.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|column| column.is_named(name))
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name)
    }

    /// Tables this table holds foreign keys to, excluding itself.
    pub fn dependencies(&self) -> impl Iterator<Item = &str> {
        self.foreign_keys
            .iter()
            .map(|fk| fk.references.as_str())
            .filter(|references| !self.is_named(references))
    }
}

/// Orders tables so referenced tables come first, keeping the input order
/// among independent tables.
///
/// Tables left in `pending` when this returns reference each other in a
/// cycle.
pub(crate) fn sort_by_dependencies(pending: &mut IndexMap<String, Table>) -> Vec<Table> {
    let mut sorted: Vec<Table> = Vec::with_capacity(pending.len());

    loop {
        let ready = pending.values().position(|table| {
            table.dependencies().all(|dependency| {
                // References to tables outside the set don't block
                !pending.keys().any(|name| name.eq_ignore_ascii_case(dependency))
            })
        });

        match ready.and_then(|index| pending.shift_remove_index(index)) {
            Some((_, table)) => sorted.push(table),
            None => return sorted,
        }
    }
}
