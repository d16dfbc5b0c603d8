use super::Statement;

use quarry_core::schema::db::ForeignKey;

/// A statement adding a foreign key constraint to an existing table.
#[derive(Debug, Clone)]
pub struct AddForeignKey {
    pub table: String,
    pub foreign_key: ForeignKey,
}

impl Statement {
    pub fn add_foreign_key(table: &str, foreign_key: &ForeignKey) -> Self {
        AddForeignKey {
            table: table.to_string(),
            foreign_key: foreign_key.clone(),
        }
        .into()
    }
}

impl From<AddForeignKey> for Statement {
    fn from(value: AddForeignKey) -> Self {
        Self::AddForeignKey(value)
    }
}
