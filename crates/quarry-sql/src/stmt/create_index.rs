use super::Statement;

use quarry_core::schema::db::Index;

#[derive(Debug, Clone)]
pub struct CreateIndex {
    /// Name of the index
    pub name: String,

    /// Table the index is created on
    pub on: String,

    /// Indexed columns
    pub columns: Vec<String>,

    /// When true, the index is unique
    pub unique: bool,
}

impl Statement {
    pub fn create_index(index: &Index) -> Self {
        CreateIndex {
            name: index.name.clone(),
            on: index.on.clone(),
            columns: index.columns.clone(),
            unique: index.unique,
        }
        .into()
    }
}

impl From<CreateIndex> for Statement {
    fn from(value: CreateIndex) -> Self {
        Self::CreateIndex(value)
    }
}
