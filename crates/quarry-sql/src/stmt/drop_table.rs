use super::Statement;

#[derive(Debug, Clone)]
pub struct DropTable {
    /// Name of the table
    pub name: String,
}

impl Statement {
    pub fn drop_table(name: &str) -> Self {
        DropTable {
            name: name.to_string(),
        }
        .into()
    }
}

impl From<DropTable> for Statement {
    fn from(value: DropTable) -> Self {
        Self::DropTable(value)
    }
}
