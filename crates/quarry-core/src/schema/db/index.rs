#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    /// Index name, unique within the schema
    pub name: String,

    /// The table being indexed
    pub on: String,

    /// Indexed columns, in order
    pub columns: Vec<String>,

    /// When `true`, indexed entries are unique
    pub unique: bool,
}
