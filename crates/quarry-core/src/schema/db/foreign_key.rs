#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    /// Constraint name
    pub name: String,

    /// Referencing columns of the owning table
    pub columns: Vec<String>,

    /// Referenced table
    pub references: String,

    /// Referenced columns, matching `columns` in order
    pub referenced_columns: Vec<String>,

    /// `ON DELETE CASCADE`
    pub on_delete_cascade: bool,
}
