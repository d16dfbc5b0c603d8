use crate::stmt::Type;

/// Join table backing a many-to-many property.
///
/// Named `{OwnerTable}_{TargetTable}`, with one column per side named
/// `{Table}_{IdColumn}`. On a self join the target side gets a `2` suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct JoinTable {
    pub name: String,
    pub owner: JoinSide,
    pub target: JoinSide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct JoinSide {
    /// Column in the join table.
    pub column: String,

    /// Table the column refers to.
    pub table: String,

    /// Identity column of `table`.
    pub id_column: String,

    pub ty: Type,
}
