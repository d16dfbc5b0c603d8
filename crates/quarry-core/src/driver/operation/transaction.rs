use super::Operation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    /// Start a transaction
    Start,

    /// Commit a transaction
    Commit,

    /// Rollback a transaction
    Rollback,
}

impl Transaction {
    /// Statement for the given dialect.
    pub fn sql(self, flavor: crate::driver::Flavor) -> &'static str {
        use crate::driver::Flavor;

        match (self, flavor) {
            (Transaction::Start, Flavor::Mssql) => "BEGIN TRANSACTION",
            (Transaction::Start, Flavor::Mysql) => "START TRANSACTION",
            (Transaction::Start, _) => "BEGIN",
            (Transaction::Commit, _) => "COMMIT",
            (Transaction::Rollback, _) => "ROLLBACK",
        }
    }
}

impl From<Transaction> for Operation {
    fn from(value: Transaction) -> Operation {
        Operation::Transaction(value)
    }
}
