mod transaction;
pub use transaction::Transaction;

use crate::stmt::Command;

#[derive(Debug, Clone)]
pub enum Operation {
    /// Run one batch command
    Command(Command),

    /// Execute a transaction lifecycle op
    Transaction(Transaction),

    /// Run one DDL statement
    Ddl(String),
}

impl From<Command> for Operation {
    fn from(value: Command) -> Self {
        Self::Command(value)
    }
}
