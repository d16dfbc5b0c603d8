use crate::logging_driver::DriverOp;

use quarry::{driver::Operation, driver::operation::Transaction, Command};
use std::sync::{Arc, Mutex};

/// A wrapper around the operations log that provides a clean API for tests
pub struct ExecLog {
    ops: Arc<Mutex<Vec<DriverOp>>>,
}

impl ExecLog {
    pub(crate) fn new(ops: Arc<Mutex<Vec<DriverOp>>>) -> Self {
        Self { ops }
    }

    /// Get the number of logged operations
    pub fn len(&self) -> usize {
        self.ops.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.lock().unwrap().is_empty()
    }

    /// Every DDL statement applied, in order
    pub fn ddl(&self) -> Vec<String> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match &op.operation {
                Operation::Ddl(sql) => Some(sql.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every batch command executed, in order
    pub fn commands(&self) -> Vec<Command> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match &op.operation {
                Operation::Command(command) => Some(command.clone()),
                _ => None,
            })
            .collect()
    }

    /// Transaction lifecycle operations, in order
    pub fn transactions(&self) -> Vec<Transaction> {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter_map(|op| match &op.operation {
                Operation::Transaction(transaction) => Some(*transaction),
                _ => None,
            })
            .collect()
    }

    /// Number of operations that failed
    pub fn failures(&self) -> usize {
        self.ops
            .lock()
            .unwrap()
            .iter()
            .filter(|op| op.rows.is_none())
            .count()
    }

    /// Clear the log
    pub fn clear(&self) {
        self.ops.lock().unwrap().clear();
    }
}
