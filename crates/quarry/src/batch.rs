use crate::{
    driver::{operation::Transaction, Driver, Rows},
    Command, CommandKind, Error, Parameter, Result, Row, SourceInfo,
};

use quarry_core::driver::Connection;
use std::{ops::Index, sync::Arc};

/// An ordered list of commands executed on one connection of one source.
///
/// A batch runs once. Executing it again, or adding commands after it ran,
/// fails with a use-after-dispose error. The row-sets it returns borrow the
/// batch.
#[derive(Debug)]
pub struct Batch {
    driver: Arc<dyn Driver>,
    source: Arc<SourceInfo>,
    commands: Vec<Command>,
    transaction: bool,
    executed: bool,
    results: Vec<RowSet>,
}

/// Rows returned by one command of a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowSet {
    rows: Vec<Row>,
    affected: u64,
}

/// One row-set per command, in the order the commands were added.
#[derive(Debug, Clone, Copy)]
pub struct Results<'a> {
    sets: &'a [RowSet],
}

impl Batch {
    pub(crate) fn new(driver: Arc<dyn Driver>, source: Arc<SourceInfo>) -> Batch {
        Batch {
            driver,
            source,
            commands: vec![],
            transaction: false,
            executed: false,
            results: vec![],
        }
    }

    pub fn source(&self) -> &SourceInfo {
        &self.source
    }

    /// Adds a command whose parameters are referenced with the source's
    /// parameter prefix.
    pub fn add_command(
        &mut self,
        text: impl Into<String>,
        kind: CommandKind,
        parameters: impl IntoIterator<Item = Parameter>,
    ) -> &mut Batch {
        let prefix = self.source.parameter_prefix.clone();
        self.add_command_with_prefix(text, kind, prefix, parameters)
    }

    /// Adds a command whose parameters are referenced with `prefix`.
    pub fn add_command_with_prefix(
        &mut self,
        text: impl Into<String>,
        kind: CommandKind,
        prefix: impl Into<String>,
        parameters: impl IntoIterator<Item = Parameter>,
    ) -> &mut Batch {
        self.push(Command::new(text, kind, prefix, parameters))
    }

    /// Adds a prepared command.
    pub fn push(&mut self, command: Command) -> &mut Batch {
        if self.executed {
            // `execute` reports the misuse
            tracing::warn!(source = %self.source.name, "command added to an executed batch");
            return self;
        }

        self.commands.push(command);
        self
    }

    /// Runs the batch inside a transaction. A failing command rolls back
    /// the commands before it.
    pub fn in_transaction(&mut self) -> &mut Batch {
        self.transaction = true;
        self
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Executes every command in order and returns one row-set per command.
    ///
    /// The connection is opened here and released before returning. When
    /// command `k` fails, the error carries `k` and no later command runs.
    pub async fn execute(&mut self) -> Result<Results<'_>> {
        if self.executed {
            return Err(Error::use_after_dispose("batch"));
        }
        self.executed = true;

        let commands = std::mem::take(&mut self.commands);

        if !commands.is_empty() {
            tracing::debug!(
                source = %self.source.name,
                commands = commands.len(),
                transaction = self.transaction,
                "executing batch"
            );

            let mut connection = self.driver.connect(&self.source).await?;
            self.results = run(&mut *connection, commands, self.transaction).await?;
        }

        Ok(Results {
            sets: &self.results,
        })
    }
}

async fn run(
    connection: &mut dyn Connection,
    commands: Vec<Command>,
    transaction: bool,
) -> Result<Vec<RowSet>> {
    if transaction {
        connection.exec(Transaction::Start.into()).await?;
    }

    let mut results = Vec::with_capacity(commands.len());

    for (index, command) in commands.into_iter().enumerate() {
        match connection.exec(command.into()).await {
            Ok(response) => results.push(RowSet::from(response.rows)),
            Err(cause) => {
                if transaction {
                    if let Err(err) = connection.exec(Transaction::Rollback.into()).await {
                        tracing::warn!(error = %err, "failed to roll back batch");
                    }
                }

                return Err(Error::command_execution(index, cause));
            }
        }
    }

    if transaction {
        connection.exec(Transaction::Commit.into()).await?;
    }

    Ok(results)
}

impl RowSet {
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Row> {
        self.rows.iter()
    }

    pub fn first(&self) -> Option<&Row> {
        self.rows.first()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows affected as reported by the driver. For commands returning rows
    /// this is the number of rows returned.
    pub fn affected(&self) -> u64 {
        self.affected
    }
}

impl From<Rows> for RowSet {
    fn from(rows: Rows) -> Self {
        match rows {
            Rows::Count(affected) => RowSet {
                rows: vec![],
                affected,
            },
            Rows::Values(rows) => RowSet {
                affected: rows.len() as u64,
                rows,
            },
        }
    }
}

impl<'a> IntoIterator for &'a RowSet {
    type Item = &'a Row;
    type IntoIter = std::slice::Iter<'a, Row>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<'a> Results<'a> {
    pub fn len(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&'a RowSet> {
        self.sets.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'a, RowSet> {
        self.sets.iter()
    }

    /// The row-set of the last command.
    pub fn last(&self) -> Option<&'a RowSet> {
        self.sets.last()
    }
}

impl Index<usize> for Results<'_> {
    type Output = RowSet;

    fn index(&self, index: usize) -> &RowSet {
        &self.sets[index]
    }
}

impl<'a> IntoIterator for Results<'a> {
    type Item = &'a RowSet;
    type IntoIter = std::slice::Iter<'a, RowSet>;

    fn into_iter(self) -> Self::IntoIter {
        self.sets.iter()
    }
}
