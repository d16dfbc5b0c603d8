/// DDL statements applying a schema diff, in execution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Migration {
    statements: Vec<String>,
}

impl Migration {
    pub fn new(statements: Vec<String>) -> Migration {
        Migration { statements }
    }

    pub fn statements(&self) -> &[String] {
        &self.statements
    }

    pub fn is_empty(&self) -> bool {
        self.statements.is_empty()
    }

    pub fn len(&self) -> usize {
        self.statements.len()
    }
}

impl IntoIterator for Migration {
    type Item = String;
    type IntoIter = std::vec::IntoIter<String>;

    fn into_iter(self) -> Self::IntoIter {
        self.statements.into_iter()
    }
}
