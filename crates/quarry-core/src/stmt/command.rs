use super::{Param, Parameter};

/// How the command text is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CommandKind {
    /// Raw SQL text.
    #[default]
    Text,

    /// The text is the name of a stored procedure; parameters are passed
    /// positionally in registration order.
    StoredProcedure,
}

/// One command of a batch: text, kind, and the parameters it references by
/// `{prefix}{name}`.
#[derive(Debug, Clone, PartialEq)]
pub struct Command {
    pub text: String,
    pub kind: CommandKind,
    pub prefix: String,
    pub parameters: Vec<Param>,
}

impl Command {
    pub fn new(
        text: impl Into<String>,
        kind: CommandKind,
        prefix: impl Into<String>,
        parameters: impl IntoIterator<Item = Parameter>,
    ) -> Command {
        let mut leaves = vec![];
        for parameter in parameters {
            parameter.into_leaves(&mut leaves);
        }

        Command {
            text: text.into(),
            kind,
            prefix: prefix.into(),
            parameters: leaves,
        }
    }

    /// A parameterless text command.
    pub fn text(text: impl Into<String>) -> Command {
        Command::new(text, CommandKind::Text, "@", [])
    }

    /// Returns the first registered parameter named `name`.
    pub fn parameter(&self, name: &str) -> Option<&Param> {
        self.parameters.iter().find(|param| param.name == name)
    }

    pub fn is_stored_procedure(&self) -> bool {
        self.kind == CommandKind::StoredProcedure
    }
}
