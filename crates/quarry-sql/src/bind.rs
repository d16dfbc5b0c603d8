use quarry_core::{
    driver::Flavor,
    stmt::{Command, CommandKind, Direction, Param, Type, Value},
    Error, Result,
};

use std::fmt::Write;

/// A parameter value together with its declared or inferred type.
#[derive(Debug, Clone, PartialEq)]
pub struct TypedValue {
    pub value: Value,
    pub ty: Option<Type>,
}

/// A command rewritten for one engine: positional placeholders in the SQL
/// and the values to bind to them, in placeholder order.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundCommand {
    pub sql: String,
    pub params: Vec<TypedValue>,
}

/// Rewrites `command` for `flavor`.
///
/// In text commands every `{prefix}{name}` naming a registered parameter is
/// replaced by a positional placeholder: `?N` on SQLite, `$N` on
/// PostgreSQL, `?` on MySQL and `@PN` on SQL Server. String literals, quoted
/// identifiers and comments are left untouched, as are names that match no
/// parameter.
///
/// Stored procedures are called with every parameter in registration order.
pub fn bind(command: &Command, flavor: Flavor) -> Result<BoundCommand> {
    if let Some(param) = command
        .parameters
        .iter()
        .find(|param| param.direction != Direction::Input)
    {
        return Err(Error::unsupported_feature(format!(
            "{:?} parameter `{}`; only input parameters can be bound",
            param.direction, param.name
        )));
    }

    match command.kind {
        CommandKind::Text => Ok(bind_text(command, flavor)),
        CommandKind::StoredProcedure => bind_procedure(command, flavor),
    }
}

struct Placeholders {
    flavor: Flavor,
    params: Vec<TypedValue>,

    /// Placeholder number assigned to each parameter name. Unused on MySQL,
    /// whose placeholders are anonymous.
    assigned: Vec<(String, usize)>,
}

impl Placeholders {
    fn new(flavor: Flavor) -> Placeholders {
        Placeholders {
            flavor,
            params: vec![],
            assigned: vec![],
        }
    }

    fn push(&mut self, param: &Param, dst: &mut String) {
        let typed = || TypedValue {
            value: param.value.clone(),
            ty: param.ty(),
        };

        if self.flavor == Flavor::Mysql {
            self.params.push(typed());
            dst.push('?');
            return;
        }

        let n = match self.assigned.iter().find(|(name, _)| *name == param.name) {
            Some((_, n)) => *n,
            None => {
                self.params.push(typed());
                let n = self.params.len();
                self.assigned.push((param.name.clone(), n));
                n
            }
        };

        let _ = match self.flavor {
            Flavor::Sqlite => write!(dst, "?{n}"),
            Flavor::Postgresql => write!(dst, "${n}"),
            Flavor::Mssql => write!(dst, "@P{n}"),
            Flavor::Mysql => unreachable!(),
        };
    }
}

fn bind_text(command: &Command, flavor: Flavor) -> BoundCommand {
    let prefix = command.prefix.as_str();
    let mut placeholders = Placeholders::new(flavor);
    let mut sql = String::with_capacity(command.text.len());
    let mut rest = command.text.as_str();

    while let Some(c) = rest.chars().next() {
        let skip = match c {
            '\'' | '"' | '`' => quoted_len(rest, c),
            '[' if flavor == Flavor::Mssql => quoted_len(rest, ']'),
            '-' if rest.starts_with("--") => rest.find('\n').unwrap_or(rest.len()),
            '/' if rest.starts_with("/*") => rest[2..].find("*/").map_or(rest.len(), |end| end + 4),
            _ if !prefix.is_empty() && rest.starts_with(prefix) => {
                let after = &rest[prefix.len()..];
                let len = after
                    .find(|c: char| !(c.is_alphanumeric() || c == '_'))
                    .unwrap_or(after.len());

                match command.parameter(&after[..len]) {
                    Some(param) if len > 0 => {
                        placeholders.push(param, &mut sql);
                        rest = &after[len..];
                        continue;
                    }
                    _ => prefix.len(),
                }
            }
            _ => c.len_utf8(),
        };

        sql.push_str(&rest[..skip]);
        rest = &rest[skip..];
    }

    BoundCommand {
        sql,
        params: placeholders.params,
    }
}

/// Length of the quoted section at the start of `s`, including both quotes.
/// A doubled closing quote is an escaped quote. Unterminated sections run to
/// the end of `s`.
fn quoted_len(s: &str, close: char) -> usize {
    let mut chars = s.char_indices().skip(1).peekable();

    while let Some((i, c)) = chars.next() {
        if c == close {
            match chars.peek() {
                Some((_, next)) if *next == close => {
                    chars.next();
                }
                _ => return i + c.len_utf8(),
            }
        }
    }

    s.len()
}

fn bind_procedure(command: &Command, flavor: Flavor) -> Result<BoundCommand> {
    let mut placeholders = Placeholders::new(flavor);
    let mut sql = String::new();

    match flavor {
        Flavor::Sqlite => {
            return Err(Error::unsupported_feature(format!(
                "stored procedure `{}`; SQLite has no stored procedures",
                command.text
            )))
        }
        Flavor::Mssql => {
            let _ = write!(sql, "EXEC {}", command.text);
            let mut s = " ";
            for param in &command.parameters {
                let _ = write!(sql, "{s}@{} = ", param.name);
                placeholders.push(param, &mut sql);
                s = ", ";
            }
        }
        Flavor::Postgresql | Flavor::Mysql => {
            let _ = write!(sql, "CALL {}(", command.text);
            let mut s = "";
            for param in &command.parameters {
                sql.push_str(s);
                placeholders.push(param, &mut sql);
                s = ", ";
            }
            sql.push(')');
        }
    }

    Ok(BoundCommand {
        sql,
        params: placeholders.params,
    })
}
