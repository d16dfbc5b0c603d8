use crate::Serializer;

use quarry_core::{
    driver::{Capability, Flavor, IdentityReturn},
    err,
    mapping::{JoinTable, MappingDefinition, PropertyMapping},
    stmt::{Command, CommandKind, Parameter, Record, Value},
    MappingRegistry, Result,
};

/// Generates the CRUD commands for mapped classes.
///
/// Parameters are named after the properties they carry and referenced in
/// the SQL as `{prefix}{name}`; the driver binds them to the engine's
/// placeholders.
#[derive(Debug, Clone, Copy)]
pub struct CommandBuilder<'a> {
    registry: &'a MappingRegistry,
    capability: &'a Capability,
    serializer: Serializer,
    prefix: &'a str,
}

/// Rows of one class selected for deletion.
struct Selection {
    /// Predicate on the class's own table.
    predicate: String,

    /// Right-hand side matching the selected rows' identity values, e.g.
    /// `= @ID` or `IN (SELECT ...)`.
    ids: String,
}

impl<'a> CommandBuilder<'a> {
    pub fn new(
        registry: &'a MappingRegistry,
        capability: &'a Capability,
        prefix: &'a str,
    ) -> CommandBuilder<'a> {
        CommandBuilder {
            registry,
            capability,
            serializer: Serializer::new(capability.flavor),
            prefix,
        }
    }

    pub fn select_all(&self, mapping: &MappingDefinition) -> Command {
        self.command(self.select(mapping), [])
    }

    pub fn select_by_id(&self, mapping: &MappingDefinition, id: impl Into<Value>) -> Command {
        let identity = mapping.identity();
        let name = param_name(identity.property(), &mut vec![]);

        let sql = format!(
            "{} WHERE {} = {}{}",
            self.select(mapping),
            self.ident(identity.column_name()),
            self.prefix,
            name
        );

        self.command(sql, [Parameter::eq(name, id)])
    }

    /// Selects the rows matching `filter`, whose leaves name properties of
    /// `mapping`.
    pub fn select_where(&self, mapping: &MappingDefinition, mut filter: Parameter) -> Command {
        let predicate = self.predicate(mapping, &mut filter, &mut vec![]);
        let sql = format!("{} WHERE {}", self.select(mapping), predicate);
        self.command(sql, [filter])
    }

    /// Counts rows, optionally restricted by `filter`. The count is returned
    /// in a single column named `Count`.
    pub fn count(&self, mapping: &MappingDefinition, filter: Option<Parameter>) -> Command {
        let mut sql = format!(
            "SELECT COUNT(*) AS {} FROM {}",
            self.ident("Count"),
            self.ident(mapping.table())
        );

        match filter {
            Some(mut filter) => {
                let predicate = self.predicate(mapping, &mut filter, &mut vec![]);
                sql.push_str(" WHERE ");
                sql.push_str(&predicate);
                self.command(sql, [filter])
            }
            None => self.command(sql, []),
        }
    }

    /// Inserts `record`.
    ///
    /// An auto-increment identity with no value is left to the database.
    /// When the engine reports generated identities through a follow-up
    /// query, that query is the second command; otherwise the insert itself
    /// returns the identity column.
    pub fn insert(&self, mapping: &MappingDefinition, record: &Record) -> Vec<Command> {
        let identity = mapping.identity();
        let generated = identity.is_auto_increment() && record.value(identity.property()).is_null();

        let mut columns = vec![];
        let mut placeholders = vec![];
        let mut params = vec![];
        let mut used = vec![];

        for property in mapping.columns().filter(|p| p.is_writable()) {
            if generated && property.is_identity() {
                continue;
            }

            let name = param_name(property.property(), &mut used);
            columns.push(self.ident(property.column_name()));
            placeholders.push(format!("{}{}", self.prefix, name));
            params.push(Parameter::eq(name, self.value_of(property, record)));
        }

        let table = self.ident(mapping.table());
        let id_column = self.ident(identity.column_name());
        let returning = generated.then_some(self.capability.identity_return);

        let output = match returning {
            Some(IdentityReturn::OutputInserted) => format!(" OUTPUT INSERTED.{id_column}"),
            _ => String::new(),
        };

        let mut sql = if columns.is_empty() {
            match self.capability.flavor {
                Flavor::Mysql => format!("INSERT INTO {table} () VALUES ()"),
                _ => format!("INSERT INTO {table}{output} DEFAULT VALUES"),
            }
        } else {
            format!(
                "INSERT INTO {table} ({}){output} VALUES ({})",
                columns.join(", "),
                placeholders.join(", ")
            )
        };

        if returning == Some(IdentityReturn::Returning) {
            sql.push_str(" RETURNING ");
            sql.push_str(&id_column);
        }

        let mut commands = vec![self.command(sql, params)];

        if returning == Some(IdentityReturn::LastInsertId) {
            commands.push(self.command(format!("SELECT LAST_INSERT_ID() AS {id_column}"), []));
        }

        commands
    }

    /// Updates the writable properties present in `record`, identified by
    /// its identity value. Returns `None` when there is nothing to set.
    pub fn update(&self, mapping: &MappingDefinition, record: &Record) -> Result<Option<Command>> {
        let identity = mapping.identity();
        let id = record.value(identity.property());

        if id.is_null() {
            return Err(err!(
                "cannot update `{}` without a value for `{}`",
                mapping.class(),
                identity.property()
            ));
        }

        let mut assignments = vec![];
        let mut params = vec![];
        let mut used = vec![];

        for property in mapping
            .columns()
            .filter(|p| p.is_writable() && !p.is_identity() && record.contains(p.property()))
        {
            let name = param_name(property.property(), &mut used);
            assignments.push(format!(
                "{} = {}{}",
                self.ident(property.column_name()),
                self.prefix,
                name
            ));
            params.push(Parameter::eq(name, record.value(property.property()).clone()));
        }

        if assignments.is_empty() {
            return Ok(None);
        }

        let name = param_name(identity.property(), &mut used);
        let sql = format!(
            "UPDATE {} SET {} WHERE {} = {}{}",
            self.ident(mapping.table()),
            assignments.join(", "),
            self.ident(identity.column_name()),
            self.prefix,
            name
        );
        params.push(Parameter::eq(name, id.clone()));

        Ok(Some(self.command(sql, params)))
    }

    /// Deletes the row identified by `id`.
    ///
    /// Dependent rows go first: join table rows of many-to-many relations
    /// on either side, then rows of classes holding a cascading foreign key
    /// to the class (recursively), then the row itself.
    pub fn delete(&self, mapping: &MappingDefinition, id: impl Into<Value>) -> Result<Vec<Command>> {
        let identity = mapping.identity();
        let name = param_name(identity.property(), &mut vec![]);
        let placeholder = format!("{}{}", self.prefix, name);

        let selection = Selection {
            predicate: format!("{} = {}", self.ident(identity.column_name()), placeholder),
            ids: format!("= {placeholder}"),
        };

        let mut statements = vec![];
        let mut path = vec![mapping.class().to_string()];
        self.delete_rows(mapping, &selection, &mut path, &mut statements)?;

        let id = id.into();
        Ok(statements
            .into_iter()
            .map(|sql| self.command(sql, [Parameter::eq(name.clone(), id.clone())]))
            .collect())
    }

    fn delete_rows(
        &self,
        mapping: &MappingDefinition,
        selection: &Selection,
        path: &mut Vec<String>,
        statements: &mut Vec<String>,
    ) -> Result<()> {
        let ids = &selection.ids;

        for property in mapping.many_to_many() {
            let join = self.registry.join_table(mapping, property)?;
            let mut sql = format!(
                "DELETE FROM {} WHERE {} {ids}",
                self.ident(&join.name),
                self.ident(&join.owner.column)
            );

            if property.relation().target() == Some(mapping.class()) {
                sql.push_str(&format!(" OR {} {ids}", self.ident(&join.target.column)));
            }

            statements.push(sql);
        }

        for other in self.registry.iter() {
            if other.class() == mapping.class() {
                continue;
            }

            for property in other
                .many_to_many()
                .filter(|p| p.relation().target() == Some(mapping.class()))
            {
                let join = self.registry.join_table(other, property)?;
                statements.push(format!(
                    "DELETE FROM {} WHERE {} {ids}",
                    self.ident(&join.name),
                    self.ident(&join.target.column)
                ));
            }
        }

        for (child, property) in self.registry.referencing(mapping.class()) {
            if !property.is_cascade() {
                continue;
            }

            let predicate = format!("{} {ids}", self.ident(property.column_name()));

            // Cycles stop after the direct children.
            if path.iter().any(|class| class == child.class()) {
                statements.push(format!(
                    "DELETE FROM {} WHERE {}",
                    self.ident(child.table()),
                    predicate
                ));
                continue;
            }

            let child_ids = format!(
                "IN (SELECT {} FROM {} WHERE {})",
                self.ident(child.identity().column_name()),
                self.ident(child.table()),
                predicate
            );

            path.push(child.class().to_string());
            self.delete_rows(
                child,
                &Selection {
                    predicate,
                    ids: child_ids,
                },
                path,
                statements,
            )?;
            path.pop();
        }

        statements.push(format!(
            "DELETE FROM {} WHERE {}",
            self.ident(mapping.table()),
            selection.predicate
        ));

        Ok(())
    }

    /// Adds a row to the join table of the many-to-many `property`.
    pub fn link(
        &self,
        mapping: &MappingDefinition,
        property: &str,
        owner: impl Into<Value>,
        target: impl Into<Value>,
    ) -> Result<Command> {
        let join = self.join_table(mapping, property)?;
        let mut used = vec![];
        let owner_name = param_name(&join.owner.column, &mut used);
        let target_name = param_name(&join.target.column, &mut used);

        let sql = format!(
            "INSERT INTO {} ({}, {}) VALUES ({}{}, {}{})",
            self.ident(&join.name),
            self.ident(&join.owner.column),
            self.ident(&join.target.column),
            self.prefix,
            owner_name,
            self.prefix,
            target_name
        );

        Ok(self.command(
            sql,
            [
                Parameter::eq(owner_name, owner),
                Parameter::eq(target_name, target),
            ],
        ))
    }

    /// Removes a row from the join table of the many-to-many `property`.
    pub fn unlink(
        &self,
        mapping: &MappingDefinition,
        property: &str,
        owner: impl Into<Value>,
        target: impl Into<Value>,
    ) -> Result<Command> {
        let join = self.join_table(mapping, property)?;
        let mut used = vec![];
        let owner_name = param_name(&join.owner.column, &mut used);
        let target_name = param_name(&join.target.column, &mut used);

        let sql = format!(
            "DELETE FROM {} WHERE {} = {}{} AND {} = {}{}",
            self.ident(&join.name),
            self.ident(&join.owner.column),
            self.prefix,
            owner_name,
            self.ident(&join.target.column),
            self.prefix,
            target_name
        );

        Ok(self.command(
            sql,
            [
                Parameter::eq(owner_name, owner),
                Parameter::eq(target_name, target),
            ],
        ))
    }

    fn join_table(&self, mapping: &MappingDefinition, property: &str) -> Result<JoinTable> {
        let property = mapping.property(property).ok_or_else(|| {
            err!("`{}` has no property `{}`", mapping.class(), property)
        })?;
        self.registry.join_table(mapping, property)
    }

    fn select(&self, mapping: &MappingDefinition) -> String {
        let columns: Vec<_> = mapping
            .columns()
            .filter(|p| p.is_readable())
            .map(|p| self.ident(p.column_name()))
            .collect();

        format!(
            "SELECT {} FROM {}",
            columns.join(", "),
            self.ident(mapping.table())
        )
    }

    /// Renders `filter` against the columns of `mapping`. Leaves naming the
    /// same property more than once are renamed so each keeps its own
    /// value.
    fn predicate(
        &self,
        mapping: &MappingDefinition,
        filter: &mut Parameter,
        used: &mut Vec<String>,
    ) -> String {
        match filter {
            Parameter::Leaf(param) => {
                let column = mapping
                    .property(&param.name)
                    .map(|p| p.column_name().to_string())
                    .unwrap_or_else(|| param.name.clone());

                param.name = param_name(&param.name, used);

                format!(
                    "{} {} {}{}",
                    self.ident(&column),
                    param.op.as_str(),
                    self.prefix,
                    param.name
                )
            }
            Parameter::And(parameters) => self.join(mapping, parameters, " AND ", "1 = 1", used),
            Parameter::Or(parameters) => self.join(mapping, parameters, " OR ", "1 = 0", used),
        }
    }

    /// Joins the rendered parameters of a composite. An empty composite
    /// renders as `empty`.
    fn join(
        &self,
        mapping: &MappingDefinition,
        parameters: &mut [Parameter],
        sep: &str,
        empty: &str,
        used: &mut Vec<String>,
    ) -> String {
        if parameters.is_empty() {
            return empty.to_string();
        }

        let parts: Vec<_> = parameters
            .iter_mut()
            .map(|parameter| self.predicate(mapping, parameter, used))
            .collect();
        format!("({})", parts.join(sep))
    }

    fn value_of(&self, property: &PropertyMapping, record: &Record) -> Value {
        match record.get(property.property()) {
            Some(value) => value.clone(),
            None => property.eval_default().unwrap_or(Value::Null),
        }
    }

    fn ident(&self, name: &str) -> String {
        self.serializer.ident(name)
    }

    fn command(&self, sql: String, params: impl IntoIterator<Item = Parameter>) -> Command {
        Command::new(sql, CommandKind::Text, self.prefix, params)
    }
}

/// Parameter name for a property or column, not yet in `used`:
/// non-identifier characters become `_` and a taken name gets a `_N`
/// suffix.
fn param_name(name: &str, used: &mut Vec<String>) -> String {
    let base: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();

    let mut name = base.clone();
    let mut n = 1;
    while used.contains(&name) {
        n += 1;
        name = format!("{base}_{n}");
    }

    used.push(name.clone());
    name
}
