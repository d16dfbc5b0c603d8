use quarry_core::{
    schema::db::{Column, ForeignKey, Index, Schema, Table, Type},
    Error, Result,
};
use quarry_sql::Serializer;
use rusqlite::Connection;

/// Reads the live schema from `sqlite_master` and the table pragmas.
pub(crate) fn schema(connection: &Connection) -> Result<Schema> {
    let mut stmt = connection
        .prepare(
            "SELECT name, sql FROM sqlite_master \
             WHERE type = 'table' AND name NOT LIKE 'sqlite_%' \
             ORDER BY name",
        )
        .map_err(Error::driver_operation_failed)?;

    let tables = stmt
        .query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, Option<String>>(1)?))
        })
        .map_err(Error::driver_operation_failed)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver_operation_failed)?;

    let mut schema = Schema::default();

    for (name, sql) in tables {
        let mut table = Table::new(name);
        let autoincrement = sql
            .map(|sql| sql.to_ascii_uppercase().contains("AUTOINCREMENT"))
            .unwrap_or(false);

        load_columns(connection, &mut table, autoincrement)?;
        load_indexes(connection, &mut table)?;
        load_foreign_keys(connection, &mut table)?;

        tracing::debug!(
            table = %table.name,
            columns = table.columns.len(),
            indices = table.indices.len(),
            "inspected table"
        );
        schema.tables.push(table);
    }

    Ok(schema)
}

fn load_columns(connection: &Connection, table: &mut Table, autoincrement: bool) -> Result<()> {
    let sql = format!("PRAGMA table_info({})", Serializer::sqlite().ident(&table.name));
    let mut stmt = connection
        .prepare(&sql)
        .map_err(Error::driver_operation_failed)?;

    // (name, declared type, not null, position in the primary key)
    let columns = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, i64>(3)? != 0,
                row.get::<_, i64>(5)?,
            ))
        })
        .map_err(Error::driver_operation_failed)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver_operation_failed)?;

    let mut primary_key: Vec<(i64, String)> = columns
        .iter()
        .filter(|(.., pk)| *pk > 0)
        .map(|(name, .., pk)| (*pk, name.clone()))
        .collect();
    primary_key.sort();

    let single_key = primary_key.len() == 1;

    for (name, ty, not_null, pk) in columns {
        let ty = Type::from_sql(&ty, None);
        let auto_increment = autoincrement && single_key && pk > 0 && ty == Type::Integer(4);

        table.columns.push(Column {
            nullable: !not_null && pk == 0,
            primary_key: pk > 0,
            auto_increment,
            ..Column::new(name, ty)
        });
    }

    table.primary_key = primary_key.into_iter().map(|(_, name)| name).collect();
    Ok(())
}

fn load_indexes(connection: &Connection, table: &mut Table) -> Result<()> {
    let serializer = Serializer::sqlite();
    let sql = format!("PRAGMA index_list({})", serializer.ident(&table.name));
    let mut stmt = connection
        .prepare(&sql)
        .map_err(Error::driver_operation_failed)?;

    // (name, unique, origin)
    let indices = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)? != 0,
                row.get::<_, String>(3)?,
            ))
        })
        .map_err(Error::driver_operation_failed)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver_operation_failed)?;

    for (name, unique, origin) in indices {
        // The primary key is described by the columns
        if origin == "pk" {
            continue;
        }

        let sql = format!("PRAGMA index_info({})", serializer.ident(&name));
        let mut stmt = connection
            .prepare(&sql)
            .map_err(Error::driver_operation_failed)?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>(2))
            .map_err(Error::driver_operation_failed)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(Error::driver_operation_failed)?;

        table.indices.push(Index {
            name,
            on: table.name.clone(),
            columns,
            unique,
        });
    }

    Ok(())
}

fn load_foreign_keys(connection: &Connection, table: &mut Table) -> Result<()> {
    let sql = format!(
        "PRAGMA foreign_key_list({})",
        Serializer::sqlite().ident(&table.name)
    );
    let mut stmt = connection
        .prepare(&sql)
        .map_err(Error::driver_operation_failed)?;

    // (id, referenced table, column, referenced column, on delete)
    let rows = stmt
        .query_map([], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                row.get::<_, String>(6)?,
            ))
        })
        .map_err(Error::driver_operation_failed)?
        .collect::<rusqlite::Result<Vec<_>>>()
        .map_err(Error::driver_operation_failed)?;

    let mut current: Option<(i64, ForeignKey)> = None;

    for (id, references, column, referenced_column, on_delete) in rows {
        match &mut current {
            Some((current_id, foreign_key)) if *current_id == id => {
                foreign_key.columns.push(column);
                foreign_key.referenced_columns.push(referenced_column);
            }
            _ => {
                if let Some((_, foreign_key)) = current.take() {
                    table.foreign_keys.push(foreign_key);
                }

                // SQLite does not keep constraint names
                current = Some((
                    id,
                    ForeignKey {
                        name: format!("FK_{}_{}", table.name, column),
                        columns: vec![column],
                        references,
                        referenced_columns: vec![referenced_column],
                        on_delete_cascade: on_delete.eq_ignore_ascii_case("CASCADE"),
                    },
                ));
            }
        }
    }

    if let Some((_, foreign_key)) = current {
        table.foreign_keys.push(foreign_key);
    }

    Ok(())
}
