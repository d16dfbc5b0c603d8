use mysql_async::{prelude::Queryable, Conn};
use quarry_core::{
    schema::db::{Column, ForeignKey, Index, Schema, Table, Type},
    Error, Result,
};

/// Reads the tables of the connection's current database.
pub(crate) async fn schema(conn: &mut Conn) -> Result<Schema> {
    let names: Vec<String> = conn
        .query(
            "SELECT CAST(TABLE_NAME AS CHAR) FROM information_schema.TABLES \
             WHERE TABLE_SCHEMA = DATABASE() AND TABLE_TYPE = 'BASE TABLE' \
             ORDER BY TABLE_NAME",
        )
        .await
        .map_err(Error::driver_operation_failed)?;

    let mut schema = Schema::default();

    for name in names {
        let mut table = Table::new(name);

        load_columns(conn, &mut table).await?;
        load_indexes(conn, &mut table).await?;
        load_foreign_keys(conn, &mut table).await?;

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

async fn load_columns(conn: &mut Conn, table: &mut Table) -> Result<()> {
    let rows: Vec<(String, String, Option<u64>, String, String, String)> = conn
        .exec(
            r#"
            SELECT
                CAST(COLUMN_NAME AS CHAR),
                CAST(DATA_TYPE AS CHAR),
                CHARACTER_MAXIMUM_LENGTH,
                CAST(IS_NULLABLE AS CHAR),
                CAST(COLUMN_KEY AS CHAR),
                CAST(EXTRA AS CHAR)
            FROM information_schema.COLUMNS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ?
            ORDER BY ORDINAL_POSITION
            "#,
            (&table.name,),
        )
        .await
        .map_err(Error::driver_operation_failed)?;

    for (name, data_type, length, nullable, key, extra) in rows {
        let primary_key = key == "PRI";

        if primary_key {
            table.primary_key.push(name.clone());
        }

        table.columns.push(Column {
            nullable: nullable == "YES",
            primary_key,
            auto_increment: extra.to_ascii_lowercase().contains("auto_increment"),
            ..Column::new(name, Type::from_sql(&data_type, length))
        });
    }

    Ok(())
}

async fn load_indexes(conn: &mut Conn, table: &mut Table) -> Result<()> {
    let rows: Vec<(String, String, i64)> = conn
        .exec(
            r#"
            SELECT
                CAST(INDEX_NAME AS CHAR),
                CAST(COLUMN_NAME AS CHAR),
                NON_UNIQUE
            FROM information_schema.STATISTICS
            WHERE TABLE_SCHEMA = DATABASE() AND TABLE_NAME = ? AND INDEX_NAME <> 'PRIMARY'
            ORDER BY INDEX_NAME, SEQ_IN_INDEX
            "#,
            (&table.name,),
        )
        .await
        .map_err(Error::driver_operation_failed)?;

    for (name, column, non_unique) in rows {
        // Rows of one index are adjacent
        if let Some(index) = table.indices.last_mut().filter(|index| index.name == name) {
            index.columns.push(column);
            continue;
        }

        table.indices.push(Index {
            name,
            on: table.name.clone(),
            columns: vec![column],
            unique: non_unique == 0,
        });
    }

    Ok(())
}

async fn load_foreign_keys(conn: &mut Conn, table: &mut Table) -> Result<()> {
    let rows: Vec<(String, String, String, String, String)> = conn
        .exec(
            r#"
            SELECT
                CAST(k.CONSTRAINT_NAME AS CHAR),
                CAST(k.COLUMN_NAME AS CHAR),
                CAST(k.REFERENCED_TABLE_NAME AS CHAR),
                CAST(k.REFERENCED_COLUMN_NAME AS CHAR),
                CAST(r.DELETE_RULE AS CHAR)
            FROM information_schema.KEY_COLUMN_USAGE k
            JOIN information_schema.REFERENTIAL_CONSTRAINTS r
                ON r.CONSTRAINT_SCHEMA = k.CONSTRAINT_SCHEMA
                AND r.CONSTRAINT_NAME = k.CONSTRAINT_NAME
            WHERE k.TABLE_SCHEMA = DATABASE() AND k.TABLE_NAME = ?
                AND k.REFERENCED_TABLE_NAME IS NOT NULL
            ORDER BY k.CONSTRAINT_NAME, k.ORDINAL_POSITION
            "#,
            (&table.name,),
        )
        .await
        .map_err(Error::driver_operation_failed)?;

    for (name, column, references, referenced_column, delete_rule) in rows {
        if let Some(foreign_key) = table
            .foreign_keys
            .last_mut()
            .filter(|foreign_key| foreign_key.name == name)
        {
            foreign_key.columns.push(column);
            foreign_key.referenced_columns.push(referenced_column);
            continue;
        }

        table.foreign_keys.push(ForeignKey {
            name,
            columns: vec![column],
            references,
            referenced_columns: vec![referenced_column],
            on_delete_cascade: delete_rule == "CASCADE",
        });
    }

    Ok(())
}
