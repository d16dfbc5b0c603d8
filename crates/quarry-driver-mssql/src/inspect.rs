use crate::TcpClient;

use quarry_core::{
    schema::db::{Column, ForeignKey, Index, Schema, Table, Type},
    Error, Result,
};
use tiberius::{Row, ToSql};

/// Reads the tables of the login's default schema.
pub(crate) async fn schema(client: &mut TcpClient) -> Result<Schema> {
    let rows = query(
        client,
        "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES \
         WHERE TABLE_SCHEMA = SCHEMA_NAME() AND TABLE_TYPE = 'BASE TABLE' \
         ORDER BY TABLE_NAME",
        &[],
    )
    .await?;

    let mut schema = Schema::default();

    for row in rows {
        let mut table = Table::new(text(&row, 0)?);

        load_columns(client, &mut table).await?;
        load_primary_key(client, &mut table).await?;
        load_indexes(client, &mut table).await?;
        load_foreign_keys(client, &mut table).await?;

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

async fn query(client: &mut TcpClient, sql: &str, params: &[&dyn ToSql]) -> Result<Vec<Row>> {
    client
        .query(sql, params)
        .await
        .map_err(Error::driver_operation_failed)?
        .into_first_result()
        .await
        .map_err(Error::driver_operation_failed)
}

fn text(row: &Row, index: usize) -> Result<String> {
    let value = row
        .try_get::<&str, _>(index)
        .map_err(Error::driver_operation_failed)?;
    Ok(value.unwrap_or_default().to_string())
}

fn int(row: &Row, index: usize) -> Result<i32> {
    let value = row
        .try_get::<i32, _>(index)
        .map_err(Error::driver_operation_failed)?;
    Ok(value.unwrap_or_default())
}

async fn load_columns(client: &mut TcpClient, table: &mut Table) -> Result<()> {
    let rows = query(
        client,
        r#"
        SELECT
            COLUMN_NAME,
            DATA_TYPE,
            CAST(ISNULL(CHARACTER_MAXIMUM_LENGTH, 0) AS INT),
            CASE WHEN IS_NULLABLE = 'YES' THEN 1 ELSE 0 END,
            CAST(ISNULL(COLUMNPROPERTY(OBJECT_ID(QUOTENAME(TABLE_SCHEMA) + '.' + QUOTENAME(TABLE_NAME)), COLUMN_NAME, 'IsIdentity'), 0) AS INT)
        FROM INFORMATION_SCHEMA.COLUMNS
        WHERE TABLE_SCHEMA = SCHEMA_NAME() AND TABLE_NAME = @P1
        ORDER BY ORDINAL_POSITION
        "#,
        &[&table.name],
    )
    .await?;

    for row in rows {
        // NVARCHAR(MAX) and friends report a length of -1
        let length = int(&row, 2)?;
        let length = (length > 0).then_some(length as u64);

        table.columns.push(Column {
            nullable: int(&row, 3)? == 1,
            auto_increment: int(&row, 4)? == 1,
            ..Column::new(text(&row, 0)?, Type::from_sql(&text(&row, 1)?, length))
        });
    }

    Ok(())
}

async fn load_primary_key(client: &mut TcpClient, table: &mut Table) -> Result<()> {
    let rows = query(
        client,
        r#"
        SELECT c.COLUMN_NAME
        FROM INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
        JOIN INFORMATION_SCHEMA.KEY_COLUMN_USAGE c
            ON c.CONSTRAINT_NAME = tc.CONSTRAINT_NAME
            AND c.TABLE_SCHEMA = tc.TABLE_SCHEMA
            AND c.TABLE_NAME = tc.TABLE_NAME
        WHERE tc.CONSTRAINT_TYPE = 'PRIMARY KEY'
          AND tc.TABLE_SCHEMA = SCHEMA_NAME()
          AND tc.TABLE_NAME = @P1
        ORDER BY c.ORDINAL_POSITION
        "#,
        &[&table.name],
    )
    .await?;

    for row in rows {
        let name = text(&row, 0)?;

        for column in &mut table.columns {
            if column.is_named(&name) {
                column.primary_key = true;
                column.nullable = false;
            }
        }

        table.primary_key.push(name);
    }

    Ok(())
}

async fn load_indexes(client: &mut TcpClient, table: &mut Table) -> Result<()> {
    let rows = query(
        client,
        r#"
        SELECT i.name, c.name, CAST(i.is_unique AS INT)
        FROM sys.indexes i
        JOIN sys.index_columns ic ON ic.object_id = i.object_id AND ic.index_id = i.index_id
        JOIN sys.columns c ON c.object_id = ic.object_id AND c.column_id = ic.column_id
        WHERE i.object_id = OBJECT_ID(QUOTENAME(SCHEMA_NAME()) + '.' + QUOTENAME(@P1))
          AND i.is_primary_key = 0
          AND i.type > 0
          AND ic.is_included_column = 0
        ORDER BY i.name, ic.key_ordinal
        "#,
        &[&table.name],
    )
    .await?;

    for row in rows {
        let name = text(&row, 0)?;
        let column = text(&row, 1)?;

        if let Some(index) = table.indices.last_mut().filter(|index| index.name == name) {
            index.columns.push(column);
            continue;
        }

        table.indices.push(Index {
            name,
            on: table.name.clone(),
            columns: vec![column],
            unique: int(&row, 2)? == 1,
        });
    }

    Ok(())
}

async fn load_foreign_keys(client: &mut TcpClient, table: &mut Table) -> Result<()> {
    let rows = query(
        client,
        r#"
        SELECT
            fk.name,
            pc.name,
            OBJECT_NAME(fk.referenced_object_id),
            rc.name,
            CAST(fk.delete_referential_action AS INT)
        FROM sys.foreign_keys fk
        JOIN sys.foreign_key_columns fkc ON fkc.constraint_object_id = fk.object_id
        JOIN sys.columns pc ON pc.object_id = fkc.parent_object_id AND pc.column_id = fkc.parent_column_id
        JOIN sys.columns rc ON rc.object_id = fkc.referenced_object_id AND rc.column_id = fkc.referenced_column_id
        WHERE fk.parent_object_id = OBJECT_ID(QUOTENAME(SCHEMA_NAME()) + '.' + QUOTENAME(@P1))
        ORDER BY fk.name, fkc.constraint_column_id
        "#,
        &[&table.name],
    )
    .await?;

    for row in rows {
        let name = text(&row, 0)?;
        let column = text(&row, 1)?;
        let referenced_column = text(&row, 3)?;

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
            references: text(&row, 2)?,
            referenced_columns: vec![referenced_column],
            // 1 is CASCADE in sys.foreign_keys
            on_delete_cascade: int(&row, 4)? == 1,
        });
    }

    Ok(())
}
