use quarry_core::{
    schema::db::{Column, ForeignKey, Index, Schema, Table, Type},
    Error, Result,
};
use tokio_postgres::Client;

/// Reads the tables of the connection's current schema.
pub(crate) async fn schema(client: &Client) -> Result<Schema> {
    let rows = client
        .query(
            "SELECT table_name::text FROM information_schema.tables \
             WHERE table_schema = current_schema() AND table_type = 'BASE TABLE' \
             ORDER BY table_name",
            &[],
        )
        .await
        .map_err(Error::driver_operation_failed)?;

    let mut schema = Schema::default();

    for row in rows {
        let mut table = Table::new(row.get::<_, String>(0));

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

async fn load_columns(client: &Client, table: &mut Table) -> Result<()> {
    let rows = client
        .query(
            r#"
            SELECT
                column_name::text,
                data_type::text,
                COALESCE(character_maximum_length, 0)::int4,
                is_nullable = 'YES',
                is_identity = 'YES' OR COALESCE(column_default, '') LIKE 'nextval(%'
            FROM information_schema.columns
            WHERE table_schema = current_schema() AND table_name = $1
            ORDER BY ordinal_position
            "#,
            &[&table.name],
        )
        .await
        .map_err(Error::driver_operation_failed)?;

    for row in rows {
        let length = row.get::<_, i32>(2);
        let length = (length > 0).then_some(length as u64);

        table.columns.push(Column {
            nullable: row.get(3),
            auto_increment: row.get(4),
            ..Column::new(
                row.get::<_, String>(0),
                Type::from_sql(row.get(1), length),
            )
        });
    }

    Ok(())
}

async fn load_primary_key(client: &Client, table: &mut Table) -> Result<()> {
    let rows = client
        .query(
            r#"
            SELECT a.attname::text
            FROM pg_catalog.pg_constraint c
            JOIN pg_catalog.pg_class t ON t.oid = c.conrelid
            JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
            JOIN pg_catalog.pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(c.conkey)
            WHERE n.nspname = current_schema() AND t.relname = $1 AND c.contype = 'p'
            ORDER BY array_position(c.conkey, a.attnum)
            "#,
            &[&table.name],
        )
        .await
        .map_err(Error::driver_operation_failed)?;

    for row in rows {
        let name: String = row.get(0);

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

async fn load_indexes(client: &Client, table: &mut Table) -> Result<()> {
    let rows = client
        .query(
            r#"
            SELECT
                i.relname::text,
                ix.indisunique,
                array_agg(a.attname ORDER BY array_position(ix.indkey, a.attnum))::text[]
            FROM pg_catalog.pg_index ix
            JOIN pg_catalog.pg_class i ON i.oid = ix.indexrelid
            JOIN pg_catalog.pg_class t ON t.oid = ix.indrelid
            JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
            JOIN pg_catalog.pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(ix.indkey)
            WHERE n.nspname = current_schema() AND t.relname = $1 AND NOT ix.indisprimary
            GROUP BY i.relname, ix.indisunique
            ORDER BY i.relname
            "#,
            &[&table.name],
        )
        .await
        .map_err(Error::driver_operation_failed)?;

    for row in rows {
        table.indices.push(Index {
            name: row.get(0),
            on: table.name.clone(),
            columns: row.get(2),
            unique: row.get(1),
        });
    }

    Ok(())
}

async fn load_foreign_keys(client: &Client, table: &mut Table) -> Result<()> {
    let rows = client
        .query(
            r#"
            SELECT
                c.conname::text,
                array_agg(a.attname ORDER BY array_position(c.conkey, a.attnum))::text[],
                rt.relname::text,
                array_agg(ra.attname ORDER BY array_position(c.confkey, ra.attnum))::text[],
                c.confdeltype = 'c'
            FROM pg_catalog.pg_constraint c
            JOIN pg_catalog.pg_class t ON t.oid = c.conrelid
            JOIN pg_catalog.pg_namespace n ON n.oid = t.relnamespace
            JOIN pg_catalog.pg_class rt ON rt.oid = c.confrelid
            JOIN pg_catalog.pg_attribute a ON a.attrelid = t.oid AND a.attnum = ANY(c.conkey)
            JOIN pg_catalog.pg_attribute ra ON ra.attrelid = rt.oid AND ra.attnum = ANY(c.confkey)
            WHERE n.nspname = current_schema() AND t.relname = $1 AND c.contype = 'f'
            GROUP BY c.conname, rt.relname, c.confdeltype
            ORDER BY c.conname
            "#,
            &[&table.name],
        )
        .await
        .map_err(Error::driver_operation_failed)?;

    for row in rows {
        table.foreign_keys.push(ForeignKey {
            name: row.get(0),
            columns: row.get(1),
            references: row.get(2),
            referenced_columns: row.get(3),
            on_delete_cascade: row.get(4),
        });
    }

    Ok(())
}
