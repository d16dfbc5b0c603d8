use super::{Comma, Formatter, Ident, ToSql};

use crate::stmt::{self, Statement};

use quarry_core::{driver::Flavor, schema::db::ForeignKey};

impl ToSql for &Statement {
    fn to_sql(self, f: &mut Formatter<'_>) {
        match self {
            Statement::AddColumn(stmt) => stmt.to_sql(f),
            Statement::AddForeignKey(stmt) => stmt.to_sql(f),
            Statement::CreateIndex(stmt) => stmt.to_sql(f),
            Statement::CreateTable(stmt) => stmt.to_sql(f),
            Statement::DropColumn(stmt) => stmt.to_sql(f),
            Statement::DropTable(stmt) => stmt.to_sql(f),
        }
    }
}

impl ToSql for &stmt::CreateTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table_name = Ident(&self.name);

        fmt!(f, "CREATE TABLE " table_name " (");

        let mut s = "\n    ";
        for column in &self.columns {
            fmt!(f, s column);
            s = ",\n    ";
        }

        // An auto-increment column already declared the key inline
        let inline_pk = f.serializer.is_sqlite() && self.columns.iter().any(|c| c.auto_increment);

        if !self.primary_key.is_empty() && !inline_pk {
            let columns = Comma(self.primary_key.iter().map(Ident));
            fmt!(f, s "PRIMARY KEY (" columns ")");
        }

        for foreign_key in &self.foreign_keys {
            fmt!(f, s foreign_key);
        }

        fmt!(f, "\n)");
    }
}

impl ToSql for &ForeignKey {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = Ident(&self.name);
        let columns = Comma(self.columns.iter().map(Ident));
        let references = Ident(&self.references);
        let referenced_columns = Comma(self.referenced_columns.iter().map(Ident));

        fmt!(
            f,
            "CONSTRAINT " name " FOREIGN KEY (" columns ") REFERENCES " references " (" referenced_columns ")"
        );

        if self.on_delete_cascade {
            fmt!(f, " ON DELETE CASCADE");
        }
    }
}

impl ToSql for &stmt::CreateIndex {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let index_name = Ident(&self.name);
        let table_name = Ident(&self.on);
        let columns = Comma(self.columns.iter().map(Ident));
        let unique = if self.unique { "UNIQUE " } else { "" };

        fmt!(
            f, "CREATE " unique "INDEX " index_name " ON " table_name " (" columns ")"
        );
    }
}

impl ToSql for &stmt::AddColumn {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table_name = Ident(&self.table);

        let add = match f.serializer.flavor {
            Flavor::Mssql => " ADD ",
            _ => " ADD COLUMN ",
        };

        let column = &self.column;
        fmt!(f, "ALTER TABLE " table_name add column);
    }
}

impl ToSql for &stmt::AddForeignKey {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table_name = Ident(&self.table);

        let foreign_key = &self.foreign_key;
        fmt!(f, "ALTER TABLE " table_name " ADD " foreign_key);
    }
}

impl ToSql for &stmt::DropColumn {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table_name = Ident(&self.table);
        let column_name = Ident(&self.column);

        fmt!(f, "ALTER TABLE " table_name " DROP COLUMN " column_name);
    }
}

impl ToSql for &stmt::DropTable {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let table_name = Ident(&self.name);

        fmt!(f, "DROP TABLE " table_name);
    }
}
