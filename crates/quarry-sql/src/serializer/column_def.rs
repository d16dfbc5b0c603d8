use super::{Formatter, Ident, ToSql};

use crate::stmt;

use quarry_core::driver::Flavor;

impl ToSql for &stmt::ColumnDef {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let name = Ident(&self.name);

        // SQLite only auto-increments an INTEGER column declared as the
        // table's primary key, inline.
        if self.auto_increment && f.serializer.is_sqlite() {
            fmt!(f, name " INTEGER PRIMARY KEY AUTOINCREMENT");
            return;
        }

        let ty = &self.ty;
        fmt!(f, name " " ty);

        match f.serializer.flavor {
            Flavor::Postgresql if self.auto_increment => {
                fmt!(f, " GENERATED BY DEFAULT AS IDENTITY")
            }
            Flavor::Mssql if self.auto_increment => fmt!(f, " IDENTITY(1,1)"),
            _ => {}
        }

        if self.not_null {
            fmt!(f, " NOT NULL");
        }

        if self.auto_increment && f.serializer.flavor == Flavor::Mysql {
            fmt!(f, " AUTO_INCREMENT");
        }
    }
}
