use super::{Formatter, ToSql};

use quarry_core::{driver::Flavor, schema::db};

impl ToSql for &db::Type {
    fn to_sql(self, f: &mut Formatter<'_>) {
        let flavor = f.serializer.flavor;

        match self {
            db::Type::Boolean if flavor == Flavor::Mssql => fmt!(f, "BIT"),
            db::Type::Boolean => fmt!(f, "BOOLEAN"),
            db::Type::Integer(1 | 2) => fmt!(f, "SMALLINT"),
            db::Type::Integer(4) if flavor == Flavor::Mssql => fmt!(f, "INT"),
            db::Type::Integer(4) => fmt!(f, "INTEGER"),
            db::Type::Integer(_) => fmt!(f, "BIGINT"),
            db::Type::Float => fmt!(
                f,
                match flavor {
                    Flavor::Sqlite => "REAL",
                    Flavor::Postgresql => "DOUBLE PRECISION",
                    Flavor::Mysql => "DOUBLE",
                    Flavor::Mssql => "FLOAT",
                }
            ),
            db::Type::Text if flavor == Flavor::Mssql => fmt!(f, "NVARCHAR(MAX)"),
            db::Type::Text => fmt!(f, "TEXT"),
            db::Type::VarChar(size) => {
                let size = *size;
                match flavor {
                    Flavor::Mssql => fmt!(f, "NVARCHAR(" size ")"),
                    _ => fmt!(f, "VARCHAR(" size ")"),
                }
            }
            db::Type::Blob => fmt!(
                f,
                match flavor {
                    Flavor::Sqlite | Flavor::Mysql => "BLOB",
                    Flavor::Postgresql => "BYTEA",
                    Flavor::Mssql => "VARBINARY(MAX)",
                }
            ),
            db::Type::Uuid => fmt!(
                f,
                match flavor {
                    Flavor::Sqlite => "TEXT",
                    Flavor::Postgresql => "UUID",
                    Flavor::Mysql => "CHAR(36)",
                    Flavor::Mssql => "UNIQUEIDENTIFIER",
                }
            ),
            db::Type::Timestamp => fmt!(
                f,
                match flavor {
                    Flavor::Sqlite => "DATETIME",
                    Flavor::Postgresql => "TIMESTAMP",
                    Flavor::Mysql => "DATETIME(6)",
                    Flavor::Mssql => "DATETIME2",
                }
            ),
            db::Type::Custom(custom) => fmt!(f, custom),
        }
    }
}
