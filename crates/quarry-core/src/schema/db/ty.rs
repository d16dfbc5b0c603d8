use crate::{driver, stmt};

/// Database storage type of a column, as it appears in `CREATE TABLE`.
///
/// Each mapped property has a [`stmt::Type`]; [`Type::from_app`] picks the
/// storage type for it on a given engine. Spelling the type in a dialect is
/// up to the SQL serializer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Type {
    /// A boolean value
    Boolean,

    /// A signed integer of `n` bytes
    Integer(u8),

    /// Double precision float
    Float,

    /// Unconstrained text type
    Text,

    /// Text type with an explicit maximum length
    VarChar(u64),

    /// Unconstrained binary type
    Blob,

    /// 128-bit universally unique identifier (UUID)
    Uuid,

    /// Date and time without time zone
    Timestamp,

    /// Type reported by the database that has no closer match, e.g. from
    /// schema inspection
    Custom(String),
}

impl Type {
    /// Maps an application-level type to a storage type.
    ///
    /// A string with a maximum length becomes `VarChar(n)` when the engine
    /// accepts that length, `Text` when it is longer. Strings without a
    /// length use the engine's default string type.
    pub fn from_app(ty: stmt::Type, max_length: Option<u64>, db: &driver::StorageTypes) -> Type {
        match ty {
            stmt::Type::Bool => Type::Boolean,
            stmt::Type::I16 => Type::Integer(2),
            stmt::Type::I32 => Type::Integer(4),
            stmt::Type::I64 => Type::Integer(8),
            stmt::Type::F64 => Type::Float,
            stmt::Type::String => match (max_length, db.varchar) {
                (Some(len), Some(max)) if len <= max => Type::VarChar(len),
                (Some(_), _) => Type::Text,
                (None, _) => db.default_string_type.clone(),
            },
            stmt::Type::Bytes => Type::Blob,
            stmt::Type::Uuid => Type::Uuid,
            stmt::Type::Timestamp => Type::Timestamp,
        }
    }
}

impl Type {
    /// Parses a type name reported by schema inspection, e.g. `varchar`,
    /// `INTEGER` or `datetime2`. `length` is the declared character length,
    /// where the engine reports one separately; `-1` style "max" lengths are
    /// passed as `None`.
    pub fn from_sql(name: &str, length: Option<u64>) -> Type {
        let lower = name.trim().to_ascii_lowercase();

        // `varchar(120)` style declarations carry the length inline
        let (base, inline) = match lower.split_once('(') {
            Some((base, rest)) => (
                base.trim(),
                rest.trim_end_matches(')').trim().parse::<u64>().ok(),
            ),
            None => (lower.as_str(), None),
        };
        let length = length.or(inline);

        match base {
            "bool" | "boolean" | "bit" => Type::Boolean,
            "tinyint" | "smallint" | "int2" => Type::Integer(2),
            "int" | "integer" | "int4" | "mediumint" => Type::Integer(4),
            "bigint" | "int8" => Type::Integer(8),
            "real" | "float" | "float4" | "float8" | "double" | "double precision" => Type::Float,
            "text" | "ntext" | "longtext" | "mediumtext" | "clob" => Type::Text,
            "varchar" | "nvarchar" | "character varying" | "char" | "nchar" | "character" => {
                match length {
                    Some(len) if len > 0 => Type::VarChar(len),
                    _ => Type::Text,
                }
            }
            "blob" | "bytea" | "varbinary" | "binary" | "longblob" | "image" => Type::Blob,
            "uuid" | "uniqueidentifier" => Type::Uuid,
            "timestamp"
            | "timestamp without time zone"
            | "datetime"
            | "datetime2"
            | "smalldatetime" => Type::Timestamp,
            _ => Type::Custom(name.to_string()),
        }
    }
}
