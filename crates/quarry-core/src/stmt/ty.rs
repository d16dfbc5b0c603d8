/// Application-level type of a mapped property or a parameter.
///
/// The storage representation is chosen per engine, see
/// [`db::Type::from_app`](crate::schema::db::Type::from_app).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Type {
    Bool,
    I16,
    I32,
    I64,
    F64,
    String,
    Bytes,
    Uuid,
    Timestamp,
}

impl Type {
    pub fn is_integer(self) -> bool {
        matches!(self, Type::I16 | Type::I32 | Type::I64)
    }

    pub fn name(self) -> &'static str {
        match self {
            Type::Bool => "bool",
            Type::I16 => "i16",
            Type::I32 => "i32",
            Type::I64 => "i64",
            Type::F64 => "f64",
            Type::String => "string",
            Type::Bytes => "bytes",
            Type::Uuid => "uuid",
            Type::Timestamp => "timestamp",
        }
    }
}

impl core::fmt::Display for Type {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}
