use super::Type;
use crate::{Error, Result};

use chrono::NaiveDateTime;
use uuid::Uuid;

#[derive(Debug, Default, Clone, PartialEq)]
pub enum Value {
    /// Boolean value
    Bool(bool),

    /// Signed 16-bit integer
    I16(i16),

    /// Signed 32-bit integer
    I32(i32),

    /// Signed 64-bit integer
    I64(i64),

    /// 64-bit float
    F64(f64),

    /// String value
    String(String),

    /// Raw bytes
    Bytes(Vec<u8>),

    /// Universally unique identifier
    Uuid(Uuid),

    /// Date and time without a time zone
    Timestamp(NaiveDateTime),

    /// Null value
    #[default]
    Null,
}

impl Value {
    pub const fn null() -> Self {
        Self::Null
    }

    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Returns the type of the value, `None` for null.
    pub fn ty(&self) -> Option<Type> {
        Some(match self {
            Self::Bool(_) => Type::Bool,
            Self::I16(_) => Type::I16,
            Self::I32(_) => Type::I32,
            Self::I64(_) => Type::I64,
            Self::F64(_) => Type::F64,
            Self::String(_) => Type::String,
            Self::Bytes(_) => Type::Bytes,
            Self::Uuid(_) => Type::Uuid,
            Self::Timestamp(_) => Type::Timestamp,
            Self::Null => return None,
        })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match *self {
            Self::Bool(v) => Some(v),
            Self::I16(v) => Some(v != 0),
            Self::I32(v) => Some(v != 0),
            Self::I64(v) => Some(v != 0),
            _ => None,
        }
    }

    /// Returns the value widened to `i64` if it is an integer.
    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Self::I16(v) => Some(v.into()),
            Self::I32(v) => Some(v.into()),
            Self::I64(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::F64(v) => Some(v),
            Self::I16(v) => Some(v.into()),
            Self::I32(v) => Some(v.into()),
            Self::I64(v) => Some(v as f64),
            _ => None,
        }
    }

    pub fn to_i64(&self) -> Result<i64> {
        self.as_i64()
            .ok_or_else(|| Error::type_conversion(self.clone(), "i64"))
    }

    pub fn to_string_value(&self) -> Result<String> {
        self.as_str()
            .map(str::to_owned)
            .ok_or_else(|| Error::type_conversion(self.clone(), "String"))
    }

    /// Converts the value to `ty`, as needed when reading columns back from
    /// engines whose storage type is wider or textual (SQLite stores UUIDs
    /// and timestamps as text, MySQL returns booleans as integers).
    pub fn cast(self, ty: Type) -> Result<Value> {
        if self.is_null() || self.ty() == Some(ty) {
            return Ok(self);
        }

        let cast = match (ty, &self) {
            (Type::Bool, _) => self.as_bool().map(Value::Bool),
            (Type::I16, _) => self
                .as_i64()
                .and_then(|v| i16::try_from(v).ok())
                .map(Value::I16),
            (Type::I32, _) => self
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(Value::I32),
            (Type::I64, _) => self.as_i64().map(Value::I64),
            (Type::F64, _) => self.as_f64().map(Value::F64),
            (Type::Uuid, Value::String(s)) => Uuid::parse_str(s).ok().map(Value::Uuid),
            (Type::Uuid, Value::Bytes(b)) => Uuid::from_slice(b).ok().map(Value::Uuid),
            (Type::Timestamp, Value::String(s)) => parse_timestamp(s).map(Value::Timestamp),
            (Type::String, Value::Uuid(v)) => Some(Value::String(v.to_string())),
            (Type::Bytes, Value::String(s)) => Some(Value::Bytes(s.as_bytes().to_vec())),
            _ => None,
        };

        cast.ok_or_else(|| Error::type_conversion(self, ty.name()))
    }
}

fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    const FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M:%S%.f"];

    FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

impl From<bool> for Value {
    fn from(src: bool) -> Self {
        Self::Bool(src)
    }
}

impl From<i16> for Value {
    fn from(src: i16) -> Self {
        Self::I16(src)
    }
}

impl From<i32> for Value {
    fn from(src: i32) -> Self {
        Self::I32(src)
    }
}

impl From<i64> for Value {
    fn from(src: i64) -> Self {
        Self::I64(src)
    }
}

impl From<f64> for Value {
    fn from(src: f64) -> Self {
        Self::F64(src)
    }
}

impl From<String> for Value {
    fn from(src: String) -> Self {
        Self::String(src)
    }
}

impl From<&String> for Value {
    fn from(src: &String) -> Self {
        Self::String(src.clone())
    }
}

impl From<&str> for Value {
    fn from(src: &str) -> Self {
        Self::String(src.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(src: Vec<u8>) -> Self {
        Self::Bytes(src)
    }
}

impl From<Uuid> for Value {
    fn from(src: Uuid) -> Self {
        Self::Uuid(src)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(src: NaiveDateTime) -> Self {
        Self::Timestamp(src)
    }
}

impl<T> From<Option<T>> for Value
where
    Value: From<T>,
{
    fn from(value: Option<T>) -> Self {
        match value {
            Some(value) => Value::from(value),
            None => Value::Null,
        }
    }
}
