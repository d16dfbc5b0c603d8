use chrono::{DateTime, NaiveDateTime, Utc};
use quarry_core::{err, stmt::Value as CoreValue, Error, Result};
use tokio_postgres::{
    types::{private::BytesMut, to_sql_checked, FromSql, IsNull, ToSql, Type},
    Column, Row,
};
use uuid::Uuid;

type BoxError = Box<dyn std::error::Error + Sync + Send>;

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts the PostgreSQL value in column `index` of `row`.
    pub fn from_sql(row: &Row, index: usize, column: &Column) -> Result<CoreValue> {
        let ty = column.type_();

        // The inner representation of the PostgreSQL type enum is not
        // accessible, so each type is matched by hand.
        if *ty == Type::BOOL {
            get(row, index, CoreValue::Bool)
        } else if *ty == Type::INT2 {
            get(row, index, CoreValue::I16)
        } else if *ty == Type::INT4 {
            get(row, index, CoreValue::I32)
        } else if *ty == Type::INT8 {
            get(row, index, CoreValue::I64)
        } else if *ty == Type::FLOAT4 {
            get(row, index, |v: f32| CoreValue::F64(v as f64))
        } else if *ty == Type::FLOAT8 {
            get(row, index, CoreValue::F64)
        } else if *ty == Type::TEXT
            || *ty == Type::VARCHAR
            || *ty == Type::BPCHAR
            || *ty == Type::NAME
        {
            get(row, index, CoreValue::String)
        } else if *ty == Type::BYTEA {
            get(row, index, CoreValue::Bytes)
        } else if *ty == Type::UUID {
            get(row, index, CoreValue::Uuid)
        } else if *ty == Type::TIMESTAMP {
            get(row, index, CoreValue::Timestamp)
        } else if *ty == Type::TIMESTAMPTZ {
            get(row, index, |v: DateTime<Utc>| CoreValue::Timestamp(v.naive_utc()))
        } else {
            Err(err!(
                "unsupported PostgreSQL type `{}` in column `{}`",
                ty,
                column.name()
            ))
        }
    }
}

fn get<'a, T: FromSql<'a>>(
    row: &'a Row,
    index: usize,
    f: impl FnOnce(T) -> CoreValue,
) -> Result<CoreValue> {
    let value = row
        .try_get::<usize, Option<T>>(index)
        .map_err(Error::driver_operation_failed)?;
    Ok(value.map(f).unwrap_or(CoreValue::Null))
}

/// Integers are widened or narrowed to the parameter type the server
/// inferred for the placeholder.
fn int_to_sql(value: i64, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError> {
    match *ty {
        Type::BOOL => (value != 0).to_sql(ty, out),
        Type::INT2 => i16::try_from(value)?.to_sql(ty, out),
        Type::INT4 => i32::try_from(value)?.to_sql(ty, out),
        Type::FLOAT8 => (value as f64).to_sql(ty, out),
        Type::TEXT | Type::VARCHAR => value.to_string().to_sql(ty, out),
        _ => value.to_sql(ty, out),
    }
}

impl ToSql for Value {
    fn to_sql(&self, ty: &Type, out: &mut BytesMut) -> std::result::Result<IsNull, BoxError>
    where
        Self: Sized,
    {
        match &self.0 {
            CoreValue::Null => Ok(IsNull::Yes),
            CoreValue::Bool(value) => match *ty {
                Type::BOOL => value.to_sql(ty, out),
                _ => int_to_sql(*value as i64, ty, out),
            },
            CoreValue::I16(value) => int_to_sql(*value as i64, ty, out),
            CoreValue::I32(value) => int_to_sql(*value as i64, ty, out),
            CoreValue::I64(value) => int_to_sql(*value, ty, out),
            CoreValue::F64(value) => match *ty {
                Type::FLOAT4 => (*value as f32).to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            CoreValue::String(value) => match *ty {
                Type::UUID => Uuid::parse_str(value)?.to_sql(ty, out),
                Type::TIMESTAMP => value.parse::<NaiveDateTime>()?.to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            CoreValue::Bytes(value) => value.to_sql(ty, out),
            CoreValue::Uuid(value) => match *ty {
                Type::UUID => value.to_sql(ty, out),
                _ => value.to_string().to_sql(ty, out),
            },
            CoreValue::Timestamp(value) => match *ty {
                Type::TIMESTAMPTZ => value.and_utc().to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    to_sql_checked!();
}
