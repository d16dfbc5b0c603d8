use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use quarry_core::{
    stmt::{Type, Value as CoreValue},
    Error, Result,
};
use std::borrow::Cow;
use tiberius::{ColumnData, FromSql, IntoSql};

/// A parameter value together with the type used when it is null.
///
/// SQL Server needs a concrete type for every bound parameter, including
/// nulls.
#[derive(Debug)]
pub struct Value {
    value: CoreValue,
    ty: Option<Type>,
}

impl Value {
    pub fn new(value: CoreValue, ty: Option<Type>) -> Self {
        Self { value, ty }
    }

    /// Converts one cell of a result row.
    pub fn from_sql(data: ColumnData<'static>) -> Result<CoreValue> {
        Ok(match data {
            ColumnData::Bit(value) => value.map(CoreValue::Bool).unwrap_or(CoreValue::Null),
            ColumnData::U8(value) => value
                .map(|value| CoreValue::I16(value as i16))
                .unwrap_or(CoreValue::Null),
            ColumnData::I16(value) => value.map(CoreValue::I16).unwrap_or(CoreValue::Null),
            ColumnData::I32(value) => value.map(CoreValue::I32).unwrap_or(CoreValue::Null),
            ColumnData::I64(value) => value.map(CoreValue::I64).unwrap_or(CoreValue::Null),
            ColumnData::F32(value) => value
                .map(|value| CoreValue::F64(value as f64))
                .unwrap_or(CoreValue::Null),
            ColumnData::F64(value) => value.map(CoreValue::F64).unwrap_or(CoreValue::Null),
            ColumnData::String(value) => value
                .map(|value| CoreValue::String(value.into_owned()))
                .unwrap_or(CoreValue::Null),
            ColumnData::Guid(value) => value.map(CoreValue::Uuid).unwrap_or(CoreValue::Null),
            ColumnData::Binary(value) => value
                .map(|value| CoreValue::Bytes(value.into_owned()))
                .unwrap_or(CoreValue::Null),
            ColumnData::Numeric(value) => value
                .map(|value| CoreValue::String(value.to_string()))
                .unwrap_or(CoreValue::Null),
            ColumnData::Xml(value) => value
                .map(|value| CoreValue::String(value.into_owned().into_string()))
                .unwrap_or(CoreValue::Null),
            ref data @ (ColumnData::DateTime(_)
            | ColumnData::SmallDateTime(_)
            | ColumnData::DateTime2(_)) => convert::<NaiveDateTime>(data, CoreValue::Timestamp)?,
            ref data @ ColumnData::Date(_) => convert::<NaiveDate>(data, |date| {
                CoreValue::Timestamp(date.and_time(NaiveTime::MIN))
            })?,
            ref data @ ColumnData::Time(_) => {
                convert::<NaiveTime>(data, |time| CoreValue::String(time.to_string()))?
            }
            ref data @ ColumnData::DateTimeOffset(_) => {
                convert::<DateTime<Utc>>(data, |value| CoreValue::Timestamp(value.naive_utc()))?
            }
        })
    }
}

fn convert<'a, T: FromSql<'a>>(
    data: &'a ColumnData<'static>,
    f: impl FnOnce(T) -> CoreValue,
) -> Result<CoreValue> {
    let value = T::from_sql(data).map_err(Error::driver_operation_failed)?;
    Ok(value.map(f).unwrap_or(CoreValue::Null))
}

impl IntoSql<'static> for Value {
    fn into_sql(self) -> ColumnData<'static> {
        match self.value {
            CoreValue::Bool(value) => ColumnData::Bit(Some(value)),
            CoreValue::I16(value) => ColumnData::I16(Some(value)),
            CoreValue::I32(value) => ColumnData::I32(Some(value)),
            CoreValue::I64(value) => ColumnData::I64(Some(value)),
            CoreValue::F64(value) => ColumnData::F64(Some(value)),
            CoreValue::String(value) => ColumnData::String(Some(Cow::Owned(value))),
            CoreValue::Bytes(value) => ColumnData::Binary(Some(Cow::Owned(value))),
            CoreValue::Uuid(value) => ColumnData::Guid(Some(value)),
            CoreValue::Timestamp(value) => value.into_sql(),
            CoreValue::Null => match self.ty {
                Some(Type::Bool) => ColumnData::Bit(None),
                Some(Type::I16) => ColumnData::I16(None),
                Some(Type::I32) => ColumnData::I32(None),
                Some(Type::I64) => ColumnData::I64(None),
                Some(Type::F64) => ColumnData::F64(None),
                Some(Type::Bytes) => ColumnData::Binary(None),
                Some(Type::Uuid) => ColumnData::Guid(None),
                Some(Type::Timestamp) => ColumnData::DateTime2(None),
                Some(Type::String) | None => ColumnData::String(None),
            },
        }
    }
}
