use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike};
use mysql_async::{consts::ColumnType, prelude::ToValue, Column};
use quarry_core::{err, stmt::Value as CoreValue, Result};

/// Character set number MySQL reports for binary columns.
const BINARY_CHARSET: u16 = 63;

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    /// Converts a value read from `column`.
    pub fn from_sql(value: mysql_async::Value, column: &Column) -> Result<CoreValue> {
        use mysql_async::Value::*;

        Ok(match value {
            NULL => CoreValue::Null,
            Int(value) => CoreValue::I64(value),
            UInt(value) => CoreValue::I64(i64::try_from(value).map_err(|_| {
                err!(
                    "unsigned value {value} in column `{}` does not fit in a signed 64-bit integer",
                    column.name_str()
                )
            })?),
            Float(value) => CoreValue::F64(value as f64),
            Double(value) => CoreValue::F64(value),
            Bytes(bytes) if is_binary(column) => CoreValue::Bytes(bytes),
            Bytes(bytes) => match String::from_utf8(bytes) {
                Ok(value) => CoreValue::String(value),
                Err(e) => CoreValue::Bytes(e.into_bytes()),
            },
            Date(year, month, day, hour, minute, second, micros) => {
                let timestamp = NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32)
                    .and_then(|date| {
                        date.and_hms_micro_opt(hour as u32, minute as u32, second as u32, micros)
                    })
                    .ok_or_else(|| {
                        err!("invalid date in column `{}`", column.name_str())
                    })?;
                CoreValue::Timestamp(timestamp)
            }
            Time(negative, days, hours, minutes, seconds, micros) => {
                let sign = if negative { "-" } else { "" };
                let hours = days * 24 + hours as u32;
                CoreValue::String(format!(
                    "{sign}{hours:02}:{minutes:02}:{seconds:02}.{micros:06}"
                ))
            }
        })
    }
}

fn is_binary(column: &Column) -> bool {
    column.character_set() == BINARY_CHARSET
        && matches!(
            column.column_type(),
            ColumnType::MYSQL_TYPE_BLOB
                | ColumnType::MYSQL_TYPE_TINY_BLOB
                | ColumnType::MYSQL_TYPE_MEDIUM_BLOB
                | ColumnType::MYSQL_TYPE_LONG_BLOB
                | ColumnType::MYSQL_TYPE_STRING
                | ColumnType::MYSQL_TYPE_VAR_STRING
                | ColumnType::MYSQL_TYPE_VARCHAR
        )
}

fn timestamp(value: &NaiveDateTime) -> mysql_async::Value {
    mysql_async::Value::Date(
        value.year() as u16,
        value.month() as u8,
        value.day() as u8,
        value.hour() as u8,
        value.minute() as u8,
        value.second() as u8,
        value.nanosecond() / 1_000,
    )
}

impl ToValue for Value {
    fn to_value(&self) -> mysql_async::Value {
        match &self.0 {
            CoreValue::Bool(value) => value.to_value(),
            CoreValue::I16(value) => value.to_value(),
            CoreValue::I32(value) => value.to_value(),
            CoreValue::I64(value) => value.to_value(),
            CoreValue::F64(value) => value.to_value(),
            CoreValue::String(value) => value.to_value(),
            CoreValue::Bytes(value) => value.to_value(),
            CoreValue::Uuid(value) => value.to_string().to_value(),
            CoreValue::Timestamp(value) => timestamp(value),
            CoreValue::Null => mysql_async::Value::NULL,
        }
    }
}
