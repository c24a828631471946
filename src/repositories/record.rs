// src/repositories/record.rs
//
// Capability contracts for the generic repository, plus row helpers.
//
// A record only has to say two things about itself to be persisted:
// its identity (if it has one yet) and its column values in writable order.
// Reading back is a row mapper that tolerates partial projections.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{FromSql, ToSql, Value};
use rusqlite::Row;

use crate::error::AppResult;

/// Read model: built from one result row.
pub trait Record: Sized + Send + 'static {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Write model: what a save needs from a record.
pub trait Insertable: Send + Sync {
    type Id: ToSql;

    /// `None` until the store has assigned one.
    fn id(&self) -> Option<&Self::Id>;

    /// Values matching `Columns::for_insert()` one-to-one.
    fn values(&self) -> AppResult<Vec<Value>>;
}

fn is_missing_column(err: &rusqlite::Error) -> bool {
    matches!(err, rusqlite::Error::InvalidColumnName(_))
}

/// Read `name`, or `T::default()` if the projection did not include it.
pub fn column_or_default<T>(row: &Row<'_>, name: &str) -> rusqlite::Result<T>
where
    T: FromSql + Default,
{
    match row.get::<_, T>(name) {
        Ok(value) => Ok(value),
        Err(err) if is_missing_column(&err) => Ok(T::default()),
        Err(err) => Err(err),
    }
}

pub fn format_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Millis, true)
}

pub fn parse_timestamp(raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

/// Nullable (or unprojected) RFC 3339 column.
pub fn timestamp_column(row: &Row<'_>, name: &str) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = column_or_default(row, name)?;
    raw.map(|s| parse_timestamp(&s)).transpose()
}

/// Opaque JSON column; `Null` when absent from the projection.
pub fn json_column(row: &Row<'_>, name: &str) -> rusqlite::Result<serde_json::Value> {
    let raw: Option<String> = column_or_default(row, name)?;
    match raw {
        Some(text) => serde_json::from_str(&text)
            .map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e))),
        None => Ok(serde_json::Value::Null),
    }
}

pub fn text_value(value: Option<&str>) -> Value {
    value.map_or(Value::Null, |v| Value::Text(v.to_string()))
}

pub fn timestamp_value(value: Option<&DateTime<Utc>>) -> Value {
    value.map_or(Value::Null, |v| Value::Text(format_timestamp(v)))
}

/// Payloads are written whole, as one serialized document.
pub fn json_value(value: &serde_json::Value) -> AppResult<Value> {
    Ok(Value::Text(serde_json::to_string(value)?))
}
