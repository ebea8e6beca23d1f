use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::Value;
use sqlx::postgres::PgRow;
use sqlx::{Connection, PgConnection, Row, TypeInfo, ValueRef};
use tracing::debug;

use crate::error::SurnameError;
use crate::model::SurnameRecord;
use crate::query::SurnameQuery;

/// Where surname rows come from.
#[async_trait]
pub trait SurnameSource: Send + Sync {
    async fn fetch(
        &self,
        database_url: &str,
        query: &SurnameQuery,
    ) -> Result<Vec<SurnameRecord>, SurnameError>;
}

/// Reads from Postgres over a connection opened for the one call.
#[derive(Debug, Clone, Copy, Default)]
pub struct PgSurnameSource;

#[async_trait]
impl SurnameSource for PgSurnameSource {
    async fn fetch(
        &self,
        database_url: &str,
        query: &SurnameQuery,
    ) -> Result<Vec<SurnameRecord>, SurnameError> {
        // Dropping the connection on an early return closes the socket.
        let mut conn = PgConnection::connect(database_url).await?;

        let rows = match query {
            SurnameQuery::ByDate(date) => {
                sqlx::query(query.sql())
                    .bind(date.as_str())
                    .fetch_all(&mut conn)
                    .await?
            }
            SurnameQuery::Recent => sqlx::query(query.sql()).fetch_all(&mut conn).await?,
        };
        debug!(rows = rows.len(), kind = query.kind(), "fetched surnames");

        let records = rows
            .iter()
            .map(decode_record)
            .collect::<Result<Vec<_>, _>>()?;

        conn.close().await?;
        Ok(records)
    }
}

fn decode_record(row: &PgRow) -> Result<SurnameRecord, SurnameError> {
    let id = integer(row, "id")?
        .ok_or_else(|| sqlx::Error::Decode("surnames.id is NULL".into()))?;

    Ok(SurnameRecord {
        id,
        surname: row.try_get("surname")?,
        date: row.try_get::<Option<NaiveDate>, _>("date")?,
        color: opaque(row, "color")?,
        counter: integer(row, "counter")?,
        linked_id: opaque(row, "linked_id")?,
    })
}

/// Postgres column types the row decoder knows how to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Text,
    Int2,
    Int4,
    Int8,
    Float4,
    Float8,
    Bool,
    Json,
    Date,
    Uuid,
}

impl ColumnKind {
    fn from_type_name(name: &str) -> Option<Self> {
        let kind = match name {
            "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" => ColumnKind::Text,
            "INT2" => ColumnKind::Int2,
            "INT4" => ColumnKind::Int4,
            "INT8" => ColumnKind::Int8,
            "FLOAT4" => ColumnKind::Float4,
            "FLOAT8" => ColumnKind::Float8,
            "BOOL" => ColumnKind::Bool,
            "JSON" | "JSONB" => ColumnKind::Json,
            "DATE" => ColumnKind::Date,
            "UUID" => ColumnKind::Uuid,
            _ => return None,
        };
        Some(kind)
    }
}

/// `None` for SQL NULL.
fn column_kind(row: &PgRow, column: &str) -> Result<Option<ColumnKind>, SurnameError> {
    let raw = row.try_get_raw(column)?;
    if raw.is_null() {
        return Ok(None);
    }

    let type_info = raw.type_info();
    ColumnKind::from_type_name(type_info.name())
        .map(Some)
        .ok_or_else(|| SurnameError::UnsupportedColumnType {
            column: column.to_string(),
            type_name: type_info.name().to_string(),
        })
}

fn not_an_integer(column: &str, kind: ColumnKind) -> SurnameError {
    SurnameError::UnsupportedColumnType {
        column: column.to_string(),
        type_name: format!("{kind:?}"),
    }
}

/// Any Postgres integer width, widened to i64.
fn integer(row: &PgRow, column: &str) -> Result<Option<i64>, SurnameError> {
    let Some(kind) = column_kind(row, column)? else {
        return Ok(None);
    };

    let value = match kind {
        ColumnKind::Int2 => i64::from(row.try_get::<i16, _>(column)?),
        ColumnKind::Int4 => i64::from(row.try_get::<i32, _>(column)?),
        ColumnKind::Int8 => row.try_get::<i64, _>(column)?,
        other => return Err(not_an_integer(column, other)),
    };
    Ok(Some(value))
}

/// Renders a column of unknown type as the closest JSON value.
fn opaque(row: &PgRow, column: &str) -> Result<Value, SurnameError> {
    let Some(kind) = column_kind(row, column)? else {
        return Ok(Value::Null);
    };

    let value = match kind {
        ColumnKind::Text => Value::from(row.try_get::<String, _>(column)?),
        ColumnKind::Int2 | ColumnKind::Int4 | ColumnKind::Int8 => {
            Value::from(integer(row, column)?)
        }
        ColumnKind::Float4 => Value::from(f64::from(row.try_get::<f32, _>(column)?)),
        ColumnKind::Float8 => Value::from(row.try_get::<f64, _>(column)?),
        ColumnKind::Bool => Value::from(row.try_get::<bool, _>(column)?),
        ColumnKind::Json => row.try_get::<Value, _>(column)?,
        ColumnKind::Date => Value::from(row.try_get::<NaiveDate, _>(column)?.to_string()),
        ColumnKind::Uuid => Value::from(row.try_get::<sqlx::types::Uuid, _>(column)?.to_string()),
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_like_types_share_one_kind() {
        for name in ["TEXT", "VARCHAR", "BPCHAR", "NAME"] {
            assert_eq!(ColumnKind::from_type_name(name), Some(ColumnKind::Text), "{name}");
        }
    }

    #[test]
    fn integer_widths_are_recognised() {
        assert_eq!(ColumnKind::from_type_name("INT2"), Some(ColumnKind::Int2));
        assert_eq!(ColumnKind::from_type_name("INT4"), Some(ColumnKind::Int4));
        assert_eq!(ColumnKind::from_type_name("INT8"), Some(ColumnKind::Int8));
    }

    #[test]
    fn passthrough_types_are_recognised() {
        assert_eq!(ColumnKind::from_type_name("JSONB"), Some(ColumnKind::Json));
        assert_eq!(ColumnKind::from_type_name("JSON"), Some(ColumnKind::Json));
        assert_eq!(ColumnKind::from_type_name("UUID"), Some(ColumnKind::Uuid));
        assert_eq!(ColumnKind::from_type_name("DATE"), Some(ColumnKind::Date));
        assert_eq!(ColumnKind::from_type_name("BOOL"), Some(ColumnKind::Bool));
        assert_eq!(ColumnKind::from_type_name("FLOAT8"), Some(ColumnKind::Float8));
    }

    #[test]
    fn unknown_types_have_no_kind() {
        assert_eq!(ColumnKind::from_type_name("POINT"), None);
        assert_eq!(ColumnKind::from_type_name("text"), None);
    }
}
