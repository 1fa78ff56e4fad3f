//! Conversion of BigQuery's string-encoded cells into typed values.

use chrono::{DateTime, TimeZone, Utc};
use forecast_common::{Column, ColumnType, Value};

use crate::error::{WarehouseError, WarehouseResult};
use crate::wire::{TableFieldSchema, TableRow};

/// Result columns for a response schema.
pub fn columns(fields: &[TableFieldSchema]) -> Vec<Column> {
    fields
        .iter()
        .map(|field| Column {
            name: field.name.clone(),
            column_type: ColumnType::from_type_name(&field.field_type),
            repeated: field.is_repeated(),
        })
        .collect()
}

/// Decode one row against the response schema.
pub fn row(fields: &[TableFieldSchema], row: &TableRow) -> WarehouseResult<Vec<Value>> {
    fields
        .iter()
        .enumerate()
        .map(|(idx, field)| match row.f.get(idx) {
            Some(cell) => cell_value(field, &cell.v),
            None => Ok(Value::Null),
        })
        .collect()
}

fn cell_value(field: &TableFieldSchema, raw: &serde_json::Value) -> WarehouseResult<Value> {
    if raw.is_null() {
        return Ok(Value::Null);
    }
    if !field.is_repeated() {
        return scalar(field, raw);
    }

    let items = raw.as_array().ok_or_else(|| {
        WarehouseError::Decode(format!("expected array for repeated field '{}'", field.name))
    })?;
    items
        .iter()
        .map(|item| scalar(field, item.get("v").unwrap_or(&serde_json::Value::Null)))
        .collect::<WarehouseResult<Vec<_>>>()
        .map(Value::Array)
}

fn scalar(field: &TableFieldSchema, raw: &serde_json::Value) -> WarehouseResult<Value> {
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let column_type = ColumnType::from_type_name(&field.field_type);
    if column_type == ColumnType::Record {
        return record(field, raw);
    }

    let text = raw.as_str().ok_or_else(|| {
        WarehouseError::Decode(format!(
            "expected string cell for field '{}', got {}",
            field.name, raw
        ))
    })?;
    let invalid = || {
        WarehouseError::Decode(format!(
            "invalid {} value '{}' in field '{}'",
            field.field_type, text, field.name
        ))
    };

    let value = match column_type {
        ColumnType::Integer => Value::Integer(text.parse().map_err(|_| invalid())?),
        ColumnType::Float => Value::Float(text.parse().map_err(|_| invalid())?),
        ColumnType::Boolean => match text.to_ascii_lowercase().as_str() {
            "true" => Value::Bool(true),
            "false" => Value::Bool(false),
            _ => return Err(invalid()),
        },
        ColumnType::Timestamp => Value::Timestamp(timestamp(text).ok_or_else(invalid)?),
        _ => Value::Text(text.to_string()),
    };
    Ok(value)
}

fn record(field: &TableFieldSchema, raw: &serde_json::Value) -> WarehouseResult<Value> {
    let cells = raw
        .get("f")
        .and_then(|f| f.as_array())
        .ok_or_else(|| WarehouseError::Decode(format!("expected record for field '{}'", field.name)))?;

    field
        .fields
        .iter()
        .enumerate()
        .map(|(idx, sub)| {
            let raw = cells
                .get(idx)
                .and_then(|c| c.get("v"))
                .unwrap_or(&serde_json::Value::Null);
            Ok((sub.name.clone(), cell_value(sub, raw)?))
        })
        .collect::<WarehouseResult<Vec<_>>>()
        .map(Value::Record)
}

/// Parse a TIMESTAMP cell: integer microseconds since the epoch, or
/// floating-point seconds (the encoding used without int64 timestamps).
pub fn timestamp(text: &str) -> Option<DateTime<Utc>> {
    // Integer cells are read as microseconds only because every request sets
    // `formatOptions.useInt64Timestamp` (see `wire::FormatOptions`).
    if let Ok(micros) = text.parse::<i64>() {
        let secs = micros.div_euclid(1_000_000);
        let nanos = (micros.rem_euclid(1_000_000) * 1_000) as u32;
        return Utc.timestamp_opt(secs, nanos).single();
    }

    let seconds: f64 = text.parse().ok()?;
    if !seconds.is_finite() {
        return None;
    }
    let whole = seconds.floor();
    let nanos = (((seconds - whole) * 1e9).round() as u32).min(999_999_999);
    Utc.timestamp_opt(whole as i64, nanos).single()
}
