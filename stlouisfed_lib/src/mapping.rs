//! Turns the flat `Value` lists returned by [`Client::fetch`] into typed
//! records.
//!
//! [`Client::fetch`]: stlouisfed_api::Client::fetch

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use stlouisfed_api::types::de::{parse_value, EMPTY_VALUE};
use stlouisfed_api::types::{RegionalObservation, Shape, VintageObservation};
use stlouisfed_api::Error;

fn decode_error(endpoint: &str, reason: impl std::fmt::Display) -> Error {
    tracing::error!("Failed to decode {} response: {}", endpoint, reason);
    Error::Decode {
        url: endpoint.to_string(),
        reason: reason.to_string(),
    }
}

/// Deserializes every record.
pub fn records<T: DeserializeOwned>(endpoint: &str, values: Vec<Value>) -> Result<Vec<T>, Error> {
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).map_err(|e| decode_error(endpoint, e)))
        .collect()
}

/// Deserializes the first record; single-item endpoints still answer with a list.
pub fn first<T: DeserializeOwned>(endpoint: &str, values: Vec<Value>) -> Result<T, Error> {
    let value = values
        .into_iter()
        .next()
        .ok_or_else(|| decode_error(endpoint, "response contained no records"))?;
    serde_json::from_value(value).map_err(|e| decode_error(endpoint, e))
}

/// `series/vintagedates` returns bare date strings.
pub fn dates(endpoint: &str, values: Vec<Value>) -> Result<Vec<NaiveDate>, Error> {
    records(endpoint, values)
}

fn cell_value(endpoint: &str, column: &str, value: &Value) -> Result<Option<f64>, Error> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => Ok(n.as_f64()),
        Value::String(s) => {
            parse_value(s).map_err(|e| decode_error(endpoint, format!("column {}: {}", column, e)))
        }
        other => Err(decode_error(
            endpoint,
            format!("column {}: unexpected value {}", column, other),
        )),
    }
}

/// Rows of the `all` and `new_and_revised` output types: a `date` column
/// plus one column per vintage. Missing values (`"."`) become `None`.
pub fn vintage_observations(endpoint: &str, values: Vec<Value>) -> Result<Vec<VintageObservation>, Error> {
    values
        .into_iter()
        .map(|row| {
            let Value::Object(mut row) = row else {
                return Err(decode_error(endpoint, "observation row is not an object"));
            };
            let date = row
                .remove("date")
                .ok_or_else(|| decode_error(endpoint, "observation row has no date"))?;
            let date: NaiveDate = serde_json::from_value(date).map_err(|e| decode_error(endpoint, e))?;

            let mut columns = BTreeMap::new();
            for (column, value) in &row {
                columns.insert(column.clone(), cell_value(endpoint, column, value)?);
            }
            Ok(VintageObservation { date, values: columns })
        })
        .collect()
}

/// Period keys are full dates (`2022-01-01`); bare years are read as January 1st.
fn period_key(endpoint: &str, key: &str) -> Result<NaiveDate, Error> {
    if let Ok(date) = NaiveDate::parse_from_str(key, "%Y-%m-%d") {
        return Ok(date);
    }
    key.parse::<i32>()
        .ok()
        .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .ok_or_else(|| decode_error(endpoint, format!("unrecognized period \"{}\"", key)))
}

/// Flattens `meta.data`, an object keyed by period whose values are lists of
/// region rows, into one row per region and period.
pub fn regional_observations(endpoint: &str, values: Vec<Value>) -> Result<Vec<RegionalObservation>, Error> {
    let mut rows = Vec::new();
    for value in values {
        let Value::Object(periods) = value else {
            return Err(decode_error(endpoint, "regional data is not keyed by period"));
        };
        for (period, regions) in periods {
            let year = period_key(endpoint, &period)?;
            let Value::Array(regions) = regions else {
                return Err(decode_error(endpoint, format!("period {} is not a list", period)));
            };
            for region in regions {
                let Value::Object(mut region) = region else {
                    return Err(decode_error(endpoint, "region row is not an object"));
                };
                region.insert("year".to_string(), Value::String(year.to_string()));
                if region.get("value").is_none() {
                    region.insert("value".to_string(), Value::String(EMPTY_VALUE.to_string()));
                }
                rows.push(serde_json::from_value(Value::Object(region)).map_err(|e| decode_error(endpoint, e))?);
            }
        }
    }
    Ok(rows)
}

/// Shape attributes arrive with spaces in their names (`report name`).
pub fn shapes(endpoint: &str, values: Vec<Value>) -> Result<Vec<Shape>, Error> {
    let values = values
        .into_iter()
        .map(|value| match value {
            Value::Object(fields) => Value::Object(
                fields
                    .into_iter()
                    .map(|(k, v)| (k.replace(' ', "_"), v))
                    .collect::<Map<String, Value>>(),
            ),
            other => other,
        })
        .collect();
    records(endpoint, values)
}
