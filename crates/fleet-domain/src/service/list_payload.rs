//! Shape detection for the vehicle list endpoint
//!
//! Deployments answer either `{ "items": [...] }` (paginated) or a bare
//! array. Anything else is reported as unrecognized. Records inside a
//! recognized array are decoded one by one; invalid ones are skipped.

use fleet_types::Vehicle;
use serde_json::Value;
use tracing::warn;

/// Recognized (or not) body of the list endpoint
#[derive(Debug, Clone, PartialEq)]
pub enum ListPayload {
    /// `{ "items": Vehicle[] }`
    Paged(Vec<Vehicle>),
    /// `Vehicle[]`
    Bare(Vec<Vehicle>),
    /// Neither shape; carries a short description for logging
    Unrecognized(String),
}

impl ListPayload {
    /// Classify a decoded JSON body
    pub fn detect(body: Value) -> Self {
        match body {
            Value::Object(mut map) => match map.remove("items") {
                Some(Value::Array(items)) => ListPayload::Paged(decode_records(items)),
                Some(_) => ListPayload::Unrecognized("'items' is not an array".to_string()),
                None => ListPayload::Unrecognized("object without 'items'".to_string()),
            },
            Value::Array(items) => ListPayload::Bare(decode_records(items)),
            other => ListPayload::Unrecognized(format!("unexpected JSON {}", kind_of(&other))),
        }
    }

    /// The vehicles, if the shape was recognized
    pub fn into_vehicles(self) -> Result<Vec<Vehicle>, String> {
        match self {
            ListPayload::Paged(v) | ListPayload::Bare(v) => Ok(v),
            ListPayload::Unrecognized(reason) => Err(reason),
        }
    }
}

/// Decode each record on its own, dropping the ones that do not fit
fn decode_records(items: Vec<Value>) -> Vec<Vehicle> {
    let total = items.len();
    let vehicles: Vec<Vehicle> = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value(item) {
            Ok(vehicle) => Some(vehicle),
            Err(e) => {
                warn!(index, error = %e, "skipping invalid vehicle record");
                None
            }
        })
        .collect();
    if vehicles.len() != total {
        warn!(kept = vehicles.len(), total, "some vehicle records were skipped");
    }
    vehicles
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
