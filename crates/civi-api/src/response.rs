//! Decoding of the `{is_error, values[]}` response envelope.

use serde_json::Value;

use crate::error::ApiError;

/// A successful CRM response with the envelope already checked.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ApiResponse {
    /// Total rows matched, when the CRM reports it.
    pub count: Option<u64>,
    /// Returned rows. Id-keyed objects are flattened into a list.
    pub values: Vec<Value>,
    /// Id of a created or updated record.
    pub id: Option<i64>,
    /// Bare result for scalar actions such as `getcount`.
    pub result: Option<Value>,
}

impl ApiResponse {
    /// Decode a raw JSON envelope, turning `is_error` into [`ApiError::Crm`].
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Crm`] if the envelope is flagged as an error, or
    /// [`ApiError::Parse`] if it is not a JSON object.
    pub fn from_envelope(envelope: Value) -> Result<Self, ApiError> {
        // Scalar actions may answer with a bare number.
        if let Some(n) = envelope.as_u64() {
            return Ok(Self {
                result: Some(Value::from(n)),
                ..Self::default()
            });
        }

        let mut map = match envelope {
            Value::Object(map) => map,
            other => {
                return Err(ApiError::Parse(format!(
                    "expected a JSON object envelope, got {other}"
                )));
            }
        };

        if map.get("is_error").is_some_and(truthy) {
            let message = map
                .get("error_message")
                .and_then(Value::as_str)
                .unwrap_or("unknown CRM error")
                .to_string();
            let code = map.get("error_code").and_then(|c| match c {
                Value::String(s) => Some(s.clone()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            });
            return Err(ApiError::Crm { message, code });
        }

        let values = match map.remove("values") {
            Some(Value::Array(rows)) => rows,
            Some(Value::Object(rows)) => rows.into_iter().map(|(_, row)| row).collect(),
            Some(Value::Null) | None => Vec::new(),
            Some(scalar) => {
                map.entry("result").or_insert(scalar);
                Vec::new()
            }
        };

        Ok(Self {
            count: map.get("count").and_then(as_u64_lenient),
            values,
            id: map.get("id").and_then(as_i64_lenient),
            result: map.remove("result"),
        })
    }

    /// Unwrap a response expected to hold exactly one row.
    ///
    /// Returns `Ok(None)` when no row matched.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Parse`] when more than one row came back.
    pub fn single(self) -> Result<Option<Value>, ApiError> {
        let mut values = self.values;
        match values.len() {
            0 => Ok(None),
            1 => Ok(values.pop()),
            n => Err(ApiError::Parse(format!("expected at most one row, got {n}"))),
        }
    }

    /// The number answered by a `getcount` call.
    ///
    /// Accepts the count as a bare `result`, a scalar `values`, or the
    /// envelope `count`.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Parse`] when no numeric count is present.
    pub fn count_value(&self) -> Result<u64, ApiError> {
        self.result
            .as_ref()
            .and_then(as_u64_lenient)
            .or(self.count)
            .ok_or_else(|| ApiError::Parse("response carries no count".into()))
    }
}

fn truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        _ => false,
    }
}

/// Read a non-negative integer that may be encoded as a string.
pub fn as_u64_lenient(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read an integer that may be encoded as a string.
pub fn as_i64_lenient(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
