use chrono::{DateTime, FixedOffset};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::{CoercionError, RecordError};

/// Pattern of the `time` field, e.g. `10/Oct/2023:13:55:36 +0000`.
pub const TIME_FORMAT: &str = "%d/%b/%Y:%H:%M:%S %z";

/// One raw log line as a JSON object. Unknown fields are kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    fields: Map<String, Value>,
}

/// A record whose typed fields have been coerced, ready to be indexed.
///
/// Serializes as a flat object: the three typed fields followed by every
/// other field of the source line, untouched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AccessLogDocument {
    pub time: DateTime<FixedOffset>,
    pub response: i32,
    pub bytes: i64,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Result of coercing a well-formed record: either a document to index, or
/// the value error that drops it.
pub type Coerced = Result<AccessLogDocument, CoercionError>;

impl LogRecord {
    /// Parse one input line. Anything other than a JSON object is an error.
    pub fn parse(line: &str) -> Result<Self, RecordError> {
        match serde_json::from_str::<Value>(line)? {
            Value::Object(fields) => Ok(Self { fields }),
            other => Err(RecordError::NotAnObject(json_kind(&other))),
        }
    }

    /// Coerce `time`, `response` and `bytes`, in that order.
    ///
    /// Each field is looked up right before it is converted, so an absent
    /// field is only reported once every earlier field converted cleanly.
    /// An absent field makes the record unusable (outer `Err`); a bad value
    /// only drops it (inner `Err`).
    pub fn coerce(mut self) -> Result<Coerced, RecordError> {
        let raw = take(&mut self.fields, "time")?;
        let time = match parse_time(&raw) {
            Ok(time) => time,
            Err(e) => return Ok(Err(e)),
        };

        let raw = take(&mut self.fields, "response")?;
        let response = match parse_integer("response", &raw).and_then(|v| {
            i32::try_from(v).map_err(|_| CoercionError::OutOfRange {
                field: "response",
                value: v.to_string(),
            })
        }) {
            Ok(response) => response,
            Err(e) => return Ok(Err(e)),
        };

        let raw = take(&mut self.fields, "bytes")?;
        let bytes = match parse_integer("bytes", &raw) {
            Ok(bytes) => bytes,
            Err(e) => return Ok(Err(e)),
        };

        Ok(Ok(AccessLogDocument {
            time,
            response,
            bytes,
            fields: self.fields,
        }))
    }
}

fn take(fields: &mut Map<String, Value>, field: &'static str) -> Result<Value, RecordError> {
    fields.remove(field).ok_or(RecordError::MissingField(field))
}

fn parse_time(value: &Value) -> Result<DateTime<FixedOffset>, CoercionError> {
    let Value::String(raw) = value else {
        return Err(CoercionError::InvalidTime {
            value: value.to_string(),
            reason: format!("expected a string, found {}", json_kind(value)),
        });
    };
    DateTime::parse_from_str(raw, TIME_FORMAT).map_err(|e| CoercionError::InvalidTime {
        value: raw.clone(),
        reason: e.to_string(),
    })
}

/// Integer coercion: JSON integers, finite floats (truncated toward zero),
/// booleans, and decimal strings with optional sign, surrounding whitespace
/// and digit-separating underscores.
fn parse_integer(field: &'static str, value: &Value) -> Result<i64, CoercionError> {
    let invalid = || CoercionError::InvalidInteger {
        field,
        value: value.to_string(),
    };
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Ok(i);
            }
            let f = n.as_f64().ok_or_else(invalid)?;
            if !f.is_finite() || f >= i64::MAX as f64 || f < i64::MIN as f64 {
                return Err(CoercionError::OutOfRange {
                    field,
                    value: n.to_string(),
                });
            }
            Ok(f.trunc() as i64)
        }
        Value::Bool(b) => Ok(i64::from(*b)),
        Value::String(s) => {
            let trimmed = s.trim();
            let (sign, digits) = match trimmed.strip_prefix('-') {
                Some(rest) => ("-", rest),
                None => ("", trimmed.strip_prefix('+').unwrap_or(trimmed)),
            };
            // Single underscores may separate digits: "1_000".
            if digits.split('_').any(|group| {
                group.is_empty() || !group.bytes().all(|b| b.is_ascii_digit())
            }) {
                return Err(invalid());
            }
            format!("{sign}{}", digits.replace('_', ""))
                .parse::<i64>()
                .map_err(|_| CoercionError::OutOfRange {
                    field,
                    value: s.clone(),
                })
        }
        _ => Err(invalid()),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
