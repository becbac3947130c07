//! Tool argument validation.
//!
//! Every field is checked before a tool runs, and all problems are reported
//! together as `field: reason` pairs.

use crate::{McpError, McpResult};
use serde_json::{Map, Value};

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Collects validation issues while reading fields out of a tool input.
#[derive(Debug)]
pub struct Arguments<'a> {
    fields: Option<&'a Map<String, Value>>,
    issues: Vec<String>,
}

impl<'a> Arguments<'a> {
    /// Start validating `input`, which must be a JSON object.
    pub fn new(input: &'a Value) -> Self {
        match input {
            Value::Object(fields) => Self {
                fields: Some(fields),
                issues: Vec::new(),
            },
            // Clients may omit arguments entirely for tools with no required fields.
            Value::Null => Self {
                fields: None,
                issues: Vec::new(),
            },
            other => Self {
                fields: None,
                issues: vec![format!(
                    "(root): Expected object, received {}",
                    type_name(other)
                )],
            },
        }
    }

    fn get(&self, field: &str) -> Option<&'a Value> {
        self.fields
            .and_then(|fields| fields.get(field))
            .filter(|value| !value.is_null())
    }

    fn issue(&mut self, field: &str, reason: impl AsRef<str>) {
        self.issues.push(format!("{field}: {}", reason.as_ref()));
    }

    /// A string field that may be absent or null.
    pub fn optional_str(&mut self, field: &str) -> Option<String> {
        match self.get(field)? {
            Value::String(s) => Some(s.clone()),
            other => {
                let reason = format!("Expected string, received {}", type_name(other));
                self.issue(field, reason);
                None
            }
        }
    }

    /// A string field that must be present.
    ///
    /// Returns an empty string when the field is missing or mistyped; the
    /// issue is reported by [`Arguments::finish`].
    pub fn required_str(&mut self, field: &str) -> String {
        if self.get(field).is_none() {
            self.issue(field, "Required");
            return String::new();
        }
        self.optional_str(field).unwrap_or_default()
    }

    /// An integer field within `min..=max`, or `default` when absent.
    pub fn bounded_int(&mut self, field: &str, min: u64, max: u64, default: u64) -> u64 {
        let Some(value) = self.get(field) else {
            return default;
        };
        let Value::Number(number) = value else {
            let reason = format!("Expected number, received {}", type_name(value));
            self.issue(field, reason);
            return default;
        };
        // Whole floats such as `10.0` count; `as` saturates out-of-range values.
        let n = match number.as_i64() {
            Some(n) => n,
            None => match number.as_f64() {
                Some(f) if f.fract() == 0.0 => f as i64,
                _ => {
                    self.issue(field, "Expected integer, received float");
                    return default;
                }
            },
        };
        if n < min as i64 {
            self.issue(field, format!("Number must be greater than or equal to {min}"));
            return default;
        }
        if n as u64 > max {
            self.issue(field, format!("Number must be less than or equal to {max}"));
            return default;
        }
        n as u64
    }

    /// Record `reason` against `field` unless `ok` holds.
    pub fn ensure(&mut self, ok: bool, field: &str, reason: impl AsRef<str>) {
        if !ok {
            self.issue(field, reason);
        }
    }

    /// Fail with every collected issue, if any.
    ///
    /// # Errors
    ///
    /// [`McpError::InvalidInput`] listing each `field: reason`, comma-separated.
    pub fn finish(self) -> McpResult<()> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(McpError::InvalidInput(self.issues.join(", ")))
        }
    }
}
