//! String to typed value conversion.

use std::fmt;

use thiserror::Error;

use super::PropertyType;

/// A converted property value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    String(String),
    Int(i32),
    Boolean(bool),
    Float(f32),
    Double(f64),
}

impl Value {
    /// The property type this value was converted to.
    pub fn kind(&self) -> PropertyType {
        match self {
            Value::String(_) => PropertyType::String,
            Value::Int(_) => PropertyType::Int,
            Value::Boolean(_) => PropertyType::Boolean,
            Value::Float(_) => PropertyType::Float,
            Value::Double(_) => PropertyType::Double,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::String(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{i}"),
            Value::Boolean(b) => write!(f, "{b}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Double(x) => write!(f, "{x}"),
        }
    }
}

impl From<Value> for toml::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::String(s) => toml::Value::String(s),
            Value::Int(i) => toml::Value::Integer(i64::from(i)),
            Value::Boolean(b) => toml::Value::Boolean(b),
            Value::Float(x) => toml::Value::Float(f64::from(x)),
            Value::Double(x) => toml::Value::Float(x),
        }
    }
}

/// Raised when a raw string cannot be converted to a numeric type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("'{raw}' is not a valid {target}")]
pub struct ConversionError {
    pub raw: String,
    pub target: PropertyType,
}

/// Converts a raw property string to `kind`.
///
/// `Boolean` is permissive: only a case-insensitive `"true"` yields `true`,
/// every other input (including the empty string) yields `false` and never
/// fails. `Int`, `Float` and `Double` reject malformed input.
pub fn convert(raw: &str, kind: PropertyType) -> Result<Value, ConversionError> {
    let fail = || ConversionError {
        raw: raw.to_string(),
        target: kind,
    };

    match kind {
        PropertyType::String => Ok(Value::String(raw.to_string())),
        PropertyType::Boolean => Ok(Value::Boolean(raw.eq_ignore_ascii_case("true"))),
        PropertyType::Int => raw.parse::<i32>().map(Value::Int).map_err(|_| fail()),
        PropertyType::Float => float_literal(raw)
            .ok_or_else(fail)?
            .parse::<f32>()
            .map(Value::Float)
            .map_err(|_| fail()),
        PropertyType::Double => float_literal(raw)
            .ok_or_else(fail)?
            .parse::<f64>()
            .map(Value::Double)
            .map_err(|_| fail()),
    }
}

/// Trims whitespace and one trailing `f`/`d` type suffix (`1.5f`, `2d`).
///
/// Non-finite values must be spelled exactly `NaN` or `Infinity` (optionally
/// signed). Rust's float parser also takes `inf`, `nan` and any letter case;
/// those return `None`.
fn float_literal(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    let literal = match trimmed.strip_suffix(['f', 'F', 'd', 'D']) {
        Some(rest) if rest.ends_with(|c: char| c.is_ascii_digit() || c == '.') => rest,
        _ => trimmed,
    };

    let unsigned = literal.strip_prefix(['+', '-']).unwrap_or(literal);
    let numeric = unsigned
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | 'e' | 'E' | '+' | '-'));
    (numeric || matches!(unsigned, "NaN" | "Infinity")).then_some(literal)
}
