//! Typed device variables and the coercion rules that produce them.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::error::{ClientError, Result};

/// Literal that coerces to `true`.
pub const ENABLED: &str = "enabled";
/// Literal that coerces to `false`.
pub const DISABLED: &str = "disabled";
/// Marker that opens a writeable `GET TYPE` report.
pub const READ_WRITE_MARKER: &str = "RW";

/// The value of a variable after coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum VariableValue {
    Text(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
}

impl VariableValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            VariableValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            VariableValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            VariableValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// The value as a float; integers widen.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            VariableValue::Float(f) => Some(*f),
            VariableValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VariableValue::Text(s) => f.write_str(s),
            VariableValue::Bool(true) => f.write_str(ENABLED),
            VariableValue::Bool(false) => f.write_str(DISABLED),
            VariableValue::Integer(i) => write!(f, "{i}"),
            VariableValue::Float(v) => write!(f, "{v}"),
        }
    }
}

/// A variable's type tag.
///
/// Wire types come from `GET TYPE`; `Float64` and `Integer` are only ever
/// produced by coercion.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum VariableType {
    Unknown,
    Number,
    String,
    Enum,
    Range,
    Float64,
    Integer,
    Other(String),
}

impl VariableType {
    pub fn from_wire(tag: &str) -> Self {
        match tag {
            "UNKNOWN" => VariableType::Unknown,
            "NUMBER" => VariableType::Number,
            "STRING" => VariableType::String,
            "ENUM" => VariableType::Enum,
            "RANGE" => VariableType::Range,
            "FLOAT_64" => VariableType::Float64,
            "INTEGER" => VariableType::Integer,
            other => VariableType::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            VariableType::Unknown => "UNKNOWN",
            VariableType::Number => "NUMBER",
            VariableType::String => "STRING",
            VariableType::Enum => "ENUM",
            VariableType::Range => "RANGE",
            VariableType::Float64 => "FLOAT_64",
            VariableType::Integer => "INTEGER",
            VariableType::Other(tag) => tag,
        }
    }

    /// Types whose raw values are eligible for numeric coercion.
    pub fn is_numeric_candidate(&self) -> bool {
        matches!(self, VariableType::Unknown | VariableType::Number)
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for VariableType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A single variable of a device.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Variable {
    pub name: String,
    pub value: VariableValue,
    #[serde(rename = "type")]
    pub var_type: VariableType,
    pub description: String,
    pub writeable: bool,
    /// Bound on string length; only set for length-bounded writeable types.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub maximum_length: Option<usize>,
    /// Declared type before numeric coercion replaced it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_type: Option<VariableType>,
}

/// Result of coercing one raw value.
#[derive(Debug, Clone, PartialEq)]
pub struct Coerced {
    pub value: VariableValue,
    pub var_type: VariableType,
    pub original_type: Option<VariableType>,
}

/// Turn a raw wire value into a typed value.
///
/// `enabled`/`disabled` always become booleans, whatever the declared type,
/// including writeable strings that happen to hold those words. Otherwise
/// `UNKNOWN` and `NUMBER` values with exactly one `.` become floats and
/// values with none become integers; anything that fails to parse keeps the
/// raw text and the declared type.
pub fn coerce_value(raw: &str, declared: &VariableType) -> Coerced {
    let keep = |value: VariableValue| Coerced {
        value,
        var_type: declared.clone(),
        original_type: None,
    };

    match raw {
        ENABLED => return keep(VariableValue::Bool(true)),
        DISABLED => return keep(VariableValue::Bool(false)),
        _ => {}
    }

    if !declared.is_numeric_candidate() {
        return keep(VariableValue::Text(raw.to_string()));
    }

    let coerced = match raw.matches('.').count() {
        0 => raw
            .parse::<i64>()
            .ok()
            .map(|i| (VariableValue::Integer(i), VariableType::Integer)),
        1 => raw
            .parse::<f64>()
            .ok()
            .map(|f| (VariableValue::Float(f), VariableType::Float64)),
        _ => None,
    };

    match coerced {
        Some((value, var_type)) => Coerced {
            value,
            var_type,
            original_type: Some(declared.clone()),
        },
        None => keep(VariableValue::Text(raw.to_string())),
    }
}

/// Parsed `GET TYPE` report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeReport {
    pub var_type: VariableType,
    pub writeable: bool,
    pub maximum_length: Option<usize>,
}

/// Parse the tokens of a `GET TYPE` reply after the `TYPE <dev> <var> ` echo.
///
/// `RW STRING:20` is writeable, `STRING`, bounded at 20. Without the `RW`
/// marker the first token alone is the type.
pub fn parse_type_report(report: &str) -> Result<TypeReport> {
    let mut tokens = report.split_whitespace();
    let first = tokens
        .next()
        .ok_or_else(|| ClientError::protocol("empty TYPE report"))?;

    if first != READ_WRITE_MARKER {
        return Ok(TypeReport {
            var_type: VariableType::from_wire(first),
            writeable: false,
            maximum_length: None,
        });
    }

    let declared = tokens
        .next()
        .ok_or_else(|| ClientError::protocol(format!("TYPE report '{report}' has no type")))?;

    match declared.split_once(':') {
        Some((tag, bound)) => {
            let maximum_length = bound.parse::<usize>().map_err(|_| {
                ClientError::protocol(format!("invalid length bound in TYPE report '{report}'"))
            })?;
            Ok(TypeReport {
                var_type: VariableType::from_wire(tag),
                writeable: true,
                maximum_length: Some(maximum_length),
            })
        }
        None => Ok(TypeReport {
            var_type: VariableType::from_wire(declared),
            writeable: true,
            maximum_length: None,
        }),
    }
}
