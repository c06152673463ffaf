//! Template Value Object
//!
//! A fully evaluated value handed to the template engine.

use std::fmt;

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

#[derive(Debug, Clone, PartialEq)]
pub enum TemplateValue {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<TemplateValue>),
    /// Keys keep their written order.
    Map(Vec<(String, TemplateValue)>),
}

impl TemplateValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            TemplateValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&TemplateValue> {
        match self {
            TemplateValue::Map(entries) => entries.iter().find(|(k, _)| k == key).map(|(_, v)| v),
            _ => None,
        }
    }

    /// Text used when a non-string value must become a map key.
    pub(crate) fn key_text(&self) -> String {
        match self {
            TemplateValue::Str(s) => s.clone(),
            other => other.to_string(),
        }
    }
}

impl From<&str> for TemplateValue {
    fn from(value: &str) -> Self {
        TemplateValue::Str(value.to_string())
    }
}

impl From<String> for TemplateValue {
    fn from(value: String) -> Self {
        TemplateValue::Str(value)
    }
}

impl From<i64> for TemplateValue {
    fn from(value: i64) -> Self {
        TemplateValue::Int(value)
    }
}

impl From<bool> for TemplateValue {
    fn from(value: bool) -> Self {
        TemplateValue::Bool(value)
    }
}

fn write_quoted(f: &mut fmt::Formatter<'_>, s: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in s.chars() {
        match c {
            '"' => f.write_str("\\\"")?,
            '\\' => f.write_str("\\\\")?,
            '\n' => f.write_str("\\n")?,
            '\t' => f.write_str("\\t")?,
            c => write!(f, "{}", c)?,
        }
    }
    f.write_str("\"")
}

/// Renders as a literal that the literal parser reads back to the same value.
impl fmt::Display for TemplateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateValue::None => f.write_str("None"),
            TemplateValue::Bool(true) => f.write_str("True"),
            TemplateValue::Bool(false) => f.write_str("False"),
            TemplateValue::Int(i) => write!(f, "{}", i),
            TemplateValue::Float(x) if x.fract() == 0.0 && x.is_finite() => write!(f, "{:.1}", x),
            TemplateValue::Float(x) => write!(f, "{}", x),
            TemplateValue::Str(s) => write_quoted(f, s),
            TemplateValue::List(items) => {
                f.write_str("[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str("]")
            }
            TemplateValue::Map(entries) => {
                f.write_str("{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write_quoted(f, key)?;
                    write!(f, ": {}", value)?;
                }
                f.write_str("}")
            }
        }
    }
}

impl Serialize for TemplateValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TemplateValue::None => serializer.serialize_none(),
            TemplateValue::Bool(b) => serializer.serialize_bool(*b),
            TemplateValue::Int(i) => serializer.serialize_i64(*i),
            TemplateValue::Float(x) => serializer.serialize_f64(*x),
            TemplateValue::Str(s) => serializer.serialize_str(s),
            TemplateValue::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            TemplateValue::Map(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (key, value) in entries {
                    map.serialize_entry(key, value)?;
                }
                map.end()
            }
        }
    }
}
