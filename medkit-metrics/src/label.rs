//! Attribute values usable as classification labels.

use std::fmt;

use medkit::AttributeValue;
use serde::{Deserialize, Serialize};

/// A str, int or bool attribute value.
///
/// Ordering puts bools first, then ints, then strings, so mixed label sets
/// still sort deterministically.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Label {
    Bool(bool),
    Int(i64),
    Str(String),
}

impl Label {
    /// Name of the value type, as in [`AttributeValue::type_name`].
    pub fn type_name(&self) -> &'static str {
        match self {
            Label::Bool(_) => "bool",
            Label::Int(_) => "int",
            Label::Str(_) => "str",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Bool(value) => write!(f, "{}", value),
            Label::Int(value) => write!(f, "{}", value),
            Label::Str(value) => f.write_str(value),
        }
    }
}

impl TryFrom<&AttributeValue> for Label {
    /// Name of the unsupported value type.
    type Error = &'static str;

    fn try_from(value: &AttributeValue) -> Result<Self, Self::Error> {
        match value {
            AttributeValue::Bool(value) => Ok(Label::Bool(*value)),
            AttributeValue::Int(value) => Ok(Label::Int(*value)),
            AttributeValue::Str(value) => Ok(Label::Str(value.clone())),
            other => Err(other.type_name()),
        }
    }
}

impl From<&str> for Label {
    fn from(value: &str) -> Self {
        Label::Str(value.to_string())
    }
}
