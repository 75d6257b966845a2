use std::fmt::{Display, Formatter, Result as FmtResult};

use graphql_parser::query::Value as ParserValue;
use serde_json::Value as JsonValue;

/// Leaf values that can appear in arguments, filters and mutation inputs.
#[derive(Clone, Debug, PartialEq)]
pub enum Scalar {
    String(String),
    Int(i64),
    Float(f64),
    Boolean(bool),
    Enum(String),
    Null,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    Scalar(Scalar),
    /// Object fields in source order for JSON variables. Inline GraphQL object
    /// literals arrive sorted by key, since graphql-parser stores them in a BTreeMap.
    Object(Vec<(String, Value)>),
    List(Vec<Value>),
    Variable(String),
}

impl Value {
    pub fn string(value: impl Into<String>) -> Self {
        Value::Scalar(Scalar::String(value.into()))
    }

    pub fn int(value: i64) -> Self {
        Value::Scalar(Scalar::Int(value))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Value::Scalar(_) => "scalar",
            Value::Object(_) => "object",
            Value::List(_) => "list",
            Value::Variable(_) => "variable",
        }
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Scalar::String(s) => write!(f, "{}", s),
            Scalar::Int(i) => write!(f, "{}", i),
            Scalar::Float(v) => write!(f, "{}", v),
            Scalar::Boolean(b) => write!(f, "{}", b),
            Scalar::Enum(e) => write!(f, "{}", e),
            Scalar::Null => write!(f, "null"),
        }
    }
}

impl From<&ParserValue<'_, String>> for Value {
    fn from(value: &ParserValue<'_, String>) -> Self {
        match value {
            ParserValue::Variable(name) => Value::Variable(name.to_owned()),
            ParserValue::Int(i) => match i.as_i64() {
                Some(int) => Value::Scalar(Scalar::Int(int)),
                None => Value::Scalar(Scalar::Null),
            },
            ParserValue::Float(f) => Value::Scalar(Scalar::Float(*f)),
            ParserValue::String(s) => Value::Scalar(Scalar::String(s.to_owned())),
            ParserValue::Boolean(b) => Value::Scalar(Scalar::Boolean(*b)),
            ParserValue::Null => Value::Scalar(Scalar::Null),
            ParserValue::Enum(e) => Value::Scalar(Scalar::Enum(e.to_owned())),
            ParserValue::List(l) => Value::List(l.iter().map(Value::from).collect()),
            ParserValue::Object(o) => Value::Object(
                o.iter()
                    .map(|(k, v)| (k.to_string(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&JsonValue> for Value {
    fn from(value: &JsonValue) -> Self {
        match value {
            JsonValue::Null => Value::Scalar(Scalar::Null),
            JsonValue::Bool(b) => Value::Scalar(Scalar::Boolean(*b)),
            JsonValue::Number(n) => match n.as_i64() {
                Some(int) => Value::Scalar(Scalar::Int(int)),
                None => Value::Scalar(Scalar::Float(n.as_f64().unwrap_or_default())),
            },
            JsonValue::String(s) => Value::Scalar(Scalar::String(s.clone())),
            JsonValue::Array(items) => Value::List(items.iter().map(Value::from).collect()),
            JsonValue::Object(fields) => Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::from(v)))
                    .collect(),
            ),
        }
    }
}
