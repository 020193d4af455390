//! XML-RPC value model

use chrono::NaiveDateTime;
use std::collections::BTreeMap;

/// A value from the XML-RPC wire type set.
///
/// The wire format is a tree, so a value never contains itself. Struct
/// member order is not significant; members are kept sorted by key so
/// encoding the same tree always yields the same document.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// `<int>` / `<i4>` (four-byte signed integer)
    Int(i32),
    /// `<boolean>` (`0` or `1` on the wire)
    Bool(bool),
    /// `<double>`
    Double(f64),
    /// `<string>`, or an untyped `<value>`
    String(String),
    /// `<dateTime.iso8601>`
    DateTime(NaiveDateTime),
    /// `<base64>`
    Base64(Vec<u8>),
    /// `<array>`
    Array(Vec<Value>),
    /// `<struct>`
    Struct(BTreeMap<String, Value>),
}

impl Value {
    /// If the value is an `Int`, returns the integer.
    pub fn as_i32(&self) -> Option<i32> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// If the value is a `Bool`, returns the boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// If the value is a `Double` or an `Int`, returns it as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Double(f) => Some(*f),
            Value::Int(n) => Some(f64::from(*n)),
            _ => None,
        }
    }

    /// If the value is a `String`, returns the string slice.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// If the value is a `DateTime`, returns the timestamp.
    pub fn as_datetime(&self) -> Option<NaiveDateTime> {
        match self {
            Value::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// If the value is a `Base64`, returns the decoded bytes.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Value::Base64(b) => Some(b),
            _ => None,
        }
    }

    /// If the value is an `Array`, returns the element slice.
    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// If the value is a `Struct`, returns the member map.
    pub fn as_struct(&self) -> Option<&BTreeMap<String, Value>> {
        match self {
            Value::Struct(members) => Some(members),
            _ => None,
        }
    }

    /// If the value is a `Struct`, returns the member named `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_struct().and_then(|members| members.get(key))
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Double(f)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Array(items)
    }
}

impl From<BTreeMap<String, Value>> for Value {
    fn from(members: BTreeMap<String, Value>) -> Self {
        Value::Struct(members)
    }
}

/// An application-level XML-RPC fault.
///
/// A fault is an ordinary handler outcome, not an error: it is marshalled
/// into a fault response document and travels back to the client with a
/// success HTTP status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fault {
    pub code: i32,
    pub message: String,
}

impl Fault {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accessors() {
        assert_eq!(Value::Int(7).as_i32(), Some(7));
        assert_eq!(Value::Int(7).as_f64(), Some(7.0));
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Double(2.5).as_f64(), Some(2.5));
        assert_eq!(Value::String("hi".into()).as_str(), Some("hi"));
        assert_eq!(Value::String("hi".into()).as_i32(), None);
        assert_eq!(Value::Base64(vec![1, 2]).as_bytes(), Some(&[1u8, 2][..]));
    }

    #[test]
    fn test_struct_get() {
        let value = Value::Struct(BTreeMap::from([(
            "say".to_string(),
            Value::String("Hello!".to_string()),
        )]));
        assert_eq!(value.get("say").and_then(Value::as_str), Some("Hello!"));
        assert_eq!(value.get("missing"), None);
        assert_eq!(Value::Int(1).get("say"), None);
    }

    #[test]
    fn test_from_conversions() {
        assert_eq!(Value::from(42), Value::Int(42));
        assert_eq!(Value::from(true), Value::Bool(true));
        assert_eq!(Value::from("x"), Value::String("x".to_string()));
        assert_eq!(
            Value::from(vec![Value::Int(1)]),
            Value::Array(vec![Value::Int(1)])
        );
    }

    #[test]
    fn test_fault_is_a_value_outcome() {
        let fault = Fault::new(4, "too many parameters");
        assert_eq!(fault.code, 4);
        assert_eq!(fault.message, "too many parameters");
    }
}
