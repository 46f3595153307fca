//! # Record Model
//!
//! Every record flowing through the pipeline is a [`Value`]. The variants mirror
//! the three record shapes the extractors and columns distinguish:
//!
//! - **Structured** records ([`Value::Object`]) expose named properties and
//!   zero-argument methods through the [`Structured`] trait.
//! - **Indexed** records ([`Value::List`], [`Value::Assoc`]) are read by index.
//! - **Scalars** (everything else) can only be used whole.
//!
//! Containers and objects are shared handles, so a write performed through a
//! [`crate::map::Map`] or a proxy is visible to every other holder of the same
//! record.
//!
//! ## Equality
//!
//! Two notions of equality exist and they are deliberately kept apart:
//!
//! - `==` ([`PartialEq`]) is strict: same variant, same content. Objects compare
//!   by identity.
//! - [`Value::loose_eq`] is the key-matching rule used by maps and dictionaries.
//!   Numbers compare numerically across `Int`/`Float`, a number matches a string
//!   that parses to the same number (`1` matches `"1"`), strings compare
//!   exactly, and containers/objects compare by identity.

use crate::collections::{Dictionary, OrderedList};
use crate::record::Structured;
use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Shared, interior-mutable handle used for every record that can be written through.
pub type Shared<T> = Rc<RefCell<T>>;

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Shared<OrderedList>),
    Assoc(Shared<Dictionary>),
    Object(Shared<dyn Structured>),
}

/// The record shape, classified once per access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Structured,
    Indexed,
    Scalar,
}

impl Value {
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Value::List(Rc::new(RefCell::new(
            items.into_iter().map(Into::into).collect(),
        )))
    }

    pub fn assoc<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        Value::Assoc(Rc::new(RefCell::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )))
    }

    pub fn object<S: Structured + 'static>(record: S) -> Self {
        Value::Object(Rc::new(RefCell::new(record)))
    }

    pub fn shape(&self) -> Shape {
        match self {
            Value::Object(_) => Shape::Structured,
            Value::List(_) | Value::Assoc(_) => Shape::Indexed,
            _ => Shape::Scalar,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_object(&self) -> Option<&Shared<dyn Structured>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    /// Runs `f` against the concrete record type behind an [`Value::Object`].
    ///
    /// Returns `None` when the value is not an object or the object is not a `T`.
    pub fn with_object<T: 'static, R>(&self, f: impl FnOnce(&T) -> R) -> Option<R> {
        let obj = self.as_object()?;
        let borrowed = obj.borrow();
        let any: &dyn Any = borrowed.as_any();
        any.downcast_ref::<T>().map(f)
    }

    /// Human readable name of the value's type (the record's own name for objects).
    pub fn type_name(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            Value::Bool(_) => "bool".to_string(),
            Value::Int(_) => "int".to_string(),
            Value::Float(_) => "float".to_string(),
            Value::Str(_) => "string".to_string(),
            Value::List(_) => "list".to_string(),
            Value::Assoc(_) => "assoc".to_string(),
            Value::Object(o) => o.borrow().type_name(),
        }
    }

    /// Identity comparison for shared handles; scalars are never identical.
    pub fn same_record(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b),
            (Value::Assoc(a), Value::Assoc(b)) => Rc::ptr_eq(a, b),
            (Value::Object(a), Value::Object(b)) => same_object(a, b),
            _ => false,
        }
    }

    /// Loose key equality. See the module docs for the exact rules.
    pub fn loose_eq(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Int(_) | Value::Float(_), Value::Int(_) | Value::Float(_)) => {
                self.as_f64() == other.as_f64()
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Int(_) | Value::Float(_), Value::Str(s))
            | (Value::Str(s), Value::Int(_) | Value::Float(_)) => {
                let number = if let Value::Str(_) = self { other } else { self };
                numeric_str(s).is_some_and(|n| Some(n) == number.as_f64())
            }
            _ => self.same_record(other),
        }
    }

    /// String conversion used for display, link building and stringified keys.
    ///
    /// `Null` and `false` render empty, `true` renders `1`, integral floats drop
    /// their fraction, containers render their type name.
    pub fn to_text(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(true) => "1".to_string(),
            Value::Bool(false) => String::new(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => format_float(*f),
            Value::Str(s) => s.clone(),
            Value::List(_) => "list".to_string(),
            Value::Assoc(_) => "assoc".to_string(),
            Value::Object(o) => o.borrow().text(),
        }
    }
}

pub(crate) fn same_object(a: &Shared<dyn Structured>, b: &Shared<dyn Structured>) -> bool {
    std::ptr::eq(
        Rc::as_ptr(a) as *const (),
        Rc::as_ptr(b) as *const (),
    )
}

fn numeric_str(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn format_float(f: f64) -> String {
    if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
        format!("{}", f as i64)
    } else {
        format!("{}", f)
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::List(a), Value::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            (Value::Assoc(a), Value::Assoc(b)) => {
                Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow()
            }
            (Value::Object(a), Value::Object(b)) => same_object(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_text())
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v as i64)
    }
}

impl From<usize> for Value {
    fn from(v: usize) -> Self {
        Value::Int(v as i64)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::Str(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::Str(v)
    }
}

impl From<&String> for Value {
    fn from(v: &String) -> Self {
        Value::Str(v.clone())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<OrderedList> for Value {
    fn from(v: OrderedList) -> Self {
        Value::List(Rc::new(RefCell::new(v)))
    }
}

impl From<Dictionary> for Value {
    fn from(v: Dictionary) -> Self {
        Value::Assoc(Rc::new(RefCell::new(v)))
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => Value::Float(n.as_f64().unwrap_or(f64::NAN)),
            },
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => Value::list(items.into_iter().map(Value::from)),
            serde_json::Value::Object(map) => {
                Value::assoc(map.into_iter().map(|(k, v)| (k, Value::from(v))))
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Null => serializer.serialize_unit(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(i) => serializer.serialize_i64(*i),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::Str(s) => serializer.serialize_str(s),
            Value::List(list) => {
                let list = list.borrow();
                let mut seq = serializer.serialize_seq(Some(list.len()))?;
                for item in list.iter() {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Assoc(dict) => {
                let dict = dict.borrow();
                let mut map = serializer.serialize_map(Some(dict.len()))?;
                for (k, v) in dict.iter() {
                    map.serialize_entry(&k.to_text(), v)?;
                }
                map.end()
            }
            Value::Object(obj) => {
                let props = obj.borrow().properties();
                let mut map = serializer.serialize_map(Some(props.len()))?;
                for (k, v) in &props {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    #[test]
    fn test_loose_eq_matches_numbers_and_numeric_strings() {
        assert!(Value::Int(1).loose_eq(&Value::from("1")));
        assert!(Value::from("1").loose_eq(&Value::Int(1)));
        assert!(Value::Int(2).loose_eq(&Value::Float(2.0)));
        assert!(Value::from(" 3 ").loose_eq(&Value::Float(3.0)));
        assert!(!Value::Int(1).loose_eq(&Value::from("one")));
        assert!(!Value::Int(0).loose_eq(&Value::from("")));
    }

    #[test]
    fn test_loose_eq_keeps_strings_exact() {
        assert!(Value::from("abc").loose_eq(&Value::from("abc")));
        assert!(!Value::from("1.0").loose_eq(&Value::from("1")));
    }

    #[test]
    fn test_loose_eq_does_not_coerce_null_or_bool() {
        assert!(Value::Null.loose_eq(&Value::Null));
        assert!(!Value::Null.loose_eq(&Value::Int(0)));
        assert!(!Value::Bool(true).loose_eq(&Value::Int(1)));
    }

    #[test]
    fn test_objects_compare_by_identity() {
        let a = Value::object(Record::new("User").with("id", 1));
        let b = Value::object(Record::new("User").with("id", 1));
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert!(a.loose_eq(&a.clone()));
        assert!(!a.loose_eq(&b));
    }

    #[test]
    fn test_containers_compare_by_content_strictly() {
        let a = Value::list([1, 2]);
        let b = Value::list([1, 2]);
        assert_eq!(a, b);
        assert!(!a.loose_eq(&b));
        assert!(a.same_record(&a.clone()));
    }

    #[test]
    fn test_to_text_follows_string_conversion_rules() {
        assert_eq!(Value::Null.to_text(), "");
        assert_eq!(Value::Bool(true).to_text(), "1");
        assert_eq!(Value::Bool(false).to_text(), "");
        assert_eq!(Value::Float(2.0).to_text(), "2");
        assert_eq!(Value::Float(2.5).to_text(), "2.5");
        assert_eq!(Value::from("x").to_string(), "x");
    }

    #[test]
    fn test_converts_from_json_preserving_field_order() {
        let json: serde_json::Value =
            serde_json::from_str(r#"{"name": "Ann", "id": 1, "tags": ["a"]}"#).unwrap();
        let value = Value::from(json);
        match &value {
            Value::Assoc(dict) => {
                let keys: Vec<String> = dict.borrow().keys().map(|k| k.to_text()).collect();
                assert_eq!(keys, vec!["name", "id", "tags"]);
            }
            other => panic!("Expected Assoc, got {:?}", other),
        }
    }

    #[test]
    fn test_serializes_back_to_json() {
        let value = Value::assoc([("id", Value::Int(1)), ("tags", Value::list(["a", "b"]))]);
        let json = serde_json::to_string(&value).unwrap();
        assert_eq!(json, r#"{"id":1,"tags":["a","b"]}"#);
    }

    #[test]
    fn test_with_object_downcasts_to_concrete_record() {
        let value = Value::object(Record::new("User").with("id", 7));
        let name = value.with_object(|r: &Record| r.type_name_str().to_string());
        assert_eq!(name.as_deref(), Some("User"));
        assert!(Value::Int(1).with_object(|_: &Record| ()).is_none());
    }
}
