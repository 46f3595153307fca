//! # Structured Records
//!
//! [`Structured`] is the capability every object record implements: named
//! property reads and writes, method invocation, string conversion and, for
//! records that wrap a sequence, production of a driver [`Cursor`].
//!
//! [`Record`] is a ready-made property bag with registered methods, which is
//! what most callers (and the CLI) use for ad-hoc objects.
//!
//! The free functions at the bottom of this module are the single place where
//! record shapes are dispatched on. Extractors, columns and proxies all go
//! through them so the object/indexed/scalar rules live in one spot.

use crate::accessor::Accessor;
use crate::collections::Dictionary;
use crate::error::{RecastError, Result};
use crate::source::Cursor;
use crate::value::{Shape, Value};
use std::any::Any;
use std::fmt;
use std::rc::Rc;

pub trait Structured: fmt::Debug {
    fn type_name(&self) -> String;

    /// Read a property. `None` means the property does not exist.
    fn get(&self, name: &str) -> Option<Value>;

    /// Indexed read (`record[index]`). Defaults to a property read.
    fn get_index(&self, index: &Value) -> Option<Value> {
        self.get(&index.to_text())
    }

    fn has(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    fn set(&mut self, name: &str, _value: Value) -> Result<()> {
        Err(RecastError::MissingCapability(format!(
            "{} does not accept writes to '{}'",
            self.type_name(),
            name
        )))
    }

    fn set_index(&mut self, index: &Value, value: Value) -> Result<()> {
        self.set(&index.to_text(), value)
    }

    fn unset(&mut self, name: &str) -> Result<()> {
        Err(RecastError::MissingCapability(format!(
            "{} does not allow removing '{}'",
            self.type_name(),
            name
        )))
    }

    fn unset_index(&mut self, index: &Value) -> Result<()> {
        self.unset(&index.to_text())
    }

    fn call(&self, method: &str, _args: &[Value]) -> Result<Value> {
        Err(RecastError::NotFound(format!(
            "method {}::{}()",
            self.type_name(),
            method
        )))
    }

    /// Invoke the record itself, for callable records.
    fn invoke(&self, _args: &[Value]) -> Result<Value> {
        Err(RecastError::MissingCapability(format!(
            "{} is not callable",
            self.type_name()
        )))
    }

    fn text(&self) -> String {
        self.type_name()
    }

    /// Properties exposed for serialization.
    fn properties(&self) -> Vec<(String, Value)> {
        Vec::new()
    }

    /// Records wrapping a sequence return a fresh driver over it.
    fn cursor(&self) -> Option<Box<dyn Cursor>> {
        None
    }

    fn as_any(&self) -> &dyn Any;
}

pub type Method = Rc<dyn Fn(&Record, &[Value]) -> Result<Value>>;

/// A generic object record: ordered properties plus named methods.
#[derive(Clone)]
pub struct Record {
    type_name: String,
    fields: Dictionary,
    methods: Vec<(String, Method)>,
    invoke: Option<Method>,
}

impl Record {
    /// Type name given to records built without an explicit one.
    pub const ANONYMOUS: &'static str = "Record";

    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Dictionary::new(),
            methods: Vec::new(),
            invoke: None,
        }
    }

    pub fn anonymous() -> Self {
        Self::new(Self::ANONYMOUS)
    }

    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.fields.set(name, value.into());
        self
    }

    pub fn with_method<F>(mut self, name: &str, method: F) -> Self
    where
        F: Fn(&Record, &[Value]) -> Result<Value> + 'static,
    {
        self.methods.retain(|(n, _)| n != name);
        self.methods.push((name.to_string(), Rc::new(method)));
        self
    }

    pub fn with_invoke<F>(mut self, body: F) -> Self
    where
        F: Fn(&Record, &[Value]) -> Result<Value> + 'static,
    {
        self.invoke = Some(Rc::new(body));
        self
    }

    pub fn type_name_str(&self) -> &str {
        &self.type_name
    }

    /// Direct property read, `Null` when absent.
    pub fn field(&self, name: &str) -> Value {
        self.fields.get(&Value::from(name)).cloned().unwrap_or_default()
    }

    pub fn fields(&self) -> &Dictionary {
        &self.fields
    }

    pub fn is_anonymous(&self) -> bool {
        self.type_name == Self::ANONYMOUS
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("type_name", &self.type_name)
            .field("fields", &self.fields)
            .field(
                "methods",
                &self.methods.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Structured for Record {
    fn type_name(&self) -> String {
        self.type_name.clone()
    }

    fn get(&self, name: &str) -> Option<Value> {
        self.fields.get(&Value::from(name)).cloned()
    }

    fn get_index(&self, index: &Value) -> Option<Value> {
        self.fields.get(index).cloned()
    }

    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        self.fields.set(name, value);
        Ok(())
    }

    fn set_index(&mut self, index: &Value, value: Value) -> Result<()> {
        self.fields.set(index.clone(), value);
        Ok(())
    }

    fn unset(&mut self, name: &str) -> Result<()> {
        self.fields.delete(&Value::from(name));
        Ok(())
    }

    fn unset_index(&mut self, index: &Value) -> Result<()> {
        self.fields.delete(index);
        Ok(())
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        let found = self
            .methods
            .iter()
            .find(|(n, _)| n == method)
            .map(|(_, m)| Rc::clone(m));
        match found {
            Some(m) => m(self, args),
            None => Err(RecastError::NotFound(format!(
                "method {}::{}()",
                self.type_name, method
            ))),
        }
    }

    fn invoke(&self, args: &[Value]) -> Result<Value> {
        match &self.invoke {
            Some(body) => body(self, args),
            None => Err(RecastError::MissingCapability(format!(
                "{} is not callable",
                self.type_name
            ))),
        }
    }

    fn properties(&self) -> Vec<(String, Value)> {
        self.fields
            .iter()
            .map(|(k, v)| (k.to_text(), v.clone()))
            .collect()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Resolve an accessor against a structured or indexed record.
///
/// Methods are invoked with no arguments; sentinel accessors are read verbatim
/// as property/index names. Missing fields read as `Null`. Scalars fail with
/// [`RecastError::UnsupportedSource`].
pub fn read(item: &Value, accessor: &Accessor) -> Result<Value> {
    match item {
        Value::Object(obj) => {
            let obj = obj.borrow();
            if accessor.is_method() {
                obj.call(accessor.name(), &[])
            } else {
                Ok(obj.get(accessor.name()).unwrap_or_default())
            }
        }
        Value::List(_) | Value::Assoc(_) => {
            Ok(index(item, &Value::from(accessor.name())).unwrap_or_default())
        }
        _ => Err(RecastError::UnsupportedSource(format!(
            "cannot read '{}' from a scalar {}",
            accessor.name(),
            item.type_name()
        ))),
    }
}

/// Member read by name, by shape. `None` when absent or the record is a scalar.
pub fn member(item: &Value, name: &str) -> Option<Value> {
    match item.shape() {
        Shape::Structured => item.as_object().and_then(|o| o.borrow().get(name)),
        Shape::Indexed => index(item, &Value::from(name)),
        Shape::Scalar => None,
    }
}

/// Indexed read. Lists accept any key loosely equal to a position.
pub fn index(item: &Value, key: &Value) -> Option<Value> {
    match item {
        Value::Object(obj) => obj.borrow().get_index(key),
        Value::Assoc(dict) => dict.borrow().get(key).cloned(),
        Value::List(list) => {
            let list = list.borrow();
            (0..list.len())
                .find(|i| Value::from(*i).loose_eq(key))
                .and_then(|i| list.get(i).cloned())
        }
        _ => None,
    }
}

pub fn contains(item: &Value, name: &str) -> bool {
    match item {
        Value::Object(obj) => obj.borrow().has(name),
        _ => member(item, name).is_some(),
    }
}

/// Write a named field on a structured or associative record.
pub fn assign(item: &Value, name: &str, value: Value) -> Result<()> {
    match item {
        Value::Object(obj) => obj.borrow_mut().set(name, value),
        Value::Assoc(dict) => {
            dict.borrow_mut().set(name, value);
            Ok(())
        }
        Value::List(list) => {
            let position = list_position(&list.borrow(), &Value::from(name))?;
            list.borrow_mut().set(position, value)
        }
        _ => Err(RecastError::MissingCapability(format!(
            "cannot write '{}' on a scalar {}",
            name,
            item.type_name()
        ))),
    }
}

/// Remove a named field from a structured or associative record.
pub fn remove(item: &Value, name: &str) -> Result<()> {
    match item {
        Value::Object(obj) => obj.borrow_mut().unset(name),
        Value::Assoc(dict) => {
            dict.borrow_mut().delete(&Value::from(name));
            Ok(())
        }
        Value::List(list) => {
            let position = list_position(&list.borrow(), &Value::from(name))?;
            list.borrow_mut().remove(position).map(|_| ())
        }
        _ => Err(RecastError::MissingCapability(format!(
            "cannot remove '{}' from a scalar {}",
            name,
            item.type_name()
        ))),
    }
}

fn list_position(list: &crate::collections::OrderedList, key: &Value) -> Result<usize> {
    (0..list.len())
        .find(|i| Value::from(*i).loose_eq(key))
        .ok_or_else(|| RecastError::NotFound(format!("list index {}", key)))
}
