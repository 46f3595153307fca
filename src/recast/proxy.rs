//! # Forwarding Proxies
//!
//! [`ForwardingProxy`] wraps one record and forwards every record operation to
//! it: member reads/writes/existence checks/removal, method calls, invocation,
//! indexed access, string conversion and iteration. The proxy holds a shared
//! handle, so cloning a proxy never copies the wrapped record.
//!
//! [`ValueProxy`] adds three reserved fields (`key`, `value`, `position`) which
//! are served from the proxy itself and never forwarded, plus an optional
//! [`ColumnList`] binding. Its string form is the text of `value`.
//!
//! The bound list is read through the typed [`ValueProxy::columns`] accessor.
//! A list is not a [`Value`], so `columns` is not a reserved member name:
//! `get("columns")` reaches the wrapped record like any other field.
//!
//! A `ValueProxy` is a per-iteration-step view. When it is bound to a column
//! list, that list's current-record slot belongs to whichever proxy was
//! produced last; see [`crate::proxy_extractor`].

use crate::column::ColumnList;
use crate::error::{RecastError, Result};
use crate::record::{self, Structured};
use crate::source::{Cursor, Source};
use crate::value::Value;
use std::any::Any;

/// Names a [`ValueProxy`] serves itself.
pub const RESERVED: [&str; 3] = ["key", "value", "position"];

#[derive(Debug, Clone)]
pub struct ForwardingProxy {
    src: Value,
}

impl ForwardingProxy {
    pub fn new(src: Value) -> Self {
        Self { src }
    }

    pub fn src(&self) -> &Value {
        &self.src
    }

    pub fn set_src(&mut self, src: Value) {
        self.src = src;
    }
}

impl Structured for ForwardingProxy {
    fn type_name(&self) -> String {
        self.src.type_name()
    }

    fn get(&self, name: &str) -> Option<Value> {
        if name == "src" {
            return Some(self.src.clone());
        }
        record::member(&self.src, name)
    }

    fn get_index(&self, index: &Value) -> Option<Value> {
        record::index(&self.src, index)
    }

    fn has(&self, name: &str) -> bool {
        record::contains(&self.src, name)
    }

    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        record::assign(&self.src, name, value)
    }

    fn set_index(&mut self, index: &Value, value: Value) -> Result<()> {
        match &self.src {
            Value::Object(obj) => obj.borrow_mut().set_index(index, value),
            Value::Assoc(dict) => {
                dict.borrow_mut().set(index.clone(), value);
                Ok(())
            }
            other => record::assign(other, &index.to_text(), value),
        }
    }

    fn unset(&mut self, name: &str) -> Result<()> {
        record::remove(&self.src, name)
    }

    fn unset_index(&mut self, index: &Value) -> Result<()> {
        match &self.src {
            Value::Object(obj) => obj.borrow_mut().unset_index(index),
            Value::Assoc(dict) => {
                dict.borrow_mut().delete(index);
                Ok(())
            }
            other => record::remove(other, &index.to_text()),
        }
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        match &self.src {
            Value::Object(obj) => obj.borrow().call(method, args),
            other => Err(RecastError::MissingCapability(format!(
                "cannot call {}() on a {}",
                method,
                other.type_name()
            ))),
        }
    }

    fn invoke(&self, args: &[Value]) -> Result<Value> {
        match &self.src {
            Value::Object(obj) => obj.borrow().invoke(args),
            other => Err(RecastError::MissingCapability(format!(
                "the wrapped {} is not callable",
                other.type_name()
            ))),
        }
    }

    fn text(&self) -> String {
        self.src.to_text()
    }

    fn properties(&self) -> Vec<(String, Value)> {
        match &self.src {
            Value::Object(obj) => obj.borrow().properties(),
            Value::Assoc(dict) => dict
                .borrow()
                .iter()
                .map(|(k, v)| (k.to_text(), v.clone()))
                .collect(),
            _ => Vec::new(),
        }
    }

    fn cursor(&self) -> Option<Box<dyn Cursor>> {
        match &self.src {
            Value::Object(obj) => obj.borrow().cursor(),
            other => Source::try_from(other.clone()).ok()?.driver().ok(),
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone)]
pub struct ValueProxy {
    base: ForwardingProxy,
    key: Value,
    value: Value,
    position: usize,
    columns: Option<ColumnList>,
}

impl ValueProxy {
    pub fn new(src: Value) -> Self {
        Self {
            base: ForwardingProxy::new(src),
            key: Value::Null,
            value: Value::Null,
            position: 0,
            columns: None,
        }
    }

    pub(crate) fn stamp(mut self, key: Value, value: Value, position: usize) -> Self {
        self.key = key;
        self.value = value;
        self.position = position;
        self
    }

    pub(crate) fn bind_columns(mut self, columns: ColumnList) -> Self {
        self.columns = Some(columns);
        self
    }

    /// The wrapped record.
    pub fn src(&self) -> &Value {
        self.base.src()
    }

    pub fn key(&self) -> &Value {
        &self.key
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The column list bound by a [`crate::proxy_extractor::ProxyExtractor`].
    /// Member reads named `columns` still go to the wrapped record.
    pub fn columns(&self) -> Option<&ColumnList> {
        self.columns.as_ref()
    }

    fn reserved(&self, name: &str) -> Option<Value> {
        match name {
            "key" => Some(self.key.clone()),
            "value" => Some(self.value.clone()),
            "position" => Some(Value::from(self.position)),
            _ => None,
        }
    }
}

impl Structured for ValueProxy {
    fn type_name(&self) -> String {
        self.base.type_name()
    }

    fn get(&self, name: &str) -> Option<Value> {
        self.reserved(name).or_else(|| self.base.get(name))
    }

    fn get_index(&self, index: &Value) -> Option<Value> {
        self.base.get_index(index)
    }

    fn has(&self, name: &str) -> bool {
        RESERVED.contains(&name) || self.base.has(name)
    }

    fn set(&mut self, name: &str, value: Value) -> Result<()> {
        match name {
            "key" => self.key = value,
            "value" => self.value = value,
            "position" => {
                let position = value
                    .as_i64()
                    .and_then(|p| usize::try_from(p).ok())
                    .ok_or_else(|| {
                        RecastError::InvalidConfiguration(format!(
                            "position must be a non-negative integer, got {}",
                            value.type_name()
                        ))
                    })?;
                self.position = position;
            }
            _ => return self.base.set(name, value),
        }
        Ok(())
    }

    fn set_index(&mut self, index: &Value, value: Value) -> Result<()> {
        self.base.set_index(index, value)
    }

    fn unset(&mut self, name: &str) -> Result<()> {
        if RESERVED.contains(&name) {
            return Err(RecastError::MissingCapability(format!(
                "'{}' is a reserved proxy field and cannot be removed",
                name
            )));
        }
        self.base.unset(name)
    }

    fn unset_index(&mut self, index: &Value) -> Result<()> {
        self.base.unset_index(index)
    }

    fn call(&self, method: &str, args: &[Value]) -> Result<Value> {
        self.base.call(method, args)
    }

    fn invoke(&self, args: &[Value]) -> Result<Value> {
        self.base.invoke(args)
    }

    fn text(&self) -> String {
        self.value.to_text()
    }

    fn properties(&self) -> Vec<(String, Value)> {
        self.base.properties()
    }

    fn cursor(&self) -> Option<Box<dyn Cursor>> {
        self.base.cursor()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;

    fn wrapped() -> Value {
        Value::object(
            Record::new("User")
                .with("name", "Ann")
                .with("key", "record-key")
                .with_method("greet", |r, args| {
                    Ok(Value::from(format!(
                        "hi {} from {}",
                        args.first().map(|a| a.to_text()).unwrap_or_default(),
                        r.field("name")
                    )))
                })
                .with_invoke(|_, _| Ok(Value::from("invoked"))),
        )
    }

    #[test]
    fn test_forwards_reads_writes_and_removal() {
        let user = wrapped();
        let mut proxy = ForwardingProxy::new(user.clone());
        assert_eq!(proxy.get("name"), Some(Value::from("Ann")));

        proxy.set("name", Value::from("Bob")).unwrap();
        assert_eq!(record::member(&user, "name"), Some(Value::from("Bob")));

        proxy.unset("name").unwrap();
        assert!(!proxy.has("name"));
        assert!(!record::contains(&user, "name"));
    }

    #[test]
    fn test_forwards_calls_and_invocation() {
        let proxy = ForwardingProxy::new(wrapped());
        assert_eq!(
            proxy.call("greet", &[Value::from("Bob")]).unwrap(),
            Value::from("hi Bob from Ann")
        );
        assert_eq!(proxy.invoke(&[]).unwrap(), Value::from("invoked"));
    }

    #[test]
    fn test_invoking_a_non_callable_source_fails() {
        let proxy = ForwardingProxy::new(Value::assoc([("a", 1)]));
        assert!(matches!(
            proxy.invoke(&[]),
            Err(RecastError::MissingCapability(_))
        ));
    }

    #[test]
    fn test_forwards_indexed_access_to_containers() {
        let mut proxy = ForwardingProxy::new(Value::assoc([("a", 1)]));
        assert_eq!(proxy.get_index(&Value::from("a")), Some(Value::Int(1)));
        proxy.set_index(&Value::from("b"), Value::Int(2)).unwrap();
        assert_eq!(proxy.get("b"), Some(Value::Int(2)));
        proxy.unset_index(&Value::from("a")).unwrap();
        assert!(proxy.get("a").is_none());
    }

    #[test]
    fn test_forwarding_proxy_stringifies_source() {
        let proxy = ForwardingProxy::new(Value::from("plain"));
        assert_eq!(proxy.text(), "plain");
    }

    #[test]
    fn test_reserved_names_are_served_by_value_proxy() {
        let proxy = ValueProxy::new(wrapped()).stamp(Value::Int(3), Value::from("Ann"), 2);
        assert_eq!(proxy.get("key"), Some(Value::Int(3)));
        assert_eq!(proxy.get("value"), Some(Value::from("Ann")));
        assert_eq!(proxy.get("position"), Some(Value::Int(2)));
        assert_eq!(proxy.get("name"), Some(Value::from("Ann")));
    }

    #[test]
    fn test_reserved_writes_stay_on_the_proxy() {
        let user = wrapped();
        let mut proxy = ValueProxy::new(user.clone());
        proxy.set("key", Value::from("mine")).unwrap();
        assert_eq!(proxy.key(), &Value::from("mine"));
        assert_eq!(record::member(&user, "key"), Some(Value::from("record-key")));

        assert!(proxy.set("position", Value::from("x")).is_err());
        assert!(matches!(
            proxy.unset("value"),
            Err(RecastError::MissingCapability(_))
        ));
    }

    #[test]
    fn test_bound_columns_are_read_through_typed_accessor() {
        let user = Value::object(Record::new("User").with("columns", "stored"));
        let list = ColumnList::from_declaration(["columns"]);
        let proxy = ValueProxy::new(user.clone()).bind_columns(list.clone());

        assert!(proxy.columns().unwrap().ptr_eq(&list));
        assert_eq!(proxy.get("columns"), Some(Value::from("stored")));
        assert!(ValueProxy::new(user).columns().is_none());
    }

    #[test]
    fn test_value_proxy_stringifies_value() {
        let proxy = ValueProxy::new(wrapped()).stamp(Value::Null, Value::from("shown"), 0);
        assert_eq!(proxy.text(), "shown");
    }

    #[test]
    fn test_cloning_shares_the_wrapped_record() {
        let user = wrapped();
        let mut first = ValueProxy::new(user.clone());
        let second = first.clone();
        first.set("name", Value::from("Cy")).unwrap();
        assert_eq!(second.get("name"), Some(Value::from("Cy")));
        assert!(second.src().same_record(&user));
    }

    #[test]
    fn test_proxies_over_lists_are_iterable() {
        let proxy = ForwardingProxy::new(Value::list([1, 2, 3]));
        let mut cursor = proxy.cursor().unwrap();
        cursor.rewind().unwrap();
        assert_eq!(cursor.current(), Some(Value::Int(1)));
    }
}
