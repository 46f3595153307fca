//! Plain containers the projection layer materializes into.
//!
//! [`OrderedList`] is a thin wrapper over `Vec<Value>`; [`Dictionary`] is an
//! insertion-ordered key/value store whose keys match with
//! [`Value::loose_eq`], so `1` and `"1"` address the same entry.

use crate::error::{RecastError, Result};
use crate::value::Value;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderedList {
    items: Vec<Value>,
}

impl OrderedList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, value: impl Into<Value>) -> &mut Self {
        self.items.push(value.into());
        self
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    pub fn set(&mut self, index: usize, value: Value) -> Result<()> {
        match self.items.get_mut(index) {
            Some(slot) => {
                *slot = value;
                Ok(())
            }
            None => Err(RecastError::NotFound(format!("list index {}", index))),
        }
    }

    pub fn remove(&mut self, index: usize) -> Result<Value> {
        if index >= self.items.len() {
            return Err(RecastError::NotFound(format!("list index {}", index)));
        }
        Ok(self.items.remove(index))
    }

    /// Position of the first strictly equal value (objects by identity).
    pub fn index_of(&self, value: &Value) -> Result<usize> {
        self.items
            .iter()
            .position(|v| v == value)
            .ok_or_else(|| RecastError::NotFound(format!("value {}", value)))
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.items.iter().any(|v| v == value)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn into_vec(self) -> Vec<Value> {
        self.items
    }
}

impl From<Vec<Value>> for OrderedList {
    fn from(items: Vec<Value>) -> Self {
        Self { items }
    }
}

impl FromIterator<Value> for OrderedList {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for OrderedList {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    entries: Vec<(Value, Value)>,
}

impl Dictionary {
    pub fn new() -> Self {
        Self::default()
    }

    fn position(&self, key: &Value) -> Option<usize> {
        self.entries.iter().position(|(k, _)| k.loose_eq(key))
    }

    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.position(key).map(|i| &self.entries[i].1)
    }

    /// Insert or overwrite in place; new keys are appended.
    pub fn set(&mut self, key: impl Into<Value>, value: impl Into<Value>) -> &mut Self {
        let key: Value = key.into();
        let value: Value = value.into();
        match self.position(&key) {
            Some(i) => self.entries[i].1 = value,
            None => self.entries.push((key, value)),
        }
        self
    }

    pub fn has(&self, key: &Value) -> bool {
        self.position(key).is_some()
    }

    pub fn delete(&mut self, key: &Value) -> Option<Value> {
        self.position(key).map(|i| self.entries.remove(i).1)
    }

    pub fn keys(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &Value)> {
        self.entries.iter().map(|(k, v)| (k, v))
    }

    /// Entry at an insertion position, used by index-based drivers.
    pub fn entry_at(&self, index: usize) -> Option<(&Value, &Value)> {
        self.entries.get(index).map(|(k, v)| (k, v))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(Value, Value)> for Dictionary {
    fn from_iter<I: IntoIterator<Item = (Value, Value)>>(iter: I) -> Self {
        let mut dict = Dictionary::new();
        for (k, v) in iter {
            dict.set(k, v);
        }
        dict
    }
}

impl IntoIterator for Dictionary {
    type Item = (Value, Value);
    type IntoIter = std::vec::IntoIter<(Value, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}
