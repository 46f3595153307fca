//! # Map
//!
//! An associative, non-materializing view over a source sequence. Keys and
//! values are computed by a [`Caster`] (usually an [`Extractor`]) while
//! scanning; nothing is copied or indexed.
//!
//! Every operation is a linear scan:
//!
//! - `get`/`find`/`has` stop at the **first** item whose computed key loosely
//!   equals the requested key ([`Value::loose_eq`]).
//! - `set`/`delete` visit **every** matching item. Duplicate computed keys are
//!   not rejected; they shadow each other on reads.
//!
//! Writes go through the caster's [`ItemWriter`] capability and land on the
//! source records themselves. They are not atomic: if a record refuses a write
//! halfway through, earlier matches stay modified and the error is returned.
//!
//! [`Extractor`]: crate::extractor::Extractor

use crate::error::{RecastError, Result};
use crate::extractor::{Caster, CasterSpec, ItemWriter};
use crate::iter::CastableIterator;
use crate::source::Source;
use crate::value::Value;
use std::fmt;
use std::ops::ControlFlow;
use std::rc::Rc;

struct MapInner {
    src: Source,
    extractor: Rc<dyn Caster>,
}

/// Cloning a `Map` yields another handle to the same view.
#[derive(Clone)]
pub struct Map {
    inner: Rc<MapInner>,
}

impl Map {
    pub fn new(src: impl Into<Source>, extractor: impl Into<CasterSpec>) -> Result<Self> {
        let spec: CasterSpec = extractor.into();
        let extractor = spec.into_caster()?;
        Ok(Self {
            inner: Rc::new(MapInner {
                src: src.into(),
                extractor,
            }),
        })
    }

    pub fn src(&self) -> &Source {
        &self.inner.src
    }

    pub fn extractor(&self) -> Rc<dyn Caster> {
        Rc::clone(&self.inner.extractor)
    }

    /// Whether both handles refer to the same view.
    pub fn ptr_eq(&self, other: &Map) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Walk the source, handing every `(item, key, value)` to `visit`.
    fn scan<F>(&self, mut visit: F) -> Result<()>
    where
        F: FnMut(&Value, Value, Value) -> Result<ControlFlow<()>>,
    {
        let mut driver = self.inner.src.driver()?;
        driver.rewind()?;
        let mut position = 0;
        while driver.valid() {
            let original_key = driver.key().unwrap_or_default();
            let item = driver.current().unwrap_or_default();
            let (key, value) = self.inner.extractor.cast(&original_key, &item, position)?;
            if visit(&item, key, value)?.is_break() {
                break;
            }
            driver.next()?;
            position += 1;
        }
        Ok(())
    }

    /// First value whose computed key matches, if any.
    pub fn find(&self, key: &Value) -> Result<Option<Value>> {
        let mut found = None;
        self.scan(|_, k, v| {
            if k.loose_eq(key) {
                found = Some(v);
                return Ok(ControlFlow::Break(()));
            }
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(found)
    }

    pub fn get(&self, key: &Value) -> Result<Value> {
        self.find(key)?
            .ok_or_else(|| RecastError::NotFound(format!("map key {}", key)))
    }

    pub fn has(&self, key: &Value) -> Result<bool> {
        Ok(self.find(key)?.is_some())
    }

    fn writer(&self, operation: &str) -> Result<&dyn ItemWriter> {
        self.inner.extractor.writer().ok_or_else(|| {
            RecastError::MissingCapability(format!(
                "the map's extractor cannot {} items",
                operation
            ))
        })
    }

    /// Write `value` into every item whose computed key matches. Returns the
    /// number of items written.
    pub fn set(&self, key: &Value, value: Value) -> Result<usize> {
        let writer = self.writer("write")?;
        let mut targets = Vec::new();
        self.scan(|item, k, _| {
            if k.loose_eq(key) {
                targets.push(item.clone());
            }
            Ok(ControlFlow::Continue(()))
        })?;
        for item in &targets {
            writer.set_item_value(item, value.clone())?;
        }
        log::debug!("map set {} on {} item(s)", key, targets.len());
        Ok(targets.len())
    }

    /// Remove the key field from every item whose computed key matches.
    /// Returns the number of items touched.
    pub fn delete(&self, key: &Value) -> Result<usize> {
        let writer = self.writer("unset")?;
        let mut targets = Vec::new();
        self.scan(|item, k, _| {
            if k.loose_eq(key) {
                targets.push(item.clone());
            }
            Ok(ControlFlow::Continue(()))
        })?;
        for item in &targets {
            writer.unset_item_key(item, None)?;
        }
        log::debug!("map delete {} on {} item(s)", key, targets.len());
        Ok(targets.len())
    }

    /// Cheap size when the source has one, otherwise a full counting pass.
    pub fn count(&self) -> Result<usize> {
        match self.inner.src.cheap_len() {
            Some(len) => Ok(len),
            None => self.inner.src.drain_count(),
        }
    }

    pub fn iter(&self) -> Result<CastableIterator> {
        Ok(CastableIterator::from_map(self.clone()))
    }
}

impl fmt::Debug for Map {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Map").field("src", &self.inner.src).finish()
    }
}
