//! # Extractors
//!
//! An extractor turns `(original_key, item, position)` into a new `(key, value)`
//! pair. Anything doing that implements [`Caster`]; closures of the right shape
//! do so automatically. [`Extractor`] is the accessor-driven implementation.
//!
//! ## Resolution Rules
//!
//! 1. **Structured items** resolve each accessor as a property read or a
//!    zero-argument method call. Sentinels are not consulted.
//! 2. **Indexed items** use the accessor names verbatim as indexes.
//! 3. **Scalar items** resolve through the sentinels:
//!    - key: `VALUE` → the item, `POSITION` → the position, otherwise the
//!      original key.
//!    - value: `KEY` → the original key, `POSITION` → the position, otherwise
//!      the item.
//!
//! ## Writing Back
//!
//! Writers implement [`ItemWriter`]. [`Extractor::set_item_value`] writes the
//! field named by the **key** accessor, not the value accessor. This mirrors
//! how maps use it (writing the field a record is keyed by); use
//! [`Extractor::set_item_field`] to write the field the value accessor reads.

use crate::accessor::{self, Accessor, Sentinel};
use crate::error::{RecastError, Result};
use crate::record;
use crate::value::{Shape, Value};
use std::rc::Rc;

pub trait Caster {
    fn cast(&self, original_key: &Value, item: &Value, position: usize) -> Result<(Value, Value)>;

    /// Write-back capability, when the caster supports it.
    fn writer(&self) -> Option<&dyn ItemWriter> {
        None
    }
}

impl<F> Caster for F
where
    F: Fn(&Value, &Value, usize) -> Result<(Value, Value)>,
{
    fn cast(&self, original_key: &Value, item: &Value, position: usize) -> Result<(Value, Value)> {
        self(original_key, item, position)
    }
}

pub trait ItemWriter {
    fn set_item_value(&self, item: &Value, value: Value) -> Result<()>;

    /// Remove `key` from the item, or the key accessor's field when `None`.
    fn unset_item_key(&self, item: &Value, key: Option<&str>) -> Result<()>;
}

/// How a caster is declared: either two accessor strings or a ready caster.
#[derive(Clone)]
pub enum CasterSpec {
    Accessors(String, String),
    Caster(Rc<dyn Caster>),
}

impl CasterSpec {
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(&Value, &Value, usize) -> Result<(Value, Value)> + 'static,
    {
        CasterSpec::Caster(Rc::new(f))
    }

    pub fn into_caster(self) -> Result<Rc<dyn Caster>> {
        match self {
            CasterSpec::Accessors(key, value) => {
                if key.is_empty() || value.is_empty() {
                    return Err(RecastError::InvalidConfiguration(
                        "accessor declarations need a non-empty key and value accessor"
                            .to_string(),
                    ));
                }
                Ok(Rc::new(Extractor::new(&key, &value)))
            }
            CasterSpec::Caster(caster) => Ok(caster),
        }
    }
}

impl From<(&str, &str)> for CasterSpec {
    fn from((key, value): (&str, &str)) -> Self {
        CasterSpec::Accessors(key.to_string(), value.to_string())
    }
}

impl From<Extractor> for CasterSpec {
    fn from(extractor: Extractor) -> Self {
        CasterSpec::Caster(Rc::new(extractor))
    }
}

impl From<Rc<dyn Caster>> for CasterSpec {
    fn from(caster: Rc<dyn Caster>) -> Self {
        CasterSpec::Caster(caster)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extractor {
    key: Accessor,
    value: Accessor,
}

impl Default for Extractor {
    /// Keeps the original key and the item itself.
    fn default() -> Self {
        Self::new(accessor::KEY, accessor::VALUE)
    }
}

impl Extractor {
    pub const POSITION: &'static str = accessor::POSITION;
    pub const VALUE: &'static str = accessor::VALUE;
    pub const KEY: &'static str = accessor::KEY;

    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: Accessor::parse(key),
            value: Accessor::parse(value),
        }
    }

    /// Key accessor only; the value is the item itself.
    pub fn keyed_by(key: &str) -> Self {
        Self::new(key, Self::VALUE)
    }

    pub fn key_accessor(&self) -> &Accessor {
        &self.key
    }

    pub fn value_accessor(&self) -> &Accessor {
        &self.value
    }

    pub fn set_key_accessor(&mut self, raw: &str) -> &mut Self {
        self.key = Accessor::parse(raw);
        self
    }

    pub fn set_value_accessor(&mut self, raw: &str) -> &mut Self {
        self.value = Accessor::parse(raw);
        self
    }

    pub fn extract(
        &self,
        original_key: &Value,
        item: &Value,
        position: usize,
    ) -> Result<(Value, Value)> {
        if item.shape() != Shape::Scalar {
            let key = record::read(item, &self.key)?;
            let value = record::read(item, &self.value)?;
            return Ok((key, value));
        }

        let key = match self.key.sentinel() {
            Some(Sentinel::Value) => item.clone(),
            Some(Sentinel::Position) => Value::from(position),
            _ => original_key.clone(),
        };
        let value = match self.value.sentinel() {
            Some(Sentinel::Key) => original_key.clone(),
            Some(Sentinel::Position) => Value::from(position),
            _ => item.clone(),
        };
        Ok((key, value))
    }

    /// Write `value` into the field named by the key accessor.
    pub fn set_item_value(&self, item: &Value, value: Value) -> Result<()> {
        write_through(&self.key, item, value)
    }

    /// Write `value` into the field named by the value accessor.
    pub fn set_item_field(&self, item: &Value, value: Value) -> Result<()> {
        write_through(&self.value, item, value)
    }

    pub fn unset_item_key(&self, item: &Value, key: Option<&str>) -> Result<()> {
        if self.key.is_method() {
            return Err(RecastError::MissingCapability(format!(
                "cannot unset through method accessor {}",
                self.key
            )));
        }
        let name = key.unwrap_or_else(|| self.key.name());
        record::remove(item, name)
    }
}

fn write_through(target: &Accessor, item: &Value, value: Value) -> Result<()> {
    if target.is_method() {
        return Err(RecastError::MissingCapability(format!(
            "cannot assign through method accessor {}",
            target
        )));
    }
    record::assign(item, target.name(), value)
}

impl Caster for Extractor {
    fn cast(&self, original_key: &Value, item: &Value, position: usize) -> Result<(Value, Value)> {
        self.extract(original_key, item, position)
    }

    fn writer(&self) -> Option<&dyn ItemWriter> {
        Some(self)
    }
}

impl ItemWriter for Extractor {
    fn set_item_value(&self, item: &Value, value: Value) -> Result<()> {
        Extractor::set_item_value(self, item, value)
    }

    fn unset_item_key(&self, item: &Value, key: Option<&str>) -> Result<()> {
        Extractor::unset_item_key(self, item, key)
    }
}
