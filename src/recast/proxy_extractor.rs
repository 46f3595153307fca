//! # Proxy Extractor
//!
//! Decorates an extractor so the value half of every pair is a [`ValueProxy`]
//! wrapping the **item** (not the extracted value), stamped with the extracted
//! key, value and the position.
//!
//! When a [`ColumnList`] is bound, every extraction also moves the list's
//! current-record slot to the item and attaches the list to the proxy, so
//! column reads on the proxy reflect this row.
//!
//! ## Single-slot constraint
//!
//! Each extraction creates a new proxy and rebinds the shared slot. A proxy kept
//! past its iteration step still wraps its own record, but its columns now
//! report whatever row was extracted last. Driving this extractor and a
//! [`crate::table::Table`] over the same list at the same time cross-talks in
//! the same way. Fully consume one traversal before starting another.

use crate::column::ColumnList;
use crate::error::Result;
use crate::extractor::{Caster, CasterSpec, Extractor, ItemWriter};
use crate::proxy::ValueProxy;
use crate::value::Value;
use std::rc::Rc;

#[derive(Clone)]
enum Inner {
    Extractor(Extractor),
    Custom(Rc<dyn Caster>),
}

#[derive(Clone)]
pub struct ProxyExtractor {
    inner: Inner,
    columns: Option<ColumnList>,
}

impl ProxyExtractor {
    pub fn new(key: &str, value: &str) -> Self {
        Self::from_extractor(Extractor::new(key, value))
    }

    pub fn from_extractor(extractor: Extractor) -> Self {
        Self {
            inner: Inner::Extractor(extractor),
            columns: None,
        }
    }

    /// Wrap an arbitrary caster, e.g. a closure.
    pub fn from_caster(caster: Rc<dyn Caster>) -> Self {
        Self {
            inner: Inner::Custom(caster),
            columns: None,
        }
    }

    pub fn with_columns(mut self, columns: ColumnList) -> Self {
        self.columns = Some(columns);
        self
    }

    pub fn columns(&self) -> Option<&ColumnList> {
        self.columns.as_ref()
    }

    /// The wrapped accessor extractor, if this decorates one.
    pub fn extractor(&self) -> Option<&Extractor> {
        match &self.inner {
            Inner::Extractor(e) => Some(e),
            Inner::Custom(_) => None,
        }
    }

    pub fn extractor_mut(&mut self) -> Option<&mut Extractor> {
        match &mut self.inner {
            Inner::Extractor(e) => Some(e),
            Inner::Custom(_) => None,
        }
    }

    fn inner_caster(&self) -> &dyn Caster {
        match &self.inner {
            Inner::Extractor(e) => e as &dyn Caster,
            Inner::Custom(c) => c.as_ref(),
        }
    }

    /// Extract and return the typed proxy.
    pub fn extract_proxy(
        &self,
        original_key: &Value,
        item: &Value,
        position: usize,
    ) -> Result<(Value, ValueProxy)> {
        let (key, value) = self.inner_caster().cast(original_key, item, position)?;
        let mut proxy = ValueProxy::new(item.clone()).stamp(key.clone(), value, position);
        if let Some(columns) = &self.columns {
            columns.set_src(item.clone());
            proxy = proxy.bind_columns(columns.clone());
        }
        Ok((key, proxy))
    }
}

impl Caster for ProxyExtractor {
    fn cast(&self, original_key: &Value, item: &Value, position: usize) -> Result<(Value, Value)> {
        let (key, proxy) = self.extract_proxy(original_key, item, position)?;
        Ok((key, Value::object(proxy)))
    }

    fn writer(&self) -> Option<&dyn ItemWriter> {
        self.inner_caster().writer()
    }
}

impl From<ProxyExtractor> for CasterSpec {
    fn from(extractor: ProxyExtractor) -> Self {
        CasterSpec::Caster(Rc::new(extractor))
    }
}
