//! # Sources and Driver Iterators
//!
//! A [`Cursor`] is the pull-based driver protocol every higher-level component
//! advances: `rewind`, `valid`, `current`, `key`, `next`.
//!
//! A [`Source`] is anything a cursor can be built over. Driver selection:
//!
//! - **Array-like** sources ([`Source::List`], [`Source::Dict`]) get a fresh
//!   index-based driver every time, so they are always replayable. The driver
//!   reads the live container, so writes made mid-traversal are observed.
//! - **Cursor** sources are driven directly. They are usually single-pass.
//! - **Traversable** sources (and [`Source::Map`]) are asked to produce a new
//!   driver on every traversal.
//!
//! Values that fit none of these fail with [`RecastError::UnsupportedSource`]
//! at classification time ([`Source::try_from`]).

use crate::collections::{Dictionary, OrderedList};
use crate::error::{RecastError, Result};
use crate::map::Map;
use crate::record::Structured;
use crate::value::{Shared, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

pub trait Cursor {
    /// Move to the first element, recomputing the current pair.
    fn rewind(&mut self) -> Result<()>;

    fn valid(&self) -> bool;

    fn current(&self) -> Option<Value>;

    fn key(&self) -> Option<Value>;

    fn next(&mut self) -> Result<()>;

    /// Size, when it is known without traversing.
    fn len(&self) -> Option<usize> {
        None
    }
}

/// A source that can produce a fresh driver on demand.
pub trait Traversable {
    fn cursor(&self) -> Result<Box<dyn Cursor>>;

    fn len(&self) -> Option<usize> {
        None
    }
}

/// Index-based driver over a shared list. Keys are positions.
pub struct ListCursor {
    src: Shared<OrderedList>,
    pos: usize,
}

impl ListCursor {
    pub fn new(src: Shared<OrderedList>) -> Self {
        Self { src, pos: 0 }
    }
}

impl Cursor for ListCursor {
    fn rewind(&mut self) -> Result<()> {
        self.pos = 0;
        Ok(())
    }

    fn valid(&self) -> bool {
        self.pos < self.src.borrow().len()
    }

    fn current(&self) -> Option<Value> {
        self.src.borrow().get(self.pos).cloned()
    }

    fn key(&self) -> Option<Value> {
        self.valid().then(|| Value::from(self.pos))
    }

    fn next(&mut self) -> Result<()> {
        self.pos += 1;
        Ok(())
    }

    fn len(&self) -> Option<usize> {
        Some(self.src.borrow().len())
    }
}

/// Index-based driver over a shared dictionary, in insertion order.
pub struct DictCursor {
    src: Shared<Dictionary>,
    pos: usize,
}

impl DictCursor {
    pub fn new(src: Shared<Dictionary>) -> Self {
        Self { src, pos: 0 }
    }
}

impl Cursor for DictCursor {
    fn rewind(&mut self) -> Result<()> {
        self.pos = 0;
        Ok(())
    }

    fn valid(&self) -> bool {
        self.pos < self.src.borrow().len()
    }

    fn current(&self) -> Option<Value> {
        self.src.borrow().entry_at(self.pos).map(|(_, v)| v.clone())
    }

    fn key(&self) -> Option<Value> {
        self.src.borrow().entry_at(self.pos).map(|(k, _)| k.clone())
    }

    fn next(&mut self) -> Result<()> {
        self.pos += 1;
        Ok(())
    }

    fn len(&self) -> Option<usize> {
        Some(self.src.borrow().len())
    }
}

/// Single-pass driver over any Rust iterator of `(key, value)` pairs.
///
/// The first `rewind` pulls the first pair. Rewinding again before the cursor
/// has advanced is a no-op; rewinding after it has advanced fails, since the
/// underlying iterator cannot be replayed.
pub struct IterCursor {
    iter: Box<dyn Iterator<Item = (Value, Value)>>,
    current: Option<(Value, Value)>,
    started: bool,
    advanced: bool,
    len: Option<usize>,
}

impl IterCursor {
    pub fn new<I>(iter: I) -> Self
    where
        I: Iterator<Item = (Value, Value)> + 'static,
    {
        Self {
            iter: Box::new(iter),
            current: None,
            started: false,
            advanced: false,
            len: None,
        }
    }

    /// Values keyed by their position.
    pub fn from_values<I>(values: I) -> Self
    where
        I: Iterator<Item = Value> + 'static,
    {
        Self::new(
            values
                .enumerate()
                .map(|(i, v)| (Value::from(i), v)),
        )
    }

    /// Declare a size known up front, making the cursor countable.
    pub fn with_len(mut self, len: usize) -> Self {
        self.len = Some(len);
        self
    }
}

impl Cursor for IterCursor {
    fn rewind(&mut self) -> Result<()> {
        if self.advanced {
            return Err(RecastError::UnsupportedSource(
                "single-pass source cannot be rewound after it was advanced".to_string(),
            ));
        }
        if !self.started {
            self.current = self.iter.next();
            self.started = true;
        }
        Ok(())
    }

    fn valid(&self) -> bool {
        self.current.is_some()
    }

    fn current(&self) -> Option<Value> {
        self.current.as_ref().map(|(_, v)| v.clone())
    }

    fn key(&self) -> Option<Value> {
        self.current.as_ref().map(|(k, _)| k.clone())
    }

    fn next(&mut self) -> Result<()> {
        if !self.started {
            self.rewind()?;
        }
        self.current = self.iter.next();
        self.advanced = true;
        Ok(())
    }

    fn len(&self) -> Option<usize> {
        self.len
    }
}

/// Drives a cursor shared with the [`Source`] that owns it.
struct SharedCursor(Shared<dyn Cursor>);

impl Cursor for SharedCursor {
    fn rewind(&mut self) -> Result<()> {
        self.0.borrow_mut().rewind()
    }

    fn valid(&self) -> bool {
        self.0.borrow().valid()
    }

    fn current(&self) -> Option<Value> {
        self.0.borrow().current()
    }

    fn key(&self) -> Option<Value> {
        self.0.borrow().key()
    }

    fn next(&mut self) -> Result<()> {
        self.0.borrow_mut().next()
    }

    fn len(&self) -> Option<usize> {
        self.0.borrow().len()
    }
}

/// An object record that produces its own drivers.
struct ObjectTraversable(Shared<dyn Structured>);

impl Traversable for ObjectTraversable {
    fn cursor(&self) -> Result<Box<dyn Cursor>> {
        let record = self.0.borrow();
        record.cursor().ok_or_else(|| {
            RecastError::UnsupportedSource(format!(
                "{} cannot produce an iterator",
                record.type_name()
            ))
        })
    }
}

#[derive(Clone)]
pub enum Source {
    List(Shared<OrderedList>),
    Dict(Shared<Dictionary>),
    Cursor(Shared<dyn Cursor>),
    Traversable(Rc<dyn Traversable>),
    Map(Map),
}

impl Source {
    pub fn from_cursor<C: Cursor + 'static>(cursor: C) -> Self {
        Source::Cursor(Rc::new(RefCell::new(cursor)))
    }

    /// Single-pass source over plain values, keyed by position.
    pub fn from_values<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
        I::IntoIter: 'static,
    {
        Self::from_cursor(IterCursor::from_values(values.into_iter()))
    }

    pub fn from_traversable<T: Traversable + 'static>(traversable: T) -> Self {
        Source::Traversable(Rc::new(traversable))
    }

    /// Build the driver for one traversal.
    pub fn driver(&self) -> Result<Box<dyn Cursor>> {
        let driver: Box<dyn Cursor> = match self {
            Source::List(list) => Box::new(ListCursor::new(Rc::clone(list))),
            Source::Dict(dict) => Box::new(DictCursor::new(Rc::clone(dict))),
            Source::Cursor(cursor) => Box::new(SharedCursor(Rc::clone(cursor))),
            Source::Traversable(t) => t.cursor()?,
            Source::Map(map) => Box::new(map.iter()?),
        };
        log::trace!("built {} driver", self.kind());
        Ok(driver)
    }

    /// Size known without traversing.
    pub fn cheap_len(&self) -> Option<usize> {
        match self {
            Source::List(list) => Some(list.borrow().len()),
            Source::Dict(dict) => Some(dict.borrow().len()),
            Source::Cursor(cursor) => cursor.borrow().len(),
            Source::Traversable(t) => t.len(),
            Source::Map(map) => map.src().cheap_len(),
        }
    }

    /// Whether a second traversal sees the same elements again.
    pub fn is_replayable(&self) -> bool {
        match self {
            Source::Cursor(_) => false,
            Source::Map(map) => map.src().is_replayable(),
            _ => true,
        }
    }

    /// Count by traversing a fresh driver. Consumes single-pass sources.
    pub fn drain_count(&self) -> Result<usize> {
        let mut driver = self.driver()?;
        driver.rewind()?;
        let mut count = 0;
        while driver.valid() {
            count += 1;
            driver.next()?;
        }
        Ok(count)
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Source::List(_) => "list",
            Source::Dict(_) => "dict",
            Source::Cursor(_) => "cursor",
            Source::Traversable(_) => "traversable",
            Source::Map(_) => "map",
        }
    }
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::List(list) => f.debug_tuple("List").field(&list.borrow()).finish(),
            Source::Dict(dict) => f.debug_tuple("Dict").field(&dict.borrow()).finish(),
            other => write!(f, "Source::{}", other.kind()),
        }
    }
}

impl From<OrderedList> for Source {
    fn from(list: OrderedList) -> Self {
        Source::List(Rc::new(RefCell::new(list)))
    }
}

impl From<Dictionary> for Source {
    fn from(dict: Dictionary) -> Self {
        Source::Dict(Rc::new(RefCell::new(dict)))
    }
}

impl From<Vec<Value>> for Source {
    fn from(items: Vec<Value>) -> Self {
        Source::from(OrderedList::from(items))
    }
}

impl From<Shared<OrderedList>> for Source {
    fn from(list: Shared<OrderedList>) -> Self {
        Source::List(list)
    }
}

impl From<Shared<Dictionary>> for Source {
    fn from(dict: Shared<Dictionary>) -> Self {
        Source::Dict(dict)
    }
}

impl From<Map> for Source {
    fn from(map: Map) -> Self {
        Source::Map(map)
    }
}

impl TryFrom<Value> for Source {
    type Error = RecastError;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::List(list) => Ok(Source::List(list)),
            Value::Assoc(dict) => Ok(Source::Dict(dict)),
            Value::Object(obj) => {
                if obj.borrow().cursor().is_none() {
                    return Err(RecastError::UnsupportedSource(format!(
                        "{} is neither array-like nor iterable",
                        obj.borrow().type_name()
                    )));
                }
                Ok(Source::Traversable(Rc::new(ObjectTraversable(obj))))
            }
            other => Err(RecastError::UnsupportedSource(format!(
                "a scalar {} cannot be iterated",
                other.type_name()
            ))),
        }
    }
}
