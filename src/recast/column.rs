//! # Columns
//!
//! A [`Column`] names one field of a record (via an [`Accessor`]) together with
//! an optional title, a custom value getter and a value formatter.
//!
//! A [`ColumnList`] owns an ordered set of columns and a **single** shared
//! current-record slot. Appending a column binds it to the list, and from then
//! on the list's slot is the column's record source; a record set directly on
//! the column is only consulted while it belongs to no list.
//!
//! ```text
//! ColumnList ──slot──> current record
//!    │
//!    ├── Column "name"   reads slot.name
//!    └── Column "age"    reads slot.age
//! ```
//!
//! There is exactly one current record per list. Interleaving two traversals
//! over the same list makes both observe whichever record was set last; use
//! [`ColumnList::with_record`] to scope a binding.

use crate::accessor::Accessor;
use crate::error::{RecastError, Result};
use crate::record;
use crate::table::TableState;
use crate::value::{Shape, Value};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Custom value resolution: `(column, record, accessor name) -> value`.
pub type ValueGetter = Rc<dyn Fn(&Column, &Value, &str) -> Result<Value>>;

/// Applied to every value read through [`Column::value`].
pub type ValueFormatter = Rc<dyn Fn(Value) -> Value>;

struct ColumnState {
    accessor: Accessor,
    title: Option<String>,
    src: Value,
    getter: Option<ValueGetter>,
    formatter: Option<ValueFormatter>,
    list: Weak<ListState>,
    table: Weak<RefCell<TableState>>,
}

/// Cloning a `Column` yields another handle to the same column.
#[derive(Clone)]
pub struct Column {
    inner: Rc<RefCell<ColumnState>>,
}

impl Column {
    pub fn new(accessor: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ColumnState {
                accessor: Accessor::parse(accessor),
                title: None,
                src: Value::Null,
                getter: None,
                formatter: None,
                list: Weak::new(),
                table: Weak::new(),
            })),
        }
    }

    pub fn with_title(self, title: impl Into<String>) -> Self {
        self.inner.borrow_mut().title = Some(title.into());
        self
    }

    pub fn with_getter<F>(self, getter: F) -> Self
    where
        F: Fn(&Column, &Value, &str) -> Result<Value> + 'static,
    {
        self.inner.borrow_mut().getter = Some(Rc::new(getter));
        self
    }

    pub fn with_formatter<F>(self, formatter: F) -> Self
    where
        F: Fn(Value) -> Value + 'static,
    {
        self.inner.borrow_mut().formatter = Some(Rc::new(formatter));
        self
    }

    pub fn with_src(self, src: Value) -> Self {
        self.set_src(src);
        self
    }

    pub fn accessor(&self) -> Accessor {
        self.inner.borrow().accessor.clone()
    }

    pub fn set_accessor(&self, raw: &str) {
        self.inner.borrow_mut().accessor = Accessor::parse(raw);
    }

    /// The resolved accessor name, without any `()` suffix.
    pub fn name(&self) -> String {
        self.inner.borrow().accessor.name().to_string()
    }

    pub fn title(&self) -> String {
        let state = self.inner.borrow();
        match &state.title {
            Some(title) if !title.is_empty() => title.clone(),
            _ => state.accessor.name().to_string(),
        }
    }

    pub fn set_title(&self, title: impl Into<String>) {
        self.inner.borrow_mut().title = Some(title.into());
    }

    pub fn set_getter(&self, getter: ValueGetter) {
        self.inner.borrow_mut().getter = Some(getter);
    }

    pub fn set_formatter(&self, formatter: ValueFormatter) {
        self.inner.borrow_mut().formatter = Some(formatter);
    }

    /// The record this column reads: the list's slot when bound to a list,
    /// otherwise the locally set record.
    pub fn src(&self) -> Value {
        match self.column_list() {
            Some(list) => list.src(),
            None => self.inner.borrow().src.clone(),
        }
    }

    pub fn set_src(&self, src: Value) {
        self.inner.borrow_mut().src = src;
    }

    /// Value before formatting.
    pub fn raw_value(&self) -> Result<Value> {
        let src = self.src();
        let getter = self.inner.borrow().getter.clone();
        if let Some(getter) = getter {
            let name = self.name();
            return getter(self, &src, &name);
        }
        if src.shape() == Shape::Scalar {
            return Err(RecastError::UnsupportedSource(format!(
                "column '{}' cannot read a scalar {}",
                self.name(),
                src.type_name()
            )));
        }
        let accessor = self.accessor();
        record::read(&src, &accessor)
    }

    pub fn value(&self) -> Result<Value> {
        let value = self.raw_value()?;
        let formatter = self.inner.borrow().formatter.clone();
        Ok(match formatter {
            Some(format) => format(value),
            None => value,
        })
    }

    pub fn column_list(&self) -> Option<ColumnList> {
        self.inner
            .borrow()
            .list
            .upgrade()
            .map(|inner| ColumnList { inner })
    }

    pub fn ptr_eq(&self, other: &Column) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    pub(crate) fn bind_list(&self, list: &ColumnList) {
        self.inner.borrow_mut().list = Rc::downgrade(&list.inner);
    }

    pub(crate) fn bind_table(&self, table: Weak<RefCell<TableState>>) {
        self.inner.borrow_mut().table = table;
    }

    pub(crate) fn table_state(&self) -> Option<Rc<RefCell<TableState>>> {
        self.inner.borrow().table.upgrade()
    }
}

impl fmt::Debug for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Column")
            .field("accessor", &state.accessor)
            .field("title", &state.title)
            .field("getter", &state.getter.is_some())
            .field("formatter", &state.formatter.is_some())
            .finish()
    }
}

/// Getter resolving `"address.city"` through nested records.
///
/// Walking stops early at the first scalar, which is returned as is. A missing
/// segment reads as `Null`.
#[derive(Debug, Clone)]
pub struct DottedPath {
    dot: String,
}

impl Default for DottedPath {
    fn default() -> Self {
        Self {
            dot: ".".to_string(),
        }
    }
}

impl DottedPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_separator(dot: impl Into<String>) -> Self {
        Self { dot: dot.into() }
    }

    pub fn resolve(&self, src: &Value, path: &str) -> Value {
        let mut node = src.clone();
        for part in path.split(self.dot.as_str()) {
            if node.shape() == Shape::Scalar {
                return node;
            }
            node = record::member(&node, part).unwrap_or_default();
        }
        node
    }

    pub fn getter(self) -> ValueGetter {
        Rc::new(move |_: &Column, src: &Value, path: &str| {
            Ok(self.resolve(src, path))
        })
    }
}

struct ListState {
    columns: RefCell<Vec<Column>>,
    src: RefCell<Value>,
}

/// Cloning a `ColumnList` yields another handle to the same list and slot.
#[derive(Clone)]
pub struct ColumnList {
    inner: Rc<ListState>,
}

impl Default for ColumnList {
    fn default() -> Self {
        Self {
            inner: Rc::new(ListState {
                columns: RefCell::new(Vec::new()),
                src: RefCell::new(Value::Null),
            }),
        }
    }
}

impl ColumnList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from accessor names or `(accessor, title)` pairs.
    pub fn from_declaration(declaration: impl Into<ColumnDeclaration>) -> Self {
        let list = Self::new();
        let declaration: ColumnDeclaration = declaration.into();
        match declaration {
            ColumnDeclaration::Names(names) => {
                for name in names {
                    list.append(Column::new(&name));
                }
            }
            ColumnDeclaration::Titled(pairs) => {
                for (name, title) in pairs {
                    list.append(Column::new(&name).with_title(title));
                }
            }
        }
        list
    }

    pub fn append(&self, column: Column) -> &Self {
        column.bind_list(self);
        self.inner.columns.borrow_mut().push(column);
        self
    }

    pub fn columns(&self) -> Vec<Column> {
        self.inner.columns.borrow().clone()
    }

    pub fn get(&self, index: usize) -> Option<Column> {
        self.inner.columns.borrow().get(index).cloned()
    }

    pub fn by_name(&self, name: &str) -> Option<Column> {
        self.inner
            .columns
            .borrow()
            .iter()
            .find(|c| c.name() == name)
            .cloned()
    }

    /// Position of this exact column (by identity).
    pub fn index_of(&self, column: &Column) -> Result<usize> {
        self.inner
            .columns
            .borrow()
            .iter()
            .position(|c| c.ptr_eq(column))
            .ok_or_else(|| RecastError::NotFound(format!("column '{}'", column.name())))
    }

    pub fn len(&self) -> usize {
        self.inner.columns.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> std::vec::IntoIter<Column> {
        self.columns().into_iter()
    }

    pub fn src(&self) -> Value {
        self.inner.src.borrow().clone()
    }

    pub fn set_src(&self, src: Value) {
        *self.inner.src.borrow_mut() = src;
    }

    pub fn clear_src(&self) {
        self.set_src(Value::Null);
    }

    /// Bind `record` for the duration of `body`, then restore the previous one.
    /// The previous record is restored even if `body` panics.
    pub fn with_record<R>(&self, record: Value, body: impl FnOnce(&ColumnList) -> R) -> R {
        let _restore = RestoreSlot {
            slot: &self.inner.src,
            previous: Some(self.inner.src.replace(record)),
        };
        body(self)
    }

    pub fn titles(&self) -> Vec<String> {
        self.iter().map(|c| c.title()).collect()
    }

    /// Every column's value for the current record.
    pub fn values(&self) -> Result<Vec<Value>> {
        self.iter().map(|c| c.value()).collect()
    }

    pub fn ptr_eq(&self, other: &ColumnList) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

/// Puts a list's previous record back when dropped.
struct RestoreSlot<'a> {
    slot: &'a RefCell<Value>,
    previous: Option<Value>,
}

impl Drop for RestoreSlot<'_> {
    fn drop(&mut self) {
        if let Some(previous) = self.previous.take() {
            *self.slot.borrow_mut() = previous;
        }
    }
}

impl fmt::Debug for ColumnList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColumnList")
            .field("columns", &self.iter().map(|c| c.name()).collect::<Vec<_>>())
            .field("src", &self.inner.src.borrow())
            .finish()
    }
}

impl IntoIterator for &ColumnList {
    type Item = Column;
    type IntoIter = std::vec::IntoIter<Column>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Column declarations accepted by [`ColumnList::from_declaration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnDeclaration {
    /// Accessors; titles default to the names.
    Names(Vec<String>),
    /// `(accessor, title)` pairs.
    Titled(Vec<(String, String)>),
}

impl From<Vec<String>> for ColumnDeclaration {
    fn from(names: Vec<String>) -> Self {
        ColumnDeclaration::Names(names)
    }
}

impl From<Vec<&str>> for ColumnDeclaration {
    fn from(names: Vec<&str>) -> Self {
        ColumnDeclaration::Names(names.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for ColumnDeclaration {
    fn from(names: [&str; N]) -> Self {
        ColumnDeclaration::Names(names.iter().map(|n| n.to_string()).collect())
    }
}

impl From<Vec<(String, String)>> for ColumnDeclaration {
    fn from(pairs: Vec<(String, String)>) -> Self {
        ColumnDeclaration::Titled(pairs)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for ColumnDeclaration {
    fn from(pairs: [(&str, &str); N]) -> Self {
        ColumnDeclaration::Titled(
            pairs
                .iter()
                .map(|(n, t)| (n.to_string(), t.to_string()))
                .collect(),
        )
    }
}

impl From<ColumnDeclaration> for ColumnList {
    fn from(declaration: ColumnDeclaration) -> Self {
        ColumnList::from_declaration(declaration)
    }
}

impl From<Vec<&str>> for ColumnList {
    fn from(names: Vec<&str>) -> Self {
        ColumnList::from_declaration(names)
    }
}

impl<const N: usize> From<[&str; N]> for ColumnList {
    fn from(names: [&str; N]) -> Self {
        ColumnList::from_declaration(names)
    }
}

impl<const N: usize> From<[(&str, &str); N]> for ColumnList {
    fn from(pairs: [(&str, &str); N]) -> Self {
        ColumnList::from_declaration(pairs)
    }
}
