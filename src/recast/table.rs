//! # Table
//!
//! A row-wise view over a source. Every row read through [`Table::current`] is
//! pushed into the table's [`ColumnList`] slot, so the columns report that row
//! until the next call.
//!
//! The table never reorders its source. Sort columns are a declared intent
//! (typically the caller's UI state) used to render sort indicators and the
//! links that flip a column's direction.
//!
//! ## Links
//!
//! [`Table::build_link`] merges the persistent link parameters with the extra
//! parameters and hands them to the injected [`LinkBuilder`]. Without one, the
//! link is built from the [`RequestContext`]: its path, and its query merged with
//! the parameters. A table with neither cannot build links.
//!
//! ## Item Class
//!
//! The item class is a styling hint. Unless set explicitly it is derived from
//! the first object row: its type name, or the `class_name` property of an
//! anonymous [`Record`]. Deriving it traverses the source, which consumes a
//! single-pass source.

use crate::column::{Column, ColumnList};
use crate::config::TableConfig;
use crate::error::{RecastError, Result};
use crate::record::Record;
use crate::source::{Cursor, Source};
use crate::value::Value;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use url::form_urlencoded;

/// Query parameters in insertion order.
pub type Params = Vec<(String, String)>;

/// Custom link construction: `(table, merged params) -> href`.
pub type LinkBuilder = Rc<dyn Fn(&Table, &[(String, String)]) -> Result<String>>;

/// The current request as seen by link building and sort fallbacks.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub path: String,
    pub query: Params,
}

impl RequestContext {
    pub fn new(path: impl Into<String>, query: Params) -> Self {
        Self {
            path: path.into(),
            query,
        }
    }

    /// Split a request URI like `/users?page=2` into path and query.
    pub fn parse(uri: &str) -> Self {
        let (path, query) = uri.split_once('?').unwrap_or((uri, ""));
        Self {
            path: path.to_string(),
            query: form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        }
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Overwrite existing keys in place, append new ones.
fn merge_params(base: &[(String, String)], extra: &[(String, String)]) -> Params {
    let mut merged = base.to_vec();
    for (key, value) in extra {
        match merged.iter_mut().find(|(k, _)| k == key) {
            Some(slot) => slot.1 = value.clone(),
            None => merged.push((key.clone(), value.clone())),
        }
    }
    merged
}

/// Css token for a type name: last path segment, camel humps split by `-`,
/// lower-cased. `App\Models\BlogPost` becomes `blog-post`.
pub fn css_class(type_name: &str) -> String {
    let base = type_name
        .rsplit(['\\', '/', ':'])
        .next()
        .unwrap_or(type_name);
    let mut out = String::with_capacity(base.len() + 4);
    let mut prev_lower = false;
    for ch in base.chars() {
        if ch.is_uppercase() && prev_lower {
            out.push('-');
        }
        prev_lower = ch.is_lowercase();
        out.extend(ch.to_lowercase());
    }
    out
}

pub(crate) struct TableState {
    src: Source,
    columns: ColumnList,
    sort_columns: Params,
    sort_param: String,
    order_param: String,
    asc: String,
    desc: String,
    link_builder: Option<LinkBuilder>,
    link_params: Params,
    request: Option<RequestContext>,
    item_class: Option<String>,
    calculated_item_class: Option<String>,
    css_classes: Option<Vec<String>>,
    driver: Option<Box<dyn Cursor>>,
    position: usize,
}

/// Cloning a `Table` yields another handle to the same table.
#[derive(Clone)]
pub struct Table {
    inner: Rc<RefCell<TableState>>,
}

impl Table {
    pub fn new(src: impl Into<Source>) -> Self {
        let defaults = TableConfig::default();
        Self {
            inner: Rc::new(RefCell::new(TableState {
                src: src.into(),
                columns: ColumnList::new(),
                sort_columns: Vec::new(),
                sort_param: defaults.sort_param,
                order_param: defaults.order_param,
                asc: defaults.asc,
                desc: defaults.desc,
                link_builder: None,
                link_params: Vec::new(),
                request: None,
                item_class: None,
                calculated_item_class: None,
                css_classes: None,
                driver: None,
                position: 0,
            })),
        }
    }

    pub fn with_columns(self, columns: impl Into<ColumnList>) -> Self {
        self.set_columns(columns);
        self
    }

    /// Apply parameter names, tokens and link parameters from a config.
    pub fn with_config(self, config: &TableConfig) -> Self {
        {
            let mut state = self.inner.borrow_mut();
            state.sort_param = config.sort_param.clone();
            state.order_param = config.order_param.clone();
            state.asc = config.asc.clone();
            state.desc = config.desc.clone();
            state.link_params = config
                .link_params
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
        }
        self
    }

    pub fn with_request(self, request: RequestContext) -> Self {
        self.set_request(Some(request));
        self
    }

    pub fn with_link_builder<F>(self, builder: F) -> Self
    where
        F: Fn(&Table, &[(String, String)]) -> Result<String> + 'static,
    {
        self.set_link_builder(Rc::new(builder));
        self
    }

    pub fn src(&self) -> Source {
        self.inner.borrow().src.clone()
    }

    /// Replace the source. Drops the current traversal and derived item class.
    pub fn set_src(&self, src: impl Into<Source>) {
        let mut state = self.inner.borrow_mut();
        state.src = src.into();
        state.driver = None;
        state.position = 0;
        state.calculated_item_class = None;
        state.css_classes = None;
    }

    pub fn columns(&self) -> ColumnList {
        self.inner.borrow().columns.clone()
    }

    /// Install a column list and bind every column back to this table.
    pub fn set_columns(&self, columns: impl Into<ColumnList>) {
        let columns: ColumnList = columns.into();
        for column in &columns {
            column.bind_table(Rc::downgrade(&self.inner));
        }
        self.inner.borrow_mut().columns = columns;
    }

    /// Append one column to the current list.
    pub fn add_column(&self, column: Column) {
        column.bind_table(Rc::downgrade(&self.inner));
        self.columns().append(column);
    }

    pub fn request(&self) -> Option<RequestContext> {
        self.inner.borrow().request.clone()
    }

    pub fn set_request(&self, request: Option<RequestContext>) {
        self.inner.borrow_mut().request = request;
    }

    // ---- sort state ----

    /// Declare (or overwrite) a column's sort direction. Rows are not touched.
    pub fn add_sort_column(&self, name: &str, direction: &str) {
        let mut state = self.inner.borrow_mut();
        let extra = [(name.to_string(), direction.to_string())];
        state.sort_columns = merge_params(&state.sort_columns, &extra);
    }

    pub fn has_sort_column(&self, name: &str) -> bool {
        self.inner
            .borrow()
            .sort_columns
            .iter()
            .any(|(n, _)| n == name)
    }

    pub fn sort_columns(&self) -> Params {
        self.inner.borrow().sort_columns.clone()
    }

    /// Declared direction, else the request's order when it sorts by `name`,
    /// else an empty string.
    pub fn sort_order(&self, name: &str) -> String {
        let state = self.inner.borrow();
        if let Some((_, direction)) = state.sort_columns.iter().find(|(n, _)| n == name) {
            return direction.clone();
        }
        state
            .request
            .as_ref()
            .filter(|r| r.param(&state.sort_param) == Some(name))
            .and_then(|r| r.param(&state.order_param))
            .unwrap_or_default()
            .to_string()
    }

    pub fn sort_param_name(&self) -> String {
        self.inner.borrow().sort_param.clone()
    }

    pub fn set_sort_param_name(&self, name: &str) {
        self.inner.borrow_mut().sort_param = name.to_string();
    }

    pub fn order_param_name(&self) -> String {
        self.inner.borrow().order_param.clone()
    }

    pub fn set_order_param_name(&self, name: &str) {
        self.inner.borrow_mut().order_param = name.to_string();
    }

    pub fn asc_name(&self) -> String {
        self.inner.borrow().asc.clone()
    }

    pub fn set_asc_name(&self, name: &str) {
        self.inner.borrow_mut().asc = name.to_string();
    }

    pub fn desc_name(&self) -> String {
        self.inner.borrow().desc.clone()
    }

    pub fn set_desc_name(&self, name: &str) {
        self.inner.borrow_mut().desc = name.to_string();
    }

    // ---- links ----

    pub fn link_params(&self) -> Params {
        self.inner.borrow().link_params.clone()
    }

    /// Replace the persistent link parameters.
    pub fn set_link_params(&self, params: Params) {
        self.inner.borrow_mut().link_params = merge_params(&[], &params);
    }

    pub fn set_link_builder(&self, builder: LinkBuilder) {
        self.inner.borrow_mut().link_builder = Some(builder);
    }

    pub fn has_link_builder(&self) -> bool {
        self.inner.borrow().link_builder.is_some()
    }

    pub fn build_link(&self, extra: &[(String, String)]) -> Result<String> {
        let (builder, params, request) = {
            let state = self.inner.borrow();
            (
                state.link_builder.clone(),
                merge_params(&state.link_params, extra),
                state.request.clone(),
            )
        };

        if let Some(builder) = builder {
            log::trace!("building link through custom builder");
            return builder(self, &params);
        }

        let request = request.ok_or_else(|| {
            RecastError::InvalidConfiguration(
                "building links needs a link builder or a request context".to_string(),
            )
        })?;
        let all = merge_params(&request.query, &params);
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(all.iter())
            .finish();
        Ok(format!("/{}?{}", request.path.trim_matches('/'), query))
    }

    // ---- item class ----

    pub fn set_item_class(&self, class: impl Into<String>) {
        let mut state = self.inner.borrow_mut();
        state.item_class = Some(class.into());
        state.css_classes = None;
    }

    pub fn item_class(&self) -> Result<String> {
        let (explicit, cached, src) = {
            let state = self.inner.borrow();
            (
                state.item_class.clone(),
                state.calculated_item_class.clone(),
                state.src.clone(),
            )
        };
        if let Some(class) = explicit.filter(|c| !c.is_empty()).or(cached) {
            return Ok(class);
        }

        let class = derive_item_class(&src)?;
        self.inner.borrow_mut().calculated_item_class = Some(class.clone());
        Ok(class)
    }

    /// Css classes for the rendered table. Empty when the item class cannot
    /// be determined.
    pub fn css_classes(&self) -> Vec<String> {
        if let Some(classes) = self.inner.borrow().css_classes.clone() {
            return classes;
        }
        let classes: Vec<String> = match self.item_class() {
            Ok(class) => vec![css_class(&class)],
            Err(e) => {
                log::debug!("no css class for table: {}", e);
                Vec::new()
            }
        };
        self.inner.borrow_mut().css_classes = Some(classes.clone());
        classes
    }

    pub fn set_css_classes(&self, classes: Vec<String>) {
        self.inner.borrow_mut().css_classes = Some(classes);
    }

    // ---- row iteration ----

    pub fn rewind(&self) -> Result<()> {
        let src = self.src();
        let mut driver = src.driver()?;
        driver.rewind()?;
        log::debug!("table rewound over {} source", src.kind());
        let mut state = self.inner.borrow_mut();
        state.driver = Some(driver);
        state.position = 0;
        Ok(())
    }

    /// Run `f` against the driver with the table state released, so sources
    /// that run caster code may read the table. A driver installed meanwhile
    /// (by a nested rewind) wins over the one being put back.
    fn with_driver<R>(&self, f: impl FnOnce(&mut Box<dyn Cursor>) -> R) -> Option<R> {
        let mut driver = self.inner.borrow_mut().driver.take()?;
        let result = f(&mut driver);
        let mut state = self.inner.borrow_mut();
        if state.driver.is_none() {
            state.driver = Some(driver);
        }
        Some(result)
    }

    pub fn valid(&self) -> bool {
        self.with_driver(|d| d.valid()).unwrap_or(false)
    }

    /// The current row, also bound as the columns' current record.
    pub fn current(&self) -> Option<Value> {
        let row = self.with_driver(|d| d.current()).flatten()?;
        self.columns().set_src(row.clone());
        Some(row)
    }

    /// Row index within the current traversal.
    pub fn key(&self) -> usize {
        self.inner.borrow().position
    }

    /// Advance to the next row. The row index only moves once the driver did.
    pub fn next(&self) -> Result<()> {
        if let Some(advanced) = self.with_driver(|d| d.next()) {
            advanced?;
        }
        self.inner.borrow_mut().position += 1;
        Ok(())
    }

    /// Row count. Returns 0 for a single-pass source that cannot report its
    /// size.
    pub fn count(&self) -> Result<usize> {
        let src = self.src();
        if let Some(len) = src.cheap_len() {
            return Ok(len);
        }
        if src.is_replayable() {
            return src.drain_count();
        }
        Ok(0)
    }

    /// Rewind, then yield every row with the columns bound to it.
    pub fn rows(&self) -> Rows<'_> {
        Rows {
            table: self,
            started: false,
            failed: false,
        }
    }
}

fn derive_item_class(src: &Source) -> Result<String> {
    let mut driver = src.driver()?;
    driver.rewind()?;
    while driver.valid() {
        if let Some(item) = driver.current() {
            if let Some(obj) = item.as_object() {
                let named = item
                    .with_object(|r: &Record| {
                        r.is_anonymous()
                            .then(|| r.field("class_name"))
                            .and_then(|v| v.as_str().map(str::to_string))
                    })
                    .flatten();
                return Ok(named.unwrap_or_else(|| obj.borrow().type_name()));
            }
        }
        driver.next()?;
    }
    Err(RecastError::Underflow(
        "could not determine the item class, set it explicitly".to_string(),
    ))
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.inner.borrow();
        f.debug_struct("Table")
            .field("src", &state.src)
            .field("columns", &state.columns)
            .field("sort_columns", &state.sort_columns)
            .field("position", &state.position)
            .finish()
    }
}

/// Borrowing [`Iterator`] over a [`Table`]'s rows.
pub struct Rows<'a> {
    table: &'a Table,
    started: bool,
    failed: bool,
}

impl Iterator for Rows<'_> {
    type Item = Result<Value>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let step = if self.started {
            self.table.next()
        } else {
            self.started = true;
            self.table.rewind()
        };
        if let Err(e) = step {
            self.failed = true;
            return Some(Err(e));
        }
        self.table.current().map(Ok)
    }
}

/// Sort helpers for columns that belong to a table.
impl Column {
    pub fn table(&self) -> Option<Table> {
        self.table_state().map(|inner| Table { inner })
    }

    pub fn is_sorted(&self) -> bool {
        self.table()
            .is_some_and(|t| t.has_sort_column(&self.name()))
    }

    /// Current direction, empty when unsorted or not in a table.
    pub fn sort_order(&self) -> String {
        self.table()
            .map(|t| t.sort_order(&self.name()))
            .unwrap_or_default()
    }

    /// Link sorting by this column, flipping an ascending order to descending
    /// and anything else to ascending.
    pub fn sort_href(&self) -> Result<String> {
        let table = self.table().ok_or_else(|| {
            RecastError::InvalidConfiguration(format!(
                "column '{}' does not belong to a table",
                self.name()
            ))
        })?;
        let next = if table.sort_order(&self.name()) == table.asc_name() {
            table.desc_name()
        } else {
            table.asc_name()
        };
        table.build_link(&[
            (table.sort_param_name(), self.name()),
            (table.order_param_name(), next),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::CasterSpec;
    use crate::map::Map;
    use crate::source::IterCursor;

    fn people() -> Vec<Value> {
        vec![
            Value::object(Record::new("App\\Models\\BlogPost").with("name", "Ann").with("age", 30)),
            Value::object(Record::new("App\\Models\\BlogPost").with("name", "Bob").with("age", 40)),
        ]
    }

    fn params(pairs: &[(&str, &str)]) -> Params {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_current_binds_row_into_columns() {
        let table = Table::new(people()).with_columns(["name", "age"]);
        table.rewind().unwrap();
        assert!(table.valid());
        assert_eq!(table.key(), 0);

        table.current().unwrap();
        let columns = table.columns();
        assert_eq!(
            columns.values().unwrap(),
            vec![Value::from("Ann"), Value::Int(30)]
        );

        table.next().unwrap();
        table.current().unwrap();
        assert_eq!(table.key(), 1);
        assert_eq!(
            columns.values().unwrap(),
            vec![Value::from("Bob"), Value::Int(40)]
        );

        table.next().unwrap();
        assert!(!table.valid());
        assert!(table.current().is_none());
    }

    #[test]
    fn test_columns_keep_reporting_row_until_next_current() {
        let table = Table::new(people()).with_columns(["name"]);
        table.rewind().unwrap();
        table.current();
        table.next().unwrap();
        let name = table.columns().get(0).unwrap();
        assert_eq!(name.value().unwrap(), Value::from("Ann"));
        table.current();
        assert_eq!(name.value().unwrap(), Value::from("Bob"));
    }

    #[test]
    fn test_rows_iterate_and_rewind() {
        let table = Table::new(people()).with_columns(["name"]);
        let names: Vec<Value> = table
            .rows()
            .map(|row| {
                row.unwrap();
                table.columns().values().unwrap().remove(0)
            })
            .collect();
        assert_eq!(names, vec![Value::from("Ann"), Value::from("Bob")]);
        assert_eq!(table.rows().count(), 2);
    }

    #[test]
    fn test_single_pass_source_cannot_be_rewound() {
        let single = Source::from_cursor(IterCursor::from_values(people().into_iter()));
        let table = Table::new(single);
        table.rows().for_each(drop);
        assert!(matches!(
            table.rewind(),
            Err(RecastError::UnsupportedSource(_))
        ));
    }

    #[test]
    fn test_sort_intent_never_reorders_rows() {
        let table = Table::new(people()).with_columns(["name"]);
        table.add_sort_column("name", "desc");
        let first = table.rows().next().unwrap().unwrap();
        assert!(first.same_record(&people_first(&table)));
        assert!(table.has_sort_column("name"));
        assert_eq!(table.sort_order("name"), "desc");
    }

    fn people_first(table: &Table) -> Value {
        match table.src() {
            Source::List(list) => list.borrow().get(0).cloned().unwrap_or_default(),
            _ => Value::Null,
        }
    }

    #[test]
    fn test_add_sort_column_overwrites() {
        let table = Table::new(people());
        table.add_sort_column("name", "asc");
        table.add_sort_column("name", "desc");
        assert_eq!(table.sort_columns(), params(&[("name", "desc")]));
    }

    #[test]
    fn test_sort_order_falls_back_to_request() {
        let table = Table::new(people())
            .with_request(RequestContext::parse("/users?sort=age&order=desc"));
        assert_eq!(table.sort_order("age"), "desc");
        assert_eq!(table.sort_order("name"), "");
    }

    #[test]
    fn test_sort_href_toggles_direction() {
        let table = Table::new(people())
            .with_columns(["name", "age"])
            .with_request(RequestContext::parse("/users/"));
        table.add_sort_column("name", "asc");

        let name = table.columns().by_name("name").unwrap();
        let age = table.columns().by_name("age").unwrap();
        assert!(name.is_sorted());
        assert!(!age.is_sorted());
        assert_eq!(name.sort_href().unwrap(), "/users?sort=name&order=desc");
        assert_eq!(age.sort_href().unwrap(), "/users?sort=age&order=asc");
    }

    #[test]
    fn test_build_link_merges_request_and_link_params() {
        let table = Table::new(people())
            .with_request(RequestContext::parse("/list?page=2&q=a+b"));
        table.set_link_params(params(&[("view", "compact"), ("page", "1")]));
        let href = table.build_link(&params(&[("page", "3")])).unwrap();
        assert_eq!(href, "/list?page=3&q=a+b&view=compact");
    }

    #[test]
    fn test_build_link_prefers_injected_builder() {
        let table = Table::new(people()).with_link_builder(|t, params| {
            let joined: Vec<String> = params.iter().map(|(k, v)| format!("{}:{}", k, v)).collect();
            Ok(format!("{}|{}", t.sort_param_name(), joined.join(",")))
        });
        table.set_link_params(params(&[("a", "1")]));
        assert_eq!(
            table.build_link(&params(&[("b", "2")])).unwrap(),
            "sort|a:1,b:2"
        );
    }

    #[test]
    fn test_build_link_without_builder_or_request_fails() {
        let table = Table::new(people());
        assert!(matches!(
            table.build_link(&[]),
            Err(RecastError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_config_renames_params_and_tokens() {
        let mut config = TableConfig::default();
        config.sort_param = "by".to_string();
        config.order_param = "dir".to_string();
        config.asc = "up".to_string();
        config.desc = "down".to_string();
        config.link_params.insert("tab".to_string(), "all".to_string());

        let table = Table::new(people())
            .with_columns(["name"])
            .with_config(&config)
            .with_request(RequestContext::parse("/t"));
        table.add_sort_column("name", "up");
        let name = table.columns().get(0).unwrap();
        assert_eq!(name.sort_href().unwrap(), "/t?tab=all&by=name&dir=down");
    }

    #[test]
    fn test_item_class_from_first_object_row() {
        let table = Table::new(people());
        assert_eq!(table.item_class().unwrap(), "App\\Models\\BlogPost");
        assert_eq!(table.css_classes(), vec!["blog-post"]);
    }

    #[test]
    fn test_item_class_skips_scalars_and_reads_class_name() {
        let rows = vec![
            Value::from("x"),
            Value::object(Record::anonymous().with("class_name", "UserRow")),
        ];
        let table = Table::new(rows);
        assert_eq!(table.item_class().unwrap(), "UserRow");
    }

    #[test]
    fn test_item_class_underflows_on_empty_source() {
        let table = Table::new(Vec::<Value>::new());
        assert!(matches!(
            table.item_class(),
            Err(RecastError::Underflow(_))
        ));
        assert!(table.css_classes().is_empty());

        table.set_item_class("Order");
        assert_eq!(table.item_class().unwrap(), "Order");
        assert_eq!(table.css_classes(), vec!["order"]);
    }

    #[test]
    fn test_casters_may_read_the_table_while_rows_advance() {
        let slot: Rc<RefCell<Option<Table>>> = Rc::new(RefCell::new(None));
        let seen = Rc::clone(&slot);
        let map = Map::new(
            vec![Value::from("a"), Value::from("b")],
            CasterSpec::from_fn(move |k, v, _| {
                if let Some(table) = seen.borrow().as_ref() {
                    table.sort_order("x");
                    table.columns();
                    table.link_params();
                }
                Ok((k.clone(), v.clone()))
            }),
        )
        .unwrap();
        let table = Table::new(map);
        *slot.borrow_mut() = Some(table.clone());

        assert_eq!(table.rows().count(), 2);
        assert_eq!(table.key(), 2);
        // break the table -> map -> caster -> table cycle
        slot.borrow_mut().take();
    }

    #[test]
    fn test_failed_advance_keeps_row_index() {
        let table = Table::new(Map::new(
            vec![Value::Int(1), Value::Int(2)],
            CasterSpec::from_fn(|k, v, _| {
                if v == &Value::Int(2) {
                    return Err(RecastError::NotFound("row 2".to_string()));
                }
                Ok((k.clone(), v.clone()))
            }),
        )
        .unwrap());
        table.rewind().unwrap();
        assert_eq!(table.current(), Some(Value::Int(1)));

        assert!(table.next().is_err());
        assert_eq!(table.key(), 0);
        assert!(!table.valid());
        assert!(table.current().is_none());
    }

    #[test]
    fn test_count_follows_source_kind() {
        assert_eq!(Table::new(people()).count().unwrap(), 2);
        let single = Table::new(Source::from_values(people()));
        assert_eq!(single.count().unwrap(), 0);
    }

    #[test]
    fn test_columns_outside_a_table_cannot_link() {
        let column = Column::new("name");
        assert!(!column.is_sorted());
        assert_eq!(column.sort_order(), "");
        assert!(matches!(
            column.sort_href(),
            Err(RecastError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_css_class_splits_camel_case() {
        assert_eq!(css_class("BlogPost"), "blog-post");
        assert_eq!(css_class("App\\Models\\UserRole"), "user-role");
        assert_eq!(css_class("crate::model::Order"), "order");
        assert_eq!(css_class("HTMLParser"), "htmlparser");
    }

    #[test]
    fn test_request_context_parses_query() {
        let request = RequestContext::parse("/a/b?x=1&y=two%20words");
        assert_eq!(request.path, "/a/b");
        assert_eq!(request.param("y"), Some("two words"));
        assert_eq!(request.param("z"), None);
    }
}
