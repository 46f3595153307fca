//! # Recast Architecture
//!
//! Recast is a **data-projection library**. Given heterogeneous records (objects,
//! associative containers or bare scalars) it answers two questions: "what is
//! the key/value of this record" and "how do I expose it as a column". It never
//! sorts, filters, validates, persists or caches the data it projects.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Views                                                      │
//! │  Map (keyed, write-through)  CastableIterator (lazy pairs)  │
//! │  ColumnList / Column          Table (rows + sort links)     │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Extraction                                                 │
//! │  Extractor (accessor pair)   ProxyExtractor (ValueProxy)    │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Records and Sources                                        │
//! │  Value / Structured / Record   Source + Cursor drivers      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Shared Records
//!
//! Containers and objects inside a [`Value`] are shared handles. A write made
//! through a [`Map`], a [`ValueProxy`] or an [`Extractor`] lands on the record
//! itself and every holder sees it.
//!
//! ## The Single Slot
//!
//! A [`ColumnList`] has exactly one current record. [`Table::current`] and
//! [`ProxyExtractor`] both move it. Nothing here is thread-safe, and two
//! interleaved traversals over one list observe each other: finish one before
//! starting the next.
//!
//! ## Module Overview
//!
//! - [`value`]: The tagged record model and loose key equality
//! - [`record`]: The `Structured` capability and the generic `Record`
//! - [`accessor`]: Accessor strings parsed once into property/method/sentinel
//! - [`collections`]: `OrderedList` and `Dictionary`
//! - [`source`]: Source classification and driver cursors
//! - [`extractor`]: `Extractor`, the `Caster` and `ItemWriter` capabilities
//! - [`proxy`]: `ForwardingProxy` and `ValueProxy`
//! - [`proxy_extractor`]: Extraction producing `ValueProxy` values
//! - [`map`]: The associative re-keying view
//! - [`iter`]: `CastableIterator`
//! - [`column`]: `Column`, `ColumnList`, value getters
//! - [`table`]: `Table`, request context, css classes
//! - [`config`]: Table settings in `recast.json`
//! - [`error`]: Error types

pub mod accessor;
pub mod collections;
pub mod column;
pub mod config;
pub mod error;
pub mod extractor;
pub mod iter;
pub mod map;
pub mod proxy;
pub mod proxy_extractor;
pub mod record;
pub mod source;
pub mod table;
pub mod value;

pub use accessor::{accessor, Accessor, AccessorKind, Sentinel};
pub use collections::{Dictionary, OrderedList};
pub use column::{Column, ColumnDeclaration, ColumnList, DottedPath};
pub use config::TableConfig;
pub use error::{RecastError, Result};
pub use extractor::{Caster, CasterSpec, Extractor, ItemWriter};
pub use iter::CastableIterator;
pub use map::Map;
pub use proxy::{ForwardingProxy, ValueProxy};
pub use proxy_extractor::ProxyExtractor;
pub use record::{Record, Structured};
pub use source::{Cursor, IterCursor, Source, Traversable};
pub use table::{css_class, RequestContext, Table};
pub use value::{Shape, Value};
