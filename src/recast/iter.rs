//! # CastableIterator
//!
//! A pull-based adapter that re-keys and re-values any [`Source`] through a
//! [`Caster`]. It implements [`Cursor`] itself, so iterators stack.
//!
//! ## Lifecycle
//!
//! ```text
//! Start --rewind--> Positioned --next*--> Exhausted
//! ```
//!
//! `current`/`key` are only defined while positioned. `rewind` builds a fresh
//! driver, so array-like and iterator-producing sources can be traversed any
//! number of times; single-pass cursors cannot be rewound once advanced.
//!
//! ## Map Unwrapping
//!
//! Built over a [`Map`] without its own caster, the iterator adopts the map's
//! extractor and drives the map's underlying source directly. The map is kept
//! as the iterator's origin, so [`CastableIterator::to_map`] without a new
//! caster hands back that same map.

use crate::collections::{Dictionary, OrderedList};
use crate::error::{RecastError, Result};
use crate::extractor::{Caster, CasterSpec};
use crate::map::Map;
use crate::source::{Cursor, Source};
use crate::value::Value;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Start,
    Positioned,
    Exhausted,
}

pub struct CastableIterator {
    src: Source,
    origin: Option<Map>,
    caster: Rc<dyn Caster>,
    driver: Option<Box<dyn Cursor>>,
    state: State,
    position: usize,
    current: Option<(Value, Value)>,
}

impl CastableIterator {
    /// Iterate `src` through `caster`. A `Map` source may omit the caster.
    pub fn new(src: impl Into<Source>, caster: Option<CasterSpec>) -> Result<Self> {
        let src: Source = src.into();
        match (src, caster) {
            (Source::Map(map), None) => Ok(Self::from_map(map)),
            (src, Some(spec)) => Ok(Self::build(src, None, spec.into_caster()?)),
            (src, None) => Err(RecastError::InvalidConfiguration(format!(
                "no caster given for a {} source",
                src.kind()
            ))),
        }
    }

    /// Iterate `map`'s own source through its extractor.
    pub fn from_map(map: Map) -> Self {
        let src = map.src().clone();
        let caster = map.extractor();
        Self::build(src, Some(map), caster)
    }

    pub fn with_caster<F>(src: impl Into<Source>, caster: F) -> Self
    where
        F: Fn(&Value, &Value, usize) -> Result<(Value, Value)> + 'static,
    {
        Self::build(src.into(), None, Rc::new(caster))
    }

    fn build(src: Source, origin: Option<Map>, caster: Rc<dyn Caster>) -> Self {
        Self {
            src,
            origin,
            caster,
            driver: None,
            state: State::Start,
            position: 0,
            current: None,
        }
    }

    pub fn src(&self) -> &Source {
        &self.src
    }

    pub fn caster(&self) -> Rc<dyn Caster> {
        Rc::clone(&self.caster)
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Cast the driver's current element. Until the cast succeeds the
    /// iterator reads as exhausted, so a failed cast leaves no stale pair.
    fn load(&mut self) -> Result<()> {
        self.current = None;
        self.state = State::Exhausted;
        let Some(driver) = self.driver.as_ref() else {
            return Ok(());
        };
        if !driver.valid() {
            return Ok(());
        }
        let original_key = driver.key().unwrap_or_default();
        let item = driver.current().unwrap_or_default();
        let pair = self.caster.cast(&original_key, &item, self.position)?;
        self.current = Some(pair);
        self.state = State::Positioned;
        Ok(())
    }

    pub fn rewind(&mut self) -> Result<()> {
        let mut driver = self.src.driver()?;
        driver.rewind()?;
        self.driver = Some(driver);
        self.position = 0;
        self.load()
    }

    pub fn valid(&self) -> bool {
        self.state == State::Positioned
    }

    pub fn current(&self) -> Option<&Value> {
        self.current.as_ref().map(|(_, v)| v)
    }

    pub fn key(&self) -> Option<&Value> {
        self.current.as_ref().map(|(k, _)| k)
    }

    /// The raw driver item behind the current pair.
    pub fn item(&self) -> Option<Value> {
        if !self.valid() {
            return None;
        }
        self.driver.as_ref().and_then(|d| d.current())
    }

    pub fn next(&mut self) -> Result<()> {
        match self.state {
            State::Start => self.rewind()?,
            State::Exhausted => return Ok(()),
            State::Positioned => {}
        }
        self.current = None;
        self.state = State::Exhausted;
        if let Some(driver) = self.driver.as_mut() {
            driver.next()?;
        }
        self.position += 1;
        self.load()
    }

    /// Element count without consuming single-pass sources.
    ///
    /// Returns 0 for a single-pass source that cannot report its size.
    pub fn count(&self) -> Result<usize> {
        if let Some(len) = self.src.cheap_len() {
            return Ok(len);
        }
        if self.src.is_replayable() {
            return self.src.drain_count();
        }
        log::debug!("cannot count a single-pass {} source", self.src.kind());
        Ok(0)
    }

    /// Adapter for `for` loops and iterator combinators. Rewinds first.
    pub fn pairs(&mut self) -> Pairs<'_> {
        Pairs {
            iter: self,
            started: false,
            failed: false,
        }
    }

    /// Pairs in traversal order. A repeated key overwrites the earlier value
    /// in place.
    pub fn to_array(&mut self) -> Result<Vec<(Value, Value)>> {
        Ok(self.to_dictionary()?.into_iter().collect())
    }

    pub fn to_list(&mut self) -> Result<OrderedList> {
        Ok(self
            .to_dictionary()?
            .into_iter()
            .map(|(_, v)| v)
            .collect())
    }

    pub fn to_dictionary(&mut self) -> Result<Dictionary> {
        let mut dict = Dictionary::new();
        for pair in self.pairs() {
            let (key, value) = pair?;
            dict.set(key, value);
        }
        Ok(dict)
    }

    /// The origin map when no caster is given, otherwise a new map over the
    /// underlying source.
    pub fn to_map(&self, caster: Option<CasterSpec>) -> Result<Map> {
        match (caster, &self.origin) {
            (None, Some(map)) => Ok(map.clone()),
            (Some(spec), _) => Map::new(self.src.clone(), spec),
            (None, None) => Map::new(self.src.clone(), CasterSpec::Caster(self.caster())),
        }
    }
}

impl fmt::Debug for CastableIterator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CastableIterator")
            .field("src", &self.src)
            .field("state", &self.state)
            .field("position", &self.position)
            .field("current", &self.current)
            .finish()
    }
}

impl Cursor for CastableIterator {
    fn rewind(&mut self) -> Result<()> {
        CastableIterator::rewind(self)
    }

    fn valid(&self) -> bool {
        CastableIterator::valid(self)
    }

    fn current(&self) -> Option<Value> {
        CastableIterator::current(self).cloned()
    }

    fn key(&self) -> Option<Value> {
        CastableIterator::key(self).cloned()
    }

    fn next(&mut self) -> Result<()> {
        CastableIterator::next(self)
    }

    fn len(&self) -> Option<usize> {
        self.src.cheap_len()
    }
}

/// Borrowing [`Iterator`] over a [`CastableIterator`]. Yields the first error
/// and then stops.
pub struct Pairs<'a> {
    iter: &'a mut CastableIterator,
    started: bool,
    failed: bool,
}

impl Iterator for Pairs<'_> {
    type Item = Result<(Value, Value)>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        let step = if self.started {
            self.iter.next()
        } else {
            self.started = true;
            self.iter.rewind()
        };
        if let Err(e) = step {
            self.failed = true;
            return Some(Err(e));
        }
        self.iter.current.clone().map(Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::Extractor;
    use crate::record::Record;
    use crate::source::IterCursor;

    fn people() -> Vec<Value> {
        vec![
            Value::object(Record::anonymous().with("id", 1).with("name", "Ann")),
            Value::object(Record::anonymous().with("id", 2).with("name", "Bob")),
        ]
    }

    #[test]
    fn test_walks_the_state_machine() {
        let mut iter =
            CastableIterator::new(people(), Some(("id", "name").into())).unwrap();
        assert!(!iter.valid());
        assert!(iter.current().is_none());

        iter.rewind().unwrap();
        assert!(iter.valid());
        assert_eq!(iter.key(), Some(&Value::Int(1)));
        assert_eq!(iter.current(), Some(&Value::from("Ann")));
        assert_eq!(iter.position(), 0);

        iter.next().unwrap();
        assert_eq!(iter.current(), Some(&Value::from("Bob")));
        assert_eq!(iter.position(), 1);

        iter.next().unwrap();
        assert!(!iter.valid());
        assert!(iter.key().is_none());

        iter.rewind().unwrap();
        assert_eq!(iter.current(), Some(&Value::from("Ann")));
    }

    #[test]
    fn test_empty_source_is_exhausted_after_rewind() {
        let mut iter =
            CastableIterator::new(Vec::<Value>::new(), Some(("id", "name").into())).unwrap();
        iter.rewind().unwrap();
        assert!(!iter.valid());
    }

    #[test]
    fn test_item_exposes_the_raw_record() {
        let items = people();
        let mut iter = CastableIterator::new(items.clone(), Some(("id", "name").into())).unwrap();
        iter.rewind().unwrap();
        assert!(iter.item().unwrap().same_record(&items[0]));
    }

    #[test]
    fn test_requires_a_caster_for_plain_sources() {
        assert!(matches!(
            CastableIterator::new(people(), None),
            Err(RecastError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_closure_casters_see_position() {
        let mut iter = CastableIterator::with_caster(
            vec![Value::from("a"), Value::from("b")],
            |_, item, pos| Ok((Value::from(format!("k{}", pos)), item.clone())),
        );
        let keys: Vec<String> = iter.pairs().map(|p| p.unwrap().0.to_text()).collect();
        assert_eq!(keys, vec!["k0", "k1"]);
    }

    #[test]
    fn test_map_source_is_unwrapped() {
        let map = Map::new(people(), ("name", "id")).unwrap();
        let mut iter = CastableIterator::new(map.clone(), None).unwrap();
        assert_eq!(iter.src().kind(), "list");
        let dict = iter.to_dictionary().unwrap();
        assert_eq!(dict.get(&Value::from("Bob")), Some(&Value::Int(2)));
    }

    #[test]
    fn test_to_map_returns_origin_without_new_caster() {
        let map = Map::new(people(), ("name", "id")).unwrap();
        let iter = map.iter().unwrap();
        assert!(iter.to_map(None).unwrap().ptr_eq(&map));

        let rebuilt = iter.to_map(Some(("id", "name").into())).unwrap();
        assert!(!rebuilt.ptr_eq(&map));
        assert_eq!(rebuilt.get(&Value::Int(2)).unwrap(), Value::from("Bob"));
    }

    #[test]
    fn test_to_map_on_plain_source_reuses_caster() {
        let iter = CastableIterator::new(people(), Some(("id", "name").into())).unwrap();
        let map = iter.to_map(None).unwrap();
        assert_eq!(map.get(&Value::Int(1)).unwrap(), Value::from("Ann"));
    }

    #[test]
    fn test_map_over_a_map_is_iterated_through_the_inner_map() {
        let inner = Map::new(people(), ("name", Extractor::VALUE)).unwrap();
        let outer = CastableIterator::new(
            Source::from(inner),
            Some(CasterSpec::from_fn(|k, _, _| Ok((k.clone(), k.clone())))),
        );
        let values = outer.unwrap().to_list().unwrap();
        let names: Vec<String> = values.iter().map(|v| v.to_text()).collect();
        assert_eq!(names, vec!["Ann", "Bob"]);
    }

    #[test]
    fn test_duplicate_keys_overwrite_in_materializers() {
        let mut iter = CastableIterator::with_caster(
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
            |_, item, _| Ok((Value::from(item.as_i64().unwrap_or(0) % 2), item.clone())),
        );
        let pairs = iter.to_array().unwrap();
        assert_eq!(
            pairs,
            vec![(Value::Int(1), Value::Int(3)), (Value::Int(0), Value::Int(2))]
        );
        assert_eq!(iter.to_list().unwrap().len(), 2);
    }

    #[test]
    fn test_counts_by_source_kind() {
        let iter = CastableIterator::new(people(), Some(("id", "name").into())).unwrap();
        assert_eq!(iter.count().unwrap(), 2);

        let sized = Source::from_cursor(IterCursor::from_values(people().into_iter()).with_len(2));
        let iter = CastableIterator::new(sized, Some(("id", "name").into())).unwrap();
        assert_eq!(iter.count().unwrap(), 2);

        let unsized_src = Source::from_values(people());
        let mut iter = CastableIterator::new(unsized_src, Some(("id", "name").into())).unwrap();
        assert_eq!(iter.count().unwrap(), 0);
        // counting did not consume the source
        assert_eq!(iter.to_list().unwrap().len(), 2);
    }

    #[test]
    fn test_single_pass_source_cannot_be_replayed() {
        let mut iter = CastableIterator::new(
            Source::from_values(people()),
            Some(("id", "name").into()),
        )
        .unwrap();
        assert_eq!(iter.to_list().unwrap().len(), 2);
        assert!(matches!(
            iter.rewind(),
            Err(RecastError::UnsupportedSource(_))
        ));
    }

    #[test]
    fn test_failed_cast_leaves_no_stale_pair() {
        let mut iter = CastableIterator::with_caster(
            vec![Value::Int(1), Value::Int(2), Value::Int(3)],
            |k, item, _| {
                if item == &Value::Int(2) {
                    return Err(RecastError::InvalidConfiguration("bad item".to_string()));
                }
                Ok((k.clone(), item.clone()))
            },
        );
        iter.rewind().unwrap();
        assert_eq!(iter.current(), Some(&Value::Int(1)));

        assert!(iter.next().is_err());
        assert!(!iter.valid());
        assert!(iter.current().is_none());
        assert!(iter.key().is_none());
        assert!(iter.item().is_none());
        assert!(Cursor::current(&iter).is_none());
    }

    #[test]
    fn test_iterators_stack_as_cursors() {
        let inner = CastableIterator::new(people(), Some(("id", "name").into())).unwrap();
        let mut outer = CastableIterator::new(
            Source::from_cursor(inner),
            Some(CasterSpec::from_fn(|k, v, _| Ok((v.clone(), k.clone())))),
        )
        .unwrap();
        let dict = outer.to_dictionary().unwrap();
        assert_eq!(dict.get(&Value::from("Ann")), Some(&Value::Int(1)));
    }
}
