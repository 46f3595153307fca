//! # Accessors
//!
//! An accessor names how a field is pulled out of a record. Configuration uses
//! a string convention, parsed exactly once into an [`Accessor`]:
//!
//! | Raw string      | Kind                  | Name          |
//! |-----------------|-----------------------|---------------|
//! | `"name"`        | [`AccessorKind::Property`] | `name`   |
//! | `"getName()"`   | [`AccessorKind::Method`]   | `getName`|
//! | `"__position"`  | [`AccessorKind::Sentinel`] | `__position` |
//!
//! Anything containing a `(` is a method; the name is everything before the
//! first `(`. Sentinels only change behavior for scalar records; for objects and
//! associative records the sentinel token is used verbatim as a field name.

use std::fmt;

pub const POSITION: &str = "__position";
pub const VALUE: &str = "__value";
pub const KEY: &str = "__key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessorKind {
    Property,
    Method,
    Sentinel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sentinel {
    /// The 0-based iteration position.
    Position,
    /// The record itself.
    Value,
    /// The record's original key in its source.
    Key,
}

impl Sentinel {
    pub fn token(self) -> &'static str {
        match self {
            Sentinel::Position => POSITION,
            Sentinel::Value => VALUE,
            Sentinel::Key => KEY,
        }
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            POSITION => Some(Sentinel::Position),
            VALUE => Some(Sentinel::Value),
            KEY => Some(Sentinel::Key),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Accessor {
    kind: AccessorKind,
    name: String,
}

impl Accessor {
    pub fn parse(raw: &str) -> Self {
        if let Some(paren) = raw.find('(') {
            return Self::method(&raw[..paren]);
        }
        if Sentinel::from_token(raw).is_some() {
            return Self {
                kind: AccessorKind::Sentinel,
                name: raw.to_string(),
            };
        }
        Self::property(raw)
    }

    pub fn property(name: &str) -> Self {
        Self {
            kind: AccessorKind::Property,
            name: name.to_string(),
        }
    }

    pub fn method(name: &str) -> Self {
        Self {
            kind: AccessorKind::Method,
            name: name.to_string(),
        }
    }

    pub fn sentinel_of(sentinel: Sentinel) -> Self {
        Self {
            kind: AccessorKind::Sentinel,
            name: sentinel.token().to_string(),
        }
    }

    pub fn kind(&self) -> AccessorKind {
        self.kind
    }

    /// Property/method name without parentheses, or the sentinel token.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_method(&self) -> bool {
        self.kind == AccessorKind::Method
    }

    pub fn sentinel(&self) -> Option<Sentinel> {
        match self.kind {
            AccessorKind::Sentinel => Sentinel::from_token(&self.name),
            _ => None,
        }
    }
}

/// Builder-style shorthand for [`Accessor::parse`].
pub fn accessor(raw: &str) -> Accessor {
    Accessor::parse(raw)
}

impl From<&str> for Accessor {
    fn from(raw: &str) -> Self {
        Accessor::parse(raw)
    }
}

impl From<Sentinel> for Accessor {
    fn from(sentinel: Sentinel) -> Self {
        Accessor::sentinel_of(sentinel)
    }
}

impl fmt::Display for Accessor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            AccessorKind::Method => write!(f, "{}()", self.name),
            _ => write!(f, "{}", self.name),
        }
    }
}
