//! The JSONB document value.
//!
//! `Jsonb` mirrors the JSON data model but keeps objects as a `Vec` of pairs in
//! canonical order: shorter keys first, then bytewise. Two structurally equal
//! documents therefore compare equal with the derived `PartialEq`, and iteration
//! and printing always see the same member order regardless of how the document
//! was written.
//!
//! Parsing and printing go through `serde_json`; this module only converts
//! between the two representations.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Number, Value};

use crate::error::JsonbError;
use crate::iter::TokenIter;
use crate::path::{Path, PathElement};

/// A JSONB document value.
#[derive(Debug, Clone, PartialEq)]
pub enum Jsonb {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Array(Vec<Jsonb>),
    /// Unique keys in canonical order. Build through [`Jsonb::object`] (or any of
    /// the conversions) rather than by hand to keep that invariant.
    Object(Vec<(String, Jsonb)>),
}

/// The kind of a document value, used in error messages and dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JsonbKind {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

impl fmt::Display for JsonbKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JsonbKind::Null => "null",
            JsonbKind::Bool => "boolean",
            JsonbKind::Number => "number",
            JsonbKind::String => "string",
            JsonbKind::Array => "array",
            JsonbKind::Object => "object",
        };
        f.write_str(name)
    }
}

impl Jsonb {
    /// Build an object from key/value pairs, sorting keys canonically.
    /// When a key appears more than once the last value wins.
    pub fn object<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (String, Jsonb)>,
    {
        let mut pairs: Vec<(String, Jsonb)> = pairs.into_iter().collect();
        canonicalize_pairs(&mut pairs);
        Jsonb::Object(pairs)
    }

    pub fn empty_object() -> Self {
        Jsonb::Object(Vec::new())
    }

    pub fn empty_array() -> Self {
        Jsonb::Array(Vec::new())
    }

    pub fn kind(&self) -> JsonbKind {
        match self {
            Jsonb::Null => JsonbKind::Null,
            Jsonb::Bool(_) => JsonbKind::Bool,
            Jsonb::Number(_) => JsonbKind::Number,
            Jsonb::String(_) => JsonbKind::String,
            Jsonb::Array(_) => JsonbKind::Array,
            Jsonb::Object(_) => JsonbKind::Object,
        }
    }

    /// True for null, booleans, numbers and strings.
    pub fn is_scalar(&self) -> bool {
        !matches!(self, Jsonb::Array(_) | Jsonb::Object(_))
    }

    pub fn is_object(&self) -> bool {
        matches!(self, Jsonb::Object(_))
    }

    pub fn is_array(&self) -> bool {
        matches!(self, Jsonb::Array(_))
    }

    /// Number of members at the root: pairs for an object, elements for an
    /// array, and 1 for a scalar (which traverses as a one-element array).
    pub fn root_count(&self) -> usize {
        match self {
            Jsonb::Array(items) => items.len(),
            Jsonb::Object(pairs) => pairs.len(),
            _ => 1,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Jsonb::String(s) => Some(s),
            _ => None,
        }
    }

    /// Look up a key in an object. Returns `None` for non-objects.
    ///
    /// Objects built through [`Jsonb::object`] or parsing are searched by
    /// bisection. A hand-built `Jsonb::Object` whose pairs are not in canonical
    /// order still resolves through a linear scan (last occurrence wins).
    pub fn get(&self, key: &str) -> Option<&Jsonb> {
        match self {
            Jsonb::Object(pairs) => match pairs.binary_search_by(|(k, _)| compare_keys(k, key)) {
                Ok(i) => Some(&pairs[i].1),
                Err(_) => pairs.iter().rev().find(|(k, _)| k == key).map(|(_, v)| v),
            },
            _ => None,
        }
    }

    /// Follow a path to a nested value. Array steps accept negative indices
    /// counted from the end; any null, non-integer, or missing step yields `None`.
    pub fn get_path(&self, path: &Path) -> Option<&Jsonb> {
        let mut current = self;
        for element in path.elements() {
            current = match (current, element) {
                (_, PathElement::Null) => return None,
                (Jsonb::Object(_), el) => current.get(&el.key_text()?)?,
                (Jsonb::Array(items), el) => {
                    let idx = i64::from(el.array_index(0).ok()?);
                    let len = i64::try_from(items.len()).ok()?;
                    let idx = if idx < 0 { len + idx } else { idx };
                    items.get(usize::try_from(idx).ok()?)?
                }
                _ => return None,
            };
        }
        Some(current)
    }

    /// Start a depth-first token walk over this document.
    pub fn iter(&self) -> TokenIter<'_> {
        TokenIter::new(self)
    }
}

/// Canonical key order: shorter keys first, equal lengths compared bytewise.
pub(crate) fn compare_keys(a: &str, b: &str) -> Ordering {
    a.len()
        .cmp(&b.len())
        .then_with(|| a.as_bytes().cmp(b.as_bytes()))
}

/// Sort pairs canonically and drop duplicate keys, keeping the last occurrence.
pub(crate) fn canonicalize_pairs(pairs: &mut Vec<(String, Jsonb)>) {
    // Stable sort keeps duplicates in insertion order, so within a run of equal
    // keys the last element is the most recent one.
    pairs.sort_by(|a, b| compare_keys(&a.0, &b.0));
    pairs.dedup_by(|later, kept| {
        if later.0 == kept.0 {
            std::mem::swap(later, kept);
            true
        } else {
            false
        }
    });
}

// ---------------------------------------------------------------------------
// Conversions
// ---------------------------------------------------------------------------

impl From<Value> for Jsonb {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Jsonb::Null,
            Value::Bool(b) => Jsonb::Bool(b),
            Value::Number(n) => Jsonb::Number(n),
            Value::String(s) => Jsonb::String(s),
            Value::Array(items) => Jsonb::Array(items.into_iter().map(Jsonb::from).collect()),
            Value::Object(map) => Jsonb::object(map.into_iter().map(|(k, v)| (k, Jsonb::from(v)))),
        }
    }
}

impl From<&Jsonb> for Value {
    fn from(doc: &Jsonb) -> Self {
        match doc {
            Jsonb::Null => Value::Null,
            Jsonb::Bool(b) => Value::Bool(*b),
            Jsonb::Number(n) => Value::Number(n.clone()),
            Jsonb::String(s) => Value::String(s.clone()),
            Jsonb::Array(items) => Value::Array(items.iter().map(Value::from).collect()),
            Jsonb::Object(pairs) => {
                let mut map = Map::with_capacity(pairs.len());
                for (k, v) in pairs {
                    map.insert(k.clone(), Value::from(v));
                }
                Value::Object(map)
            }
        }
    }
}

impl From<Jsonb> for Value {
    fn from(doc: Jsonb) -> Self {
        Value::from(&doc)
    }
}

impl From<bool> for Jsonb {
    fn from(b: bool) -> Self {
        Jsonb::Bool(b)
    }
}

impl From<i64> for Jsonb {
    fn from(n: i64) -> Self {
        Jsonb::Number(Number::from(n))
    }
}

impl From<i32> for Jsonb {
    fn from(n: i32) -> Self {
        Jsonb::Number(Number::from(n))
    }
}

/// Non-finite floats have no JSON form and become `Null`.
impl From<f64> for Jsonb {
    fn from(n: f64) -> Self {
        Number::from_f64(n).map_or(Jsonb::Null, Jsonb::Number)
    }
}

impl From<&str> for Jsonb {
    fn from(s: &str) -> Self {
        Jsonb::String(s.to_string())
    }
}

impl From<String> for Jsonb {
    fn from(s: String) -> Self {
        Jsonb::String(s)
    }
}

impl FromStr for Jsonb {
    type Err = JsonbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value = serde_json::from_str(s)?;
        Ok(Jsonb::from(value))
    }
}

/// Compact JSON; the alternate flag (`{:#}`) pretty-prints.
impl fmt::Display for Jsonb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = if f.alternate() {
            serde_json::to_string_pretty(self)
        } else {
            serde_json::to_string(self)
        };
        f.write_str(&text.map_err(|_| fmt::Error)?)
    }
}

impl Serialize for Jsonb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Jsonb::Null => serializer.serialize_unit(),
            Jsonb::Bool(b) => serializer.serialize_bool(*b),
            Jsonb::Number(n) => n.serialize(serializer),
            Jsonb::String(s) => serializer.serialize_str(s),
            Jsonb::Array(items) => serializer.collect_seq(items),
            Jsonb::Object(pairs) => serializer.collect_map(pairs.iter().map(|(k, v)| (k, v))),
        }
    }
}

impl<'de> Deserialize<'de> for Jsonb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Jsonb::from)
    }
}
