//! Paths into a document and the operation flags that say what to do there.
//!
//! A path is a list of elements. Inside an object every element is used as a key
//! (an integer element as its decimal text); inside an array every element must
//! parse as a base-10 `i32` index, negative values counting from the end. A
//! `Null` element is a placeholder that is rejected wherever the engine needs a
//! concrete key or index.

use std::borrow::Cow;
use std::fmt;
use std::num::IntErrorKind;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::{JsonbError, Result};

/// One step of a [`Path`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    Key(String),
    Index(i64),
    Null,
}

/// How gap filling reads a missing path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum GapSegment<'a> {
    /// Open an array with this many leading nulls.
    Index(i32),
    /// Open an object with this key.
    Key(Cow<'a, str>),
}

impl PathElement {
    pub fn is_null(&self) -> bool {
        matches!(self, PathElement::Null)
    }

    /// The element as an object key, or `None` for `Null`.
    pub fn key_text(&self) -> Option<Cow<'_, str>> {
        match self {
            PathElement::Key(k) => Some(Cow::Borrowed(k)),
            PathElement::Index(i) => Some(Cow::Owned(i.to_string())),
            PathElement::Null => None,
        }
    }

    /// The element as an array index. `position` is the 1-based path position
    /// used in error messages.
    pub(crate) fn array_index(&self, position: usize) -> Result<i32> {
        match self {
            PathElement::Key(text) => parse_index(text).map_err(|kind| match kind {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => JsonbError::Range(format!(
                    "path element at position {} is out of range: \"{}\"",
                    position, text
                )),
                _ => JsonbError::MalformedPath(format!(
                    "path element at position {} is not an integer: \"{}\"",
                    position, text
                )),
            }),
            PathElement::Index(i) => i32::try_from(*i).map_err(|_| {
                JsonbError::Range(format!(
                    "path element at position {} is out of range: {}",
                    position, i
                ))
            }),
            PathElement::Null => Err(null_element(position)),
        }
    }

    /// Classify a segment that does not exist yet: integers open arrays,
    /// anything else opens objects.
    pub(crate) fn gap_segment(&self, position: usize) -> Result<GapSegment<'_>> {
        match self {
            PathElement::Null => Err(null_element(position)),
            PathElement::Key(text) => Ok(match parse_index(text) {
                Ok(n) => GapSegment::Index(n),
                Err(_) => GapSegment::Key(Cow::Borrowed(text)),
            }),
            PathElement::Index(i) => Ok(match i32::try_from(*i) {
                Ok(n) => GapSegment::Index(n),
                Err(_) => GapSegment::Key(Cow::Owned(i.to_string())),
            }),
        }
    }
}

/// Base-10 `i32`, leading whitespace and sign allowed, nothing trailing.
fn parse_index(text: &str) -> std::result::Result<i32, IntErrorKind> {
    text.trim_start()
        .parse::<i32>()
        .map_err(|e| e.kind().clone())
}

pub(crate) fn null_element(position: usize) -> JsonbError {
    JsonbError::MalformedPath(format!("path element at position {} is null", position))
}

impl From<&str> for PathElement {
    fn from(s: &str) -> Self {
        PathElement::Key(s.to_string())
    }
}

impl From<String> for PathElement {
    fn from(s: String) -> Self {
        PathElement::Key(s)
    }
}

impl From<i64> for PathElement {
    fn from(i: i64) -> Self {
        PathElement::Index(i)
    }
}

impl<T: Into<PathElement>> From<Option<T>> for PathElement {
    fn from(value: Option<T>) -> Self {
        value.map_or(PathElement::Null, Into::into)
    }
}

/// An ordered list of path elements.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Path(Vec<PathElement>);

impl Path {
    pub fn new(elements: Vec<PathElement>) -> Self {
        Self(elements)
    }

    /// Build a path from text elements, the usual external form.
    pub fn from_texts<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        texts
            .into_iter()
            .map(|s| PathElement::Key(s.as_ref().to_string()))
            .collect()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<PathElement> for Path {
    fn from_iter<I: IntoIterator<Item = PathElement>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl From<Vec<PathElement>> for Path {
    fn from(elements: Vec<PathElement>) -> Self {
        Self(elements)
    }
}

/// Array-literal form, e.g. `{a,0,NULL}`.
impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, element) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            match element {
                PathElement::Key(k) => write!(f, "{}", k)?,
                PathElement::Index(n) => write!(f, "{}", n)?,
                PathElement::Null => f.write_str("NULL")?,
            }
        }
        f.write_str("}")
    }
}

/// Wire form of a path element: a JSON string, integer, or null.
#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum RawElement {
    Index(i64),
    Key(String),
}

impl Serialize for Path {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_seq(self.0.iter().map(|element| match element {
            PathElement::Key(k) => Some(RawElement::Key(k.clone())),
            PathElement::Index(i) => Some(RawElement::Index(*i)),
            PathElement::Null => None,
        }))
    }
}

impl<'de> Deserialize<'de> for Path {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let raw: Vec<Option<RawElement>> = Vec::deserialize(deserializer)?;
        Ok(raw
            .into_iter()
            .map(|element| match element {
                Some(RawElement::Key(k)) => PathElement::Key(k),
                Some(RawElement::Index(i)) => PathElement::Index(i),
                None => PathElement::Null,
            })
            .collect())
    }
}

// ---------------------------------------------------------------------------
// Operation flags
// ---------------------------------------------------------------------------

/// Wire bit for [`PathOp::creates`].
pub const PATH_CREATE: u8 = 0x01;
/// Wire bit for [`PathOp::deletes`].
pub const PATH_DELETE: u8 = 0x02;
/// Wire bit for [`PathOp::replaces`].
pub const PATH_REPLACE: u8 = 0x04;
/// Wire bit for [`PathOp::inserts_before`].
pub const PATH_INSERT_BEFORE: u8 = 0x08;
/// Wire bit for [`PathOp::inserts_after`].
pub const PATH_INSERT_AFTER: u8 = 0x10;
/// Wire bit for [`PathOp::fills_gaps`].
pub const PATH_FILL_GAPS: u8 = 0x20;
/// Wire bit for [`PathOp::keeps_position_consistent`].
pub const PATH_CONSISTENT_POSITION: u8 = 0x40;

const PRIMARY_BITS: u8 =
    PATH_CREATE | PATH_DELETE | PATH_REPLACE | PATH_INSERT_BEFORE | PATH_INSERT_AFTER;
const MODIFIER_BITS: u8 = PATH_FILL_GAPS | PATH_CONSISTENT_POSITION;

/// What a path mutation does at its target.
///
/// Exactly one primary action (create, delete, replace, insert before, insert
/// after) is always set; gap filling and position consistency are optional
/// modifiers. Use the named constructors; [`PathOp::from_bits`] exists only for
/// the bitmask wire form and rejects combinations the constructors can't make.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PathOp {
    create: bool,
    delete: bool,
    replace: bool,
    insert_before: bool,
    insert_after: bool,
    fill_gaps: bool,
    consistent_position: bool,
}

impl PathOp {
    const NONE: PathOp = PathOp {
        create: false,
        delete: false,
        replace: false,
        insert_before: false,
        insert_after: false,
        fill_gaps: false,
        consistent_position: false,
    };

    /// Replace the target; with `create_missing`, also create it when absent.
    pub const fn set(create_missing: bool) -> Self {
        if create_missing {
            PathOp {
                create: true,
                ..Self::NONE
            }
        } else {
            PathOp {
                replace: true,
                ..Self::NONE
            }
        }
    }

    /// Insert next to the target array element (before it unless `after`), or
    /// add a missing object key. Existing object keys are never overwritten.
    pub const fn insert(after: bool) -> Self {
        if after {
            PathOp {
                insert_after: true,
                ..Self::NONE
            }
        } else {
            PathOp {
                insert_before: true,
                ..Self::NONE
            }
        }
    }

    /// Remove the target.
    pub const fn delete() -> Self {
        PathOp {
            delete: true,
            ..Self::NONE
        }
    }

    /// Subscript-style assignment: create, synthesize missing intermediate
    /// containers, pad arrays with nulls, and refuse to prepend.
    pub const fn assign() -> Self {
        PathOp {
            create: true,
            fill_gaps: true,
            consistent_position: true,
            ..Self::NONE
        }
    }

    pub const fn with_fill_gaps(self) -> Self {
        PathOp {
            fill_gaps: true,
            ..self
        }
    }

    pub const fn with_consistent_position(self) -> Self {
        PathOp {
            consistent_position: true,
            ..self
        }
    }

    pub const fn creates(&self) -> bool {
        self.create
    }

    pub const fn deletes(&self) -> bool {
        self.delete
    }

    pub const fn replaces(&self) -> bool {
        self.replace
    }

    pub const fn inserts_before(&self) -> bool {
        self.insert_before
    }

    pub const fn inserts_after(&self) -> bool {
        self.insert_after
    }

    pub const fn fills_gaps(&self) -> bool {
        self.fill_gaps
    }

    pub const fn keeps_position_consistent(&self) -> bool {
        self.consistent_position
    }

    /// Missing intermediate containers are built only when creating with gap
    /// filling; other actions ignore the gap-filling modifier for them.
    pub const fn builds_missing_path(&self) -> bool {
        self.create && self.fill_gaps
    }

    /// Create, insert-before, or insert-after: the actions that may add a member.
    pub const fn create_or_insert(&self) -> bool {
        self.create || self.insert_before || self.insert_after
    }

    pub const fn bits(&self) -> u8 {
        let mut bits = 0;
        if self.create {
            bits |= PATH_CREATE;
        }
        if self.delete {
            bits |= PATH_DELETE;
        }
        if self.replace {
            bits |= PATH_REPLACE;
        }
        if self.insert_before {
            bits |= PATH_INSERT_BEFORE;
        }
        if self.insert_after {
            bits |= PATH_INSERT_AFTER;
        }
        if self.fill_gaps {
            bits |= PATH_FILL_GAPS;
        }
        if self.consistent_position {
            bits |= PATH_CONSISTENT_POSITION;
        }
        bits
    }

    /// Decode the bitmask form. Exactly one primary bit must be set.
    pub fn from_bits(bits: u8) -> Result<Self> {
        if bits & !(PRIMARY_BITS | MODIFIER_BITS) != 0 {
            return Err(JsonbError::InvalidArgument(format!(
                "unknown path operation bits: {:#04x}",
                bits
            )));
        }
        let primary = bits & PRIMARY_BITS;
        if primary.count_ones() != 1 {
            return Err(JsonbError::InvalidArgument(format!(
                "path operation needs exactly one action, got {:#04x}",
                bits
            )));
        }
        Ok(PathOp {
            create: primary == PATH_CREATE,
            delete: primary == PATH_DELETE,
            replace: primary == PATH_REPLACE,
            insert_before: primary == PATH_INSERT_BEFORE,
            insert_after: primary == PATH_INSERT_AFTER,
            fill_gaps: bits & PATH_FILL_GAPS != 0,
            consistent_position: bits & PATH_CONSISTENT_POSITION != 0,
        })
    }
}
