//! Path mutation engine: set, insert, and delete at a path.
//!
//! The engine never edits a document in place. It walks the input with a
//! [`TokenIter`] and pushes an almost identical stream into a fresh
//! [`Builder`], diverging only at the member named by the path:
//!
//! - `set_path` / `set_path(.., create_missing)`: replace the target value,
//!   optionally adding it when absent
//! - `insert_path`: splice a new array element before/after the target, or add
//!   a missing object key (an existing key is an error)
//! - `delete_path`: drop the target member
//! - `assign_path`: create with gap filling: missing intermediate containers
//!   are synthesized from the remaining path (integers make arrays, anything
//!   else makes objects) and arrays are padded with nulls
//!
//! # Key design decisions
//!
//! - **Explicit walk state**: the recursive walkers share one `&mut TokenIter`
//!   and one `&mut Builder`, and thread the current `level` as a value. Each
//!   walker consumes exactly the tokens of the container it was handed, so the
//!   caller always finds the matching end token next.
//! - **Untouched siblings travel whole**: non-matching members are read with
//!   `skip_nested` and pushed as single values rather than re-walked.
//! - **Index resolution**: negative indices count from the end; one that is
//!   still negative prepends (or is an error under consistent-position
//!   semantics). Without gap filling, indices past the end append.

use tracing::{debug, trace};

use crate::builder::Builder;
use crate::error::{JsonbError, Result};
use crate::iter::{Token, TokenIter};
use crate::path::{null_element, GapSegment, Path, PathElement, PathOp};
use crate::value::Jsonb;

/// Apply `op` at `path` in `doc`, returning the rewritten document.
///
/// `value` is required for every action except delete.
///
/// # Errors
///
/// - `UnsupportedOperation` if `doc` is a scalar, if an insert targets an
///   existing object key, if gap filling runs into a scalar, or if a negative
///   index is out of range under consistent-position semantics.
/// - `MalformedPath` for a null element or a non-integer array index.
/// - `Range` for an array index outside `i32`.
/// - `InvalidArgument` if `value` is missing for a non-delete action.
pub fn apply_path(doc: &Jsonb, path: &Path, value: Option<&Jsonb>, op: PathOp) -> Result<Jsonb> {
    if doc.is_scalar() {
        let verb = if op.deletes() { "delete" } else { "set" };
        return Err(JsonbError::UnsupportedOperation(format!(
            "cannot {} path in scalar",
            verb
        )));
    }
    if path.is_empty() {
        return Ok(doc.clone());
    }
    if doc.root_count() == 0 && !op.create_or_insert() {
        return Ok(doc.clone());
    }

    let placeholder = Jsonb::Null;
    let newval = match value {
        Some(v) => v,
        None if op.deletes() => &placeholder,
        None => {
            return Err(JsonbError::InvalidArgument(
                "a new value is required unless deleting".to_string(),
            ))
        }
    };

    debug!(path = %path, bits = op.bits(), "applying path mutation");

    let walker = PathWalker {
        path: path.elements(),
        newval,
        op,
    };
    let mut it = doc.iter();
    let mut st = Builder::new();
    walker.set_path(&mut it, &mut st, 0)?.ok_or_else(|| {
        JsonbError::UnexpectedToken("path walk finished without closing the root".to_string())
    })
}

/// Replace the value at `path`. With `create_missing`, a missing final key or
/// index is added; missing intermediate levels are never created.
///
/// # Examples
///
/// ```
/// use jsonb_core::{set_path, Jsonb, Path};
///
/// let doc: Jsonb = "[1,2,3]".parse().unwrap();
/// let out = set_path(&doc, &Path::from_texts(["-1"]), &Jsonb::from(9), false).unwrap();
/// assert_eq!(out.to_string(), "[1,2,9]");
/// ```
pub fn set_path(doc: &Jsonb, path: &Path, value: &Jsonb, create_missing: bool) -> Result<Jsonb> {
    apply_path(doc, path, Some(value), PathOp::set(create_missing))
}

/// Insert `value` before (or `after`) the array element at `path`, or add a
/// missing object key. Fails if the object key already exists.
pub fn insert_path(doc: &Jsonb, path: &Path, value: &Jsonb, after: bool) -> Result<Jsonb> {
    apply_path(doc, path, Some(value), PathOp::insert(after))
}

/// Remove the member at `path`. Missing targets leave the document unchanged.
pub fn delete_path(doc: &Jsonb, path: &Path) -> Result<Jsonb> {
    apply_path(doc, path, None, PathOp::delete())
}

/// Subscript-style assignment: create the target, synthesizing any missing
/// intermediate objects/arrays and padding arrays with nulls.
///
/// # Examples
///
/// ```
/// use jsonb_core::{assign_path, Jsonb, Path};
///
/// let doc: Jsonb = "{}".parse().unwrap();
/// let out = assign_path(&doc, &Path::from_texts(["a", "1", "b"]), &Jsonb::from(1)).unwrap();
/// assert_eq!(out.to_string(), r#"{"a":[null,{"b":1}]}"#);
/// ```
pub fn assign_path(doc: &Jsonb, path: &Path, value: &Jsonb) -> Result<Jsonb> {
    apply_path(doc, path, Some(value), PathOp::assign())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContainerKind {
    Object,
    Array,
}

/// Call-local state of one path mutation.
struct PathWalker<'p> {
    path: &'p [PathElement],
    newval: &'p Jsonb,
    op: PathOp,
}

impl PathWalker<'_> {
    fn is_last(&self, level: usize) -> bool {
        level + 1 == self.path.len()
    }

    /// Rewrite the value the iterator is positioned on, descending at `level`.
    fn set_path(&self, it: &mut TokenIter<'_>, st: &mut Builder, level: usize) -> Result<Option<Jsonb>> {
        if self.path[level].is_null() {
            return Err(null_element(level + 1));
        }

        match it.next_token(false) {
            Some(Token::BeginArray { len, raw_scalar }) => {
                if self.op.fills_gaps() && raw_scalar {
                    return Err(scalar_in_path());
                }
                st.begin_array(false);
                self.set_path_array(it, st, level, len)?;
                expect_token(it.next_token(false), Token::EndArray)?;
                st.end_array()
            }
            Some(Token::BeginObject { len }) => {
                st.begin_object();
                self.set_path_object(it, st, level, len)?;
                expect_token(it.next_token(true), Token::EndObject)?;
                st.end_object()
            }
            Some(token @ (Token::Elem(_) | Token::Value(_))) => {
                // The path continues below a scalar: leave it alone unless the
                // caller asked for the path to be materialized.
                if self.op.fills_gaps() {
                    return Err(scalar_in_path());
                }
                st.push(token)
            }
            other => Err(unexpected("a container or scalar", other)),
        }
    }

    fn set_path_object(
        &self,
        it: &mut TokenIter<'_>,
        st: &mut Builder,
        level: usize,
        npairs: usize,
    ) -> Result<()> {
        let target = self.path.get(level).and_then(PathElement::key_text);
        let mut done = target.is_none();
        let last = self.is_last(level);
        let create_or_insert = self.op.create_or_insert();

        if npairs == 0 && create_or_insert && last {
            if let Some(key) = &target {
                st.key(&**key)?;
                st.value(self.newval.clone())?;
            }
        }

        for i in 0..npairs {
            let key = match it.next_token(true) {
                Some(Token::Key(key)) => key,
                other => return Err(unexpected("an object key", other)),
            };

            if !done && target.as_deref() == Some(key) {
                done = true;
                if last {
                    if self.op.inserts_before() || self.op.inserts_after() {
                        return Err(JsonbError::UnsupportedOperation(format!(
                            "cannot replace existing key \"{}\"; use set_path to replace a key's value",
                            key
                        )));
                    }
                    // Skip the old value.
                    it.next_token(true);
                    if !self.op.deletes() {
                        st.key(key)?;
                        st.value(self.newval.clone())?;
                    }
                } else {
                    st.key(key)?;
                    self.set_path(it, st, level + 1)?;
                }
            } else {
                if create_or_insert && !done && last && i + 1 == npairs {
                    if let Some(new_key) = &target {
                        st.key(&**new_key)?;
                        st.value(self.newval.clone())?;
                    }
                }
                st.key(key)?;
                match it.next_token(true) {
                    Some(Token::Value(v)) => st.value(v.clone())?,
                    other => return Err(unexpected("an object value", other)),
                }
            }
        }

        // The key never showed up: build the rest of the path under it.
        if !done && self.op.builds_missing_path() && level + 1 < self.path.len() {
            if let Some(key) = target {
                st.key(key.into_owned())?;
                self.push_path(st, level)?;
            }
        }
        Ok(())
    }

    fn set_path_array(
        &self,
        it: &mut TokenIter<'_>,
        st: &mut Builder,
        level: usize,
        nelems: usize,
    ) -> Result<()> {
        let count = i64::try_from(nelems)
            .map_err(|_| JsonbError::Range(format!("array of {} elements", nelems)))?;
        let last = self.is_last(level);
        let create_or_insert = self.op.create_or_insert();

        let mut idx = match self.path.get(level) {
            Some(element) if !element.is_null() => i64::from(element.array_index(level + 1)?),
            _ => count,
        };

        let mut prepend = false;
        if idx < 0 {
            if idx.unsigned_abs() > count.unsigned_abs() {
                if self.op.keeps_position_consistent() {
                    return Err(JsonbError::UnsupportedOperation(format!(
                        "path element at position {} is out of range: {}",
                        level + 1,
                        idx
                    )));
                }
                prepend = true;
            } else {
                idx += count;
            }
        }

        // Gap filling lifts the upper bound; otherwise clamp to append.
        if !self.op.fills_gaps() && idx > count {
            idx = count;
        }

        let mut done = false;
        if (prepend || nelems == 0) && last && create_or_insert {
            if self.op.fills_gaps() && nelems == 0 && idx > 0 {
                push_nulls(st, idx)?;
            }
            st.elem(self.newval.clone())?;
            done = true;
        }

        for i in 0..count {
            if !prepend && i == idx {
                done = true;
                if last {
                    let current = match it.next_token(true) {
                        Some(Token::Elem(v)) => v,
                        other => return Err(unexpected("an array element", other)),
                    };
                    if self.op.inserts_before() || self.op.creates() {
                        st.elem(self.newval.clone())?;
                    }
                    // Only inserts keep the element that was there.
                    if self.op.inserts_before() || self.op.inserts_after() {
                        st.elem(current.clone())?;
                    }
                    if self.op.inserts_after() || self.op.replaces() {
                        st.elem(self.newval.clone())?;
                    }
                } else {
                    self.set_path(it, st, level + 1)?;
                }
            } else {
                match it.next_token(true) {
                    Some(Token::Elem(v)) => st.elem(v.clone())?,
                    other => return Err(unexpected("an array element", other)),
                }
            }
        }

        if create_or_insert && !done && last {
            if self.op.fills_gaps() && idx > count {
                push_nulls(st, idx - count)?;
            }
            st.elem(self.newval.clone())?;
            done = true;
        }

        if !done && self.op.builds_missing_path() && level + 1 < self.path.len() {
            if idx > count {
                push_nulls(st, idx - count)?;
            }
            self.push_path(st, level)?;
        }
        Ok(())
    }

    /// Emit the containers for every path element after `level`, put the new
    /// value at the innermost one, and close them again. The caller has already
    /// opened the container at `level` (and pushed the key, for objects).
    fn push_path(&self, st: &mut Builder, level: usize) -> Result<()> {
        trace!(level, "synthesizing missing path segments");

        let mut opened: Vec<ContainerKind> = Vec::with_capacity(self.path.len() - level - 1);
        for (offset, element) in self.path[level + 1..].iter().enumerate() {
            match element.gap_segment(level + offset + 2)? {
                GapSegment::Index(n) => {
                    st.begin_array(false);
                    push_nulls(st, i64::from(n))?;
                    opened.push(ContainerKind::Array);
                }
                GapSegment::Key(key) => {
                    st.begin_object();
                    st.key(key.into_owned())?;
                    opened.push(ContainerKind::Object);
                }
            }
        }

        match opened.last() {
            Some(ContainerKind::Array) => st.elem(self.newval.clone())?,
            _ => st.value(self.newval.clone())?,
        }

        for kind in opened.iter().rev() {
            match kind {
                ContainerKind::Object => st.end_object()?,
                ContainerKind::Array => st.end_array()?,
            };
        }
        Ok(())
    }
}

fn push_nulls(st: &mut Builder, count: i64) -> Result<()> {
    for _ in 0..count {
        st.elem(Jsonb::Null)?;
    }
    Ok(())
}

fn scalar_in_path() -> JsonbError {
    JsonbError::UnsupportedOperation(
        "cannot replace existing key: the path assumes key is a composite object, but it is a scalar value"
            .to_string(),
    )
}

fn expect_token(found: Option<Token<'_>>, expected: Token<'_>) -> Result<()> {
    match found {
        Some(token) if token == expected => Ok(()),
        other => Err(unexpected(expected.name(), other)),
    }
}

fn unexpected(expected: &str, found: Option<Token<'_>>) -> JsonbError {
    JsonbError::UnexpectedToken(format!(
        "expected {}, found {}",
        expected,
        found.map_or("end of stream", |t| t.name())
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(json: &str) -> Jsonb {
        json.parse().unwrap()
    }

    #[test]
    fn insert_before_and_after_keep_the_original() {
        let d = doc("[1,2,3]");
        let path = Path::from_texts(["1"]);
        let before = insert_path(&d, &path, &Jsonb::from(9), false).unwrap();
        let after = insert_path(&d, &path, &Jsonb::from(9), true).unwrap();
        assert_eq!(before, doc("[1,9,2,3]"));
        assert_eq!(after, doc("[1,2,9,3]"));
    }

    #[test]
    fn missing_value_is_invalid_unless_deleting() {
        let d = doc(r#"{"a":1}"#);
        let err = apply_path(&d, &Path::from_texts(["a"]), None, PathOp::set(false)).unwrap_err();
        assert!(matches!(err, JsonbError::InvalidArgument(_)));
    }

    #[test]
    fn walker_leaves_scalar_under_path_untouched() {
        let d = doc(r#"{"a":1}"#);
        let out = set_path(&d, &Path::from_texts(["a", "b"]), &Jsonb::from(2), true).unwrap();
        assert_eq!(out, d);
    }
}
