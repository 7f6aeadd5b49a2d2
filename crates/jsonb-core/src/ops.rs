//! Whole-document operations: concatenation and top-level deletion.
//!
//! All of these work on the root container only. Nested containers are carried
//! across as single values.

use crate::builder::{Builder, Substitution};
use crate::error::{JsonbError, Result};
use crate::iter::{Token, TokenIter};
use crate::value::Jsonb;

/// Concatenate two documents.
///
/// - object ⊕ object: shallow merge, `b` wins on key collisions
/// - array ⊕ array: `a`'s elements followed by `b`'s
/// - object ⊕ array, array ⊕ object: the object becomes one element at the seam
///
/// Scalars take part as one-element arrays, so `1 ⊕ 2` is `[1,2]`.
///
/// # Examples
///
/// ```
/// use jsonb_core::{concat, Jsonb};
///
/// let a: Jsonb = r#"{"a":1}"#.parse().unwrap();
/// let b: Jsonb = r#"{"a":2,"b":3}"#.parse().unwrap();
/// assert_eq!(concat(&a, &b).unwrap().to_string(), r#"{"a":2,"b":3}"#);
/// ```
pub fn concat(a: &Jsonb, b: &Jsonb) -> Result<Jsonb> {
    if a.is_object() == b.is_object() {
        if a.root_count() == 0 && !b.is_scalar() {
            return Ok(b.clone());
        }
        if b.root_count() == 0 && !a.is_scalar() {
            return Ok(a.clone());
        }
    }

    let mut it1 = a.iter();
    let mut it2 = b.iter();
    let mut st = Builder::new();

    let first = it1.next_token(true);
    let second = it2.next_token(true);
    let result = match (first, second) {
        (Some(Token::BeginObject { .. }), Some(Token::BeginObject { .. })) => {
            st.begin_object();
            copy_members(&mut it1, &mut st)?;
            copy_members(&mut it2, &mut st)?;
            st.end_object()?
        }
        (Some(Token::BeginArray { .. }), Some(Token::BeginArray { .. })) => {
            st.begin_array(false);
            copy_members(&mut it1, &mut st)?;
            copy_members(&mut it2, &mut st)?;
            st.end_array()?
        }
        (Some(Token::BeginObject { .. }), Some(Token::BeginArray { .. })) => {
            st.begin_array(false);
            st.begin_object();
            copy_members(&mut it1, &mut st)?;
            st.end_object()?;
            copy_members(&mut it2, &mut st)?;
            st.end_array()?
        }
        (Some(Token::BeginArray { .. }), Some(Token::BeginObject { .. })) => {
            st.begin_array(false);
            copy_members(&mut it1, &mut st)?;
            st.begin_object();
            copy_members(&mut it2, &mut st)?;
            st.end_object()?;
            st.end_array()?
        }
        (first, second) => {
            return Err(JsonbError::UnexpectedToken(format!(
                "concat expected two root containers, found {} and {}",
                first.map_or("end of stream", |t| t.name()),
                second.map_or("end of stream", |t| t.name())
            )))
        }
    };

    result.ok_or_else(|| JsonbError::UnexpectedToken("concat left the root open".to_string()))
}

/// Push the root members of an already opened iterator into the builder, up to
/// and excluding the root's end token.
fn copy_members(it: &mut TokenIter<'_>, st: &mut Builder) -> Result<()> {
    while let Some(token) = it.next_token(true) {
        match token {
            Token::EndArray | Token::EndObject => return Ok(()),
            other => {
                st.push(other)?;
            }
        }
    }
    Err(JsonbError::UnexpectedToken(
        "token stream ended before the root closed".to_string(),
    ))
}

/// Remove the top-level object pairs whose key is `key`, and the top-level array
/// elements that are the string `key`.
///
/// # Errors
///
/// `UnsupportedOperation` if `doc` is a scalar.
pub fn delete_key(doc: &Jsonb, key: &str) -> Result<Jsonb> {
    delete_keys(doc, [key])
}

/// Remove every top-level pair (or string element) matching any of `keys`.
pub fn delete_keys<I, S>(doc: &Jsonb, keys: I) -> Result<Jsonb>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    if doc.is_scalar() {
        return Err(cannot_delete_from_scalar());
    }
    let keys: Vec<S> = keys.into_iter().collect();
    if doc.root_count() == 0 || keys.is_empty() {
        return Ok(doc.clone());
    }
    let matches = |text: &str| keys.iter().any(|k| k.as_ref() == text);

    Builder::fold(doc.iter(), true, |token| match token {
        Token::Key(k) if matches(*k) => Substitution::DropPair,
        Token::Elem(Jsonb::String(s)) if matches(s.as_str()) => Substitution::Drop,
        _ => Substitution::Keep,
    })
}

/// Remove the array element at `index`, negative values counting from the end.
/// An index outside the array leaves it unchanged.
///
/// # Errors
///
/// `UnsupportedOperation` if `doc` is a scalar or an object.
pub fn delete_index(doc: &Jsonb, index: i32) -> Result<Jsonb> {
    if doc.is_scalar() {
        return Err(cannot_delete_from_scalar());
    }
    if doc.is_object() {
        return Err(JsonbError::UnsupportedOperation(
            "cannot delete from object using integer index".to_string(),
        ));
    }
    let count = i64::try_from(doc.root_count())
        .map_err(|_| JsonbError::Range("array too large to index".to_string()))?;
    let mut target = i64::from(index);
    if target < 0 {
        target = if -target > count { count } else { count + target };
    }
    if target >= count {
        return Ok(doc.clone());
    }

    let mut position = 0i64;
    Builder::fold(doc.iter(), true, |token| match token {
        Token::Elem(_) => {
            position += 1;
            if position - 1 == target {
                Substitution::Drop
            } else {
                Substitution::Keep
            }
        }
        _ => Substitution::Keep,
    })
}

fn cannot_delete_from_scalar() -> JsonbError {
    JsonbError::UnsupportedOperation("cannot delete from scalar".to_string())
}
