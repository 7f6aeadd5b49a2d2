//! Document operations lifted over temporal documents.
//!
//! Binary operations against a constant document force the result to step (or
//! keep it discrete); path mutations keep the input's interpolation.

use jsonb_core::{concat, delete_key, delete_path, insert_path, set_path, Jsonb, Path};

use crate::error::{Result, TemporalError};
use crate::lifting::{lift_binary, lift_binary_base, lift_unary};
use crate::temporal::Temporal;

/// `doc ⊕ temp(t)` at every instant: the constant is the left operand.
pub fn concat_jsonb_tjsonb(doc: &Jsonb, temp: &Temporal<Jsonb>) -> Result<Temporal<Jsonb>> {
    lift_binary_base(temp, doc, true, |a, b| Ok(concat(a, b)?))
}

/// `temp(t) ⊕ doc` at every instant.
pub fn concat_tjsonb_jsonb(temp: &Temporal<Jsonb>, doc: &Jsonb) -> Result<Temporal<Jsonb>> {
    lift_binary_base(temp, doc, false, |a, b| Ok(concat(a, b)?))
}

/// `a(t) ⊕ b(t)` for two temporal documents on the same time domain.
pub fn concat_tjsonb_tjsonb(a: &Temporal<Jsonb>, b: &Temporal<Jsonb>) -> Result<Temporal<Jsonb>> {
    lift_binary(a, b, |x, y| Ok(concat(x, y)?))
}

/// Remove the top-level `key` at every instant.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use jsonb_core::Jsonb;
/// use tjsonb_engine::{delete_tjsonb_key, Temporal};
///
/// let t = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
/// let doc: Jsonb = r#"{"a":1,"b":2}"#.parse().unwrap();
/// let out = delete_tjsonb_key(&Temporal::instant(doc, t), "a").unwrap();
/// assert_eq!(out.start_value().to_string(), r#"{"b":2}"#);
/// ```
pub fn delete_tjsonb_key(temp: &Temporal<Jsonb>, key: &str) -> Result<Temporal<Jsonb>> {
    lift_binary_base(temp, &Jsonb::from(key), false, |doc, key| match key {
        Jsonb::String(key) => Ok(delete_key(doc, key)?),
        other => Err(TemporalError::InvalidArgument(format!(
            "key must be a string, got {}",
            other.kind()
        ))),
    })
}

/// Replace (or, with `create_missing`, add) the value at `path` at every instant.
pub fn set_tjsonb_path(
    temp: &Temporal<Jsonb>,
    path: &Path,
    value: &Jsonb,
    create_missing: bool,
) -> Result<Temporal<Jsonb>> {
    lift_unary(temp, |doc| Ok(set_path(doc, path, value, create_missing)?))
}

/// Insert `value` next to the element at `path` (or add a missing key) at
/// every instant.
pub fn insert_tjsonb_path(
    temp: &Temporal<Jsonb>,
    path: &Path,
    value: &Jsonb,
    after: bool,
) -> Result<Temporal<Jsonb>> {
    lift_unary(temp, |doc| Ok(insert_path(doc, path, value, after)?))
}

/// Remove the member at `path` at every instant.
pub fn delete_tjsonb_path(temp: &Temporal<Jsonb>, path: &Path) -> Result<Temporal<Jsonb>> {
    lift_unary(temp, |doc| Ok(delete_path(doc, path)?))
}
