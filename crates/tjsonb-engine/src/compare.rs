//! Equality comparisons on temporal values.
//!
//! `ever_*` / `always_*` reduce a temporal value to a single answer over the
//! values it actually takes. `teq` / `tne` keep the time dimension and return a
//! temporal boolean.

use crate::error::Result;
use crate::lifting::{lift_binary, lift_binary_base};
use crate::temporal::{Interpolatable, Temporal};

/// True if `temp` is equal to `value` at some instant.
pub fn ever_eq<V: PartialEq>(temp: &Temporal<V>, value: &V) -> bool {
    temp.attained_values().into_iter().any(|v| v == value)
}

/// True if `temp` is equal to `value` at every instant.
pub fn always_eq<V: PartialEq>(temp: &Temporal<V>, value: &V) -> bool {
    temp.attained_values().into_iter().all(|v| v == value)
}

pub fn ever_ne<V: PartialEq>(temp: &Temporal<V>, value: &V) -> bool {
    !always_eq(temp, value)
}

pub fn always_ne<V: PartialEq>(temp: &Temporal<V>, value: &V) -> bool {
    !ever_eq(temp, value)
}

/// Temporal equality against a constant.
pub fn teq<V: Interpolatable + PartialEq>(temp: &Temporal<V>, value: &V) -> Result<Temporal<bool>> {
    lift_binary_base(temp, value, false, |a, b| Ok(a == b))
}

/// Temporal inequality against a constant.
pub fn tne<V: Interpolatable + PartialEq>(temp: &Temporal<V>, value: &V) -> Result<Temporal<bool>> {
    lift_binary_base(temp, value, false, |a, b| Ok(a != b))
}

/// Temporal equality of two values on the same time domain.
pub fn teq_temporal<V: PartialEq>(a: &Temporal<V>, b: &Temporal<V>) -> Result<Temporal<bool>> {
    lift_binary(a, b, |x, y| Ok(x == y))
}

/// Temporal inequality of two values on the same time domain.
pub fn tne_temporal<V: PartialEq>(a: &Temporal<V>, b: &Temporal<V>) -> Result<Temporal<bool>> {
    lift_binary(a, b, |x, y| Ok(x != y))
}

/// True if `a` and `b` are equal at some shared instant.
///
/// # Errors
///
/// `DomainMismatch` if the operands don't share a time domain.
pub fn ever_eq_temporal<V: PartialEq>(a: &Temporal<V>, b: &Temporal<V>) -> Result<bool> {
    Ok(ever_eq(&teq_temporal(a, b)?, &true))
}

pub fn always_eq_temporal<V: PartialEq>(a: &Temporal<V>, b: &Temporal<V>) -> Result<bool> {
    Ok(always_eq(&teq_temporal(a, b)?, &true))
}

pub fn ever_ne_temporal<V: PartialEq>(a: &Temporal<V>, b: &Temporal<V>) -> Result<bool> {
    Ok(!always_eq_temporal(a, b)?)
}

pub fn always_ne_temporal<V: PartialEq>(a: &Temporal<V>, b: &Temporal<V>) -> Result<bool> {
    Ok(!ever_eq_temporal(a, b)?)
}
