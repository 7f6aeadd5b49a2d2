//! Pointwise lifting of plain operations over temporal values.
//!
//! A lift rebuilds the temporal container with the same time frame (the same
//! timestamps, bounds, and sequence partition) and computes each new value from
//! the old value(s) at that instant. The lifted operation knows nothing about
//! time; the dispatcher knows nothing about the operation.
//!
//! - [`lift_unary`]: `f(v)` per instant, interpolation preserved
//! - [`lift_binary_base`]: `f(v, c)` (or `f(c, v)`) against a constant
//! - [`lift_binary`]: `f(v1, v2)` for two temporal values on the same domain
//!
//! Results of binary lifts cannot interpolate linearly: a linear input yields a
//! step result and a discrete input stays discrete.
//!
//! The first error returned by `f` aborts the lift; no partial value escapes.

use tracing::debug;

use crate::error::{Result, TemporalError};
use crate::temporal::{
    Interpolatable, Interpolation, TInstant, TSequence, TSequenceSet, Temporal,
};

/// Apply `f` to the value of every instant, keeping the interpolation mode.
///
/// # Errors
///
/// Whatever `f` returns first, or `InvalidTemporal` if the input interpolates
/// linearly and `W` can't.
pub fn lift_unary<V, W, F>(temp: &Temporal<V>, mut f: F) -> Result<Temporal<W>>
where
    W: Interpolatable,
    F: FnMut(&V) -> Result<W>,
{
    debug!(
        subtype = %temp.subtype(),
        instants = temp.num_instants(),
        "lifting unary operation"
    );
    let interp = temp.interpolation();
    if interp == Interpolation::Linear && !W::LINEAR {
        return Err(TemporalError::InvalidTemporal(
            "linear interpolation is not supported for the result type".to_string(),
        ));
    }
    rebuild(temp, interp, |inst| f(&inst.value))
}

/// Pair every instant value with `constant`: `f(value, constant)`, or
/// `f(constant, value)` when `invert` is set. The result never interpolates
/// linearly.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use tjsonb_engine::{lift_binary_base, Interpolation, TInstant, TSequence, Temporal};
///
/// let t = |h| Utc.with_ymd_and_hms(2026, 1, 1, h, 0, 0).unwrap();
/// let seq = TSequence::new(
///     vec![TInstant::new(1.0, t(8)), TInstant::new(3.0, t(9))],
///     true,
///     true,
///     Interpolation::Linear,
/// )
/// .unwrap();
/// let lifted = lift_binary_base(&Temporal::from(seq), &10.0, true, |c, v| Ok(c - v)).unwrap();
/// assert_eq!(lifted.interpolation(), Interpolation::Step);
/// assert_eq!(lifted.end_value(), &7.0);
/// ```
pub fn lift_binary_base<V, W, F>(
    temp: &Temporal<V>,
    constant: &V,
    invert: bool,
    mut f: F,
) -> Result<Temporal<W>>
where
    W: Interpolatable,
    F: FnMut(&V, &V) -> Result<W>,
{
    debug!(
        subtype = %temp.subtype(),
        instants = temp.num_instants(),
        invert,
        "lifting binary operation with constant"
    );
    rebuild(temp, temp.interpolation().non_linear(), |inst| {
        if invert {
            f(constant, &inst.value)
        } else {
            f(&inst.value, constant)
        }
    })
}

/// Apply `f` to the values of `a` and `b` at each shared instant.
///
/// Both operands must be of the same subtype and cover the same time domain:
/// identical timestamps and bounds, both discrete or both continuous, and (for
/// sequence sets) the same partition into sequences. Synchronizing operands
/// with different domains is left to the caller.
///
/// # Errors
///
/// `DomainMismatch` if the domains differ; otherwise whatever `f` returns first.
pub fn lift_binary<V, U, W, F>(a: &Temporal<V>, b: &Temporal<U>, mut f: F) -> Result<Temporal<W>>
where
    W: Interpolatable,
    F: FnMut(&V, &U) -> Result<W>,
{
    debug!(
        subtype = %a.subtype(),
        instants = a.num_instants(),
        "lifting binary operation over two temporal values"
    );
    let interp = a.interpolation().non_linear();
    match (a, b) {
        (Temporal::Instant(x), Temporal::Instant(y)) => {
            if x.t != y.t {
                return Err(mismatch(format!(
                    "instants at {} and {}",
                    x.t.to_rfc3339(),
                    y.t.to_rfc3339()
                )));
            }
            Ok(Temporal::Instant(TInstant::new(f(&x.value, &y.value)?, x.t)))
        }
        (Temporal::Sequence(x), Temporal::Sequence(y)) => {
            Ok(Temporal::Sequence(lift_sequences(x, y, interp, &mut f)?))
        }
        (Temporal::SequenceSet(x), Temporal::SequenceSet(y)) => {
            if x.sequences().len() != y.sequences().len() {
                return Err(mismatch(format!(
                    "sequence sets of {} and {} sequences",
                    x.sequences().len(),
                    y.sequences().len()
                )));
            }
            let sequences = x
                .sequences()
                .iter()
                .zip(y.sequences())
                .map(|(sx, sy)| lift_sequences(sx, sy, interp, &mut f))
                .collect::<Result<Vec<_>>>()?;
            Ok(Temporal::SequenceSet(TSequenceSet::from_lifted(sequences)))
        }
        _ => Err(mismatch(format!(
            "{} against {}",
            a.subtype(),
            b.subtype()
        ))),
    }
}

fn lift_sequences<V, U, W, F>(
    x: &TSequence<V>,
    y: &TSequence<U>,
    interp: Interpolation,
    f: &mut F,
) -> Result<TSequence<W>>
where
    F: FnMut(&V, &U) -> Result<W>,
{
    if !x.same_domain(y) {
        return Err(mismatch(
            "sequences differ in timestamps, bounds, or interpolation kind".to_string(),
        ));
    }
    let mut others = y.instants().iter();
    x.with_values(interp, |inst| match others.next() {
        Some(other) => f(&inst.value, &other.value),
        None => Err(mismatch("sequence lengths differ".to_string())),
    })
}

/// Rebuild `temp` with the given interpolation, computing each value with `f`.
fn rebuild<V, W, F>(temp: &Temporal<V>, interp: Interpolation, mut f: F) -> Result<Temporal<W>>
where
    F: FnMut(&TInstant<V>) -> Result<W>,
{
    match temp {
        Temporal::Instant(inst) => Ok(Temporal::Instant(TInstant::new(f(inst)?, inst.t))),
        Temporal::Sequence(seq) => Ok(Temporal::Sequence(seq.with_values(interp, &mut f)?)),
        Temporal::SequenceSet(set) => {
            let sequences = set
                .sequences()
                .iter()
                .map(|seq| seq.with_values(interp, &mut f))
                .collect::<Result<Vec<_>>>()?;
            Ok(Temporal::SequenceSet(TSequenceSet::from_lifted(sequences)))
        }
    }
}

fn mismatch(msg: String) -> TemporalError {
    debug!(reason = %msg, "temporal domains differ");
    TemporalError::DomainMismatch(msg)
}
