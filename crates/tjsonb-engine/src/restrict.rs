//! Restriction of a temporal value to the times where it does (or does not)
//! take a given value.
//!
//! Step sequences are cut at the instants where the value starts or stops
//! matching. Each piece keeps the input's interpolation and ends on an
//! exclusive bound at the first instant that no longer matches. Discrete
//! sequences and instants are filtered instant by instant.

use tracing::debug;

use crate::error::{Result, TemporalError};
use crate::temporal::{Interpolatable, Interpolation, TInstant, TSequence, TSequenceSet, Temporal};

/// The part of `temp` where it equals `value`, or `None` if it never does.
///
/// An instant or discrete input keeps its subtype. A continuous input comes
/// back as a sequence set with one sequence per stretch of time where the
/// value matches.
///
/// # Errors
///
/// `InvalidArgument` for linear sequences, whose values between instants are
/// not stored.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use jsonb_core::Jsonb;
/// use tjsonb_engine::{at_value, TInstant, TSequence, Temporal};
///
/// let t = |h| Utc.with_ymd_and_hms(2026, 3, 1, h, 0, 0).unwrap();
/// let seq: Temporal<Jsonb> = TSequence::step(vec![
///     TInstant::new(Jsonb::from("idle"), t(8)),
///     TInstant::new(Jsonb::from("busy"), t(9)),
///     TInstant::new(Jsonb::from("idle"), t(10)),
/// ])
/// .unwrap()
/// .into();
///
/// let busy = at_value(&seq, &Jsonb::from("busy")).unwrap().unwrap();
/// assert_eq!(busy.timestamps(), vec![t(9), t(10)]);
/// assert_eq!(busy.value_at(t(10)), None);
/// ```
pub fn at_value<V>(temp: &Temporal<V>, value: &V) -> Result<Option<Temporal<V>>>
where
    V: Interpolatable + PartialEq,
{
    restrict(temp, |v| v == value)
}

/// The part of `temp` where it differs from `value`, or `None` if it always
/// equals it. Subtypes follow [`at_value`].
pub fn minus_value<V>(temp: &Temporal<V>, value: &V) -> Result<Option<Temporal<V>>>
where
    V: Interpolatable + PartialEq,
{
    restrict(temp, |v| v != value)
}

fn restrict<V, P>(temp: &Temporal<V>, keep: P) -> Result<Option<Temporal<V>>>
where
    V: Interpolatable + PartialEq,
    P: Fn(&V) -> bool,
{
    if temp.interpolation() == Interpolation::Linear {
        return Err(TemporalError::InvalidArgument(
            "cannot restrict a linear temporal value to a value".to_string(),
        ));
    }
    debug!(subtype = %temp.subtype(), "restricting temporal value to a value");

    match temp {
        Temporal::Instant(inst) => Ok(keep(&inst.value).then(|| Temporal::Instant(inst.clone()))),
        Temporal::Sequence(seq) if seq.interpolation() == Interpolation::Discrete => {
            let kept: Vec<TInstant<V>> = seq
                .instants()
                .iter()
                .filter(|inst| keep(&inst.value))
                .cloned()
                .collect();
            if kept.is_empty() {
                return Ok(None);
            }
            Ok(Some(Temporal::Sequence(TSequence::discrete(kept)?)))
        }
        Temporal::Sequence(seq) => into_set(split_step(seq, &keep)?),
        Temporal::SequenceSet(set) => {
            let mut pieces = Vec::new();
            for seq in set.sequences() {
                pieces.extend(split_step(seq, &keep)?);
            }
            into_set(pieces)
        }
    }
}

fn into_set<V: Interpolatable>(pieces: Vec<TSequence<V>>) -> Result<Option<Temporal<V>>> {
    if pieces.is_empty() {
        return Ok(None);
    }
    Ok(Some(Temporal::SequenceSet(TSequenceSet::new(pieces)?)))
}

/// A piece under construction.
struct Run<V> {
    instants: Vec<TInstant<V>>,
    lower_inc: bool,
}

impl<V: Interpolatable + PartialEq> Run<V> {
    fn new(lower_inc: bool) -> Self {
        Run {
            instants: Vec::new(),
            lower_inc,
        }
    }

    /// Extend with the step starting at `inst`. A repeat of the held value adds
    /// nothing.
    fn push(&mut self, inst: &TInstant<V>) {
        if self.instants.last().is_some_and(|held| held.value == inst.value) {
            return;
        }
        self.instants.push(inst.clone());
    }

    /// Close the piece at `end`. An exclusive end carries the held value up to
    /// it; an inclusive one takes the value stored at `end`.
    fn close(mut self, end: &TInstant<V>, upper_inc: bool, interp: Interpolation) -> Result<TSequence<V>> {
        let closing = match self.instants.last() {
            Some(held) if !upper_inc => TInstant::new(held.value.clone(), end.t),
            _ => end.clone(),
        };
        self.instants.push(closing);
        TSequence::new(self.instants, self.lower_inc, upper_inc, interp)
    }
}

/// Cut a step sequence into the pieces where `keep` holds.
fn split_step<V, P>(seq: &TSequence<V>, keep: &P) -> Result<Vec<TSequence<V>>>
where
    V: Interpolatable + PartialEq,
    P: Fn(&V) -> bool,
{
    let interp = seq.interpolation();
    let (last, steps) = match seq.instants().split_last() {
        Some(split) => split,
        None => return Ok(Vec::new()),
    };

    let mut pieces = Vec::new();
    let mut run: Option<Run<V>> = None;
    // Instant `i` holds its value until instant `i + 1`.
    for (i, inst) in steps.iter().enumerate() {
        if keep(&inst.value) {
            run.get_or_insert_with(|| Run::new(i > 0 || seq.lower_inc()))
                .push(inst);
        } else if let Some(done) = run.take() {
            pieces.push(done.close(inst, false, interp)?);
        }
    }

    let last_kept = seq.upper_inc() && keep(&last.value);
    match run {
        Some(done) => pieces.push(done.close(last, last_kept, interp)?),
        None if last_kept => pieces.push(TSequence::new(vec![last.clone()], true, true, interp)?),
        None => {}
    }
    Ok(pieces)
}
