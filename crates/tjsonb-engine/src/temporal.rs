//! Temporal containers: a value at one instant, a sequence of instants, or a set
//! of disjoint sequences.
//!
//! Every container is validated on construction (and on deserialization, which
//! goes through the same constructors) and is immutable afterwards. Operations
//! never edit a temporal value; they build a new one with the same time frame.

use std::fmt;

use chrono::{DateTime, Utc};
use jsonb_core::Jsonb;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TemporalError};

pub type Timestamp = DateTime<Utc>;

/// How a sequence behaves between its recorded instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Interpolation {
    /// Only the recorded instants exist.
    Discrete,
    /// Each value holds until the next instant.
    Step,
    /// Values vary linearly between instants.
    Linear,
}

impl Interpolation {
    pub fn is_continuous(&self) -> bool {
        !matches!(self, Interpolation::Discrete)
    }

    /// The mode a result takes when it can't be interpolated linearly.
    pub fn non_linear(self) -> Self {
        match self {
            Interpolation::Linear => Interpolation::Step,
            other => other,
        }
    }
}

impl fmt::Display for Interpolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Interpolation::Discrete => "discrete",
            Interpolation::Step => "step",
            Interpolation::Linear => "linear",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TempSubtype {
    Instant,
    Sequence,
    SequenceSet,
}

impl fmt::Display for TempSubtype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TempSubtype::Instant => "instant",
            TempSubtype::Sequence => "sequence",
            TempSubtype::SequenceSet => "sequence set",
        };
        f.write_str(name)
    }
}

/// Base types a temporal value can carry.
///
/// Only types with arithmetic between values may use linear interpolation;
/// documents, booleans and text are limited to discrete and step.
pub trait Interpolatable: Clone {
    const LINEAR: bool = false;
}

impl Interpolatable for Jsonb {}
impl Interpolatable for bool {}
impl Interpolatable for String {}
impl Interpolatable for i64 {}

impl Interpolatable for f64 {
    const LINEAR: bool = true;
}

// ---------------------------------------------------------------------------
// Instant
// ---------------------------------------------------------------------------

/// A value at a single timestamp.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TInstant<V> {
    pub t: Timestamp,
    pub value: V,
}

impl<V> TInstant<V> {
    pub fn new(value: V, t: Timestamp) -> Self {
        Self { t, value }
    }
}

// ---------------------------------------------------------------------------
// Sequence
// ---------------------------------------------------------------------------

/// Instants in strictly increasing time order, with bound inclusiveness and an
/// interpolation mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "SequenceRepr<V>",
    bound(deserialize = "V: Deserialize<'de> + Interpolatable")
)]
pub struct TSequence<V> {
    instants: Vec<TInstant<V>>,
    lower_inc: bool,
    upper_inc: bool,
    interp: Interpolation,
}

#[derive(Deserialize)]
struct SequenceRepr<V> {
    instants: Vec<TInstant<V>>,
    #[serde(default = "inclusive")]
    lower_inc: bool,
    #[serde(default = "inclusive")]
    upper_inc: bool,
    #[serde(default = "default_interp")]
    interp: Interpolation,
}

fn inclusive() -> bool {
    true
}

fn default_interp() -> Interpolation {
    Interpolation::Step
}

impl<V: Interpolatable> TryFrom<SequenceRepr<V>> for TSequence<V> {
    type Error = TemporalError;

    fn try_from(repr: SequenceRepr<V>) -> Result<Self> {
        TSequence::new(repr.instants, repr.lower_inc, repr.upper_inc, repr.interp)
    }
}

impl<V: Interpolatable> TSequence<V> {
    /// Build a validated sequence.
    ///
    /// # Errors
    ///
    /// `InvalidTemporal` if `instants` is empty or not strictly increasing in
    /// time, if a single-instant or discrete sequence has an exclusive bound, or
    /// if `interp` is linear for a base type that can't interpolate linearly.
    pub fn new(
        instants: Vec<TInstant<V>>,
        lower_inc: bool,
        upper_inc: bool,
        interp: Interpolation,
    ) -> Result<Self> {
        if instants.is_empty() {
            return Err(invalid("a sequence must have at least one instant"));
        }
        if let Some(pair) = instants.windows(2).find(|w| w[0].t >= w[1].t) {
            return Err(invalid(format!(
                "timestamps must be strictly increasing: {} is not before {}",
                pair[0].t.to_rfc3339(),
                pair[1].t.to_rfc3339()
            )));
        }
        if (instants.len() == 1 || interp == Interpolation::Discrete) && !(lower_inc && upper_inc) {
            return Err(invalid(
                "instantaneous and discrete sequences must include both bounds",
            ));
        }
        if interp == Interpolation::Linear && !V::LINEAR {
            return Err(invalid("linear interpolation is not supported for this base type"));
        }
        Ok(Self {
            instants,
            lower_inc,
            upper_inc,
            interp,
        })
    }

    /// A step sequence with inclusive bounds.
    pub fn step(instants: Vec<TInstant<V>>) -> Result<Self> {
        Self::new(instants, true, true, Interpolation::Step)
    }

    /// A discrete sequence.
    pub fn discrete(instants: Vec<TInstant<V>>) -> Result<Self> {
        Self::new(instants, true, true, Interpolation::Discrete)
    }
}

impl<V> TSequence<V> {
    pub fn instants(&self) -> &[TInstant<V>] {
        &self.instants
    }

    pub fn lower_inc(&self) -> bool {
        self.lower_inc
    }

    pub fn upper_inc(&self) -> bool {
        self.upper_inc
    }

    pub fn interpolation(&self) -> Interpolation {
        self.interp
    }

    /// First instant. Sequences are never empty.
    pub fn first(&self) -> &TInstant<V> {
        &self.instants[0]
    }

    pub fn last(&self) -> &TInstant<V> {
        &self.instants[self.instants.len() - 1]
    }

    /// Instants whose values the sequence actually takes: a continuous sequence
    /// with an exclusive upper bound never reaches its last instant.
    pub(crate) fn attained(&self) -> &[TInstant<V>] {
        let n = self.instants.len();
        if self.interp.is_continuous() && !self.upper_inc && n > 1 {
            &self.instants[..n - 1]
        } else {
            &self.instants
        }
    }

    /// Value at `t`, or `None` outside the sequence. Unless `strict`, an
    /// exclusive bound answers with the value stored there.
    fn value_at(&self, t: Timestamp, strict: bool) -> Option<&V> {
        let first = self.first();
        let last = self.last();
        if !self.interp.is_continuous() {
            return self
                .instants
                .binary_search_by(|inst| inst.t.cmp(&t))
                .ok()
                .map(|i| &self.instants[i].value);
        }
        if t < first.t || t > last.t {
            return None;
        }
        if t == first.t && !self.lower_inc {
            return (!strict).then_some(&first.value);
        }
        if t == last.t && !self.upper_inc {
            return (!strict).then_some(&last.value);
        }
        match self.instants.binary_search_by(|inst| inst.t.cmp(&t)) {
            Ok(i) => Some(&self.instants[i].value),
            // Between two linear instants there is no stored value to hand out.
            Err(_) if self.interp == Interpolation::Linear => None,
            Err(i) => Some(&self.instants[i - 1].value),
        }
    }

    /// Same time frame, every value replaced by `f(value)`. Callers are
    /// responsible for passing an interpolation valid for `W`.
    pub(crate) fn with_values<W, F>(&self, interp: Interpolation, mut f: F) -> Result<TSequence<W>>
    where
        F: FnMut(&TInstant<V>) -> Result<W>,
    {
        let instants = self
            .instants
            .iter()
            .map(|inst| Ok(TInstant::new(f(inst)?, inst.t)))
            .collect::<Result<Vec<_>>>()?;
        Ok(TSequence {
            instants,
            lower_inc: self.lower_inc,
            upper_inc: self.upper_inc,
            interp,
        })
    }

    /// Same timestamps, bounds, and kind (discrete or continuous).
    pub(crate) fn same_domain<U>(&self, other: &TSequence<U>) -> bool {
        self.lower_inc == other.lower_inc
            && self.upper_inc == other.upper_inc
            && self.interp.is_continuous() == other.interp.is_continuous()
            && self.instants.len() == other.instants.len()
            && self
                .instants
                .iter()
                .zip(&other.instants)
                .all(|(a, b)| a.t == b.t)
    }
}

// ---------------------------------------------------------------------------
// Sequence set
// ---------------------------------------------------------------------------

/// Continuous sequences in time order that pairwise do not overlap.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    try_from = "SequenceSetRepr<V>",
    bound(deserialize = "V: Deserialize<'de> + Interpolatable")
)]
pub struct TSequenceSet<V> {
    sequences: Vec<TSequence<V>>,
}

#[derive(Deserialize)]
#[serde(bound(deserialize = "V: Deserialize<'de> + Interpolatable"))]
struct SequenceSetRepr<V> {
    sequences: Vec<TSequence<V>>,
}

impl<V: Interpolatable> TryFrom<SequenceSetRepr<V>> for TSequenceSet<V> {
    type Error = TemporalError;

    fn try_from(repr: SequenceSetRepr<V>) -> Result<Self> {
        TSequenceSet::new(repr.sequences)
    }
}

impl<V: Interpolatable> TSequenceSet<V> {
    /// Build a validated sequence set.
    ///
    /// # Errors
    ///
    /// `InvalidTemporal` if `sequences` is empty, mixes interpolation modes,
    /// holds a discrete sequence, or if two consecutive sequences overlap. Two
    /// sequences may share a bound timestamp only if at most one includes it.
    pub fn new(sequences: Vec<TSequence<V>>) -> Result<Self> {
        let Some(head) = sequences.first() else {
            return Err(invalid("a sequence set must have at least one sequence"));
        };
        let interp = head.interp;
        if !interp.is_continuous() {
            return Err(invalid("a sequence set cannot hold discrete sequences"));
        }
        if sequences.iter().any(|s| s.interp != interp) {
            return Err(invalid("all sequences of a set must share one interpolation"));
        }
        for pair in sequences.windows(2) {
            let (prev, next) = (&pair[0], &pair[1]);
            let (end, start) = (prev.last().t, next.first().t);
            if end > start || (end == start && prev.upper_inc && next.lower_inc) {
                return Err(invalid(format!(
                    "sequences must be ordered and disjoint: overlap at {}",
                    start.to_rfc3339()
                )));
            }
        }
        Ok(Self { sequences })
    }
}

impl<V> TSequenceSet<V> {
    /// Wrap sequences rebuilt from an already validated set with the same
    /// time frame.
    pub(crate) fn from_lifted(sequences: Vec<TSequence<V>>) -> Self {
        Self { sequences }
    }

    pub fn sequences(&self) -> &[TSequence<V>] {
        &self.sequences
    }

    pub fn interpolation(&self) -> Interpolation {
        self.sequences[0].interp
    }
}

// ---------------------------------------------------------------------------
// Temporal
// ---------------------------------------------------------------------------

/// A time-varying value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(
    tag = "subtype",
    bound(deserialize = "V: Deserialize<'de> + Interpolatable")
)]
pub enum Temporal<V> {
    Instant(TInstant<V>),
    Sequence(TSequence<V>),
    SequenceSet(TSequenceSet<V>),
}

impl<V> From<TInstant<V>> for Temporal<V> {
    fn from(inst: TInstant<V>) -> Self {
        Temporal::Instant(inst)
    }
}

impl<V> From<TSequence<V>> for Temporal<V> {
    fn from(seq: TSequence<V>) -> Self {
        Temporal::Sequence(seq)
    }
}

impl<V> From<TSequenceSet<V>> for Temporal<V> {
    fn from(set: TSequenceSet<V>) -> Self {
        Temporal::SequenceSet(set)
    }
}

impl<V> Temporal<V> {
    pub fn instant(value: V, t: Timestamp) -> Self {
        Temporal::Instant(TInstant::new(value, t))
    }

    pub fn subtype(&self) -> TempSubtype {
        match self {
            Temporal::Instant(_) => TempSubtype::Instant,
            Temporal::Sequence(_) => TempSubtype::Sequence,
            Temporal::SequenceSet(_) => TempSubtype::SequenceSet,
        }
    }

    /// Interpolation mode; an instant reports `Discrete`.
    pub fn interpolation(&self) -> Interpolation {
        match self {
            Temporal::Instant(_) => Interpolation::Discrete,
            Temporal::Sequence(seq) => seq.interp,
            Temporal::SequenceSet(set) => set.interpolation(),
        }
    }

    /// All instants in time order.
    pub fn instants(&self) -> Vec<&TInstant<V>> {
        match self {
            Temporal::Instant(inst) => vec![inst],
            Temporal::Sequence(seq) => seq.instants.iter().collect(),
            Temporal::SequenceSet(set) => set
                .sequences
                .iter()
                .flat_map(|seq| seq.instants.iter())
                .collect(),
        }
    }

    pub fn num_instants(&self) -> usize {
        match self {
            Temporal::Instant(_) => 1,
            Temporal::Sequence(seq) => seq.instants.len(),
            Temporal::SequenceSet(set) => set.sequences.iter().map(|s| s.instants.len()).sum(),
        }
    }

    /// Distinct timestamps in time order. Sequences of a set may share a bound,
    /// which is reported once.
    pub fn timestamps(&self) -> Vec<Timestamp> {
        let mut out: Vec<Timestamp> = self.instants().iter().map(|inst| inst.t).collect();
        out.dedup();
        out
    }

    pub fn start_value(&self) -> &V {
        match self {
            Temporal::Instant(inst) => &inst.value,
            Temporal::Sequence(seq) => &seq.first().value,
            Temporal::SequenceSet(set) => &set.sequences[0].first().value,
        }
    }

    pub fn end_value(&self) -> &V {
        match self {
            Temporal::Instant(inst) => &inst.value,
            Temporal::Sequence(seq) => &seq.last().value,
            Temporal::SequenceSet(set) => &set.sequences[set.sequences.len() - 1].last().value,
        }
    }

    /// Value of the `n`-th instant, counting from 1.
    pub fn value_n(&self, n: usize) -> Option<&V> {
        let index = n.checked_sub(1)?;
        self.instants().get(index).copied().map(|inst| &inst.value)
    }

    /// Value at `t`, honoring bounds and interpolation, or `None` if the
    /// temporal value is not defined there.
    pub fn value_at(&self, t: Timestamp) -> Option<&V> {
        self.value_at_timestamp(t, true)
    }

    /// Like [`Temporal::value_at`], but with `strict` off a timestamp sitting
    /// on an exclusive bound yields the instant stored at that bound.
    pub fn value_at_timestamp(&self, t: Timestamp, strict: bool) -> Option<&V> {
        match self {
            Temporal::Instant(inst) => (inst.t == t).then_some(&inst.value),
            Temporal::Sequence(seq) => seq.value_at(t, strict),
            Temporal::SequenceSet(set) => {
                // Sequences may share a bound timestamp; an inclusive one wins.
                set.sequences
                    .iter()
                    .find_map(|seq| seq.value_at(t, true))
                    .or_else(|| {
                        if strict {
                            None
                        } else {
                            set.sequences.iter().find_map(|seq| seq.value_at(t, false))
                        }
                    })
            }
        }
    }

    /// Instants whose values the temporal value actually takes.
    pub(crate) fn attained_values(&self) -> Vec<&V> {
        match self {
            Temporal::Instant(inst) => vec![&inst.value],
            Temporal::Sequence(seq) => seq.attained().iter().map(|i| &i.value).collect(),
            Temporal::SequenceSet(set) => set
                .sequences
                .iter()
                .flat_map(|seq| seq.attained().iter().map(|i| &i.value))
                .collect(),
        }
    }
}

impl<V: PartialEq> Temporal<V> {
    /// Distinct values in first-seen order.
    pub fn values(&self) -> Vec<&V> {
        let mut out: Vec<&V> = Vec::new();
        for inst in self.instants() {
            if !out.contains(&&inst.value) {
                out.push(&inst.value);
            }
        }
        out
    }
}

impl<V: Interpolatable> Temporal<V> {
    /// A temporal value holding `value` over the time frame of `frame`.
    ///
    /// A linear frame becomes step when `V` can't interpolate linearly.
    pub fn from_base_temp<U>(value: V, frame: &Temporal<U>) -> Temporal<V> {
        let interp = |mode: Interpolation| {
            if V::LINEAR {
                mode
            } else {
                mode.non_linear()
            }
        };
        let rebuild = |seq: &TSequence<U>| TSequence {
            instants: seq
                .instants
                .iter()
                .map(|inst| TInstant::new(value.clone(), inst.t))
                .collect(),
            lower_inc: seq.lower_inc,
            upper_inc: seq.upper_inc,
            interp: interp(seq.interp),
        };
        match frame {
            Temporal::Instant(inst) => Temporal::instant(value.clone(), inst.t),
            Temporal::Sequence(seq) => Temporal::Sequence(rebuild(seq)),
            Temporal::SequenceSet(set) => Temporal::SequenceSet(TSequenceSet {
                sequences: set.sequences.iter().map(rebuild).collect(),
            }),
        }
    }
}

fn invalid(msg: impl Into<String>) -> TemporalError {
    TemporalError::InvalidTemporal(msg.into())
}
