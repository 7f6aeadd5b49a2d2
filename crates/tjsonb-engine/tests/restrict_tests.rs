//! Restriction to and away from a value.

use chrono::{TimeZone, Utc};
use jsonb_core::Jsonb;
use tjsonb_engine::{
    at_value, minus_value, Interpolation, TInstant, TSequence, TSequenceSet, TempSubtype,
    Temporal, TemporalError, Timestamp,
};

fn ts(hour: u32) -> Timestamp {
    Utc.with_ymd_and_hms(2026, 3, 1, hour, 0, 0).unwrap()
}

fn doc(json: &str) -> Jsonb {
    json.parse().unwrap()
}

fn step(values: &[(&str, u32)], lower_inc: bool, upper_inc: bool) -> TSequence<Jsonb> {
    let instants = values
        .iter()
        .map(|&(v, h)| TInstant::new(doc(v), ts(h)))
        .collect();
    TSequence::new(instants, lower_inc, upper_inc, Interpolation::Step).unwrap()
}

fn pieces(t: &Temporal<Jsonb>) -> &[TSequence<Jsonb>] {
    match t {
        Temporal::SequenceSet(set) => set.sequences(),
        other => panic!("expected a sequence set, got {}", other.subtype()),
    }
}

// ============================================================================
// Step sequences
// ============================================================================

#[test]
fn at_value_cuts_step_sequence_into_matching_stretches() {
    let t: Temporal<Jsonb> = step(&[("1", 8), ("2", 9), ("1", 10), ("1", 11)], true, true).into();
    let out = at_value(&t, &doc("1")).unwrap().unwrap();

    let seqs = pieces(&out);
    assert_eq!(seqs.len(), 2);
    assert_eq!(seqs[0].instants().len(), 2);
    assert!(seqs[0].lower_inc() && !seqs[0].upper_inc());
    assert!(seqs[1].lower_inc() && seqs[1].upper_inc());
    assert_eq!(out.interpolation(), Interpolation::Step);

    assert_eq!(out.timestamps(), vec![ts(8), ts(9), ts(10), ts(11)]);
    assert_eq!(out.value_at(ts(8)), Some(&doc("1")));
    assert_eq!(out.value_at(ts(9)), None);
    assert_eq!(out.value_at(ts(11)), Some(&doc("1")));
    assert!(out.values().iter().all(|v| **v == doc("1")));
}

#[test]
fn minus_value_keeps_the_complement() {
    let t: Temporal<Jsonb> = step(&[("1", 8), ("2", 9), ("3", 10), ("1", 11)], true, true).into();
    let out = minus_value(&t, &doc("1")).unwrap().unwrap();

    let seqs = pieces(&out);
    assert_eq!(seqs.len(), 1);
    assert_eq!(out.timestamps(), vec![ts(9), ts(10), ts(11)]);
    assert_eq!(out.value_at(ts(9)), Some(&doc("2")));
    assert_eq!(out.value_at(ts(10)), Some(&doc("3")));
    assert_eq!(out.value_at(ts(11)), None);
}

#[test]
fn restriction_keeps_exclusive_bounds_of_the_input() {
    let t: Temporal<Jsonb> = step(&[("1", 8), ("2", 9)], false, false).into();

    let ones = at_value(&t, &doc("1")).unwrap().unwrap();
    let seq = &pieces(&ones)[0];
    assert!(!seq.lower_inc() && !seq.upper_inc());
    assert_eq!(ones.value_at(ts(8)), None);

    // The last value sits on an exclusive bound, so it is never taken.
    assert!(at_value(&t, &doc("2")).unwrap().is_none());
}

#[test]
fn no_match_yields_none() {
    let t: Temporal<Jsonb> = step(&[("1", 8), ("1", 9)], true, true).into();
    assert!(at_value(&t, &doc("5")).unwrap().is_none());
    assert!(minus_value(&t, &doc("1")).unwrap().is_none());
}

#[test]
fn matching_final_instant_alone_becomes_instantaneous_piece() {
    let t: Temporal<Jsonb> = step(&[("1", 8), ("2", 9)], true, true).into();
    let out = at_value(&t, &doc("2")).unwrap().unwrap();
    let seqs = pieces(&out);
    assert_eq!(seqs.len(), 1);
    assert_eq!(seqs[0].instants().len(), 1);
    assert_eq!(out.timestamps(), vec![ts(9)]);
}

#[test]
fn restriction_over_sequence_set_spans_every_sequence() {
    let a = step(&[(r#"{"s":"on"}"#, 8), (r#"{"s":"off"}"#, 9)], true, false);
    let b = step(&[(r#"{"s":"on"}"#, 10), (r#"{"s":"on"}"#, 12)], true, true);
    let t: Temporal<Jsonb> = TSequenceSet::new(vec![a, b]).unwrap().into();

    let out = at_value(&t, &doc(r#"{"s":"on"}"#)).unwrap().unwrap();
    assert_eq!(pieces(&out).len(), 2);
    assert_eq!(out.timestamps(), vec![ts(8), ts(9), ts(10), ts(12)]);
    assert_eq!(out.value_at(ts(9)), None);
    assert_eq!(out.value_at(ts(11)), Some(&doc(r#"{"s":"on"}"#)));
}

// ============================================================================
// Instants, discrete sequences, linear input
// ============================================================================

#[test]
fn instant_is_kept_or_dropped_whole() {
    let t = Temporal::instant(doc(r#"{"a":1}"#), ts(8));
    let kept = at_value(&t, &doc(r#"{"a":1}"#)).unwrap().unwrap();
    assert_eq!(kept, t);
    assert!(minus_value(&t, &doc(r#"{"a":1}"#)).unwrap().is_none());
}

#[test]
fn discrete_sequence_filters_instants() {
    let instants = [("1", 8), ("2", 9), ("1", 10)]
        .iter()
        .map(|&(v, h)| TInstant::new(doc(v), ts(h)))
        .collect();
    let t: Temporal<Jsonb> = TSequence::discrete(instants).unwrap().into();

    let out = at_value(&t, &doc("1")).unwrap().unwrap();
    assert_eq!(out.subtype(), TempSubtype::Sequence);
    assert_eq!(out.interpolation(), Interpolation::Discrete);
    assert_eq!(out.timestamps(), vec![ts(8), ts(10)]);

    let out = minus_value(&t, &doc("1")).unwrap().unwrap();
    assert_eq!(out.timestamps(), vec![ts(9)]);
}

#[test]
fn linear_sequence_is_rejected() {
    let t: Temporal<f64> = TSequence::new(
        vec![TInstant::new(1.0, ts(8)), TInstant::new(2.0, ts(9))],
        true,
        true,
        Interpolation::Linear,
    )
    .unwrap()
    .into();
    let err = at_value(&t, &1.0).unwrap_err();
    assert!(matches!(err, TemporalError::InvalidArgument(_)));
}
