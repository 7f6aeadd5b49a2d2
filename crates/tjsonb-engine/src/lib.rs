//! # tjsonb-engine
//!
//! Temporal JSONB: documents that change over time, and the document
//! operations of `jsonb-core` applied pointwise across them.
//!
//! A temporal value is a single instant, a sequence of instants with bounds and
//! an interpolation mode, or a set of disjoint sequences. Lifting rebuilds that
//! time frame and computes each new value from the old one at the same instant,
//! so timestamps and bounds come through every operation unchanged.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use jsonb_core::Jsonb;
//! use tjsonb_engine::{concat_tjsonb_jsonb, Interpolation, TInstant, TSequence, Temporal};
//!
//! let t = |h| Utc.with_ymd_and_hms(2026, 3, 1, h, 0, 0).unwrap();
//! let doc = |s: &str| s.parse::<Jsonb>().unwrap();
//!
//! let seq = TSequence::step(vec![
//!     TInstant::new(doc(r#"{"speed":10}"#), t(8)),
//!     TInstant::new(doc(r#"{"speed":12}"#), t(9)),
//! ])
//! .unwrap();
//!
//! let tagged = concat_tjsonb_jsonb(&Temporal::from(seq), &doc(r#"{"unit":"kmh"}"#)).unwrap();
//! assert_eq!(tagged.interpolation(), Interpolation::Step);
//! assert_eq!(tagged.end_value().to_string(), r#"{"unit":"kmh","speed":12}"#);
//! ```
//!
//! ## Modules
//!
//! - [`temporal`]: `Temporal`, `TInstant`, `TSequence`, `TSequenceSet` and their accessors
//! - [`lifting`]: `lift_unary`, `lift_binary_base`, `lift_binary`
//! - [`ops`]: lifted concat, key deletion, and path mutation
//! - [`compare`]: ever/always equality and temporal `teq`/`tne`
//! - [`restrict`]: `at_value` and `minus_value`
//! - [`error`]: Error types

pub mod compare;
pub mod error;
pub mod lifting;
pub mod ops;
pub mod restrict;
pub mod temporal;

pub use compare::{
    always_eq, always_eq_temporal, always_ne, always_ne_temporal, ever_eq, ever_eq_temporal,
    ever_ne, ever_ne_temporal, teq, teq_temporal, tne, tne_temporal,
};
pub use error::{Result, TemporalError};
pub use lifting::{lift_binary, lift_binary_base, lift_unary};
pub use ops::{
    concat_jsonb_tjsonb, concat_tjsonb_jsonb, concat_tjsonb_tjsonb, delete_tjsonb_key,
    delete_tjsonb_path, insert_tjsonb_path, set_tjsonb_path,
};
pub use restrict::{at_value, minus_value};
pub use temporal::{
    Interpolatable, Interpolation, TInstant, TSequence, TSequenceSet, TempSubtype, Temporal,
    Timestamp,
};
