//! # jsonb-core
//!
//! Pure-Rust JSONB document engine: structural set/insert/delete at a path,
//! concatenation, and top-level key deletion.
//!
//! Documents are never edited in place. Every operation walks its input as a
//! token stream and folds a slightly different stream into a fresh builder, so
//! inputs stay untouched and a failed call leaves nothing half-built behind.
//! Objects keep their keys in canonical order (shorter keys first, then
//! bytewise), which makes structural equality a plain `==`.
//!
//! ## Quick start
//!
//! ```rust
//! use jsonb_core::{concat, delete_path, set_path, Jsonb, Path};
//!
//! let doc: Jsonb = r#"{"a":1}"#.parse().unwrap();
//!
//! // Add a missing key
//! let doc = set_path(&doc, &Path::from_texts(["b"]), &Jsonb::from(2), true).unwrap();
//! assert_eq!(doc.to_string(), r#"{"a":1,"b":2}"#);
//!
//! // Shallow merge, right side wins
//! let doc = concat(&doc, &r#"{"a":{"x":true}}"#.parse().unwrap()).unwrap();
//! assert_eq!(doc.to_string(), r#"{"a":{"x":true},"b":2}"#);
//!
//! // Remove a nested member
//! let doc = delete_path(&doc, &Path::from_texts(["a", "x"])).unwrap();
//! assert_eq!(doc.to_string(), r#"{"a":{},"b":2}"#);
//! ```
//!
//! ## Modules
//!
//! - [`value`]: `Jsonb` document value and conversions to/from `serde_json`
//! - [`iter`]: depth-first token walk (`TokenIter`, `Token`)
//! - [`builder`]: stack-based document builder and substitution fold
//! - [`path`]: `Path`, `PathElement`, and the `PathOp` action flags
//! - [`mutate`]: path mutation engine (`set_path`, `insert_path`, `delete_path`, `assign_path`)
//! - [`ops`]: `concat`, `delete_key`, `delete_keys`, `delete_index`
//! - [`error`]: Error types for document operations

pub mod builder;
pub mod error;
pub mod iter;
pub mod mutate;
pub mod ops;
pub mod path;
pub mod value;

pub use builder::{Builder, Substitution};
pub use error::{JsonbError, Result};
pub use iter::{Token, TokenIter};
pub use mutate::{apply_path, assign_path, delete_path, insert_path, set_path};
pub use ops::{concat, delete_index, delete_key, delete_keys};
pub use path::{Path, PathElement, PathOp};
pub use value::{Jsonb, JsonbKind};
