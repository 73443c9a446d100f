//! # prooftext outline
//!
//! Line numbering for natural-deduction proofs with nested subproofs.
//!
//! ## Overview
//!
//! A proof is a flat list of lines. Nesting lives entirely in the line
//! numbers: `3.1.2` is the second line of the subproof opened by `3.1`, which
//! itself belongs to the subproof opened by `3`. This crate keeps those
//! numbers consistent while lines are inserted, nested, concluded and
//! deleted.
//!
//! The core type is [`Outline`], which maintains:
//!
//! - **Traversal order**: lines in the order they are presented
//! - **Tombstones**: saved lines that were deleted stay hidden until purged
//! - **Position counters**: the `0..k` presentation index of visible lines
//!
//! ## Edits
//!
//! | Operation | Effect |
//! |-----------|--------|
//! | [`Outline::start`] | one top-level line per premise |
//! | [`Outline::insert_line`] | sibling after a line and its subproofs |
//! | [`Outline::begin_subproof`] | first child of a line |
//! | [`Outline::conclude_or_promote`] | moves the last line of a subproof up one level |
//! | [`Outline::delete_line`] | removes or tombstones a line |
//!
//! Each edit is validated before anything changes; a rejected edit returns an
//! [`OutlineError`] and leaves the outline untouched.
//!
//! ## Examples
//!
//! ```
//! use prooftext_outline::{Label, Outline, Payload};
//!
//! let mut outline = Outline::start(["A", "B", "C"]);
//! let two: Label = "2".parse()?;
//!
//! let new = outline.insert_line(&two, Payload::new("A∧B", "∧I 1,2"))?;
//! assert_eq!(new.to_string(), "3");
//!
//! let labels: Vec<String> = outline
//!     .render_labels()
//!     .into_iter()
//!     .map(|line| line.label)
//!     .collect();
//! assert_eq!(labels, ["1", "2", "3", "4"]);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ### Edit scripts
//!
//! Edits can also be recorded as JSON and replayed with [`Outline::apply`]:
//!
//! ```
//! use prooftext_outline::{Outline, parse_script};
//!
//! let script = r#"[
//!     { "op": "start", "premises": ["P→Q"] },
//!     { "op": "begin_subproof", "at": "1", "formula": "P" },
//!     { "op": "conclude", "at": "1.1" }
//! ]"#;
//!
//! let mut outline = Outline::default();
//! for edit in parse_script(script)? {
//!     outline.apply(&edit)?;
//! }
//! assert_eq!(outline.render_labels()[1].label, "2");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Edit scripts.
pub mod edit;
/// Labels, lines and payloads.
pub mod ir;
/// The numbering engine.
pub mod outline;
/// Mutex-guarded outline for concurrent editors.
pub mod shared;


pub use edit::{Edit, parse_script};
pub use ir::{ASSUMPTION_RULE, Label, LabelParseError, Line, PREMISE_RULE, Payload, RenderedLine};
pub use outline::{Outline, OutlineError};
pub use shared::SharedOutline;

/// Schema version of the JSON snapshot of an outline.
///
/// - MAJOR: Breaking changes to line structure
/// - MINOR: New optional fields
/// - PATCH: Bug fixes to numbering behavior
pub const SCHEMA_VERSION: &str = "1.0.0";
