//! Diagnostics: data model and target selection.
//!
//! ## Contents
//! - [`Diagnostic`], [`Range`], [`Position`], [`Severity`], [`DiagnosticCode`]
//!   immutable snapshots of what the host reported
//! - [`select`] narrows a raw collection to enabled ids, ordered by position
//! - [`traversal_order`] reverses a selection so edits never shift unvisited targets
//! - [`on_line`] picks diagnostics that intersect a caret line
//!
//! ## Flow
//! ```text
//! host.diagnostics(doc) ──► select(raw, cfg) ──► traversal_order() ──► RunController
//!        (snapshot)          (filter + stable      (highest position
//!                             ascending sort)        first)
//! ```

mod diagnostic;
pub(crate) mod filter;

pub use diagnostic::{Diagnostic, DiagnosticCode, Position, Range, Severity};
pub use filter::{on_line, select, sort_by_position, traversal_order};
