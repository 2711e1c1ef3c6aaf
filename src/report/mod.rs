//! Safety report aggregation and renderers.
//!
//! - [`summary`] — folds risk assessments into a [`SafetyReport`](crate::models::SafetyReport).
//! - [`terminal`] — colored summary box and ingredient table; respects `--verbose` / `--quiet`.
//! - [`pdf`] — cover page with risk counts and verdict, followed by the ingredient table.

pub mod pdf;
pub mod summary;
pub mod terminal;
