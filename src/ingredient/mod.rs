//! Ingredient text normalization and keyword-based toxicity classification.
//!
//! - [`normalizer`] — cleans raw label text into an ordered list of ingredient names.
//! - [`keywords`] — the versioned high/moderate keyword table and its built-in defaults.
//! - [`classifier`] — maps one ingredient name to a [`RiskAssessment`](crate::models::RiskAssessment).

pub mod classifier;
pub mod keywords;
pub mod normalizer;
