use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ingredient::normalizer::strip_disallowed;
use crate::models::RiskLabel;

pub const BUILTIN_VERSION: &str = "builtin-1";

/// Substrings flagging regulated or hazardous substances.
pub const BUILTIN_HIGH: &[&str] = &[
    "paraben",
    "formaldehyde",
    "phthalate",
    "triclosan",
    "benzene",
    "oxybenzone",
    "coal tar",
    "hydroquinone",
    "toluene",
    "lead acetate",
    "mercury",
    "dmdm hydantoin",
    "quaternium",
];

/// Substrings flagging common irritants and preservatives of lesser concern.
pub const BUILTIN_MODERATE: &[&str] = &[
    "sodium benzoate",
    "sulfate",
    "fragrance",
    "parfum",
    "propylene glycol",
    "triethanolamine",
    "diethanolamine",
    "retinyl palmitate",
    "talc",
];

/// Ordered keyword lists per severity, loaded from the `[keywords]` config section.
///
/// Any list left out of the config falls back to the built-in one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeywordTable {
    pub version: String,
    pub high: Vec<String>,
    pub moderate: Vec<String>,
}

impl Default for KeywordTable {
    fn default() -> Self {
        KeywordTable {
            version: BUILTIN_VERSION.to_string(),
            high: BUILTIN_HIGH.iter().map(|k| k.to_string()).collect(),
            moderate: BUILTIN_MODERATE.iter().map(|k| k.to_string()).collect(),
        }
    }
}

impl KeywordTable {
    /// Reduce every keyword to the alphabet normalized names use, so it can
    /// still match. Keywords left blank or holding a comma are dropped. Order is kept.
    pub fn sanitized(self) -> Self {
        KeywordTable {
            version: self.version.trim().to_string(),
            high: sanitize_list(self.high),
            moderate: sanitize_list(self.moderate),
        }
    }

    /// Keyword lists in severity order, most severe first.
    pub fn tiers(&self) -> [(RiskLabel, &[String]); 2] {
        [
            (RiskLabel::High, self.high.as_slice()),
            (RiskLabel::Moderate, self.moderate.as_slice()),
        ]
    }
}

fn sanitize_list(list: Vec<String>) -> Vec<String> {
    list.into_iter().filter_map(|raw| sanitize_keyword(&raw)).collect()
}

fn sanitize_keyword(raw: &str) -> Option<String> {
    let keyword = strip_disallowed(raw).trim().to_string();

    // Names are split on commas, so a keyword holding one can never match.
    if keyword.contains(',') {
        warn!(keyword = %raw, "dropping keyword: it contains a comma after cleanup");
        return None;
    }
    if keyword.is_empty() {
        if !raw.trim().is_empty() {
            warn!(keyword = %raw, "dropping keyword: nothing left after cleanup");
        }
        return None;
    }
    if keyword != raw.trim().to_lowercase() {
        warn!(keyword = %raw, cleaned = %keyword, "keyword rewritten to match normalized names");
    }
    Some(keyword)
}
