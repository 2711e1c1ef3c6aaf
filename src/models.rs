use serde::{Deserialize, Serialize};

/// Toxicity score assigned to an ingredient matching a high-risk keyword.
pub const HIGH_SCORE: f64 = 0.9;
/// Toxicity score assigned to an ingredient matching a moderate-risk keyword.
pub const MODERATE_SCORE: f64 = 0.7;
/// Toxicity score assigned to everything else.
pub const LOW_SCORE: f64 = 0.2;

const HIGH_THRESHOLD: f64 = 0.8;
const MODERATE_THRESHOLD: f64 = 0.6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLabel {
    Low,
    Moderate,
    High,
}

impl RiskLabel {
    /// Derive the label from a toxicity score using the fixed thresholds.
    pub fn from_score(score: f64) -> Self {
        if score > HIGH_THRESHOLD {
            RiskLabel::High
        } else if score > MODERATE_THRESHOLD {
            RiskLabel::Moderate
        } else {
            RiskLabel::Low
        }
    }

    /// The score a keyword of this severity contributes.
    pub fn score(self) -> f64 {
        match self {
            RiskLabel::High => HIGH_SCORE,
            RiskLabel::Moderate => MODERATE_SCORE,
            RiskLabel::Low => LOW_SCORE,
        }
    }
}

impl std::fmt::Display for RiskLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLabel::Low => write!(f, "Low"),
            RiskLabel::Moderate => write!(f, "Moderate"),
            RiskLabel::High => write!(f, "High"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub ingredient: String,
    pub toxicity_score: f64,
    pub risk_label: RiskLabel,
    /// Keyword responsible for the classification, if any.
    pub matched_keyword: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Safe,
    Unsafe,
}

impl std::fmt::Display for Verdict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Verdict::Safe => write!(f, "safe"),
            Verdict::Unsafe => write!(f, "unsafe"),
        }
    }
}

/// Summary produced by [`crate::report::summary::aggregate`].
///
/// `verdict` is [`Verdict::Unsafe`] iff `harmful` is non-empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SafetyReport {
    pub assessments: Vec<RiskAssessment>,
    pub lines: Vec<String>,
    pub harmful: Vec<String>,
    pub closing: String,
    pub verdict: Verdict,
}

impl SafetyReport {
    pub fn count(&self, label: RiskLabel) -> usize {
        self.assessments
            .iter()
            .filter(|a| a.risk_label == label)
            .count()
    }
}

impl std::fmt::Display for SafetyReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for line in &self.lines {
            writeln!(f, "- {}", line)?;
        }
        write!(f, "\n{}", self.closing)
    }
}

/// Compound record returned by an enrichment lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompoundInfo {
    pub cid: u64,
    pub molecular_formula: Option<String>,
    pub molecular_weight: Option<String>,
    pub iupac_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label_from_bucket_scores() {
        assert_eq!(RiskLabel::from_score(HIGH_SCORE), RiskLabel::High);
        assert_eq!(RiskLabel::from_score(MODERATE_SCORE), RiskLabel::Moderate);
        assert_eq!(RiskLabel::from_score(LOW_SCORE), RiskLabel::Low);
    }

    #[test]
    fn test_label_thresholds_are_exclusive() {
        assert_eq!(RiskLabel::from_score(0.8), RiskLabel::Moderate);
        assert_eq!(RiskLabel::from_score(0.6), RiskLabel::Low);
        assert_eq!(RiskLabel::from_score(1.0), RiskLabel::High);
        assert_eq!(RiskLabel::from_score(0.0), RiskLabel::Low);
    }

    #[test]
    fn test_label_score_round_trip() {
        for label in [RiskLabel::Low, RiskLabel::Moderate, RiskLabel::High] {
            assert_eq!(RiskLabel::from_score(label.score()), label);
        }
    }

    #[test]
    fn test_verdict_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Verdict::Unsafe).unwrap(), "\"unsafe\"");
    }
}
