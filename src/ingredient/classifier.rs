use tracing::debug;

use crate::ingredient::keywords::KeywordTable;
use crate::models::{RiskAssessment, RiskLabel, LOW_SCORE};

/// Classify one ingredient name against the keyword table.
///
/// Matching is substring containment, so "methylparaben" hits "paraben".
/// High keywords are checked before moderate ones; the first hit in a tier
/// wins. Names with no hit are Low.
pub fn classify(table: &KeywordTable, ingredient: &str) -> RiskAssessment {
    let name = ingredient.trim().to_lowercase();

    for (label, keywords) in table.tiers() {
        if let Some(keyword) = keywords.iter().find(|k| name.contains(k.as_str())) {
            debug!(ingredient = %name, keyword = %keyword, %label, "keyword match");
            let score = label.score();
            return RiskAssessment {
                ingredient: name,
                toxicity_score: score,
                risk_label: RiskLabel::from_score(score),
                matched_keyword: Some(keyword.clone()),
            };
        }
    }

    RiskAssessment {
        ingredient: name,
        toxicity_score: LOW_SCORE,
        risk_label: RiskLabel::from_score(LOW_SCORE),
        matched_keyword: None,
    }
}
