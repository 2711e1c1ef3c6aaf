use crate::models::{RiskAssessment, RiskLabel, SafetyReport, Verdict};

/// Fold classified ingredients into a [`SafetyReport`].
///
/// Lines keep input order. Each High ingredient appears once in the harmful
/// list, at its first position. An empty input yields the safe verdict.
pub fn aggregate(assessments: &[RiskAssessment]) -> SafetyReport {
    let lines = assessments
        .iter()
        .map(|a| format!("{} : {} risk", a.ingredient, a.risk_label))
        .collect();

    let mut harmful: Vec<String> = Vec::new();
    for a in assessments.iter().filter(|a| a.risk_label == RiskLabel::High) {
        if !harmful.contains(&a.ingredient) {
            harmful.push(a.ingredient.clone());
        }
    }

    let (verdict, closing) = if harmful.is_empty() {
        (Verdict::Safe, "Product appears safe.".to_string())
    } else {
        (
            Verdict::Unsafe,
            format!("Harmful ingredients detected: {}", harmful.join(", ")),
        )
    };

    SafetyReport {
        assessments: assessments.to_vec(),
        lines,
        harmful,
        closing,
        verdict,
    }
}
