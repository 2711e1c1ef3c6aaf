use std::collections::BTreeMap;

use serde::Serialize;
use tracing::info;

use crate::acquire::{acquire_text, OcrEngine, RawInput};
use crate::config::Config;
use crate::error::AnalysisError;
use crate::ingredient::classifier::classify;
use crate::ingredient::normalizer::{dedup_preserving_order, normalize};
use crate::models::{CompoundInfo, RiskAssessment, SafetyReport};
use crate::report::summary::aggregate;

/// Everything one analysis request produces.
#[derive(Debug, Clone, Serialize)]
pub struct Analysis {
    pub keyword_version: String,
    /// Normalized ingredient names, in label order.
    pub ingredients: Vec<String>,
    pub report: SafetyReport,
    /// PubChem records keyed by ingredient name; filled only by `--lookup`.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub compounds: BTreeMap<String, CompoundInfo>,
}

/// Acquire → normalize → classify → aggregate.
pub async fn analyze<E: OcrEngine>(
    input: RawInput,
    engine: &E,
    config: &Config,
) -> Result<Analysis, AnalysisError> {
    let raw_text = acquire_text(input, engine, &config.ocr).await?;

    let mut ingredients = normalize(&raw_text);
    if config.analysis.deduplicate {
        ingredients = dedup_preserving_order(ingredients);
    }
    if ingredients.is_empty() {
        return Err(AnalysisError::NoValidIngredients);
    }

    let assessments: Vec<RiskAssessment> = ingredients
        .iter()
        .map(|name| classify(&config.keywords, name))
        .collect();
    let report = aggregate(&assessments);

    info!(
        ingredients = ingredients.len(),
        harmful = report.harmful.len(),
        verdict = %report.verdict,
        "analysis complete"
    );

    Ok(Analysis {
        keyword_version: config.keywords.version.clone(),
        ingredients,
        report,
        compounds: BTreeMap::new(),
    })
}
