//! Optional compound enrichment from public chemical databases.
//!
//! Lookups never influence classification: they only add detail to the report.
//! [`CompoundLookup::lookup`] returns `Ok(Some(info))` on a hit, `Ok(None)` when
//! the compound is unknown, and `Err` on network failures.

use std::collections::BTreeMap;

use anyhow::Result;
use futures::future::join_all;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, warn};

use crate::models::CompoundInfo;

pub mod pubchem;

#[allow(async_fn_in_trait)]
pub trait CompoundLookup {
    async fn lookup(&self, name: &str) -> Result<Option<CompoundInfo>>;
}

/// Look up every distinct ingredient, `batch_size` requests at a time.
///
/// Failed or missing lookups are skipped.
pub async fn enrich<L: CompoundLookup>(
    lookup: &L,
    ingredients: &[String],
    batch_size: usize,
    quiet: bool,
) -> BTreeMap<String, CompoundInfo> {
    let mut names: Vec<&String> = Vec::new();
    for name in ingredients {
        if !names.contains(&name) {
            names.push(name);
        }
    }

    let pb = if !quiet {
        let pb = ProgressBar::new(names.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        {
            pb.set_style(style.progress_chars("#>-"));
        }
        Some(pb)
    } else {
        None
    };

    let mut compounds = BTreeMap::new();

    for batch in names.chunks(batch_size.max(1)) {
        let results = join_all(batch.iter().map(|name| lookup.lookup(name))).await;

        for (name, result) in batch.iter().zip(results) {
            match result {
                Ok(Some(info)) => {
                    compounds.insert((*name).clone(), info);
                }
                Ok(None) => debug!(ingredient = %name, "no compound record"),
                Err(e) => warn!(ingredient = %name, error = %e, "compound lookup failed"),
            }
            if let Some(pb) = &pb {
                pb.inc(1);
            }
        }
    }

    if let Some(pb) = pb {
        pb.finish_with_message("Done");
    }

    compounds
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeLookup {
        calls: AtomicUsize,
    }

    impl CompoundLookup for FakeLookup {
        async fn lookup(&self, name: &str) -> Result<Option<CompoundInfo>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match name {
                "glycerin" => Ok(Some(CompoundInfo {
                    cid: 753,
                    molecular_formula: Some("C3H8O3".to_string()),
                    molecular_weight: Some("92.09".to_string()),
                    iupac_name: Some("propane-1,2,3-triol".to_string()),
                })),
                "boom" => anyhow::bail!("connection reset"),
                _ => Ok(None),
            }
        }
    }

    #[tokio::test]
    async fn test_enrich_skips_misses_and_failures() {
        let lookup = FakeLookup { calls: AtomicUsize::new(0) };
        let ingredients = vec![
            "glycerin".to_string(),
            "boom".to_string(),
            "aqua".to_string(),
            "glycerin".to_string(),
        ];

        let compounds = enrich(&lookup, &ingredients, 2, true).await;

        assert_eq!(compounds.len(), 1);
        assert_eq!(compounds["glycerin"].cid, 753);
        // duplicates are looked up once
        assert_eq!(lookup.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_enrich_zero_batch_size() {
        let lookup = FakeLookup { calls: AtomicUsize::new(0) };
        let compounds = enrich(&lookup, &["glycerin".to_string()], 0, true).await;
        assert_eq!(compounds.len(), 1);
    }
}
