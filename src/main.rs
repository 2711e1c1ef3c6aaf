//! `chemcheck` — extract ingredients from a label, score them for toxicity risk, and report.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and start logging.
//! 3. Resolve the input: image wins over text ([`acquire::resolve_input`]).
//! 4. Run the pipeline ([`pipeline::analyze`]): OCR if needed, normalize, classify, aggregate.
//! 5. Optionally enrich from PubChem (`--lookup`, [`registry`]).
//! 6. Render the requested report ([`report`]).
//! 7. Exit `0` (appears safe), `1` (harmful ingredients) or `2` (any failure, including
//!    config and report errors).

mod acquire;
mod cli;
mod config;
mod error;
mod ingredient;
mod models;
mod pipeline;
mod registry;
mod report;

use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use acquire::tesseract::TesseractEngine;
use cli::{Cli, ReportFormat};
use config::{load_config, LoggingConfig};
use models::Verdict;
use registry::pubchem::PubChemClient;

const EXIT_UNSAFE: i32 = 1;
const EXIT_FAILED: i32 = 2;

#[tokio::main]
async fn main() {
    let code = match run(Cli::parse()).await {
        Ok(Verdict::Safe) => 0,
        Ok(Verdict::Unsafe) => EXIT_UNSAFE,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            EXIT_FAILED
        }
    };
    std::process::exit(code);
}

/// Run one analysis and render it. Every error, config and render failures
/// included, exits with [`EXIT_FAILED`].
async fn run(cli: Cli) -> Result<Verdict> {
    let mut config = load_config(Path::new("."), cli.config.as_deref())?;
    init_logging(&config.logging);

    if cli.dedup {
        config.analysis.deduplicate = true;
    }
    if let Some(secs) = cli.ocr_timeout {
        config.ocr.timeout_secs = secs;
    }

    let input = acquire::resolve_input(&cli.input_sources())?;

    if !cli.quiet && matches!(input, acquire::RawInput::Image(_)) {
        eprintln!("  {} running OCR with {}", "→".cyan(), config.ocr.command);
    }

    let engine = TesseractEngine::from_config(&config.ocr);
    let mut analysis = pipeline::analyze(input, &engine, &config).await?;

    if cli.lookup {
        let client = PubChemClient::from_config(&config.pubchem)?;
        analysis.compounds = registry::enrich(
            &client,
            &analysis.ingredients,
            config.pubchem.batch_size,
            cli.quiet,
        )
        .await;
    }

    // --pdf implies PDF format
    let report_format = match &cli.pdf {
        Some(_) => ReportFormat::Pdf,
        None => cli.report,
    };
    let pdf_path = cli
        .pdf
        .clone()
        .unwrap_or_else(|| PathBuf::from("chemcheck-report.pdf"));

    match report_format {
        ReportFormat::Terminal => {
            report::terminal::render(&analysis, cli.verbose, cli.quiet)?;
        }
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
        }
        ReportFormat::Text => {
            if cli.verbose {
                println!("Ingredients: {}\n", analysis.ingredients.join(", "));
            }
            println!("{}", analysis.report);
        }
        ReportFormat::Pdf => {
            report::pdf::render(&analysis, &pdf_path)?;
        }
    }

    Ok(analysis.report.verdict)
}

fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
