use std::path::PathBuf;

use clap::Parser;

use crate::acquire::InputSources;

#[derive(Parser, Debug)]
#[command(
    name = "chemcheck",
    about = "Scan product ingredient labels and flag potentially harmful substances",
    version
)]
pub struct Cli {
    /// Comma-separated ingredient list
    #[arg(value_name = "INGREDIENTS")]
    pub text: Option<String>,

    /// Product label image (JPEG/PNG); takes precedence over text input
    #[arg(long, value_name = "FILE")]
    pub image: Option<PathBuf>,

    /// Read the ingredient list from a file ("-" for stdin)
    #[arg(long, value_name = "FILE")]
    pub text_file: Option<PathBuf>,

    /// Config file [default: ./.chemcheck/config.toml, fallback ~/.config/chemcheck/config.toml]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Report format
    #[arg(long, default_value = "terminal", value_name = "FORMAT")]
    pub report: ReportFormat,

    /// PDF output path; use without value to default to chemcheck-report.pdf
    #[arg(long, value_name = "FILE", num_args = 0..=1, default_missing_value = "chemcheck-report.pdf")]
    pub pdf: Option<PathBuf>,

    /// Drop repeated ingredient names before classification
    #[arg(long)]
    pub dedup: bool,

    /// Look up each ingredient on PubChem and include compound details
    #[arg(long)]
    pub lookup: bool,

    /// OCR timeout in seconds (overrides config)
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub ocr_timeout: Option<u64>,

    /// Also show the normalized ingredient list
    #[arg(short, long)]
    pub verbose: bool,

    /// Only print summary line
    #[arg(short, long)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum ReportFormat {
    Terminal,
    Json,
    Text,
    Pdf,
}

impl Cli {
    pub fn input_sources(&self) -> InputSources {
        InputSources {
            image: self.image.clone(),
            text: self.text.clone(),
            text_file: self.text_file.clone(),
        }
    }
}
