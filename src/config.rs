use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::ingredient::keywords::KeywordTable;

/// Root configuration structure, deserialized from `.chemcheck/config.toml`.
///
/// Every section is optional; missing sections and fields take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Severity keyword lists used by the classifier.
    pub keywords: KeywordTable,
    pub analysis: AnalysisConfig,
    pub ocr: OcrConfig,
    pub pubchem: PubChemConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Drop repeated ingredient names before classification.
    pub deduplicate: bool,
}

/// Image preprocessing and OCR engine settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OcrConfig {
    /// Executable invoked for recognition.
    pub command: String,
    /// Tesseract language code(s), e.g. `eng` or `eng+fra`.
    pub language: String,
    pub timeout_secs: u64,
    /// Side length of the adaptive threshold neighbourhood. Must be odd.
    pub block_size: u32,
    /// Constant subtracted from the local mean before thresholding.
    pub offset: f32,
}

impl Default for OcrConfig {
    fn default() -> Self {
        OcrConfig {
            command: "tesseract".to_string(),
            language: "eng".to_string(),
            timeout_secs: 30,
            block_size: 31,
            offset: 10.0,
        }
    }
}

impl OcrConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PubChemConfig {
    pub base_url: String,
    pub timeout_secs: u64,
    /// Number of lookups in flight at once.
    pub batch_size: usize,
}

impl Default for PubChemConfig {
    fn default() -> Self {
        PubChemConfig {
            base_url: "https://pubchem.ncbi.nlm.nih.gov/rest/pug".to_string(),
            timeout_secs: 10,
            batch_size: 8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default `tracing` filter when `RUST_LOG` is unset.
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: "warn".to_string(),
        }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<base_dir>/.chemcheck/config.toml`
/// 3. `~/.config/chemcheck/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(base_dir: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        return read_config(path);
    }

    let local_config = base_dir.join(".chemcheck").join("config.toml");
    if local_config.exists() {
        return read_config(&local_config);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home.join(".config").join("chemcheck").join("config.toml");
        if home_config.exists() {
            return read_config(&home_config);
        }
    }

    Ok(Config::default())
}

fn read_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Invalid config {}", path.display()))
}

fn parse_config(content: &str) -> Result<Config> {
    let mut config: Config = toml::from_str(content)?;
    config.keywords = config.keywords.sanitized();
    if config.ocr.block_size < 3 || config.ocr.block_size % 2 == 0 {
        anyhow::bail!(
            "ocr.block_size must be an odd number >= 3 (got {})",
            config.ocr.block_size
        );
    }
    if config.ocr.timeout_secs == 0 {
        anyhow::bail!("ocr.timeout_secs must be at least 1");
    }
    Ok(config)
}
