use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use streams_evals::Label;

/// Configuration as stored in TOML files (with optional fields for merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawStreamsConfig {
    #[serde(default)]
    pub evaluation: RawEvaluationConfig,

    #[serde(default)]
    pub reader: RawReaderConfig,
}

/// Evaluation config as stored in TOML (optional fields for proper merging)
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawEvaluationConfig {
    /// Events between progress log lines
    pub log_interval: Option<u64>,

    /// Labels registered as known before replay starts
    pub known_labels: Option<Vec<Label>>,

    /// Output format for reports
    pub format: Option<OutputFormat>,
}

/// Reader config as stored in TOML
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RawReaderConfig {
    /// Field separator for sample files
    pub separator: Option<String>,
}

/// Final configuration with defaults applied
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StreamsConfig {
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    #[serde(default)]
    pub reader: ReaderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Events between progress log lines (0 disables)
    pub log_interval: u64,

    /// Labels registered as known before replay starts
    pub known_labels: Vec<Label>,

    /// Output format for reports
    pub format: OutputFormat,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            log_interval: DEFAULT_LOG_INTERVAL,
            known_labels: Vec::new(),
            format: OutputFormat::Table,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReaderConfig {
    /// Field separator for sample files
    pub separator: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

/// How reports are printed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Rendered matrix plus a per-class table
    Table,
    /// JSON evaluation report
    Json,
}

/// Default number of events between progress log lines
pub const DEFAULT_LOG_INTERVAL: u64 = 1000;

/// Default field separator for sample files
pub const DEFAULT_SEPARATOR: &str = ",";
