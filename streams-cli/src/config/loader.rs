use super::types::{
    EvaluationConfig, RawEvaluationConfig, RawReaderConfig, RawStreamsConfig, ReaderConfig,
    StreamsConfig,
};
use anyhow::{Context, Result};
use directories::ProjectDirs;
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ConfigLoader;

impl ConfigLoader {
    /// Load merged configuration (user + project)
    pub fn load() -> Result<StreamsConfig> {
        Self::load_from(Self::user_config_path().as_deref(), &Self::project_config_path())
    }

    /// Load merged configuration from explicit paths; missing files are skipped
    pub fn load_from(user_path: Option<&Path>, project_path: &Path) -> Result<StreamsConfig> {
        let mut raw = RawStreamsConfig::default();

        // Layer 1: User config
        if let Some(user_path) = user_path
            && user_path.exists()
        {
            raw = Self::merge_raw(raw, Self::read_raw(user_path)?);
        }

        // Layer 2: Project config
        if project_path.exists() {
            raw = Self::merge_raw(raw, Self::read_raw(project_path)?);
        }

        Ok(Self::finalize(raw))
    }

    /// Get user config path (platform-specific)
    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "streams").map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Get project config path
    /// Can be overridden with STREAMS_PROJECT_CONFIG_DIR env var (useful for isolated tests)
    pub fn project_config_path() -> PathBuf {
        if let Ok(dir) = std::env::var("STREAMS_PROJECT_CONFIG_DIR") {
            PathBuf::from(dir).join("config.toml")
        } else {
            PathBuf::from(".streams/config.toml")
        }
    }

    fn read_raw(path: &Path) -> Result<RawStreamsConfig> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let raw: RawStreamsConfig = toml::from_str(&contents)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        debug!(path = %path.display(), "loaded config layer");
        Ok(raw)
    }

    /// Merge two raw configs (overlay values override base only if explicitly set)
    fn merge_raw(base: RawStreamsConfig, overlay: RawStreamsConfig) -> RawStreamsConfig {
        RawStreamsConfig {
            evaluation: RawEvaluationConfig {
                log_interval: overlay
                    .evaluation
                    .log_interval
                    .or(base.evaluation.log_interval),
                known_labels: overlay
                    .evaluation
                    .known_labels
                    .or(base.evaluation.known_labels),
                format: overlay.evaluation.format.or(base.evaluation.format),
            },
            reader: RawReaderConfig {
                separator: overlay.reader.separator.or(base.reader.separator),
            },
        }
    }

    /// Apply defaults to a merged raw config
    fn finalize(raw: RawStreamsConfig) -> StreamsConfig {
        let evaluation_defaults = EvaluationConfig::default();
        let reader_defaults = ReaderConfig::default();

        StreamsConfig {
            evaluation: EvaluationConfig {
                log_interval: raw
                    .evaluation
                    .log_interval
                    .unwrap_or(evaluation_defaults.log_interval),
                known_labels: raw
                    .evaluation
                    .known_labels
                    .unwrap_or(evaluation_defaults.known_labels),
                format: raw.evaluation.format.unwrap_or(evaluation_defaults.format),
            },
            reader: ReaderConfig {
                separator: raw.reader.separator.unwrap_or(reader_defaults.separator),
            },
        }
    }
}
