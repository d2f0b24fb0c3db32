//! Config model and persistence helpers.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::theme::Theme;

/// Top-level configuration stored in `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Backend connection settings.
    pub api: ApiCfg,
    /// Presentation settings.
    pub ui: UiCfg,
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiCfg {
    /// Base URL of the transcription backend.
    pub base_url: String,
    /// Per-request timeout for `/api/transcrever`, in seconds. The
    /// transcription pass on long recordings can take many minutes.
    pub transcribe_timeout_secs: u64,
}

/// Presentation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UiCfg {
    /// Directory where downloaded documents are written.
    pub download_dir: String,
    /// Persisted visual theme.
    pub theme: Theme,
}

impl Config {
    /// Load from disk or create defaults when missing.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            let s = fs::read_to_string(path)?;
            Ok(toml::from_str(&s)?)
        } else {
            let cfg = Self::default();
            cfg.save(path)?;
            Ok(cfg)
        }
    }

    /// Persist the config as pretty TOML.
    pub fn save(&self, path: &Path) -> Result<()> {
        let s = toml::to_string_pretty(self)?;
        fs::write(path, s)?;
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api: ApiCfg {
                base_url: "http://localhost:8501".into(),
                transcribe_timeout_secs: 900,
            },
            ui: UiCfg {
                download_dir: ".".into(),
                theme: Theme::default(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_round_trips_through_toml() {
        let cfg = Config::default();
        let s = toml::to_string_pretty(&cfg).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.api.base_url, cfg.api.base_url);
        assert_eq!(back.api.transcribe_timeout_secs, 900);
        assert_eq!(back.ui.theme, cfg.ui.theme);
    }
}
