//! Application configuration file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sarms_core::Language;
use sarms_monitor::MonitorConfig;
use sarms_work::FlowConfig;
use serde::{Deserialize, Serialize};

/// Settings read from `--config`, overridable from the command line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Directory holding the session snapshot and drafts
    pub data_dir: PathBuf,

    /// Display language
    pub language: Language,

    /// Worker flow tunables
    pub flow: FlowConfig,

    /// Monitoring tunables
    pub monitor: MonitorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".sarms"),
            language: Language::En,
            flow: FlowConfig::default(),
            monitor: MonitorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Read a JSON config file, or the defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Path of the shared session snapshot.
    pub fn sessions_path(&self) -> PathBuf {
        self.data_dir.join("sessions.json")
    }

    /// Directory of worker drafts.
    pub fn drafts_dir(&self) -> PathBuf {
        self.data_dir.join("drafts")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let config = AppConfig::load(None).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.sessions_path(), PathBuf::from(".sarms/sessions.json"));
    }

    #[test]
    fn test_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sarms.json");
        std::fs::write(
            &path,
            r#"{"language": "ar", "flow": {"expected_minutes": 90}, "monitor": {"refresh_interval_secs": 5}}"#,
        )
        .unwrap();

        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.language, Language::Ar);
        assert_eq!(config.flow.expected_minutes, 90);
        assert_eq!(config.flow.line_max, 20);
        assert_eq!(config.monitor.refresh_interval_secs, 5);
        assert_eq!(config.data_dir, PathBuf::from(".sarms"));
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sarms.json");
        std::fs::write(&path, "{").unwrap();
        assert!(AppConfig::load(Some(&path)).is_err());
    }
}
