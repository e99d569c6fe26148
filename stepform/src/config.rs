// Application configuration
//
// Layering (later wins):
// 1. Built-in defaults
// 2. Optional TOML file: `$STEPFORM_CONFIG`, else `<config_dir>/stepform/stepform.toml`
// 3. Environment variables prefixed `STEPFORM_` (e.g. `STEPFORM_LOG_LEVEL=info`)

use crate::utils::path_resolver;
use anyhow::{Context, Result};
use config::{Config, Environment, File};
use log::LevelFilter;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_ENV_VAR: &str = "STEPFORM_CONFIG";
const ENV_PREFIX: &str = "STEPFORM";
const DEFAULT_LOG_LEVEL: &str = "debug";

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct AppConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Overrides the log folder.
    #[serde(default)]
    pub log_dir: Option<PathBuf>,
    /// Overrides the theme preference file location.
    #[serde(default)]
    pub preferences_path: Option<PathBuf>,
    /// Forces the "system prefers dark" signal used when no preference is stored.
    #[serde(default)]
    pub system_dark_mode: Option<bool>,
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_dir: None,
            preferences_path: None,
            system_dark_mode: None,
        }
    }
}

impl AppConfig {
    /// Load using the default file location (or `$STEPFORM_CONFIG`).
    pub fn load() -> Result<Self> {
        let file = match std::env::var_os(CONFIG_ENV_VAR) {
            Some(p) if !p.is_empty() => PathBuf::from(p),
            _ => path_resolver::resolve_config_folder().join("stepform.toml"),
        };
        Self::load_from(Some(&file))
    }

    /// Load from an explicit (optional, possibly missing) file plus the environment.
    pub fn load_from(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder()
            .set_default("log_level", DEFAULT_LOG_LEVEL)
            .context("Failed to set configuration defaults")?;

        if let Some(path) = file {
            builder = builder.add_source(File::from(path.to_path_buf()).required(false));
        }

        let cfg = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to load configuration")?;

        cfg.try_deserialize::<AppConfig>()
            .context("Configuration has invalid values")
    }

    pub fn log_level_filter(&self) -> LevelFilter {
        self.log_level
            .trim()
            .parse::<LevelFilter>()
            .unwrap_or(LevelFilter::Debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_yields_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let cfg = AppConfig::load_from(Some(&tmp.path().join("absent.toml"))).unwrap();
        assert_eq!(cfg.log_level, "debug");
        assert_eq!(cfg.log_dir, None);
        assert_eq!(cfg.system_dark_mode, None);
    }

    #[test]
    fn toml_file_overrides_defaults() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("stepform.toml");
        let mut f = std::fs::File::create(&path).unwrap();
        writeln!(f, "log_level = \"warn\"").unwrap();
        writeln!(f, "system_dark_mode = true").unwrap();
        writeln!(f, "preferences_path = \"/tmp/prefs.json\"").unwrap();
        drop(f);

        let cfg = AppConfig::load_from(Some(&path)).unwrap();
        assert_eq!(cfg.log_level_filter(), LevelFilter::Warn);
        assert_eq!(cfg.system_dark_mode, Some(true));
        assert_eq!(cfg.preferences_path, Some(PathBuf::from("/tmp/prefs.json")));
    }

    #[test]
    fn unknown_log_level_falls_back_to_debug() {
        let cfg = AppConfig {
            log_level: "chatty".to_string(),
            ..AppConfig::default()
        };
        assert_eq!(cfg.log_level_filter(), LevelFilter::Debug);
    }
}
