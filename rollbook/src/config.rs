//! Configuration file handling
//!
//! Settings come from a TOML file and can be overridden on the command line.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use rollbook_engine::storage::default_temp_path;

/// Config file picked up from the working directory when no path is given
pub const DEFAULT_CONFIG_FILE: &str = "rollbook.toml";

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Record store file
    pub data_file: PathBuf,
    /// Rebuild file used by delete; defaults to the data file plus `.tmp`
    pub temp_file: Option<PathBuf>,
    /// CSV export destination
    pub export_file: PathBuf,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Wait for Enter after each action
    pub pause: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_file: PathBuf::from("students.dat"),
            temp_file: None,
            export_file: PathBuf::from("students_export.csv"),
            log_level: "warn".to_string(),
            pause: true,
        }
    }
}

impl Config {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => {
                let default = Path::new(DEFAULT_CONFIG_FILE);
                if default.is_file() {
                    Self::from_file(default)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::parse(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn parse(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn temp_path(&self) -> PathBuf {
        self.temp_file
            .clone()
            .unwrap_or_else(|| default_temp_path(&self.data_file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_uses_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_config() {
        let config = Config::parse(
            r#"
            data_file = "/var/lib/rollbook/students.dat"
            pause = false
            "#,
        )
        .unwrap();

        assert_eq!(config.data_file, PathBuf::from("/var/lib/rollbook/students.dat"));
        assert!(!config.pause);
        assert_eq!(config.export_file, PathBuf::from("students_export.csv"));
        assert_eq!(
            config.temp_path(),
            PathBuf::from("/var/lib/rollbook/students.dat.tmp")
        );
    }

    #[test]
    fn test_explicit_temp_file() {
        let config = Config::parse(r#"temp_file = "scratch.dat""#).unwrap();
        assert_eq!(config.temp_path(), PathBuf::from("scratch.dat"));
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(Config::parse("data_fiel = \"x.dat\"").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("rollbook.toml");
        fs::write(&path, "log_level = \"debug\"\n").unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.log_level, "debug");

        assert!(Config::load(Some(&dir.path().join("missing.toml"))).is_err());
    }
}
