//! Configuration loading and base path resolution.
//!
//! The base is resolved in priority order:
//! 1. command-line `--base`
//! 2. `CINEDIVE_BASE` environment variable
//! 3. `base` key of the TOML config file
//! 4. compiled default (`./static`)

use std::path::{Path, PathBuf};
use std::sync::Arc;

use log::{info, warn};
use serde::Deserialize;

use crate::error::{LoadError, Result};
use crate::source::{DirSource, HttpSource, ResourceSource};

pub const BASE_ENV_VAR: &str = "CINEDIVE_BASE";
pub const DEFAULT_CONFIG_FILE: &str = "cinedive.toml";
pub const DEFAULT_BASE: &str = "static";
pub const DEFAULT_DATA_DIR: &str = "data";

/// Resolved configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// HTTP(S) URL of the static site, or a directory with the same layout.
    pub base: String,
    /// Folder under `base` holding the dataset files.
    pub data_dir: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base: DEFAULT_BASE.to_string(),
            data_dir: DEFAULT_DATA_DIR.to_string(),
        }
    }
}

/// On-disk TOML layout. Every key is optional.
#[derive(Debug, Default, Deserialize)]
pub struct TomlConfig {
    pub base: Option<String>,
    pub data_dir: Option<String>,
}

impl TomlConfig {
    pub fn parse(text: &str) -> Result<Self> {
        toml::from_str(text).map_err(|e| LoadError::Config(e.to_string()))
    }

    /// Read a config file. A missing file yields the empty config.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                warn!("Config file {} not found, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Read a config file the user named explicitly; it must exist.
    pub fn load_required(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::parse(&text),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(LoadError::Config(format!(
                "config file {} not found",
                path.display()
            ))),
            Err(e) => Err(e.into()),
        }
    }
}

impl Config {
    /// Merge the override layers. `env_base` is the value of
    /// [`BASE_ENV_VAR`], passed in so callers control the environment.
    pub fn resolve(cli_base: Option<&str>, env_base: Option<&str>, file: TomlConfig) -> Self {
        let defaults = Self::default();
        let base = cli_base
            .map(str::to_string)
            .or_else(|| env_base.filter(|s| !s.is_empty()).map(str::to_string))
            .or(file.base)
            .unwrap_or(defaults.base);
        let data_dir = file.data_dir.unwrap_or(defaults.data_dir);
        Self { base, data_dir }
    }

    /// Resolve from the process: CLI flags, environment, then the config
    /// file. An explicit `config_path` must exist; the implicit
    /// `./cinedive.toml` may be missing.
    pub fn from_env(cli_base: Option<&str>, config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => TomlConfig::load_required(path)?,
            None => TomlConfig::load(&PathBuf::from(DEFAULT_CONFIG_FILE))?,
        };
        let env_base = std::env::var(BASE_ENV_VAR).ok();
        let config = Self::resolve(cli_base, env_base.as_deref(), file);
        info!("Data base: {} (data dir: {})", config.base, config.data_dir);
        Ok(config)
    }

    pub fn is_remote(&self) -> bool {
        self.base.starts_with("http://") || self.base.starts_with("https://")
    }

    /// Locator for a dataset file, relative to the base.
    pub fn locator(&self, file: &str) -> String {
        let dir = self.data_dir.trim_matches('/');
        if dir.is_empty() {
            file.to_string()
        } else {
            format!("{dir}/{file}")
        }
    }

    /// Source matching the base: HTTP for URLs, the filesystem otherwise.
    pub fn source(&self) -> Arc<dyn ResourceSource> {
        if self.is_remote() {
            Arc::new(HttpSource::new(&self.base))
        } else {
            Arc::new(DirSource::new(&self.base))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = Config::resolve(None, None, TomlConfig::default());
        assert_eq!(config, Config::default());
        assert_eq!(config.locator("title_oscar.tsv"), "data/title_oscar.tsv");
        assert!(!config.is_remote());
    }

    #[test]
    fn priority_cli_over_env_over_file() {
        let file = || TomlConfig {
            base: Some("/srv/from-file".into()),
            data_dir: Some("datasets".into()),
        };

        let c = Config::resolve(Some("https://cli.example"), Some("/from-env"), file());
        assert_eq!(c.base, "https://cli.example");
        assert!(c.is_remote());

        let c = Config::resolve(None, Some("/from-env"), file());
        assert_eq!(c.base, "/from-env");

        let c = Config::resolve(None, Some(""), file());
        assert_eq!(c.base, "/srv/from-file");
        assert_eq!(c.locator("graphic_person.json"), "datasets/graphic_person.json");
    }

    #[test]
    fn empty_data_dir_means_files_at_base() {
        let c = Config {
            base: "x".into(),
            data_dir: "/".into(),
        };
        assert_eq!(c.locator("a.csv"), "a.csv");
    }

    #[test]
    fn toml_parsing() {
        let t = TomlConfig::parse("base = \"https://cinedive.example/app\"\n").unwrap();
        assert_eq!(t.base.as_deref(), Some("https://cinedive.example/app"));
        assert!(t.data_dir.is_none());

        let err = TomlConfig::parse("base = ").unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
    }

    #[test]
    fn missing_config_file_is_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let t = TomlConfig::load(&dir.path().join("nope.toml")).unwrap();
        assert!(t.base.is_none());
    }

    #[test]
    fn explicit_config_file_must_exist() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");

        let err = TomlConfig::load_required(&missing).unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
        assert!(err.to_string().contains("nope.toml"));

        let err = Config::from_env(None, Some(missing.as_path())).unwrap_err();
        assert!(matches!(err, LoadError::Config(_)));
    }

    #[test]
    fn explicit_config_file_is_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cinedive.toml");
        std::fs::write(&path, "data_dir = \"datasets\"\n").unwrap();

        let t = TomlConfig::load_required(&path).unwrap();
        assert_eq!(t.data_dir.as_deref(), Some("datasets"));
    }
}
