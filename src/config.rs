//! Configuration System
//!
//! Loads optional settings from a TOML file. Every field has a default, so a
//! missing file or a partial file is fine.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::data::model::LocationKind;

/// Main configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub share: ShareConfig,
}

/// Initial selections and income
#[derive(Debug, Clone, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_states")]
    pub states: Vec<String>,

    #[serde(default = "default_cities")]
    pub cities: Vec<String>,

    #[serde(default = "default_income")]
    pub income: f64,
}

fn default_states() -> Vec<String> {
    vec!["CA".to_string(), "TX".to_string()]
}

fn default_cities() -> Vec<String> {
    vec!["New York, NY".to_string(), "Los Angeles, CA".to_string()]
}

fn default_income() -> f64 {
    100_000.0
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            states: default_states(),
            cities: default_cities(),
            income: default_income(),
        }
    }
}

impl DefaultsConfig {
    /// Default selection for a location kind.
    pub fn selection(&self, kind: LocationKind) -> &[String] {
        match kind {
            LocationKind::State => &self.states,
            LocationKind::City => &self.cities,
        }
    }
}

/// Dataset source
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DataConfig {
    /// Dataset file to load instead of the bundled one (.json or .csv).
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// Share link settings
#[derive(Debug, Clone, Deserialize)]
pub struct ShareConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

fn default_base_url() -> String {
    "http://localhost:5173/".to_string()
}

impl Default for ShareConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or from the default location if it exists.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(p) => p.to_path_buf(),
            None => match Self::default_path() {
                Some(p) if p.exists() => p,
                _ => return Ok(Self::default()),
            },
        };
        Self::from_file(&path)
    }

    /// Parse a TOML config file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// `<config_dir>/coli-comparator/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("coli-comparator").join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.defaults.selection(LocationKind::State), ["CA", "TX"]);
        assert_eq!(
            config.defaults.selection(LocationKind::City),
            ["New York, NY", "Los Angeles, CA"]
        );
        assert_eq!(config.defaults.income, 100_000.0);
        assert!(config.data.path.is_none());
        assert_eq!(config.share.base_url, "http://localhost:5173/");
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[defaults]\nstates = [\"NY\", \"WA\", \"TX\"]\n\n[share]\nbase_url = \"https://coli.example.org/\""
        )
        .unwrap();

        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.defaults.states, ["NY", "WA", "TX"]);
        assert_eq!(config.defaults.cities, ["New York, NY", "Los Angeles, CA"]);
        assert_eq!(config.defaults.income, 100_000.0);
        assert_eq!(config.share.base_url, "https://coli.example.org/");
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[defaults\nincome = 5").unwrap();
        assert!(Config::load(Some(file.path())).is_err());

        let missing = Path::new("/nonexistent/coli-comparator.toml");
        assert!(Config::load(Some(missing)).is_err());
    }
}
