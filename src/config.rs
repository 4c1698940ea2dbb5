use serde::Deserialize;
use std::fs;
use std::io;
use std::path::Path;

use crate::error::{Error, Result};

static DEFAULT_CONFIG: &str = include_str!("default_config.toml");

/// Settings for the presentation layer and the CLI. The parser has none.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub page: PageConfig,
    pub text: TextConfig,
    pub table: TableConfig,
    pub blank: BlankConfig,
    pub replay: ReplayConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct PageConfig {
    pub numbers: bool,
    pub paper: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            numbers: false,
            paper: "a4".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TextConfig {
    pub size: String,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            size: "10.5pt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct TableConfig {
    pub header_bold: bool,
    pub stroke: String,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            header_bold: true,
            stroke: "0.5pt".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct BlankConfig {
    /// Vertical space emitted for a blank line.
    pub spacing: String,
}

impl Default for BlankConfig {
    fn default() -> Self {
        Self {
            spacing: "0.6em".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct ReplayConfig {
    /// Bytes fed per step when replaying a message as a stream.
    pub chunk_size: usize,
}

impl Default for ReplayConfig {
    fn default() -> Self {
        Self { chunk_size: 12 }
    }
}

impl Config {
    /// The bundled `default_config.toml`, checked by the build script.
    pub fn compiled_default() -> Self {
        toml::from_str(DEFAULT_CONFIG).unwrap_or_else(|e| {
            tracing::error!("bundled default config is invalid: {e}");
            Self::default()
        })
    }

    /// Load config from a TOML file. Missing keys take their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Ok(toml::from_str(&content)?)
    }

    /// Load config from a TOML file, falling back to the compiled default when
    /// the file is absent or invalid.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => {
                tracing::debug!("loaded config from {}", path.display());
                config
            }
            Err(Error::Io { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                tracing::debug!("no config at {}, using defaults", path.display());
                Self::compiled_default()
            }
            Err(e) => {
                tracing::warn!("ignoring config {}: {e}", path.display());
                Self::compiled_default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compiled_default_matches_struct_defaults() {
        assert_eq!(Config::compiled_default(), Config::default());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config: Config = toml::from_str("[page]\nnumbers = true\n").unwrap();
        assert!(config.page.numbers);
        assert_eq!(config.page.paper, "a4");
        assert!(config.table.header_bold);
    }

    #[test]
    fn missing_file_falls_back() {
        let config = Config::load_or_default(Path::new("/nonexistent/streamdoc.toml"));
        assert_eq!(config, Config::compiled_default());
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[page\nnumbers = 1").unwrap();

        assert!(matches!(Config::load(&path), Err(Error::Config(_))));
        assert_eq!(Config::load_or_default(&path), Config::compiled_default());
    }
}
