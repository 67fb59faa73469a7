//! Configuration file structure (waymark.toml).

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::layout::RegionSpec;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Top-level configuration.
#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub observer: ObserverConfig,

    #[serde(default)]
    pub flags: FlagConfig,

    #[serde(default)]
    pub clipboard: ClipboardConfig,

    /// Page regions, for hosts without a live layout
    #[serde(default, rename = "region")]
    pub regions: Vec<RegionSpec>,

    /// Code samples that can be copied
    #[serde(default, rename = "snippet")]
    pub snippets: Vec<Snippet>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ObserverConfig {
    /// Look-ahead added to the scroll offset for the fixed header
    #[serde(default = "default_bias")]
    pub bias: f64,

    /// Section keys in priority order
    #[serde(default = "default_sections")]
    pub sections: Vec<String>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            bias: default_bias(),
            sections: default_sections(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct FlagConfig {
    /// How long copy confirmation stays visible
    #[serde(default = "default_expiry_ms")]
    pub expiry_ms: u64,
}

impl FlagConfig {
    pub fn expiry(&self) -> Duration {
        Duration::from_millis(self.expiry_ms)
    }
}

impl Default for FlagConfig {
    fn default() -> Self {
        Self {
            expiry_ms: default_expiry_ms(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct ClipboardConfig {
    /// Program and arguments that read clipboard text from stdin
    pub command: Option<Vec<String>>,
}

/// A code sample shown with a copy button.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Snippet {
    /// Block identifier
    pub id: String,

    /// Language shown in the block header
    #[serde(default = "default_language")]
    pub language: String,

    /// Text copied to the clipboard
    pub source: String,
}

fn default_bias() -> f64 {
    crate::observer::DEFAULT_BIAS
}
fn default_sections() -> Vec<String> {
    ["home", "features", "quickstart", "docs"]
        .into_iter()
        .map(String::from)
        .collect()
}
fn default_expiry_ms() -> u64 {
    crate::flag::DEFAULT_EXPIRY.as_millis() as u64
}
fn default_language() -> String {
    "typescript".to_string()
}

impl Config {
    /// Parse configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Load configuration from `path` if it exists.
    /// Returns an error if the file exists but is malformed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        let config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Look up a snippet by id.
    pub fn snippet(&self, id: &str) -> Option<&Snippet> {
        self.snippets.iter().find(|s| s.id == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn defaults_match_the_page() {
        let config = Config::default();

        assert_eq!(config.observer.bias, 100.0);
        assert_eq!(
            config.observer.sections,
            vec!["home", "features", "quickstart", "docs"]
        );
        assert_eq!(config.flags.expiry(), Duration::from_millis(2000));
        assert_eq!(config.clipboard.command, None);
    }

    #[test]
    fn parses_full_config() {
        let config = Config::from_toml_str(
            r#"
[observer]
bias = 64.0
sections = ["home", "features"]

[flags]
expiry_ms = 1500

[clipboard]
command = ["wl-copy"]

[[region]]
key = "home"
start = 0.0
height = 800.0

[[snippet]]
id = "install"
language = "bash"
source = "npm install diaflow"

[[snippet]]
id = "usage"
source = "const agent = new Agent();"
"#,
        )
        .unwrap();

        assert_eq!(config.observer.bias, 64.0);
        assert_eq!(config.observer.sections, vec!["home", "features"]);
        assert_eq!(config.flags.expiry_ms, 1500);
        assert_eq!(config.clipboard.command, Some(vec!["wl-copy".to_string()]));
        assert_eq!(
            config.regions,
            vec![RegionSpec {
                key: "home".to_string(),
                start: 0.0,
                height: 800.0,
            }]
        );
        assert_eq!(config.snippet("install").unwrap().language, "bash");
        assert_eq!(config.snippet("usage").unwrap().language, "typescript");
        assert!(config.snippet("missing").is_none());
    }

    #[test]
    fn missing_file_yields_defaults() {
        let temp = tempdir().unwrap();

        let config = Config::load(&temp.path().join("waymark.toml")).unwrap();

        assert_eq!(config, Config::default());
    }

    #[test]
    fn malformed_file_is_an_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("waymark.toml");
        fs::write(&path, "[observer\nbias = ").unwrap();

        let result = Config::load(&path);

        assert!(matches!(result, Err(ConfigError::Parse { .. })));
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("waymark.toml");
        fs::write(&path, "[flags]\nexpiry_ms = 250\n").unwrap();

        let config = Config::load(&path).unwrap();

        assert_eq!(config.flags.expiry_ms, 250);
        assert_eq!(config.observer, ObserverConfig::default());
    }
}
