//! Configuration for the variant mapper.
//!
//! [`MapperConfig`] can be built in code or loaded from a
//! `.ferro-varmap.toml` file with a `[mapping]` section.
//!
//! # Example Configuration
//!
//! ```toml
//! [mapping]
//! replace_reference = true
//! validate_reference = "strict"
//! alt_aln_method = "splign"
//! primary_assembly = "GRCh37"
//! ```
//!
//! # Config File Locations
//!
//! Configuration is searched in this order (first found wins):
//! 1. `.ferro-varmap.toml` in current directory
//! 2. `~/.ferro-varmap.toml`

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the configuration file.
pub const CONFIG_FILE_NAME: &str = ".ferro-varmap.toml";

/// How caller-stated reference literals are treated before mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceMode {
    /// Stated references are not checked
    #[default]
    Ignore,
    /// A stated reference that disagrees with the sequence fails the mapping
    Strict,
}

/// Variant mapper settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MapperConfig {
    /// Re-derive the reference literal of mapped edits from the target accession.
    ///
    /// When off, the source literal is carried over (reverse complemented
    /// across a strand flip).
    pub replace_reference: bool,
    /// Check stated references on the input.
    pub validate_reference: ReferenceMode,
    /// Alignment method used by the convenience layer.
    pub alt_aln_method: String,
    /// Assembly used by the convenience layer to pick a genomic accession.
    pub primary_assembly: String,
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            replace_reference: true,
            validate_reference: ReferenceMode::Ignore,
            alt_aln_method: "splign".to_string(),
            primary_assembly: "GRCh37".to_string(),
        }
    }
}

impl MapperConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_replace_reference(mut self, replace: bool) -> Self {
        self.replace_reference = replace;
        self
    }

    pub fn with_validate_reference(mut self, mode: ReferenceMode) -> Self {
        self.validate_reference = mode;
        self
    }

    pub fn with_alt_aln_method(mut self, method: impl Into<String>) -> Self {
        self.alt_aln_method = method.into();
        self
    }

    pub fn with_primary_assembly(mut self, assembly: impl Into<String>) -> Self {
        self.primary_assembly = assembly.into();
        self
    }

    /// Load configuration from the default locations.
    ///
    /// Returns `None` when no file is found. A file that fails to parse is
    /// logged and skipped.
    pub fn load() -> Option<Self> {
        let mut candidates = vec![PathBuf::from(CONFIG_FILE_NAME)];
        if let Some(home) = dirs_home() {
            candidates.push(home.join(CONFIG_FILE_NAME));
        }

        for path in candidates {
            if !path.exists() {
                continue;
            }
            match Self::load_from_path(&path) {
                Ok(config) => return Some(config),
                Err(e) => log::warn!("Ignoring {}: {}", path.display(), e),
            }
        }
        None
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML content.
    ///
    /// Only the `[mapping]` section is read; unknown keys are ignored.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config = MapperConfig::default();
        let mut in_mapping = false;

        for (lineno, line) in content.lines().enumerate() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }

            if line.starts_with('[') && line.ends_with(']') {
                in_mapping = &line[1..line.len() - 1] == "mapping";
                continue;
            }
            if !in_mapping {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(ConfigError::Parse(format!(
                    "line {}: expected `key = value`",
                    lineno + 1
                )));
            };
            let key = key.trim();
            let value = unquote(value.trim());

            match key {
                "replace_reference" => {
                    config.replace_reference = match value {
                        "true" => true,
                        "false" => false,
                        other => {
                            return Err(ConfigError::Parse(format!(
                                "line {}: replace_reference must be true or false, got '{}'",
                                lineno + 1,
                                other
                            )))
                        }
                    }
                }
                "validate_reference" => {
                    config.validate_reference = match value.to_lowercase().as_str() {
                        "ignore" => ReferenceMode::Ignore,
                        "strict" => ReferenceMode::Strict,
                        other => {
                            return Err(ConfigError::Parse(format!(
                                "line {}: unknown validate_reference mode '{}'",
                                lineno + 1,
                                other
                            )))
                        }
                    }
                }
                "alt_aln_method" => config.alt_aln_method = value.to_string(),
                "primary_assembly" => config.primary_assembly = value.to_string(),
                _ => {}
            }
        }

        Ok(config)
    }
}

/// Configuration loading error.
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error reading config file.
    Io(String),
    /// Parse error in config file.
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "Config IO error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "Config parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Drop a trailing `# comment` that is not inside quotes.
fn strip_comment(line: &str) -> &str {
    let mut quote = None;
    for (i, c) in line.char_indices() {
        match (c, quote) {
            ('"' | '\'', None) => quote = Some(c),
            (c, Some(q)) if c == q => quote = None,
            ('#', None) => return &line[..i],
            _ => {}
        }
    }
    line
}

fn unquote(value: &str) -> &str {
    value.trim_matches('"').trim_matches('\'')
}

/// Get the user's home directory.
fn dirs_home() -> Option<PathBuf> {
    std::env::var("HOME").ok().map(PathBuf::from)
}
