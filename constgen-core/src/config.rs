//! Configuration loading from constgen.toml.

use anyhow::Result;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConstgenError, IoResultExt};

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE: &str = "constgen.toml";

/// Main configuration structure for constgen.toml.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ConstgenConfig {
    /// Identifier prefix to extract.
    pub prefix: Option<String>,
    /// Emit bitflag constants instead of enum variants.
    pub bitflags: Option<bool>,
    /// Header files or directories making up the corpus.
    pub inputs: Option<Vec<PathBuf>>,
    /// File extensions considered headers when walking directories.
    pub extensions: Option<Vec<String>>,
    /// Directory names skipped while walking.
    pub exclude: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    /// Output format: "text" or "json".
    pub format: Option<String>,
    /// Write to this file instead of stdout.
    pub path: Option<PathBuf>,
}

impl ConstgenConfig {
    /// Whether the configured output format is JSON.
    pub fn wants_json(&self) -> bool {
        self.output
            .as_ref()
            .and_then(|o| o.format.as_deref())
            .is_some_and(|f| f.eq_ignore_ascii_case("json"))
    }
}

/// Loads configuration from constgen.toml in `root` if it exists.
pub fn load_config(root: &Path) -> Result<Option<ConstgenConfig>> {
    let path = root.join(CONFIG_FILE);
    if !path.exists() {
        return Ok(None);
    }
    load_config_file(&path).map(Some)
}

/// Loads configuration from an explicit file.
pub fn load_config_file(path: &Path) -> Result<ConstgenConfig> {
    let content = fs::read_to_string(path).with_path(path)?;
    let cfg =
        toml::from_str(&content).map_err(|e| ConstgenError::config(path, e.to_string()))?;
    Ok(cfg)
}
