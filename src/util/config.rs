//! `pbxforge.toml` configuration parsing.
//!
//! The configuration file is optional; every value can also be supplied on
//! the command line, and CLI flags win over file values.

use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Default configuration file name, looked up under the project root.
pub const CONFIG_FILE: &str = "pbxforge.toml";

/// Parsed tool configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Settings for the generated application target.
    #[serde(default)]
    pub product: ProductConfig,

    /// Where to find source files.
    #[serde(default)]
    pub sources: SourcesConfig,
}

/// `[product]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductConfig {
    /// Product name; also names the target and the source directory.
    #[serde(default)]
    pub name: Option<String>,

    /// Reverse-DNS bundle identifier.
    #[serde(default)]
    pub bundle_identifier: Option<String>,

    /// Minimum iOS version.
    #[serde(default)]
    pub deployment_target: Option<String>,
}

/// `[sources]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SourcesConfig {
    /// Glob patterns for source files, relative to the project root.
    #[serde(default)]
    pub include: Vec<String>,
}

impl Config {
    /// Load a configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config: {}", path.display()))?;
        Self::parse(&content)
    }

    /// Parse configuration content.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).with_context(|| "failed to parse pbxforge.toml")
    }
}
