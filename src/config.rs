//! mdlite configuration
//!
//! This module defines configuration structures, loading logic, and provenance tracking for mdlite.
//! Configuration is read from TOML files discovered upward from the working directory.

use crate::symbols::SymbolTable;
use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Config file names, in order of precedence
pub const CONFIG_FILES: &[&str] = &[".mdlite.toml", "mdlite.toml", ".config/mdlite.toml"];

const KNOWN_SECTIONS: &[&str] = &["global", "symbols"];

/// Global settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "kebab-case")]
pub struct GlobalConfig {
    /// Glob patterns skipped when walking directories
    pub exclude: Vec<String>,
    /// Respect .gitignore files when walking directories
    pub respect_gitignore: bool,
    /// Extension of rendered files
    pub extension: String,
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            exclude: Vec::new(),
            respect_gitignore: true,
            extension: "html".to_string(),
        }
    }
}

/// Represents the complete configuration loaded from mdlite.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub global: GlobalConfig,
    /// Extra character substitutions, on top of the built-in newline -> `<br>`
    pub symbols: BTreeMap<String, String>,
}

impl Config {
    /// Parse a configuration document.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let table: toml::Table = content.parse().map_err(|e: toml::de::Error| ConfigError::ParseError(e.to_string()))?;
        for key in table.keys() {
            if !KNOWN_SECTIONS.contains(&key.as_str()) {
                log::warn!("Unknown configuration section: [{key}]");
            }
        }

        let config: Config = toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        // Reject bad symbol keys at load time rather than at first render
        config.symbol_table()?;
        Ok(config)
    }

    /// The default symbol table extended with the `[symbols]` entries.
    pub fn symbol_table(&self) -> Result<SymbolTable, ConfigError> {
        let mut table = SymbolTable::default();
        for (key, tag) in &self.symbols {
            let mut chars = key.chars();
            let (Some(ch), None) = (chars.next(), chars.next()) else {
                return Err(ConfigError::InvalidSymbol { key: key.clone() });
            };
            table = table.with_entry(ch, tag.as_str());
        }
        Ok(table)
    }

    /// Matcher for `global.exclude`. Invalid patterns are logged and skipped.
    pub fn exclude_matcher(&self) -> GlobSet {
        let mut builder = GlobSetBuilder::new();
        for pattern in &self.global.exclude {
            match Glob::new(pattern) {
                Ok(glob) => {
                    builder.add(glob);
                }
                Err(_) => log::warn!("Invalid glob pattern in exclude: {pattern}"),
            }
        }

        builder.build().unwrap_or_else(|e| {
            log::error!("Failed to build globset for exclude: {e}");
            GlobSet::empty()
        })
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::ParseError(e.to_string()))
    }
}

/// Where the active configuration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    /// Built-in default configuration
    Default,
    /// Discovered .mdlite.toml or mdlite.toml
    ProjectConfig,
    /// File passed with --config
    Cli,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigSource::Default => write!(f, "default"),
            ConfigSource::ProjectConfig => write!(f, "project config"),
            ConfigSource::Cli => write!(f, "--config"),
        }
    }
}

/// A configuration together with its provenance
#[derive(Debug, Clone)]
pub struct SourcedConfig {
    pub config: Config,
    pub source: ConfigSource,
    /// The file the configuration was read from, if any
    pub loaded_file: Option<PathBuf>,
    /// Directory containing .git above the config file, or the config directory
    pub project_root: Option<PathBuf>,
}

impl Default for SourcedConfig {
    fn default() -> Self {
        Self {
            config: Config::default(),
            source: ConfigSource::Default,
            loaded_file: None,
            project_root: None,
        }
    }
}

impl SourcedConfig {
    /// Load configuration from `config_path`, or discover it from the current directory.
    pub fn load_with_discovery(config_path: Option<&str>, skip_auto_discovery: bool) -> Result<Self, ConfigError> {
        let start_dir = if config_path.is_none() && !skip_auto_discovery {
            match std::env::current_dir() {
                Ok(dir) => Some(dir),
                Err(e) => {
                    log::debug!("[mdlite-config] Failed to get current directory: {e}");
                    None
                }
            }
        } else {
            None
        };
        Self::load_with_discovery_impl(config_path, skip_auto_discovery, start_dir.as_deref())
    }

    /// Internal implementation that accepts the discovery directory for testing
    pub fn load_with_discovery_impl(
        config_path: Option<&str>,
        skip_auto_discovery: bool,
        start_dir: Option<&Path>,
    ) -> Result<Self, ConfigError> {
        if let Some(config_path) = config_path {
            log::debug!("[mdlite-config] Explicit config_path provided: {config_path:?}");
            let path = Path::new(config_path);
            let config = load_config_file(path)?;
            let config_dir = path.parent().unwrap_or(Path::new("."));
            return Ok(Self {
                config,
                source: ConfigSource::Cli,
                loaded_file: Some(path.to_path_buf()),
                project_root: Some(find_project_root_from(config_dir)),
            });
        }

        if skip_auto_discovery {
            log::debug!("[mdlite-config] Skipping auto-discovery due to --no-config flag");
            return Ok(Self::default());
        }

        let Some((config_file, project_root)) = start_dir.and_then(discover_config_upward) else {
            log::debug!("[mdlite-config] No configuration file found via upward traversal");
            return Ok(Self::default());
        };

        log::debug!("[mdlite-config] Loading discovered config file: {}", config_file.display());
        log::debug!("[mdlite-config] Project root: {}", project_root.display());
        let config = load_config_file(&config_file)?;
        Ok(Self {
            config,
            source: ConfigSource::ProjectConfig,
            loaded_file: Some(config_file),
            project_root: Some(project_root),
        })
    }
}

fn load_config_file(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::IoError {
        source,
        path: path.display().to_string(),
    })?;
    Config::from_toml_str(&content)
}

/// Finds project root by walking up from start_dir looking for .git directory.
/// Falls back to start_dir if no .git found.
fn find_project_root_from(start_dir: &Path) -> PathBuf {
    const MAX_DEPTH: usize = 100;

    for dir in start_dir.ancestors().take(MAX_DEPTH) {
        if dir.join(".git").exists() {
            log::debug!("[mdlite-config] Found .git at: {}", dir.display());
            return dir.to_path_buf();
        }
    }

    log::debug!(
        "[mdlite-config] No .git found, using config location as project root: {}",
        start_dir.display()
    );
    start_dir.to_path_buf()
}

/// Discover configuration file by traversing up the directory tree.
/// Returns: (config_file_path, project_root_path)
fn discover_config_upward(start_dir: &Path) -> Option<(PathBuf, PathBuf)> {
    const MAX_DEPTH: usize = 100; // Prevent infinite traversal

    for current_dir in start_dir.ancestors().take(MAX_DEPTH) {
        log::debug!("[mdlite-config] Searching for config in: {}", current_dir.display());

        if let Some(config_path) = CONFIG_FILES
            .iter()
            .map(|name| current_dir.join(name))
            .find(|path| path.is_file())
        {
            log::debug!("[mdlite-config] Found config file: {}", config_path.display());
            return Some((config_path, find_project_root_from(current_dir)));
        }

        // Check for .git directory (stop boundary)
        if current_dir.join(".git").exists() {
            log::debug!("[mdlite-config] Stopping at .git directory");
            return None;
        }
    }

    log::debug!("[mdlite-config] Reached filesystem root");
    None
}

/// Create a default configuration file at the specified path
pub fn create_default_config(path: &str) -> Result<(), ConfigError> {
    if Path::new(path).exists() {
        return Err(ConfigError::FileExists { path: path.to_string() });
    }

    let default_config = r#"# mdlite configuration file

[global]
# Files and directories to skip when rendering a directory
exclude = [
    # Common directories to exclude
    ".git",
    "node_modules",
    "target",
]

# Respect .gitignore files when scanning directories (default: true)
respect-gitignore = true

# Extension of rendered files (default: html)
extension = "html"

# Extra character substitutions. Each key must be a single character.
# A line feed always renders as <br> unless overridden here.
[symbols]
# "<" = "&lt;"
# ">" = "&gt;"
"#;

    fs::write(path, default_config).map_err(|source| ConfigError::IoError {
        source,
        path: path.to_string(),
    })
}

/// Errors that can occur when loading configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file at {path}: {source}")]
    IoError { source: io::Error, path: String },

    /// Failed to parse the configuration content
    #[error("Failed to parse config: {0}")]
    ParseError(String),

    /// Configuration file already exists
    #[error("Configuration file already exists at {path}")]
    FileExists { path: String },

    /// A `[symbols]` key that is not exactly one character
    #[error("Symbol key {key:?} must be exactly one character")]
    InvalidSymbol { key: String },
}
