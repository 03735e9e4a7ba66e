//! CLI configuration.
//!
//! Configuration is loaded in the following order (later overrides earlier):
//! 1. Default values
//! 2. YAML config file (if specified via FLNET_CONFIG or --config)
//! 3. Environment variables

use flnet_protocol::NAME_LEN;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Broadcast node number.
pub const BROADCAST_NODE: u8 = 0xFF;

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Addressing defaults for encoded frames.
    pub node: NodeConfig,
    /// Identity strings for participation frames.
    pub identity: IdentityConfig,
}

impl Config {
    /// Loads configuration from `path`, or from FLNET_CONFIG if `path` is
    /// `None`, then applies environment variable overrides.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match std::env::var("FLNET_CONFIG") {
                Ok(path) => Self::from_file(&path)?,
                Err(_) => Self::default(),
            },
        };

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e))?;
        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    /// Applies overrides looked up through `var`.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        self.node.apply_overrides(&var);
        self.identity.apply_overrides(&var);
    }

    /// Rejects a broadcast source node. Frames are only ever sent from a
    /// concrete node, so the same rule applies to `--src`.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.node.source_node == BROADCAST_NODE {
            return Err(ConfigError::ValidationError(
                "source_node cannot be the broadcast node (255)".to_string(),
            ));
        }
        Ok(())
    }

    /// Returns non-fatal problems worth reporting, such as identity strings
    /// that will be truncated on the wire.
    pub fn warnings(&self) -> Vec<String> {
        self.identity
            .fields()
            .into_iter()
            .filter(|(_, value)| value.len() > NAME_LEN)
            .map(|(name, value)| {
                format!(
                    "identity.{} '{}' is longer than {} bytes and will be truncated",
                    name, value, NAME_LEN
                )
            })
            .collect()
    }
}

/// Default source and destination nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeConfig {
    pub source_node: u8,
    pub destination_node: u8,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            source_node: 1,
            destination_node: BROADCAST_NODE,
        }
    }
}

impl NodeConfig {
    fn apply_overrides(&mut self, var: &impl Fn(&str) -> Option<String>) {
        if let Some(node) = var("FLNET_SOURCE_NODE").and_then(|v| parse_node(&v).ok()) {
            self.source_node = node;
        }

        if let Some(node) = var("FLNET_DESTINATION_NODE").and_then(|v| parse_node(&v).ok()) {
            self.destination_node = node;
        }
    }
}

/// Identity strings carried by trigger and participation request frames.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub node_name: String,
    pub vendor_name: String,
    pub manufacturer_name: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            node_name: "NODE".to_string(),
            vendor_name: "VENDOR".to_string(),
            manufacturer_name: "MANUF.".to_string(),
        }
    }
}

impl IdentityConfig {
    fn apply_overrides(&mut self, var: &impl Fn(&str) -> Option<String>) {
        if let Some(name) = var("FLNET_NODE_NAME") {
            self.node_name = name;
        }
        if let Some(name) = var("FLNET_VENDOR_NAME") {
            self.vendor_name = name;
        }
        if let Some(name) = var("FLNET_MANUFACTURER_NAME") {
            self.manufacturer_name = name;
        }
    }

    fn fields(&self) -> [(&'static str, &str); 3] {
        [
            ("node_name", self.node_name.as_str()),
            ("vendor_name", self.vendor_name.as_str()),
            ("manufacturer_name", self.manufacturer_name.as_str()),
        ]
    }
}

/// Parses a node number given in decimal or `0x`-prefixed hex.
pub fn parse_node(s: &str) -> Result<u8, String> {
    let s = s.trim();
    let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16),
        None => s.parse(),
    };
    parsed.map_err(|e| format!("invalid node number '{}': {}", s, e))
}

/// Configuration error.
#[derive(Debug)]
pub enum ConfigError {
    IoError(PathBuf, std::io::Error),
    ParseError(PathBuf, String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, e) => {
                write!(f, "failed to read config file '{}': {}", path.display(), e)
            }
            ConfigError::ParseError(path, e) => {
                write!(f, "failed to parse config file '{}': {}", path.display(), e)
            }
            ConfigError::ValidationError(msg) => {
                write!(f, "configuration validation failed: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
