use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Arena configuration, usually read from a TOML file:
///
/// ```toml
/// [arena]
/// capacity = 1048576
/// align = 64
///
/// [logging]
/// level = "debug"
/// json = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaConfig {
    #[serde(default)]
    pub arena: ArenaSection,

    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArenaSection {
    /// Size of the backing buffer in bytes
    #[serde(default = "default_capacity")]
    pub capacity: usize,

    /// Alignment of the backing buffer
    #[serde(default = "default_align")]
    pub align: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSection {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,

    #[serde(default)]
    pub file: Option<String>,

    #[serde(default)]
    pub spans: bool,
}

impl Default for ArenaSection {
    fn default() -> Self {
        Self {
            capacity: default_capacity(),
            align: default_align(),
        }
    }
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            file: None,
            spans: false,
        }
    }
}

fn default_capacity() -> usize { 64 * 1024 }
fn default_align() -> usize { 16 }
fn default_level() -> String { "info".to_string() }

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

impl ArenaConfig {
    /// Load and validate configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Parse and validate configuration from a TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let align = self.arena.align;
        if !align.is_power_of_two() {
            return Err(ConfigError::Invalid {
                field: "arena.align",
                reason: format!("{} is not a power of two", align),
            });
        }

        // Layout limit for the backing buffer.
        if self.arena.capacity > isize::MAX as usize - (align - 1) {
            return Err(ConfigError::Invalid {
                field: "arena.capacity",
                reason: format!("{} bytes exceeds the address space", self.arena.capacity),
            });
        }

        if !LEVELS.contains(&self.logging.level.to_lowercase().as_str()) {
            return Err(ConfigError::Invalid {
                field: "logging.level",
                reason: format!("unknown level '{}'", self.logging.level),
            });
        }

        Ok(())
    }
}
