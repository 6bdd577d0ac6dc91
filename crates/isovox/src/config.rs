//! # Pipeline Configuration
//!
//! ```toml
//! [parse]
//! mode = "specialized"   # or "general"
//!
//! [write]
//! version = 150
//!
//! [render]
//! rotations = 4          # 1..=4 quarter turns
//! ```
//!
//! Every section and field is optional.

use std::path::Path;

use isovox_scene::{ParseMode, DEFAULT_VERSION};
use serde::{Deserialize, Serialize};

use crate::error::{IsovoxError, IsovoxResult};

/// Parser settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParseConfig {
    /// Treatment of reserved colors.
    pub mode: ParseMode,
}

/// Writer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriteConfig {
    /// Version stamped into written files.
    pub version: i32,
}

impl Default for WriteConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION,
        }
    }
}

/// Sprite settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Number of quarter-turn views to produce, starting at 0°.
    pub rotations: u8,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self { rotations: 4 }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IsovoxConfig {
    /// Parser settings.
    pub parse: ParseConfig,
    /// Writer settings.
    pub write: WriteConfig,
    /// Sprite settings.
    pub render: RenderConfig,
}

impl IsovoxConfig {
    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` on malformed TOML or out-of-range values.
    pub fn from_toml_str(text: &str) -> IsovoxResult<Self> {
        let config: Self =
            toml::from_str(text).map_err(|e| IsovoxError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a TOML file.
    ///
    /// # Errors
    ///
    /// `Io` if the file cannot be read, `InvalidConfig` otherwise.
    pub fn from_file(path: impl AsRef<Path>) -> IsovoxResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| IsovoxError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&text)?;
        tracing::debug!("loaded config from {}: {:?}", path.display(), config);
        Ok(config)
    }

    /// Serializes back to TOML.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if serialization fails.
    pub fn to_toml_string(&self) -> IsovoxResult<String> {
        toml::to_string(self).map_err(|e| IsovoxError::InvalidConfig(e.to_string()))
    }

    /// Checks value ranges.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if `render.rotations` is outside `1..=4`.
    pub fn validate(&self) -> IsovoxResult<()> {
        if !(1..=4).contains(&self.render.rotations) {
            return Err(IsovoxError::InvalidConfig(format!(
                "render.rotations must be 1..=4, got {}",
                self.render.rotations
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_is_default() {
        let config = IsovoxConfig::from_toml_str("").unwrap();
        assert_eq!(config, IsovoxConfig::default());
        assert_eq!(config.parse.mode, ParseMode::Specialized);
        assert_eq!(config.write.version, 150);
        assert_eq!(config.render.rotations, 4);
    }

    #[test]
    fn test_partial_document() {
        let config = IsovoxConfig::from_toml_str(
            r#"
            [parse]
            mode = "general"

            [render]
            rotations = 2
            "#,
        )
        .unwrap();
        assert_eq!(config.parse.mode, ParseMode::General);
        assert_eq!(config.render.rotations, 2);
        assert_eq!(config.write.version, 150);
    }

    #[test]
    fn test_rejects_bad_values() {
        for text in [
            "[render]\nrotations = 0",
            "[render]\nrotations = 5",
            "[parse]\nmode = \"sideways\"",
            "[write]\nversion = \"new\"",
        ] {
            assert!(matches!(
                IsovoxConfig::from_toml_str(text),
                Err(IsovoxError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_toml_round_trip() {
        let config = IsovoxConfig {
            parse: ParseConfig {
                mode: ParseMode::General,
            },
            write: WriteConfig { version: 200 },
            render: RenderConfig { rotations: 1 },
        };
        let text = config.to_toml_string().unwrap();
        assert_eq!(IsovoxConfig::from_toml_str(&text).unwrap(), config);
    }
}
