use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub lyrics: LyricsConfig,
    #[serde(default)]
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LyricsConfig {
    /// Maximum number of cached lyric entries across both key spaces
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: usize,
    /// Optional: enables the Genius scraped-page fallback provider
    pub genius_token: Option<String>,
}

const fn default_cache_capacity() -> usize {
    crate::cache::DEFAULT_CAPACITY
}

impl Default for LyricsConfig {
    fn default() -> Self {
        Self {
            cache_capacity: default_cache_capacity(),
            genius_token: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Display offset in milliseconds; positive makes lines appear earlier
    #[serde(default = "default_offset_ms")]
    pub offset_ms: i64,
}

const fn default_offset_ms() -> i64 {
    crate::sync::DEFAULT_SYNC_OFFSET_MS
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            offset_ms: default_offset_ms(),
        }
    }
}

impl Config {
    /// Get the configuration directory path (~/.config/overlyric/)
    #[must_use]
    pub fn config_dir() -> PathBuf {
        crate::paths::config_dir()
    }

    /// Get the config file path (~/.config/overlyric/config.toml)
    #[must_use]
    pub fn config_path() -> PathBuf {
        crate::paths::config_path()
    }

    /// Load config from file or create template on first run
    ///
    /// # Errors
    ///
    /// Returns `ConfigNotFound` after writing the template on first run,
    /// or an error if the config file cannot be read or parsed.
    pub fn load_or_create() -> Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            if let Some(parent) = config_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&config_path, CONFIG_TEMPLATE)?;

            return Err(CoreError::ConfigNotFound { path: config_path });
        }

        let content = fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }
}

const CONFIG_TEMPLATE: &str = r#"# Overlyric Configuration
# ~/.config/overlyric/config.toml

[lyrics]
# Maximum number of cached lyric entries
cache_capacity = 100
# Optional: Genius API token enables the scraped-lyrics fallback provider
# genius_token = ""

[sync]
# Display offset in milliseconds; positive makes lines appear earlier
offset_ms = 350
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_parses_with_defaults() {
        let config: Config = toml::from_str(CONFIG_TEMPLATE).unwrap();
        assert_eq!(config.lyrics.cache_capacity, 100);
        assert_eq!(config.sync.offset_ms, 350);
        assert!(config.lyrics.genius_token.is_none());
    }

    #[test]
    fn empty_file_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.lyrics.cache_capacity, 100);
        assert_eq!(config.sync.offset_ms, 350);
    }

    #[test]
    fn partial_file_fills_missing_fields() {
        let config: Config = toml::from_str("[sync]\noffset_ms = -200\n").unwrap();
        assert_eq!(config.sync.offset_ms, -200);
        assert_eq!(config.lyrics.cache_capacity, 100);
    }

    #[test]
    fn genius_token_is_read() {
        let config: Config =
            toml::from_str("[lyrics]\ngenius_token = \"abc123\"\n").unwrap();
        assert_eq!(config.lyrics.genius_token.as_deref(), Some("abc123"));
    }
}
