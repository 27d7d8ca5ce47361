use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    // Configuration errors
    #[error("Config file not found at {path}. A template has been created - please edit it and restart.")]
    ConfigNotFound { path: PathBuf },

    #[error("Failed to parse config file: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    // Lyrics errors
    #[error("Lyrics not found for track: {track} by {artist}")]
    LyricsNotFound { track: String, artist: String },

    #[error("Lyrics provider {provider} failed: {reason}")]
    ProviderFailed { provider: String, reason: String },

    // Network errors
    #[error("Network request failed: {0}")]
    NetworkError(#[from] reqwest::Error),

    // IO errors
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
