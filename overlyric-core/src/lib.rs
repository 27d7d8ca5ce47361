pub mod cache;
pub mod config;
pub mod error;
pub mod lrc;
pub mod normalize;
pub mod paths;
pub mod playback;
pub mod provider;
pub mod providers;
pub mod resolver;
pub mod sync;
pub mod time;

pub use cache::{CacheStats, LyricsCache};
pub use config::{Config, LyricsConfig, SyncConfig};
pub use error::{CoreError, Result};
pub use lrc::{format_timestamp_ms, parse_synced_lyrics, LyricLine};
pub use normalize::{normalize, normalize_key};
pub use paths::{config_dir, config_path, CONFIG_DIR_NAME, CONFIG_FILE_NAME};
pub use playback::PlaybackSnapshot;
pub use provider::{LyricsProvider, LyricsResult, LyricsSource};
pub use providers::{GeniusProvider, LrclibProvider, PlaceholderProvider};
pub use resolver::LyricsResolver;
pub use sync::{get_display_frame, DisplayFrame, DEFAULT_SYNC_OFFSET_MS};
pub use time::DurationExt;
