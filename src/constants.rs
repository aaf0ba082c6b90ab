//! Project-wide constants used across multiple modules.
//!
//! This module centralizes constant definitions to avoid duplication and ensure
//! consistency across the codebase.

/// Audio file extensions the playback engine can decode
pub const AUDIO_EXTENSIONS: &[&str] = &["wav", "flac"];

/// Pad key rows, row-major: pad 0 is `q`, pad 9 is `p`, pad 10 is `a`, ...
pub const KEY_ROWS: &[&str] = &["qwertyuiop", "asdfghjkl", "zxcvbnm"];

/// Name of the preset that is autosaved on quit and loaded on startup
pub const RECENT_PRESET: &str = "recent";

/// File extension for preset files
pub const PRESET_EXTENSION: &str = "json";

/// Subdirectory of the work dir holding imported audio files
pub const MUSIC_DIR: &str = "music";

/// Subdirectory of the work dir holding preset files
pub const PRESETS_DIR: &str = "presets";

/// Log file for the terminal player (the alternate screen owns stdout)
pub const PLAYER_LOG_FILE: &str = "/tmp/lap-player.log";
