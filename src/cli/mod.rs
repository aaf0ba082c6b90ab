pub mod clips;
pub mod config;
pub mod import;
pub mod init;
pub mod play;
pub mod presets;
pub mod tag;
pub mod tags;
