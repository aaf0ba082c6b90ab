pub mod clip;
pub mod color;
pub mod config;
pub mod constants;
pub mod keymap;
pub mod media;
pub mod preset;
pub mod selector;
