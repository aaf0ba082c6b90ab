pub mod app;
pub mod audio;
pub mod preset_dialog;
pub mod ui;

use std::error::Error;

/// Launch the clip pad TUI, optionally with a named preset.
pub fn run(preset: Option<&str>) -> Result<(), Box<dyn Error>> {
    app::run_with_preset(preset)
}
