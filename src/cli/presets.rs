//! Manage saved presets from the command line.

use dialoguer::Confirm;
use dialoguer::theme::ColorfulTheme;
use livepad::config::Config;
use livepad::constants::RECENT_PRESET;
use livepad::preset::PresetManager;
use owo_colors::OwoColorize;
use std::error::Error;
use std::fs;

pub fn handle_presets_list() -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let manager = PresetManager::new(config.preset_dir())?;
    let names = manager.list()?;

    if names.is_empty() {
        println!("{} No presets yet", "⚠".yellow());
        println!("  Import audio with: {}", "lap import <files>".cyan());
        return Ok(());
    }

    println!("{}", "Presets:".bright_black());
    for name in &names {
        let count = match manager.load(name) {
            Ok(records) => records.len().to_string(),
            Err(_) => "?".to_string(),
        };
        let modified = fs::metadata(manager.path_for(name))
            .and_then(|meta| meta.modified())
            .ok()
            .map(|time| {
                chrono::DateTime::<chrono::Local>::from(time)
                    .format("%Y-%m-%d %H:%M")
                    .to_string()
            })
            .unwrap_or_default();
        let marker = if name == RECENT_PRESET {
            " (autosaved)"
        } else {
            ""
        };

        println!(
            "  {:<20} {:>3} clip(s)  {}{}",
            name.cyan(),
            count,
            modified.bright_black(),
            marker.bright_black()
        );
    }

    Ok(())
}

pub fn handle_presets_delete(name: &str, yes: bool) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let manager = PresetManager::new(config.preset_dir())?;

    if !manager.exists(name) {
        return Err(format!("Preset '{name}' does not exist").into());
    }

    if !yes {
        let confirmed = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Delete preset '{name}'?"))
            .default(false)
            .interact()?;
        if !confirmed {
            println!("Cancelled");
            return Ok(());
        }
    }

    manager.delete(name)?;
    println!("{} Deleted preset '{}'", "✓".green().bold(), name.cyan());

    Ok(())
}
