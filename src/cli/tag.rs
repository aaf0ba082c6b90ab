//! Add or remove tags on a single clip.

use livepad::color::color_for_tag;
use livepad::config::Config;
use livepad::preset::PresetManager;
use owo_colors::OwoColorize;
use std::error::Error;

pub fn handle_tag(
    clip: &str,
    add: &[String],
    remove: &[String],
    preset: &str,
) -> Result<(), Box<dyn Error>> {
    if add.is_empty() && remove.is_empty() {
        return Err("Nothing to do: pass --add and/or --remove".into());
    }

    let config = Config::load()?;
    let manager = PresetManager::new(config.preset_dir())?;
    let mut records = manager.load(preset)?;

    // Duplicate names resolve to the first record, same as the player pads
    let index = records
        .iter()
        .position(|r| r.name == clip)
        .ok_or_else(|| format!("Clip '{clip}' not found in preset '{preset}'"))?;

    let (added, removed) = {
        let record = &mut records[index];
        let mut added = 0;
        for tag in add {
            if !record.has_tag(tag) {
                record.tags.push(tag.clone());
                added += 1;
            }
        }
        let before = record.tags.len();
        record.tags.retain(|t| !remove.contains(t));
        (added, before - record.tags.len())
    };

    manager.save(preset, &records)?;

    println!("{} Updated {}", "✓".green().bold(), clip.cyan());
    if added > 0 {
        println!("  Added: {added} tag(s)");
    }
    if removed > 0 {
        println!("  Removed: {removed} tag(s)");
    }

    let record = &records[index];
    if record.tags.is_empty() {
        println!("  Tags: {}", "(none)".bright_black());
    } else {
        let tags: String = record
            .tags
            .iter()
            .map(|tag| {
                let color = color_for_tag(tag);
                format!(" {}", format!("[{tag}]").truecolor(color.r, color.g, color.b))
            })
            .collect();
        println!("  Tags:{tags}");
    }

    Ok(())
}
