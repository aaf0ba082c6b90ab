//! Summarize the tags used across a preset.

use livepad::clip::ClipRecord;
use livepad::color::color_for_tag;
use livepad::config::Config;
use livepad::preset::PresetManager;
use owo_colors::OwoColorize;
use std::error::Error;

pub fn handle_tags(preset: &str) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let manager = PresetManager::new(config.preset_dir())?;
    let records = manager.load(preset)?;

    let counts = tag_counts(&records);
    if counts.is_empty() {
        println!("{} No tags in preset '{}'", "⚠".yellow(), preset.cyan());
        return Ok(());
    }

    println!(
        "{} {} ({} tags)",
        "Preset:".bright_black(),
        preset.cyan().bold(),
        counts.len()
    );
    println!();

    for (tag, count) in &counts {
        let color = color_for_tag(tag);
        println!(
            "  {} {:<16} {:>3} clip(s)  {}",
            "●".truecolor(color.r, color.g, color.b),
            tag,
            count,
            color.hex().bright_black()
        );
    }

    Ok(())
}

/// Tag usage counts, most used first, name as tiebreak.
fn tag_counts(records: &[ClipRecord]) -> Vec<(String, usize)> {
    let mut counts: Vec<(String, usize)> = Vec::new();
    for record in records {
        for tag in &record.tags {
            match counts.iter_mut().find(|(name, _)| name == tag) {
                Some((_, n)) => *n += 1,
                None => counts.push((tag.clone(), 1)),
            }
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn clip_with_tags(name: &str, tags: &[&str]) -> ClipRecord {
        let mut record = ClipRecord::new(name);
        record.tags = tags.iter().map(|t| t.to_string()).collect();
        record
    }

    #[test]
    fn test_tag_counts_orders_by_usage() {
        let records = vec![
            clip_with_tags("a.wav", &["drums", "intro"]),
            clip_with_tags("b.wav", &["drums"]),
            clip_with_tags("c.wav", &["ambient"]),
        ];

        let counts = tag_counts(&records);
        assert_eq!(
            counts,
            vec![
                ("drums".to_string(), 2),
                ("ambient".to_string(), 1),
                ("intro".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_tag_counts_empty() {
        assert!(tag_counts(&[]).is_empty());
        assert!(tag_counts(&[clip_with_tags("a.wav", &[])]).is_empty());
    }
}
