//! List the clips in a preset, one row per pad.

use livepad::clip::ClipRecord;
use livepad::color::color_for_tag;
use livepad::config::Config;
use livepad::keymap;
use livepad::media::metadata::probe_audio_metadata;
use livepad::preset::PresetManager;
use owo_colors::OwoColorize;
use std::error::Error;
use std::fs;

pub fn handle_clips(preset: &str) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let manager = PresetManager::new(config.preset_dir())?;
    let records = manager.load(preset)?;

    if records.is_empty() {
        println!("{} Preset '{}' has no clips", "⚠".yellow(), preset.cyan());
        println!("  Import audio with: {}", "lap import <files>".cyan());
        return Ok(());
    }

    let music_dir = config.music_dir();
    let modified = fs::metadata(manager.path_for(preset))
        .and_then(|meta| meta.modified())
        .ok()
        .map(|time| {
            chrono::DateTime::<chrono::Local>::from(time)
                .format("%Y-%m-%d %H:%M")
                .to_string()
        })
        .unwrap_or_default();

    println!(
        "{} {} ({} clips)  {}",
        "Preset:".bright_black(),
        preset.cyan().bold(),
        records.len(),
        modified.bright_black()
    );
    println!();

    for (i, record) in records.iter().enumerate() {
        // Pads beyond the keyboard rows are listed but unbound
        let key = keymap::pad_key(i)
            .map(|k| k.to_string())
            .unwrap_or_else(|| "·".to_string());

        let source = record.source_path(&music_dir);
        let full_seconds = if source.is_file() {
            probe_audio_metadata(&source)
                .ok()
                .and_then(|meta| meta.duration_seconds)
        } else {
            None
        };

        let duration = if source.is_file() {
            full_seconds
                .map(|secs| format_seconds(secs).bright_black().to_string())
                .unwrap_or_default()
        } else {
            "missing".red().to_string()
        };

        let tags: String = record
            .tags
            .iter()
            .map(|tag| {
                let color = color_for_tag(tag);
                format!(" {}", format!("[{tag}]").truecolor(color.r, color.g, color.b))
            })
            .collect();

        println!(
            "  {}  {:<28} {:<4} {:>8}  {}{}",
            key.cyan().bold(),
            record.name,
            record.play_mode.to_string(),
            duration,
            window_label(record, full_seconds),
            tags
        );
    }

    Ok(())
}

/// "m:ss.t" with a tenth of a second, enough resolution for clip windows.
fn format_seconds(total: f64) -> String {
    let mins = (total / 60.0) as u32;
    let secs = total % 60.0;
    format!("{mins}:{secs:04.1}")
}

/// The playable window, or nothing when the clip plays whole.
fn window_label(record: &ClipRecord, full_seconds: Option<f64>) -> String {
    let trims_start = record.start_time > 0.0;
    let trims_end = match (record.end_time, full_seconds) {
        (Some(end), Some(full)) => end + 0.05 < full,
        (Some(_), None) => true,
        (None, _) => false,
    };
    if !trims_start && !trims_end {
        return String::new();
    }

    let end = record
        .end_time
        .map(format_seconds)
        .unwrap_or_else(|| "end".to_string());
    format!("{} → {}  ", format_seconds(record.start_time), end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_seconds() {
        assert_eq!(format_seconds(0.0), "0:00.0");
        assert_eq!(format_seconds(2.5), "0:02.5");
        assert_eq!(format_seconds(125.25), "2:05.2");
    }

    #[test]
    fn test_window_label_hides_full_playback() {
        let mut record = ClipRecord::new("a.wav");
        record.end_time = Some(10.0);
        assert_eq!(window_label(&record, Some(10.0)), "");
        assert_eq!(window_label(&record, Some(10.01)), "");
    }

    #[test]
    fn test_window_label_shows_trims() {
        let mut record = ClipRecord::new("a.wav");
        record.start_time = 1.5;
        record.end_time = Some(4.0);
        assert_eq!(window_label(&record, Some(10.0)), "0:01.5 → 0:04.0  ");

        let mut tail_only = ClipRecord::new("b.wav");
        tail_only.start_time = 2.0;
        assert_eq!(window_label(&tail_only, Some(10.0)), "0:02.0 → end  ");
    }
}
