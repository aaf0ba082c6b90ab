//! Import audio files into the library and register them as clips.
//!
//! Importing copies each file into the work directory's music folder and
//! appends a clip record to the target preset. Files are fingerprinted in
//! parallel so re-importing the same audio (under any name) is a no-op.

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use indicatif::{ProgressBar, ProgressStyle};
use livepad::clip::{ClipRecord, ClipStore, PlayMode, StoreEvent};
use livepad::config::Config;
use livepad::constants::AUDIO_EXTENSIONS;
use livepad::media::metadata::probe_audio_metadata;
use livepad::preset::PresetManager;
use owo_colors::OwoColorize;
use rayon::prelude::*;
use std::collections::HashMap;
use std::error::Error;
use std::fs::{self, File};
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

/// Minimum fuzzy score before an existing tag is offered as a correction.
const SUGGESTION_THRESHOLD: i64 = 50;

struct Candidate {
    source: PathBuf,
    name: String,
    fingerprint: String,
    duration_seconds: Option<f64>,
}

pub fn handle_import(
    files: &[String],
    tags: &[String],
    mode: Option<&str>,
    preset: &str,
    yes: bool,
) -> Result<(), Box<dyn Error>> {
    let config = Config::load()?;
    let music_dir = config.music_dir();
    fs::create_dir_all(&music_dir)?;

    let play_mode = match mode {
        Some(m) => m.parse::<PlayMode>()?,
        None => config.import_play_mode()?,
    };

    // Resolve and validate the inputs before touching anything
    let mut sources = Vec::new();
    for raw in files {
        let expanded = shellexpand::tilde(raw);
        let path = PathBuf::from(expanded.as_ref());
        if !path.is_file() {
            return Err(format!("File not found: {}", path.display()).into());
        }
        if !has_audio_extension(&path) {
            return Err(format!("Unsupported audio format: {}", path.display()).into());
        }
        sources.push(path);
    }
    if sources.is_empty() {
        return Err("No files to import".into());
    }

    let manager = PresetManager::new(config.preset_dir())?;
    let mut store = ClipStore::new();
    for record in manager.load(preset)? {
        store.add(record);
    }
    // Subscribed after seeding so only fresh imports are announced
    store.subscribe(|event| {
        if let StoreEvent::Added(clip) = event {
            println!("  {} {}", "+".green().bold(), clip.name);
        }
    });

    let library = collect_library_files(&music_dir)?;

    let pb = ProgressBar::new((library.len() + sources.len()) as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:30.cyan/blue}] {pos}/{len} {msg}")
            .unwrap()
            .progress_chars("█▓░"),
    );
    pb.set_message("Fingerprinting audio");

    // Fingerprints of what the library already holds, name keyed by digest
    let mut seen: HashMap<String, String> = library
        .par_iter()
        .filter_map(|path| {
            let result = file_fingerprint(path);
            pb.inc(1);
            match result {
                Ok(fp) => {
                    let name = path.file_name()?.to_string_lossy().to_string();
                    Some((fp, name))
                }
                Err(e) => {
                    pb.suspend(|| {
                        eprintln!("Warning: failed to read '{}': {}", path.display(), e)
                    });
                    None
                }
            }
        })
        .collect();

    let normalize = config.normalize_clip_names;
    let examined: Vec<Result<Candidate, String>> = sources
        .par_iter()
        .map(|path| {
            let result = examine(path, normalize);
            pb.inc(1);
            result.map_err(|e| format!("{}: {}", path.display(), e))
        })
        .collect();
    pb.finish_and_clear();

    let final_tags = resolve_tags(tags, &store.all_tags(), yes)?;

    let mut imported = 0u32;
    let mut duplicates = 0u32;
    let mut failures = 0u32;

    for result in examined {
        let candidate = match result {
            Ok(c) => c,
            Err(e) => {
                eprintln!("{} {}", "✗".red(), e);
                failures += 1;
                continue;
            }
        };

        if let Some(existing) = seen.get(&candidate.fingerprint) {
            println!(
                "  {} {} already in the library as '{}'",
                "→".bright_black(),
                candidate.name,
                existing
            );
            duplicates += 1;
            continue;
        }

        let dest = music_dir.join(&candidate.name);
        if dest.exists() {
            println!(
                "  {} {} already exists in the library, keeping the existing file",
                "→".bright_black(),
                candidate.name
            );
        } else {
            fs::copy(&candidate.source, &dest)?;
        }
        seen.insert(candidate.fingerprint, candidate.name.clone());

        let mut record = ClipRecord::new(candidate.name);
        record.tags = final_tags.clone();
        record.play_mode = play_mode;
        record.end_time = candidate.duration_seconds;
        store.add(record);
        imported += 1;
    }

    let preset_path = manager.save(preset, store.records())?;

    println!();
    println!(
        "{} Imported {} clip(s) into preset '{}'",
        "✓".green().bold(),
        imported,
        preset
    );
    if duplicates > 0 {
        println!(
            "  {} {} duplicate(s) skipped",
            "→".bright_black(),
            duplicates
        );
    }
    if failures > 0 {
        println!("  {} {} file(s) could not be read", "✗".red(), failures);
    }
    println!("Preset saved to: {}", preset_path.display().bright_black());

    Ok(())
}

fn has_audio_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|ext| AUDIO_EXTENSIONS.contains(&ext.as_str()))
}

/// Audio files sitting in the library directory. The library is flat; the
/// importer never nests.
fn collect_library_files(music_dir: &Path) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let mut files = Vec::new();
    if !music_dir.exists() {
        return Ok(files);
    }
    for entry in fs::read_dir(music_dir)? {
        let path = entry?.path();
        if path.is_file() && has_audio_extension(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

fn examine(path: &Path, normalize: bool) -> Result<Candidate, Box<dyn Error>> {
    let file_name = path
        .file_name()
        .ok_or("File has no name")?
        .to_string_lossy()
        .to_string();
    let name = if normalize {
        normalize_clip_name(&file_name)
    } else {
        file_name
    };

    let fingerprint = file_fingerprint(path)?;
    // A clip with an unreadable header still imports, just without a window end
    let duration_seconds = probe_audio_metadata(path)
        .ok()
        .and_then(|meta| meta.duration_seconds);

    Ok(Candidate {
        source: path.to_path_buf(),
        name,
        fingerprint,
        duration_seconds,
    })
}

/// MD5 of the whole file, streamed in chunks.
fn file_fingerprint(path: &Path) -> Result<String, Box<dyn Error>> {
    let file = File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut context = md5::Context::new();

    let mut buffer = [0u8; 8192];
    loop {
        let bytes_read = reader.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        context.consume(&buffer[..bytes_read]);
    }

    let digest = context.finalize();
    Ok(format!("{digest:x}"))
}

/// Lowercase the stem and replace spaces so clip names are shell friendly.
fn normalize_clip_name(file_name: &str) -> String {
    let path = Path::new(file_name);
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name);
    let stem = stem.to_lowercase().replace(' ', "_");
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => format!("{stem}.{}", ext.to_lowercase()),
        None => stem,
    }
}

/// Gather the tag list, prompting when none were given on the command line,
/// and steer near-misses toward tags the library already uses.
fn resolve_tags(
    tags: &[String],
    known: &[String],
    yes: bool,
) -> Result<Vec<String>, Box<dyn Error>> {
    let mut raw: Vec<String> = tags.to_vec();
    if raw.is_empty() && !yes {
        let input: String = Input::with_theme(&ColorfulTheme::default())
            .with_prompt("Tags (comma separated, empty for none)")
            .allow_empty(true)
            .interact_text()?;
        raw = input
            .split(',')
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
    }

    let mut resolved = Vec::new();
    for tag in &raw {
        let tag = canonicalize_tag(tag, known, !yes)?;
        if !resolved.contains(&tag) {
            resolved.push(tag);
        }
    }
    Ok(resolved)
}

fn canonicalize_tag(
    tag: &str,
    known: &[String],
    interactive: bool,
) -> Result<String, Box<dyn Error>> {
    if known.iter().any(|k| k == tag) {
        return Ok(tag.to_string());
    }
    if interactive && let Some(close) = closest_tag(tag, known) {
        let use_existing = Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(format!("Use existing tag '{close}' instead of '{tag}'?"))
            .default(true)
            .interact()?;
        if use_existing {
            return Ok(close.to_string());
        }
    }
    Ok(tag.to_string())
}

/// Best fuzzy match among the known tags, if any scores above the threshold.
fn closest_tag<'a>(input: &str, known: &'a [String]) -> Option<&'a str> {
    let matcher = SkimMatcherV2::default();
    known
        .iter()
        .filter_map(|k| matcher.fuzzy_match(k, input).map(|score| (score, k.as_str())))
        .max_by_key(|(score, _)| *score)
        .filter(|(score, _)| *score >= SUGGESTION_THRESHOLD)
        .map(|(_, k)| k)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_normalize_clip_name() {
        assert_eq!(normalize_clip_name("Air Horn.WAV"), "air_horn.wav");
        assert_eq!(normalize_clip_name("kick.flac"), "kick.flac");
        assert_eq!(normalize_clip_name("no extension"), "no_extension");
    }

    #[test]
    fn test_fingerprint_matches_content_not_name() {
        let temp_dir = TempDir::new().unwrap();
        let a = temp_dir.path().join("a.wav");
        let b = temp_dir.path().join("b.wav");
        let c = temp_dir.path().join("c.wav");
        fs::write(&a, b"same bytes").unwrap();
        fs::write(&b, b"same bytes").unwrap();
        fs::write(&c, b"other bytes").unwrap();

        let fp_a = file_fingerprint(&a).unwrap();
        assert_eq!(fp_a, file_fingerprint(&b).unwrap());
        assert_ne!(fp_a, file_fingerprint(&c).unwrap());
        assert_eq!(fp_a.len(), 32);
    }

    #[test]
    fn test_collect_library_files_filters_extensions() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("one.wav"), b"x").unwrap();
        fs::write(temp_dir.path().join("two.FLAC"), b"x").unwrap();
        fs::write(temp_dir.path().join("readme.txt"), b"x").unwrap();

        let files = collect_library_files(temp_dir.path()).unwrap();
        assert_eq!(files.len(), 2);
    }

    #[test]
    fn test_collect_library_files_missing_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let files = collect_library_files(&temp_dir.path().join("absent")).unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_closest_tag_suggests_near_misses_only() {
        let known = vec!["ambient".to_string(), "drums".to_string()];
        assert_eq!(closest_tag("ambien", &known), Some("ambient"));
        assert_eq!(closest_tag("drum", &known), Some("drums"));
        assert_eq!(closest_tag("xyz", &known), None);
        assert_eq!(closest_tag("anything", &[]), None);
    }

    #[test]
    fn test_has_audio_extension() {
        assert!(has_audio_extension(Path::new("a.wav")));
        assert!(has_audio_extension(Path::new("a.FLAC")));
        assert!(!has_audio_extension(Path::new("a.mp3")));
        assert!(!has_audio_extension(Path::new("bare")));
    }
}
