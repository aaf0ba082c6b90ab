//! Preset files: named snapshots of the clip list.
//!
//! A preset is a flat JSON array of clip records stored at
//! `<preset_dir>/<name>.json`. The `recent` preset is special only by
//! convention: the player autosaves the working set there on quit, and the
//! application loads it by default on startup.

use crate::clip::ClipRecord;
use crate::constants::PRESET_EXTENSION;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

/// Reject names that would escape the preset directory or produce an
/// unnameable file.
pub fn validate_preset_name(name: &str) -> Result<(), Box<dyn Error>> {
    if name.trim().is_empty() {
        return Err("Preset name cannot be empty".into());
    }
    if name.contains(['/', '\\']) || name.contains("..") {
        return Err(format!("Invalid preset name: '{name}'").into());
    }
    Ok(())
}

/// Loads and saves presets under one directory, created on construction.
pub struct PresetManager {
    preset_dir: PathBuf,
}

impl PresetManager {
    pub fn new(preset_dir: impl Into<PathBuf>) -> Result<Self, Box<dyn Error>> {
        let preset_dir = preset_dir.into();
        fs::create_dir_all(&preset_dir)?;
        Ok(Self { preset_dir })
    }

    pub fn preset_dir(&self) -> &Path {
        &self.preset_dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.preset_dir.join(format!("{name}.{PRESET_EXTENSION}"))
    }

    pub fn exists(&self, name: &str) -> bool {
        self.path_for(name).exists()
    }

    /// Preset names (file stems), sorted.
    pub fn list(&self) -> Result<Vec<String>, Box<dyn Error>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.preset_dir)? {
            let path = entry?.path();
            let is_preset = path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case(PRESET_EXTENSION));
            if !is_preset {
                continue;
            }
            if let Some(stem) = path.file_stem() {
                names.push(stem.to_string_lossy().to_string());
            }
        }
        names.sort();
        Ok(names)
    }

    /// Write the records as a pretty-printed JSON array.
    pub fn save(&self, name: &str, records: &[ClipRecord]) -> Result<PathBuf, Box<dyn Error>> {
        validate_preset_name(name)?;
        let path = self.path_for(name);
        let json = serde_json::to_string_pretty(records)?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Load a preset. A missing file is an empty preset, not an error; a
    /// present but malformed file is an error.
    pub fn load(&self, name: &str) -> Result<Vec<ClipRecord>, Box<dyn Error>> {
        let path = self.path_for(name);
        if !path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&path)?;
        let records: Vec<ClipRecord> = serde_json::from_str(&contents)?;
        Ok(records)
    }

    /// Delete a preset file. Deleting a preset that does not exist is fine.
    pub fn delete(&self, name: &str) -> Result<(), Box<dyn Error>> {
        validate_preset_name(name)?;
        match fs::remove_file(self.path_for(name)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clip::PlayMode;
    use tempfile::TempDir;

    fn manager() -> (TempDir, PresetManager) {
        let dir = TempDir::new().unwrap();
        let manager = PresetManager::new(dir.path().join("presets")).unwrap();
        (dir, manager)
    }

    #[test]
    fn test_new_creates_directory() {
        let (_dir, manager) = manager();
        assert!(manager.preset_dir().is_dir());
    }

    #[test]
    fn test_missing_preset_loads_empty() {
        let (_dir, manager) = manager();
        assert!(manager.load("nope").unwrap().is_empty());
    }

    #[test]
    fn test_save_then_load_round_trips() {
        let (_dir, manager) = manager();
        let mut clip = ClipRecord::new("kick.wav");
        clip.tags = vec!["drums".into()];
        clip.play_mode = PlayMode::Loop;
        clip.set_window_ms(500, 2500);

        let path = manager.save("set-a", &[clip.clone()]).unwrap();
        assert!(path.ends_with("set-a.json"));

        let loaded = manager.load("set-a").unwrap();
        assert_eq!(loaded, vec![clip]);
    }

    #[test]
    fn test_list_is_sorted_stems() {
        let (_dir, manager) = manager();
        manager.save("zeta", &[]).unwrap();
        manager.save("alpha", &[]).unwrap();
        // Stray files are not presets.
        fs::write(manager.preset_dir().join("notes.txt"), "x").unwrap();

        assert_eq!(manager.list().unwrap(), vec!["alpha", "zeta"]);
    }

    #[test]
    fn test_delete_is_missing_ok() {
        let (_dir, manager) = manager();
        manager.save("gone", &[]).unwrap();
        manager.delete("gone").unwrap();
        assert!(!manager.exists("gone"));
        // Second delete is not an error.
        manager.delete("gone").unwrap();
    }

    #[test]
    fn test_name_validation() {
        assert!(validate_preset_name("live-set").is_ok());
        assert!(validate_preset_name("").is_err());
        assert!(validate_preset_name("   ").is_err());
        assert!(validate_preset_name("a/b").is_err());
        assert!(validate_preset_name("..").is_err());

        let (_dir, manager) = manager();
        assert!(manager.save("", &[]).is_err());
    }

    #[test]
    fn test_malformed_preset_is_an_error() {
        let (_dir, manager) = manager();
        fs::write(manager.path_for("broken"), "{not json").unwrap();
        assert!(manager.load("broken").is_err());
    }
}
