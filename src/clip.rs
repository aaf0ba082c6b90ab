//! Clip records and the ordered store behind presets.
//!
//! A [`ClipRecord`] names an audio file in the library directory together
//! with its tags, play mode, and playable window. Records serialize as the
//! flat JSON objects preset files are made of; the `name` doubles as the
//! source reference (the file lives at `<music_dir>/<name>`).
//!
//! [`ClipStore`] keeps records in insertion order and owns the observer
//! list: interested parties register a callback once at startup and hear
//! about every add and remove for the life of the store. There is no global
//! signal hub and no unsubscribe; the store is the single event source.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// How a clip behaves when playback reaches the end of its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayMode {
    /// Stop at the window end.
    Once,
    /// Seek back to the window start and keep going.
    Loop,
}

fn default_play_mode() -> PlayMode {
    PlayMode::Once
}

impl PlayMode {
    pub fn toggled(self) -> PlayMode {
        match self {
            PlayMode::Once => PlayMode::Loop,
            PlayMode::Loop => PlayMode::Once,
        }
    }
}

impl fmt::Display for PlayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayMode::Once => write!(f, "Once"),
            PlayMode::Loop => write!(f, "Loop"),
        }
    }
}

impl FromStr for PlayMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "once" => Ok(PlayMode::Once),
            "loop" => Ok(PlayMode::Loop),
            other => Err(format!("unknown play mode '{other}' (use 'once' or 'loop')")),
        }
    }
}

/// A named audio asset with tags, play mode, and a playable window in
/// seconds. `end_time` of `None` means play to the end of the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClipRecord {
    pub name: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default = "default_play_mode")]
    pub play_mode: PlayMode,
    #[serde(default)]
    pub start_time: f64,
    #[serde(default)]
    pub end_time: Option<f64>,
}

impl ClipRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tags: Vec::new(),
            play_mode: default_play_mode(),
            start_time: 0.0,
            end_time: None,
        }
    }

    /// Where this clip's audio lives, given the library directory. The name
    /// carries the file extension.
    pub fn source_path(&self, music_dir: &Path) -> PathBuf {
        music_dir.join(&self.name)
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    /// Window start in whole milliseconds.
    pub fn start_ms(&self) -> i64 {
        (self.start_time * 1000.0).round() as i64
    }

    /// Window end in whole milliseconds, when one is set.
    pub fn end_ms(&self) -> Option<i64> {
        self.end_time.map(|t| (t * 1000.0).round() as i64)
    }

    /// Commit a window expressed in milliseconds; stored as f64 seconds.
    pub fn set_window_ms(&mut self, start: i64, end: i64) {
        self.start_time = start as f64 / 1000.0;
        self.end_time = Some(end as f64 / 1000.0);
    }
}

/// A store mutation, delivered synchronously to every observer.
#[derive(Debug, Clone)]
pub enum StoreEvent {
    Added(ClipRecord),
    Removed(ClipRecord),
}

type Observer = Box<dyn Fn(&StoreEvent)>;

/// Ordered clip collection with registered observers.
#[derive(Default)]
pub struct ClipStore {
    clips: Vec<ClipRecord>,
    observers: Vec<Observer>,
}

impl ClipStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer for the life of the store. Notifications arrive
    /// synchronously, in registration order.
    pub fn subscribe<F>(&mut self, observer: F)
    where
        F: Fn(&StoreEvent) + 'static,
    {
        self.observers.push(Box::new(observer));
    }

    fn notify(&self, event: &StoreEvent) {
        for observer in &self.observers {
            observer(event);
        }
    }

    /// Append a record. Duplicate names are permitted; name lookups return
    /// the first match.
    pub fn add(&mut self, clip: ClipRecord) {
        self.clips.push(clip.clone());
        self.notify(&StoreEvent::Added(clip));
    }

    /// Remove the first record with this name and hand it back.
    pub fn remove(&mut self, name: &str) -> Option<ClipRecord> {
        let index = self.clips.iter().position(|c| c.name == name)?;
        let removed = self.clips.remove(index);
        self.notify(&StoreEvent::Removed(removed.clone()));
        Some(removed)
    }

    /// Remove the record at `index` and hand it back.
    pub fn remove_at(&mut self, index: usize) -> Option<ClipRecord> {
        if index >= self.clips.len() {
            return None;
        }
        let removed = self.clips.remove(index);
        self.notify(&StoreEvent::Removed(removed.clone()));
        Some(removed)
    }

    pub fn find(&self, name: &str) -> Option<&ClipRecord> {
        self.clips.iter().find(|c| c.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut ClipRecord> {
        self.clips.iter_mut().find(|c| c.name == name)
    }

    pub fn get(&self, index: usize) -> Option<&ClipRecord> {
        self.clips.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ClipRecord> {
        self.clips.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ClipRecord> {
        self.clips.iter()
    }

    /// The records in insertion order, for serialization.
    pub fn records(&self) -> &[ClipRecord] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Drop every record without notifying observers; the follow-up load
    /// announces the replacement set.
    pub fn clear(&mut self) {
        self.clips.clear();
    }

    /// Swap in a freshly loaded list, announcing each record as an add so
    /// observers see loads the same way they see imports.
    pub fn replace_all(&mut self, clips: Vec<ClipRecord>) {
        self.clear();
        for clip in clips {
            self.add(clip);
        }
    }

    /// Unique tags across the store, in first-appearance order.
    pub fn all_tags(&self) -> Vec<String> {
        let mut tags: Vec<String> = Vec::new();
        for clip in &self.clips {
            for tag in &clip.tags {
                if !tags.contains(tag) {
                    tags.push(tag.clone());
                }
            }
        }
        tags
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(name: &str) -> ClipRecord {
        ClipRecord::new(name)
    }

    #[test]
    fn test_play_mode_round_trip() {
        assert_eq!("once".parse::<PlayMode>().unwrap(), PlayMode::Once);
        assert_eq!("Loop".parse::<PlayMode>().unwrap(), PlayMode::Loop);
        assert!("shuffle".parse::<PlayMode>().is_err());
        assert_eq!(PlayMode::Loop.to_string(), "Loop");
        assert_eq!(PlayMode::Once.toggled(), PlayMode::Loop);
    }

    #[test]
    fn test_record_serializes_to_contract_shape() {
        let mut clip = record("kick.wav");
        clip.tags = vec!["drums".to_string(), "intro".to_string()];
        clip.play_mode = PlayMode::Loop;
        clip.start_time = 1.25;
        clip.end_time = Some(4.5);

        let value = serde_json::to_value(&clip).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "kick.wav",
                "tags": ["drums", "intro"],
                "play_mode": "Loop",
                "start_time": 1.25,
                "end_time": 4.5,
            })
        );
    }

    #[test]
    fn test_open_ended_clip_serializes_null_end() {
        let clip = record("pad.flac");
        let value = serde_json::to_value(&clip).unwrap();
        assert_eq!(value["end_time"], json!(null));
        assert_eq!(value["play_mode"], json!("Once"));
    }

    #[test]
    fn test_missing_fields_take_defaults() {
        let clip: ClipRecord = serde_json::from_str(r#"{"name": "riser.wav"}"#).unwrap();
        assert_eq!(clip.name, "riser.wav");
        assert!(clip.tags.is_empty());
        assert_eq!(clip.play_mode, PlayMode::Once);
        assert_eq!(clip.start_time, 0.0);
        assert_eq!(clip.end_time, None);
    }

    #[test]
    fn test_window_ms_round_trip() {
        let mut clip = record("stab.wav");
        clip.set_window_ms(1500, 4250);
        assert_eq!(clip.start_time, 1.5);
        assert_eq!(clip.end_time, Some(4.25));
        assert_eq!(clip.start_ms(), 1500);
        assert_eq!(clip.end_ms(), Some(4250));
    }

    #[test]
    fn test_source_path_joins_name() {
        let clip = record("kick.wav");
        let path = clip.source_path(Path::new("/tmp/livepad/music"));
        assert_eq!(path, PathBuf::from("/tmp/livepad/music/kick.wav"));
    }

    #[test]
    fn test_add_and_find_preserve_order() {
        let mut store = ClipStore::new();
        store.add(record("a.wav"));
        store.add(record("b.wav"));
        store.add(record("c.wav"));

        assert_eq!(store.len(), 3);
        assert_eq!(store.get(1).unwrap().name, "b.wav");
        assert_eq!(store.find("c.wav").unwrap().name, "c.wav");
        assert!(store.find("missing.wav").is_none());
    }

    #[test]
    fn test_duplicate_names_resolve_to_first() {
        let mut store = ClipStore::new();
        let mut first = record("kick.wav");
        first.start_time = 1.0;
        store.add(first);
        store.add(record("kick.wav"));

        assert_eq!(store.len(), 2);
        assert_eq!(store.find("kick.wav").unwrap().start_time, 1.0);
    }

    #[test]
    fn test_remove_returns_record() {
        let mut store = ClipStore::new();
        store.add(record("a.wav"));
        store.add(record("b.wav"));

        let removed = store.remove("a.wav").unwrap();
        assert_eq!(removed.name, "a.wav");
        assert_eq!(store.len(), 1);
        assert!(store.remove("a.wav").is_none());
    }

    #[test]
    fn test_observers_hear_adds_and_removes() {
        let seen: Rc<RefCell<Vec<String>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);

        let mut store = ClipStore::new();
        store.subscribe(move |event| {
            let line = match event {
                StoreEvent::Added(clip) => format!("added {}", clip.name),
                StoreEvent::Removed(clip) => format!("removed {}", clip.name),
            };
            sink.borrow_mut().push(line);
        });

        store.add(record("a.wav"));
        store.add(record("b.wav"));
        store.remove("a.wav");

        assert_eq!(
            *seen.borrow(),
            vec!["added a.wav", "added b.wav", "removed a.wav"]
        );
    }

    #[test]
    fn test_replace_all_announces_each_record() {
        let count: Rc<RefCell<usize>> = Rc::new(RefCell::new(0));
        let sink = Rc::clone(&count);

        let mut store = ClipStore::new();
        store.add(record("old.wav"));
        store.subscribe(move |event| {
            if matches!(event, StoreEvent::Added(_)) {
                *sink.borrow_mut() += 1;
            }
        });

        store.replace_all(vec![record("a.wav"), record("b.wav")]);
        assert_eq!(*count.borrow(), 2);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get(0).unwrap().name, "a.wav");
    }

    #[test]
    fn test_all_tags_unique_in_first_seen_order() {
        let mut store = ClipStore::new();
        let mut a = record("a.wav");
        a.tags = vec!["drums".into(), "intro".into()];
        let mut b = record("b.wav");
        b.tags = vec!["intro".into(), "vox".into()];
        store.add(a);
        store.add(b);

        assert_eq!(store.all_tags(), vec!["drums", "intro", "vox"]);
    }
}
