//! Main application state and control flow for the clip pad.
//!
//! This module coordinates the terminal player: the pad grid that triggers
//! clips, the edit view where a clip's playable window is trimmed, the
//! audio engine, and the save-preset dialog. It owns the event loop,
//! keyboard and mouse dispatch, and the autosave of the working set on
//! exit.

use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers, MouseButton,
        MouseEvent, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use log::{LevelFilter, error, info};
use ratatui::{Terminal, backend::CrosstermBackend, layout::Rect};
use simplelog::{CombinedLogger, WriteLogger};
use std::{error::Error, fs::File, io, path::PathBuf, time::Duration};

use livepad::clip::{ClipStore, PlayMode, StoreEvent};
use livepad::config::Config;
use livepad::constants::{PLAYER_LOG_FILE, RECENT_PRESET};
use livepad::keymap;
use livepad::media::metadata::probe_audio_metadata;
use livepad::preset::PresetManager;
use livepad::selector::{Orientation, RangeSelector, SelectorChange};

use super::audio::AudioEngine;
use super::preset_dialog::{DialogFocus, PresetDialog};
use super::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    /// The pad grid: every key press fires a clip.
    Pads,
    /// Window editing for the highlighted clip.
    Edit,
}

/// What the player should do with the active clip on this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryAction {
    None,
    Restart,
    Stop,
}

/// Decide what happens when playback crosses the end of the clip window
/// or runs out of samples. An `end_ms` of `None` means the window runs to
/// the end of the file, so only sink exhaustion can end it.
pub fn check_window_boundary(
    position_ms: i64,
    end_ms: Option<i64>,
    mode: PlayMode,
    finished: bool,
) -> BoundaryAction {
    let past_end = end_ms.is_some_and(|end| position_ms >= end);
    if !past_end && !finished {
        return BoundaryAction::None;
    }
    match mode {
        PlayMode::Loop => BoundaryAction::Restart,
        PlayMode::Once => BoundaryAction::Stop,
    }
}

pub struct App {
    pub should_quit: bool,
    pub mode: ViewMode,
    pub store: ClipStore,
    pub preset_name: String,
    /// Unsaved window, tag, or ordering edits since the last save.
    pub dirty: bool,
    /// Position of the highlighted row within `filtered`.
    pub selected: usize,
    pub filter: String,
    pub filter_active: bool,
    /// Store indices currently visible, best fuzzy match first.
    pub filtered: Vec<usize>,
    pub selector: RangeSelector,
    /// Inner rect of the selector bar from the last draw, for mouse hits.
    pub selector_area: Option<Rect>,
    pub audio: Option<AudioEngine>,
    /// Store index of the clip loaded in the engine.
    pub playing: Option<usize>,
    pub is_playing: bool,
    pub position_ms: i64,
    /// Probed duration of the highlighted clip, backing the selector range.
    pub selected_duration_ms: i64,
    /// Duration of the clip loaded in the engine.
    pub playing_duration_ms: i64,
    pub status: Option<String>,
    pub save_dialog: Option<PresetDialog>,
    pub config: Config,
    pub manager: PresetManager,
}

impl App {
    pub fn new(preset_name: String, store: ClipStore, config: Config, manager: PresetManager) -> Self {
        let mut app = Self {
            should_quit: false,
            mode: ViewMode::Pads,
            store,
            preset_name,
            dirty: false,
            selected: 0,
            filter: String::new(),
            filter_active: false,
            filtered: Vec::new(),
            selector: RangeSelector::new(Orientation::Horizontal),
            selector_area: None,
            audio: None,
            playing: None,
            is_playing: false,
            position_ms: 0,
            selected_duration_ms: 0,
            playing_duration_ms: 0,
            status: None,
            save_dialog: None,
            config,
            manager,
        };
        app.apply_filter();
        app
    }

    /// Store index of the highlighted row, if any rows are visible.
    pub fn selected_store_index(&self) -> Option<usize> {
        self.filtered.get(self.selected).copied()
    }

    /// Recompute the visible rows from the filter text. An empty filter
    /// shows the store in pad order; otherwise rows are ranked by fuzzy
    /// match against the clip name and tags.
    pub fn apply_filter(&mut self) {
        if self.filter.is_empty() {
            self.filtered = (0..self.store.len()).collect();
        } else {
            let matcher = SkimMatcherV2::default();
            let mut scored: Vec<(i64, usize)> = self
                .store
                .iter()
                .enumerate()
                .filter_map(|(index, record)| {
                    let haystack = format!("{} {}", record.name, record.tags.join(" "));
                    matcher
                        .fuzzy_match(&haystack, &self.filter)
                        .map(|score| (score, index))
                })
                .collect();
            scored.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)));
            self.filtered = scored.into_iter().map(|(_, index)| index).collect();
        }
        if self.selected >= self.filtered.len() {
            self.selected = self.filtered.len().saturating_sub(1);
        }
        self.sync_selector_to_selected();
    }

    pub fn select_next(&mut self) {
        if !self.filtered.is_empty() && self.selected + 1 < self.filtered.len() {
            self.selected += 1;
            self.sync_selector_to_selected();
        }
    }

    pub fn select_prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            self.sync_selector_to_selected();
        }
    }

    pub fn set_mode(&mut self, mode: ViewMode) {
        if self.mode != mode {
            self.mode = mode;
            if mode == ViewMode::Edit {
                self.sync_selector_to_selected();
            }
        }
    }

    /// Re-seed the selector from the highlighted clip: range from the
    /// probed file duration, marks from the stored window. A clip whose
    /// file cannot be probed collapses the range to zero.
    pub fn sync_selector_to_selected(&mut self) {
        let Some(index) = self.selected_store_index() else {
            self.selected_duration_ms = 0;
            let _ = self.selector.set_range(0, 0);
            return;
        };
        let Some(record) = self.store.get(index) else {
            return;
        };
        let source = record.source_path(&self.config.music_dir());
        let duration = probe_audio_metadata(&source)
            .ok()
            .and_then(|meta| meta.duration_ms())
            .unwrap_or(0);
        let start = record.start_ms();
        let end = record.end_ms().unwrap_or(duration);

        self.selected_duration_ms = duration;
        let _ = self.selector.set_range(0, duration);
        let _ = self.selector.set_lower(0);
        let _ = self.selector.set_upper(end);
        let _ = self.selector.set_lower(start.min(end));
        let _ = self.selector.set_cursor(start);
    }

    /// Load and start the clip at `store_index` from its window start.
    /// Failures land in the status line rather than tearing down the TUI.
    pub fn trigger_pad(&mut self, store_index: usize) {
        let Some(record) = self.store.get(store_index) else {
            return;
        };
        let name = record.name.clone();
        let start = record.start_ms();
        let source = record.source_path(&self.config.music_dir());

        if self.audio.is_none() {
            match AudioEngine::new() {
                Ok(engine) => self.audio = Some(engine),
                Err(e) => {
                    error!("Audio device unavailable: {e}");
                    self.status = Some(format!("Audio device unavailable: {e}"));
                    return;
                }
            }
        }
        let Some(engine) = &mut self.audio else {
            return;
        };
        match engine.load_clip(&source, start) {
            Ok(()) => {
                engine.play();
                self.playing = Some(store_index);
                self.is_playing = true;
                self.position_ms = start;
                self.status = Some(format!("▶ {name}"));
            }
            Err(e) => {
                error!("Failed to load {}: {e}", source.display());
                self.status = Some(format!("Cannot play {name}: {e}"));
            }
        }
    }

    pub fn trigger_selected(&mut self) {
        if let Some(index) = self.selected_store_index() {
            self.trigger_pad(index);
        }
    }

    pub fn toggle_playback(&mut self) {
        let Some(engine) = &mut self.audio else {
            return;
        };
        if self.is_playing {
            engine.pause();
            self.is_playing = false;
        } else {
            engine.play();
            self.is_playing = true;
        }
    }

    pub fn stop_playback(&mut self) {
        if let Some(engine) = &mut self.audio {
            engine.stop();
        }
        self.is_playing = false;
        self.position_ms = 0;
    }

    /// Advance playback state and apply the window rule for the active
    /// clip: loop back to the window start, or stop, when the position
    /// passes the window end or the file runs out.
    pub fn tick(&mut self) {
        let (position, finished, engine_duration) = match &self.audio {
            Some(engine) => (
                engine.position_ms(),
                engine.is_finished(),
                engine.duration_ms(),
            ),
            None => return,
        };
        self.position_ms = position;
        self.playing_duration_ms = engine_duration.unwrap_or(0);

        // The cursor shadows playback only while the highlighted clip is
        // the one playing and nobody is dragging it.
        let playing_selected = self.playing.is_some() && self.playing == self.selected_store_index();
        if self.is_playing && playing_selected && self.selector.active_handle().is_none() {
            let _ = self.selector.set_cursor(position);
        }

        if !self.is_playing {
            return;
        }
        let Some((start, end, mode)) = self
            .playing
            .and_then(|index| self.store.get(index))
            .map(|record| (record.start_ms(), record.end_ms(), record.play_mode))
        else {
            return;
        };

        match check_window_boundary(position, end, mode, finished) {
            BoundaryAction::Restart => {
                if let Some(engine) = &mut self.audio
                    && engine.seek_to_ms(start).is_ok()
                {
                    engine.play();
                    self.position_ms = start;
                }
            }
            BoundaryAction::Stop => self.stop_playback(),
            BoundaryAction::None => {}
        }
    }

    /// Pin the window start to the cursor and write it through.
    pub fn mark_window_start(&mut self) {
        let cursor = self.selector.cursor_value();
        if self.selector.set_lower(cursor).is_some() {
            self.commit_selection();
            self.status = Some(format!("Window start {:.1}s", cursor as f64 / 1000.0));
        }
    }

    /// Pin the window end to the cursor and write it through.
    pub fn mark_window_end(&mut self) {
        let cursor = self.selector.cursor_value();
        if self.selector.set_upper(cursor).is_some() {
            self.commit_selection();
            self.status = Some(format!("Window end {:.1}s", cursor as f64 / 1000.0));
        }
    }

    /// Write the selector's lower and upper marks into the highlighted
    /// clip's stored window.
    pub fn commit_selection(&mut self) {
        let Some(index) = self.selected_store_index() else {
            return;
        };
        let lower = self.selector.lower_value();
        let upper = self.selector.upper_value();
        if let Some(record) = self.store.get_mut(index) {
            record.set_window_ms(lower, upper);
            self.dirty = true;
        }
    }

    /// Scrub preview: seek playback to a marker's new value, starting the
    /// highlighted clip first if it is not the one loaded.
    pub fn apply_selector_change(&mut self, change: SelectorChange) {
        self.preview_at(change.value());
    }

    pub fn nudge_cursor(&mut self, delta_ms: i64) {
        let target = self.selector.cursor_value().saturating_add(delta_ms);
        if let Some(change) = self.selector.set_cursor(target) {
            self.preview_at(change.value());
        }
    }

    fn preview_at(&mut self, target_ms: i64) {
        let Some(index) = self.selected_store_index() else {
            return;
        };
        if self.playing != Some(index) {
            self.trigger_pad(index);
        }
        if let Some(engine) = &mut self.audio {
            match engine.seek_to_ms(target_ms) {
                Ok(()) => {
                    engine.play();
                    self.is_playing = true;
                    self.position_ms = target_ms;
                }
                Err(e) => error!("Seek failed: {e}"),
            }
        }
    }

    pub fn toggle_selected_play_mode(&mut self) {
        let Some(index) = self.selected_store_index() else {
            return;
        };
        if let Some(record) = self.store.get_mut(index) {
            record.play_mode = record.play_mode.toggled();
            self.dirty = true;
            self.status = Some(format!("{}: {}", record.name, record.play_mode));
        }
    }

    pub fn remove_selected(&mut self) {
        let Some(index) = self.selected_store_index() else {
            return;
        };
        if self.playing == Some(index) {
            self.stop_playback();
            self.playing = None;
        }
        if let Some(removed) = self.store.remove_at(index) {
            self.status = Some(format!("Removed {}", removed.name));
            self.dirty = true;
        }
        // The engine's clip keeps its identity across the removal.
        if let Some(playing) = self.playing
            && playing > index
        {
            self.playing = Some(playing - 1);
        }
        self.apply_filter();
    }

    pub fn open_save_dialog(&mut self) {
        let existing = self.manager.list().unwrap_or_default();
        let suggested = if self.preset_name == RECENT_PRESET {
            String::new()
        } else {
            self.preset_name.clone()
        };
        self.save_dialog = Some(PresetDialog::new(suggested, existing));
    }

    /// Save the working set under the dialog's name. Validation failures
    /// keep the dialog open with the reason in the status line.
    pub fn execute_save(&mut self) {
        let Some(dialog) = &self.save_dialog else {
            return;
        };
        let name = dialog.name.trim().to_string();
        match self.manager.save(&name, self.store.records()) {
            Ok(path) => {
                info!("Saved preset '{name}' to {}", path.display());
                self.preset_name = name;
                self.dirty = false;
                self.status = Some(format!("Saved preset '{}'", self.preset_name));
                self.save_dialog = None;
            }
            Err(e) => {
                self.status = Some(format!("Save failed: {e}"));
            }
        }
    }

    /// Autosave the working set to the recent preset.
    pub fn autosave(&self) -> Result<PathBuf, Box<dyn Error>> {
        self.manager.save(RECENT_PRESET, self.store.records())
    }
}

pub fn run_with_preset(preset: Option<&str>) -> Result<(), Box<dyn Error>> {
    init_logging()?;
    info!("Starting livepad player");

    let config = Config::load()?;
    let manager = PresetManager::new(config.preset_dir())?;
    let preset_name = preset.unwrap_or(RECENT_PRESET).to_string();
    let records = if preset.is_some() || config.autoload_recent {
        manager.load(&preset_name)?
    } else {
        Vec::new()
    };
    info!("Loaded preset '{preset_name}' with {} clips", records.len());

    let mut store = ClipStore::new();
    store.subscribe(|event| match event {
        StoreEvent::Added(clip) => info!("Clip added: {}", clip.name),
        StoreEvent::Removed(clip) => info!("Clip removed: {}", clip.name),
    });
    for record in records {
        store.add(record);
    }

    let mut app = App::new(preset_name, store, config, manager);

    // Set up terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal before reporting anything
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;

    let path = app.autosave()?;
    info!("Autosaved working set to {}", path.display());
    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(Duration::from_millis(50))? {
            match event::read()? {
                Event::Key(key) => handle_key_event(app, key),
                Event::Mouse(mouse) => handle_mouse_event(app, mouse),
                _ => {}
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key_event(app: &mut App, key: event::KeyEvent) {
    if app.save_dialog.is_some() {
        handle_save_dialog_keys(app, key);
        return;
    }
    match app.mode {
        ViewMode::Pads => handle_pads_keys(app, key),
        ViewMode::Edit => handle_edit_keys(app, key),
    }
}

/// In the pad view every mapped letter fires a clip, so quit lives on
/// Esc rather than 'q'.
fn handle_pads_keys(app: &mut App, key: event::KeyEvent) {
    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Tab => app.set_mode(ViewMode::Edit),
        KeyCode::Char(' ') => app.toggle_playback(),
        KeyCode::Char(c) => {
            if let Some(index) = keymap::pad_index(c)
                && index < app.store.len()
            {
                app.trigger_pad(index);
            }
        }
        _ => {}
    }
}

fn handle_edit_keys(app: &mut App, key: event::KeyEvent) {
    if app.filter_active {
        match key.code {
            KeyCode::Esc => {
                app.filter_active = false;
                app.filter.clear();
                app.apply_filter();
            }
            KeyCode::Enter => app.filter_active = false,
            KeyCode::Backspace => {
                app.filter.pop();
                app.apply_filter();
            }
            KeyCode::Char(c) => {
                app.filter.push(c);
                app.apply_filter();
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Esc | KeyCode::Tab => app.set_mode(ViewMode::Pads),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Enter => app.trigger_selected(),
        KeyCode::Char(' ') => app.toggle_playback(),
        KeyCode::Char('[') => app.mark_window_start(),
        KeyCode::Char(']') => app.mark_window_end(),
        KeyCode::Char('m') => app.toggle_selected_play_mode(),
        KeyCode::Char('d') => app.remove_selected(),
        KeyCode::Char('/') => app.filter_active = true,
        KeyCode::Char('s') => app.open_save_dialog(),
        KeyCode::Left => {
            let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
                -2000
            } else {
                -250
            };
            app.nudge_cursor(step);
        }
        KeyCode::Right => {
            let step = if key.modifiers.contains(KeyModifiers::SHIFT) {
                2000
            } else {
                250
            };
            app.nudge_cursor(step);
        }
        _ => {}
    }
}

fn handle_save_dialog_keys(app: &mut App, key: event::KeyEvent) {
    if let Some(dialog) = &mut app.save_dialog {
        match key.code {
            KeyCode::Esc => app.save_dialog = None,
            KeyCode::Tab => dialog.toggle_focus(),
            KeyCode::Up => dialog.navigate_up(),
            KeyCode::Down => dialog.navigate_down(),
            KeyCode::Backspace => dialog.pop_char(),
            KeyCode::Enter => {
                if dialog.focus == DialogFocus::PresetList {
                    dialog.adopt_selected();
                } else {
                    app.execute_save();
                }
            }
            KeyCode::Char(c) => dialog.push_char(c),
            _ => {}
        }
    }
}

/// Mouse drags on the selector bar move whichever mark is closest to the
/// press; releasing writes the window through to the clip.
fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    if app.mode != ViewMode::Edit || app.save_dialog.is_some() {
        return;
    }
    let Some(area) = app.selector_area else {
        return;
    };
    let position = mouse.column as f64 - area.x as f64;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            let inside_rows = mouse.row >= area.y && mouse.row < area.y + area.height;
            let inside_cols = mouse.column >= area.x && mouse.column < area.x + area.width;
            if inside_rows && inside_cols {
                let _ = app.selector.begin_drag(position);
            }
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            if let Some(change) = app.selector.drag_to(position) {
                app.apply_selector_change(change);
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if app.selector.active_handle().is_some() {
                app.selector.end_drag();
                app.commit_selection();
            }
        }
        _ => {}
    }
}

fn init_logging() -> Result<(), Box<dyn Error>> {
    let log_file = File::create(PLAYER_LOG_FILE)?;
    CombinedLogger::init(vec![WriteLogger::new(
        LevelFilter::Debug,
        simplelog::Config::default(),
        log_file,
    )])?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use livepad::clip::ClipRecord;
    use tempfile::TempDir;

    fn clip(name: &str, tags: &[&str]) -> ClipRecord {
        let mut record = ClipRecord::new(name);
        record.tags = tags.iter().map(|t| t.to_string()).collect();
        record.end_time = Some(4.0);
        record
    }

    fn test_app(dir: &TempDir) -> App {
        let config = Config {
            work_dir: dir.path().to_string_lossy().into_owned(),
            default_play_mode: "once".to_string(),
            autoload_recent: true,
            normalize_clip_names: false,
        };
        let manager = PresetManager::new(dir.path().join("presets")).unwrap();
        let mut store = ClipStore::new();
        store.add(clip("kick", &["drums"]));
        store.add(clip("pad_warm", &["ambient"]));
        store.add(clip("riser", &["fx"]));
        App::new(RECENT_PRESET.to_string(), store, config, manager)
    }

    #[test]
    fn test_boundary_within_window_keeps_playing() {
        let action = check_window_boundary(1_000, Some(4_000), PlayMode::Once, false);
        assert_eq!(action, BoundaryAction::None);
    }

    #[test]
    fn test_boundary_loop_restarts_at_window_end() {
        let action = check_window_boundary(4_000, Some(4_000), PlayMode::Loop, false);
        assert_eq!(action, BoundaryAction::Restart);
    }

    #[test]
    fn test_boundary_once_stops_at_window_end() {
        let action = check_window_boundary(4_200, Some(4_000), PlayMode::Once, false);
        assert_eq!(action, BoundaryAction::Stop);
    }

    #[test]
    fn test_boundary_open_window_runs_to_file_end() {
        assert_eq!(
            check_window_boundary(90_000, None, PlayMode::Once, false),
            BoundaryAction::None
        );
        assert_eq!(
            check_window_boundary(90_000, None, PlayMode::Once, true),
            BoundaryAction::Stop
        );
    }

    #[test]
    fn test_boundary_loop_restarts_on_file_end() {
        let action = check_window_boundary(90_000, None, PlayMode::Loop, true);
        assert_eq!(action, BoundaryAction::Restart);
    }

    #[test]
    fn test_selection_clamps_at_both_ends() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        app.select_prev();
        assert_eq!(app.selected, 0);

        app.select_next();
        app.select_next();
        app.select_next();
        assert_eq!(app.selected, 2);
    }

    #[test]
    fn test_filter_matches_names_and_tags() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        app.filter = "drum".to_string();
        app.apply_filter();
        assert_eq!(app.filtered, vec![0]);

        app.filter = "ambient".to_string();
        app.apply_filter();
        assert_eq!(app.filtered, vec![1]);

        app.filter.clear();
        app.apply_filter();
        assert_eq!(app.filtered, vec![0, 1, 2]);
    }

    #[test]
    fn test_filter_keeps_selection_in_bounds() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.selected = 2;

        app.filter = "kick".to_string();
        app.apply_filter();
        assert_eq!(app.filtered.len(), 1);
        assert_eq!(app.selected, 0);
    }

    #[test]
    fn test_marks_write_window_to_record() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.selector.set_range(0, 4_000).unwrap();
        let _ = app.selector.set_upper(4_000);

        let _ = app.selector.set_cursor(1_000);
        app.mark_window_start();
        let _ = app.selector.set_cursor(3_500);
        app.mark_window_end();

        let record = app.store.get(0).unwrap();
        assert_eq!(record.start_time, 1.0);
        assert_eq!(record.end_time, Some(3.5));
        assert!(app.dirty);
    }

    #[test]
    fn test_toggle_play_mode_marks_dirty() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        app.toggle_selected_play_mode();
        assert_eq!(app.store.get(0).unwrap().play_mode, PlayMode::Loop);
        assert!(app.dirty);

        app.toggle_selected_play_mode();
        assert_eq!(app.store.get(0).unwrap().play_mode, PlayMode::Once);
    }

    #[test]
    fn test_remove_shifts_playing_index() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.playing = Some(2);

        app.remove_selected();
        assert_eq!(app.store.len(), 2);
        assert_eq!(app.playing, Some(1));
        assert!(app.dirty);
    }

    #[test]
    fn test_remove_playing_clip_stops_playback() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.playing = Some(0);
        app.is_playing = true;

        app.remove_selected();
        assert_eq!(app.playing, None);
        assert!(!app.is_playing);
    }

    #[test]
    fn test_save_dialog_suggests_named_preset() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        app.open_save_dialog();
        assert_eq!(app.save_dialog.as_ref().unwrap().name, "");

        app.save_dialog = None;
        app.preset_name = "gig".to_string();
        app.open_save_dialog();
        assert_eq!(app.save_dialog.as_ref().unwrap().name, "gig");
    }

    #[test]
    fn test_execute_save_rejects_empty_name() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        app.open_save_dialog();
        app.execute_save();

        assert!(app.save_dialog.is_some());
        assert!(app.status.as_deref().is_some_and(|s| s.starts_with("Save failed")));
        assert_eq!(app.preset_name, RECENT_PRESET);
    }

    #[test]
    fn test_execute_save_writes_preset() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        app.dirty = true;

        app.open_save_dialog();
        if let Some(dialog) = &mut app.save_dialog {
            dialog.name = "warmup".to_string();
        }
        app.execute_save();

        assert!(app.save_dialog.is_none());
        assert_eq!(app.preset_name, "warmup");
        assert!(!app.dirty);
        assert!(app.manager.exists("warmup"));
    }

    #[test]
    fn test_autosave_round_trips_working_set() {
        let dir = TempDir::new().unwrap();
        let app = test_app(&dir);

        app.autosave().unwrap();
        let records = app.manager.load(RECENT_PRESET).unwrap();
        let names: Vec<&str> = records.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["kick", "pad_warm", "riser"]);
    }

    #[test]
    fn test_mode_switch_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);

        app.set_mode(ViewMode::Edit);
        assert_eq!(app.mode, ViewMode::Edit);
        app.set_mode(ViewMode::Edit);
        assert_eq!(app.mode, ViewMode::Edit);
        app.set_mode(ViewMode::Pads);
        assert_eq!(app.mode, ViewMode::Pads);
    }
}
