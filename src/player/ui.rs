use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Gauge, List, ListItem, Paragraph},
};

use livepad::clip::PlayMode;
use livepad::color::color_for_tag;
use livepad::keymap;

use super::app::{App, ViewMode};
use super::preset_dialog::{DialogFocus, PresetDialog};

pub fn draw(f: &mut Frame, app: &mut App) {
    let size = f.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(2), // title
            Constraint::Length(2), // preset and status line
            Constraint::Min(5),    // clip list
            Constraint::Length(3), // window selector / playback progress
            Constraint::Length(4), // controls
        ])
        .split(size);

    draw_title(f, chunks[0]);
    draw_status_line(f, app, chunks[1]);
    draw_clip_list(f, app, chunks[2]);
    draw_transport(f, app, chunks[3]);
    draw_controls(f, app, chunks[4]);

    if let Some(dialog) = &app.save_dialog {
        draw_preset_dialog(f, size, dialog);
    }
}

fn draw_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new("🎵 livepad")
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .alignment(Alignment::Center);
    f.render_widget(title, area);
}

fn draw_status_line(f: &mut Frame, app: &App, area: Rect) {
    let mode_label = match app.mode {
        ViewMode::Pads => Span::styled(
            " PADS ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        ViewMode::Edit => Span::styled(
            " EDIT ",
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
    };
    let dirty = if app.dirty { "*" } else { "" };

    let mut spans = vec![
        mode_label,
        Span::raw(" "),
        Span::styled(
            format!("{}{dirty}", app.preset_name),
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} clips", app.store.len()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if app.filter_active || !app.filter.is_empty() {
        spans.push(Span::styled(
            format!("  /{}", app.filter),
            Style::default().fg(Color::Yellow),
        ));
    }
    if let Some(status) = &app.status {
        spans.push(Span::styled(
            format!("  {status}"),
            Style::default().fg(Color::Green),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_clip_list(f: &mut Frame, app: &App, area: Rect) {
    let items: Vec<ListItem> = app
        .filtered
        .iter()
        .enumerate()
        .map(|(row, &index)| clip_row(app, row, index))
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" clips "),
    );
    f.render_widget(list, area);
}

fn clip_row(app: &App, row: usize, index: usize) -> ListItem<'static> {
    let Some(record) = app.store.get(index) else {
        return ListItem::new("");
    };

    let key = match keymap::pad_key(index) {
        Some(key) => format!(" {key} "),
        None => " · ".to_string(),
    };
    let playing = app.playing == Some(index) && app.is_playing;
    let marker = if playing { "▶ " } else { "  " };

    let mut spans = vec![
        Span::styled(key, Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::styled(marker.to_string(), Style::default().fg(Color::Green)),
        Span::raw(format!("{:<24}", record.name)),
        Span::styled(
            format!("{:<6}", record.play_mode.to_string()),
            Style::default().fg(match record.play_mode {
                PlayMode::Loop => Color::Magenta,
                PlayMode::Once => Color::DarkGray,
            }),
        ),
    ];
    for tag in &record.tags {
        let color = color_for_tag(tag);
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("[{tag}]"),
            Style::default().fg(Color::Rgb(color.r, color.g, color.b)),
        ));
    }

    let mut item = ListItem::new(Line::from(spans));
    if app.mode == ViewMode::Edit && row == app.selected {
        item = item.style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));
    }
    item
}

fn draw_transport(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(10), Constraint::Length(17)])
        .split(area);

    match app.mode {
        ViewMode::Edit => draw_window_selector(f, app, chunks[0]),
        ViewMode::Pads => draw_playback_progress(f, app, chunks[0]),
    }
    draw_time_box(f, app, chunks[1]);
}

/// The window selector: a progress bar for the cursor with the lower and
/// upper window marks drawn over it. The inner rect is recorded on the
/// app so mouse presses can be mapped back to selector positions.
fn draw_window_selector(f: &mut Frame, app: &mut App, area: Rect) {
    let inner = area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    app.selector.set_axis_length(inner.width as f64);
    app.selector_area = Some(inner);

    let span = (app.selector.maximum() - app.selector.minimum()).max(1) as f64;
    let ratio = ((app.selector.cursor_value() - app.selector.minimum()) as f64 / span)
        .clamp(0.0, 1.0);

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" window "),
        )
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(ratio)
        .label("");
    f.render_widget(gauge, area);

    if inner.width == 0 {
        return;
    }
    draw_mark(f, inner, app.selector.offset_for(app.selector.lower_value()), "┃", Color::Green);
    draw_mark(f, inner, app.selector.offset_for(app.selector.upper_value()), "┃", Color::Red);
    draw_mark(
        f,
        inner,
        app.selector.offset_for(app.selector.cursor_value()),
        "█",
        Color::Rgb(120, 170, 255),
    );
}

fn draw_mark(f: &mut Frame, inner: Rect, offset: f64, glyph: &'static str, color: Color) {
    let max_x = inner.width.saturating_sub(1);
    let x = inner.x + (offset.round().max(0.0) as u16).min(max_x);
    let cell = Rect {
        x,
        y: inner.y,
        width: 1,
        height: 1,
    };
    let mark = Paragraph::new(glyph).style(Style::default().fg(color).add_modifier(Modifier::BOLD));
    f.render_widget(mark, cell);
}

fn draw_playback_progress(f: &mut Frame, app: &App, area: Rect) {
    let duration = app.playing_duration_ms;
    let ratio = if duration > 0 {
        (app.position_ms as f64 / duration as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let title = match app.playing.and_then(|index| app.store.get(index)) {
        Some(record) => format!(" {} ", record.name),
        None => " idle ".to_string(),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(title),
        )
        .gauge_style(Style::default().fg(Color::Cyan).bg(Color::Black))
        .ratio(ratio)
        .label("");
    f.render_widget(gauge, area);
}

fn draw_time_box(f: &mut Frame, app: &App, area: Rect) {
    let (position, total) = match app.mode {
        ViewMode::Edit => (app.selector.cursor_value(), app.selected_duration_ms),
        ViewMode::Pads => (app.position_ms, app.playing_duration_ms),
    };
    let time = Paragraph::new(format!("{} / {}", format_time(position), format_time(total)))
        .style(Style::default().fg(Color::White))
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );
    f.render_widget(time, area);
}

/// Format milliseconds as `mm:ss`.
pub fn format_time(ms: i64) -> String {
    let total_seconds = (ms.max(0) / 1000) as u64;
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

fn draw_controls(f: &mut Frame, app: &App, area: Rect) {
    let key = |label: &'static str| {
        Span::styled(label, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD))
    };
    let text = |label: &'static str| Span::styled(label, Style::default().fg(Color::DarkGray));

    let lines = match app.mode {
        ViewMode::Pads => vec![Line::from(vec![
            key("letters"),
            text(" trigger pads  "),
            key("space"),
            text(" pause/resume  "),
            key("tab"),
            text(" edit  "),
            key("esc"),
            text(" quit"),
        ])],
        ViewMode::Edit => vec![
            Line::from(vec![
                key("↑↓"),
                text(" select  "),
                key("enter"),
                text(" play  "),
                key("space"),
                text(" pause  "),
                key("←→"),
                text(" scrub  "),
                key("q"),
                text(" quit"),
            ]),
            Line::from(vec![
                key("["),
                text(" start  "),
                key("]"),
                text(" end  "),
                key("m"),
                text(" mode  "),
                key("d"),
                text(" delete  "),
                key("/"),
                text(" filter  "),
                key("s"),
                text(" save  "),
                key("tab"),
                text(" pads"),
            ]),
        ],
    };

    let controls = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(controls, area);
}

fn draw_preset_dialog(f: &mut Frame, size: Rect, dialog: &PresetDialog) {
    let width = 50.min(size.width.saturating_sub(4));
    let height = 16.min(size.height.saturating_sub(4));
    let area = Rect {
        x: (size.width.saturating_sub(width)) / 2,
        y: (size.height.saturating_sub(height)) / 2,
        width,
        height,
    };

    f.render_widget(Clear, area);
    let block = Block::default()
        .title(" Save Preset ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    f.render_widget(block, area);

    let inner = area.inner(Margin {
        horizontal: 1,
        vertical: 1,
    });
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // name field
            Constraint::Min(3),    // existing presets
            Constraint::Length(1), // controls
        ])
        .split(inner);

    let name_focused = dialog.focus == DialogFocus::NameInput;
    let name_style = if name_focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let name = Paragraph::new(dialog.name.as_str()).block(
        Block::default()
            .title(" name ")
            .borders(Borders::ALL)
            .border_style(name_style),
    );
    f.render_widget(name, chunks[0]);
    if name_focused {
        f.set_cursor_position((chunks[0].x + 1 + dialog.name.len() as u16, chunks[0].y + 1));
    }

    let items: Vec<ListItem> = dialog
        .existing
        .iter()
        .enumerate()
        .map(|(index, preset)| {
            let selected =
                dialog.focus == DialogFocus::PresetList && index == dialog.selected_index;
            let style = if selected {
                Style::default()
                    .fg(Color::Cyan)
                    .bg(Color::DarkGray)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };
            ListItem::new(format!(" {preset}")).style(style)
        })
        .collect();
    let list = List::new(items).block(
        Block::default()
            .title(" existing ")
            .borders(Borders::ALL)
            .border_style(if dialog.focus == DialogFocus::PresetList {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default().fg(Color::DarkGray)
            }),
    );
    f.render_widget(list, chunks[1]);

    let controls = Line::from(vec![
        Span::styled("enter", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled(" save  ", Style::default().fg(Color::DarkGray)),
        Span::styled("tab", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled(" focus  ", Style::default().fg(Color::DarkGray)),
        Span::styled("esc", Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
        Span::styled(" cancel", Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(
        Paragraph::new(controls).alignment(Alignment::Center),
        chunks[2],
    );
}
