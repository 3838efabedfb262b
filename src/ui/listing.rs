use chrono::Local;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::app::{App, InputMode};
use crate::explorer::DeletePhase;
use crate::models::Entry;

pub fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let parts = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(area);

    let mut crumbs = vec![Span::styled(
        "/",
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )];
    for (i, segment) in app.explorer.path().segments().iter().enumerate() {
        if i > 0 {
            crumbs.push(Span::styled(" / ", Style::default().fg(Color::DarkGray)));
        }
        crumbs.push(Span::styled(
            segment.as_str(),
            Style::default().fg(Color::Cyan),
        ));
    }
    let activity = match app.explorer.delete_phase() {
        DeletePhase::Probing { .. } => Some("  checking folders..."),
        DeletePhase::Deleting { .. } => Some("  deleting..."),
        DeletePhase::Idle | DeletePhase::AwaitingConfirmation(_) => None,
    }
    .or(app.explorer.is_loading().then_some("  loading..."));
    if let Some(activity) = activity {
        crumbs.push(Span::styled(activity, Style::default().fg(Color::Yellow)));
    }

    let path_block = Block::default()
        .borders(Borders::ALL)
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .title("cloudnav");
    f.render_widget(Paragraph::new(Line::from(crumbs)).block(path_block), parts[0]);

    let editing = app.input_mode == InputMode::Filter;
    let filter_text = if editing {
        format!("{}_", app.input)
    } else {
        app.explorer.filter().to_string()
    };
    let filter_block = Block::default()
        .borders(Borders::ALL)
        .title("Filter [/]")
        .border_style(Style::default().fg(if editing {
            Color::Yellow
        } else {
            Color::Gray
        }));
    f.render_widget(Paragraph::new(filter_text).block(filter_block), parts[1]);
}

pub fn draw_listing(f: &mut Frame, app: &mut App, area: Rect) {
    let selecting = app.explorer.selection().is_selecting();
    let title = if selecting {
        format!(
            "Select mode: {} marked [Space] toggle [D] delete [O] download",
            app.explorer.selection().len()
        )
    } else {
        format!("{} item(s)", app.explorer.listing().len())
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(if selecting {
            Color::Magenta
        } else {
            Color::White
        }));

    let listing = app.explorer.listing();
    if listing.is_empty() {
        let message = if app.explorer.is_loading() {
            "Loading..."
        } else if app.explorer.filter().is_empty() {
            "This folder is empty"
        } else {
            "No entries match the filter"
        };
        let paragraph = Paragraph::new(message)
            .block(block)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(ratatui::layout::Alignment::Center);
        f.render_widget(paragraph, area);
        return;
    }

    let name_width = area.width.saturating_sub(40) as usize;
    let items: Vec<ListItem> = listing
        .entries
        .iter()
        .map(|entry| {
            let mut spans = Vec::new();
            if selecting {
                let marked = app.explorer.selection().contains(&entry.key());
                spans.push(Span::styled(
                    if marked { "[x] " } else { "[ ] " },
                    Style::default().fg(Color::Magenta),
                ));
            }
            spans.push(entry_name(entry, name_width));
            spans.push(Span::styled(
                format!("{:>10}", entry.size.map(format_size).unwrap_or_default()),
                Style::default().fg(Color::Gray),
            ));
            spans.push(Span::styled(
                format!("  {}", format_modified(entry)),
                Style::default().fg(Color::DarkGray),
            ));
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_symbol("> ")
        .highlight_style(
            Style::default()
                .bg(Color::Green)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

    f.render_stateful_widget(list, area, &mut app.list_state);
}

fn entry_name(entry: &Entry, width: usize) -> Span<'static> {
    let (label, style) = if entry.is_dir {
        (
            format!("{}/", entry.name),
            Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        (entry.name.clone(), Style::default().fg(Color::White))
    };
    Span::styled(format!("{:<width$}", truncate(&label, width)), style)
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let kept: String = text.chars().take(width.saturating_sub(1)).collect();
    format!("{kept}~")
}

fn format_modified(entry: &Entry) -> String {
    entry
        .modified_at
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

pub fn format_size(bytes: u64) -> String {
    const UNITS: [&str; 5] = ["B", "KB", "MB", "GB", "TB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }
    if unit == 0 {
        format!("{bytes} B")
    } else {
        format!("{value:.1} {}", UNITS[unit])
    }
}
