use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, MenuAction, PromptKind};
use crate::explorer::DeleteOrigin;
use crate::ui::centered_rect;

pub fn draw_context_menu(f: &mut Frame, target: &str, selected: usize) {
    let area = centered_rect(40, MenuAction::ALL.len() as u16 + 2, f.size());

    let items: Vec<ListItem> = MenuAction::ALL
        .iter()
        .enumerate()
        .map(|(i, action)| {
            let style = if i == selected {
                Style::default()
                    .bg(Color::Green)
                    .fg(Color::Black)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("[{}] ", action.hotkey()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(action.label()),
            ]))
            .style(style)
        })
        .collect();

    let block = Block::default()
        .borders(Borders::ALL)
        .title(target.to_string())
        .title_style(Style::default().add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(Color::Cyan));

    f.render_widget(Clear, area);
    f.render_widget(List::new(items).block(block), area);
}

pub fn draw_prompt(f: &mut Frame, kind: &PromptKind, input: &str) {
    let area = centered_rect(60, 3, f.size());
    let title = match kind {
        PromptKind::CreateDirectory => "New folder name".to_string(),
        PromptKind::Rename(target) => format!("Rename {}", target.name),
        PromptKind::Upload => "Local file to upload".to_string(),
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .title_style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .border_style(Style::default().fg(Color::Yellow));

    f.render_widget(Clear, area);
    f.render_widget(Paragraph::new(format!("{input}_")).block(block), area);
}

pub fn draw_confirmation(f: &mut Frame, app: &App) {
    let Some(pending) = app.explorer.pending_confirmation() else {
        return;
    };
    let area = centered_rect(60, 8, f.size());
    let phrase = app.explorer.confirmation_phrase();

    let subject = match (pending.origin, pending.targets.as_slice()) {
        (DeleteOrigin::ContextMenu, [single]) => format!("'{}' is not empty.", single.name),
        _ => format!(
            "Deleting {} item(s), some folders are not empty.",
            pending.targets.len()
        ),
    };

    let text = vec![
        Line::from(Span::styled(subject, Style::default().fg(Color::White))),
        Line::from(vec![
            Span::raw("Type "),
            Span::styled(
                phrase.to_string(),
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" and press Enter to delete everything inside."),
        ]),
        Line::from(""),
        Line::from(Span::styled(
            format!("> {}_", app.input),
            Style::default().fg(Color::Yellow),
        )),
        Line::from(Span::styled(
            "[Esc] Cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Confirm delete")
        .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
        .border_style(Style::default().fg(Color::Red));

    f.render_widget(Clear, area);
    f.render_widget(
        Paragraph::new(text).block(block).wrap(Wrap { trim: true }),
        area,
    );
}
