use ratatui::{
    layout::{Constraint, Layout, Margin, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Scrollbar, ScrollbarOrientation},
    Frame,
};

use crate::app::App;

pub fn render_help_popup(f: &mut Frame, app: &App) {
    let block = Block::default()
        .title("Keyboard Shortcuts")
        .borders(Borders::ALL)
        .style(Style::default().fg(Color::White));

    let area = centered_rect(80, 80, f.size());
    f.render_widget(Clear, area); // this clears the background
    f.render_widget(block, area);

    let text = get_help_text(app.explorer.confirmation_phrase());
    let line_count = text.lines.len();

    let paragraph = Paragraph::new(text)
        .style(Style::default().fg(Color::White))
        .scroll((app.help_scroll_position, 0));

    let inner_area = area.inner(&Margin {
        vertical: 1,
        horizontal: 1,
    }); // Get area inside the block borders

    f.render_widget(paragraph, inner_area);

    // Make scrollbar only appear if there is overflow
    if line_count > inner_area.height as usize {
        let mut scrollbar_state = ratatui::widgets::ScrollbarState::new(line_count)
            .position(app.help_scroll_position as usize);

        f.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight)
                .begin_symbol(Some("↑"))
                .end_symbol(Some("↓")),
            inner_area,
            &mut scrollbar_state,
        );
    }
}

fn section(title: &str) -> Line<'static> {
    Line::from(Span::styled(
        title.to_string(),
        Style::default().add_modifier(Modifier::BOLD).fg(Color::Cyan),
    ))
}

fn binding(keys: &str, action: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(format!("  {keys:<10}"), Style::default().fg(Color::Green)),
        Span::raw(format!("- {action}")),
    ])
}

fn get_help_text(phrase: &str) -> Text<'static> {
    Text::from(vec![
        section("Browsing"),
        binding("j, ↓", "Move down"),
        binding("k, ↑", "Move up"),
        binding("Enter", "Open folder (mark entry in select mode)"),
        binding("h, Bksp", "Go to parent folder"),
        binding("/", "Filter entries by name"),
        binding("R", "Reload listing"),
        binding("Esc", "Dismiss message"),
        binding("q", "Quit"),
        Line::from(""),
        section("Entry actions"),
        binding("m", "Open menu for entry under cursor"),
        binding("d", "Delete entry"),
        binding("r", "Rename entry"),
        binding("o", "Download in browser"),
        binding("y", "Copy download link"),
        binding("n", "Create folder"),
        binding("u", "Upload a local file"),
        Line::from(""),
        section("Select Mode"),
        binding("v", "Enter or leave select mode"),
        binding("Space", "Mark or unmark entry"),
        binding("D", "Delete marked entries"),
        binding("O", "Download marked entries"),
        Line::from(""),
        section("Deleting"),
        Line::from(format!(
            "  Folders that are not empty ask you to type {phrase} first."
        )),
        Line::from("  A failed delete stops the batch; press Esc to continue."),
        Line::from(""),
        section("Help Popup"),
        binding("?, Esc", "Toggle/Close help"),
        binding("↑, k", "Scroll up"),
        binding("↓, j", "Scroll down"),
    ])
}

/// helper function to create a centered rect using up certain percentage of the available rect `r`
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(ratatui::layout::Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(ratatui::layout::Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(popup_layout[1])[1]
}
