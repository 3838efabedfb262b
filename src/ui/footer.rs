use crate::app::{App, InputMode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

pub fn draw_footer(f: &mut Frame, app: &App, area: Rect) {
    let footer = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(area);

    let selecting = app.explorer.selection().is_selecting();
    let (nav_text, action_text) = match app.input_mode {
        InputMode::Normal if selecting => (
            "↑/k: Up  ↓/j: Down  [Space] Mark  [v] Done",
            "[D] Delete marked [O] Download marked [?] Help",
        ),
        InputMode::Normal => (
            "↑/k: Up  ↓/j: Down  [Enter] Open  [h] Back  [/] Filter",
            "[m] Menu [n] New [u] Upload [v] Select [?] Help [q] Quit",
        ),
        InputMode::Filter => ("Type to filter", "[Enter] Keep  [Esc] Clear"),
        InputMode::Prompt(_) => ("Type a name", "[Enter] OK  [Esc] Cancel"),
        InputMode::ContextMenu { .. } => ("↑/k: Up  ↓/j: Down", "[Enter] Run  [Esc] Close"),
        InputMode::Confirm => ("Type the phrase", "[Enter] Delete  [Esc] Cancel"),
        InputMode::Help => ("↑/k ↓/j: Scroll", "[?/Esc] Close"),
    };

    let nav_help = Paragraph::new(nav_text).style(Style::default().fg(Color::Gray));
    let action_help = Paragraph::new(action_text)
        .style(Style::default().fg(Color::Gray))
        .alignment(ratatui::layout::Alignment::Right);

    f.render_widget(nav_help, footer[0]);
    f.render_widget(action_help, footer[1]);
}
