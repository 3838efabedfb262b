pub mod footer;
pub mod help_popup;
pub mod listing;
pub mod popups;
pub mod status_bar;

use crate::app::{App, InputMode};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(3), // Breadcrumb and filter
                Constraint::Min(3),    // Listing
                Constraint::Length(1), // Status bar
                Constraint::Length(1), // Footer
            ]
            .as_ref(),
        )
        .split(f.size());

    listing::draw_header(f, app, chunks[0]);
    listing::draw_listing(f, app, chunks[1]);
    status_bar::draw_status_bar(f, app, chunks[2]);
    footer::draw_footer(f, app, chunks[3]);

    match &app.input_mode {
        InputMode::Help => help_popup::render_help_popup(f, app),
        InputMode::ContextMenu { target, selected } => {
            popups::draw_context_menu(f, &target.name, *selected)
        }
        InputMode::Prompt(kind) => popups::draw_prompt(f, kind, &app.input),
        InputMode::Confirm => popups::draw_confirmation(f, app),
        InputMode::Normal | InputMode::Filter => {}
    }
}

/// Helper function to center a rectangle with given width and height
pub fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length((r.height.saturating_sub(height)) / 2),
                Constraint::Length(height),
                Constraint::Length((r.height.saturating_sub(height)) / 2),
            ]
            .as_ref(),
        )
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
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
