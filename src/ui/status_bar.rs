use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::explorer::NoticeKind;

pub fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    // Expired notices are dropped by the run loop, so anything left is shown
    let Some(notice) = app.explorer.notice() else {
        return;
    };

    let (style, text) = match notice.kind {
        NoticeKind::Info => (Style::default().fg(Color::Yellow), notice.text.clone()),
        NoticeKind::Success => (Style::default().fg(Color::Green), notice.text.clone()),
        NoticeKind::Failure => (Style::default().fg(Color::Red), notice.text.clone()),
        NoticeKind::Blocking => (
            Style::default()
                .fg(Color::White)
                .bg(Color::Red)
                .add_modifier(Modifier::BOLD),
            format!("{}  [Esc] dismiss", notice.text),
        ),
    };

    let paragraph = Paragraph::new(text)
        .style(style)
        .alignment(ratatui::layout::Alignment::Center);
    f.render_widget(paragraph, area);
}
