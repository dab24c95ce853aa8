//! Status bar rendering (paging progress and list status)

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Gauge},
    Frame,
};

use crate::model::{BrowseState, ListStatus, Mode, ResultPage};

pub fn render_progress_bar(frame: &mut Frame, area: Rect, browse: &BrowseState) {
    let last_page = browse.total_pages().min(ResultPage::MAX_PAGE);
    let ratio = if last_page > 0 {
        (browse.loaded_page() as f64 / last_page as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let mode = match browse.descriptor().mode {
        Mode::Browsing => "Browse",
        Mode::Searching => "Search",
    };

    let label = if last_page > 0 {
        format!("page {} of {}", browse.loaded_page(), last_page)
    } else {
        String::new()
    };

    let color = if browse.is_loading() {
        Color::Yellow
    } else if matches!(browse.status(), ListStatus::Failed(_)) {
        Color::Red
    } else {
        Color::Green
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} ", browse.status_line()))
                .title_bottom(Line::from(format!(" {} | H for help ", mode)).right_aligned()),
        )
        .gauge_style(Style::default().fg(color))
        .ratio(ratio)
        .label(label);

    frame.render_widget(gauge, area);
}
