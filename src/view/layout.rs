//! Layout rendering (top bar with search input, sort and genre selectors)

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, BrowseState, Mode, UiState, genre_name};

fn border_style(active: bool) -> Style {
    if active {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    }
}

pub fn render_top_bar(frame: &mut Frame, area: Rect, ui_state: &UiState, browse: &BrowseState) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Search input
            Constraint::Length(24), // Sort selector
            Constraint::Length(24), // Genre selector
        ])
        .split(area);

    let search_active = ui_state.active_section == ActiveSection::Search;
    let search_style = if search_active {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::White)
    };

    let search_text = if ui_state.search_input.is_empty() {
        "Type to search movies..."
    } else {
        &ui_state.search_input
    };

    let search = Paragraph::new(search_text)
        .style(search_style)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Search ")
                .padding(Padding::horizontal(1))
                .border_style(border_style(search_active)),
        );
    frame.render_widget(search, chunks[0]);

    // Sort and genre are inert while a search is shown
    let inert = browse.descriptor().mode == Mode::Searching;
    let descriptor = browse.descriptor();

    let sort = selector(
        " Sort ",
        descriptor.sort.label(),
        ui_state.active_section == ActiveSection::Sort,
        inert,
    );
    frame.render_widget(sort, chunks[1]);

    let genre_label = descriptor
        .genre
        .and_then(genre_name)
        .unwrap_or("All genres");
    let genre = selector(
        " Genre ",
        genre_label,
        ui_state.active_section == ActiveSection::Genre,
        inert,
    );
    frame.render_widget(genre, chunks[2]);
}

fn selector<'a>(title: &'a str, value: &'a str, active: bool, inert: bool) -> Paragraph<'a> {
    let value_style = if inert {
        Style::default().fg(Color::DarkGray)
    } else if active {
        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(Color::Cyan)
    };

    let line = if active {
        Line::from(vec![
            Span::styled("◀ ", Style::default().fg(Color::Green)),
            Span::styled(value, value_style),
            Span::styled(" ▶", Style::default().fg(Color::Green)),
        ])
    } else {
        Line::from(Span::styled(value, value_style))
    };

    Paragraph::new(line).block(
        Block::default()
            .borders(Borders::ALL)
            .title(title)
            .padding(Padding::horizontal(1))
            .border_style(border_style(active)),
    )
}
