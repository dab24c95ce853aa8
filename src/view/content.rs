//! Main content area rendering (the movie list)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, ListItem, Padding, Paragraph},
    Frame,
};

use crate::model::{ActiveSection, BrowseState, ListStatus, Mode, MovieSummary, UiState, genre_name};
use super::utils::{calculate_num_width, format_vote, render_scrollable_list, truncate_string};

pub fn render_main_content(frame: &mut Frame, area: Rect, ui_state: &UiState, browse: &BrowseState) {
    let is_focused = ui_state.active_section == ActiveSection::Results;
    let border_style = if is_focused {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(list_title(browse))
        .padding(Padding::horizontal(1))
        .border_style(border_style);

    if browse.items().is_empty() {
        let color = match browse.status() {
            ListStatus::Failed(_) => Color::Red,
            ListStatus::Loading => Color::Yellow,
            _ => Color::DarkGray,
        };
        let message = match browse.status() {
            ListStatus::Idle => "Type in search and press Enter to find movies".to_string(),
            _ => browse.status_line(),
        };
        let empty = Paragraph::new(message)
            .style(Style::default().fg(color))
            .block(block);
        frame.render_widget(empty, area);
        return;
    }

    let content_width = area.width.saturating_sub(4) as usize;
    let items = render_movie_items(browse.items(), ui_state.results_selected, is_focused, content_width);

    // +1 for header row
    render_scrollable_list(frame, area, items, ui_state.results_selected + 1, block);
}

/// Describes what the list currently shows
pub fn list_title(browse: &BrowseState) -> String {
    let descriptor = browse.descriptor();
    match descriptor.mode {
        Mode::Searching => format!(" Results for \"{}\" ", descriptor.query),
        Mode::Browsing if browse.is_default_feed() => " Now Playing ".to_string(),
        Mode::Browsing => {
            let genre = descriptor.genre.and_then(genre_name).unwrap_or("All genres");
            format!(" {} · {} ", descriptor.sort.label(), genre)
        }
    }
}

fn render_movie_items(
    movies: &[MovieSummary],
    selected: usize,
    is_focused: bool,
    content_width: usize,
) -> Vec<ListItem<'static>> {
    let num_width = calculate_num_width(movies.len());
    let year_width = 4;
    let vote_width = 6;
    let poster_width = 6;
    let fixed_width = 1 + num_width + 3 + 3 + year_width + 3 + vote_width + 3 + poster_width;
    let title_width = content_width.saturating_sub(fixed_width).max(10);

    let mut items = vec![
        ListItem::new(format!(
            " {:<num_width$}   {:<title_width$}   {:>year_width$}   {:>vote_width$}   {:<poster_width$}",
            "#", "Title", "Year", "Rating", "Poster",
        ))
        .style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
    ];

    items.extend(movies.iter().enumerate().map(|(i, movie)| {
        let style = if i == selected && is_focused {
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else if i == selected {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let year = movie
            .release_year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| "----".to_string());
        let poster = if movie.poster_path.is_some() { "yes" } else { "-" };

        ListItem::new(format!(
            " {:<num_width$}   {}   {:>year_width$}   {:>vote_width$}   {:<poster_width$}",
            i + 1,
            truncate_string(&movie.title, title_width),
            year,
            format_vote(movie.vote_average, 1),
            poster,
        ))
        .style(style)
    }));

    items
}
