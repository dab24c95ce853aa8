//! Overlay rendering (movie detail, error notification, help popup)

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap},
    Frame,
};

use crate::model::{DetailState, MovieDetail, UiState};
use super::utils::{format_runtime, format_vote};

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width.saturating_sub(4));
    let height = height.min(area.height.saturating_sub(4));
    Rect {
        x: area.width.saturating_sub(width) / 2,
        y: area.height.saturating_sub(height) / 2,
        width,
        height,
    }
}

pub fn render_movie_detail(frame: &mut Frame, detail: &DetailState) {
    let area = frame.area();
    let popup_area = centered(area, 80, area.height.saturating_sub(4).max(10));

    let (title, lines) = match detail {
        DetailState::Closed => return,
        DetailState::Loading { .. } => (
            " Loading... ".to_string(),
            vec![Line::from(Span::styled(
                "Loading movie details...",
                Style::default().fg(Color::Yellow),
            ))],
        ),
        DetailState::Open(movie) => (format!(" {} ", movie.title), detail_lines(movie)),
    };

    frame.render_widget(Clear, popup_area);

    let widget = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(title)
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .title_bottom(Line::from(" Esc to close ").right_aligned())
                .padding(Padding::horizontal(1))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(widget, popup_area);
}

fn detail_lines(movie: &MovieDetail) -> Vec<Line<'static>> {
    let label = |name: &'static str| {
        Span::styled(
            format!("{:<10}", name),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        )
    };

    let overview = if movie.overview.is_empty() {
        "No overview available.".to_string()
    } else {
        movie.overview.clone()
    };

    let rating = match movie.vote_average {
        Some(_) => format!("{} ({} votes)", format_vote(movie.vote_average, 2), movie.vote_count),
        None => "N/A".to_string(),
    };

    let trailer = movie
        .trailer_url
        .clone()
        .unwrap_or_else(|| "No trailer available.".to_string());

    let poster = movie.poster_url().unwrap_or_else(|| "N/A".to_string());

    vec![
        Line::from(vec![label("Released"), Span::raw(movie.release_display())]),
        Line::from(vec![label("Runtime"), Span::raw(format_runtime(movie.runtime))]),
        Line::from(vec![label("Genres"), Span::raw(movie.genres_display())]),
        Line::from(vec![label("Rating"), Span::raw(rating)]),
        Line::from(""),
        Line::from(Span::raw(overview)),
        Line::from(""),
        Line::from(vec![label("Trailer"), Span::styled(trailer, Style::default().fg(Color::Cyan))]),
        Line::from(vec![label("Poster"), Span::styled(poster, Style::default().fg(Color::Cyan))]),
    ]
}

pub fn render_error_notification(frame: &mut Frame, ui_state: &UiState) {
    if let Some(ref error_msg) = ui_state.error_message {
        let area = frame.area();

        let popup_width = 52.min(area.width.saturating_sub(4));
        let inner_width = popup_width.saturating_sub(4).max(1) as usize;

        // Wrapped line count
        let error_line_count = ((error_msg.chars().count() as f32) / (inner_width as f32)).ceil() as u16;

        let popup_area = centered(area, popup_width, 2 + error_line_count.max(1));

        frame.render_widget(Clear, popup_area);

        let error_widget = Paragraph::new(error_msg.to_string())
            .style(Style::default().fg(Color::Red))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Red))
                    .title(" Error (Esc to dismiss) ")
                    .title_style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
                    .style(Style::default().bg(Color::Black)),
            );

        frame.render_widget(error_widget, popup_area);
    }
}

pub fn render_help_popup(frame: &mut Frame) {
    let area = frame.area();

    let keybindings = [
        ("", "── Navigation ──"),
        ("Tab / Shift+Tab", "Cycle sections"),
        ("↑ / ↓", "Move selection"),
        ("← / →", "Change sort or genre"),
        ("Enter", "Search / Open details"),
        ("Esc", "Clear search / Close"),
        ("/ or G", "Focus search"),
        ("S", "Focus sort"),
        ("F", "Focus genre"),
        ("", ""),
        ("", "── Results ──"),
        ("M", "Load more"),
        ("R", "Refresh"),
        ("", ""),
        ("", "── General ──"),
        ("H", "Toggle this help"),
        ("Q", "Quit"),
    ];

    let popup_area = centered(area, 62, keybindings.len() as u16 + 2);

    frame.render_widget(Clear, popup_area);

    let lines: Vec<Line> = keybindings
        .iter()
        .map(|(key, desc)| {
            if key.is_empty() {
                Line::from(Span::styled(
                    format!("{:^38}", desc),
                    Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(vec![
                    Span::styled(
                        format!("{:>18}", key),
                        Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
                    ),
                    Span::raw("  "),
                    Span::styled(desc.to_string(), Style::default().fg(Color::White)),
                ])
            }
        })
        .collect();

    let help_text = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan))
                .title(" Help (H or Esc to close) ")
                .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
                .style(Style::default().bg(Color::Black)),
        )
        .style(Style::default().bg(Color::Black));

    frame.render_widget(help_text, popup_area);
}
