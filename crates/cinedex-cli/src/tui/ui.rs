//! TUI rendering logic for the browser.

use cinedex_search::DetailState;
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Row, Table, Wrap};

use super::state::{BrowserState, InputMode, Screen};

/// Maximum characters of a plot shown in the result table.
const PLOT_PREVIEW_CHARS: usize = 80;

/// Shortens `text` to `max` characters, ending with an ellipsis when cut.
///
/// The result never exceeds `max` characters.
pub fn truncate_chars(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return String::from(text);
    }
    if max == 0 {
        return String::new();
    }
    let mut out: String = text.chars().take(max.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}

/// Draws the browser UI.
#[allow(clippy::indexing_slicing)]
pub fn draw(frame: &mut Frame, state: &mut BrowserState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // query / status
            Constraint::Min(5),    // main content
            Constraint::Length(3), // footer
        ])
        .split(frame.area());

    draw_header(frame, chunks[0], state);
    match state.screen {
        Screen::Search => draw_results(frame, chunks[1], state),
        Screen::Detail(ref detail) => draw_detail(frame, chunks[1], detail.state()),
    }
    draw_footer(frame, chunks[2], state);
}

/// Draws the query input and the paging/status box.
#[allow(clippy::indexing_slicing)]
fn draw_header(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(area);

    let input_style = if state.input_mode == InputMode::Query {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let input = Paragraph::new(state.input.clone())
        .style(input_style)
        .block(Block::default().borders(Borders::ALL).title(" Search: / "));
    frame.render_widget(input, header_chunks[0]);

    let view = &state.view;
    let status = if view.loading {
        Span::styled("Loading...", Style::default().fg(Color::Yellow))
    } else if let Some(ref error) = view.error {
        Span::styled(error.clone(), Style::default().fg(Color::Red))
    } else if view.shows_pagination() {
        Span::raw(format!(
            "page {}/{}",
            view.meta.current_page, view.meta.total_pages
        ))
    } else {
        Span::raw("")
    };
    let status = Paragraph::new(Line::from(status)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" Type: {} ", view.query.type_filter)),
    );
    frame.render_widget(status, header_chunks[1]);
}

/// Draws the result table.
fn draw_results(frame: &mut Frame, area: Rect, state: &mut BrowserState) {
    let header = Row::new(vec!["Title", "Year", "Type", "Plot"])
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .bottom_margin(1);

    let rows: Vec<Row> = state
        .view
        .results
        .iter()
        .map(|r| {
            Row::new(vec![
                r.summary.title.clone(),
                r.summary.year.clone(),
                r.summary.media_type.clone(),
                truncate_chars(&r.plot, PLOT_PREVIEW_CHARS),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(24),
        Constraint::Length(11),
        Constraint::Length(8),
        Constraint::Percentage(55),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Results ")
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .row_highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_stateful_widget(table, area, &mut state.table_state);
}

/// Draws the detail pane.
fn draw_detail(frame: &mut Frame, area: Rect, detail: &DetailState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let lines = match *detail {
        DetailState::Loading => vec![Line::from("Loading...")],
        DetailState::Failed(ref message) => vec![Line::from(Span::styled(
            message.clone(),
            Style::default().fg(Color::Red),
        ))],
        DetailState::Loaded {
            ref details,
            ref poster,
        } => {
            let label = |name: &'static str, value: String| {
                Line::from(vec![
                    Span::styled(
                        format!("{name:<9}"),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(value),
                ])
            };
            let mut lines = vec![
                Line::from(Span::styled(
                    details.title.clone(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
                label("Type", details.media_type.clone()),
                label("Year", details.year.clone()),
                label("Genre", details.genre.clone()),
                label("Actors", details.actors.clone()),
            ];
            if let Some(ref director) = details.director {
                lines.push(label("Director", director.clone()));
            }
            lines.push(label("Poster", poster.clone()));
            lines.push(Line::from(""));
            lines.push(Line::from(details.plot.clone()));
            if !details.ratings.is_empty() {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    "Ratings",
                    Style::default().add_modifier(Modifier::BOLD),
                )));
                for rating in &details.ratings {
                    lines.push(Line::from(format!("  {}: {}", rating.source, rating.value)));
                }
            }
            lines
        }
    };

    let paragraph = Paragraph::new(lines)
        .block(block.title(" Details "))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Draws the footer with key hints.
fn draw_footer(frame: &mut Frame, area: Rect, state: &BrowserState) {
    let help_text = match (&state.screen, &state.input_mode) {
        (Screen::Detail(_), _) => Line::from("b/Esc: back  o: open IMDb  q: quit"),
        (Screen::Search, InputMode::Query) => {
            Line::from("Type a title | Esc: cancel | Enter: search")
        }
        (Screen::Search, InputMode::Normal) => Line::from(vec![Span::raw(
            "/: search  \u{2191}\u{2193}/j/k: move  Enter: details  \u{2190}\u{2192}/p/n: page  t: type  c: clear  q: quit",
        )]),
    };

    let footer = Paragraph::new(help_text).block(Block::default().borders(Borders::ALL));
    frame.render_widget(footer, area);
}
