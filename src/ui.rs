//! Terminal UI rendering.
//!
//! All drawing logic lives here, separated from application state ([`App`])
//! and input handling ([`crate::input`]).
//!
//! ## For contributors
//!
//! * Layout, top to bottom: search box, scrollable item list, detail pane
//!   for the selected item, two-line status bar.
//! * [`draw`] records how many rows the list got in `App::list_rows`; the
//!   main loop uses it for the infinite-scroll check after each frame.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, InputMode};

/// Draw the complete UI for one frame.
pub fn draw(app: &mut App, frame: &mut Frame) {
    let [search_area, list_area, detail_area, status_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(3),
        Constraint::Length(7),
        Constraint::Length(2),
    ])
    .areas(frame.area());

    draw_search_box(app, frame, search_area);
    draw_item_list(app, frame, list_area);
    draw_detail(app, frame, detail_area);
    draw_status_bar(app, frame, status_area);
}

fn draw_search_box(app: &App, frame: &mut Frame, area: Rect) {
    let editing = app.mode == InputMode::Search;
    let border_style = if editing {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let text = if app.feed.query().is_empty() && !editing {
        Span::styled("Search title or body... (/)", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(app.feed.query())
    };

    let title = if app.search_pending() {
        " Search (typing…) "
    } else {
        " Search "
    };
    let search = Paragraph::new(Line::from(text)).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(search, area);

    if editing {
        let x = area.x + 1 + app.feed.query().chars().count() as u16;
        frame.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Render the scrollable item list.
fn draw_item_list(app: &mut App, frame: &mut Frame, area: Rect) {
    app.list_rows = area.height.saturating_sub(2) as usize;

    let list_items: Vec<ListItem> = app
        .feed
        .filtered_items()
        .into_iter()
        .map(|item| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("#{:<4}", item.id), Style::default().fg(Color::DarkGray)),
                Span::raw(" "),
                Span::styled(item.title.clone(), Style::default().fg(Color::White)),
            ]))
        })
        .collect();

    let mode = if app.feed.infinite_mode() {
        "infinite scroll"
    } else {
        "load more"
    };
    let list = List::new(list_items)
        .block(
            Block::default()
                .title(format!(" {} · {mode} ", app.source_name))
                .borders(Borders::ALL),
        )
        .highlight_style(
            Style::default()
                .add_modifier(Modifier::BOLD)
                .bg(Color::DarkGray),
        )
        .highlight_symbol("▸ ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn draw_detail(app: &App, frame: &mut Frame, area: Rect) {
    let block = Block::default().title(" Detail ").borders(Borders::ALL);
    let Some(item) = app.selected_item() else {
        frame.render_widget(block, area);
        return;
    };

    let detail = Paragraph::new(vec![
        Line::from(Span::styled(
            item.title.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(item.body.as_str()),
        Line::from(Span::styled(
            format!("ID: {}", item.id),
            Style::default().fg(Color::DarkGray),
        )),
    ])
    .wrap(Wrap { trim: true })
    .block(block);
    frame.render_widget(detail, area);
}

/// Render the bottom status bar.
fn draw_status_bar(app: &App, frame: &mut Frame, area: Rect) {
    let feed = &app.feed;

    let mut state_spans = vec![Span::raw(" ")];
    if feed.is_loading() {
        state_spans.push(Span::styled("Loading...", Style::default().fg(Color::Yellow)));
    } else if let Some(err) = feed.error() {
        state_spans.push(Span::styled(format!("Error: {err}"), Style::default().fg(Color::Red)));
    } else if !feed.has_more() {
        state_spans.push(Span::styled("No more items.", Style::default().fg(Color::DarkGray)));
    } else {
        state_spans.push(Span::styled(&app.status, Style::default().fg(Color::Yellow)));
    }
    state_spans.push(Span::raw("  "));
    state_spans.push(Span::styled(
        format!(
            "Showing {} of {} fetched items (page {}). Query: \"{}\"",
            feed.filtered_items().len(),
            feed.items().len(),
            feed.page(),
            feed.debounced_query()
        ),
        Style::default().fg(Color::Green),
    ));
    if let Some(at) = feed.last_updated() {
        state_spans.push(Span::styled(
            format!("  updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let help = match app.mode {
        InputMode::Search => " Enter/Esc: done  Backspace: delete",
        InputMode::Normal if feed.infinite_mode() => {
            " q: quit  /: search  ↑/↓: scroll  r: refresh  i: load-more mode"
        }
        InputMode::Normal => " q: quit  /: search  ↑/↓: scroll  r: refresh  m: load more  i: infinite mode",
    };

    let status = Paragraph::new(vec![
        Line::from(state_spans),
        Line::from(Span::styled(help, Style::default().fg(Color::DarkGray))),
    ]);
    frame.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::error::FetchError;
    use crate::fetch::FetchMsg;
    use crate::source::ResultItem;
    use chrono::Utc;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(app: &mut App, width: u16, height: u16) -> String {
        let backend = TestBackend::new(width, height);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw(app, f)).unwrap();
        let buf = terminal.backend().buffer().clone();
        buf.content()
            .iter()
            .map(|c| c.symbol().chars().next().unwrap_or(' '))
            .collect()
    }

    fn loaded_app(count: usize) -> App {
        let mut app = App::new(&Settings::default(), "Posts");
        app.mount();
        let req = app.take_request().unwrap();
        app.on_fetch(FetchMsg {
            token: req.token,
            outcome: Ok((1..=count as i64)
                .map(|id| ResultItem {
                    id,
                    title: format!("title {id}"),
                    body: format!("body of {id}"),
                })
                .collect()),
            fetched_at: Utc::now(),
        });
        app
    }

    #[test]
    fn draw_does_not_panic_with_no_items() {
        let mut app = App::new(&Settings::default(), "Posts");
        render(&mut app, 80, 24);
    }

    #[test]
    fn draw_does_not_panic_on_tiny_terminal() {
        let mut app = loaded_app(10);
        app.select_first();
        render(&mut app, 10, 5);
    }

    #[test]
    fn draw_records_list_rows() {
        let mut app = loaded_app(10);
        render(&mut app, 120, 30);
        // 30 - search(3) - detail(7) - status(2) - borders(2)
        assert_eq!(app.list_rows, 16);
    }

    #[test]
    fn status_shows_counts() {
        let mut app = loaded_app(10);
        let text = render(&mut app, 140, 24);
        assert!(text.contains("Showing 10 of 10 fetched items (page 1)"), "{text}");
    }

    #[test]
    fn status_shows_loading() {
        let mut app = App::new(&Settings::default(), "Posts");
        app.mount();
        let text = render(&mut app, 140, 24);
        assert!(text.contains("Loading..."));
    }

    #[test]
    fn status_shows_error_and_keeps_items() {
        let mut app = loaded_app(10);
        app.request_next_page();
        let req = app.take_request().unwrap();
        app.on_fetch(FetchMsg {
            token: req.token,
            outcome: Err(FetchError::Status(500)),
            fetched_at: Utc::now(),
        });
        let text = render(&mut app, 140, 24);
        assert!(text.contains("Error: API error: 500"));
        assert!(text.contains("title 1"));
    }

    #[test]
    fn status_shows_end_of_feed() {
        let mut app = loaded_app(3);
        let text = render(&mut app, 140, 24);
        assert!(text.contains("No more items."));
    }

    #[test]
    fn detail_shows_selected_item() {
        let mut app = loaded_app(3);
        app.select_last();
        let text = render(&mut app, 140, 24);
        assert!(text.contains("body of 3"));
        assert!(text.contains("ID: 3"));
    }
}
