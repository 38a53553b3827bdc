//! Keyboard input handling.
//!
//! Maps terminal key events to [`App`] actions.  Keys behave differently in
//! [`InputMode::Search`], where printable characters edit the query.
//!
//! ## For contributors
//!
//! To add a new keybinding:
//!
//! 1. Add a method on [`App`] for the action (if one doesn't exist).
//! 2. Add a `KeyCode` match arm in [`handle_key_event`] that calls it.
//! 3. Update the help text in [`crate::ui`]'s status bar.

use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, InputMode};

/// Process a single key event, updating app state accordingly.
///
/// Only reacts to key-press events (ignoring release / repeat) so that each
/// physical keypress triggers exactly one action.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.quit = true;
        return;
    }

    match app.mode {
        InputMode::Search => handle_search_key(app, key.code),
        InputMode::Normal => handle_normal_key(app, key.code),
    }
}

fn handle_search_key(app: &mut App, code: KeyCode) {
    let now = Instant::now();
    match code {
        KeyCode::Enter | KeyCode::Esc => app.mode = InputMode::Normal,
        KeyCode::Backspace => app.pop_query_char(now),
        KeyCode::Char(c) => app.push_query_char(c, now),
        _ => {}
    }
}

fn handle_normal_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
        KeyCode::Char('/') => app.mode = InputMode::Search,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Home | KeyCode::Char('g') => app.select_first(),
        KeyCode::End | KeyCode::Char('G') => app.select_last(),
        KeyCode::Char('r') => app.refresh(),
        KeyCode::Char('m') => app.load_more(),
        KeyCode::Char('i') => app.toggle_infinite_mode(),
        _ => {}
    }
}
