use std::time::Instant;

use ratatui::widgets::ListState;
use tracing::debug;

use crate::config::Settings;
use crate::debounce::Debouncer;
use crate::feed::{FeedEvent, FeedState, FetchRequest};
use crate::fetch::FetchMsg;
use crate::sentinel::Sentinel;
use crate::source::ResultItem;

/// Which widget receives typed characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
}

pub struct App {
    /// Paged items, loading flags and queries.
    pub feed: FeedState,
    debouncer: Debouncer<String>,
    sentinel: Sentinel,
    /// Selection and scroll offset over the filtered list.
    pub list_state: ListState,
    pub mode: InputMode,
    /// Whether the user has requested to quit.
    pub quit: bool,
    /// Last fetch status message.
    pub status: String,
    /// Label of the page source, shown in the list title.
    pub source_name: String,
    /// Rows the list occupied in the last frame.
    pub list_rows: usize,
    /// Request waiting to be handed to the fetcher.  Only the latest one
    /// matters, so a second request in the same tick replaces the first.
    outbox: Option<FetchRequest>,
}

impl App {
    pub fn new(settings: &Settings, source_name: impl Into<String>) -> Self {
        Self {
            feed: FeedState::new(settings.page_size, settings.infinite),
            debouncer: Debouncer::new(String::new(), settings.debounce()),
            sentinel: Sentinel::new(settings.prefetch_rows),
            list_state: ListState::default(),
            mode: InputMode::Normal,
            quit: false,
            status: "Starting…".into(),
            source_name: source_name.into(),
            list_rows: 0,
            outbox: None,
        }
    }

    /// Queue the initial page-1 load.
    pub fn mount(&mut self) {
        self.outbox = Some(self.feed.mount());
    }

    pub fn take_request(&mut self) -> Option<FetchRequest> {
        self.outbox.take()
    }

    fn dispatch(&mut self, event: FeedEvent) {
        if let Some(request) = self.feed.update(event) {
            self.outbox = Some(request);
        }
    }

    // -- fetch results -------------------------------------------------------

    /// Apply a message from the fetcher.
    pub fn on_fetch(&mut self, msg: FetchMsg) {
        if self.feed.current_token() != Some(msg.token) {
            debug!(token = ?msg.token, "ignoring superseded fetch result");
            return;
        }
        let summary = match &msg.outcome {
            Ok(items) => Some(items.len()),
            Err(_) => None,
        };
        self.dispatch(msg.into_event());

        match summary {
            Some(count) => {
                self.status = format!("Fetched {count} items");
                // The list under the sentinel changed; a still-visible
                // sentinel counts as a fresh entry.
                self.sentinel.rearm();
            }
            None => self.status = "Fetch failed".into(),
        }
        self.clamp_selection();
    }

    // -- search --------------------------------------------------------------

    /// Replace the raw query and restart the debounce window.
    pub fn set_query(&mut self, raw: impl Into<String>, now: Instant) {
        let raw = raw.into();
        self.debouncer.set(raw.clone(), now);
        self.feed.set_query(raw);
    }

    pub fn push_query_char(&mut self, c: char, now: Instant) {
        let mut raw = self.feed.query().to_string();
        raw.push(c);
        self.set_query(raw, now);
    }

    pub fn pop_query_char(&mut self, now: Instant) {
        let mut raw = self.feed.query().to_string();
        if raw.pop().is_some() {
            self.set_query(raw, now);
        }
    }

    /// Whether typed input is still waiting out the debounce window.
    pub fn search_pending(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Advance time: settle the debounced query if it has gone quiet.
    pub fn tick(&mut self, now: Instant) {
        if let Some(query) = self.debouncer.poll(now) {
            self.dispatch(FeedEvent::QueryResolved(query));
            self.list_state.select(None);
            self.status = "Searching…".into();
        }
    }

    // -- paging --------------------------------------------------------------

    pub fn request_next_page(&mut self) {
        self.dispatch(FeedEvent::NextPageRequested);
    }

    /// Manual "load more": only offered in non-infinite mode, and ignored
    /// while a request is running.
    pub fn load_more(&mut self) {
        if self.feed.infinite_mode() || self.feed.is_loading() || !self.feed.has_more() {
            return;
        }
        self.request_next_page();
    }

    pub fn refresh(&mut self) {
        self.dispatch(FeedEvent::RefreshRequested);
        self.list_state.select(None);
        self.status = "Refreshing…".into();
    }

    pub fn toggle_infinite_mode(&mut self) {
        if self.feed.toggle_infinite_mode() {
            self.sentinel.rearm();
        }
    }

    /// Check whether the end of the list has come into view and, if the
    /// feed is idle in infinite mode, ask for the next page.  Call after each
    /// frame, once `list_rows` and the list offset are current.
    pub fn check_sentinel(&mut self) {
        let len = self.feed.filtered_items().len();
        let near = self
            .sentinel
            .is_near(self.list_state.offset(), self.list_rows, len);
        if !self.sentinel.observe(near) {
            return;
        }
        if self.feed.infinite_mode() && !self.feed.is_loading() && self.feed.has_more() {
            debug!(len, "sentinel entered view; loading next page");
            self.request_next_page();
        }
    }

    // -- navigation ----------------------------------------------------------

    fn visible_len(&self) -> usize {
        self.feed.filtered_items().len()
    }

    pub fn selected_item(&self) -> Option<&ResultItem> {
        let i = self.list_state.selected()?;
        self.feed.filtered_items().get(i).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.visible_len();
        if let Some(i) = self.list_state.selected() {
            if len == 0 {
                self.list_state.select(None);
            } else if i >= len {
                self.list_state.select(Some(len - 1));
            }
        }
    }

    pub fn select_next(&mut self) {
        let len = self.visible_len();
        if len == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_previous(&mut self) {
        if self.visible_len() == 0 {
            return;
        }
        let i = match self.list_state.selected() {
            Some(i) => i.saturating_sub(1),
            None => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn select_first(&mut self) {
        if self.visible_len() > 0 {
            self.list_state.select(Some(0));
        }
    }

    pub fn select_last(&mut self) {
        let len = self.visible_len();
        if len > 0 {
            self.list_state.select(Some(len - 1));
        }
    }
}
