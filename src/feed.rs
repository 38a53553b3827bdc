//! Paged feed state machine.
//!
//! Every mutation of the item list, page counter and loading flags goes
//! through [`FeedState::update`], which takes one [`FeedEvent`] and returns
//! the [`FetchRequest`] to issue next, if any.  The state never performs I/O
//! itself; the caller hands requests to [`crate::fetch::Fetcher`] and feeds
//! settlements back in as [`FeedEvent::FetchSettled`].
//!
//! ## Supersession
//!
//! Each issued request carries a fresh [`RequestToken`].  Only the most
//! recently issued token is current; a settlement carrying any other token is
//! dropped without touching state, including `loading`.

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::FetchError;
use crate::source::ResultItem;

/// Items per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 10;

/// How a successful page is merged into the item list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchMode {
    /// Overwrite the list with the page.
    Replace,
    /// Append the page to the list.
    Continue,
}

/// Generation number of an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestToken(u64);

/// A request the caller must execute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchRequest {
    pub token: RequestToken,
    /// 1-based page number.
    pub page: u32,
    pub page_size: u32,
    pub mode: FetchMode,
}

/// Inputs to the state machine.
#[derive(Debug)]
pub enum FeedEvent {
    /// The debounced search query settled on a new value.
    QueryResolved(String),
    /// Infinite scroll or "load more" wants the next page.
    NextPageRequested,
    /// The user asked to start over from page 1.
    RefreshRequested,
    /// A request finished, successfully or not.
    FetchSettled {
        token: RequestToken,
        outcome: Result<Vec<ResultItem>, FetchError>,
        fetched_at: DateTime<Utc>,
    },
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    token: RequestToken,
    page: u32,
    mode: FetchMode,
}

/// Everything the feed view knows.
#[derive(Debug)]
pub struct FeedState {
    items: Vec<ResultItem>,
    /// Page of the current (or last) request.
    page: u32,
    /// Pages merged into `items` since the last reset.
    committed_pages: u32,
    page_size: u32,
    loading: bool,
    error: Option<String>,
    has_more: bool,
    query: String,
    debounced_query: String,
    infinite_mode: bool,
    last_token: u64,
    in_flight: Option<InFlight>,
    last_updated: Option<DateTime<Utc>>,
}

impl FeedState {
    pub fn new(page_size: u32, infinite_mode: bool) -> Self {
        Self {
            items: Vec::new(),
            page: 1,
            committed_pages: 0,
            page_size: page_size.max(1),
            loading: false,
            error: None,
            has_more: true,
            query: String::new(),
            debounced_query: String::new(),
            infinite_mode,
            last_token: 0,
            in_flight: None,
            last_updated: None,
        }
    }

    /// Initial replacing fetch of page 1, issued once at startup.
    pub fn mount(&mut self) -> FetchRequest {
        self.reset();
        self.issue(1, FetchMode::Replace)
    }

    /// Apply one event.  Returns the request to execute, if the event needs
    /// one.
    pub fn update(&mut self, event: FeedEvent) -> Option<FetchRequest> {
        match event {
            FeedEvent::QueryResolved(query) => {
                debug!(query = %query, "debounced query changed; resetting feed");
                self.debounced_query = query;
                self.reset();
                Some(self.issue(1, FetchMode::Replace))
            }
            FeedEvent::NextPageRequested => {
                if !self.has_more {
                    debug!(page = self.page, "next page requested but feed is exhausted");
                    return None;
                }
                // Relative to committed pages so a superseded continuing
                // request is re-issued for the same page, not skipped over.
                let next = self.committed_pages + 1;
                Some(self.issue(next, FetchMode::Continue))
            }
            FeedEvent::RefreshRequested => {
                self.reset();
                Some(self.issue(1, FetchMode::Replace))
            }
            FeedEvent::FetchSettled {
                token,
                outcome,
                fetched_at,
            } => {
                self.settle(token, outcome, fetched_at);
                None
            }
        }
    }

    /// Record the raw query as typed.  Does not fetch; the debouncer decides
    /// when it becomes [`FeedEvent::QueryResolved`].
    pub fn set_query(&mut self, raw: impl Into<String>) {
        self.query = raw.into();
    }

    /// Flip between infinite scroll and manual "load more".  Returns the new
    /// mode.
    pub fn toggle_infinite_mode(&mut self) -> bool {
        self.infinite_mode = !self.infinite_mode;
        self.infinite_mode
    }

    /// Items matching the debounced query, in load order.
    ///
    /// Only already-loaded pages are searched; matches on pages not yet
    /// fetched appear as paging continues.
    pub fn filtered_items(&self) -> Vec<&ResultItem> {
        let needle = self.debounced_query.to_lowercase();
        self.items
            .iter()
            .filter(|item| item.matches_lowercase(&needle))
            .collect()
    }

    // -- accessors -----------------------------------------------------------

    pub fn items(&self) -> &[ResultItem] {
        &self.items
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn has_more(&self) -> bool {
        self.has_more
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn debounced_query(&self) -> &str {
        &self.debounced_query
    }

    pub fn infinite_mode(&self) -> bool {
        self.infinite_mode
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.last_updated
    }

    /// Token of the request whose result would currently be applied.
    pub fn current_token(&self) -> Option<RequestToken> {
        self.in_flight.map(|f| f.token)
    }

    // -- transitions ---------------------------------------------------------

    fn reset(&mut self) {
        self.items.clear();
        self.page = 1;
        self.committed_pages = 0;
        self.has_more = true;
    }

    fn issue(&mut self, page: u32, mode: FetchMode) -> FetchRequest {
        self.last_token += 1;
        let token = RequestToken(self.last_token);
        if let Some(prev) = self.in_flight.replace(InFlight { token, page, mode }) {
            debug!(superseded = ?prev.token, ?token, "superseding in-flight request");
        }
        self.page = page;
        self.loading = true;
        self.error = None;
        debug!(?token, page, ?mode, "issuing page request");
        FetchRequest {
            token,
            page,
            page_size: self.page_size,
            mode,
        }
    }

    fn settle(
        &mut self,
        token: RequestToken,
        outcome: Result<Vec<ResultItem>, FetchError>,
        fetched_at: DateTime<Utc>,
    ) {
        let flight = match self.in_flight {
            Some(flight) if flight.token == token => flight,
            _ => {
                debug!(?token, "dropping stale settlement");
                return;
            }
        };
        self.in_flight = None;
        self.loading = false;

        match outcome {
            Ok(batch) => {
                self.has_more = batch.len() == self.page_size as usize;
                debug!(
                    ?token,
                    page = flight.page,
                    count = batch.len(),
                    has_more = self.has_more,
                    "page committed"
                );
                match flight.mode {
                    FetchMode::Replace => self.items = batch,
                    FetchMode::Continue => self.items.extend(batch),
                }
                self.committed_pages = flight.page;
                self.page = flight.page;
                self.error = None;
                self.last_updated = Some(fetched_at);
            }
            Err(err) => {
                warn!(?token, page = flight.page, error = %err, "page fetch failed");
                self.error = Some(err.to_string());
                self.page = self.committed_pages.max(1);
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
