//! Background page fetching.
//!
//! Each [`FetchRequest`] runs as its own tokio task and reports back to the
//! UI thread over an unbounded channel.  Issuing a new request aborts the
//! previous task, so at most one request is ever awaiting a response.
//!
//! ## For contributors
//!
//! Abort is cooperative: the task is dropped at its next await point, which
//! for reqwest also drops the connection.  A result that was already sent
//! before the abort landed is still rejected by token in
//! [`crate::feed::FeedState`], so do not rely on abort alone for ordering.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::FetchError;
use crate::feed::{FeedEvent, FetchRequest, RequestToken};
use crate::source::{PageSource, ResultItem};

/// Message sent from a fetch task to the UI thread.
#[derive(Debug)]
pub struct FetchMsg {
    pub token: RequestToken,
    pub outcome: Result<Vec<ResultItem>, FetchError>,
    pub fetched_at: DateTime<Utc>,
}

impl FetchMsg {
    pub fn into_event(self) -> FeedEvent {
        FeedEvent::FetchSettled {
            token: self.token,
            outcome: self.outcome,
            fetched_at: self.fetched_at,
        }
    }
}

/// Runs page requests, one at a time.
pub struct Fetcher {
    source: Arc<dyn PageSource>,
    runtime: Handle,
    tx: mpsc::UnboundedSender<FetchMsg>,
    in_flight: Option<JoinHandle<()>>,
}

impl Fetcher {
    /// Create a fetcher bound to `runtime`.
    ///
    /// Returns the receiver that the main loop should drain on every tick.
    pub fn new(
        source: Arc<dyn PageSource>,
        runtime: Handle,
    ) -> (Self, mpsc::UnboundedReceiver<FetchMsg>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let fetcher = Self {
            source,
            runtime,
            tx,
            in_flight: None,
        };
        (fetcher, rx)
    }

    pub fn source_name(&self) -> &str {
        self.source.name()
    }

    /// Start `request`, aborting whatever was running before.
    pub fn issue(&mut self, request: FetchRequest) {
        self.cancel();

        let source = Arc::clone(&self.source);
        let tx = self.tx.clone();
        debug!(token = ?request.token, page = request.page, "spawning fetch task");

        self.in_flight = Some(self.runtime.spawn(async move {
            let outcome = source.fetch_page(request.page, request.page_size).await;
            let msg = FetchMsg {
                token: request.token,
                outcome,
                fetched_at: Utc::now(),
            };
            // If the receiver is gone the UI has exited; nothing to report to.
            if tx.send(msg).is_err() {
                debug!(token = ?request.token, "fetch finished after UI shutdown");
            }
        }));
    }

    /// Abort the in-flight request, if any.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            if !handle.is_finished() {
                debug!("aborting in-flight fetch");
                handle.abort();
            }
        }
    }
}

impl Drop for Fetcher {
    fn drop(&mut self) {
        self.cancel();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
