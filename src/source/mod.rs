//! Page source abstraction layer.
//!
//! This module defines the [`PageSource`] trait and the common [`ResultItem`]
//! type.  Concrete sources live in sub-modules (currently only [`http`]).
//!
//! ## For contributors: adding a new source
//!
//! 1. Create a new file in this directory (e.g. `github.rs`).
//! 2. Define a struct and implement [`PageSource`] for it.
//! 3. Add `mod github;` below and re-export your struct in the `pub use` block.
//! 4. Construct it in `main.rs` instead of (or alongside) [`HttpSource`].
//!
//! Supersession, paging and filtering are all source-agnostic.

mod http;
mod result_item;

pub use http::HttpSource;
pub use result_item::ResultItem;

use async_trait::async_trait;

use crate::error::FetchError;

/// Trait that every paged collection must implement.
///
/// The fetcher calls [`fetch_page()`](PageSource::fetch_page) from a tokio
/// task that may be aborted at any await point, so implementations must be
/// cancel-safe and `Send + Sync`.
///
/// ## Implementing a new source
///
/// ```ignore
/// pub struct MySource { /* config fields */ }
///
/// #[async_trait]
/// impl PageSource for MySource {
///     fn name(&self) -> &str { "my-source" }
///
///     async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<ResultItem>, FetchError> {
///         // Perform HTTP / IO for one 1-based page, then convert.
///         todo!()
///     }
/// }
/// ```
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Human-readable label shown in the title bar.
    fn name(&self) -> &str;

    /// Fetch one page.  `page` is 1-based; `limit` is the page size.
    ///
    /// A page shorter than `limit` tells the feed that the collection is
    /// exhausted.
    async fn fetch_page(&self, page: u32, limit: u32) -> Result<Vec<ResultItem>, FetchError>;
}
