//! The record type returned by every page source.
//!
//! `ResultItem` is an opaque payload as far as paging is concerned: the feed
//! only looks at `title` and `body` when filtering, and never de-duplicates
//! by `id`.

use serde::Deserialize;

/// A single record from the remote collection.
///
/// Unknown JSON fields (`userId` on JSONPlaceholder posts, for example) are
/// ignored when decoding.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResultItem {
    pub id: i64,
    pub title: String,
    pub body: String,
}

impl ResultItem {
    /// Case-insensitive substring match against title or body.
    ///
    /// `needle` must already be lowercased; callers filtering a whole list
    /// lowercase the query once instead of once per item.
    pub fn matches_lowercase(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        self.title.to_lowercase().contains(needle) || self.body.to_lowercase().contains(needle)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_item(id: i64, title: &str, body: &str) -> ResultItem {
        ResultItem {
            id,
            title: title.to_string(),
            body: body.to_string(),
        }
    }

    #[test]
    fn empty_needle_matches_everything() {
        assert!(make_item(1, "", "").matches_lowercase(""));
    }

    #[test]
    fn matches_title_or_body_ignoring_case() {
        let a = make_item(1, "Hello World", "foo");
        let b = make_item(2, "Bar", "contains Hello");
        let c = make_item(3, "Nothing", "here");

        assert!(a.matches_lowercase("hello"));
        assert!(b.matches_lowercase("hello"));
        assert!(!c.matches_lowercase("hello"));
    }

    #[test]
    fn decode_ignores_extra_fields() {
        let json = r#"{"userId": 7, "id": 3, "title": "t", "body": "b"}"#;
        let item: ResultItem = serde_json::from_str(json).unwrap();
        assert_eq!(item, make_item(3, "t", "b"));
    }
}
