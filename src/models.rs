//! Data models for feed items, display cards, and notes.
//!
//! This module defines the core data structures used throughout the application:
//! - [`RawFeedItem`]: One item as returned by the rss2json conversion API
//! - [`FeedResponse`]: The envelope the API wraps a converted feed in
//! - [`DisplayItem`]: A normalized, display-ready card derived from a raw item
//! - [`Note`]: A user-authored study note attached to an article
//!
//! `RawFeedItem` mirrors an external JSON shape that is not fully under our
//! control, so every field beyond `title`/`link` is optional with defaults.

use serde::{Deserialize, Serialize};

/// The envelope returned by the rss2json conversion endpoint.
///
/// Only the fields the application reads are modeled; the API also returns
/// a `feed` object describing the source channel, which we ignore.
#[derive(Debug, Deserialize)]
pub struct FeedResponse {
    /// `"ok"` on success; anything else means the conversion failed upstream.
    #[serde(default)]
    pub status: String,
    /// The converted feed items. Missing or null becomes an empty list.
    #[serde(default)]
    pub items: Vec<RawFeedItem>,
}

/// One raw feed item of uncertain shape.
///
/// Google News feeds routed through rss2json usually carry the image either
/// in `enclosure.link`, in `thumbnail`, or embedded as an `<img>` tag inside
/// the HTML `description`. Any of the three may be absent or empty.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawFeedItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub link: String,
    /// Publication date string, typically `YYYY-MM-DD HH:MM:SS` from rss2json.
    #[serde(rename = "pubDate", default)]
    pub pub_date: String,
    /// HTML fragment; may embed an `<img>` tag.
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub enclosure: Option<Enclosure>,
    #[serde(default)]
    pub thumbnail: Option<String>,
}

/// Media enclosure attached to a feed item.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Enclosure {
    #[serde(default)]
    pub link: Option<String>,
}

/// A normalized, display-ready news card.
///
/// Produced by [`crate::normalize::normalize`]; immutable once built.
/// `image_url` is always non-empty (falls back to a category placeholder)
/// and `summary` is plain text, truncated with a trailing ellipsis.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayItem {
    /// Headline, verbatim from the source.
    pub title: String,
    /// Article URL, verbatim.
    pub link: String,
    /// `{day} {short-month}, {HH}:{MM}`, or empty if the date failed to parse.
    pub published_at: String,
    /// Markup-free description, at most 120 characters plus "...".
    pub summary: String,
    /// Resolved image URL or a category placeholder; never empty.
    pub image_url: String,
}

/// A user-authored note, persisted locally.
///
/// The serialized field names match the JSON shape the store has always
/// written (`date` rather than `created_at`), so an existing store file
/// keeps loading across versions.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Note {
    /// Note body; non-empty and trimmed by construction.
    pub text: String,
    /// The article headline captured at creation time.
    pub headline: String,
    /// Formatted creation timestamp, e.g. `15 Jan, 10:30`.
    #[serde(rename = "date")]
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_response_full_item() {
        let json = r#"{
            "status": "ok",
            "items": [{
                "title": "Mumbai rains update",
                "link": "https://news.example.com/a1",
                "pubDate": "2025-01-15 10:30:00",
                "description": "<p>Heavy rain expected</p>",
                "enclosure": {"link": "https://img.example.com/a1.jpg"},
                "thumbnail": "https://img.example.com/a1_thumb.jpg"
            }]
        }"#;

        let resp: FeedResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.status, "ok");
        assert_eq!(resp.items.len(), 1);
        let item = &resp.items[0];
        assert_eq!(item.title, "Mumbai rains update");
        assert_eq!(item.pub_date, "2025-01-15 10:30:00");
        assert_eq!(
            item.enclosure.as_ref().unwrap().link.as_deref(),
            Some("https://img.example.com/a1.jpg")
        );
    }

    #[test]
    fn test_feed_response_sparse_item() {
        // rss2json omits enclosure/thumbnail for many Google News items
        let json = r#"{
            "status": "ok",
            "items": [{"title": "Bare item", "link": "https://x.example/a"}]
        }"#;

        let resp: FeedResponse = serde_json::from_str(json).unwrap();
        let item = &resp.items[0];
        assert_eq!(item.pub_date, "");
        assert_eq!(item.description, "");
        assert!(item.enclosure.is_none());
        assert!(item.thumbnail.is_none());
    }

    #[test]
    fn test_feed_response_missing_items() {
        let resp: FeedResponse = serde_json::from_str(r#"{"status": "error"}"#).unwrap();
        assert_eq!(resp.status, "error");
        assert!(resp.items.is_empty());
    }

    #[test]
    fn test_note_serialized_field_names() {
        let note = Note {
            text: "revise this".to_string(),
            headline: "MPSC exam dates announced".to_string(),
            created_at: "15 Jan, 10:30".to_string(),
        };

        let json = serde_json::to_string(&note).unwrap();
        assert!(json.contains("\"date\":\"15 Jan, 10:30\""));
        assert!(!json.contains("created_at"));

        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back, note);
    }
}
