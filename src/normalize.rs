//! Feed item normalization: raw item in, display-ready card out.
//!
//! This module turns one [`RawFeedItem`] of uncertain shape into a
//! [`DisplayItem`] suitable for rendering as a card. Normalization is pure
//! and total: every branch produces a value, nothing here touches the
//! network or the filesystem.
//!
//! # Image resolution
//!
//! The image URL is resolved by an explicit ordered list of strategies,
//! first non-empty result wins:
//!
//! 1. `enclosure.link`
//! 2. `thumbnail`
//! 3. First `src` attribute of an `<img>` tag embedded in the description
//! 4. A fixed per-category placeholder (default: the "Top Stories" one)

use crate::models::{DisplayItem, RawFeedItem};
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::Html;

/// Maximum summary length in characters, before the ellipsis.
pub const SUMMARY_MAX_CHARS: usize = 120;

/// Appended to every summary, whether or not truncation occurred.
/// Long-standing display quirk; keep as is.
pub const SUMMARY_ELLIPSIS: &str = "...";

/// Matches `<img ... src="...">` with single or double quotes,
/// case-insensitive. Mixed quotes are accepted, same as the matcher this
/// behavior was lifted from.
static IMG_SRC_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)<img[^>]+src=["']([^"']+)["']"#).unwrap());

/// Fixed placeholder images, one per known category.
const CATEGORY_PLACEHOLDERS: &[(&str, &str)] = &[
    (
        "Top Stories",
        "https://images.unsplash.com/photo-1504711434969-e33886168f5c?auto=format&fit=crop&w=500&q=60",
    ),
    (
        "Rajkaran",
        "https://images.unsplash.com/photo-1529108190281-9a4f620bc2d8?auto=format&fit=crop&w=500&q=60",
    ),
    (
        "Krida",
        "https://images.unsplash.com/photo-1531415074968-036ba1b575da?auto=format&fit=crop&w=500&q=60",
    ),
    (
        "Arthavishwa",
        "https://images.unsplash.com/photo-1611974765270-ca12586343bb?auto=format&fit=crop&w=500&q=60",
    ),
    (
        "Tantra/Auto",
        "https://images.unsplash.com/photo-1518770660439-4636190af475?auto=format&fit=crop&w=500&q=60",
    ),
    (
        "Search",
        "https://images.unsplash.com/photo-1451187580459-43490279c0fa?auto=format&fit=crop&w=500&q=60",
    ),
];

/// Normalize one raw feed item into a display-ready card.
///
/// Deterministic and infallible: missing or malformed fields degrade to
/// placeholders (image) or empty strings (date) rather than errors.
///
/// # Arguments
///
/// * `raw` - The feed item as returned by the conversion API
/// * `category` - The active category, used to pick a placeholder image
pub fn normalize(raw: &RawFeedItem, category: &str) -> DisplayItem {
    DisplayItem {
        title: raw.title.clone(),
        link: raw.link.clone(),
        published_at: format_pub_date(&raw.pub_date),
        summary: clean_summary(&raw.description),
        image_url: resolve_image(raw, category),
    }
}

type ImageResolver = fn(&RawFeedItem) -> Option<String>;

/// Resolution strategies in precedence order.
const IMAGE_RESOLVERS: &[ImageResolver] = &[enclosure_image, thumbnail_image, embedded_image];

/// Resolve the card image for a raw item.
///
/// Tries each strategy in [`IMAGE_RESOLVERS`] in order; if none yields a
/// non-empty URL, falls back to [`placeholder_image`] for the category.
/// The result is never empty.
pub fn resolve_image(raw: &RawFeedItem, category: &str) -> String {
    IMAGE_RESOLVERS
        .iter()
        .find_map(|resolve| resolve(raw))
        .unwrap_or_else(|| placeholder_image(category).to_string())
}

fn enclosure_image(raw: &RawFeedItem) -> Option<String> {
    raw.enclosure
        .as_ref()
        .and_then(|e| e.link.as_deref())
        .filter(|link| !link.is_empty())
        .map(str::to_string)
}

fn thumbnail_image(raw: &RawFeedItem) -> Option<String> {
    raw.thumbnail
        .as_deref()
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

fn embedded_image(raw: &RawFeedItem) -> Option<String> {
    // A relative or garbage src would never load at render time; treat it
    // as no image so the placeholder takes over.
    IMG_SRC_RE
        .captures(&raw.description)
        .map(|caps| caps[1].to_string())
        .filter(|src| url::Url::parse(src).is_ok())
}

/// The fixed placeholder image for a category.
///
/// Unknown categories get the "Top Stories" placeholder.
pub fn placeholder_image(category: &str) -> &'static str {
    CATEGORY_PLACEHOLDERS
        .iter()
        .find(|(name, _)| *name == category)
        .or_else(|| CATEGORY_PLACEHOLDERS.iter().find(|(name, _)| *name == "Top Stories"))
        .map(|(_, url)| *url)
        .unwrap_or_default()
}

/// Strip markup from an HTML description and truncate it for display.
///
/// The fragment is parsed with a real HTML parser (not regex), its text
/// content collected, runs of whitespace collapsed to single spaces, and
/// the first [`SUMMARY_MAX_CHARS`] characters kept. The ellipsis is
/// appended unconditionally, even when nothing was cut.
pub fn clean_summary(html: &str) -> String {
    let fragment = Html::parse_fragment(html);
    let text = fragment.root_element().text().collect::<Vec<_>>().join(" ");
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");

    let mut summary: String = collapsed.chars().take(SUMMARY_MAX_CHARS).collect();
    summary.push_str(SUMMARY_ELLIPSIS);
    summary
}

/// The format rss2json emits; RFC 2822 and RFC 3339 cover feeds passed
/// through unconverted.
const RSS2JSON_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Parse and format a publication date as `{day} {short-month}, {HH}:{MM}`.
///
/// Returns an empty string when the date cannot be parsed, so a malformed
/// upstream date renders as no date rather than a literal "Invalid Date".
pub fn format_pub_date(pub_date: &str) -> String {
    let parsed = chrono::NaiveDateTime::parse_from_str(pub_date, RSS2JSON_DATE_FORMAT)
        .or_else(|_| {
            chrono::DateTime::parse_from_rfc2822(pub_date).map(|dt| dt.naive_local())
        })
        .or_else(|_| {
            chrono::DateTime::parse_from_rfc3339(pub_date).map(|dt| dt.naive_local())
        });

    match parsed {
        Ok(dt) => dt.format("%-d %b, %H:%M").to_string(),
        Err(_) => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Enclosure;

    fn item_with(
        description: &str,
        enclosure: Option<&str>,
        thumbnail: Option<&str>,
    ) -> RawFeedItem {
        RawFeedItem {
            title: "Test headline".to_string(),
            link: "https://news.example.com/a1".to_string(),
            pub_date: "2025-01-15 10:30:00".to_string(),
            description: description.to_string(),
            enclosure: enclosure.map(|l| Enclosure {
                link: Some(l.to_string()),
            }),
            thumbnail: thumbnail.map(str::to_string),
        }
    }

    #[test]
    fn test_enclosure_wins_over_everything() {
        let raw = item_with(
            r#"<img src="https://img.example.com/embedded.jpg">"#,
            Some("https://img.example.com/enclosure.jpg"),
            Some("https://img.example.com/thumb.jpg"),
        );
        assert_eq!(
            resolve_image(&raw, "Krida"),
            "https://img.example.com/enclosure.jpg"
        );
    }

    #[test]
    fn test_thumbnail_beats_embedded_image() {
        let raw = item_with(
            r#"<img src="https://img.example.com/embedded.jpg">"#,
            None,
            Some("https://img.example.com/thumb.jpg"),
        );
        assert_eq!(
            resolve_image(&raw, "Krida"),
            "https://img.example.com/thumb.jpg"
        );
    }

    #[test]
    fn test_empty_enclosure_link_is_skipped() {
        let raw = item_with("", Some(""), Some("https://img.example.com/thumb.jpg"));
        assert_eq!(
            resolve_image(&raw, "Krida"),
            "https://img.example.com/thumb.jpg"
        );
    }

    #[test]
    fn test_embedded_image_double_quotes() {
        let raw = item_with(
            r#"<p>text</p><img alt="x" src="https://img.example.com/e.jpg" width="40">"#,
            None,
            None,
        );
        assert_eq!(resolve_image(&raw, "Krida"), "https://img.example.com/e.jpg");
    }

    #[test]
    fn test_embedded_image_single_quotes_and_case() {
        let raw = item_with(
            "<IMG SRC='https://img.example.com/e.jpg'>",
            None,
            None,
        );
        assert_eq!(resolve_image(&raw, "Krida"), "https://img.example.com/e.jpg");
    }

    #[test]
    fn test_embedded_image_relative_src_falls_back() {
        let raw = item_with(r#"<img src="/images/local.jpg">"#, None, None);
        assert_eq!(resolve_image(&raw, "Krida"), placeholder_image("Krida"));
    }

    #[test]
    fn test_placeholder_for_known_category() {
        let raw = item_with("no images here", None, None);
        assert_eq!(resolve_image(&raw, "Krida"), placeholder_image("Krida"));
        assert!(placeholder_image("Krida").contains("unsplash.com"));
    }

    #[test]
    fn test_placeholder_for_unknown_category_is_default() {
        let raw = item_with("", None, None);
        assert_eq!(
            resolve_image(&raw, "No Such Category"),
            placeholder_image("Top Stories")
        );
    }

    #[test]
    fn test_clean_summary_strips_markup() {
        let summary = clean_summary("<p>Hello <b>bold</b> world</p>");
        assert_eq!(summary, "Hello bold world...");
        assert!(!summary.contains('<'));
    }

    #[test]
    fn test_clean_summary_truncates_at_120_chars() {
        let long = "x".repeat(500);
        let summary = clean_summary(&long);
        assert_eq!(summary.chars().count(), SUMMARY_MAX_CHARS + SUMMARY_ELLIPSIS.len());
        assert!(summary.ends_with(SUMMARY_ELLIPSIS));
    }

    #[test]
    fn test_clean_summary_always_appends_ellipsis() {
        // The ellipsis is unconditional even for short text
        assert_eq!(clean_summary("short"), "short...");
        assert_eq!(clean_summary(""), "...");
    }

    #[test]
    fn test_clean_summary_collapses_whitespace() {
        assert_eq!(clean_summary("a\n\n  b\t c"), "a b c...");
    }

    #[test]
    fn test_format_pub_date_rss2json() {
        assert_eq!(format_pub_date("2025-01-15 10:30:00"), "15 Jan, 10:30");
    }

    #[test]
    fn test_format_pub_date_rfc2822() {
        assert_eq!(
            format_pub_date("Wed, 15 Jan 2025 10:30:00 +0000"),
            "15 Jan, 10:30"
        );
    }

    #[test]
    fn test_format_pub_date_malformed_renders_empty() {
        assert_eq!(format_pub_date("not a date"), "");
        assert_eq!(format_pub_date(""), "");
    }

    #[test]
    fn test_normalize_full_card() {
        let raw = item_with(
            "<p>Heavy rain expected across the city</p>",
            Some("https://img.example.com/a1.jpg"),
            None,
        );
        let card = normalize(&raw, "Top Stories");
        assert_eq!(card.title, "Test headline");
        assert_eq!(card.link, "https://news.example.com/a1");
        assert_eq!(card.published_at, "15 Jan, 10:30");
        assert_eq!(card.summary, "Heavy rain expected across the city...");
        assert_eq!(card.image_url, "https://img.example.com/a1.jpg");
    }
}
