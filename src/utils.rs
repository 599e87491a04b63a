//! Helpers for share links, logging previews, and file system checks.

use std::error::Error;
use std::fs as stdfs;
use tokio::fs;
use tracing::{info, instrument};

/// Build a WhatsApp deep link sharing an article.
///
/// The message carries the title and link, URL-encoded into the `text`
/// parameter of a `wa.me` link.
pub fn share_link(title: &str, link: &str) -> String {
    let text = format!("Check this news: {title} \nRead more: {link}");
    format!("https://wa.me/?text={}", urlencoding::encode(&text))
}

/// Truncate a string for logging purposes.
///
/// Long strings are truncated to at most `max` bytes with an ellipsis and
/// byte count indicator appended. The cut backs up to the nearest char
/// boundary, so multibyte text (Devanagari response bodies included)
/// never splits a character.
pub fn truncate_for_log(s: &str, max: usize) -> String {
    if s.len() <= max {
        return s.to_string();
    }
    let mut cut = max;
    while !s.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}…(+{} bytes)", &s[..cut], s.len() - cut)
}

/// Ensure a directory exists and is writable.
///
/// Creates the directory if needed, then probes it with a throwaway file.
/// Used for the data directory before opening the note store.
#[instrument(level = "info", skip_all, fields(path = %path))]
pub async fn ensure_writable_dir(path: &str) -> Result<(), Box<dyn Error>> {
    if let Err(e) = fs::create_dir_all(path).await {
        return Err(Box::new(e));
    }
    // Try a small sync write using std fs (simpler error surface)
    let probe_path = format!("{}/..__probe_write__", path.trim_end_matches('/'));
    match stdfs::File::create(&probe_path) {
        Ok(_) => {
            let _ = stdfs::remove_file(&probe_path);
            info!("Directory is writable");
            Ok(())
        }
        Err(e) => Err(Box::new(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_link_encodes_title_and_link() {
        let link = share_link("Big news today", "https://news.example.com/a?x=1");
        assert!(link.starts_with("https://wa.me/?text="));
        assert!(link.contains("Check%20this%20news%3A%20Big%20news%20today"));
        assert!(link.contains("Read%20more%3A%20https%3A%2F%2Fnews.example.com"));
        assert!(!link.contains(' '));
    }

    #[test]
    fn test_truncate_for_log_short_string() {
        assert_eq!(truncate_for_log("Hello, world!", 100), "Hello, world!");
    }

    #[test]
    fn test_truncate_for_log_long_string() {
        let s = "a".repeat(500);
        let result = truncate_for_log(&s, 100);
        assert!(result.starts_with(&"a".repeat(100)));
        assert!(result.contains("…(+400 bytes)"));
    }

    #[test]
    fn test_truncate_for_log_backs_up_to_char_boundary() {
        // 1 ASCII byte + 200 three-byte Devanagari chars = 601 bytes;
        // byte 300 lands inside a character
        let s = format!("x{}", "ब".repeat(200));
        let result = truncate_for_log(&s, 300);
        assert!(result.starts_with("xब"));
        // nearest boundary below 300 is 298, leaving 303 bytes cut
        assert!(result.ends_with("…(+303 bytes)"));
    }

    #[tokio::test]
    async fn test_ensure_writable_dir_creates_missing_dir() {
        let base = tempfile::tempdir().unwrap();
        let nested = base.path().join("data").join("notes");
        ensure_writable_dir(nested.to_str().unwrap()).await.unwrap();
        assert!(nested.is_dir());
    }
}
