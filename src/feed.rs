//! Feed loading: category table, query building, and the fetch pipeline.
//!
//! A category (or a free-text search) resolves to a Google News RSS URL,
//! which is wrapped in an rss2json conversion request. The response items
//! are mapped through the normalizer into display cards.
//!
//! # Architecture
//!
//! The transport is abstracted behind the [`FetchFeed`] trait so the
//! controller can be exercised in tests with a stub:
//! - [`FetchFeed`]: async "URL in, response body out" contract
//! - [`HttpFetcher`]: the real reqwest-backed implementation
//! - [`FeedController`]: resolves the query, fetches, parses, normalizes
//!
//! # Stale responses
//!
//! Every `load` call is stamped with a generation from a monotonic counter.
//! [`FeedState::apply`] accepts a [`FeedUpdate`] only while it is still the
//! latest generation, so a slow response for an abandoned category can
//! never overwrite the items of a fresher selection.

use crate::models::{DisplayItem, FeedResponse};
use crate::normalize::normalize;
use crate::utils::truncate_for_log;
use std::error::Error;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, info, instrument, warn};

/// Pseudo-category representing a free-text search rather than a fixed feed.
pub const SEARCH_CATEGORY: &str = "Search";

/// Fixed category table: label to Google News RSS URL (Marathi, India).
pub const CATEGORIES: &[(&str, &str)] = &[
    (
        "Top Stories",
        "https://news.google.com/rss?hl=mr&gl=IN&ceid=IN:mr",
    ),
    (
        "Rajkaran",
        "https://news.google.com/rss/search?q=Rajkaran+Maharashtra+when:1d&hl=mr&gl=IN&ceid=IN:mr",
    ),
    (
        "Krida",
        "https://news.google.com/rss/search?q=Krida+batmya+when:1d&hl=mr&gl=IN&ceid=IN:mr",
    ),
    (
        "Arthavishwa",
        "https://news.google.com/rss/search?q=Share+Market+Marathi+when:1d&hl=mr&gl=IN&ceid=IN:mr",
    ),
    (
        "Tantra/Auto",
        "https://news.google.com/rss/search?q=Tantragyan+Auto+when:2d&hl=mr&gl=IN&ceid=IN:mr",
    ),
];

/// Labels of the fixed categories, in display order.
pub fn category_names() -> Vec<&'static str> {
    CATEGORIES.iter().map(|(name, _)| *name).collect()
}

/// Resolve the RSS feed URL for a category or search.
///
/// Known categories map through the fixed table. The search pseudo-category
/// substitutes the typed term into a templated day-scoped Marathi query.
/// Returns `None` for an unknown category, or for a search without a term.
pub fn resolve_feed_url(category: &str, search_term: Option<&str>) -> Option<String> {
    if category == SEARCH_CATEGORY {
        let term = search_term?;
        return Some(format!(
            "https://news.google.com/rss/search?q={term}+Marathi+when:1d&hl=mr&gl=IN&ceid=IN:mr"
        ));
    }
    CATEGORIES
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, url)| (*url).to_string())
}

/// Wrap a feed URL in an rss2json conversion request.
///
/// The feed URL travels percent-encoded in the `rss_url` query parameter.
pub fn api_endpoint(rss_url: &str) -> String {
    format!(
        "https://api.rss2json.com/v1/api.json?rss_url={}",
        urlencoding::encode(rss_url)
    )
}

/// Async transport contract for fetching a feed conversion response.
///
/// Implementors take a fully built request URL and return the raw response
/// body. Abstracting this lets the controller run against a stub in tests.
pub trait FetchFeed {
    /// Fetch the body at `url`.
    async fn fetch_json(&self, url: &str) -> Result<String, Box<dyn Error>>;
}

/// The real transport: a plain GET via reqwest.
#[derive(Debug, Default)]
pub struct HttpFetcher;

impl FetchFeed for HttpFetcher {
    #[instrument(level = "info", skip_all, fields(%url))]
    async fn fetch_json(&self, url: &str) -> Result<String, Box<dyn Error>> {
        let body = reqwest::get(url).await?.text().await?;
        debug!(bytes = body.len(), "Fetched feed response");
        Ok(body)
    }
}

/// The outcome of one `load` call, stamped with its request generation.
#[derive(Debug)]
pub struct FeedUpdate {
    /// Generation assigned when the load was issued.
    pub generation: u64,
    /// Normalized cards; empty on any transport or parse failure.
    pub items: Vec<DisplayItem>,
}

/// Loads and normalizes feed items for a category or search.
pub struct FeedController<F> {
    fetcher: F,
    generation: AtomicU64,
}

impl<F: FetchFeed> FeedController<F> {
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher,
            generation: AtomicU64::new(0),
        }
    }

    /// The generation of the most recently issued load.
    pub fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Whether an update still reflects the latest issued load.
    pub fn is_current(&self, update: &FeedUpdate) -> bool {
        update.generation == self.current_generation()
    }

    /// Load and normalize the items for a category or search term.
    ///
    /// Any failure along the way (unknown category, transport error,
    /// malformed response, upstream conversion error) yields an empty item
    /// list; the detail goes to the log, not to the user.
    #[instrument(level = "info", skip(self), fields(%category))]
    pub async fn load(&self, category: &str, search_term: Option<&str>) -> FeedUpdate {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let Some(rss_url) = resolve_feed_url(category, search_term) else {
            warn!(%category, "No feed URL for category");
            return FeedUpdate {
                generation,
                items: Vec::new(),
            };
        };

        let endpoint = api_endpoint(&rss_url);
        debug!(%endpoint, "Resolved feed endpoint");

        let body = match self.fetcher.fetch_json(&endpoint).await {
            Ok(body) => body,
            Err(e) => {
                warn!(%category, error = %e, "Feed fetch failed");
                return FeedUpdate {
                    generation,
                    items: Vec::new(),
                };
            }
        };

        let response = match serde_json::from_str::<FeedResponse>(&body) {
            Ok(response) => response,
            Err(e) => {
                warn!(
                    %category,
                    error = %e,
                    response_preview = %truncate_for_log(&body, 300),
                    "Feed response did not parse"
                );
                return FeedUpdate {
                    generation,
                    items: Vec::new(),
                };
            }
        };

        if response.status != "ok" {
            warn!(%category, status = %response.status, "Feed conversion reported failure");
            return FeedUpdate {
                generation,
                items: Vec::new(),
            };
        }

        let items: Vec<DisplayItem> = response
            .items
            .iter()
            .map(|raw| normalize(raw, category))
            .collect();
        info!(count = items.len(), "Loaded feed items");

        FeedUpdate { generation, items }
    }
}

/// The rendered feed view: current items plus a loading flag.
#[derive(Debug, Default)]
pub struct FeedState {
    pub items: Vec<DisplayItem>,
    pub loading: bool,
}

impl FeedState {
    /// Mark a load as in flight.
    pub fn begin(&mut self) {
        self.loading = true;
    }

    /// Apply an update if it is still the controller's latest generation.
    ///
    /// A stale update is dropped whole, so the displayed list is always the
    /// items of exactly one response, never a mix. Returns whether the
    /// update was applied.
    pub fn apply<F: FetchFeed>(
        &mut self,
        controller: &FeedController<F>,
        update: FeedUpdate,
    ) -> bool {
        if !controller.is_current(&update) {
            debug!(
                stale = update.generation,
                current = controller.current_generation(),
                "Dropping stale feed update"
            );
            return false;
        }
        self.items = update.items;
        self.loading = false;
        true
    }
}
