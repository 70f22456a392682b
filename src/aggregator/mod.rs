//! # Content Aggregator
//!
//! Bounds and concatenates crawled pages into the single payload submitted to
//! the extraction service.
//!
//! Each accepted page becomes a block of the form
//!
//! ```text
//! --- PAGE: {url} ---
//! {content}
//!
//! ```
//!
//! Pages are taken in crawl order. A page is skipped when its trimmed content
//! is shorter than the minimum, truncated (with [`TRUNCATION_MARKER`]) when it
//! exceeds the per-page limit, and aggregation stops at the first block that
//! would push the payload past the total limit. Skipped or dropped pages are
//! never backfilled. The functions here are pure.

mod config;

pub use config::{
    AggregationLimits, AggregationLimitsBuilder, DEFAULT_MAX_PER_PAGE, DEFAULT_MAX_TOTAL,
    DEFAULT_MIN_CONTENT_LEN,
};

use crate::crawler::Page;

/// Appended to page content that was cut at the per-page limit
pub const TRUNCATION_MARKER: &str = "\n...[content truncated]";

/// Counters describing one aggregation run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregationStats {
    /// Pages included in the payload
    pub included: usize,

    /// Pages skipped for having too little content
    pub skipped_short: usize,

    /// Included pages whose content was truncated
    pub truncated: usize,

    /// Pages not considered because the total budget was reached
    pub dropped_over_budget: usize,

    /// Length of the payload in characters
    pub total_chars: usize,
}

/// Concatenate pages into one payload under `limits`
pub fn aggregate(pages: &[Page], limits: &AggregationLimits) -> String {
    aggregate_with_stats(pages, limits).0
}

/// Like [`aggregate`], also returning what happened to each page
pub fn aggregate_with_stats(
    pages: &[Page],
    limits: &AggregationLimits,
) -> (String, AggregationStats) {
    let mut payload = String::new();
    let mut stats = AggregationStats::default();

    for (index, page) in pages.iter().enumerate() {
        if page.content.trim().chars().count() < limits.min_content_len {
            stats.skipped_short += 1;
            continue;
        }

        let (content, truncated) = truncate_chars(&page.content, limits.max_per_page);
        let block = format!(
            "--- PAGE: {} ---\n{}{}\n\n",
            page.url,
            content,
            if truncated { TRUNCATION_MARKER } else { "" }
        );
        let block_chars = block.chars().count();

        if stats.total_chars + block_chars > limits.max_total {
            stats.dropped_over_budget = pages.len() - index;
            break;
        }

        payload.push_str(&block);
        stats.total_chars += block_chars;
        stats.included += 1;
        if truncated {
            stats.truncated += 1;
        }
    }

    (payload, stats)
}

/// Cut `text` to at most `max_chars` characters, on a character boundary
fn truncate_chars(text: &str, max_chars: usize) -> (&str, bool) {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => (&text[..byte_index], true),
        None => (text, false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limits(max_per_page: usize, max_total: usize, min_content_len: usize) -> AggregationLimits {
        AggregationLimits::builder()
            .max_per_page(max_per_page)
            .max_total(max_total)
            .min_content_len(min_content_len)
            .build()
    }

    /// A page whose formatted block is exactly `block_len` characters long
    fn page_with_block_len(url: &str, block_len: usize) -> Page {
        let overhead = format!("--- PAGE: {} ---\n\n\n", url).chars().count();
        Page::new(url, "x".repeat(block_len - overhead))
    }

    #[test]
    fn test_formats_pages_in_order() {
        let pages = vec![
            Page::new("/a", "alpha content"),
            Page::new("/b", "beta content"),
        ];

        let payload = aggregate(&pages, &AggregationLimits::default());

        assert_eq!(
            payload,
            "--- PAGE: /a ---\nalpha content\n\n--- PAGE: /b ---\nbeta content\n\n"
        );
    }

    #[test]
    fn test_skips_pages_below_min_content() {
        let pages = vec![
            Page::new("/home", "Open 24/7. Call (555) 111-2222."),
            Page::new("/hours", "x"),
        ];

        let (payload, stats) = aggregate_with_stats(&pages, &limits(50_000, 500_000, 5));

        assert_eq!(payload.matches("--- PAGE:").count(), 1);
        assert!(payload.contains("--- PAGE: /home ---"));
        assert!(!payload.contains("/hours"));
        assert_eq!(stats.included, 1);
        assert_eq!(stats.skipped_short, 1);
    }

    #[test]
    fn test_min_content_uses_trimmed_length() {
        let pages = vec![Page::new("/padded", "   ab   ")];

        assert!(aggregate(&pages, &limits(100, 1000, 3)).is_empty());
        assert!(!aggregate(&pages, &limits(100, 1000, 2)).is_empty());
    }

    #[test]
    fn test_all_pages_too_short_yields_empty_payload() {
        let pages = vec![
            Page::new("/a", ""),
            Page::new("/b", "  \n "),
            Page::new("/c", "abc"),
        ];

        assert_eq!(aggregate(&pages, &limits(100, 1000, 4)), "");
    }

    #[test]
    fn test_truncates_long_pages_with_marker() {
        let pages = vec![Page::new("/long", "abcdefghij")];

        let (payload, stats) = aggregate_with_stats(&pages, &limits(4, 1000, 1));

        assert_eq!(
            payload,
            format!("--- PAGE: /long ---\nabcd{}\n\n", TRUNCATION_MARKER)
        );
        assert_eq!(stats.truncated, 1);
    }

    #[test]
    fn test_exact_length_page_is_not_truncated() {
        let pages = vec![Page::new("/exact", "abcd")];

        let payload = aggregate(&pages, &limits(4, 1000, 1));

        assert!(!payload.contains(TRUNCATION_MARKER));
    }

    #[test]
    fn test_truncation_respects_char_boundaries() {
        let pages = vec![Page::new("/umlaut", "ääääää")];

        let payload = aggregate(&pages, &limits(3, 1000, 1));

        assert!(payload.contains("\näää\n...[content truncated]"));
    }

    #[test]
    fn test_stops_at_first_page_over_budget() {
        let pages = vec![
            page_with_block_len("/first", 80),
            page_with_block_len("/second", 80),
        ];

        let (payload, stats) = aggregate_with_stats(&pages, &limits(50_000, 100, 1));

        assert_eq!(payload.chars().count(), 80);
        assert!(payload.contains("/first"));
        assert!(!payload.contains("/second"));
        assert_eq!(stats.dropped_over_budget, 1);
    }

    #[test]
    fn test_no_backfill_after_budget_reached() {
        let pages = vec![
            page_with_block_len("/a", 60),
            page_with_block_len("/big", 60),
            Page::new("/tiny", "t"),
        ];

        let payload = aggregate(&pages, &limits(50_000, 100, 1));

        assert!(payload.contains("/a"));
        assert!(!payload.contains("/big"));
        assert!(!payload.contains("/tiny"));
    }

    #[test]
    fn test_block_filling_budget_exactly_is_included() {
        let pages = vec![page_with_block_len("/fits", 100)];

        let payload = aggregate(&pages, &limits(50_000, 100, 1));

        assert_eq!(payload.chars().count(), 100);
    }

    #[test]
    fn test_output_never_exceeds_limits() {
        let pages: Vec<Page> = (0..40)
            .map(|i| Page::new(format!("/page/{}", i), "word ".repeat(i * 7 + 1)))
            .collect();

        for (max_per_page, max_total) in [(10, 50), (25, 400), (100, 1_000), (3, 10_000)] {
            let (payload, stats) =
                aggregate_with_stats(&pages, &limits(max_per_page, max_total, 1));

            assert!(payload.chars().count() <= max_total);
            assert_eq!(payload.chars().count(), stats.total_chars);
            for block in payload.split("--- PAGE: ").filter(|b| !b.is_empty()) {
                let content = block.split_once(" ---\n").unwrap().1;
                let content = content.strip_suffix("\n\n").unwrap();
                assert!(
                    content.chars().count() <= max_per_page + TRUNCATION_MARKER.chars().count()
                );
            }
        }
    }

    #[test]
    fn test_deterministic_and_order_sensitive() {
        let pages = vec![
            Page::new("/one", "first page"),
            Page::new("/two", "second page"),
        ];
        let reversed: Vec<Page> = pages.iter().rev().cloned().collect();
        let limits = AggregationLimits::default();

        assert_eq!(aggregate(&pages, &limits), aggregate(&pages, &limits));
        assert_ne!(aggregate(&pages, &limits), aggregate(&reversed, &limits));
    }
}
