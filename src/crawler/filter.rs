//! Page filters shared by the crawler and the pipeline

use crate::crawler::Page;

/// URL substrings that identify pages with no business content
pub const DEFAULT_SKIP_PATTERNS: &[&str] = &[
    "/feed/",
    "/rss/",
    "/atom/",
    "robots.txt",
    "sitemap.xml",
    "/wp-json/",
    "/api/",
    "/download/",
];

/// Whether a URL matches one of the (lowercase) skip patterns
pub fn should_skip_url<S: AsRef<str>>(url: &str, patterns: &[S]) -> bool {
    let url_lower = url.to_lowercase();
    patterns
        .iter()
        .any(|pattern| url_lower.contains(pattern.as_ref()))
}

/// Whether the trimmed content is at least `min_chars` characters long
pub fn has_enough_content(content: &str, min_chars: usize) -> bool {
    let trimmed = content.trim();
    !trimmed.is_empty() && trimmed.chars().count() >= min_chars
}

/// Drop pages that are empty, whitespace-only, or on the default URL denylist.
///
/// Order of the remaining pages is preserved.
pub fn retain_content_pages(pages: Vec<Page>) -> Vec<Page> {
    pages
        .into_iter()
        .filter(|page| {
            has_enough_content(&page.content, 1)
                && !should_skip_url(&page.url, DEFAULT_SKIP_PATTERNS)
        })
        .collect()
}
