//! Keyword relevance ordering for crawled pages
//!
//! Pages are scored by how many business-profile keywords appear in their
//! URL path, blended with a preference for shallow paths. `weight` is the
//! share of the keyword score; the remainder goes to path depth. The seed
//! page always stays first; the rest are stably sorted by descending score,
//! so ties keep the order the crawl engine yielded them.

use url::Url;

use crate::crawler::Page;

/// Keywords that mark pages likely to carry profile information
pub const DEFAULT_KEYWORDS: &[&str] = &[
    // Contact information
    "contact",
    "phone",
    "address",
    "email",
    "location",
    "directions",
    // Hours & scheduling
    "hours",
    "schedule",
    "timing",
    "appointments",
    "availability",
    "open",
    "closed",
    // Services
    "services",
    "treatment",
    "care",
    "emergency",
    "surgery",
    "vaccination",
    // Staff & team
    "staff",
    "team",
    "doctor",
    "veterinarian",
    "vet",
    "about",
    // Additional information
    "faq",
    "policy",
    "policies",
    "pricing",
    "fees",
];

/// Scores URLs by keyword occurrence in their path
#[derive(Debug, Clone)]
pub struct KeywordScorer {
    keywords: Vec<String>,
    weight: f32,
}

impl KeywordScorer {
    /// Create a scorer; keywords are matched case-insensitively and `weight`
    /// is clamped to 0.0..=1.0
    pub fn new(keywords: impl IntoIterator<Item = impl Into<String>>, weight: f32) -> Self {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.into().to_lowercase())
                .collect(),
            weight: weight.clamp(0.0, 1.0),
        }
    }

    /// Score a URL between 0.0 and 1.0
    pub fn score(&self, url: &str) -> f32 {
        let (path, query) = match Url::parse(url) {
            Ok(parsed) => (
                parsed.path().to_lowercase(),
                parsed.query().unwrap_or("").to_lowercase(),
            ),
            Err(_) => (url.to_lowercase(), String::new()),
        };

        let keyword_score = if self.keywords.is_empty() {
            0.0
        } else {
            let matches = self
                .keywords
                .iter()
                .filter(|keyword| path.contains(keyword.as_str()) || query.contains(keyword.as_str()))
                .count();
            matches as f32 / self.keywords.len() as f32
        };

        let depth = path.split('/').filter(|segment| !segment.is_empty()).count();
        let depth_score = 1.0 / (1.0 + depth as f32);

        self.weight * keyword_score + (1.0 - self.weight) * depth_score
    }

    /// Order pages by relevance, keeping the seed page (if present) first
    pub fn order(&self, pages: Vec<Page>, seed_url: &str) -> Vec<Page> {
        let seed = normalize(seed_url);
        let mut rest = pages;
        let mut ordered = Vec::with_capacity(rest.len());
        if let Some(pos) = rest.iter().position(|page| normalize(&page.url) == seed) {
            ordered.push(rest.remove(pos));
        }

        let mut scored: Vec<(f32, Page)> = rest
            .into_iter()
            .map(|page| (self.score(&page.url), page))
            .collect();
        scored.sort_by(|a, b| b.0.total_cmp(&a.0));

        ordered.extend(scored.into_iter().map(|(_, page)| page));
        ordered
    }
}

impl Default for KeywordScorer {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS.iter().copied(), 0.7)
    }
}

fn normalize(url: &str) -> String {
    url.trim_end_matches('/').to_lowercase()
}
