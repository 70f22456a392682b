//! # Aggregation Limits
//!
//! Size limits that keep the aggregated payload within a single model
//! invocation. Lengths are counted in characters (Unicode scalar values).
//!
//! ## Key Components
//!
//! - `AggregationLimits`: Per-page, total, and minimum-content limits
//! - `AggregationLimitsBuilder`: Builder pattern implementation for easier configuration

/// Default per-page content limit in characters
pub const DEFAULT_MAX_PER_PAGE: usize = 50_000;

/// Default total payload limit in characters
pub const DEFAULT_MAX_TOTAL: usize = 500_000;

/// Default minimum trimmed content length for a page to be used
pub const DEFAULT_MIN_CONTENT_LEN: usize = 1;

/// Limits applied by [`aggregate`](crate::aggregator::aggregate)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationLimits {
    /// Maximum characters of content taken from a single page
    pub max_per_page: usize,

    /// Maximum characters of the whole payload
    pub max_total: usize,

    /// Pages whose trimmed content is shorter than this are skipped
    pub min_content_len: usize,
}

impl Default for AggregationLimits {
    fn default() -> Self {
        Self {
            max_per_page: DEFAULT_MAX_PER_PAGE,
            max_total: DEFAULT_MAX_TOTAL,
            min_content_len: DEFAULT_MIN_CONTENT_LEN,
        }
    }
}

/// Builder for AggregationLimits
#[derive(Debug, Default)]
pub struct AggregationLimitsBuilder {
    limits: AggregationLimits,
}

impl AggregationLimitsBuilder {
    /// Create a new builder with default limits
    pub fn new() -> Self {
        Self {
            limits: AggregationLimits::default(),
        }
    }

    /// Set the per-page content limit
    pub fn max_per_page(mut self, max_per_page: usize) -> Self {
        self.limits.max_per_page = max_per_page;
        self
    }

    /// Set the total payload limit
    pub fn max_total(mut self, max_total: usize) -> Self {
        self.limits.max_total = max_total;
        self
    }

    /// Set the minimum trimmed content length
    pub fn min_content_len(mut self, min_content_len: usize) -> Self {
        self.limits.min_content_len = min_content_len;
        self
    }

    /// Build the limits
    pub fn build(self) -> AggregationLimits {
        self.limits
    }
}

impl AggregationLimits {
    /// Create a new builder
    pub fn builder() -> AggregationLimitsBuilder {
        AggregationLimitsBuilder::new()
    }
}
