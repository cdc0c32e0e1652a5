use serde::{Deserialize, Serialize};

/// A labeled price series ready for the frontend chart.
///
/// The core generates these — the frontend hands `labels` to the
/// category axis and `prices` to the line dataset, index-aligned,
/// oldest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceSeries {
    /// Human-readable timestamps, oldest first
    pub labels: Vec<String>,

    /// Prices in whole currency units, index-aligned with `labels`
    pub prices: Vec<u64>,
}

impl PriceSeries {
    pub fn new(labels: Vec<String>, prices: Vec<u64>) -> Self {
        Self { labels, prices }
    }

    /// Number of points in the series.
    #[must_use]
    pub fn len(&self) -> usize {
        self.prices.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// The most recent price, if the series has any points.
    #[must_use]
    pub fn latest(&self) -> Option<u64> {
        self.prices.last().copied()
    }
}
