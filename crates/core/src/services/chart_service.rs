use tracing::debug;

use crate::errors::CoreError;
use crate::market::synthetic;
use crate::models::analytics::TradingSummary;
use crate::models::instrument::Instrument;
use crate::models::range::ChartRange;
use crate::models::series::PriceSeries;
use crate::services::quote_service::QuoteService;

/// Shapes chart-ready data sets for the frontend.
///
/// The core computes all the numbers — the frontend only renders.
/// Price charts come from the backend history endpoint when it
/// answers, and from the synthetic generator when it doesn't, so the
/// chart is never blank.
pub struct ChartService;

impl ChartService {
    pub fn new() -> Self {
        Self
    }

    /// Price series for one instrument at the selected range.
    ///
    /// 1. Ask the backend for real history.
    /// 2. On failure, fetch (or reuse the cached) quote and synthesize
    ///    a deterministic series from it.
    ///
    /// Only fails when the instrument itself is unknown — a dead
    /// history endpoint alone never breaks the chart.
    pub async fn price_series(
        &self,
        quote_service: &QuoteService,
        symbol: &str,
        range: ChartRange,
    ) -> Result<PriceSeries, CoreError> {
        match quote_service.get_history(symbol, range).await {
            Ok(series) if !series.is_empty() => Ok(series),
            Ok(_) | Err(_) => {
                debug!(%symbol, %range, "history unavailable, synthesizing series");
                let quote = quote_service.get_quote(symbol).await?;
                Ok(self.synthesize(&quote, range))
            }
        }
    }

    /// Deterministic fallback series for an already-known quote.
    #[must_use]
    pub fn synthesize(&self, instrument: &Instrument, range: ChartRange) -> PriceSeries {
        synthetic::generate(instrument, range)
    }

    /// Allocation donut data from a trading summary: one slice per
    /// held symbol, percentages index-aligned with labels.
    #[must_use]
    pub fn allocation_series(&self, summary: &TradingSummary) -> (Vec<String>, Vec<f64>) {
        let labels = summary
            .holdings
            .iter()
            .map(|h| h.symbol.clone())
            .collect();
        let values = summary.holdings.iter().map(|h| h.allocation_pct).collect();
        (labels, values)
    }
}

impl Default for ChartService {
    fn default() -> Self {
        Self::new()
    }
}
