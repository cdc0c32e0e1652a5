use tracing::warn;

use crate::cache::TtlCache;
use crate::errors::CoreError;
use crate::models::instrument::Instrument;
use crate::models::lesson::{Lesson, Quiz};
use crate::models::range::ChartRange;
use crate::models::series::PriceSeries;
use crate::providers::registry::ProviderRegistry;

/// Cache key for the full market list.
const MARKET_LIST_KEY: &str = "__market_list";

/// Sort order for the market list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteSortOrder {
    /// Biggest gainers first
    ChangeDesc,
    /// Biggest losers first
    ChangeAsc,
    PriceDesc,
    PriceAsc,
    NameAsc,
}

/// Fetches market data and lessons through the provider registry, with
/// a five-minute TTL cache in front of the quote endpoints.
///
/// Cache strategy:
/// - The market list and single quotes go stale after five minutes —
///   the UI polls on that cadence.
/// - Price history is never cached: the chart regenerates per open and
///   the series is discarded on unmount.
///
/// Every fetch tries providers in registration order and returns the
/// first success; failures are logged and the last error surfaces only
/// when no provider answers.
pub struct QuoteService {
    registry: ProviderRegistry,
    list_cache: TtlCache<Vec<Instrument>>,
    quote_cache: TtlCache<Instrument>,
}

impl QuoteService {
    pub fn new(registry: ProviderRegistry) -> Self {
        Self {
            registry,
            list_cache: TtlCache::default(),
            quote_cache: TtlCache::default(),
        }
    }

    /// The full market list, cache-first.
    pub async fn get_quotes(&self) -> Result<Vec<Instrument>, CoreError> {
        if let Some(quotes) = self.list_cache.get(MARKET_LIST_KEY) {
            return Ok(quotes);
        }

        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in providers {
            match provider.fetch_quotes().await {
                Ok(quotes) => {
                    self.list_cache
                        .set(MARKET_LIST_KEY.to_string(), quotes.clone());
                    // Seed the single-quote cache so a list fetch followed
                    // by a detail open doesn't hit the network twice.
                    for quote in &quotes {
                        self.quote_cache.set(quote.symbol.clone(), quote.clone());
                    }
                    return Ok(quotes);
                }
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "market list fetch failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// One instrument's quote, cache-first.
    pub async fn get_quote(&self, symbol: &str) -> Result<Instrument, CoreError> {
        let symbol = symbol.to_uppercase();
        if let Some(quote) = self.quote_cache.get(&symbol) {
            return Ok(quote);
        }

        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in providers {
            match provider.fetch_quote(&symbol).await {
                Ok(quote) => {
                    self.quote_cache.set(symbol, quote.clone());
                    return Ok(quote);
                }
                Err(e) => {
                    warn!(provider = provider.name(), %symbol, error = %e, "quote fetch failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::QuoteNotAvailable(symbol)))
    }

    /// Real price history from the backend. No caching — the chart
    /// layer decides what to do when this fails.
    pub async fn get_history(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> Result<PriceSeries, CoreError> {
        let symbol = symbol.to_uppercase();
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in providers {
            match provider.fetch_history(&symbol, range).await {
                Ok(series) => return Ok(series),
                Err(e) => {
                    warn!(provider = provider.name(), %symbol, %range, error = %e, "history fetch failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::QuoteNotAvailable(symbol)))
    }

    /// All published lessons.
    pub async fn get_lessons(&self) -> Result<Vec<Lesson>, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in providers {
            match provider.fetch_lessons().await {
                Ok(lessons) => return Ok(lessons),
                Err(e) => {
                    warn!(provider = provider.name(), error = %e, "lesson fetch failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// Quizzes for one lesson.
    pub async fn get_quizzes(&self, lesson_id: u64) -> Result<Vec<Quiz>, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in providers {
            match provider.fetch_quizzes(lesson_id).await {
                Ok(quizzes) => return Ok(quizzes),
                Err(e) => {
                    warn!(provider = provider.name(), lesson_id, error = %e, "quiz fetch failed");
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// Drop all cached quotes (used by pull-to-refresh).
    pub fn invalidate(&self) {
        self.list_cache.clear();
        self.quote_cache.clear();
    }

    /// Number of cached single quotes.
    pub fn cached_quote_count(&self) -> usize {
        self.quote_cache.len()
    }

    /// Sort an already-fetched market list for display.
    pub fn sort_quotes(quotes: &mut [Instrument], order: &QuoteSortOrder) {
        match order {
            QuoteSortOrder::ChangeDesc => quotes.sort_by(|a, b| {
                b.change_pct()
                    .partial_cmp(&a.change_pct())
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            QuoteSortOrder::ChangeAsc => quotes.sort_by(|a, b| {
                a.change_pct()
                    .partial_cmp(&b.change_pct())
                    .unwrap_or(std::cmp::Ordering::Equal)
            }),
            QuoteSortOrder::PriceDesc => {
                quotes.sort_by(|a, b| b.current_price.cmp(&a.current_price));
            }
            QuoteSortOrder::PriceAsc => {
                quotes.sort_by(|a, b| a.current_price.cmp(&b.current_price));
            }
            QuoteSortOrder::NameAsc => quotes.sort_by(|a, b| a.name.cmp(&b.name)),
        }
    }

    /// Case-insensitive search over symbol and name of a fetched list.
    pub fn search_quotes<'a>(quotes: &'a [Instrument], query: &str) -> Vec<&'a Instrument> {
        let q = query.to_lowercase();
        quotes
            .iter()
            .filter(|i| {
                i.symbol.to_lowercase().contains(&q) || i.name.to_lowercase().contains(&q)
            })
            .collect()
    }
}
