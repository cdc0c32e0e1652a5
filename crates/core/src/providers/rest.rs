use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Duration;
use tracing::debug;

use super::traits::BackendProvider;
use crate::errors::CoreError;
use crate::models::instrument::Instrument;
use crate::models::lesson::{Lesson, Quiz};
use crate::models::range::ChartRange;
use crate::models::series::PriceSeries;

const DEFAULT_BASE_URL: &str = "https://api.moneysprout.app";

/// REST client for the MoneySprout backend.
///
/// Endpoints:
/// - `GET /api/stocks` — market list
/// - `GET /api/stocks/{symbol}` — single quote
/// - `GET /api/stocks/{symbol}/history?range={token}` — price history
/// - `GET /api/lessons` — published lessons
/// - `GET /api/lessons/{id}/quizzes` — quizzes for a lesson
pub struct RestBackendProvider {
    client: Client,
    base_url: String,
}

impl RestBackendProvider {
    /// Client against the production backend.
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }

    /// Client against an explicit base URL (staging, local dev).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let builder = Client::builder();
        #[cfg(not(target_arch = "wasm32"))]
        let builder = builder.timeout(Duration::from_secs(30));
        Self {
            client: builder.build().unwrap_or_else(|_| Client::new()),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
    ) -> Result<T, CoreError> {
        let url = format!("{}{path}", self.base_url);
        debug!(%url, "backend request");
        let resp = self.client.get(&url).send().await?;

        if !resp.status().is_success() {
            return Err(CoreError::Api {
                provider: "MoneySprout backend".into(),
                message: format!("{path} returned HTTP {}", resp.status()),
            });
        }

        resp.json().await.map_err(|e| CoreError::Api {
            provider: "MoneySprout backend".into(),
            message: format!("Failed to parse response from {path}: {e}"),
        })
    }
}

impl Default for RestBackendProvider {
    fn default() -> Self {
        Self::new()
    }
}

// ── Backend response types ──────────────────────────────────────────

#[derive(Deserialize)]
struct QuoteDto {
    symbol: String,
    name: String,
    #[serde(rename = "currentPrice")]
    current_price: u64,
    #[serde(rename = "previousPrice", default)]
    previous_price: u64,
}

impl From<QuoteDto> for Instrument {
    fn from(dto: QuoteDto) -> Self {
        Instrument::new(dto.symbol, dto.name, dto.current_price, dto.previous_price)
    }
}

#[derive(Deserialize)]
struct HistoryDto {
    labels: Vec<String>,
    prices: Vec<u64>,
}

#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
impl BackendProvider for RestBackendProvider {
    fn name(&self) -> &str {
        "MoneySprout backend"
    }

    async fn fetch_quotes(&self) -> Result<Vec<Instrument>, CoreError> {
        let quotes: Vec<QuoteDto> = self.get_json("/api/stocks").await?;
        Ok(quotes.into_iter().map(Instrument::from).collect())
    }

    async fn fetch_quote(&self, symbol: &str) -> Result<Instrument, CoreError> {
        let symbol = symbol.to_uppercase();
        let quote: QuoteDto = self.get_json(&format!("/api/stocks/{symbol}")).await?;
        Ok(quote.into())
    }

    async fn fetch_history(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> Result<PriceSeries, CoreError> {
        let symbol = symbol.to_uppercase();
        let history: HistoryDto = self
            .get_json(&format!("/api/stocks/{symbol}/history?range={range}"))
            .await?;

        if history.labels.len() != history.prices.len() {
            return Err(CoreError::Api {
                provider: "MoneySprout backend".into(),
                message: format!(
                    "History for {symbol} is misaligned: {} labels vs {} prices",
                    history.labels.len(),
                    history.prices.len()
                ),
            });
        }

        Ok(PriceSeries::new(history.labels, history.prices))
    }

    async fn fetch_lessons(&self) -> Result<Vec<Lesson>, CoreError> {
        self.get_json("/api/lessons").await
    }

    async fn fetch_quizzes(&self, lesson_id: u64) -> Result<Vec<Quiz>, CoreError> {
        self.get_json(&format!("/api/lessons/{lesson_id}/quizzes"))
            .await
    }
}
