use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::instrument::Instrument;
use crate::models::lesson::{Lesson, Quiz};
use crate::models::range::ChartRange;
use crate::models::series::PriceSeries;

/// Trait abstraction over the product backend.
///
/// The REST client implements this against the real server; tests use
/// in-memory mocks. If the backend contract shifts, only the one
/// implementation changes — services and the facade are untouched.
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
pub trait BackendProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// The full market list shown on the trading screen.
    async fn fetch_quotes(&self) -> Result<Vec<Instrument>, CoreError>;

    /// One instrument's latest quote.
    async fn fetch_quote(&self, symbol: &str) -> Result<Instrument, CoreError>;

    /// Real price history for the chart. Providers that cannot serve a
    /// range return an error; the chart service then falls back to the
    /// synthetic series.
    async fn fetch_history(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> Result<PriceSeries, CoreError>;

    /// All published lessons.
    async fn fetch_lessons(&self) -> Result<Vec<Lesson>, CoreError>;

    /// The quizzes attached to one lesson.
    async fn fetch_quizzes(&self, lesson_id: u64) -> Result<Vec<Quiz>, CoreError>;
}
