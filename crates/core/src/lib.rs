pub mod cache;
pub mod errors;
pub mod market;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use models::{
    analytics::{ParentReport, QuizProgress, TendencyReport, TradingSummary},
    instrument::Instrument,
    lesson::{Difficulty, Lesson, LessonCategory, LessonSortOrder, Quiz, QuizResult},
    range::ChartRange,
    sandbox::SandboxState,
    series::PriceSeries,
    settings::Settings,
    trade::{Trade, TradeSide, TradeSortOrder},
};
use providers::registry::ProviderRegistry;
use services::{
    chart_service::ChartService, lesson_service::LessonService, quote_service::QuoteService,
    tendency_service::TendencyService, trading_service::TradingService,
};
use storage::manager::StorageManager;

use errors::CoreError;

/// Days of activity the parent report covers by default.
const DEFAULT_PARENT_WINDOW_DAYS: i64 = 7;

/// Main entry point for the MoneySprout core library.
/// Holds the sandbox state and all services needed to operate on it.
#[must_use]
pub struct MoneySprout {
    state: SandboxState,
    trading_service: TradingService,
    quote_service: QuoteService,
    chart_service: ChartService,
    lesson_service: LessonService,
    tendency_service: TendencyService,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for MoneySprout {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MoneySprout")
            .field("cash", &self.state.cash)
            .field("trades", &self.state.trades.len())
            .field("quiz_records", &self.state.quiz_records.len())
            .field("settings", &self.state.settings)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl MoneySprout {
    /// Create a brand new sandbox with default settings and full
    /// starting cash.
    pub fn create_new() -> Self {
        Self::build(SandboxState::default())
    }

    /// Create a sandbox with explicit settings (custom starting cash,
    /// staging backend, etc.).
    pub fn with_settings(settings: Settings) -> Self {
        Self::build(SandboxState::with_settings(settings))
    }

    /// Load an existing sandbox from encrypted bytes (password required).
    /// Use this for WASM / Tauri where the frontend handles file I/O.
    pub fn load_from_bytes(encrypted: &[u8], password: &str) -> Result<Self, CoreError> {
        let state = StorageManager::load_from_bytes(encrypted, password)?;
        Ok(Self::build(state))
    }

    /// Save the current sandbox to encrypted bytes.
    /// Returns raw bytes that the frontend can write to a file.
    /// Clears the unsaved-changes flag on success.
    pub fn save_to_bytes(&mut self, password: &str) -> Result<Vec<u8>, CoreError> {
        let bytes = StorageManager::save_to_bytes(&self.state, password)?;
        self.dirty = false;
        Ok(bytes)
    }

    /// Load from an encrypted file on disk (native only, not WASM).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<Self, CoreError> {
        let state = StorageManager::load_from_file(path, password)?;
        Ok(Self::build(state))
    }

    /// Save to an encrypted file on disk (native only, not WASM).
    /// Clears the unsaved-changes flag on success.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(&mut self, path: &str, password: &str) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.state, path, password)?;
        self.dirty = false;
        Ok(())
    }

    // ── Trading ─────────────────────────────────────────────────────

    /// Buy shares at the live quote. Fetches (or reuses the cached)
    /// quote, then fills at its current price.
    pub async fn buy(&mut self, symbol: &str, quantity: u64) -> Result<Uuid, CoreError> {
        let quote = self.quote_service.get_quote(symbol).await?;
        self.buy_with_quote(&quote, quantity)
    }

    /// Sell shares at the live quote.
    pub async fn sell(&mut self, symbol: &str, quantity: u64) -> Result<Uuid, CoreError> {
        let quote = self.quote_service.get_quote(symbol).await?;
        self.sell_with_quote(&quote, quantity)
    }

    /// Buy at an already-fetched quote (offline fill, tests).
    pub fn buy_with_quote(
        &mut self,
        quote: &Instrument,
        quantity: u64,
    ) -> Result<Uuid, CoreError> {
        let id = self.trading_service.buy(
            &mut self.state,
            &quote.symbol,
            &quote.name,
            quantity,
            quote.current_price,
            Utc::now(),
        )?;
        self.dirty = true;
        Ok(id)
    }

    /// Sell at an already-fetched quote (offline fill, tests).
    pub fn sell_with_quote(
        &mut self,
        quote: &Instrument,
        quantity: u64,
    ) -> Result<Uuid, CoreError> {
        let id = self.trading_service.sell(
            &mut self.state,
            &quote.symbol,
            &quote.name,
            quantity,
            quote.current_price,
            Utc::now(),
        )?;
        self.dirty = true;
        Ok(id)
    }

    /// Uninvested cash.
    #[must_use]
    pub fn cash(&self) -> u64 {
        self.state.cash
    }

    /// Shares currently held per symbol.
    #[must_use]
    pub fn holdings(&self) -> HashMap<String, u64> {
        self.trading_service.holdings(&self.state)
    }

    /// Average cost per share of the current position, if any.
    #[must_use]
    pub fn average_cost(&self, symbol: &str) -> Option<f64> {
        self.trading_service.average_cost(&self.state, symbol)
    }

    // ── Trade ledger ────────────────────────────────────────────────

    /// Get a single trade by its ID.
    #[must_use]
    pub fn get_trade(&self, trade_id: Uuid) -> Option<&Trade> {
        self.state.trades.iter().find(|t| t.id == trade_id)
    }

    /// All trades, newest first.
    #[must_use]
    pub fn trades(&self) -> Vec<&Trade> {
        self.trading_service.get_trades(&self.state)
    }

    /// Trades filtered by symbol (case-insensitive), newest first.
    #[must_use]
    pub fn trades_for_symbol(&self, symbol: &str) -> Vec<&Trade> {
        self.trading_service.trades_for_symbol(&self.state, symbol)
    }

    /// Trades filtered by side (all buys or all sells), newest first.
    #[must_use]
    pub fn trades_by_side(&self, side: TradeSide) -> Vec<&Trade> {
        self.trading_service.trades_by_side(&self.state, side)
    }

    /// Trades within a time window (inclusive), newest first.
    #[must_use]
    pub fn trades_in_range(&self, from: DateTime<Utc>, to: DateTime<Utc>) -> Vec<&Trade> {
        self.trading_service.trades_in_range(&self.state, from, to)
    }

    /// Search trades by symbol or name (case-insensitive).
    #[must_use]
    pub fn search_trades(&self, query: &str) -> Vec<&Trade> {
        self.trading_service.search_trades(&self.state, query)
    }

    /// Trades in an explicit sort order.
    #[must_use]
    pub fn trades_sorted(&self, order: &TradeSortOrder) -> Vec<&Trade> {
        self.trading_service.trades_sorted(&self.state, order)
    }

    /// Total number of trades without materializing a sorted vector.
    #[must_use]
    pub fn trade_count(&self) -> usize {
        self.state.trades.len()
    }

    // ── Market data ─────────────────────────────────────────────────

    /// The market list, cache-first (five-minute TTL).
    pub async fn market_quotes(&self) -> Result<Vec<Instrument>, CoreError> {
        self.quote_service.get_quotes().await
    }

    /// One instrument's quote, cache-first.
    pub async fn quote(&self, symbol: &str) -> Result<Instrument, CoreError> {
        self.quote_service.get_quote(symbol).await
    }

    /// Drop all cached quotes so the next fetch hits the network.
    pub fn refresh_market(&self) {
        self.quote_service.invalidate();
    }

    /// Number of cached single quotes.
    #[must_use]
    pub fn cached_quote_count(&self) -> usize {
        self.quote_service.cached_quote_count()
    }

    // ── Charts ──────────────────────────────────────────────────────

    /// Price series for the chart: real history when the backend
    /// answers, a deterministic synthetic series otherwise.
    pub async fn price_chart(
        &self,
        symbol: &str,
        range: ChartRange,
    ) -> Result<PriceSeries, CoreError> {
        self.chart_service
            .price_series(&self.quote_service, symbol, range)
            .await
    }

    /// Allocation donut data (labels + percentages) for the dashboard.
    pub async fn allocation_chart(&self) -> Result<(Vec<String>, Vec<f64>), CoreError> {
        let summary = self.trading_summary().await?;
        Ok(self.chart_service.allocation_series(&summary))
    }

    // ── Analytics & reports ─────────────────────────────────────────

    /// Full sandbox valuation. Quotes for held symbols come from the
    /// cache or network; a symbol nobody quotes anymore is valued at
    /// its most recent fill price.
    pub async fn trading_summary(&self) -> Result<TradingSummary, CoreError> {
        let prices = self.quotes_for_holdings().await;
        Ok(self
            .tendency_service
            .trading_summary(&self.state, &prices, Utc::now()))
    }

    /// Trading-style classification from ledger signals alone.
    /// Synchronous — no market data needed.
    #[must_use]
    pub fn tendency_report(&self) -> TendencyReport {
        self.tendency_service.tendency_report(&self.state)
    }

    /// The parent-monitoring report over the default 7-day window.
    pub async fn parent_report(&self) -> Result<ParentReport, CoreError> {
        self.parent_report_windowed(DEFAULT_PARENT_WINDOW_DAYS).await
    }

    /// The parent-monitoring report over an explicit window.
    pub async fn parent_report_windowed(
        &self,
        window_days: i64,
    ) -> Result<ParentReport, CoreError> {
        let prices = self.quotes_for_holdings().await;
        Ok(self
            .tendency_service
            .parent_report(&self.state, &prices, window_days, Utc::now()))
    }

    // ── Lessons & quizzes ───────────────────────────────────────────

    /// All published lessons from the backend.
    pub async fn lessons(&self) -> Result<Vec<Lesson>, CoreError> {
        self.quote_service.get_lessons().await
    }

    /// Quizzes attached to one lesson.
    pub async fn quizzes(&self, lesson_id: u64) -> Result<Vec<Quiz>, CoreError> {
        self.quote_service.get_quizzes(lesson_id).await
    }

    /// Grade an answer and record it in the sandbox.
    pub fn grade_quiz(
        &mut self,
        quiz: &Quiz,
        chosen_index: usize,
    ) -> Result<QuizResult, CoreError> {
        let result = self
            .lesson_service
            .grade(&mut self.state, quiz, chosen_index, Utc::now())?;
        self.dirty = true;
        Ok(result)
    }

    /// Overall quiz progress.
    #[must_use]
    pub fn quiz_progress(&self) -> QuizProgress {
        self.lesson_service.progress(&self.state)
    }

    /// Quiz progress split by lesson category.
    #[must_use]
    pub fn quiz_progress_by_category(
        &self,
        lessons: &[Lesson],
    ) -> HashMap<LessonCategory, QuizProgress> {
        self.lesson_service.progress_by_category(&self.state, lessons)
    }

    /// Lessons in one category, preserving fetch order.
    #[must_use]
    pub fn lessons_by_category<'a>(
        &self,
        lessons: &'a [Lesson],
        category: LessonCategory,
    ) -> Vec<&'a Lesson> {
        self.lesson_service.filter_by_category(lessons, category)
    }

    /// Lessons at one difficulty tier, preserving fetch order.
    #[must_use]
    pub fn lessons_by_difficulty<'a>(
        &self,
        lessons: &'a [Lesson],
        difficulty: Difficulty,
    ) -> Vec<&'a Lesson> {
        self.lesson_service.filter_by_difficulty(lessons, difficulty)
    }

    /// Search lessons by title or summary (case-insensitive).
    #[must_use]
    pub fn search_lessons<'a>(&self, lessons: &'a [Lesson], query: &str) -> Vec<&'a Lesson> {
        self.lesson_service.search(lessons, query)
    }

    /// Lessons in an explicit sort order.
    #[must_use]
    pub fn lessons_sorted<'a>(
        &self,
        lessons: &'a [Lesson],
        order: &LessonSortOrder,
    ) -> Vec<&'a Lesson> {
        self.lesson_service.sorted(lessons, order)
    }

    // ── Settings ────────────────────────────────────────────────────

    /// Current settings.
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.state.settings
    }

    /// Set or clear the display nickname.
    pub fn set_nickname(&mut self, nickname: Option<String>) {
        self.state.settings.nickname = nickname;
        self.dirty = true;
    }

    /// Set the cash granted on the next reset. Must be positive.
    pub fn set_starting_cash(&mut self, starting_cash: u64) -> Result<(), CoreError> {
        if starting_cash == 0 {
            return Err(CoreError::Validation(
                "Starting cash must be positive".into(),
            ));
        }
        self.state.settings.starting_cash = starting_cash;
        self.dirty = true;
        Ok(())
    }

    /// Point the sandbox at a different backend (e.g., staging).
    /// Rebuilds the provider registry so the change takes effect
    /// immediately; `None` restores the production URL.
    pub fn set_backend_url(&mut self, backend_url: Option<String>) {
        self.state.settings.backend_url = backend_url;
        let registry =
            ProviderRegistry::new_with_defaults(self.state.settings.backend_url.as_deref());
        self.quote_service = QuoteService::new(registry);
        self.dirty = true;
    }

    /// Start over: clear the ledger and quiz records, restore cash to
    /// the configured starting amount. Settings survive.
    pub fn reset_sandbox(&mut self) {
        self.state.trades.clear();
        self.state.quiz_records.clear();
        self.state.cash = self.state.settings.starting_cash;
        self.dirty = true;
    }

    // ── Password & dirty state ──────────────────────────────────────

    /// Re-encrypt the sandbox with a new parent password.
    /// Returns the encrypted bytes. The caller should write them to storage.
    ///
    /// `last_saved_bytes` must be the most recently saved encrypted
    /// bytes for this sandbox. The current password is verified by
    /// decrypting them; on mismatch this returns `CoreError::Decryption`.
    pub fn change_password(
        &mut self,
        last_saved_bytes: &[u8],
        current_password: &str,
        new_password: &str,
    ) -> Result<Vec<u8>, CoreError> {
        // Verify the current password against the actual saved data.
        StorageManager::load_from_bytes(last_saved_bytes, current_password)?;

        let new_bytes = StorageManager::save_to_bytes(&self.state, new_password)?;
        self.dirty = false;
        Ok(new_bytes)
    }

    /// Returns `true` if the sandbox has been modified since the last
    /// save or load.
    #[must_use]
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    // ── Export ──────────────────────────────────────────────────────

    /// Export the trade ledger as a JSON string.
    pub fn export_trades_to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.state.trades)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize trades: {e}")))
    }

    /// Export the trade ledger as a CSV string.
    /// Columns: id, side, symbol, name, quantity, price, value, executed_at
    #[must_use]
    pub fn export_trades_to_csv(&self) -> String {
        let mut csv = String::from("id,side,symbol,name,quantity,price,value,executed_at\n");
        for trade in &self.state.trades {
            // Escape CSV: quote names containing commas, quotes, or newlines
            let name = &trade.name;
            let escaped_name = if name.contains(',') || name.contains('"') || name.contains('\n')
            {
                format!("\"{}\"", name.replace('"', "\"\""))
            } else {
                name.clone()
            };
            csv.push_str(&format!(
                "{},{},{},{},{},{},{},{}\n",
                trade.id,
                trade.side,
                trade.symbol,
                escaped_name,
                trade.quantity,
                trade.price,
                trade.value(),
                trade.executed_at.to_rfc3339(),
            ));
        }
        csv
    }

    /// Export the full sandbox state as JSON (unencrypted snapshot for
    /// debugging/display).
    pub fn to_json(&self) -> Result<String, CoreError> {
        serde_json::to_string_pretty(&self.state)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize sandbox: {e}")))
    }

    // ── Internal ────────────────────────────────────────────────────

    /// Latest quotes for every held symbol. Fetch failures are skipped —
    /// valuation falls back to the last fill price for those symbols.
    async fn quotes_for_holdings(&self) -> HashMap<String, u64> {
        let mut prices = HashMap::new();
        for symbol in self.trading_service.holdings(&self.state).into_keys() {
            if let Ok(quote) = self.quote_service.get_quote(&symbol).await {
                prices.insert(symbol, quote.current_price);
            }
        }
        prices
    }

    fn build(state: SandboxState) -> Self {
        let registry = ProviderRegistry::new_with_defaults(state.settings.backend_url.as_deref());
        Self {
            state,
            trading_service: TradingService::new(),
            quote_service: QuoteService::new(registry),
            chart_service: ChartService::new(),
            lesson_service: LessonService::new(),
            tendency_service: TendencyService::new(),
            dirty: false,
        }
    }
}
