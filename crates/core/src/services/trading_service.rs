use chrono::{DateTime, Utc};
use std::collections::HashMap;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::sandbox::SandboxState;
use crate::models::trade::{Trade, TradeSide, TradeSortOrder};

/// Executes sandbox orders and derives positions from the ledger.
///
/// Pure business logic — no I/O, no market data. The fill price is
/// supplied by the caller (the facade passes the cached quote), so the
/// service stays synchronous and easy to test.
pub struct TradingService;

impl TradingService {
    pub fn new() -> Self {
        Self
    }

    /// Execute a buy: debit cash, append to the ledger.
    ///
    /// Rules:
    /// - quantity must be positive
    /// - the order value must not exceed available cash
    pub fn buy(
        &self,
        state: &mut SandboxState,
        symbol: &str,
        name: &str,
        quantity: u64,
        price: u64,
        at: DateTime<Utc>,
    ) -> Result<Uuid, CoreError> {
        Self::validate_order(quantity, price)?;

        let cost = quantity * price;
        if cost > state.cash {
            return Err(CoreError::InsufficientFunds {
                needed: cost,
                available: state.cash,
            });
        }

        let trade = Trade::new(TradeSide::Buy, symbol, name, quantity, price, at);
        let id = trade.id;
        state.cash -= cost;
        Self::insert_sorted(&mut state.trades, trade);
        Ok(id)
    }

    /// Execute a sell: credit cash, append to the ledger.
    ///
    /// Rules:
    /// - quantity must be positive
    /// - cannot sell more shares than currently held
    pub fn sell(
        &self,
        state: &mut SandboxState,
        symbol: &str,
        name: &str,
        quantity: u64,
        price: u64,
        at: DateTime<Utc>,
    ) -> Result<Uuid, CoreError> {
        Self::validate_order(quantity, price)?;

        let symbol_upper = symbol.to_uppercase();
        let held = self
            .holdings(state)
            .get(&symbol_upper)
            .copied()
            .unwrap_or(0);
        if held < quantity {
            return Err(CoreError::InsufficientHoldings {
                symbol: symbol_upper,
                requested: quantity,
                held,
            });
        }

        let trade = Trade::new(TradeSide::Sell, symbol, name, quantity, price, at);
        let id = trade.id;
        state.cash += quantity * price;
        Self::insert_sorted(&mut state.trades, trade);
        Ok(id)
    }

    /// Shares currently held per symbol, derived by replaying the
    /// ledger. Symbols sold down to zero are omitted.
    pub fn holdings(&self, state: &SandboxState) -> HashMap<String, u64> {
        let mut holdings: HashMap<String, u64> = HashMap::new();

        for trade in &state.trades {
            let entry = holdings.entry(trade.symbol.clone()).or_insert(0);
            match trade.side {
                TradeSide::Buy => *entry += trade.quantity,
                // Sells never exceed holdings; enforced at execution.
                TradeSide::Sell => *entry = entry.saturating_sub(trade.quantity),
            }
        }

        holdings.retain(|_, quantity| *quantity > 0);
        holdings
    }

    /// Average cost per share of the current position in `symbol`.
    ///
    /// Moving-average basis: sells consume shares at the running
    /// average without changing it; buys fold in at their fill price.
    /// `None` when nothing is held.
    pub fn average_cost(&self, state: &SandboxState, symbol: &str) -> Option<f64> {
        let symbol = symbol.to_uppercase();
        let mut quantity = 0u64;
        let mut cost_basis = 0.0f64;

        for trade in &state.trades {
            if trade.symbol != symbol {
                continue;
            }
            match trade.side {
                TradeSide::Buy => {
                    quantity += trade.quantity;
                    cost_basis += (trade.quantity * trade.price) as f64;
                }
                TradeSide::Sell => {
                    if quantity > 0 {
                        let average = cost_basis / quantity as f64;
                        cost_basis -= average * trade.quantity.min(quantity) as f64;
                        quantity = quantity.saturating_sub(trade.quantity);
                    }
                }
            }
        }

        if quantity > 0 {
            Some(cost_basis / quantity as f64)
        } else {
            None
        }
    }

    /// The most recent fill price for `symbol`, if it was ever traded.
    /// Used as a valuation fallback when no quote is fetchable.
    pub fn last_trade_price(&self, state: &SandboxState, symbol: &str) -> Option<u64> {
        let symbol = symbol.to_uppercase();
        state
            .trades
            .iter()
            .rev()
            .find(|t| t.symbol == symbol)
            .map(|t| t.price)
    }

    /// All trades, newest first (display order).
    pub fn get_trades<'a>(&self, state: &'a SandboxState) -> Vec<&'a Trade> {
        let mut trades: Vec<&Trade> = state.trades.iter().collect();
        trades.reverse(); // ledger is oldest-first
        trades
    }

    /// Trades in `symbol`, newest first.
    pub fn trades_for_symbol<'a>(
        &self,
        state: &'a SandboxState,
        symbol: &str,
    ) -> Vec<&'a Trade> {
        let upper = symbol.to_uppercase();
        let mut trades: Vec<&Trade> = state
            .trades
            .iter()
            .filter(|t| t.symbol == upper)
            .collect();
        trades.reverse();
        trades
    }

    /// Trades of one side (all buys or all sells), newest first.
    pub fn trades_by_side<'a>(
        &self,
        state: &'a SandboxState,
        side: TradeSide,
    ) -> Vec<&'a Trade> {
        let mut trades: Vec<&Trade> = state
            .trades
            .iter()
            .filter(|t| t.side == side)
            .collect();
        trades.reverse();
        trades
    }

    /// Trades executed inside a time window (inclusive), newest first.
    pub fn trades_in_range<'a>(
        &self,
        state: &'a SandboxState,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> Vec<&'a Trade> {
        let mut trades: Vec<&Trade> = state
            .trades
            .iter()
            .filter(|t| t.executed_at >= from && t.executed_at <= to)
            .collect();
        trades.reverse();
        trades
    }

    /// Case-insensitive search over symbol and name.
    pub fn search_trades<'a>(&self, state: &'a SandboxState, query: &str) -> Vec<&'a Trade> {
        let q = query.to_lowercase();
        state
            .trades
            .iter()
            .filter(|t| {
                t.symbol.to_lowercase().contains(&q) || t.name.to_lowercase().contains(&q)
            })
            .collect()
    }

    /// Trades in an explicit sort order.
    pub fn trades_sorted<'a>(
        &self,
        state: &'a SandboxState,
        order: &TradeSortOrder,
    ) -> Vec<&'a Trade> {
        let mut trades: Vec<&Trade> = state.trades.iter().collect();
        match order {
            TradeSortOrder::DateDesc => {
                trades.sort_by(|a, b| b.executed_at.cmp(&a.executed_at));
            }
            TradeSortOrder::DateAsc => {
                trades.sort_by(|a, b| a.executed_at.cmp(&b.executed_at));
            }
            TradeSortOrder::ValueDesc => trades.sort_by(|a, b| b.value().cmp(&a.value())),
            TradeSortOrder::ValueAsc => trades.sort_by(|a, b| a.value().cmp(&b.value())),
            TradeSortOrder::SymbolAsc => trades.sort_by(|a, b| a.symbol.cmp(&b.symbol)),
            TradeSortOrder::SymbolDesc => trades.sort_by(|a, b| b.symbol.cmp(&a.symbol)),
        }
        trades
    }

    fn validate_order(quantity: u64, price: u64) -> Result<(), CoreError> {
        if quantity == 0 {
            return Err(CoreError::Validation(
                "Order quantity must be positive".into(),
            ));
        }
        if price == 0 {
            return Err(CoreError::Validation("Order price must be positive".into()));
        }
        Ok(())
    }

    /// Binary insert into the timestamp-sorted ledger in O(log n).
    /// Orders normally arrive in time order; this keeps the invariant
    /// even when a clock hiccup delivers one late.
    fn insert_sorted(trades: &mut Vec<Trade>, trade: Trade) {
        let pos = trades
            .binary_search_by_key(&trade.executed_at, |t| t.executed_at)
            .unwrap_or_else(|pos| pos);
        trades.insert(pos, trade);
    }
}

impl Default for TradingService {
    fn default() -> Self {
        Self::new()
    }
}
