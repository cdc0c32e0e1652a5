use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, HashSet};

use crate::models::analytics::{
    HoldingSummary, ParentReport, TendencyKind, TendencyReport, TradingSummary,
};
use crate::models::sandbox::SandboxState;
use crate::models::trade::TradeSide;
use crate::services::lesson_service::LessonService;
use crate::services::trading_service::TradingService;

/// How many trades the parent report lists, newest first.
const RECENT_TRADE_CAP: usize = 10;

// Tendency thresholds — product constants, mirrored in the dashboard
// copy that explains each bucket.
const AGGRESSIVE_TRADES_PER_DAY: f64 = 3.0;
const AGGRESSIVE_SELL_RATIO: f64 = 0.5;
const AGGRESSIVE_MIN_TRADES: usize = 5;
const CAUTIOUS_MAX_TRADES: usize = 4;
const CAUTIOUS_MAX_SYMBOLS: usize = 2;

/// Computes the tendency dashboard and the parent-monitoring report.
///
/// All numbers derive from the ledger plus the quotes the caller
/// supplies; nothing here touches the network.
pub struct TendencyService {
    trading_service: TradingService,
    lesson_service: LessonService,
}

impl TendencyService {
    pub fn new() -> Self {
        Self {
            trading_service: TradingService::new(),
            lesson_service: LessonService::new(),
        }
    }

    /// Full sandbox valuation and performance breakdown.
    ///
    /// `prices` maps held symbols to their latest quotes. A held symbol
    /// missing from the map is valued at its most recent fill price —
    /// the ledger always has one.
    pub fn trading_summary(
        &self,
        state: &SandboxState,
        prices: &HashMap<String, u64>,
        as_of: DateTime<Utc>,
    ) -> TradingSummary {
        let mut buy_count = 0usize;
        let mut sell_count = 0usize;
        let mut turnover = 0u64;
        let mut invested = 0u64;
        let mut realized_gain = 0.0f64;
        let mut symbols_traded: HashSet<&str> = HashSet::new();

        // Replay the ledger once: counts, turnover, and the moving-average
        // cost basis that realized gains are measured against.
        let mut positions: HashMap<String, (u64, f64)> = HashMap::new();
        let mut names: HashMap<String, String> = HashMap::new();

        for trade in &state.trades {
            symbols_traded.insert(&trade.symbol);
            turnover += trade.value();
            names.insert(trade.symbol.clone(), trade.name.clone());

            let (quantity, cost_basis) = positions
                .entry(trade.symbol.clone())
                .or_insert((0u64, 0.0f64));
            match trade.side {
                TradeSide::Buy => {
                    buy_count += 1;
                    invested += trade.value();
                    *quantity += trade.quantity;
                    *cost_basis += trade.value() as f64;
                }
                TradeSide::Sell => {
                    sell_count += 1;
                    if *quantity > 0 {
                        let average = *cost_basis / *quantity as f64;
                        let sold = trade.quantity.min(*quantity);
                        realized_gain += trade.value() as f64 - average * sold as f64;
                        *cost_basis -= average * sold as f64;
                        *quantity -= sold;
                    }
                }
            }
        }

        // Value what is still held.
        let mut holdings = Vec::new();
        let mut holdings_value = 0u64;
        let mut unrealized_gain = 0.0f64;

        for (symbol, (quantity, cost_basis)) in &positions {
            if *quantity == 0 {
                continue;
            }
            let current_price = prices.get(symbol).copied().unwrap_or_else(|| {
                self.trading_service
                    .last_trade_price(state, symbol)
                    .unwrap_or(0)
            });
            let current_value = quantity * current_price;
            let gain_loss = current_value as f64 - cost_basis;

            holdings_value += current_value;
            unrealized_gain += gain_loss;

            holdings.push(HoldingSummary {
                symbol: symbol.clone(),
                name: names.get(symbol).cloned().unwrap_or_default(),
                quantity: *quantity,
                average_cost: cost_basis / *quantity as f64,
                current_price,
                current_value,
                gain_loss: gain_loss.round() as i64,
                return_pct: if *cost_basis > 0.0 {
                    gain_loss / cost_basis * 100.0
                } else {
                    0.0
                },
                allocation_pct: 0.0, // filled below, needs the total
            });
        }

        for holding in &mut holdings {
            holding.allocation_pct = if holdings_value > 0 {
                holding.current_value as f64 / holdings_value as f64 * 100.0
            } else {
                0.0
            };
        }
        holdings.sort_by(|a, b| {
            b.allocation_pct
                .partial_cmp(&a.allocation_pct)
                .unwrap_or(std::cmp::Ordering::Equal)
        });

        let total_gain = realized_gain + unrealized_gain;
        let total_return_pct = if invested > 0 {
            total_gain / invested as f64 * 100.0
        } else {
            0.0
        };

        TradingSummary {
            as_of,
            trade_count: state.trades.len(),
            buy_count,
            sell_count,
            turnover,
            distinct_symbols: symbols_traded.len(),
            first_trade_at: state.trades.first().map(|t| t.executed_at),
            last_trade_at: state.trades.last().map(|t| t.executed_at),
            cash: state.cash,
            holdings_value,
            total_value: state.cash + holdings_value,
            realized_gain: realized_gain.round() as i64,
            unrealized_gain: unrealized_gain.round() as i64,
            total_return_pct,
            holdings,
        }
    }

    /// Classify the trading style from ledger signals alone.
    pub fn tendency_report(&self, state: &SandboxState) -> TendencyReport {
        let trade_count = state.trades.len();
        let sell_count = state
            .trades
            .iter()
            .filter(|t| t.side == TradeSide::Sell)
            .count();

        let active_days = state
            .trades
            .iter()
            .map(|t| t.executed_at.date_naive())
            .collect::<HashSet<_>>()
            .len();

        let distinct_symbols = state
            .trades
            .iter()
            .map(|t| t.symbol.as_str())
            .collect::<HashSet<_>>()
            .len();

        let trades_per_active_day = if active_days > 0 {
            trade_count as f64 / active_days as f64
        } else {
            0.0
        };
        let sell_ratio = if trade_count > 0 {
            sell_count as f64 / trade_count as f64
        } else {
            0.0
        };

        let kind = if trades_per_active_day >= AGGRESSIVE_TRADES_PER_DAY
            || (sell_ratio >= AGGRESSIVE_SELL_RATIO && trade_count >= AGGRESSIVE_MIN_TRADES)
        {
            TendencyKind::Aggressive
        } else if trade_count <= CAUTIOUS_MAX_TRADES || distinct_symbols <= CAUTIOUS_MAX_SYMBOLS {
            TendencyKind::Cautious
        } else {
            TendencyKind::Balanced
        };

        TendencyReport {
            kind,
            active_days,
            trades_per_active_day,
            distinct_symbols,
            sell_ratio,
        }
    }

    /// Everything the parent-monitoring view renders, windowed to the
    /// last `window_days` days of activity.
    pub fn parent_report(
        &self,
        state: &SandboxState,
        prices: &HashMap<String, u64>,
        window_days: i64,
        as_of: DateTime<Utc>,
    ) -> ParentReport {
        let summary = self.trading_summary(state, prices, as_of);

        let window_start = as_of - Duration::days(window_days);
        let trades_in_window = state
            .trades
            .iter()
            .filter(|t| t.executed_at >= window_start && t.executed_at <= as_of)
            .count();

        let recent_trades = state
            .trades
            .iter()
            .rev()
            .take(RECENT_TRADE_CAP)
            .cloned()
            .collect();

        ParentReport {
            nickname: state.settings.nickname.clone(),
            as_of,
            cash: summary.cash,
            holdings_value: summary.holdings_value,
            total_value: summary.total_value,
            total_gain_loss: summary.realized_gain + summary.unrealized_gain,
            window_days,
            trades_in_window,
            recent_trades,
            quiz_progress: self.lesson_service.progress(state),
        }
    }
}

impl Default for TendencyService {
    fn default() -> Self {
        Self::new()
    }
}
