use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::trade::Trade;

/// Valuation and performance of the whole sandbox at a point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingSummary {
    /// Timestamp this summary was computed for
    pub as_of: DateTime<Utc>,

    /// Total number of executed trades
    pub trade_count: usize,

    pub buy_count: usize,

    pub sell_count: usize,

    /// Sum of all order values (buys + sells)
    pub turnover: u64,

    /// Number of distinct symbols ever traded
    pub distinct_symbols: usize,

    /// Timestamp of the first trade, if any
    pub first_trade_at: Option<DateTime<Utc>>,

    /// Timestamp of the most recent trade, if any
    pub last_trade_at: Option<DateTime<Utc>>,

    /// Uninvested cash
    pub cash: u64,

    /// Market value of all current holdings
    pub holdings_value: u64,

    /// cash + holdings_value
    pub total_value: u64,

    /// Profit locked in by sells (proceeds minus average cost)
    pub realized_gain: i64,

    /// Paper profit on current holdings (market value minus cost basis)
    pub unrealized_gain: i64,

    /// (realized + unrealized) / total invested cost × 100
    pub total_return_pct: f64,

    /// Per-symbol breakdown, largest allocation first
    pub holdings: Vec<HoldingSummary>,
}

/// Valuation of a single held symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoldingSummary {
    pub symbol: String,

    /// Instrument name from the most recent trade in it
    pub name: String,

    /// Shares currently held
    pub quantity: u64,

    /// Average cost per share over the buys that built this position
    pub average_cost: f64,

    /// Quote used for valuation
    pub current_price: u64,

    /// quantity × current_price
    pub current_value: u64,

    /// current_value − cost basis (may be negative)
    pub gain_loss: i64,

    /// gain_loss / cost basis × 100
    pub return_pct: f64,

    /// current_value / total holdings value × 100
    pub allocation_pct: f64,
}

/// Trading style bucket shown on the tendency dashboard.
///
/// Thresholds (product constants): `Aggressive` at ≥ 3 trades per
/// active day, or a sell ratio ≥ 0.5 across ≥ 5 trades; `Cautious` at
/// ≤ 4 trades total or at most 2 distinct symbols; `Balanced`
/// otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TendencyKind {
    Cautious,
    Balanced,
    Aggressive,
}

impl std::fmt::Display for TendencyKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TendencyKind::Cautious => write!(f, "Cautious"),
            TendencyKind::Balanced => write!(f, "Balanced"),
            TendencyKind::Aggressive => write!(f, "Aggressive"),
        }
    }
}

/// Tendency classification plus the signals that produced it, so the
/// dashboard can explain the verdict instead of just naming it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TendencyReport {
    pub kind: TendencyKind,

    /// Calendar days with at least one trade
    pub active_days: usize,

    /// trade_count / active_days (0.0 with no trades)
    pub trades_per_active_day: f64,

    /// Distinct symbols ever traded
    pub distinct_symbols: usize,

    /// sell_count / trade_count (0.0 with no trades)
    pub sell_ratio: f64,
}

/// Quiz progress rolled up for the dashboard and the parent report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuizProgress {
    pub answered: usize,
    pub correct: usize,
    /// correct / answered × 100 (0.0 with no answers)
    pub accuracy_pct: f64,
}

/// Everything the parent-monitoring view renders.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentReport {
    /// Child's chosen nickname, if set
    pub nickname: Option<String>,

    pub as_of: DateTime<Utc>,

    pub cash: u64,

    pub holdings_value: u64,

    pub total_value: u64,

    /// realized + unrealized gain across the sandbox's life
    pub total_gain_loss: i64,

    /// Window the activity counters cover, in days
    pub window_days: i64,

    /// Trades executed inside the window
    pub trades_in_window: usize,

    /// Most recent trades, newest first, capped for display
    pub recent_trades: Vec<Trade>,

    pub quiz_progress: QuizProgress,
}
