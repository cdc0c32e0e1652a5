use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Direction of a sandbox trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TradeSide {
    /// Buying shares with sandbox cash
    Buy,
    /// Selling held shares back to cash
    Sell,
}

impl std::fmt::Display for TradeSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeSide::Buy => write!(f, "Buy"),
            TradeSide::Sell => write!(f, "Sell"),
        }
    }
}

/// Sort order for trade listings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TradeSortOrder {
    /// Newest first (default for display)
    DateDesc,
    /// Oldest first
    DateAsc,
    /// Largest order value first
    ValueDesc,
    /// Smallest order value first
    ValueAsc,
    /// Alphabetical by symbol
    SymbolAsc,
    /// Reverse alphabetical by symbol
    SymbolDesc,
}

/// One executed order in the sandbox ledger.
///
/// The fill price is captured at execution time — the ledger is the
/// source of truth for cost basis, so later quote changes never rewrite
/// history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    /// Unique identifier
    pub id: Uuid,

    /// Buy or Sell
    pub side: TradeSide,

    /// Instrument symbol, uppercased
    pub symbol: String,

    /// Instrument name at execution time (symbols can be delisted)
    pub name: String,

    /// Number of shares (always positive)
    pub quantity: u64,

    /// Fill price per share in whole currency units
    pub price: u64,

    /// Execution timestamp
    pub executed_at: DateTime<Utc>,
}

impl Trade {
    pub fn new(
        side: TradeSide,
        symbol: impl Into<String>,
        name: impl Into<String>,
        quantity: u64,
        price: u64,
        executed_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            side,
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            quantity,
            price,
            executed_at,
        }
    }

    /// Total order value (quantity × fill price).
    #[must_use]
    pub fn value(&self) -> u64 {
        self.quantity * self.price
    }
}
