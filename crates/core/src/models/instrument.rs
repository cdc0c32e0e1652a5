use serde::{Deserialize, Serialize};

/// A snapshot of one tradable instrument as the market view shows it.
///
/// Prices are whole currency units. The backend quotes integers and the
/// sandbox never needs sub-unit precision, so zero/negative/non-finite
/// prices are unrepresentable by type.
///
/// **Equality and hashing** are based solely on `symbol`, NOT on `name`
/// or prices. A quote refresh must not change map identity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instrument {
    /// Ticker symbol, uppercased (e.g., "SPRT", "CHOC")
    pub symbol: String,

    /// Human-readable company name (e.g., "Sprout Robotics")
    pub name: String,

    /// Latest known price
    pub current_price: u64,

    /// Reference price before the current observation (previous close).
    /// May be 0 when the backend has no reference yet; treated as equal
    /// to `current_price` wherever a trend is derived from it.
    pub previous_price: u64,
}

impl PartialEq for Instrument {
    fn eq(&self, other: &Self) -> bool {
        self.symbol == other.symbol
    }
}

impl Eq for Instrument {}

impl std::hash::Hash for Instrument {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.symbol.hash(state);
    }
}

impl Instrument {
    pub fn new(
        symbol: impl Into<String>,
        name: impl Into<String>,
        current_price: u64,
        previous_price: u64,
    ) -> Self {
        Self {
            symbol: symbol.into().to_uppercase(),
            name: name.into(),
            current_price,
            previous_price,
        }
    }

    /// The reference price with the falsy-zero case coerced away:
    /// a missing previous close means a flat reference.
    #[must_use]
    pub fn reference_price(&self) -> u64 {
        if self.previous_price == 0 {
            self.current_price
        } else {
            self.previous_price
        }
    }

    /// Absolute change against the reference price (may be negative).
    #[must_use]
    pub fn change(&self) -> i64 {
        self.current_price as i64 - self.reference_price() as i64
    }

    /// Percentage change against the reference price.
    /// 0.0 when the reference price itself is 0.
    #[must_use]
    pub fn change_pct(&self) -> f64 {
        let reference = self.reference_price();
        if reference == 0 {
            return 0.0;
        }
        self.change() as f64 / reference as f64 * 100.0
    }
}
