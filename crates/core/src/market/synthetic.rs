use chrono::{DateTime, Utc};

use crate::models::instrument::Instrument;
use crate::models::range::ChartRange;
use crate::models::series::PriceSeries;

/// Cap on the trend contribution per point: the previous→current move
/// is spread across the series but never exceeds ±5% of the reference.
const TREND_CAP: f64 = 0.05;

/// Amplitude of the per-point momentum draw.
const MOMENTUM_AMPLITUDE: f64 = 0.0002;

/// Probability that a long-range point reverses its trend contribution.
const REVERSAL_PROBABILITY: f64 = 0.03;

/// Probability that a short-range point takes a price spike.
const SPIKE_PROBABILITY: f64 = 0.01;

/// Amplitude of the spike draw on short ranges.
const SPIKE_AMPLITUDE: f64 = 0.003;

/// The multiplicative LCG behind synthetic series.
///
/// Deliberately tiny and fixed: the same constants ship in the
/// frontend's fallback chart, and both sides must produce identical
/// series for the same instrument. Not a general randomness source —
/// crypto code uses `getrandom`.
#[derive(Debug, Clone)]
struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    /// Advance the state and return a draw in [0, 1).
    fn next(&mut self) -> f64 {
        self.state = (self.state.wrapping_mul(9301).wrapping_add(49297)) % 233_280;
        self.state as f64 / 233_280.0
    }
}

/// Seed an [`Lcg`] from an instrument symbol: the sum of its character
/// codes. The empty string seeds 0, which is still deterministic.
fn seed_from_symbol(symbol: &str) -> u64 {
    symbol.chars().map(|c| c as u64).sum()
}

/// Generate a plausible price history for `instrument` when the real
/// history endpoint is unavailable.
///
/// The series is a deterministic function of (symbol, previous price,
/// current price, range, `now`): a pseudo-random walk around the
/// linear previous→current trend, with the range's configured point
/// count, spacing, and volatility. Regenerating with the same inputs
/// yields the identical series, so the chart doesn't flicker across
/// refreshes within the same clock tick.
///
/// Guarantees, regardless of input:
/// - `labels.len() == prices.len() == point_count(range)`
/// - every price ≥ 1
/// - the final price equals the instrument's current price exactly
#[must_use]
pub fn generate_at(
    instrument: &Instrument,
    range: ChartRange,
    now: DateTime<Utc>,
) -> PriceSeries {
    let config = range.config();
    let point_count = config.point_count;

    // Falsy reference price means a flat reference: zero trend.
    // A zero current price is lifted to 1 so the pinned last point
    // cannot break the positivity guarantee.
    let current = instrument.current_price.max(1);
    let previous = if instrument.previous_price == 0 {
        current
    } else {
        instrument.previous_price
    };

    let total_move = (current as f64 - previous as f64) / previous as f64;

    let mut rng = Lcg::new(seed_from_symbol(&instrument.symbol));
    let mut labels = Vec::with_capacity(point_count);
    let mut prices = Vec::with_capacity(point_count);

    // `back` counts intervals behind `now`; the walk runs oldest first.
    // The draw order below (variation, momentum, branch check, spike)
    // is shared with the frontend fallback and must not be reordered.
    let denominator = point_count.saturating_sub(1).max(1) as f64;
    for back in (0..point_count).rev() {
        let progress = (point_count - 1 - back) as f64 / denominator;
        let mut trend = (total_move * progress).clamp(-TREND_CAP, TREND_CAP);

        let variation = (rng.next() - 0.5) * config.volatility;

        let is_oldest = back + 1 == point_count;
        let momentum = if is_oldest {
            0.0
        } else {
            (rng.next() - 0.5) * MOMENTUM_AMPLITUDE
        };

        let mut spike = 0.0;
        if range.is_long() {
            if rng.next() < REVERSAL_PROBABILITY {
                trend *= -0.1;
            }
        } else if range.is_short() && rng.next() < SPIKE_PROBABILITY {
            spike = (rng.next() - 0.5) * SPIKE_AMPLITUDE;
        }

        let price = previous as f64 * (1.0 + trend + variation + momentum + spike);
        prices.push((price.round() as i64).max(1) as u64);

        let timestamp = now - config.interval * back as i32;
        labels.push(range.format_label(timestamp));
    }

    // Hard postcondition: the newest point shows the live quote.
    if let Some(last) = prices.last_mut() {
        *last = current;
    }

    PriceSeries::new(labels, prices)
}

/// [`generate_at`] against the wall clock.
#[must_use]
pub fn generate(instrument: &Instrument, range: ChartRange) -> PriceSeries {
    generate_at(instrument, range, Utc::now())
}
