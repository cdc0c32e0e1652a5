use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::CoreError;

/// Chart granularity selected in the UI.
///
/// Each token carries a fixed (point count, interval, volatility)
/// configuration. The triples are product-visible constants shared with
/// the frontend chart — they are not tunable internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChartRange {
    #[serde(rename = "1m")]
    Minute1,
    #[serde(rename = "5m")]
    Minutes5,
    #[serde(rename = "10m")]
    Minutes10,
    #[serde(rename = "1h")]
    Hour1,
    #[serde(rename = "1d")]
    Day1,
    #[serde(rename = "1w")]
    Week1,
    #[serde(rename = "1mo")]
    Month1,
}

/// Per-range configuration attached to a [`ChartRange`] token.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RangeConfig {
    /// Number of (label, price) points in a generated series
    pub point_count: usize,

    /// Spacing between adjacent points
    pub interval: Duration,

    /// Per-point noise amplitude for synthetic series
    pub volatility: f64,
}

impl ChartRange {
    /// All tokens in UI display order.
    pub const ALL: [ChartRange; 7] = [
        ChartRange::Minute1,
        ChartRange::Minutes5,
        ChartRange::Minutes10,
        ChartRange::Hour1,
        ChartRange::Day1,
        ChartRange::Week1,
        ChartRange::Month1,
    ];

    /// The fixed configuration triple for this token.
    #[must_use]
    pub fn config(&self) -> RangeConfig {
        match self {
            ChartRange::Minute1 => RangeConfig {
                point_count: 20,
                interval: Duration::minutes(1),
                volatility: 0.001,
            },
            ChartRange::Minutes5 => RangeConfig {
                point_count: 24,
                interval: Duration::minutes(5),
                volatility: 0.0008,
            },
            ChartRange::Minutes10 => RangeConfig {
                point_count: 18,
                interval: Duration::minutes(10),
                volatility: 0.0006,
            },
            ChartRange::Hour1 => RangeConfig {
                point_count: 24,
                interval: Duration::hours(1),
                volatility: 0.0004,
            },
            ChartRange::Day1 => RangeConfig {
                point_count: 30,
                interval: Duration::days(1),
                volatility: 0.0003,
            },
            ChartRange::Week1 => RangeConfig {
                point_count: 12,
                interval: Duration::weeks(1),
                volatility: 0.0002,
            },
            // A "month" steps by a fixed 30 days, not calendar months.
            ChartRange::Month1 => RangeConfig {
                point_count: 12,
                interval: Duration::days(30),
                volatility: 0.0001,
            },
        }
    }

    /// Intraday ranges label points with a clock time.
    #[must_use]
    pub fn is_intraday(&self) -> bool {
        matches!(
            self,
            ChartRange::Minute1 | ChartRange::Minutes5 | ChartRange::Minutes10 | ChartRange::Hour1
        )
    }

    /// Short ranges are eligible for the synthetic spike branch.
    #[must_use]
    pub fn is_short(&self) -> bool {
        matches!(
            self,
            ChartRange::Minute1 | ChartRange::Minutes5 | ChartRange::Minutes10
        )
    }

    /// Long ranges are eligible for the synthetic trend-reversal branch.
    #[must_use]
    pub fn is_long(&self) -> bool {
        matches!(self, ChartRange::Day1 | ChartRange::Week1 | ChartRange::Month1)
    }

    /// Format one point's timestamp the way the chart axis shows it:
    /// - intraday: `HH:MM` (24-hour)
    /// - 1d: `M/D`
    /// - 1w: `M/D~M/D` (start through start + 6 days)
    /// - 1mo: `YY/M`
    #[must_use]
    pub fn format_label(&self, timestamp: DateTime<Utc>) -> String {
        match self {
            r if r.is_intraday() => timestamp.format("%H:%M").to_string(),
            ChartRange::Day1 => timestamp.format("%-m/%-d").to_string(),
            ChartRange::Week1 => {
                let end = timestamp + Duration::days(6);
                format!(
                    "{}~{}",
                    timestamp.format("%-m/%-d"),
                    end.format("%-m/%-d")
                )
            }
            _ => timestamp.format("%y/%-m").to_string(),
        }
    }

    /// The wire/UI token for this range.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            ChartRange::Minute1 => "1m",
            ChartRange::Minutes5 => "5m",
            ChartRange::Minutes10 => "10m",
            ChartRange::Hour1 => "1h",
            ChartRange::Day1 => "1d",
            ChartRange::Week1 => "1w",
            ChartRange::Month1 => "1mo",
        }
    }
}

impl std::fmt::Display for ChartRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ChartRange {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(ChartRange::Minute1),
            "5m" => Ok(ChartRange::Minutes5),
            "10m" => Ok(ChartRange::Minutes10),
            "1h" => Ok(ChartRange::Hour1),
            "1d" => Ok(ChartRange::Day1),
            "1w" => Ok(ChartRange::Week1),
            "1mo" => Ok(ChartRange::Month1),
            other => Err(CoreError::Validation(format!(
                "Unknown chart range '{other}' (expected one of 1m, 5m, 10m, 1h, 1d, 1w, 1mo)"
            ))),
        }
    }
}
