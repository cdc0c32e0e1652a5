use chrono::{Duration, TimeZone, Utc};
use moneysprout_core::models::instrument::Instrument;
use moneysprout_core::models::lesson::{Difficulty, Lesson, LessonCategory};
use moneysprout_core::models::range::ChartRange;
use moneysprout_core::models::sandbox::SandboxState;
use moneysprout_core::models::series::PriceSeries;
use moneysprout_core::models::settings::{Settings, DEFAULT_STARTING_CASH};
use moneysprout_core::models::trade::{Trade, TradeSide};

// ═══════════════════════════════════════════════════════════════════
//  ChartRange
// ═══════════════════════════════════════════════════════════════════

mod chart_range {
    use super::*;

    #[test]
    fn table_is_reproduced_verbatim() {
        let expected = [
            (ChartRange::Minute1, 20, Duration::minutes(1), 0.001),
            (ChartRange::Minutes5, 24, Duration::minutes(5), 0.0008),
            (ChartRange::Minutes10, 18, Duration::minutes(10), 0.0006),
            (ChartRange::Hour1, 24, Duration::hours(1), 0.0004),
            (ChartRange::Day1, 30, Duration::days(1), 0.0003),
            (ChartRange::Week1, 12, Duration::weeks(1), 0.0002),
            (ChartRange::Month1, 12, Duration::days(30), 0.0001),
        ];
        for (range, point_count, interval, volatility) in expected {
            let config = range.config();
            assert_eq!(config.point_count, point_count, "{range}");
            assert_eq!(config.interval, interval, "{range}");
            assert_eq!(config.volatility, volatility, "{range}");
        }
    }

    #[test]
    fn all_lists_every_token_once() {
        assert_eq!(ChartRange::ALL.len(), 7);
        let tokens: std::collections::HashSet<&str> =
            ChartRange::ALL.iter().map(|r| r.as_str()).collect();
        assert_eq!(tokens.len(), 7);
    }

    #[test]
    fn parse_roundtrips_every_token() {
        for range in ChartRange::ALL {
            let parsed: ChartRange = range.as_str().parse().unwrap();
            assert_eq!(parsed, range);
        }
    }

    #[test]
    fn parse_rejects_unknown_token() {
        assert!("2h".parse::<ChartRange>().is_err());
        assert!("".parse::<ChartRange>().is_err());
        assert!("1M".parse::<ChartRange>().is_err());
    }

    #[test]
    fn serde_uses_the_ui_token() {
        let json = serde_json::to_string(&ChartRange::Month1).unwrap();
        assert_eq!(json, "\"1mo\"");
        let back: ChartRange = serde_json::from_str("\"10m\"").unwrap();
        assert_eq!(back, ChartRange::Minutes10);
    }

    #[test]
    fn short_long_intraday_partition() {
        for range in ChartRange::ALL {
            // No token is both short and long.
            assert!(!(range.is_short() && range.is_long()), "{range}");
            // Short ranges are all intraday; long ranges never are.
            if range.is_short() {
                assert!(range.is_intraday(), "{range}");
            }
            if range.is_long() {
                assert!(!range.is_intraday(), "{range}");
            }
        }
        // 1h is intraday but takes neither synthetic branch.
        assert!(ChartRange::Hour1.is_intraday());
        assert!(!ChartRange::Hour1.is_short());
        assert!(!ChartRange::Hour1.is_long());
    }

    #[test]
    fn intraday_labels_use_24_hour_clock() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 2, 14, 5, 0).unwrap();
        assert_eq!(ChartRange::Minute1.format_label(ts), "14:05");
        assert_eq!(ChartRange::Hour1.format_label(ts), "14:05");
    }

    #[test]
    fn day_label_is_month_slash_day() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 2, 14, 5, 0).unwrap();
        assert_eq!(ChartRange::Day1.format_label(ts), "3/2");
    }

    #[test]
    fn week_label_spans_six_days() {
        let ts = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        assert_eq!(ChartRange::Week1.format_label(ts), "3/2~3/8");

        // Month boundary
        let ts = Utc.with_ymd_and_hms(2026, 2, 26, 0, 0, 0).unwrap();
        assert_eq!(ChartRange::Week1.format_label(ts), "2/26~3/4");
    }

    #[test]
    fn month_label_is_two_digit_year_slash_month() {
        let ts = Utc.with_ymd_and_hms(2026, 11, 20, 0, 0, 0).unwrap();
        assert_eq!(ChartRange::Month1.format_label(ts), "26/11");

        let ts = Utc.with_ymd_and_hms(2026, 3, 2, 0, 0, 0).unwrap();
        assert_eq!(ChartRange::Month1.format_label(ts), "26/3");
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Instrument
// ═══════════════════════════════════════════════════════════════════

mod instrument {
    use super::*;

    #[test]
    fn new_uppercases_symbol() {
        let i = Instrument::new("sprt", "Sprout Robotics", 5000, 4900);
        assert_eq!(i.symbol, "SPRT");
        assert_eq!(i.name, "Sprout Robotics");
    }

    #[test]
    fn equality_ignores_prices_and_name() {
        let a = Instrument::new("SPRT", "Sprout Robotics", 5000, 4900);
        let b = Instrument::new("SPRT", "Sprout Robotics Inc.", 5100, 5000);
        assert_eq!(a, b);

        let c = Instrument::new("CHOC", "ChocoWorks", 5000, 4900);
        assert_ne!(a, c);
    }

    #[test]
    fn reference_price_falls_back_to_current_when_zero() {
        let i = Instrument::new("SPRT", "Sprout Robotics", 500, 0);
        assert_eq!(i.reference_price(), 500);
        assert_eq!(i.change(), 0);
        assert_eq!(i.change_pct(), 0.0);
    }

    #[test]
    fn change_can_be_negative() {
        let i = Instrument::new("SPRT", "Sprout Robotics", 4500, 5000);
        assert_eq!(i.change(), -500);
        assert!((i.change_pct() - (-10.0)).abs() < 1e-9);
    }

    #[test]
    fn change_pct_of_gainer() {
        let i = Instrument::new("SPRT", "Sprout Robotics", 110, 100);
        assert!((i.change_pct() - 10.0).abs() < 1e-9);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  Trade
// ═══════════════════════════════════════════════════════════════════

mod trade {
    use super::*;

    #[test]
    fn new_uppercases_symbol_and_assigns_id() {
        let now = Utc::now();
        let a = Trade::new(TradeSide::Buy, "sprt", "Sprout Robotics", 10, 5000, now);
        let b = Trade::new(TradeSide::Buy, "sprt", "Sprout Robotics", 10, 5000, now);
        assert_eq!(a.symbol, "SPRT");
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn value_is_quantity_times_price() {
        let t = Trade::new(TradeSide::Sell, "SPRT", "Sprout Robotics", 3, 5000, Utc::now());
        assert_eq!(t.value(), 15_000);
    }

    #[test]
    fn side_display() {
        assert_eq!(TradeSide::Buy.to_string(), "Buy");
        assert_eq!(TradeSide::Sell.to_string(), "Sell");
    }

    #[test]
    fn serde_roundtrip() {
        let t = Trade::new(TradeSide::Buy, "SPRT", "Sprout Robotics", 10, 5000, Utc::now());
        let json = serde_json::to_string(&t).unwrap();
        let back: Trade = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  SandboxState & Settings
// ═══════════════════════════════════════════════════════════════════

mod sandbox {
    use super::*;

    #[test]
    fn default_sandbox_is_funded_and_empty() {
        let state = SandboxState::default();
        assert_eq!(state.cash, DEFAULT_STARTING_CASH);
        assert!(state.trades.is_empty());
        assert!(state.quiz_records.is_empty());
        assert_eq!(state.settings, Settings::default());
    }

    #[test]
    fn with_settings_uses_custom_starting_cash() {
        let settings = Settings {
            nickname: Some("Mia".into()),
            starting_cash: 50_000,
            backend_url: None,
        };
        let state = SandboxState::with_settings(settings);
        assert_eq!(state.cash, 50_000);
        assert_eq!(state.settings.nickname.as_deref(), Some("Mia"));
    }

    #[test]
    fn bincode_roundtrip_preserves_ledger() {
        let mut state = SandboxState::default();
        state.trades.push(Trade::new(
            TradeSide::Buy,
            "SPRT",
            "Sprout Robotics",
            10,
            5000,
            Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap(),
        ));
        state.cash -= 50_000;

        let bytes = bincode::serialize(&state).unwrap();
        let back: SandboxState = bincode::deserialize(&bytes).unwrap();
        assert_eq!(back.cash, state.cash);
        assert_eq!(back.trades, state.trades);
    }
}

// ═══════════════════════════════════════════════════════════════════
//  PriceSeries & Lesson
// ═══════════════════════════════════════════════════════════════════

mod series {
    use super::*;

    #[test]
    fn len_and_latest() {
        let series = PriceSeries::new(
            vec!["9:00".into(), "10:00".into()],
            vec![100, 105],
        );
        assert_eq!(series.len(), 2);
        assert!(!series.is_empty());
        assert_eq!(series.latest(), Some(105));
    }

    #[test]
    fn empty_series() {
        let series = PriceSeries::new(Vec::new(), Vec::new());
        assert!(series.is_empty());
        assert_eq!(series.latest(), None);
    }
}

mod lesson {
    use super::*;

    fn lesson(id: u64, title: &str) -> Lesson {
        Lesson {
            id,
            title: title.into(),
            category: LessonCategory::Saving,
            difficulty: Difficulty::Beginner,
            summary: "What an allowance is for".into(),
            body: "…".into(),
        }
    }

    #[test]
    fn difficulty_orders_easiest_first() {
        assert!(Difficulty::Beginner < Difficulty::Intermediate);
        assert!(Difficulty::Intermediate < Difficulty::Advanced);
    }

    #[test]
    fn category_display() {
        assert_eq!(LessonCategory::Investing.to_string(), "Investing");
        assert_eq!(LessonCategory::Economy.to_string(), "Economy");
    }

    #[test]
    fn serde_roundtrip() {
        let l = lesson(1, "Why save?");
        let json = serde_json::to_string(&l).unwrap();
        let back: Lesson = serde_json::from_str(&json).unwrap();
        assert_eq!(l, back);
    }
}
