// ═══════════════════════════════════════════════════════════════════
// Facade integration tests — MoneySprout end to end (offline paths)
// ═══════════════════════════════════════════════════════════════════

use moneysprout_core::errors::CoreError;
use moneysprout_core::models::analytics::TendencyKind;
use moneysprout_core::models::instrument::Instrument;
use moneysprout_core::models::lesson::{Difficulty, Lesson, LessonCategory, Quiz};
use moneysprout_core::models::settings::Settings;
use moneysprout_core::models::trade::{TradeSide, TradeSortOrder};
use moneysprout_core::MoneySprout;

fn sprt() -> Instrument {
    Instrument::new("SPRT", "Sprout Robotics", 5000, 4900)
}

fn choc() -> Instrument {
    Instrument::new("CHOC", "ChocoWorks", 7350, 7500)
}

fn sample_quiz() -> Quiz {
    Quiz {
        id: 10,
        lesson_id: 2,
        question: "What does owning a stock mean?".into(),
        choices: vec![
            "Lending money to a bank".into(),
            "Owning a small part of a company".into(),
        ],
        answer_index: 1,
        explanation: "A share is a slice of ownership in a company.".into(),
    }
}

// ── Creation & settings ─────────────────────────────────────────────

#[test]
fn new_sandbox_starts_funded_and_clean() {
    let sprout = MoneySprout::create_new();
    assert_eq!(sprout.cash(), 1_000_000);
    assert_eq!(sprout.trade_count(), 0);
    assert!(sprout.holdings().is_empty());
    assert!(!sprout.has_unsaved_changes());
}

#[test]
fn custom_settings_control_starting_cash() {
    let sprout = MoneySprout::with_settings(Settings {
        nickname: Some("Mia".into()),
        starting_cash: 250_000,
        backend_url: None,
    });
    assert_eq!(sprout.cash(), 250_000);
    assert_eq!(sprout.settings().nickname.as_deref(), Some("Mia"));
}

#[test]
fn starting_cash_must_be_positive() {
    let mut sprout = MoneySprout::create_new();
    assert!(matches!(
        sprout.set_starting_cash(0),
        Err(CoreError::Validation(_))
    ));
    sprout.set_starting_cash(500_000).unwrap();
    assert_eq!(sprout.settings().starting_cash, 500_000);
}

// ── Trading through the facade ──────────────────────────────────────

#[test]
fn buy_and_sell_update_cash_holdings_and_ledger() {
    let mut sprout = MoneySprout::create_new();

    sprout.buy_with_quote(&sprt(), 10).unwrap();
    assert_eq!(sprout.cash(), 1_000_000 - 50_000);
    assert_eq!(sprout.holdings().get("SPRT"), Some(&10));
    assert!(sprout.has_unsaved_changes());

    sprout.sell_with_quote(&sprt(), 4).unwrap();
    assert_eq!(sprout.cash(), 1_000_000 - 50_000 + 20_000);
    assert_eq!(sprout.holdings().get("SPRT"), Some(&6));

    let trades = sprout.trades();
    assert_eq!(trades.len(), 2);
    assert_eq!(trades[0].side, TradeSide::Sell); // newest first
    assert_eq!(sprout.average_cost("SPRT"), Some(5000.0));
}

#[test]
fn overdrawn_buy_is_rejected_and_leaves_no_trace() {
    let mut sprout = MoneySprout::create_new();
    let err = sprout.buy_with_quote(&sprt(), 1000).unwrap_err();
    assert!(matches!(err, CoreError::InsufficientFunds { .. }));
    assert_eq!(sprout.cash(), 1_000_000);
    assert_eq!(sprout.trade_count(), 0);
    assert!(!sprout.has_unsaved_changes());
}

#[test]
fn ledger_queries_through_the_facade() {
    let mut sprout = MoneySprout::create_new();
    sprout.buy_with_quote(&sprt(), 10).unwrap();
    sprout.buy_with_quote(&choc(), 2).unwrap();
    sprout.sell_with_quote(&sprt(), 5).unwrap();

    assert_eq!(sprout.trades_for_symbol("sprt").len(), 2);
    assert_eq!(sprout.trades_by_side(TradeSide::Sell).len(), 1);
    assert_eq!(sprout.search_trades("choco").len(), 1);

    let by_value = sprout.trades_sorted(&TradeSortOrder::ValueDesc);
    assert_eq!(by_value[0].value(), 50_000);

    let id = by_value[0].id;
    assert!(sprout.get_trade(id).is_some());
    assert!(sprout
        .get_trade(uuid::Uuid::new_v4())
        .is_none());
}

// ── Quizzes ─────────────────────────────────────────────────────────

#[test]
fn quiz_grading_accumulates_progress() {
    let mut sprout = MoneySprout::create_new();
    let quiz = sample_quiz();

    let wrong = sprout.grade_quiz(&quiz, 0).unwrap();
    assert!(!wrong.correct);

    let right = sprout.grade_quiz(&quiz, 1).unwrap();
    assert!(right.correct);

    let progress = sprout.quiz_progress();
    assert_eq!(progress.answered, 2);
    assert_eq!(progress.correct, 1);
    assert!(sprout.has_unsaved_changes());
}

#[test]
fn lesson_shaping_through_the_facade() {
    let sprout = MoneySprout::create_new();
    let lessons = vec![
        Lesson {
            id: 1,
            title: "Why save at all?".into(),
            category: LessonCategory::Saving,
            difficulty: Difficulty::Beginner,
            summary: "Piggy banks and goals".into(),
            body: "…".into(),
        },
        Lesson {
            id: 2,
            title: "What is a stock?".into(),
            category: LessonCategory::Investing,
            difficulty: Difficulty::Advanced,
            summary: "Owning a slice of a company".into(),
            body: "…".into(),
        },
    ];

    assert_eq!(
        sprout
            .lessons_by_category(&lessons, LessonCategory::Saving)
            .len(),
        1
    );
    assert_eq!(
        sprout
            .lessons_by_difficulty(&lessons, Difficulty::Advanced)
            .len(),
        1
    );
    assert_eq!(sprout.search_lessons(&lessons, "stock").len(), 1);

    let mut sprout = sprout;
    sprout.grade_quiz(&sample_quiz(), 1).unwrap();
    let by_category = sprout.quiz_progress_by_category(&lessons);
    assert_eq!(
        by_category.get(&LessonCategory::Investing).map(|p| p.correct),
        Some(1)
    );
}

// ── Reports ─────────────────────────────────────────────────────────

#[test]
fn tendency_report_reflects_the_ledger() {
    let mut sprout = MoneySprout::create_new();
    assert_eq!(sprout.tendency_report().kind, TendencyKind::Cautious);

    for _ in 0..6 {
        sprout.buy_with_quote(&sprt(), 1).unwrap();
    }
    // Six same-day trades: aggressive by frequency.
    assert_eq!(sprout.tendency_report().kind, TendencyKind::Aggressive);
}

// ── Persistence ─────────────────────────────────────────────────────

#[test]
fn save_load_roundtrip_via_bytes() {
    let mut sprout = MoneySprout::create_new();
    sprout.set_nickname(Some("Mia".into()));
    sprout.buy_with_quote(&sprt(), 10).unwrap();
    sprout.grade_quiz(&sample_quiz(), 1).unwrap();

    let bytes = sprout.save_to_bytes("parent-pw").unwrap();
    assert!(!sprout.has_unsaved_changes());

    let restored = MoneySprout::load_from_bytes(&bytes, "parent-pw").unwrap();
    assert_eq!(restored.cash(), sprout.cash());
    assert_eq!(restored.trade_count(), 1);
    assert_eq!(restored.quiz_progress().answered, 1);
    assert_eq!(restored.settings().nickname.as_deref(), Some("Mia"));
    assert!(!restored.has_unsaved_changes());
}

#[test]
fn wrong_password_cannot_open_the_sandbox() {
    let mut sprout = MoneySprout::create_new();
    let bytes = sprout.save_to_bytes("parent-pw").unwrap();
    assert!(matches!(
        MoneySprout::load_from_bytes(&bytes, "wrong"),
        Err(CoreError::Decryption)
    ));
}

#[test]
fn change_password_verifies_the_old_one_first() {
    let mut sprout = MoneySprout::create_new();
    sprout.buy_with_quote(&sprt(), 1).unwrap();
    let saved = sprout.save_to_bytes("old-pw").unwrap();

    let err = sprout
        .change_password(&saved, "not-the-old-pw", "new-pw")
        .unwrap_err();
    assert!(matches!(err, CoreError::Decryption));

    let rekeyed = sprout.change_password(&saved, "old-pw", "new-pw").unwrap();
    let restored = MoneySprout::load_from_bytes(&rekeyed, "new-pw").unwrap();
    assert_eq!(restored.trade_count(), 1);
    assert!(MoneySprout::load_from_bytes(&rekeyed, "old-pw").is_err());
}

#[cfg(not(target_arch = "wasm32"))]
#[test]
fn save_load_roundtrip_via_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("mia.mspt");
    let path = path.to_str().unwrap();

    let mut sprout = MoneySprout::create_new();
    sprout.buy_with_quote(&choc(), 3).unwrap();
    sprout.save_to_file(path, "parent-pw").unwrap();

    let restored = MoneySprout::load_from_file(path, "parent-pw").unwrap();
    assert_eq!(restored.holdings().get("CHOC"), Some(&3));
}

// ── Reset & export ──────────────────────────────────────────────────

#[test]
fn reset_restores_cash_and_clears_history_but_keeps_settings() {
    let mut sprout = MoneySprout::create_new();
    sprout.set_nickname(Some("Mia".into()));
    sprout.set_starting_cash(300_000).unwrap();
    sprout.buy_with_quote(&sprt(), 10).unwrap();
    sprout.grade_quiz(&sample_quiz(), 0).unwrap();

    sprout.reset_sandbox();

    assert_eq!(sprout.cash(), 300_000);
    assert_eq!(sprout.trade_count(), 0);
    assert_eq!(sprout.quiz_progress().answered, 0);
    assert_eq!(sprout.settings().nickname.as_deref(), Some("Mia"));
}

#[test]
fn exports_cover_the_whole_ledger() {
    let mut sprout = MoneySprout::create_new();
    sprout.buy_with_quote(&sprt(), 10).unwrap();
    sprout
        .buy_with_quote(
            &Instrument::new("CMMA", "Commas, Inc.", 100, 100),
            1,
        )
        .unwrap();

    let json = sprout.export_trades_to_json().unwrap();
    assert!(json.contains("SPRT"));
    let parsed: Vec<serde_json::Value> = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.len(), 2);

    let csv = sprout.export_trades_to_csv();
    let lines: Vec<&str> = csv.lines().collect();
    assert_eq!(lines.len(), 3); // header + 2 trades
    assert_eq!(
        lines[0],
        "id,side,symbol,name,quantity,price,value,executed_at"
    );
    // Names containing commas are quoted.
    assert!(csv.contains("\"Commas, Inc.\""));

    let snapshot = sprout.to_json().unwrap();
    assert!(snapshot.contains("\"cash\""));
}
