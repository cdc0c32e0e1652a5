use serde::{Deserialize, Serialize};

use super::lesson::QuizRecord;
use super::settings::Settings;
use super::trade::Trade;

/// The main data container. Everything in here gets serialized,
/// encrypted, and saved to the portable .mspt file.
///
/// Contains: sandbox cash, the trade ledger, quiz progress, and user
/// settings. Market data is never stored — quotes are refetched (or
/// synthesized) on demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxState {
    /// Uninvested cash in whole currency units
    pub cash: u64,

    /// All executed trades, oldest first
    pub trades: Vec<Trade>,

    /// Graded quiz answers, in answer order
    #[serde(default)]
    pub quiz_records: Vec<QuizRecord>,

    /// User settings (nickname, starting cash, backend override)
    pub settings: Settings,
}

impl Default for SandboxState {
    fn default() -> Self {
        let settings = Settings::default();
        Self {
            cash: settings.starting_cash,
            trades: Vec::new(),
            quiz_records: Vec::new(),
            settings,
        }
    }
}

impl SandboxState {
    /// A fresh sandbox funded with the settings' starting cash.
    pub fn with_settings(settings: Settings) -> Self {
        Self {
            cash: settings.starting_cash,
            trades: Vec::new(),
            quiz_records: Vec::new(),
            settings,
        }
    }
}
