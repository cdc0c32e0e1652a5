use serde::{Deserialize, Serialize};

/// Starting cash granted to a fresh sandbox, in whole currency units.
pub const DEFAULT_STARTING_CASH: u64 = 1_000_000;

/// User-configurable settings, stored inside the encrypted sandbox file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    /// Display name the child picked; shown in the parent report too.
    #[serde(default)]
    pub nickname: Option<String>,

    /// Cash granted on sandbox creation and on reset.
    pub starting_cash: u64,

    /// Override for the backend base URL (e.g., a staging server).
    /// `None` uses the built-in production URL.
    #[serde(default)]
    pub backend_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            nickname: None,
            starting_cash: DEFAULT_STARTING_CASH,
            backend_url: None,
        }
    }
}
