// ═══════════════════════════════════════════════════════════════════
// Storage tests — MSPT container format, encryption, StorageManager
// ═══════════════════════════════════════════════════════════════════

use chrono::{TimeZone, Utc};

use moneysprout_core::errors::CoreError;
use moneysprout_core::models::sandbox::SandboxState;
use moneysprout_core::models::trade::{Trade, TradeSide};
use moneysprout_core::storage::format;
use moneysprout_core::storage::manager::StorageManager;

fn sample_state() -> SandboxState {
    let mut state = SandboxState::default();
    state.settings.nickname = Some("Mia".into());
    let trade = Trade::new(
        TradeSide::Buy,
        "SPRT",
        "Sprout Robotics",
        10,
        5000,
        Utc.with_ymd_and_hms(2026, 3, 2, 9, 30, 0).unwrap(),
    );
    state.cash -= trade.value();
    state.trades.push(trade);
    state
}

#[test]
fn save_load_roundtrip_preserves_the_sandbox() {
    let state = sample_state();

    let bytes = StorageManager::save_to_bytes(&state, "parent-pw").unwrap();
    let loaded = StorageManager::load_from_bytes(&bytes, "parent-pw").unwrap();

    assert_eq!(loaded.cash, state.cash);
    assert_eq!(loaded.trades, state.trades);
    assert_eq!(loaded.settings, state.settings);
}

#[test]
fn wrong_password_fails_with_decryption_error() {
    let bytes = StorageManager::save_to_bytes(&sample_state(), "parent-pw").unwrap();
    let err = StorageManager::load_from_bytes(&bytes, "guess").unwrap_err();
    assert!(matches!(err, CoreError::Decryption));
}

#[test]
fn tampered_ciphertext_fails_authentication() {
    let mut bytes = StorageManager::save_to_bytes(&sample_state(), "parent-pw").unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;

    let err = StorageManager::load_from_bytes(&bytes, "parent-pw").unwrap_err();
    assert!(matches!(err, CoreError::Decryption));
}

#[test]
fn each_save_produces_different_bytes() {
    // Fresh salt and nonce per save: identical plaintext must not
    // produce identical files.
    let state = sample_state();
    let a = StorageManager::save_to_bytes(&state, "parent-pw").unwrap();
    let b = StorageManager::save_to_bytes(&state, "parent-pw").unwrap();
    assert_ne!(a, b);
}

#[test]
fn file_starts_with_the_magic_bytes() {
    let bytes = StorageManager::save_to_bytes(&sample_state(), "parent-pw").unwrap();
    assert_eq!(&bytes[0..4], format::MAGIC);
    assert_eq!(
        u16::from_le_bytes([bytes[4], bytes[5]]),
        format::CURRENT_VERSION
    );
}

#[test]
fn garbage_bytes_are_rejected_as_invalid_format() {
    let err = StorageManager::load_from_bytes(b"not an mspt file at all", "pw").unwrap_err();
    assert!(matches!(err, CoreError::InvalidFileFormat(_)));
}

#[test]
fn wrong_magic_is_rejected() {
    let mut bytes = StorageManager::save_to_bytes(&sample_state(), "parent-pw").unwrap();
    bytes[0..4].copy_from_slice(b"SVTK");
    let err = StorageManager::load_from_bytes(&bytes, "parent-pw").unwrap_err();
    assert!(matches!(err, CoreError::InvalidFileFormat(_)));
}

#[test]
fn future_version_is_rejected() {
    let mut bytes = StorageManager::save_to_bytes(&sample_state(), "parent-pw").unwrap();
    bytes[4..6].copy_from_slice(&99u16.to_le_bytes());
    let err = StorageManager::load_from_bytes(&bytes, "parent-pw").unwrap_err();
    assert!(matches!(err, CoreError::UnsupportedVersion(99)));
}

#[test]
fn out_of_range_kdf_params_are_rejected() {
    // A crafted memory_cost must not make the loader derive a key with
    // gigabytes of memory. memory_cost lives at bytes 6..10.
    let mut bytes = StorageManager::save_to_bytes(&sample_state(), "parent-pw").unwrap();
    bytes[6..10].copy_from_slice(&u32::MAX.to_le_bytes());
    let err = StorageManager::load_from_bytes(&bytes, "parent-pw").unwrap_err();
    assert!(matches!(err, CoreError::InvalidFileFormat(_)));
}

#[test]
fn truncated_file_is_rejected() {
    let bytes = StorageManager::save_to_bytes(&sample_state(), "parent-pw").unwrap();
    let truncated = &bytes[..bytes.len() - 10];
    let err = StorageManager::load_from_bytes(truncated, "parent-pw").unwrap_err();
    assert!(matches!(err, CoreError::InvalidFileFormat(_)));
}

#[test]
fn empty_password_still_roundtrips() {
    // Not recommended, but must not corrupt anything.
    let bytes = StorageManager::save_to_bytes(&sample_state(), "").unwrap();
    let loaded = StorageManager::load_from_bytes(&bytes, "").unwrap();
    assert_eq!(loaded.trades.len(), 1);
}

#[cfg(not(target_arch = "wasm32"))]
mod files {
    use super::*;

    #[test]
    fn file_roundtrip_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sandbox.mspt");
        let path = path.to_str().unwrap();

        let state = sample_state();
        StorageManager::save_to_file(&state, path, "parent-pw").unwrap();
        let loaded = StorageManager::load_from_file(path, "parent-pw").unwrap();

        assert_eq!(loaded.trades, state.trades);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = StorageManager::load_from_file("/nonexistent/sandbox.mspt", "pw").unwrap_err();
        assert!(matches!(err, CoreError::FileIO(_)));
    }
}
