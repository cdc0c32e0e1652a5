use tracing::debug;

use crate::errors::CoreError;
use crate::models::sandbox::SandboxState;

use super::crypto;
use super::format;

/// High-level storage operations: save/load the sandbox to/from
/// encrypted bytes or files.
///
/// The password is the parent password — the parent-monitoring view
/// opens the same file.
pub struct StorageManager;

impl StorageManager {
    /// Encrypt and serialize a sandbox to raw bytes (portable,
    /// platform-independent).
    ///
    /// Flow: SandboxState → bincode → AES-256-GCM(Argon2id(password)) → MSPT bytes
    pub fn save_to_bytes(state: &SandboxState, password: &str) -> Result<Vec<u8>, CoreError> {
        let plaintext = bincode::serialize(state)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize sandbox: {e}")))?;

        let sealed = crypto::seal(&plaintext, password)?;

        debug!(
            trades = state.trades.len(),
            bytes = sealed.ciphertext.len(),
            "sandbox sealed"
        );

        Ok(format::write_file(
            format::CURRENT_VERSION,
            &sealed.kdf_params,
            &sealed.salt,
            &sealed.nonce,
            &sealed.ciphertext,
        ))
    }

    /// Decrypt and deserialize a sandbox from raw bytes.
    ///
    /// Flow: MSPT bytes → parse header → Argon2id(password, salt) → AES-256-GCM decrypt → bincode → SandboxState
    pub fn load_from_bytes(data: &[u8], password: &str) -> Result<SandboxState, CoreError> {
        let (header, ciphertext) = format::read_file(data)?;

        let plaintext = crypto::open(
            ciphertext,
            password,
            &header.salt,
            &header.nonce,
            &header.kdf_params,
        )?;

        let state: SandboxState = bincode::deserialize(&plaintext).map_err(|e| {
            CoreError::Deserialization(format!("Failed to deserialize sandbox: {e}"))
        })?;

        Ok(state)
    }

    /// Save the sandbox to an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to_file(
        state: &SandboxState,
        path: &str,
        password: &str,
    ) -> Result<(), CoreError> {
        let bytes = Self::save_to_bytes(state, password)?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load the sandbox from an encrypted file on disk (native only).
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from_file(path: &str, password: &str) -> Result<SandboxState, CoreError> {
        let bytes = std::fs::read(path)?;
        Self::load_from_bytes(&bytes, password)
    }
}
