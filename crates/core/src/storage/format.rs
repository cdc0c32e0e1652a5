use super::crypto::KdfParams;
use crate::errors::CoreError;

/// Magic bytes identifying an MSPT (MoneySprout) file.
pub const MAGIC: &[u8; 4] = b"MSPT";

/// Current file format version.
pub const CURRENT_VERSION: u16 = 1;

/// Minimum header size in bytes:
/// magic(4) + version(2) + kdf_params(12) + salt(16) + nonce(12) + ciphertext_len(8) = 54
pub const MIN_HEADER_SIZE: usize = 54;

/// File header read from an encrypted .mspt file.
#[derive(Debug)]
pub struct FileHeader {
    pub version: u16,
    pub kdf_params: KdfParams,
    pub salt: [u8; 16],
    pub nonce: [u8; 12],
    pub ciphertext_len: u64,
}

/// Assemble a complete encrypted file.
///
/// Layout:
/// ```text
/// [MSPT: 4B] [version: 2B LE] [memory_cost: 4B LE] [time_cost: 4B LE]
/// [parallelism: 4B LE] [salt: 16B] [nonce: 12B] [ciphertext_len: 8B LE]
/// [ciphertext: variable]
/// ```
pub fn write_file(
    version: u16,
    kdf_params: &KdfParams,
    salt: &[u8; 16],
    nonce: &[u8; 12],
    ciphertext: &[u8],
) -> Vec<u8> {
    let mut buf = Vec::with_capacity(MIN_HEADER_SIZE + ciphertext.len());

    buf.extend_from_slice(MAGIC);
    buf.extend_from_slice(&version.to_le_bytes());
    buf.extend_from_slice(&kdf_params.memory_cost.to_le_bytes());
    buf.extend_from_slice(&kdf_params.time_cost.to_le_bytes());
    buf.extend_from_slice(&kdf_params.parallelism.to_le_bytes());
    buf.extend_from_slice(salt);
    buf.extend_from_slice(nonce);
    buf.extend_from_slice(&(ciphertext.len() as u64).to_le_bytes());
    buf.extend_from_slice(ciphertext);

    buf
}

/// Sequential reader over the fixed-width header fields.
struct Cursor<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    fn take<const N: usize>(&mut self, field: &'static str) -> Result<[u8; N], CoreError> {
        let end = self.offset + N;
        let bytes: [u8; N] = self
            .data
            .get(self.offset..end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| CoreError::InvalidFileFormat(format!("Failed to read {field}")))?;
        self.offset = end;
        Ok(bytes)
    }

    fn u16_le(&mut self, field: &'static str) -> Result<u16, CoreError> {
        Ok(u16::from_le_bytes(self.take(field)?))
    }

    fn u32_le(&mut self, field: &'static str) -> Result<u32, CoreError> {
        Ok(u32::from_le_bytes(self.take(field)?))
    }

    fn u64_le(&mut self, field: &'static str) -> Result<u64, CoreError> {
        Ok(u64::from_le_bytes(self.take(field)?))
    }
}

/// Parse the header from raw file bytes.
/// Returns the header and the ciphertext slice.
pub fn read_file(data: &[u8]) -> Result<(FileHeader, &[u8]), CoreError> {
    if data.len() < MIN_HEADER_SIZE {
        return Err(CoreError::InvalidFileFormat(
            "File too small to be a valid MSPT file".into(),
        ));
    }

    let mut cursor = Cursor { data, offset: 0 };

    if &cursor.take::<4>("magic")? != MAGIC {
        return Err(CoreError::InvalidFileFormat(
            "Invalid magic bytes — not an MSPT file".into(),
        ));
    }

    let version = cursor.u16_le("version")?;
    if version == 0 || version > CURRENT_VERSION {
        return Err(CoreError::UnsupportedVersion(version));
    }

    let memory_cost = cursor.u32_le("KDF memory_cost")?;
    let time_cost = cursor.u32_le("KDF time_cost")?;
    let parallelism = cursor.u32_le("KDF parallelism")?;

    // Reject out-of-range KDF params so a crafted file can't make the
    // app derive a key with gigabytes of memory or hundreds of passes.
    // memory_cost: 8 KiB (Argon2 minimum) to 1 GiB; time_cost ≤ 20;
    // parallelism 1..=16.
    if !(8..=1_048_576).contains(&memory_cost) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF memory_cost out of safe range: {memory_cost} KiB (expected 8..1048576)"
        )));
    }
    if !(1..=20).contains(&time_cost) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF time_cost out of safe range: {time_cost} (expected 1..20)"
        )));
    }
    if !(1..=16).contains(&parallelism) {
        return Err(CoreError::InvalidFileFormat(format!(
            "KDF parallelism out of safe range: {parallelism} (expected 1..16)"
        )));
    }

    let salt = cursor.take::<16>("salt")?;
    let nonce = cursor.take::<12>("nonce")?;
    let ciphertext_len = cursor.u64_le("ciphertext length")?;

    let ciphertext = data
        .get(cursor.offset..)
        .filter(|rest| rest.len() as u64 >= ciphertext_len)
        .map(|rest| &rest[..ciphertext_len as usize])
        .ok_or_else(|| {
            CoreError::InvalidFileFormat(format!(
                "File truncated: expected {} bytes of ciphertext, got {}",
                ciphertext_len,
                data.len() - cursor.offset
            ))
        })?;

    let header = FileHeader {
        version,
        kdf_params: KdfParams {
            memory_cost,
            time_cost,
            parallelism,
        },
        salt,
        nonce,
        ciphertext_len,
    };

    Ok((header, ciphertext))
}
