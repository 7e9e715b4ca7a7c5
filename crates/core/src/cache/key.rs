//! Cache slot keys and their on-disk file names.

use sha2::{Digest, Sha256};

/// Slot key prefix; every cached entry lives under `entry_{id}`.
pub const SLOT_PREFIX: &str = "entry_";

/// File extension of a slot file.
pub const SLOT_EXTENSION: &str = "json";

/// Compute the slot key for an entry id.
pub fn slot_key(entry_id: &str) -> String {
    format!("{SLOT_PREFIX}{entry_id}")
}

/// Compute the file name holding a slot.
///
/// Ids made only of ASCII alphanumerics, `-` and `_` are used verbatim.
/// Anything else is replaced by its SHA-256 so it cannot escape the cache directory.
pub fn slot_file_name(entry_id: &str) -> String {
    let safe = !entry_id.is_empty()
        && entry_id.len() <= 128
        && entry_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');

    if safe {
        format!("{SLOT_PREFIX}{entry_id}.{SLOT_EXTENSION}")
    } else {
        let mut hasher = Sha256::new();
        hasher.update(entry_id.as_bytes());
        format!("{SLOT_PREFIX}{}.{SLOT_EXTENSION}", hex::encode(hasher.finalize()))
    }
}

/// Whether a directory entry name looks like a slot file.
pub fn is_slot_file_name(name: &str) -> bool {
    name.starts_with(SLOT_PREFIX) && name.ends_with(&format!(".{SLOT_EXTENSION}"))
}
