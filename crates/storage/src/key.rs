use crate::error::StorageError;

/// Reject keys that would escape the store directory or break a blob URL.
///
/// Allowed: ASCII letters, digits, `-`, `_` and `.`, but not `.`/`..` alone
/// or a leading dot.
pub fn validate_account_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key.chars().all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if valid { Ok(()) } else { Err(StorageError::InvalidKey(key.to_owned())) }
}
