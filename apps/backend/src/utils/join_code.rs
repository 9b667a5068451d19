//! Join code generation for game sessions.
//!
//! Codes are typed by hand, so they stay short: 6 characters drawn from
//! `A-Z0-9`. Uniqueness is enforced by the caller against the store.

use rand::Rng;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

pub const JOIN_CODE_LEN: usize = 6;

/// Generate a candidate join code.
///
/// # Example
/// ```
/// use backend::utils::join_code::generate_join_code;
///
/// let code = generate_join_code();
/// assert_eq!(code.len(), 6);
/// ```
pub fn generate_join_code() -> String {
    let mut rng = rand::rng();
    (0..JOIN_CODE_LEN)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Normalise user input (`" ab12cd "` → `"AB12CD"`).
pub fn normalize_join_code(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
