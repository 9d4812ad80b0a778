//! Phone number helpers.

use sha2::{Digest, Sha256};

/// Inputs at least this long are treated as hashed phone numbers.
///
/// A SHA-256 hex digest is 64 characters. E.164 numbers can reach 16
/// characters with the leading `+`, so a long number such as `+441234567890`
/// (13 characters) is misclassified as hashed and sent as `hashedPhoneNumber`.
pub const HASHED_MIN_LEN: usize = 13;

/// Returns true if `phone_number` should be sent as `hashedPhoneNumber`.
///
/// This is a length check only, not a format validation.
pub fn is_hashed(phone_number: &str) -> bool {
    phone_number.len() >= HASHED_MIN_LEN
}

/// SHA-256 hex digest of an E.164 phone number, for callers that must not
/// transmit the raw number.
pub fn hash(phone_number: &str) -> String {
    hex::encode(Sha256::digest(phone_number.as_bytes()))
}

/// Masks all but the last four characters, for log output.
pub(crate) fn redact(phone_number: &str) -> String {
    let chars: Vec<char> = phone_number.chars().collect();
    let visible = chars.len().min(4);
    let hidden = chars.len() - visible;
    let tail: String = chars[hidden..].iter().collect();
    format!("{}{}", "*".repeat(hidden), tail)
}
