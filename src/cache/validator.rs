//! Content Validator
//!
//! Decides whether freshly read file content may replace a cached value.

use crate::cache::TERMINATOR;

/// Returns true for bytes in `[0-9A-Za-z_-]`.
pub fn is_allowed(byte: u8) -> bool {
    byte.is_ascii_alphanumeric() || byte == b'-' || byte == b'_'
}

// == Validate ==
/// Validates a candidate value and returns the accepted length.
///
/// The candidate ends at its first terminator byte. It is rejected when empty
/// or when it starts with a newline. Every byte must be in `[0-9A-Za-z_-]`,
/// except that a newline after at least one accepted byte ends the value:
/// the accepted length is then the newline's index. Any other byte rejects
/// the whole candidate.
///
/// # Returns
/// - `Some(len)` with the number of bytes to keep
/// - `None` if the candidate must not be used
pub fn validate(candidate: &[u8]) -> Option<usize> {
    let end = candidate
        .iter()
        .position(|&b| b == TERMINATOR)
        .unwrap_or(candidate.len());
    let candidate = &candidate[..end];

    match candidate.first() {
        None | Some(b'\n') => return None,
        Some(_) => {}
    }

    for (i, &byte) in candidate.iter().enumerate() {
        if is_allowed(byte) {
            continue;
        }
        return if byte == b'\n' { Some(i) } else { None };
    }

    Some(candidate.len())
}
