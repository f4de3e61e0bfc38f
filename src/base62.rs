//! Base62 short-id encoding
//!
//! Checksum-style reduction of a caller-supplied unique token into a short
//! alphanumeric id: the character codes of the token are summed into one
//! integer, which is then rendered in base 62. The summation is lossy, so
//! all uniqueness must come from the caller handing in a fresh random token
//! per call; collisions are handled at the storage layer, not here.

/// Fixed 62-character alphabet: digits, lowercase, uppercase.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Maximum length of a short id.
pub const MAX_SHORT_ID_LEN: usize = 7;

/// Encodes a unique token into a base62 string.
///
/// Pure and deterministic: the same token always yields the same output.
/// An empty token encodes to the empty string; callers minting real ids
/// must never pass one.
pub fn encode(token: &str) -> String {
    let mut numeric_value: u64 = token.chars().map(|c| c as u64).sum();
    let mut encoded = Vec::new();

    while numeric_value > 0 {
        encoded.push(ALPHABET[(numeric_value % 62) as usize]);
        numeric_value /= 62;
    }

    encoded.reverse();
    // the alphabet is pure ASCII, so the bytes are always valid UTF-8
    String::from_utf8_lossy(&encoded).into_owned()
}

/// Checks that `input` is a well-formed short id: non-empty, at most
/// [`MAX_SHORT_ID_LEN`] characters, drawn entirely from the alphabet.
///
/// The id is treated as an opaque string everywhere else; this guard runs
/// before any storage query so malformed input never reaches a backend.
pub fn is_valid_short_id(input: &str) -> bool {
    !input.is_empty()
        && input.len() <= MAX_SHORT_ID_LEN
        && input.bytes().all(|b| b.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_token_encodes_to_empty_string() {
        assert_eq!(encode(""), "");
    }

    #[test]
    fn known_value_regression() {
        // 't' + 'e' + 's' + 't' = 448 = 7 * 62 + 14 -> "7e"
        assert_eq!(encode("test"), "7e");
    }

    #[test]
    fn encoding_is_deterministic() {
        let token = "f47ac10b-58cc-4372-a567-0e02b2c3d479";
        assert_eq!(encode(token), encode(token));
    }

    #[test]
    fn uuid_length_tokens_stay_within_limit() {
        let tokens = [
            "f47ac10b-58cc-4372-a567-0e02b2c3d479",
            "00000000-0000-0000-0000-000000000000",
            "ffffffff-ffff-ffff-ffff-ffffffffffff",
            "123",
        ];
        for token in tokens {
            let id = encode(token);
            assert!(!id.is_empty());
            assert!(id.len() <= MAX_SHORT_ID_LEN, "{token} -> {id}");
            assert!(is_valid_short_id(&id));
        }
    }

    #[test]
    fn short_id_validation() {
        assert!(is_valid_short_id("7e"));
        assert!(is_valid_short_id("aB3xY9z"));
        assert!(!is_valid_short_id(""));
        assert!(!is_valid_short_id("aB3xY9z0")); // 8 chars
        assert!(!is_valid_short_id("abc-def"));
        assert!(!is_valid_short_id("abc def"));
        assert!(!is_valid_short_id("abc$"));
    }
}
