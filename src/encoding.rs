//! Display encodings for raw entropy.

use uuid::Uuid;

/// Crockford-style alphabet: digits and capitals without I, L, O and U.
pub const BASE32_ALPHABET: &[u8; 32] = b"0123456789ABCDEFGHJKMNPQRSTVWXYZ";

/// Digits, then lowercase, then uppercase.
pub const BASE62_ALPHABET: &[u8; 62] =
    b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE32_SEGMENT_BYTES: usize = 4;

/// Lowercase hex, two digits per byte.
pub fn hex_lower(bytes: &[u8]) -> String {
    hex::encode(bytes)
}

/// Formats a UUID as four groups of base32 symbols.
///
/// The hyphenated UUID text is regrouped into four 8-digit segments:
/// the first group, the second and third groups joined, the fourth group
/// plus the first four digits of the fifth, and the last eight digits of
/// the fifth. Each hex pair is a byte and maps to one symbol through
/// `byte % 32`. Because the hyphens of the canonical form fall on byte
/// boundaries, the segments are exactly the four 4-byte chunks of the UUID.
///
/// The mapping discards the top three bits of every byte and cannot be
/// reversed.
pub fn base32_uuid(id: &Uuid, dashes: bool) -> String {
    let segments: Vec<String> = id
        .as_bytes()
        .chunks(BASE32_SEGMENT_BYTES)
        .map(|segment| {
            segment
                .iter()
                .map(|&byte| BASE32_ALPHABET[(byte % 32) as usize] as char)
                .collect()
        })
        .collect();

    let separator = if dashes { "-" } else { "" };
    segments.join(separator)
}

/// Base-62 digits of `value`, most significant first, without padding.
///
/// Zero encodes as `"0"` rather than an empty string.
pub fn base62(mut value: u128) -> String {
    if value == 0 {
        return (BASE62_ALPHABET[0] as char).to_string();
    }

    let mut digits = Vec::with_capacity(22);
    while value > 0 {
        digits.push(BASE62_ALPHABET[(value % 62) as usize]);
        value /= 62;
    }
    digits.reverse();

    digits.into_iter().map(char::from).collect()
}
