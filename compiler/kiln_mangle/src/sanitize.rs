//! Identifier sanitization.
//!
//! Object-file symbols are restricted to `[A-Za-z0-9_]` and must not start
//! with a digit. [`append_sanitized`] maps arbitrary identifiers onto that
//! alphabet; the mapping is many-to-one, so callers disambiguate one layer up.
//! [`sanitize_with_hash`] is for names with no natural batch to disambiguate
//! within: any lossy sanitization is tagged with a digest of the original.

use kiln_text::{ByteString, ByteStringBuffer};
use sha2::{Digest, Sha256};

/// Longest sanitized prefix kept by [`sanitize_with_hash`].
pub const MAX_HASHED_PREFIX_LEN: usize = 30;

/// Append the sanitized form of `name`.
///
/// A leading ASCII digit is kept but preceded by `_`. ASCII letters and
/// digits are copied; every other character, including each non-ASCII
/// character, becomes a single `_`.
pub fn append_sanitized(name: &str, buf: &mut ByteStringBuffer) {
    let mut chars = name.chars();
    if let Some(first) = chars.next() {
        if first.is_ascii_digit() {
            buf.append_ascii('_');
        }
        append_sanitized_char(first, buf);
    }
    for c in chars {
        append_sanitized_char(c, buf);
    }
}

#[inline]
fn append_sanitized_char(c: char, buf: &mut ByteStringBuffer) {
    if c.is_ascii_alphanumeric() {
        buf.append_ascii(c);
    } else {
        buf.append_ascii('_');
    }
}

/// Sanitized form of `name`.
pub fn sanitize(name: &str) -> ByteString {
    let mut buf = ByteStringBuffer::with_capacity(name.len() + 1);
    append_sanitized(name, &mut buf);
    buf.finalize()
}

/// Append `name` sanitized, truncated to [`MAX_HASHED_PREFIX_LEN`] bytes, and
/// suffixed with `_` plus the uppercase hex SHA-256 of `name`'s UTF-8 bytes
/// whenever the kept bytes differ from `name` itself.
pub fn append_sanitized_with_hash(name: &str, buf: &mut ByteStringBuffer) {
    let start = buf.len();
    append_sanitized(name, buf);
    if buf.len() - start > MAX_HASHED_PREFIX_LEN {
        buf.truncate(start + MAX_HASHED_PREFIX_LEN);
    }

    if buf.view_from(start) != name.as_bytes() {
        buf.append_ascii('_');
        let digest = Sha256::digest(name.as_bytes());
        for byte in digest {
            buf.append_hex(u64::from(byte), 2);
        }
    }
}

/// Collision-safe sanitized form of `name`.
pub fn sanitize_with_hash(name: &str) -> ByteString {
    let mut buf = ByteStringBuffer::new();
    append_sanitized_with_hash(name, &mut buf);
    buf.finalize()
}

/// Whether `bytes` is already a legal plain identifier segment.
pub fn is_sanitized(bytes: &[u8]) -> bool {
    !matches!(bytes.first(), Some(first) if first.is_ascii_digit())
        && bytes.iter().all(|b| b.is_ascii_alphanumeric() || *b == b'_')
}
