//! Fast content hash for symbol candidates.
//!
//! Disambiguation counters are keyed by this hash rather than by the bytes
//! themselves, so the exact function is part of the naming scheme: changing
//! it changes which candidates share a counter and therefore which numeric
//! suffixes previously compiled consumers expect.

/// Hash a byte string.
///
/// Length-seeded rotate/xor over little-endian 4-byte words, then a trailing
/// 2-byte and 1-byte step, finished with two rotate-adds. Not cryptographic.
pub fn content_hash(bytes: &[u8]) -> u32 {
    #[expect(
        clippy::cast_possible_truncation,
        reason = "the seed deliberately wraps the length to 32 bits"
    )]
    let mut hash = bytes.len() as u32;

    let mut words = bytes.chunks_exact(4);
    for w in &mut words {
        hash = mix(hash, u32::from_le_bytes([w[0], w[1], w[2], w[3]]));
    }

    let mut tail = words.remainder();
    if tail.len() >= 2 {
        hash = mix(hash, u32::from(u16::from_le_bytes([tail[0], tail[1]])));
        tail = &tail[2..];
    }
    if let Some(&last) = tail.first() {
        hash = mix(hash, u32::from(last));
    }

    hash = hash.wrapping_add(hash.rotate_left(7));
    hash.wrapping_add(hash.rotate_left(15))
}

#[inline]
fn mix(hash: u32, word: u32) -> u32 {
    hash.wrapping_add(hash.rotate_left(5)) ^ word
}
