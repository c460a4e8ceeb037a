//! Growable scratch buffer for building symbol names.
//!
//! # Resource Discipline
//!
//! The backing store is rented from [`BufferPool::shared`] and returned to it
//! exactly once, on the first of:
//! - [`ByteStringBuffer::finalize`] (content copied into a [`ByteString`]),
//! - [`ByteStringBuffer::dispose`],
//! - the buffer going out of scope (early return, `?`, panic unwinding).
//!
//! `finalize` and `dispose` take `self` by value, so appending to a buffer
//! after it has been finalized does not compile.
//!
//! # Growth
//!
//! When an append does not fit, a new store of `max(required, 2 * capacity)`
//! bytes is rented, the existing bytes are copied over, and the old store is
//! given back. Nested mangling appends many short pieces, so doubling keeps
//! the copy cost amortized.

use std::fmt;

use crate::{BufferPool, ByteString};

/// Initial capacity of [`ByteStringBuffer::new`].
const DEFAULT_CAPACITY: usize = 256;

/// Growable, append-only byte buffer with pooled storage.
pub struct ByteStringBuffer {
    bytes: Vec<u8>,
}

impl ByteStringBuffer {
    /// Rent a buffer with the default capacity.
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Rent a buffer with at least `capacity` bytes of room.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: BufferPool::shared().rent(capacity),
        }
    }

    /// Current content length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Capacity of the current backing store.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// The whole current content.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Read-only view of the content from `offset` to the end.
    ///
    /// # Panics
    /// Panics if `offset` is past the current length.
    #[inline]
    pub fn view_from(&self, offset: usize) -> &[u8] {
        &self.bytes[offset..]
    }

    /// Append raw bytes.
    pub fn append(&mut self, bytes: &[u8]) {
        self.reserve(bytes.len());
        self.bytes.extend_from_slice(bytes);
    }

    /// Append UTF-8 text.
    #[inline]
    pub fn append_str(&mut self, s: &str) {
        self.append(s.as_bytes());
    }

    /// Append the content of another byte string.
    #[inline]
    pub fn append_byte_string(&mut self, s: &ByteString) {
        self.append(s.as_bytes());
    }

    /// Append a single ASCII character.
    ///
    /// Non-ASCII input is a caller bug and is checked in debug builds.
    #[inline]
    pub fn append_ascii(&mut self, c: char) {
        debug_assert!(c.is_ascii(), "non-ASCII character {c:?} on the ASCII path");
        #[expect(
            clippy::cast_possible_truncation,
            reason = "ASCII checked above; fits in a byte"
        )]
        let byte = c as u8;
        self.reserve(1);
        self.bytes.push(byte);
    }

    /// Append a decimal integer.
    pub fn append_int(&mut self, value: i64) {
        if value < 0 {
            self.append_ascii('-');
        }
        self.append_decimal(value.unsigned_abs());
    }

    /// Append a length or count in decimal.
    pub fn append_usize(&mut self, value: usize) {
        // usize is at most 64 bits wide on every target Rust supports.
        self.append_decimal(value as u64);
    }

    /// Append an unsigned integer in uppercase hex, zero padded to `min_width`.
    pub fn append_hex(&mut self, mut value: u64, min_width: usize) {
        const NIBBLES: &[u8; 16] = b"0123456789ABCDEF";
        let mut digits = [0u8; 16];
        let mut start = digits.len();
        loop {
            start -= 1;
            #[expect(
                clippy::cast_possible_truncation,
                reason = "masked to a single nibble"
            )]
            let nibble = (value & 0xF) as u8;
            digits[start] = NIBBLES[usize::from(nibble)];
            value >>= 4;
            if value == 0 {
                break;
            }
        }
        let written = digits.len() - start;
        if min_width > written {
            self.reserve(min_width);
            self.bytes.resize(self.bytes.len() + (min_width - written), b'0');
        }
        self.append(&digits[start..]);
    }

    fn append_decimal(&mut self, mut value: u64) {
        // u64::MAX has 20 digits.
        let mut digits = [0u8; 20];
        let mut start = digits.len();
        loop {
            start -= 1;
            #[expect(
                clippy::cast_possible_truncation,
                reason = "a remainder of 10 fits in a byte"
            )]
            let digit = (value % 10) as u8;
            digits[start] = b'0' + digit;
            value /= 10;
            if value == 0 {
                break;
            }
        }
        self.append(&digits[start..]);
    }

    /// Shrink the content to `new_len` bytes.
    ///
    /// Used to backtrack to a shared prefix between batch entries.
    ///
    /// # Panics
    /// Panics if `new_len` exceeds the current length.
    pub fn truncate(&mut self, new_len: usize) {
        assert!(
            new_len <= self.bytes.len(),
            "truncate to {new_len} beyond current length {}",
            self.bytes.len()
        );
        self.bytes.truncate(new_len);
    }

    /// Drop all content, keeping the backing store.
    #[inline]
    pub fn clear(&mut self) {
        self.bytes.clear();
    }

    /// Copy the current content into a [`ByteString`] without consuming the buffer.
    pub fn to_byte_string(&self) -> ByteString {
        ByteString::from(&self.bytes[..])
    }

    /// Convert the content into a [`ByteString`] and release the backing store.
    pub fn finalize(self) -> ByteString {
        self.to_byte_string()
    }

    /// Release the backing store without producing a value.
    #[inline]
    pub fn dispose(self) {}

    #[inline]
    fn reserve(&mut self, additional: usize) {
        let required = self
            .bytes
            .len()
            .checked_add(additional)
            .unwrap_or_else(|| panic!("symbol buffer length overflow"));
        if required > self.bytes.capacity() {
            self.grow(required);
        }
    }

    #[cold]
    #[inline(never)]
    fn grow(&mut self, required: usize) {
        let new_capacity = required.max(self.bytes.capacity().saturating_mul(2));
        let pool = BufferPool::shared();

        let mut store = pool.rent(new_capacity);
        store.extend_from_slice(&self.bytes);

        let old = std::mem::replace(&mut self.bytes, store);
        pool.give_back(old);
    }
}

impl Default for ByteStringBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ByteStringBuffer {
    fn drop(&mut self) {
        let store = std::mem::take(&mut self.bytes);
        if store.capacity() > 0 {
            BufferPool::shared().give_back(store);
        }
    }
}

impl fmt::Write for ByteStringBuffer {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.append_str(s);
        Ok(())
    }
}

impl fmt::Debug for ByteStringBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ByteStringBuffer")
            .field("content", &String::from_utf8_lossy(&self.bytes))
            .field("capacity", &self.bytes.capacity())
            .finish()
    }
}

#[cfg(test)]
mod tests;
