//! Kiln Text - byte-oriented building blocks for symbol names.
//!
//! Every mangling routine in the compiler writes into a [`ByteStringBuffer`]
//! and hands back a finalized [`ByteString`]:
//!
//! - [`ByteStringBuffer`] - growable, append-only scratch buffer whose backing
//!   store is rented from the process-wide [`BufferPool`] and returned to it
//!   exactly once when the buffer is finalized, disposed, or dropped.
//! - [`ByteString`] - immutable, cheaply clonable bytes with value equality,
//!   content hashing and lexicographic ordering. Used as cache keys and as the
//!   result of every public mangling operation.
//! - [`content_hash`] - the fast non-cryptographic hash that drives
//!   order-independent name disambiguation.
//!
//! Symbol names are plain ASCII in practice, but nothing here assumes it:
//! string literals and assembly names flow through the buffer as UTF-8.

mod buffer;
mod byte_string;
mod hash;
mod pool;

pub use buffer::ByteStringBuffer;
pub use byte_string::ByteString;
pub use hash::content_hash;
pub use pool::BufferPool;
