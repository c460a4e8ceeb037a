//! Shared pool of byte backing stores.
//!
//! Mangling runs on a hot path shared by every compilation worker, and most
//! names are built, finalized and thrown away. Renting backing stores from a
//! pool keeps the allocator out of that loop.
//!
//! # Size Classes
//!
//! Stores are kept in power-of-two size classes from 64 bytes to 1 MiB. A
//! store parked in class `c` has capacity of at least `64 << c`, so renting
//! from the class covering the requested size never hands out a store that
//! is too small. Requests above the top class bypass the pool entirely.

use parking_lot::Mutex;

/// Smallest pooled capacity (64 bytes).
const MIN_CLASS_SHIFT: u32 = 6;

/// Largest pooled capacity (1 MiB).
const MAX_CLASS_SHIFT: u32 = 20;

/// Number of size classes.
const NUM_CLASSES: usize = (MAX_CLASS_SHIFT - MIN_CLASS_SHIFT + 1) as usize;

/// Retained stores per class. Extra returns are dropped.
const MAX_RETAINED_PER_CLASS: usize = 32;

/// Process-wide pool shared by every [`ByteStringBuffer`](crate::ByteStringBuffer).
static SHARED: BufferPool = BufferPool::new();

/// Size-classed free lists of byte vectors.
///
/// # Thread Safety
/// Each class has its own lock, so workers renting differently sized stores
/// do not contend.
pub struct BufferPool {
    classes: [Mutex<Vec<Vec<u8>>>; NUM_CLASSES],
}

impl BufferPool {
    /// Create an empty pool.
    #[allow(
        clippy::declare_interior_mutable_const,
        reason = "array repeat operand; every class gets its own lock"
    )]
    pub const fn new() -> Self {
        const EMPTY: Mutex<Vec<Vec<u8>>> = parking_lot::const_mutex(Vec::new());
        Self {
            classes: [EMPTY; NUM_CLASSES],
        }
    }

    /// The pool used by all buffers in this process.
    #[inline]
    pub fn shared() -> &'static BufferPool {
        &SHARED
    }

    /// Rent an empty store with capacity of at least `min_capacity`.
    pub fn rent(&self, min_capacity: usize) -> Vec<u8> {
        let Some(class) = rent_class(min_capacity) else {
            return Vec::with_capacity(min_capacity);
        };

        if let Some(mut store) = self.classes[class].lock().pop() {
            store.clear();
            return store;
        }

        Vec::with_capacity(class_capacity(class))
    }

    /// Return a store to the pool.
    ///
    /// Stores too small or too large to pool, and stores arriving at a full
    /// class, are simply dropped.
    pub fn give_back(&self, store: Vec<u8>) {
        let Some(class) = return_class(store.capacity()) else {
            return;
        };

        let mut free = self.classes[class].lock();
        if free.len() < MAX_RETAINED_PER_CLASS {
            free.push(store);
        }
    }

    /// Number of stores currently parked in the pool.
    pub fn retained(&self) -> usize {
        self.classes.iter().map(|class| class.lock().len()).sum()
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new()
    }
}

/// Capacity guaranteed by stores in `class`.
#[inline]
const fn class_capacity(class: usize) -> usize {
    1 << (MIN_CLASS_SHIFT as usize + class)
}

/// Class whose stores all satisfy `min_capacity` (rounding up).
fn rent_class(min_capacity: usize) -> Option<usize> {
    let size = min_capacity.max(1 << MIN_CLASS_SHIFT).checked_next_power_of_two()?;
    let shift = size.trailing_zeros();
    (shift <= MAX_CLASS_SHIFT).then(|| (shift - MIN_CLASS_SHIFT) as usize)
}

/// Class a store of `capacity` may be parked in (rounding down).
fn return_class(capacity: usize) -> Option<usize> {
    if capacity < 1 << MIN_CLASS_SHIFT {
        return None;
    }
    let shift = usize::BITS - 1 - capacity.leading_zeros();
    (shift <= MAX_CLASS_SHIFT).then(|| (shift - MIN_CLASS_SHIFT) as usize)
}

#[cfg(test)]
mod tests;
