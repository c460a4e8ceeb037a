use super::*;

#[test]
fn rent_satisfies_requested_capacity() {
    let pool = BufferPool::new();
    for request in [0, 1, 63, 64, 65, 200, 4096, 5000] {
        let store = pool.rent(request);
        assert!(store.capacity() >= request, "request {request}");
        assert!(store.is_empty());
    }
}

#[test]
fn returned_store_is_reused() {
    let pool = BufferPool::new();
    let mut store = pool.rent(100);
    store.extend_from_slice(b"stale contents");
    let capacity = store.capacity();
    pool.give_back(store);
    assert_eq!(pool.retained(), 1);

    let again = pool.rent(100);
    assert!(again.is_empty());
    assert_eq!(again.capacity(), capacity);
    assert_eq!(pool.retained(), 0);
}

#[test]
fn small_and_huge_stores_are_not_pooled() {
    let pool = BufferPool::new();
    pool.give_back(Vec::with_capacity(8));
    pool.give_back(Vec::new());
    pool.give_back(Vec::with_capacity(4 << 20));
    assert_eq!(pool.retained(), 0);
}

#[test]
fn huge_request_bypasses_pool() {
    let pool = BufferPool::new();
    let store = pool.rent(3 << 20);
    assert!(store.capacity() >= 3 << 20);
}

#[test]
fn class_retention_is_bounded() {
    let pool = BufferPool::new();
    for _ in 0..(MAX_RETAINED_PER_CLASS + 10) {
        pool.give_back(Vec::with_capacity(128));
    }
    assert_eq!(pool.retained(), MAX_RETAINED_PER_CLASS);
}

#[test]
fn class_math_rounds_in_the_safe_direction() {
    assert_eq!(rent_class(0), Some(0));
    assert_eq!(rent_class(64), Some(0));
    assert_eq!(rent_class(65), Some(1));
    assert_eq!(return_class(64), Some(0));
    assert_eq!(return_class(127), Some(0));
    assert_eq!(return_class(128), Some(1));
    assert_eq!(rent_class(1 << 20), Some(NUM_CLASSES - 1));
    assert_eq!(rent_class((1 << 20) + 1), None);
    assert_eq!(class_capacity(NUM_CLASSES - 1), 1 << 20);
}
