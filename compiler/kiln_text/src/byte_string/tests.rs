use super::*;
use pretty_assertions::assert_eq;
use std::collections::{BTreeSet, HashMap};

#[test]
fn equality_is_by_content() {
    let a = ByteString::from("Foo");
    let b = ByteString::from(b"Foo".to_vec());
    assert_eq!(a, b);
    assert_eq!(a, "Foo");
    assert_ne!(a, ByteString::from("Foo_0"));
}

#[test]
fn clone_shares_storage() {
    let a = ByteString::from("shared");
    let b = a.clone();
    assert!(std::ptr::eq(a.as_bytes(), b.as_bytes()));
}

#[test]
fn ordering_is_lexicographic_bytes() {
    let set: BTreeSet<ByteString> = ["b", "a_1", "a", "a_0", "B"]
        .into_iter()
        .map(ByteString::from)
        .collect();
    let ordered: Vec<String> = set.iter().map(ToString::to_string).collect();
    assert_eq!(ordered, vec!["B", "a", "a_0", "a_1", "b"]);
}

#[test]
fn map_lookup_by_slice() {
    let mut map = HashMap::new();
    map.insert(ByteString::from("key"), 7);
    assert_eq!(map.get(&b"key"[..]), Some(&7));
    assert_eq!(map.get(&b"other"[..]), None);
}

#[test]
fn accessors() {
    let s = ByteString::from_static(b"_3abc");
    assert_eq!(s.len(), 5);
    assert!(!s.is_empty());
    assert!(s.starts_with_byte(b'_'));
    assert!(!s.starts_with_byte(b'3'));
    assert_eq!(s.as_str(), Some("_3abc"));
    assert_eq!(s.content_hash(), crate::content_hash(b"_3abc"));

    let empty = ByteString::default();
    assert!(empty.is_empty());
    assert!(!empty.starts_with_byte(b'_'));
}

#[test]
fn invalid_utf8_is_reported_not_hidden() {
    let s = ByteString::from(vec![0x66, 0xFF]);
    assert_eq!(s.as_str(), None);
    assert_eq!(s.len(), 2);
}

#[test]
fn display_and_debug() {
    let s = ByteString::from("??_7Foo@@6B@");
    assert_eq!(s.to_string(), "??_7Foo@@6B@");
    assert_eq!(format!("{s:?}"), "\"??_7Foo@@6B@\"");
}
