use super::*;
use pretty_assertions::assert_eq;
use std::fmt::Write as _;

#[test]
fn appends_accumulate() {
    let mut buf = ByteStringBuffer::new();
    buf.append(b"__Array");
    buf.append_ascii('<');
    buf.append_str("Int32");
    buf.append_ascii('>');
    assert_eq!(buf.as_bytes(), b"__Array<Int32>");
    assert_eq!(buf.len(), 14);
    assert_eq!(buf.finalize(), "__Array<Int32>");
}

#[test]
fn integers() {
    let mut buf = ByteStringBuffer::new();
    buf.append_int(0);
    buf.append_ascii(',');
    buf.append_int(-42);
    buf.append_ascii(',');
    buf.append_int(i64::MAX);
    assert_eq!(buf.as_bytes(), b"0,-42,9223372036854775807");
}

#[test]
fn hex_is_uppercase_and_padded() {
    let mut buf = ByteStringBuffer::new();
    buf.append_hex(0x5, 2);
    buf.append_ascii(' ');
    buf.append_hex(0xAB, 2);
    buf.append_ascii(' ');
    buf.append_hex(0x1F2, 2);
    assert_eq!(buf.as_bytes(), b"05 AB 1F2");
}

#[test]
fn integer_extremes() {
    let mut buf = ByteStringBuffer::new();
    buf.append_int(i64::MIN);
    buf.append_ascii(',');
    buf.append_usize(0);
    buf.append_ascii(',');
    buf.append_usize(1234);
    buf.append_ascii(',');
    buf.append_hex(0, 0);
    buf.append_ascii(',');
    buf.append_hex(0xAB, 4);
    buf.append_ascii(',');
    buf.append_hex(u64::MAX, 0);
    assert_eq!(
        buf.as_bytes(),
        b"-9223372036854775808,0,1234,0,00AB,FFFFFFFFFFFFFFFF"
    );
}

#[test]
fn formatted_writes() {
    let mut buf = ByteStringBuffer::new();
    assert!(write!(buf, "_{}@{}", "Bar", 8).is_ok());
    assert_eq!(buf.as_bytes(), b"_Bar@8");
}

#[test]
fn growth_preserves_content_and_at_least_doubles() {
    let mut buf = ByteStringBuffer::with_capacity(64);
    let initial = buf.capacity();
    buf.append(&vec![b'x'; initial]);
    buf.append(b"y");
    assert!(buf.capacity() >= 2 * initial);
    assert!(buf.as_bytes()[..initial].iter().all(|&b| b == b'x'));
    assert_eq!(buf.view_from(initial), b"y");
}

#[test]
fn growth_covers_large_single_append() {
    let mut buf = ByteStringBuffer::with_capacity(64);
    let big = vec![b'z'; 10_000];
    buf.append(&big);
    assert!(buf.capacity() >= 10_000);
    assert_eq!(buf.len(), 10_000);
}

#[test]
fn truncate_backtracks_to_prefix() {
    let mut buf = ByteStringBuffer::new();
    buf.append(b"MyAsm_");
    let prefix = buf.len();
    buf.append(b"Foo");
    let first = buf.to_byte_string();
    buf.truncate(prefix);
    buf.append(b"Bar");
    assert_eq!(first, "MyAsm_Foo");
    assert_eq!(buf.to_byte_string(), "MyAsm_Bar");
    assert_eq!(buf.view_from(prefix), b"Bar");
}

#[test]
#[should_panic(expected = "beyond current length")]
fn truncate_cannot_grow() {
    let mut buf = ByteStringBuffer::new();
    buf.append(b"ab");
    buf.truncate(3);
}

#[test]
#[cfg(debug_assertions)]
#[should_panic(expected = "non-ASCII")]
fn ascii_path_rejects_non_ascii() {
    let mut buf = ByteStringBuffer::new();
    buf.append_ascii('é');
}

#[test]
fn clear_keeps_storage() {
    let mut buf = ByteStringBuffer::new();
    buf.append(b"something");
    let capacity = buf.capacity();
    buf.clear();
    assert!(buf.is_empty());
    assert_eq!(buf.capacity(), capacity);
}

#[test]
fn finalized_value_outlives_buffer() {
    let value = {
        let mut buf = ByteStringBuffer::new();
        buf.append(b"S_P_CoreLib_");
        buf.finalize()
    };
    assert_eq!(value, "S_P_CoreLib_");
}

#[test]
fn early_exit_releases_store() {
    fn build(fail: bool) -> Result<ByteString, ()> {
        let mut buf = ByteStringBuffer::new();
        buf.append(b"partial");
        if fail {
            return Err(());
        }
        Ok(buf.finalize())
    }

    assert!(build(true).is_err());
    assert_eq!(build(false), Ok(ByteString::from("partial")));
}

#[test]
fn dispose_is_explicit_release() {
    let mut buf = ByteStringBuffer::new();
    buf.append(b"discarded");
    buf.dispose();
}
