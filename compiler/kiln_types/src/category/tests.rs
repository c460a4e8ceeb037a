use super::*;

#[test]
fn well_known_names() {
    assert_eq!(TypeCategory::Boolean.well_known_name(), Some("Bool"));
    assert_eq!(TypeCategory::Byte.well_known_name(), Some("UInt8"));
    assert_eq!(TypeCategory::SByte.well_known_name(), Some("Int8"));
    assert_eq!(TypeCategory::IntPtr.well_known_name(), Some("IntPtr"));
    assert_eq!(TypeCategory::String.well_known_name(), Some("String"));
    assert_eq!(TypeCategory::Object.well_known_name(), Some("Object"));
    assert_eq!(TypeCategory::Class.well_known_name(), None);
    assert_eq!(TypeCategory::ValueType.well_known_name(), None);
}

#[test]
fn value_type_classification() {
    assert!(TypeCategory::Int32.is_value_type());
    assert!(TypeCategory::Boolean.is_value_type());
    assert!(TypeCategory::Enum.is_value_type());
    assert!(TypeCategory::ValueType.is_value_type());
    assert!(!TypeCategory::String.is_value_type());
    assert!(!TypeCategory::Object.is_value_type());
    assert!(!TypeCategory::Interface.is_value_type());
}

#[test]
fn primitive_sizes() {
    assert_eq!(TypeCategory::Boolean.primitive_size(4), Some(1));
    assert_eq!(TypeCategory::Char.primitive_size(4), Some(2));
    assert_eq!(TypeCategory::Double.primitive_size(4), Some(8));
    assert_eq!(TypeCategory::IntPtr.primitive_size(4), Some(4));
    assert_eq!(TypeCategory::IntPtr.primitive_size(8), Some(8));
    assert_eq!(TypeCategory::Class.primitive_size(8), Some(8));
    assert_eq!(TypeCategory::ValueType.primitive_size(8), None);
}
