use super::*;

#[test]
fn raw_roundtrip() {
    let ty = TypeId::from_raw(17);
    assert_eq!(ty.raw(), 17);
    assert_eq!(ty.index(), 17);
}

#[test]
fn handles_are_copy_and_compare_by_index() {
    let a = MethodId::from_raw(3);
    let b = a;
    assert_eq!(a, b);
    assert_ne!(a, MethodId::from_raw(4));
    assert!(FieldId::from_raw(1) < FieldId::from_raw(2));
}

#[test]
fn formatting_names_the_entity_kind() {
    assert_eq!(format!("{:?}", ModuleId::from_raw(0)), "ModuleId(0)");
    assert_eq!(TypeId::from_raw(9).to_string(), "TypeId#9");
    assert_eq!(MethodId::from_raw(2).to_string(), "MethodId#2");
}

#[test]
fn handle_size() {
    assert_eq!(std::mem::size_of::<TypeId>(), 4);
    assert_eq!(std::mem::size_of::<Option<FieldId>>(), 8);
}
