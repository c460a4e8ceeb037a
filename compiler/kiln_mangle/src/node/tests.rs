use kiln_types::{CallingConvention, MethodFlags, Signature, TypeCategory, TypePool};
use pretty_assertions::assert_eq;

use super::*;
use crate::{SymbolNameStrategy, TargetArch};

struct Fixture {
    pool: TypePool,
    foo: TypeId,
    pair: TypeId,
    run: MethodId,
    thiscall: MethodId,
    count: FieldId,
}

fn fixture() -> Fixture {
    let mut pool = TypePool::new();
    let module = pool.add_module("MyAsm");
    let foo = pool.add_type(module, "", "Foo", TypeCategory::Class);
    let pair = pool.add_type(module, "", "Pair", TypeCategory::ValueType);
    let int32 = pool.add_type(module, "", "I4", TypeCategory::Int32);
    let run = pool.add_method(pair, "Run", Signature::static_fn(int32, &[]));
    let thiscall = pool.add_method(foo, "Native", Signature::static_fn(int32, &[int32]));
    pool.set_unmanaged(
        thiscall,
        MethodFlags::PINVOKE,
        Some(CallingConvention::Thiscall),
    );
    let count = pool.add_field(foo, "count");
    Fixture {
        pool,
        foo,
        pair,
        run,
        thiscall,
        count,
    }
}

fn name(node: &dyn SymbolNode, mangler: &NameMangler<'_>) -> ByteString {
    node.mangled_name(mangler)
        .unwrap_or_else(|e| panic!("unexpected mangling failure: {e}"))
}

#[test]
fn method_nodes() {
    let f = fixture();
    let mangler = NameMangler::new(&f.pool, SymbolNameStrategy::Unix);
    assert_eq!(name(&MethodEntrypointNode(f.run), &mangler), "MyAsm_Pair__Run");
    assert_eq!(
        name(&UnboxingStubNode(f.run), &mangler),
        "unbox_MyAsm_Pair__Run"
    );
}

#[test]
fn method_table_nodes_agree_across_units() {
    let f = fixture();
    let mangler = NameMangler::new(&f.pool, SymbolNameStrategy::Unix);
    let local = name(&MethodTableNode(f.pair), &mangler);
    let external = name(&ExternMethodTableSymbolNode(f.pair), &mangler);
    assert_eq!(local, "Boxed_MyAsm_Pair_ZTV16Boxed_MyAsm_Pair");
    assert_eq!(local, external);
}

#[test]
fn statics_and_dictionaries() {
    let f = fixture();
    let mangler = NameMangler::new(&f.pool, SymbolNameStrategy::Unix);
    let gc = StaticsNode {
        ty: f.foo,
        kind: StaticsKind::Gc,
    };
    assert_eq!(name(&gc, &mangler), "__GCSTATICSMyAsm_Foo");
    assert_eq!(
        name(&GenericDictionaryNode::Type(f.foo), &mangler),
        "__GenericDict_MyAsm_Foo"
    );
    assert_eq!(
        name(&GenericDictionaryNode::Method(f.run), &mangler),
        "__GenericDict_MyAsm_Pair__Run"
    );
}

#[test]
fn string_literal_node() {
    let f = fixture();
    let mangler = NameMangler::new(&f.pool, SymbolNameStrategy::Unix);
    let node = StringLiteralNode("hello".to_owned());
    assert_eq!(name(&node, &mangler), "hello");
}

#[test]
fn native_layout_signatures_are_unit_scoped() {
    let f = fixture();
    let mut mangler = NameMangler::new(&f.pool, SymbolNameStrategy::Unix);
    mangler.set_compilation_unit_prefix("MyApp");

    let of_type = NativeLayoutSignatureNode {
        identity_prefix: "__RGAM_".to_owned(),
        identity: SignatureIdentity::Type(f.foo),
    };
    let of_method = NativeLayoutSignatureNode {
        identity_prefix: "__GVMLI_".to_owned(),
        identity: SignatureIdentity::Method(f.run),
    };
    let of_field = NativeLayoutSignatureNode {
        identity_prefix: "__FLD_".to_owned(),
        identity: SignatureIdentity::Field(f.count),
    };

    assert_eq!(name(&of_type, &mangler), "MyApp__RGAM_MyAsm_Foo");
    assert_eq!(name(&of_method, &mangler), "MyApp__GVMLI_MyAsm_Pair__Run");
    assert_eq!(name(&of_field, &mangler), "MyApp__FLD_MyAsm_Foo__count");
}

#[test]
fn extern_nodes() {
    let f = fixture();
    let x86 = SymbolNameStrategy::Windows {
        arch: TargetArch::X86,
        pointer_size: 4,
    };
    let mangler = NameMangler::new(&f.pool, x86);

    let variable = ExternSymbolNode {
        name: "g_count".to_owned(),
        kind: ExternKind::Variable,
    };
    assert_eq!(name(&variable, &mangler), "_g_count");

    let method = ExternSymbolNode {
        name: "Native".to_owned(),
        kind: ExternKind::Method(f.thiscall),
    };
    assert_eq!(
        method.mangled_name(&mangler),
        Err(MangleError::UnsupportedCallingConvention {
            method: f.thiscall,
            convention: CallingConvention::Thiscall,
        })
    );

    let unix = NameMangler::new(&f.pool, SymbolNameStrategy::Unix);
    assert_eq!(name(&method, &unix), "Native");
}
