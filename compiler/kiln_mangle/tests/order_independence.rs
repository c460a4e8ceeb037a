//! Names must not depend on the order in which entities are requested,
//! neither across request permutations nor across racing threads.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use kiln_mangle::{NameMangler, SymbolNameStrategy};
use kiln_text::ByteString;
use kiln_types::{FieldId, MethodId, Signature, TypeCategory, TypeId, TypePool};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rayon::prelude::*;

#[derive(Copy, Clone, Debug)]
enum Entity {
    Type(TypeId),
    Method(MethodId),
    Field(FieldId),
}

/// A module whose types, methods, and fields all collide after sanitization.
fn colliding_pool() -> (TypePool, Vec<Entity>) {
    let mut pool = TypePool::new();
    let corelib = pool.add_system_module("System.Private.CoreLib");
    let int32 = pool.add_type(corelib, "System", "Int32", TypeCategory::Int32);
    let module = pool.add_module("Lib");

    let mut entities = vec![Entity::Type(int32)];
    let mut owners = Vec::new();
    for name in ["A.B", "A_B", "A-B", "A+B"] {
        let ty = pool.add_type(module, "", name, TypeCategory::Class);
        owners.push(ty);
        entities.push(Entity::Type(ty));
    }
    for &owner in &owners {
        for params in [&[][..], &[int32][..], &[int32, int32][..]] {
            let method = pool.add_method(owner, "Go", Signature::static_fn(int32, params));
            entities.push(Entity::Method(method));
        }
        for name in ["x", "x!", "x?"] {
            entities.push(Entity::Field(pool.add_field(owner, name)));
        }
    }
    let list = pool.instantiate(owners[0], &[int32, owners[1]]);
    entities.push(Entity::Type(list));
    let array = pool.sz_array(owners[2]);
    entities.push(Entity::Type(array));
    (pool, entities)
}

fn name_of(mangler: &NameMangler<'_>, entity: Entity) -> ByteString {
    match entity {
        Entity::Type(ty) => mangler.mangle_type(ty),
        Entity::Method(method) => mangler.mangle_method(method),
        Entity::Field(field) => mangler.mangle_field(field),
    }
}

/// Names of `entities`, requested in `order`, reported in `entities` order.
fn names_in_order(pool: &TypePool, entities: &[Entity], order: &[usize]) -> Vec<ByteString> {
    let mangler = NameMangler::new(pool, SymbolNameStrategy::Unix);
    let mut names = vec![ByteString::empty(); entities.len()];
    for &index in order {
        names[index] = name_of(&mangler, entities[index]);
    }
    names
}

fn declaration_order(len: usize) -> Vec<usize> {
    (0..len).collect()
}

#[test]
fn colliding_names_are_numbered_in_declaration_order() {
    let (pool, entities) = colliding_pool();
    let names = names_in_order(&pool, &entities, &declaration_order(entities.len()));
    assert_eq!(names[1], "Lib_A_B");
    assert_eq!(names[2], "Lib_A_B_0");
    assert_eq!(names[3], "Lib_A_B_1");
    assert_eq!(names[4], "Lib_A_B_2");
}

#[test]
fn reverse_order_yields_the_same_names() {
    let (pool, entities) = colliding_pool();
    let forward = declaration_order(entities.len());
    let mut backward = forward.clone();
    backward.reverse();
    assert_eq!(
        names_in_order(&pool, &entities, &forward),
        names_in_order(&pool, &entities, &backward)
    );
}

#[test]
fn names_are_unique() {
    let (pool, entities) = colliding_pool();
    let names = names_in_order(&pool, &entities, &declaration_order(entities.len()));
    let mut sorted = names.clone();
    sorted.sort_by(|a, b| a.as_bytes().cmp(b.as_bytes()));
    sorted.dedup();
    assert_eq!(sorted.len(), names.len());
}

#[test]
fn concurrent_requests_agree_with_sequential_ones() {
    let (pool, entities) = colliding_pool();
    let expected = names_in_order(&pool, &entities, &declaration_order(entities.len()));

    let mangler = NameMangler::new(&pool, SymbolNameStrategy::Unix);
    let requests: Vec<usize> = (0..64).flat_map(|_| 0..entities.len()).rev().collect();
    let observed: Vec<(usize, ByteString)> = requests
        .par_iter()
        .map(|&index| (index, name_of(&mangler, entities[index])))
        .collect();

    for (index, name) in observed {
        assert_eq!(name, expected[index], "entity {:?}", entities[index]);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn any_request_order_yields_the_same_names(
        order in Just(declaration_order(colliding_pool().1.len())).prop_shuffle()
    ) {
        let (pool, entities) = colliding_pool();
        let baseline = names_in_order(&pool, &entities, &declaration_order(entities.len()));
        prop_assert_eq!(names_in_order(&pool, &entities, &order), baseline);
    }
}
