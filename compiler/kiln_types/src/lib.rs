//! Kiln Types - the type-system view consumed by symbol mangling.
//!
//! The mangler never owns metadata. It reads entity identity and structure
//! through the [`TypeSystem`] trait:
//!
//! - **Handles**: [`ModuleId`], [`TypeId`], [`MethodId`], [`FieldId`] - 32-bit
//!   indices, O(1) equality and hashing.
//! - **Structure**: [`TypeKind`] and [`MethodKind`] are closed sums over every
//!   way an entity can come into existence (metadata definition, array,
//!   by-ref, pointer, function pointer, generic instantiation, compiler
//!   synthesized, prefix-wrapped). Mangling matches on them exhaustively.
//! - **Batches**: metadata types list their methods and fields, and modules
//!   list their types, in declaration order. That order, never discovery
//!   order, drives name disambiguation.
//!
//! [`TypePool`] is an in-memory implementation used by tests and by drivers
//! that build metadata directly.

mod category;
mod ids;
mod kind;
mod pool;
mod signature;
mod system;

pub use category::TypeCategory;
pub use ids::{FieldId, MethodId, ModuleId, TypeId};
pub use kind::{
    FieldDef, FieldKind, MetadataType, MethodDef, MethodKind, ModuleDef, PrefixBase, TypeKind,
};
pub use pool::TypePool;
pub use signature::{CallingConvention, MethodFlags, Signature, SignatureFlags};
pub use system::TypeSystem;

/// Inline list of type arguments or parameters.
///
/// Most generic instantiations and signatures have four or fewer entries.
pub type TypeList = smallvec::SmallVec<[TypeId; 4]>;
