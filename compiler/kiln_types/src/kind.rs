//! Structural description of modules, types, methods, and fields.
//!
//! Every way an entity can come into existence is one variant of a closed
//! enum. Consumers match exhaustively, so a new construction is a compile-time
//! obligation for every name producer.

use crate::{
    CallingConvention, FieldId, MethodFlags, MethodId, ModuleId, Signature, TypeCategory, TypeId,
    TypeList,
};

/// A loaded module.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ModuleDef {
    /// Simple assembly name, e.g. `System.Private.CoreLib`.
    pub assembly_name: String,
    /// Whether this is the runtime's foundational module.
    pub is_system: bool,
    /// Every metadata type of the module (nested types included), in
    /// declaration order.
    pub types: Vec<TypeId>,
}

/// A type defined directly in metadata.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MetadataType {
    pub module: ModuleId,
    /// Empty for nested types and for types in the global namespace.
    pub namespace: String,
    pub name: String,
    /// Enclosing type for nested types.
    pub enclosing: Option<TypeId>,
    pub category: TypeCategory,
    /// Declared methods, in declaration order.
    pub methods: Vec<MethodId>,
    /// Declared fields, in declaration order.
    pub fields: Vec<FieldId>,
    /// Byte size of an unboxed instance, when known.
    pub instance_size: Option<u32>,
}

/// The entity a prefix-mangled type or method wraps.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum PrefixBase {
    Type(TypeId),
    Method(MethodId),
    Signature(Signature),
}

/// How a type came into existence.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeKind {
    /// Defined in metadata; named through its module's batch.
    Metadata(MetadataType),
    /// Compiler synthesized with a name unique by construction.
    Synthetic { namespace: String, name: String },
    /// Single-dimensional, zero-based array.
    SzArray { element: TypeId },
    /// Multi-dimensional array.
    MdArray { element: TypeId, rank: u32 },
    ByRef { referent: TypeId },
    Pointer { referent: TypeId },
    FunctionPointer(Signature),
    /// Generic type definition closed over type arguments.
    Instantiated { definition: TypeId, args: TypeList },
    /// Compiler-generated wrapper named after another entity.
    PrefixMangled { prefix: String, base: PrefixBase },
}

impl TypeKind {
    /// The metadata definition, if this type is one.
    #[inline]
    pub fn as_metadata(&self) -> Option<&MetadataType> {
        match self {
            Self::Metadata(def) => Some(def),
            _ => None,
        }
    }
}

/// How a method came into existence.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum MethodKind {
    /// Declared in metadata on its owning type.
    Metadata,
    /// Generic method definition closed over method type arguments.
    Instantiated { definition: MethodId, args: TypeList },
    /// Method of an instantiated generic type; `typical` is the same method
    /// on the open definition.
    OnInstantiatedType { typical: MethodId },
    /// Stub named after another entity.
    PrefixMangled { prefix: String, base: PrefixBase },
    /// Compiler synthesized with a name unique by construction.
    Synthetic,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct MethodDef {
    pub owning_type: TypeId,
    pub name: String,
    pub kind: MethodKind,
    pub signature: Signature,
    pub flags: MethodFlags,
    /// Explicitly declared unmanaged calling convention.
    pub unmanaged_convention: Option<CallingConvention>,
}

impl MethodDef {
    /// Convention used when native code calls or is called through this
    /// method, or `None` for managed-only methods.
    ///
    /// The flags are the gate: only platform-invoke and
    /// unmanaged-callers-only methods have a convention. Those without an
    /// explicit one use the platform default, stdcall.
    pub fn unmanaged_calling_convention(&self) -> Option<CallingConvention> {
        if self
            .flags
            .intersects(MethodFlags::PINVOKE | MethodFlags::UNMANAGED_CALLERS_ONLY)
        {
            Some(
                self.unmanaged_convention
                    .unwrap_or(CallingConvention::Stdcall),
            )
        } else {
            None
        }
    }

    /// Imported from or exported to the runtime under a fixed name.
    #[inline]
    pub fn is_runtime_linked(&self) -> bool {
        self.flags
            .intersects(MethodFlags::RUNTIME_IMPORT | MethodFlags::RUNTIME_EXPORT)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum FieldKind {
    /// Declared in metadata; disambiguated with its siblings.
    Metadata,
    /// Field of an instantiated generic type; `typical` is the same field on
    /// the open definition.
    OnInstantiatedType { typical: FieldId },
    /// Compiler synthesized with a name unique by construction.
    Synthetic,
}

#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct FieldDef {
    pub owning_type: TypeId,
    pub name: String,
    pub kind: FieldKind,
}
