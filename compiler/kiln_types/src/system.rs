//! The read-only interface mangling consumes.

use crate::{FieldDef, FieldId, MethodDef, MethodId, ModuleDef, ModuleId, TypeId, TypeKind};

/// Read access to modules, types, methods, and fields.
///
/// Implementations hand out handles; lookups with a handle issued by a
/// different implementation may panic. Entities never change once handed
/// out, which is what lets a name cache them forever.
pub trait TypeSystem: Sync {
    fn module(&self, id: ModuleId) -> &ModuleDef;

    fn type_kind(&self, ty: TypeId) -> &TypeKind;

    fn method(&self, id: MethodId) -> &MethodDef;

    fn field(&self, id: FieldId) -> &FieldDef;

    /// Whether `ty` is stored inline and boxed on demand.
    fn is_value_type(&self, ty: TypeId) -> bool {
        match self.type_kind(ty) {
            TypeKind::Metadata(def) => def.category.is_value_type(),
            TypeKind::Instantiated { definition, .. } => self.is_value_type(*definition),
            TypeKind::Synthetic { .. }
            | TypeKind::SzArray { .. }
            | TypeKind::MdArray { .. }
            | TypeKind::ByRef { .. }
            | TypeKind::Pointer { .. }
            | TypeKind::FunctionPointer(_)
            | TypeKind::PrefixMangled { .. } => false,
        }
    }

    /// Bytes a value of `ty` occupies when passed as an argument.
    ///
    /// References, pointers, and arrays are one pointer wide. Value types
    /// without a recorded size fall back to one pointer as well.
    fn element_size(&self, ty: TypeId, pointer_size: u32) -> u32 {
        match self.type_kind(ty) {
            TypeKind::Metadata(def) => def
                .category
                .primitive_size(pointer_size)
                .or(def.instance_size)
                .unwrap_or(pointer_size),
            TypeKind::Instantiated { definition, .. } => {
                self.element_size(*definition, pointer_size)
            }
            TypeKind::Synthetic { .. }
            | TypeKind::SzArray { .. }
            | TypeKind::MdArray { .. }
            | TypeKind::ByRef { .. }
            | TypeKind::Pointer { .. }
            | TypeKind::FunctionPointer(_)
            | TypeKind::PrefixMangled { .. } => pointer_size,
        }
    }
}
