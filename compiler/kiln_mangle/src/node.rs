//! Symbol-requesting nodes.
//!
//! Each node of the dependency graph that ends up as an object-file symbol
//! asks the mangler for its name once and treats it as opaque from then on.

use kiln_text::{ByteString, ByteStringBuffer};
use kiln_types::{FieldId, MethodId, TypeId};

use crate::{MangleError, NameMangler, StaticsKind};

/// A graph node that owns an object-file symbol.
pub trait SymbolNode {
    fn append_mangled_name(
        &self,
        mangler: &NameMangler<'_>,
        buf: &mut ByteStringBuffer,
    ) -> Result<(), MangleError>;

    fn mangled_name(&self, mangler: &NameMangler<'_>) -> Result<ByteString, MangleError> {
        let mut buf = ByteStringBuffer::new();
        self.append_mangled_name(mangler, &mut buf)?;
        Ok(buf.finalize())
    }
}

/// Compiled body of a method.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MethodEntrypointNode(pub MethodId);

impl SymbolNode for MethodEntrypointNode {
    fn append_mangled_name(
        &self,
        mangler: &NameMangler<'_>,
        buf: &mut ByteStringBuffer,
    ) -> Result<(), MangleError> {
        mangler.append_mangled_method_name(self.0, buf);
        Ok(())
    }
}

/// Stub that unboxes `this` before calling a value-type instance method.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct UnboxingStubNode(pub MethodId);

impl SymbolNode for UnboxingStubNode {
    fn append_mangled_name(
        &self,
        mangler: &NameMangler<'_>,
        buf: &mut ByteStringBuffer,
    ) -> Result<(), MangleError> {
        buf.append(b"unbox_");
        mangler.append_mangled_method_name(self.0, buf);
        Ok(())
    }
}

/// Method table emitted in this compilation unit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MethodTableNode(pub TypeId);

impl SymbolNode for MethodTableNode {
    fn append_mangled_name(
        &self,
        mangler: &NameMangler<'_>,
        buf: &mut ByteStringBuffer,
    ) -> Result<(), MangleError> {
        mangler.node_mangler().append_method_table(self.0, buf);
        Ok(())
    }
}

/// Reference to a method table emitted by another compilation unit.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct ExternMethodTableSymbolNode(pub TypeId);

impl SymbolNode for ExternMethodTableSymbolNode {
    fn append_mangled_name(
        &self,
        mangler: &NameMangler<'_>,
        buf: &mut ByteStringBuffer,
    ) -> Result<(), MangleError> {
        mangler.node_mangler().append_method_table(self.0, buf);
        Ok(())
    }
}

/// Static storage block of a type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct StaticsNode {
    pub ty: TypeId,
    pub kind: StaticsKind,
}

impl SymbolNode for StaticsNode {
    fn append_mangled_name(
        &self,
        mangler: &NameMangler<'_>,
        buf: &mut ByteStringBuffer,
    ) -> Result<(), MangleError> {
        mangler.node_mangler().append_statics(self.ty, self.kind, buf);
        Ok(())
    }
}

/// Lookup table of a generic type or method instantiation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum GenericDictionaryNode {
    Type(TypeId),
    Method(MethodId),
}

impl SymbolNode for GenericDictionaryNode {
    fn append_mangled_name(
        &self,
        mangler: &NameMangler<'_>,
        buf: &mut ByteStringBuffer,
    ) -> Result<(), MangleError> {
        let nodes = mangler.node_mangler();
        match *self {
            Self::Type(ty) => nodes.append_type_generic_dictionary(ty, buf),
            Self::Method(method) => nodes.append_method_generic_dictionary(method, buf),
        }
        Ok(())
    }
}

/// Frozen string literal object.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct StringLiteralNode(pub String);

impl SymbolNode for StringLiteralNode {
    fn append_mangled_name(
        &self,
        mangler: &NameMangler<'_>,
        buf: &mut ByteStringBuffer,
    ) -> Result<(), MangleError> {
        mangler.append_mangled_string_literal(&self.0, buf);
        Ok(())
    }
}

/// Entity a native-layout signature describes.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SignatureIdentity {
    Type(TypeId),
    Method(MethodId),
    Field(FieldId),
}

/// Native-layout signature blob.
///
/// Named by compilation unit, a caller-chosen identity prefix, and the
/// described entity, so that blobs of different units never clash at link
/// time.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct NativeLayoutSignatureNode {
    pub identity_prefix: String,
    pub identity: SignatureIdentity,
}

impl SymbolNode for NativeLayoutSignatureNode {
    fn append_mangled_name(
        &self,
        mangler: &NameMangler<'_>,
        buf: &mut ByteStringBuffer,
    ) -> Result<(), MangleError> {
        buf.append_byte_string(mangler.compilation_unit_prefix());
        buf.append_str(&self.identity_prefix);
        match self.identity {
            SignatureIdentity::Type(ty) => mangler.append_mangled_type_name(ty, buf),
            SignatureIdentity::Method(method) => mangler.append_mangled_method_name(method, buf),
            SignatureIdentity::Field(field) => mangler.append_mangled_field_name(field, buf),
        }
        Ok(())
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ExternKind {
    /// Native function bound to this method.
    Method(MethodId),
    Variable,
}

/// Symbol defined outside managed code, named by its native name.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct ExternSymbolNode {
    pub name: String,
    pub kind: ExternKind,
}

impl SymbolNode for ExternSymbolNode {
    fn append_mangled_name(
        &self,
        mangler: &NameMangler<'_>,
        buf: &mut ByteStringBuffer,
    ) -> Result<(), MangleError> {
        let nodes = mangler.node_mangler();
        let decorated = match self.kind {
            ExternKind::Method(method) => nodes.extern_method_name(&self.name, method)?,
            ExternKind::Variable => nodes.extern_variable_name(&self.name),
        };
        buf.append_str(&decorated);
        Ok(())
    }
}

#[cfg(test)]
mod tests;
