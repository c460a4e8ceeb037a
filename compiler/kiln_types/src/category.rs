//! Type categories.
//!
//! The foundational module defines the primitive and well-known types. They
//! are referenced so often that mangling gives them short fixed names instead
//! of assembly-prefixed ones; [`TypeCategory::well_known_name`] is that table.

/// Classification of a metadata-defined type.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TypeCategory {
    // === Well-known primitives ===
    Boolean,
    Char,
    SByte,
    Byte,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Int64,
    UInt64,
    /// Native-size signed integer.
    IntPtr,
    /// Native-size unsigned integer.
    UIntPtr,
    Single,
    Double,

    // === Well-known reference types ===
    String,
    Object,

    // === Everything else ===
    /// Ordinary reference type.
    Class,
    /// Interface type.
    Interface,
    /// User-defined value type.
    ValueType,
    /// Enumeration (a value type).
    Enum,
}

impl TypeCategory {
    /// Short fixed name used for this category in the foundational module.
    ///
    /// `None` for categories that are mangled like any other type.
    pub const fn well_known_name(self) -> Option<&'static str> {
        let name = match self {
            Self::Boolean => "Bool",
            Self::Byte => "UInt8",
            Self::SByte => "Int8",
            Self::UInt16 => "UInt16",
            Self::Int16 => "Int16",
            Self::UInt32 => "UInt32",
            Self::Int32 => "Int32",
            Self::UInt64 => "UInt64",
            Self::Int64 => "Int64",
            Self::Char => "Char",
            Self::Double => "Double",
            Self::Single => "Single",
            Self::IntPtr => "IntPtr",
            Self::UIntPtr => "UIntPtr",
            Self::String => "String",
            Self::Object => "Object",
            Self::Class | Self::Interface | Self::ValueType | Self::Enum => return None,
        };
        Some(name)
    }

    /// Whether values of this category are stored inline (boxed on demand).
    pub const fn is_value_type(self) -> bool {
        !matches!(
            self,
            Self::String | Self::Object | Self::Class | Self::Interface
        )
    }

    /// Size of a primitive in bytes, if the category has a fixed size.
    pub const fn primitive_size(self, pointer_size: u32) -> Option<u32> {
        let size = match self {
            Self::Boolean | Self::SByte | Self::Byte => 1,
            Self::Char | Self::Int16 | Self::UInt16 => 2,
            Self::Int32 | Self::UInt32 | Self::Single => 4,
            Self::Int64 | Self::UInt64 | Self::Double => 8,
            Self::IntPtr | Self::UIntPtr => pointer_size,
            Self::String | Self::Object | Self::Class | Self::Interface => pointer_size,
            Self::ValueType | Self::Enum => return None,
        };
        Some(size)
    }
}

#[cfg(test)]
mod tests;
