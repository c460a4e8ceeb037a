//! Entity handles.
//!
//! Each handle is a 32-bit index into the owning [`TypePool`](crate::TypePool)
//! (or whatever [`TypeSystem`](crate::TypeSystem) implementation issued it).
//! Identity is index equality.

use std::fmt;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
        #[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
        #[repr(transparent)]
        pub struct $name(u32);

        impl $name {
            /// Create from a raw index.
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            /// Get the raw index.
            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            /// Index as `usize` for slice access.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($label, "#{}"), self.0)
            }
        }
    };
}

entity_id!(
    /// A loaded module (one assembly).
    ModuleId,
    "ModuleId"
);

entity_id!(
    /// A type: metadata-defined, constructed, or compiler synthesized.
    TypeId,
    "TypeId"
);

entity_id!(
    /// A method, including instantiations and compiler stubs.
    MethodId,
    "MethodId"
);

entity_id!(
    /// A field.
    FieldId,
    "FieldId"
);

#[cfg(test)]
mod tests;
