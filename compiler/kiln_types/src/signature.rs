//! Method signatures and unmanaged calling conventions.

use std::fmt;

use bitflags::bitflags;

use crate::{TypeId, TypeList};

bitflags! {
    /// Signature attributes.
    ///
    /// The raw bits are part of function-pointer and signature names, so
    /// existing values must never be renumbered.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct SignatureFlags: u8 {
        /// No `this` parameter.
        const STATIC = 1 << 0;
        /// Variable argument list.
        const VARARGS = 1 << 1;
        /// Called with an unmanaged calling convention.
        const UNMANAGED_CALLING_CONVENTION = 1 << 2;
        /// `this` is passed as an explicit first parameter.
        const EXPLICIT_THIS = 1 << 3;
    }
}

bitflags! {
    /// Method attributes relevant to symbol naming.
    #[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
    pub struct MethodFlags: u8 {
        /// Platform invoke: the body lives in a native library.
        const PINVOKE = 1 << 0;
        /// Callable from native code through an unmanaged entry point.
        const UNMANAGED_CALLERS_ONLY = 1 << 1;
        /// Imported from the runtime under a fixed symbol name.
        const RUNTIME_IMPORT = 1 << 2;
        /// Exported to the runtime under a fixed symbol name.
        const RUNTIME_EXPORT = 1 << 3;
    }
}

/// Unmanaged calling convention.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CallingConvention {
    /// Caller cleans the stack.
    Cdecl,
    /// Callee cleans the stack.
    Stdcall,
    /// First arguments in registers, callee cleans the rest.
    Fastcall,
    /// `this` in a register, callee cleans the stack.
    Thiscall,
}

impl fmt::Display for CallingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Cdecl => "cdecl",
            Self::Stdcall => "stdcall",
            Self::Fastcall => "fastcall",
            Self::Thiscall => "thiscall",
        })
    }
}

/// Return type and parameter types of a method or function pointer.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct Signature {
    pub flags: SignatureFlags,
    pub return_type: TypeId,
    pub params: TypeList,
}

impl Signature {
    pub fn new(flags: SignatureFlags, return_type: TypeId, params: &[TypeId]) -> Self {
        Self {
            flags,
            return_type,
            params: params.iter().copied().collect(),
        }
    }

    /// Static signature with the given return and parameter types.
    pub fn static_fn(return_type: TypeId, params: &[TypeId]) -> Self {
        Self::new(SignatureFlags::STATIC, return_type, params)
    }

    /// Number of parameters (excluding `this`).
    #[inline]
    pub fn len(&self) -> usize {
        self.params.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}
