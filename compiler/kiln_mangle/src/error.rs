//! Mangling errors.
//!
//! Every variant names the entity whose symbol could not be produced, so a
//! driver can abort the compilation unit with a message pointing at the root
//! cause instead of emitting a wrong symbol.

use std::fmt;

use kiln_types::{CallingConvention, MethodId, TypeId};

use crate::TargetError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MangleError {
    /// Extern decoration does not know this calling convention.
    UnsupportedCallingConvention {
        method: MethodId,
        convention: CallingConvention,
    },
    /// The x86 argument stack size of an extern method overflowed.
    ArgumentSizeOverflow { method: MethodId },
    /// A boxed name was requested for a type that is not a value type.
    NotAValueType { ty: TypeId },
    /// Target configuration was rejected.
    Target(TargetError),
}

impl fmt::Display for MangleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnsupportedCallingConvention { method, convention } => {
                write!(
                    f,
                    "cannot decorate extern name of {method}: unsupported calling convention {convention}"
                )
            }
            Self::ArgumentSizeOverflow { method } => {
                write!(f, "cannot decorate extern name of {method}: argument size overflows")
            }
            Self::NotAValueType { ty } => {
                write!(f, "cannot name boxed form of {ty}: not a value type")
            }
            Self::Target(err) => write!(f, "{err}"),
        }
    }
}

impl std::error::Error for MangleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Target(err) => Some(err),
            Self::UnsupportedCallingConvention { .. }
            | Self::ArgumentSizeOverflow { .. }
            | Self::NotAValueType { .. } => None,
        }
    }
}

impl From<TargetError> for MangleError {
    fn from(err: TargetError) -> Self {
        Self::Target(err)
    }
}
