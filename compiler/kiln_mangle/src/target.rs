//! Target description.
//!
//! The only configuration the mangler takes: which object-file ABI symbols
//! are produced for, and the architecture details extern decoration needs.

use std::fmt;

/// Target configuration errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TargetError {
    /// Triple is not `<arch>-<vendor>-<os>[-<env>]`.
    InvalidTripleFormat { triple: String, reason: String },
    /// Architecture component is not one the compiler generates code for.
    UnsupportedArchitecture { triple: String, arch: String },
}

impl fmt::Display for TargetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidTripleFormat { triple, reason } => {
                write!(f, "invalid target triple '{triple}': {reason}")
            }
            Self::UnsupportedArchitecture { triple, arch } => {
                write!(f, "unsupported architecture '{arch}' in target '{triple}'")
            }
        }
    }
}

impl std::error::Error for TargetError {}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TargetArch {
    /// 32-bit x86, the only target with decorated extern names.
    X86,
    X64,
    Arm,
    Arm64,
    Wasm32,
    RiscV64,
    LoongArch64,
}

impl TargetArch {
    /// Parse the architecture component of a triple.
    pub fn parse(arch: &str) -> Option<Self> {
        Some(match arch {
            "i386" | "i586" | "i686" | "x86" => Self::X86,
            "x86_64" | "amd64" | "x64" => Self::X64,
            "arm" | "armv7" | "armv7a" | "thumbv7" | "thumbv7a" => Self::Arm,
            "aarch64" | "arm64" => Self::Arm64,
            "wasm32" => Self::Wasm32,
            "riscv64" | "riscv64gc" => Self::RiscV64,
            "loongarch64" => Self::LoongArch64,
            _ => return None,
        })
    }

    /// Pointer width in bytes.
    pub const fn pointer_size(self) -> u32 {
        match self {
            Self::X86 | Self::Arm | Self::Wasm32 => 4,
            Self::X64 | Self::Arm64 | Self::RiscV64 | Self::LoongArch64 => 8,
        }
    }
}

impl fmt::Display for TargetArch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::X86 => "x86",
            Self::X64 => "x64",
            Self::Arm => "arm",
            Self::Arm64 => "arm64",
            Self::Wasm32 => "wasm32",
            Self::RiscV64 => "riscv64",
            Self::LoongArch64 => "loongarch64",
        })
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum TargetOs {
    Windows,
    Linux,
    MacOs,
    FreeBsd,
    Wasi,
    /// Any other OS; treated as ELF-style.
    Other,
}

impl TargetOs {
    pub fn parse(os: &str) -> Self {
        match os {
            "windows" => Self::Windows,
            "linux" => Self::Linux,
            "darwin" | "macos" => Self::MacOs,
            "freebsd" => Self::FreeBsd,
            "wasi" => Self::Wasi,
            _ => Self::Other,
        }
    }
}

/// Architecture, OS, and pointer width of the compilation target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct TargetDetails {
    pub arch: TargetArch,
    pub os: TargetOs,
    pub pointer_size: u32,
}

impl TargetDetails {
    pub fn new(arch: TargetArch, os: TargetOs) -> Self {
        Self {
            arch,
            os,
            pointer_size: arch.pointer_size(),
        }
    }

    /// Parse a target triple.
    ///
    /// Format: `<arch>-<vendor>-<os>[-<env>]`
    pub fn from_triple(triple: &str) -> Result<Self, TargetError> {
        let parts: Vec<&str> = triple.split('-').collect();

        if parts.len() < 3 || parts.iter().any(|part| part.is_empty()) {
            return Err(TargetError::InvalidTripleFormat {
                triple: triple.to_string(),
                reason: "expected at least 3 components: <arch>-<vendor>-<os>".to_string(),
            });
        }

        let arch = TargetArch::parse(parts[0]).ok_or_else(|| TargetError::UnsupportedArchitecture {
            triple: triple.to_string(),
            arch: parts[0].to_string(),
        })?;

        Ok(Self::new(arch, TargetOs::parse(parts[2])))
    }

    #[inline]
    pub fn is_windows(&self) -> bool {
        self.os == TargetOs::Windows
    }
}
