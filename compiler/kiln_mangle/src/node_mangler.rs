//! Platform-specific compound symbols.
//!
//! Base names come from [`NameMangler`]; this layer wraps them into the
//! symbols object writers and debuggers expect for vtables, static blocks,
//! generic dictionaries, and native externs.
//!
//! | Symbol | Unix (ELF/Mach-O) | Windows (COFF) |
//! |--------|-------------------|----------------|
//! | vtable | `N_ZTV<len(N)>N` | `??_7N@@6B@` |
//! | GC statics | `__GCSTATICS` + T | `?__GCSTATICS@T@@` |
//! | non-GC statics | `__NONGCSTATICS` + T | `?__NONGCSTATICS@T@@` |
//! | thread statics | unit + `__THREADSTATICS` + T | `?` unit `__THREADSTATICS@T@@` |
//! | thread static index | `__TypeThreadStaticIndex` + T | `?__THREADSTATICINDEX@T@@` |
//! | generic dictionary | `__GenericDict_` + T or M | same |
//!
//! `N` is `Boxed_T` for value types and `T` otherwise. The Windows shapes
//! are MSVC's own manglings of a vftable and of static data members, so
//! debuggers classify the symbols correctly.
//!
//! Nothing here is cached; every name is cheap to recompose from the cached
//! base names.

use std::borrow::Cow;

use kiln_text::{ByteString, ByteStringBuffer};
use kiln_types::{CallingConvention, MethodId, TypeId};
use tracing::error;

use crate::{MangleError, NameMangler, TargetArch, TargetDetails};

const BOXED_PREFIX: &[u8] = b"Boxed_";
const GENERIC_DICTIONARY_PREFIX: &[u8] = b"__GenericDict_";

const GC_STATICS_TAG: &[u8] = b"__GCSTATICS";
const NON_GC_STATICS_TAG: &[u8] = b"__NONGCSTATICS";
const THREAD_STATICS_TAG: &[u8] = b"__THREADSTATICS";
const UNIX_THREAD_STATIC_INDEX_TAG: &[u8] = b"__TypeThreadStaticIndex";
const WINDOWS_THREAD_STATIC_INDEX_TAG: &[u8] = b"__THREADSTATICINDEX";

/// Object-file naming conventions, chosen once per compilation.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum SymbolNameStrategy {
    /// ELF and Mach-O targets.
    Unix,
    /// COFF targets; extern decoration depends on the architecture.
    Windows { arch: TargetArch, pointer_size: u32 },
}

impl SymbolNameStrategy {
    pub fn for_target(target: &TargetDetails) -> Self {
        if target.is_windows() {
            Self::Windows {
                arch: target.arch,
                pointer_size: target.pointer_size,
            }
        } else {
            Self::Unix
        }
    }
}

/// Kinds of per-type static storage.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum StaticsKind {
    /// Statics holding GC references.
    Gc,
    /// Statics without GC references.
    NonGc,
    /// Thread-local statics.
    Thread,
    /// Index of the type's thread-local storage block.
    ThreadIndex,
}

/// Compound-symbol view over a [`NameMangler`].
#[derive(Copy, Clone, Debug)]
pub struct NodeMangler<'m, 'a> {
    names: &'m NameMangler<'a>,
}

impl<'m, 'a> NodeMangler<'m, 'a> {
    pub fn new(names: &'m NameMangler<'a>) -> Self {
        Self { names }
    }

    #[inline]
    pub fn name_mangler(&self) -> &'m NameMangler<'a> {
        self.names
    }

    // === Boxed types and vtables ===

    /// `Boxed_` + type name. Only value types have a boxed form.
    pub fn append_boxed_type_name(
        &self,
        ty: TypeId,
        buf: &mut ByteStringBuffer,
    ) -> Result<(), MangleError> {
        if !self.names.type_system().is_value_type(ty) {
            error!(%ty, "boxed name requested for a reference type");
            return Err(MangleError::NotAValueType { ty });
        }
        buf.append(BOXED_PREFIX);
        self.names.append_mangled_type_name(ty, buf);
        Ok(())
    }

    pub fn boxed_type_name(&self, ty: TypeId) -> Result<ByteString, MangleError> {
        let mut buf = ByteStringBuffer::new();
        self.append_boxed_type_name(ty, &mut buf)?;
        Ok(buf.finalize())
    }

    /// Name a vtable is keyed on: boxed for value types, plain otherwise.
    fn append_vtable_subject(&self, ty: TypeId, buf: &mut ByteStringBuffer) {
        if self.names.type_system().is_value_type(ty) {
            buf.append(BOXED_PREFIX);
        }
        self.names.append_mangled_type_name(ty, buf);
    }

    /// Symbol of the type's method table (vtable).
    pub fn append_method_table(&self, ty: TypeId, buf: &mut ByteStringBuffer) {
        match self.names.strategy() {
            SymbolNameStrategy::Unix => {
                let subject_start = buf.len();
                self.append_vtable_subject(ty, buf);
                let subject = ByteString::from(buf.view_from(subject_start));
                buf.append(b"_ZTV");
                buf.append_usize(subject.len());
                buf.append_byte_string(&subject);
            }
            SymbolNameStrategy::Windows { .. } => {
                buf.append(b"??_7");
                self.append_vtable_subject(ty, buf);
                buf.append(b"@@6B@");
            }
        }
    }

    pub fn method_table(&self, ty: TypeId) -> ByteString {
        let mut buf = ByteStringBuffer::new();
        self.append_method_table(ty, &mut buf);
        buf.finalize()
    }

    // === Statics ===

    pub fn append_statics(&self, ty: TypeId, kind: StaticsKind, buf: &mut ByteStringBuffer) {
        match kind {
            StaticsKind::Gc => self.append_gc_statics(ty, buf),
            StaticsKind::NonGc => self.append_non_gc_statics(ty, buf),
            StaticsKind::Thread => self.append_thread_statics(ty, buf),
            StaticsKind::ThreadIndex => self.append_thread_statics_index(ty, buf),
        }
    }

    pub fn statics(&self, ty: TypeId, kind: StaticsKind) -> ByteString {
        let mut buf = ByteStringBuffer::new();
        self.append_statics(ty, kind, &mut buf);
        buf.finalize()
    }

    pub fn append_gc_statics(&self, ty: TypeId, buf: &mut ByteStringBuffer) {
        self.append_static_member(ty, GC_STATICS_TAG, GC_STATICS_TAG, buf);
    }

    pub fn append_non_gc_statics(&self, ty: TypeId, buf: &mut ByteStringBuffer) {
        self.append_static_member(ty, NON_GC_STATICS_TAG, NON_GC_STATICS_TAG, buf);
    }

    /// Thread statics carry the compilation-unit prefix: each unit of a
    /// multi-module build owns its own thread-local block.
    pub fn append_thread_statics(&self, ty: TypeId, buf: &mut ByteStringBuffer) {
        let unit = self.names.compilation_unit_prefix();
        match self.names.strategy() {
            SymbolNameStrategy::Unix => {
                buf.append_byte_string(unit);
                buf.append(THREAD_STATICS_TAG);
                self.names.append_mangled_type_name(ty, buf);
            }
            SymbolNameStrategy::Windows { .. } => {
                buf.append_ascii('?');
                buf.append_byte_string(unit);
                buf.append(THREAD_STATICS_TAG);
                buf.append_ascii('@');
                self.names.append_mangled_type_name(ty, buf);
                buf.append(b"@@");
            }
        }
    }

    pub fn append_thread_statics_index(&self, ty: TypeId, buf: &mut ByteStringBuffer) {
        self.append_static_member(
            ty,
            UNIX_THREAD_STATIC_INDEX_TAG,
            WINDOWS_THREAD_STATIC_INDEX_TAG,
            buf,
        );
    }

    /// Unix: `tag` + type. Windows: `?tag@type@@`, a static data member.
    fn append_static_member(
        &self,
        ty: TypeId,
        unix_tag: &[u8],
        windows_tag: &[u8],
        buf: &mut ByteStringBuffer,
    ) {
        match self.names.strategy() {
            SymbolNameStrategy::Unix => {
                buf.append(unix_tag);
                self.names.append_mangled_type_name(ty, buf);
            }
            SymbolNameStrategy::Windows { .. } => {
                buf.append_ascii('?');
                buf.append(windows_tag);
                buf.append_ascii('@');
                self.names.append_mangled_type_name(ty, buf);
                buf.append(b"@@");
            }
        }
    }

    // === Generic dictionaries ===

    pub fn append_type_generic_dictionary(&self, ty: TypeId, buf: &mut ByteStringBuffer) {
        buf.append(GENERIC_DICTIONARY_PREFIX);
        self.names.append_mangled_type_name(ty, buf);
    }

    pub fn append_method_generic_dictionary(&self, method: MethodId, buf: &mut ByteStringBuffer) {
        buf.append(GENERIC_DICTIONARY_PREFIX);
        self.names.append_mangled_method_name(method, buf);
    }

    // === Externs ===

    /// Decorate the native name of an extern method.
    ///
    /// Only 32-bit x86 Windows decorates: `_name@bytes` for stdcall,
    /// `@name@bytes` for fastcall, `_name` for cdecl, where `bytes` is the
    /// stack space of the arguments. Runtime imports and exports keep their
    /// name, as do methods without an unmanaged calling convention.
    pub fn extern_method_name<'n>(
        &self,
        name: &'n str,
        method: MethodId,
    ) -> Result<Cow<'n, str>, MangleError> {
        let SymbolNameStrategy::Windows {
            arch: TargetArch::X86,
            pointer_size,
        } = self.names.strategy()
        else {
            return Ok(Cow::Borrowed(name));
        };

        let types = self.names.type_system();
        let def = types.method(method);
        if def.is_runtime_linked() {
            return Ok(Cow::Borrowed(name));
        }
        let Some(convention) = def.unmanaged_calling_convention() else {
            return Ok(Cow::Borrowed(name));
        };

        let stack_bytes = def
            .signature
            .params
            .iter()
            .try_fold(0u32, |total, &param| {
                align_up(types.element_size(param, pointer_size), pointer_size)
                    .and_then(|slot| total.checked_add(slot))
            });
        let Some(stack_bytes) = stack_bytes else {
            error!(%method, "argument stack size does not fit in 32 bits");
            return Err(MangleError::ArgumentSizeOverflow { method });
        };

        match convention {
            CallingConvention::Stdcall => Ok(Cow::Owned(format!("_{name}@{stack_bytes}"))),
            CallingConvention::Fastcall => Ok(Cow::Owned(format!("@{name}@{stack_bytes}"))),
            CallingConvention::Cdecl => Ok(Cow::Owned(format!("_{name}"))),
            CallingConvention::Thiscall => {
                error!(%method, %convention, "no extern decoration for calling convention");
                Err(MangleError::UnsupportedCallingConvention { method, convention })
            }
        }
    }

    /// Decorate the native name of an extern variable: `_name` on 32-bit x86
    /// Windows, unchanged elsewhere.
    pub fn extern_variable_name<'n>(&self, name: &'n str) -> Cow<'n, str> {
        match self.names.strategy() {
            SymbolNameStrategy::Windows {
                arch: TargetArch::X86,
                ..
            } => Cow::Owned(format!("_{name}")),
            SymbolNameStrategy::Windows { .. } | SymbolNameStrategy::Unix => Cow::Borrowed(name),
        }
    }
}

/// `None` when the rounded size does not fit.
#[inline]
fn align_up(size: u32, alignment: u32) -> Option<u32> {
    size.div_ceil(alignment).checked_mul(alignment)
}
