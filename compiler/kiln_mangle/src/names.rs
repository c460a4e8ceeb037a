//! Entity name mangling.
//!
//! [`NameMangler`] assigns every type, method, field, and string literal a
//! linker-legal name that does not depend on the order entities are compiled
//! in, nor on which worker thread asks first.
//!
//! # Scheme
//!
//! | Entity | Name |
//! |--------|------|
//! | metadata type | `<module>_<Outer>_<Ns_Name>[_n]` |
//! | primitive of the foundational module | `Bool`, `Int32`, `String`, ... |
//! | `T[]` | `__Array<T>` |
//! | `T[,]` | `__MDArray<T,2>` |
//! | `ref T` / `T*` | `T<ByRef>` / `T<Pointer>` |
//! | `delegate*<A, R>` | `__FnPtr_<flags as 2 hex digits><R<A>>` |
//! | `G<A, B>` | `G<A__B>` |
//! | prefixed wrapper | `<prefix>` + name of the wrapped entity |
//! | method | `<owning type>__<name>[_n]`, instantiations add `<A__B>` |
//! | field | `<owning type>__<name>[_n]` |
//! | string literal | sanitized text, digest-suffixed when lossy |
//!
//! `<`, `>` and `,` only ever appear as the delimiters above; sanitization
//! maps them to `_` inside identifiers.
//!
//! # Locking
//!
//! All caches sit behind one non-reentrant mutex. It is held for one cache
//! lookup, one insert, or one whole-batch fill, and never across a recursive
//! call: names of owning types and type arguments are computed first, then the
//! lock is taken to publish the result. Two workers racing on the same entity
//! compute identical bytes; the first insert wins and both return it.

use kiln_text::{ByteString, ByteStringBuffer};
use kiln_types::{
    FieldDef, FieldId, FieldKind, MetadataType, MethodDef, MethodId, MethodKind, ModuleDef,
    ModuleId, PrefixBase, Signature, TypeId, TypeKind, TypeSystem,
};
use parking_lot::Mutex;
use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::disambiguate::Disambiguator;
use crate::sanitize::{append_sanitized, append_sanitized_with_hash, sanitize, sanitize_with_hash};
use crate::stack::ensure_sufficient_stack;
use crate::{MangleError, NodeMangler, SymbolNameStrategy, TargetDetails};

/// Assembly-name prefix of the runtime's own libraries.
const SYSTEM_PRIVATE_PREFIX: &str = "System.Private.";

/// Abbreviation replacing [`SYSTEM_PRIVATE_PREFIX`].
const SYSTEM_PRIVATE_ABBREVIATION: &[u8] = b"S_P_";

const ENTER_SCOPE: char = '<';
const EXIT_SCOPE: char = '>';
const DELIMIT_SCOPE: char = ',';

/// Separator between an owner and a member, and between type arguments.
const MEMBER_SEP: &[u8] = b"__";

/// Append-only name caches.
#[derive(Default)]
struct ManglerState {
    type_names: FxHashMap<TypeId, ByteString>,
    method_names: FxHashMap<MethodId, ByteString>,
    unqualified_method_names: FxHashMap<MethodId, ByteString>,
    field_names: FxHashMap<FieldId, ByteString>,
    unqualified_field_names: FxHashMap<FieldId, ByteString>,
    string_literals: FxHashMap<Box<str>, ByteString>,

    /// Modules whose types have all been named.
    named_modules: FxHashSet<ModuleId>,
    /// Types whose declared methods have all been named.
    named_method_batches: FxHashSet<TypeId>,
    /// Types whose declared fields have all been named.
    named_field_batches: FxHashSet<TypeId>,
}

/// Deterministic symbol names for one compilation.
///
/// Shared by reference between compilation workers; every operation takes
/// `&self`.
pub struct NameMangler<'a> {
    types: &'a dyn TypeSystem,
    strategy: SymbolNameStrategy,
    compilation_unit_prefix: ByteString,
    state: Mutex<ManglerState>,
}

impl<'a> NameMangler<'a> {
    pub fn new(types: &'a dyn TypeSystem, strategy: SymbolNameStrategy) -> Self {
        Self {
            types,
            strategy,
            compilation_unit_prefix: ByteString::empty(),
            state: Mutex::new(ManglerState::default()),
        }
    }

    /// Mangler using the symbol conventions of `target`.
    pub fn for_target(types: &'a dyn TypeSystem, target: &TargetDetails) -> Self {
        Self::new(types, SymbolNameStrategy::for_target(target))
    }

    /// Mangler for a target triple such as `i686-pc-windows-msvc`.
    pub fn for_triple(types: &'a dyn TypeSystem, triple: &str) -> Result<Self, MangleError> {
        let target = TargetDetails::from_triple(triple)?;
        Ok(Self::for_target(types, &target))
    }

    #[inline]
    pub fn type_system(&self) -> &'a dyn TypeSystem {
        self.types
    }

    #[inline]
    pub fn strategy(&self) -> SymbolNameStrategy {
        self.strategy
    }

    /// Platform layer for compound symbols (vtables, statics, externs).
    #[inline]
    pub fn node_mangler(&self) -> NodeMangler<'_, 'a> {
        NodeMangler::new(self)
    }

    /// Tag distinguishing this compilation unit in multi-module builds.
    #[inline]
    pub fn compilation_unit_prefix(&self) -> &ByteString {
        &self.compilation_unit_prefix
    }

    /// Set the compilation-unit tag from a raw name (usually the output
    /// module's name). Must happen before any name is requested.
    pub fn set_compilation_unit_prefix(&mut self, raw: &str) {
        self.compilation_unit_prefix = sanitize_with_hash(raw);
    }

    // === Types ===

    /// Mangled name of `ty`.
    pub fn mangle_type(&self, ty: TypeId) -> ByteString {
        if let Some(name) = self.cached(|state| state.type_names.get(&ty)) {
            return name;
        }
        ensure_sufficient_stack(|| self.compute_type_name(ty))
    }

    pub fn append_mangled_type_name(&self, ty: TypeId, buf: &mut ByteStringBuffer) {
        let name = self.mangle_type(ty);
        buf.append_byte_string(&name);
    }

    fn compute_type_name(&self, ty: TypeId) -> ByteString {
        let kind = self.types.type_kind(ty);
        if let TypeKind::Metadata(def) = kind {
            return self.metadata_type_name(ty, def);
        }

        let mut buf = ByteStringBuffer::new();
        self.append_structural_type_name(ty, kind, &mut buf);
        self.publish(buf.finalize(), |state| &mut state.type_names, ty)
    }

    fn append_structural_type_name(
        &self,
        ty: TypeId,
        kind: &TypeKind,
        buf: &mut ByteStringBuffer,
    ) {
        match kind {
            TypeKind::Metadata(def) => {
                let name = self.metadata_type_name(ty, def);
                buf.append_byte_string(&name);
            }
            TypeKind::MdArray { element, rank } => {
                buf.append(b"__MDArray");
                buf.append_ascii(ENTER_SCOPE);
                self.append_mangled_type_name(*element, buf);
                buf.append_ascii(DELIMIT_SCOPE);
                buf.append_int(i64::from(*rank));
                buf.append_ascii(EXIT_SCOPE);
            }
            TypeKind::SzArray { element } => {
                buf.append(b"__Array");
                buf.append_ascii(ENTER_SCOPE);
                self.append_mangled_type_name(*element, buf);
                buf.append_ascii(EXIT_SCOPE);
            }
            TypeKind::ByRef { referent } => {
                self.append_mangled_type_name(*referent, buf);
                buf.append(b"<ByRef>");
            }
            TypeKind::Pointer { referent } => {
                self.append_mangled_type_name(*referent, buf);
                buf.append(b"<Pointer>");
            }
            TypeKind::FunctionPointer(sig) => {
                buf.append(b"__FnPtr_");
                buf.append_hex(u64::from(sig.flags.bits()), 2);
                buf.append_ascii(ENTER_SCOPE);
                self.append_mangled_type_name(sig.return_type, buf);
                buf.append_ascii(ENTER_SCOPE);
                for (i, &param) in sig.params.iter().enumerate() {
                    if i != 0 {
                        buf.append_ascii(DELIMIT_SCOPE);
                    }
                    self.append_mangled_type_name(param, buf);
                }
                buf.append_ascii(EXIT_SCOPE);
                buf.append_ascii(EXIT_SCOPE);
            }
            TypeKind::Instantiated { definition, args } => {
                self.append_mangled_type_name(*definition, buf);
                self.append_instantiation(args, buf);
            }
            TypeKind::Synthetic { namespace, name } => {
                append_sanitized_full_name(namespace, name, buf);
            }
            TypeKind::PrefixMangled { prefix, base } => {
                self.append_prefix_mangled_name(prefix, base, buf);
            }
        }
    }

    /// `<A__B__C>`
    fn append_instantiation(&self, args: &[TypeId], buf: &mut ByteStringBuffer) {
        buf.append_ascii(ENTER_SCOPE);
        for (i, &arg) in args.iter().enumerate() {
            if i != 0 {
                buf.append(MEMBER_SEP);
            }
            self.append_mangled_type_name(arg, buf);
        }
        buf.append_ascii(EXIT_SCOPE);
    }

    fn append_prefix_mangled_name(
        &self,
        prefix: &str,
        base: &PrefixBase,
        buf: &mut ByteStringBuffer,
    ) {
        buf.append_ascii(ENTER_SCOPE);
        buf.append_str(prefix);
        buf.append_ascii(EXIT_SCOPE);
        match base {
            PrefixBase::Type(ty) => self.append_mangled_type_name(*ty, buf),
            PrefixBase::Method(method) => self.append_mangled_method_name(*method, buf),
            PrefixBase::Signature(sig) => self.append_signature_name(sig, buf),
        }
    }

    /// `<flags as decimal><R__A__B>`
    fn append_signature_name(&self, sig: &Signature, buf: &mut ByteStringBuffer) {
        buf.append_int(i64::from(sig.flags.bits()));
        buf.append_ascii(ENTER_SCOPE);
        self.append_mangled_type_name(sig.return_type, buf);
        for &param in &sig.params {
            buf.append(MEMBER_SEP);
            self.append_mangled_type_name(param, buf);
        }
        buf.append_ascii(EXIT_SCOPE);
    }

    /// Name of a metadata type, naming its whole module first if needed.
    fn metadata_type_name(&self, ty: TypeId, def: &MetadataType) -> ByteString {
        let module = self.types.module(def.module);
        {
            let mut state = self.state.lock();
            if state.named_modules.insert(def.module) {
                self.name_module_types(module, &mut state);
            }
            if let Some(name) = state.type_names.get(&ty) {
                return name.clone();
            }
        }

        // Not listed by its module: name it alone, without disambiguation.
        warn!(%ty, module = %module.assembly_name, "type missing from its module's type list");
        let mut buf = ByteStringBuffer::new();
        append_module_prefix(&module.assembly_name, &mut buf);
        self.append_nested_type_name(def, &mut buf);
        self.publish(buf.finalize(), |state| &mut state.type_names, ty)
    }

    /// Name every type of `module` in declaration order.
    #[tracing::instrument(level = "debug", skip_all, fields(module = %module.assembly_name))]
    fn name_module_types(&self, module: &ModuleDef, state: &mut ManglerState) {
        let mut buf = ByteStringBuffer::new();
        append_module_prefix(&module.assembly_name, &mut buf);
        let prefix_end = buf.len();
        let mut batch = Disambiguator::default();

        for &ty in &module.types {
            let Some(def) = self.types.type_kind(ty).as_metadata() else {
                continue;
            };

            if module.is_system {
                if let Some(short) = def.category.well_known_name() {
                    // Everything else carries the module prefix, so these
                    // cannot collide.
                    state
                        .type_names
                        .entry(ty)
                        .or_insert_with(|| ByteString::from_static(short.as_bytes()));
                    continue;
                }
            }

            self.append_nested_type_name(def, &mut buf);
            batch.disambiguate(&mut buf, prefix_end);
            state
                .type_names
                .entry(ty)
                .or_insert_with(|| buf.to_byte_string());
            buf.truncate(prefix_end);
        }

        debug!(
            types = module.types.len(),
            collisions = batch.collisions(),
            "named module types"
        );
    }

    /// `Outer_Ns_Inner` chain, outermost first.
    fn append_nested_type_name(&self, def: &MetadataType, buf: &mut ByteStringBuffer) {
        let mut chain: SmallVec<[&MetadataType; 4]> = SmallVec::new();
        let mut current = Some(def);
        while let Some(ty) = current {
            chain.push(ty);
            current = ty
                .enclosing
                .and_then(|outer| self.types.type_kind(outer).as_metadata());
        }

        for (i, ty) in chain.iter().rev().enumerate() {
            if i != 0 {
                buf.append_ascii('_');
            }
            append_sanitized_full_name(&ty.namespace, &ty.name, buf);
        }
    }

    // === Methods ===

    /// Mangled name of `method`: owning type, `__`, unqualified name.
    pub fn mangle_method(&self, method: MethodId) -> ByteString {
        if let Some(name) = self.cached(|state| state.method_names.get(&method)) {
            return name;
        }
        ensure_sufficient_stack(|| {
            let def = self.types.method(method);
            let mut buf = ByteStringBuffer::new();
            self.append_mangled_type_name(def.owning_type, &mut buf);
            buf.append(MEMBER_SEP);
            let unqualified = self.unqualified_method_name(method);
            buf.append_byte_string(&unqualified);
            self.publish(buf.finalize(), |state| &mut state.method_names, method)
        })
    }

    pub fn append_mangled_method_name(&self, method: MethodId, buf: &mut ByteStringBuffer) {
        let name = self.mangle_method(method);
        buf.append_byte_string(&name);
    }

    /// Name of `method` relative to its owning type.
    pub fn unqualified_method_name(&self, method: MethodId) -> ByteString {
        if let Some(name) = self.cached(|state| state.unqualified_method_names.get(&method)) {
            return name;
        }

        let def = self.types.method(method);
        let mut buf = ByteStringBuffer::new();
        match &def.kind {
            MethodKind::Metadata => return self.metadata_method_name(method, def),
            MethodKind::Instantiated { definition, args } => {
                let generic = self.unqualified_method_name(*definition);
                buf.append_byte_string(&generic);
                self.append_instantiation(args, &mut buf);
            }
            MethodKind::OnInstantiatedType { typical } => {
                let typical = self.unqualified_method_name(*typical);
                buf.append_byte_string(&typical);
            }
            MethodKind::PrefixMangled { prefix, base } => {
                self.append_prefix_mangled_name(prefix, base, &mut buf);
            }
            MethodKind::Synthetic => append_sanitized(&def.name, &mut buf),
        }
        self.publish(
            buf.finalize(),
            |state| &mut state.unqualified_method_names,
            method,
        )
    }

    /// Unqualified name of a metadata method, naming all methods declared on
    /// its owning type first if needed.
    fn metadata_method_name(&self, method: MethodId, def: &MethodDef) -> ByteString {
        let owner = def.owning_type;
        let mut state = self.state.lock();
        if state.named_method_batches.insert(owner) {
            if let Some(owner_def) = self.types.type_kind(owner).as_metadata() {
                self.name_declared_methods(owner, &owner_def.methods, &mut state);
            }
        }
        if let Some(name) = state.unqualified_method_names.get(&method) {
            return name.clone();
        }

        warn!(%method, %owner, "method missing from its owner's method list");
        state
            .unqualified_method_names
            .entry(method)
            .or_insert_with(|| sanitize(&def.name))
            .clone()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(owner = %owner))]
    fn name_declared_methods(
        &self,
        owner: TypeId,
        methods: &[MethodId],
        state: &mut ManglerState,
    ) {
        let mut buf = ByteStringBuffer::new();
        let mut batch = Disambiguator::default();

        for &method in methods {
            append_sanitized(&self.types.method(method).name, &mut buf);
            batch.disambiguate(&mut buf, 0);
            state
                .unqualified_method_names
                .entry(method)
                .or_insert_with(|| buf.to_byte_string());
            buf.clear();
        }

        debug!(
            methods = methods.len(),
            collisions = batch.collisions(),
            "named declared methods"
        );
    }

    // === Fields ===

    /// Mangled name of `field`: owning type, `__`, unqualified name.
    pub fn mangle_field(&self, field: FieldId) -> ByteString {
        if let Some(name) = self.cached(|state| state.field_names.get(&field)) {
            return name;
        }
        ensure_sufficient_stack(|| {
            let def = self.types.field(field);
            let mut buf = ByteStringBuffer::new();
            self.append_mangled_type_name(def.owning_type, &mut buf);
            buf.append(MEMBER_SEP);
            let unqualified = self.unqualified_field_name(field);
            buf.append_byte_string(&unqualified);
            self.publish(buf.finalize(), |state| &mut state.field_names, field)
        })
    }

    pub fn append_mangled_field_name(&self, field: FieldId, buf: &mut ByteStringBuffer) {
        let name = self.mangle_field(field);
        buf.append_byte_string(&name);
    }

    /// Name of `field` relative to its owning type.
    ///
    /// A field seen on an instantiated generic type reuses the name of the
    /// same field on the open definition, suffix included.
    pub fn unqualified_field_name(&self, field: FieldId) -> ByteString {
        if let Some(name) = self.cached(|state| state.unqualified_field_names.get(&field)) {
            return name;
        }

        let def = self.types.field(field);
        let name = match def.kind {
            FieldKind::Metadata => return self.metadata_field_name(field, def),
            FieldKind::OnInstantiatedType { typical } => self.unqualified_field_name(typical),
            FieldKind::Synthetic => sanitize(&def.name),
        };
        self.publish(name, |state| &mut state.unqualified_field_names, field)
    }

    /// Unqualified name of a metadata field, naming all fields declared on
    /// its owning type first if needed.
    fn metadata_field_name(&self, field: FieldId, def: &FieldDef) -> ByteString {
        let owner = def.owning_type;
        let mut state = self.state.lock();
        if state.named_field_batches.insert(owner) {
            if let Some(owner_def) = self.types.type_kind(owner).as_metadata() {
                self.name_declared_fields(owner, &owner_def.fields, &mut state);
            }
        }
        if let Some(name) = state.unqualified_field_names.get(&field) {
            return name.clone();
        }

        warn!(%field, %owner, "field missing from its owner's field list");
        state
            .unqualified_field_names
            .entry(field)
            .or_insert_with(|| sanitize(&def.name))
            .clone()
    }

    #[tracing::instrument(level = "debug", skip_all, fields(owner = %owner))]
    fn name_declared_fields(&self, owner: TypeId, fields: &[FieldId], state: &mut ManglerState) {
        let mut buf = ByteStringBuffer::new();
        let mut batch = Disambiguator::default();

        for &field in fields {
            append_sanitized(&self.types.field(field).name, &mut buf);
            batch.disambiguate(&mut buf, 0);
            state
                .unqualified_field_names
                .entry(field)
                .or_insert_with(|| buf.to_byte_string());
            buf.clear();
        }

        debug!(
            fields = fields.len(),
            collisions = batch.collisions(),
            "named declared fields"
        );
    }

    // === String literals ===

    /// Mangled name of a string literal, cached by its text.
    pub fn mangle_string_literal(&self, literal: &str) -> ByteString {
        if let Some(name) = self.cached(|state| state.string_literals.get(literal)) {
            return name;
        }
        let name = sanitize_with_hash(literal);
        self.state
            .lock()
            .string_literals
            .entry(Box::from(literal))
            .or_insert(name)
            .clone()
    }

    pub fn append_mangled_string_literal(&self, literal: &str, buf: &mut ByteStringBuffer) {
        let name = self.mangle_string_literal(literal);
        buf.append_byte_string(&name);
    }

    // === Cache access ===

    fn cached(
        &self,
        lookup: impl FnOnce(&ManglerState) -> Option<&ByteString>,
    ) -> Option<ByteString> {
        let state = self.state.lock();
        lookup(&*state).cloned()
    }

    /// Insert `name` unless another worker got there first; return the
    /// stored name either way.
    fn publish<K: std::hash::Hash + Eq>(
        &self,
        name: ByteString,
        cache: impl FnOnce(&mut ManglerState) -> &mut FxHashMap<K, ByteString>,
        key: K,
    ) -> ByteString {
        let mut state = self.state.lock();
        let stored = cache(&mut *state).entry(key).or_insert(name);
        stored.clone()
    }
}

/// `Ns_Name`, or just `Name` in the global namespace.
fn append_sanitized_full_name(namespace: &str, name: &str, buf: &mut ByteStringBuffer) {
    if !namespace.is_empty() {
        append_sanitized(namespace, buf);
        buf.append_ascii('_');
    }
    append_sanitized(name, buf);
}

/// Module prefix: hash-guarded assembly name plus `_`, with the runtime's
/// `System.Private.` libraries abbreviated to `S_P_`.
fn append_module_prefix(assembly_name: &str, buf: &mut ByteStringBuffer) {
    let name = match assembly_name.strip_prefix(SYSTEM_PRIVATE_PREFIX) {
        Some(rest) => {
            buf.append(SYSTEM_PRIVATE_ABBREVIATION);
            rest
        }
        None => assembly_name,
    };
    append_sanitized_with_hash(name, buf);
    buf.append_ascii('_');
}

impl std::fmt::Debug for NameMangler<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("NameMangler")
            .field("strategy", &self.strategy)
            .field("compilation_unit_prefix", &self.compilation_unit_prefix)
            .field("types", &state.type_names.len())
            .field("methods", &state.method_names.len())
            .field("fields", &state.field_names.len())
            .field("string_literals", &state.string_literals.len())
            .finish_non_exhaustive()
    }
}
