//! In-memory type system.
//!
//! `TypePool` stores every entity in a flat vector indexed by its handle.
//! Metadata entities are appended in declaration order, which is the order
//! name disambiguation walks. Constructed types and method instantiations are
//! interned, so building `int[]` twice yields one `TypeId`.

use rustc_hash::FxHashMap;

use crate::{
    CallingConvention, FieldDef, FieldId, FieldKind, MetadataType, MethodDef, MethodFlags,
    MethodId, MethodKind, ModuleDef, ModuleId, PrefixBase, Signature, TypeCategory, TypeId,
    TypeKind, TypeSystem,
};

/// Arena of modules, types, methods, and fields.
#[derive(Debug, Default)]
pub struct TypePool {
    modules: Vec<ModuleDef>,
    types: Vec<TypeKind>,
    methods: Vec<MethodDef>,
    fields: Vec<FieldDef>,
    /// Constructed type kind -> its identity.
    constructed: FxHashMap<TypeKind, TypeId>,
    /// (owning type, kind) -> identity, for instantiated methods.
    constructed_methods: FxHashMap<(TypeId, MethodKind), MethodId>,
    /// (instantiated type, typical field) -> identity.
    constructed_fields: FxHashMap<(TypeId, FieldId), FieldId>,
}

/// Next index of a vector, as a handle.
///
/// # Panics
/// Panics if the vector already holds `u32::MAX` entries.
fn next_index<T>(items: &[T], what: &str) -> u32 {
    u32::try_from(items.len()).unwrap_or_else(|_| panic!("too many {what} for a 32-bit handle"))
}

impl TypePool {
    pub fn new() -> Self {
        Self::default()
    }

    // === Modules ===

    /// Add an ordinary module.
    pub fn add_module(&mut self, assembly_name: &str) -> ModuleId {
        self.push_module(assembly_name, false)
    }

    /// Add the runtime's foundational module, whose primitives get short names.
    pub fn add_system_module(&mut self, assembly_name: &str) -> ModuleId {
        self.push_module(assembly_name, true)
    }

    fn push_module(&mut self, assembly_name: &str, is_system: bool) -> ModuleId {
        let id = ModuleId::from_raw(next_index(&self.modules, "modules"));
        self.modules.push(ModuleDef {
            assembly_name: assembly_name.to_owned(),
            is_system,
            types: Vec::new(),
        });
        id
    }

    // === Metadata types ===

    /// Add a top-level metadata type to `module`.
    pub fn add_type(
        &mut self,
        module: ModuleId,
        namespace: &str,
        name: &str,
        category: TypeCategory,
    ) -> TypeId {
        self.push_metadata_type(module, namespace, name, None, category)
    }

    /// Add a type nested inside `enclosing`, in the same module.
    ///
    /// # Panics
    /// Panics if `enclosing` is not a metadata type of this pool.
    pub fn add_nested_type(
        &mut self,
        enclosing: TypeId,
        name: &str,
        category: TypeCategory,
    ) -> TypeId {
        let module = self.metadata(enclosing).module;
        self.push_metadata_type(module, "", name, Some(enclosing), category)
    }

    fn push_metadata_type(
        &mut self,
        module: ModuleId,
        namespace: &str,
        name: &str,
        enclosing: Option<TypeId>,
        category: TypeCategory,
    ) -> TypeId {
        let id = TypeId::from_raw(next_index(&self.types, "types"));
        self.types.push(TypeKind::Metadata(MetadataType {
            module,
            namespace: namespace.to_owned(),
            name: name.to_owned(),
            enclosing,
            category,
            methods: Vec::new(),
            fields: Vec::new(),
            instance_size: None,
        }));
        self.modules[module.index()].types.push(id);
        id
    }

    /// Record the unboxed size of a value type.
    pub fn set_instance_size(&mut self, ty: TypeId, size: u32) {
        self.metadata_mut(ty).instance_size = Some(size);
    }

    // === Methods ===

    /// Declare a method on a metadata type.
    ///
    /// # Panics
    /// Panics if `owning_type` is not a metadata type of this pool.
    pub fn add_method(
        &mut self,
        owning_type: TypeId,
        name: &str,
        signature: Signature,
    ) -> MethodId {
        let id = self.push_method(owning_type, name, MethodKind::Metadata, signature);
        self.metadata_mut(owning_type).methods.push(id);
        id
    }

    /// Mark a method as callable across the managed/native boundary.
    ///
    /// # Panics
    /// Panics if `convention` is given but `flags` marks the method neither
    /// platform-invoke nor unmanaged-callers-only: such a convention would
    /// never be used.
    pub fn set_unmanaged(
        &mut self,
        method: MethodId,
        flags: MethodFlags,
        convention: Option<CallingConvention>,
    ) {
        assert!(
            convention.is_none()
                || flags.intersects(MethodFlags::PINVOKE | MethodFlags::UNMANAGED_CALLERS_ONLY),
            "{method}: calling convention {convention:?} without an unmanaged entry flag"
        );
        let def = &mut self.methods[method.index()];
        def.flags |= flags;
        def.unmanaged_convention = convention;
    }

    /// Close a generic method definition over `args`.
    pub fn instantiate_method(&mut self, definition: MethodId, args: &[TypeId]) -> MethodId {
        let def = &self.methods[definition.index()];
        let owning_type = def.owning_type;
        let name = def.name.clone();
        let signature = def.signature.clone();
        let kind = MethodKind::Instantiated {
            definition,
            args: args.iter().copied().collect(),
        };
        self.intern_method(owning_type, &name, kind, signature)
    }

    /// The method `typical` as seen on the instantiated type `instantiated`.
    pub fn method_on_instantiated_type(
        &mut self,
        instantiated: TypeId,
        typical: MethodId,
    ) -> MethodId {
        let def = &self.methods[typical.index()];
        let name = def.name.clone();
        let signature = def.signature.clone();
        let kind = MethodKind::OnInstantiatedType { typical };
        self.intern_method(instantiated, &name, kind, signature)
    }

    /// A compiler-generated method with a name unique by construction.
    pub fn synthetic_method(
        &mut self,
        owning_type: TypeId,
        name: &str,
        signature: Signature,
    ) -> MethodId {
        self.push_method(owning_type, name, MethodKind::Synthetic, signature)
    }

    /// A stub method named `<prefix>` followed by the name of `base`.
    pub fn prefix_mangled_method(
        &mut self,
        owning_type: TypeId,
        prefix: &str,
        base: PrefixBase,
        signature: Signature,
    ) -> MethodId {
        let kind = MethodKind::PrefixMangled {
            prefix: prefix.to_owned(),
            base,
        };
        self.intern_method(owning_type, prefix, kind, signature)
    }

    fn intern_method(
        &mut self,
        owning_type: TypeId,
        name: &str,
        kind: MethodKind,
        signature: Signature,
    ) -> MethodId {
        let key = (owning_type, kind);
        if let Some(&id) = self.constructed_methods.get(&key) {
            return id;
        }
        let id = self.push_method(owning_type, name, key.1.clone(), signature);
        self.constructed_methods.insert(key, id);
        id
    }

    fn push_method(
        &mut self,
        owning_type: TypeId,
        name: &str,
        kind: MethodKind,
        signature: Signature,
    ) -> MethodId {
        let id = MethodId::from_raw(next_index(&self.methods, "methods"));
        self.methods.push(MethodDef {
            owning_type,
            name: name.to_owned(),
            kind,
            signature,
            flags: MethodFlags::empty(),
            unmanaged_convention: None,
        });
        id
    }

    // === Fields ===

    /// Declare a field on a metadata type.
    ///
    /// # Panics
    /// Panics if `owning_type` is not a metadata type of this pool.
    pub fn add_field(&mut self, owning_type: TypeId, name: &str) -> FieldId {
        let id = self.push_field(owning_type, name, FieldKind::Metadata);
        self.metadata_mut(owning_type).fields.push(id);
        id
    }

    /// The field `typical` as seen on the instantiated type `instantiated`.
    pub fn field_on_instantiated_type(
        &mut self,
        instantiated: TypeId,
        typical: FieldId,
    ) -> FieldId {
        let key = (instantiated, typical);
        if let Some(&id) = self.constructed_fields.get(&key) {
            return id;
        }
        let name = self.fields[typical.index()].name.clone();
        let kind = FieldKind::OnInstantiatedType { typical };
        let id = self.push_field(instantiated, &name, kind);
        self.constructed_fields.insert(key, id);
        id
    }

    /// A compiler-generated field with a name unique by construction.
    pub fn add_synthetic_field(&mut self, owning_type: TypeId, name: &str) -> FieldId {
        self.push_field(owning_type, name, FieldKind::Synthetic)
    }

    fn push_field(&mut self, owning_type: TypeId, name: &str, kind: FieldKind) -> FieldId {
        let id = FieldId::from_raw(next_index(&self.fields, "fields"));
        self.fields.push(FieldDef {
            owning_type,
            name: name.to_owned(),
            kind,
        });
        id
    }

    // === Constructed types ===

    /// `element[]`.
    pub fn sz_array(&mut self, element: TypeId) -> TypeId {
        self.intern(TypeKind::SzArray { element })
    }

    /// `element[,,]` with `rank` dimensions.
    pub fn md_array(&mut self, element: TypeId, rank: u32) -> TypeId {
        self.intern(TypeKind::MdArray { element, rank })
    }

    /// `ref referent`.
    pub fn by_ref(&mut self, referent: TypeId) -> TypeId {
        self.intern(TypeKind::ByRef { referent })
    }

    /// `referent*`.
    pub fn pointer(&mut self, referent: TypeId) -> TypeId {
        self.intern(TypeKind::Pointer { referent })
    }

    pub fn function_pointer(&mut self, signature: Signature) -> TypeId {
        self.intern(TypeKind::FunctionPointer(signature))
    }

    /// Close a generic type definition over `args`.
    pub fn instantiate(&mut self, definition: TypeId, args: &[TypeId]) -> TypeId {
        self.intern(TypeKind::Instantiated {
            definition,
            args: args.iter().copied().collect(),
        })
    }

    pub fn synthetic_type(&mut self, namespace: &str, name: &str) -> TypeId {
        self.intern(TypeKind::Synthetic {
            namespace: namespace.to_owned(),
            name: name.to_owned(),
        })
    }

    pub fn prefix_mangled_type(&mut self, prefix: &str, base: PrefixBase) -> TypeId {
        self.intern(TypeKind::PrefixMangled {
            prefix: prefix.to_owned(),
            base,
        })
    }

    fn intern(&mut self, kind: TypeKind) -> TypeId {
        if let Some(&id) = self.constructed.get(&kind) {
            return id;
        }
        let id = TypeId::from_raw(next_index(&self.types, "types"));
        self.types.push(kind.clone());
        self.constructed.insert(kind, id);
        id
    }

    // === Lookup helpers ===

    /// Number of types, metadata and constructed.
    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// The metadata definition of `ty`.
    ///
    /// # Panics
    /// Panics if `ty` is a constructed type.
    pub fn metadata(&self, ty: TypeId) -> &MetadataType {
        match &self.types[ty.index()] {
            TypeKind::Metadata(def) => def,
            other => panic!("{ty} is not a metadata type: {other:?}"),
        }
    }

    fn metadata_mut(&mut self, ty: TypeId) -> &mut MetadataType {
        match &mut self.types[ty.index()] {
            TypeKind::Metadata(def) => def,
            other => panic!("{ty} is not a metadata type: {other:?}"),
        }
    }
}

impl TypeSystem for TypePool {
    fn module(&self, id: ModuleId) -> &ModuleDef {
        &self.modules[id.index()]
    }

    fn type_kind(&self, ty: TypeId) -> &TypeKind {
        &self.types[ty.index()]
    }

    fn method(&self, id: MethodId) -> &MethodDef {
        &self.methods[id.index()]
    }

    fn field(&self, id: FieldId) -> &FieldDef {
        &self.fields[id.index()]
    }
}
