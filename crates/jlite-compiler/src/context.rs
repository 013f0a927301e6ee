//! Class-level compilation context.
//!
//! A [`UnitContext`] holds one [`ClassContext`] per class or interface of
//! the unit being compiled. Registration fills in fields and method
//! signatures before any body is analyzed, so member lookups made while
//! analyzing a body see every sibling regardless of declaration order.

use jlite_ast::{ClassKind, FieldRef, MethodRef};
use jlite_core::{CompilationError, Modifiers, Type, TypeHash, TypeRegistry};
use rustc_hash::{FxHashMap, FxHashSet};

// ============================================================================
// Members
// ============================================================================

#[derive(Debug, Clone)]
pub struct FieldEntry {
    pub name: String,
    pub ty: Type,
    pub mods: Modifiers,
    pub line: u32,
}

/// A method signature registered by the stub pass.
#[derive(Debug, Clone)]
pub struct MethodEntry {
    pub name: String,
    pub params: Vec<Type>,
    pub return_type: Type,
    pub exceptions: Vec<Type>,
    pub mods: Modifiers,
    pub descriptor: String,
    pub line: u32,
}

impl MethodEntry {
    pub fn is_static(&self) -> bool {
        self.mods.is_static()
    }
}

// ============================================================================
// ClassContext
// ============================================================================

#[derive(Debug, Clone)]
pub struct ClassContext {
    pub ty: Type,
    /// Simple source name (`Counter`).
    pub name: String,
    /// Internal name (`demo/Counter`).
    pub internal_name: String,
    pub kind: ClassKind,
    pub mods: Modifiers,
    pub superclass: Type,
    pub interfaces: Vec<Type>,
    fields: Vec<FieldEntry>,
    methods: Vec<MethodEntry>,
    method_keys: FxHashSet<TypeHash>,
}

impl ClassContext {
    pub fn new(ty: Type, name: impl Into<String>, internal_name: impl Into<String>, kind: ClassKind, mods: Modifiers) -> Self {
        Self {
            ty,
            name: name.into(),
            internal_name: internal_name.into(),
            kind,
            mods,
            superclass: Type::OBJECT,
            interfaces: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            method_keys: FxHashSet::default(),
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    /// Add a field, rejecting a second field of the same name.
    pub fn add_field(&mut self, field: FieldEntry) -> Result<(), CompilationError> {
        if self.field(&field.name).is_some() {
            return Err(CompilationError::DuplicateDefinition {
                kind: "field",
                name: field.name,
                line: field.line,
            });
        }
        self.fields.push(field);
        Ok(())
    }

    /// Add a method, rejecting a second method with the same descriptor.
    pub fn add_method(&mut self, method: MethodEntry) -> Result<(), CompilationError> {
        let key = TypeHash::from_method(self.ty.hash(), &method.name, &method.descriptor);
        if !self.method_keys.insert(key) {
            return Err(CompilationError::DuplicateDefinition {
                kind: "method",
                name: format!("{}{}", method.name, method.descriptor),
                line: method.line,
            });
        }
        self.methods.push(method);
        Ok(())
    }

    pub fn field(&self, name: &str) -> Option<&FieldEntry> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn fields(&self) -> &[FieldEntry] {
        &self.fields
    }

    pub fn methods(&self) -> &[MethodEntry] {
        &self.methods
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodEntry> + 'a {
        self.methods.iter().filter(move |m| m.name == name)
    }

    pub fn has_method(&self, name: &str, descriptor: &str) -> bool {
        self.method_keys
            .contains(&TypeHash::from_method(self.ty.hash(), name, descriptor))
    }
}

// ============================================================================
// UnitContext
// ============================================================================

/// All classes declared by one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct UnitContext {
    pub package: Option<String>,
    classes: Vec<ClassContext>,
    by_type: FxHashMap<Type, usize>,
}

impl UnitContext {
    pub fn new(package: Option<String>) -> Self {
        Self {
            package,
            ..Self::default()
        }
    }

    pub fn add_class(&mut self, class: ClassContext) {
        self.by_type.insert(class.ty, self.classes.len());
        self.classes.push(class);
    }

    pub fn class(&self, ty: Type) -> Option<&ClassContext> {
        self.by_type.get(&ty).map(|&idx| &self.classes[idx])
    }

    pub fn class_mut(&mut self, ty: Type) -> Option<&mut ClassContext> {
        self.by_type.get(&ty).map(|&idx| &mut self.classes[idx])
    }

    pub fn classes(&self) -> &[ClassContext] {
        &self.classes
    }

    /// Classes of this unit that `ty` inherits from, `ty` first.
    ///
    /// Classes outside the unit contribute no members.
    fn hierarchy(&self, registry: &TypeRegistry, ty: Type) -> Vec<&ClassContext> {
        let mut seen = FxHashSet::default();
        let mut pending = vec![ty];
        let mut chain = Vec::new();
        while let Some(current) = pending.pop() {
            if !seen.insert(current) {
                continue;
            }
            if let Some(class) = self.class(current) {
                chain.push(class);
            }
            if let Some(entry) = registry.get(current) {
                pending.extend(entry.interfaces.iter().rev().copied());
                pending.extend(entry.superclass);
            }
        }
        chain
    }

    /// Resolve field `name` on `ty` or one of its supertypes.
    pub fn lookup_field(&self, registry: &TypeRegistry, ty: Type, name: &str) -> Option<FieldRef> {
        self.hierarchy(registry, ty).into_iter().find_map(|class| {
            class.field(name).map(|field| FieldRef {
                owner: class.ty,
                ty: field.ty,
                is_static: field.mods.is_static(),
            })
        })
    }

    /// Resolve a call of `name` with argument types `args` on `ty`.
    ///
    /// The first method (nearest class first) whose arity matches and whose
    /// parameters accept every argument wins; an exact signature match is
    /// preferred over one needing reference widening.
    pub fn lookup_method(&self, registry: &TypeRegistry, ty: Type, name: &str, args: &[Type]) -> Option<MethodRef> {
        let chain = self.hierarchy(registry, ty);
        let candidates = || {
            chain.iter().flat_map(|class| {
                class
                    .methods_named(name)
                    .filter(|m| m.params.len() == args.len())
                    .map(move |m| (*class, m))
            })
        };
        let exact = candidates().find(|(_, m)| {
            m.params.iter().zip(args).all(|(param, arg)| arg.matches_expected(*param))
        });
        let (class, method) = exact.or_else(|| {
            candidates().find(|(_, m)| {
                m.params
                    .iter()
                    .zip(args)
                    .all(|(param, arg)| registry.is_assignable_from(*param, *arg))
            })
        })?;
        Some(MethodRef {
            owner: class.ty,
            descriptor: method.descriptor.clone(),
            return_type: method.return_type,
            is_static: method.is_static(),
            is_private: method.mods.contains(Modifiers::PRIVATE),
            owner_is_interface: class.is_interface(),
        })
    }
}
