//! Type registry: class hierarchy, arrays and descriptors.
//!
//! Types are keyed by [`Type`] (the hash of the internal name). Lookups by
//! source name go through an alias table (`int`, `String`, `Counter`) or
//! through the dotted qualified form (`java.lang.String`).

use rustc_hash::{FxHashMap, FxHashSet};

use crate::Type;

// ============================================================================
// Entries
// ============================================================================

/// What kind of type an entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeKind {
    Primitive,
    /// The type of `null`.
    Null,
    /// Error-recovery placeholder.
    Any,
    Class,
    Interface,
    Array { element: Type },
}

/// Registered information about one type.
#[derive(Debug, Clone)]
pub struct TypeEntry {
    /// Internal (slash-separated) name, or the descriptor for arrays.
    pub internal_name: String,
    pub kind: TypeKind,
    pub superclass: Option<Type>,
    pub interfaces: Vec<Type>,
}

// ============================================================================
// TypeRegistry
// ============================================================================

/// Built-in classes as (internal name, superclass, simple-name alias).
const BUILTIN_CLASSES: &[(&str, Option<&str>, bool)] = &[
    ("java/lang/Object", None, true),
    ("java/lang/String", Some("java/lang/Object"), true),
    ("java/lang/StringBuilder", Some("java/lang/Object"), true),
    ("java/lang/Throwable", Some("java/lang/Object"), true),
    ("java/lang/Exception", Some("java/lang/Throwable"), true),
    ("java/lang/Error", Some("java/lang/Throwable"), true),
    ("java/lang/RuntimeException", Some("java/lang/Exception"), true),
    (
        "java/lang/IllegalArgumentException",
        Some("java/lang/RuntimeException"),
        true,
    ),
    (
        "java/lang/IllegalStateException",
        Some("java/lang/RuntimeException"),
        true,
    ),
    (
        "java/lang/ArithmeticException",
        Some("java/lang/RuntimeException"),
        true,
    ),
    ("java/io/IOException", Some("java/lang/Exception"), false),
];

/// All known types of a compilation.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: FxHashMap<Type, TypeEntry>,
    aliases: FxHashMap<String, Type>,
}

impl TypeRegistry {
    /// Create an empty registry with no types at all.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the primitives, `null`, and the
    /// `java.lang` classes the compiler itself relies on.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        for ty in Type::PRIMITIVES {
            if let Some(name) = ty.primitive_name() {
                registry.insert(ty, name, TypeKind::Primitive, None);
                registry.aliases.insert(name.to_string(), ty);
            }
        }
        registry.insert(Type::NULL, "<null>", TypeKind::Null, None);
        registry.insert(Type::ANY, "<any>", TypeKind::Any, None);

        for (name, superclass, alias) in BUILTIN_CLASSES {
            let ty = registry.register_class(name, TypeKind::Class, superclass.map(Type::named), Vec::new());
            if *alias {
                registry.add_alias(simple_name(name), ty);
            }
        }

        registry
    }

    fn insert(&mut self, ty: Type, name: &str, kind: TypeKind, superclass: Option<Type>) {
        self.types.insert(
            ty,
            TypeEntry {
                internal_name: name.to_string(),
                kind,
                superclass,
                interfaces: Vec::new(),
            },
        );
    }

    // ==========================================================================
    // Registration
    // ==========================================================================

    /// Register (or overwrite) a class or interface by internal name.
    pub fn register_class(
        &mut self,
        internal_name: &str,
        kind: TypeKind,
        superclass: Option<Type>,
        interfaces: Vec<Type>,
    ) -> Type {
        let ty = Type::named(internal_name);
        self.types.insert(
            ty,
            TypeEntry {
                internal_name: internal_name.to_string(),
                kind,
                superclass,
                interfaces,
            },
        );
        ty
    }

    /// Replace the supertypes of a registered type.
    ///
    /// Used once all classes of a unit are declared, so superclasses can be
    /// forward references.
    pub fn set_supertypes(&mut self, ty: Type, superclass: Option<Type>, interfaces: Vec<Type>) {
        if let Some(entry) = self.types.get_mut(&ty) {
            entry.superclass = superclass;
            entry.interfaces = interfaces;
        }
    }

    /// Make `ty` reachable by a simple name.
    pub fn add_alias(&mut self, name: &str, ty: Type) {
        self.aliases.insert(name.to_string(), ty);
    }

    /// Handle a single-type import such as `java.io.IOException`.
    ///
    /// Returns the imported type, or `None` if the class is not known.
    pub fn import(&mut self, qualified_name: &str) -> Option<Type> {
        let ty = self.lookup_qualified(qualified_name)?;
        self.add_alias(simple_name(qualified_name), ty);
        Some(ty)
    }

    /// The array type with the given element type, registering it on first use.
    pub fn array_of(&mut self, element: Type) -> Type {
        let internal_name = format!("[{}", self.descriptor(element));
        let ty = Type::named(&internal_name);
        self.types.entry(ty).or_insert_with(|| TypeEntry {
            internal_name,
            kind: TypeKind::Array { element },
            superclass: Some(Type::OBJECT),
            interfaces: Vec::new(),
        });
        ty
    }

    // ==========================================================================
    // Lookup
    // ==========================================================================

    pub fn contains(&self, ty: Type) -> bool {
        self.types.contains_key(&ty)
    }

    pub fn get(&self, ty: Type) -> Option<&TypeEntry> {
        self.types.get(&ty)
    }

    pub fn kind(&self, ty: Type) -> Option<TypeKind> {
        self.get(ty).map(|entry| entry.kind)
    }

    /// Resolve a source-level name: keyword, alias, or dotted qualified name.
    pub fn lookup(&self, name: &str) -> Option<Type> {
        if let Some(ty) = self.aliases.get(name) {
            return Some(*ty);
        }
        if name.contains('.') {
            return self.lookup_qualified(name);
        }
        None
    }

    fn lookup_qualified(&self, qualified_name: &str) -> Option<Type> {
        let ty = Type::named(&qualified_name.replace('.', "/"));
        self.contains(ty).then_some(ty)
    }

    pub fn element_type(&self, ty: Type) -> Option<Type> {
        match self.kind(ty)? {
            TypeKind::Array { element } => Some(element),
            _ => None,
        }
    }

    pub fn is_array(&self, ty: Type) -> bool {
        self.element_type(ty).is_some()
    }

    pub fn is_interface(&self, ty: Type) -> bool {
        self.kind(ty) == Some(TypeKind::Interface)
    }

    pub fn superclass(&self, ty: Type) -> Option<Type> {
        self.get(ty).and_then(|entry| entry.superclass)
    }

    // ==========================================================================
    // Names and descriptors
    // ==========================================================================

    /// Internal name (`java/lang/String`), as used in member references.
    pub fn internal_name(&self, ty: Type) -> &str {
        self.get(ty)
            .map(|entry| entry.internal_name.as_str())
            .unwrap_or("java/lang/Object")
    }

    /// Human-readable name for error messages (`java.lang.String`, `int[]`).
    pub fn display_name(&self, ty: Type) -> String {
        if let Some(name) = ty.primitive_name() {
            return name.to_string();
        }
        match self.get(ty) {
            Some(TypeEntry {
                kind: TypeKind::Array { element },
                ..
            }) => format!("{}[]", self.display_name(*element)),
            Some(TypeEntry {
                kind: TypeKind::Null,
                ..
            }) => "null".to_string(),
            Some(TypeEntry {
                kind: TypeKind::Any,
                ..
            }) => "<any>".to_string(),
            Some(entry) => entry.internal_name.replace('/', "."),
            None => format!("<unknown {}>", ty.hash()),
        }
    }

    /// Field descriptor of a type.
    pub fn descriptor(&self, ty: Type) -> String {
        if let Some(desc) = ty.primitive_descriptor() {
            return desc.to_string();
        }
        match self.get(ty) {
            Some(entry) => match entry.kind {
                TypeKind::Array { .. } => entry.internal_name.clone(),
                TypeKind::Class | TypeKind::Interface => format!("L{};", entry.internal_name),
                _ => "Ljava/lang/Object;".to_string(),
            },
            None => "Ljava/lang/Object;".to_string(),
        }
    }

    /// Method descriptor `(params)ret`.
    pub fn method_descriptor(&self, params: &[Type], return_type: Type) -> String {
        let mut descriptor = String::from("(");
        for param in params {
            descriptor.push_str(&self.descriptor(*param));
        }
        descriptor.push(')');
        descriptor.push_str(&self.descriptor(return_type));
        descriptor
    }

    // ==========================================================================
    // Assignability
    // ==========================================================================

    /// Can a value of type `source` be stored where `target` is expected?
    ///
    /// Identity, `null` to any reference, any reference to `Object`, and
    /// widening along superclass/interface chains. Primitives only match
    /// themselves.
    pub fn is_assignable_from(&self, target: Type, source: Type) -> bool {
        if target == source || target == Type::ANY || source == Type::ANY {
            return true;
        }
        if source == Type::NULL {
            return target.is_reference();
        }
        if target.is_primitive() || source.is_primitive() {
            return false;
        }
        if target == Type::OBJECT {
            return true;
        }
        if let (Some(target_elem), Some(source_elem)) =
            (self.element_type(target), self.element_type(source))
        {
            return target_elem == source_elem
                || (target_elem.is_reference()
                    && source_elem.is_reference()
                    && self.is_assignable_from(target_elem, source_elem));
        }

        let mut visited = FxHashSet::default();
        let mut pending = vec![source];
        while let Some(ty) = pending.pop() {
            if ty == target {
                return true;
            }
            if !visited.insert(ty) {
                continue;
            }
            if let Some(entry) = self.get(ty) {
                pending.extend(entry.superclass);
                pending.extend(entry.interfaces.iter().copied());
            }
        }
        false
    }
}

/// Last component of an internal or dotted name.
fn simple_name(name: &str) -> &str {
    name.rsplit(['/', '.']).next().unwrap_or(name)
}
