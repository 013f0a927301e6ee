//! Resolution of source type names to registered types.
//!
//! [`TypeResolver`] turns a [`TypeName`] (`int`, `String[]`,
//! `java.io.IOException`) into a [`Type`], interning array types on first
//! use.
//!
//! ## Example
//!
//! ```ignore
//! let mut resolver = TypeResolver::new(&mut registry);
//! let ty = resolver.resolve(&TypeName::array("int", 2, 1))?;
//! assert_eq!(registry.display_name(ty), "int[][]");
//! ```

use jlite_ast::TypeName;
use jlite_core::{CompilationError, Type, TypeRegistry};

pub struct TypeResolver<'a> {
    registry: &'a mut TypeRegistry,
}

impl<'a> TypeResolver<'a> {
    pub fn new(registry: &'a mut TypeRegistry) -> Self {
        Self { registry }
    }

    /// Resolve a type name, including its array dimensions.
    pub fn resolve(&mut self, name: &TypeName) -> Result<Type, CompilationError> {
        let base = self
            .registry
            .lookup(&name.name)
            .ok_or_else(|| CompilationError::UnknownType {
                name: name.name.clone(),
                line: name.line,
            })?;

        if name.dims > 0 && base == Type::VOID {
            return Err(CompilationError::type_mismatch(
                "array element type cannot be void",
                name.line,
            ));
        }

        let mut ty = base;
        for _ in 0..name.dims {
            ty = self.registry.array_of(ty);
        }
        Ok(ty)
    }

    /// Resolve a type that values can have (anything but `void`).
    pub fn resolve_value_type(&mut self, name: &TypeName) -> Result<Type, CompilationError> {
        let ty = self.resolve(name)?;
        if ty == Type::VOID {
            return Err(CompilationError::type_mismatch(
                "'void' is not a valid type here",
                name.line,
            ));
        }
        Ok(ty)
    }
}
