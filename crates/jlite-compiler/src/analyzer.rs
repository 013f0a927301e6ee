//! Semantic analysis of method bodies.
//!
//! An [`Analyzer`] walks statements and expressions bottom-up, binding
//! names, assigning types and rewriting subtrees (for example `+` on a
//! `String` becomes a concatenation node). Analysis takes each node by
//! value and returns the analyzed replacement, so a rewritten subtree
//! simply takes the place of the old one.
//!
//! Errors go to the [`Diagnostics`] sink and never stop the walk: the
//! offending node comes back with no type (or the `ANY` placeholder for
//! unresolved names) and its parent carries on.

use jlite_ast::{Expr, TypeName};
use jlite_core::{CompilationError, Diagnostics, Type, TypeRegistry};

use crate::context::UnitContext;
use crate::scope::MethodContext;
use crate::type_resolver::TypeResolver;

pub struct Analyzer<'a> {
    pub(crate) registry: &'a mut TypeRegistry,
    pub(crate) unit: &'a UnitContext,
    /// The class whose members are being analyzed.
    pub(crate) class: Type,
    pub(crate) diagnostics: &'a mut Diagnostics,
}

impl<'a> Analyzer<'a> {
    pub fn new(
        registry: &'a mut TypeRegistry,
        unit: &'a UnitContext,
        class: Type,
        diagnostics: &'a mut Diagnostics,
    ) -> Self {
        Self {
            registry,
            unit,
            class,
            diagnostics,
        }
    }

    pub fn report(&mut self, error: CompilationError) {
        self.diagnostics.report(error);
    }

    pub(crate) fn type_name(&self, ty: Type) -> String {
        self.registry.display_name(ty)
    }

    /// `[int, long, double, float]`
    pub(crate) fn type_list(&self, types: &[Type]) -> String {
        let names: Vec<_> = types.iter().map(|ty| self.type_name(*ty)).collect();
        format!("[{}]", names.join(", "))
    }

    /// Resolve a type name, reporting failures and recovering with `ANY`.
    pub(crate) fn resolve_type(&mut self, name: &TypeName) -> Type {
        let resolved = TypeResolver::new(self.registry).resolve(name);
        match resolved {
            Ok(ty) => ty,
            Err(error) => {
                self.report(error);
                Type::ANY
            }
        }
    }

    /// Like [`resolve_type`](Self::resolve_type) but rejects `void`.
    pub(crate) fn resolve_value_type(&mut self, name: &TypeName) -> Type {
        let resolved = TypeResolver::new(self.registry).resolve_value_type(name);
        match resolved {
            Ok(ty) => ty,
            Err(error) => {
                self.report(error);
                Type::ANY
            }
        }
    }

    pub(crate) fn analyze_boxed(&mut self, expr: Box<Expr>, ctx: &mut MethodContext) -> Box<Expr> {
        Box::new(self.analyze_expr(*expr, ctx))
    }

    /// Report unless `actual` is acceptable where `expected` is required.
    ///
    /// Returns whether the type was acceptable.
    pub(crate) fn expect_type(&mut self, actual: Type, expected: Type, line: u32) -> bool {
        if actual.matches_expected(expected) {
            return true;
        }
        let message = format!(
            "type {} doesn't match expected type {}",
            self.type_name(actual),
            self.type_name(expected)
        );
        self.report(CompilationError::type_mismatch(message, line));
        false
    }

    /// Report unless `actual` is one of `expected`.
    pub(crate) fn expect_one_of(&mut self, actual: Type, expected: &[Type], line: u32) -> bool {
        if actual.matches_one_of(expected) {
            return true;
        }
        let message = format!(
            "type {} doesn't match any of the expected types {}",
            self.type_name(actual),
            self.type_list(expected)
        );
        self.report(CompilationError::type_mismatch(message, line));
        false
    }
}
