//! Names, `this`, field access and array indexing.

use jlite_ast::{ArrayAccess, Expr, ExprKind, FieldAccess, FieldRef, VarBinding, Variable};
use jlite_core::{CompilationError, Type, TypeKind};

use crate::analyzer::Analyzer;
use crate::bytecode::OpCode;
use crate::generator::{CodeGenerator, Result};
use crate::scope::MethodContext;

/// Types accepted as an array index.
const INDEX_TYPES: &[Type] = &[Type::INT, Type::CHAR, Type::SHORT, Type::BYTE];

impl Analyzer<'_> {
    pub(super) fn analyze_variable(&mut self, var: Variable, line: u32, ctx: &mut MethodContext) -> Expr {
        let expr = self.bind_name(var, line, ctx);
        if let ExprKind::Variable(Variable {
            name,
            binding: Some(VarBinding::Local { .. }),
        }) = &expr.kind
        {
            let initialized = ctx.lookup(name).is_some_and(|local| local.is_initialized);
            if !initialized {
                self.report(CompilationError::UninitializedVariable {
                    name: name.clone(),
                    line,
                });
            }
        }
        expr
    }

    /// Bind a simple name to a local or a field without the
    /// definite-assignment check applied to reads.
    pub(super) fn bind_name(&mut self, var: Variable, line: u32, ctx: &MethodContext) -> Expr {
        let Variable { name, .. } = var;

        if let Some(local) = ctx.lookup(&name) {
            let (slot, ty) = (local.slot, local.ty);
            return Expr::typed(
                ExprKind::Variable(Variable {
                    name,
                    binding: Some(VarBinding::Local { slot }),
                }),
                line,
                Some(ty),
            );
        }

        if let Some(field) = self.unit.lookup_field(self.registry, self.class, &name) {
            if !field.is_static && ctx.is_static() {
                self.report(CompilationError::InvalidOperation {
                    message: format!("non-static variable {name} cannot be referenced from a static context"),
                    line,
                });
            }
            return field_variable(name, field, line);
        }

        self.report(CompilationError::UnknownVariable { name: name.clone(), line });
        Expr::typed(ExprKind::Variable(Variable { name, binding: None }), line, Some(Type::ANY))
    }

    pub(super) fn analyze_this(&mut self, line: u32, ctx: &MethodContext) -> Expr {
        if ctx.is_static() {
            self.report(CompilationError::InvalidOperation {
                message: "non-static variable this cannot be referenced from a static context".to_string(),
                line,
            });
        }
        Expr::typed(ExprKind::This, line, Some(self.class))
    }

    /// The class named by `expr` when it is a (possibly dotted) type name
    /// rather than a value.
    ///
    /// Locals and fields shadow type names.
    pub(super) fn type_qualifier(&self, expr: &Expr, ctx: &MethodContext) -> Option<Type> {
        let name = qualified_name(expr)?;
        let head = name.split('.').next().unwrap_or(&name);
        if ctx.lookup(head).is_some() || self.unit.lookup_field(self.registry, self.class, head).is_some() {
            return None;
        }
        let ty = self.registry.lookup(&name)?;
        matches!(self.registry.kind(ty), Some(TypeKind::Class | TypeKind::Interface)).then_some(ty)
    }

    pub(super) fn analyze_field_access(&mut self, access: FieldAccess, line: u32, ctx: &mut MethodContext) -> Expr {
        let FieldAccess { target, name, .. } = access;

        if let Some(owner) = self.type_qualifier(&target, ctx) {
            return self.static_field(owner, name, line);
        }

        let target = self.analyze_boxed(target, ctx);
        let target_ty = target.ty_or_any();
        if target_ty == Type::ANY {
            return Expr::typed(
                ExprKind::FieldAccess(FieldAccess { target, name, field: None }),
                line,
                Some(Type::ANY),
            );
        }

        if name == "length" && self.registry.is_array(target_ty) {
            return Expr::typed(ExprKind::ArrayLength(target), line, Some(Type::INT));
        }

        match self.unit.lookup_field(self.registry, target_ty, &name) {
            // The receiver of a static field carries no information; it is
            // not evaluated.
            Some(field) if field.is_static => field_variable(name, field, line),
            Some(field) => Expr::typed(
                ExprKind::FieldAccess(FieldAccess {
                    target,
                    name,
                    field: Some(field),
                }),
                line,
                Some(field.ty),
            ),
            None => {
                self.report(CompilationError::UnknownField {
                    name: name.clone(),
                    type_name: self.type_name(target_ty),
                    line,
                });
                Expr::typed(
                    ExprKind::FieldAccess(FieldAccess { target, name, field: None }),
                    line,
                    Some(Type::ANY),
                )
            }
        }
    }

    /// `Type.name`
    fn static_field(&mut self, owner: Type, name: String, line: u32) -> Expr {
        match self.unit.lookup_field(self.registry, owner, &name) {
            Some(field) => {
                if !field.is_static {
                    self.report(CompilationError::InvalidOperation {
                        message: format!("non-static variable {name} cannot be referenced from a static context"),
                        line,
                    });
                }
                field_variable(name, field, line)
            }
            None => {
                self.report(CompilationError::UnknownField {
                    name: name.clone(),
                    type_name: self.type_name(owner),
                    line,
                });
                Expr::typed(ExprKind::Variable(Variable { name, binding: None }), line, Some(Type::ANY))
            }
        }
    }

    pub(super) fn analyze_array_access(&mut self, access: ArrayAccess, line: u32, ctx: &mut MethodContext) -> Expr {
        let array = self.analyze_boxed(access.array, ctx);
        let index = self.analyze_boxed(access.index, ctx);

        let element = self.element_type(array.ty_or_any(), line);
        self.expect_one_of(index.ty_or_any(), INDEX_TYPES, index.line);

        Expr::typed(ExprKind::ArrayAccess(ArrayAccess { array, index }), line, Some(element))
    }

    pub(super) fn analyze_array_length(&mut self, array: Box<Expr>, line: u32, ctx: &mut MethodContext) -> Expr {
        let array = self.analyze_boxed(array, ctx);
        self.element_type(array.ty_or_any(), line);
        Expr::typed(ExprKind::ArrayLength(array), line, Some(Type::INT))
    }

    /// Element type of an array operand, reporting non-arrays.
    fn element_type(&mut self, array_ty: Type, line: u32) -> Type {
        if array_ty == Type::ANY {
            return Type::ANY;
        }
        match self.registry.element_type(array_ty) {
            Some(element) => element,
            None => {
                let message = format!("array required, but {} found", self.type_name(array_ty));
                self.report(CompilationError::type_mismatch(message, line));
                Type::ANY
            }
        }
    }
}

fn field_variable(name: String, field: FieldRef, line: u32) -> Expr {
    let ty = field.ty;
    Expr::typed(
        ExprKind::Variable(Variable {
            name,
            binding: Some(VarBinding::Field(field)),
        }),
        line,
        Some(ty),
    )
}

/// `a.b.c` for a chain of unbound names, if `expr` is one.
fn qualified_name(expr: &Expr) -> Option<String> {
    match &expr.kind {
        ExprKind::Variable(Variable { name, binding: None }) => Some(name.clone()),
        ExprKind::FieldAccess(FieldAccess { target, name, .. }) => {
            let prefix = qualified_name(target)?;
            Some(format!("{prefix}.{name}"))
        }
        _ => None,
    }
}

// ============================================================================
// Code generation
// ============================================================================

impl CodeGenerator<'_, '_> {
    pub(super) fn codegen_variable(&mut self, var: &Variable, expr: &Expr) -> Result<()> {
        match var.binding {
            Some(VarBinding::Local { slot }) => {
                let ty = self.expr_type(expr)?;
                self.emitter.emit_load(ty, slot);
            }
            Some(VarBinding::Field(field)) if field.is_static => {
                self.emit_field(OpCode::Getstatic, &field, &var.name);
            }
            Some(VarBinding::Field(field)) => {
                self.emitter.emit(OpCode::Aload0);
                self.emit_field(OpCode::Getfield, &field, &var.name);
            }
            None => return Err(unbound(&var.name, expr.line)),
        }
        Ok(())
    }

    pub(super) fn codegen_field_access(&mut self, access: &FieldAccess, expr: &Expr) -> Result<()> {
        let field = access.field.ok_or_else(|| unbound(&access.name, expr.line))?;
        self.codegen_expr(&access.target)?;
        self.emit_field(OpCode::Getfield, &field, &access.name);
        Ok(())
    }

    pub(super) fn codegen_array_access(&mut self, access: &ArrayAccess, expr: &Expr) -> Result<()> {
        let element = self.expr_type(expr)?;
        self.codegen_expr(&access.array)?;
        self.codegen_expr(&access.index)?;
        self.emitter.emit_array_load(element);
        Ok(())
    }

    /// `getfield`/`putfield`/`getstatic`/`putstatic` on `field`.
    pub(super) fn emit_field(&mut self, op: OpCode, field: &FieldRef, name: &str) {
        let owner = self.internal_name(field.owner);
        let descriptor = self.descriptor(field.ty);
        self.emitter.emit_member(op, &owner, name, &descriptor);
    }
}

pub(super) fn unbound(name: &str, line: u32) -> CompilationError {
    CompilationError::internal(format!("'{name}' at line {line} reached code generation unresolved"))
}
