//! Storage locations: the shared protocol behind assignments and
//! increments.
//!
//! Updating a location takes up to four steps, each of which depends on
//! the kind of location:
//!
//! | step             | local     | static field | instance field | array element |
//! |------------------|-----------|--------------|----------------|---------------|
//! | load lvalue      | -         | -            | receiver       | array, index  |
//! | load rvalue      | `xload`   | `getstatic`  | `dup; getfield`| `dup2; xaload`|
//! | duplicate rvalue | `dup`     | `dup`        | `dup_x1`       | `dup_x2`      |
//! | store            | `xstore`  | `putstatic`  | `putfield`     | `xastore`     |
//!
//! The duplicate step copies the new value below the lvalue operands so it
//! survives the store when the expression's value is used.

use jlite_ast::{Expr, ExprKind, FieldRef, VarBinding, Variable};
use jlite_core::CompilationError;

use crate::analyzer::Analyzer;
use crate::bytecode::OpCode;
use crate::generator::{CodeGenerator, Result};
use crate::scope::MethodContext;

use super::identifiers::unbound;

impl Analyzer<'_> {
    /// Analyze the target of an assignment or increment.
    ///
    /// A plain name is bound without the definite-assignment check, since
    /// writing to it is what initializes it.
    pub(super) fn analyze_lhs(&mut self, expr: Expr, ctx: &mut MethodContext) -> Expr {
        match expr.kind {
            ExprKind::Variable(var) => self.bind_name(var, expr.line, ctx),
            kind => self.analyze_expr(Expr::new(kind, expr.line), ctx),
        }
    }
}

/// An analyzed storage location.
enum Place<'x> {
    Local { slot: u16 },
    Static { field: FieldRef, name: &'x str },
    Instance {
        field: FieldRef,
        name: &'x str,
        /// `None` for an implicit `this`.
        receiver: Option<&'x Expr>,
    },
    Element { array: &'x Expr, index: &'x Expr },
}

fn place(expr: &Expr) -> Result<Place<'_>> {
    match &expr.kind {
        ExprKind::Variable(Variable { name, binding }) => match binding {
            Some(VarBinding::Local { slot }) => Ok(Place::Local { slot: *slot }),
            Some(VarBinding::Field(field)) if field.is_static => Ok(Place::Static { field: *field, name }),
            Some(VarBinding::Field(field)) => Ok(Place::Instance {
                field: *field,
                name,
                receiver: None,
            }),
            None => Err(unbound(name, expr.line)),
        },
        ExprKind::FieldAccess(access) => {
            let field = access.field.ok_or_else(|| unbound(&access.name, expr.line))?;
            Ok(Place::Instance {
                field,
                name: &access.name,
                receiver: Some(&access.target),
            })
        }
        ExprKind::ArrayAccess(access) => Ok(Place::Element {
            array: &access.array,
            index: &access.index,
        }),
        _ => Err(CompilationError::internal(format!(
            "expression at line {} is not a storage location",
            expr.line
        ))),
    }
}

impl CodeGenerator<'_, '_> {
    /// Push the operands that locate `target`.
    pub(super) fn codegen_load_lvalue(&mut self, target: &Expr) -> Result<()> {
        match place(target)? {
            Place::Local { .. } | Place::Static { .. } => {}
            Place::Instance { receiver: None, .. } => self.emitter.emit(OpCode::Aload0),
            Place::Instance {
                receiver: Some(receiver),
                ..
            } => self.codegen_expr(receiver)?,
            Place::Element { array, index } => {
                self.codegen_expr(array)?;
                self.codegen_expr(index)?;
            }
        }
        Ok(())
    }

    /// Push the current value of `target`, keeping its lvalue operands.
    pub(super) fn codegen_load_rvalue(&mut self, target: &Expr) -> Result<()> {
        let ty = self.expr_type(target)?;
        match place(target)? {
            Place::Local { slot } => self.emitter.emit_load(ty, slot),
            Place::Static { field, name } => self.emit_field(OpCode::Getstatic, &field, name),
            Place::Instance { field, name, .. } => {
                self.emitter.emit(OpCode::Dup);
                self.emit_field(OpCode::Getfield, &field, name);
            }
            Place::Element { .. } => {
                self.emitter.emit(OpCode::Dup2);
                self.emitter.emit_array_load(ty);
            }
        }
        Ok(())
    }

    /// Copy the value on top of the stack below the lvalue operands.
    pub(super) fn codegen_duplicate_rvalue(&mut self, target: &Expr) -> Result<()> {
        let ty = self.expr_type(target)?;
        match place(target)? {
            Place::Local { .. } | Place::Static { .. } => self.emitter.emit_dup(ty),
            Place::Instance { .. } => self.emitter.emit_dup_x1(ty),
            Place::Element { .. } => self.emitter.emit_dup_x2(ty),
        }
        Ok(())
    }

    /// Store the value on top of the stack into `target`.
    pub(super) fn codegen_store(&mut self, target: &Expr) -> Result<()> {
        let ty = self.expr_type(target)?;
        match place(target)? {
            Place::Local { slot } => self.emitter.emit_store(ty, slot),
            Place::Static { field, name } => self.emit_field(OpCode::Putstatic, &field, name),
            Place::Instance { field, name, .. } => self.emit_field(OpCode::Putfield, &field, name),
            Place::Element { .. } => self.emitter.emit_array_store(ty),
        }
        Ok(())
    }
}
