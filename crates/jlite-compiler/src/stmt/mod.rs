//! Statement analysis and code generation.
//!
//! Statements are analyzed in order against the method context, which
//! tracks declared locals, the enclosing loops, and whether every path
//! so far has returned. Code generation lowers control flow onto labels
//! and the conditional jumps produced by [`CodeGenerator::codegen_branch`].

mod block;
mod for_stmt;
mod if_stmt;
mod return_stmt;
mod var_decl;
mod while_stmt;

use jlite_ast::{Expr, ExprKind, ExprStmt, Literal, Stmt};
use jlite_core::{CompilationError, Type};

use crate::analyzer::Analyzer;
use crate::generator::{CodeGenerator, Result};
use crate::scope::MethodContext;

impl Analyzer<'_> {
    /// Analyze a statement, returning its analyzed replacement.
    pub fn analyze_stmt(&mut self, stmt: Stmt, ctx: &mut MethodContext) -> Stmt {
        match stmt {
            Stmt::Block(block) => Stmt::Block(self.analyze_block(block, ctx)),
            Stmt::LocalVar(decl) => Stmt::LocalVar(self.analyze_var_decl(decl, ctx)),
            Stmt::Expr(ExprStmt { expr, line }) => Stmt::Expr(ExprStmt {
                expr: self.analyze_statement_expr(expr, ctx),
                line,
            }),
            Stmt::If(if_stmt) => Stmt::If(self.analyze_if(if_stmt, ctx)),
            Stmt::While(while_stmt) => Stmt::While(self.analyze_while(while_stmt, ctx)),
            Stmt::For(for_stmt) => Stmt::For(self.analyze_for(for_stmt, ctx)),
            Stmt::Return(ret) => Stmt::Return(self.analyze_return(ret, ctx)),
            Stmt::Break { line } => {
                if !ctx.note_break() {
                    self.report(CompilationError::BreakOutsideLoop { line });
                }
                Stmt::Break { line }
            }
            Stmt::Continue { line } => {
                if !ctx.in_loop() {
                    self.report(CompilationError::ContinueOutsideLoop { line });
                }
                Stmt::Continue { line }
            }
            Stmt::Empty { line } => Stmt::Empty { line },
        }
    }

    /// Analyze an expression used as a statement. Only assignments,
    /// increments and calls qualify.
    pub(crate) fn analyze_statement_expr(&mut self, expr: Expr, ctx: &mut MethodContext) -> Expr {
        if !matches!(
            expr.kind,
            ExprKind::Assign(_) | ExprKind::Increment(_) | ExprKind::Call(_)
        ) {
            self.report(CompilationError::InvalidOperation {
                message: "not a statement".to_string(),
                line: expr.line,
            });
        }
        self.analyze_expr(expr.into_statement(), ctx)
    }

    /// Analyze a loop or `if` condition, which must be `boolean`.
    pub(crate) fn analyze_condition(&mut self, condition: Expr, ctx: &mut MethodContext) -> Expr {
        let condition = self.analyze_expr(condition, ctx);
        self.expect_type(condition.ty_or_any(), Type::BOOLEAN, condition.line);
        condition
    }
}

/// A loop condition that can never be false.
pub(crate) fn always_true(condition: Option<&Expr>) -> bool {
    match condition {
        None => true,
        Some(expr) => matches!(expr.kind, ExprKind::Literal(Literal::Bool(true))),
    }
}

impl CodeGenerator<'_, '_> {
    pub fn codegen_stmt(&mut self, stmt: &Stmt) -> Result<()> {
        match stmt {
            Stmt::Block(block) => self.codegen_block(block),
            Stmt::LocalVar(decl) => self.codegen_var_decl(decl),
            Stmt::Expr(expr_stmt) => self.codegen_statement_expr(&expr_stmt.expr),
            Stmt::If(if_stmt) => self.codegen_if(if_stmt),
            Stmt::While(while_stmt) => self.codegen_while(while_stmt),
            Stmt::For(for_stmt) => self.codegen_for(for_stmt),
            Stmt::Return(ret) => self.codegen_return(ret),
            Stmt::Break { line } => self
                .emitter
                .emit_break()
                .map_err(|e| CompilationError::internal(format!("{e} at line {line}"))),
            Stmt::Continue { line } => self
                .emitter
                .emit_continue()
                .map_err(|e| CompilationError::internal(format!("{e} at line {line}"))),
            Stmt::Empty { .. } => Ok(()),
        }
    }

    /// Evaluate an expression for its effect, discarding any call result.
    pub(crate) fn codegen_statement_expr(&mut self, expr: &Expr) -> Result<()> {
        self.codegen_expr(expr)?;
        if let ExprKind::Call(_) = expr.kind {
            let ty = self.expr_type(expr)?;
            self.emitter.emit_pop(ty);
        }
        Ok(())
    }
}
