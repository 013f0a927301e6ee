//! Expression analysis and code generation.
//!
//! Analysis dispatches on the node kind and returns the analyzed node;
//! code generation has two entry points:
//! - [`CodeGenerator::codegen_expr`] leaves the expression's value on the
//!   operand stack
//! - [`CodeGenerator::codegen_branch`] compiles a boolean expression into
//!   a conditional jump to a label, taken when the expression's value
//!   equals `on_true`
//!
//! Comparisons, equality tests, `&&`, `||`, `!` and boolean literals have
//! a native branch form. Any other boolean expression branches on its
//! materialized 0/1 value; branch-form expressions whose value is needed
//! synthesize it by jumping to one of two pushes.

mod assignment;
mod binary;
mod calls;
mod comparison;
mod identifiers;
mod increment;
mod literals;
mod logical;
mod lvalue;

use jlite_ast::{Expr, ExprKind, Literal};

use crate::analyzer::Analyzer;
use crate::bytecode::OpCode;
use crate::emit::Label;
use crate::generator::{CodeGenerator, Result};
use crate::operators::value_branch;
use crate::scope::MethodContext;

impl Analyzer<'_> {
    /// Analyze an expression, returning its analyzed (possibly rewritten)
    /// replacement.
    pub fn analyze_expr(&mut self, expr: Expr, ctx: &mut MethodContext) -> Expr {
        let Expr {
            kind,
            line,
            is_statement,
            ..
        } = expr;
        let mut analyzed = match kind {
            ExprKind::Literal(lit) => self.analyze_literal(lit, line),
            ExprKind::Variable(var) => self.analyze_variable(var, line, ctx),
            ExprKind::This => self.analyze_this(line, ctx),
            ExprKind::FieldAccess(access) => self.analyze_field_access(access, line, ctx),
            ExprKind::ArrayAccess(access) => self.analyze_array_access(access, line, ctx),
            ExprKind::ArrayLength(array) => self.analyze_array_length(array, line, ctx),
            ExprKind::Unary(unary) => self.analyze_unary(unary, line, ctx),
            ExprKind::Not(operand) => self.analyze_not(operand, line, ctx),
            ExprKind::Binary(binary) => self.analyze_binary(binary, line, ctx),
            ExprKind::Comparison(cmp) => self.analyze_comparison(cmp, line, ctx),
            ExprKind::Equality(eq) => self.analyze_equality(eq, line, ctx),
            ExprKind::Logical(logical) => self.analyze_logical(logical, line, ctx),
            ExprKind::StringConcat(concat) => self.analyze_concat(concat, line, ctx),
            ExprKind::Assign(assign) => self.analyze_assign(assign, line, ctx),
            ExprKind::Increment(inc) => self.analyze_increment(inc, line, ctx),
            ExprKind::Call(call) => self.analyze_call(call, line, ctx),
        };
        analyzed.is_statement = is_statement;
        analyzed
    }
}

impl CodeGenerator<'_, '_> {
    /// Emit code leaving the value of `expr` on the stack.
    ///
    /// Assignments and increments marked as statements leave nothing.
    pub fn codegen_expr(&mut self, expr: &Expr) -> Result<()> {
        match &expr.kind {
            ExprKind::Literal(lit) => self.codegen_literal(lit),
            ExprKind::Variable(var) => self.codegen_variable(var, expr),
            ExprKind::This => {
                self.emitter.emit(OpCode::Aload0);
                Ok(())
            }
            ExprKind::FieldAccess(access) => self.codegen_field_access(access, expr),
            ExprKind::ArrayAccess(access) => self.codegen_array_access(access, expr),
            ExprKind::ArrayLength(array) => {
                self.codegen_expr(array)?;
                self.emitter.emit(OpCode::Arraylength);
                Ok(())
            }
            ExprKind::Unary(unary) => self.codegen_unary(unary, expr),
            ExprKind::Binary(binary) => self.codegen_binary(binary, expr),
            ExprKind::StringConcat(concat) => self.codegen_concat(concat),
            ExprKind::Assign(assign) => self.codegen_assign(assign, expr),
            ExprKind::Increment(inc) => self.codegen_increment(inc, expr),
            ExprKind::Call(call) => self.codegen_call(call, expr),
            ExprKind::Comparison(_) | ExprKind::Equality(_) | ExprKind::Logical(_) | ExprKind::Not(_) => {
                self.codegen_branch_value(expr)
            }
        }
    }

    /// Emit a jump to `target` taken when `expr` evaluates to `on_true`.
    pub fn codegen_branch(&mut self, expr: &Expr, target: Label, on_true: bool) -> Result<()> {
        match &expr.kind {
            ExprKind::Literal(Literal::Bool(value)) => {
                if *value == on_true {
                    self.emitter.emit_goto(target);
                }
                Ok(())
            }
            ExprKind::Comparison(cmp) => self.codegen_comparison_branch(cmp, target, on_true),
            ExprKind::Equality(eq) => self.codegen_equality_branch(eq, target, on_true),
            ExprKind::Logical(logical) => self.codegen_logical_branch(logical, target, on_true),
            ExprKind::Not(operand) => self.codegen_branch(operand, target, !on_true),
            _ => {
                self.codegen_expr(expr)?;
                self.emitter.emit_branch(value_branch(on_true), target);
                Ok(())
            }
        }
    }

    /// Materialize a branch-form expression as 0 or 1.
    ///
    /// ```text
    ///   <branch to false_label when false>
    ///   iconst_1
    ///   goto end
    /// false_label:
    ///   iconst_0
    /// end:
    /// ```
    fn codegen_branch_value(&mut self, expr: &Expr) -> Result<()> {
        let false_label = self.emitter.new_label();
        let end = self.emitter.new_label();
        self.codegen_branch(expr, false_label, false)?;
        self.emitter.emit(OpCode::Iconst1);
        self.emitter.emit_goto(end);
        self.emitter.place_label(false_label);
        self.emitter.emit(OpCode::Iconst0);
        self.emitter.place_label(end);
        Ok(())
    }
}
