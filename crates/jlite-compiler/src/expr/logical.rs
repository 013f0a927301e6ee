//! `!`, `&&`, `||`, `==` and `!=`.

use jlite_ast::{EqualityExpr, Expr, ExprKind, LogicalExpr, LogicalOp};
use jlite_core::{CompilationError, Type};

use crate::analyzer::Analyzer;
use crate::emit::Label;
use crate::generator::{CodeGenerator, Result};
use crate::operators::{EqualityKind, conversion, equality_branch, equality_kind};
use crate::scope::MethodContext;

impl Analyzer<'_> {
    pub(super) fn analyze_not(&mut self, operand: Box<Expr>, line: u32, ctx: &mut MethodContext) -> Expr {
        let operand = self.analyze_boxed(operand, ctx);
        self.expect_type(operand.ty_or_any(), Type::BOOLEAN, operand.line);
        Expr::typed(ExprKind::Not(operand), line, Some(Type::BOOLEAN))
    }

    pub(super) fn analyze_logical(&mut self, logical: LogicalExpr, line: u32, ctx: &mut MethodContext) -> Expr {
        let LogicalExpr { op, lhs, rhs } = logical;
        let lhs = self.analyze_boxed(lhs, ctx);
        let rhs = self.analyze_boxed(rhs, ctx);
        self.expect_type(lhs.ty_or_any(), Type::BOOLEAN, lhs.line);
        self.expect_type(rhs.ty_or_any(), Type::BOOLEAN, rhs.line);
        Expr::typed(ExprKind::Logical(LogicalExpr { op, lhs, rhs }), line, Some(Type::BOOLEAN))
    }

    pub(super) fn analyze_equality(&mut self, eq: EqualityExpr, line: u32, ctx: &mut MethodContext) -> Expr {
        let EqualityExpr { op, lhs, rhs } = eq;
        let lhs = self.analyze_boxed(lhs, ctx);
        let rhs = self.analyze_boxed(rhs, ctx);
        let (left, right) = (lhs.ty_or_any(), rhs.ty_or_any());

        if left != Type::ANY && right != Type::ANY && equality_kind(left, right).is_none() {
            let message = format!(
                "incomparable types: {} and {}",
                self.type_name(left),
                self.type_name(right)
            );
            self.report(CompilationError::type_mismatch(message, line));
        }

        Expr::typed(ExprKind::Equality(EqualityExpr { op, lhs, rhs }), line, Some(Type::BOOLEAN))
    }
}

// ============================================================================
// Code generation
// ============================================================================

impl CodeGenerator<'_, '_> {
    /// Short-circuit evaluation: the right operand is only tested when the
    /// left one does not decide the outcome.
    pub(super) fn codegen_logical_branch(&mut self, logical: &LogicalExpr, target: Label, on_true: bool) -> Result<()> {
        match (logical.op, on_true) {
            (LogicalOp::And, false) | (LogicalOp::Or, true) => {
                self.codegen_branch(&logical.lhs, target, on_true)?;
                self.codegen_branch(&logical.rhs, target, on_true)?;
            }
            (LogicalOp::And, true) | (LogicalOp::Or, false) => {
                let skip = self.emitter.new_label();
                self.codegen_branch(&logical.lhs, skip, !on_true)?;
                self.codegen_branch(&logical.rhs, target, on_true)?;
                self.emitter.place_label(skip);
            }
        }
        Ok(())
    }

    pub(super) fn codegen_equality_branch(&mut self, eq: &EqualityExpr, target: Label, on_true: bool) -> Result<()> {
        let left = self.expr_type(&eq.lhs)?;
        let right = self.expr_type(&eq.rhs)?;
        let kind = equality_kind(left, right).ok_or_else(|| {
            CompilationError::internal(format!("incomparable operands at line {}", eq.lhs.line))
        })?;
        let operand = match kind {
            EqualityKind::Numeric(promoted) => promoted,
            _ => left,
        };

        self.codegen_expr(&eq.lhs)?;
        self.emit_all(conversion(left, operand));
        self.codegen_expr(&eq.rhs)?;
        self.emit_all(conversion(right, operand));

        let selection = equality_branch(kind, eq.op, on_true);
        if let Some(compare) = selection.compare {
            self.emitter.emit(compare);
        }
        self.emitter.emit_branch(selection.branch, target);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, listing, local};
    use jlite_ast::{CompareOp, EqualityOp};

    fn branch(fx: &Fixture, expr: &Expr, on_true: bool) -> Vec<String> {
        listing(&fx.generate(|g| {
            let target = g.emitter().new_label();
            g.codegen_branch(expr, target, on_true)
        }))
    }

    fn setup() -> (Fixture, MethodContext) {
        let fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        local(&mut ctx, "a", Type::INT);
        local(&mut ctx, "b", Type::INT);
        (fx, ctx)
    }

    fn a_less_b() -> Expr {
        Expr::compare(CompareOp::Less, Expr::var("a", 1), Expr::var("b", 1), 1)
    }

    fn b_positive() -> Expr {
        Expr::compare(CompareOp::Greater, Expr::var("b", 1), Expr::int(0, 1), 1)
    }

    #[test]
    fn and_short_circuits() {
        let (mut fx, mut ctx) = setup();
        let expr = fx.analyze(Expr::logical(LogicalOp::And, a_less_b(), b_positive(), 1), &mut ctx);

        assert_eq!(
            branch(&fx, &expr, true),
            [
                "iload_0", "iload_1", "if_icmpge L1", // false: skip the rest
                "iload_1", "iconst_0", "if_icmpgt L0",
                "L1:",
            ]
        );
        assert_eq!(
            branch(&fx, &expr, false),
            ["iload_0", "iload_1", "if_icmpge L0", "iload_1", "iconst_0", "if_icmple L0"]
        );
    }

    #[test]
    fn or_short_circuits() {
        let (mut fx, mut ctx) = setup();
        let expr = fx.analyze(Expr::logical(LogicalOp::Or, a_less_b(), b_positive(), 1), &mut ctx);

        assert_eq!(
            branch(&fx, &expr, true),
            ["iload_0", "iload_1", "if_icmplt L0", "iload_1", "iconst_0", "if_icmpgt L0"]
        );
        assert_eq!(
            branch(&fx, &expr, false),
            [
                "iload_0", "iload_1", "if_icmplt L1",
                "iload_1", "iconst_0", "if_icmple L0",
                "L1:",
            ]
        );
    }

    #[test]
    fn logical_operands_must_be_boolean() {
        let (mut fx, mut ctx) = setup();
        let expr = fx.analyze(Expr::logical(LogicalOp::Or, Expr::var("a", 4), Expr::bool(true, 4), 4), &mut ctx);
        assert_eq!(expr.ty, Some(Type::BOOLEAN));
        fx.analyze(Expr::not(Expr::int(1, 5), 5), &mut ctx);

        let messages: Vec<_> = fx.errors().iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            [
                "line 4: type int doesn't match expected type boolean",
                "line 5: type int doesn't match expected type boolean",
            ]
        );
    }

    #[test]
    fn equality_promotes_numeric_operands() {
        let (mut fx, mut ctx) = setup();
        let expr = fx.analyze(
            Expr::equality(EqualityOp::Equal, Expr::var("a", 1), Expr::long(2, 1), 1),
            &mut ctx,
        );
        assert!(fx.errors().is_empty());
        assert_eq!(
            branch(&fx, &expr, false),
            ["iload_0", "i2l", "ldc2_w 2L", "lcmp", "ifne L0"]
        );
    }

    #[test]
    fn reference_equality_and_null() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        local(&mut ctx, "s", Type::STRING);
        let expr = fx.analyze(Expr::equality(EqualityOp::NotEqual, Expr::var("s", 1), Expr::null(1), 1), &mut ctx);
        assert!(fx.errors().is_empty());
        assert_eq!(branch(&fx, &expr, true), ["aload_0", "aconst_null", "if_acmpne L0"]);
    }

    #[test]
    fn incomparable_types() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        fx.analyze(Expr::equality(EqualityOp::Equal, Expr::bool(true, 7), Expr::int(1, 7), 7), &mut ctx);
        fx.analyze(Expr::equality(EqualityOp::Equal, Expr::string("s", 8), Expr::int(1, 8), 8), &mut ctx);
        let messages: Vec<_> = fx.errors().iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            [
                "line 7: incomparable types: boolean and int",
                "line 8: incomparable types: java.lang.String and int",
            ]
        );
    }
}
