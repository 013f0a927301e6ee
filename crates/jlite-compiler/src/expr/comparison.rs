//! Relational operators `<`, `<=`, `>`, `>=`.
//!
//! Both operands must have the same type, `int` or `double`; there is no
//! promotion between them. The result is always `boolean`, even when the
//! operands are rejected, so an enclosing condition is not reported again.

use jlite_ast::{ComparisonExpr, Expr, ExprKind};
use jlite_core::{CompilationError, Type};

use crate::analyzer::Analyzer;
use crate::emit::Label;
use crate::generator::{CodeGenerator, Result};
use crate::operators::compare_branch;
use crate::scope::MethodContext;

/// Operand types accepted by the relational operators.
const COMPARABLE: &[Type] = &[Type::INT, Type::DOUBLE];

impl Analyzer<'_> {
    pub(super) fn analyze_comparison(&mut self, cmp: ComparisonExpr, line: u32, ctx: &mut MethodContext) -> Expr {
        let ComparisonExpr { op, lhs, rhs } = cmp;
        let lhs = self.analyze_boxed(lhs, ctx);
        let rhs = self.analyze_boxed(rhs, ctx);
        let (left, right) = (lhs.ty_or_any(), rhs.ty_or_any());

        if left != Type::ANY && right != Type::ANY && self.expect_one_of(left, COMPARABLE, lhs.line) {
            self.expect_type(right, left, rhs.line);
        }

        Expr::typed(ExprKind::Comparison(ComparisonExpr { op, lhs, rhs }), line, Some(Type::BOOLEAN))
    }
}

impl CodeGenerator<'_, '_> {
    pub(super) fn codegen_comparison_branch(&mut self, cmp: &ComparisonExpr, target: Label, on_true: bool) -> Result<()> {
        let operand = self.expr_type(&cmp.lhs)?;
        let selection = compare_branch(cmp.op, operand, on_true).ok_or_else(|| {
            CompilationError::internal(format!(
                "operator {} on {} at line {}",
                cmp.op,
                self.registry.display_name(operand),
                cmp.lhs.line
            ))
        })?;

        self.codegen_expr(&cmp.lhs)?;
        self.codegen_expr(&cmp.rhs)?;
        if let Some(compare) = selection.compare {
            self.emitter.emit(compare);
        }
        self.emitter.emit_branch(selection.branch, target);
        Ok(())
    }
}
