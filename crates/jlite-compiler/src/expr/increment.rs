//! `++` and `--`, prefix and postfix.

use jlite_ast::{BinaryOp, Expr, ExprKind, IncrementExpr, VarBinding, Variable};
use jlite_core::{CompilationError, Type};

use crate::analyzer::Analyzer;
use crate::generator::{CodeGenerator, Result};
use crate::operators::arith::arithmetic_opcode;
use crate::operators::{conversion, unary_promotion};
use crate::scope::MethodContext;

impl Analyzer<'_> {
    pub(super) fn analyze_increment(&mut self, inc: IncrementExpr, line: u32, ctx: &mut MethodContext) -> Expr {
        let IncrementExpr { op, operand } = inc;

        let operand = if operand.is_assignable() {
            Box::new(self.analyze_lhs(*operand, ctx))
        } else {
            self.analyze_boxed(operand, ctx)
        };
        if !operand.is_assignable() {
            self.report(CompilationError::IllegalLvalue { line });
            return Expr::typed(ExprKind::Increment(IncrementExpr { op, operand }), line, None);
        }

        let operand_ty = operand.ty_or_any();
        let ty = if operand_ty == Type::ANY || operand_ty.is_numeric() {
            Some(operand_ty)
        } else {
            let message = format!("operator {op} cannot be applied to {}", self.type_name(operand_ty));
            self.report(CompilationError::type_mismatch(message, line));
            None
        };
        Expr::typed(ExprKind::Increment(IncrementExpr { op, operand }), line, ty)
    }
}

impl CodeGenerator<'_, '_> {
    pub(super) fn codegen_increment(&mut self, inc: &IncrementExpr, expr: &Expr) -> Result<()> {
        let target = &inc.operand;
        let ty = self.expr_type(target)?;
        let keep_old = !expr.is_statement && !inc.op.is_prefix();
        let keep_new = !expr.is_statement && inc.op.is_prefix();

        if let ExprKind::Variable(Variable {
            binding: Some(VarBinding::Local { slot }),
            ..
        }) = target.kind
            && ty == Type::INT
        {
            if keep_old {
                self.emitter.emit_load(ty, slot);
            }
            self.emitter.emit_iinc(slot, inc.op.delta());
            if keep_new {
                self.emitter.emit_load(ty, slot);
            }
            return Ok(());
        }

        let promoted = unary_promotion(ty)
            .ok_or_else(|| CompilationError::internal(format!("{} on a non-numeric value at line {}", inc.op, expr.line)))?;
        let op = if inc.op.delta() > 0 { BinaryOp::Add } else { BinaryOp::Sub };
        let opcode = arithmetic_opcode(op, promoted)
            .ok_or_else(|| CompilationError::internal(format!("{} has no instruction at line {}", inc.op, expr.line)))?;

        self.codegen_load_lvalue(target)?;
        self.codegen_load_rvalue(target)?;
        if keep_old {
            self.codegen_duplicate_rvalue(target)?;
        }
        self.emitter.emit_one(promoted);
        self.emitter.emit(opcode);
        self.emit_all(conversion(promoted, ty));
        if keep_new {
            self.codegen_duplicate_rvalue(target)?;
        }
        self.codegen_store(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, listing, local};
    use jlite_ast::IncrementOp;

    fn code(fx: &Fixture, expr: &Expr) -> Vec<String> {
        listing(&fx.generate(|g| g.codegen_expr(expr)))
    }

    #[test]
    fn int_locals_use_iinc() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        local(&mut ctx, "i", Type::INT);
        let stmt = fx.analyze(Expr::increment(IncrementOp::PostIncrement, Expr::var("i", 1), 1).into_statement(), &mut ctx);
        let post = fx.analyze(Expr::increment(IncrementOp::PostDecrement, Expr::var("i", 1), 1), &mut ctx);
        let pre = fx.analyze(Expr::increment(IncrementOp::PreIncrement, Expr::var("i", 1), 1), &mut ctx);
        assert_eq!(post.ty, Some(Type::INT));

        assert_eq!(code(&fx, &stmt), ["iinc 0 1"]);
        assert_eq!(code(&fx, &post), ["iload_0", "iinc 0 -1"]);
        assert_eq!(code(&fx, &pre), ["iinc 0 1", "iload_0"]);
    }

    #[test]
    fn prefix_increment_of_a_field() {
        let mut fx = Fixture::new();
        let mut ctx = fx.instance_ctx();
        let expr = fx.analyze(Expr::increment(IncrementOp::PreIncrement, Expr::var("count", 1), 1), &mut ctx);
        assert_eq!(
            code(&fx, &expr),
            ["aload_0", "dup", "getfield Test.count:I", "iconst_1", "iadd", "dup_x1", "putfield Test.count:I"]
        );
    }

    #[test]
    fn wide_and_narrow_locals() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        local(&mut ctx, "d", Type::DOUBLE);
        local(&mut ctx, "c", Type::CHAR);
        let d = fx.analyze(Expr::increment(IncrementOp::PostDecrement, Expr::var("d", 1), 1).into_statement(), &mut ctx);
        let c = fx.analyze(Expr::increment(IncrementOp::PostIncrement, Expr::var("c", 1), 1), &mut ctx);
        assert_eq!(c.ty, Some(Type::CHAR));

        assert_eq!(code(&fx, &d), ["dload_0", "dconst_1", "dsub", "dstore_0"]);
        assert_eq!(code(&fx, &c), ["iload_2", "dup", "iconst_1", "iadd", "i2c", "istore_2"]);
    }

    #[test]
    fn static_long_field() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        let expr = fx.analyze(Expr::increment(IncrementOp::PostIncrement, Expr::var("total", 1), 1), &mut ctx);
        assert_eq!(
            code(&fx, &expr),
            ["getstatic Test.total:J", "dup2", "lconst_1", "ladd", "putstatic Test.total:J"]
        );
    }

    #[test]
    fn array_length_cannot_be_incremented() {
        let mut fx = Fixture::new();
        let mut ctx = fx.instance_ctx();
        let target = Expr::field(Expr::var("values", 3), "length", 3);
        let expr = fx.analyze(Expr::increment(IncrementOp::PostIncrement, target, 3), &mut ctx);

        assert_eq!(expr.ty, None);
        assert_eq!(fx.errors(), [CompilationError::IllegalLvalue { line: 3 }]);
    }

    #[test]
    fn rejected_operands() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        local(&mut ctx, "flag", Type::BOOLEAN);
        let flag = fx.analyze(Expr::increment(IncrementOp::PreDecrement, Expr::var("flag", 1), 1), &mut ctx);
        let literal = fx.analyze(Expr::increment(IncrementOp::PostIncrement, Expr::int(1, 2), 2), &mut ctx);
        assert_eq!(flag.ty, None);
        assert_eq!(literal.ty, None);

        let messages: Vec<_> = fx.errors().iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            ["line 1: operator -- cannot be applied to boolean", "line 2: illegal lhs for assignment"]
        );
    }
}
