//! `=` and the compound assignment operators.
//!
//! Operand legality comes from the table in [`crate::operators::assign`].
//! A compound assignment computes in the left operand's type: the right
//! operand is converted to it (to `int` for shift distances) and the
//! operator instruction is the one for the left type.

use jlite_ast::{AssignExpr, AssignOp, Expr, ExprKind, StringConcat, VarBinding, Variable};
use jlite_core::{CompilationError, Type};

use crate::analyzer::Analyzer;
use crate::generator::{CodeGenerator, Result};
use crate::operators::arith::arithmetic_opcode;
use crate::operators::{AssignCheck, check_assignment, conversion, legal_right_types};
use crate::scope::MethodContext;

impl Analyzer<'_> {
    pub(super) fn analyze_assign(&mut self, assign: AssignExpr, line: u32, ctx: &mut MethodContext) -> Expr {
        let AssignExpr { op, lhs, rhs } = assign;

        // `a.length` parses as a field access and only stops being a
        // storage location once analyzed, so the check runs afterwards.
        let lhs = if lhs.is_assignable() {
            Box::new(self.analyze_lhs(*lhs, ctx))
        } else {
            self.analyze_boxed(lhs, ctx)
        };
        if !lhs.is_assignable() {
            self.report(CompilationError::IllegalLvalue { line });
            let rhs = self.analyze_boxed(rhs, ctx);
            return Expr::typed(ExprKind::Assign(AssignExpr { op, lhs, rhs }), line, None);
        }

        let mut rhs = self.analyze_boxed(rhs, ctx);
        if let ExprKind::Variable(Variable {
            name,
            binding: Some(VarBinding::Local { .. }),
        }) = &lhs.kind
        {
            ctx.mark_initialized(name);
        }

        let (left, right) = (lhs.ty_or_any(), rhs.ty_or_any());
        let ty = match check_assignment(self.registry, op, left, right) {
            AssignCheck::Ok(ty) => Some(ty),
            AssignCheck::Concat => {
                self.check_concat_operand(&rhs);
                let rhs_line = rhs.line;
                let concat = StringConcat { lhs: lhs.clone(), rhs };
                rhs = Box::new(Expr::typed(ExprKind::StringConcat(concat), rhs_line, Some(Type::STRING)));
                Some(Type::STRING)
            }
            AssignCheck::BadLeft => {
                let message = format!("invalid lhs type for {op}: {}", self.type_name(left));
                self.report(CompilationError::type_mismatch(message, line));
                None
            }
            AssignCheck::BadRight if op.is_simple() => {
                self.expect_type(right, left, rhs.line);
                None
            }
            AssignCheck::BadRight => {
                self.expect_one_of(right, legal_right_types(op), rhs.line);
                None
            }
        };

        Expr::typed(ExprKind::Assign(AssignExpr { op, lhs, rhs }), line, ty)
    }
}

impl CodeGenerator<'_, '_> {
    pub(super) fn codegen_assign(&mut self, assign: &AssignExpr, expr: &Expr) -> Result<()> {
        let target = &assign.lhs;
        let left = self.expr_type(target)?;
        let concat = assign.op == AssignOp::AddAssign && left == Type::STRING;

        self.codegen_load_lvalue(target)?;
        match assign.op.binary_op() {
            Some(op) if !concat => {
                let right = self.expr_type(&assign.rhs)?;
                let opcode = arithmetic_opcode(op, left).ok_or_else(|| {
                    CompilationError::internal(format!(
                        "operator {} has no instruction for {} at line {}",
                        assign.op,
                        self.registry.display_name(left),
                        expr.line
                    ))
                })?;
                self.codegen_load_rvalue(target)?;
                self.codegen_expr(&assign.rhs)?;
                let operand = if op.is_shift() { Type::INT } else { left };
                self.emit_all(conversion(right, operand));
                self.emitter.emit(opcode);
            }
            // `=`, and `+=` on a String whose right side already holds the
            // concatenation.
            _ => self.codegen_expr(&assign.rhs)?,
        }

        if !expr.is_statement {
            self.codegen_duplicate_rvalue(target)?;
        }
        self.codegen_store(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, listing, local};
    use jlite_ast::BinaryOp;

    fn statement(fx: &Fixture, expr: &Expr) -> Vec<String> {
        listing(&fx.generate(|g| g.codegen_expr(expr)))
    }

    fn messages(fx: &Fixture) -> Vec<String> {
        fx.errors().iter().map(ToString::to_string).collect()
    }

    #[test]
    fn compound_add_on_int_local() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        local(&mut ctx, "i", Type::INT);
        let expr = fx.analyze(
            Expr::assign(AssignOp::AddAssign, Expr::var("i", 1), Expr::int(1, 1), 1).into_statement(),
            &mut ctx,
        );
        assert_eq!(expr.ty, Some(Type::INT));
        assert!(expr.is_statement);
        assert_eq!(statement(&fx, &expr), ["iload_0", "iconst_1", "iadd", "istore_0"]);
    }

    #[test]
    fn assignment_value_is_kept_below_the_receiver() {
        let mut fx = Fixture::new();
        let mut ctx = fx.instance_ctx();
        let expr = fx.analyze(Expr::assign(AssignOp::Assign, Expr::var("count", 1), Expr::int(5, 1), 1), &mut ctx);
        assert_eq!(
            statement(&fx, &expr),
            ["aload_0", "iconst_5", "dup_x1", "putfield Test.count:I"]
        );
    }

    #[test]
    fn shift_assign_into_array_element() {
        let mut fx = Fixture::new();
        let mut ctx = fx.instance_ctx();
        local(&mut ctx, "i", Type::INT);
        let target = Expr::index(Expr::var("values", 1), Expr::var("i", 1), 1);
        let expr = fx.analyze(
            Expr::assign(AssignOp::ShlAssign, target, Expr::long(2, 1), 1).into_statement(),
            &mut ctx,
        );
        assert!(fx.errors().is_empty());
        assert_eq!(
            statement(&fx, &expr),
            [
                "aload_0",
                "getfield Test.values:[I",
                "iload_1",
                "dup2",
                "iaload",
                "ldc2_w 2L",
                "l2i",
                "ishl",
                "iastore",
            ]
        );
    }

    #[test]
    fn compound_converts_right_operand_to_left_type() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        local(&mut ctx, "d", Type::DOUBLE);
        local(&mut ctx, "n", Type::INT);
        let widen = fx.analyze(
            Expr::assign(AssignOp::MulAssign, Expr::var("d", 1), Expr::var("n", 1), 1).into_statement(),
            &mut ctx,
        );
        let narrow = fx.analyze(
            Expr::assign(AssignOp::SubAssign, Expr::var("n", 1), Expr::var("d", 1), 1).into_statement(),
            &mut ctx,
        );
        assert!(fx.errors().is_empty());
        assert_eq!(statement(&fx, &widen), ["dload_0", "iload_2", "i2d", "dmul", "dstore_0"]);
        assert_eq!(statement(&fx, &narrow), ["iload_2", "dload_0", "d2i", "isub", "istore_2"]);
    }

    #[test]
    fn string_add_assign_concatenates() {
        let mut fx = Fixture::new();
        let mut ctx = fx.instance_ctx();
        let expr = fx.analyze(
            Expr::assign(AssignOp::AddAssign, Expr::var("label", 1), Expr::int(1, 1), 1).into_statement(),
            &mut ctx,
        );
        assert_eq!(expr.ty, Some(Type::STRING));
        let ExprKind::Assign(assign) = &expr.kind else {
            panic!("expected assignment");
        };
        assert!(matches!(assign.rhs.kind, ExprKind::StringConcat(_)));

        assert_eq!(
            statement(&fx, &expr),
            [
                "aload_0",
                "new java/lang/StringBuilder",
                "dup",
                "invokespecial java/lang/StringBuilder.<init>:()V",
                "aload_0",
                "getfield Test.label:Ljava/lang/String;",
                "invokevirtual java/lang/StringBuilder.append:(Ljava/lang/String;)Ljava/lang/StringBuilder;",
                "iconst_1",
                "invokevirtual java/lang/StringBuilder.append:(I)Ljava/lang/StringBuilder;",
                "invokevirtual java/lang/StringBuilder.toString:()Ljava/lang/String;",
                "putfield Test.label:Ljava/lang/String;",
            ]
        );
    }

    #[test]
    fn illegal_left_types() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        local(&mut ctx, "b", Type::BOOLEAN);
        local(&mut ctx, "d", Type::DOUBLE);
        local(&mut ctx, "c", Type::CHAR);
        for (op, name) in [
            (AssignOp::AddAssign, "b"),
            (AssignOp::ShlAssign, "d"),
            (AssignOp::XorAssign, "d"),
            (AssignOp::RemAssign, "c"),
        ] {
            let expr = fx.analyze(Expr::assign(op, Expr::var(name, 2), Expr::int(1, 2), 2), &mut ctx);
            assert_eq!(expr.ty, None);
        }
        assert_eq!(
            messages(&fx),
            [
                "line 2: invalid lhs type for +=: boolean",
                "line 2: invalid lhs type for <<=: double",
                "line 2: invalid lhs type for ^=: double",
                "line 2: invalid lhs type for %=: char",
            ]
        );
    }

    #[test]
    fn illegal_right_types() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        local(&mut ctx, "l", Type::LONG);
        local(&mut ctx, "n", Type::INT);
        fx.analyze(Expr::assign(AssignOp::AndAssign, Expr::var("l", 3), Expr::double(1.0, 3), 3), &mut ctx);
        fx.analyze(Expr::assign(AssignOp::DivAssign, Expr::var("n", 4), Expr::bool(true, 4), 4), &mut ctx);
        fx.analyze(Expr::assign(AssignOp::Assign, Expr::var("n", 5), Expr::string("s", 5), 5), &mut ctx);
        fx.analyze(Expr::assign(AssignOp::Assign, Expr::var("n", 6), Expr::long(1, 6), 6), &mut ctx);
        assert_eq!(
            messages(&fx),
            [
                "line 3: type double doesn't match any of the expected types [int, long]",
                "line 4: type boolean doesn't match any of the expected types [int, long, double, float]",
                "line 5: type java.lang.String doesn't match expected type int",
                "line 6: type long doesn't match expected type int",
            ]
        );
    }

    #[test]
    fn references_accept_subtypes_and_null() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        ctx.declare_local("o", Type::OBJECT, 1).unwrap();
        ctx.declare_local("s", Type::STRING, 1).unwrap();
        let o = fx.analyze(Expr::assign(AssignOp::Assign, Expr::var("o", 1), Expr::string("x", 1), 1), &mut ctx);
        let s = fx.analyze(Expr::assign(AssignOp::Assign, Expr::var("s", 1), Expr::null(1), 1), &mut ctx);
        assert_eq!(o.ty, Some(Type::OBJECT));
        assert_eq!(s.ty, Some(Type::STRING));
        assert!(fx.errors().is_empty());
    }

    #[test]
    fn non_location_target_is_an_illegal_lvalue() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        let expr = fx.analyze(Expr::assign(AssignOp::Assign, Expr::int(5, 9), Expr::int(3, 9), 9), &mut ctx);
        assert_eq!(expr.ty, None);
        assert_eq!(fx.errors(), [CompilationError::IllegalLvalue { line: 9 }]);

        let call = Expr::call(None, "half", vec![Expr::double(1.0, 10)], 10);
        fx.analyze(Expr::assign(AssignOp::AddAssign, call, Expr::int(3, 10), 10), &mut ctx);
        assert_eq!(fx.errors().len(), 2);
    }

    #[test]
    fn array_length_is_not_assignable() {
        let mut fx = Fixture::new();
        let mut ctx = fx.instance_ctx();
        let target = Expr::field(Expr::var("values", 4), "length", 4);
        let expr = fx.analyze(Expr::assign(AssignOp::Assign, target, Expr::int(3, 4), 4).into_statement(), &mut ctx);

        assert_eq!(expr.ty, None);
        assert_eq!(fx.errors(), [CompilationError::IllegalLvalue { line: 4 }]);
        let ExprKind::Assign(assign) = &expr.kind else {
            panic!("expected assignment");
        };
        assert!(matches!(assign.lhs.kind, ExprKind::ArrayLength(_)));
    }

    #[test]
    fn assignment_initializes_a_local() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        ctx.declare_local("x", Type::INT, 1).unwrap();

        // The right side is analyzed before the store takes effect.
        let self_referencing = Expr::binary(BinaryOp::Add, Expr::var("x", 1), Expr::int(1, 1), 1);
        fx.analyze(Expr::assign(AssignOp::Assign, Expr::var("x", 1), self_referencing, 1), &mut ctx);
        assert_eq!(fx.errors().len(), 1);

        fx.analyze(Expr::var("x", 2), &mut ctx);
        assert_eq!(fx.errors().len(), 1);
    }
}
