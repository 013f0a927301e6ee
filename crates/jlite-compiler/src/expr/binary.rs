//! Arithmetic, bitwise and shift operators, unary operators and string
//! concatenation.

use jlite_ast::{BinaryExpr, BinaryOp, Expr, ExprKind, StringConcat, UnaryExpr, UnaryOp};
use jlite_core::{CompilationError, Type};

use crate::analyzer::Analyzer;
use crate::bytecode::OpCode;
use crate::generator::{CodeGenerator, Result};
use crate::operators::{conversion, resolve_binary, unary_promotion};
use crate::scope::MethodContext;

const STRING_BUILDER: &str = "java/lang/StringBuilder";

impl Analyzer<'_> {
    pub(super) fn analyze_binary(&mut self, binary: BinaryExpr, line: u32, ctx: &mut MethodContext) -> Expr {
        let BinaryExpr { op, lhs, rhs } = binary;
        let lhs = self.analyze_boxed(lhs, ctx);
        let rhs = self.analyze_boxed(rhs, ctx);
        let (left, right) = (lhs.ty_or_any(), rhs.ty_or_any());

        if op == BinaryOp::Add && (left == Type::STRING || right == Type::STRING) {
            self.check_concat_operand(&lhs);
            self.check_concat_operand(&rhs);
            return Expr::typed(ExprKind::StringConcat(StringConcat { lhs, rhs }), line, Some(Type::STRING));
        }

        let ty = if left == Type::ANY || right == Type::ANY {
            Some(Type::ANY)
        } else if let Some(resolution) = resolve_binary(op, left, right) {
            Some(resolution.result_type)
        } else {
            let message = format!(
                "operator {op} cannot be applied to {}, {}",
                self.type_name(left),
                self.type_name(right)
            );
            self.report(CompilationError::type_mismatch(message, line));
            None
        };
        Expr::typed(ExprKind::Binary(BinaryExpr { op, lhs, rhs }), line, ty)
    }

    pub(super) fn analyze_unary(&mut self, unary: UnaryExpr, line: u32, ctx: &mut MethodContext) -> Expr {
        let UnaryExpr { op, operand } = unary;
        let operand = self.analyze_boxed(operand, ctx);
        let operand_ty = operand.ty_or_any();

        let promoted = match op {
            _ if operand_ty == Type::ANY => Some(Type::ANY),
            UnaryOp::BitNot if !operand_ty.is_integral() => None,
            _ => unary_promotion(operand_ty),
        };
        if promoted.is_none() {
            let message = format!("operator {op} cannot be applied to {}", self.type_name(operand_ty));
            self.report(CompilationError::type_mismatch(message, line));
        }
        Expr::typed(ExprKind::Unary(UnaryExpr { op, operand }), line, promoted)
    }

    pub(super) fn analyze_concat(&mut self, concat: StringConcat, line: u32, ctx: &mut MethodContext) -> Expr {
        let lhs = self.analyze_boxed(concat.lhs, ctx);
        let rhs = self.analyze_boxed(concat.rhs, ctx);
        self.check_concat_operand(&lhs);
        self.check_concat_operand(&rhs);
        Expr::typed(ExprKind::StringConcat(StringConcat { lhs, rhs }), line, Some(Type::STRING))
    }

    pub(super) fn check_concat_operand(&mut self, operand: &Expr) {
        if operand.ty == Some(Type::VOID) {
            self.report(CompilationError::type_mismatch("'void' type not allowed here", operand.line));
        }
    }
}

// ============================================================================
// Code generation
// ============================================================================

impl CodeGenerator<'_, '_> {
    pub(super) fn codegen_binary(&mut self, binary: &BinaryExpr, expr: &Expr) -> Result<()> {
        let left = self.expr_type(&binary.lhs)?;
        let right = self.expr_type(&binary.rhs)?;
        let resolution = resolve_binary(binary.op, left, right).ok_or_else(|| {
            CompilationError::internal(format!("unresolved operator {} at line {}", binary.op, expr.line))
        })?;

        self.codegen_expr(&binary.lhs)?;
        self.emit_all(resolution.left_conv);
        self.codegen_expr(&binary.rhs)?;
        self.emit_all(resolution.right_conv);
        self.emitter.emit(resolution.opcode);
        Ok(())
    }

    pub(super) fn codegen_unary(&mut self, unary: &UnaryExpr, expr: &Expr) -> Result<()> {
        let operand_ty = self.expr_type(&unary.operand)?;
        let ty = self.expr_type(expr)?;
        self.codegen_expr(&unary.operand)?;
        self.emit_all(conversion(operand_ty, ty));

        match unary.op {
            UnaryOp::Plus => {}
            UnaryOp::Neg => self.emitter.emit(match ty {
                Type::LONG => OpCode::Lneg,
                Type::FLOAT => OpCode::Fneg,
                Type::DOUBLE => OpCode::Dneg,
                _ => OpCode::Ineg,
            }),
            UnaryOp::BitNot if ty == Type::LONG => {
                self.emitter.emit_long(-1);
                self.emitter.emit(OpCode::Lxor);
            }
            UnaryOp::BitNot => {
                self.emitter.emit(OpCode::IconstM1);
                self.emitter.emit(OpCode::Ixor);
            }
        }
        Ok(())
    }

    /// `new StringBuilder().append(a).append(b)...toString()`, with nested
    /// concatenations flattened into one builder.
    pub(super) fn codegen_concat(&mut self, concat: &StringConcat) -> Result<()> {
        self.emitter.emit_reference(OpCode::New, STRING_BUILDER);
        self.emitter.emit(OpCode::Dup);
        self.emitter.emit_member(OpCode::Invokespecial, STRING_BUILDER, "<init>", "()V");

        let mut parts = Vec::new();
        flatten(concat, &mut parts);
        for part in parts {
            let ty = self.expr_type(part)?;
            self.codegen_expr(part)?;
            let descriptor = format!("({})Ljava/lang/StringBuilder;", append_descriptor(ty));
            self.emitter.emit_member(OpCode::Invokevirtual, STRING_BUILDER, "append", &descriptor);
        }

        self.emitter
            .emit_member(OpCode::Invokevirtual, STRING_BUILDER, "toString", "()Ljava/lang/String;");
        Ok(())
    }
}

fn flatten<'x>(concat: &'x StringConcat, parts: &mut Vec<&'x Expr>) {
    for side in [&concat.lhs, &concat.rhs] {
        match &side.kind {
            ExprKind::StringConcat(inner) => flatten(inner, parts),
            _ => parts.push(side),
        }
    }
}

/// Parameter descriptor of the `StringBuilder.append` overload for `ty`.
fn append_descriptor(ty: Type) -> &'static str {
    match ty {
        Type::INT | Type::SHORT | Type::BYTE => "I",
        Type::CHAR => "C",
        Type::BOOLEAN => "Z",
        Type::LONG => "J",
        Type::FLOAT => "F",
        Type::DOUBLE => "D",
        Type::STRING => "Ljava/lang/String;",
        _ => "Ljava/lang/Object;",
    }
}
