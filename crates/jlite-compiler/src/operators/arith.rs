//! Arithmetic, bitwise and shift operators on primitives.

use jlite_ast::BinaryOp;
use jlite_core::Type;

use crate::bytecode::OpCode;

/// How a binary operator applies to a pair of operand types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BinaryResolution {
    pub opcode: OpCode,
    /// Conversions applied to the left operand after it is pushed.
    pub left_conv: &'static [OpCode],
    /// Conversions applied to the right operand after it is pushed.
    pub right_conv: &'static [OpCode],
    pub result_type: Type,
}

/// `byte`, `short` and `char` promote to `int`; other numerics stay.
pub fn unary_promotion(ty: Type) -> Option<Type> {
    match ty {
        Type::BYTE | Type::SHORT | Type::CHAR | Type::INT => Some(Type::INT),
        Type::LONG | Type::FLOAT | Type::DOUBLE => Some(ty),
        _ => None,
    }
}

/// The common type of two numeric operands.
pub fn binary_promotion(left: Type, right: Type) -> Option<Type> {
    let (left, right) = (unary_promotion(left)?, unary_promotion(right)?);
    Some(if left == Type::DOUBLE || right == Type::DOUBLE {
        Type::DOUBLE
    } else if left == Type::FLOAT || right == Type::FLOAT {
        Type::FLOAT
    } else if left == Type::LONG || right == Type::LONG {
        Type::LONG
    } else {
        Type::INT
    })
}

/// Instructions converting a value of type `from` on the stack to `to`.
///
/// Empty when no conversion is needed or none exists.
pub fn conversion(from: Type, to: Type) -> &'static [OpCode] {
    use OpCode::*;
    let from = if from.is_int_like() { Type::INT } else { from };
    match (from, to) {
        (Type::INT, Type::LONG) => &[I2l],
        (Type::INT, Type::FLOAT) => &[I2f],
        (Type::INT, Type::DOUBLE) => &[I2d],
        (Type::INT, Type::BYTE) => &[I2b],
        (Type::INT, Type::CHAR) => &[I2c],
        (Type::INT, Type::SHORT) => &[I2s],
        (Type::LONG, Type::INT) => &[L2i],
        (Type::LONG, Type::FLOAT) => &[L2f],
        (Type::LONG, Type::DOUBLE) => &[L2d],
        (Type::LONG, Type::BYTE) => &[L2i, I2b],
        (Type::LONG, Type::CHAR) => &[L2i, I2c],
        (Type::LONG, Type::SHORT) => &[L2i, I2s],
        (Type::FLOAT, Type::INT) => &[F2i],
        (Type::FLOAT, Type::LONG) => &[F2l],
        (Type::FLOAT, Type::DOUBLE) => &[F2d],
        (Type::DOUBLE, Type::INT) => &[D2i],
        (Type::DOUBLE, Type::LONG) => &[D2l],
        (Type::DOUBLE, Type::FLOAT) => &[D2f],
        _ => &[],
    }
}

/// The instruction computing `op` on two operands of type `ty`.
///
/// `ty` must already be promoted (`int`, `long`, `float` or `double`).
pub fn arithmetic_opcode(op: BinaryOp, ty: Type) -> Option<OpCode> {
    use OpCode::*;
    let [int, long, float, double] = match op {
        BinaryOp::Add => [Some(Iadd), Some(Ladd), Some(Fadd), Some(Dadd)],
        BinaryOp::Sub => [Some(Isub), Some(Lsub), Some(Fsub), Some(Dsub)],
        BinaryOp::Mul => [Some(Imul), Some(Lmul), Some(Fmul), Some(Dmul)],
        BinaryOp::Div => [Some(Idiv), Some(Ldiv), Some(Fdiv), Some(Ddiv)],
        BinaryOp::Rem => [Some(Irem), Some(Lrem), Some(Frem), Some(Drem)],
        BinaryOp::BitAnd => [Some(Iand), Some(Land), None, None],
        BinaryOp::BitOr => [Some(Ior), Some(Lor), None, None],
        BinaryOp::BitXor => [Some(Ixor), Some(Lxor), None, None],
        BinaryOp::Shl => [Some(Ishl), Some(Lshl), None, None],
        BinaryOp::Shr => [Some(Ishr), Some(Lshr), None, None],
        BinaryOp::Ushr => [Some(Iushr), Some(Lushr), None, None],
    };
    match ty {
        Type::INT | Type::BOOLEAN => int,
        Type::LONG => long,
        Type::FLOAT => float,
        Type::DOUBLE => double,
        _ => None,
    }
}

/// Resolve `left op right` for primitive operands.
///
/// Returns `None` when the operator is not defined on these types. String
/// concatenation is not handled here.
pub fn resolve_binary(op: BinaryOp, left: Type, right: Type) -> Option<BinaryResolution> {
    if op.is_bitwise() && left == Type::BOOLEAN && right == Type::BOOLEAN {
        return Some(BinaryResolution {
            opcode: arithmetic_opcode(op, Type::BOOLEAN)?,
            left_conv: &[],
            right_conv: &[],
            result_type: Type::BOOLEAN,
        });
    }

    if op.is_shift() {
        if !left.is_integral() || !right.is_integral() {
            return None;
        }
        let result_type = unary_promotion(left)?;
        return Some(BinaryResolution {
            opcode: arithmetic_opcode(op, result_type)?,
            left_conv: conversion(left, result_type),
            right_conv: conversion(right, Type::INT),
            result_type,
        });
    }

    if op.is_bitwise() && (!left.is_integral() || !right.is_integral()) {
        return None;
    }

    let result_type = binary_promotion(left, right)?;
    Some(BinaryResolution {
        opcode: arithmetic_opcode(op, result_type)?,
        left_conv: conversion(left, result_type),
        right_conv: conversion(right, result_type),
        result_type,
    })
}
