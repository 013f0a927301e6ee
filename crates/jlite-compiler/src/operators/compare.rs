//! Branch selection for relational and equality tests.
//!
//! Conditions are compiled straight into conditional jumps: given the
//! operator and whether to jump when the condition holds (`on_true`) or
//! when it fails, these functions pick the compare instruction (if any)
//! and the branch. Jumping on false uses the negated operator, so the two
//! selections for one operator are always complementary.

use jlite_ast::{CompareOp, EqualityOp};
use jlite_core::Type;

use super::arith::binary_promotion;
use crate::bytecode::OpCode;

/// Instructions that test a condition with both operands on the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BranchSelection {
    /// Instruction reducing the operands to -1/0/1, if the type needs one.
    pub compare: Option<OpCode>,
    pub branch: OpCode,
}

/// Select the test for `lhs op rhs` with operands of type `operand`
/// (`int` or `double`).
///
/// Doubles use `dcmpl` for `>` and `>=` and `dcmpg` for `<` and `<=`, so a
/// NaN operand always makes the relation false.
pub fn compare_branch(op: CompareOp, operand: Type, on_true: bool) -> Option<BranchSelection> {
    let tested = if on_true { op } else { op.negate() };
    match operand {
        Type::INT => Some(BranchSelection {
            compare: None,
            branch: match tested {
                CompareOp::Greater => OpCode::IfIcmpgt,
                CompareOp::Less => OpCode::IfIcmplt,
                CompareOp::LessEqual => OpCode::IfIcmple,
                CompareOp::GreaterEqual => OpCode::IfIcmpge,
            },
        }),
        Type::DOUBLE => Some(BranchSelection {
            compare: Some(match op {
                CompareOp::Greater | CompareOp::GreaterEqual => OpCode::Dcmpl,
                CompareOp::Less | CompareOp::LessEqual => OpCode::Dcmpg,
            }),
            branch: sign_branch(tested),
        }),
        _ => None,
    }
}

fn sign_branch(op: CompareOp) -> OpCode {
    match op {
        CompareOp::Greater => OpCode::Ifgt,
        CompareOp::Less => OpCode::Iflt,
        CompareOp::LessEqual => OpCode::Ifle,
        CompareOp::GreaterEqual => OpCode::Ifge,
    }
}

/// How two operands are compared for `==` and `!=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EqualityKind {
    /// Both operands converted to this promoted numeric type.
    Numeric(Type),
    Boolean,
    Reference,
}

/// Classify `left == right`, or `None` if the types cannot be compared.
pub fn equality_kind(left: Type, right: Type) -> Option<EqualityKind> {
    if left == Type::BOOLEAN && right == Type::BOOLEAN {
        return Some(EqualityKind::Boolean);
    }
    if let Some(promoted) = binary_promotion(left, right) {
        return Some(EqualityKind::Numeric(promoted));
    }
    if left.is_reference() && right.is_reference() {
        return Some(EqualityKind::Reference);
    }
    None
}

/// Select the test for `==`/`!=`.
pub fn equality_branch(kind: EqualityKind, op: EqualityOp, on_true: bool) -> BranchSelection {
    let equal = (op == EqualityOp::Equal) == on_true;
    let (compare, if_equal, if_not_equal) = match kind {
        EqualityKind::Boolean | EqualityKind::Numeric(Type::INT) => (None, OpCode::IfIcmpeq, OpCode::IfIcmpne),
        EqualityKind::Reference => (None, OpCode::IfAcmpeq, OpCode::IfAcmpne),
        EqualityKind::Numeric(Type::LONG) => (Some(OpCode::Lcmp), OpCode::Ifeq, OpCode::Ifne),
        EqualityKind::Numeric(Type::FLOAT) => (Some(OpCode::Fcmpl), OpCode::Ifeq, OpCode::Ifne),
        EqualityKind::Numeric(_) => (Some(OpCode::Dcmpl), OpCode::Ifeq, OpCode::Ifne),
    };
    BranchSelection {
        compare,
        branch: if equal { if_equal } else { if_not_equal },
    }
}

/// Branch on an `int` 0/1 value already on the stack.
pub fn value_branch(on_true: bool) -> OpCode {
    if on_true { OpCode::Ifne } else { OpCode::Ifeq }
}
