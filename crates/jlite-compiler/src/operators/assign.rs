//! Legality table of the assignment operators.
//!
//! Every compound operator is one row: the left types it accepts, the right
//! types it accepts, and whether a `String` left operand turns it into
//! concatenation. The result of a legal compound assignment is always the
//! left type.

use jlite_ast::AssignOp;
use jlite_core::{Type, TypeRegistry};

/// Operand types of the arithmetic compound assignments.
pub const NUMERIC: &[Type] = &[Type::INT, Type::LONG, Type::DOUBLE, Type::FLOAT];

/// Operand types of the bitwise and shift compound assignments.
pub const INTEGRAL: &[Type] = &[Type::INT, Type::LONG];

struct AssignRule {
    op: AssignOp,
    left: &'static [Type],
    right: &'static [Type],
    string_concat: bool,
}

const fn rule(op: AssignOp, left: &'static [Type], right: &'static [Type]) -> AssignRule {
    AssignRule {
        op,
        left,
        right,
        string_concat: false,
    }
}

const COMPOUND_RULES: [AssignRule; 11] = [
    AssignRule {
        op: AssignOp::AddAssign,
        left: NUMERIC,
        right: NUMERIC,
        string_concat: true,
    },
    rule(AssignOp::SubAssign, NUMERIC, NUMERIC),
    rule(AssignOp::MulAssign, NUMERIC, NUMERIC),
    rule(AssignOp::DivAssign, NUMERIC, NUMERIC),
    rule(AssignOp::RemAssign, NUMERIC, NUMERIC),
    rule(AssignOp::ShlAssign, INTEGRAL, INTEGRAL),
    rule(AssignOp::ShrAssign, INTEGRAL, INTEGRAL),
    rule(AssignOp::UshrAssign, INTEGRAL, INTEGRAL),
    rule(AssignOp::AndAssign, INTEGRAL, INTEGRAL),
    rule(AssignOp::OrAssign, INTEGRAL, INTEGRAL),
    rule(AssignOp::XorAssign, INTEGRAL, INTEGRAL),
];

/// Outcome of checking an assignment's operand types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssignCheck {
    /// Legal; the assignment has this type.
    Ok(Type),
    /// `String += anything`: rewrite the right side into a concatenation.
    Concat,
    /// The left type is outside the operator's legal set.
    BadLeft,
    /// The right type is outside the legal set for this left type.
    BadRight,
}

/// Check `left op right`.
///
/// A left operand of type `ANY` (already reported) is accepted with result
/// `ANY` without looking at the right side.
pub fn check_assignment(registry: &TypeRegistry, op: AssignOp, left: Type, right: Type) -> AssignCheck {
    if left == Type::ANY {
        return AssignCheck::Ok(Type::ANY);
    }

    if op.is_simple() {
        let legal = right.matches_expected(left)
            || (left.is_reference() && right.is_reference() && registry.is_assignable_from(left, right));
        return if legal { AssignCheck::Ok(left) } else { AssignCheck::BadRight };
    }

    let Some(rule) = COMPOUND_RULES.iter().find(|r| r.op == op) else {
        return AssignCheck::BadLeft;
    };
    if rule.string_concat && left == Type::STRING {
        return AssignCheck::Concat;
    }
    if !rule.left.contains(&left) {
        return AssignCheck::BadLeft;
    }
    if !right.matches_one_of(rule.right) {
        return AssignCheck::BadRight;
    }
    AssignCheck::Ok(left)
}

/// Right operand types accepted by `op` when its left side is legal.
pub fn legal_right_types(op: AssignOp) -> &'static [Type] {
    COMPOUND_RULES
        .iter()
        .find(|r| r.op == op)
        .map(|r| r.right)
        .unwrap_or(&[])
}
