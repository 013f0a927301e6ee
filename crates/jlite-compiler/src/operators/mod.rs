//! Operator rules.
//!
//! This module decides, from resolved operand types alone, whether an
//! operator application is legal, what its result type is, and which
//! instructions implement it:
//! - [`assign`]: the legality table of `=` and the compound assignments
//! - [`arith`]: numeric promotion, conversions and arithmetic opcodes
//! - [`compare`]: branch selection for comparisons and equality tests
//!
//! Nothing here touches the AST or emits code; the expression modules
//! consult these tables during analysis and codegen.

pub mod arith;
pub mod assign;
pub mod compare;

pub use arith::{BinaryResolution, binary_promotion, conversion, resolve_binary, unary_promotion};
pub use assign::{AssignCheck, INTEGRAL, NUMERIC, check_assignment, legal_right_types};
pub use compare::{BranchSelection, EqualityKind, compare_branch, equality_branch, equality_kind, value_branch};
