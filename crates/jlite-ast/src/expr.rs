//! Expression nodes.

use jlite_core::Type;

use crate::ops::{AssignOp, BinaryOp, CompareOp, EqualityOp, IncrementOp, LogicalOp, UnaryOp};

/// An expression together with its source line and (after analysis) its type.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr {
    pub kind: ExprKind,
    pub line: u32,
    /// Resolved type. `None` until analysis succeeds for this node.
    pub ty: Option<Type>,
    /// Set when the expression is the whole of an expression statement, so
    /// its value is discarded.
    pub is_statement: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ExprKind {
    Literal(Literal),
    Variable(Variable),
    This,
    FieldAccess(FieldAccess),
    ArrayAccess(ArrayAccess),
    /// `array.length`, produced by analysis from a field access.
    ArrayLength(Box<Expr>),
    Unary(UnaryExpr),
    /// `!operand`
    Not(Box<Expr>),
    Binary(BinaryExpr),
    Comparison(ComparisonExpr),
    Equality(EqualityExpr),
    Logical(LogicalExpr),
    /// String concatenation, produced by analysis from `+` and `+=`.
    StringConcat(StringConcat),
    Assign(AssignExpr),
    Increment(IncrementExpr),
    Call(CallExpr),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Char(u16),
    String(String),
    Null,
}

/// A simple name: a local, a parameter or a field of the enclosing class.
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    pub name: String,
    pub binding: Option<VarBinding>,
}

/// Where a resolved simple name lives.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VarBinding {
    Local { slot: u16 },
    Field(FieldRef),
}

/// A resolved field.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRef {
    pub owner: Type,
    pub ty: Type,
    pub is_static: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldAccess {
    pub target: Box<Expr>,
    pub name: String,
    pub field: Option<FieldRef>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ArrayAccess {
    pub array: Box<Expr>,
    pub index: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonExpr {
    pub op: CompareOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EqualityExpr {
    pub op: EqualityOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LogicalExpr {
    pub op: LogicalOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct StringConcat {
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AssignExpr {
    pub op: AssignOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncrementExpr {
    pub op: IncrementOp,
    pub operand: Box<Expr>,
}

/// A method call. `target` is `None` for unqualified calls.
#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub target: Option<Box<Expr>>,
    pub name: String,
    pub args: Vec<Expr>,
    pub method: Option<MethodRef>,
}

/// A resolved method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodRef {
    pub owner: Type,
    pub descriptor: String,
    pub return_type: Type,
    pub is_static: bool,
    pub is_private: bool,
    pub owner_is_interface: bool,
}

impl Expr {
    pub fn new(kind: ExprKind, line: u32) -> Self {
        Self {
            kind,
            line,
            ty: None,
            is_statement: false,
        }
    }

    /// A node whose type is already known.
    pub fn typed(kind: ExprKind, line: u32, ty: Option<Type>) -> Self {
        Self {
            kind,
            line,
            ty,
            is_statement: false,
        }
    }

    /// Resolved type, or [`Type::ANY`] if analysis has not set one.
    pub fn ty_or_any(&self) -> Type {
        self.ty.unwrap_or(Type::ANY)
    }

    /// Variables, fields and array elements denote storage locations.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Variable(_) | ExprKind::FieldAccess(_) | ExprKind::ArrayAccess(_)
        )
    }

    /// Expressions that can be compiled directly into a conditional jump.
    pub fn has_branch_form(&self) -> bool {
        matches!(
            self.kind,
            ExprKind::Comparison(_)
                | ExprKind::Equality(_)
                | ExprKind::Logical(_)
                | ExprKind::Not(_)
                | ExprKind::Literal(Literal::Bool(_))
        )
    }

    /// Local variable name, if this is a plain name bound to a local slot
    /// (or not yet bound at all).
    pub fn as_variable(&self) -> Option<&Variable> {
        match &self.kind {
            ExprKind::Variable(var) => Some(var),
            _ => None,
        }
    }

    // ==========================================================================
    // Constructors
    // ==========================================================================

    pub fn int(value: i32, line: u32) -> Self {
        Self::new(ExprKind::Literal(Literal::Int(value)), line)
    }

    pub fn long(value: i64, line: u32) -> Self {
        Self::new(ExprKind::Literal(Literal::Long(value)), line)
    }

    pub fn float(value: f32, line: u32) -> Self {
        Self::new(ExprKind::Literal(Literal::Float(value)), line)
    }

    pub fn double(value: f64, line: u32) -> Self {
        Self::new(ExprKind::Literal(Literal::Double(value)), line)
    }

    pub fn bool(value: bool, line: u32) -> Self {
        Self::new(ExprKind::Literal(Literal::Bool(value)), line)
    }

    pub fn char(value: char, line: u32) -> Self {
        let mut units = [0u16; 2];
        let unit = value.encode_utf16(&mut units)[0];
        Self::new(ExprKind::Literal(Literal::Char(unit)), line)
    }

    pub fn string(value: impl Into<String>, line: u32) -> Self {
        Self::new(ExprKind::Literal(Literal::String(value.into())), line)
    }

    pub fn null(line: u32) -> Self {
        Self::new(ExprKind::Literal(Literal::Null), line)
    }

    pub fn var(name: impl Into<String>, line: u32) -> Self {
        Self::new(
            ExprKind::Variable(Variable {
                name: name.into(),
                binding: None,
            }),
            line,
        )
    }

    pub fn this(line: u32) -> Self {
        Self::new(ExprKind::This, line)
    }

    pub fn field(target: Expr, name: impl Into<String>, line: u32) -> Self {
        Self::new(
            ExprKind::FieldAccess(FieldAccess {
                target: Box::new(target),
                name: name.into(),
                field: None,
            }),
            line,
        )
    }

    pub fn index(array: Expr, index: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::ArrayAccess(ArrayAccess {
                array: Box::new(array),
                index: Box::new(index),
            }),
            line,
        )
    }

    pub fn unary(op: UnaryOp, operand: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::Unary(UnaryExpr {
                op,
                operand: Box::new(operand),
            }),
            line,
        )
    }

    pub fn not(operand: Expr, line: u32) -> Self {
        Self::new(ExprKind::Not(Box::new(operand)), line)
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::Binary(BinaryExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }),
            line,
        )
    }

    pub fn compare(op: CompareOp, lhs: Expr, rhs: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::Comparison(ComparisonExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }),
            line,
        )
    }

    pub fn equality(op: EqualityOp, lhs: Expr, rhs: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::Equality(EqualityExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }),
            line,
        )
    }

    pub fn logical(op: LogicalOp, lhs: Expr, rhs: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::Logical(LogicalExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }),
            line,
        )
    }

    pub fn concat(lhs: Expr, rhs: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::StringConcat(StringConcat {
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }),
            line,
        )
    }

    pub fn assign(op: AssignOp, lhs: Expr, rhs: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::Assign(AssignExpr {
                op,
                lhs: Box::new(lhs),
                rhs: Box::new(rhs),
            }),
            line,
        )
    }

    pub fn increment(op: IncrementOp, operand: Expr, line: u32) -> Self {
        Self::new(
            ExprKind::Increment(IncrementExpr {
                op,
                operand: Box::new(operand),
            }),
            line,
        )
    }

    pub fn call(target: Option<Expr>, name: impl Into<String>, args: Vec<Expr>, line: u32) -> Self {
        Self::new(
            ExprKind::Call(CallExpr {
                target: target.map(Box::new),
                name: name.into(),
                args,
                method: None,
            }),
            line,
        )
    }

    /// Mark this expression as a statement (its value is discarded).
    pub fn into_statement(mut self) -> Self {
        self.is_statement = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_expressions_are_untyped() {
        let expr = Expr::int(1, 3);
        assert_eq!(expr.ty, None);
        assert_eq!(expr.ty_or_any(), Type::ANY);
        assert_eq!(expr.line, 3);
        assert!(!expr.is_statement);
    }

    #[test]
    fn assignable_expressions() {
        assert!(Expr::var("x", 1).is_assignable());
        assert!(Expr::field(Expr::this(1), "count", 1).is_assignable());
        assert!(Expr::index(Expr::var("a", 1), Expr::int(0, 1), 1).is_assignable());
        assert!(!Expr::int(1, 1).is_assignable());
        assert!(!Expr::call(None, "f", vec![], 1).is_assignable());
    }

    #[test]
    fn branch_forms() {
        let cmp = Expr::compare(CompareOp::Less, Expr::var("i", 1), Expr::int(10, 1), 1);
        assert!(cmp.has_branch_form());
        assert!(Expr::bool(true, 1).has_branch_form());
        assert!(Expr::not(Expr::var("b", 1), 1).has_branch_form());
        assert!(!Expr::var("b", 1).has_branch_form());
    }

    #[test]
    fn char_literal_is_utf16_unit() {
        let expr = Expr::char('A', 1);
        assert_eq!(expr.kind, ExprKind::Literal(Literal::Char(65)));
    }

    #[test]
    fn statement_marker() {
        let stmt = Expr::assign(AssignOp::Assign, Expr::var("x", 1), Expr::int(1, 1), 1)
            .into_statement();
        assert!(stmt.is_statement);
    }
}
