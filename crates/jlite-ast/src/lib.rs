//! Abstract syntax tree for jlite compilation units.
//!
//! The parser produces this tree with every type slot empty. Analysis fills
//! in resolved types and bindings and may replace whole subtrees (for
//! example `s + 1` on a `String` becomes a [`StringConcat`] node). Every
//! node owns its children; there is no sharing between nodes.

pub mod decl;
pub mod expr;
pub mod ops;
pub mod stmt;

pub use decl::{
    ClassDecl, ClassKind, CompilationUnit, FieldDecl, FormalParam, FrameInfo, Member, MethodDecl,
    MethodSignature, MethodState, TypeName,
};
pub use expr::{
    ArrayAccess, AssignExpr, BinaryExpr, CallExpr, ComparisonExpr, EqualityExpr, Expr, ExprKind,
    FieldAccess, FieldRef, IncrementExpr, Literal, LogicalExpr, MethodRef, StringConcat,
    UnaryExpr, VarBinding, Variable,
};
pub use ops::{AssignOp, BinaryOp, CompareOp, EqualityOp, IncrementOp, LogicalOp, UnaryOp};
pub use stmt::{
    Block, ExprStmt, ForInit, ForStmt, IfStmt, LocalVarDecl, ReturnStmt, Stmt, VarDeclarator,
    WhileStmt,
};
