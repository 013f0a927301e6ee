//! Statement nodes.

use crate::decl::TypeName;
use crate::expr::Expr;

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Block(Block),
    LocalVar(LocalVarDecl),
    Expr(ExprStmt),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(ReturnStmt),
    Break { line: u32 },
    Continue { line: u32 },
    Empty { line: u32 },
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Block {
    pub stmts: Vec<Stmt>,
    pub line: u32,
}

/// `Type a = 1, b;`
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVarDecl {
    pub ty: TypeName,
    pub declarators: Vec<VarDeclarator>,
    pub line: u32,
    /// Initializers rewritten into assignment statements by analysis.
    pub initializers: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDeclarator {
    pub name: String,
    pub init: Option<Expr>,
    pub line: u32,
    /// Local slot assigned by analysis.
    pub slot: Option<u16>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExprStmt {
    pub expr: Expr,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IfStmt {
    pub condition: Expr,
    pub then_branch: Box<Stmt>,
    pub else_branch: Option<Box<Stmt>>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct WhileStmt {
    pub condition: Expr,
    pub body: Box<Stmt>,
    pub line: u32,
}

/// Initializer part of a `for` statement.
#[derive(Debug, Clone, PartialEq)]
pub enum ForInit {
    /// Statement expressions such as `i = 0, j = 10`.
    Expressions(Vec<Expr>),
    /// A local variable declaration such as `int i = 0, j = 10`.
    Declaration(LocalVarDecl),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForStmt {
    pub init: Option<ForInit>,
    pub condition: Option<Expr>,
    pub update: Vec<Expr>,
    pub body: Box<Stmt>,
    pub line: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub line: u32,
}

impl Stmt {
    pub fn line(&self) -> u32 {
        match self {
            Stmt::Block(b) => b.line,
            Stmt::LocalVar(d) => d.line,
            Stmt::Expr(s) => s.line,
            Stmt::If(s) => s.line,
            Stmt::While(s) => s.line,
            Stmt::For(s) => s.line,
            Stmt::Return(s) => s.line,
            Stmt::Break { line } | Stmt::Continue { line } | Stmt::Empty { line } => *line,
        }
    }

    // ==========================================================================
    // Constructors
    // ==========================================================================

    pub fn block(stmts: Vec<Stmt>, line: u32) -> Self {
        Stmt::Block(Block { stmts, line })
    }

    pub fn expr(expr: Expr) -> Self {
        let line = expr.line;
        Stmt::Expr(ExprStmt { expr, line })
    }

    /// A single-declarator local variable declaration.
    pub fn local(ty: TypeName, name: impl Into<String>, init: Option<Expr>, line: u32) -> Self {
        Stmt::LocalVar(LocalVarDecl::single(ty, name, init, line))
    }

    pub fn if_else(condition: Expr, then_branch: Stmt, else_branch: Option<Stmt>, line: u32) -> Self {
        Stmt::If(IfStmt {
            condition,
            then_branch: Box::new(then_branch),
            else_branch: else_branch.map(Box::new),
            line,
        })
    }

    pub fn while_loop(condition: Expr, body: Stmt, line: u32) -> Self {
        Stmt::While(WhileStmt {
            condition,
            body: Box::new(body),
            line,
        })
    }

    pub fn for_loop(
        init: Option<ForInit>,
        condition: Option<Expr>,
        update: Vec<Expr>,
        body: Stmt,
        line: u32,
    ) -> Self {
        Stmt::For(ForStmt {
            init,
            condition,
            update,
            body: Box::new(body),
            line,
        })
    }

    pub fn ret(value: Option<Expr>, line: u32) -> Self {
        Stmt::Return(ReturnStmt { value, line })
    }
}

impl LocalVarDecl {
    pub fn new(ty: TypeName, declarators: Vec<VarDeclarator>, line: u32) -> Self {
        Self {
            ty,
            declarators,
            line,
            initializers: Vec::new(),
        }
    }

    pub fn single(ty: TypeName, name: impl Into<String>, init: Option<Expr>, line: u32) -> Self {
        Self::new(ty, vec![VarDeclarator::new(name, init, line)], line)
    }
}

impl VarDeclarator {
    pub fn new(name: impl Into<String>, init: Option<Expr>, line: u32) -> Self {
        Self {
            name: name.into(),
            init,
            line,
            slot: None,
        }
    }
}
