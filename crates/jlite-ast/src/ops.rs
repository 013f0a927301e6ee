//! Operator enums.
//!
//! Each operator family is a plain tag; the rules attached to the tags
//! (legal operand types, opcodes) live in the compiler.

use std::fmt;

use jlite_core::TokenKind;

/// Arithmetic, bitwise and shift operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Rem,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>`
    Shr,
    /// `>>>`
    Ushr,
}

impl BinaryOp {
    pub fn from_token(token: TokenKind) -> Option<Self> {
        use BinaryOp::*;
        Some(match token {
            TokenKind::Plus => Add,
            TokenKind::Minus => Sub,
            TokenKind::Star => Mul,
            TokenKind::Div => Div,
            TokenKind::Mod => Rem,
            TokenKind::And => BitAnd,
            TokenKind::Or => BitOr,
            TokenKind::Xor => BitXor,
            TokenKind::ShiftL => Shl,
            TokenKind::ShiftR => Shr,
            TokenKind::UShiftR => Ushr,
            _ => return None,
        })
    }

    pub fn is_shift(self) -> bool {
        matches!(self, BinaryOp::Shl | BinaryOp::Shr | BinaryOp::Ushr)
    }

    pub fn is_bitwise(self) -> bool {
        matches!(self, BinaryOp::BitAnd | BinaryOp::BitOr | BinaryOp::BitXor)
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOp::*;
        let s = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Rem => "%",
            BitAnd => "&",
            BitOr => "|",
            BitXor => "^",
            Shl => "<<",
            Shr => ">>",
            Ushr => ">>>",
        };
        f.write_str(s)
    }
}

/// Relational operators over `int` or `double`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    /// `>`
    Greater,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>=`
    GreaterEqual,
}

impl CompareOp {
    pub const ALL: [CompareOp; 4] = [
        CompareOp::Greater,
        CompareOp::Less,
        CompareOp::LessEqual,
        CompareOp::GreaterEqual,
    ];

    pub fn from_token(token: TokenKind) -> Option<Self> {
        Some(match token {
            TokenKind::Gt => CompareOp::Greater,
            TokenKind::Lt => CompareOp::Less,
            TokenKind::Le => CompareOp::LessEqual,
            TokenKind::Ge => CompareOp::GreaterEqual,
            _ => return None,
        })
    }

    /// The logical negation: `>` becomes `<=`, `<` becomes `>=`.
    pub fn negate(self) -> Self {
        match self {
            CompareOp::Greater => CompareOp::LessEqual,
            CompareOp::Less => CompareOp::GreaterEqual,
            CompareOp::LessEqual => CompareOp::Greater,
            CompareOp::GreaterEqual => CompareOp::Less,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CompareOp::Greater => ">",
            CompareOp::Less => "<",
            CompareOp::LessEqual => "<=",
            CompareOp::GreaterEqual => ">=",
        };
        f.write_str(s)
    }
}

/// `==` and `!=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EqualityOp {
    Equal,
    NotEqual,
}

impl EqualityOp {
    pub fn negate(self) -> Self {
        match self {
            EqualityOp::Equal => EqualityOp::NotEqual,
            EqualityOp::NotEqual => EqualityOp::Equal,
        }
    }
}

impl fmt::Display for EqualityOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            EqualityOp::Equal => "==",
            EqualityOp::NotEqual => "!=",
        })
    }
}

/// Short-circuit `&&` and `||`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalOp {
    And,
    Or,
}

impl fmt::Display for LogicalOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LogicalOp::And => "&&",
            LogicalOp::Or => "||",
        })
    }
}

/// Numeric prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `-x`
    Neg,
    /// `+x`
    Plus,
    /// `~x`
    BitNot,
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnaryOp::Neg => "-",
            UnaryOp::Plus => "+",
            UnaryOp::BitNot => "~",
        })
    }
}

/// `++` and `--` in prefix or postfix position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncrementOp {
    PreIncrement,
    PreDecrement,
    PostIncrement,
    PostDecrement,
}

impl IncrementOp {
    pub fn is_prefix(self) -> bool {
        matches!(self, IncrementOp::PreIncrement | IncrementOp::PreDecrement)
    }

    /// +1 or -1.
    pub fn delta(self) -> i16 {
        match self {
            IncrementOp::PreIncrement | IncrementOp::PostIncrement => 1,
            IncrementOp::PreDecrement | IncrementOp::PostDecrement => -1,
        }
    }
}

impl fmt::Display for IncrementOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.delta() > 0 { "++" } else { "--" })
    }
}

/// Plain assignment and the compound assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `=`
    Assign,
    /// `+=`
    AddAssign,
    /// `-=`
    SubAssign,
    /// `*=`
    MulAssign,
    /// `/=`
    DivAssign,
    /// `%=`
    RemAssign,
    /// `<<=`
    ShlAssign,
    /// `>>=`
    ShrAssign,
    /// `>>>=`
    UshrAssign,
    /// `&=`
    AndAssign,
    /// `|=`
    OrAssign,
    /// `^=`
    XorAssign,
}

impl AssignOp {
    pub const ALL: [AssignOp; 12] = [
        AssignOp::Assign,
        AssignOp::AddAssign,
        AssignOp::SubAssign,
        AssignOp::MulAssign,
        AssignOp::DivAssign,
        AssignOp::RemAssign,
        AssignOp::ShlAssign,
        AssignOp::ShrAssign,
        AssignOp::UshrAssign,
        AssignOp::AndAssign,
        AssignOp::OrAssign,
        AssignOp::XorAssign,
    ];

    /// Try to convert a token kind to an assignment operator.
    pub fn from_token(token: TokenKind) -> Option<Self> {
        use AssignOp::*;
        Some(match token {
            TokenKind::Assign => Assign,
            TokenKind::PlusAssign => AddAssign,
            TokenKind::MinusAssign => SubAssign,
            TokenKind::StarAssign => MulAssign,
            TokenKind::DivAssign => DivAssign,
            TokenKind::ModAssign => RemAssign,
            TokenKind::ShiftLAssign => ShlAssign,
            TokenKind::ShiftRAssign => ShrAssign,
            TokenKind::UShiftRAssign => UshrAssign,
            TokenKind::AndAssign => AndAssign,
            TokenKind::OrAssign => OrAssign,
            TokenKind::XorAssign => XorAssign,
            _ => return None,
        })
    }

    /// Check if this is a simple assignment (not compound).
    pub fn is_simple(self) -> bool {
        matches!(self, Self::Assign)
    }

    /// The arithmetic operator a compound assignment applies.
    pub fn binary_op(self) -> Option<BinaryOp> {
        use AssignOp::*;
        Some(match self {
            Assign => return None,
            AddAssign => BinaryOp::Add,
            SubAssign => BinaryOp::Sub,
            MulAssign => BinaryOp::Mul,
            DivAssign => BinaryOp::Div,
            RemAssign => BinaryOp::Rem,
            ShlAssign => BinaryOp::Shl,
            ShrAssign => BinaryOp::Shr,
            UshrAssign => BinaryOp::Ushr,
            AndAssign => BinaryOp::BitAnd,
            OrAssign => BinaryOp::BitOr,
            XorAssign => BinaryOp::BitXor,
        })
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.binary_op() {
            None => f.write_str("="),
            Some(op) => write!(f, "{op}="),
        }
    }
}
