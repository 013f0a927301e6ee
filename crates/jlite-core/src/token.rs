//! Token vocabulary shared with the front end.
//!
//! The lexer and parser live outside this workspace; they hand the compiler
//! an AST whose operators were classified from these token kinds.

use std::fmt;

/// Every kind of token the front end produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Eof,

    // Reserved words
    Abstract,
    Boolean,
    Break,
    Byte,
    Case,
    Catch,
    Char,
    Class,
    Const,
    Continue,
    Default,
    Do,
    Double,
    Else,
    Extends,
    Final,
    Finally,
    Float,
    For,
    Goto,
    If,
    Implements,
    Import,
    Instanceof,
    Int,
    Interface,
    Long,
    Native,
    New,
    Package,
    Private,
    Protected,
    Public,
    Return,
    Short,
    Static,
    Strictfp,
    Super,
    Switch,
    Synchronized,
    This,
    Throw,
    Throws,
    Transient,
    Try,
    Void,
    Volatile,
    While,

    // Comparison and logical operators
    Eq,
    Neq,
    LNot,
    LAnd,
    LOr,
    Gt,
    Ge,
    Lt,
    Le,

    // Arithmetic and bitwise operators
    Dec,
    Inc,
    Minus,
    Plus,
    Star,
    Div,
    Mod,
    ShiftR,
    UShiftR,
    ShiftL,
    Or,
    Xor,
    And,
    Tilde,
    Ternary,

    // Assignment operators
    Assign,
    PlusAssign,
    MinusAssign,
    StarAssign,
    DivAssign,
    ModAssign,
    ShiftLAssign,
    ShiftRAssign,
    UShiftRAssign,
    AndAssign,
    OrAssign,
    XorAssign,

    // Separators
    LParen,
    RParen,
    LCurly,
    RCurly,
    LBrack,
    RBrack,
    Semi,
    Colon,
    Comma,
    Dot,

    // Identifiers and literals
    Identifier,
    Null,
    False,
    True,
    IntLiteral,
    LongLiteral,
    DoubleLiteral,
    FloatLiteral,
    CharLiteral,
    StringLiteral,
}

impl TokenKind {
    /// The literal text of the token, or a `<PLACEHOLDER>` for tokens whose
    /// text varies.
    pub fn image(self) -> &'static str {
        use TokenKind::*;
        match self {
            Eof => "<EOF>",
            Abstract => "abstract",
            Boolean => "boolean",
            Break => "break",
            Byte => "byte",
            Case => "case",
            Catch => "catch",
            Char => "char",
            Class => "class",
            Const => "const",
            Continue => "continue",
            Default => "default",
            Do => "do",
            Double => "double",
            Else => "else",
            Extends => "extends",
            Final => "final",
            Finally => "finally",
            Float => "float",
            For => "for",
            Goto => "goto",
            If => "if",
            Implements => "implements",
            Import => "import",
            Instanceof => "instanceof",
            Int => "int",
            Interface => "interface",
            Long => "long",
            Native => "native",
            New => "new",
            Package => "package",
            Private => "private",
            Protected => "protected",
            Public => "public",
            Return => "return",
            Short => "short",
            Static => "static",
            Strictfp => "strictfp",
            Super => "super",
            Switch => "switch",
            Synchronized => "synchronized",
            This => "this",
            Throw => "throw",
            Throws => "throws",
            Transient => "transient",
            Try => "try",
            Void => "void",
            Volatile => "volatile",
            While => "while",
            Eq => "==",
            Neq => "!=",
            LNot => "!",
            LAnd => "&&",
            LOr => "||",
            Gt => ">",
            Ge => ">=",
            Lt => "<",
            Le => "<=",
            Dec => "--",
            Inc => "++",
            Minus => "-",
            Plus => "+",
            Star => "*",
            Div => "/",
            Mod => "%",
            ShiftR => ">>",
            UShiftR => ">>>",
            ShiftL => "<<",
            Or => "|",
            Xor => "^",
            And => "&",
            Tilde => "~",
            Ternary => "?",
            Assign => "=",
            PlusAssign => "+=",
            MinusAssign => "-=",
            StarAssign => "*=",
            DivAssign => "/=",
            ModAssign => "%=",
            ShiftLAssign => "<<=",
            ShiftRAssign => ">>=",
            UShiftRAssign => ">>>=",
            AndAssign => "&=",
            OrAssign => "|=",
            XorAssign => "^=",
            LParen => "(",
            RParen => ")",
            LCurly => "{",
            RCurly => "}",
            LBrack => "[",
            RBrack => "]",
            Semi => ";",
            Colon => ":",
            Comma => ",",
            Dot => ".",
            Identifier => "<IDENTIFIER>",
            Null => "null",
            False => "false",
            True => "true",
            IntLiteral => "<INT_LITERAL>",
            LongLiteral => "<LONG_LITERAL>",
            DoubleLiteral => "<DOUBLE_LITERAL>",
            FloatLiteral => "<FLOAT_LITERAL>",
            CharLiteral => "<CHAR_LITERAL>",
            StringLiteral => "<STRING_LITERAL>",
        }
    }

    /// Look up the reserved word (or `null`/`true`/`false`) with this text.
    pub fn reserved(word: &str) -> Option<TokenKind> {
        use TokenKind::*;
        Some(match word {
            "abstract" => Abstract,
            "boolean" => Boolean,
            "break" => Break,
            "byte" => Byte,
            "case" => Case,
            "catch" => Catch,
            "char" => Char,
            "class" => Class,
            "const" => Const,
            "continue" => Continue,
            "default" => Default,
            "do" => Do,
            "double" => Double,
            "else" => Else,
            "extends" => Extends,
            "final" => Final,
            "finally" => Finally,
            "float" => Float,
            "for" => For,
            "goto" => Goto,
            "if" => If,
            "implements" => Implements,
            "import" => Import,
            "instanceof" => Instanceof,
            "int" => Int,
            "interface" => Interface,
            "long" => Long,
            "native" => Native,
            "new" => New,
            "package" => Package,
            "private" => Private,
            "protected" => Protected,
            "public" => Public,
            "return" => Return,
            "short" => Short,
            "static" => Static,
            "strictfp" => Strictfp,
            "super" => Super,
            "switch" => Switch,
            "synchronized" => Synchronized,
            "this" => This,
            "throw" => Throw,
            "throws" => Throws,
            "transient" => Transient,
            "try" => Try,
            "void" => Void,
            "volatile" => Volatile,
            "while" => While,
            "null" => Null,
            "true" => True,
            "false" => False,
            _ => return None,
        })
    }

    pub fn is_assignment_operator(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Assign
                | PlusAssign
                | MinusAssign
                | StarAssign
                | DivAssign
                | ModAssign
                | ShiftLAssign
                | ShiftRAssign
                | UShiftRAssign
                | AndAssign
                | OrAssign
                | XorAssign
        )
    }

    pub fn is_comparison_operator(self) -> bool {
        matches!(
            self,
            TokenKind::Gt | TokenKind::Ge | TokenKind::Lt | TokenKind::Le
        )
    }

    /// True for tokens whose image is a placeholder rather than fixed text.
    pub fn has_variable_image(self) -> bool {
        self.image().starts_with('<')
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.image())
    }
}

/// A token as produced by the lexer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenInfo {
    pub kind: TokenKind,
    /// Literal source text. Equal to `kind.image()` for fixed tokens.
    pub image: String,
    pub line: u32,
}

impl TokenInfo {
    pub fn new(kind: TokenKind, image: impl Into<String>, line: u32) -> Self {
        Self {
            kind,
            image: image.into(),
            line,
        }
    }

    /// A token whose text is the kind's fixed image.
    pub fn fixed(kind: TokenKind, line: u32) -> Self {
        Self::new(kind, kind.image(), line)
    }
}
