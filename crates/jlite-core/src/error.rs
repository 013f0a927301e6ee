//! Semantic error types.
//!
//! Every problem analysis can find in a compilation unit is a
//! [`CompilationError`]. Errors never abort a pass: they are recorded in a
//! [`Diagnostics`](crate::Diagnostics) sink and analysis continues with a
//! best-effort result.
//!
//! ## Categories
//!
//! ```text
//! ErrorKind
//! ├── IllegalLvalue      - assignment target is not a storage location
//! ├── TypeMismatch       - operand type outside an operator's legal set
//! ├── InvalidModifiers   - illegal modifier/body combination
//! ├── MissingReturn      - non-void method without a guaranteed return
//! ├── InvalidThrowsType  - declared exception is not a Throwable
//! ├── Resolution         - unknown or duplicate names, uninitialized locals
//! ├── ControlFlow        - break/continue outside of a loop
//! └── Internal           - compiler invariant violated
//! ```

use thiserror::Error;

/// Coarse category of a [`CompilationError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    IllegalLvalue,
    TypeMismatch,
    InvalidModifiers,
    MissingReturn,
    InvalidThrowsType,
    Resolution,
    ControlFlow,
    Internal,
}

/// Errors found during semantic analysis.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompilationError {
    /// The left side of an assignment does not denote a storage location.
    #[error("line {line}: illegal lhs for assignment")]
    IllegalLvalue { line: u32 },

    /// An operand's type is not accepted by the operator or context.
    #[error("line {line}: {message}")]
    TypeMismatch { message: String, line: u32 },

    /// A method's modifiers contradict each other or its body.
    #[error("line {line}: {message}")]
    InvalidModifiers { message: String, line: u32 },

    /// A non-void method can complete without returning a value.
    #[error("line {line}: non-void method '{method}' must have a return statement")]
    MissingReturn { method: String, line: u32 },

    /// A `throws` clause names a type that is not a Throwable.
    #[error("line {line}: throw type must be of type Throwable: \"{type_name}\"")]
    InvalidThrowsType { type_name: String, line: u32 },

    /// A type name could not be resolved.
    #[error("line {line}: unknown type '{name}'")]
    UnknownType { name: String, line: u32 },

    /// A name is neither a local variable nor a field.
    #[error("line {line}: cannot find variable '{name}'")]
    UnknownVariable { name: String, line: u32 },

    /// A field does not exist on the target type.
    #[error("line {line}: cannot find field '{name}' in type '{type_name}'")]
    UnknownField {
        name: String,
        type_name: String,
        line: u32,
    },

    /// No method matches the name and argument types.
    #[error("line {line}: cannot find method '{name}({args})'")]
    UnknownMethod { name: String, args: String, line: u32 },

    /// A local variable is read before it is definitely assigned.
    #[error("line {line}: variable '{name}' might not have been initialized")]
    UninitializedVariable { name: String, line: u32 },

    /// A name is declared twice in the same scope.
    #[error("line {line}: {kind} '{name}' is already defined")]
    DuplicateDefinition {
        kind: &'static str,
        name: String,
        line: u32,
    },

    /// Operation not allowed in this context.
    #[error("line {line}: {message}")]
    InvalidOperation { message: String, line: u32 },

    /// `break` outside of a loop.
    #[error("line {line}: break outside of a loop")]
    BreakOutsideLoop { line: u32 },

    /// `continue` outside of a loop.
    #[error("line {line}: continue outside of a loop")]
    ContinueOutsideLoop { line: u32 },

    /// Internal compiler error.
    #[error("internal compiler error: {message}")]
    Internal { message: String },
}

impl CompilationError {
    /// Source line the error is reported against (0 for internal errors).
    pub fn line(&self) -> u32 {
        match self {
            CompilationError::IllegalLvalue { line } => *line,
            CompilationError::TypeMismatch { line, .. } => *line,
            CompilationError::InvalidModifiers { line, .. } => *line,
            CompilationError::MissingReturn { line, .. } => *line,
            CompilationError::InvalidThrowsType { line, .. } => *line,
            CompilationError::UnknownType { line, .. } => *line,
            CompilationError::UnknownVariable { line, .. } => *line,
            CompilationError::UnknownField { line, .. } => *line,
            CompilationError::UnknownMethod { line, .. } => *line,
            CompilationError::UninitializedVariable { line, .. } => *line,
            CompilationError::DuplicateDefinition { line, .. } => *line,
            CompilationError::InvalidOperation { line, .. } => *line,
            CompilationError::BreakOutsideLoop { line } => *line,
            CompilationError::ContinueOutsideLoop { line } => *line,
            CompilationError::Internal { .. } => 0,
        }
    }

    /// Category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CompilationError::IllegalLvalue { .. } => ErrorKind::IllegalLvalue,
            CompilationError::TypeMismatch { .. } | CompilationError::InvalidOperation { .. } => {
                ErrorKind::TypeMismatch
            }
            CompilationError::InvalidModifiers { .. } => ErrorKind::InvalidModifiers,
            CompilationError::MissingReturn { .. } => ErrorKind::MissingReturn,
            CompilationError::InvalidThrowsType { .. } => ErrorKind::InvalidThrowsType,
            CompilationError::UnknownType { .. }
            | CompilationError::UnknownVariable { .. }
            | CompilationError::UnknownField { .. }
            | CompilationError::UnknownMethod { .. }
            | CompilationError::UninitializedVariable { .. }
            | CompilationError::DuplicateDefinition { .. } => ErrorKind::Resolution,
            CompilationError::BreakOutsideLoop { .. }
            | CompilationError::ContinueOutsideLoop { .. } => ErrorKind::ControlFlow,
            CompilationError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Shorthand for a [`CompilationError::TypeMismatch`].
    pub fn type_mismatch(message: impl Into<String>, line: u32) -> Self {
        CompilationError::TypeMismatch {
            message: message.into(),
            line,
        }
    }

    /// Shorthand for a [`CompilationError::InvalidModifiers`].
    pub fn invalid_modifiers(message: impl Into<String>, line: u32) -> Self {
        CompilationError::InvalidModifiers {
            message: message.into(),
            line,
        }
    }

    /// Shorthand for a [`CompilationError::Internal`].
    pub fn internal(message: impl Into<String>) -> Self {
        CompilationError::Internal {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_line() {
        let err = CompilationError::IllegalLvalue { line: 7 };
        assert_eq!(err.to_string(), "line 7: illegal lhs for assignment");
        assert_eq!(err.line(), 7);
    }

    #[test]
    fn throws_message() {
        let err = CompilationError::InvalidThrowsType {
            type_name: "java.lang.String".into(),
            line: 3,
        };
        assert_eq!(
            err.to_string(),
            "line 3: throw type must be of type Throwable: \"java.lang.String\""
        );
        assert_eq!(err.kind(), ErrorKind::InvalidThrowsType);
    }

    #[test]
    fn kinds() {
        assert_eq!(
            CompilationError::type_mismatch("bad", 1).kind(),
            ErrorKind::TypeMismatch
        );
        assert_eq!(
            CompilationError::UnknownType {
                name: "Foo".into(),
                line: 1
            }
            .kind(),
            ErrorKind::Resolution
        );
        assert_eq!(
            CompilationError::BreakOutsideLoop { line: 1 }.kind(),
            ErrorKind::ControlFlow
        );
        assert_eq!(CompilationError::internal("x").line(), 0);
    }
}
