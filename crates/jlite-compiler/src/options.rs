//! Compiler configuration.

/// Options controlling a compilation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    /// Maximum number of diagnostics kept per unit. Errors past the limit
    /// are still counted.
    pub error_limit: Option<usize>,
    /// Emit a public no-arg `<init>` for classes that declare no constructor.
    pub implicit_constructor: bool,
}

impl Default for CompilerOptions {
    fn default() -> Self {
        Self {
            error_limit: None,
            implicit_constructor: true,
        }
    }
}

impl CompilerOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error_limit(mut self, limit: usize) -> Self {
        self.error_limit = Some(limit);
        self
    }

    pub fn with_implicit_constructor(mut self, enabled: bool) -> Self {
        self.implicit_constructor = enabled;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = CompilerOptions::default();
        assert_eq!(options.error_limit, None);
        assert!(options.implicit_constructor);
    }

    #[test]
    fn builder() {
        let options = CompilerOptions::new()
            .with_error_limit(10)
            .with_implicit_constructor(false);
        assert_eq!(options.error_limit, Some(10));
        assert!(!options.implicit_constructor);
    }
}
