//! Per-unit diagnostics sink.

use std::fmt;

use crate::{CompilationError, ErrorKind};

/// Collects the semantic errors of one compilation unit.
///
/// A `Diagnostics` value is created per unit and passed by `&mut` through
/// every pass. It is append-only. When an error limit is set, errors past
/// the limit are still counted but no longer stored.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    errors: Vec<CompilationError>,
    limit: Option<usize>,
    suppressed: usize,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink that stores at most `limit` errors.
    pub fn with_limit(limit: Option<usize>) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Record an error.
    pub fn report(&mut self, error: CompilationError) {
        match self.limit {
            Some(limit) if self.errors.len() >= limit => self.suppressed += 1,
            _ => self.errors.push(error),
        }
    }

    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Number of errors reported, including suppressed ones.
    pub fn error_count(&self) -> usize {
        self.errors.len() + self.suppressed
    }

    /// Number of stored errors of the given kind.
    pub fn count(&self, kind: ErrorKind) -> usize {
        self.errors.iter().filter(|e| e.kind() == kind).count()
    }

    /// The stored errors, in report order.
    pub fn errors(&self) -> &[CompilationError] {
        &self.errors
    }

    pub fn iter(&self) -> impl Iterator<Item = &CompilationError> {
        self.errors.iter()
    }

    pub fn into_vec(self) -> Vec<CompilationError> {
        self.errors
    }
}

impl Extend<CompilationError> for Diagnostics {
    fn extend<T: IntoIterator<Item = CompilationError>>(&mut self, iter: T) {
        for error in iter {
            self.report(error);
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for error in &self.errors {
            writeln!(f, "error: {error}")?;
        }
        if self.suppressed > 0 {
            writeln!(f, "... and {} more error(s)", self.suppressed)?;
        }
        Ok(())
    }
}
