//! Compiler passes.
//!
//! - [`registration`]: Pass 1 - declare types, resolve fields and stub every method
//! - [`analysis`]: Pass 2 - analyze every method body against the stubbed signatures
//! - [`generation`]: Pass 3 - emit the final classes, only for error-free units

pub mod analysis;
pub mod generation;
pub mod registration;

pub use analysis::{AnalysisOutput, AnalysisPass};
pub use generation::{GenerationOutput, GenerationPass};
pub use registration::{RegistrationOutput, RegistrationPass};
