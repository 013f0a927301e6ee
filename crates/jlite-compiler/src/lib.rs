//! jlite Compiler
//!
//! Semantic analysis and JVM code generation for jlite compilation units.
//!
//! ## Architecture
//!
//! - **Pass 1 (Registration)**: declare every type, resolve fields and stub
//!   every method into a partial class
//! - **Pass 2 (Analysis)**: type check method bodies against the stubbed
//!   signatures, rewriting nodes where needed
//! - **Pass 3 (Generation)**: emit the final classes; skipped entirely when
//!   any error was reported
//!
//! ## Modules
//!
//! - [`bytecode`]: JVM opcodes and the constant pool
//! - [`context`]: class and unit contexts (fields and method signatures)
//! - [`emit`]: the class emitter service, its recorder, and typed emission helpers
//! - [`method`]: method declarations through their compilation states
//! - [`operators`]: legality and instruction selection for every operator
//! - [`passes`]: the three passes
//! - [`scope`]: the method context (locals, slots, return tracking)
//! - [`type_resolver`]: source type names to registered types

mod analyzer;
pub mod bytecode;
pub mod context;
pub mod emit;
mod expr;
mod generator;
pub mod method;
pub mod operators;
pub mod options;
pub mod passes;
pub mod scope;
mod stmt;
pub mod type_resolver;

#[cfg(test)]
mod testing;

pub use analyzer::Analyzer;
pub use context::{ClassContext, FieldEntry, MethodEntry, UnitContext};
pub use emit::{BreakError, BytecodeEmitter, ClassEmitter, ClassImage, ClassRecorder, Instruction, Label, MethodImage};
pub use generator::CodeGenerator;
pub use options::CompilerOptions;
pub use passes::{AnalysisPass, GenerationPass, RegistrationPass};
pub use scope::{LocalVar, MethodContext};
pub use type_resolver::TypeResolver;

pub use jlite_core::{CompilationError, Diagnostics};

use jlite_ast::CompilationUnit;
use jlite_core::TypeRegistry;

/// Result of compiling one unit.
#[derive(Debug)]
pub struct CompilationResult {
    /// Every error reported for the unit.
    pub diagnostics: Diagnostics,
    /// Stub classes produced by registration.
    pub partial_classes: Vec<ClassImage>,
    /// Whether final classes were emitted.
    pub code_generated: bool,
}

impl CompilationResult {
    pub fn is_success(&self) -> bool {
        self.code_generated && !self.diagnostics.has_errors()
    }
}

/// Compiles units against a type registry.
///
/// Types declared by a unit stay in the registry, so later units compiled
/// by the same `Compiler` can refer to them.
#[derive(Debug, Clone)]
pub struct Compiler {
    options: CompilerOptions,
    registry: TypeRegistry,
}

impl Default for Compiler {
    fn default() -> Self {
        Self::new(CompilerOptions::default())
    }
}

impl Compiler {
    pub fn new(options: CompilerOptions) -> Self {
        Self::with_registry(options, TypeRegistry::with_builtins())
    }

    pub fn with_registry(options: CompilerOptions, registry: TypeRegistry) -> Self {
        Self { options, registry }
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    /// Compile `unit`, emitting its final classes into `output`.
    ///
    /// The unit's declarations are updated in place: resolved types,
    /// signatures, method states and analyzed bodies.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn compile(&mut self, unit: &mut CompilationUnit, output: &mut dyn ClassEmitter) -> CompilationResult {
        let mut diagnostics = Diagnostics::with_limit(self.options.error_limit);

        let registration = RegistrationPass::new(&mut self.registry, &mut diagnostics, &self.options).run(unit);
        AnalysisPass::new(&mut self.registry, &registration.classes, &mut diagnostics).run(unit);

        let code_generated = if diagnostics.has_errors() {
            log::debug!(
                "skipping code generation for '{}': {} error(s)",
                unit.file_name,
                diagnostics.error_count()
            );
            false
        } else {
            match GenerationPass::new(&self.registry, &registration.classes, &self.options, output).run(unit) {
                Ok(_) => true,
                Err(error) => {
                    diagnostics.report(error);
                    false
                }
            }
        };

        CompilationResult {
            diagnostics,
            partial_classes: registration.partial_classes,
            code_generated,
        }
    }
}
