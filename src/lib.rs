//! jlite - semantic analysis and JVM code generation for a Java subset.
//!
//! This crate ties the workspace together:
//!
//! - [`core`]: types, the type registry, modifiers and diagnostics
//! - [`ast`]: the tree handed over by the parser
//! - [`compiler`]: the three-pass compiler and the class emitter service
//!
//! plus one-call helpers that compile units into in-memory class images.
//!
//! # Example
//!
//! ```ignore
//! let classes = jlite::compile_unit(&mut unit)?;
//! println!("{}", classes[0].method("main").unwrap().disassemble());
//! ```

pub use jlite_ast as ast;
pub use jlite_compiler as compiler;
pub use jlite_core as core;

pub use jlite_ast::CompilationUnit;
pub use jlite_compiler::{
    ClassEmitter, ClassImage, ClassRecorder, CompilationResult, Compiler, CompilerOptions, MethodImage,
};
pub use jlite_core::{CompilationError, Diagnostics, ErrorKind, Type, TypeRegistry};

use thiserror::Error;

/// Errors returned by the one-call helpers.
#[derive(Debug, Error)]
pub enum Error {
    /// The unit has semantic errors; no classes were generated.
    #[error("{file}: compilation failed with {} error(s)", .diagnostics.error_count())]
    Compilation { file: String, diagnostics: Diagnostics },
}

impl Error {
    pub fn diagnostics(&self) -> &Diagnostics {
        match self {
            Error::Compilation { diagnostics, .. } => diagnostics,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

/// Compile one unit with default options.
pub fn compile_unit(unit: &mut CompilationUnit) -> Result<Vec<ClassImage>> {
    compile_unit_with(&CompilerOptions::default(), unit)
}

/// Compile one unit with `options` against a fresh registry.
#[cfg_attr(feature = "profiling", profiling::function)]
pub fn compile_unit_with(options: &CompilerOptions, unit: &mut CompilationUnit) -> Result<Vec<ClassImage>> {
    let mut compiler = Compiler::new(options.clone());
    compile_with(&mut compiler, unit)
}

fn compile_with(compiler: &mut Compiler, unit: &mut CompilationUnit) -> Result<Vec<ClassImage>> {
    let mut recorder = ClassRecorder::new();
    let result = compiler.compile(unit, &mut recorder);
    if !result.is_success() {
        return Err(Error::Compilation {
            file: unit.file_name.clone(),
            diagnostics: result.diagnostics,
        });
    }
    Ok(recorder.into_classes())
}

/// Compile independent units in parallel, one scoped thread per unit.
///
/// Each unit gets its own copy of the builtin registry, its own
/// diagnostics and its own recorder; units cannot see each other's types.
/// Results are returned in input order.
pub fn compile_units(units: &mut [CompilationUnit], options: &CompilerOptions) -> Vec<Result<Vec<ClassImage>>> {
    let base = TypeRegistry::with_builtins();
    log::debug!("compiling {} unit(s) in parallel", units.len());

    std::thread::scope(|scope| {
        let handles: Vec<_> = units
            .iter_mut()
            .map(|unit| {
                let mut compiler = Compiler::with_registry(options.clone(), base.clone());
                scope.spawn(move || compile_with(&mut compiler, unit))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| handle.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
            .collect()
    })
}
