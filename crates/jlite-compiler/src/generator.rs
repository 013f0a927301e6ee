//! Bytecode generation for analyzed method bodies.
//!
//! A [`CodeGenerator`] translates analyzed statements and expressions into
//! instructions through a [`BytecodeEmitter`]. It only ever sees trees that
//! analyzed without errors, so a missing type or binding here is an
//! internal error rather than a user mistake.

use jlite_ast::Expr;
use jlite_core::{CompilationError, Type, TypeRegistry};

use crate::context::UnitContext;
use crate::emit::{BytecodeEmitter, ClassEmitter};

pub(crate) type Result<T> = std::result::Result<T, CompilationError>;

pub struct CodeGenerator<'a, 'e> {
    pub(crate) registry: &'a TypeRegistry,
    pub(crate) unit: &'a UnitContext,
    pub(crate) class: Type,
    pub(crate) emitter: BytecodeEmitter<'e>,
    /// Declared return type of the method being generated.
    pub(crate) return_type: Type,
}

impl<'a, 'e> CodeGenerator<'a, 'e> {
    pub fn new(registry: &'a TypeRegistry, unit: &'a UnitContext, class: Type, out: &'e mut dyn ClassEmitter) -> Self {
        Self {
            registry,
            unit,
            class,
            emitter: BytecodeEmitter::new(out),
            return_type: Type::VOID,
        }
    }

    pub fn emitter(&mut self) -> &mut BytecodeEmitter<'e> {
        &mut self.emitter
    }

    /// The analyzed type of `expr`.
    pub(crate) fn expr_type(&self, expr: &Expr) -> Result<Type> {
        match expr.ty {
            Some(ty) if ty != Type::ANY => Ok(ty),
            _ => Err(CompilationError::internal(format!(
                "expression at line {} reached code generation without a type",
                expr.line
            ))),
        }
    }

    pub(crate) fn internal_name(&self, ty: Type) -> String {
        self.registry.internal_name(ty).to_string()
    }

    pub(crate) fn descriptor(&self, ty: Type) -> String {
        self.registry.descriptor(ty)
    }

    pub(crate) fn emit_all(&mut self, ops: &[crate::bytecode::OpCode]) {
        for op in ops {
            self.emitter.emit(*op);
        }
    }
}
