//! Shared fixture for analysis and codegen unit tests.
//!
//! Sets up a unit containing:
//!
//! ```text
//! interface Shape { double area(); }
//!
//! class Test {
//!     int count;
//!     static long total;
//!     String label;
//!     int[] values;
//!     Shape shape;
//!
//!     int twice(int n);
//!     static void log(String message);
//!     static double half(double d);
//!     private int secret();
//! }
//! ```

use jlite_ast::{ClassKind, Expr, Stmt};
use jlite_core::{CompilationError, Diagnostics, Modifiers, Type, TypeKind, TypeRegistry};

use crate::analyzer::Analyzer;
use crate::context::{ClassContext, FieldEntry, MethodEntry, UnitContext};
use crate::emit::{ClassRecorder, Instruction};
use crate::generator::{CodeGenerator, Result};
use crate::scope::MethodContext;

pub(crate) struct Fixture {
    pub registry: TypeRegistry,
    pub unit: UnitContext,
    pub class: Type,
    pub shape: Type,
    pub diagnostics: Diagnostics,
}

impl Fixture {
    pub fn new() -> Self {
        let mut registry = TypeRegistry::with_builtins();
        let class = registry.register_class("Test", TypeKind::Class, Some(Type::OBJECT), Vec::new());
        registry.add_alias("Test", class);
        let shape = registry.register_class("Shape", TypeKind::Interface, Some(Type::OBJECT), Vec::new());
        registry.add_alias("Shape", shape);
        let int_array = registry.array_of(Type::INT);

        let mut shape_ctx = ClassContext::new(shape, "Shape", "Shape", ClassKind::Interface, Modifiers::PUBLIC);
        let area = method(&registry, "area", vec![], Type::DOUBLE, Modifiers::PUBLIC | Modifiers::ABSTRACT);
        shape_ctx.add_method(area).unwrap();

        let mut test = ClassContext::new(class, "Test", "Test", ClassKind::Class, Modifiers::PUBLIC);
        for (name, ty, mods) in [
            ("count", Type::INT, Modifiers::empty()),
            ("total", Type::LONG, Modifiers::STATIC),
            ("label", Type::STRING, Modifiers::empty()),
            ("values", int_array, Modifiers::empty()),
            ("shape", shape, Modifiers::empty()),
        ] {
            test.add_field(FieldEntry {
                name: name.to_string(),
                ty,
                mods,
                line: 1,
            })
            .unwrap();
        }
        for entry in [
            method(&registry, "twice", vec![Type::INT], Type::INT, Modifiers::empty()),
            method(&registry, "log", vec![Type::STRING], Type::VOID, Modifiers::STATIC),
            method(&registry, "half", vec![Type::DOUBLE], Type::DOUBLE, Modifiers::STATIC),
            method(&registry, "secret", vec![], Type::INT, Modifiers::PRIVATE),
        ] {
            test.add_method(entry).unwrap();
        }

        let mut unit = UnitContext::new(None);
        unit.add_class(shape_ctx);
        unit.add_class(test);

        Self {
            registry,
            unit,
            class,
            shape,
            diagnostics: Diagnostics::new(),
        }
    }

    pub fn static_ctx(&self) -> MethodContext {
        MethodContext::new(Type::VOID, Vec::new(), true)
    }

    pub fn instance_ctx(&self) -> MethodContext {
        MethodContext::new(Type::VOID, Vec::new(), false)
    }

    pub fn array_of(&mut self, element: Type) -> Type {
        self.registry.array_of(element)
    }

    pub fn analyzer(&mut self) -> Analyzer<'_> {
        Analyzer::new(&mut self.registry, &self.unit, self.class, &mut self.diagnostics)
    }

    pub fn analyze(&mut self, expr: Expr, ctx: &mut MethodContext) -> Expr {
        self.analyzer().analyze_expr(expr, ctx)
    }

    pub fn analyze_stmt(&mut self, stmt: Stmt, ctx: &mut MethodContext) -> Stmt {
        self.analyzer().analyze_stmt(stmt, ctx)
    }

    pub fn errors(&self) -> &[CompilationError] {
        self.diagnostics.errors()
    }

    /// Run `f` inside a fresh `void` method and return its instructions.
    pub fn generate(&self, f: impl FnOnce(&mut CodeGenerator<'_, '_>) -> Result<()>) -> Vec<Instruction> {
        let mut recorder = ClassRecorder::new();
        {
            let mut generator = CodeGenerator::new(&self.registry, &self.unit, self.class, &mut recorder);
            generator.emitter().begin_class(Modifiers::PUBLIC, "Test", "java/lang/Object", &[]);
            generator.emitter().begin_method(Modifiers::STATIC, "test", "()V", &[]);
            f(&mut generator).unwrap();
            generator.emitter().end_method();
            generator.emitter().end_class();
        }
        recorder.into_classes().remove(0).methods.remove(0).code
    }
}

fn method(registry: &TypeRegistry, name: &str, params: Vec<Type>, ret: Type, mods: Modifiers) -> MethodEntry {
    MethodEntry {
        name: name.to_string(),
        descriptor: registry.method_descriptor(&params, ret),
        params,
        return_type: ret,
        exceptions: Vec::new(),
        mods,
        line: 1,
    }
}

/// Declare an initialized local.
pub(crate) fn local(ctx: &mut MethodContext, name: &str, ty: Type) -> u16 {
    let slot = ctx.declare_local(name, ty, 1).unwrap();
    ctx.mark_initialized(name);
    slot
}

/// Opcodes of `code`, labels dropped.
pub(crate) fn opcodes(code: &[Instruction]) -> Vec<crate::bytecode::OpCode> {
    code.iter().filter_map(Instruction::opcode).collect()
}

/// Disassembly of `code`, one instruction per entry.
pub(crate) fn listing(code: &[Instruction]) -> Vec<String> {
    code.iter().map(ToString::to_string).collect()
}
