//! Generation pass - emit the final classes.
//!
//! Only run on units that analyzed without errors. Any error raised here
//! is an internal compiler error.
//!
//! Classes are generated into a scratch recorder and handed to the output
//! emitter only once the whole unit has generated, so a failure leaves the
//! output untouched.

use jlite_ast::{CompilationUnit, Member};
use jlite_core::{CompilationError, Type, TypeRegistry};

use crate::context::UnitContext;
use crate::emit::{ClassEmitter, ClassRecorder};
use crate::generator::CodeGenerator;
use crate::method::emit_implicit_constructor;
use crate::options::CompilerOptions;

/// Output of the generation pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerationOutput {
    pub classes_generated: usize,
    pub methods_generated: usize,
}

pub struct GenerationPass<'a, 'e> {
    registry: &'a TypeRegistry,
    classes: &'a UnitContext,
    options: &'a CompilerOptions,
    out: &'e mut dyn ClassEmitter,
}

impl<'a, 'e> GenerationPass<'a, 'e> {
    pub fn new(
        registry: &'a TypeRegistry,
        classes: &'a UnitContext,
        options: &'a CompilerOptions,
        out: &'e mut dyn ClassEmitter,
    ) -> Self {
        Self {
            registry,
            classes,
            options,
            out,
        }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(self, unit: &mut CompilationUnit) -> Result<GenerationOutput, CompilationError> {
        log::debug!("generation: '{}'", unit.file_name);
        let mut output = GenerationOutput::default();
        let mut scratch = ClassRecorder::new();
        let mut generator = CodeGenerator::new(self.registry, self.classes, Type::OBJECT, &mut scratch);

        for decl in &mut unit.types {
            let class = decl
                .ty
                .and_then(|ty| self.classes.class(ty))
                .ok_or_else(|| CompilationError::internal(format!("class '{}' was never registered", decl.name)))?;
            generator.class = class.ty;

            let super_name = self.registry.internal_name(class.superclass);
            let interfaces: Vec<String> = class
                .interfaces
                .iter()
                .map(|iface| self.registry.internal_name(*iface).to_string())
                .collect();

            let emitter = generator.emitter();
            emitter.begin_class(class.mods, &class.internal_name, super_name, &interfaces);
            for field in class.fields() {
                emitter.add_field(field.mods, &field.name, &self.registry.descriptor(field.ty));
            }
            if self.options.implicit_constructor && !class.is_interface() {
                emit_implicit_constructor(emitter, super_name);
            }

            for member in &mut decl.members {
                if let Member::Method(method) = member {
                    generator.codegen_method(method)?;
                    output.methods_generated += 1;
                }
            }

            generator.emitter().end_class();
            output.classes_generated += 1;
            log::trace!("generated {}", class.internal_name);
        }

        drop(generator);
        for class in scratch.classes() {
            class.replay(self.out);
        }

        log::debug!(
            "generation done: {} class(es), {} method(s)",
            output.classes_generated,
            output.methods_generated
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::ClassRecorder;
    use crate::passes::{AnalysisPass, RegistrationPass};
    use jlite_ast::{AssignOp, Block, ClassDecl, Expr, FieldDecl, MethodDecl, Stmt, TypeName};
    use jlite_core::{Diagnostics, Modifiers};

    fn counter() -> ClassDecl {
        let field = FieldDecl::new(Modifiers::PRIVATE, TypeName::new("int", 2), vec!["count".into()], 2);
        let bump = MethodDecl::new(
            Modifiers::PUBLIC,
            "bump",
            TypeName::new("void", 3),
            vec![],
            Some(Block {
                stmts: vec![Stmt::expr(Expr::assign(
                    AssignOp::AddAssign,
                    Expr::var("count", 4),
                    Expr::int(2, 4),
                    4,
                ))],
                line: 3,
            }),
            3,
        );
        ClassDecl::new("Counter", Modifiers::PUBLIC, vec![Member::Field(field), Member::Method(bump)], 1)
    }

    fn generate(unit: &mut CompilationUnit, options: &CompilerOptions) -> (GenerationOutput, ClassRecorder) {
        let mut registry = TypeRegistry::with_builtins();
        let mut diagnostics = Diagnostics::new();
        let registration = RegistrationPass::new(&mut registry, &mut diagnostics, options).run(unit);
        AnalysisPass::new(&mut registry, &registration.classes, &mut diagnostics).run(unit);
        assert!(!diagnostics.has_errors(), "{diagnostics}");

        let mut out = ClassRecorder::new();
        let output = GenerationPass::new(&registry, &registration.classes, options, &mut out)
            .run(unit)
            .unwrap();
        (output, out)
    }

    #[test]
    fn emits_fields_constructor_and_methods() {
        let mut unit = CompilationUnit {
            types: vec![counter()],
            ..CompilationUnit::default()
        };
        let (output, out) = generate(&mut unit, &CompilerOptions::default());

        assert_eq!(
            output,
            GenerationOutput {
                classes_generated: 1,
                methods_generated: 1
            }
        );
        let class = out.class("Counter").unwrap();
        assert_eq!(class.super_name, "java/lang/Object");
        assert_eq!(class.field("count").unwrap().descriptor, "I");
        assert!(class.method("<init>").is_some());
        assert_eq!(
            class.method("bump").unwrap().disassemble(),
            "  aload_0\n  dup\n  getfield Counter.count:I\n  iconst_2\n  iadd\n  putfield Counter.count:I\n  return\n"
        );
    }

    #[test]
    fn failed_generation_leaves_the_output_empty() {
        let mut unit = CompilationUnit {
            types: vec![counter()],
            ..CompilationUnit::default()
        };
        let options = CompilerOptions::default();
        let mut registry = TypeRegistry::with_builtins();
        let mut diagnostics = Diagnostics::new();
        let registration = RegistrationPass::new(&mut registry, &mut diagnostics, &options).run(&mut unit);

        // `bump` is only stubbed, so generating it fails after the class,
        // its field and its constructor were already emitted.
        let mut out = ClassRecorder::new();
        let result = GenerationPass::new(&registry, &registration.classes, &options, &mut out).run(&mut unit);

        assert!(matches!(result, Err(CompilationError::Internal { .. })));
        assert!(out.classes().is_empty());
    }

    #[test]
    fn implicit_constructor_can_be_disabled() {
        let mut unit = CompilationUnit {
            types: vec![counter()],
            ..CompilationUnit::default()
        };
        let options = CompilerOptions::new().with_implicit_constructor(false);
        let (_, out) = generate(&mut unit, &options);
        let class = out.class("Counter").unwrap();
        assert!(class.method("<init>").is_none());
        assert_eq!(class.methods.len(), 1);
    }

    #[test]
    fn interfaces_keep_abstract_methods_bodiless() {
        let area = MethodDecl::new(
            Modifiers::empty(),
            "area",
            TypeName::new("double", 2),
            vec![],
            None,
            2,
        );
        let mut unit = CompilationUnit {
            types: vec![ClassDecl::interface("Shape", Modifiers::PUBLIC, vec![Member::Method(area)], 1)],
            ..CompilationUnit::default()
        };
        let (_, out) = generate(&mut unit, &CompilerOptions::default());
        let shape = out.class("Shape").unwrap();
        let area = shape.method("area").unwrap();
        assert!(area.is_abstract());
        assert!(area.code.is_empty());
    }
}
