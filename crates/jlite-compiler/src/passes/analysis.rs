//! Analysis pass - analyze every stubbed method body.
//!
//! Runs only after registration has stubbed every method of the unit, so
//! calls resolve against the complete set of signatures no matter where
//! the callee is declared.

use jlite_ast::{CompilationUnit, Member, MethodState};
use jlite_core::{Diagnostics, TypeRegistry};

use crate::analyzer::Analyzer;
use crate::context::UnitContext;

/// Output of the analysis pass.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AnalysisOutput {
    pub methods_analyzed: usize,
}

pub struct AnalysisPass<'a> {
    registry: &'a mut TypeRegistry,
    classes: &'a UnitContext,
    diagnostics: &'a mut Diagnostics,
}

impl<'a> AnalysisPass<'a> {
    pub fn new(registry: &'a mut TypeRegistry, classes: &'a UnitContext, diagnostics: &'a mut Diagnostics) -> Self {
        Self {
            registry,
            classes,
            diagnostics,
        }
    }

    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(self, unit: &mut CompilationUnit) -> AnalysisOutput {
        log::debug!("analysis: '{}'", unit.file_name);
        let mut output = AnalysisOutput::default();

        for decl in &mut unit.types {
            let Some(ty) = decl.ty else { continue };
            let mut analyzer = Analyzer::new(self.registry, self.classes, ty, self.diagnostics);
            for member in &mut decl.members {
                let Member::Method(method) = member else { continue };
                if method.state != MethodState::Stubbed {
                    continue;
                }
                log::trace!("analyzing {}.{}", decl.name, method.name);
                analyzer.analyze_method(method);
                output.methods_analyzed += 1;
            }
        }

        log::debug!(
            "analysis done: {} method(s), {} error(s)",
            output.methods_analyzed,
            self.diagnostics.error_count()
        );
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::CompilerOptions;
    use crate::passes::RegistrationPass;
    use jlite_ast::{Block, ClassDecl, Expr, MethodDecl, Stmt, TypeName};
    use jlite_core::{ErrorKind, Modifiers};

    fn int_method(name: &str, body: Vec<Stmt>) -> Member {
        Member::Method(MethodDecl::new(
            Modifiers::STATIC,
            name,
            TypeName::new("int", 1),
            vec![],
            Some(Block { stmts: body, line: 1 }),
            1,
        ))
    }

    fn compile(unit: &mut CompilationUnit) -> (AnalysisOutput, Diagnostics) {
        let mut registry = TypeRegistry::with_builtins();
        let mut diagnostics = Diagnostics::new();
        let options = CompilerOptions::default();
        let registration = RegistrationPass::new(&mut registry, &mut diagnostics, &options).run(unit);
        let output = AnalysisPass::new(&mut registry, &registration.classes, &mut diagnostics).run(unit);
        (output, diagnostics)
    }

    #[test]
    fn calls_resolve_regardless_of_order() {
        let first = int_method("first", vec![Stmt::ret(Some(Expr::call(None, "second", vec![], 2)), 2)]);
        let second = int_method("second", vec![Stmt::ret(Some(Expr::int(2, 3)), 3)]);
        let mut unit = CompilationUnit {
            types: vec![ClassDecl::new("Order", Modifiers::PUBLIC, vec![first, second], 1)],
            ..CompilationUnit::default()
        };
        let (output, diagnostics) = compile(&mut unit);

        assert!(!diagnostics.has_errors(), "{diagnostics}");
        assert_eq!(output.methods_analyzed, 2);
        assert!(unit.types[0].methods().all(|m| m.state == MethodState::Analyzed));
    }

    #[test]
    fn errors_in_one_method_do_not_stop_the_others() {
        let bad = int_method("bad", vec![]);
        let worse = int_method("worse", vec![Stmt::ret(Some(Expr::bool(true, 5)), 5)]);
        let mut unit = CompilationUnit {
            types: vec![ClassDecl::new("Errors", Modifiers::PUBLIC, vec![bad, worse], 1)],
            ..CompilationUnit::default()
        };
        let (output, diagnostics) = compile(&mut unit);

        assert_eq!(output.methods_analyzed, 2);
        assert_eq!(diagnostics.count(ErrorKind::MissingReturn), 1);
        assert_eq!(diagnostics.count(ErrorKind::TypeMismatch), 1);
    }
}
