//! Local variable declarations.
//!
//! Each initializer is rewritten into an assignment statement to the new
//! local, so it is checked and compiled exactly like `x = init;`.

use jlite_ast::{AssignOp, Expr, LocalVarDecl};

use crate::analyzer::Analyzer;
use crate::generator::{CodeGenerator, Result};
use crate::scope::MethodContext;

impl Analyzer<'_> {
    pub(crate) fn analyze_var_decl(&mut self, decl: LocalVarDecl, ctx: &mut MethodContext) -> LocalVarDecl {
        let LocalVarDecl {
            ty: type_name,
            declarators,
            line,
            ..
        } = decl;
        let ty = self.resolve_value_type(&type_name);

        let mut analyzed = Vec::with_capacity(declarators.len());
        let mut initializers = Vec::new();
        for mut declarator in declarators {
            match ctx.declare_local(&declarator.name, ty, declarator.line) {
                Ok(slot) => declarator.slot = Some(slot),
                Err(error) => self.report(error),
            }
            if let Some(init) = declarator.init.take() {
                let target = Expr::var(declarator.name.clone(), declarator.line);
                let assign = Expr::assign(AssignOp::Assign, target, init, declarator.line).into_statement();
                initializers.push(self.analyze_expr(assign, ctx));
            }
            analyzed.push(declarator);
        }

        LocalVarDecl {
            ty: type_name,
            declarators: analyzed,
            line,
            initializers,
        }
    }
}

impl CodeGenerator<'_, '_> {
    pub(crate) fn codegen_var_decl(&mut self, decl: &LocalVarDecl) -> Result<()> {
        decl.initializers.iter().try_for_each(|init| self.codegen_expr(init))
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::{Fixture, listing};
    use jlite_ast::{Expr, LocalVarDecl, Stmt, TypeName, VarDeclarator};
    use jlite_core::{CompilationError, Type};

    #[test]
    fn initializers_become_stores() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        let decl = LocalVarDecl::new(
            TypeName::new("long", 1),
            vec![
                VarDeclarator::new("a", Some(Expr::long(0, 1)), 1),
                VarDeclarator::new("b", None, 1),
                VarDeclarator::new("c", Some(Expr::long(7, 1)), 1),
            ],
            1,
        );
        let stmt = fx.analyze_stmt(Stmt::LocalVar(decl), &mut ctx);
        assert!(fx.errors().is_empty());

        let Stmt::LocalVar(decl) = &stmt else {
            panic!("expected a declaration");
        };
        let slots: Vec<_> = decl.declarators.iter().map(|d| d.slot).collect();
        assert_eq!(slots, [Some(0), Some(2), Some(4)]);
        assert_eq!(decl.initializers.len(), 2);
        assert!(ctx.lookup("a").is_some_and(|v| v.is_initialized));
        assert!(ctx.lookup("b").is_some_and(|v| !v.is_initialized));

        assert_eq!(
            listing(&fx.generate(|g| g.codegen_stmt(&stmt))),
            ["lconst_0", "lstore_0", "ldc2_w 7L", "lstore 4"]
        );
    }

    #[test]
    fn initializer_must_match_declared_type() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        fx.analyze_stmt(Stmt::local(TypeName::new("int", 2), "x", Some(Expr::double(1.5, 2)), 2), &mut ctx);
        let messages: Vec<_> = fx.errors().iter().map(ToString::to_string).collect();
        assert_eq!(messages, ["line 2: type double doesn't match expected type int"]);
    }

    #[test]
    fn void_and_unknown_types_are_rejected() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        fx.analyze_stmt(Stmt::local(TypeName::new("void", 1), "v", None, 1), &mut ctx);
        fx.analyze_stmt(Stmt::local(TypeName::new("Missing", 2), "m", Some(Expr::int(1, 2)), 2), &mut ctx);
        assert_eq!(fx.errors().len(), 2);
        assert!(matches!(fx.errors()[1], CompilationError::UnknownType { .. }));
        // The unresolved local is still declared, as `ANY`.
        assert_eq!(ctx.lookup("m").map(|v| v.ty), Some(Type::ANY));
    }
}
