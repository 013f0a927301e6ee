//! Blocks open a frame; locals declared inside go out of scope at its end.

use jlite_ast::Block;

use crate::analyzer::Analyzer;
use crate::generator::{CodeGenerator, Result};
use crate::scope::MethodContext;

impl Analyzer<'_> {
    pub(super) fn analyze_block(&mut self, block: Block, ctx: &mut MethodContext) -> Block {
        ctx.push_frame();
        let stmts = block.stmts.into_iter().map(|stmt| self.analyze_stmt(stmt, ctx)).collect();
        ctx.pop_frame();
        Block { stmts, line: block.line }
    }
}

impl CodeGenerator<'_, '_> {
    pub(super) fn codegen_block(&mut self, block: &Block) -> Result<()> {
        block.stmts.iter().try_for_each(|stmt| self.codegen_stmt(stmt))
    }
}

#[cfg(test)]
mod tests {
    use crate::testing::Fixture;
    use jlite_ast::{AssignOp, Expr, Stmt, TypeName};
    use jlite_core::CompilationError;

    fn int_local(name: &str, line: u32) -> Stmt {
        Stmt::local(TypeName::new("int", line), name, Some(Expr::int(0, line)), line)
    }

    #[test]
    fn inner_locals_go_out_of_scope() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        let block = Stmt::block(vec![int_local("tmp", 2)], 1);
        fx.analyze_stmt(block, &mut ctx);
        fx.analyze_stmt(
            Stmt::expr(Expr::assign(AssignOp::Assign, Expr::var("tmp", 4), Expr::int(1, 4), 4)),
            &mut ctx,
        );
        assert!(matches!(fx.errors(), [CompilationError::UnknownVariable { line: 4, .. }]));
    }

    #[test]
    fn nested_blocks_may_shadow_but_not_redeclare() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        fx.analyze_stmt(int_local("x", 1), &mut ctx);
        fx.analyze_stmt(Stmt::block(vec![int_local("x", 3), int_local("x", 4)], 2), &mut ctx);
        assert_eq!(
            fx.errors(),
            [CompilationError::DuplicateDefinition {
                kind: "variable",
                name: "x".to_string(),
                line: 4,
            }]
        );
    }
}
