//! `for` loops.
//!
//! Locals declared in the initializer are scoped to the loop. `continue`
//! jumps to the update expressions, not straight back to the test.

use jlite_ast::{ForInit, ForStmt};

use crate::analyzer::Analyzer;
use crate::generator::{CodeGenerator, Result};
use crate::scope::MethodContext;

use super::always_true;

impl Analyzer<'_> {
    pub(super) fn analyze_for(&mut self, for_stmt: ForStmt, ctx: &mut MethodContext) -> ForStmt {
        let ForStmt {
            init,
            condition,
            update,
            body,
            line,
        } = for_stmt;
        ctx.push_frame();

        let init = init.map(|init| match init {
            ForInit::Declaration(decl) => ForInit::Declaration(self.analyze_var_decl(decl, ctx)),
            ForInit::Expressions(exprs) => ForInit::Expressions(
                exprs
                    .into_iter()
                    .map(|expr| self.analyze_statement_expr(expr, ctx))
                    .collect(),
            ),
        });
        let condition = condition.map(|cond| self.analyze_condition(cond, ctx));
        let before = ctx.has_returned();

        ctx.enter_loop();
        let body = Box::new(self.analyze_stmt(*body, ctx));
        let has_break = ctx.exit_loop();
        let update = update
            .into_iter()
            .map(|expr| self.analyze_statement_expr(expr, ctx))
            .collect();

        ctx.pop_frame();
        ctx.set_returned(before || (always_true(condition.as_ref()) && !has_break));
        ForStmt {
            init,
            condition,
            update,
            body,
            line,
        }
    }
}

impl CodeGenerator<'_, '_> {
    /// ```text
    ///   <init>
    /// test:
    ///   <branch to out when false>
    ///   <body>
    /// cont:
    ///   <update>
    ///   goto test
    /// out:
    /// ```
    pub(super) fn codegen_for(&mut self, for_stmt: &ForStmt) -> Result<()> {
        match &for_stmt.init {
            Some(ForInit::Declaration(decl)) => self.codegen_var_decl(decl)?,
            Some(ForInit::Expressions(exprs)) => {
                for expr in exprs {
                    self.codegen_statement_expr(expr)?;
                }
            }
            None => {}
        }

        let test = self.emitter.new_label();
        let cont = self.emitter.new_label();
        let out = self.emitter.new_label();

        self.emitter.place_label(test);
        if let Some(condition) = &for_stmt.condition {
            self.codegen_branch(condition, out, false)?;
        }
        self.emitter.enter_loop(out, cont);
        self.codegen_stmt(&for_stmt.body)?;
        self.emitter.exit_loop();

        self.emitter.place_label(cont);
        for expr in &for_stmt.update {
            self.codegen_statement_expr(expr)?;
        }
        self.emitter.emit_goto(test);
        self.emitter.place_label(out);
        Ok(())
    }
}
