//! `while` loops.

use jlite_ast::WhileStmt;

use crate::analyzer::Analyzer;
use crate::generator::{CodeGenerator, Result};
use crate::scope::MethodContext;

use super::always_true;

impl Analyzer<'_> {
    pub(super) fn analyze_while(&mut self, while_stmt: WhileStmt, ctx: &mut MethodContext) -> WhileStmt {
        let WhileStmt { condition, body, line } = while_stmt;
        let condition = self.analyze_condition(condition, ctx);
        let before = ctx.has_returned();

        ctx.enter_loop();
        let body = Box::new(self.analyze_stmt(*body, ctx));
        let has_break = ctx.exit_loop();

        // The body may run zero times; only a loop that cannot exit
        // normally counts as returning.
        ctx.set_returned(before || (always_true(Some(&condition)) && !has_break));
        WhileStmt { condition, body, line }
    }
}

impl CodeGenerator<'_, '_> {
    /// ```text
    /// test:
    ///   <branch to out when false>
    ///   <body>
    ///   goto test
    /// out:
    /// ```
    pub(super) fn codegen_while(&mut self, while_stmt: &WhileStmt) -> Result<()> {
        let test = self.emitter.new_label();
        let out = self.emitter.new_label();

        self.emitter.place_label(test);
        self.codegen_branch(&while_stmt.condition, out, false)?;
        self.emitter.enter_loop(out, test);
        self.codegen_stmt(&while_stmt.body)?;
        self.emitter.exit_loop();
        self.emitter.emit_goto(test);
        self.emitter.place_label(out);
        Ok(())
    }
}
