//! `if` / `else`.

use jlite_ast::IfStmt;

use crate::analyzer::Analyzer;
use crate::generator::{CodeGenerator, Result};
use crate::scope::MethodContext;

impl Analyzer<'_> {
    /// Both branches start from the returned-state before the `if`; the
    /// statement returns on every path only if both branches do.
    pub(super) fn analyze_if(&mut self, if_stmt: IfStmt, ctx: &mut MethodContext) -> IfStmt {
        let IfStmt {
            condition,
            then_branch,
            else_branch,
            line,
        } = if_stmt;
        let condition = self.analyze_condition(condition, ctx);
        let before = ctx.has_returned();

        let then_branch = Box::new(self.analyze_stmt(*then_branch, ctx));
        let then_returns = ctx.has_returned();
        ctx.set_returned(before);

        let else_branch = else_branch.map(|stmt| Box::new(self.analyze_stmt(*stmt, ctx)));
        let else_returns = else_branch.is_some() && ctx.has_returned();

        ctx.set_returned(before || (then_returns && else_returns));
        IfStmt {
            condition,
            then_branch,
            else_branch,
            line,
        }
    }
}

impl CodeGenerator<'_, '_> {
    /// ```text
    ///   <branch to else_label when false>
    ///   <then>
    ///   goto end
    /// else_label:
    ///   <else>
    /// end:
    /// ```
    pub(super) fn codegen_if(&mut self, if_stmt: &IfStmt) -> Result<()> {
        let else_label = self.emitter.new_label();
        self.codegen_branch(&if_stmt.condition, else_label, false)?;
        self.codegen_stmt(&if_stmt.then_branch)?;

        match &if_stmt.else_branch {
            Some(else_branch) => {
                let end = self.emitter.new_label();
                self.emitter.emit_goto(end);
                self.emitter.place_label(else_label);
                self.codegen_stmt(else_branch)?;
                self.emitter.place_label(end);
            }
            None => self.emitter.place_label(else_label),
        }
        Ok(())
    }
}
