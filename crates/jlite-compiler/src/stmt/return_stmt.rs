//! `return` statements.

use jlite_ast::{AssignOp, ReturnStmt};
use jlite_core::{CompilationError, Type};

use crate::analyzer::Analyzer;
use crate::generator::{CodeGenerator, Result};
use crate::operators::{AssignCheck, check_assignment};
use crate::scope::MethodContext;

impl Analyzer<'_> {
    /// The returned value must be assignable to the declared return type.
    pub(super) fn analyze_return(&mut self, ret: ReturnStmt, ctx: &mut MethodContext) -> ReturnStmt {
        let ReturnStmt { value, line } = ret;
        let return_type = ctx.return_type();

        let value = match value {
            Some(value) => {
                let value = self.analyze_expr(value, ctx);
                let value_ty = value.ty_or_any();
                if return_type == Type::VOID {
                    self.report(CompilationError::type_mismatch(
                        "cannot return a value from a method with void result type",
                        line,
                    ));
                } else if !matches!(
                    check_assignment(self.registry, AssignOp::Assign, return_type, value_ty),
                    AssignCheck::Ok(_)
                ) {
                    self.expect_type(value_ty, return_type, value.line);
                }
                Some(value)
            }
            None => {
                if return_type != Type::VOID && return_type != Type::ANY {
                    self.report(CompilationError::type_mismatch("missing return value", line));
                }
                None
            }
        };

        ctx.set_returned(true);
        ReturnStmt { value, line }
    }
}

impl CodeGenerator<'_, '_> {
    pub(super) fn codegen_return(&mut self, ret: &ReturnStmt) -> Result<()> {
        match &ret.value {
            Some(value) => {
                self.codegen_expr(value)?;
                self.emitter.emit_return(self.return_type);
            }
            None => self.emitter.emit_return(Type::VOID),
        }
        Ok(())
    }
}
