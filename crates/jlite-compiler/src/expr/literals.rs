//! Literal constants.

use jlite_ast::{Expr, ExprKind, Literal};
use jlite_core::Type;

use crate::analyzer::Analyzer;
use crate::bytecode::OpCode;
use crate::generator::{CodeGenerator, Result};

impl Analyzer<'_> {
    pub(super) fn analyze_literal(&mut self, lit: Literal, line: u32) -> Expr {
        let ty = match lit {
            Literal::Int(_) => Type::INT,
            Literal::Long(_) => Type::LONG,
            Literal::Float(_) => Type::FLOAT,
            Literal::Double(_) => Type::DOUBLE,
            Literal::Bool(_) => Type::BOOLEAN,
            Literal::Char(_) => Type::CHAR,
            Literal::String(_) => Type::STRING,
            Literal::Null => Type::NULL,
        };
        Expr::typed(ExprKind::Literal(lit), line, Some(ty))
    }
}

impl CodeGenerator<'_, '_> {
    pub(super) fn codegen_literal(&mut self, lit: &Literal) -> Result<()> {
        match lit {
            Literal::Int(value) => self.emitter.emit_int(*value),
            Literal::Long(value) => self.emitter.emit_long(*value),
            Literal::Float(value) => self.emitter.emit_float(*value),
            Literal::Double(value) => self.emitter.emit_double(*value),
            Literal::Bool(value) => self.emitter.emit_int(i32::from(*value)),
            Literal::Char(value) => self.emitter.emit_int(i32::from(*value)),
            Literal::String(value) => self.emitter.emit_string(value),
            Literal::Null => self.emitter.emit(OpCode::AconstNull),
        }
        Ok(())
    }
}
