//! Method invocation.

use jlite_ast::{CallExpr, Expr, ExprKind};
use jlite_core::{CompilationError, Type};

use crate::analyzer::Analyzer;
use crate::bytecode::OpCode;
use crate::generator::{CodeGenerator, Result};
use crate::scope::MethodContext;

use super::identifiers::unbound;

impl Analyzer<'_> {
    pub(super) fn analyze_call(&mut self, call: CallExpr, line: u32, ctx: &mut MethodContext) -> Expr {
        let CallExpr { target, name, args, .. } = call;

        // (analyzed receiver, receiver type, whether only static methods
        // are reachable)
        let (target, receiver, static_only) = match target {
            None => (None, self.class, ctx.is_static()),
            Some(target) => match self.type_qualifier(&target, ctx) {
                Some(owner) => (None, owner, true),
                None => {
                    let target = self.analyze_boxed(target, ctx);
                    let receiver = target.ty_or_any();
                    (Some(target), receiver, false)
                }
            },
        };

        let args: Vec<Expr> = args.into_iter().map(|arg| self.analyze_expr(arg, ctx)).collect();
        let arg_types: Vec<Type> = args.iter().map(Expr::ty_or_any).collect();

        if receiver == Type::ANY {
            return Expr::typed(
                ExprKind::Call(CallExpr { target, name, args, method: None }),
                line,
                Some(Type::ANY),
            );
        }

        let method = self.unit.lookup_method(self.registry, receiver, &name, &arg_types);
        let ty = match &method {
            Some(method) => {
                if static_only && !method.is_static {
                    self.report(CompilationError::InvalidOperation {
                        message: format!(
                            "non-static method {name}({}) cannot be referenced from a static context",
                            self.arg_list(&arg_types)
                        ),
                        line,
                    });
                }
                method.return_type
            }
            None => {
                self.report(CompilationError::UnknownMethod {
                    name: name.clone(),
                    args: self.arg_list(&arg_types),
                    line,
                });
                Type::ANY
            }
        };

        Expr::typed(ExprKind::Call(CallExpr { target, name, args, method }), line, Some(ty))
    }

    /// `int, java.lang.String`
    fn arg_list(&self, types: &[Type]) -> String {
        let names: Vec<_> = types.iter().map(|ty| self.type_name(*ty)).collect();
        names.join(", ")
    }
}

impl CodeGenerator<'_, '_> {
    pub(super) fn codegen_call(&mut self, call: &CallExpr, expr: &Expr) -> Result<()> {
        let method = call.method.as_ref().ok_or_else(|| unbound(&call.name, expr.line))?;

        if !method.is_static {
            match &call.target {
                Some(target) => self.codegen_expr(target)?,
                None => self.emitter.emit(OpCode::Aload0),
            }
        }
        for arg in &call.args {
            self.codegen_expr(arg)?;
        }

        let op = if method.is_static {
            OpCode::Invokestatic
        } else if method.is_private {
            OpCode::Invokespecial
        } else if method.owner_is_interface {
            OpCode::Invokeinterface
        } else {
            OpCode::Invokevirtual
        };
        let owner = self.internal_name(method.owner);
        self.emitter.emit_member(op, &owner, &call.name, &method.descriptor);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Fixture, listing, local};

    fn code(fx: &Fixture, expr: &Expr) -> Vec<String> {
        listing(&fx.generate(|g| g.codegen_expr(expr)))
    }

    #[test]
    fn implicit_receiver() {
        let mut fx = Fixture::new();
        let mut ctx = fx.instance_ctx();
        let expr = fx.analyze(Expr::call(None, "twice", vec![Expr::int(3, 1)], 1), &mut ctx);
        assert_eq!(expr.ty, Some(Type::INT));
        assert_eq!(code(&fx, &expr), ["aload_0", "iconst_3", "invokevirtual Test.twice:(I)I"]);
    }

    #[test]
    fn static_call_through_type_name() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        let expr = fx.analyze(
            Expr::call(Some(Expr::var("Test", 1)), "log", vec![Expr::string("hi", 1)], 1),
            &mut ctx,
        );
        assert!(fx.errors().is_empty());
        assert_eq!(expr.ty, Some(Type::VOID));
        assert_eq!(
            code(&fx, &expr),
            ["ldc \"hi\"", "invokestatic Test.log:(Ljava/lang/String;)V"]
        );
    }

    #[test]
    fn private_and_interface_dispatch() {
        let mut fx = Fixture::new();
        let mut ctx = fx.instance_ctx();
        let private = fx.analyze(Expr::call(None, "secret", vec![], 1), &mut ctx);
        let interface = fx.analyze(Expr::call(Some(Expr::var("shape", 1)), "area", vec![], 1), &mut ctx);
        assert_eq!(interface.ty, Some(Type::DOUBLE));
        assert!(fx.errors().is_empty());

        assert_eq!(code(&fx, &private), ["aload_0", "invokespecial Test.secret:()I"]);
        assert_eq!(
            code(&fx, &interface),
            ["aload_0", "getfield Test.shape:LShape;", "invokeinterface Shape.area:()D"]
        );
    }

    #[test]
    fn null_argument_matches_reference_parameter() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        let expr = fx.analyze(Expr::call(None, "log", vec![Expr::null(1)], 1), &mut ctx);
        assert!(fx.errors().is_empty());
        assert!(matches!(&expr.kind, ExprKind::Call(CallExpr { method: Some(_), .. })));
    }

    #[test]
    fn unknown_method() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        local(&mut ctx, "s", Type::STRING);
        let expr = fx.analyze(
            Expr::call(None, "half", vec![Expr::var("s", 4), Expr::int(1, 4)], 4),
            &mut ctx,
        );
        assert_eq!(expr.ty, Some(Type::ANY));
        assert_eq!(
            fx.errors(),
            [CompilationError::UnknownMethod {
                name: "half".to_string(),
                args: "java.lang.String, int".to_string(),
                line: 4,
            }]
        );
    }

    #[test]
    fn instance_method_from_static_context() {
        let mut fx = Fixture::new();
        let mut ctx = fx.static_ctx();
        fx.analyze(Expr::call(None, "twice", vec![Expr::int(1, 2)], 2), &mut ctx);
        let messages: Vec<_> = fx.errors().iter().map(ToString::to_string).collect();
        assert_eq!(
            messages,
            ["line 2: non-static method twice(int) cannot be referenced from a static context"]
        );
    }
}
