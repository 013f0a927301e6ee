//! Method declarations through their compilation states.
//!
//! ```text
//! Unresolved ──pre_analyze──▶ Stubbed ──analyze_method──▶ Analyzed ──codegen_method──▶ Generated
//! ```
//!
//! [`pre_analyze`] fixes a method's signature and adds a stub with a
//! placeholder body to the partial class. Every method of the unit is
//! stubbed before any body is analyzed, so bodies can call methods
//! declared after them, including each other.

use jlite_ast::{Block, FrameInfo, MethodDecl, MethodSignature, MethodState, TypeName};
use jlite_core::{CompilationError, Diagnostics, Modifiers, Type, TypeRegistry};

use crate::analyzer::Analyzer;
use crate::bytecode::OpCode;
use crate::context::{ClassContext, MethodEntry};
use crate::emit::BytecodeEmitter;
use crate::generator::{CodeGenerator, Result};
use crate::scope::MethodContext;
use crate::type_resolver::TypeResolver;

/// Name of instance initialization methods.
pub const CONSTRUCTOR_NAME: &str = "<init>";

// ============================================================================
// Pre-analysis
// ============================================================================

/// Resolve the signature of `method`, check its modifiers, register it with
/// `class` and add its stub to the partial class.
///
/// Errors are reported to `diagnostics`; the method is stubbed either way,
/// with `ANY` standing in for types that did not resolve.
pub fn pre_analyze(
    method: &mut MethodDecl,
    class: &mut ClassContext,
    registry: &mut TypeRegistry,
    diagnostics: &mut Diagnostics,
    partial: &mut BytecodeEmitter<'_>,
) {
    let line = method.line;

    if class.is_interface() {
        if method.mods.intersects(Modifiers::STATIC | Modifiers::FINAL) {
            diagnostics.report(CompilationError::invalid_modifiers(
                "interface methods cannot be declared static or final",
                line,
            ));
        }
        method.mods |= Modifiers::PUBLIC | Modifiers::ABSTRACT;
    }

    let mut exceptions = Vec::with_capacity(method.exceptions.len());
    for name in &method.exceptions {
        let ty = resolve(registry, diagnostics, name, false);
        if ty != Type::ANY && !registry.is_assignable_from(Type::THROWABLE, ty) {
            diagnostics.report(CompilationError::InvalidThrowsType {
                type_name: registry.display_name(ty),
                line,
            });
        }
        exceptions.push(ty);
    }

    let params: Vec<Type> = method
        .params
        .iter()
        .map(|param| resolve(registry, diagnostics, &param.ty, true))
        .collect();
    let return_type = resolve(registry, diagnostics, &method.return_type, false);

    if let Some(message) = modifier_error(method.mods, method.body.is_some(), class.is_interface()) {
        diagnostics.report(CompilationError::invalid_modifiers(message, line));
    }

    let descriptor = registry.method_descriptor(&params, return_type);
    let entry = MethodEntry {
        name: method.name.clone(),
        params: params.clone(),
        return_type,
        exceptions: exceptions.clone(),
        mods: method.mods,
        descriptor: descriptor.clone(),
        line,
    };
    if let Err(error) = class.add_method(entry) {
        diagnostics.report(error);
    }

    let exception_names = internal_names(registry, &exceptions);
    emit_stub(partial, method.mods, &method.name, &descriptor, return_type, &exception_names);
    log::trace!("stubbed {}.{}{}", class.name, method.name, descriptor);

    method.signature = Some(MethodSignature {
        params,
        return_type,
        exceptions,
        descriptor,
    });
    method.state = MethodState::Stubbed;
}

fn resolve(registry: &mut TypeRegistry, diagnostics: &mut Diagnostics, name: &TypeName, value_only: bool) -> Type {
    let mut resolver = TypeResolver::new(registry);
    let resolved = if value_only {
        resolver.resolve_value_type(name)
    } else {
        resolver.resolve(name)
    };
    resolved.unwrap_or_else(|error| {
        diagnostics.report(error);
        Type::ANY
    })
}

/// The first rule the modifier/body combination breaks, if any.
fn modifier_error(mods: Modifiers, has_body: bool, in_interface: bool) -> Option<&'static str> {
    let is_abstract = mods.is_abstract();
    if is_abstract && has_body {
        Some("abstract method cannot have a body")
    } else if !has_body && !is_abstract && !in_interface {
        Some("method with no body must be abstract")
    } else if is_abstract && mods.contains(Modifiers::PRIVATE) {
        Some("private method cannot be declared abstract")
    } else if is_abstract && mods.is_static() {
        Some("static method cannot be declared abstract")
    } else if mods.is_static() && !has_body {
        Some("static method must have a body")
    } else {
        None
    }
}

/// A method whose body only returns the zero value of its return type.
/// Abstract methods get no code.
fn emit_stub(
    partial: &mut BytecodeEmitter<'_>,
    mods: Modifiers,
    name: &str,
    descriptor: &str,
    return_type: Type,
    exceptions: &[String],
) {
    partial.begin_method(mods, name, descriptor, exceptions);
    if !mods.is_abstract() {
        if return_type != Type::VOID {
            partial.emit_zero(return_type);
        }
        partial.emit_return(return_type);
    }
    partial.end_method();
}

fn internal_names(registry: &TypeRegistry, types: &[Type]) -> Vec<String> {
    types
        .iter()
        .filter(|ty| **ty != Type::ANY)
        .map(|ty| registry.internal_name(*ty).to_string())
        .collect()
}

/// Emit a public no-arg constructor that calls the superclass constructor.
pub fn emit_implicit_constructor(emitter: &mut BytecodeEmitter<'_>, super_name: &str) {
    emitter.begin_method(Modifiers::PUBLIC, CONSTRUCTOR_NAME, "()V", &[]);
    emitter.emit(OpCode::Aload0);
    emitter.emit_member(OpCode::Invokespecial, super_name, CONSTRUCTOR_NAME, "()V");
    emitter.emit(OpCode::Return);
    emitter.end_method();
}

// ============================================================================
// Analysis
// ============================================================================

impl Analyzer<'_> {
    /// Analyze the body of a stubbed method.
    ///
    /// Parameters are declared first, in order, after the receiver slot of
    /// instance methods. A non-void body that can complete without a
    /// `return` is reported once.
    pub fn analyze_method(&mut self, method: &mut MethodDecl) {
        let Some(signature) = method.signature.as_ref() else {
            self.report(CompilationError::internal(format!(
                "method '{}' analyzed before its signature was resolved",
                method.name
            )));
            return;
        };
        let return_type = signature.return_type;
        let param_types = signature.params.clone();
        let mut ctx = MethodContext::new(return_type, signature.exceptions.clone(), method.is_static());

        for (param, ty) in method.params.iter().zip(param_types) {
            if let Err(error) = ctx.declare_param(&param.name, ty, param.line) {
                self.report(error);
            }
        }

        if let Some(body) = method.body.take() {
            let stmts = body
                .stmts
                .into_iter()
                .map(|stmt| self.analyze_stmt(stmt, &mut ctx))
                .collect();
            method.body = Some(Block { stmts, line: body.line });

            if return_type != Type::VOID && return_type != Type::ANY && !ctx.has_returned() {
                self.report(CompilationError::MissingReturn {
                    method: method.name.clone(),
                    line: method.line,
                });
            }
        }

        method.frame = Some(FrameInfo {
            max_locals: ctx.frame_size(),
            always_returns: ctx.has_returned(),
        });
        method.state = MethodState::Analyzed;
    }
}

// ============================================================================
// Code generation
// ============================================================================

impl CodeGenerator<'_, '_> {
    /// Emit the final code of an analyzed method.
    pub fn codegen_method(&mut self, method: &mut MethodDecl) -> Result<()> {
        if method.state != MethodState::Analyzed {
            return Err(CompilationError::internal(format!(
                "method '{}' generated in state {:?}",
                method.name, method.state
            )));
        }
        let Some(signature) = method.signature.as_ref() else {
            return Err(CompilationError::internal(format!(
                "method '{}' has no signature",
                method.name
            )));
        };

        let exceptions = internal_names(self.registry, &signature.exceptions);
        self.return_type = signature.return_type;
        self.emitter
            .begin_method(method.mods, &method.name, &signature.descriptor, &exceptions);

        if let Some(body) = &method.body {
            body.stmts.iter().try_for_each(|stmt| self.codegen_stmt(stmt))?;
        }
        if signature.return_type == Type::VOID && !method.mods.is_abstract() {
            self.emitter.emit(OpCode::Return);
        }

        self.emitter.end_method();
        method.state = MethodState::Generated;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::UnitContext;
    use crate::emit::{ClassImage, ClassRecorder};
    use jlite_ast::{AssignOp, BinaryOp, ClassKind, CompareOp, Expr, FormalParam, Stmt};
    use jlite_core::{ErrorKind, TypeKind};

    struct Setup {
        registry: TypeRegistry,
        class: ClassContext,
        diagnostics: Diagnostics,
        partial: ClassRecorder,
    }

    impl Setup {
        fn new(kind: ClassKind) -> Self {
            let mut registry = TypeRegistry::with_builtins();
            let type_kind = match kind {
                ClassKind::Class => TypeKind::Class,
                ClassKind::Interface => TypeKind::Interface,
            };
            let ty = registry.register_class("Test", type_kind, Some(Type::OBJECT), Vec::new());
            registry.add_alias("Test", ty);
            let mut partial = ClassRecorder::new();
            BytecodeEmitter::new(&mut partial).begin_class(Modifiers::PUBLIC, "Test", "java/lang/Object", &[]);
            Self {
                registry,
                class: ClassContext::new(ty, "Test", "Test", kind, Modifiers::PUBLIC),
                diagnostics: Diagnostics::new(),
                partial,
            }
        }

        fn stub(&mut self, method: &mut MethodDecl) {
            let mut emitter = BytecodeEmitter::new(&mut self.partial);
            pre_analyze(method, &mut self.class, &mut self.registry, &mut self.diagnostics, &mut emitter);
        }

        fn partial_class(&self) -> &ClassImage {
            &self.partial.classes()[0]
        }

        fn unit(&self) -> UnitContext {
            let mut unit = UnitContext::new(None);
            unit.add_class(self.class.clone());
            unit
        }
    }

    fn method(mods: Modifiers, name: &str, ret: &str, params: Vec<FormalParam>, body: Option<Vec<Stmt>>) -> MethodDecl {
        let body = body.map(|stmts| Block { stmts, line: 1 });
        MethodDecl::new(mods, name, TypeName::new(ret, 1), params, body, 1)
    }

    fn param(name: &str, ty: &str) -> FormalParam {
        FormalParam::new(name, TypeName::new(ty, 1), 1)
    }

    fn messages(diagnostics: &Diagnostics) -> Vec<String> {
        diagnostics.iter().map(ToString::to_string).collect()
    }

    // =========================================================================
    // Pre-analysis
    // =========================================================================

    #[test]
    fn stubs_return_the_zero_value() {
        let mut setup = Setup::new(ClassKind::Class);
        let expected = [
            ("v", "void", vec![OpCode::Return]),
            ("i", "int", vec![OpCode::Iconst0, OpCode::Ireturn]),
            ("b", "boolean", vec![OpCode::Iconst0, OpCode::Ireturn]),
            ("c", "char", vec![OpCode::Iconst0, OpCode::Ireturn]),
            ("d", "double", vec![OpCode::Dconst0, OpCode::Dreturn]),
            ("s", "String", vec![OpCode::AconstNull, OpCode::Areturn]),
        ];
        for (name, ret, _) in &expected {
            let mut m = method(Modifiers::PUBLIC, name, ret, vec![], Some(vec![]));
            setup.stub(&mut m);
            assert_eq!(m.state, MethodState::Stubbed);
        }
        assert!(!setup.diagnostics.has_errors());
        for (name, _, opcodes) in expected {
            assert_eq!(setup.partial_class().method(name).unwrap().opcodes(), opcodes, "{name}");
        }
    }

    #[test]
    fn signature_and_descriptor() {
        let mut setup = Setup::new(ClassKind::Class);
        let mut m = method(
            Modifiers::PUBLIC | Modifiers::STATIC,
            "scale",
            "double",
            vec![param("v", "int"), param("names", "String"), param("f", "long")],
            Some(vec![]),
        );
        setup.stub(&mut m);

        let signature = m.signature.as_ref().unwrap();
        assert_eq!(signature.params, [Type::INT, Type::STRING, Type::LONG]);
        assert_eq!(signature.return_type, Type::DOUBLE);
        assert_eq!(m.descriptor(), Some("(ILjava/lang/String;J)D"));
        assert!(setup.class.has_method("scale", "(ILjava/lang/String;J)D"));
    }

    #[test]
    fn interface_methods_become_public_abstract() {
        let mut setup = Setup::new(ClassKind::Interface);
        let mut m = method(Modifiers::empty(), "area", "double", vec![], None);
        setup.stub(&mut m);

        assert!(!setup.diagnostics.has_errors());
        assert!(m.mods.contains(Modifiers::PUBLIC | Modifiers::ABSTRACT));
        let stub = setup.partial_class().method("area").unwrap();
        assert!(stub.is_abstract());
        assert!(stub.code.is_empty());
    }

    #[test]
    fn interface_methods_cannot_be_static() {
        let mut setup = Setup::new(ClassKind::Interface);
        let mut m = method(Modifiers::STATIC, "make", "void", vec![], None);
        setup.stub(&mut m);
        // The implicit `abstract` then also conflicts with `static`.
        assert_eq!(
            messages(&setup.diagnostics),
            [
                "line 1: interface methods cannot be declared static or final",
                "line 1: static method cannot be declared abstract",
            ]
        );

        let mut setup = Setup::new(ClassKind::Interface);
        let mut m = method(Modifiers::FINAL, "seal", "void", vec![], None);
        setup.stub(&mut m);
        assert_eq!(
            messages(&setup.diagnostics),
            ["line 1: interface methods cannot be declared static or final"]
        );
    }

    #[test]
    fn modifier_matrix() {
        let cases = [
            (Modifiers::ABSTRACT, true, "abstract method cannot have a body"),
            (Modifiers::PUBLIC, false, "method with no body must be abstract"),
            (Modifiers::ABSTRACT | Modifiers::PRIVATE, false, "private method cannot be declared abstract"),
            (Modifiers::ABSTRACT | Modifiers::STATIC, false, "static method cannot be declared abstract"),
        ];
        for (mods, has_body, message) in cases {
            let mut setup = Setup::new(ClassKind::Class);
            let mut m = method(mods, "m", "void", vec![], has_body.then(Vec::new));
            setup.stub(&mut m);
            assert_eq!(messages(&setup.diagnostics), [format!("line 1: {message}")]);
            assert_eq!(setup.diagnostics.count(ErrorKind::InvalidModifiers), 1);
        }
    }

    #[test]
    fn static_method_without_body() {
        assert_eq!(
            modifier_error(Modifiers::STATIC, false, true),
            Some("static method must have a body")
        );
        assert_eq!(modifier_error(Modifiers::STATIC, true, false), None);
        assert_eq!(modifier_error(Modifiers::ABSTRACT, false, false), None);
    }

    #[test]
    fn throws_types_must_be_throwable() {
        let mut setup = Setup::new(ClassKind::Class);
        let mut ok = method(Modifiers::PUBLIC, "ok", "void", vec![], Some(vec![]))
            .with_exceptions(vec![TypeName::new("java.io.IOException", 1)]);
        setup.stub(&mut ok);
        assert!(!setup.diagnostics.has_errors());
        assert_eq!(setup.partial_class().method("ok").unwrap().exceptions, ["java/io/IOException"]);

        let mut bad = method(Modifiers::PUBLIC, "bad", "void", vec![], Some(vec![]))
            .with_exceptions(vec![TypeName::new("String", 1)]);
        setup.stub(&mut bad);
        assert_eq!(
            messages(&setup.diagnostics),
            ["line 1: throw type must be of type Throwable: \"java.lang.String\""]
        );
    }

    #[test]
    fn unresolved_types_recover_with_any() {
        let mut setup = Setup::new(ClassKind::Class);
        let mut m = method(Modifiers::PUBLIC, "m", "Missing", vec![param("x", "Nope")], Some(vec![]));
        setup.stub(&mut m);
        assert_eq!(setup.diagnostics.count(ErrorKind::Resolution), 2);
        assert_eq!(m.state, MethodState::Stubbed);
        assert_eq!(m.signature.unwrap().params, [Type::ANY]);
    }

    #[test]
    fn duplicate_signatures_rejected() {
        let mut setup = Setup::new(ClassKind::Class);
        let mut first = method(Modifiers::PUBLIC, "f", "void", vec![param("a", "int")], Some(vec![]));
        let mut second = method(Modifiers::PUBLIC, "f", "void", vec![param("b", "int")], Some(vec![]));
        let mut overload = method(Modifiers::PUBLIC, "f", "void", vec![param("c", "long")], Some(vec![]));
        setup.stub(&mut first);
        setup.stub(&mut second);
        setup.stub(&mut overload);
        assert!(matches!(
            setup.diagnostics.errors(),
            [CompilationError::DuplicateDefinition { kind: "method", .. }]
        ));
    }

    // =========================================================================
    // Analysis
    // =========================================================================

    fn analyze(setup: &mut Setup, method: &mut MethodDecl) {
        let unit = setup.unit();
        let class = setup.class.ty;
        Analyzer::new(&mut setup.registry, &unit, class, &mut setup.diagnostics).analyze_method(method);
    }

    #[test]
    fn parameters_take_slots_after_receiver() {
        let mut setup = Setup::new(ClassKind::Class);
        let body = vec![Stmt::ret(Some(Expr::var("b", 2)), 2)];
        let mut m = method(
            Modifiers::PUBLIC,
            "pick",
            "int",
            vec![param("a", "long"), param("b", "int")],
            Some(body),
        );
        setup.stub(&mut m);
        analyze(&mut setup, &mut m);

        assert!(!setup.diagnostics.has_errors(), "{}", setup.diagnostics);
        assert_eq!(m.state, MethodState::Analyzed);
        assert_eq!(
            m.frame,
            Some(FrameInfo {
                max_locals: 4,
                always_returns: true
            })
        );
        let Some(Stmt::Return(ret)) = m.body.as_ref().map(|b| &b.stmts[0]) else {
            panic!("expected a return");
        };
        assert_eq!(ret.value.as_ref().unwrap().ty, Some(Type::INT));
    }

    #[test]
    fn missing_return_reported_once() {
        let mut setup = Setup::new(ClassKind::Class);
        let body = vec![Stmt::if_else(
            Expr::compare(CompareOp::Less, Expr::var("n", 2), Expr::int(0, 2), 2),
            Stmt::ret(Some(Expr::int(0, 3)), 3),
            None,
            2,
        )];
        let mut m = method(Modifiers::STATIC, "sign", "int", vec![param("n", "int")], Some(body));
        setup.stub(&mut m);
        analyze(&mut setup, &mut m);

        assert_eq!(
            setup.diagnostics.errors(),
            [CompilationError::MissingReturn {
                method: "sign".to_string(),
                line: 1,
            }]
        );
    }

    #[test]
    fn returns_on_every_path_succeed() {
        let mut setup = Setup::new(ClassKind::Class);
        let body = vec![Stmt::if_else(
            Expr::compare(CompareOp::Less, Expr::var("n", 2), Expr::int(0, 2), 2),
            Stmt::ret(Some(Expr::int(-1, 3)), 3),
            Some(Stmt::ret(Some(Expr::int(1, 4)), 4)),
            2,
        )];
        let mut m = method(Modifiers::STATIC, "sign", "int", vec![param("n", "int")], Some(body));
        setup.stub(&mut m);
        analyze(&mut setup, &mut m);
        assert!(!setup.diagnostics.has_errors(), "{}", setup.diagnostics);
    }

    #[test]
    fn locals_cannot_redeclare_parameters() {
        let mut setup = Setup::new(ClassKind::Class);
        let body = vec![Stmt::local(TypeName::new("int", 2), "n", None, 2)];
        let mut m = method(Modifiers::STATIC, "f", "void", vec![param("n", "int")], Some(body));
        setup.stub(&mut m);
        analyze(&mut setup, &mut m);
        assert!(matches!(
            setup.diagnostics.errors(),
            [CompilationError::DuplicateDefinition { kind: "variable", .. }]
        ));
    }

    #[test]
    fn mutually_recursive_methods() {
        let mut setup = Setup::new(ClassKind::Class);
        let call = |name: &str| {
            Stmt::ret(
                Some(Expr::call(
                    None,
                    name,
                    vec![Expr::binary(BinaryOp::Sub, Expr::var("n", 2), Expr::int(1, 2), 2)],
                    2,
                )),
                2,
            )
        };
        let mut even = method(Modifiers::STATIC, "even", "boolean", vec![param("n", "int")], Some(vec![call("odd")]));
        let mut odd = method(Modifiers::STATIC, "odd", "boolean", vec![param("n", "int")], Some(vec![call("even")]));

        setup.stub(&mut even);
        setup.stub(&mut odd);
        assert!(!setup.diagnostics.has_errors());

        analyze(&mut setup, &mut even);
        analyze(&mut setup, &mut odd);
        assert!(!setup.diagnostics.has_errors(), "{}", setup.diagnostics);
        assert_eq!(even.state, MethodState::Analyzed);
        assert_eq!(odd.state, MethodState::Analyzed);
    }

    // =========================================================================
    // Code generation
    // =========================================================================

    fn generate(setup: &mut Setup, methods: &mut [MethodDecl]) -> ClassImage {
        let unit = setup.unit();
        let mut out = ClassRecorder::new();
        {
            let mut generator = CodeGenerator::new(&setup.registry, &unit, setup.class.ty, &mut out);
            generator
                .emitter()
                .begin_class(Modifiers::PUBLIC, "Test", "java/lang/Object", &[]);
            for m in methods.iter_mut() {
                generator.codegen_method(m).unwrap();
            }
            generator.emitter().end_class();
        }
        out.into_classes().remove(0)
    }

    #[test]
    fn void_methods_get_a_trailing_return() {
        let mut setup = Setup::new(ClassKind::Class);
        let body = vec![Stmt::expr(Expr::assign(
            AssignOp::AddAssign,
            Expr::var("n", 2),
            Expr::int(1, 2),
            2,
        ))];
        let mut m = method(Modifiers::STATIC, "bump", "void", vec![param("n", "int")], Some(body));
        setup.stub(&mut m);
        analyze(&mut setup, &mut m);

        let class = generate(&mut setup, std::slice::from_mut(&mut m));
        assert_eq!(m.state, MethodState::Generated);
        let image = class.method("bump").unwrap();
        assert_eq!(image.descriptor, "(I)V");
        assert_eq!(
            image.opcodes(),
            [OpCode::Iload0, OpCode::Iconst1, OpCode::Iadd, OpCode::Istore0, OpCode::Return]
        );
    }

    #[test]
    fn non_void_methods_end_with_their_own_return() {
        let mut setup = Setup::new(ClassKind::Class);
        let mut m = method(
            Modifiers::PUBLIC,
            "one",
            "double",
            vec![],
            Some(vec![Stmt::ret(Some(Expr::double(1.0, 2)), 2)]),
        );
        setup.stub(&mut m);
        analyze(&mut setup, &mut m);

        let class = generate(&mut setup, std::slice::from_mut(&mut m));
        assert_eq!(class.method("one").unwrap().opcodes(), [OpCode::Dconst1, OpCode::Dreturn]);
    }

    #[test]
    fn generating_an_unanalyzed_method_is_internal() {
        let setup = Setup::new(ClassKind::Class);
        let unit = setup.unit();
        let mut out = ClassRecorder::new();
        let mut generator = CodeGenerator::new(&setup.registry, &unit, setup.class.ty, &mut out);
        let mut m = method(Modifiers::STATIC, "f", "void", vec![], Some(vec![]));
        let err = generator.codegen_method(&mut m).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn implicit_constructor_calls_super() {
        let mut out = ClassRecorder::new();
        {
            let mut emitter = BytecodeEmitter::new(&mut out);
            emitter.begin_class(Modifiers::PUBLIC, "Test", "java/lang/Object", &[]);
            emit_implicit_constructor(&mut emitter, "java/lang/Object");
            emitter.end_class();
        }
        let ctor = out.classes()[0].method("<init>").unwrap();
        assert_eq!(ctor.mods, Modifiers::PUBLIC);
        assert_eq!(ctor.descriptor, "()V");
        assert_eq!(
            ctor.disassemble(),
            "  aload_0\n  invokespecial java/lang/Object.<init>:()V\n  return\n"
        );
    }
}
