//! Registration pass - declare every type and stub every member.
//!
//! This pass walks the declarations of a unit and fixes the shape of each
//! class before any method body is looked at:
//!
//! - Process single-type imports
//! - Declare every class and interface to the registry (so supertypes,
//!   fields and signatures may refer to types declared later in the unit)
//! - Resolve superclasses and implemented interfaces
//! - Resolve field types and register fields
//! - Pre-analyze every method: resolve its signature, check modifiers and
//!   emit a stub into the partial class
//!
//! The partial classes are emitted into an in-memory [`ClassRecorder`] and
//! returned with the pass output.

use jlite_ast::{ClassDecl, ClassKind, CompilationUnit, FieldDecl, Member, TypeName};
use jlite_core::{CompilationError, Diagnostics, Modifiers, Type, TypeKind, TypeRegistry};
use rustc_hash::FxHashSet;

use crate::context::{ClassContext, FieldEntry, UnitContext};
use crate::emit::{BytecodeEmitter, ClassImage, ClassRecorder};
use crate::method::{emit_implicit_constructor, pre_analyze};
use crate::options::CompilerOptions;
use crate::type_resolver::TypeResolver;

/// Output of the registration pass.
#[derive(Debug, Default)]
pub struct RegistrationOutput {
    /// Class contexts of every declared type, members included.
    pub classes: UnitContext,
    /// Stub classes: real signatures, placeholder bodies.
    pub partial_classes: Vec<ClassImage>,
    pub types_registered: usize,
    pub methods_registered: usize,
}

pub struct RegistrationPass<'a> {
    registry: &'a mut TypeRegistry,
    diagnostics: &'a mut Diagnostics,
    options: &'a CompilerOptions,
    partial: ClassRecorder,
    types_registered: usize,
    methods_registered: usize,
}

impl<'a> RegistrationPass<'a> {
    pub fn new(registry: &'a mut TypeRegistry, diagnostics: &'a mut Diagnostics, options: &'a CompilerOptions) -> Self {
        Self {
            registry,
            diagnostics,
            options,
            partial: ClassRecorder::new(),
            types_registered: 0,
            methods_registered: 0,
        }
    }

    /// Run the registration pass on a unit.
    #[cfg_attr(feature = "profiling", profiling::function)]
    pub fn run(mut self, unit: &mut CompilationUnit) -> RegistrationOutput {
        log::debug!("registration: {} type(s) in '{}'", unit.types.len(), unit.file_name);

        for import in &unit.imports {
            if self.registry.import(import).is_none() {
                self.diagnostics.report(CompilationError::UnknownType {
                    name: import.clone(),
                    line: 0,
                });
            }
        }

        let mut seen = FxHashSet::default();
        for decl in &mut unit.types {
            if !seen.insert(decl.name.clone()) {
                self.diagnostics.report(CompilationError::DuplicateDefinition {
                    kind: "class",
                    name: decl.name.clone(),
                    line: decl.line,
                });
            }
            self.declare(unit.package.as_deref(), decl);
        }

        let mut classes = UnitContext::new(unit.package.clone());
        for decl in &mut unit.types {
            if let Some(class) = self.visit_class(decl) {
                classes.add_class(class);
            }
        }

        log::debug!(
            "registration done: {} type(s), {} method(s), {} error(s) so far",
            self.types_registered,
            self.methods_registered,
            self.diagnostics.error_count()
        );

        RegistrationOutput {
            classes,
            partial_classes: self.partial.into_classes(),
            types_registered: self.types_registered,
            methods_registered: self.methods_registered,
        }
    }

    // ==========================================================================
    // Declaration
    // ==========================================================================

    /// Declare a type to the registry under its internal name and make it
    /// reachable by its simple name.
    fn declare(&mut self, package: Option<&str>, decl: &mut ClassDecl) {
        let internal_name = match package {
            Some(package) => format!("{}/{}", package.replace('.', "/"), decl.name),
            None => decl.name.clone(),
        };
        let kind = match decl.kind {
            ClassKind::Class => TypeKind::Class,
            ClassKind::Interface => TypeKind::Interface,
        };
        let ty = self
            .registry
            .register_class(&internal_name, kind, Some(Type::OBJECT), Vec::new());
        self.registry.add_alias(&decl.name, ty);
        decl.ty = Some(ty);
        self.types_registered += 1;
    }

    // ==========================================================================
    // Class
    // ==========================================================================

    fn visit_class(&mut self, decl: &mut ClassDecl) -> Option<ClassContext> {
        let ty = decl.ty?;
        let (superclass, interfaces) = self.resolve_supertypes(decl);
        self.registry
            .set_supertypes(ty, Some(superclass), interfaces.clone());

        let mut mods = decl.mods;
        if decl.is_interface() {
            mods |= Modifiers::INTERFACE | Modifiers::ABSTRACT;
        }
        let internal_name = self.registry.internal_name(ty).to_string();
        let mut class = ClassContext::new(ty, decl.name.clone(), internal_name, decl.kind, mods);
        class.superclass = superclass;
        class.interfaces = interfaces;

        let super_name = self.registry.internal_name(superclass).to_string();
        let interface_names: Vec<String> = class
            .interfaces
            .iter()
            .map(|iface| self.registry.internal_name(*iface).to_string())
            .collect();

        let mut partial = BytecodeEmitter::new(&mut self.partial);
        partial.begin_class(class.mods, &class.internal_name, &super_name, &interface_names);

        for member in &mut decl.members {
            if let Member::Field(field) = member {
                add_fields(self.registry, self.diagnostics, &mut class, field, &mut partial);
            }
        }

        if self.options.implicit_constructor && !class.is_interface() {
            emit_implicit_constructor(&mut partial, &super_name);
        }

        for member in &mut decl.members {
            if let Member::Method(method) = member {
                pre_analyze(method, &mut class, self.registry, self.diagnostics, &mut partial);
                self.methods_registered += 1;
            }
        }

        partial.end_class();
        log::trace!(
            "registered {} with {} field(s), {} method(s)",
            class.internal_name,
            class.fields().len(),
            class.methods().len()
        );
        Some(class)
    }

    /// Resolve `extends`/`implements`. Anything that fails to resolve, or
    /// resolves to the wrong kind of type, is reported and left out.
    fn resolve_supertypes(&mut self, decl: &ClassDecl) -> (Type, Vec<Type>) {
        let mut superclass = Type::OBJECT;
        if let (ClassKind::Class, Some(name)) = (decl.kind, &decl.superclass) {
            if let Some(ty) = self.resolve_kind(name, TypeKind::Class, "class") {
                superclass = ty;
            }
        }

        let interfaces = decl
            .interfaces
            .iter()
            .filter_map(|name| self.resolve_kind(name, TypeKind::Interface, "interface"))
            .collect();
        (superclass, interfaces)
    }

    fn resolve_kind(&mut self, name: &TypeName, kind: TypeKind, expected: &str) -> Option<Type> {
        let ty = match TypeResolver::new(self.registry).resolve(name) {
            Ok(ty) => ty,
            Err(error) => {
                self.diagnostics.report(error);
                return None;
            }
        };
        if self.registry.kind(ty) != Some(kind) {
            self.diagnostics.report(CompilationError::type_mismatch(
                format!("{} found where {expected} expected", self.registry.display_name(ty)),
                name.line,
            ));
            return None;
        }
        Some(ty)
    }
}

/// Register the fields of one declaration and add them to the partial class.
///
/// Interface fields are implicitly `public static final`.
fn add_fields(
    registry: &mut TypeRegistry,
    diagnostics: &mut Diagnostics,
    class: &mut ClassContext,
    field: &mut FieldDecl,
    partial: &mut BytecodeEmitter<'_>,
) {
    let ty = match TypeResolver::new(registry).resolve_value_type(&field.ty) {
        Ok(ty) => ty,
        Err(error) => {
            diagnostics.report(error);
            Type::ANY
        }
    };
    field.resolved = Some(ty);
    if class.is_interface() {
        field.mods |= Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL;
    }

    let descriptor = registry.descriptor(ty);
    for name in &field.names {
        let entry = FieldEntry {
            name: name.clone(),
            ty,
            mods: field.mods,
            line: field.line,
        };
        match class.add_field(entry) {
            Ok(()) => partial.add_field(field.mods, name, &descriptor),
            Err(error) => diagnostics.report(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::OpCode;
    use jlite_ast::{Block, FormalParam, MethodDecl, MethodState};
    use jlite_core::ErrorKind;

    fn void_method(name: &str) -> Member {
        Member::Method(MethodDecl::new(
            Modifiers::PUBLIC,
            name,
            TypeName::new("void", 3),
            vec![],
            Some(Block::default()),
            3,
        ))
    }

    fn run(unit: &mut CompilationUnit) -> (RegistrationOutput, TypeRegistry, Diagnostics) {
        let mut registry = TypeRegistry::with_builtins();
        let mut diagnostics = Diagnostics::new();
        let options = CompilerOptions::default();
        let output = RegistrationPass::new(&mut registry, &mut diagnostics, &options).run(unit);
        (output, registry, diagnostics)
    }

    #[test]
    fn forward_references_between_classes() {
        let mut derived = ClassDecl::new("Derived", Modifiers::PUBLIC, vec![], 1);
        derived.superclass = Some(TypeName::new("Base", 1));
        derived.interfaces = vec![TypeName::new("Marker", 1)];
        let field = FieldDecl::new(Modifiers::empty(), TypeName::new("Base", 2), vec!["next".into()], 2);
        derived.members.push(Member::Field(field));
        let base = ClassDecl::new("Base", Modifiers::PUBLIC, vec![], 5);
        let marker = ClassDecl::interface("Marker", Modifiers::PUBLIC, vec![], 6);

        let mut unit = CompilationUnit {
            file_name: "Derived.java".into(),
            package: Some("demo.app".into()),
            types: vec![derived, base, marker],
            ..CompilationUnit::default()
        };
        let (output, registry, diagnostics) = run(&mut unit);
        assert!(!diagnostics.has_errors(), "{diagnostics}");
        assert_eq!(output.types_registered, 3);

        let derived_ty = unit.types[0].ty.unwrap();
        let base_ty = unit.types[1].ty.unwrap();
        assert_eq!(registry.internal_name(derived_ty), "demo/app/Derived");
        assert_eq!(registry.superclass(derived_ty), Some(base_ty));
        assert!(registry.is_assignable_from(unit.types[2].ty.unwrap(), derived_ty));

        let class = output.classes.class(derived_ty).unwrap();
        assert_eq!(class.field("next").unwrap().ty, base_ty);

        let partial = &output.partial_classes[0];
        assert_eq!(partial.name, "demo/app/Derived");
        assert_eq!(partial.super_name, "demo/app/Base");
        assert_eq!(partial.interfaces, ["demo/app/Marker"]);
        assert_eq!(partial.field("next").unwrap().descriptor, "Ldemo/app/Base;");
    }

    #[test]
    fn classes_get_an_implicit_constructor() {
        let class = ClassDecl::new("Point", Modifiers::PUBLIC, vec![void_method("reset")], 1);
        let iface = ClassDecl::interface("Shape", Modifiers::PUBLIC, vec![], 1);
        let mut unit = CompilationUnit {
            types: vec![class, iface],
            ..CompilationUnit::default()
        };
        let (output, _, _) = run(&mut unit);

        let point = &output.partial_classes[0];
        let ctor = point.method("<init>").unwrap();
        assert_eq!(
            ctor.opcodes(),
            [OpCode::Aload0, OpCode::Invokespecial, OpCode::Return]
        );
        assert!(point.method("reset").is_some());

        let shape = &output.partial_classes[1];
        assert!(shape.method("<init>").is_none());
        assert!(shape.mods.contains(Modifiers::INTERFACE | Modifiers::ABSTRACT));
    }

    #[test]
    fn every_method_is_stubbed() {
        let mut class = ClassDecl::new("Calc", Modifiers::PUBLIC, vec![], 1);
        class.members.push(Member::Method(MethodDecl::new(
            Modifiers::STATIC,
            "square",
            TypeName::new("int", 2),
            vec![FormalParam::new("x", TypeName::new("int", 2), 2)],
            Some(Block::default()),
            2,
        )));
        class.members.push(void_method("clear"));
        let mut unit = CompilationUnit {
            types: vec![class],
            ..CompilationUnit::default()
        };
        let (output, _, _) = run(&mut unit);

        assert_eq!(output.methods_registered, 2);
        assert!(unit.types[0].methods().all(|m| m.state == MethodState::Stubbed));
        let square = output.partial_classes[0].method("square").unwrap();
        assert_eq!(square.descriptor, "(I)I");
        assert_eq!(square.opcodes(), [OpCode::Iconst0, OpCode::Ireturn]);
    }

    #[test]
    fn interface_fields_are_constants() {
        let field = FieldDecl::new(Modifiers::empty(), TypeName::new("int", 2), vec!["SIZE".into()], 2);
        let iface = ClassDecl::interface("Sized", Modifiers::PUBLIC, vec![Member::Field(field)], 1);
        let mut unit = CompilationUnit {
            types: vec![iface],
            ..CompilationUnit::default()
        };
        let (output, _, _) = run(&mut unit);
        let image = output.partial_classes[0].field("SIZE").unwrap();
        assert_eq!(image.mods, Modifiers::PUBLIC | Modifiers::STATIC | Modifiers::FINAL);
    }

    #[test]
    fn bad_declarations_are_reported() {
        let mut class = ClassDecl::new("Broken", Modifiers::PUBLIC, vec![], 1);
        class.superclass = Some(TypeName::new("Missing", 1));
        class.interfaces = vec![TypeName::new("String", 1)];
        class.members.push(Member::Field(FieldDecl::new(
            Modifiers::empty(),
            TypeName::new("int", 2),
            vec!["a".into(), "a".into()],
            2,
        )));
        let twin = ClassDecl::new("Broken", Modifiers::PUBLIC, vec![], 9);
        let mut unit = CompilationUnit {
            imports: vec!["java.util.Nothing".into()],
            types: vec![class, twin],
            ..CompilationUnit::default()
        };
        let (_, _, diagnostics) = run(&mut unit);

        assert_eq!(diagnostics.count(ErrorKind::Resolution), 4);
        assert_eq!(diagnostics.count(ErrorKind::TypeMismatch), 1);
        assert!(
            diagnostics
                .iter()
                .any(|e| e.to_string() == "line 1: java.lang.String found where interface expected")
        );
    }

    #[test]
    fn imports_make_simple_names_available() {
        let method = MethodDecl::new(
            Modifiers::PUBLIC,
            "read",
            TypeName::new("void", 2),
            vec![],
            Some(Block::default()),
            2,
        )
        .with_exceptions(vec![TypeName::new("IOException", 2)]);
        let mut unit = CompilationUnit {
            imports: vec!["java.io.IOException".into()],
            types: vec![ClassDecl::new("Reader", Modifiers::PUBLIC, vec![Member::Method(method)], 1)],
            ..CompilationUnit::default()
        };
        let (output, _, diagnostics) = run(&mut unit);
        assert!(!diagnostics.has_errors(), "{diagnostics}");
        assert_eq!(
            output.partial_classes[0].method("read").unwrap().exceptions,
            ["java/io/IOException"]
        );
    }
}
