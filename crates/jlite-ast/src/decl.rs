//! Declarations: compilation units, classes, fields and methods.

use jlite_core::{Modifiers, Type};

use crate::stmt::Block;

/// A type as written in source: a name plus array dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeName {
    /// `int`, `String`, `java.lang.String`, `Counter`
    pub name: String,
    pub dims: u8,
    pub line: u32,
}

impl TypeName {
    pub fn new(name: impl Into<String>, line: u32) -> Self {
        Self {
            name: name.into(),
            dims: 0,
            line,
        }
    }

    pub fn array(name: impl Into<String>, dims: u8, line: u32) -> Self {
        Self {
            name: name.into(),
            dims,
            line,
        }
    }
}

impl std::fmt::Display for TypeName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.name)?;
        for _ in 0..self.dims {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

/// One source file.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompilationUnit {
    pub file_name: String,
    /// Dotted package name.
    pub package: Option<String>,
    /// Dotted single-type imports.
    pub imports: Vec<String>,
    pub types: Vec<ClassDecl>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassDecl {
    pub line: u32,
    pub mods: Modifiers,
    pub name: String,
    pub kind: ClassKind,
    /// `extends` clause of a class; ignored for interfaces.
    pub superclass: Option<TypeName>,
    /// `implements` of a class, `extends` of an interface.
    pub interfaces: Vec<TypeName>,
    pub members: Vec<Member>,
    /// Set when the class is declared to the registry.
    pub ty: Option<Type>,
}

impl ClassDecl {
    pub fn new(name: impl Into<String>, mods: Modifiers, members: Vec<Member>, line: u32) -> Self {
        Self {
            line,
            mods,
            name: name.into(),
            kind: ClassKind::Class,
            superclass: None,
            interfaces: Vec::new(),
            members,
            ty: None,
        }
    }

    pub fn interface(name: impl Into<String>, mods: Modifiers, members: Vec<Member>, line: u32) -> Self {
        Self {
            kind: ClassKind::Interface,
            ..Self::new(name, mods, members, line)
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == ClassKind::Interface
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            Member::Field(_) => None,
        })
    }

    pub fn method(&self, name: &str) -> Option<&MethodDecl> {
        self.methods().find(|m| m.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
}

/// `mods Type a, b;` at class level.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub line: u32,
    pub mods: Modifiers,
    pub ty: TypeName,
    pub names: Vec<String>,
    pub resolved: Option<Type>,
}

impl FieldDecl {
    pub fn new(mods: Modifiers, ty: TypeName, names: Vec<String>, line: u32) -> Self {
        Self {
            line,
            mods,
            ty,
            names,
            resolved: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormalParam {
    pub line: u32,
    pub name: String,
    pub ty: TypeName,
}

impl FormalParam {
    pub fn new(name: impl Into<String>, ty: TypeName, line: u32) -> Self {
        Self {
            line,
            name: name.into(),
            ty,
        }
    }
}

/// Compilation progress of a method declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MethodState {
    /// Built by the parser; type references are unresolved.
    #[default]
    Unresolved,
    /// Types resolved and a stub registered in the partial class.
    Stubbed,
    /// Body analyzed against its method context.
    Analyzed,
    /// Final instructions emitted.
    Generated,
}

/// Resolved signature of a method.
#[derive(Debug, Clone, PartialEq)]
pub struct MethodSignature {
    pub params: Vec<Type>,
    pub return_type: Type,
    pub exceptions: Vec<Type>,
    pub descriptor: String,
}

/// What analysis learned about a method's frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameInfo {
    /// Local variable slots used, receiver and wide slots included.
    pub max_locals: u16,
    /// Whether every path through the body returns.
    pub always_returns: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub line: u32,
    pub mods: Modifiers,
    pub name: String,
    pub return_type: TypeName,
    pub params: Vec<FormalParam>,
    pub exceptions: Vec<TypeName>,
    /// `None` for abstract methods.
    pub body: Option<Block>,
    pub state: MethodState,
    pub signature: Option<MethodSignature>,
    pub frame: Option<FrameInfo>,
}

impl MethodDecl {
    pub fn new(
        mods: Modifiers,
        name: impl Into<String>,
        return_type: TypeName,
        params: Vec<FormalParam>,
        body: Option<Block>,
        line: u32,
    ) -> Self {
        Self {
            line,
            mods,
            name: name.into(),
            return_type,
            params,
            exceptions: Vec::new(),
            body,
            state: MethodState::Unresolved,
            signature: None,
            frame: None,
        }
    }

    pub fn with_exceptions(mut self, exceptions: Vec<TypeName>) -> Self {
        self.exceptions = exceptions;
        self
    }

    pub fn descriptor(&self) -> Option<&str> {
        self.signature.as_ref().map(|sig| sig.descriptor.as_str())
    }

    pub fn is_static(&self) -> bool {
        self.mods.is_static()
    }
}
