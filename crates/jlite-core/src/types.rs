//! The [`Type`] handle.

use std::fmt;

use crate::TypeHash;

/// An interned type.
///
/// A `Type` is a copyable handle over the [`TypeHash`] of the type's
/// internal name. Structural information (superclass, element type,
/// descriptor) lives in the [`TypeRegistry`](crate::TypeRegistry).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Type(TypeHash);

impl Type {
    // ==========================================================================
    // Primitives
    // ==========================================================================

    pub const INT: Type = Type::named("int");
    pub const LONG: Type = Type::named("long");
    pub const FLOAT: Type = Type::named("float");
    pub const DOUBLE: Type = Type::named("double");
    pub const BOOLEAN: Type = Type::named("boolean");
    pub const CHAR: Type = Type::named("char");
    pub const BYTE: Type = Type::named("byte");
    pub const SHORT: Type = Type::named("short");
    pub const VOID: Type = Type::named("void");

    // ==========================================================================
    // Pseudo types
    // ==========================================================================

    /// Type of the `null` literal. Matches every reference type.
    pub const NULL: Type = Type::named("<null>");

    /// Placeholder given to expressions whose analysis failed.
    ///
    /// `ANY` matches every type so a single error does not cascade into
    /// follow-up mismatches.
    pub const ANY: Type = Type::named("<any>");

    // ==========================================================================
    // Well-known classes
    // ==========================================================================

    pub const OBJECT: Type = Type::named("java/lang/Object");
    pub const STRING: Type = Type::named("java/lang/String");
    pub const STRING_BUILDER: Type = Type::named("java/lang/StringBuilder");
    pub const THROWABLE: Type = Type::named("java/lang/Throwable");

    /// Every primitive type, `void` included.
    pub const PRIMITIVES: [Type; 9] = [
        Type::INT,
        Type::LONG,
        Type::FLOAT,
        Type::DOUBLE,
        Type::BOOLEAN,
        Type::CHAR,
        Type::BYTE,
        Type::SHORT,
        Type::VOID,
    ];

    /// Create the type handle for an internal name.
    pub const fn named(internal_name: &str) -> Type {
        Type(TypeHash::from_name(internal_name))
    }

    /// The underlying hash.
    pub const fn hash(self) -> TypeHash {
        self.0
    }

    pub fn is_primitive(self) -> bool {
        Self::PRIMITIVES.contains(&self)
    }

    /// Reference types include `null` but not the `ANY` placeholder.
    pub fn is_reference(self) -> bool {
        !self.is_primitive() && self != Type::ANY
    }

    /// `long` and `double` occupy two local slots and two stack words.
    pub fn is_wide(self) -> bool {
        self == Type::LONG || self == Type::DOUBLE
    }

    /// Number of local variable slots a value of this type occupies.
    pub fn slot_size(self) -> u16 {
        if self == Type::VOID {
            0
        } else if self.is_wide() {
            2
        } else {
            1
        }
    }

    pub fn is_integral(self) -> bool {
        matches!(
            self,
            Type::INT | Type::LONG | Type::CHAR | Type::BYTE | Type::SHORT
        )
    }

    pub fn is_numeric(self) -> bool {
        self.is_integral() || self == Type::FLOAT || self == Type::DOUBLE
    }

    /// Types the JVM represents as an `int` on the operand stack.
    pub fn is_int_like(self) -> bool {
        matches!(
            self,
            Type::INT | Type::CHAR | Type::BYTE | Type::SHORT | Type::BOOLEAN
        )
    }

    /// True if this type is one of `types`, or is the `ANY` placeholder.
    pub fn matches_one_of(self, types: &[Type]) -> bool {
        self == Type::ANY || types.contains(&self)
    }

    /// Exact match, relaxed only for `ANY` and for `null` against references.
    pub fn matches_expected(self, expected: Type) -> bool {
        self == expected
            || self == Type::ANY
            || expected == Type::ANY
            || (self == Type::NULL && expected.is_reference())
    }

    /// Source keyword of a primitive type.
    pub fn primitive_name(self) -> Option<&'static str> {
        Some(match self {
            Type::INT => "int",
            Type::LONG => "long",
            Type::FLOAT => "float",
            Type::DOUBLE => "double",
            Type::BOOLEAN => "boolean",
            Type::CHAR => "char",
            Type::BYTE => "byte",
            Type::SHORT => "short",
            Type::VOID => "void",
            _ => return None,
        })
    }

    /// Single-letter descriptor of a primitive type.
    pub fn primitive_descriptor(self) -> Option<&'static str> {
        Some(match self {
            Type::INT => "I",
            Type::LONG => "J",
            Type::FLOAT => "F",
            Type::DOUBLE => "D",
            Type::BOOLEAN => "Z",
            Type::CHAR => "C",
            Type::BYTE => "B",
            Type::SHORT => "S",
            Type::VOID => "V",
            _ => return None,
        })
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.primitive_name() {
            Some(name) => write!(f, "Type({name})"),
            None if *self == Type::NULL => f.write_str("Type(null)"),
            None if *self == Type::ANY => f.write_str("Type(any)"),
            None => write!(f, "Type({})", self.0),
        }
    }
}
