//! Deterministic hash-based type identity.
//!
//! [`TypeHash`] is a 64-bit hash computed from a type's internal name
//! (`java/lang/String`, `int`, `[I`). Because the hash only depends on the
//! name, a type can be referred to before it is registered and two
//! references to the same name always agree.
//!
//! # Examples
//!
//! ```
//! use jlite_core::TypeHash;
//!
//! let a = TypeHash::from_name("java/lang/String");
//! let b = TypeHash::from_name("java/lang/String");
//! assert_eq!(a, b);
//! ```

use std::fmt;
use xxhash_rust::const_xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Domain marker for type hashes
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for method hashes
    pub const METHOD: u64 = 0x7d3c8b4a92e15f6d;

    /// Separator mixed between the method name and its descriptor
    pub const SEP: u64 = 0x4bc94d6bd06053ad;
}

/// A deterministic 64-bit hash identifying a type or a method.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from an internal type name.
    ///
    /// This is a `const fn`, so the primitive and well-known class types can
    /// be declared as constants.
    #[inline]
    pub const fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a method hash from the owner, method name and descriptor.
    ///
    /// Two methods of one class collide exactly when they share name and
    /// descriptor, which is the JVM's notion of a duplicate method.
    #[inline]
    pub fn from_method(owner: TypeHash, name: &str, descriptor: &str) -> Self {
        let name_hash = xxh64(name.as_bytes(), 0);
        let desc_hash = xxh64(descriptor.as_bytes(), 0);
        TypeHash(
            (hash_constants::METHOD ^ owner.0 ^ name_hash)
                .wrapping_mul(hash_constants::SEP)
                .wrapping_add(desc_hash),
        )
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}
