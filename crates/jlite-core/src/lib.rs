//! Core types for the jlite compiler.
//!
//! This crate holds everything the AST and the compiler agree on:
//!
//! - [`TypeHash`] / [`Type`]: interned type identity
//! - [`TypeRegistry`]: class hierarchy, arrays and descriptors
//! - [`Modifiers`]: access and storage modifiers with JVM flag values
//! - [`TokenKind`] / [`TokenInfo`]: the fixed token vocabulary
//! - [`CompilationError`] / [`Diagnostics`]: semantic errors and the per-unit sink

mod diagnostics;
mod error;
mod modifiers;
mod registry;
mod token;
pub mod type_hash;
mod types;

pub use diagnostics::Diagnostics;
pub use error::{CompilationError, ErrorKind};
pub use modifiers::Modifiers;
pub use registry::{TypeEntry, TypeKind, TypeRegistry};
pub use token::{TokenInfo, TokenKind};
pub use type_hash::TypeHash;
pub use types::Type;
