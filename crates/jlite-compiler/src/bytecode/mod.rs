//! Bytecode vocabulary: opcodes and loadable constants.

mod constant;
mod opcode;

pub use constant::{Constant, ConstantPool};
pub use opcode::OpCode;
