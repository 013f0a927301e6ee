//! Instruction emission.
//!
//! Class-file writing is a service consumed through the [`ClassEmitter`]
//! trait: begin a class, add fields, begin/end methods, append
//! instructions and labels. [`ClassRecorder`] is an in-memory
//! implementation used for the partial (stub) class and by tests.
//!
//! [`BytecodeEmitter`] sits on top of a `ClassEmitter` and provides the
//! type-directed helpers code generation needs: picking `iload` vs
//! `dload`, `dup` vs `dup2`, the cheapest constant push, and the loop
//! label stack for `break`/`continue`.
//!
//! # Example
//!
//! ```ignore
//! let mut recorder = ClassRecorder::new();
//! let mut emitter = BytecodeEmitter::new(&mut recorder);
//!
//! emitter.begin_method(Modifiers::STATIC, "one", "()I", &[]);
//! emitter.emit_int(1);
//! emitter.emit_return(Type::INT);
//! emitter.end_method();
//! ```

mod jumps;
mod recorder;

use std::fmt;

use jlite_core::{Modifiers, Type};
use thiserror::Error;

use crate::bytecode::{Constant, OpCode};
pub use jumps::JumpManager;
pub use recorder::{ClassImage, ClassRecorder, FieldImage, Instruction, MethodImage};

// ============================================================================
// Service interface
// ============================================================================

/// A branch target inside the method being emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Label(u32);

impl Label {
    pub fn new(id: u32) -> Self {
        Label(id)
    }

    pub fn id(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.0)
    }
}

/// The class-file writer consumed by code generation.
pub trait ClassEmitter {
    fn add_class(&mut self, mods: Modifiers, name: &str, super_name: &str, interfaces: &[String]);

    fn add_field(&mut self, mods: Modifiers, name: &str, descriptor: &str);

    /// Begin a method. Instructions go to this method until `end_method`.
    fn add_method(&mut self, mods: Modifiers, name: &str, descriptor: &str, exceptions: &[String]);

    fn end_method(&mut self);

    fn end_class(&mut self);

    /// Allocate a fresh label in the current method.
    fn create_label(&mut self) -> Label;

    /// Bind `label` to the next instruction.
    fn add_label(&mut self, label: Label);

    fn add_no_arg_instruction(&mut self, op: OpCode);

    /// `bipush`, `sipush` and the wide-form local loads and stores.
    fn add_one_arg_instruction(&mut self, op: OpCode, arg: i32);

    fn add_iinc_instruction(&mut self, slot: u16, delta: i16);

    /// `ldc`/`ldc_w`/`ldc2_w`; the writer picks the form.
    fn add_ldc_instruction(&mut self, constant: Constant);

    fn add_branch_instruction(&mut self, op: OpCode, label: Label);

    /// Field access and method invocation.
    fn add_member_access_instruction(&mut self, op: OpCode, owner: &str, name: &str, descriptor: &str);

    /// `new`, `anewarray`, `checkcast`, `instanceof`.
    fn add_reference_instruction(&mut self, op: OpCode, type_name: &str);
}

/// `break` or `continue` emitted with no enclosing loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum BreakError {
    #[error("break or continue statement not inside a loop")]
    NotInLoop,
}

// ============================================================================
// BytecodeEmitter
// ============================================================================

/// Type-directed instruction helpers over a [`ClassEmitter`].
pub struct BytecodeEmitter<'a> {
    out: &'a mut dyn ClassEmitter,
    jumps: JumpManager,
}

impl<'a> BytecodeEmitter<'a> {
    pub fn new(out: &'a mut dyn ClassEmitter) -> Self {
        Self {
            out,
            jumps: JumpManager::new(),
        }
    }

    // ==========================================================================
    // Class structure
    // ==========================================================================

    pub fn begin_class(&mut self, mods: Modifiers, name: &str, super_name: &str, interfaces: &[String]) {
        self.out.add_class(mods, name, super_name, interfaces);
    }

    pub fn add_field(&mut self, mods: Modifiers, name: &str, descriptor: &str) {
        self.out.add_field(mods, name, descriptor);
    }

    pub fn begin_method(&mut self, mods: Modifiers, name: &str, descriptor: &str, exceptions: &[String]) {
        self.out.add_method(mods, name, descriptor, exceptions);
    }

    pub fn end_method(&mut self) {
        self.out.end_method();
    }

    pub fn end_class(&mut self) {
        self.out.end_class();
    }

    // ==========================================================================
    // Basic emission
    // ==========================================================================

    /// Emit a single opcode with no operands.
    pub fn emit(&mut self, op: OpCode) {
        self.out.add_no_arg_instruction(op);
    }

    pub fn emit_member(&mut self, op: OpCode, owner: &str, name: &str, descriptor: &str) {
        self.out.add_member_access_instruction(op, owner, name, descriptor);
    }

    pub fn emit_reference(&mut self, op: OpCode, type_name: &str) {
        self.out.add_reference_instruction(op, type_name);
    }

    // ==========================================================================
    // Constants
    // ==========================================================================

    /// Emit an int constant with the shortest encoding.
    pub fn emit_int(&mut self, value: i32) {
        match value {
            -1 => self.emit(OpCode::IconstM1),
            0 => self.emit(OpCode::Iconst0),
            1 => self.emit(OpCode::Iconst1),
            2 => self.emit(OpCode::Iconst2),
            3 => self.emit(OpCode::Iconst3),
            4 => self.emit(OpCode::Iconst4),
            5 => self.emit(OpCode::Iconst5),
            v if i8::try_from(v).is_ok() => self.out.add_one_arg_instruction(OpCode::Bipush, v),
            v if i16::try_from(v).is_ok() => self.out.add_one_arg_instruction(OpCode::Sipush, v),
            v => self.out.add_ldc_instruction(Constant::Int(v)),
        }
    }

    pub fn emit_long(&mut self, value: i64) {
        match value {
            0 => self.emit(OpCode::Lconst0),
            1 => self.emit(OpCode::Lconst1),
            v => self.out.add_ldc_instruction(Constant::Long(v)),
        }
    }

    pub fn emit_float(&mut self, value: f32) {
        if value == 0.0 && value.is_sign_positive() {
            self.emit(OpCode::Fconst0);
        } else if value == 1.0 {
            self.emit(OpCode::Fconst1);
        } else if value == 2.0 {
            self.emit(OpCode::Fconst2);
        } else {
            self.out.add_ldc_instruction(Constant::float(value));
        }
    }

    pub fn emit_double(&mut self, value: f64) {
        if value == 0.0 && value.is_sign_positive() {
            self.emit(OpCode::Dconst0);
        } else if value == 1.0 {
            self.emit(OpCode::Dconst1);
        } else {
            self.out.add_ldc_instruction(Constant::double(value));
        }
    }

    pub fn emit_string(&mut self, value: &str) {
        self.out.add_ldc_instruction(Constant::String(value.to_string()));
    }

    /// Push the zero value of `ty` (`0`, `0L`, `0.0f`, `0.0`, or `null`).
    pub fn emit_zero(&mut self, ty: Type) {
        match ty {
            Type::LONG => self.emit(OpCode::Lconst0),
            Type::FLOAT => self.emit(OpCode::Fconst0),
            Type::DOUBLE => self.emit(OpCode::Dconst0),
            t if t.is_int_like() => self.emit(OpCode::Iconst0),
            _ => self.emit(OpCode::AconstNull),
        }
    }

    /// Push the value one of `ty`.
    pub fn emit_one(&mut self, ty: Type) {
        match ty {
            Type::LONG => self.emit(OpCode::Lconst1),
            Type::FLOAT => self.emit(OpCode::Fconst1),
            Type::DOUBLE => self.emit(OpCode::Dconst1),
            _ => self.emit(OpCode::Iconst1),
        }
    }

    // ==========================================================================
    // Locals
    // ==========================================================================

    /// Load a local of type `ty` from `slot`.
    pub fn emit_load(&mut self, ty: Type, slot: u16) {
        let (short, long) = match ty {
            Type::LONG => ([OpCode::Lload0, OpCode::Lload1, OpCode::Lload2, OpCode::Lload3], OpCode::Lload),
            Type::FLOAT => ([OpCode::Fload0, OpCode::Fload1, OpCode::Fload2, OpCode::Fload3], OpCode::Fload),
            Type::DOUBLE => ([OpCode::Dload0, OpCode::Dload1, OpCode::Dload2, OpCode::Dload3], OpCode::Dload),
            t if t.is_int_like() => ([OpCode::Iload0, OpCode::Iload1, OpCode::Iload2, OpCode::Iload3], OpCode::Iload),
            _ => ([OpCode::Aload0, OpCode::Aload1, OpCode::Aload2, OpCode::Aload3], OpCode::Aload),
        };
        self.emit_local(short, long, slot);
    }

    /// Store the top of stack (of type `ty`) into `slot`.
    pub fn emit_store(&mut self, ty: Type, slot: u16) {
        let (short, long) = match ty {
            Type::LONG => ([OpCode::Lstore0, OpCode::Lstore1, OpCode::Lstore2, OpCode::Lstore3], OpCode::Lstore),
            Type::FLOAT => ([OpCode::Fstore0, OpCode::Fstore1, OpCode::Fstore2, OpCode::Fstore3], OpCode::Fstore),
            Type::DOUBLE => ([OpCode::Dstore0, OpCode::Dstore1, OpCode::Dstore2, OpCode::Dstore3], OpCode::Dstore),
            t if t.is_int_like() => ([OpCode::Istore0, OpCode::Istore1, OpCode::Istore2, OpCode::Istore3], OpCode::Istore),
            _ => ([OpCode::Astore0, OpCode::Astore1, OpCode::Astore2, OpCode::Astore3], OpCode::Astore),
        };
        self.emit_local(short, long, slot);
    }

    fn emit_local(&mut self, short: [OpCode; 4], long: OpCode, slot: u16) {
        match short.get(usize::from(slot)) {
            Some(op) => self.emit(*op),
            None => self.out.add_one_arg_instruction(long, i32::from(slot)),
        }
    }

    pub fn emit_iinc(&mut self, slot: u16, delta: i16) {
        self.out.add_iinc_instruction(slot, delta);
    }

    // ==========================================================================
    // Stack
    // ==========================================================================

    /// Duplicate the top value.
    pub fn emit_dup(&mut self, ty: Type) {
        self.emit(if ty.is_wide() { OpCode::Dup2 } else { OpCode::Dup });
    }

    /// Duplicate the top value below one stack word (an object reference).
    pub fn emit_dup_x1(&mut self, ty: Type) {
        self.emit(if ty.is_wide() { OpCode::Dup2X1 } else { OpCode::DupX1 });
    }

    /// Duplicate the top value below two stack words (array and index).
    pub fn emit_dup_x2(&mut self, ty: Type) {
        self.emit(if ty.is_wide() { OpCode::Dup2X2 } else { OpCode::DupX2 });
    }

    pub fn emit_pop(&mut self, ty: Type) {
        if ty == Type::VOID {
            return;
        }
        self.emit(if ty.is_wide() { OpCode::Pop2 } else { OpCode::Pop });
    }

    // ==========================================================================
    // Arrays
    // ==========================================================================

    pub fn emit_array_load(&mut self, element: Type) {
        self.emit(match element {
            Type::INT => OpCode::Iaload,
            Type::LONG => OpCode::Laload,
            Type::FLOAT => OpCode::Faload,
            Type::DOUBLE => OpCode::Daload,
            Type::BOOLEAN | Type::BYTE => OpCode::Baload,
            Type::CHAR => OpCode::Caload,
            Type::SHORT => OpCode::Saload,
            _ => OpCode::Aaload,
        });
    }

    pub fn emit_array_store(&mut self, element: Type) {
        self.emit(match element {
            Type::INT => OpCode::Iastore,
            Type::LONG => OpCode::Lastore,
            Type::FLOAT => OpCode::Fastore,
            Type::DOUBLE => OpCode::Dastore,
            Type::BOOLEAN | Type::BYTE => OpCode::Bastore,
            Type::CHAR => OpCode::Castore,
            Type::SHORT => OpCode::Sastore,
            _ => OpCode::Aastore,
        });
    }

    // ==========================================================================
    // Returns
    // ==========================================================================

    /// Return a value of type `ty` (or nothing for `void`).
    pub fn emit_return(&mut self, ty: Type) {
        self.emit(match ty {
            Type::VOID => OpCode::Return,
            Type::LONG => OpCode::Lreturn,
            Type::FLOAT => OpCode::Freturn,
            Type::DOUBLE => OpCode::Dreturn,
            t if t.is_int_like() => OpCode::Ireturn,
            _ => OpCode::Areturn,
        });
    }

    // ==========================================================================
    // Labels and branches
    // ==========================================================================

    pub fn new_label(&mut self) -> Label {
        self.out.create_label()
    }

    pub fn place_label(&mut self, label: Label) {
        self.out.add_label(label);
    }

    pub fn emit_branch(&mut self, op: OpCode, label: Label) {
        self.out.add_branch_instruction(op, label);
    }

    pub fn emit_goto(&mut self, label: Label) {
        self.emit_branch(OpCode::Goto, label);
    }

    // ==========================================================================
    // Loop control
    // ==========================================================================

    /// Enter a loop whose `break` jumps to `break_label` and whose
    /// `continue` jumps to `continue_label`.
    pub fn enter_loop(&mut self, break_label: Label, continue_label: Label) {
        self.jumps.enter_loop(break_label, continue_label);
    }

    pub fn exit_loop(&mut self) {
        self.jumps.exit_loop();
    }

    pub fn emit_break(&mut self) -> Result<(), BreakError> {
        let target = self.jumps.break_target()?;
        self.emit_goto(target);
        Ok(())
    }

    pub fn emit_continue(&mut self) -> Result<(), BreakError> {
        let target = self.jumps.continue_target()?;
        self.emit_goto(target);
        Ok(())
    }
}
