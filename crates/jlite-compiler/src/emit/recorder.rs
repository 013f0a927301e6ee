//! In-memory [`ClassEmitter`].
//!
//! The recorder keeps every class, field, method and instruction it is
//! given. The compiler uses it for the partial class built by the stub
//! pass; tests use it to inspect generated code.

use std::fmt::{self, Write as _};

use jlite_core::Modifiers;
use rustc_hash::FxHashMap;

use super::{ClassEmitter, Label};
use crate::bytecode::{Constant, ConstantPool, OpCode};

/// One recorded instruction or label definition.
#[derive(Debug, Clone, PartialEq)]
pub enum Instruction {
    NoArg(OpCode),
    OneArg(OpCode, i32),
    Iinc { slot: u16, delta: i16 },
    Ldc(Constant),
    Branch(OpCode, Label),
    Member {
        op: OpCode,
        owner: String,
        name: String,
        descriptor: String,
    },
    Reference { op: OpCode, type_name: String },
    Label(Label),
}

impl Instruction {
    /// The opcode of this instruction, `None` for label definitions.
    pub fn opcode(&self) -> Option<OpCode> {
        match self {
            Instruction::NoArg(op)
            | Instruction::OneArg(op, _)
            | Instruction::Branch(op, _)
            | Instruction::Member { op, .. }
            | Instruction::Reference { op, .. } => Some(*op),
            Instruction::Iinc { .. } => Some(OpCode::Iinc),
            Instruction::Ldc(constant) if constant.is_wide() => Some(OpCode::Ldc2W),
            Instruction::Ldc(_) => Some(OpCode::Ldc),
            Instruction::Label(_) => None,
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::NoArg(op) => write!(f, "{op}"),
            Instruction::OneArg(op, arg) => write!(f, "{op} {arg}"),
            Instruction::Iinc { slot, delta } => write!(f, "iinc {slot} {delta}"),
            Instruction::Ldc(constant) => {
                let op = if constant.is_wide() { "ldc2_w" } else { "ldc" };
                write!(f, "{op} {constant}")
            }
            Instruction::Branch(op, label) => write!(f, "{op} {label}"),
            Instruction::Member {
                op,
                owner,
                name,
                descriptor,
            } => write!(f, "{op} {owner}.{name}:{descriptor}"),
            Instruction::Reference { op, type_name } => write!(f, "{op} {type_name}"),
            Instruction::Label(label) => write!(f, "{label}:"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldImage {
    pub mods: Modifiers,
    pub name: String,
    pub descriptor: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodImage {
    pub mods: Modifiers,
    pub name: String,
    pub descriptor: String,
    pub exceptions: Vec<String>,
    pub code: Vec<Instruction>,
}

impl MethodImage {
    /// Opcodes in order, label definitions skipped.
    pub fn opcodes(&self) -> Vec<OpCode> {
        self.code.iter().filter_map(Instruction::opcode).collect()
    }

    pub fn is_abstract(&self) -> bool {
        self.mods.is_abstract()
    }

    /// One instruction per line.
    pub fn disassemble(&self) -> String {
        let mut out = String::new();
        for instruction in &self.code {
            let indent = if matches!(instruction, Instruction::Label(_)) { "" } else { "  " };
            let _ = writeln!(out, "{indent}{instruction}");
        }
        out
    }
}

#[derive(Debug, Clone)]
pub struct ClassImage {
    pub mods: Modifiers,
    pub name: String,
    pub super_name: String,
    pub interfaces: Vec<String>,
    pub fields: Vec<FieldImage>,
    pub methods: Vec<MethodImage>,
    pub constants: ConstantPool,
}

impl ClassImage {
    pub fn method(&self, name: &str) -> Option<&MethodImage> {
        self.methods.iter().find(|m| m.name == name)
    }

    pub fn method_with_descriptor(&self, name: &str, descriptor: &str) -> Option<&MethodImage> {
        self.methods
            .iter()
            .find(|m| m.name == name && m.descriptor == descriptor)
    }

    pub fn field(&self, name: &str) -> Option<&FieldImage> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Send this class to another emitter, in recording order.
    ///
    /// Labels are created afresh in `out`, one per recorded label.
    pub fn replay(&self, out: &mut dyn ClassEmitter) {
        out.add_class(self.mods, &self.name, &self.super_name, &self.interfaces);
        for field in &self.fields {
            out.add_field(field.mods, &field.name, &field.descriptor);
        }
        for method in &self.methods {
            out.add_method(method.mods, &method.name, &method.descriptor, &method.exceptions);
            let mut labels: FxHashMap<Label, Label> = FxHashMap::default();
            for instruction in &method.code {
                match instruction {
                    Instruction::NoArg(op) => out.add_no_arg_instruction(*op),
                    Instruction::OneArg(op, arg) => out.add_one_arg_instruction(*op, *arg),
                    Instruction::Iinc { slot, delta } => out.add_iinc_instruction(*slot, *delta),
                    Instruction::Ldc(constant) => out.add_ldc_instruction(constant.clone()),
                    Instruction::Branch(op, target) => {
                        let target = mapped_label(&mut labels, out, *target);
                        out.add_branch_instruction(*op, target);
                    }
                    Instruction::Member {
                        op,
                        owner,
                        name,
                        descriptor,
                    } => out.add_member_access_instruction(*op, owner, name, descriptor),
                    Instruction::Reference { op, type_name } => out.add_reference_instruction(*op, type_name),
                    Instruction::Label(recorded) => {
                        let placed = mapped_label(&mut labels, out, *recorded);
                        out.add_label(placed);
                    }
                }
            }
            out.end_method();
        }
        out.end_class();
    }
}

fn mapped_label(labels: &mut FxHashMap<Label, Label>, out: &mut dyn ClassEmitter, recorded: Label) -> Label {
    *labels.entry(recorded).or_insert_with(|| out.create_label())
}

/// Records everything emitted into [`ClassImage`]s.
#[derive(Debug, Default)]
pub struct ClassRecorder {
    classes: Vec<ClassImage>,
    method_open: bool,
    next_label: u32,
}

impl ClassRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn classes(&self) -> &[ClassImage] {
        &self.classes
    }

    pub fn class(&self, name: &str) -> Option<&ClassImage> {
        self.classes.iter().find(|c| c.name == name)
    }

    pub fn into_classes(self) -> Vec<ClassImage> {
        self.classes
    }

    fn current_method(&mut self) -> Option<&mut MethodImage> {
        if !self.method_open {
            return None;
        }
        self.classes.last_mut()?.methods.last_mut()
    }

    fn push(&mut self, instruction: Instruction) {
        if let Instruction::Ldc(constant) = &instruction {
            if let Some(class) = self.classes.last_mut() {
                class.constants.add(constant.clone());
            }
        }
        match self.current_method() {
            Some(method) => method.code.push(instruction),
            None => log::warn!("dropping `{instruction}` emitted outside of a method"),
        }
    }
}

impl ClassEmitter for ClassRecorder {
    fn add_class(&mut self, mods: Modifiers, name: &str, super_name: &str, interfaces: &[String]) {
        self.method_open = false;
        self.classes.push(ClassImage {
            mods,
            name: name.to_string(),
            super_name: super_name.to_string(),
            interfaces: interfaces.to_vec(),
            fields: Vec::new(),
            methods: Vec::new(),
            constants: ConstantPool::new(),
        });
    }

    fn add_field(&mut self, mods: Modifiers, name: &str, descriptor: &str) {
        match self.classes.last_mut() {
            Some(class) => class.fields.push(FieldImage {
                mods,
                name: name.to_string(),
                descriptor: descriptor.to_string(),
            }),
            None => log::warn!("dropping field `{name}` added outside of a class"),
        }
    }

    fn add_method(&mut self, mods: Modifiers, name: &str, descriptor: &str, exceptions: &[String]) {
        let Some(class) = self.classes.last_mut() else {
            log::warn!("dropping method `{name}` added outside of a class");
            return;
        };
        class.methods.push(MethodImage {
            mods,
            name: name.to_string(),
            descriptor: descriptor.to_string(),
            exceptions: exceptions.to_vec(),
            code: Vec::new(),
        });
        self.method_open = true;
        self.next_label = 0;
    }

    fn end_method(&mut self) {
        self.method_open = false;
    }

    fn end_class(&mut self) {
        self.method_open = false;
    }

    fn create_label(&mut self) -> Label {
        let label = Label::new(self.next_label);
        self.next_label += 1;
        label
    }

    fn add_label(&mut self, label: Label) {
        self.push(Instruction::Label(label));
    }

    fn add_no_arg_instruction(&mut self, op: OpCode) {
        self.push(Instruction::NoArg(op));
    }

    fn add_one_arg_instruction(&mut self, op: OpCode, arg: i32) {
        self.push(Instruction::OneArg(op, arg));
    }

    fn add_iinc_instruction(&mut self, slot: u16, delta: i16) {
        self.push(Instruction::Iinc { slot, delta });
    }

    fn add_ldc_instruction(&mut self, constant: Constant) {
        self.push(Instruction::Ldc(constant));
    }

    fn add_branch_instruction(&mut self, op: OpCode, label: Label) {
        self.push(Instruction::Branch(op, label));
    }

    fn add_member_access_instruction(&mut self, op: OpCode, owner: &str, name: &str, descriptor: &str) {
        self.push(Instruction::Member {
            op,
            owner: owner.to_string(),
            name: name.to_string(),
            descriptor: descriptor.to_string(),
        });
    }

    fn add_reference_instruction(&mut self, op: OpCode, type_name: &str) {
        self.push(Instruction::Reference {
            op,
            type_name: type_name.to_string(),
        });
    }
}
