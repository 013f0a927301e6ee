//! Method context: local variables, slots and return bookkeeping.
//!
//! A [`MethodContext`] is created per method body. It handles:
//! - Parameter and local declaration with slot allocation
//! - Nested block frames with shadowing restored on frame exit
//! - Definite-assignment flags for locals
//! - The method's declared return and exception types
//! - The path-sensitive "has returned" flag and the enclosing-loop stack

use jlite_core::{CompilationError, Type};
use rustc_hash::FxHashMap;

// ============================================================================
// Types
// ============================================================================

/// A local variable or parameter.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalVar {
    pub name: String,
    pub ty: Type,
    pub slot: u16,
    /// Frame depth where declared (0 = parameters).
    pub depth: u32,
    pub is_initialized: bool,
    pub line: u32,
}

#[derive(Debug, Clone, Copy, Default)]
struct LoopFrame {
    has_break: bool,
}

// ============================================================================
// MethodContext
// ============================================================================

#[derive(Debug)]
pub struct MethodContext {
    variables: FxHashMap<String, LocalVar>,

    /// (shadowing depth, name, shadowed variable)
    shadowed: Vec<(u32, String, LocalVar)>,

    depth: u32,

    /// Never decreases: slots are not reused after a frame is popped.
    next_slot: u16,

    return_type: Type,
    exceptions: Vec<Type>,
    is_static: bool,
    has_returned: bool,
    loops: Vec<LoopFrame>,
}

impl MethodContext {
    /// Create the context of a method. Instance methods reserve slot 0 for
    /// the receiver.
    pub fn new(return_type: Type, exceptions: Vec<Type>, is_static: bool) -> Self {
        Self {
            variables: FxHashMap::default(),
            shadowed: Vec::new(),
            depth: 0,
            next_slot: if is_static { 0 } else { 1 },
            return_type,
            exceptions,
            is_static,
            has_returned: false,
            loops: Vec::new(),
        }
    }

    // ==========================================================================
    // Frames
    // ==========================================================================

    /// Enter a block frame.
    pub fn push_frame(&mut self) {
        self.depth += 1;
    }

    /// Leave the current block frame, dropping its locals.
    pub fn pop_frame(&mut self) {
        self.variables.retain(|_, var| var.depth < self.depth);

        while let Some((shadowing_depth, _, _)) = self.shadowed.last() {
            if *shadowing_depth != self.depth {
                break;
            }
            if let Some((_, name, var)) = self.shadowed.pop() {
                self.variables.insert(name, var);
            }
        }

        self.depth = self.depth.saturating_sub(1);
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    // ==========================================================================
    // Declarations
    // ==========================================================================

    /// Declare a local in the current frame. Returns its slot.
    pub fn declare_local(&mut self, name: &str, ty: Type, line: u32) -> Result<u16, CompilationError> {
        if let Some(existing) = self.variables.get(name) {
            if existing.depth == self.depth {
                return Err(CompilationError::DuplicateDefinition {
                    kind: "variable",
                    name: name.to_string(),
                    line,
                });
            }
            self.shadowed.push((self.depth, name.to_string(), existing.clone()));
        }
        Ok(self.insert(name, ty, false, line))
    }

    /// Declare a formal parameter. Parameters are always initialized.
    pub fn declare_param(&mut self, name: &str, ty: Type, line: u32) -> Result<u16, CompilationError> {
        if self.variables.contains_key(name) {
            return Err(CompilationError::DuplicateDefinition {
                kind: "parameter",
                name: name.to_string(),
                line,
            });
        }
        Ok(self.insert(name, ty, true, line))
    }

    fn insert(&mut self, name: &str, ty: Type, is_initialized: bool, line: u32) -> u16 {
        let slot = self.next_slot;
        self.next_slot = self.next_slot.saturating_add(ty.slot_size().max(1));
        self.variables.insert(
            name.to_string(),
            LocalVar {
                name: name.to_string(),
                ty,
                slot,
                depth: self.depth,
                is_initialized,
                line,
            },
        );
        slot
    }

    pub fn mark_initialized(&mut self, name: &str) {
        if let Some(var) = self.variables.get_mut(name) {
            var.is_initialized = true;
        }
    }

    pub fn lookup(&self, name: &str) -> Option<&LocalVar> {
        self.variables.get(name)
    }

    /// Slots used so far, receiver included.
    pub fn frame_size(&self) -> u16 {
        self.next_slot
    }

    // ==========================================================================
    // Method metadata
    // ==========================================================================

    pub fn return_type(&self) -> Type {
        self.return_type
    }

    pub fn exceptions(&self) -> &[Type] {
        &self.exceptions
    }

    pub fn is_static(&self) -> bool {
        self.is_static
    }

    /// Whether every path analyzed so far ends in a `return`.
    pub fn has_returned(&self) -> bool {
        self.has_returned
    }

    pub fn set_returned(&mut self, returned: bool) {
        self.has_returned = returned;
    }

    // ==========================================================================
    // Loops
    // ==========================================================================

    pub fn enter_loop(&mut self) {
        self.loops.push(LoopFrame::default());
    }

    /// Record a `break`. Returns false outside of a loop.
    pub fn note_break(&mut self) -> bool {
        match self.loops.last_mut() {
            Some(frame) => {
                frame.has_break = true;
                true
            }
            None => false,
        }
    }

    /// Leave the innermost loop. Returns whether it contained a `break`.
    pub fn exit_loop(&mut self) -> bool {
        self.loops.pop().is_some_and(|frame| frame.has_break)
    }

    pub fn in_loop(&self) -> bool {
        !self.loops.is_empty()
    }
}
