//! Loop label tracking for `break` and `continue`.

use super::{BreakError, Label};

/// Stack of enclosing loops (innermost last).
#[derive(Debug, Default)]
pub struct JumpManager {
    loops: Vec<LoopContext>,
}

#[derive(Debug)]
struct LoopContext {
    /// Label after the loop
    break_label: Label,
    /// Label of the update/re-test code
    continue_label: Label,
}

impl JumpManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enter_loop(&mut self, break_label: Label, continue_label: Label) {
        self.loops.push(LoopContext {
            break_label,
            continue_label,
        });
    }

    pub fn exit_loop(&mut self) {
        self.loops.pop();
    }

    pub fn break_target(&self) -> Result<Label, BreakError> {
        self.loops
            .last()
            .map(|ctx| ctx.break_label)
            .ok_or(BreakError::NotInLoop)
    }

    pub fn continue_target(&self) -> Result<Label, BreakError> {
        self.loops
            .last()
            .map(|ctx| ctx.continue_label)
            .ok_or(BreakError::NotInLoop)
    }
}
