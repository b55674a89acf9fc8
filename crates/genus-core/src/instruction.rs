//! Opaque function bodies.
//!
//! Bodies belong to an interpreter that lives outside this crate. The
//! declaration core only needs to know whether a body is present and, once
//! overload resolution has picked a callee, to point call instructions at it.

use crate::{FunctionId, GroupId};

/// The target of a call instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callee {
    /// Not yet resolved: any overload in the group.
    Group(GroupId),
    /// A resolved, concrete function.
    Function(FunctionId),
}

/// A single instruction record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Instruction {
    /// Call `callee` with the top `argc` stack values.
    Call { callee: Callee, argc: usize },
    /// Any instruction this crate does not interpret.
    Op { opcode: u16, operands: Vec<i64> },
}

impl Instruction {
    /// Create an opaque instruction.
    pub fn op(opcode: u16, operands: impl Into<Vec<i64>>) -> Self {
        Instruction::Op {
            opcode,
            operands: operands.into(),
        }
    }

    /// Check if this instruction produces a call.
    pub fn is_call(&self) -> bool {
        matches!(self, Instruction::Call { .. })
    }

    /// The callee of a call instruction.
    pub fn callee(&self) -> Option<Callee> {
        match self {
            Instruction::Call { callee, .. } => Some(*callee),
            Instruction::Op { .. } => None,
        }
    }

    /// Point a call instruction at `target`. Returns `false` for non-calls.
    pub fn rebind_callee(&mut self, target: Callee) -> bool {
        match self {
            Instruction::Call { callee, .. } => {
                *callee = target;
                true
            }
            Instruction::Op { .. } => false,
        }
    }
}

/// An ordered sequence of instructions.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FunctionBody {
    instructions: Vec<Instruction>,
}

impl FunctionBody {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Self { instructions }
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn push(&mut self, instruction: Instruction) {
        self.instructions.push(instruction);
    }

    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }

    /// Rewrite the callee of the call instruction at `index`.
    ///
    /// Returns `false` if there is no instruction at `index` or it is not a
    /// call.
    pub fn rebind_callee(&mut self, index: usize, target: Callee) -> bool {
        self.instructions
            .get_mut(index)
            .is_some_and(|instruction| instruction.rebind_callee(target))
    }
}

impl From<Vec<Instruction>> for FunctionBody {
    fn from(instructions: Vec<Instruction>) -> Self {
        Self::new(instructions)
    }
}
