//! Execution environment for one Pushy run.
//!
//! The environment owns both stacks, the focus selector that decides which
//! of them ordinary commands act on, the apply-to-all broadcast flag, the
//! original input vector, and the output sink. It lives for exactly one
//! program run.
//!
//! Callers never hold a stack reference across a focus change: accessors
//! resolve the focus internally each time, so a focus switch or stack swap
//! can never leave an alias pointing at the wrong stack.

use std::io::Write;

use super::io::OutputSink;
use crate::core::Stack;

/// Names one of the two stacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackId {
    /// The input stack, seeded from the caller-supplied values.
    In,
    /// The output staging stack.
    Out,
}

/// Per-run state shared by every command.
pub struct Env<W: Write> {
    inputs: Vec<i64>,
    in_stack: Stack,
    out_stack: Stack,
    focus: StackId,
    apply_all: bool,
    sink: OutputSink<W>,
}

impl<W: Write> Env<W> {
    /// Create an environment for one run. `inputs` seeds the `IN` stack and
    /// is retained, unmutated, for commands that re-read the originals.
    pub fn new(inputs: Vec<i64>, sink: OutputSink<W>) -> Self {
        Self {
            in_stack: Stack::from_values(&inputs),
            out_stack: Stack::new(),
            inputs,
            focus: StackId::In,
            apply_all: false,
            sink,
        }
    }

    /// The original input vector, independent of any stack mutation.
    pub fn inputs(&self) -> &[i64] {
        &self.inputs
    }

    /// Which stack ordinary commands currently operate on.
    pub fn focus(&self) -> StackId {
        self.focus
    }

    /// Point ordinary commands at the given stack.
    pub fn set_focus(&mut self, id: StackId) {
        self.focus = id;
    }

    /// The currently focused stack.
    pub fn focused(&self) -> &Stack {
        self.stack(self.focus)
    }

    /// The currently focused stack, mutably.
    pub fn focused_mut(&mut self) -> &mut Stack {
        self.stack_mut(self.focus)
    }

    /// A stack by explicit name; cross-stack commands use this and ignore
    /// the focus.
    pub fn stack(&self, id: StackId) -> &Stack {
        match id {
            StackId::In => &self.in_stack,
            StackId::Out => &self.out_stack,
        }
    }

    /// A stack by explicit name, mutably.
    pub fn stack_mut(&mut self, id: StackId) -> &mut Stack {
        match id {
            StackId::In => &mut self.in_stack,
            StackId::Out => &mut self.out_stack,
        }
    }

    /// Both stacks at once, as (IN, OUT). Used by commands that move values
    /// from one stack to the other.
    pub fn stacks_mut(&mut self) -> (&mut Stack, &mut Stack) {
        (&mut self.in_stack, &mut self.out_stack)
    }

    /// Exchange the contents of the two stacks. The focus flag is untouched.
    pub fn swap_stacks(&mut self) {
        std::mem::swap(&mut self.in_stack, &mut self.out_stack);
    }

    /// Whether numeric commands broadcast over the whole focused stack.
    pub fn apply_all(&self) -> bool {
        self.apply_all
    }

    /// Set the broadcast flag.
    pub fn set_apply_all(&mut self, on: bool) {
        self.apply_all = on;
    }

    /// The output sink.
    pub fn sink(&self) -> &OutputSink<W> {
        &self.sink
    }

    /// The output sink, mutably.
    pub fn sink_mut(&mut self) -> &mut OutputSink<W> {
        &mut self.sink
    }

    /// Consume the environment and return its sink.
    pub fn into_sink(self) -> OutputSink<W> {
        self.sink
    }
}
