//! The execution engine: command table, loop frames, operations, and the
//! instruction-pointer state machine.

pub mod commands;
pub mod engine;
pub mod frames;
pub mod ops;

pub use commands::{lookup, Command, Op};
pub use engine::{Executor, RunOutcome, Script};
pub use frames::{FrameKind, LoopFrame};
pub use ops::{Apply, Flow};
