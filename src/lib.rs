//! Pushy, an interpreter for a two-stack esoteric programming language.
//!
//! A Pushy program is a flat sequence of single-character (or `o`-prefixed
//! two-character) instructions operating on two integer stacks, `IN` and
//! `OUT`. The library exposes the tokenizer, the dual-stack runtime model,
//! and the control-flow engine; the `pushy` binary adds file loading,
//! input decoding and a REPL on top.
//!
//! # Quick start
//!
//! ```
//! use pushy::{Env, OutputSink, Script};
//!
//! let mut env = Env::new(vec![], OutputSink::new(Vec::new()));
//! Script::new("`Hello, World!`\"").run(&mut env);
//!
//! let printed = String::from_utf8(env.into_sink().into_inner()).unwrap();
//! assert_eq!(printed, "Hello, World!\n");
//! ```

// ═══════════════════════════════════════════════════════════════════════════
// Layer 0: Core (no internal dependencies)
// ═══════════════════════════════════════════════════════════════════════════
pub mod core;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 1: Lexer (depends on nothing internal)
// ═══════════════════════════════════════════════════════════════════════════
pub mod lexer;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 2: Runtime (environment, output sink, input decoding)
// ═══════════════════════════════════════════════════════════════════════════
pub mod runtime;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 3: VM (command table, loop frames, control-flow engine)
// ═══════════════════════════════════════════════════════════════════════════
pub mod vm;

// ═══════════════════════════════════════════════════════════════════════════
// Layer 4: Tooling
// ═══════════════════════════════════════════════════════════════════════════
pub mod repl;

pub use crate::core::Stack;
pub use lexer::{tokenize, Token};
pub use runtime::{check_source, decode_input, Env, LoadError, OutputSink, StackId};
pub use vm::{Executor, RunOutcome, Script};
