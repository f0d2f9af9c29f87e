//! Shared test utilities for Pushy integration tests.
//!
//! Programs run against an in-memory sink so tests can assert on the exact
//! bytes a program printed, alongside the final state of both stacks.

use pushy::runtime::{Env, OutputSink, StackId};
use pushy::vm::{RunOutcome, Script};

/// Everything observable about one finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunResult {
    pub outcome: RunOutcome,
    pub in_stack: Vec<i64>,
    pub out_stack: Vec<i64>,
    pub output: String,
}

/// Execute a program with the given initial input.
pub fn run(source: &str, inputs: &[i64]) -> RunResult {
    let mut env = Env::new(inputs.to_vec(), OutputSink::new(Vec::new()));
    let outcome = Script::new(source).run(&mut env);
    RunResult {
        outcome,
        in_stack: env.stack(StackId::In).as_slice().to_vec(),
        out_stack: env.stack(StackId::Out).as_slice().to_vec(),
        output: String::from_utf8(env.into_sink().into_inner()).expect("ASCII output"),
    }
}

/// Execute a program and return only what it printed.
pub fn run_output(source: &str, inputs: &[i64]) -> String {
    run(source, inputs).output
}

/// Execute a program and return the final IN stack.
pub fn run_stack(source: &str, inputs: &[i64]) -> Vec<i64> {
    run(source, inputs).in_stack
}

/// Assert a program's exact output.
pub fn assert_output(source: &str, inputs: &[i64], expected: &str) {
    let result = run(source, inputs);
    assert_eq!(
        result.output, expected,
        "output mismatch for {source:?} with {inputs:?}"
    );
}

// =============================================================================
// Canonical test programs
// =============================================================================

/// Programs exercised across multiple test modules.
pub mod programs {
    /// Prints `Hello, World!`.
    pub const HELLO_WORLD: &str = "`Hello, World!`\"";

    /// Prints the first n+2 Fibonacci numbers for input `[n]`.
    pub const FIBONACCI: &str = "01{2-:2d+;_";

    /// Prints its own source when the source is exactly `95 34\n_"\n`.
    pub const QUINE: &str = "95 34\n_\"\n";

    /// Prints the digit sum of the input's factorial.
    pub const FACTORIAL_DIGIT_SUM: &str = "fsS#";

    /// Prints the top of the stack nine times via two nested loops.
    pub const NESTED_LOOPS: &str = "03:3:#";
}
