//! End-to-end program tests.
//!
//! Component: whole interpreter
//!
//! Complete programs: the canonical scenarios every rework of the
//! interpreter has to reproduce byte for byte, plus control-flow and
//! delimiter edge cases.

#![cfg(test)]

use crate::common::*;

// =============================================================================
// Canonical scenarios
// =============================================================================

#[test]
fn hello_world() {
    assert_output(programs::HELLO_WORLD, &[], "Hello, World!\n");
}

#[test]
fn fibonacci_generator() {
    assert_output(programs::FIBONACCI, &[7], "0 1 1 2 3 5 8\n");
}

#[test]
fn quine_reproduces_its_source() {
    assert_output(programs::QUINE, &[], programs::QUINE);
}

#[test]
fn factorial_digit_sum() {
    assert_output(programs::FACTORIAL_DIGIT_SUM, &[10], "27\n");
}

#[test]
fn nested_counted_loops() {
    assert_output(programs::NESTED_LOOPS, &[0], &"0\n".repeat(9));
}

// =============================================================================
// Control flow
// =============================================================================

#[test]
fn counted_loop_body_count_is_exact() {
    // The count is popped at open time, leaving 5 on top to print.
    // With and without the closing separator.
    assert_output(":#;", &[5, 3], "5\n5\n5\n");
    assert_output(":#", &[5, 3], "5\n5\n5\n");
    assert_output(":#;", &[5, 0], "");
    assert_output(":#;", &[5, -1], "");
}

#[test]
fn while_loop_counts_down() {
    assert_output("$#t;", &[3], "3\n2\n1\n");
}

#[test]
fn conditional_picks_a_branch() {
    // Nonzero guard prints once; zero guard skips the body entirely.
    assert_output("?`yes`\";", &[1], "yes\n");
    assert_output("?`yes`\";", &[0], "");
}

#[test]
fn infinite_loop_halts_from_inside() {
    let result = run("[h&5=?i;", &[0]);
    // Increment until 5, then halt; the equality test consumed the copy.
    assert_eq!(result.outcome, pushy::vm::RunOutcome::Halted(5));
}

#[test]
fn skipped_body_leaves_no_trace() {
    let result = run("0?`junk`\"9;;_", &[]);
    assert_eq!(result.output, "\n");
    assert_eq!(result.in_stack, Vec::<i64>::new());
}

// =============================================================================
// Literals and comments
// =============================================================================

#[test]
fn string_literal_feeds_the_focused_stack() {
    let result = run("O`ok`I", &[]);
    assert_eq!(result.out_stack, vec![111, 107]);
    assert_eq!(result.in_stack, Vec::<i64>::new());
}

#[test]
fn comments_are_invisible_to_the_program() {
    assert_output("1 2+ \\ this text never runs: 9 9 9 _\n#", &[], "3\n");
}

#[test]
fn delimiter_survives_across_writes() {
    // Delimiter set to '-' (code 45), then two prints.
    assert_output("45D##", &[7], "7-7-");
}

// =============================================================================
// Exit behaviour
// =============================================================================

#[test]
fn halt_skips_the_rest_of_the_program() {
    assert_output("1#i2#", &[], "1\n");
}

#[test]
fn quiet_programs_print_nothing() {
    assert_output("1 2 3 4 5", &[], "");
}
