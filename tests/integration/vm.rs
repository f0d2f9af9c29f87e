//! Integration tests for the execution engine and command set.
//!
//! Component: VM
//!
//! These tests verify:
//! - Stack manipulation commands
//! - Arithmetic and its domain-fault fallbacks
//! - Broadcast (apply-to-all) mode
//! - Cross-stack commands and focus
//! - Nilads and whole-stack reads
//! - Output commands and the delimiter contract

#![cfg(test)]

use crate::common::*;
use pushy::vm::RunOutcome;

// =============================================================================
// Stack manipulation
// =============================================================================

mod stack_manipulation {
    use super::*;

    #[test]
    fn shifts_rotate_the_stack() {
        assert_eq!(run_stack("{", &[1, 2, 3]), vec![2, 3, 1]);
        assert_eq!(run_stack("}", &[1, 2, 3]), vec![3, 1, 2]);
    }

    #[test]
    fn reverse_dup_and_pops() {
        assert_eq!(run_stack("@", &[1, 2, 3]), vec![3, 2, 1]);
        assert_eq!(run_stack("&", &[5]), vec![5, 5]);
        assert_eq!(run_stack(".", &[1, 2, 3]), vec![1, 2]);
        assert_eq!(run_stack(",", &[1, 2, 3]), vec![2, 3]);
    }

    #[test]
    fn copies_duplicates_below_the_count() {
        assert_eq!(run_stack("3C", &[7]), vec![7, 7, 7, 7]);
        assert_eq!(run_stack("0C", &[7]), vec![7]);
    }

    #[test]
    fn clear_empties_everything() {
        assert_eq!(run_stack("c", &[1, 2, 3]), Vec::<i64>::new());
    }

    #[test]
    fn copy_region_and_mirror() {
        assert_eq!(run_stack("2d", &[1, 2, 3]), vec![1, 2, 3, 2, 3]);
        assert_eq!(run_stack("w", &[1, 2, 3]), vec![1, 2, 3, 2, 1]);
    }

    #[test]
    fn sorting_and_dedup() {
        assert_eq!(run_stack("g", &[3, 1, 2]), vec![1, 2, 3]);
        assert_eq!(run_stack("G", &[3, 1, 2]), vec![3, 2, 1]);
        assert_eq!(run_stack("u", &[3, 1, 3, 2]), vec![1, 2, 3]);
    }

    #[test]
    fn repeat_stack() {
        assert_eq!(run_stack("2od", &[5, 6]), vec![5, 6, 5, 6]);
        assert_eq!(run_stack("0od", &[5, 6]), Vec::<i64>::new());
    }
}

// =============================================================================
// Arithmetic
// =============================================================================

mod arithmetic {
    use super::*;

    #[test]
    fn basic_operations() {
        assert_eq!(run_stack("+", &[10, 20]), vec![30]);
        assert_eq!(run_stack("-", &[20, 7]), vec![13]);
        assert_eq!(run_stack("*", &[6, 7]), vec![42]);
        assert_eq!(run_stack("e", &[2, 10]), vec![1024]);
        assert_eq!(run_stack("E", &[3, 2]), vec![300]);
    }

    #[test]
    fn division_floors_like_the_language_demands() {
        assert_eq!(run_stack("/", &[7, 2]), vec![3]);
        assert_eq!(run_stack("/", &[-7, 2]), vec![-4]);
        assert_eq!(run_stack("%", &[-7, 3]), vec![2]);
        assert_eq!(run_stack("%", &[7, -3]), vec![-2]);
    }

    #[test]
    fn division_by_zero_falls_back_to_zero() {
        assert_eq!(run_stack("/", &[5, 0]), vec![0]);
        assert_eq!(run_stack("%", &[5, 0]), vec![0]);
    }

    #[test]
    fn comparisons_push_flags() {
        assert_eq!(run_stack("<", &[3, 5]), vec![1]);
        assert_eq!(run_stack(">", &[3, 5]), vec![0]);
        assert_eq!(run_stack("=", &[4, 4]), vec![1]);
        assert_eq!(run_stack("!", &[4, 4]), vec![0]);
        assert_eq!(run_stack(")", &[5, 5]), vec![1]);
        assert_eq!(run_stack("(", &[6, 5]), vec![0]);
    }

    #[test]
    fn min_and_max() {
        assert_eq!(run_stack("M", &[3, 7]), vec![7]);
        assert_eq!(run_stack("m", &[3, 7]), vec![3]);
    }

    #[test]
    fn bitwise_extended_commands() {
        assert_eq!(run_stack("o&", &[6, 3]), vec![2]);
        assert_eq!(run_stack("o|", &[6, 3]), vec![7]);
        assert_eq!(run_stack("o^", &[6, 3]), vec![5]);
        assert_eq!(run_stack("o<", &[1, 4]), vec![16]);
        assert_eq!(run_stack("o>", &[16, 2]), vec![4]);
    }

    #[test]
    fn gcd_and_lcm() {
        assert_eq!(run_stack("o/", &[12, 18]), vec![6]);
        assert_eq!(run_stack("o*", &[4, 6]), vec![12]);
    }

    #[test]
    fn unary_commands() {
        assert_eq!(run_stack("|", &[-9]), vec![9]);
        assert_eq!(run_stack("~", &[9]), vec![-9]);
        assert_eq!(run_stack("b", &[7]), vec![1]);
        assert_eq!(run_stack("n", &[7]), vec![0]);
        assert_eq!(run_stack("f", &[5]), vec![120]);
        assert_eq!(run_stack("h", &[5]), vec![6]);
        assert_eq!(run_stack("t", &[5]), vec![4]);
        assert_eq!(run_stack("r", &[99]), vec![9]);
        assert_eq!(run_stack("p", &[97]), vec![1]);
        assert_eq!(run_stack("p", &[98]), vec![0]);
        assert_eq!(run_stack("l", &[-407]), vec![3]);
        assert_eq!(run_stack("y", &[121]), vec![1]);
        assert_eq!(run_stack("y", &[-121]), vec![0]);
        assert_eq!(run_stack("ol", &[5]), vec![3]);
        assert_eq!(run_stack("o~", &[0]), vec![-1]);
    }
}

// =============================================================================
// Broadcast mode
// =============================================================================

mod broadcast {
    use super::*;

    #[test]
    fn binary_broadcast_shares_one_right_operand() {
        assert_eq!(run_stack("K3+k", &[1, 2, 3, 10]), vec![4, 5, 6, 13]);
    }

    #[test]
    fn unary_broadcast_maps_every_element() {
        assert_eq!(run_stack("K|", &[-1, -2, 3]), vec![1, 2, 3]);
    }

    #[test]
    fn broadcast_join_collapses_the_stack() {
        assert_eq!(run_stack("Kj", &[12, 3, 45]), vec![12345]);
    }

    #[test]
    fn broadcast_binary_on_a_single_value_consumes_it() {
        // The shared right operand is popped, leaving nothing to map over.
        assert_eq!(run_stack("K+", &[5]), Vec::<i64>::new());
    }

    #[test]
    fn k_turns_broadcast_off_again() {
        assert_eq!(run_stack("K k +", &[1, 2, 3]), vec![1, 5]);
    }
}

// =============================================================================
// Cross-stack commands
// =============================================================================

mod cross_stack {
    use super::*;

    #[test]
    fn send_and_receive_between_stacks() {
        let result = run("v", &[1, 2]);
        assert_eq!(result.in_stack, vec![1]);
        assert_eq!(result.out_stack, vec![2]);

        let result = run("vv^", &[1, 2]);
        assert_eq!(result.in_stack, vec![1]);
        assert_eq!(result.out_stack, vec![2]);
    }

    #[test]
    fn copy_to_out_overwrites() {
        let result = run("OV5I", &[1, 2]);
        assert_eq!(result.in_stack, vec![1, 2]);
        assert_eq!(result.out_stack, vec![1, 2, 5]);
    }

    #[test]
    fn swap_exchanges_contents() {
        let result = run("F", &[1, 2]);
        assert_eq!(result.in_stack, Vec::<i64>::new());
        assert_eq!(result.out_stack, vec![1, 2]);
    }

    #[test]
    fn stack_equality_lands_on_the_focused_stack() {
        assert_eq!(run_stack("x", &[]), vec![1]);
        assert_eq!(run_stack("x", &[1]), vec![1, 0]);
    }

    #[test]
    fn focus_redirects_ordinary_commands() {
        let result = run("O5I", &[]);
        assert_eq!(result.in_stack, Vec::<i64>::new());
        assert_eq!(result.out_stack, vec![5]);
    }

    #[test]
    fn original_inputs_survive_mutation() {
        assert_eq!(run_stack("coI", &[4, 5]), vec![4, 5]);
        assert_eq!(run_stack(".oI", &[4, 5]), vec![4, 4, 5]);
    }
}

// =============================================================================
// Nilads and whole-stack reads
// =============================================================================

mod nilads {
    use super::*;

    #[test]
    fn constant_pushes() {
        assert_eq!(run_stack("ZTH", &[]), vec![0, 10, 100]);
    }

    #[test]
    fn alphabet_ranges() {
        let upper = run_stack("A", &[]);
        assert_eq!(upper.len(), 26);
        assert_eq!(upper.first(), Some(&65));
        assert_eq!(upper.last(), Some(&90));

        let lower = run_stack("a", &[]);
        assert_eq!(lower.first(), Some(&97));
        assert_eq!(lower.last(), Some(&122));
    }

    #[test]
    fn sum_product_and_depth() {
        assert_eq!(run_stack("S", &[2, 3, 4]), vec![2, 3, 4, 9]);
        assert_eq!(run_stack("P", &[2, 3, 4]), vec![2, 3, 4, 24]);
        assert_eq!(run_stack("L", &[2, 3, 4]), vec![2, 3, 4, 3]);
    }

    #[test]
    fn whole_stack_predicates() {
        assert_eq!(run_stack("Y", &[1, 2, 1]), vec![1, 2, 1, 1]);
        assert_eq!(run_stack("og", &[1, 2, 2]), vec![1, 2, 2, 1]);
        assert_eq!(run_stack("oG", &[1, 2, 2]), vec![1, 2, 2, 0]);
        assert_eq!(run_stack("o=", &[4, 4]), vec![4, 4, 1]);
        assert_eq!(run_stack("ou", &[4, 4]), vec![4, 4, 0]);
    }

    #[test]
    fn prime_filter_keeps_only_primes() {
        assert_eq!(run_stack("op", &[4, 5, 6, 7]), vec![5, 7]);
    }
}

// =============================================================================
// Ranges, digits and selection
// =============================================================================

mod misc_commands {
    use super::*;

    #[test]
    fn range_commands() {
        assert_eq!(run_stack("R", &[3]), vec![1, 2, 3]);
        assert_eq!(run_stack("R", &[-3]), vec![-3, -2, -1]);
        assert_eq!(run_stack("X", &[3]), vec![0, 1, 2]);
        assert_eq!(run_stack("R", &[0]), Vec::<i64>::new());
    }

    #[test]
    fn digit_splitting_and_joining() {
        assert_eq!(run_stack("s", &[-407]), vec![4, 0, 7]);
        assert_eq!(run_stack("j", &[12, 34]), vec![1234]);
        assert_eq!(run_stack("oB", &[6]), vec![1, 1, 0]);
    }

    #[test]
    fn ternary_selects_by_condition() {
        assert_eq!(run_stack("z", &[5, 8, 0]), vec![5]);
        assert_eq!(run_stack("z", &[5, 8, 2]), vec![8]);
    }

    #[test]
    fn random_respects_popped_bounds() {
        for _ in 0..20 {
            let top = run_stack("U", &[3, 10]);
            assert_eq!(top.len(), 1);
            assert!((3..=10).contains(&top[0]));
        }
    }

    #[test]
    fn halt_carries_a_signal() {
        assert_eq!(run("2i", &[]).outcome, RunOutcome::Halted(2));
        assert_eq!(run("i", &[]).outcome, RunOutcome::Halted(0));
        assert_eq!(run("1 2 3", &[]).outcome, RunOutcome::Completed);
    }
}

// =============================================================================
// Output commands
// =============================================================================

mod output_commands {
    use super::*;

    #[test]
    fn print_top_peeks() {
        let result = run("#", &[5]);
        assert_eq!(result.output, "5\n");
        assert_eq!(result.in_stack, vec![5]);
    }

    #[test]
    fn print_stack_space_joins() {
        assert_output("_", &[0, 1, 1, 2], "0 1 1 2\n");
        assert_output("_", &[], "\n");
    }

    #[test]
    fn charcode_output_skips_nonpositive_values() {
        assert_output("\"", &[72, -3, 105], "Hi\n");
        assert_output("'", &[72], "H\n");
        assert_output("'", &[-5], "");
    }

    #[test]
    fn letter_output_wraps_mod_26() {
        assert_output("q", &[7, 4, 17], "her\n");
        assert_output("Q", &[0, 25, 26], "AZA\n");
    }

    #[test]
    fn delimiter_commands_reshape_output() {
        assert_output("32D_", &[1, 2], "1 2 ");
        assert_output("N_#", &[1, 2], "1 22");
    }
}
