//! Execution of command-table operations.
//!
//! Every operation is a function of the environment and the focused stack
//! with a fixed set of allowed side effects: stack mutation, environment
//! mutation (focus, swap, broadcast flag), output emission, or halting.
//! Domain faults never escape this module: division by zero, invalid
//! shifts, unrepresentable results and invalid character codes all collapse
//! to defined fallbacks, and arithmetic wraps at 64 bits.

use std::collections::HashSet;
use std::io::Write;
use std::thread;
use std::time::Duration;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::runtime::{Env, StackId};
use crate::vm::commands::Op;

/// What the engine should do after an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Keep stepping.
    Continue,
    /// Stop the run immediately, carrying the halt signal.
    Halt(i64),
}

/// Breadth of a numeric operation: just the top, or broadcast over every
/// element of the focused stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Apply {
    Top,
    All,
}

/// Execute one operation. The engine has already checked the arity gate.
pub fn dispatch<W: Write>(op: Op, env: &mut Env<W>) -> Flow {
    let apply = if env.apply_all() { Apply::All } else { Apply::Top };

    match op {
        // ═══ Binary math ═══
        Op::Add => binary(env, apply, i64::wrapping_add),
        Op::Sub => binary(env, apply, i64::wrapping_sub),
        Op::Mul => binary(env, apply, i64::wrapping_mul),
        Op::FloorDiv => binary(env, apply, floor_div),
        Op::FloorMod => binary(env, apply, floor_mod),
        Op::Pow => binary(env, apply, power),
        Op::TenPow => binary(env, apply, ten_pow),
        Op::Max => binary(env, apply, i64::max),
        Op::Min => binary(env, apply, i64::min),
        Op::CmpEq => binary(env, apply, |a, b| (a == b) as i64),
        Op::CmpNe => binary(env, apply, |a, b| (a != b) as i64),
        Op::CmpGt => binary(env, apply, |a, b| (a > b) as i64),
        Op::CmpLt => binary(env, apply, |a, b| (a < b) as i64),
        Op::CmpGe => binary(env, apply, |a, b| (a >= b) as i64),
        Op::CmpLe => binary(env, apply, |a, b| (a <= b) as i64),
        Op::Shr => binary(env, apply, shift_right),
        Op::Shl => binary(env, apply, shift_left),
        Op::BitAnd => binary(env, apply, |a, b| a & b),
        Op::BitOr => binary(env, apply, |a, b| a | b),
        Op::BitXor => binary(env, apply, |a, b| a ^ b),
        Op::Gcd => binary(env, apply, gcd),
        Op::Lcm => binary(env, apply, lcm),

        // ═══ Unaries ═══
        Op::Abs => unary(env, apply, |a| a.wrapping_abs()),
        Op::Neg => unary(env, apply, |a| a.wrapping_neg()),
        Op::Truthy => unary(env, apply, |a| (a != 0) as i64),
        Op::LogicalNot => unary(env, apply, |a| (a == 0) as i64),
        Op::Factorial => unary(env, apply, factorial),
        Op::Head => unary(env, apply, |a| a.wrapping_add(1)),
        Op::Tail => unary(env, apply, |a| a.wrapping_sub(1)),
        Op::Isqrt => unary(env, apply, isqrt),
        Op::IsPrime => unary(env, apply, |a| is_prime(a) as i64),
        Op::DigitLen => unary(env, apply, |a| a.unsigned_abs().to_string().len() as i64),
        Op::IsPalindrome => unary(env, apply, |a| {
            let s = a.to_string();
            s.chars().eq(s.chars().rev()) as i64
        }),
        Op::BitLen => unary(env, apply, |a| {
            (64 - a.unsigned_abs().leading_zeros()) as i64
        }),
        Op::BitNot => unary(env, apply, |a| !a),

        // ═══ Focused-stack manipulation ═══
        Op::LeftShift => {
            let stack = env.focused_mut();
            if let Some(v) = stack.pop_at(0) {
                stack.push(v);
            }
            Flow::Continue
        }
        Op::RightShift => {
            let stack = env.focused_mut();
            if let Some(v) = stack.pop() {
                stack.insert_bottom(v);
            }
            Flow::Continue
        }
        Op::Reverse => {
            let stack = env.focused_mut();
            let mut data = stack.clear();
            data.reverse();
            stack.push_all(data);
            Flow::Continue
        }
        Op::Dup => {
            let stack = env.focused_mut();
            if let Some(v) = stack.peek() {
                stack.push(v);
            }
            Flow::Continue
        }
        Op::Copies => {
            let stack = env.focused_mut();
            if let (Some(count), Some(value)) = (stack.pop(), stack.peek()) {
                for _ in 0..count.max(0) {
                    stack.push(value);
                }
            }
            Flow::Continue
        }
        Op::ClearStack => {
            env.focused_mut().clear();
            Flow::Continue
        }
        Op::CopyRegion => {
            let stack = env.focused_mut();
            if let Some(n) = stack.pop() {
                let len = stack.len() as i64;
                // Python slice rules: n of 0 (or any underflow) copies the
                // whole stack, negative n drops that many from the bottom.
                let start = if n <= 0 { (-n).min(len) } else { (len - n).max(0) };
                let region = stack.as_slice()[start as usize..].to_vec();
                stack.push_all(region);
            }
            Flow::Continue
        }
        Op::Mirror => {
            let stack = env.focused_mut();
            let below_top = stack.len().saturating_sub(1);
            let mirrored: Vec<i64> = stack.as_slice()[..below_top]
                .iter()
                .rev()
                .copied()
                .collect();
            stack.push_all(mirrored);
            Flow::Continue
        }
        Op::PopLast => {
            env.focused_mut().pop();
            Flow::Continue
        }
        Op::PopFirst => {
            env.focused_mut().pop_at(0);
            Flow::Continue
        }
        Op::Unique => {
            let stack = env.focused_mut();
            let mut data = stack.clear();
            data.sort_unstable();
            data.dedup();
            stack.push_all(data);
            Flow::Continue
        }
        Op::SortAsc => {
            let stack = env.focused_mut();
            let mut data = stack.clear();
            data.sort_unstable();
            stack.push_all(data);
            Flow::Continue
        }
        Op::SortDesc => {
            let stack = env.focused_mut();
            let mut data = stack.clear();
            data.sort_unstable_by(|a, b| b.cmp(a));
            stack.push_all(data);
            Flow::Continue
        }
        Op::RepeatStack => {
            let stack = env.focused_mut();
            if let Some(n) = stack.pop() {
                let data = stack.clear();
                for _ in 0..n.max(0) {
                    stack.push_all(data.iter().copied());
                }
            }
            Flow::Continue
        }
        Op::ShuffleStack => {
            let stack = env.focused_mut();
            let mut data = stack.clear();
            data.shuffle(&mut rand::thread_rng());
            stack.push_all(data);
            Flow::Continue
        }
        Op::PrimeFilter => {
            let stack = env.focused_mut();
            let data = stack.clear();
            stack.push_all(data.into_iter().filter(|&v| is_prime(v)));
            Flow::Continue
        }
        Op::ApplyAllOn => {
            env.set_apply_all(true);
            Flow::Continue
        }
        Op::ApplyAllOff => {
            env.set_apply_all(false);
            Flow::Continue
        }

        // ═══ Cross-stack ═══
        Op::FocusIn => {
            env.set_focus(StackId::In);
            Flow::Continue
        }
        Op::FocusOut => {
            env.set_focus(StackId::Out);
            Flow::Continue
        }
        Op::SwapStacks => {
            env.swap_stacks();
            Flow::Continue
        }
        Op::StacksEqual => {
            let equal = env.stack(StackId::In) == env.stack(StackId::Out);
            env.focused_mut().push(equal as i64);
            Flow::Continue
        }
        Op::SendToOut => {
            let (in_stack, out_stack) = env.stacks_mut();
            if let Some(v) = in_stack.pop() {
                out_stack.push(v);
            }
            Flow::Continue
        }
        Op::SendToIn => {
            let (in_stack, out_stack) = env.stacks_mut();
            if let Some(v) = out_stack.pop() {
                in_stack.push(v);
            }
            Flow::Continue
        }
        Op::CopyToOut => {
            let snapshot = env.stack(StackId::In).as_slice().to_vec();
            let out_stack = env.stack_mut(StackId::Out);
            out_stack.clear();
            out_stack.push_all(snapshot);
            Flow::Continue
        }

        // ═══ Nilads and whole-stack reads ═══
        Op::PushZero => push_const(env, 0),
        Op::PushTen => push_const(env, 10),
        Op::PushHundred => push_const(env, 100),
        Op::PushUppercase => {
            env.focused_mut().push_all(65..=90);
            Flow::Continue
        }
        Op::PushLowercase => {
            env.focused_mut().push_all(97..=122);
            Flow::Continue
        }
        Op::Product => {
            let product = env.focused().iter().fold(1i64, |acc, &v| acc.wrapping_mul(v));
            env.focused_mut().push(product);
            Flow::Continue
        }
        Op::Sum => {
            let sum = env.focused().iter().fold(0i64, |acc, &v| acc.wrapping_add(v));
            env.focused_mut().push(sum);
            Flow::Continue
        }
        Op::Depth => {
            let depth = env.focused().len() as i64;
            env.focused_mut().push(depth);
            Flow::Continue
        }
        Op::StackPalindrome => {
            let s = env.focused().as_slice();
            let palindrome = s.iter().eq(s.iter().rev());
            env.focused_mut().push(palindrome as i64);
            Flow::Continue
        }
        Op::IsSortedAsc => {
            let sorted = env.focused().as_slice().windows(2).all(|w| w[0] <= w[1]);
            env.focused_mut().push(sorted as i64);
            Flow::Continue
        }
        Op::IsSortedDesc => {
            let sorted = env.focused().as_slice().windows(2).all(|w| w[0] >= w[1]);
            env.focused_mut().push(sorted as i64);
            Flow::Continue
        }
        Op::AllEqual => {
            let s = env.focused().as_slice();
            let equal = s.windows(2).all(|w| w[0] == w[1]);
            env.focused_mut().push(equal as i64);
            Flow::Continue
        }
        Op::AllUnique => {
            let s = env.focused().as_slice();
            let unique = s.iter().collect::<HashSet<_>>().len() == s.len();
            env.focused_mut().push(unique as i64);
            Flow::Continue
        }
        Op::CopyInputs => {
            let inputs = env.inputs().to_vec();
            env.focused_mut().push_all(inputs);
            Flow::Continue
        }

        // ═══ Other ═══
        Op::Random => {
            let stack = env.focused_mut();
            if let (Some(a), Some(b)) = (stack.pop(), stack.pop()) {
                let (lo, hi) = (a.min(b), a.max(b));
                stack.push(rand::thread_rng().gen_range(lo..=hi));
            }
            Flow::Continue
        }
        Op::Wait => {
            if let Some(v) = env.focused_mut().pop() {
                sleep_for(v, 1_000);
            }
            Flow::Continue
        }
        Op::WaitMillis => {
            if let Some(v) = env.focused_mut().pop() {
                sleep_for(v, 1);
            }
            Flow::Continue
        }
        Op::Halt => Flow::Halt(env.focused().peek().unwrap_or(0)),
        Op::SplitDigits => {
            let stack = env.focused_mut();
            if let Some(v) = stack.pop() {
                let digits: Vec<i64> = v
                    .unsigned_abs()
                    .to_string()
                    .bytes()
                    .map(|b| (b - b'0') as i64)
                    .collect();
                stack.push_all(digits);
            }
            Flow::Continue
        }
        Op::JoinDigits => join_digits(env, apply),
        Op::IncRange => {
            let stack = env.focused_mut();
            match stack.pop() {
                Some(v) if v > 0 => stack.push_all(1..=v),
                Some(v) if v < 0 => stack.push_all(v..=-1),
                _ => {}
            }
            Flow::Continue
        }
        Op::ExclRange => {
            let stack = env.focused_mut();
            match stack.pop() {
                Some(v) if v > 0 => stack.push_all(0..v),
                Some(v) if v < 0 => stack.push_all(v.saturating_add(1)..=0),
                _ => {}
            }
            Flow::Continue
        }
        Op::Ternary => {
            let stack = env.focused_mut();
            if let (Some(cond), Some(t), Some(f)) = (stack.pop(), stack.pop(), stack.pop()) {
                stack.push(if cond != 0 { t } else { f });
            }
            Flow::Continue
        }
        Op::ToBinary => {
            let stack = env.focused_mut();
            if let Some(v) = stack.pop() {
                let n = v.unsigned_abs();
                let bits = 64 - n.leading_zeros();
                for i in (0..bits).rev() {
                    stack.push(((n >> i) & 1) as i64);
                }
            }
            Flow::Continue
        }

        // ═══ Output ═══
        Op::PrintTop => {
            if let Some(v) = env.focused().peek() {
                env.sink_mut().write_values([v]);
            }
            Flow::Continue
        }
        Op::PrintStack => {
            let values: Vec<i64> = env.focused().iter().copied().collect();
            env.sink_mut().write_values(values);
            Flow::Continue
        }
        Op::PrintChar => {
            if let Some(v) = env.focused().peek() {
                if v > 0 {
                    if let Some(c) = char_for(v) {
                        env.sink_mut().write_text(&c.to_string());
                    }
                }
            }
            Flow::Continue
        }
        Op::PrintCharcodes => {
            let text: String = env
                .focused()
                .iter()
                .filter(|&&v| v > 0)
                .filter_map(|&v| char_for(v))
                .collect();
            env.sink_mut().write_text(&text);
            Flow::Continue
        }
        Op::PrintUppercase => print_letters(env, b'A'),
        Op::PrintLowercase => print_letters(env, b'a'),
        Op::SetDelim => {
            if let Some(v) = env.focused_mut().pop() {
                if let Some(c) = char_for(v.wrapping_abs().max(0)) {
                    env.sink_mut().set_delim(c.to_string());
                }
            }
            Flow::Continue
        }
        Op::NoDelim => {
            env.sink_mut().set_delim("");
            Flow::Continue
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════
// Shared handler plumbing
// ═══════════════════════════════════════════════════════════════════════

/// Run a binary operation: pop the right operand once, then combine it with
/// the top element, or with every element under broadcast.
fn binary<W: Write, F: Fn(i64, i64) -> i64>(env: &mut Env<W>, apply: Apply, f: F) -> Flow {
    if apply == Apply::Top && env.focused().len() < 2 {
        return Flow::Continue;
    }
    let stack = env.focused_mut();
    let Some(rhs) = stack.pop() else {
        return Flow::Continue;
    };
    match apply {
        Apply::Top => {
            if let Some(lhs) = stack.pop() {
                stack.push(f(lhs, rhs));
            }
        }
        Apply::All => stack.map_all(|lhs| f(lhs, rhs)),
    }
    Flow::Continue
}

/// Run a unary operation on the top element, or on every element under
/// broadcast.
fn unary<W: Write, F: Fn(i64) -> i64>(env: &mut Env<W>, apply: Apply, f: F) -> Flow {
    let stack = env.focused_mut();
    match apply {
        Apply::Top => {
            if let Some(v) = stack.pop() {
                stack.push(f(v));
            }
        }
        Apply::All => stack.map_all(f),
    }
    Flow::Continue
}

fn push_const<W: Write>(env: &mut Env<W>, value: i64) -> Flow {
    env.focused_mut().push(value);
    Flow::Continue
}

fn print_letters<W: Write>(env: &mut Env<W>, base: u8) -> Flow {
    let text: String = env
        .focused()
        .iter()
        .map(|&v| (base + v.rem_euclid(26) as u8) as char)
        .collect();
    env.sink_mut().write_text(&text);
    Flow::Continue
}

fn join_digits<W: Write>(env: &mut Env<W>, apply: Apply) -> Flow {
    let stack = env.focused_mut();
    let joined = match apply {
        Apply::All => {
            let values = stack.clear();
            let Some(first) = values.first() else {
                return Flow::Continue;
            };
            let mut s = first.to_string();
            for v in &values[1..] {
                s.push_str(&v.unsigned_abs().to_string());
            }
            s
        }
        Apply::Top => {
            let (Some(n1), Some(n2)) = (stack.pop(), stack.pop()) else {
                return Flow::Continue;
            };
            format!("{}{}", n2, n1.unsigned_abs())
        }
    };
    stack.push(parse_clamped(&joined));
    Flow::Continue
}

/// Parse a digit string, clamping results outside the 64-bit range.
fn parse_clamped(s: &str) -> i64 {
    match s.parse::<i64>() {
        Ok(v) => v,
        Err(_) => {
            if s.starts_with('-') {
                i64::MIN
            } else {
                i64::MAX
            }
        }
    }
}

fn sleep_for(amount: i64, unit_ms: u64) {
    if amount > 0 {
        thread::sleep(Duration::from_millis((amount as u64).saturating_mul(unit_ms)));
    }
}

fn char_for(code: i64) -> Option<char> {
    u32::try_from(code).ok().and_then(char::from_u32)
}

// ═══════════════════════════════════════════════════════════════════════
// Numeric helpers
// ═══════════════════════════════════════════════════════════════════════

/// Floor division; divisor 0 falls back to 0.
fn floor_div(a: i64, b: i64) -> i64 {
    if b == 0 {
        return 0;
    }
    let q = a.wrapping_div(b);
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        q - 1
    } else {
        q
    }
}

/// Floor modulo (result takes the divisor's sign); divisor 0 falls back to 0.
fn floor_mod(a: i64, b: i64) -> i64 {
    if b == 0 {
        return 0;
    }
    let r = a.wrapping_rem(b);
    if r != 0 && (r < 0) != (b < 0) {
        r + b
    } else {
        r
    }
}

/// Integer power. Negative exponents truncate toward zero, so only bases of
/// magnitude 1 (and the 0-divisor fallback) survive.
fn power(a: i64, b: i64) -> i64 {
    if b >= 0 {
        let exp = u32::try_from(b).unwrap_or(u32::MAX);
        a.wrapping_pow(exp)
    } else {
        match a {
            1 => 1,
            -1 => {
                if b % 2 == 0 {
                    1
                } else {
                    -1
                }
            }
            _ => 0,
        }
    }
}

/// Scientific-notation scale: x * 10^y, truncating toward zero for y < 0.
fn ten_pow(x: i64, y: i64) -> i64 {
    if y >= 0 {
        let exp = u32::try_from(y).unwrap_or(u32::MAX);
        x.wrapping_mul(10i64.wrapping_pow(exp))
    } else {
        let scaled = x as f64 * 10f64.powi(y.max(-400) as i32);
        scaled.trunc() as i64
    }
}

fn shift_right(a: i64, n: i64) -> i64 {
    match n {
        0..=63 => a >> n,
        // Shifting past the width leaves only the sign.
        _ if n > 63 => {
            if a < 0 {
                -1
            } else {
                0
            }
        }
        _ => 0,
    }
}

fn shift_left(a: i64, n: i64) -> i64 {
    match n {
        0..=63 => a.wrapping_shl(n as u32),
        _ => 0,
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut x, mut y) = (a.unsigned_abs(), b.unsigned_abs());
    while y != 0 {
        (x, y) = (y, x % y);
    }
    x.min(i64::MAX as u64) as i64
}

/// lcm via floor division, keeping the sign behaviour of a*b/gcd;
/// lcm(0, 0) falls back to 0.
fn lcm(a: i64, b: i64) -> i64 {
    let g = gcd(a, b);
    if g == 0 {
        0
    } else {
        floor_div(a.wrapping_mul(b), g)
    }
}

/// Wrapping factorial of the magnitude. Beyond 100 the 2-adic valuation of
/// n! exceeds 64 bits, so the wrapped product is already 0.
fn factorial(x: i64) -> i64 {
    let n = x.unsigned_abs();
    if n > 100 {
        return 0;
    }
    let mut product = 1i64;
    for i in 2..=n as i64 {
        product = product.wrapping_mul(i);
    }
    product
}

/// Integer square root by Newton's method; values below 1 pass through.
fn isqrt(n: i64) -> i64 {
    if n < 1 {
        return n;
    }
    let n = n as i128;
    let mut x = n;
    loop {
        let y = (n / x + x) / 2;
        if x <= y {
            return x as i64;
        }
        x = y;
    }
}

/// Deterministic 6k±1 trial division.
fn is_prime(n: i64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut f = 5i64;
    while f <= n / f {
        if n % f == 0 || n % (f + 2) == 0 {
            return false;
        }
        f += 6;
    }
    true
}
