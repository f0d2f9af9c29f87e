//! Command table: token to operation descriptor.
//!
//! The table is pure data. Each entry pairs a tagged operation with the
//! minimum number of operands it needs on the focused stack. Execution
//! lives in [`crate::vm::ops`], dispatched through an explicit `match`
//! rather than stored function pointers, so the table can be tested on its
//! own.
//!
//! Lookup misses are not errors: an unrecognized token is a no-op at
//! dispatch time, which is how comments-by-convention and stray formatting
//! characters stay harmless.

use crate::lexer::Token;

/// Every operation in the command set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    // ═══════════════════════════════════════════════════════════════════
    // Binary math (broadcast-aware; the right operand is popped once)
    // ═══════════════════════════════════════════════════════════════════
    /// Wrapping addition.
    Add,
    /// Wrapping subtraction.
    Sub,
    /// Wrapping multiplication.
    Mul,
    /// Floor division; divisor 0 falls back to 0.
    FloorDiv,
    /// Floor modulo; divisor 0 falls back to 0.
    FloorMod,
    /// Power (negative exponents truncate toward zero).
    Pow,
    /// Scale by a power of ten: x * 10^y.
    TenPow,
    /// Maximum of the two operands.
    Max,
    /// Minimum of the two operands.
    Min,
    /// Equality test, pushes 1 or 0.
    CmpEq,
    /// Inequality test.
    CmpNe,
    /// Greater-than test.
    CmpGt,
    /// Less-than test.
    CmpLt,
    /// Greater-or-equal test.
    CmpGe,
    /// Less-or-equal test.
    CmpLe,
    /// Bitwise right shift; invalid shift counts fall back to 0.
    Shr,
    /// Bitwise left shift; invalid shift counts fall back to 0.
    Shl,
    /// Bitwise AND.
    BitAnd,
    /// Bitwise OR.
    BitOr,
    /// Bitwise XOR.
    BitXor,
    /// Greatest common divisor (of magnitudes).
    Gcd,
    /// Least common multiple; lcm(0, 0) falls back to 0.
    Lcm,

    // ═══════════════════════════════════════════════════════════════════
    // Unaries (broadcast-aware)
    // ═══════════════════════════════════════════════════════════════════
    /// Absolute value.
    Abs,
    /// Negation.
    Neg,
    /// Truthiness: nonzero becomes 1.
    Truthy,
    /// Logical not: zero becomes 1, everything else 0.
    LogicalNot,
    /// Factorial of the magnitude (wrapping).
    Factorial,
    /// Increment.
    Head,
    /// Decrement.
    Tail,
    /// Integer square root; values below 1 pass through.
    Isqrt,
    /// Primality test, 1 or 0.
    IsPrime,
    /// Number of decimal digits of the magnitude.
    DigitLen,
    /// Decimal-palindrome test (sign included).
    IsPalindrome,
    /// Bit length of the magnitude.
    BitLen,
    /// Bitwise complement.
    BitNot,

    // ═══════════════════════════════════════════════════════════════════
    // Focused-stack manipulation
    // ═══════════════════════════════════════════════════════════════════
    /// Move the bottom element to the top.
    LeftShift,
    /// Move the top element to the bottom.
    RightShift,
    /// Reverse the whole stack.
    Reverse,
    /// Duplicate the top element.
    Dup,
    /// ( v n -- v v*n ) push n further copies of the value below the count.
    Copies,
    /// Drop every element.
    ClearStack,
    /// Re-push a copy of the top-n region.
    CopyRegion,
    /// Append the reverse of everything below the top (palindromize).
    Mirror,
    /// Drop the top element.
    PopLast,
    /// Drop the bottom element.
    PopFirst,
    /// Sorted deduplication of the whole stack.
    Unique,
    /// Sort ascending.
    SortAsc,
    /// Sort descending.
    SortDesc,
    /// Repeat the whole stack n times.
    RepeatStack,
    /// Shuffle the whole stack (randomized).
    ShuffleStack,
    /// Keep only prime elements.
    PrimeFilter,
    /// Turn broadcast mode on.
    ApplyAllOn,
    /// Turn broadcast mode off.
    ApplyAllOff,

    // ═══════════════════════════════════════════════════════════════════
    // Cross-stack (always address IN/OUT explicitly, ignoring focus)
    // ═══════════════════════════════════════════════════════════════════
    /// Focus the IN stack.
    FocusIn,
    /// Focus the OUT stack.
    FocusOut,
    /// Exchange the contents of IN and OUT.
    SwapStacks,
    /// Push whether IN and OUT are element-wise equal.
    StacksEqual,
    /// Move the top of IN onto OUT.
    SendToOut,
    /// Move the top of OUT onto IN.
    SendToIn,
    /// Replace OUT with a copy of IN.
    CopyToOut,

    // ═══════════════════════════════════════════════════════════════════
    // Nilads and whole-stack reads
    // ═══════════════════════════════════════════════════════════════════
    /// Push 0.
    PushZero,
    /// Push 10.
    PushTen,
    /// Push 100.
    PushHundred,
    /// Push the codes of A-Z.
    PushUppercase,
    /// Push the codes of a-z.
    PushLowercase,
    /// Push the product of the stack.
    Product,
    /// Push the sum of the stack.
    Sum,
    /// Push the stack depth.
    Depth,
    /// Push whether the stack reads the same in both directions.
    StackPalindrome,
    /// Push whether the stack is sorted ascending.
    IsSortedAsc,
    /// Push whether the stack is sorted descending.
    IsSortedDesc,
    /// Push whether every element equals every other (empty stack: 1).
    AllEqual,
    /// Push whether all elements are distinct.
    AllUnique,
    /// Push a fresh copy of the original input vector.
    CopyInputs,

    // ═══════════════════════════════════════════════════════════════════
    // Other
    // ═══════════════════════════════════════════════════════════════════
    /// Push a uniformly random value between two popped bounds, inclusive.
    Random,
    /// Sleep for a popped number of seconds.
    Wait,
    /// Sleep for a popped number of milliseconds.
    WaitMillis,
    /// End the run, signalling the top of the stack (0 when absent).
    Halt,
    /// Split the magnitude of the top into its decimal digits.
    SplitDigits,
    /// Join decimal digits: two values, or the whole stack when
    /// broadcasting.
    JoinDigits,
    /// Push 1..=n (or n..=-1 for negative n).
    IncRange,
    /// Push 0..n (or n+1..=0 for negative n).
    ExclRange,
    /// ( f t c -- f|t ) select by a popped condition.
    Ternary,
    /// Push the binary digits of the magnitude, most significant first.
    ToBinary,

    // ═══════════════════════════════════════════════════════════════════
    // Output
    // ═══════════════════════════════════════════════════════════════════
    /// Print the top element (without popping).
    PrintTop,
    /// Print the whole stack, space-joined.
    PrintStack,
    /// Print the top element as a character, if positive.
    PrintChar,
    /// Print every positive element as a character, one write.
    PrintCharcodes,
    /// Print the stack as letters A-Z (values mod 26).
    PrintUppercase,
    /// Print the stack as letters a-z (values mod 26).
    PrintLowercase,
    /// Set the output delimiter to the popped character code.
    SetDelim,
    /// Clear the output delimiter.
    NoDelim,
}

/// A table entry: the operation plus its arity gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    pub op: Op,
    /// Minimum focused-stack length for the operation to run; shortfall
    /// makes the token a no-op.
    pub min_arity: usize,
}

const fn cmd(op: Op, min_arity: usize) -> Command {
    Command { op, min_arity }
}

/// Resolve a token to its command, if it names one.
pub fn lookup(token: &Token) -> Option<Command> {
    match token {
        Token::Number(_) => None,
        Token::Char(c) => lookup_char(*c),
        Token::Extended(c) => lookup_extended(*c),
    }
}

fn lookup_char(c: char) -> Option<Command> {
    let command = match c {
        // Mathematical functions
        '+' => cmd(Op::Add, 1),
        '-' => cmd(Op::Sub, 1),
        '*' => cmd(Op::Mul, 1),
        '/' => cmd(Op::FloorDiv, 1),
        'e' => cmd(Op::Pow, 1),
        'E' => cmd(Op::TenPow, 1),
        '%' => cmd(Op::FloorMod, 1),
        'M' => cmd(Op::Max, 1),
        'm' => cmd(Op::Min, 1),
        '=' => cmd(Op::CmpEq, 1),
        '!' => cmd(Op::CmpNe, 1),
        '>' => cmd(Op::CmpGt, 1),
        '<' => cmd(Op::CmpLt, 1),
        ')' => cmd(Op::CmpGe, 1),
        '(' => cmd(Op::CmpLe, 1),

        // Stack manipulation
        '{' => cmd(Op::LeftShift, 1),
        '}' => cmd(Op::RightShift, 1),
        '@' => cmd(Op::Reverse, 0),
        '&' => cmd(Op::Dup, 1),
        'C' => cmd(Op::Copies, 2),
        'c' => cmd(Op::ClearStack, 1),
        'd' => cmd(Op::CopyRegion, 1),
        'w' => cmd(Op::Mirror, 1),
        '.' => cmd(Op::PopLast, 1),
        ',' => cmd(Op::PopFirst, 1),
        'u' => cmd(Op::Unique, 1),
        'g' => cmd(Op::SortAsc, 1),
        'G' => cmd(Op::SortDesc, 1),
        'K' => cmd(Op::ApplyAllOn, 0),
        'k' => cmd(Op::ApplyAllOff, 0),

        // Cross-stack operations
        'I' => cmd(Op::FocusIn, 0),
        'O' => cmd(Op::FocusOut, 0),
        'F' => cmd(Op::SwapStacks, 0),
        'x' => cmd(Op::StacksEqual, 0),
        'v' => cmd(Op::SendToOut, 0),
        '^' => cmd(Op::SendToIn, 0),
        'V' => cmd(Op::CopyToOut, 0),

        // Nilads
        'Z' => cmd(Op::PushZero, 0),
        'T' => cmd(Op::PushTen, 0),
        'H' => cmd(Op::PushHundred, 0),
        'A' => cmd(Op::PushUppercase, 0),
        'a' => cmd(Op::PushLowercase, 0),
        'P' => cmd(Op::Product, 0),
        'S' => cmd(Op::Sum, 0),
        'L' => cmd(Op::Depth, 0),
        'Y' => cmd(Op::StackPalindrome, 0),

        // Unaries
        '|' => cmd(Op::Abs, 1),
        '~' => cmd(Op::Neg, 1),
        'b' => cmd(Op::Truthy, 1),
        'n' => cmd(Op::LogicalNot, 1),
        'f' => cmd(Op::Factorial, 1),
        'h' => cmd(Op::Head, 1),
        'r' => cmd(Op::Isqrt, 1),
        'p' => cmd(Op::IsPrime, 1),
        't' => cmd(Op::Tail, 1),
        'l' => cmd(Op::DigitLen, 1),
        'y' => cmd(Op::IsPalindrome, 1),

        // Other
        'U' => cmd(Op::Random, 2),
        'W' => cmd(Op::Wait, 1),
        'i' => cmd(Op::Halt, 0),
        's' => cmd(Op::SplitDigits, 1),
        'j' => cmd(Op::JoinDigits, 2),
        'R' => cmd(Op::IncRange, 1),
        'X' => cmd(Op::ExclRange, 1),
        'z' => cmd(Op::Ternary, 3),

        // Output commands
        '#' => cmd(Op::PrintTop, 1),
        '_' => cmd(Op::PrintStack, 0),
        '\'' => cmd(Op::PrintChar, 1),
        '"' => cmd(Op::PrintCharcodes, 0),
        'Q' => cmd(Op::PrintUppercase, 0),
        'q' => cmd(Op::PrintLowercase, 0),
        'D' => cmd(Op::SetDelim, 1),
        'N' => cmd(Op::NoDelim, 0),

        _ => return None,
    };
    Some(command)
}

fn lookup_extended(c: char) -> Option<Command> {
    let command = match c {
        // Bitwise/binary functions
        '>' => cmd(Op::Shr, 1),
        '<' => cmd(Op::Shl, 1),
        '&' => cmd(Op::BitAnd, 1),
        '|' => cmd(Op::BitOr, 1),
        '^' => cmd(Op::BitXor, 1),
        'l' => cmd(Op::BitLen, 1),
        '~' => cmd(Op::BitNot, 1),
        'B' => cmd(Op::ToBinary, 1),

        // Misc functions
        'p' => cmd(Op::PrimeFilter, 0),
        'g' => cmd(Op::IsSortedAsc, 0),
        'G' => cmd(Op::IsSortedDesc, 0),
        '=' => cmd(Op::AllEqual, 0),
        'u' => cmd(Op::AllUnique, 0),
        '/' => cmd(Op::Gcd, 1),
        '*' => cmd(Op::Lcm, 1),
        'I' => cmd(Op::CopyInputs, 0),
        'd' => cmd(Op::RepeatStack, 1),
        'S' => cmd(Op::ShuffleStack, 1),
        'W' => cmd(Op::WaitMillis, 1),

        _ => return None,
    };
    Some(command)
}
