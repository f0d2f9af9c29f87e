//! The control-flow engine: an instruction pointer over the token stream.
//!
//! Each step resolves the current mode in strict priority order: comment,
//! then string capture, then skip, then normal dispatch. Loop frames record
//! open constructs; their guards are re-evaluated at every block separator
//! and again when the instruction pointer walks off the end of the program,
//! so a trailing loop body never needs an explicit `;`.
//!
//! The engine is total over program text: unknown tokens and under-arity
//! commands are no-ops, and the only ways out of a run are the end of the
//! stream and an explicit halt, reported as a returned outcome rather than
//! by touching the process.

use std::io::Write;

use crate::runtime::Env;
use crate::lexer::{self, Token, BLOCK_SEP, COMMENT, COMMENT_ESC, STRING_MODE};
use crate::vm::commands;
use crate::vm::frames::{is_opener, LoopFrame};
use crate::vm::ops::{self, Flow};

/// How a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The instruction pointer ran off the end with no live loops.
    Completed,
    /// The halt command fired, carrying its signal value.
    Halted(i64),
}

/// A tokenized program, runnable any number of times.
pub struct Script {
    tokens: Vec<Token>,
}

impl Script {
    /// Tokenize a program.
    pub fn new(source: &str) -> Self {
        Self {
            tokens: lexer::tokenize(source),
        }
    }

    /// The program's token stream.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Execute against a fresh executor.
    pub fn run<W: Write>(&self, env: &mut Env<W>) -> RunOutcome {
        Executor::new().run(&self.tokens, env)
    }
}

/// Result of one engine step.
enum Step {
    Continue,
    Done(RunOutcome),
}

/// Mutable state of one execution: instruction pointer, loop frames and the
/// mode flags.
pub struct Executor {
    ip: usize,
    frames: Vec<LoopFrame>,
    skip_depth: usize,
    /// `Some` while string-literal capture is active.
    string_buf: Option<String>,
    comment: bool,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    pub fn new() -> Self {
        Self {
            ip: 0,
            frames: Vec::new(),
            skip_depth: 0,
            string_buf: None,
            comment: false,
        }
    }

    /// Step the token stream to completion.
    pub fn run<W: Write>(&mut self, tokens: &[Token], env: &mut Env<W>) -> RunOutcome {
        loop {
            match self.step(tokens, env) {
                Step::Continue => {}
                Step::Done(outcome) => return outcome,
            }
        }
    }

    fn step<W: Write>(&mut self, tokens: &[Token], env: &mut Env<W>) -> Step {
        let Some(&token) = tokens.get(self.ip) else {
            return self.end_of_stream(env);
        };
        self.ip += 1;

        // Comment entry beats every mode except active string capture.
        if token == Token::Char(COMMENT) && self.string_buf.is_none() {
            self.comment = true;
            return Step::Continue;
        }
        if self.comment {
            self.comment = token != Token::Char(COMMENT_ESC);
            return Step::Continue;
        }

        // String capture outruns skip counting, so separators inside a
        // literal never disturb the nesting depth. A literal closed while
        // skipping is discarded: skipped bodies have no side effects.
        if token == Token::Char(STRING_MODE) {
            match self.string_buf.take() {
                Some(buf) => {
                    if self.skip_depth == 0 {
                        env.focused_mut().push_all(buf.chars().map(|c| c as i64));
                    }
                }
                None => self.string_buf = Some(String::new()),
            }
            return Step::Continue;
        }
        if let Some(buf) = &mut self.string_buf {
            token.write_text(buf);
            return Step::Continue;
        }

        if self.skip_depth > 0 {
            match token {
                Token::Char(c) if is_opener(c) => self.skip_depth += 1,
                Token::Char(BLOCK_SEP) => self.skip_depth -= 1,
                _ => {}
            }
            return Step::Continue;
        }

        match token {
            Token::Char(c) if is_opener(c) => {
                let opener = self.ip - 1;
                let mut frame = LoopFrame::open(c, opener, env);
                if frame.verify(env) {
                    tracing::trace!(opener, "construct entered");
                    self.frames.push(frame);
                } else {
                    self.skip_depth = 1;
                }
            }

            Token::Char(BLOCK_SEP) => self.reenter_or_close(env),

            Token::Number(n) => env.focused_mut().push(n),

            token => {
                if let Some(cmd) = commands::lookup(&token) {
                    if env.focused().len() >= cmd.min_arity {
                        if let Flow::Halt(signal) = ops::dispatch(cmd.op, env) {
                            tracing::debug!(signal, "halt command");
                            return Step::Done(RunOutcome::Halted(signal));
                        }
                    }
                }
                // Anything else, whitespace included, is a no-op.
            }
        }
        Step::Continue
    }

    /// Re-evaluate the innermost frame's guard: jump back on success, pop
    /// and fall through on failure.
    fn reenter_or_close<W: Write>(&mut self, env: &mut Env<W>) {
        let Some(frame) = self.frames.last_mut() else {
            return;
        };
        if frame.verify(env) {
            self.ip = frame.opener + 1;
        } else {
            tracing::trace!(opener = frame.opener, "construct closed");
            self.frames.pop();
        }
    }

    /// Walking past the last token only ends the run when no loops remain
    /// open (or a string literal is still unterminated); otherwise the end
    /// of the stream acts as an implied separator for the innermost frame.
    fn end_of_stream<W: Write>(&mut self, env: &mut Env<W>) -> Step {
        if self.frames.is_empty() || self.string_buf.is_some() {
            return Step::Done(RunOutcome::Completed);
        }
        self.comment = false;
        self.skip_depth = 0;
        self.reenter_or_close(env);
        Step::Continue
    }
}
