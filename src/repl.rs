//! REPL (Read-Eval-Print-Loop) for Pushy.
//!
//! Interactive shell with a persistent environment: stacks, focus, the
//! broadcast flag and the output delimiter all survive between lines.
//!
//! # Commands
//!
//! - `:quit`, `:q` - Exit the REPL
//! - `:help`, `:h` - Show help
//! - `:stack`, `:s` - Show both stacks and the focus
//! - `:reset` - Discard the environment and start fresh
//! - `:delim` - Show the current output delimiter
//! - `:load <file>` - Run a program file in this environment

use std::fs;
use std::io::{self, BufRead, Stdout, Write};

use crate::runtime::{check_source, Env, OutputSink, StackId};
use crate::vm::{RunOutcome, Script};

/// REPL configuration.
#[derive(Debug, Clone)]
pub struct ReplConfig {
    /// Prompt string.
    pub prompt: String,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self {
            prompt: "pushy> ".to_string(),
        }
    }
}

/// Interactive shell holding one long-lived environment.
pub struct Repl {
    config: ReplConfig,
    env: Env<Stdout>,
}

impl Repl {
    pub fn new(config: ReplConfig) -> Self {
        Self {
            config,
            env: fresh_env(),
        }
    }

    /// Run until `:quit`, end of input, or an in-language halt.
    ///
    /// Returns the halt signal, or 0 for a normal exit.
    pub fn run(&mut self) -> io::Result<i64> {
        let stdin = io::stdin();
        let mut lines = stdin.lock().lines();

        loop {
            // Keep the prompt off the tail of undelimited output.
            if !self.env.sink().on_fresh_line() {
                println!();
            }
            print!("{}", self.config.prompt);
            io::stdout().flush()?;

            let Some(line) = lines.next() else {
                return Ok(0);
            };
            let line = line?;
            let trimmed = line.trim();

            if trimmed.is_empty() {
                continue;
            }

            if let Some(meta) = trimmed.strip_prefix(':') {
                match self.meta_command(meta) {
                    MetaOutcome::Continue => continue,
                    MetaOutcome::Quit => return Ok(0),
                }
            }

            if let RunOutcome::Halted(signal) = self.eval(&line) {
                println!("halted (signal {signal})");
                return Ok(signal);
            }
        }
    }

    fn eval(&mut self, source: &str) -> RunOutcome {
        if check_source(source).is_err() {
            eprintln!("input must be ASCII-only");
            return RunOutcome::Completed;
        }
        Script::new(source).run(&mut self.env)
    }

    fn meta_command(&mut self, meta: &str) -> MetaOutcome {
        let mut parts = meta.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("");
        let arg = parts.next().map(str::trim).unwrap_or("");

        match name {
            "q" | "quit" => return MetaOutcome::Quit,
            "h" | "help" => self.show_help(),
            "s" | "stack" => self.show_stacks(),
            "reset" => {
                self.env = fresh_env();
                println!("environment reset");
            }
            "delim" => println!("delimiter: {:?}", self.env.sink().delim()),
            "load" => {
                if arg.is_empty() {
                    eprintln!("usage: :load <file>");
                } else {
                    self.load_file(arg);
                }
            }
            other => eprintln!("unknown command :{other} (try :help)"),
        }
        MetaOutcome::Continue
    }

    fn show_help(&self) {
        println!("Pushy REPL");
        println!("  :quit, :q      exit");
        println!("  :help, :h      this help");
        println!("  :stack, :s     show both stacks and the focus");
        println!("  :reset         discard the environment");
        println!("  :delim         show the output delimiter");
        println!("  :load <file>   run a program file in this environment");
        println!("Anything else is executed as Pushy code.");
    }

    fn show_stacks(&self) {
        let focus = match self.env.focus() {
            StackId::In => "IN",
            StackId::Out => "OUT",
        };
        println!(" IN: {:?}", self.env.stack(StackId::In));
        println!("OUT: {:?}", self.env.stack(StackId::Out));
        println!("focus: {focus}, apply-to-all: {}", self.env.apply_all());
    }

    fn load_file(&mut self, path: &str) {
        match fs::read_to_string(path) {
            Ok(source) => {
                if let RunOutcome::Halted(signal) = self.eval(&source) {
                    println!("halted (signal {signal})");
                }
            }
            Err(e) => eprintln!("cannot read {path}: {e}"),
        }
    }
}

enum MetaOutcome {
    Continue,
    Quit,
}

fn fresh_env() -> Env<Stdout> {
    Env::new(Vec::new(), OutputSink::new(io::stdout()))
}
