//! Command-line front end for the Pushy interpreter.

use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::atomic::Ordering;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pushy::repl::{Repl, ReplConfig};
use pushy::runtime::{check_source, decode_input};
use pushy::{Env, OutputSink, RunOutcome, Script};

#[derive(Parser, Debug)]
#[command(name = "pushy")]
#[command(about = "Run a Pushy program")]
struct Cli {
    /// Path to the program file (omit to start the REPL)
    file: Option<PathBuf>,

    /// Initial input: an integer, a quoted string, or a list of integers
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    input: Vec<String>,

    /// Start the interactive REPL
    #[arg(long)]
    repl: bool,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pushy=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("pushy: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let Some(file) = cli.file.filter(|_| !cli.repl) else {
        let signal = Repl::new(ReplConfig::default()).run()?;
        return Ok(exit_code(signal));
    };

    let source = fs::read_to_string(&file)
        .with_context(|| format!("cannot read {}", file.display()))?;
    check_source(&source)?;

    let inputs = if cli.input.is_empty() {
        Vec::new()
    } else {
        decode_input(&cli.input.join(" "))?
    };
    debug!(file = %file.display(), inputs = inputs.len(), "program loaded");

    let sink = OutputSink::new(std::io::stdout());
    install_interrupt_handler(&sink);

    let mut env = Env::new(inputs, sink);
    let outcome = Script::new(&source).run(&mut env);
    debug!(?outcome, "run finished");

    match outcome {
        RunOutcome::Completed => Ok(ExitCode::SUCCESS),
        RunOutcome::Halted(signal) => Ok(exit_code(signal)),
    }
}

/// Map a halt signal onto the 8-bit process exit code.
fn exit_code(signal: i64) -> ExitCode {
    ExitCode::from(signal.rem_euclid(256) as u8)
}

/// Catch Ctrl-C at the top level. The sink flushes every write, so nothing
/// is pending; the handler only has to start the diagnostic on a fresh line
/// before exiting non-zero.
fn install_interrupt_handler(sink: &OutputSink<std::io::Stdout>) {
    let fresh_line = sink.fresh_line_flag();
    let result = ctrlc::set_handler(move || {
        if !fresh_line.load(Ordering::SeqCst) {
            eprintln!();
        }
        eprintln!("pushy: interrupted");
        std::process::exit(130);
    });
    if let Err(e) = result {
        debug!(error = %e, "could not install interrupt handler");
    }
}
