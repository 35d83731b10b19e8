use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use lox::{ConsoleReporter, LoxError, Reporter, Scanner};

// sysexits.h
const EXIT_USAGE: u8 = 64;
const EXIT_DATA_ERR: u8 = 65;
const EXIT_NO_INPUT: u8 = 66;

const PROMPT: &str = "> ";

/// Scan Lox source and print its tokens
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Script to scan, an interactive prompt starts when omitted
    script: Option<PathBuf>,

    /// More log output (-v debug, -vv trace). RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors, don't print tokens
    #[arg(long)]
    errors_only: bool,
}

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::from(EXIT_USAGE);
        }
        // --help and --version
        Err(e) => e.exit(),
    };

    init_tracing(args.verbose);

    match &args.script {
        Some(path) => run_file(path, &args),
        None => match run_prompt(&args) {
            Ok(()) => ExitCode::SUCCESS,
            Err(e) => {
                eprintln!("{e:#}");
                ExitCode::FAILURE
            }
        },
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

fn run_file(path: &Path, args: &Args) -> ExitCode {
    let source = match read_script(path) {
        Ok(source) => source,
        Err(e) => {
            eprintln!("{e}");
            return ExitCode::from(EXIT_NO_INPUT);
        }
    };
    debug!(path = %path.display(), bytes = source.len(), "read script");

    let mut reporter = ConsoleReporter::new();
    run(&source, &mut reporter, args);

    if reporter.had_error() {
        debug!(errors = reporter.count(), "script has lexical errors");
        ExitCode::from(EXIT_DATA_ERR)
    } else {
        ExitCode::SUCCESS
    }
}

fn read_script(path: &Path) -> Result<String, LoxError> {
    fs::read_to_string(path).map_err(|source| LoxError::Script {
        path: path.to_path_buf(),
        source,
    })
}

/// Every line is scanned on its own; an error on one line doesn't end the session.
fn run_prompt(args: &Args) -> anyhow::Result<()> {
    let mut editor = DefaultEditor::new()
        .map_err(LoxError::from)
        .context("could not start the prompt")?;
    let mut reporter = ConsoleReporter::new();

    loop {
        match editor.readline(PROMPT) {
            Ok(line) => {
                let _ = editor.add_history_entry(line.as_str());
                run(&line, &mut reporter, args);
                reporter.reset();
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(e) => return Err(LoxError::from(e)).context("reading the next line"),
        }
    }

    Ok(())
}

fn run<R: Reporter>(source: &str, reporter: &mut R, args: &Args) {
    let tokens = Scanner::new(source).scan_tokens(reporter);

    if !args.errors_only {
        for token in &tokens {
            println!("{token}");
        }
    }
}
