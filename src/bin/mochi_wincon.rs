//! Mochi Legacy Console Renderer
//!
//! Reads a JSON array of render instructions and draws it on the Windows
//! console through the native console API. With `--headless`, or on other
//! platforms, the instructions are rendered into an in-memory console and a
//! snapshot of the resulting screen is printed.

use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use mochi_wincon::app::Config;
use mochi_wincon::console::HeadlessConsole;
use mochi_wincon::{render, Instruction, LegacyTerm};

/// Render an instruction stream on a legacy console
#[derive(Debug, Parser)]
#[command(name = "mochi-wincon", version, about)]
struct Args {
    /// Instruction file (JSON array); reads stdin when omitted
    input: Option<PathBuf>,

    /// Render into an in-memory console instead of the real one
    #[arg(long)]
    headless: bool,

    /// Headless screen width (overrides the config file)
    #[arg(short, long)]
    cols: Option<u16>,

    /// Headless screen height (overrides the config file)
    #[arg(short, long)]
    rows: Option<u16>,

    /// Print the headless snapshot as JSON
    #[arg(short, long)]
    json: bool,

    /// Configuration file (defaults to ~/.config/mochi/wincon.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match Config::load(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("Failed to load config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::load_or_default(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter)))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    match run(&args, &config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Fatal error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let input = match &args.input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };
    let instructions: Vec<Instruction> = serde_json::from_str(&input)?;
    tracing::debug!(count = instructions.len(), "Loaded instructions");

    if args.headless || !cfg!(windows) {
        return run_headless(args, config, &instructions);
    }
    run_native(config, &instructions)
}

fn run_headless(
    args: &Args,
    config: &Config,
    instructions: &[Instruction],
) -> Result<(), Box<dyn std::error::Error>> {
    let columns = args.cols.unwrap_or(config.headless.columns);
    let rows = args.rows.unwrap_or(config.headless.rows);
    let console = HeadlessConsole::new(usize::from(columns), usize::from(rows));

    let mut term = LegacyTerm::with_config(console, &config.term)?;
    render(instructions, &mut term);
    report_failures(&term);

    let snapshot = term.console().snapshot();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
    } else {
        print!("{}", snapshot.to_text());
    }
    Ok(())
}

#[cfg(windows)]
fn run_native(config: &Config, instructions: &[Instruction]) -> Result<(), Box<dyn std::error::Error>> {
    use mochi_wincon::console::WindowsConsole;

    let console = WindowsConsole::stdout()?;
    let mut term = LegacyTerm::with_config(console, &config.term)?;
    render(instructions, &mut term);
    report_failures(&term);
    Ok(())
}

#[cfg(not(windows))]
fn run_native(_config: &Config, _instructions: &[Instruction]) -> Result<(), Box<dyn std::error::Error>> {
    Err(mochi_wincon::Error::NoConsole.into())
}

fn report_failures<C: mochi_wincon::console::ConsoleApi>(term: &LegacyTerm<C>) {
    if term.failed_calls() > 0 {
        tracing::warn!(
            failed = term.failed_calls(),
            "Some console calls failed; last error: {}",
            term.last_error().map(ToString::to_string).unwrap_or_default()
        );
    }
}
