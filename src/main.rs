//! g1mport CLI - re-import edited vertex/index buffers into a G1M model.
//!
//! Usage: `g1mport <model.g1m>`, or drag a model onto the executable.
//! Buffers are read from a directory named after the model in the current
//! directory, or from a directory entered at the prompt.

use std::env;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use g1mport::{run, G1mFile, ImportOutcome, Settings, StdinPrompt};

/// g1mport - G1M submesh re-import tool
#[derive(Parser)]
#[command(name = "g1mport")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the .g1m model to update in place
    file: PathBuf,

    /// Exit without waiting for enter
    #[arg(long, env = "G1MPORT_NO_PAUSE")]
    no_pause: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            if !e.use_stderr() {
                // --help and --version
                return ExitCode::SUCCESS;
            }
            pause();
            return ExitCode::FAILURE;
        }
    };

    init_logging();

    let code = match import(&cli) {
        Ok(outcome) => {
            println!("{} submeshes were imported.", outcome.imported_count());
            println!("Success!");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!(error = ?e, "re-import failed");
            // Messages already carry their causes
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    };

    if !cli.no_pause {
        pause();
    }
    code
}

fn import(cli: &Cli) -> Result<ImportOutcome> {
    let argv0 = env::args_os()
        .next()
        .map(|arg| arg.to_string_lossy().into_owned())
        .unwrap_or_default();
    let settings = Settings::from_argv0(&argv0)
        .map_err(|e| anyhow!("cannot determine the working directory: {}", e))?;

    let outcome = run::<G1mFile>(&cli.file, &settings, &mut StdinPrompt)?;
    Ok(outcome)
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,g1mport=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .init();
}

fn pause() {
    println!("Press enter to exit.");
    let _ = io::stdout().flush();
    let mut line = String::new();
    let _ = io::stdin().lock().read_line(&mut line);
}
