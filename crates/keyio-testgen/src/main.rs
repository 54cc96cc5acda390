//! CLI for generating key/address encoding test vectors
//!
//! Usage:
//! - `keyio-testgen valid 70 > key_io_valid.json`
//! - `keyio-testgen invalid 70 > key_io_invalid.json`

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use keyio_core::generator::{generate_invalid, generate_valid};
use keyio_core::{emit, Error, Style};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::{error, info, warn};

#[derive(Parser, Debug)]
#[command(name = "keyio-testgen")]
#[command(about = "Generate valid and invalid base58/bech32(m) key and address test vectors", long_about = None)]
#[command(version)]
struct Cli {
    /// Kind of vectors to generate
    #[arg(value_enum)]
    mode: Mode,

    /// Number of vectors to generate
    count: usize,

    /// Seed for a reproducible corpus (defaults to OS entropy)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Write the document to a file instead of standard output
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Emit the document on a single line
    #[arg(long)]
    compact: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Strings a decoder must accept, with their expected payloads
    Valid,
    /// Strings a decoder must reject
    Invalid,
}

fn main() -> Result<()> {
    // Logs go to stderr; stdout carries only the document
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match &cli.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            run(&cli, BufWriter::new(file))
        }
        None => run(&cli, io::stdout().lock()),
    }
}

fn run<W: Write>(cli: &Cli, writer: W) -> Result<()> {
    let mut rng = match cli.seed {
        Some(seed) => {
            info!("Seeding generator with {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    };
    let style = if cli.compact {
        Style::Compact
    } else {
        Style::Pretty
    };

    info!("Generating {} {:?} vectors", cli.count, cli.mode);
    match cli.mode {
        Mode::Valid => {
            let records = generate_valid(&mut rng, cli.count)
                .map_err(report)
                .context("Failed to generate valid vectors")?;
            emit(&records, writer, style)
                .map_err(report)
                .context("Failed to write document")?;
        }
        Mode::Invalid => {
            let records = generate_invalid(&mut rng, cli.count)
                .map_err(report)
                .context("Failed to generate invalid vectors")?;
            emit(&records, writer, style)
                .map_err(report)
                .context("Failed to write document")?;
        }
    }

    Ok(())
}

/// Log a library failure with its category, then hand it back
fn report(err: Error) -> Error {
    let category = err.category();
    if err.is_fatal() {
        error!(%category, "Run failed: {}", err);
    } else {
        warn!(%category, "Unexpected decode failure: {}", err);
    }
    err
}
