//! Command line tool that builds a benchmark sample set: reads a JSONL dump
//! of events and writes out the ones the binary codec can encode.

use std::{
    fs::File,
    io::{BufReader, BufWriter},
    path::PathBuf,
};

use anyhow::Context;
use clap::Parser;
use nostr_binary::sample::{FilterOptions, filter_events};

/// Command line interface entry point.
#[derive(Parser)]
#[command(
    name = "nostr_sample",
    version,
    about = "Filter a JSONL event dump down to events the binary codec accepts"
)]
struct Cli {
    /// JSONL file with one event per line.
    input: PathBuf,
    /// Destination for the accepted events.
    output: PathBuf,
    /// Stop after this many accepted events.
    #[arg(long, default_value_t = FilterOptions::default().limit)]
    limit: usize,
    /// Skip lines longer than this many bytes.
    #[arg(long, default_value_t = FilterOptions::default().max_line_len)]
    max_line_len: usize,
}

fn main() -> anyhow::Result<()> {
    // RUST_LOG controls verbosity; the library itself never configures logging
    env_logger::init();
    let cli = Cli::parse();

    let input = File::open(&cli.input)
        .with_context(|| format!("opening {}", cli.input.display()))?;
    let output = File::create(&cli.output)
        .with_context(|| format!("creating {}", cli.output.display()))?;
    let options = FilterOptions {
        limit: cli.limit,
        max_line_len: cli.max_line_len,
    };

    let stats = filter_events(BufReader::new(input), BufWriter::new(output), &options)?;
    println!("{} events written, {} skipped", stats.accepted, stats.skipped);
    Ok(())
}
