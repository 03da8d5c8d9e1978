//! Decompresses a zlib stream.

use std::process::ExitCode;

use clap::Parser;
use thrunting_tools::Inflate;
use thrunting_tools::cli::{self, StreamArgs};

/// Decompress a zlib stream. Defaults to reading from standard in and
/// writing to standard out.
#[derive(Parser)]
#[command(name = "zlib-inflate", version, about)]
struct Cli {
    #[command(flatten)]
    stream: StreamArgs,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = Cli::parse();
    cli::exit_code(run(&args))
}

fn run(args: &Cli) -> anyhow::Result<()> {
    let config = args.stream.config()?;
    args.stream.run(Inflate::new(), &config)?;
    Ok(())
}
