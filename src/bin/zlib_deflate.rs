//! Compresses a stream with zlib.

use std::process::ExitCode;

use clap::Parser;
use thrunting_tools::Deflate;
use thrunting_tools::cli::{self, StreamArgs};
use thrunting_tools::config::{DEFAULT_LEVEL, MAX_LEVEL};

/// Compress a stream using zlib. Defaults to reading from standard in and
/// writing to standard out.
#[derive(Parser)]
#[command(name = "zlib-deflate", version, about)]
struct Cli {
    #[command(flatten)]
    stream: StreamArgs,

    /// Compression level, 0 (none) to 9 (best)
    #[arg(short, long, default_value_t = DEFAULT_LEVEL,
          value_parser = clap::value_parser!(u32).range(0..=MAX_LEVEL as i64))]
    level: u32,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = Cli::parse();
    cli::exit_code(run(&args))
}

fn run(args: &Cli) -> anyhow::Result<()> {
    let config = args.stream.config()?.with_level(args.level);
    args.stream.run(Deflate::new(config.level()), &config)?;
    Ok(())
}
