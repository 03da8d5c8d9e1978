//! Percent-encodes a stream.

use std::process::ExitCode;

use clap::Parser;
use thrunting_tools::cli::{self, StreamArgs};
use thrunting_tools::{EncodePolicy, UrlEncode};

/// URL-encode a stream. Defaults to reading from standard in and writing to
/// standard out.
#[derive(Parser)]
#[command(name = "url-encode", version, about)]
struct Cli {
    #[command(flatten)]
    stream: StreamArgs,

    /// Also encode "_", ".", "-", "~" and "/"
    #[arg(short, long)]
    all: bool,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = Cli::parse();
    cli::exit_code(run(&args))
}

fn run(args: &Cli) -> anyhow::Result<()> {
    let config = args.stream.config()?;
    let policy = if args.all {
        EncodePolicy::All
    } else {
        EncodePolicy::Standard
    };
    args.stream.run(UrlEncode::new(policy), &config)?;
    Ok(())
}
