//! Decodes a percent-encoded stream.

use std::process::ExitCode;

use clap::Parser;
use thrunting_tools::UrlDecode;
use thrunting_tools::cli::{self, StreamArgs};

/// URL-decode a stream. Invalid escapes are copied through and "+" is left
/// alone.
#[derive(Parser)]
#[command(name = "url-decode", version, about)]
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
    args.stream.run(UrlDecode::new(), &config)?;
    Ok(())
}
