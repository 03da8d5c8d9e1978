//! Writes each character of a UTF-8 stream as a numeric code.

use std::process::ExitCode;

use clap::Parser;
use thrunting_tools::cli::{self, StreamArgs};
use thrunting_tools::{Radix, ToCharcode};

/// Convert text to character codes in the given base, joined by a
/// delimiter. An empty delimiter writes fixed-width codes.
#[derive(Parser)]
#[command(name = "to-charcode", version, about)]
struct Cli {
    #[command(flatten)]
    stream: StreamArgs,

    /// Separator written between codes
    #[arg(short, long, default_value = " ")]
    delimiter: String,

    /// Numeric base of the codes (2 to 36)
    #[arg(short, long, default_value = "16")]
    base: Radix,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = Cli::parse();
    cli::exit_code(run(&args))
}

fn run(args: &Cli) -> anyhow::Result<()> {
    let config = args.stream.config()?;
    let codec = ToCharcode::new(args.base, args.delimiter.as_str());
    args.stream.run(codec, &config)?;
    Ok(())
}
