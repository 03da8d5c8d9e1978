//! Turns delimited numeric codes back into text.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use thrunting_tools::cli::{self, StreamArgs};
use thrunting_tools::{FromCharcode, Leniency, Radix};

/// Convert character codes in the given base back to text. Tokens that are
/// not valid codes are skipped with a warning unless --strict is given.
#[derive(Parser)]
#[command(name = "from-charcode", version, about)]
struct Cli {
    #[command(flatten)]
    stream: StreamArgs,

    /// Separator between codes; empty reads fixed-width codes
    #[arg(short, long, default_value = " ")]
    delimiter: String,

    /// Numeric base of the codes (2 to 36)
    #[arg(short, long, default_value = "16")]
    base: Radix,

    /// Fail on the first invalid token instead of skipping it
    #[arg(long)]
    strict: bool,
}

fn main() -> ExitCode {
    cli::init_logging();
    let args = Cli::parse();
    cli::exit_code(run(&args))
}

fn run(args: &Cli) -> anyhow::Result<()> {
    let config = args.stream.config()?;
    let leniency = if args.strict {
        Leniency::Strict
    } else {
        Leniency::Skip
    };
    let decoder = FromCharcode::new(args.base, args.delimiter.as_str()).with_leniency(leniency);

    let input = args.stream.open_input()?;
    let mut output = args.stream.open_output()?;
    decoder
        .run(input, &mut output, &config)
        .with_context(|| format!("processing {}", args.stream.input.display()))?;
    output.finish().context("cannot flush output")?;
    Ok(())
}
