//! Removes the memory mapping from a PE image dumped from memory.

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use thrunting_tools::UnmappedImage;
use thrunting_tools::cli::{self, StreamArgs};

/// Process a PE captured from memory, removing the memory mapping. The
/// output is only created once the input has parsed as a PE.
#[derive(Parser)]
#[command(name = "unmap-pe", version, about)]
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
    let image = UnmappedImage::load(args.stream.open_input()?, &config)?;

    let mut output = args.stream.open_output()?;
    image
        .write_to(&mut output)
        .context("cannot write unmapped image")?;
    output.finish().context("cannot flush output")?;
    Ok(())
}
