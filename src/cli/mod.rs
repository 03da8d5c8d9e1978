//! Argument groups and plumbing shared by the command-line tools.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Args;
use log::error;

use crate::codec::Codec;
use crate::config::{CodecConfig, DEFAULT_CHUNK_SIZE};
use crate::io::{Input, Output, open_input, open_output};
use crate::stream::transform;

/// `--input`, `--output` and read-size flags common to every stream tool.
#[derive(Debug, Clone, Args)]
pub struct StreamArgs {
    /// Filename for input stream ("-" for stdin)
    #[arg(short, long = "input", value_name = "PATH", default_value = "-")]
    pub input: PathBuf,

    /// Filename for output stream ("-" for stdout)
    #[arg(short, long = "output", value_name = "PATH", default_value = "-")]
    pub output: PathBuf,

    /// Bytes per read
    #[arg(long, value_name = "BYTES", default_value_t = DEFAULT_CHUNK_SIZE)]
    pub chunk_size: usize,
}

impl StreamArgs {
    /// Builds a validated codec config from the flags.
    pub fn config(&self) -> anyhow::Result<CodecConfig> {
        let config = CodecConfig::default().with_chunk_size(self.chunk_size);
        config.validate()?;
        Ok(config)
    }

    /// Opens the input handle.
    pub fn open_input(&self) -> anyhow::Result<Input> {
        open_input(&self.input)
            .with_context(|| format!("cannot open input {}", self.input.display()))
    }

    /// Creates the output handle.
    pub fn open_output(&self) -> anyhow::Result<Output> {
        open_output(&self.output)
            .with_context(|| format!("cannot open output {}", self.output.display()))
    }

    /// Streams the input through `codec` into the output.
    pub fn run<C: Codec>(&self, codec: C, config: &CodecConfig) -> anyhow::Result<u64> {
        let input = self.open_input()?;
        let mut output = self.open_output()?;
        let written = transform(input, &mut output, codec, config)
            .with_context(|| format!("processing {}", self.input.display()))?;
        output.finish().context("cannot flush output")?;
        Ok(written)
    }
}

/// Initializes stderr logging; `RUST_LOG` overrides the default `warn`.
pub fn init_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .init();
}

/// Reports a failed run on stderr and maps it to the process exit code.
pub fn exit_code(result: anyhow::Result<()>) -> ExitCode {
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}
