use anyhow::Context;
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;
use tracing::debug;

/// Generate CBOR codecs for the record types in a source file or directory.
#[derive(Parser)]
#[command(name = "cborgen", version, about)]
struct Cli {
    /// Input source file or directory of source files.
    ///
    /// Defaults to CBORGEN_INPUT when invoked from a build script.
    #[arg(long, env = "CBORGEN_INPUT", value_name = "PATH")]
    input: PathBuf,

    /// Output file; permitted only when the input is a single file.
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Route unrecognized field shapes through the dynamic helpers
    /// (ToValue/FromValue) instead of failing.
    #[arg(long)]
    allow_dynamic: bool,

    #[command(flatten)]
    verbosity: Verbosity<InfoLevel>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(cli.verbosity)
        .init();

    let written = quickcbor_gen::run(&cli.input, cli.output.as_deref(), cli.allow_dynamic)
        .with_context(|| format!("generating codecs for {}", cli.input.display()))?;

    if written.is_empty() {
        debug!("nothing to generate");
    }
    Ok(())
}
