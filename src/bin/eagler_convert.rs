use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use eagler_mod_tools::commands::convert::convert_files;
use tracing_subscriber::EnvFilter;

/// Repackage Fabric/Forge mod archives into the EaglerAPI folder layout.
/// One `<mod_id>_EaglerConverted.zip` is written per input.
#[derive(Parser, Debug)]
#[command(name = "eagler_convert")]
#[clap(version)]
struct Cli {
    /// Mod archives (.jar/.zip) to convert
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Folder to write the converted archives to
    #[arg(long, short, default_value = ".")]
    output_folder: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    convert_files(&cli.inputs, &cli.output_folder)
}
