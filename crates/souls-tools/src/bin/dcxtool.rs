//! dcxtool: inflate one DCX container to a file

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use souls_formats::dcx;
use souls_tools::{cli, logging};
use tracing::info;

#[derive(Parser)]
#[command(name = "dcxtool", about = "Inflate a DCX container", version)]
struct Cli {
    /// DCX container to read
    input: PathBuf,

    /// File to write the inflated bytes to
    output: PathBuf,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = match cli::parse_args::<Cli>() {
        Ok(cli) => cli,
        Err(code) => return code,
    };
    logging::init(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let data = dcx::decompress_file(&cli.input)
        .with_context(|| format!("can't inflate '{}'", cli.input.display()))?;
    std::fs::write(&cli.output, &data)
        .with_context(|| format!("can't write '{}'", cli.output.display()))?;
    info!("wrote {} bytes to {}", data.len(), cli.output.display());
    Ok(())
}
