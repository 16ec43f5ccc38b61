//! bndtool: list, dump and extract the contents of BND3 archives

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use souls_formats::bnd::BndArchive;
use souls_tools::cli::{self, Commands};
use souls_tools::{bnd, logging};

#[derive(Parser)]
#[command(
    name = "bndtool",
    about = "Extract and list the contents of BND3 archives",
    version,
    after_help = "Commands:\n  l    list files\n  d    dump files (hexdump)\n  x    extract files\n\nOptional flags for commands:\n  i    inflate extracted or dumped files (if applicable)"
)]
struct Cli {
    /// Command letters, e.g. `l`, `xi`
    commands: String,

    /// BND3 archive, optionally DCX-compressed
    file: PathBuf,

    /// Directory to extract into
    #[arg(short, long, default_value = ".")]
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
    let commands = Commands::parse(&cli.commands, true)?;
    let archive = BndArchive::open(&cli.file)
        .with_context(|| format!("Can't open '{}'", cli.file.display()))?;

    let mut out = BufWriter::new(io::stdout().lock());
    let summary = bnd::run(&mut out, &archive, commands, &cli.output)?;
    out.flush()?;

    if summary.failed > 0 {
        tracing::warn!("{} of {} entries failed", summary.failed, archive.file_count());
    }
    Ok(())
}
