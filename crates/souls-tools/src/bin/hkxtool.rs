//! hkxtool: list, dump and extract geometry from HKX tagfiles
//!
//! Accepts a single tagfile (plain or DCX-compressed) or a split archive
//! (`.hkxbhd` with its `.hkxbdt`) of compressed tagfiles. Extraction merges
//! the geometry of every object into one OBJ mesh.

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser};
use souls_tools::cli::{self, Commands, Mode};
use souls_tools::hkx::{self, Input};
use souls_tools::logging;

#[derive(Parser)]
#[command(
    name = "hkxtool",
    about = "Extract and list the contents of hkx or hkxbhd/hkxbdt files",
    version,
    after_help = "Commands:\n  l    list files\n  d    dump files (hexdump)\n  x    extract geometry from files"
)]
struct Cli {
    /// Command letters: `l`, `d` or `x`
    commands: String,

    /// Tagfile, DCX-compressed tagfile or split archive index
    file: PathBuf,

    /// Mesh output path (defaults to `<file name>.obj` in the working directory)
    #[arg(short, long)]
    output: Option<PathBuf>,

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
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns false if any object failed
fn run(cli: &Cli) -> Result<bool> {
    let commands = Commands::parse(&cli.commands, false)?;
    let input = Input::open(&cli.file)?;

    let mut out = BufWriter::new(io::stdout().lock());
    let summary = hkx::run(&mut out, &input, commands.mode)?;
    out.flush()?;

    if commands.mode == Mode::Extract {
        let path = cli
            .output
            .clone()
            .unwrap_or_else(|| hkx::default_obj_path(&cli.file));
        hkx::write_mesh(&summary.geometry, &path)?;
    }

    if !summary.failed.is_empty() {
        tracing::warn!("{} objects failed", summary.failed.len());
    }
    Ok(summary.failed.is_empty())
}
