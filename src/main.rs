use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use scsv::{codegen, Archive};
use std::{
    io::{self, Write},
    path::{Path, PathBuf},
};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(author, version, about = "Inspect structured CSV archives and generate Rust records for them")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a Rust module with one record struct per table
    Gen {
        /// Archive to read
        #[arg(short = 'f', long = "file", default_value = "testdata/people.scsv")]
        file: PathBuf,
        /// Output directory; its last component names the module.
        /// Defaults to ./<file stem>
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Print the decoded archive as JSON
    Dump {
        /// Archive to read
        #[arg(short = 'f', long = "file", default_value = "testdata/people.scsv")]
        file: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

fn main() -> Result<()> {
    let env = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(io::stderr)
        .init();

    match Args::parse().command {
        Command::Gen { file, output } => {
            let archive = load(&file)?;
            let location = codegen::OutputLocation::resolve(&file, output.as_deref());
            let source = codegen::generate(&archive, &location.module)
                .with_context(|| format!("generating records for {}", file.display()))?;
            let path = location
                .write(&source)
                .with_context(|| format!("writing module {}", location.module))?;
            info!(
                tables = archive.len(),
                path = %path.display(),
                "generated records"
            );
        }
        Command::Dump { file, pretty } => {
            let archive = load(&file)?;
            let mut stdout = io::stdout().lock();
            if pretty {
                serde_json::to_writer_pretty(&mut stdout, &archive)?;
            } else {
                serde_json::to_writer(&mut stdout, &archive)?;
            }
            stdout.write_all(b"\n")?;
        }
    }

    Ok(())
}

fn load(file: &Path) -> Result<Archive> {
    let archive = Archive::from_file(file)
        .with_context(|| format!("parsing archive {}", file.display()))?;
    info!(tables = archive.len(), "parsed {}", file.display());
    Ok(archive)
}
