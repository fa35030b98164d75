use clap::Parser;
use photo_indexer::index::{IndexError, IndexOptions, IndexSummary, index_folder};
use photo_indexer::{config, logging, output};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

fn version_string() -> &'static str {
    let hash = env!("PHOTO_INDEXER_GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{} ({hash})", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "photo-indexer")]
#[command(about = "Produce full, medium and small JPEG derivatives for a folder of photos")]
#[command(long_about = "\
Produce full, medium and small JPEG derivatives for a folder of photos

Every entry of INPUT whose first bytes are a JPEG signature is resized into:

  OUTPUT/<name>          bounded to 3000x3000
  OUTPUT/med/<name>      bounded to 1000x1000
  OUTPUT/small/<name>    bounded to 200x200

Landscapes are pinned to the box height, portraits and squares to the box
width. File extensions are ignored; subdirectories are not descended into.

INPUT and OUTPUT may be a directory or any path inside one: a path that is
not an existing directory resolves to its parent.

Run 'photo-indexer --print-config' for a documented config file.")]
#[command(version = version_string())]
struct Cli {
    /// Input directory (or any path inside it)
    #[arg(required_unless_present = "print_config")]
    input: Option<PathBuf>,

    /// Output directory (or any path inside it)
    #[arg(required_unless_present = "print_config")]
    output: Option<PathBuf>,

    /// TOML config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write an EXIF JSON sidecar per photo (overrides config)
    #[arg(long)]
    metadata: bool,

    /// Stop at the first failure (overrides config)
    #[arg(long)]
    fail_fast: bool,

    /// Write the run summary as JSON
    #[arg(long, value_name = "FILE")]
    summary: Option<PathBuf>,

    /// Debug-level diagnostics
    #[arg(short, long)]
    verbose: bool,

    /// Diagnostics as JSON lines on stderr
    #[arg(long)]
    json_logs: bool,

    /// Print a stock config file with all options documented
    #[arg(long)]
    print_config: bool,
}

fn main() -> ExitCode {
    match run(Cli::parse()) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether the run was fully successful.
fn run(cli: Cli) -> Result<bool, Box<dyn std::error::Error>> {
    if cli.print_config {
        print!("{}", config::stock_config_toml());
        return Ok(true);
    }

    let mut indexer_config = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => config::IndexerConfig::default(),
    };
    if cli.metadata {
        indexer_config.metadata.enabled = true;
    }
    if cli.fail_fast {
        indexer_config.processing.on_error = config::ErrorPolicy::Abort;
    }
    logging::init_from_config(&indexer_config.logging, cli.verbose, cli.json_logs);

    let (Some(input), Some(output_arg)) = (&cli.input, &cli.output) else {
        return Err("INPUT and OUTPUT are required".into());
    };
    let input = resolve_dir(input)?;
    let output_dir = resolve_dir(output_arg)?;
    let options = IndexOptions::from_config(&indexer_config);

    let (tx, rx) = std::sync::mpsc::channel();
    let printer = std::thread::spawn(move || {
        for event in rx {
            output::print_event(&event);
        }
    });
    let result = index_folder(&input, &output_dir, &options, Some(tx));
    // The sender is gone once index_folder returns, so the printer drains and exits
    printer.join().ok();

    match result {
        Ok(summary) => {
            output::print_summary(&summary);
            if let Some(path) = &cli.summary {
                write_summary(path, &summary)?;
            }
            Ok(summary.is_success())
        }
        Err(e @ IndexError::Aborted { .. }) => {
            eprintln!("error: {e}");
            Ok(false)
        }
        Err(e) => Err(e.into()),
    }
}

/// An existing directory is used as-is; any other path means its parent.
fn resolve_dir(arg: &Path) -> std::io::Result<PathBuf> {
    let dir = if arg.is_dir() {
        arg
    } else {
        match arg.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        }
    };
    std::path::absolute(dir)
}

fn write_summary(path: &Path, summary: &IndexSummary) -> Result<(), Box<dyn std::error::Error>> {
    let json = serde_json::to_string_pretty(summary)?;
    std::fs::write(path, json)?;
    Ok(())
}
