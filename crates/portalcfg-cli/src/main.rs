// SPDX-License-Identifier: MIT OR Apache-2.0
//! portalcfg CLI binary - resolve template/system portal configuration files

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portalcfg_cli::{
    OutputFormat, inspect, read_document, resolve_file, resolve_value, write_document,
};
use portalcfg_core::merge_documents;
use serde_json::Value;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "portalcfg")]
#[command(version, about, long_about = None)]
struct Args {
    /// Spaces per indentation level in pretty output
    #[arg(long, default_value = "2", global = true)]
    indent: usize,

    /// Compact single-line output
    #[arg(short = 'c', long, global = true)]
    compact: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace); `RUST_LOG` overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

impl Args {
    const fn format(&self) -> OutputFormat {
        if self.compact {
            OutputFormat::compact()
        } else {
            OutputFormat::pretty(self.indent)
        }
    }
}

/// Subcommands for portalcfg CLI
#[derive(Subcommand)]
enum Commands {
    /// Merge a double config if necessary and write the effective configuration
    Resolve {
        /// Configuration file downloaded from the portal
        #[arg(value_name = "FILE")]
        input: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Merge a system document onto a template document
    Merge {
        /// Template (base) document
        template: PathBuf,
        /// System (override) document
        system: PathBuf,
        /// Output file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Report the layout of a configuration file
    Check {
        /// Configuration file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    match args.command {
        Commands::Resolve { .. } => handle_resolve(&args),
        Commands::Merge { .. } => handle_merge(&args),
        Commands::Check { .. } => handle_check(&args),
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(io::stderr)
        .compact()
        .try_init();
}

fn handle_resolve(args: &Args) {
    if let Commands::Resolve { input, output } = &args.command
        && let Err(e) = run_resolve(input, output.as_deref(), args.format())
    {
        fail(&e);
    }
}

fn run_resolve(input: &Path, output: Option<&Path>, format: OutputFormat) -> Result<()> {
    if let Some(output) = output {
        resolve_file(input, output, format)
            .with_context(|| format!("config load failed for {}", input.display()))?;
        return Ok(());
    }

    let root = read_document(input)?;
    let resolution = resolve_value(root)
        .with_context(|| format!("config load failed for {}", input.display()))?;
    debug!(merged = resolution.is_merged(), "resolved configuration");
    write_output(resolution.value(), format)
}

fn handle_merge(args: &Args) {
    if let Commands::Merge {
        template,
        system,
        output,
    } = &args.command
        && let Err(e) = run_merge(template, system, output.as_deref(), args.format())
    {
        fail(&e);
    }
}

fn run_merge(
    template: &Path,
    system: &Path,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<()> {
    let template_doc = read_document(template)?;
    let system_doc = read_document(system)?;
    let merged = merge_documents(&template_doc, &system_doc).with_context(|| {
        format!(
            "failed to merge {} onto {}",
            system.display(),
            template.display()
        )
    })?;

    match output {
        Some(path) => {
            write_document(path, &merged, format)?;
            info!(output = %path.display(), "JSON config merged and saved");
            Ok(())
        }
        None => write_output(&merged, format),
    }
}

fn handle_check(args: &Args) {
    if let Commands::Check { input } = &args.command
        && let Err(e) = run_check(input)
    {
        fail(&e);
    }
}

fn run_check(input: &Path) -> Result<()> {
    let root = read_document(input)?;
    let report = serde_json::to_value(inspect(&root))?;
    write_output(&report, OutputFormat::default())
}

fn write_output(value: &Value, format: OutputFormat) -> Result<()> {
    let output = format.render(value)?;
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle.write_all(output.as_bytes())?;
    Ok(())
}

fn fail(e: &anyhow::Error) -> ! {
    eprintln!("Error: {e:#}");
    std::process::exit(1);
}
