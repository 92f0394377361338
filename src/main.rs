//! assetmanifest - content-addressable download manifests for asset trees.
//!
//! Usage:
//!   amf single <FOLDER> <BASE_URL> [OUTPUT]    One manifest for one folder
//!   amf instances --base-url <URL> [--root DIR] [--include LIST]
//!                                              One manifest per instance folder
//!   amf --help                                 Show help

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Context, Result, bail};
use tracing_subscriber::EnvFilter;

use assetmanifest_build::{InstanceOrchestrator, ManifestSummary, generate_single};
use assetmanifest_core::{
    DEFAULT_INCLUDE, DEFAULT_MANIFEST_NAME, ErrorPolicy, GenerateConfig, IncludeSet,
};

#[derive(Parser)]
#[command(
    name = "assetmanifest",
    version,
    about = "Generate content-addressable download manifests",
    long_about = "assetmanifest lists every file under a folder with its SHA-1 hash, size \
                  and download URL, so clients can fetch only what changed.\n\n\
                  Use `single` for one folder, or `instances` to write a manifest inside \
                  each subfolder of a root."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Hashing threads (0 = one per CPU)
    #[arg(short = 'j', long, global = true, env = "MANIFEST_THREADS", default_value_t = 0)]
    threads: usize,

    /// Sort entries by path so reruns produce identical files
    #[arg(long, global = true)]
    sort: bool,

    /// Skip unreadable files with a warning instead of failing
    #[arg(long, global = true)]
    lenient: bool,

    /// Follow symbolic links
    #[arg(long, global = true)]
    follow_symlinks: bool,

    /// Debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Write one manifest for a single folder
    Single {
        /// Folder to scan
        folder: PathBuf,

        /// Base URL files are served from
        base_url: String,

        /// Output file
        #[arg(default_value = DEFAULT_MANIFEST_NAME)]
        output: PathBuf,
    },

    /// Write a manifest inside every instance folder under a root
    Instances {
        /// Folder holding one subfolder per instance
        #[arg(long, env = "MANIFEST_ROOT", default_value = "files")]
        root: PathBuf,

        /// Base URL files are served from; the instance name is appended
        #[arg(long, env = "MANIFEST_BASE_URL")]
        base_url: String,

        /// Comma-separated top-level folders to include, or "all"
        #[arg(long, env = "MANIFEST_INCLUDE", default_value = DEFAULT_INCLUDE)]
        include: String,

        /// File name written inside each instance
        #[arg(long, default_value = DEFAULT_MANIFEST_NAME)]
        manifest_name: String,
    },
}

fn main() -> Result<()> {
    color_eyre::install()?;

    // Usage errors exit 1; --help and --version exit 0.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = if err.use_stderr() { 1 } else { 0 };
            let _ = err.print();
            std::process::exit(code);
        }
    };

    init_logging(&cli);

    match &cli.command {
        Command::Single {
            folder,
            base_url,
            output,
        } => run_single(&cli, folder, base_url, output),
        Command::Instances {
            root,
            base_url,
            include,
            manifest_name,
        } => run_instances(&cli, root, base_url, include, manifest_name),
    }
}

/// Install a stderr subscriber; `RUST_LOG` overrides the flag-derived level.
fn init_logging(cli: &Cli) {
    let level = if cli.verbose {
        "debug"
    } else if cli.quiet {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Build the run configuration shared by both modes.
fn base_config(cli: &Cli, root: &Path, base_url: &str) -> Result<GenerateConfig> {
    let root = std::path::absolute(root)
        .with_context(|| format!("Cannot resolve path {}", root.display()))?;

    let error_policy = if cli.lenient {
        ErrorPolicy::Lenient
    } else {
        ErrorPolicy::Strict
    };

    let config = GenerateConfig::builder()
        .root(root)
        .base_url(base_url)
        .threads(cli.threads)
        .sort(cli.sort)
        .follow_symlinks(cli.follow_symlinks)
        .error_policy(error_policy)
        .build()
        .context("Invalid configuration")?;
    Ok(config)
}

/// Scan one folder and write one manifest.
fn run_single(cli: &Cli, folder: &Path, base_url: &str, output: &Path) -> Result<()> {
    let mut config = base_config(cli, folder, base_url)?;
    // The output's own name is never scanned, wherever it lives.
    config.manifest_name = output
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| DEFAULT_MANIFEST_NAME.to_string());
    config.output = Some(output.to_path_buf());

    let summary = generate_single(&config)
        .with_context(|| format!("Failed to generate manifest for {}", config.root.display()))?;

    println!(
        "Wrote {} entries to {}",
        summary.entries,
        summary.manifest_path.display()
    );
    print_details(&summary);
    Ok(())
}

/// Write one manifest per instance folder under `root`.
fn run_instances(
    cli: &Cli,
    root: &Path,
    base_url: &str,
    include: &str,
    manifest_name: &str,
) -> Result<()> {
    let mut config = base_config(cli, root, base_url)?;
    config.include = IncludeSet::parse(include);
    config.manifest_name = manifest_name.to_string();
    config
        .validate()
        .context("Invalid configuration")?;

    let report = InstanceOrchestrator::new(config)
        .run()
        .context("Instance manifest generation failed")?;

    if report.is_empty() {
        return Ok(());
    }

    for instance in &report.instances {
        match &instance.result {
            Ok(summary) => {
                println!(
                    "Wrote {} entries -> {}/{}",
                    summary.entries, instance.name, manifest_name
                );
                print_details(summary);
            }
            Err(err) => eprintln!("Failed {}: {err}", instance.name),
        }
    }

    let failed = report.failed().count();
    if failed > 0 {
        bail!(
            "{failed} of {} instances failed under {}",
            report.instances.len(),
            report.root.display()
        );
    }
    Ok(())
}

/// Print size, timing and skipped-file warnings for one manifest.
fn print_details(summary: &ManifestSummary) {
    println!(
        "  {} in {:.2}s",
        format_size(summary.total_bytes),
        summary.duration_ms as f64 / 1000.0
    );
    if !summary.warnings.is_empty() {
        println!("  {} file(s) skipped:", summary.warnings.len());
        for warning in &summary.warnings {
            println!("    {}", warning.message);
        }
    }
}

/// Format size in human-readable form.
fn format_size(bytes: u64) -> String {
    humansize::format_size(bytes, humansize::BINARY)
}
