// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 Polyframe Inc.

//! Wesh CLI

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Instant;
use wesh::cli::{collect_containers, inspect_file, Reporter};
use wesh::geometry::{weld_stream, WeldStrategy};
use wesh::io::{self, compare_meshes, Header, Layout, Representation};
use wesh::ExportConfig;

#[derive(Parser)]
#[command(name = "wesh")]
#[command(about = "Wesh geometry codec - weld face-loop streams into .wesh containers", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file (defaults to ./wesh.toml when present)
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Weld a JSON loop stream and write a container
    Export {
        /// Input loop stream JSON file
        input: String,

        /// Output container file
        #[arg(short, long)]
        output: PathBuf,

        /// Output representation (text, binary)
        #[arg(short, long)]
        format: Option<String>,

        /// Container version (0.1, 0.2, 0.3)
        #[arg(long)]
        version: Option<String>,

        /// Weld strategy (linear, parallel, hashed)
        #[arg(short, long)]
        strategy: Option<String>,
    },

    /// Re-encode an existing container in another version or representation
    Convert {
        /// Input container file
        input: PathBuf,

        /// Output container file
        #[arg(short, long)]
        output: PathBuf,

        /// Output representation (text, binary)
        #[arg(short, long)]
        format: Option<String>,

        /// Container version (0.1, 0.2, 0.3)
        #[arg(long)]
        version: Option<String>,

        /// Decode the result and compare it with the input
        #[arg(long)]
        verify: bool,
    },

    /// Print header and summary information for containers
    Inspect {
        /// Container files or directories to scan
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Emit JSON instead of formatted text
        #[arg(long)]
        json: bool,
    },

    /// Show version information
    Version,
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    if let Err(err) = run(cli) {
        Reporter::report_error(&format!("{:#}", err));
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Export {
            input,
            output,
            format,
            version,
            strategy,
        } => {
            let mut config = ExportConfig::load(cli.config.as_deref())?;
            apply_overrides(&mut config, format.as_deref(), version.as_deref())?;
            if let Some(strategy) = strategy {
                config.weld.strategy = WeldStrategy::from_str(&strategy)
                    .ok_or_else(|| anyhow!("Unknown weld strategy: {}", strategy))?;
            }
            export_command(&input, &output, &config, cli.verbose)
        }
        Commands::Convert {
            input,
            output,
            format,
            version,
            verify,
        } => {
            let mut config = ExportConfig::load(cli.config.as_deref())?;
            apply_overrides(&mut config, format.as_deref(), version.as_deref())?;
            convert_command(&input, &output, &config, verify)
        }
        Commands::Inspect { paths, json } => inspect_command(&paths, json),
        Commands::Version => {
            println!(
                "wesh v{} (container v{})",
                env!("CARGO_PKG_VERSION"),
                Layout::CURRENT.version_string()
            );
            Ok(())
        }
    }
}

fn apply_overrides(config: &mut ExportConfig, format: Option<&str>, version: Option<&str>) -> Result<()> {
    if let Some(format) = format {
        config.format = Representation::from_str(format)
            .ok_or_else(|| anyhow!("Unsupported format: {} (expected text or binary)", format))?;
    }
    if let Some(version) = version {
        config.version = version.to_string();
    }
    config.layout()?;
    Ok(())
}

fn export_command(input: &str, output: &Path, config: &ExportConfig, verbose: bool) -> Result<()> {
    let layout = config.layout()?;
    let stream = io::import_loop_stream(input)?;

    let start = Instant::now();
    let welded = weld_stream(&stream, &config.weld)
        .with_context(|| format!("Failed to weld loop stream: {}", input))?;
    let bytes = io::encode_welded(&welded, layout, config.format)
        .with_context(|| format!("Failed to encode v{} container", layout.version_string()))?;
    let elapsed = start.elapsed();

    io::write_file(output, &bytes)
        .with_context(|| format!("Failed to write container: {}", output.display()))?;

    let output = output.display().to_string();
    if verbose {
        Reporter::report_export(&output, &welded, layout, config.format, bytes.len(), elapsed);
    } else {
        Reporter::success(&format!("Exported {} -> {}", input, output));
    }
    Ok(())
}

fn convert_command(input: &Path, output: &Path, config: &ExportConfig, verify: bool) -> Result<()> {
    let layout = config.layout()?;
    let decoded = io::read_file_auto(input)
        .with_context(|| format!("Failed to read container: {}", input.display()))?;
    let source_has_tangent = decoded.layout().map_or(false, Layout::has_tangent);
    if decoded.mesh.vertex_count() > 0 && !source_has_tangent && layout.has_tangent() {
        Reporter::report_warning("source carries no tangents; writing zero tangents");
    }

    let extent = decoded.extent.unwrap_or_else(|| decoded.mesh.extent());
    let header = Header::new(layout, &decoded.mesh)?;
    let bytes = io::encode(&decoded.mesh, &extent, &header, config.format)?;
    io::write_file(output, &bytes)
        .with_context(|| format!("Failed to write container: {}", output.display()))?;

    Reporter::success(&format!(
        "Converted {} -> {} (v{}, {})",
        input.display(),
        output.display(),
        layout.version_string(),
        config.format.as_str()
    ));

    if verify {
        let written = io::read_file(output, config.format)?;
        let comparison = compare_meshes(
            &decoded.mesh,
            &written.mesh,
            0.0,
            source_has_tangent && layout.has_tangent(),
        );
        Reporter::report_comparison(&comparison);
        if !comparison.passed {
            return Err(anyhow!("Converted container differs from {}", input.display()));
        }
    }
    Ok(())
}

fn inspect_command(paths: &[PathBuf], json: bool) -> Result<()> {
    let files = collect_containers(paths);
    if files.is_empty() {
        return Err(anyhow!("No .wesh containers found"));
    }

    let mut reports = Vec::with_capacity(files.len());
    let mut failed = 0;
    for file in &files {
        match inspect_file(file) {
            Ok(report) => reports.push(report),
            Err(err) => {
                failed += 1;
                Reporter::report_error(&format!("{}: [{}] {}", file.display(), err.kind(), err));
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            Reporter::report_inspect(report);
        }
    }

    if failed > 0 {
        return Err(anyhow!("{} of {} containers failed to decode", failed, files.len()));
    }
    Ok(())
}
