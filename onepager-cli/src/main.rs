//! Onepager CLI - judiciary one-pagers from quarterly court statistics

#![deny(warnings)]

// Global invariants enforced:
// - The dataset is loaded once per invocation, before any view is derived
// - Identical input yields byte-for-byte identical output

use anyhow::Context;
use clap::{Parser, Subcommand};
use onepager_core::config::{self, ResolvedConfig};
use onepager_core::report::{render_judiciaries_json, render_judiciaries_text};
use onepager_core::{render_html_dashboard, render_json, render_text, render_views_json};
use onepager_core::{Dataset, DuplicatePolicy, Transformer};
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Default dashboard file name, written next to the data file
const DEFAULT_OUTPUT_NAME: &str = "onepager.html";

#[derive(Parser)]
#[command(name = "onepager")]
#[command(about = "Per-judiciary one-pagers from quarterly court statistics")]
#[command(version = env!("ONEPAGER_VERSION"))]
struct Cli {
    /// Path to config file (default: auto-discover next to the data file)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Worksheet to read from a workbook (overrides config file)
    #[arg(long, global = true)]
    sheet: Option<String>,

    /// Fail if Court_Name values repeat instead of using the first row
    #[arg(long, global = true)]
    reject_duplicates: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the judiciaries available for selection
    List {
        /// Path to the data file (.csv, .xlsx, .xlsm, .xlsb, .xls, .ods)
        data: PathBuf,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Show the one-pager for a single judiciary
    Show {
        /// Path to the data file
        data: PathBuf,

        /// Judiciary to show (omit for the empty view)
        #[arg(long)]
        court: Option<String>,

        /// Output format
        #[arg(long, default_value = "text")]
        format: OutputFormat,
    },
    /// Write the interactive HTML dashboard
    Render {
        /// Path to the data file
        data: PathBuf,

        /// Output file path (default: config output, else onepager.html next to the data file)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print every view (empty selection first) as JSON
    Views {
        /// Path to the data file
        data: PathBuf,
    },
    /// Validate or inspect a configuration file
    #[command(name = "config")]
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Validate a config file without loading data
    Validate {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Show the resolved configuration (merged defaults + config file)
    Show {
        /// Path to config file (default: auto-discover from current directory)
        #[arg(long)]
        path: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::List { ref data, format } => {
            let (_, dataset) = load_dataset(&cli, data)?;
            match format {
                OutputFormat::Text => print!("{}", render_judiciaries_text(&dataset)),
                OutputFormat::Json => println!("{}", render_judiciaries_json(&dataset)),
            }
        }
        Commands::Show {
            ref data,
            ref court,
            format,
        } => {
            let (_, dataset) = load_dataset(&cli, data)?;
            let view = Transformer::new(&dataset).transform(court.as_deref());
            match format {
                OutputFormat::Text => print!("{}", render_text(&view)),
                OutputFormat::Json => println!("{}", render_json(&view)),
            }
        }
        Commands::Render {
            ref data,
            ref output,
        } => {
            let (resolved, dataset) = load_dataset(&cli, data)?;
            let output_path = output
                .clone()
                .or_else(|| resolved.output.clone())
                .unwrap_or_else(|| default_output_path(data));

            let html = render_html_dashboard(&dataset, &resolved.dashboard_options());
            write_html_report(&output_path, &html)?;
            eprintln!("HTML dashboard written to: {}", output_path.display());
        }
        Commands::Views { ref data } => {
            let (_, dataset) = load_dataset(&cli, data)?;
            println!("{}", render_views_json(&dataset));
        }
        Commands::Config { ref action } => match action {
            ConfigAction::Validate { path } => {
                let dir = std::env::current_dir()?;
                match config::load_and_resolve(&dir, path.as_deref()) {
                    Ok(config) => {
                        if let Some(ref p) = config.config_path {
                            println!("Config valid: {}", p.display());
                        } else {
                            println!("No config file found. Using defaults.");
                        }
                    }
                    Err(e) => {
                        eprintln!("Config validation failed: {:#}", e);
                        std::process::exit(1);
                    }
                }
            }
            ConfigAction::Show { path } => {
                let dir = std::env::current_dir()?;
                let resolved = config::load_and_resolve(&dir, path.as_deref())
                    .context("failed to load configuration")?;
                print!("{}", describe_config(&resolved));
            }
        },
    }

    Ok(())
}

/// Install the stderr log subscriber; `RUST_LOG` overrides the default `warn` filter
fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Resolve configuration for a data file and load the dataset once
fn load_dataset(cli: &Cli, data: &Path) -> anyhow::Result<(ResolvedConfig, Dataset)> {
    let data = if data.is_relative() {
        std::env::current_dir()?.join(data)
    } else {
        data.to_path_buf()
    };

    if !data.exists() {
        anyhow::bail!("Data file does not exist: {}", data.display());
    }

    let config_dir = data
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));
    let mut resolved = config::load_and_resolve(&config_dir, cli.config.as_deref())
        .context("failed to load configuration")?;

    if let Some(ref config_path) = resolved.config_path {
        info!(path = %config_path.display(), "using config");
    }

    // CLI flags override config file values
    if let Some(ref sheet) = cli.sheet {
        resolved.sheet = Some(sheet.clone());
    }
    if cli.reject_duplicates {
        resolved.duplicates = DuplicatePolicy::Reject;
    }

    let dataset = Dataset::load_with(&data, &resolved.load_options())?;
    Ok((resolved, dataset))
}

fn default_output_path(data: &Path) -> PathBuf {
    data.parent()
        .map(|dir| dir.join(DEFAULT_OUTPUT_NAME))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_NAME))
}

fn describe_config(resolved: &ResolvedConfig) -> String {
    let mut out = String::new();
    out.push_str("Configuration:\n");
    match resolved.config_path {
        Some(ref p) => out.push_str(&format!("  Source: {}\n", p.display())),
        None => out.push_str("  Source: defaults (no config file found)\n"),
    }
    out.push('\n');
    out.push_str("Dashboard:\n");
    out.push_str(&format!("  title: {}\n", resolved.title));
    out.push_str(&format!("  header_color: {}\n", resolved.header_color));
    out.push_str(&format!("  section_color: {}\n", resolved.section_color));
    out.push_str(&format!(
        "  output: {}\n",
        resolved
            .output
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| format!("{} next to the data file", DEFAULT_OUTPUT_NAME))
    ));
    out.push('\n');
    out.push_str("Data:\n");
    out.push_str(&format!(
        "  sheet: {}\n",
        resolved.sheet.as_deref().unwrap_or("first sheet")
    ));
    out.push_str(&format!("  duplicates: {}\n", resolved.duplicates.as_str()));
    out
}

fn write_html_report(path: &Path, html: &str) -> anyhow::Result<()> {
    use std::fs;

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
    }

    // Write to a sibling temp file, then rename into place
    let temp_path = path.with_extension("html.tmp");
    fs::write(&temp_path, html)
        .with_context(|| format!("Failed to write temporary file: {}", temp_path.display()))?;
    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to rename temporary file to: {}", path.display()))?;

    Ok(())
}
