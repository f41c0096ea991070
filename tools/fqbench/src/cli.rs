//! Command-line interface definitions for fqbench.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use fastq_bench::summary::GroupBy;
use fastq_bench::table::Metric;

/// Analyze FASTQ compression benchmark transcripts.
#[derive(Parser)]
#[command(name = "fqbench", version, about)]
pub struct Cli {
    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file (default: ./fqbench.toml if present).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Suppress progress output; show only results, warnings and errors.
    #[arg(long, short = 'q', global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Enable verbose output with timings and parse diagnostics.
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
pub enum Command {
    /// Parse a transcript and optionally save it as JSON.
    Parse(ParseArgs),
    /// Print summary statistics per method and process.
    Summary(SummaryArgs),
    /// Print a method × process table of one metric.
    Pivot(PivotArgs),
    /// Render a grouped bar chart as SVG.
    Plot(PlotArgs),
}

/// Arguments for the `parse` subcommand.
#[derive(Parser)]
pub struct ParseArgs {
    /// Captured terminal output of bench_compress.sh.
    pub input: PathBuf,

    /// Write the parsed measurements to this `.json` file.
    #[arg(short = 'o', long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the `summary` subcommand.
#[derive(Parser)]
pub struct SummaryArgs {
    /// Transcript, or a `.json` file written by `parse`.
    pub input: PathBuf,

    /// Grouping: `method` pools all files, `file` keeps them apart.
    #[arg(long, default_value = "method")]
    pub by: GroupBy,

    /// Write the summaries to this `.json` file.
    #[arg(long)]
    pub json: Option<PathBuf>,

    /// Write the long-format rows to this CSV file.
    #[arg(long)]
    pub csv: Option<PathBuf>,
}

/// Arguments for the `pivot` subcommand.
#[derive(Parser)]
pub struct PivotArgs {
    /// Transcript, or a `.json` file written by `parse`.
    pub input: PathBuf,

    /// Metric: elapsed, cpu, ratio or throughput.
    #[arg(long, default_value = "elapsed")]
    pub metric: Metric,
}

/// Arguments for the `plot` subcommand.
#[derive(Parser)]
pub struct PlotArgs {
    /// Transcript, or a `.json` file written by `parse`.
    pub input: PathBuf,

    /// Output `.svg` path.
    #[arg(short = 'o', long)]
    pub output: PathBuf,

    /// Metric: elapsed, cpu, ratio or throughput.
    #[arg(long, default_value = "elapsed")]
    pub metric: Metric,

    /// Chart title (overrides the configuration file).
    #[arg(long)]
    pub title: Option<String>,
}
