//! FASTQ compression benchmark analysis tool.
//!
//! Reads the terminal transcript captured from `bench_compress.sh` (or a
//! JSON file previously written by `fqbench parse`) and reports on it.
//!
//! Pipeline: load config → scan transcript → flatten to rows →
//!           summarize / pivot → print tables, write JSON, CSV or SVG.

mod cli;
mod config;
mod verbose;

use std::path::Path;

use anyhow::Result;
use clap::Parser;
use fastq_bench::chart::BarChart;
use fastq_bench::{Transcript, json, output, summary, table, transcript};

use crate::config::Config;
use crate::verbose::{Phase, Verbosity, dprintln, vprintln};

fn main() -> Result<()> {
    let cli = cli::Cli::parse();
    verbose::init(cli.quiet, cli.verbose);

    let config = Config::load(cli.config.as_deref())?;
    if let Some(ref source) = config.source {
        vprintln!("Loaded configuration from {}", source.display());
    }

    let result = match cli.command {
        cli::Command::Parse(ref args) => cmd_parse(args, &config),
        cli::Command::Summary(ref args) => cmd_summary(args, &config),
        cli::Command::Pivot(ref args) => cmd_pivot(args, &config),
        cli::Command::Plot(ref args) => cmd_plot(args, &config),
    };

    let warnings = verbose::warning_count();
    if warnings > 0 {
        vprintln!("{warnings} warning(s) reported");
    }
    result
}

// ===========================================================================
// Loading
// ===========================================================================

/// Load measurements from a transcript, or from JSON written by `parse`.
///
/// Parse warnings go to stderr.
fn load_transcript(input: &Path, config: &Config) -> Result<Transcript> {
    if input.extension().is_some_and(|ext| ext == "json") {
        dprintln!("Reading parsed measurements from {}...", input.display());
        let _phase = Phase::start("json load");
        return json::read_json(input);
    }

    dprintln!("Parsing transcript {}...", input.display());
    let outcome = {
        let mut phase = Phase::start("transcript scan");
        let outcome = transcript::parse_file(input, &config.markers)?;
        phase.count(outcome.lines, "lines");
        outcome
    };
    vprintln!(
        "  {} files, {} method runs",
        outcome.transcript.files.len(),
        outcome.transcript.run_count()
    );
    for warning in &outcome.warnings {
        verbose::warn(warning);
    }
    Ok(outcome.transcript)
}

// ===========================================================================
// Commands
// ===========================================================================

/// `fqbench parse`: scan a transcript and optionally save it as JSON.
fn cmd_parse(args: &cli::ParseArgs, config: &Config) -> Result<()> {
    // Reject a bad output path before doing any work.
    if let Some(ref output) = args.output {
        json::ensure_extension(output, "json")?;
    }

    let parsed = load_transcript(&args.input, config)?;
    if verbose::shows(Verbosity::Default) {
        output::print_transcript_overview(&parsed);
    }

    if let Some(ref output) = args.output {
        json::write_json(&parsed, output)?;
        dprintln!("Parsed measurements written to {}", output.display());
    }
    Ok(())
}

/// `fqbench summary`: per-group statistics.
fn cmd_summary(args: &cli::SummaryArgs, config: &Config) -> Result<()> {
    if let Some(ref path) = args.json {
        json::ensure_extension(path, "json")?;
    }

    let parsed = load_transcript(&args.input, config)?;
    let rows = {
        let mut phase = Phase::start("reshape");
        let rows = table::flatten(&parsed);
        phase.count(rows.len(), "rows");
        rows
    };

    let summaries = summary::summarize(&rows, args.by);
    output::print_summary_table(&summaries);

    if verbose::shows(Verbosity::Default) {
        for process in fastq_bench::Process::ALL {
            for metric in [table::Metric::Elapsed, table::Metric::Ratio] {
                let best = summary::best(&summaries, process, metric);
                if let Some((best, stats)) = best.and_then(|b| b.stats(metric).map(|s| (b, s))) {
                    println!(
                        "  Best {process} {}: {} ({:.3} {})",
                        metric.label().to_lowercase(),
                        best.method,
                        stats.mean,
                        metric.unit()
                    );
                }
            }
        }
    }

    if let Some(ref path) = args.json {
        json::write_json(&summaries, path)?;
        dprintln!("Summary written to {}", path.display());
    }
    if let Some(ref path) = args.csv {
        table::write_csv(&rows, path)?;
        dprintln!("Rows written to {}", path.display());
    }
    Ok(())
}

/// `fqbench pivot`: method × process table of one metric.
fn cmd_pivot(args: &cli::PivotArgs, config: &Config) -> Result<()> {
    let parsed = load_transcript(&args.input, config)?;
    let rows = table::flatten(&parsed);
    output::print_pivot(&table::pivot(&rows, args.metric));
    Ok(())
}

/// `fqbench plot`: grouped bar chart of one metric.
fn cmd_plot(args: &cli::PlotArgs, config: &Config) -> Result<()> {
    json::ensure_extension(&args.output, "svg")?;

    let parsed = load_transcript(&args.input, config)?;
    let rows = table::flatten(&parsed);
    let pivot = table::pivot(&rows, args.metric);

    let title = args.title.as_deref().unwrap_or(&config.chart.title);
    let chart = BarChart::from_pivot(&pivot, title);
    if chart.bar_count() == 0 {
        verbose::warn(format_args!("no values for {}; chart will be empty", args.metric));
    }
    chart.write_svg(&config.chart, &args.output)?;
    dprintln!(
        "Chart with {} bars written to {}",
        chart.bar_count(),
        args.output.display()
    );
    Ok(())
}
