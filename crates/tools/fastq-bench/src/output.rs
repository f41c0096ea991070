//! Terminal output formatting for parsed transcripts and summaries.

use std::fmt::Write;
use std::time::Duration;

use crate::elapsed::format_elapsed;
use crate::model::Transcript;
use crate::summary::{Stats, Summary};
use crate::table::Pivot;

/// Render one line per file: size, iteration count and methods seen.
pub fn format_transcript_overview(transcript: &Transcript) -> String {
    let mut out = String::new();
    if transcript.files.is_empty() {
        out.push_str("  No benchmark files found in transcript.\n");
        return out;
    }

    let max_name = transcript
        .files
        .keys()
        .map(String::len)
        .max()
        .unwrap_or(4)
        .max(4);

    let _ = writeln!(
        out,
        "  {:<width$}  {:>14}  {:>10}  {:>6}  Methods",
        "File",
        "Size (bytes)",
        "Iterations",
        "Runs",
        width = max_name
    );
    let _ = writeln!(
        out,
        "  {:-<width$}  {:->14}  {:->10}  {:->6}  {:-<7}",
        "",
        "",
        "",
        "",
        "",
        width = max_name
    );

    for (name, record) in &transcript.files {
        let size = record
            .size_bytes
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        let runs: usize = record.iterations.values().map(|it| it.len()).sum();
        let mut methods: Vec<&str> = record
            .iterations
            .values()
            .flat_map(|it| it.keys().map(String::as_str))
            .collect();
        methods.sort_unstable();
        methods.dedup();
        let _ = writeln!(
            out,
            "  {:<width$}  {:>14}  {:>10}  {:>6}  {}",
            name,
            size,
            record.iterations.len(),
            runs,
            methods.join(", "),
            width = max_name
        );
    }
    out
}

/// Render per-group statistics as an aligned table.
pub fn format_summary_table(summaries: &[Summary]) -> String {
    let mut out = String::new();
    if summaries.is_empty() {
        out.push_str("  No measurements to summarize.\n");
        return out;
    }

    let per_file = summaries.iter().any(|s| s.file.is_some());
    let max_file = summaries
        .iter()
        .filter_map(|s| s.file.as_ref().map(String::len))
        .max()
        .unwrap_or(4)
        .max(4);
    let max_method = summaries
        .iter()
        .map(|s| s.method.len())
        .max()
        .unwrap_or(6)
        .max(6);

    let (file_header, file_rule) = if per_file {
        (
            format!("{:<max_file$}  ", "File"),
            format!("{:-<max_file$}  ", ""),
        )
    } else {
        (String::new(), String::new())
    };

    let _ = writeln!(
        out,
        "  {file_header}{:<max_method$}  {:<10}  {:>4}  {:>12}  {:>10}  {:>10}  {:>7}  {:>7}  {:>8}",
        "Method",
        "Process",
        "Runs",
        "Mean",
        "Stddev (s)",
        "Min (s)",
        "CPU %",
        "Ratio",
        "MiB/s",
    );
    let _ = writeln!(
        out,
        "  {file_rule}{:-<max_method$}  {:-<10}  {:->4}  {:->12}  {:->10}  {:->10}  {:->7}  {:->7}  {:->8}",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
        "",
    );

    for summary in summaries {
        let file_col = match (&summary.file, per_file) {
            (Some(file), true) => format!("{file:<max_file$}  "),
            (None, true) => format!("{:<max_file$}  ", "-"),
            _ => String::new(),
        };
        let elapsed = summary.elapsed_secs.as_ref();
        let _ = writeln!(
            out,
            "  {file_col}{:<max_method$}  {:<10}  {:>4}  {:>12}  {:>10}  {:>10}  {:>7}  {:>7}  {:>8}",
            summary.method,
            summary.process.as_str(),
            summary.runs,
            elapsed.map_or_else(|| "-".to_string(), |s| fmt_mean_elapsed(s.mean)),
            fmt_opt(elapsed.map(|s| s.stddev), 3),
            fmt_opt(elapsed.map(|s| s.min), 3),
            fmt_opt(summary.cpu_pct.as_ref().map(|s| s.mean), 1),
            fmt_opt(summary.compression_ratio.as_ref().map(|s| s.mean), 2),
            fmt_opt(summary.throughput_mib_s.as_ref().map(|s| s.mean), 2),
        );
    }
    out
}

/// Render a method × process pivot of means, with stddev in parentheses.
pub fn format_pivot(pivot: &Pivot) -> String {
    let mut out = String::new();
    if pivot.methods.is_empty() || pivot.processes.is_empty() {
        let _ = writeln!(out, "  No values for {}.", pivot.metric.label().to_lowercase());
        return out;
    }

    let max_method = pivot
        .methods
        .iter()
        .map(String::len)
        .max()
        .unwrap_or(6)
        .max(6);
    let col = 22;

    let _ = writeln!(out, "  {} ({})", pivot.metric.label(), pivot.metric.unit());
    let _ = write!(out, "  {:<max_method$}", "Method");
    for process in &pivot.processes {
        let _ = write!(out, "  {:>col$}", process.as_str());
    }
    out.push('\n');
    let _ = write!(out, "  {:-<max_method$}", "");
    for _ in &pivot.processes {
        let _ = write!(out, "  {:->col$}", "");
    }
    out.push('\n');

    for (method, cells) in pivot.methods.iter().zip(&pivot.cells) {
        let _ = write!(out, "  {method:<max_method$}");
        for cell in cells {
            let text = cell.as_ref().map_or_else(|| "-".to_string(), format_cell);
            let _ = write!(out, "  {text:>col$}");
        }
        out.push('\n');
    }
    out
}

/// Print [`format_transcript_overview`] to stdout.
pub fn print_transcript_overview(transcript: &Transcript) {
    println!();
    print!("{}", format_transcript_overview(transcript));
    println!();
}

/// Print [`format_summary_table`] to stdout.
pub fn print_summary_table(summaries: &[Summary]) {
    println!();
    print!("{}", format_summary_table(summaries));
    println!();
}

/// Print [`format_pivot`] to stdout.
pub fn print_pivot(pivot: &Pivot) {
    println!();
    print!("{}", format_pivot(pivot));
    println!();
}

fn format_cell(stats: &Stats) -> String {
    format!("{:.3} (±{:.3})", stats.mean, stats.stddev)
}

/// Mean elapsed seconds as `[H:]MM:SS.fff`, or `-` when not representable.
fn fmt_mean_elapsed(secs: f64) -> String {
    Duration::try_from_secs_f64(secs).map_or_else(|_| "-".to_string(), format_elapsed)
}

fn fmt_opt(value: Option<f64>, precision: usize) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.precision$}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Process;
    use crate::table::Metric;

    fn stats(mean: f64) -> Stats {
        Stats {
            count: 2,
            mean,
            stddev: 0.5,
            min: mean - 0.5,
            median: mean,
            max: mean + 0.5,
        }
    }

    #[test]
    fn summary_table_lists_every_group() {
        let summaries = vec![
            Summary {
                file: None,
                method: "gzip".into(),
                process: Process::Compress,
                runs: 2,
                elapsed_secs: Some(stats(61.25)),
                cpu_pct: Some(stats(95.0)),
                compression_ratio: Some(stats(4.0)),
                throughput_mib_s: None,
            },
            Summary {
                file: None,
                method: "gzip".into(),
                process: Process::Decompress,
                runs: 2,
                elapsed_secs: None,
                cpu_pct: None,
                compression_ratio: None,
                throughput_mib_s: None,
            },
        ];
        let table = format_summary_table(&summaries);
        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(!lines[0].contains("File"));
        assert!(lines[2].contains("1:01.250"));
        assert!(lines[2].contains("95.0"));
        assert!(lines[2].contains("4.00"));
        assert!(lines[3].contains("decompress"));
    }

    #[test]
    fn pivot_renders_cells_and_gaps() {
        let pivot = Pivot {
            metric: Metric::Elapsed,
            methods: vec!["bzip2".into(), "gzip".into()],
            processes: vec![Process::Compress, Process::Decompress],
            cells: vec![
                vec![Some(stats(4.0)), None],
                vec![Some(stats(1.0)), Some(stats(0.5))],
            ],
        };
        let text = format_pivot(&pivot);
        assert!(text.starts_with("  Elapsed time (s)"));
        assert!(text.contains("4.000 (±0.500)"));
        let bzip2 = text.lines().find(|l| l.trim_start().starts_with("bzip2")).unwrap();
        assert!(bzip2.trim_end().ends_with('-'));
    }

    #[test]
    fn huge_mean_elapsed_renders_as_dash() {
        let summary = Summary {
            file: None,
            method: "xz".into(),
            process: Process::Compress,
            runs: 1,
            elapsed_secs: Some(stats(1.8e19 * 3600.0)),
            cpu_pct: None,
            compression_ratio: None,
            throughput_mib_s: None,
        };
        let table = format_summary_table(&[summary]);
        let row = table.lines().nth(2).unwrap();
        assert!(row.contains("xz"));
        assert_eq!(row.split_whitespace().nth(3), Some("-"));
    }

    #[test]
    fn empty_inputs_say_so() {
        assert!(format_transcript_overview(&Transcript::default()).contains("No benchmark files"));
        assert!(format_summary_table(&[]).contains("No measurements"));
    }
}
