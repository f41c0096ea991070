//! Long-format reshaping of a [`Transcript`] and the pivots built from it.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::model::{Process, Transcript};
use crate::summary::Stats;

const MIB: f64 = 1024.0 * 1024.0;

/// One observation: a single process of one method run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// File stem.
    pub file: String,
    /// Iteration number.
    pub iteration: u32,
    /// Codec name.
    pub method: String,
    /// Compress or decompress.
    pub process: Process,
    /// Wall-clock seconds.
    pub elapsed_secs: Option<f64>,
    /// CPU utilization percent.
    pub cpu_pct: Option<f64>,
    /// Size of the original `.fastq`.
    pub initial_size_bytes: Option<u64>,
    /// Size of the file produced by this process.
    pub size_bytes: Option<u64>,
    /// Original size / compressed size, compress rows only.
    pub compression_ratio: Option<f64>,
    /// Original size processed per second, in MiB/s.
    pub throughput_mib_s: Option<f64>,
}

/// Flatten the nested transcript into one row per file/iteration/method/process.
///
/// Rows come out sorted by file, iteration, method, then process.
pub fn flatten(transcript: &Transcript) -> Vec<Row> {
    let mut rows = Vec::new();
    for (file, record) in &transcript.files {
        for (&iteration, methods) in &record.iterations {
            for (method, run) in methods {
                for process in Process::ALL {
                    let measurement = run.get(process);
                    let elapsed_secs = measurement.elapsed_secs();
                    let initial = record.size_bytes;

                    let compression_ratio = match (process, initial, measurement.size_bytes) {
                        (Process::Compress, Some(initial), Some(compressed)) if compressed > 0 => {
                            Some(initial as f64 / compressed as f64)
                        }
                        _ => None,
                    };
                    let throughput_mib_s = match (initial, elapsed_secs) {
                        (Some(initial), Some(secs)) if secs > 0.0 => {
                            Some(initial as f64 / MIB / secs)
                        }
                        _ => None,
                    };

                    rows.push(Row {
                        file: file.clone(),
                        iteration,
                        method: method.clone(),
                        process,
                        elapsed_secs,
                        cpu_pct: measurement.cpu_pct,
                        initial_size_bytes: initial,
                        size_bytes: measurement.size_bytes,
                        compression_ratio,
                        throughput_mib_s,
                    });
                }
            }
        }
    }
    rows
}

/// Write rows as CSV with a header line. Missing values are empty fields.
pub fn write_csv(rows: &[Row], path: &Path) -> Result<()> {
    let mut writer =
        csv::Writer::from_path(path).with_context(|| format!("creating {}", path.display()))?;
    for row in rows {
        writer
            .serialize(row)
            .with_context(|| format!("writing row to {}", path.display()))?;
    }
    writer.flush().with_context(|| format!("flushing {}", path.display()))?;
    Ok(())
}

/// A numeric column that can be pivoted and charted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    /// Wall-clock seconds.
    Elapsed,
    /// CPU utilization percent.
    Cpu,
    /// Compression ratio.
    Ratio,
    /// Throughput in MiB/s.
    Throughput,
}

impl Metric {
    /// Every metric, in display order.
    pub const ALL: [Self; 4] = [Self::Elapsed, Self::Cpu, Self::Ratio, Self::Throughput];

    /// Extract this metric from a row.
    pub fn value(self, row: &Row) -> Option<f64> {
        match self {
            Self::Elapsed => row.elapsed_secs,
            Self::Cpu => row.cpu_pct,
            Self::Ratio => row.compression_ratio,
            Self::Throughput => row.throughput_mib_s,
        }
    }

    /// Human-readable name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Elapsed => "Elapsed time",
            Self::Cpu => "CPU utilization",
            Self::Ratio => "Compression ratio",
            Self::Throughput => "Throughput",
        }
    }

    /// Unit suffix for axis titles and table headers.
    pub fn unit(self) -> &'static str {
        match self {
            Self::Elapsed => "s",
            Self::Cpu => "%",
            Self::Ratio => "x",
            Self::Throughput => "MiB/s",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Elapsed => "elapsed",
            Self::Cpu => "cpu",
            Self::Ratio => "ratio",
            Self::Throughput => "throughput",
        };
        f.write_str(name)
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|metric| metric.to_string() == s)
            .ok_or_else(|| {
                format!("unknown metric '{s}' (expected: elapsed, cpu, ratio, throughput)")
            })
    }
}

/// Wide table: one row per method, one column per process, cells summarizing
/// `metric` across all files and iterations.
#[derive(Debug, Clone, PartialEq)]
pub struct Pivot {
    /// The summarized column.
    pub metric: Metric,
    /// Row labels, sorted.
    pub methods: Vec<String>,
    /// Column labels. Processes with no values at all are dropped.
    pub processes: Vec<Process>,
    /// `cells[method][process]`, `None` where no value was observed.
    pub cells: Vec<Vec<Option<Stats>>>,
}

impl Pivot {
    /// The cell for a method/process pair.
    pub fn get(&self, method: &str, process: Process) -> Option<&Stats> {
        let row = self.methods.iter().position(|m| m == method)?;
        let col = self.processes.iter().position(|&p| p == process)?;
        self.cells[row][col].as_ref()
    }

    /// Largest `mean + stddev` in the table, for axis scaling.
    pub fn max_extent(&self) -> f64 {
        self.cells
            .iter()
            .flatten()
            .flatten()
            .map(|stats| stats.mean + stats.stddev)
            .fold(0.0, f64::max)
    }
}

/// Pivot `rows` on method × process.
pub fn pivot(rows: &[Row], metric: Metric) -> Pivot {
    let mut methods: Vec<String> = rows.iter().map(|row| row.method.clone()).collect();
    methods.sort();
    methods.dedup();

    let samples = |method: &str, process: Process| -> Vec<f64> {
        rows.iter()
            .filter(|row| row.method == method && row.process == process)
            .filter_map(|row| metric.value(row))
            .collect()
    };

    let processes: Vec<Process> = Process::ALL
        .into_iter()
        .filter(|&process| {
            methods
                .iter()
                .any(|method| !samples(method, process).is_empty())
        })
        .collect();

    let cells = methods
        .iter()
        .map(|method| {
            processes
                .iter()
                .map(|&process| Stats::from_samples(&samples(method, process)))
                .collect()
        })
        .collect();

    Pivot {
        metric,
        methods,
        processes,
        cells,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::model::{FileRecord, Iteration, Measurement, MethodRecord};

    fn run(comp_ms: u64, comp_size: u64, decomp_ms: u64) -> MethodRecord {
        MethodRecord {
            compress: Measurement {
                elapsed: Some(Duration::from_millis(comp_ms)),
                cpu_pct: Some(100.0),
                size_bytes: Some(comp_size),
                ..Measurement::default()
            },
            decompress: Measurement {
                elapsed: Some(Duration::from_millis(decomp_ms)),
                cpu_pct: None,
                size_bytes: Some(4 * 1024 * 1024),
                ..Measurement::default()
            },
        }
    }

    fn sample() -> Transcript {
        let mut file = FileRecord {
            size_bytes: Some(4 * 1024 * 1024),
            ..FileRecord::default()
        };
        for (i, ms) in [(1, 1000), (2, 3000)] {
            let mut iteration = Iteration::new();
            iteration.insert("gzip".into(), run(ms, 1024 * 1024, 500));
            iteration.insert("bzip2".into(), run(4000, 512 * 1024, 2000));
            file.iterations.insert(i, iteration);
        }
        let mut transcript = Transcript::default();
        transcript.files.insert("SRR1".into(), file);
        transcript
    }

    #[test]
    fn flatten_produces_one_row_per_process() {
        let rows = flatten(&sample());
        assert_eq!(rows.len(), 8);
        let first = &rows[0];
        assert_eq!(
            (first.iteration, first.method.as_str(), first.process),
            (1, "bzip2", Process::Compress)
        );
        assert_eq!(first.compression_ratio, Some(8.0));
        assert_eq!(first.throughput_mib_s, Some(1.0));
        assert_eq!(rows[1].process, Process::Decompress);
        assert_eq!(rows[1].compression_ratio, None);
        assert_eq!(rows[1].throughput_mib_s, Some(2.0));
    }

    #[test]
    fn pivot_means_across_iterations() {
        let rows = flatten(&sample());
        let table = pivot(&rows, Metric::Elapsed);
        assert_eq!(table.methods, vec!["bzip2", "gzip"]);
        assert_eq!(table.processes, vec![Process::Compress, Process::Decompress]);
        let gzip = table.get("gzip", Process::Compress).unwrap();
        assert_eq!(gzip.count, 2);
        assert!((gzip.mean - 2.0).abs() < 1e-9);
        assert!((table.get("bzip2", Process::Decompress).unwrap().mean - 2.0).abs() < 1e-9);
    }

    #[test]
    fn pivot_drops_empty_process_columns() {
        let rows = flatten(&sample());
        let ratio = pivot(&rows, Metric::Ratio);
        assert_eq!(ratio.processes, vec![Process::Compress]);
        let cpu = pivot(&rows, Metric::Cpu);
        assert_eq!(cpu.processes, vec![Process::Compress]);
    }

    #[test]
    fn metric_names_parse() {
        for metric in Metric::ALL {
            assert_eq!(metric.to_string().parse::<Metric>().unwrap(), metric);
        }
        assert!("speed".parse::<Metric>().is_err());
    }

    #[test]
    fn csv_has_header_and_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("rows.csv");
        write_csv(&flatten(&sample()), &path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("file,iteration,method,process,elapsed_secs"));
        assert_eq!(lines.count(), 8);
        assert!(text.contains("SRR1,1,gzip,decompress,0.5,,"));
    }
}
