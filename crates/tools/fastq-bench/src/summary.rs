//! Statistical reduction of the long-format table.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::model::Process;
use crate::table::{Metric, Row};

/// Summary statistics over a set of samples.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    /// Number of samples.
    pub count: usize,
    /// Arithmetic mean.
    pub mean: f64,
    /// Sample standard deviation (n - 1). Zero for a single sample.
    pub stddev: f64,
    /// Minimum.
    pub min: f64,
    /// Median (mean of the middle pair for even counts).
    pub median: f64,
    /// Maximum.
    pub max: f64,
}

impl Stats {
    /// Reduce `samples`, or `None` if there are none.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let n = samples.len();
        if n == 0 {
            return None;
        }

        let mut sorted = samples.to_vec();
        sorted.sort_unstable_by(f64::total_cmp);

        let min = sorted[0];
        let max = sorted[n - 1];
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };
        let mean = sorted.iter().sum::<f64>() / n as f64;
        let stddev = if n > 1 {
            let var_sum: f64 = sorted.iter().map(|&s| (s - mean) * (s - mean)).sum();
            (var_sum / (n - 1) as f64).sqrt()
        } else {
            0.0
        };

        Some(Self {
            count: n,
            mean,
            stddev,
            min,
            median,
            max,
        })
    }
}

/// How rows are grouped before reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GroupBy {
    /// Pool all files; one group per method and process.
    #[default]
    MethodProcess,
    /// One group per file, method and process.
    FileMethodProcess,
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "method" => Ok(Self::MethodProcess),
            "file" => Ok(Self::FileMethodProcess),
            other => Err(format!("unknown grouping '{other}' (expected: method, file)")),
        }
    }
}

/// Statistics for one group of rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// File stem, when grouped per file.
    pub file: Option<String>,
    /// Codec name.
    pub method: String,
    /// Compress or decompress.
    pub process: Process,
    /// Number of rows in the group.
    pub runs: usize,
    /// Wall-clock seconds.
    pub elapsed_secs: Option<Stats>,
    /// CPU utilization percent.
    pub cpu_pct: Option<Stats>,
    /// Compression ratio (compress groups only).
    pub compression_ratio: Option<Stats>,
    /// Throughput in MiB/s.
    pub throughput_mib_s: Option<Stats>,
}

impl Summary {
    /// The statistics for `metric`.
    pub fn stats(&self, metric: Metric) -> Option<&Stats> {
        match metric {
            Metric::Elapsed => self.elapsed_secs.as_ref(),
            Metric::Cpu => self.cpu_pct.as_ref(),
            Metric::Ratio => self.compression_ratio.as_ref(),
            Metric::Throughput => self.throughput_mib_s.as_ref(),
        }
    }
}

/// Group rows and reduce each group. Output is sorted by group key.
pub fn summarize(rows: &[Row], group_by: GroupBy) -> Vec<Summary> {
    let mut groups: BTreeMap<(Option<&str>, &str, Process), Vec<&Row>> = BTreeMap::new();
    for row in rows {
        let file = match group_by {
            GroupBy::MethodProcess => None,
            GroupBy::FileMethodProcess => Some(row.file.as_str()),
        };
        groups
            .entry((file, row.method.as_str(), row.process))
            .or_default()
            .push(row);
    }

    groups
        .into_iter()
        .map(|((file, method, process), group)| {
            let reduce = |metric: Metric| {
                let samples: Vec<f64> = group.iter().filter_map(|row| metric.value(row)).collect();
                Stats::from_samples(&samples)
            };
            Summary {
                file: file.map(str::to_string),
                method: method.to_string(),
                process,
                runs: group.len(),
                elapsed_secs: reduce(Metric::Elapsed),
                cpu_pct: reduce(Metric::Cpu),
                compression_ratio: reduce(Metric::Ratio),
                throughput_mib_s: reduce(Metric::Throughput),
            }
        })
        .collect()
}

/// The best summary for `process` under `metric`.
///
/// Lower is better for elapsed time and CPU; higher is better for ratio and
/// throughput. Groups without the metric are ignored.
pub fn best(summaries: &[Summary], process: Process, metric: Metric) -> Option<&Summary> {
    let candidates = summaries
        .iter()
        .filter(|summary| summary.process == process)
        .filter_map(|summary| summary.stats(metric).map(|stats| (summary, stats.mean)));
    let winner = match metric {
        Metric::Elapsed | Metric::Cpu => candidates.min_by(|a, b| a.1.total_cmp(&b.1)),
        Metric::Ratio | Metric::Throughput => candidates.max_by(|a, b| a.1.total_cmp(&b.1)),
    };
    winner.map(|(summary, _)| summary)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn row(file: &str, method: &str, process: Process, elapsed: f64) -> Row {
        Row {
            file: file.into(),
            iteration: 1,
            method: method.into(),
            process,
            elapsed_secs: Some(elapsed),
            cpu_pct: None,
            initial_size_bytes: Some(1000),
            size_bytes: Some(250),
            compression_ratio: (process == Process::Compress).then_some(4.0),
            throughput_mib_s: None,
        }
    }

    #[test]
    fn stats_match_hand_computation() {
        let stats = Stats::from_samples(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_eq!(stats.count, 8);
        assert!(approx(stats.mean, 5.0));
        assert!(approx(stats.median, 4.5));
        assert!(approx(stats.min, 2.0));
        assert!(approx(stats.max, 9.0));
        // Sum of squared deviations is 32; 32 / 7.
        assert!(approx(stats.stddev, (32.0f64 / 7.0).sqrt()));
    }

    #[test]
    fn stats_edge_cases() {
        assert!(Stats::from_samples(&[]).is_none());
        let single = Stats::from_samples(&[3.5]).unwrap();
        assert!(approx(single.stddev, 0.0));
        assert!(approx(single.median, 3.5));
    }

    #[test]
    fn grouping_by_method_pools_files() {
        let rows = vec![
            row("a", "gzip", Process::Compress, 1.0),
            row("b", "gzip", Process::Compress, 3.0),
            row("a", "gzip", Process::Decompress, 0.5),
            row("a", "xz", Process::Compress, 6.0),
        ];

        let pooled = summarize(&rows, GroupBy::MethodProcess);
        assert_eq!(pooled.len(), 3);
        assert_eq!(pooled[0].method, "gzip");
        assert_eq!(pooled[0].process, Process::Compress);
        assert_eq!(pooled[0].runs, 2);
        assert!(approx(pooled[0].elapsed_secs.unwrap().mean, 2.0));
        assert!(pooled[0].cpu_pct.is_none());
        assert!(pooled[1].compression_ratio.is_none());

        let per_file = summarize(&rows, GroupBy::FileMethodProcess);
        assert_eq!(per_file.len(), 4);
        assert_eq!(per_file[0].file.as_deref(), Some("a"));
    }

    #[test]
    fn best_respects_metric_direction() {
        let rows = vec![
            row("a", "gzip", Process::Compress, 1.0),
            row("a", "xz", Process::Compress, 6.0),
        ];
        let summaries = summarize(&rows, GroupBy::MethodProcess);
        assert_eq!(best(&summaries, Process::Compress, Metric::Elapsed).unwrap().method, "gzip");
        assert!(best(&summaries, Process::Decompress, Metric::Elapsed).is_none());
    }

    #[test]
    fn grouping_names_parse() {
        assert_eq!("file".parse::<GroupBy>().unwrap(), GroupBy::FileMethodProcess);
        assert!("codec".parse::<GroupBy>().is_err());
    }
}
