//! Parsed benchmark data, keyed file → iteration → method → process.

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// All files processed in one benchmark transcript, keyed by file stem.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    /// Per-file records, sorted by file stem.
    pub files: BTreeMap<String, FileRecord>,
}

/// Measurements for one input FASTQ file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileRecord {
    /// Size of the uncompressed `.fastq` file, from the initial `du` probe.
    pub size_bytes: Option<u64>,
    /// Benchmark iterations, keyed by iteration number.
    pub iterations: BTreeMap<u32, Iteration>,
}

/// Methods tested in one iteration, keyed by codec name.
pub type Iteration = BTreeMap<String, MethodRecord>;

/// The compress and decompress measurements of one codec run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MethodRecord {
    /// Compressing the `.fastq` file.
    pub compress: Measurement,
    /// Decompressing it back.
    pub decompress: Measurement,
}

impl MethodRecord {
    /// The measurement for `process`.
    pub fn get(&self, process: Process) -> &Measurement {
        match process {
            Process::Compress => &self.compress,
            Process::Decompress => &self.decompress,
        }
    }

    /// Mutable access to the measurement for `process`.
    pub fn get_mut(&mut self, process: Process) -> &mut Measurement {
        match process {
            Process::Compress => &mut self.compress,
            Process::Decompress => &mut self.decompress,
        }
    }
}

/// One timed command and the size probe that followed it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// The shell trace line of the timed command (`+ sudo time ...`).
    pub command: Option<String>,
    /// Wall-clock duration, stored as seconds in JSON.
    #[serde(with = "crate::elapsed::seconds", default)]
    pub elapsed: Option<Duration>,
    /// CPU utilization percent. `None` when `time` printed `?`.
    pub cpu_pct: Option<f64>,
    /// User-mode CPU seconds.
    pub user_secs: Option<f64>,
    /// Kernel-mode CPU seconds.
    pub system_secs: Option<f64>,
    /// Peak resident set size in KiB.
    pub max_resident_kb: Option<u64>,
    /// Size of the output file after the command ran.
    pub size_bytes: Option<u64>,
}

impl Measurement {
    /// Elapsed wall-clock time in seconds, if known.
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.elapsed.map(|d| d.as_secs_f64())
    }
}

/// Which half of a codec run a measurement belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Process {
    /// `.fastq` → compressed.
    Compress,
    /// Compressed → `.fastq`.
    Decompress,
}

impl Process {
    /// Both processes, in benchmark order.
    pub const ALL: [Self; 2] = [Self::Compress, Self::Decompress];

    /// Lowercase name used in tables, JSON and CSV.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Compress => "compress",
            Self::Decompress => "decompress",
        }
    }
}

impl fmt::Display for Process {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Transcript {
    /// Number of method runs across all files and iterations.
    pub fn run_count(&self) -> usize {
        self.files
            .values()
            .flat_map(|file| file.iterations.values())
            .map(BTreeMap::len)
            .sum()
    }

    /// Distinct method names, sorted.
    pub fn methods(&self) -> Vec<String> {
        let mut methods: Vec<String> = self
            .files
            .values()
            .flat_map(|file| file.iterations.values())
            .flat_map(|iteration| iteration.keys().cloned())
            .collect();
        methods.sort();
        methods.dedup();
        methods
    }
}
