//! Single-pass scanner for `bench_compress.sh` terminal transcripts.
//!
//! The transcript is free-form shell output with a handful of literal
//! markers. The scanner walks it line by line, tracking the current file,
//! iteration and method, and an [`Expect`] state for the six measurements
//! inside each method block:
//!
//! ```text
//! Testing gzip:
//! + sudo time gzip SRR1.fastq          compress command
//! 0.50user ... 0:01.23elapsed 95%CPU   compress timing
//! + du --bytes SRR1.fastq.gz           compress size probe
//! 2100 SRR1.fastq.gz                   compress size
//! + sudo time gzip -d SRR1.fastq.gz    decompress command
//! ...                                  decompress timing, probe, size
//! ```
//!
//! Lines that match nothing expected are skipped. File, iteration and
//! method markers always win over the current expectation.

use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::elapsed::parse_elapsed;
use crate::json;
use crate::model::{FileRecord, Iteration, MethodRecord, Process, Transcript};

/// Literal markers emitted by the benchmark script.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Markers {
    /// Prefix of the line that starts a new file (`Begin processing: <path>`).
    pub begin: String,
    /// Whole line announcing the initial size probe. The typo is upstream's.
    pub initial_size: String,
    /// Lines skipped between `initial_size` and the `<bytes> <path>` line.
    pub initial_size_skip_lines: usize,
    /// Prefix of the iteration line (`Iteration: <n>`).
    pub iteration: String,
    /// Prefix of the method line (`Testing <method>:`).
    pub method: String,
    /// Prefix of the shell trace for a timed command.
    pub timed_command: String,
    /// Prefix of the shell trace for a size probe.
    pub size_command: String,
}

impl Default for Markers {
    fn default() -> Self {
        Self {
            begin: "Begin processing:".into(),
            initial_size: "Intial .fastq size:".into(),
            initial_size_skip_lines: 1,
            iteration: "Iteration:".into(),
            method: "Testing".into(),
            timed_command: "+ sudo time".into(),
            size_command: "+ du --bytes".into(),
        }
    }
}

impl Markers {
    /// Reject markers that would match every line.
    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("begin", &self.begin),
            ("initial_size", &self.initial_size),
            ("iteration", &self.iteration),
            ("method", &self.method),
            ("timed_command", &self.timed_command),
            ("size_command", &self.size_command),
        ];
        for (name, marker) in fields {
            if marker.trim().is_empty() {
                bail!("marker `{name}` must not be empty");
            }
        }
        Ok(())
    }
}

/// A non-fatal problem found while scanning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// The decompressed file size differs from the original.
    SizeMismatch {
        /// File stem.
        file: String,
        /// Iteration number.
        iteration: u32,
        /// Codec name.
        method: String,
        /// Size from the initial probe.
        initial: u64,
        /// Size after decompression.
        decompressed: u64,
        /// 1-based line of the decompressed size.
        line: usize,
    },
    /// The initial size line names a different file than the current one.
    InitialSizeName {
        /// File stem.
        file: String,
        /// Path printed by `du`.
        path: String,
        /// 1-based line number.
        line: usize,
    },
    /// A method block ended before all of its measurements were seen.
    Incomplete {
        /// File stem.
        file: String,
        /// Iteration number.
        iteration: u32,
        /// Codec name.
        method: String,
        /// What the scanner was still waiting for.
        missing: &'static str,
        /// 1-based line where the block was abandoned.
        line: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SizeMismatch { file, iteration, method, initial, decompressed, line } => write!(
                f,
                "line {line}: {file} iteration {iteration} {method}: \
                 decompressed size {decompressed} does not match initial size {initial}"
            ),
            Self::InitialSizeName { file, path, line } => {
                write!(f, "line {line}: initial size of {file} reported for {path}")
            }
            Self::Incomplete { file, iteration, method, missing, line } => write!(
                f,
                "line {line}: {file} iteration {iteration} {method}: block ended before {missing}"
            ),
        }
    }
}

/// Result of scanning a whole transcript.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    /// The parsed measurements.
    pub transcript: Transcript,
    /// Non-fatal problems, in input order.
    pub warnings: Vec<Warning>,
    /// Number of lines read.
    pub lines: usize,
}

/// What the scanner is waiting for next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Expect {
    /// No pending measurement.
    Nothing,
    /// Skipping `skip` lines, then reading `<bytes> <path>`.
    InitialSize { skip: usize },
    /// `+ sudo time ...`
    Command(Process),
    /// The `...elapsed ...%CPU` line.
    Timing(Process),
    /// `+ du --bytes ...`
    SizeProbe(Process),
    /// `<bytes> <path>` following the probe.
    SizeValue(Process),
}

impl Expect {
    fn describe(self) -> &'static str {
        match self {
            Self::Nothing | Self::InitialSize { .. } => "nothing",
            Self::Command(Process::Compress) => "the compress command",
            Self::Command(Process::Decompress) => "the decompress command",
            Self::Timing(Process::Compress) => "the compress timing",
            Self::Timing(Process::Decompress) => "the decompress timing",
            Self::SizeProbe(Process::Compress) | Self::SizeValue(Process::Compress) => {
                "the compressed size"
            }
            Self::SizeProbe(Process::Decompress) | Self::SizeValue(Process::Decompress) => {
                "the decompressed size"
            }
        }
    }

    fn in_method_block(self) -> bool {
        !matches!(self, Self::Nothing | Self::InitialSize { .. })
    }
}

/// Fields parsed from one GNU `time` report line.
#[derive(Debug, Clone, PartialEq)]
pub struct Timing {
    /// Wall-clock duration.
    pub elapsed: Duration,
    /// CPU percent, `None` for `?`.
    pub cpu_pct: Option<f64>,
    /// User CPU seconds.
    pub user_secs: Option<f64>,
    /// System CPU seconds.
    pub system_secs: Option<f64>,
    /// Peak resident set size in KiB.
    pub max_resident_kb: Option<u64>,
}

/// Parse a GNU `time` default-format line.
///
/// `0.50user 0.01system 0:01.23elapsed 95%CPU (0avgtext+0avgdata 1234maxresident)k`
pub fn parse_timing(line: &str) -> Result<Timing> {
    let mut elapsed = None;
    let mut cpu_pct = None;
    let mut user_secs = None;
    let mut system_secs = None;
    let mut max_resident_kb = None;

    for token in line.split_whitespace() {
        if let Some(value) = token.strip_suffix("elapsed") {
            elapsed = Some(parse_elapsed(value)?);
        } else if let Some(value) = token.strip_suffix("%CPU") {
            cpu_pct = match value {
                "?" => None,
                v => Some(
                    v.parse::<f64>()
                        .with_context(|| format!("invalid CPU percent {token:?}"))?,
                ),
            };
        } else if let Some(value) = token.strip_suffix("user") {
            user_secs = value.parse().ok();
        } else if let Some(value) = token.strip_suffix("system") {
            system_secs = value.parse().ok();
        } else if let Some(value) = token.strip_suffix("maxresident)k") {
            max_resident_kb = value.parse().ok();
        }
    }

    let elapsed = elapsed.ok_or_else(|| anyhow::anyhow!("no elapsed field in timing line"))?;
    Ok(Timing {
        elapsed,
        cpu_pct,
        user_secs,
        system_secs,
        max_resident_kb,
    })
}

/// Streaming transcript scanner. Feed lines in order, then [`finish`](Self::finish).
pub struct TranscriptParser {
    markers: Markers,
    transcript: Transcript,
    warnings: Vec<Warning>,
    line_no: usize,
    file: Option<String>,
    iteration: Option<u32>,
    method: Option<String>,
    expect: Expect,
}

impl TranscriptParser {
    /// Create a scanner for the given markers.
    pub fn new(markers: Markers) -> Self {
        Self {
            markers,
            transcript: Transcript::default(),
            warnings: Vec::new(),
            line_no: 0,
            file: None,
            iteration: None,
            method: None,
            expect: Expect::Nothing,
        }
    }

    /// Consume one line of the transcript.
    pub fn feed_line(&mut self, raw: &str) -> Result<()> {
        self.line_no += 1;
        let line_no = self.line_no;
        self.dispatch(raw.trim_end())
            .with_context(|| format!("line {line_no}: {}", raw.trim_end()))
    }

    /// End the scan and return everything collected.
    pub fn finish(mut self) -> ParseOutcome {
        self.abandon_method();
        ParseOutcome {
            transcript: self.transcript,
            warnings: self.warnings,
            lines: self.line_no,
        }
    }

    fn dispatch(&mut self, line: &str) -> Result<()> {
        if let Some(rest) = line.strip_prefix(self.markers.begin.as_str()) {
            return self.begin_file(rest);
        }
        if line == self.markers.initial_size {
            self.abandon_method();
            self.expect = Expect::InitialSize {
                skip: self.markers.initial_size_skip_lines,
            };
            return Ok(());
        }
        if let Expect::InitialSize { skip } = self.expect {
            if skip > 0 {
                self.expect = Expect::InitialSize { skip: skip - 1 };
                return Ok(());
            }
            self.expect = Expect::Nothing;
            return self.initial_size(line);
        }
        if let Some(rest) = line.strip_prefix(self.markers.iteration.as_str()) {
            return self.begin_iteration(rest);
        }
        if line.starts_with(self.markers.method.as_str()) {
            return self.begin_method(line);
        }

        let expect = self.expect;
        match expect {
            Expect::Command(process) if line.starts_with(self.markers.timed_command.as_str()) => {
                self.current_method()?.get_mut(process).command = Some(line.to_string());
                self.expect = Expect::Timing(process);
            }
            Expect::Timing(process) if line.contains("elapsed") && line.contains("CPU") => {
                let timing = parse_timing(line)?;
                let measurement = self.current_method()?.get_mut(process);
                measurement.elapsed = Some(timing.elapsed);
                measurement.cpu_pct = timing.cpu_pct;
                measurement.user_secs = timing.user_secs;
                measurement.system_secs = timing.system_secs;
                measurement.max_resident_kb = timing.max_resident_kb;
                self.expect = Expect::SizeProbe(process);
            }
            Expect::SizeProbe(process) if line.starts_with(self.markers.size_command.as_str()) => {
                self.expect = Expect::SizeValue(process);
            }
            Expect::SizeValue(process) => {
                let (size, _path) = parse_size_line(line)?;
                self.current_method()?.get_mut(process).size_bytes = Some(size);
                self.expect = match process {
                    Process::Compress => Expect::Command(Process::Decompress),
                    Process::Decompress => {
                        self.check_round_trip_size(size);
                        Expect::Nothing
                    }
                };
            }
            _ => {}
        }
        Ok(())
    }

    fn begin_file(&mut self, rest: &str) -> Result<()> {
        self.abandon_method();
        let path = rest.trim();
        let stem = Path::new(path)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("no file name after {:?}", self.markers.begin))?
            .to_string();
        self.transcript.files.insert(stem.clone(), FileRecord::default());
        self.file = Some(stem);
        self.iteration = None;
        self.method = None;
        self.expect = Expect::Nothing;
        Ok(())
    }

    fn initial_size(&mut self, line: &str) -> Result<()> {
        let (size, path) = parse_size_line(line)?;
        let Some(file) = self.file.clone() else {
            bail!("initial size reported before any {:?} line", self.markers.begin);
        };
        let stem = Path::new(path).file_stem().and_then(|s| s.to_str());
        if stem != Some(file.as_str()) {
            self.warnings.push(Warning::InitialSizeName {
                file: file.clone(),
                path: path.to_string(),
                line: self.line_no,
            });
        }
        if let Some(record) = self.transcript.files.get_mut(&file) {
            record.size_bytes = Some(size);
        }
        Ok(())
    }

    fn begin_iteration(&mut self, rest: &str) -> Result<()> {
        self.abandon_method();
        let Some(file) = self.file.as_ref() else {
            bail!("iteration before any {:?} line", self.markers.begin);
        };
        let number: u32 = rest
            .trim()
            .parse()
            .with_context(|| format!("invalid iteration number {:?}", rest.trim()))?;
        if let Some(record) = self.transcript.files.get_mut(file) {
            record.iterations.insert(number, Iteration::new());
        }
        self.iteration = Some(number);
        self.method = None;
        self.expect = Expect::Nothing;
        Ok(())
    }

    fn begin_method(&mut self, line: &str) -> Result<()> {
        self.abandon_method();
        let name = line
            .trim_end_matches(':')
            .split_whitespace()
            .nth(1)
            .map(|s| s.trim_end_matches(':'))
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("no method name after {:?}", self.markers.method))?
            .to_string();
        let (Some(file), Some(iteration)) = (self.file.as_ref(), self.iteration) else {
            bail!("method {name:?} outside of an iteration");
        };
        if let Some(methods) = self
            .transcript
            .files
            .get_mut(file)
            .and_then(|record| record.iterations.get_mut(&iteration))
        {
            methods.insert(name.clone(), MethodRecord::default());
        }
        self.method = Some(name);
        self.expect = Expect::Command(Process::Compress);
        Ok(())
    }

    fn current_method(&mut self) -> Result<&mut MethodRecord> {
        let (Some(file), Some(iteration), Some(method)) =
            (self.file.as_ref(), self.iteration, self.method.as_ref())
        else {
            bail!("measurement outside of a method block");
        };
        self.transcript
            .files
            .get_mut(file)
            .and_then(|record| record.iterations.get_mut(&iteration))
            .and_then(|methods| methods.get_mut(method))
            .ok_or_else(|| anyhow::anyhow!("method block {method:?} not recorded"))
    }

    fn check_round_trip_size(&mut self, decompressed: u64) {
        let (Some(file), Some(iteration), Some(method)) =
            (self.file.as_ref(), self.iteration, self.method.as_ref())
        else {
            return;
        };
        let initial = self
            .transcript
            .files
            .get(file)
            .and_then(|record| record.size_bytes)
            .filter(|&initial| initial != decompressed);
        if let Some(initial) = initial {
            self.warnings.push(Warning::SizeMismatch {
                file: file.clone(),
                iteration,
                method: method.clone(),
                initial,
                decompressed,
                line: self.line_no,
            });
        }
    }

    /// Record an [`Warning::Incomplete`] if a method block is still open.
    fn abandon_method(&mut self) {
        if !self.expect.in_method_block() {
            return;
        }
        if let (Some(file), Some(iteration), Some(method)) =
            (self.file.as_ref(), self.iteration, self.method.as_ref())
        {
            self.warnings.push(Warning::Incomplete {
                file: file.clone(),
                iteration,
                method: method.clone(),
                missing: self.expect.describe(),
                line: self.line_no,
            });
        }
        self.expect = Expect::Nothing;
    }
}

/// Parse a `du --bytes` result line: `<bytes> <path>`.
fn parse_size_line(line: &str) -> Result<(u64, &str)> {
    let mut fields = line.split_whitespace();
    let size = fields.next().ok_or_else(|| anyhow::anyhow!("empty size line"))?;
    let size = size
        .parse()
        .with_context(|| format!("invalid byte count {size:?}"))?;
    Ok((size, fields.next().unwrap_or("")))
}

/// Parse a transcript held in memory.
pub fn parse_str(text: &str, markers: &Markers) -> Result<ParseOutcome> {
    markers.validate()?;
    let mut parser = TranscriptParser::new(markers.clone());
    for line in text.lines() {
        parser.feed_line(line)?;
    }
    Ok(parser.finish())
}

/// Stream a transcript file. Invalid UTF-8 is replaced lossily.
pub fn parse_file(path: &Path, markers: &Markers) -> Result<ParseOutcome> {
    if !path.is_file() {
        bail!("file does not exist: {}", path.display());
    }
    markers.validate()?;
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let reader = BufReader::new(file);

    let mut parser = TranscriptParser::new(markers.clone());
    for chunk in reader.split(b'\n') {
        let chunk = chunk.with_context(|| format!("reading {}", path.display()))?;
        parser
            .feed_line(&String::from_utf8_lossy(&chunk))
            .with_context(|| format!("parsing {}", path.display()))?;
    }
    Ok(parser.finish())
}

/// Parse a transcript with the default markers and optionally save it as JSON.
///
/// Warnings are printed to stderr. `fout`, when given, must end in `.json`;
/// this is checked before the input is read.
pub fn parse_compress(fin: &Path, fout: Option<&Path>) -> Result<Transcript> {
    if !fin.is_file() {
        bail!("file does not exist: {}", fin.display());
    }
    if let Some(fout) = fout {
        json::ensure_extension(fout, "json")?;
    }

    let outcome = parse_file(fin, &Markers::default())?;
    for warning in &outcome.warnings {
        eprintln!("Warning: {warning}");
    }

    if let Some(fout) = fout {
        json::write_json(&outcome.transcript, fout)?;
    }
    Ok(outcome.transcript)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLOCK: &str = "\
Begin processing: /data/SRR1.fastq
Intial .fastq size:
+ du --bytes /data/SRR1.fastq
10000 /data/SRR1.fastq
Iteration: 1
Testing gzip:
+ sudo time gzip /data/SRR1.fastq
1.10user 0.02system 0:01.23elapsed 91%CPU (0avgtext+0avgdata 1792maxresident)k
0inputs+8outputs (0major+95minor)pagefaults 0swaps
+ du --bytes /data/SRR1.fastq.gz
2500 /data/SRR1.fastq.gz
+ sudo time gzip -d /data/SRR1.fastq.gz
0.20user 0.01system 0:00.31elapsed ?%CPU (0avgtext+0avgdata 1600maxresident)k
0inputs+0outputs (0major+80minor)pagefaults 0swaps
+ du --bytes /data/SRR1.fastq
10000 /data/SRR1.fastq
";

    fn parse(text: &str) -> ParseOutcome {
        parse_str(text, &Markers::default()).unwrap()
    }

    #[test]
    fn parses_one_method_block() {
        let outcome = parse(BLOCK);
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);

        let file = &outcome.transcript.files["SRR1"];
        assert_eq!(file.size_bytes, Some(10_000));
        let gzip = &file.iterations[&1]["gzip"];

        assert_eq!(gzip.compress.command.as_deref(), Some("+ sudo time gzip /data/SRR1.fastq"));
        assert_eq!(gzip.compress.elapsed, Some(Duration::from_millis(1230)));
        assert_eq!(gzip.compress.cpu_pct, Some(91.0));
        assert_eq!(gzip.compress.user_secs, Some(1.10));
        assert_eq!(gzip.compress.max_resident_kb, Some(1792));
        assert_eq!(gzip.compress.size_bytes, Some(2500));

        assert_eq!(gzip.decompress.elapsed, Some(Duration::from_millis(310)));
        assert_eq!(gzip.decompress.cpu_pct, None);
        assert_eq!(gzip.decompress.size_bytes, Some(10_000));
    }

    #[test]
    fn size_mismatch_is_a_warning() {
        let text = BLOCK.strip_suffix("10000 /data/SRR1.fastq\n").unwrap().to_owned()
            + "9999 /data/SRR1.fastq\n";
        let outcome = parse(&text);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(matches!(
            &outcome.warnings[0],
            Warning::SizeMismatch { initial: 10_000, decompressed: 9999, .. }
        ));
        assert!(outcome.warnings[0].to_string().contains("does not match"));
    }

    #[test]
    fn truncated_block_is_reported_incomplete() {
        let text: String = BLOCK.lines().take(11).map(|l| format!("{l}\n")).collect();
        let outcome = parse(&text);
        let gzip = &outcome.transcript.files["SRR1"].iterations[&1]["gzip"];
        assert_eq!(gzip.compress.size_bytes, Some(2500));
        assert_eq!(gzip.decompress, crate::model::Measurement::default());
        assert!(matches!(
            &outcome.warnings[..],
            [Warning::Incomplete { missing: "the decompress command", .. }]
        ));
    }

    #[test]
    fn initial_size_for_other_file_warns() {
        let text = BLOCK.replacen("10000 /data/SRR1.fastq", "10000 /data/SRR2.fastq", 1);
        let outcome = parse(&text);
        assert!(matches!(
            &outcome.warnings[..],
            [Warning::InitialSizeName { path, .. }] if path == "/data/SRR2.fastq"
        ));
    }

    #[test]
    fn malformed_elapsed_aborts_with_line_number() {
        let text = BLOCK.replace("0:01.23elapsed", "1:2:3:4elapsed");
        let err = parse_str(&text, &Markers::default()).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("line 8"), "{msg}");
        assert!(msg.contains("2 or 3 fields"), "{msg}");
    }

    fn parse_err(text: &str) -> String {
        format!("{:#}", parse_str(text, &Markers::default()).unwrap_err())
    }

    #[test]
    fn iteration_without_file_is_an_error() {
        let msg = parse_err("Iteration: 1\n");
        assert!(msg.contains("line 1"), "{msg}");

        let msg = parse_err("Begin processing: a.fastq\nTesting gzip:\n");
        assert!(msg.contains("line 2"), "{msg}");
        assert!(msg.contains("outside of an iteration"), "{msg}");
    }

    #[test]
    fn malformed_byte_count_aborts_with_line_number() {
        let msg = parse_err(&BLOCK.replace("2500 /data/SRR1.fastq.gz", "2.5K /data/SRR1.fastq.gz"));
        assert!(msg.contains("line 11"), "{msg}");
        assert!(msg.contains("invalid byte count \"2.5K\""), "{msg}");

        let msg = parse_err(&BLOCK.replacen("10000 /data/SRR1.fastq", "ten /data/SRR1.fastq", 1));
        assert!(msg.contains("line 4"), "{msg}");
        assert!(msg.contains("invalid byte count"), "{msg}");
    }

    #[test]
    fn malformed_iteration_marker_aborts_with_line_number() {
        let msg = parse_err(&BLOCK.replace("Iteration: 1", "Iteration: x"));
        assert!(msg.contains("line 5"), "{msg}");
        assert!(msg.contains("invalid iteration number \"x\""), "{msg}");
    }

    #[test]
    fn initial_size_without_file_is_an_error() {
        let msg = parse_err("Intial .fastq size:\n+ du --bytes a.fastq\n10 a.fastq\n");
        assert!(msg.contains("line 3"), "{msg}");
        assert!(msg.contains("before any"), "{msg}");
    }

    #[test]
    fn crlf_and_invalid_utf8_file() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/crlf_latin1_transcript.txt");
        let outcome = parse_file(&path, &Markers::default()).unwrap();
        assert!(outcome.warnings.is_empty(), "{:?}", outcome.warnings);
        assert_eq!(outcome.lines, 15);

        let file = &outcome.transcript.files["SRR1"];
        assert_eq!(file.size_bytes, Some(10_000));
        let gzip = &file.iterations[&1]["gzip"];
        assert_eq!(gzip.compress.command.as_deref(), Some("+ sudo time gzip /data/SRR1.fastq"));
        assert_eq!(gzip.compress.size_bytes, Some(2500));
        assert_eq!(
            gzip.decompress.command.as_deref(),
            Some("+ sudo time gzip -d /data/SRR1.fastq.gz # caf\u{fffd}")
        );
        assert_eq!(gzip.decompress.elapsed, Some(Duration::from_millis(310)));
        assert_eq!(gzip.decompress.size_bytes, Some(10_000));
    }

    #[test]
    fn empty_markers_are_rejected() {
        let markers = Markers {
            method: String::new(),
            ..Markers::default()
        };
        let err = parse_str(BLOCK, &markers).unwrap_err();
        assert!(err.to_string().contains("`method`"), "{err}");
        assert!(Markers::default().validate().is_ok());
    }

    #[test]
    fn timing_line_fields() {
        let line = "0.50user 0.01system 1:02:03elapsed 100%CPU (0avgtext+0avgdata 42maxresident)k";
        let timing = parse_timing(line).unwrap();
        assert_eq!(timing.elapsed, Duration::from_secs(3723));
        assert_eq!(timing.cpu_pct, Some(100.0));
        assert_eq!(timing.system_secs, Some(0.01));
        assert_eq!(timing.max_resident_kb, Some(42));
        assert!(parse_timing("95%CPU only").is_err());
    }

    #[test]
    fn custom_markers() {
        let markers = Markers {
            timed_command: "+ /usr/bin/time".into(),
            ..Markers::default()
        };
        let text = BLOCK.replace("+ sudo time", "+ /usr/bin/time");
        let outcome = parse_str(&text, &markers).unwrap();
        let gzip = &outcome.transcript.files["SRR1"].iterations[&1]["gzip"];
        assert_eq!(gzip.decompress.size_bytes, Some(10_000));
        assert!(outcome.warnings.is_empty());
    }
}
