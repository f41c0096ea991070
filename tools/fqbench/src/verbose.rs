//! Console reporting for fqbench.
//!
//! `-q` keeps result tables, warnings and errors. The default level adds
//! progress lines, and `-v` adds phase timings and scan counts.

use std::fmt::Display;
use std::sync::atomic::{AtomicU8, AtomicUsize, Ordering};
use std::time::{Duration, Instant};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Verbosity {
    Quiet = 0,
    Default = 1,
    Verbose = 2,
}

/// Global verbosity level, set once at startup.
static VERBOSITY: AtomicU8 = AtomicU8::new(Verbosity::Default as u8);

/// Warnings printed so far.
static WARNINGS: AtomicUsize = AtomicUsize::new(0);

/// Set the verbosity level from the `-q` / `-v` flags.
pub fn init(quiet: bool, verbose: bool) {
    let level = if quiet {
        Verbosity::Quiet
    } else if verbose {
        Verbosity::Verbose
    } else {
        Verbosity::Default
    };
    VERBOSITY.store(level as u8, Ordering::Relaxed);
}

/// Returns `true` if output at `level` should be printed.
pub fn shows(level: Verbosity) -> bool {
    VERBOSITY.load(Ordering::Relaxed) >= level as u8
}

/// Print a message only in verbose mode.
macro_rules! vprintln {
    ($($arg:tt)*) => {
        if $crate::verbose::shows($crate::verbose::Verbosity::Verbose) {
            println!($($arg)*);
        }
    };
}

pub(crate) use vprintln;

/// Print a progress message unless quiet.
macro_rules! dprintln {
    ($($arg:tt)*) => {
        if $crate::verbose::shows($crate::verbose::Verbosity::Default) {
            println!($($arg)*);
        }
    };
}

pub(crate) use dprintln;

/// Print a warning to stderr. Warnings ignore the verbosity level.
pub fn warn(message: impl Display) {
    WARNINGS.fetch_add(1, Ordering::Relaxed);
    eprintln!("Warning: {message}");
}

/// Number of warnings printed by [`warn`].
pub fn warning_count() -> usize {
    WARNINGS.load(Ordering::Relaxed)
}

/// Times one pipeline phase and reports it on drop in verbose mode.
///
/// ```ignore
/// let mut phase = Phase::start("transcript scan");
/// let outcome = parse_file(path, &markers)?;
/// phase.count(outcome.lines, "lines");
/// // prints "  transcript scan: 3.1ms (2048 lines, 660645 lines/s)" on drop
/// ```
pub struct Phase {
    label: &'static str,
    start: Instant,
    count: Option<(usize, &'static str)>,
}

impl Phase {
    /// Begin timing a labeled phase.
    pub fn start(label: &'static str) -> Self {
        Self {
            label,
            start: Instant::now(),
            count: None,
        }
    }

    /// Attach the number of items the phase processed.
    pub fn count(&mut self, items: usize, unit: &'static str) {
        self.count = Some((items, unit));
    }
}

impl Drop for Phase {
    fn drop(&mut self) {
        if shows(Verbosity::Verbose) {
            println!("{}", phase_line(self.label, self.start.elapsed(), self.count));
        }
    }
}

fn phase_line(label: &str, elapsed: Duration, count: Option<(usize, &str)>) -> String {
    match count {
        Some((items, unit)) if elapsed > Duration::ZERO => {
            let rate = items as f64 / elapsed.as_secs_f64();
            format!("  {label}: {elapsed:.1?} ({items} {unit}, {rate:.0} {unit}/s)")
        }
        Some((items, unit)) => format!("  {label}: {elapsed:.1?} ({items} {unit})"),
        None => format!("  {label}: {elapsed:.1?}"),
    }
}
