//! Analysis of FASTQ compression benchmark transcripts.
//!
//! Parses the terminal output captured from `bench_compress.sh` into a
//! nested structure (file → iteration → method → process), reshapes it
//! into a long-format table, reduces it to summary statistics, and
//! renders terminal tables and SVG bar charts.
//!
//! Pipeline: read lines → [`transcript`] scanner → [`model::Transcript`] →
//!           [`table::flatten`] → [`summary::summarize`] / [`table::pivot`] →
//!           [`output`] / [`chart`].

pub mod chart;
pub mod elapsed;
pub mod json;
pub mod model;
pub mod output;
pub mod summary;
pub mod table;
pub mod transcript;

pub use elapsed::parse_elapsed;
pub use model::{FileRecord, Iteration, Measurement, MethodRecord, Process, Transcript};
pub use transcript::{Markers, ParseOutcome, Warning, parse_compress, parse_file, parse_str};
