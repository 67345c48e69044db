//! # trim-reports
//!
//! Collects the per-file summaries written by trim_galore! into one CSV table.
//!
//! ## Quick Start
//!
//! ```no_run
//! use trim_reports::{Config, Pipeline};
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = Config::builder()
//!     .report_files(["s1.fq_trimming_report.txt", "s2.fq_trimming_report.txt"])
//!     .output_file("combined")
//!     .build()?;
//!
//! Pipeline::new(config)?.run()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! 1. **Resolver**: takes the given report files, or finds `*trimming_report.txt`
//! 2. **Extractor**: turns each report into a [`ReportRecord`]
//! 3. **Collector**: parses the batch in order under an [`ErrorPolicy`]
//! 4. **Writer**: lays the records out as a [`ReportTable`] and writes CSV

#![warn(
    missing_docs,
    rust_2018_idioms,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery
)]
#![allow(clippy::module_name_repetitions)]

mod config;
mod error;
mod pipeline;
mod resolver;
mod writer;

pub mod extract;
pub mod report;

pub use config::{
    ensure_csv_extension, Config, ConfigBuilder, ErrorPolicy, DEFAULT_OUTPUT_FILE,
    REPORT_FILE_PATTERN,
};
pub use error::{Error, Result};
pub use extract::{extract_report, ShapeError};
pub use pipeline::{collect, Collected, Pipeline, RunStats};
pub use report::{Field, FieldValue, ReportRecord};
pub use resolver::find_reports;
pub use writer::{render_csv, ReportTable};

/// Runs the complete resolve, parse, and write sequence.
///
/// # Errors
///
/// Returns an error if:
/// - Configuration is invalid
/// - No report files are given or found
/// - A report cannot be read or parsed (under [`ErrorPolicy::Abort`])
/// - The output table cannot be written
pub fn run(config: Config) -> Result<RunStats> {
    Pipeline::new(config)?.run()
}
