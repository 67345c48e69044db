use crate::{
    config::{Config, ErrorPolicy},
    error::{Error, Result},
    extract::extract_report,
    report::ReportRecord,
    resolver::Resolver,
    writer::{ReportTable, TableWriter},
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, instrument, warn};

/// Outcome of parsing a batch of report files.
#[derive(Debug, Clone, Default)]
pub struct Collected {
    /// Records in input order
    pub records: Vec<ReportRecord>,

    /// Files left out under [`ErrorPolicy::Skip`], with the reason
    pub skipped: Vec<(PathBuf, Error)>,
}

/// Parses every report in order, one record per file.
///
/// # Errors
///
/// With [`ErrorPolicy::Abort`], returns the first per-file error.
/// With [`ErrorPolicy::Skip`], returns [`Error::Multiple`] only if every
/// file failed.
pub fn collect(paths: &[PathBuf], policy: ErrorPolicy) -> Result<Collected> {
    let mut collected = Collected::default();

    for path in paths {
        match extract_report(path) {
            Ok(record) => collected.records.push(record),
            Err(e) if policy == ErrorPolicy::Skip => {
                warn!("Skipping {}: {}", path.display(), e);
                collected.skipped.push((path.clone(), e));
            }
            Err(e) => return Err(e),
        }
    }

    if collected.records.is_empty() && !collected.skipped.is_empty() {
        let errors = collected.skipped.into_iter().map(|(_, e)| e).collect();
        return Err(Error::multiple(errors));
    }

    Ok(collected)
}

/// Statistics collected during a run.
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Number of report files resolved
    pub files_resolved: usize,

    /// Number of rows written
    pub records_written: usize,

    /// Files left out of the table
    pub skipped_files: Vec<PathBuf>,

    /// Number of columns in the table
    pub columns: usize,

    /// Path of the written table
    pub output_file: PathBuf,

    /// Time spent parsing reports
    pub parse_duration: Duration,

    /// Total execution time
    pub duration: Duration,
}

impl RunStats {
    /// Prints a human-readable summary to stdout.
    pub fn print_summary(&self) {
        println!(
            "Parsed {} of {} trimming reports into {} ({} columns) in {:.2}s (parsing {:.2}s)",
            self.records_written,
            self.files_resolved,
            self.output_file.display(),
            self.columns,
            self.duration.as_secs_f64(),
            self.parse_duration.as_secs_f64()
        );
        for path in &self.skipped_files {
            println!("  skipped: {}", path.display());
        }
    }
}

/// Runs resolve, collect, and write for one configuration.
pub struct Pipeline {
    config: Config,
    resolver: Resolver,
    writer: TableWriter,
}

impl Pipeline {
    /// Creates a new pipeline with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration validation fails.
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;

        let resolver = Resolver::new(&config);
        let writer = TableWriter::new(&config);

        Ok(Self {
            config,
            resolver,
            writer,
        })
    }

    /// Executes the pipeline and returns statistics.
    ///
    /// The output file is only written once every report has been parsed
    /// (or skipped, under [`ErrorPolicy::Skip`]).
    ///
    /// # Errors
    ///
    /// Returns an error if no reports are resolved, if a report fails under
    /// [`ErrorPolicy::Abort`], or if the table cannot be written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use trim_reports::{Config, Pipeline};
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let config = Config::builder()
    ///     .output_file("cohort_trimming")
    ///     .build()?;
    ///
    /// let stats = Pipeline::new(config)?.run()?;
    /// stats.print_summary();
    /// # Ok(())
    /// # }
    /// ```
    #[instrument(skip(self), fields(output = %self.config.output_file.display()))]
    pub fn run(self) -> Result<RunStats> {
        let start_time = Instant::now();

        let paths = self.resolver.resolve()?;
        info!("Parsing {} trimming reports", paths.len());

        let parse_start = Instant::now();
        let collected = collect(&paths, self.config.error_policy)?;
        let parse_duration = parse_start.elapsed();

        if !collected.skipped.is_empty() {
            warn!(
                "{} of {} reports could not be parsed and were left out",
                collected.skipped.len(),
                paths.len()
            );
        }

        let skipped_files = collected.skipped.into_iter().map(|(p, _)| p).collect();
        let table = ReportTable::from_records(collected.records);
        self.writer.write(&table)?;

        Ok(RunStats {
            files_resolved: paths.len(),
            records_written: table.len(),
            skipped_files,
            columns: table.columns().len(),
            output_file: self.writer.output_file().to_path_buf(),
            parse_duration,
            duration: start_time.elapsed(),
        })
    }

    /// Returns the configured output path.
    #[must_use]
    pub fn output_file(&self) -> &Path {
        self.writer.output_file()
    }
}
