use crate::error::{Error, Result};
use std::path::{Path, PathBuf};

/// Default name of the combined table.
pub const DEFAULT_OUTPUT_FILE: &str = "trim_galore_combined_report.csv";

/// File name pattern used when no report files are given.
pub const REPORT_FILE_PATTERN: &str = "*trimming_report.txt";

const OUTPUT_EXTENSION: &str = ".csv";

/// What to do when a single report cannot be read or parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorPolicy {
    /// Stop at the first bad report and write nothing
    #[default]
    Abort,
    /// Log the bad report, leave it out, and write the rest
    Skip,
}

/// Configuration for a trim-reports run.
///
/// Use [`Config::builder()`] to construct a new configuration.
#[derive(Debug, Clone)]
#[non_exhaustive]
pub struct Config {
    /// Report files given explicitly; empty means search `search_dir`
    pub report_files: Vec<PathBuf>,

    /// Directory searched for reports when none are given
    pub search_dir: PathBuf,

    /// Path of the combined CSV table (always ends in `.csv`)
    pub output_file: PathBuf,

    /// Handling of per-report failures
    pub error_policy: ErrorPolicy,
}

impl Config {
    /// Creates a new configuration builder.
    ///
    /// # Examples
    ///
    /// ```
    /// use trim_reports::Config;
    ///
    /// let config = Config::builder()
    ///     .report_files(["s1_trimming_report.txt", "s2_trimming_report.txt"])
    ///     .output_file("cohort")
    ///     .build()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.output_file.to_str(), Some("cohort.csv"));
    /// ```
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The output file name is empty
    /// - The output path is an existing directory
    pub fn validate(&self) -> Result<()> {
        if self.output_file.as_os_str().is_empty() {
            return Err(Error::config("output file name must not be empty"));
        }

        if self.output_file.is_dir() {
            return Err(Error::config(format!(
                "Output path is a directory: {}",
                self.output_file.display()
            )));
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_files: Vec::new(),
            search_dir: PathBuf::from("."),
            output_file: PathBuf::from(DEFAULT_OUTPUT_FILE),
            error_policy: ErrorPolicy::Abort,
        }
    }
}

/// Appends `.csv` to a path that does not already end in it.
///
/// ```
/// use std::path::Path;
/// use trim_reports::ensure_csv_extension;
///
/// assert_eq!(ensure_csv_extension("report"), Path::new("report.csv"));
/// assert_eq!(ensure_csv_extension("report.csv"), Path::new("report.csv"));
/// ```
#[must_use]
pub fn ensure_csv_extension(path: impl AsRef<Path>) -> PathBuf {
    let path = path.as_ref();
    if path.as_os_str().to_string_lossy().ends_with(OUTPUT_EXTENSION) {
        return path.to_path_buf();
    }

    let mut name = path.as_os_str().to_os_string();
    name.push(OUTPUT_EXTENSION);
    PathBuf::from(name)
}

/// Builder for creating a [`Config`].
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    report_files: Vec<PathBuf>,
    search_dir: Option<PathBuf>,
    output_file: Option<PathBuf>,
    error_policy: Option<ErrorPolicy>,
}

impl ConfigBuilder {
    /// Sets the report files to parse, in row order.
    #[must_use]
    pub fn report_files<I, P>(mut self, files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.report_files = files.into_iter().map(Into::into).collect();
        self
    }

    /// Sets the directory searched when no report files are given.
    #[must_use]
    pub fn search_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.search_dir = Some(path.into());
        self
    }

    /// Sets the output table path. `.csv` is appended if missing.
    #[must_use]
    pub fn output_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_file = Some(path.into());
        self
    }

    /// Sets the per-report error policy.
    #[must_use]
    pub fn error_policy(mut self, policy: ErrorPolicy) -> Self {
        self.error_policy = Some(policy);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if validation fails.
    pub fn build(self) -> Result<Config> {
        let output_file = self
            .output_file
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_FILE));

        let config = Config {
            report_files: self.report_files,
            search_dir: self.search_dir.unwrap_or_else(|| PathBuf::from(".")),
            output_file: if output_file.as_os_str().is_empty() {
                output_file
            } else {
                ensure_csv_extension(output_file)
            },
            error_policy: self.error_policy.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}
