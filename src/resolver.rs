use crate::{
    config::{Config, REPORT_FILE_PATTERN},
    error::{Error, Result},
};
use globset::{Glob, GlobMatcher};
use once_cell::sync::Lazy;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, trace};

static REPORT_MATCHER: Lazy<GlobMatcher> = Lazy::new(|| {
    Glob::new(REPORT_FILE_PATTERN)
        .expect("report file pattern is a valid glob")
        .compile_matcher()
});

/// Decides which report files a run will parse.
pub(crate) struct Resolver {
    report_files: Vec<PathBuf>,
    search_dir: PathBuf,
}

impl Resolver {
    /// Creates a new resolver from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            report_files: config.report_files.clone(),
            search_dir: config.search_dir.clone(),
        }
    }

    /// Returns the report files to parse, in row order.
    ///
    /// Explicit files are returned as given, without checking they exist.
    /// Otherwise the search directory is listed for `*trimming_report.txt`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The search directory cannot be listed
    /// - No report files are given or found
    pub(crate) fn resolve(&self) -> Result<Vec<PathBuf>> {
        if !self.report_files.is_empty() {
            debug!("Using {} report files from arguments", self.report_files.len());
            return Ok(self.report_files.clone());
        }

        let found = find_reports(&self.search_dir)?;
        if found.is_empty() {
            return Err(Error::no_reports(&self.search_dir));
        }

        info!(
            "No report files specified; parsing {} files ending in 'trimming_report.txt' from {}",
            found.len(),
            self.search_dir.display()
        );
        Ok(found)
    }
}

/// Lists report files directly inside `dir`, sorted by name.
///
/// # Errors
///
/// Returns an error if the directory cannot be read.
pub fn find_reports(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut found = Vec::new();

    for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
        let entry = entry.map_err(|e| Error::io(dir, e))?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }

        // Dotfiles such as AppleDouble `._*` sidecars are not reports
        let name = entry.file_name();
        if name.to_string_lossy().starts_with('.') {
            continue;
        }

        if REPORT_MATCHER.is_match(&name) {
            trace!("Found report: {}", path.display());
            found.push(path);
        }
    }

    found.sort();
    Ok(found)
}
