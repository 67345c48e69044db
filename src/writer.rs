use crate::{
    config::Config,
    error::{Error, Result},
    report::{Field, FieldValue, ReportRecord},
};
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Records laid out as rows under a shared set of columns.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportTable {
    columns: Vec<Field>,
    records: Vec<ReportRecord>,
}

impl ReportTable {
    /// Builds a table whose columns are every field seen in any record,
    /// in first-seen order.
    #[must_use]
    pub fn from_records(records: Vec<ReportRecord>) -> Self {
        let mut columns: Vec<Field> = Vec::new();
        for record in &records {
            for (field, _) in record.fields() {
                if !columns.contains(&field) {
                    columns.push(field);
                }
            }
        }

        Self { columns, records }
    }

    /// Column order of the table.
    #[must_use]
    pub fn columns(&self) -> &[Field] {
        &self.columns
    }

    /// Iterates rows; absent fields are `None`.
    pub fn rows(&self) -> impl Iterator<Item = Vec<Option<&FieldValue>>> {
        self.records
            .iter()
            .map(|record| self.columns.iter().map(|&c| record.get(c)).collect())
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Writes a [`ReportTable`] as CSV.
pub(crate) struct TableWriter {
    output_file: PathBuf,
}

impl TableWriter {
    /// Creates a new writer from configuration.
    pub(crate) fn new(config: &Config) -> Self {
        Self {
            output_file: config.output_file.clone(),
        }
    }

    /// Path the table is written to.
    pub(crate) fn output_file(&self) -> &Path {
        &self.output_file
    }

    /// Writes the table to the output file.
    ///
    /// The table is rendered to a temporary file next to the target and
    /// renamed into place, so a failure leaves no partial output.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The parent directory cannot be created
    /// - CSV serialization fails
    /// - File write operations fail
    pub(crate) fn write(&self, table: &ReportTable) -> Result<()> {
        if let Some(parent) = self.output_file.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
            }
        }

        let content = render_csv(table).map_err(|e| Error::csv(&self.output_file, e))?;
        self.write_file_atomic(&content)?;

        info!(
            "Wrote {} rows x {} columns to {}",
            table.len(),
            table.columns().len(),
            self.output_file.display()
        );
        Ok(())
    }

    fn write_file_atomic(&self, content: &[u8]) -> Result<()> {
        let temp_path = temp_path_for(&self.output_file);
        let mut temp_file =
            fs::File::create(&temp_path).map_err(|e| Error::io(&temp_path, e))?;

        let written = temp_file
            .write_all(content)
            .and_then(|()| temp_file.sync_all());
        drop(temp_file);

        if let Err(e) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::io(&temp_path, e));
        }

        fs::rename(&temp_path, &self.output_file).map_err(|e| {
            let _ = fs::remove_file(&temp_path);
            Error::io(&self.output_file, e)
        })?;

        debug!("Renamed {} into place", temp_path.display());
        Ok(())
    }
}

/// Renders a table as CSV bytes: a header row, then one row per record.
///
/// A table without columns renders as bare line breaks, since the csv
/// writer would quote an empty record as `""`.
///
/// # Errors
///
/// Returns an error if the CSV writer fails.
pub fn render_csv(table: &ReportTable) -> std::result::Result<Vec<u8>, csv::Error> {
    if table.columns().is_empty() {
        return Ok(b"\n".repeat(table.len() + 1));
    }

    let mut wtr = csv::Writer::from_writer(Vec::new());

    wtr.write_record(table.columns().iter().map(|c| c.column()))?;
    for row in table.rows() {
        wtr.write_record(
            row.into_iter()
                .map(|cell| cell.map_or_else(String::new, ToString::to_string)),
        )?;
    }

    wtr.into_inner().map_err(|e| csv::Error::from(e.into_error()))
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(".tmp");
    PathBuf::from(name)
}
