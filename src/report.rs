//! Report record data model.
//!
//! A [`ReportRecord`] holds the fields extracted from one trimming report,
//! in the order they were found.

use std::fmt;
use std::path::{Path, PathBuf};

/// A column of the combined report table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    /// Name of the trimmed FASTQ file
    FileName,
    /// Adapter sequence used for trimming
    AdapterSequence,
    /// Quality Phred score cutoff
    QualityCutoff,
    /// Quality encoding type
    QualityType,
    /// Maximum trimming error rate
    MaxErrorRate,
    /// Minimum required adapter overlap
    MinimumOverlap,
    /// Minimum sequence length kept
    MinKeepLength,
    /// Command line parameters passed to the trimmer
    CommandLine,
    /// Total reads processed
    ReadsProcessed,
    /// Reads containing adapter sequence
    ReadsWithAdapters,
    /// Share of reads with adapters, in percent
    PercentWithAdapters,
    /// Reads written after filtering
    ReadsPassingFilters,
    /// Share of reads passing filters, in percent
    PercentPassingFilters,
    /// Total basepairs processed
    BasesProcessed,
    /// Basepairs removed by quality trimming
    QualityTrimmedBases,
    /// Share of quality-trimmed basepairs, in percent
    QualityTrimmedPercent,
    /// Basepairs written after filtering
    TotalKeptBases,
    /// Share of kept basepairs, in percent
    TotalKeptPercent,
}

impl Field {
    /// Every field, in canonical column order.
    pub const ALL: [Self; 18] = [
        Self::FileName,
        Self::AdapterSequence,
        Self::QualityCutoff,
        Self::QualityType,
        Self::MaxErrorRate,
        Self::MinimumOverlap,
        Self::MinKeepLength,
        Self::CommandLine,
        Self::ReadsProcessed,
        Self::ReadsWithAdapters,
        Self::PercentWithAdapters,
        Self::ReadsPassingFilters,
        Self::PercentPassingFilters,
        Self::BasesProcessed,
        Self::QualityTrimmedBases,
        Self::QualityTrimmedPercent,
        Self::TotalKeptBases,
        Self::TotalKeptPercent,
    ];

    /// Returns the column name used in the output table.
    #[must_use]
    pub const fn column(self) -> &'static str {
        match self {
            Self::FileName => "file_name",
            Self::AdapterSequence => "adapter_sequence",
            Self::QualityCutoff => "quality_cutoff",
            Self::QualityType => "quality_type",
            Self::MaxErrorRate => "max_error_rate",
            Self::MinimumOverlap => "minimum_overlap",
            Self::MinKeepLength => "min_keep_length",
            Self::CommandLine => "command_line",
            Self::ReadsProcessed => "reads_processed",
            Self::ReadsWithAdapters => "reads_with_adapters",
            Self::PercentWithAdapters => "percent_with_adapters",
            Self::ReadsPassingFilters => "reads_passing_filters",
            Self::PercentPassingFilters => "percent_passing_filters",
            Self::BasesProcessed => "bases_processed",
            Self::QualityTrimmedBases => "quality_trimmed_bases",
            Self::QualityTrimmedPercent => "quality_trimmed_percent",
            Self::TotalKeptBases => "total_kept_bases",
            Self::TotalKeptPercent => "total_kept_percent",
        }
    }

    /// Looks up a field by its column name.
    #[must_use]
    pub fn from_column(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.column() == name)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// A single extracted value.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    /// Trimmed text, stored as found
    Text(String),
    /// Integer count with separators removed
    Count(u64),
    /// Derived percentage (count / total * 100)
    Percent(f64),
}

impl FieldValue {
    /// Returns the count if this is a count value.
    #[must_use]
    pub const fn as_count(&self) -> Option<u64> {
        match self {
            Self::Count(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the percentage if this is a derived value.
    #[must_use]
    pub const fn as_percent(&self) -> Option<f64> {
        match self {
            Self::Percent(p) => Some(*p),
            _ => None,
        }
    }

    /// Returns the text if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.write_str(s),
            Self::Count(n) => write!(f, "{n}"),
            // Whole percentages keep a trailing ".0" so the column reads as floating point
            Self::Percent(p) if p.is_finite() && p.fract() == 0.0 => write!(f, "{p:.1}"),
            Self::Percent(p) => write!(f, "{p}"),
        }
    }
}

/// Fields extracted from one trimming report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRecord {
    source: PathBuf,
    fields: Vec<(Field, FieldValue)>,
}

impl ReportRecord {
    /// Creates an empty record for the given report file.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            fields: Vec::new(),
        }
    }

    /// Stores a value, replacing any earlier value of the same field.
    ///
    /// A replaced field keeps the position it was first inserted at.
    pub fn insert(&mut self, field: Field, value: FieldValue) {
        match self.fields.iter_mut().find(|(f, _)| *f == field) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((field, value)),
        }
    }

    /// Returns the value of a field, if present.
    #[must_use]
    pub fn get(&self, field: Field) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, v)| v)
    }

    /// Returns the value of a count field, if present.
    #[must_use]
    pub fn count(&self, field: Field) -> Option<u64> {
        self.get(field).and_then(FieldValue::as_count)
    }

    /// Returns true if the field was found in the report.
    #[must_use]
    pub fn contains(&self, field: Field) -> bool {
        self.get(field).is_some()
    }

    /// Iterates fields in the order they were found.
    pub fn fields(&self) -> impl Iterator<Item = (Field, &FieldValue)> {
        self.fields.iter().map(|(f, v)| (*f, v))
    }

    /// Number of populated fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns true if no recognised line was found.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Returns the report file path.
    #[must_use]
    pub fn source(&self) -> &Path {
        &self.source
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_lookup() {
        for field in Field::ALL {
            assert_eq!(Field::from_column(field.column()), Some(field));
        }
        assert_eq!(Field::from_column("not_a_column"), None);
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(FieldValue::Percent(25.0).to_string(), "25.0");
        assert_eq!(FieldValue::Percent(12.5).to_string(), "12.5");
        assert_eq!(FieldValue::Count(1_000_000).to_string(), "1000000");
        assert_eq!(FieldValue::Text("AGATCGGAAGAGC".into()).to_string(), "AGATCGGAAGAGC");
    }

    #[test]
    fn test_insert_overwrites_in_place() {
        let mut record = ReportRecord::new("r.txt");
        record.insert(Field::FileName, FieldValue::Text("a.fq".into()));
        record.insert(Field::ReadsProcessed, FieldValue::Count(10));
        record.insert(Field::FileName, FieldValue::Text("b.fq".into()));

        assert_eq!(record.len(), 2);
        let order: Vec<_> = record.fields().map(|(f, _)| f).collect();
        assert_eq!(order, vec![Field::FileName, Field::ReadsProcessed]);
        assert_eq!(
            record.get(Field::FileName).and_then(FieldValue::as_text),
            Some("b.fq")
        );
    }

    #[test]
    fn test_count_accessor() {
        let mut record = ReportRecord::new("r.txt");
        record.insert(Field::BasesProcessed, FieldValue::Count(42));
        record.insert(Field::QualityType, FieldValue::Text("sanger".into()));

        assert_eq!(record.count(Field::BasesProcessed), Some(42));
        assert_eq!(record.count(Field::QualityType), None);
        assert!(!record.contains(Field::ReadsProcessed));
    }

    #[test]
    fn test_empty_record() {
        let record = ReportRecord::new("empty.txt");
        assert!(record.is_empty());
        assert_eq!(record.source(), Path::new("empty.txt"));
    }
}
