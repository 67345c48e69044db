//! Field extraction from trimming reports.
//!
//! Each line of a report is split once on `:` into a key and a value. Keys
//! found in [`RULES`] are stored in the record using the rule's transform;
//! every other line is ignored.

use crate::{
    error::{Error, Result},
    report::{Field, FieldValue, ReportRecord},
};
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, trace};

static LEADING_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^(]*)\(").expect("leading count pattern is valid"));

/// How a recognised value is turned into record fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    /// Store the trimmed value as text
    Text,
    /// Strip non-digits and store as a count
    Count,
    /// Parse the count before the parenthesis and derive a percentage
    /// of an earlier count
    CountWithShare {
        /// Derived percentage field
        percent: Field,
        /// Earlier count used as denominator
        of: Field,
    },
}

/// A recognised report key and what it produces.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    /// Label text before the `:`
    pub key: &'static str,
    /// Field the value is stored under
    pub field: Field,
    /// Value transform
    pub transform: Transform,
}

const fn rule(key: &'static str, field: Field, transform: Transform) -> Rule {
    Rule {
        key,
        field,
        transform,
    }
}

/// The recognised vocabulary of a trim_galore! report.
pub const RULES: &[Rule] = &[
    rule("Input filename", Field::FileName, Transform::Text),
    rule("Adapter sequence", Field::AdapterSequence, Transform::Text),
    rule("Quality Phred score cutoff", Field::QualityCutoff, Transform::Text),
    rule("Quality encoding type selected", Field::QualityType, Transform::Text),
    rule("Maximum trimming error rate", Field::MaxErrorRate, Transform::Text),
    rule(
        "Minimum required adapter overlap (stringency)",
        Field::MinimumOverlap,
        Transform::Text,
    ),
    rule(
        "Minimum required sequence length before a sequence gets removed",
        Field::MinKeepLength,
        Transform::Text,
    ),
    rule("Command line parameters", Field::CommandLine, Transform::Text),
    rule("Total reads processed", Field::ReadsProcessed, Transform::Count),
    rule(
        "Reads with adapters",
        Field::ReadsWithAdapters,
        Transform::CountWithShare {
            percent: Field::PercentWithAdapters,
            of: Field::ReadsProcessed,
        },
    ),
    rule(
        "Reads written (passing filters)",
        Field::ReadsPassingFilters,
        Transform::CountWithShare {
            percent: Field::PercentPassingFilters,
            of: Field::ReadsProcessed,
        },
    ),
    rule("Total basepairs processed", Field::BasesProcessed, Transform::Count),
    rule(
        "Quality-trimmed",
        Field::QualityTrimmedBases,
        Transform::CountWithShare {
            percent: Field::QualityTrimmedPercent,
            of: Field::BasesProcessed,
        },
    ),
    rule(
        "Total written (filtered)",
        Field::TotalKeptBases,
        Transform::CountWithShare {
            percent: Field::TotalKeptPercent,
            of: Field::BasesProcessed,
        },
    ),
];

/// Why a value did not have the expected shape.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShapeError {
    /// The value contained no digits at all.
    #[error("no digits found")]
    NoDigits,
    /// The count is too large for a 64-bit integer.
    #[error("count out of range")]
    Overflow,
    /// The value lacks the `<number> (<share>)` form.
    #[error("expected '<number> (<share>)'")]
    MissingParenthesis,
}

/// Parses a count by discarding every non-digit character.
///
/// `"1,000,000"` and `"  1000000 bp"` both give `1_000_000`.
///
/// # Errors
///
/// Returns [`ShapeError::NoDigits`] if the text holds no digit, or
/// [`ShapeError::Overflow`] if the number does not fit in a `u64`.
pub fn parse_count(text: &str) -> std::result::Result<u64, ShapeError> {
    let digits: String = text.chars().filter(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return Err(ShapeError::NoDigits);
    }
    digits.parse().map_err(|_| ShapeError::Overflow)
}

/// Parses the count in front of a parenthesised share, as in
/// `"250,000 (25.0%)"` or `"1,234 bp (0.1%)"`.
///
/// # Errors
///
/// Returns [`ShapeError::MissingParenthesis`] if there is no `(`, otherwise
/// the errors of [`parse_count`] for the leading part.
pub fn parse_leading_count(text: &str) -> std::result::Result<u64, ShapeError> {
    let leading = LEADING_COUNT
        .captures(text)
        .and_then(|caps| caps.get(1))
        .ok_or(ShapeError::MissingParenthesis)?;
    parse_count(leading.as_str())
}

/// Finds the rule for a report key.
#[must_use]
pub fn find_rule(key: &str) -> Option<&'static Rule> {
    let key = key.trim_end();
    RULES.iter().find(|r| r.key == key)
}

/// Extracts a record from a report file on disk.
///
/// # Errors
///
/// Returns an error naming the file if it cannot be opened or read, or if a
/// recognised line cannot be parsed.
pub fn extract_report(path: &Path) -> Result<ReportRecord> {
    let file = File::open(path).map_err(|e| Error::io(path, e))?;
    let reader = BufReader::new(file);

    let mut record = ReportRecord::new(path);
    for line in reader.lines() {
        let line = line.map_err(|e| Error::io(path, e))?;
        apply_line(&mut record, &line)?;
    }

    debug!(
        "Extracted {} fields from {}",
        record.len(),
        path.display()
    );
    Ok(record)
}

/// Extracts a record from already-read lines.
///
/// `path` is only used to label the record and any error.
///
/// # Errors
///
/// Returns an error if a recognised line cannot be parsed.
pub fn extract_lines<I, S>(path: &Path, lines: I) -> Result<ReportRecord>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut record = ReportRecord::new(path);
    for line in lines {
        apply_line(&mut record, line.as_ref())?;
    }
    Ok(record)
}

fn apply_line(record: &mut ReportRecord, line: &str) -> Result<()> {
    let Some((key, value)) = line.split_once(':') else {
        return Ok(());
    };
    let Some(rule) = find_rule(key) else {
        return Ok(());
    };

    let value = value.trim();
    trace!("{}: matched '{}'", record.source().display(), rule.key);

    match rule.transform {
        Transform::Text => {
            record.insert(rule.field, FieldValue::Text(value.to_string()));
        }
        Transform::Count => {
            let count = parse_count(value)
                .map_err(|_| Error::parse_shape(record.source(), rule.field, value))?;
            record.insert(rule.field, FieldValue::Count(count));
        }
        Transform::CountWithShare { percent, of } => {
            let count = parse_leading_count(value)
                .map_err(|_| Error::parse_shape(record.source(), rule.field, value))?;
            record.insert(rule.field, FieldValue::Count(count));

            let share = share_of(record, count, percent, of)?;
            record.insert(percent, FieldValue::Percent(share));
        }
    }

    Ok(())
}

#[allow(clippy::cast_precision_loss)]
fn share_of(record: &ReportRecord, count: u64, percent: Field, of: Field) -> Result<f64> {
    let total = record.count(of).ok_or_else(|| Error::MissingDependency {
        path: record.source().to_path_buf(),
        field: percent,
        requires: of,
    })?;

    if total == 0 {
        return Err(Error::ZeroDenominator {
            path: record.source().to_path_buf(),
            field: percent,
            requires: of,
        });
    }

    Ok(100.0 * count as f64 / total as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_fs::prelude::*;
    use std::path::PathBuf;

    const SAMPLE_REPORT: &str = "\
SUMMARISING RUN PARAMETERS
==========================
Input filename: sample1.fq
Trimming mode: single-end
Trim Galore version: 0.6.10
Cutadapt version: 4.4
Quality Phred score cutoff: 20
Quality encoding type selected: ASCII+33
Adapter sequence: 'AGATCGGAAGAGC' (Illumina TruSeq, Sanger iPCR; auto-detected)
Maximum trimming error rate: 0.1 (default)
Minimum required adapter overlap (stringency): 1 bp
Minimum required sequence length before a sequence gets removed: 20 bp
Command line parameters: -j 1 -e 0.1 -q 20 -O 1 -a AGATCGGAAGAGC sample1.fq

=== Summary ===

Total reads processed:               1,000,000
Reads with adapters:                   250,000 (25.0%)
Reads written (passing filters):       990,000 (99.0%)

Total basepairs processed:   100,000,000 bp
Quality-trimmed:                 400,000 bp (0.4%)
Total written (filtered):     98,000,000 bp (98.0%)
";

    fn path() -> PathBuf {
        PathBuf::from("sample1_trimming_report.txt")
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count("1,000,000"), Ok(1_000_000));
        assert_eq!(parse_count("  100,000,000 bp"), Ok(100_000_000));
        assert_eq!(parse_count("n/a"), Err(ShapeError::NoDigits));
        assert_eq!(
            parse_count("99999999999999999999999"),
            Err(ShapeError::Overflow)
        );
    }

    #[test]
    fn test_parse_leading_count() {
        assert_eq!(parse_leading_count("250,000 (25.0%)"), Ok(250_000));
        assert_eq!(parse_leading_count("400,000 bp (0.4%)"), Ok(400_000));
        assert_eq!(
            parse_leading_count("250,000"),
            Err(ShapeError::MissingParenthesis)
        );
        assert_eq!(parse_leading_count("(25.0%)"), Err(ShapeError::NoDigits));
    }

    #[test]
    fn test_find_rule() {
        assert_eq!(
            find_rule("Total reads processed").map(|r| r.field),
            Some(Field::ReadsProcessed)
        );
        assert!(find_rule("Trimming mode").is_none());
        assert!(find_rule("total reads processed").is_none());
    }

    #[test]
    fn test_every_rule_key_is_unique() {
        for (i, a) in RULES.iter().enumerate() {
            assert!(RULES[i + 1..].iter().all(|b| b.key != a.key), "{}", a.key);
        }
    }

    #[test]
    fn test_extract_minimal_example() {
        let lines = [
            "Input filename: sample1.fq",
            "Total reads processed: 1,000,000",
            "Reads with adapters: 250,000 (25.0%)",
        ];
        let record = extract_lines(&path(), lines).unwrap();

        assert_eq!(record.len(), 4);
        assert_eq!(
            record.get(Field::FileName),
            Some(&FieldValue::Text("sample1.fq".into()))
        );
        assert_eq!(record.count(Field::ReadsProcessed), Some(1_000_000));
        assert_eq!(record.count(Field::ReadsWithAdapters), Some(250_000));
        assert_eq!(
            record.get(Field::PercentWithAdapters),
            Some(&FieldValue::Percent(25.0))
        );
    }

    #[test]
    fn test_extract_full_report() {
        let record = extract_lines(&path(), SAMPLE_REPORT.lines()).unwrap();

        assert_eq!(record.len(), Field::ALL.len());
        assert_eq!(
            record.get(Field::AdapterSequence).and_then(FieldValue::as_text),
            Some("'AGATCGGAAGAGC' (Illumina TruSeq, Sanger iPCR; auto-detected)")
        );
        assert_eq!(
            record.get(Field::MinKeepLength).and_then(FieldValue::as_text),
            Some("20 bp")
        );
        assert_eq!(record.count(Field::BasesProcessed), Some(100_000_000));
        assert_eq!(record.count(Field::QualityTrimmedBases), Some(400_000));

        let kept = record
            .get(Field::TotalKeptPercent)
            .and_then(FieldValue::as_percent)
            .unwrap();
        assert!((kept - 98.0).abs() < 1e-9);

        let passing = record
            .get(Field::PercentPassingFilters)
            .and_then(FieldValue::as_percent)
            .unwrap();
        assert!((passing - 99.0).abs() < 1e-9);
    }

    #[test]
    fn test_value_keeps_text_after_first_colon() {
        let record = extract_lines(
            &path(),
            ["Command line parameters: -a AGATC --path C:/data"],
        )
        .unwrap();
        assert_eq!(
            record.get(Field::CommandLine).and_then(FieldValue::as_text),
            Some("-a AGATC --path C:/data")
        );
    }

    #[test]
    fn test_unrecognised_lines_yield_empty_record() {
        let lines = ["=== Summary ===", "", "Trimming mode: paired-end", "no colon here"];
        let record = extract_lines(&path(), lines).unwrap();
        assert!(record.is_empty());
    }

    #[test]
    fn test_duplicate_key_overwrites() {
        let lines = ["Input filename: a.fq", "Input filename: b.fq"];
        let record = extract_lines(&path(), lines).unwrap();
        assert_eq!(record.len(), 1);
        assert_eq!(
            record.get(Field::FileName).and_then(FieldValue::as_text),
            Some("b.fq")
        );
    }

    #[test]
    fn test_missing_parenthesis_is_shape_error() {
        let lines = ["Total reads processed: 100", "Reads with adapters: 25"];
        let err = extract_lines(&path(), lines).unwrap_err();
        match err {
            Error::ParseShape { path: p, field, value } => {
                assert_eq!(p, path());
                assert_eq!(field, Field::ReadsWithAdapters);
                assert_eq!(value, "25");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_denominator() {
        let lines = ["Reads with adapters: 250 (25.0%)"];
        let err = extract_lines(&path(), lines).unwrap_err();
        assert!(matches!(
            err,
            Error::MissingDependency {
                field: Field::PercentWithAdapters,
                requires: Field::ReadsProcessed,
                ..
            }
        ));
    }

    #[test]
    fn test_zero_denominator() {
        let lines = ["Total basepairs processed: 0 bp", "Quality-trimmed: 0 bp (0.0%)"];
        let err = extract_lines(&path(), lines).unwrap_err();
        assert!(matches!(
            err,
            Error::ZeroDenominator {
                field: Field::QualityTrimmedPercent,
                requires: Field::BasesProcessed,
                ..
            }
        ));
    }

    #[test]
    fn test_extract_report_from_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let file = temp.child("sample1_trimming_report.txt");
        file.write_str(&SAMPLE_REPORT.replace('\n', "\r\n")).unwrap();

        let record = extract_report(file.path()).unwrap();
        assert_eq!(record.source(), file.path());
        assert_eq!(
            record.get(Field::FileName).and_then(FieldValue::as_text),
            Some("sample1.fq")
        );
        assert_eq!(record.count(Field::ReadsPassingFilters), Some(990_000));
    }

    #[test]
    fn test_extract_report_missing_file() {
        let temp = assert_fs::TempDir::new().unwrap();
        let missing = temp.path().join("nope_trimming_report.txt");

        let err = extract_report(&missing).unwrap_err();
        assert!(err.is_io());
        assert_eq!(err.path(), Some(missing.as_path()));
    }
}
