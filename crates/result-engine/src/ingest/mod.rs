//! Mark-sheet ingestion: raw rows in, one [`SubjectAggregate`] out.

mod normalizer;
mod reader;
pub mod record;

pub use normalizer::subject_label_from_file_name;
pub use record::{CellValue, MarkRecord, MarkSheet};

use crate::error::EngineError;
use crate::subjects::{SubjectAggregate, SubjectCode};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};

/// Marks at or above this value pass.
pub const DEFAULT_PASS_THRESHOLD: f64 = 35.0;

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("failed to read mark sheet: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("mark sheet has no header row")]
    MissingHeader,
    #[error(transparent)]
    Engine(#[from] EngineError),
}

struct Tally {
    mark_column: String,
    pass_count: u32,
    fail_count: u32,
    average_score: i64,
}

fn tally(rows: &[MarkRecord], pass_threshold: f64) -> Result<Tally, EngineError> {
    if !pass_threshold.is_finite() {
        return Err(EngineError::invalid("pass_threshold", "must be a finite number"));
    }
    let first_row = rows.first().ok_or(EngineError::EmptyDataSet)?;
    let mark_column = normalizer::resolve_mark_column(first_row)
        .ok_or_else(|| EngineError::invalid("rows", "first row has no columns"))?
        .to_string();
    debug!(%mark_column, rows = rows.len(), "resolved mark column");

    let mut pass_count = 0u32;
    let mut fail_count = 0u32;
    let mut sum = 0.0f64;

    for mark in rows
        .iter()
        .filter_map(|row| row.get(&mark_column).and_then(CellValue::as_number))
    {
        sum += mark;
        if mark >= pass_threshold {
            pass_count += 1;
        } else {
            fail_count += 1;
        }
    }

    let valid = pass_count + fail_count;
    let average_score = if valid == 0 {
        0
    } else {
        (sum / f64::from(valid)).round() as i64
    };

    Ok(Tally {
        mark_column,
        pass_count,
        fail_count,
        average_score,
    })
}

/// Aggregates one subject's rows.
///
/// The mark column is resolved once from the first row. Rows whose mark does not coerce to a
/// number count neither as pass nor fail and are left out of the average. An empty row set
/// yields [`EngineError::EmptyDataSet`]; rows without a single valid mark yield a zero aggregate.
pub fn parse_mark_sheet(
    rows: &[MarkRecord],
    subject_label: &str,
    code: SubjectCode,
    pass_threshold: f64,
) -> Result<SubjectAggregate, EngineError> {
    parse_with_column(rows, subject_label, code, pass_threshold).map(|(aggregate, _)| aggregate)
}

/// The label is stored verbatim; only an all-whitespace label is rejected.
fn parse_with_column(
    rows: &[MarkRecord],
    subject_label: &str,
    code: SubjectCode,
    pass_threshold: f64,
) -> Result<(SubjectAggregate, String), EngineError> {
    if subject_label.trim().is_empty() {
        return Err(EngineError::invalid("subject_label", "must not be empty"));
    }

    let tally = tally(rows, pass_threshold)?;
    let aggregate = SubjectAggregate {
        name: subject_label.to_string(),
        code,
        pass_count: tally.pass_count,
        fail_count: tally.fail_count,
        average_score: tally.average_score,
    };
    Ok((aggregate, tally.mark_column))
}

/// What a sheet upload produced, for the "processed N records" notice.
#[derive(Debug, Clone, Serialize)]
pub struct IngestSummary {
    pub aggregate: SubjectAggregate,
    pub mark_column: String,
    pub total_rows: usize,
    pub skipped_rows: usize,
    pub ingested_at: DateTime<Utc>,
}

/// Reads CSV mark sheets and aggregates them with a fixed pass threshold.
#[derive(Debug, Clone, Copy)]
pub struct MarkSheetImporter {
    pass_threshold: f64,
}

impl Default for MarkSheetImporter {
    fn default() -> Self {
        Self::new(DEFAULT_PASS_THRESHOLD)
    }
}

impl MarkSheetImporter {
    pub fn new(pass_threshold: f64) -> Self {
        Self { pass_threshold }
    }

    /// Uses the file name (without extension) as the subject label.
    pub fn from_path<P: AsRef<Path>>(
        &self,
        path: P,
        code: Option<SubjectCode>,
    ) -> Result<IngestSummary, IngestError> {
        let path = path.as_ref();
        let label = subject_label_from_file_name(&path.to_string_lossy());
        let file = std::fs::File::open(path)?;
        self.from_reader(file, &label, code)
    }

    pub fn from_reader<R: Read>(
        &self,
        reader: R,
        subject_label: &str,
        code: Option<SubjectCode>,
    ) -> Result<IngestSummary, IngestError> {
        let sheet = reader::read_sheet(reader)?;
        Ok(self.ingest_sheet(&sheet, subject_label, code)?)
    }

    pub fn ingest_sheet(
        &self,
        sheet: &MarkSheet,
        subject_label: &str,
        code: Option<SubjectCode>,
    ) -> Result<IngestSummary, EngineError> {
        let code = code.unwrap_or_else(SubjectCode::generate);
        let (aggregate, mark_column) =
            parse_with_column(&sheet.rows, subject_label, code, self.pass_threshold)?;

        let valid = aggregate.total() as usize;
        let skipped_rows = sheet.rows.len() - valid;
        if valid == 0 {
            warn!(
                subject = %aggregate.name,
                rows = sheet.rows.len(),
                "no numeric marks found in sheet"
            );
        } else if skipped_rows > 0 {
            warn!(
                subject = %aggregate.name,
                skipped_rows,
                "dropped rows without a numeric mark"
            );
        }

        Ok(IngestSummary {
            aggregate,
            mark_column,
            total_rows: sheet.rows.len(),
            skipped_rows,
            ingested_at: Utc::now(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn code() -> SubjectCode {
        SubjectCode("MA301".to_string())
    }

    fn row(roll: &str, marks: CellValue) -> MarkRecord {
        MarkRecord::new()
            .with("Roll", roll)
            .with("Name", "student")
            .with("Marks", marks)
    }

    #[test]
    fn counts_pass_fail_and_rounds_average() {
        let rows = vec![
            row("1", CellValue::Number(35.0)),
            row("2", CellValue::Number(34.0)),
            row("3", CellValue::Number(91.0)),
            row("4", CellValue::Number(12.0)),
        ];

        let aggregate = parse_mark_sheet(&rows, "Maths-III", code(), DEFAULT_PASS_THRESHOLD)
            .expect("aggregate");

        assert_eq!(aggregate.name, "Maths-III");
        assert_eq!(aggregate.pass_count, 2);
        assert_eq!(aggregate.fail_count, 2);
        // (35 + 34 + 91 + 12) / 4 = 43
        assert_eq!(aggregate.average_score, 43);
    }

    #[test]
    fn non_numeric_marks_are_dropped_not_failed() {
        let rows = vec![
            row("1", CellValue::Number(40.0)),
            row("2", CellValue::Blank),
            row("3", CellValue::Text("AB".to_string())),
            row("4", CellValue::Text("61".to_string())),
            row("5", CellValue::Number(30.0)),
        ];

        let aggregate =
            parse_mark_sheet(&rows, "COA", code(), DEFAULT_PASS_THRESHOLD).expect("aggregate");

        assert_eq!(aggregate.pass_count, 2);
        assert_eq!(aggregate.fail_count, 1);
        // (40 + 61 + 30) / 3 = 43.67
        assert_eq!(aggregate.average_score, 44);
    }

    #[test]
    fn valid_counts_match_coercible_rows() {
        let cells = [
            CellValue::Number(0.0),
            CellValue::Blank,
            CellValue::Text("12.5".to_string()),
            CellValue::Text("twelve".to_string()),
            CellValue::Number(f64::NAN),
            CellValue::Number(100.0),
            CellValue::Text("".to_string()),
        ];

        for len in 1..=cells.len() {
            let rows: Vec<MarkRecord> = cells
                .iter()
                .cycle()
                .skip(len)
                .take(len * 3)
                .enumerate()
                .map(|(index, cell)| row(&index.to_string(), cell.clone()))
                .collect();
            let expected = rows
                .iter()
                .filter(|row| row.get("Marks").and_then(CellValue::as_number).is_some())
                .count() as u32;

            let aggregate =
                parse_mark_sheet(&rows, "Physics", code(), DEFAULT_PASS_THRESHOLD).expect("ok");
            assert_eq!(aggregate.total(), expected);
        }
    }

    #[test]
    fn column_is_resolved_from_first_row_only() {
        let rows = vec![
            MarkRecord::new().with("Name", "a").with("Score", 50.0),
            MarkRecord::new().with("Name", "b").with("Marks", 90.0),
            MarkRecord::new().with("Score", 20.0),
        ];

        let aggregate =
            parse_mark_sheet(&rows, "DBMS", code(), DEFAULT_PASS_THRESHOLD).expect("aggregate");

        assert_eq!((aggregate.pass_count, aggregate.fail_count), (1, 1));
        assert_eq!(aggregate.average_score, 35);
    }

    #[test]
    fn falls_back_to_first_column_when_no_mark_header() {
        let rows = vec![
            MarkRecord::new().with("Result", 72.0).with("Name", "a"),
            MarkRecord::new().with("Result", 18.0).with("Name", "b"),
        ];

        let aggregate =
            parse_mark_sheet(&rows, "OS", code(), DEFAULT_PASS_THRESHOLD).expect("aggregate");
        assert_eq!((aggregate.pass_count, aggregate.fail_count), (1, 1));
        assert_eq!(aggregate.average_score, 45);
    }

    #[test]
    fn sheet_without_numeric_marks_yields_zero_aggregate() {
        let rows = vec![row("1", CellValue::Blank), row("2", "absent".into())];

        let aggregate =
            parse_mark_sheet(&rows, "COA", code(), DEFAULT_PASS_THRESHOLD).expect("aggregate");

        assert_eq!(
            (aggregate.pass_count, aggregate.fail_count, aggregate.average_score),
            (0, 0, 0)
        );
    }

    #[test]
    fn empty_row_set_is_reported() {
        assert_eq!(
            parse_mark_sheet(&[], "COA", code(), DEFAULT_PASS_THRESHOLD),
            Err(EngineError::EmptyDataSet)
        );
    }

    #[test]
    fn rejects_blank_subject_label() {
        let rows = vec![row("1", CellValue::Number(50.0))];
        match parse_mark_sheet(&rows, "  ", code(), DEFAULT_PASS_THRESHOLD) {
            Err(EngineError::InvalidInput { field, .. }) => assert_eq!(field, "subject_label"),
            other => panic!("expected invalid input, got {other:?}"),
        }
    }

    #[test]
    fn subject_label_is_stored_verbatim() {
        let rows = vec![row("1", CellValue::Number(50.0))];
        let aggregate =
            parse_mark_sheet(&rows, "Data  Structures", code(), DEFAULT_PASS_THRESHOLD)
                .expect("aggregate");
        assert_eq!(aggregate.name, "Data  Structures");
    }

    #[test]
    fn importer_and_parser_agree_on_aggregate() {
        let csv = "Roll,Marks\n1,72\n2,30\n3,AB\n";
        let summary = MarkSheetImporter::default()
            .from_reader(Cursor::new(csv), "Data  Structures", Some(code()))
            .expect("import succeeds");
        let rows = vec![
            row("1", CellValue::Number(72.0)),
            row("2", CellValue::Number(30.0)),
            row("3", CellValue::Text("AB".to_string())),
        ];
        let parsed =
            parse_mark_sheet(&rows, "Data  Structures", code(), DEFAULT_PASS_THRESHOLD)
                .expect("aggregate");

        assert_eq!(summary.aggregate, parsed);
        assert_eq!(summary.skipped_rows, 1);
    }

    #[test]
    fn importer_reads_csv_and_reports_skipped_rows() {
        let csv = "Roll,Name,Marks\n1,Asha,78\n2,Ravi,AB\n3,Meera,22\n4,Kiran,\n";
        let summary = MarkSheetImporter::default()
            .from_reader(Cursor::new(csv), "Maths-III", None)
            .expect("import succeeds");

        assert_eq!(summary.mark_column, "Marks");
        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.skipped_rows, 2);
        assert_eq!(summary.aggregate.pass_count, 1);
        assert_eq!(summary.aggregate.fail_count, 1);
        assert_eq!(summary.aggregate.average_score, 50);
        assert!(summary.aggregate.code.0.starts_with("NEW"));
    }

    #[test]
    fn importer_handles_short_rows_and_bom_headers() {
        let csv = "\u{feff}Student Score,Name\n55\n30,Ravi\n";
        let summary = MarkSheetImporter::new(40.0)
            .from_reader(Cursor::new(csv), "DBMS", Some(code()))
            .expect("import succeeds");

        assert_eq!(summary.mark_column, "Student Score");
        assert_eq!(summary.aggregate.code, code());
        assert_eq!(
            (summary.aggregate.pass_count, summary.aggregate.fail_count),
            (1, 1)
        );
    }

    #[test]
    fn importer_rejects_sheet_without_header() {
        let error = MarkSheetImporter::default()
            .from_reader(Cursor::new(""), "COA", None)
            .expect_err("missing header");
        assert!(matches!(error, IngestError::MissingHeader));
    }

    #[test]
    fn importer_reports_header_only_sheet_as_empty() {
        let error = MarkSheetImporter::default()
            .from_reader(Cursor::new("Roll,Marks\n"), "COA", None)
            .expect_err("no rows");
        assert!(matches!(error, IngestError::Engine(EngineError::EmptyDataSet)));
    }

    #[test]
    fn importer_from_path_propagates_io_errors() {
        let error = MarkSheetImporter::default()
            .from_path("./does-not-exist.csv", None)
            .expect_err("expected io error");

        match error {
            IngestError::Io(_) => {}
            other => panic!("expected io error, got {other:?}"),
        }
    }
}
