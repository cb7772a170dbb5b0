//! Read-only semester history supplied by the host.

mod grading;

pub use grading::{GradingRule, GradingTable, ResultStatus};

use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Marks for one subject as recorded by the examination branch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectMarks {
    pub name: String,
    pub code: String,
    pub internal: f64,
    pub external: f64,
    pub total: f64,
    pub credits: u8,
    pub grade: String,
}

/// Raw semester entry before grading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterRecord {
    pub sgpa: f64,
    pub credits: u16,
    #[serde(default)]
    pub subjects: Vec<SubjectMarks>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectResult {
    pub name: String,
    pub code: String,
    pub internal: f64,
    pub external: f64,
    pub total: f64,
    pub credits: u8,
    pub grade: String,
    pub status: ResultStatus,
}

impl SubjectResult {
    fn graded(marks: SubjectMarks, table: &GradingTable) -> Self {
        let status = table.status_for(&marks);
        let SubjectMarks {
            name,
            code,
            internal,
            external,
            total,
            credits,
            grade,
        } = marks;

        Self {
            name,
            code,
            internal,
            external,
            total,
            credits,
            grade,
            status,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SemesterTranscript {
    pub sgpa: f64,
    pub credits: u16,
    pub subjects: Vec<SubjectResult>,
}

impl SemesterTranscript {
    pub fn has_backlog(&self) -> bool {
        self.subjects
            .iter()
            .any(|subject| subject.status == ResultStatus::Fail)
    }

    pub fn backlogs(&self) -> impl Iterator<Item = &SubjectResult> {
        self.subjects
            .iter()
            .filter(|subject| subject.status == ResultStatus::Fail)
    }
}

/// Lookup of historical semester results. Implementations never mutate their data.
pub trait TranscriptStore: Send + Sync {
    fn semester(&self, index: u8) -> Result<SemesterTranscript, EngineError>;
    /// Known semester indices in ascending order.
    fn semesters(&self) -> Vec<u8>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryTranscriptStore {
    semesters: BTreeMap<u8, SemesterTranscript>,
}

impl InMemoryTranscriptStore {
    /// Grades every subject against `table`; any status carried by the source is ignored.
    pub fn new(records: BTreeMap<u8, SemesterRecord>, table: &GradingTable) -> Self {
        let semesters = records
            .into_iter()
            .map(|(index, record)| {
                let subjects = record
                    .subjects
                    .into_iter()
                    .map(|marks| SubjectResult::graded(marks, table))
                    .collect();
                (
                    index,
                    SemesterTranscript {
                        sgpa: record.sgpa,
                        credits: record.credits,
                        subjects,
                    },
                )
            })
            .collect();

        Self { semesters }
    }
}

impl TranscriptStore for InMemoryTranscriptStore {
    fn semester(&self, index: u8) -> Result<SemesterTranscript, EngineError> {
        self.semesters
            .get(&index)
            .cloned()
            .ok_or(EngineError::MissingSemester(index))
    }

    fn semesters(&self) -> Vec<u8> {
        self.semesters.keys().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn marks(code: &str, internal: f64, external: f64) -> SubjectMarks {
        SubjectMarks {
            name: format!("Subject {code}"),
            code: code.to_string(),
            internal,
            external,
            total: internal + external,
            credits: 4,
            grade: "B".to_string(),
        }
    }

    fn store() -> InMemoryTranscriptStore {
        let mut records = BTreeMap::new();
        records.insert(
            3,
            SemesterRecord {
                sgpa: 6.8,
                credits: 24,
                subjects: vec![marks("MAT301", 12.0, 15.0), marks("CS302", 32.0, 40.0)],
            },
        );
        records.insert(
            1,
            SemesterRecord {
                sgpa: 7.2,
                credits: 20,
                subjects: vec![marks("MAT101", 35.0, 45.0)],
            },
        );
        InMemoryTranscriptStore::new(records, &GradingTable::default())
    }

    #[test]
    fn status_is_derived_from_grading_table() {
        let semester = store().semester(3).expect("semester present");
        assert_eq!(semester.subjects[0].status, ResultStatus::Fail);
        assert_eq!(semester.subjects[1].status, ResultStatus::Pass);
        assert!(semester.has_backlog());
        assert_eq!(
            semester.backlogs().map(|s| s.code.as_str()).collect::<Vec<_>>(),
            vec!["MAT301"]
        );
    }

    #[test]
    fn external_floor_fails_even_with_passing_total() {
        let table = GradingTable::default();
        assert_eq!(table.status_for(&marks("X", 38.0, 20.0)), ResultStatus::Fail);
        assert_eq!(table.status_for(&marks("X", 19.0, 21.0)), ResultStatus::Pass);
    }

    #[test]
    fn internal_rule_is_honoured_when_configured() {
        let table = GradingTable {
            rules: vec![GradingRule::MinInternal(16.0)],
        };
        assert_eq!(table.status_for(&marks("X", 15.0, 60.0)), ResultStatus::Fail);
        assert_eq!(table.status_for(&marks("X", 16.0, 0.0)), ResultStatus::Pass);
    }

    #[test]
    fn unknown_semester_is_reported() {
        assert_eq!(store().semester(7), Err(EngineError::MissingSemester(7)));
    }

    #[test]
    fn semesters_are_listed_in_ascending_order() {
        assert_eq!(store().semesters(), vec![1, 3]);
    }

    #[test]
    fn grading_table_reads_compact_json() {
        let table: GradingTable =
            serde_json::from_str(r#"[{"min_total": 40}, {"min_external": 24}]"#).expect("table");
        assert_eq!(
            table.rules,
            vec![GradingRule::MinTotal(40.0), GradingRule::MinExternal(24.0)]
        );
        assert_eq!(ResultStatus::Fail.label(), "FAIL");
    }
}
