use super::ConfigError;
use crate::eligibility::CompanyRule;
use crate::ingest::DEFAULT_PASS_THRESHOLD;
use crate::planner::{SurvivalRules, DEFAULT_GRADE_SCALE_MAX, DEFAULT_PROGRAM_LENGTH};
use crate::subjects::{
    FacultyScope, SubjectAggregate, SubjectCode, SubjectScope, DEFAULT_CRITICAL_THRESHOLD,
};
use crate::transcript::{GradingTable, InMemoryTranscriptStore, SemesterRecord, SubjectMarks};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Thresholds injected into the engine components.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub pass_threshold: f64,
    pub critical_threshold: f64,
    pub program_length: u8,
    pub grade_scale_max: f64,
    pub survival: SurvivalRules,
    pub grading_table: GradingTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            pass_threshold: DEFAULT_PASS_THRESHOLD,
            critical_threshold: DEFAULT_CRITICAL_THRESHOLD,
            program_length: DEFAULT_PROGRAM_LENGTH,
            grade_scale_max: DEFAULT_GRADE_SCALE_MAX,
            survival: SurvivalRules::default(),
            grading_table: GradingTable::default(),
        }
    }
}

/// Reference data supplied by the host: recruiter rules, transcript history,
/// seed subject aggregates and faculty subject scopes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Fixtures {
    pub engine: EngineConfig,
    pub companies: Vec<CompanyRule>,
    pub transcript: BTreeMap<u8, SemesterRecord>,
    pub subjects: Vec<SubjectAggregate>,
    pub faculty: Vec<FacultyScope>,
}

impl Fixtures {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::FixtureIo {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&raw).map_err(|source| ConfigError::FixtureFormat {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn transcript_store(&self) -> InMemoryTranscriptStore {
        InMemoryTranscriptStore::new(self.transcript.clone(), &self.engine.grading_table)
    }

    pub fn faculty(&self, id: &str) -> Option<&FacultyScope> {
        self.faculty.iter().find(|member| member.id == id)
    }

    /// Data set mirroring the dashboard's demo semester.
    pub fn demo() -> Self {
        Self {
            engine: EngineConfig::default(),
            companies: demo_companies(),
            transcript: demo_transcript(),
            subjects: demo_subjects(),
            faculty: demo_faculty(),
        }
    }
}

fn demo_companies() -> Vec<CompanyRule> {
    [
        ("TCS Ninja", 6.0, 1, "3.5 LPA"),
        ("Accenture", 6.5, 0, "4.5 LPA"),
        ("Amazon", 7.5, 0, "24 LPA"),
        ("Goldman Sachs", 8.0, 0, "32 LPA"),
        ("Google", 9.0, 0, "40 LPA"),
    ]
    .into_iter()
    .map(|(name, min_cgpa, max_backlogs, package)| CompanyRule {
        name: name.to_string(),
        min_cgpa,
        max_backlogs,
        package_value: package.to_string(),
    })
    .collect()
}

fn marks(
    name: &str,
    code: &str,
    internal: f64,
    external: f64,
    credits: u8,
    grade: &str,
) -> SubjectMarks {
    SubjectMarks {
        name: name.to_string(),
        code: code.to_string(),
        internal,
        external,
        total: internal + external,
        credits,
        grade: grade.to_string(),
    }
}

fn demo_transcript() -> BTreeMap<u8, SemesterRecord> {
    let mut semesters = BTreeMap::new();
    semesters.insert(
        1,
        SemesterRecord {
            sgpa: 7.2,
            credits: 20,
            subjects: vec![
                marks("Engineering Maths-I", "MAT101", 35.0, 45.0, 4, "A"),
                marks("Engineering Physics", "PHY102", 28.0, 32.0, 4, "B"),
                marks("Basic Electrical", "ELE103", 30.0, 40.0, 3, "B+"),
                marks("Engineering Mechanics", "CIV104", 25.0, 35.0, 3, "B"),
                marks("Comm. Skills", "HUM105", 38.0, 42.0, 2, "A"),
            ],
        },
    );
    semesters.insert(
        2,
        SemesterRecord {
            sgpa: 7.5,
            credits: 20,
            subjects: vec![
                marks("Engineering Maths-II", "MAT201", 32.0, 48.0, 4, "A"),
                marks("Engineering Chemistry", "CHE202", 30.0, 45.0, 4, "A"),
                marks("Basic Electronics", "ECE203", 28.0, 38.0, 3, "B+"),
                marks("C Programming", "CS204", 35.0, 40.0, 3, "A"),
                marks("Env. Studies", "EVS205", 38.0, 42.0, 2, "A"),
            ],
        },
    );
    semesters.insert(
        3,
        SemesterRecord {
            sgpa: 6.8,
            credits: 24,
            subjects: vec![
                marks("Engineering Maths-III", "MAT301", 12.0, 15.0, 4, "F"),
                marks("Data Structures", "CS302", 32.0, 40.0, 4, "B+"),
                marks("Digital Logic", "CS303", 35.0, 45.0, 3, "A"),
                marks("COA", "CS304", 25.0, 35.0, 3, "B"),
                marks("Discrete Maths", "CS305", 28.0, 32.0, 3, "B"),
            ],
        },
    );
    for (index, sgpa, subject) in [
        (4, 7.8, marks("Algorithms", "CS401", 35.0, 45.0, 4, "A")),
        (5, 8.2, marks("DBMS", "CS501", 38.0, 48.0, 4, "A+")),
        (6, 8.5, marks("Operating Systems", "CS601", 36.0, 50.0, 4, "A+")),
    ] {
        semesters.insert(
            index,
            SemesterRecord {
                sgpa,
                credits: 24,
                subjects: vec![subject],
            },
        );
    }
    semesters
}

fn demo_subjects() -> Vec<SubjectAggregate> {
    [
        ("Data Structures", "CS301", 45, 5, 72),
        ("Maths-III", "MA301", 28, 22, 45),
        ("Digital Logic", "CS302", 40, 10, 65),
        ("COA", "CS303", 48, 2, 80),
        ("Discrete Str", "CS304", 35, 15, 55),
    ]
    .into_iter()
    .map(|(name, code, pass_count, fail_count, average_score)| SubjectAggregate {
        name: name.to_string(),
        code: SubjectCode(code.to_string()),
        pass_count,
        fail_count,
        average_score,
    })
    .collect()
}

fn demo_faculty() -> Vec<FacultyScope> {
    let member = |id: &str, name: &str, scope: SubjectScope| FacultyScope {
        id: id.to_string(),
        name: name.to_string(),
        branch: "CSE".to_string(),
        scope,
    };

    vec![
        member("hod", "Dr. Sharma (HOD)", SubjectScope::All),
        member(
            "math_faculty",
            "Prof. Rakesh (Maths)",
            SubjectScope::only(["Maths-III"]),
        ),
        member(
            "ds_faculty",
            "Prof. Anjali (CS)",
            SubjectScope::only(["Data Structures"]),
        ),
        member("coa_faculty", "Prof. Vikram (COA)", SubjectScope::only(["COA"])),
    ]
}
