use crate::error::EngineError;
use crate::planner::round_to_hundredths;
use crate::transcript::TranscriptStore;
use serde::{Deserialize, Serialize};

/// SGPA earned in one completed semester.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SemesterGrade {
    pub semester: u8,
    pub sgpa: f64,
}

/// Academic standing used for placement checks and planning.
///
/// The semester history is strictly ascending by semester index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ProfileInput")]
pub struct StudentProfile {
    cgpa: f64,
    backlog_count: u32,
    semester_history: Vec<SemesterGrade>,
}

#[derive(Deserialize)]
struct ProfileInput {
    cgpa: f64,
    backlog_count: u32,
    #[serde(default)]
    semester_history: Vec<SemesterGrade>,
}

impl TryFrom<ProfileInput> for StudentProfile {
    type Error = EngineError;

    fn try_from(input: ProfileInput) -> Result<Self, Self::Error> {
        Self::new(input.cgpa, input.backlog_count, input.semester_history)
    }
}

impl StudentProfile {
    pub fn new(
        cgpa: f64,
        backlog_count: u32,
        semester_history: Vec<SemesterGrade>,
    ) -> Result<Self, EngineError> {
        if !cgpa.is_finite() {
            return Err(EngineError::invalid("cgpa", "must be a finite number"));
        }
        if let Some(pair) = semester_history
            .windows(2)
            .find(|pair| pair[0].semester >= pair[1].semester)
        {
            return Err(EngineError::invalid(
                "semester_history",
                format!(
                    "semester {} follows semester {}; history must be strictly ascending",
                    pair[1].semester, pair[0].semester
                ),
            ));
        }
        if let Some(grade) = semester_history.iter().find(|grade| !grade.sgpa.is_finite()) {
            return Err(EngineError::invalid(
                "semester_history",
                format!("semester {} has a non-numeric SGPA", grade.semester),
            ));
        }

        Ok(Self {
            cgpa,
            backlog_count,
            semester_history,
        })
    }

    /// Credit-weighted CGPA (two decimals), failing subjects as backlogs, and the SGPA history.
    pub fn from_transcript(store: &dyn TranscriptStore) -> Result<Self, EngineError> {
        let mut history = Vec::new();
        let mut weighted = 0.0;
        let mut credits = 0.0;
        let mut backlog_count = 0u32;

        for index in store.semesters() {
            let semester = store.semester(index)?;
            weighted += semester.sgpa * f64::from(semester.credits);
            credits += f64::from(semester.credits);
            backlog_count += semester.backlogs().count() as u32;
            history.push(SemesterGrade {
                semester: index,
                sgpa: semester.sgpa,
            });
        }

        if history.is_empty() {
            return Err(EngineError::EmptyDataSet);
        }

        let cgpa = if credits > 0.0 {
            weighted / credits
        } else {
            history.iter().map(|grade| grade.sgpa).sum::<f64>() / history.len() as f64
        };

        Self::new(round_to_hundredths(cgpa), backlog_count, history)
    }

    pub fn cgpa(&self) -> f64 {
        self.cgpa
    }

    pub fn backlog_count(&self) -> u32 {
        self.backlog_count
    }

    pub fn semester_history(&self) -> &[SemesterGrade] {
        &self.semester_history
    }

    /// SGPAs in semester order, the shape the target planner takes.
    pub fn sgpa_history(&self) -> Vec<f64> {
        self.semester_history.iter().map(|grade| grade.sgpa).collect()
    }
}
