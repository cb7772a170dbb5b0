use super::round_to_hundredths;
use crate::error::EngineError;
use serde::Serialize;

/// Semesters in a standard undergraduate programme.
pub const DEFAULT_PROGRAM_LENGTH: u8 = 8;
/// Top of the grade-point scale.
pub const DEFAULT_GRADE_SCALE_MAX: f64 = 10.0;

/// Works out the SGPA the remaining semesters must average to reach a target CGPA.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCgpaPlanner {
    program_length: u8,
}

impl Default for TargetCgpaPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM_LENGTH)
    }
}

impl TargetCgpaPlanner {
    pub fn new(program_length: u8) -> Self {
        Self { program_length }
    }

    pub fn program_length(&self) -> u8 {
        self.program_length
    }

    /// `(target * length - sum(history)) / remaining`, rounded to two decimals.
    ///
    /// The raw figure is returned even when negative or above the grade scale; use
    /// [`TargetOutlook::classify`] to interpret it.
    pub fn required_remaining_average(
        &self,
        history: &[f64],
        target: f64,
    ) -> Result<f64, EngineError> {
        let completed = history.len();
        let program_length = usize::from(self.program_length);
        if completed >= program_length {
            return Err(EngineError::NoRemainingSemesters {
                completed,
                program_length: self.program_length,
            });
        }
        if !target.is_finite() {
            return Err(EngineError::invalid("target", "must be a finite number"));
        }
        if let Some(position) = history.iter().position(|sgpa| !sgpa.is_finite()) {
            return Err(EngineError::invalid(
                "history",
                format!("semester {} has a non-numeric SGPA", position + 1),
            ));
        }

        let earned: f64 = history.iter().sum();
        let remaining = (program_length - completed) as f64;
        let required = (target * f64::from(self.program_length) - earned) / remaining;
        Ok(round_to_hundredths(required))
    }
}

/// How a required remaining average compares to the grade scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetOutlook {
    /// Target is met even with zero in every remaining semester.
    AlreadySecured,
    Attainable,
    BeyondScale,
}

impl TargetOutlook {
    pub fn classify(required: f64, scale_max: f64) -> Self {
        if required <= 0.0 {
            TargetOutlook::AlreadySecured
        } else if required > scale_max {
            TargetOutlook::BeyondScale
        } else {
            TargetOutlook::Attainable
        }
    }
}
