//! Forward-looking grade calculators. Both are pure functions of their arguments.

mod survival;
mod target;

pub use survival::{
    ExamSurvivalPlanner, InternalMarksPolicy, SurvivalRules, DEFAULT_EXTERNAL_MAX,
    DEFAULT_PASS_TOTAL, MIN_EXTERNAL_FLOOR,
};
pub use target::{
    TargetCgpaPlanner, TargetOutlook, DEFAULT_GRADE_SCALE_MAX, DEFAULT_PROGRAM_LENGTH,
};

pub(crate) fn round_to_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
