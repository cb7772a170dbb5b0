use super::SubjectMarks;
use serde::{Deserialize, Serialize};

/// Verdict for one subject result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ResultStatus {
    Pass,
    Fail,
}

impl ResultStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ResultStatus::Pass => "PASS",
            ResultStatus::Fail => "FAIL",
        }
    }
}

/// A single minimum a subject result has to meet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradingRule {
    MinTotal(f64),
    MinInternal(f64),
    MinExternal(f64),
}

impl GradingRule {
    fn fails(&self, marks: &SubjectMarks) -> bool {
        match *self {
            GradingRule::MinTotal(minimum) => marks.total < minimum,
            GradingRule::MinInternal(minimum) => marks.internal < minimum,
            GradingRule::MinExternal(minimum) => marks.external < minimum,
        }
    }
}

/// University pass rules. A result fails when any rule fails.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GradingTable {
    pub rules: Vec<GradingRule>,
}

impl Default for GradingTable {
    /// Total of 40 with at least 21 in the external exam.
    fn default() -> Self {
        Self {
            rules: vec![GradingRule::MinTotal(40.0), GradingRule::MinExternal(21.0)],
        }
    }
}

impl GradingTable {
    pub fn status_for(&self, marks: &SubjectMarks) -> ResultStatus {
        if self.rules.iter().any(|rule| rule.fails(marks)) {
            ResultStatus::Fail
        } else {
            ResultStatus::Pass
        }
    }
}
