use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static SUBJECT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

/// Short subject identifier such as `CS301`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubjectCode(pub String);

impl SubjectCode {
    /// Issues a process-unique code for subjects that arrive without one.
    pub fn generate() -> Self {
        let id = SUBJECT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
        Self(format!("NEW{id:03}"))
    }
}

impl fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Pass/fail/average summary for one subject's mark sheet.
///
/// `pass_count + fail_count` is the number of rows whose mark coerced to a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectAggregate {
    pub name: String,
    pub code: SubjectCode,
    pub pass_count: u32,
    pub fail_count: u32,
    pub average_score: i64,
}

impl SubjectAggregate {
    pub fn total(&self) -> u32 {
        self.pass_count.saturating_add(self.fail_count)
    }

    /// Fraction of evaluated students who passed; `None` when nobody was evaluated.
    pub fn pass_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| f64::from(self.pass_count) / f64::from(total))
    }

    pub fn failure_rate(&self) -> Option<f64> {
        let total = self.total();
        (total > 0).then(|| f64::from(self.fail_count) / f64::from(total))
    }
}
