use result_engine::eligibility::{EligibilityDecision, EligibilityReason};
use result_engine::ingest::IngestSummary;
use result_engine::planner::SurvivalRules;
use result_engine::transcript::{SemesterTranscript, SubjectResult};
use serde::Serialize;

/// A recruiter row as the student dashboard shows it.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct EligibilityView {
    pub(crate) company: String,
    pub(crate) package: String,
    pub(crate) eligible: bool,
    pub(crate) reasons: Vec<EligibilityReason>,
    pub(crate) notes: Vec<String>,
}

impl From<EligibilityDecision> for EligibilityView {
    fn from(decision: EligibilityDecision) -> Self {
        let notes = decision
            .reasons
            .iter()
            .map(|reason| match reason {
                EligibilityReason::Cgpa => format!("Need {} CGPA", decision.rule.min_cgpa),
                EligibilityReason::Backlogs => {
                    format!("Max {} Backlog", decision.rule.max_backlogs)
                }
            })
            .collect();

        Self {
            company: decision.rule.name,
            package: decision.rule.package_value,
            eligible: decision.eligible,
            reasons: decision.reasons,
            notes,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct TranscriptView {
    pub(crate) semester: u8,
    pub(crate) sgpa: f64,
    pub(crate) credits: u16,
    pub(crate) verdict: &'static str,
    pub(crate) subjects: Vec<SubjectResult>,
}

impl TranscriptView {
    pub(crate) fn new(semester: u8, transcript: SemesterTranscript) -> Self {
        Self {
            semester,
            sgpa: transcript.sgpa,
            credits: transcript.credits,
            verdict: semester_verdict(&transcript),
            subjects: transcript.subjects,
        }
    }
}

pub(crate) fn semester_verdict(transcript: &SemesterTranscript) -> &'static str {
    if transcript.has_backlog() {
        "FAIL / BACKLOG"
    } else {
        "PASS"
    }
}

pub(crate) fn upload_notice(summary: &IngestSummary) -> String {
    let aggregate = &summary.aggregate;
    format!(
        "Processed {} records for {}. Pass: {}, Fail: {}, Avg: {}",
        summary.total_rows,
        aggregate.name,
        aggregate.pass_count,
        aggregate.fail_count,
        aggregate.average_score
    )
}

pub(crate) fn unattainable_notice(rules: &SurvivalRules) -> String {
    format!("Impossible (>{})", rules.external_max)
}
