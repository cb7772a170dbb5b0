mod profile;
mod rules;

pub use profile::{SemesterGrade, StudentProfile};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// A recruiter's entry thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompanyRule {
    pub name: String,
    pub min_cgpa: f64,
    pub max_backlogs: u32,
    /// Offered package as published, e.g. `"24 LPA"`.
    #[serde(alias = "package")]
    pub package_value: String,
}

/// Condition a student does not meet. Wording is left to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EligibilityReason {
    Cgpa,
    Backlogs,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EligibilityDecision {
    pub rule: CompanyRule,
    pub eligible: bool,
    pub reasons: Vec<EligibilityReason>,
}

/// Stateless matcher of a student profile against recruiter rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct EligibilityEvaluator;

impl EligibilityEvaluator {
    /// One decision per rule, in rule order.
    pub fn evaluate(profile: &StudentProfile, rules: &[CompanyRule]) -> Vec<EligibilityDecision> {
        let decisions: Vec<EligibilityDecision> = rules
            .iter()
            .map(|rule| {
                let reasons = rules::unmet_conditions(profile, rule);
                EligibilityDecision {
                    rule: rule.clone(),
                    eligible: reasons.is_empty(),
                    reasons,
                }
            })
            .collect();

        debug!(
            rules = decisions.len(),
            eligible = decisions.iter().filter(|decision| decision.eligible).count(),
            "eligibility evaluated"
        );
        decisions
    }

    pub fn eligible_only(profile: &StudentProfile, rules: &[CompanyRule]) -> Vec<CompanyRule> {
        Self::evaluate(profile, rules)
            .into_iter()
            .filter(|decision| decision.eligible)
            .map(|decision| decision.rule)
            .collect()
    }
}
