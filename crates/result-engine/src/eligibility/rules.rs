use super::profile::StudentProfile;
use super::{CompanyRule, EligibilityReason};

pub(crate) fn unmet_conditions(
    profile: &StudentProfile,
    rule: &CompanyRule,
) -> Vec<EligibilityReason> {
    let mut reasons = Vec::new();

    if profile.cgpa() < rule.min_cgpa {
        reasons.push(EligibilityReason::Cgpa);
    }
    if profile.backlog_count() > rule.max_backlogs {
        reasons.push(EligibilityReason::Backlogs);
    }

    reasons
}
