use super::domain::SubjectAggregate;
use super::scope::SubjectScope;
use super::store::{StoreError, SubjectStore, UpsertOutcome};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Failure fraction above which a subject is flagged critical.
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 0.2;

/// Subjects whose failure fraction exceeds `threshold`. Subjects nobody sat are never flagged.
pub fn critical_subjects(subjects: &[SubjectAggregate], threshold: f64) -> Vec<SubjectAggregate> {
    subjects
        .iter()
        .filter(|subject| {
            subject
                .failure_rate()
                .map(|rate| rate > threshold)
                .unwrap_or(false)
        })
        .cloned()
        .collect()
}

/// Mean pass percentage across subjects with at least one evaluated student, rounded.
///
/// `None` when no subject contributes, never a NaN.
pub fn average_pass_rate(subjects: &[SubjectAggregate]) -> Option<u32> {
    let rates: Vec<f64> = subjects
        .iter()
        .filter_map(SubjectAggregate::pass_rate)
        .map(|rate| rate * 100.0)
        .collect();

    if rates.is_empty() {
        return None;
    }

    let mean = rates.iter().sum::<f64>() / rates.len() as f64;
    Some(mean.round() as u32)
}

/// Head-count totals for a set of subjects.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DepartmentOverview {
    pub passed: u64,
    pub failed: u64,
    pub students_evaluated: u64,
}

impl DepartmentOverview {
    pub fn from_subjects(subjects: &[SubjectAggregate]) -> Self {
        let passed = subjects
            .iter()
            .map(|subject| u64::from(subject.pass_count))
            .sum();
        let failed = subjects
            .iter()
            .map(|subject| u64::from(subject.fail_count))
            .sum();

        Self {
            passed,
            failed,
            students_evaluated: passed + failed,
        }
    }
}

/// Every view the dashboard shows for one scope.
#[derive(Debug, Clone, Serialize)]
pub struct SubjectDashboard {
    pub subjects: Vec<SubjectAggregate>,
    pub average_pass_rate: Option<u32>,
    pub critical_threshold: f64,
    pub critical_subjects: Vec<SubjectAggregate>,
    pub overview: DepartmentOverview,
}

/// Owns the subject map and derives pass-rate and critical-subject views from it.
pub struct SubjectAggregator<S> {
    store: Arc<S>,
}

impl<S> Clone for SubjectAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> SubjectAggregator<S>
where
    S: SubjectStore + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Replaces the aggregate with the same name in place, or appends it.
    pub fn upsert(&self, aggregate: SubjectAggregate) -> Result<UpsertOutcome, StoreError> {
        let name = aggregate.name.clone();
        let outcome = self.store.upsert(aggregate)?;
        info!(subject = %name, ?outcome, "subject aggregate stored");
        Ok(outcome)
    }

    pub fn all(&self) -> Result<Vec<SubjectAggregate>, StoreError> {
        self.store.all()
    }

    pub fn scoped(&self, scope: &SubjectScope) -> Result<Vec<SubjectAggregate>, StoreError> {
        let mut subjects = self.store.all()?;
        subjects.retain(|subject| scope.includes(&subject.name));
        Ok(subjects)
    }

    pub fn critical_subjects(&self, threshold: f64) -> Result<Vec<SubjectAggregate>, StoreError> {
        Ok(critical_subjects(&self.store.all()?, threshold))
    }

    pub fn average_pass_rate(&self) -> Result<Option<u32>, StoreError> {
        Ok(average_pass_rate(&self.store.all()?))
    }

    pub fn dashboard(
        &self,
        scope: &SubjectScope,
        threshold: f64,
    ) -> Result<SubjectDashboard, StoreError> {
        let subjects = self.scoped(scope)?;
        let critical = critical_subjects(&subjects, threshold);
        debug!(
            visible = subjects.len(),
            critical = critical.len(),
            "subject dashboard computed"
        );

        Ok(SubjectDashboard {
            average_pass_rate: average_pass_rate(&subjects),
            overview: DepartmentOverview::from_subjects(&subjects),
            critical_threshold: threshold,
            critical_subjects: critical,
            subjects,
        })
    }
}
