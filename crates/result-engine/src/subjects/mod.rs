//! Subject aggregates and the dashboard views derived from them.
//!
//! The aggregator is the only owner of the subject map; callers receive copies.

mod aggregator;
pub mod domain;
pub mod scope;
pub mod store;

#[cfg(test)]
mod tests;

pub use aggregator::{
    average_pass_rate, critical_subjects, DepartmentOverview, SubjectAggregator,
    SubjectDashboard, DEFAULT_CRITICAL_THRESHOLD,
};
pub use domain::{SubjectAggregate, SubjectCode};
pub use scope::{FacultyScope, SubjectScope};
pub use store::{InMemorySubjectStore, StoreError, SubjectStore, UpsertOutcome};
