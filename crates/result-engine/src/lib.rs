//! Academic performance engine behind the result dashboard.
//!
//! Mark sheets are folded into per-subject aggregates ([`ingest`], [`subjects`]), students are
//! matched against recruiter thresholds ([`eligibility`]) and two planners answer what grades
//! are still needed ([`planner`]). Historical results come from a read-only [`transcript`]
//! store. Thresholds and reference data are injected through [`config`].

pub mod config;
pub mod eligibility;
pub mod error;
pub mod ingest;
pub mod planner;
pub mod subjects;
pub mod telemetry;
pub mod transcript;
