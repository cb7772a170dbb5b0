use metrics_exporter_prometheus::PrometheusHandle;
use result_engine::config::Fixtures;
use result_engine::eligibility::StudentProfile;
use result_engine::error::EngineError;
use result_engine::subjects::{InMemorySubjectStore, SubjectAggregator};
use result_engine::transcript::InMemoryTranscriptStore;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Engine components shared by every request. The subject map is the only mutable part.
#[derive(Clone)]
pub(crate) struct EngineState {
    pub(crate) fixtures: Arc<Fixtures>,
    pub(crate) aggregator: SubjectAggregator<InMemorySubjectStore>,
    pub(crate) transcript: Arc<InMemoryTranscriptStore>,
}

impl EngineState {
    pub(crate) fn from_fixtures(fixtures: Fixtures) -> Self {
        let store = Arc::new(InMemorySubjectStore::seeded(fixtures.subjects.clone()));
        let transcript = Arc::new(fixtures.transcript_store());

        Self {
            aggregator: SubjectAggregator::new(store),
            transcript,
            fixtures: Arc::new(fixtures),
        }
    }

    /// The profile of the student whose transcript was loaded.
    pub(crate) fn transcript_profile(&self) -> Result<StudentProfile, EngineError> {
        StudentProfile::from_transcript(self.transcript.as_ref())
    }
}
