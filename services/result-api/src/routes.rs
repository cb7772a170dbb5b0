use crate::infra::{AppState, EngineState};
use crate::views::{unattainable_notice, upload_notice, EligibilityView, TranscriptView};
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Extension, Json, Router};
use result_engine::eligibility::{EligibilityEvaluator, StudentProfile};
use result_engine::error::{AppError, EngineError};
use result_engine::ingest::{subject_label_from_file_name, IngestSummary, MarkSheetImporter};
use result_engine::planner::{
    ExamSurvivalPlanner, InternalMarksPolicy, SurvivalRules, TargetCgpaPlanner, TargetOutlook,
};
use result_engine::subjects::{SubjectCode, SubjectScope, UpsertOutcome};
use result_engine::transcript::TranscriptStore;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::io::Cursor;

#[derive(Debug, Deserialize)]
pub(crate) struct UploadRequest {
    pub(crate) file_name: String,
    pub(crate) csv: String,
    /// Overrides the label derived from `file_name`.
    #[serde(default)]
    pub(crate) subject: Option<String>,
    #[serde(default)]
    pub(crate) code: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadResponse {
    pub(crate) summary: IngestSummary,
    pub(crate) outcome: UpsertOutcome,
    pub(crate) message: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct SubjectQuery {
    #[serde(default)]
    pub(crate) faculty: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TargetRequest {
    pub(crate) target: f64,
    /// Falls back to the loaded transcript when absent.
    #[serde(default)]
    pub(crate) history: Option<Vec<f64>>,
    #[serde(default)]
    pub(crate) program_length: Option<u8>,
}

#[derive(Debug, Serialize)]
pub(crate) struct TargetResponse {
    pub(crate) required_average: f64,
    pub(crate) outlook: TargetOutlook,
    pub(crate) scale_max: f64,
    pub(crate) remaining_semesters: usize,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SurvivalRequest {
    pub(crate) internal_marks: f64,
    #[serde(default)]
    pub(crate) lenient: bool,
}

#[derive(Debug, Serialize)]
pub(crate) struct SurvivalResponse {
    pub(crate) internal_marks: f64,
    pub(crate) required_external: Option<f64>,
    pub(crate) attainable: bool,
    pub(crate) message: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct EligibilityRequest {
    /// Falls back to the loaded transcript when absent.
    #[serde(default)]
    pub(crate) profile: Option<StudentProfile>,
}

#[derive(Debug, Serialize)]
pub(crate) struct EligibilityResponse {
    pub(crate) cgpa: f64,
    pub(crate) backlog_count: u32,
    pub(crate) companies: Vec<EligibilityView>,
}

/// Engine endpoints plus the operational probes.
pub(crate) fn engine_router(state: EngineState) -> Router {
    Router::new()
        .route("/api/v1/subjects", get(subject_dashboard_endpoint))
        .route("/api/v1/subjects/upload", post(upload_endpoint))
        .route("/api/v1/planner/target", post(target_plan_endpoint))
        .route("/api/v1/planner/survival", post(survival_plan_endpoint))
        .route("/api/v1/eligibility", post(eligibility_endpoint))
        .route("/api/v1/transcript/:semester", get(transcript_endpoint))
        .with_state(state)
        .route("/health", get(healthcheck))
}

/// Probes that read the process-wide [`AppState`] extension.
pub(crate) fn with_operational_routes(router: Router) -> Router {
    router
        .route("/ready", get(readiness_endpoint))
        .route("/metrics", get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

pub(crate) async fn subject_dashboard_endpoint(
    State(state): State<EngineState>,
    Query(query): Query<SubjectQuery>,
) -> Response {
    let scope = match query.faculty.as_deref() {
        None => SubjectScope::All,
        Some(id) => match state.fixtures.faculty(id) {
            Some(member) => member.scope.clone(),
            None => {
                let payload = json!({ "error": format!("unknown faculty '{id}'") });
                return (StatusCode::NOT_FOUND, Json(payload)).into_response();
            }
        },
    };

    match state
        .aggregator
        .dashboard(&scope, state.fixtures.engine.critical_threshold)
    {
        Ok(dashboard) => (StatusCode::OK, Json(dashboard)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub(crate) async fn upload_endpoint(
    State(state): State<EngineState>,
    Json(payload): Json<UploadRequest>,
) -> Result<Json<UploadResponse>, AppError> {
    let UploadRequest {
        file_name,
        csv,
        subject,
        code,
    } = payload;

    let label = subject.unwrap_or_else(|| subject_label_from_file_name(&file_name));
    let importer = MarkSheetImporter::new(state.fixtures.engine.pass_threshold);
    let summary = importer.from_reader(
        Cursor::new(csv.into_bytes()),
        &label,
        code.map(SubjectCode),
    )?;
    let outcome = state.aggregator.upsert(summary.aggregate.clone())?;
    let message = upload_notice(&summary);

    Ok(Json(UploadResponse {
        summary,
        outcome,
        message,
    }))
}

pub(crate) async fn target_plan_endpoint(
    State(state): State<EngineState>,
    Json(payload): Json<TargetRequest>,
) -> Result<Json<TargetResponse>, AppError> {
    let engine = &state.fixtures.engine;
    let history = match payload.history {
        Some(history) => history,
        None => state.transcript_profile()?.sgpa_history(),
    };
    let planner = TargetCgpaPlanner::new(payload.program_length.unwrap_or(engine.program_length));

    let required_average = planner.required_remaining_average(&history, payload.target)?;

    Ok(Json(TargetResponse {
        required_average,
        outlook: TargetOutlook::classify(required_average, engine.grade_scale_max),
        scale_max: engine.grade_scale_max,
        remaining_semesters: usize::from(planner.program_length()) - history.len(),
    }))
}

pub(crate) async fn survival_plan_endpoint(
    State(state): State<EngineState>,
    Json(payload): Json<SurvivalRequest>,
) -> Result<Json<SurvivalResponse>, AppError> {
    let rules = SurvivalRules {
        internal_policy: if payload.lenient {
            InternalMarksPolicy::Lenient
        } else {
            state.fixtures.engine.survival.internal_policy
        },
        ..state.fixtures.engine.survival
    };
    let planner = ExamSurvivalPlanner::new(rules);

    let response = match planner.required_external(payload.internal_marks) {
        Ok(required) => SurvivalResponse {
            internal_marks: payload.internal_marks,
            required_external: Some(required),
            attainable: true,
            message: format!("Score at least {required} in the external exam"),
        },
        Err(EngineError::Unattainable { .. }) => SurvivalResponse {
            internal_marks: payload.internal_marks,
            required_external: None,
            attainable: false,
            message: unattainable_notice(&rules),
        },
        Err(other) => return Err(other.into()),
    };

    Ok(Json(response))
}

pub(crate) async fn eligibility_endpoint(
    State(state): State<EngineState>,
    Json(payload): Json<EligibilityRequest>,
) -> Result<Json<EligibilityResponse>, AppError> {
    let profile = match payload.profile {
        Some(profile) => profile,
        None => state.transcript_profile()?,
    };

    let companies = EligibilityEvaluator::evaluate(&profile, &state.fixtures.companies)
        .into_iter()
        .map(EligibilityView::from)
        .collect();

    Ok(Json(EligibilityResponse {
        cgpa: profile.cgpa(),
        backlog_count: profile.backlog_count(),
        companies,
    }))
}

pub(crate) async fn transcript_endpoint(
    State(state): State<EngineState>,
    Path(semester): Path<u8>,
) -> Result<Json<TranscriptView>, AppError> {
    let transcript = state.transcript.semester(semester)?;
    Ok(Json(TranscriptView::new(semester, transcript)))
}
