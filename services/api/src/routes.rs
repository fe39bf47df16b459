use crate::infra::AppState;
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use hba_workflow::workflows::directory::{AuthError, AuthProvider, EmployeeDirectory, EmployeeRecord};
use hba_workflow::workflows::hba::applications::{
    application_router, ApplicationRepository, HbaApplicationService, Notifier,
};
use hba_workflow::workflows::hba::pipeline;
use hba_workflow::workflows::hba::AppStatus;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_workflow_routes<R, N>(
    service: Arc<HbaApplicationService<R, N>>,
) -> axum::Router
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    application_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/hba/pipeline/:status",
            axum::routing::get(pipeline_endpoint),
        )
        .route(
            "/api/v1/hba/directory/:employee_no",
            axum::routing::get(directory_endpoint),
        )
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

/// Read-only timeline projection for a status code, as consumed by the
/// applicant-facing progress tracker.
pub(crate) async fn pipeline_endpoint(Path(status): Path<String>) -> Response {
    match AppStatus::parse_code(&status) {
        Some(status) => (StatusCode::OK, Json(pipeline::progress_view(status))).into_response(),
        None => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": format!("unknown status code '{status}'") })),
        )
            .into_response(),
    }
}

/// Sign-in support: resolves an employee number against the directory.
pub(crate) async fn directory_endpoint(
    Extension(directory): Extension<Arc<EmployeeDirectory>>,
    Path(employee_no): Path<String>,
) -> Response {
    match directory.lookup(&employee_no) {
        Ok(record) => (StatusCode::OK, Json(DirectoryUserView::from_record(&record))).into_response(),
        Err(error @ AuthError::Malformed(_)) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
        Err(error @ AuthError::NotFound { .. }) => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": error.to_string() })),
        )
            .into_response(),
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct DirectoryUserView {
    pub(crate) employee_no: String,
    pub(crate) name: String,
    pub(crate) designation: String,
    pub(crate) department: String,
    pub(crate) role: &'static str,
    pub(crate) role_label: &'static str,
    pub(crate) location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) email: Option<String>,
}

impl DirectoryUserView {
    fn from_record(record: &EmployeeRecord) -> Self {
        Self {
            employee_no: record.employee_no.to_string(),
            name: record.name.clone(),
            designation: record.designation.clone(),
            department: record.department.clone(),
            role: record.role.code(),
            role_label: record.role.label(),
            location: record.location.clone(),
            email: record.email.clone(),
        }
    }
}
