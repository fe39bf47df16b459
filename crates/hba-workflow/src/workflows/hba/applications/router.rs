use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use crate::workflows::hba::checklist::DocumentKey;
use crate::workflows::hba::domain::{ApplicationType, ReviewAction};
use crate::workflows::hba::machine::TransitionError;
use crate::workflows::hba::review::ReviewData;
use crate::workflows::hba::roles::UserRole;

use super::documents::{DocumentUpload, UploadRejected};
use super::domain::{ApplicationSubmission, ReferenceNo};
use super::repository::{ApplicationRepository, Notifier, RepositoryError};
use super::service::{CorrectionError, HbaApplicationService, WorkflowServiceError};

/// Router builder exposing the application lifecycle over HTTP.
pub fn application_router<R, N>(service: Arc<HbaApplicationService<R, N>>) -> Router
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    Router::new()
        .route("/api/v1/hba/applications", post(submit_handler::<R, N>))
        .route(
            "/api/v1/hba/applications/:reference",
            get(status_handler::<R, N>),
        )
        .route(
            "/api/v1/hba/applications/:reference/progress",
            get(progress_handler::<R, N>),
        )
        .route(
            "/api/v1/hba/applications/:reference/review",
            post(review_handler::<R, N>),
        )
        .route(
            "/api/v1/hba/applications/:reference/documents/:key",
            post(reupload_handler::<R, N>),
        )
        .route(
            "/api/v1/hba/applications/:reference/resubmit",
            post(resubmit_handler::<R, N>),
        )
        .route(
            "/api/v1/hba/applications/:reference/sanction",
            post(sanction_handler::<R, N>),
        )
        .route("/api/v1/hba/inbox/:role", get(inbox_handler::<R, N>))
        .route("/api/v1/hba/checklist", post(checklist_handler::<R, N>))
        .with_state(service)
}

/// Desk decision payload: who acted, what they chose, and their review notes.
#[derive(Debug, Deserialize)]
pub(crate) struct ReviewRequest {
    pub(crate) role: UserRole,
    pub(crate) action: ReviewAction,
    #[serde(default)]
    pub(crate) review: ReviewData,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ReuploadRequest {
    pub(crate) role: UserRole,
    pub(crate) upload: DocumentUpload,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActorRequest {
    pub(crate) role: UserRole,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChecklistRequest {
    pub(crate) app_type: ApplicationType,
    #[serde(default)]
    pub(crate) is_bank_transfer: bool,
}

pub(crate) async fn submit_handler<R, N>(
    State(service): State<Arc<HbaApplicationService<R, N>>>,
    axum::Json(submission): axum::Json<ApplicationSubmission>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    match service.submit(submission) {
        Ok(application) => {
            (StatusCode::ACCEPTED, axum::Json(application.status_view())).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N>(
    State(service): State<Arc<HbaApplicationService<R, N>>>,
    Path(reference): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    let reference = match parse_reference(&reference) {
        Ok(reference) => reference,
        Err(response) => return response,
    };
    match service.application(&reference) {
        Ok(application) => (StatusCode::OK, axum::Json(application.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn progress_handler<R, N>(
    State(service): State<Arc<HbaApplicationService<R, N>>>,
    Path(reference): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    let reference = match parse_reference(&reference) {
        Ok(reference) => reference,
        Err(response) => return response,
    };
    match service.progress(&reference) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn review_handler<R, N>(
    State(service): State<Arc<HbaApplicationService<R, N>>>,
    Path(reference): Path<String>,
    axum::Json(request): axum::Json<ReviewRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    let reference = match parse_reference(&reference) {
        Ok(reference) => reference,
        Err(response) => return response,
    };
    match service.decide(&reference, request.role, request.action, request.review) {
        Ok(application) => (StatusCode::OK, axum::Json(application.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reupload_handler<R, N>(
    State(service): State<Arc<HbaApplicationService<R, N>>>,
    Path((reference, key)): Path<(String, String)>,
    axum::Json(request): axum::Json<ReuploadRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    let reference = match parse_reference(&reference) {
        Ok(reference) => reference,
        Err(response) => return response,
    };
    let key = match parse_document_key(&key) {
        Ok(key) => key,
        Err(response) => return response,
    };
    match service.reupload_document(&reference, request.role, key, request.upload) {
        Ok(application) => (StatusCode::OK, axum::Json(application.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn resubmit_handler<R, N>(
    State(service): State<Arc<HbaApplicationService<R, N>>>,
    Path(reference): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    let reference = match parse_reference(&reference) {
        Ok(reference) => reference,
        Err(response) => return response,
    };
    match service.resubmit(&reference, request.role) {
        Ok(application) => (StatusCode::OK, axum::Json(application.status_view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn sanction_handler<R, N>(
    State(service): State<Arc<HbaApplicationService<R, N>>>,
    Path(reference): Path<String>,
    axum::Json(request): axum::Json<ActorRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    let reference = match parse_reference(&reference) {
        Ok(reference) => reference,
        Err(response) => return response,
    };
    match service.issue_sanction(&reference, request.role) {
        Ok(outcome) => {
            let payload = json!({
                "application": outcome.application.status_view(),
                "letter": {
                    "content_type": outcome.letter.content_type,
                    "size_bytes": outcome.letter.bytes.len(),
                },
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn inbox_handler<R, N>(
    State(service): State<Arc<HbaApplicationService<R, N>>>,
    Path(role): Path<String>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    let role = match parse_role(&role) {
        Ok(role) => role,
        Err(response) => return response,
    };
    match service.inbox(role) {
        Ok(entries) => (StatusCode::OK, axum::Json(entries)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn checklist_handler<R, N>(
    State(service): State<Arc<HbaApplicationService<R, N>>>,
    axum::Json(request): axum::Json<ChecklistRequest>,
) -> Response
where
    R: ApplicationRepository + 'static,
    N: Notifier + 'static,
{
    let sections = service.checklist(request.app_type, request.is_bank_transfer);
    (StatusCode::OK, axum::Json(sections)).into_response()
}

fn parse_reference(raw: &str) -> Result<ReferenceNo, Response> {
    ReferenceNo::parse(raw).map_err(|error| bad_request(error.to_string()))
}

fn parse_document_key(raw: &str) -> Result<DocumentKey, Response> {
    raw.parse::<DocumentKey>()
        .map_err(|error| bad_request(error.to_string()))
}

fn parse_role(raw: &str) -> Result<UserRole, Response> {
    UserRole::parse_code(raw).ok_or_else(|| bad_request(format!("unknown role '{raw}'")))
}

fn bad_request(message: String) -> Response {
    let payload = json!({ "error": message });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

/// Maps the service error taxonomy onto HTTP statuses: validation failures
/// are 422, permission denials 403, precondition and ordering violations
/// 409, and collaborator outages bubble up as gateway errors.
fn error_response(error: WorkflowServiceError) -> Response {
    let status = match &error {
        WorkflowServiceError::Intake(_) => StatusCode::UNPROCESSABLE_ENTITY,
        WorkflowServiceError::Upload(UploadRejected::TooLarge { .. }) => {
            StatusCode::PAYLOAD_TOO_LARGE
        }
        WorkflowServiceError::Upload(UploadRejected::WrongType { .. }) => {
            StatusCode::UNSUPPORTED_MEDIA_TYPE
        }
        WorkflowServiceError::Transition(TransitionError::ActionNotPermitted { .. })
        | WorkflowServiceError::Transition(TransitionError::NotSanctionIssuer { .. })
        | WorkflowServiceError::Correction(CorrectionError::NotApplicant { .. }) => {
            StatusCode::FORBIDDEN
        }
        WorkflowServiceError::Transition(_) | WorkflowServiceError::Correction(_) => {
            StatusCode::CONFLICT
        }
        WorkflowServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        WorkflowServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        WorkflowServiceError::Repository(RepositoryError::Unavailable(_)) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        WorkflowServiceError::Documents(_) | WorkflowServiceError::Letter(_) => {
            StatusCode::BAD_GATEWAY
        }
    };
    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
