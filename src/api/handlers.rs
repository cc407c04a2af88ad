//! HTTP request handlers with OpenAPI documentation.

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};
use utoipa::{OpenApi, ToSchema};

use crate::app::{
    AppState, DialogState, DialogView, FieldView, FormField, LOAD_FAILURE_MESSAGE, Navigation,
    Phase, PhaseResult, SubmissionResponse, SubmissionState, WorkflowView,
};
use crate::domain::{
    AppError, ErrorDetail, ErrorResponse, ExternalServiceError, HealthResponse, HealthStatus,
    PaymentMethod, Transaction, TransactionStatus, TransactionType, WithdrawalMethod,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Withdrawal Workflow API",
        version = "0.1.0",
        description = "Server-driven withdrawal form: payout details, validation, profile sync and ledger submission",
        license(
            name = "MIT"
        )
    ),
    paths(
        begin_withdrawal_handler,
        get_withdrawal_handler,
        edit_field_handler,
        set_terms_handler,
        submit_withdrawal_handler,
        confirm_outcome_handler,
        abandon_withdrawal_handler,
        list_transactions_handler,
        list_all_transactions_handler,
        health_check_handler,
        liveness_handler,
        readiness_handler,
    ),
    components(
        schemas(
            BeginWithdrawalRequest,
            EditFieldRequest,
            TermsRequest,
            WorkflowView,
            FieldView,
            FormField,
            WithdrawalMethod,
            SubmissionState,
            SubmissionResponse,
            PhaseResult,
            Phase,
            DialogView,
            DialogState,
            Navigation,
            Transaction,
            TransactionType,
            TransactionStatus,
            PaymentMethod,
            HealthResponse,
            HealthStatus,
            ErrorResponse,
            ErrorDetail,
        )
    ),
    tags(
        (name = "withdrawals", description = "Withdrawal workflow endpoints"),
        (name = "transactions", description = "Transaction history endpoints"),
        (name = "health", description = "Health check endpoints")
    )
)]
pub struct ApiDoc;

/// Request body for entering step two
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct BeginWithdrawalRequest {
    pub method: WithdrawalMethod,
}

/// Request body for a text field edit
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct EditFieldRequest {
    pub field: FormField,
    /// Raw input; digit-only and decimal fields are filtered server side
    pub value: String,
}

/// Request body for the terms checkbox
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct TermsRequest {
    pub accepted: bool,
}

/// Start a withdrawal workflow
///
/// Generates the transaction id and loads the profile to seed the form.
/// If the profile cannot be loaded the workflow is not created and the
/// generic `error occurred` message is returned.
#[utoipa::path(
    post,
    path = "/withdrawals",
    tag = "withdrawals",
    request_body = BeginWithdrawalRequest,
    responses(
        (status = 201, description = "Workflow created", body = WorkflowView),
        (status = 502, description = "Profile could not be loaded", body = ErrorResponse)
    )
)]
pub async fn begin_withdrawal_handler(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<BeginWithdrawalRequest>,
) -> Result<(StatusCode, Json<WorkflowView>), AppError> {
    let view = state.service.begin_withdrawal(payload.method).await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// Current state of a withdrawal workflow
#[utoipa::path(
    get,
    path = "/withdrawals/{id}",
    tag = "withdrawals",
    params(
        ("id" = String, Path, description = "Transaction ID of the workflow")
    ),
    responses(
        (status = 200, description = "Workflow found", body = WorkflowView),
        (status = 404, description = "Workflow not found", body = ErrorResponse)
    )
)]
pub async fn get_withdrawal_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<WorkflowView>, AppError> {
    Ok(Json(state.service.get_withdrawal(&id)?))
}

/// Edit one text field
#[utoipa::path(
    patch,
    path = "/withdrawals/{id}",
    tag = "withdrawals",
    request_body = EditFieldRequest,
    params(
        ("id" = String, Path, description = "Transaction ID of the workflow")
    ),
    responses(
        (status = 200, description = "Field updated", body = WorkflowView),
        (status = 400, description = "Field not part of this withdrawal method", body = ErrorResponse),
        (status = 404, description = "Workflow not found", body = ErrorResponse),
        (status = 409, description = "Form locked by a submission", body = ErrorResponse)
    )
)]
pub async fn edit_field_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<EditFieldRequest>,
) -> Result<Json<WorkflowView>, AppError> {
    Ok(Json(
        state
            .service
            .edit_field(&id, payload.field, &payload.value)?,
    ))
}

/// Accept or decline the wire-transfer terms
#[utoipa::path(
    put,
    path = "/withdrawals/{id}/terms",
    tag = "withdrawals",
    request_body = TermsRequest,
    params(
        ("id" = String, Path, description = "Transaction ID of the workflow")
    ),
    responses(
        (status = 200, description = "Terms updated", body = WorkflowView),
        (status = 400, description = "Method has no terms", body = ErrorResponse),
        (status = 404, description = "Workflow not found", body = ErrorResponse),
        (status = 409, description = "Form locked by a submission", body = ErrorResponse)
    )
)]
pub async fn set_terms_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<TermsRequest>,
) -> Result<Json<WorkflowView>, AppError> {
    Ok(Json(
        state.service.set_terms_accepted(&id, payload.accepted)?,
    ))
}

/// Submit the withdrawal
///
/// Syncs changed payout details to the profile, then records a pending
/// withdrawal. Back-end failures are reported through the outcome dialog
/// with status 200; the request itself only fails when it cannot run.
#[utoipa::path(
    post,
    path = "/withdrawals/{id}/submit",
    tag = "withdrawals",
    params(
        ("id" = String, Path, description = "Transaction ID of the workflow")
    ),
    responses(
        (status = 200, description = "Submission finished; see dialog", body = SubmissionResponse),
        (status = 400, description = "Form incomplete", body = ErrorResponse),
        (status = 404, description = "Workflow not found", body = ErrorResponse),
        (status = 409, description = "Already submitting or submitted", body = ErrorResponse)
    )
)]
pub async fn submit_withdrawal_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SubmissionResponse>, AppError> {
    Ok(Json(state.service.submit_withdrawal(&id).await?))
}

/// Confirm the outcome dialog
#[utoipa::path(
    post,
    path = "/withdrawals/{id}/confirm",
    tag = "withdrawals",
    params(
        ("id" = String, Path, description = "Transaction ID of the workflow")
    ),
    responses(
        (status = 200, description = "Workflow closed; navigate to route", body = Navigation),
        (status = 404, description = "Workflow not found", body = ErrorResponse),
        (status = 409, description = "No outcome to confirm", body = ErrorResponse)
    )
)]
pub async fn confirm_outcome_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Navigation>, AppError> {
    Ok(Json(state.service.confirm_outcome(&id)?))
}

/// Leave the screen and discard the form
#[utoipa::path(
    delete,
    path = "/withdrawals/{id}",
    tag = "withdrawals",
    params(
        ("id" = String, Path, description = "Transaction ID of the workflow")
    ),
    responses(
        (status = 204, description = "Workflow discarded"),
        (status = 404, description = "Workflow not found", body = ErrorResponse)
    )
)]
pub async fn abandon_withdrawal_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state.service.abandon_withdrawal(&id)?;
    Ok(StatusCode::NO_CONTENT)
}

/// Transaction history of the current user
#[utoipa::path(
    get,
    path = "/transactions",
    tag = "transactions",
    responses(
        (status = 200, description = "Transactions", body = [Transaction]),
        (status = 502, description = "Ledger unavailable", body = ErrorResponse)
    )
)]
pub async fn list_transactions_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(state.service.list_transactions().await?))
}

/// Transaction history of every user
#[utoipa::path(
    get,
    path = "/admin/transactions",
    tag = "transactions",
    responses(
        (status = 200, description = "Transactions", body = [Transaction]),
        (status = 501, description = "Ledger has no admin view", body = ErrorResponse),
        (status = 502, description = "Ledger unavailable", body = ErrorResponse)
    )
)]
pub async fn list_all_transactions_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Transaction>>, AppError> {
    Ok(Json(state.service.list_all_transactions().await?))
}

/// Detailed health check
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Health status", body = HealthResponse)
    )
)]
pub async fn health_check_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let health = state.service.health_check().await;
    Json(health)
}

/// Kubernetes liveness probe
#[utoipa::path(
    get,
    path = "/health/live",
    tag = "health",
    responses(
        (status = 200, description = "Application is alive")
    )
)]
pub async fn liveness_handler() -> StatusCode {
    StatusCode::OK
}

/// Kubernetes readiness probe
#[utoipa::path(
    get,
    path = "/health/ready",
    tag = "health",
    responses(
        (status = 200, description = "Application is ready to serve traffic"),
        (status = 503, description = "Application is not ready")
    )
)]
pub async fn readiness_handler(State(state): State<Arc<AppState>>) -> StatusCode {
    let health = state.service.health_check().await;
    match health.status {
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_type, message) = match &self {
            AppError::ExternalService(ext_err) => match ext_err {
                ExternalServiceError::Timeout(_) => {
                    (StatusCode::GATEWAY_TIMEOUT, "timeout", self.to_string())
                }
                ExternalServiceError::ApiError {
                    status_code: 429, ..
                } => (
                    StatusCode::TOO_MANY_REQUESTS,
                    "rate_limited",
                    self.to_string(),
                ),
                ExternalServiceError::Configuration(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "configuration_error",
                    self.to_string(),
                ),
                _ => (
                    StatusCode::BAD_GATEWAY,
                    "external_service_error",
                    self.to_string(),
                ),
            },
            AppError::ProfileLoad(detail) => {
                warn!(detail = %detail, "Profile load failed");
                (
                    StatusCode::BAD_GATEWAY,
                    "profile_load_failed",
                    LOAD_FAILURE_MESSAGE.to_string(),
                )
            }
            AppError::Config(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration_error",
                self.to_string(),
            ),
            AppError::Validation(_) => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                self.to_string(),
            ),
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "not_found", self.to_string()),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "conflict", self.to_string()),
            AppError::Internal(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                self.to_string(),
            ),
            AppError::NotSupported(_) => (
                StatusCode::NOT_IMPLEMENTED,
                "not_supported",
                self.to_string(),
            ),
        };

        if status.is_server_error() {
            error!(error_type = %error_type, message = %message, "Server error");
        }

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                r#type: error_type.to_string(),
                message,
            },
        });

        (status, body).into_response()
    }
}
