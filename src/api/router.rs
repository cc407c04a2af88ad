//! Router construction.

use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post, put},
};
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use super::handlers::{
    ApiDoc, abandon_withdrawal_handler, begin_withdrawal_handler, confirm_outcome_handler,
    edit_field_handler, get_withdrawal_handler, health_check_handler,
    list_all_transactions_handler, list_transactions_handler, liveness_handler,
    readiness_handler, set_terms_handler, submit_withdrawal_handler,
};
use crate::app::AppState;

/// Largest accepted request body; form payloads are tiny
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Build the application router with docs, tracing and CORS
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/withdrawals", post(begin_withdrawal_handler))
        .route(
            "/withdrawals/{id}",
            get(get_withdrawal_handler)
                .patch(edit_field_handler)
                .delete(abandon_withdrawal_handler),
        )
        .route("/withdrawals/{id}/terms", put(set_terms_handler))
        .route("/withdrawals/{id}/submit", post(submit_withdrawal_handler))
        .route("/withdrawals/{id}/confirm", post(confirm_outcome_handler))
        .route("/transactions", get(list_transactions_handler))
        .route("/admin/transactions", get(list_all_transactions_handler))
        .route("/health", get(health_check_handler))
        .route("/health/live", get(liveness_handler))
        .route("/health/ready", get(readiness_handler))
        .with_state(state);

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(api)
        .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}
