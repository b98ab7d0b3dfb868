use axum::{
    extract::{Extension, Json, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::extract::AppJson;
use crate::auth::Principal;
use crate::error::AppError;
use crate::verification::{VerificationPayload, VerificationWorkflow};

// POST /alerts/:id/generate-token
pub async fn generate_token(
    Extension(workflow): Extension<VerificationWorkflow>,
    Extension(principal): Extension<Principal>,
    Path(alert_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    tracing::Span::current()
        .record("table", "alert_verification_tokens")
        .record("action", "generate_token")
        .record("alert_id", alert_id)
        .record("actor", principal.username.as_str());

    let issued = workflow
        .generate_token(alert_id, chrono::Utc::now().naive_utc())
        .await?;

    tracing::info!(
        alert_id,
        actor = %principal.username,
        "verification token generated"
    );
    tracing::Span::current().record("business_event", "Verification token issued");
    crate::metrics::increment_tokens_issued();

    Ok((StatusCode::CREATED, Json(issued)))
}

// POST /alerts/:id/verify, unauthenticated: the token is the credential.
pub async fn verify_alert(
    Extension(workflow): Extension<VerificationWorkflow>,
    Path(alert_id): Path<i32>,
    payload: Result<AppJson<VerificationPayload>, AppError>,
) -> Response {
    tracing::Span::current()
        .record("table", "alerts")
        .record("action", "verify_alert")
        .record("alert_id", alert_id);

    let result = match payload {
        Ok(AppJson(payload)) => {
            workflow
                .verify_alert(alert_id, payload, chrono::Utc::now().naive_utc())
                .await
        }
        Err(rejection) => Err(rejection),
    };

    match result {
        Ok(alert) => {
            tracing::Span::current().record("business_event", "Alert verified");
            crate::metrics::increment_alerts_verified();
            (StatusCode::OK, Json(alert)).into_response()
        }
        Err(e) => {
            let reason = match &e {
                AppError::InvalidToken => "invalid_token",
                AppError::InvalidArgument { .. } => "invalid_payload",
                AppError::NotFound(_) => "alert_not_found",
                _ => "error",
            };
            crate::metrics::increment_verification_rejected(reason);
            e.into_response()
        }
    }
}
