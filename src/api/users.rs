use axum::{
    extract::{Extension, Json, Path},
    response::IntoResponse,
};

use crate::auth::{CredentialService, Principal};
use crate::error::AppError;

pub async fn profile(
    Extension(credentials): Extension<CredentialService>,
    Extension(principal): Extension<Principal>,
) -> Result<impl IntoResponse, AppError> {
    tracing::Span::current()
        .record("table", "users")
        .record("action", "get_profile");

    Ok(Json(credentials.get_user(principal.user_id).await?))
}

pub async fn list_users(
    Extension(credentials): Extension<CredentialService>,
) -> Result<impl IntoResponse, AppError> {
    tracing::Span::current()
        .record("table", "users")
        .record("action", "list_users");

    Ok(Json(credentials.list_users().await?))
}

pub async fn get_user(
    Extension(credentials): Extension<CredentialService>,
    Path(user_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    tracing::Span::current()
        .record("table", "users")
        .record("action", "get_user");

    Ok(Json(credentials.get_user(user_id).await?))
}
