use axum::{
    extract::{Extension, Json},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};

use super::extract::AppJson;
use super::middleware::SESSION_COOKIE;
use crate::auth::{CredentialService, Principal, RegisterRequest};
use crate::error::AppError;

pub async fn register(
    Extension(credentials): Extension<CredentialService>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::Span::current()
        .record("table", "users")
        .record("action", "register_user");

    let user = credentials
        .register(payload, chrono::Utc::now().naive_utc())
        .await?;

    tracing::Span::current()
        .record("actor", user.username.as_str())
        .record("business_event", "User registered successfully");

    Ok((StatusCode::CREATED, Json(user)))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

pub async fn login(
    Extension(credentials): Extension<CredentialService>,
    cookies: Cookies,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    tracing::Span::current()
        .record("table", "users")
        .record("action", "login_user");

    let outcome = credentials
        .login(&payload.username, &payload.password)
        .await?;

    let mut cookie = Cookie::new(SESSION_COOKIE, outcome.token.clone());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookies.add(cookie);

    tracing::Span::current()
        .record("actor", outcome.user.username.as_str())
        .record("business_event", "User logged in successfully");

    Ok(Json(json!({"token": outcome.token, "user": outcome.user})))
}

pub async fn logout(
    Extension(principal): Extension<Principal>,
    cookies: Cookies,
) -> impl IntoResponse {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookies.remove(cookie);

    tracing::Span::current()
        .record("table", "users")
        .record("action", "logout_user")
        .record("actor", principal.username.as_str());

    Json(json!({"message": "Logged out successfully"}))
}
