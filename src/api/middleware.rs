use axum::{
    extract::{Extension, Request},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tower_cookies::Cookies;

use crate::auth::CredentialService;
use crate::error::AppError;

pub const SESSION_COOKIE: &str = "alerts_mis_session";

/// Resolves `Authorization: Bearer` (or the session cookie) to a
/// [`crate::auth::Principal`] in the request extensions. Anything else is 401.
pub async fn auth_middleware(
    Extension(credentials): Extension<CredentialService>,
    cookies: Cookies,
    mut request: Request,
    next: Next,
) -> Response {
    let bearer = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string());
    let token = bearer.or_else(|| cookies.get(SESSION_COOKIE).map(|c| c.value().to_string()));

    let Some(token) = token else {
        return AppError::Unauthorized("Unauthorized").into_response();
    };

    match credentials.authenticate(&token) {
        Ok(principal) => {
            tracing::Span::current().record("actor", principal.username.as_str());
            request.extensions_mut().insert(principal);
            next.run(request).await
        }
        Err(e) => e.into_response(),
    }
}
