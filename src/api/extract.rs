use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` whose rejections become [`AppError::InvalidArgument`], so malformed
/// bodies get the same `{"error": ...}` shape and status as any other bad input.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);

