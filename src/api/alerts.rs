use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};
use serde::Deserialize;
use serde_json::json;

use super::extract::AppJson;
use crate::error::AppError;
use crate::query::{AlertListParams, NamedQuery, PageRequest};
use crate::store::{AlertInput, AlertStore};

fn now() -> chrono::NaiveDateTime {
    chrono::Utc::now().naive_utc()
}

pub async fn create_alert(
    Extension(alerts): Extension<AlertStore>,
    AppJson(payload): AppJson<AlertInput>,
) -> Result<impl IntoResponse, AppError> {
    let alert = alerts.create(payload, now()).await?;

    tracing::Span::current()
        .record("table", "alerts")
        .record("action", "create_alert")
        .record("alert_id", alert.id)
        .record("business_event", "Alert created");
    crate::metrics::increment_alerts_created();

    Ok((StatusCode::CREATED, Json(alert)))
}

pub async fn list_alerts(
    Extension(alerts): Extension<AlertStore>,
    Query(params): Query<AlertListParams>,
) -> Result<impl IntoResponse, AppError> {
    let (filter, page) = params.into_parts()?;
    let result = alerts.list(&filter, page).await?;

    tracing::Span::current()
        .record("table", "alerts")
        .record("action", "list_alerts");

    Ok(Json(result))
}

pub async fn get_alert(
    Extension(alerts): Extension<AlertStore>,
    Path(alert_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    tracing::Span::current()
        .record("table", "alerts")
        .record("action", "get_alert")
        .record("alert_id", alert_id);

    Ok(Json(alerts.get(alert_id).await?))
}

pub async fn update_alert(
    Extension(alerts): Extension<AlertStore>,
    Path(alert_id): Path<i32>,
    AppJson(payload): AppJson<AlertInput>,
) -> Result<impl IntoResponse, AppError> {
    tracing::Span::current()
        .record("table", "alerts")
        .record("action", "update_alert")
        .record("alert_id", alert_id);

    let alert = alerts.update(alert_id, payload, now()).await?;
    tracing::Span::current().record("business_event", "Alert updated");

    Ok(Json(alert))
}

pub async fn delete_alert(
    Extension(alerts): Extension<AlertStore>,
    Path(alert_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    tracing::Span::current()
        .record("table", "alerts")
        .record("action", "delete_alert")
        .record("alert_id", alert_id);

    let deleted = alerts.soft_delete(alert_id, now()).await?;
    tracing::Span::current().record("business_event", "Alert deleted");
    crate::metrics::record_alert_deleted(deleted.is_verified);

    Ok(Json(json!({"message": "Alert deleted successfully"})))
}

#[derive(Deserialize)]
pub struct NamedQueryRequest {
    pub query: String,
}

#[derive(Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

pub async fn query_alerts(
    Extension(alerts): Extension<AlertStore>,
    Query(paging): Query<PageParams>,
    AppJson(payload): AppJson<NamedQueryRequest>,
) -> Result<impl IntoResponse, AppError> {
    let query = NamedQuery::parse(&payload.query)?;
    let page = PageRequest::from_raw(paging.page.as_deref(), paging.limit.as_deref());

    tracing::Span::current()
        .record("table", "alerts")
        .record("action", query.name());

    Ok(Json(alerts.query_named(query, now(), page).await?))
}

pub async fn verified_count(
    Extension(alerts): Extension<AlertStore>,
) -> Result<impl IntoResponse, AppError> {
    let count = alerts.count_recent(true, now()).await?;
    Ok(Json(json!({"count": count})))
}

pub async fn not_verified_count(
    Extension(alerts): Extension<AlertStore>,
) -> Result<impl IntoResponse, AppError> {
    let count = alerts.count_recent(false, now()).await?;
    Ok(Json(json!({"count": count})))
}
