use axum::{
    extract::{Extension, Json, Path},
    response::IntoResponse,
};

use crate::error::AppError;
use crate::store::AdminUnitStore;

pub async fn list_regions(
    Extension(units): Extension<AdminUnitStore>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(units.regions().await?))
}

pub async fn list_districts(
    Extension(units): Extension<AdminUnitStore>,
    Path(region_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(units.districts(region_id).await?))
}

pub async fn list_subcounties(
    Extension(units): Extension<AdminUnitStore>,
    Path(district_id): Path<i32>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(units.subcounties(district_id).await?))
}

pub async fn list_all_districts(
    Extension(units): Extension<AdminUnitStore>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(units.all_districts().await?))
}

pub async fn list_all_subcounties(
    Extension(units): Extension<AdminUnitStore>,
) -> Result<impl IntoResponse, AppError> {
    Ok(Json(units.all_subcounties().await?))
}
