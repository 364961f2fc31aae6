use axum::{extract::{Path, Query, State}, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::DateQuery;
use crate::api::dtos::responses::SlotsResponse;
use crate::domain::services::schedule::parse_date;
use crate::domain::services::slots::get_daily_slots;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_resources(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, AppError> {
    let resources = state.resource_repo.list().await?;
    Ok(Json(resources))
}

pub async fn get_slots(
    State(state): State<Arc<AppState>>,
    Path(resource_id): Path<String>,
    Query(query): Query<DateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&query.date)?;
    state.resource_repo.find_by_id(&resource_id).await?
        .ok_or_else(|| AppError::NotFound(format!("Resource {} not found", resource_id)))?;

    let slots = get_daily_slots(&state.ledger, &resource_id, date).await?;
    Ok(Json(SlotsResponse { resource_id, date, slots }))
}
