use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::acting_user::StaffUser;
use crate::api::dtos::requests::{ClientSearchQuery, QuickCreateClientRequest};
use crate::api::dtos::responses::ClientHistoryResponse;
use crate::error::AppError;
use std::sync::Arc;

pub async fn list_clients(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Query(query): Query<ClientSearchQuery>,
) -> Result<impl IntoResponse, AppError> {
    let clients = state.directory.list_clients(query.q.as_deref()).await?;
    Ok(Json(clients))
}

pub async fn create_client(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Json(payload): Json<QuickCreateClientRequest>,
) -> Result<impl IntoResponse, AppError> {
    let client = state.directory
        .quick_create_client(&payload.name, payload.email, payload.phone)
        .await?;
    Ok((StatusCode::CREATED, Json(client)))
}

pub async fn client_history(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let client = state.directory.get(&user_id).await?;
    let bookings = state.admin_queries.client_history(&client.id).await?;
    Ok(Json(ClientHistoryResponse { user_id: client.id, bookings }))
}
