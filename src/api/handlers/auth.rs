use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::dtos::requests::{LoginRequest, RegisterRequest};
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.directory.register(&payload.email, &payload.name).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Email-only lookup. The returned id is what clients send back as `X-User-Id`.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    let user = state.directory.find_by_email(&payload.email).await
        .map_err(|e| match e {
            AppError::NotFound(_) => AppError::Unauthorized,
            other => other,
        })?;
    info!(user_id = %user.id, role = ?user.role, "Login");
    Ok(Json(user))
}
