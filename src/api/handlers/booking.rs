use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::acting_user::ActingUser;
use crate::api::dtos::requests::CreateBookingRequest;
use crate::domain::services::schedule::parse_date;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

/// Customer wizard: books one hour on behalf of the acting user.
pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
    Json(payload): Json<CreateBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    info!("create_booking: {} at {} {}:00", payload.resource_id, payload.date, payload.hour);
    let date = parse_date(&payload.date)?;

    let booking = state.booking_service
        .create_customer_booking(&user, &payload.resource_id, date, payload.hour, payload.payment_mode)
        .await?;

    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn my_bookings(
    State(state): State<Arc<AppState>>,
    ActingUser(user): ActingUser,
) -> Result<impl IntoResponse, AppError> {
    let history = state.admin_queries.client_history(&user.id).await?;
    Ok(Json(history))
}
