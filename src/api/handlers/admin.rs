use axum::{extract::{Path, Query, State}, http::StatusCode, response::IntoResponse, Json};
use crate::state::AppState;
use crate::api::extractors::acting_user::StaffUser;
use crate::api::dtos::requests::{
    AvailabilityQuery, CreateStaffBookingRequest, DateQuery, RacketChangeRequest, UpdatePaymentRequest,
};
use crate::api::dtos::responses::AvailabilityResponse;
use crate::domain::models::booking::BookingPatch;
use crate::domain::services::booking_service::StaffBookingInput;
use crate::domain::services::schedule::parse_date;
use crate::error::AppError;
use std::sync::Arc;
use tracing::info;

pub async fn list_bookings(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
) -> Result<impl IntoResponse, AppError> {
    let bookings = state.admin_queries.bookings_with_details().await?;
    Ok(Json(bookings))
}

pub async fn create_booking(
    State(state): State<Arc<AppState>>,
    StaffUser(staff): StaffUser,
    Json(payload): Json<CreateStaffBookingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let date = payload.date.as_deref().map(parse_date).transpose()?;

    let booking = state.booking_service.create_staff_booking(StaffBookingInput {
        user_id: payload.user_id,
        resource_id: payload.resource_id,
        date,
        hour: payload.hour,
    }).await?;

    info!(booking_id = %booking.id, staff_id = %staff.id, "Staff booking recorded");
    Ok((StatusCode::CREATED, Json(booking)))
}

pub async fn unpaid_bookings(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Query(query): Query<DateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&query.date)?;
    let summary = state.admin_queries.unpaid_bookings(date).await?;
    Ok(Json(summary))
}

pub async fn daily_planning(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Query(query): Query<DateQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&query.date)?;
    let planning = state.admin_queries.daily_planning(date).await?;
    Ok(Json(planning))
}

pub async fn availability(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Query(query): Query<AvailabilityQuery>,
) -> Result<impl IntoResponse, AppError> {
    let date = parse_date(&query.date)?;
    let resources = state.admin_queries.resource_availability(date, query.hour).await?;
    Ok(Json(AvailabilityResponse { date, hour: query.hour, resources }))
}

pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.ledger.find(&booking_id).await?;
    Ok(Json(booking))
}

pub async fn update_booking(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(booking_id): Path<String>,
    Json(patch): Json<BookingPatch>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.update(&booking_id, &patch).await?;
    Ok(Json(booking))
}

pub async fn check_in(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.check_in(&booking_id).await?;
    Ok(Json(booking))
}

pub async fn toggle_seat(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path((booking_id, seat)): Path<(String, i32)>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.toggle_seat(&booking_id, seat).await?;
    Ok(Json(booking))
}

pub async fn change_rackets(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<RacketChangeRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.change_racket_count(&booking_id, payload.delta).await?;
    Ok(Json(booking))
}

pub async fn update_payment(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(booking_id): Path<String>,
    Json(payload): Json<UpdatePaymentRequest>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service
        .update_payment(&booking_id, payload.paid_seats, payload.rackets)
        .await?;
    Ok(Json(booking))
}

pub async fn settle(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.settle_all(&booking_id).await?;
    Ok(Json(booking))
}

pub async fn cancel(
    State(state): State<Arc<AppState>>,
    _staff: StaffUser,
    Path(booking_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let booking = state.booking_service.cancel(&booking_id).await?;
    Ok(Json(booking))
}
