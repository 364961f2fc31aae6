use crate::domain::services::booking_service::PaymentMode;
use serde::Deserialize;

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct DateQuery {
    pub date: String,
}

#[derive(Deserialize)]
pub struct AvailabilityQuery {
    pub date: String,
    pub hour: u32,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub resource_id: String,
    pub date: String,
    pub hour: u32,
    pub payment_mode: PaymentMode,
}

/// Staff modal payload; unselected fields arrive as null or are omitted.
#[derive(Deserialize)]
pub struct CreateStaffBookingRequest {
    pub user_id: Option<String>,
    pub resource_id: Option<String>,
    pub date: Option<String>,
    pub hour: u32,
}

#[derive(Deserialize)]
pub struct RacketChangeRequest {
    pub delta: i32,
}

#[derive(Deserialize)]
pub struct UpdatePaymentRequest {
    pub paid_seats: i32,
    pub rackets: i32,
}

#[derive(Deserialize)]
pub struct QuickCreateClientRequest {
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Deserialize)]
pub struct ClientSearchQuery {
    pub q: Option<String>,
}
