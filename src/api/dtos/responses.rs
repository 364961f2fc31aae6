use crate::domain::models::booking::BookingDetails;
use crate::domain::services::admin_queries::ResourceAvailability;
use crate::domain::services::slots::TimeSlot;
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Serialize)]
pub struct SlotsResponse {
    pub resource_id: String,
    pub date: NaiveDate,
    pub slots: Vec<TimeSlot>,
}

#[derive(Serialize)]
pub struct AvailabilityResponse {
    pub date: NaiveDate,
    pub hour: u32,
    pub resources: Vec<ResourceAvailability>,
}

#[derive(Serialize)]
pub struct ClientHistoryResponse {
    pub user_id: String,
    pub bookings: Vec<BookingDetails>,
}
