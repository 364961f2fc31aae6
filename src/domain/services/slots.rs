use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::domain::models::booking::Booking;
use crate::domain::services::ledger::BookingLedger;
use crate::domain::services::schedule::{local_date, local_hour, slot_bounds, CLOSING_HOUR, OPENING_HOUR};
use crate::error::AppError;

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeSlot {
    pub label: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub available: bool,
}

/// True when `booking` is a confirmed booking of `resource_id` starting at
/// `hour` (local) on `date`. Bookings are one hour and slot-aligned, so the
/// hour-of-day is enough to identify the slot.
pub fn occupies_hour(tz: Tz, booking: &Booking, resource_id: &str, date: NaiveDate, hour: u32) -> bool {
    booking.is_confirmed()
        && booking.resource_id == resource_id
        && local_date(tz, booking.start_time) == date
        && local_hour(tz, booking.start_time) == hour
}

/// Lazily enumerates the bookable slots of one resource on one day.
pub fn daily_slots<'a>(
    tz: Tz,
    resource_id: &'a str,
    date: NaiveDate,
    bookings: &'a [Booking],
) -> impl Iterator<Item = TimeSlot> + 'a {
    (OPENING_HOUR..CLOSING_HOUR).filter_map(move |hour| {
        let (start, end) = slot_bounds(tz, date, hour).ok()?;
        let taken = bookings.iter().any(|b| occupies_hour(tz, b, resource_id, date, hour));
        Some(TimeSlot {
            label: format!("{}:00", hour),
            start,
            end,
            available: !taken,
        })
    })
}

pub async fn get_daily_slots(ledger: &BookingLedger, resource_id: &str, date: NaiveDate) -> Result<Vec<TimeSlot>, AppError> {
    let bookings = ledger.list_for_resource_and_date(resource_id, date).await?;
    Ok(daily_slots(ledger.timezone(), resource_id, date, &bookings).collect())
}
