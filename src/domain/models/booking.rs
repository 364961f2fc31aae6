use serde::{Deserialize, Serialize};
use uuid::Uuid;
use chrono::{DateTime, Duration, Utc};
use sqlx::FromRow;

use super::user::User;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum BookingStatus {
    Confirmed,
    Cancelled,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(rename_all = "lowercase")]
pub enum PaymentStatus {
    Paid,
    Partial,
    Pending,
}

#[derive(Debug, Serialize, Deserialize, FromRow, Clone, PartialEq)]
pub struct Booking {
    pub id: String,
    pub resource_id: String,
    pub user_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub payment_status: PaymentStatus,
    /// Remaining balance, not the total price.
    pub amount_due: f64,
    pub checked_in: bool,
    /// Quarter-shares settled, 0..=4.
    pub paid_seats: i32,
    /// Rented rackets.
    pub rackets: i32,
    pub created_at: DateTime<Utc>,
}

pub struct NewBookingParams {
    pub resource_id: String,
    pub user_id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub payment_status: PaymentStatus,
    pub amount_due: f64,
    pub paid_seats: i32,
}

impl Booking {
    pub fn new(params: NewBookingParams) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            resource_id: params.resource_id,
            user_id: params.user_id,
            start_time: params.start,
            end_time: params.end,
            status: BookingStatus::Confirmed,
            payment_status: params.payment_status,
            amount_due: params.amount_due,
            checked_in: false,
            paid_seats: params.paid_seats,
            rackets: 0,
            created_at: Utc::now(),
        }
    }

    pub fn is_confirmed(&self) -> bool {
        self.status == BookingStatus::Confirmed
    }

    /// Half-open interval overlap: touching bookings do not collide.
    pub fn overlaps(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.start_time < end && start < self.end_time
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Shallow merge of the provided fields over this record.
    pub fn apply(&mut self, patch: &BookingPatch) {
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(payment_status) = patch.payment_status {
            self.payment_status = payment_status;
        }
        if let Some(amount_due) = patch.amount_due {
            self.amount_due = amount_due;
        }
        if let Some(checked_in) = patch.checked_in {
            self.checked_in = checked_in;
        }
        if let Some(paid_seats) = patch.paid_seats {
            self.paid_seats = paid_seats;
        }
        if let Some(rackets) = patch.rackets {
            self.rackets = rackets;
        }
    }
}

/// Partial update accepted by the ledger. Start and end are not editable.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingPatch {
    pub status: Option<BookingStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub amount_due: Option<f64>,
    pub checked_in: Option<bool>,
    pub paid_seats: Option<i32>,
    pub rackets: Option<i32>,
}

impl BookingPatch {
    pub fn is_empty(&self) -> bool {
        self == &BookingPatch::default()
    }
}

/// Booking joined with its user and resource name, used by every dashboard view.
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct BookingDetails {
    #[serde(flatten)]
    pub booking: Booking,
    pub user: Option<User>,
    pub resource_name: Option<String>,
}
