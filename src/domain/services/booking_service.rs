use std::sync::Arc;
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use crate::domain::models::booking::{Booking, BookingPatch, BookingStatus, NewBookingParams, PaymentStatus};
use crate::domain::models::resource::Resource;
use crate::domain::models::user::User;
use crate::domain::ports::{ResourceRepository, UserRepository};
use crate::domain::services::ledger::BookingLedger;
use crate::domain::services::reconciliation::{SplitPayment, SEAT_COUNT};
use crate::domain::services::schedule::slot_bounds;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMode {
    /// Whole court paid online.
    Full,
    /// One quarter paid online, the rest on site.
    Split,
}

/// Selections coming from the staff creation modal. Any of them may be missing.
#[derive(Debug, Default, Clone)]
pub struct StaffBookingInput {
    pub user_id: Option<String>,
    pub resource_id: Option<String>,
    pub date: Option<NaiveDate>,
    pub hour: u32,
}

fn required(value: Option<String>, what: &str) -> Result<String, AppError> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| AppError::Validation(format!("No {} selected", what)))
}

/// Staff and customer commands. Each computes the new state, persists it
/// through the ledger and returns the stored booking.
pub struct BookingService {
    ledger: Arc<BookingLedger>,
    resources: Arc<dyn ResourceRepository>,
    users: Arc<dyn UserRepository>,
}

impl BookingService {
    pub fn new(ledger: Arc<BookingLedger>, resources: Arc<dyn ResourceRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { ledger, resources, users }
    }

    async fn resource(&self, id: &str) -> Result<Resource, AppError> {
        self.resources.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Resource {} not found", id)))
    }

    async fn user(&self, id: &str) -> Result<User, AppError> {
        self.users.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("User {} not found", id)))
    }

    /// Booking made by a customer through the wizard.
    pub async fn create_customer_booking(
        &self,
        customer: &User,
        resource_id: &str,
        date: NaiveDate,
        hour: u32,
        mode: PaymentMode,
    ) -> Result<Booking, AppError> {
        let resource = self.resource(resource_id).await?;
        let (start, end) = slot_bounds(self.ledger.timezone(), date, hour)?;

        let (payment_status, amount_due, paid_seats) = match mode {
            PaymentMode::Full => (PaymentStatus::Paid, 0.0, SEAT_COUNT),
            PaymentMode::Split => {
                let online = SplitPayment::new(resource.price_per_hour, 1, 0)?;
                (PaymentStatus::Partial, online.amount_due(), 1)
            }
        };

        let booking = self.ledger.create(NewBookingParams {
            resource_id: resource.id,
            user_id: customer.id.clone(),
            start,
            end,
            payment_status,
            amount_due,
            paid_seats,
        }).await?;
        info!(booking_id = %booking.id, ?mode, "Customer booking confirmed");
        Ok(booking)
    }

    /// Booking entered by staff for a client; nothing is paid yet.
    pub async fn create_staff_booking(&self, input: StaffBookingInput) -> Result<Booking, AppError> {
        let user_id = required(input.user_id, "client")?;
        let resource_id = required(input.resource_id, "resource")?;
        let date = input.date.ok_or(AppError::Validation("No date selected".into()))?;

        let user = self.user(&user_id).await?;
        let resource = self.resource(&resource_id).await?;
        let (start, end) = slot_bounds(self.ledger.timezone(), date, input.hour)?;

        let booking = self.ledger.create(NewBookingParams {
            resource_id: resource.id,
            user_id: user.id,
            start,
            end,
            payment_status: PaymentStatus::Pending,
            amount_due: resource.price_per_hour,
            paid_seats: 0,
        }).await?;
        info!(booking_id = %booking.id, "Staff booking created");
        Ok(booking)
    }

    /// Marks the party as arrived. No payment precondition; idempotent.
    pub async fn check_in(&self, booking_id: &str) -> Result<Booking, AppError> {
        let updated = self.ledger.modify(booking_id, |_| Ok(BookingPatch { checked_in: Some(true), ..Default::default() })).await?;
        info!(booking_id = %updated.id, "Checked in");
        Ok(updated)
    }

    /// Court price of a booking. The resource of a booking never changes, so
    /// it can be read ahead of the write.
    async fn base_price(&self, booking_id: &str) -> Result<f64, AppError> {
        let booking = self.ledger.find(booking_id).await?;
        Ok(self.resource(&booking.resource_id).await?.price_per_hour)
    }

    /// Recomputes the balance from the counters stored at write time.
    async fn reconcile<F>(&self, booking_id: &str, step: F) -> Result<Booking, AppError>
    where
        F: Fn(SplitPayment) -> Result<SplitPayment, AppError> + Send + Sync,
    {
        let price = self.base_price(booking_id).await?;
        self.ledger.modify(booking_id, |current| {
            let payment = step(SplitPayment::for_booking(current, price)?)?;
            Ok(payment.to_patch())
        }).await
    }

    pub async fn toggle_seat(&self, booking_id: &str, seat: i32) -> Result<Booking, AppError> {
        self.reconcile(booking_id, |payment| payment.toggle_seat(seat)).await
    }

    pub async fn change_racket_count(&self, booking_id: &str, delta: i32) -> Result<Booking, AppError> {
        self.reconcile(booking_id, |payment| Ok(payment.change_racket_count(delta))).await
    }

    /// Sets both counters at once and recomputes the balance.
    pub async fn update_payment(&self, booking_id: &str, paid_seats: i32, rackets: i32) -> Result<Booking, AppError> {
        self.reconcile(booking_id, |payment| SplitPayment::new(payment.base_price, paid_seats, rackets)).await
    }

    pub async fn settle_all(&self, booking_id: &str) -> Result<Booking, AppError> {
        let price = self.base_price(booking_id).await?;
        let updated = self.ledger.modify(booking_id, |current| {
            Ok(SplitPayment::for_booking(current, price)?.settle_all())
        }).await?;
        let forgiven = SplitPayment::for_booking(&updated, price)?.racket_charge();
        info!(booking_id = %updated.id, racket_charge = forgiven, "Booking settled in full");
        Ok(updated)
    }

    /// Idempotent. A cancelled booking stays cancelled.
    pub async fn cancel(&self, booking_id: &str) -> Result<Booking, AppError> {
        let updated = self.ledger.modify(booking_id, |_| Ok(BookingPatch { status: Some(BookingStatus::Cancelled), ..Default::default() })).await?;
        info!(booking_id = %updated.id, "Booking cancelled");
        Ok(updated)
    }

    pub async fn update(&self, booking_id: &str, patch: &BookingPatch) -> Result<Booking, AppError> {
        if patch.is_empty() {
            return Err(AppError::Validation("Nothing to update".into()));
        }
        self.ledger.update(booking_id, patch).await
    }
}
