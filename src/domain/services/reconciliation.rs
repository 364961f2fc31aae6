//! Split-payment arithmetic for a booking.
//!
//! A booking's court price is always split into [`SEAT_COUNT`] equal shares,
//! whatever the number of players. Racket rental is added on top and is not
//! split. Amounts are carried as `f64` on records; all arithmetic here runs on
//! `Decimal` and is rounded to cents on the way out.

use rust_decimal::prelude::*;
use serde::Serialize;

use crate::domain::models::booking::{Booking, BookingPatch, PaymentStatus};
use crate::error::AppError;

pub const SEAT_COUNT: i32 = 4;
pub const RACKET_UNIT_PRICE: f64 = 4.0;

const DECIMAL_PLACES: u32 = 2;

fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}

fn to_f64(value: Decimal) -> f64 {
    round_cents(value).to_f64().unwrap_or_default()
}

/// Financial state of one booking, derived from its inputs only.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SplitPayment {
    pub base_price: f64,
    pub racket_unit_price: f64,
    pub paid_seats: i32,
    pub rackets: i32,
}

impl SplitPayment {
    pub fn new(base_price: f64, paid_seats: i32, rackets: i32) -> Result<Self, AppError> {
        if !base_price.is_finite() || base_price < 0.0 {
            return Err(AppError::Validation(format!("base price must be non-negative, got {}", base_price)));
        }
        if !(0..=SEAT_COUNT).contains(&paid_seats) {
            return Err(AppError::Validation(format!("paid_seats must be between 0 and {}", SEAT_COUNT)));
        }
        if rackets < 0 {
            return Err(AppError::Validation("rackets cannot be negative".into()));
        }
        Ok(Self { base_price, racket_unit_price: RACKET_UNIT_PRICE, paid_seats, rackets })
    }

    /// Reads the seat and racket counters of a stored booking.
    pub fn for_booking(booking: &Booking, base_price: f64) -> Result<Self, AppError> {
        Self::new(base_price, booking.paid_seats, booking.rackets)
    }

    pub fn seat_price(&self) -> f64 {
        to_f64(self.seat_price_dec())
    }

    pub fn total_cost(&self) -> f64 {
        to_f64(self.total_cost_dec())
    }

    pub fn racket_charge(&self) -> f64 {
        to_f64(Decimal::from(self.rackets) * to_decimal(self.racket_unit_price))
    }

    pub fn amount_paid(&self) -> f64 {
        to_f64(self.amount_paid_dec())
    }

    pub fn amount_due(&self) -> f64 {
        to_f64(self.amount_due_dec())
    }

    /// Decided on the balance as stored, so a sub-cent remainder counts as paid.
    pub fn payment_status(&self) -> PaymentStatus {
        if round_cents(self.amount_due_dec()) <= Decimal::ZERO {
            PaymentStatus::Paid
        } else {
            PaymentStatus::Pending
        }
    }

    fn seat_price_dec(&self) -> Decimal {
        to_decimal(self.base_price) / Decimal::from(SEAT_COUNT)
    }

    fn total_cost_dec(&self) -> Decimal {
        to_decimal(self.base_price) + Decimal::from(self.rackets) * to_decimal(self.racket_unit_price)
    }

    fn amount_paid_dec(&self) -> Decimal {
        Decimal::from(self.paid_seats) * self.seat_price_dec()
    }

    fn amount_due_dec(&self) -> Decimal {
        (self.total_cost_dec() - self.amount_paid_dec()).max(Decimal::ZERO)
    }

    /// Seat buttons are thresholds, not flags: clicking seat `k` pays seats
    /// 1..=k when fewer than `k` are paid, otherwise unpays k and above.
    pub fn toggle_seat(self, seat: i32) -> Result<Self, AppError> {
        if !(1..=SEAT_COUNT).contains(&seat) {
            return Err(AppError::Validation(format!("seat must be between 1 and {}", SEAT_COUNT)));
        }
        let paid_seats = if self.paid_seats >= seat { seat - 1 } else { seat };
        Ok(Self { paid_seats, ..self })
    }

    pub fn change_racket_count(self, delta: i32) -> Self {
        Self { rackets: self.rackets.saturating_add(delta).max(0), ..self }
    }

    /// Fields to persist after a recomputation.
    pub fn to_patch(&self) -> BookingPatch {
        BookingPatch {
            payment_status: Some(self.payment_status()),
            amount_due: Some(self.amount_due()),
            paid_seats: Some(self.paid_seats),
            rackets: Some(self.rackets),
            ..Default::default()
        }
    }

    /// Full settlement override. Outstanding racket charges are not added:
    /// the booking is marked paid with nothing due. Business rule pending
    /// confirmation, kept as the club currently operates.
    pub fn settle_all(&self) -> BookingPatch {
        BookingPatch {
            payment_status: Some(PaymentStatus::Paid),
            amount_due: Some(0.0),
            paid_seats: Some(SEAT_COUNT),
            ..Default::default()
        }
    }
}
