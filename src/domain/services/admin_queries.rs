use std::collections::HashMap;
use std::sync::Arc;
use chrono::NaiveDate;
use rust_decimal::prelude::*;
use serde::Serialize;

use crate::domain::models::booking::{Booking, BookingDetails};
use crate::domain::models::resource::Resource;
use crate::domain::models::user::User;
use crate::domain::ports::{ResourceRepository, UserRepository};
use crate::domain::services::ledger::BookingLedger;
use crate::domain::services::schedule::local_date;
use crate::domain::services::slots::occupies_hour;
use crate::error::AppError;

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct UnpaidSummary {
    pub bookings: Vec<BookingDetails>,
    pub total_pending: f64,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct DailyPlanning {
    pub date: NaiveDate,
    pub bookings: Vec<BookingDetails>,
    pub pending_amount: f64,
    pub checked_in_count: usize,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ResourceAvailability {
    pub resource: Resource,
    pub taken: bool,
}

fn sum_due<'a>(bookings: impl Iterator<Item = &'a BookingDetails>) -> f64 {
    let total: Decimal = bookings
        .map(|d| Decimal::from_f64(d.booking.amount_due).unwrap_or_default())
        .sum();
    total.round_dp(2).to_f64().unwrap_or_default()
}

/// Read models for the staff dashboard.
pub struct AdminQueries {
    ledger: Arc<BookingLedger>,
    users: Arc<dyn UserRepository>,
    resources: Arc<dyn ResourceRepository>,
}

impl AdminQueries {
    pub fn new(ledger: Arc<BookingLedger>, users: Arc<dyn UserRepository>, resources: Arc<dyn ResourceRepository>) -> Self {
        Self { ledger, users, resources }
    }

    /// Attaches user and resource name to each booking. Dangling references
    /// leave the joined fields empty.
    async fn join(&self, bookings: Vec<Booking>) -> Result<Vec<BookingDetails>, AppError> {
        let users: HashMap<String, User> = self.users.list().await?
            .into_iter()
            .map(|u| (u.id.clone(), u))
            .collect();
        let resource_names: HashMap<String, String> = self.resources.list().await?
            .into_iter()
            .map(|r| (r.id, r.name))
            .collect();

        Ok(bookings
            .into_iter()
            .map(|booking| BookingDetails {
                user: users.get(&booking.user_id).cloned(),
                resource_name: resource_names.get(&booking.resource_id).cloned(),
                booking,
            })
            .collect())
    }

    pub async fn bookings_with_details(&self) -> Result<Vec<BookingDetails>, AppError> {
        let bookings = self.ledger.list_all().await?;
        self.join(bookings).await
    }

    /// Bookings of `date` that still owe money, with the total owed.
    pub async fn unpaid_bookings(&self, date: NaiveDate) -> Result<UnpaidSummary, AppError> {
        let tz = self.ledger.timezone();
        let bookings: Vec<BookingDetails> = self.bookings_with_details().await?
            .into_iter()
            .filter(|d| local_date(tz, d.booking.start_time) == date && d.booking.amount_due > 0.0)
            .collect();
        let total_pending = sum_due(bookings.iter());
        Ok(UnpaidSummary { bookings, total_pending })
    }

    /// A user's bookings, most recent first.
    pub async fn client_history(&self, user_id: &str) -> Result<Vec<BookingDetails>, AppError> {
        let mut history: Vec<BookingDetails> = self.bookings_with_details().await?
            .into_iter()
            .filter(|d| d.booking.user_id == user_id)
            .collect();
        history.sort_by(|a, b| b.booking.start_time.cmp(&a.booking.start_time));
        Ok(history)
    }

    /// Client-side pre-check used to grey out taken courts. The ledger's
    /// create remains the enforcement point.
    pub async fn is_slot_taken(&self, resource_id: &str, date: NaiveDate, hour: u32) -> Result<bool, AppError> {
        let tz = self.ledger.timezone();
        let bookings = self.ledger.list_for_resource_and_date(resource_id, date).await?;
        Ok(bookings.iter().any(|b| occupies_hour(tz, b, resource_id, date, hour)))
    }

    pub async fn resource_availability(&self, date: NaiveDate, hour: u32) -> Result<Vec<ResourceAvailability>, AppError> {
        let tz = self.ledger.timezone();
        let day = self.ledger.list_for_date(date).await?;
        Ok(self.resources.list().await?
            .into_iter()
            .map(|resource| {
                let taken = day.iter().any(|b| occupies_hour(tz, b, &resource.id, date, hour));
                ResourceAvailability { resource, taken }
            })
            .collect())
    }

    /// The day's board: every booking of `date` plus the quick counters.
    pub async fn daily_planning(&self, date: NaiveDate) -> Result<DailyPlanning, AppError> {
        let bookings = self.ledger.list_for_date(date).await?;
        let bookings = self.join(bookings).await?;
        let pending_amount = sum_due(bookings.iter());
        let checked_in_count = bookings.iter().filter(|d| d.booking.checked_in).count();
        Ok(DailyPlanning { date, bookings, pending_amount, checked_in_count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::booking::{BookingPatch, NewBookingParams, PaymentStatus};
    use crate::domain::models::resource::ResourceCategory;
    use crate::domain::models::user::Role;
    use crate::infra::repositories::memory_repo::{MemoryBookingRepo, MemoryResourceRepo, MemoryUserRepo};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    struct Fixture {
        ledger: Arc<BookingLedger>,
        queries: AdminQueries,
    }

    async fn fixture() -> Fixture {
        let resources = Arc::new(MemoryResourceRepo::default());
        resources.create(&Resource::new("p1", "Indoor1", ResourceCategory::Indoor, 40.0, None)).await.unwrap();
        resources.create(&Resource::new("p2", "Indoor2", ResourceCategory::Indoor, 40.0, None)).await.unwrap();
        let users = Arc::new(MemoryUserRepo::default());
        let mut jean = User::new("Jean Dupont".into(), "jean@demo.com".into(), Role::Client);
        jean.id = "u1".into();
        users.create(&jean).await.unwrap();
        let mut sophie = User::new("Sophie Martin".into(), "sophie@demo.com".into(), Role::Client);
        sophie.id = "u2".into();
        users.create(&sophie).await.unwrap();

        let ledger = Arc::new(BookingLedger::new(Arc::new(MemoryBookingRepo::default()), chrono_tz::UTC));
        let queries = AdminQueries::new(ledger.clone(), users, resources);
        Fixture { ledger, queries }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, day, hour, 0, 0).unwrap()
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, d).unwrap()
    }

    async fn book(ledger: &BookingLedger, resource_id: &str, user_id: &str, start: DateTime<Utc>, amount_due: f64) -> Booking {
        ledger.create(NewBookingParams {
            resource_id: resource_id.into(),
            user_id: user_id.into(),
            start,
            end: start + Duration::hours(1),
            payment_status: if amount_due > 0.0 { PaymentStatus::Partial } else { PaymentStatus::Paid },
            amount_due,
            paid_seats: 0,
        }).await.unwrap()
    }

    #[tokio::test]
    async fn test_join_tolerates_dangling_references() {
        let f = fixture().await;
        book(&f.ledger, "p1", "u1", at(2, 10), 0.0).await;
        book(&f.ledger, "p9", "ghost", at(2, 11), 0.0).await;

        let details = f.queries.bookings_with_details().await.unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].user.as_ref().map(|u| u.name.as_str()), Some("Jean Dupont"));
        assert_eq!(details[0].resource_name.as_deref(), Some("Indoor1"));
        assert!(details[1].user.is_none());
        assert!(details[1].resource_name.is_none());
    }

    #[tokio::test]
    async fn test_unpaid_bookings_for_day() {
        let f = fixture().await;
        let owing = book(&f.ledger, "p2", "u2", at(2, 14), 21.0).await;
        book(&f.ledger, "p1", "u1", at(2, 10), 0.0).await;
        book(&f.ledger, "p1", "u1", at(3, 10), 40.0).await;

        let unpaid = f.queries.unpaid_bookings(day(2)).await.unwrap();
        assert_eq!(unpaid.bookings.len(), 1);
        assert_eq!(unpaid.bookings[0].booking.id, owing.id);
        assert_eq!(unpaid.total_pending, 21.0);
    }

    #[tokio::test]
    async fn test_client_history_most_recent_first() {
        let f = fixture().await;
        book(&f.ledger, "p1", "u1", at(1, 10), 0.0).await;
        book(&f.ledger, "p1", "u1", at(5, 10), 0.0).await;
        book(&f.ledger, "p2", "u2", at(3, 10), 0.0).await;
        book(&f.ledger, "p2", "u1", at(3, 12), 0.0).await;

        let history = f.queries.client_history("u1").await.unwrap();
        let starts: Vec<_> = history.iter().map(|d| d.booking.start_time).collect();
        assert_eq!(starts, vec![at(5, 10), at(3, 12), at(1, 10)]);
    }

    #[tokio::test]
    async fn test_slot_taken_checks_full_date_and_hour() {
        let f = fixture().await;
        book(&f.ledger, "p1", "u1", at(2, 14), 0.0).await;

        assert!(f.queries.is_slot_taken("p1", day(2), 14).await.unwrap());
        assert!(!f.queries.is_slot_taken("p1", day(2), 15).await.unwrap());
        assert!(!f.queries.is_slot_taken("p1", day(3), 14).await.unwrap());
        assert!(!f.queries.is_slot_taken("p2", day(2), 14).await.unwrap());

        let board = f.queries.resource_availability(day(2), 14).await.unwrap();
        let taken: Vec<_> = board.iter().map(|a| (a.resource.id.as_str(), a.taken)).collect();
        assert_eq!(taken, vec![("p1", true), ("p2", false)]);
    }

    #[tokio::test]
    async fn test_daily_planning_counters() {
        let f = fixture().await;
        let a = book(&f.ledger, "p1", "u1", at(2, 10), 30.0).await;
        book(&f.ledger, "p2", "u2", at(2, 10), 21.5).await;
        book(&f.ledger, "p1", "u1", at(3, 10), 40.0).await;
        f.ledger.update(&a.id, &BookingPatch { checked_in: Some(true), ..Default::default() }).await.unwrap();

        let planning = f.queries.daily_planning(day(2)).await.unwrap();
        assert_eq!(planning.bookings.len(), 2);
        assert_eq!(planning.pending_amount, 51.5);
        assert_eq!(planning.checked_in_count, 1);
    }
}
