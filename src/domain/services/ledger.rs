use std::sync::Arc;
use chrono::NaiveDate;
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::domain::models::booking::{Booking, BookingPatch, BookingStatus, NewBookingParams};
use crate::domain::ports::BookingRepository;
use crate::domain::services::reconciliation::SEAT_COUNT;
use crate::domain::services::schedule::day_bounds;
use crate::error::AppError;

/// Single source of truth for bookings. Owns the no-overlap rule.
pub struct BookingLedger {
    repo: Arc<dyn BookingRepository>,
    tz: Tz,
}

fn validate_amount(amount_due: f64) -> Result<(), AppError> {
    if !amount_due.is_finite() || amount_due < 0.0 {
        return Err(AppError::Validation(format!("amount_due must be a non-negative number, got {}", amount_due)));
    }
    Ok(())
}

fn validate_patch(current: &Booking, patch: &BookingPatch) -> Result<(), AppError> {
    if let Some(amount_due) = patch.amount_due {
        validate_amount(amount_due)?;
    }
    if let Some(seats) = patch.paid_seats
        && !(0..=SEAT_COUNT).contains(&seats)
    {
        return Err(AppError::Validation(format!("paid_seats must be between 0 and {}", SEAT_COUNT)));
    }
    if patch.rackets.is_some_and(|r| r < 0) {
        return Err(AppError::Validation("rackets cannot be negative".into()));
    }
    if current.checked_in && patch.checked_in == Some(false) {
        return Err(AppError::Validation("A check-in cannot be reverted".into()));
    }
    // A cancelled slot may already belong to someone else.
    if current.status == BookingStatus::Cancelled && patch.status == Some(BookingStatus::Confirmed) {
        return Err(AppError::Validation("A cancelled booking cannot be reactivated, create a new booking instead".into()));
    }
    Ok(())
}

impl BookingLedger {
    pub fn new(repo: Arc<dyn BookingRepository>, tz: Tz) -> Self {
        Self { repo, tz }
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Creates a confirmed, not checked-in booking. Fails with
    /// `AppError::Collision` when a confirmed booking on the same resource
    /// overlaps [start, end); the ledger is left untouched in that case.
    pub async fn create(&self, params: NewBookingParams) -> Result<Booking, AppError> {
        if params.start >= params.end {
            return Err(AppError::Validation("Booking start must be before its end".into()));
        }
        validate_amount(params.amount_due)?;
        if !(0..=SEAT_COUNT).contains(&params.paid_seats) {
            return Err(AppError::Validation(format!("paid_seats must be between 0 and {}", SEAT_COUNT)));
        }

        let booking = Booking::new(params);
        match self.repo.create_if_free(&booking).await {
            Ok(created) => {
                info!(booking_id = %created.id, resource_id = %created.resource_id, "Booking created");
                Ok(created)
            }
            Err(AppError::Collision(msg)) => {
                warn!(resource_id = %booking.resource_id, start = %booking.start_time, "Booking rejected: {}", msg);
                Err(AppError::Collision(msg))
            }
            Err(e) => Err(e),
        }
    }

    /// Shallow merge of `patch` over the stored booking. The no-overlap rule
    /// is not re-checked since start and end cannot be patched and a
    /// cancelled booking cannot come back.
    pub async fn update(&self, id: &str, patch: &BookingPatch) -> Result<Booking, AppError> {
        self.modify(id, |_| Ok(patch.clone())).await
    }

    /// Like `update`, but the patch is computed from the booking as stored at
    /// write time. Concurrent modifications of one booking are serialized.
    pub async fn modify<F>(&self, id: &str, compute: F) -> Result<Booking, AppError>
    where
        F: Fn(&Booking) -> Result<BookingPatch, AppError> + Send + Sync,
    {
        let updated = self.repo.modify(id, &|current: &Booking| -> Result<Booking, AppError> {
            let patch = compute(current)?;
            validate_patch(current, &patch)?;
            let mut next = current.clone();
            next.apply(&patch);
            Ok(next)
        }).await?;
        info!(booking_id = %updated.id, "Booking updated");
        Ok(updated)
    }

    pub async fn find(&self, id: &str) -> Result<Booking, AppError> {
        self.repo.find_by_id(id).await?
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))
    }

    /// Confirmed bookings of one resource starting on `date` (business timezone).
    pub async fn list_for_resource_and_date(&self, resource_id: &str, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        let (start, end) = day_bounds(self.tz, date)?;
        let bookings = self.repo.list_for_resource_between(resource_id, start, end).await?;
        Ok(bookings.into_iter().filter(Booking::is_confirmed).collect())
    }

    /// Every booking starting on `date`, whatever its status.
    pub async fn list_for_date(&self, date: NaiveDate) -> Result<Vec<Booking>, AppError> {
        let (start, end) = day_bounds(self.tz, date)?;
        self.repo.list_starting_between(start, end).await
    }

    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        self.repo.list_by_user(user_id).await
    }

    pub async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        self.repo.list_all().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::booking::PaymentStatus;
    use crate::infra::repositories::memory_repo::MemoryBookingRepo;
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn ledger() -> BookingLedger {
        BookingLedger::new(Arc::new(MemoryBookingRepo::default()), chrono_tz::UTC)
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 6, 2, hour, 0, 0).unwrap()
    }

    fn params(resource_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> NewBookingParams {
        NewBookingParams {
            resource_id: resource_id.into(),
            user_id: "u1".into(),
            start,
            end,
            payment_status: PaymentStatus::Pending,
            amount_due: 40.0,
            paid_seats: 0,
        }
    }

    #[tokio::test]
    async fn test_create_assigns_identity_and_defaults() {
        let ledger = ledger();
        let a = ledger.create(params("p1", at(10), at(11))).await.unwrap();
        let b = ledger.create(params("p1", at(11), at(12))).await.unwrap();

        assert_ne!(a.id, b.id);
        assert_eq!(a.status, BookingStatus::Confirmed);
        assert!(!a.checked_in);
        assert_eq!(ledger.list_all().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_overlap_rejected_and_ledger_unchanged() {
        let ledger = ledger();
        ledger.create(params("p2", at(14), at(15))).await.unwrap();

        let same = ledger.create(params("p2", at(14), at(15))).await;
        assert!(matches!(same, Err(AppError::Collision(_))));

        let straddling = ledger.create(params("p2", at(14) + Duration::minutes(30), at(15) + Duration::minutes(30))).await;
        assert!(matches!(straddling, Err(AppError::Collision(_))));

        let enclosing = ledger.create(params("p2", at(13), at(16))).await;
        assert!(matches!(enclosing, Err(AppError::Collision(_))));

        assert_eq!(ledger.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_touching_intervals_and_other_resources_allowed() {
        let ledger = ledger();
        ledger.create(params("p2", at(14), at(15))).await.unwrap();

        ledger.create(params("p2", at(15), at(16))).await.unwrap();
        ledger.create(params("p2", at(13), at(14))).await.unwrap();
        ledger.create(params("p3", at(14), at(15))).await.unwrap();
        assert_eq!(ledger.list_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_cancelled_booking_frees_the_slot() {
        let ledger = ledger();
        let first = ledger.create(params("p1", at(18), at(19))).await.unwrap();
        ledger.update(&first.id, &BookingPatch { status: Some(BookingStatus::Cancelled), ..Default::default() }).await.unwrap();

        assert!(ledger.create(params("p1", at(18), at(19))).await.is_ok());
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        assert_eq!(ledger.list_for_resource_and_date("p1", date).await.unwrap().len(), 1);
        assert_eq!(ledger.list_for_date(date).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_create_validates_interval_and_amount() {
        let ledger = ledger();
        assert!(matches!(ledger.create(params("p1", at(11), at(11))).await, Err(AppError::Validation(_))));

        let mut negative = params("p1", at(11), at(12));
        negative.amount_due = -1.0;
        assert!(matches!(ledger.create(negative).await, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_update_merges_only_provided_fields() {
        let ledger = ledger();
        let created = ledger.create(params("p1", at(10), at(11))).await.unwrap();

        let updated = ledger.update(&created.id, &BookingPatch { rackets: Some(2), ..Default::default() }).await.unwrap();
        assert_eq!(updated.rackets, 2);
        assert_eq!(updated.amount_due, 40.0);
        assert_eq!(updated.start_time, created.start_time);
        assert_eq!(ledger.find(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_unknown_booking_is_not_found() {
        let ledger = ledger();
        let result = ledger.update("missing", &BookingPatch { checked_in: Some(true), ..Default::default() }).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_update_rejects_out_of_range_fields() {
        let ledger = ledger();
        let created = ledger.create(params("p1", at(10), at(11))).await.unwrap();

        let seats = ledger.update(&created.id, &BookingPatch { paid_seats: Some(5), ..Default::default() }).await;
        assert!(matches!(seats, Err(AppError::Validation(_))));

        ledger.update(&created.id, &BookingPatch { checked_in: Some(true), ..Default::default() }).await.unwrap();
        let revert = ledger.update(&created.id, &BookingPatch { checked_in: Some(false), ..Default::default() }).await;
        assert!(matches!(revert, Err(AppError::Validation(_))));
    }

    #[tokio::test]
    async fn test_cancelled_booking_cannot_be_reactivated() {
        let ledger = ledger();
        let first = ledger.create(params("p1", at(18), at(19))).await.unwrap();
        let cancel = BookingPatch { status: Some(BookingStatus::Cancelled), ..Default::default() };
        ledger.update(&first.id, &cancel).await.unwrap();
        let second = ledger.create(params("p1", at(18), at(19))).await.unwrap();

        let reactivate = BookingPatch { status: Some(BookingStatus::Confirmed), ..Default::default() };
        let result = ledger.update(&first.id, &reactivate).await;
        assert!(matches!(result, Err(AppError::Validation(_))));

        assert_eq!(ledger.find(&first.id).await.unwrap().status, BookingStatus::Cancelled);
        let date = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let confirmed = ledger.list_for_resource_and_date("p1", date).await.unwrap();
        assert_eq!(confirmed.len(), 1);
        assert_eq!(confirmed[0].id, second.id);

        // Cancelling again stays allowed.
        assert!(ledger.update(&first.id, &cancel).await.is_ok());
    }

    #[tokio::test]
    async fn test_modify_sees_latest_stored_state() {
        let ledger = Arc::new(ledger());
        let created = ledger.create(params("p1", at(10), at(11))).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..10 {
            let ledger = ledger.clone();
            let id = created.id.clone();
            handles.push(tokio::spawn(async move {
                ledger.modify(&id, |current| Ok(BookingPatch { rackets: Some(current.rackets + 1), ..Default::default() })).await
            }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }
        assert_eq!(ledger.find(&created.id).await.unwrap().rackets, 10);
    }

    #[tokio::test]
    async fn test_failed_modify_leaves_booking_untouched() {
        let ledger = ledger();
        let created = ledger.create(params("p1", at(10), at(11))).await.unwrap();

        let result = ledger.modify(&created.id, |_| Err(AppError::Validation("nope".into()))).await;
        assert!(matches!(result, Err(AppError::Validation(_))));
        let invalid = ledger.modify(&created.id, |_| Ok(BookingPatch { rackets: Some(-1), ..Default::default() })).await;
        assert!(matches!(invalid, Err(AppError::Validation(_))));

        assert_eq!(ledger.find(&created.id).await.unwrap(), created);
    }
}
