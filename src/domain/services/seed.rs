use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use tracing::{info, warn};

use crate::domain::models::booking::{Booking, NewBookingParams, PaymentStatus};
use crate::domain::models::resource::{Resource, ResourceCategory};
use crate::domain::models::user::{Role, User};
use crate::domain::ports::{BookingRepository, ResourceRepository, UserRepository};
use crate::domain::services::reconciliation::SEAT_COUNT;
use crate::domain::services::schedule::{local_date, slot_bounds};
use crate::error::AppError;

pub const COURT_PRICE: f64 = 40.0;

fn catalog() -> Vec<Resource> {
    vec![
        Resource::new("p1", "Indoor1", ResourceCategory::Indoor, COURT_PRICE, Some("🏆")),
        Resource::new("p2", "Indoor2", ResourceCategory::Indoor, COURT_PRICE, Some("🎾")),
        Resource::new("p3", "Indoor3", ResourceCategory::Indoor, COURT_PRICE, Some("🎾")),
        Resource::new("p4", "Indoor4", ResourceCategory::Indoor, COURT_PRICE, Some("☀️")),
        Resource::new("p5", "Indoor5", ResourceCategory::Indoor, COURT_PRICE, Some("☀️")),
    ]
}

fn demo_user(id: &str, name: &str, email: &str, role: Role, phone: &str, avatar: &str) -> User {
    let mut user = User::new(name.to_string(), email.to_string(), role)
        .with_phone(Some(phone.to_string()))
        .with_avatar(Some(avatar.to_string()));
    user.id = id.to_string();
    user
}

fn demo_users() -> Vec<User> {
    vec![
        demo_user("admin1", "Directeur Club", "admin@padel.com", Role::Admin, "06 00 00 00 00", "👔"),
        demo_user("staff1", "Accueil", "staff@padel.com", Role::Staff, "06 11 11 11 11", "🧢"),
        demo_user("u1", "Jean Dupont", "jean@demo.com", Role::Client, "06 12 34 56 78", "Je"),
        demo_user("u2", "Sophie Martin", "sophie@demo.com", Role::Client, "07 98 76 54 32", "So"),
    ]
}

/// Inserts the five courts when the catalog is empty.
pub async fn seed_catalog(resources: &dyn ResourceRepository) -> Result<usize, AppError> {
    if !resources.list().await?.is_empty() {
        return Ok(0);
    }
    let courts = catalog();
    for court in &courts {
        resources.create(court).await?;
    }
    info!(count = courts.len(), "Seeded resource catalog");
    Ok(courts.len())
}

fn demo_booking(
    tz: Tz,
    id: &str,
    resource_id: &str,
    user_id: &str,
    date: NaiveDate,
    hour: u32,
) -> Result<Booking, AppError> {
    let (start, end) = slot_bounds(tz, date, hour)?;
    let mut booking = Booking::new(NewBookingParams {
        resource_id: resource_id.to_string(),
        user_id: user_id.to_string(),
        start,
        end,
        payment_status: PaymentStatus::Pending,
        amount_due: COURT_PRICE,
        paid_seats: 0,
    });
    booking.id = id.to_string();
    Ok(booking)
}

/// Demo accounts plus two bookings for today. Safe to run on every start.
pub async fn seed_demo_data(
    tz: Tz,
    users: &dyn UserRepository,
    bookings: &dyn BookingRepository,
) -> Result<(), AppError> {
    for user in demo_users() {
        if users.find_by_id(&user.id).await?.is_none() {
            users.create(&user).await?;
        }
    }

    let today = local_date(tz, Utc::now());
    let mut paid = demo_booking(tz, "b1", "p1", "u1", today, 10)?;
    paid.payment_status = PaymentStatus::Paid;
    paid.amount_due = 0.0;
    paid.paid_seats = SEAT_COUNT;
    paid.checked_in = true;

    let mut partial = demo_booking(tz, "b2", "p2", "u2", today, 14)?;
    partial.payment_status = PaymentStatus::Partial;
    partial.amount_due = 21.0;
    partial.paid_seats = 1;

    for booking in [paid, partial] {
        if bookings.find_by_id(&booking.id).await?.is_some() {
            continue;
        }
        match bookings.create_if_free(&booking).await {
            Ok(_) => info!(booking_id = %booking.id, "Seeded demo booking"),
            Err(AppError::Collision(_)) => warn!(booking_id = %booking.id, "Demo booking slot already taken, skipping"),
            Err(e) => return Err(e),
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::memory_repo::{MemoryBookingRepo, MemoryResourceRepo, MemoryUserRepo};

    #[tokio::test]
    async fn test_catalog_seeded_once() {
        let repo = MemoryResourceRepo::default();
        assert_eq!(seed_catalog(&repo).await.unwrap(), 5);
        assert_eq!(seed_catalog(&repo).await.unwrap(), 0);

        let courts = repo.list().await.unwrap();
        let ids: Vec<_> = courts.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p2", "p3", "p4", "p5"]);
        assert!(courts.iter().all(|r| r.price_per_hour == COURT_PRICE));
    }

    #[tokio::test]
    async fn test_demo_data_is_idempotent() {
        let users = MemoryUserRepo::default();
        let bookings = MemoryBookingRepo::default();
        seed_demo_data(chrono_tz::UTC, &users, &bookings).await.unwrap();
        seed_demo_data(chrono_tz::UTC, &users, &bookings).await.unwrap();

        assert_eq!(users.list().await.unwrap().len(), 4);
        let all = bookings.list_all().await.unwrap();
        assert_eq!(all.len(), 2);

        let b1 = bookings.find_by_id("b1").await.unwrap().unwrap();
        assert!(b1.checked_in);
        assert_eq!(b1.amount_due, 0.0);
        let b2 = bookings.find_by_id("b2").await.unwrap().unwrap();
        assert_eq!(b2.payment_status, PaymentStatus::Partial);
        assert_eq!(b2.amount_due, 21.0);
    }
}
