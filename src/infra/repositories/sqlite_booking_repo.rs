use crate::domain::{models::booking::Booking, ports::{BookingChange, BookingRepository}};
use crate::error::AppError;
use async_trait::async_trait;
use sqlx::SqlitePool;
use chrono::{DateTime, Utc};

pub struct SqliteBookingRepo {
    pool: SqlitePool,
}

impl SqliteBookingRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BookingRepository for SqliteBookingRepo {
    async fn create_if_free(&self, booking: &Booking) -> Result<Booking, AppError> {
        // Single statement: the overlap check and the insert cannot interleave
        // with another writer.
        let created = sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (id, resource_id, user_id, start_time, end_time, status, payment_status, amount_due, checked_in, paid_seats, rackets, created_at)
             SELECT ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?
             WHERE NOT EXISTS (
                 SELECT 1 FROM bookings
                 WHERE resource_id = ? AND status = 'confirmed' AND start_time < ? AND end_time > ?
             )
             RETURNING *"
        )
            .bind(&booking.id).bind(&booking.resource_id).bind(&booking.user_id)
            .bind(booking.start_time).bind(booking.end_time).bind(booking.status).bind(booking.payment_status)
            .bind(booking.amount_due).bind(booking.checked_in).bind(booking.paid_seats).bind(booking.rackets)
            .bind(booking.created_at)
            .bind(&booking.resource_id).bind(booking.end_time).bind(booking.start_time)
            .fetch_optional(&self.pool).await.map_err(AppError::Database)?;

        created.ok_or_else(|| AppError::Collision("This slot has just been booked by someone else".into()))
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?").bind(id).fetch_optional(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings ORDER BY start_time ASC, resource_id ASC").fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_starting_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE start_time >= ? AND start_time < ? ORDER BY start_time ASC, resource_id ASC")
            .bind(start).bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_for_resource_between(&self, resource_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE resource_id = ? AND start_time >= ? AND start_time < ? ORDER BY start_time ASC")
            .bind(resource_id).bind(start).bind(end)
            .fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE user_id = ? ORDER BY start_time ASC").bind(user_id).fetch_all(&self.pool).await.map_err(AppError::Database)
    }

    async fn modify(&self, id: &str, change: &BookingChange<'_>) -> Result<Booking, AppError> {
        let mut tx = self.pool.begin().await.map_err(AppError::Database)?;

        // Take the write lock before reading so a concurrent modify waits
        // instead of working from a stale row.
        let claimed = sqlx::query("UPDATE bookings SET id = id WHERE id = ?")
            .bind(id)
            .execute(&mut *tx).await.map_err(AppError::Database)?;
        if claimed.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Booking {} not found", id)));
        }

        let current = sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;
        let next = change(&current)?;

        let updated = sqlx::query_as::<_, Booking>(
            "UPDATE bookings SET status=?, payment_status=?, amount_due=?, checked_in=?, paid_seats=?, rackets=?
             WHERE id=?
             RETURNING *"
        )
            .bind(next.status).bind(next.payment_status).bind(next.amount_due)
            .bind(next.checked_in).bind(next.paid_seats).bind(next.rackets)
            .bind(id)
            .fetch_one(&mut *tx).await.map_err(AppError::Database)?;

        tx.commit().await.map_err(AppError::Database)?;
        Ok(updated)
    }
}
