use crate::domain::models::{booking::Booking, resource::Resource, user::{Role, User}};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

#[async_trait]
pub trait ResourceRepository: Send + Sync {
    async fn create(&self, resource: &Resource) -> Result<Resource, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Resource>, AppError>;
    async fn list(&self) -> Result<Vec<Resource>, AppError>;
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create(&self, user: &User) -> Result<User, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError>;
    /// Case-insensitive lookup.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn list(&self) -> Result<Vec<User>, AppError>;
    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, AppError>;
}

pub type BookingChange<'a> = dyn Fn(&Booking) -> Result<Booking, AppError> + Send + Sync + 'a;

#[async_trait]
pub trait BookingRepository: Send + Sync {
    /// Persists `booking` only if no confirmed booking on the same resource
    /// overlaps its [start, end) interval. The check and the write are one
    /// atomic step; fails with `AppError::Collision` otherwise.
    async fn create_if_free(&self, booking: &Booking) -> Result<Booking, AppError>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError>;
    async fn list_all(&self) -> Result<Vec<Booking>, AppError>;
    /// Bookings (any status) whose start lies in [start, end).
    async fn list_starting_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError>;
    async fn list_for_resource_between(&self, resource_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError>;
    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError>;
    /// Reads the stored booking, passes it to `change` and writes the result
    /// back, with no other write to that booking in between. Fails with
    /// `AppError::NotFound` if absent; an error from `change` aborts the write.
    async fn modify(&self, id: &str, change: &BookingChange<'_>) -> Result<Booking, AppError>;
}
