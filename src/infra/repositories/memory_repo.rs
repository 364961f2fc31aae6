//! Process-local stores. Each collection sits behind one mutex, so the
//! overlap check and the insert in `create_if_free` happen under the same
//! guard, as do the read and the write in `modify`.

use crate::domain::models::{booking::Booking, resource::Resource, user::{Role, User}};
use crate::domain::ports::{BookingChange, BookingRepository, ResourceRepository, UserRepository};
use crate::error::AppError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::Mutex;

#[derive(Default)]
pub struct MemoryResourceRepo {
    resources: Mutex<Vec<Resource>>,
}

#[async_trait]
impl ResourceRepository for MemoryResourceRepo {
    async fn create(&self, resource: &Resource) -> Result<Resource, AppError> {
        let mut resources = self.resources.lock().await;
        if resources.iter().any(|r| r.id == resource.id) {
            return Err(AppError::Conflict(format!("Resource {} already exists", resource.id)));
        }
        resources.push(resource.clone());
        Ok(resource.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Resource>, AppError> {
        Ok(self.resources.lock().await.iter().find(|r| r.id == id).cloned())
    }

    async fn list(&self) -> Result<Vec<Resource>, AppError> {
        let mut resources = self.resources.lock().await.clone();
        resources.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(resources)
    }
}

#[derive(Default)]
pub struct MemoryUserRepo {
    users: Mutex<Vec<User>>,
}

#[async_trait]
impl UserRepository for MemoryUserRepo {
    async fn create(&self, user: &User) -> Result<User, AppError> {
        let mut users = self.users.lock().await;
        let duplicate_email = !user.email.is_empty()
            && users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email));
        if duplicate_email || users.iter().any(|u| u.id == user.id) {
            return Err(AppError::Conflict("User already exists".into()));
        }
        users.push(user.clone());
        Ok(user.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.lock().await.iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        if email.is_empty() {
            return Ok(None);
        }
        Ok(self.users.lock().await.iter().find(|u| u.email.eq_ignore_ascii_case(email)).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, AppError> {
        let mut users = self.users.lock().await.clone();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }

    async fn list_by_role(&self, role: Role) -> Result<Vec<User>, AppError> {
        let mut users: Vec<User> = self.users.lock().await.iter().filter(|u| u.role == role).cloned().collect();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }
}

#[derive(Default)]
pub struct MemoryBookingRepo {
    bookings: Mutex<Vec<Booking>>,
}

fn sorted(mut bookings: Vec<Booking>) -> Vec<Booking> {
    bookings.sort_by(|a, b| a.start_time.cmp(&b.start_time).then_with(|| a.resource_id.cmp(&b.resource_id)));
    bookings
}

#[async_trait]
impl BookingRepository for MemoryBookingRepo {
    async fn create_if_free(&self, booking: &Booking) -> Result<Booking, AppError> {
        let mut bookings = self.bookings.lock().await;
        let collision = bookings.iter().any(|b| {
            b.resource_id == booking.resource_id
                && b.is_confirmed()
                && b.overlaps(booking.start_time, booking.end_time)
        });
        if collision {
            return Err(AppError::Collision("This slot has just been booked by someone else".into()));
        }
        bookings.push(booking.clone());
        Ok(booking.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Booking>, AppError> {
        Ok(self.bookings.lock().await.iter().find(|b| b.id == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<Booking>, AppError> {
        Ok(sorted(self.bookings.lock().await.clone()))
    }

    async fn list_starting_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        let bookings = self.bookings.lock().await;
        Ok(sorted(bookings.iter().filter(|b| b.start_time >= start && b.start_time < end).cloned().collect()))
    }

    async fn list_for_resource_between(&self, resource_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<Vec<Booking>, AppError> {
        let bookings = self.bookings.lock().await;
        Ok(sorted(
            bookings.iter()
                .filter(|b| b.resource_id == resource_id && b.start_time >= start && b.start_time < end)
                .cloned()
                .collect(),
        ))
    }

    async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>, AppError> {
        let bookings = self.bookings.lock().await;
        Ok(sorted(bookings.iter().filter(|b| b.user_id == user_id).cloned().collect()))
    }

    async fn modify(&self, id: &str, change: &BookingChange<'_>) -> Result<Booking, AppError> {
        let mut bookings = self.bookings.lock().await;
        let slot = bookings.iter_mut().find(|b| b.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Booking {} not found", id)))?;
        let next = change(&*slot)?;
        *slot = next.clone();
        Ok(next)
    }
}
