pub mod sqlite_booking_repo;
pub mod sqlite_resource_repo;
pub mod sqlite_user_repo;

pub mod memory_repo;
