pub mod admin_queries;
pub mod booking_service;
pub mod directory;
pub mod ledger;
pub mod reconciliation;
pub mod schedule;
pub mod seed;
pub mod slots;
