pub mod admin;
pub mod auth;
pub mod booking;
pub mod client;
pub mod health;
pub mod resource;
