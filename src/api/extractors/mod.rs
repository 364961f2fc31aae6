pub mod acting_user;
