pub mod auth;
pub mod customer;
