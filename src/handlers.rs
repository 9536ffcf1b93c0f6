pub mod auth;
pub mod customers;
pub mod export;
pub mod mailer;
