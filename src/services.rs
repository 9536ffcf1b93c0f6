pub mod auth;
pub mod customer_service;
pub mod export_service;
pub mod identity;
pub mod mailer;
