pub mod customer_repo;
pub use customer_repo::{CustomerRepository, CustomerStore};
pub mod user_repo;
pub use user_repo::{UserRepository, UserStore};

#[cfg(test)]
pub mod memory;
