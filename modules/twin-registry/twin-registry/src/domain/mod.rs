//! Domain layer: business rules, repository ports and services.
//!
//! The domain layer works with SDK contract types as its models and reaches
//! storage only through the traits in [`repos`].

pub mod error;
pub mod repos;
pub mod service;
