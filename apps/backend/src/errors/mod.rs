//! Error handling for the coffee shop backend.

pub mod domain;

pub use domain::DomainError;
