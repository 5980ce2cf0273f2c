//! Addresses

pub mod errors;
pub mod models;
pub mod service;

pub use errors::AddressesServiceError;
pub use service::*;
