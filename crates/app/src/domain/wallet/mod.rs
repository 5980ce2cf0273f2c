//! Wallet

pub mod errors;
pub mod models;
pub mod service;

pub use errors::WalletServiceError;
pub use service::*;
