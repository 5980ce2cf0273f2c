//! Wallet service errors.

use thiserror::Error;

use crate::{
    domain::{users::UsersServiceError, wallet::models::AccountUuid},
    errors::{Classify, ErrorKind},
};

#[derive(Debug, Error)]
pub enum WalletServiceError {
    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("amount is too large")]
    AmountTooLarge,

    #[error("page and page size must be at least 1")]
    InvalidPage,

    #[error("daily top-up limit exceeded ({cap} per day)")]
    DailyLimitExceeded { cap: u64 },

    #[error("account {0} not found")]
    AccountNotFound(AccountUuid),

    #[error("insufficient funds")]
    InsufficientFunds,

    #[error("recipient {0} not found")]
    RecipientNotFound(String),

    #[error("cannot transfer to yourself")]
    SelfTransfer,

    #[error("recipient has no accounts")]
    RecipientHasNoAccounts,

    #[error("failed to resolve sender phone")]
    SenderPhone(#[source] UsersServiceError),
}

impl Classify for WalletServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidAmount
            | Self::AmountTooLarge
            | Self::InvalidPage
            | Self::DailyLimitExceeded { .. }
            | Self::InsufficientFunds
            | Self::SelfTransfer => ErrorKind::BadRequest,
            Self::AccountNotFound(_)
            | Self::RecipientNotFound(_)
            | Self::RecipientHasNoAccounts => ErrorKind::NotFound,
            Self::SenderPhone(_) => ErrorKind::InternalServer,
        }
    }
}
