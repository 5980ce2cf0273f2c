//! Address book errors.

use thiserror::Error;

use crate::{
    domain::addresses::models::AddressUuid,
    errors::{Classify, ErrorKind},
};

#[derive(Debug, Error)]
pub enum AddressesServiceError {
    #[error("address {0} not found")]
    NotFound(AddressUuid),
}

impl Classify for AddressesServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }
}
