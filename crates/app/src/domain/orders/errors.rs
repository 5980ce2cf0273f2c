//! Orders service errors.

use thiserror::Error;

use crate::{
    domain::{
        addresses::{AddressesServiceError, models::AddressUuid},
        carts::CartsServiceError,
    },
    errors::{Classify, ErrorKind},
};

#[derive(Debug, Error)]
pub enum OrdersServiceError {
    #[error("address {0} not found")]
    AddressNotFound(AddressUuid),

    #[error("cannot place an order without available items")]
    EmptyCart,

    #[error("failed to read cart")]
    Cart(#[source] CartsServiceError),
}

impl From<AddressesServiceError> for OrdersServiceError {
    fn from(error: AddressesServiceError) -> Self {
        match error {
            AddressesServiceError::NotFound(address) => Self::AddressNotFound(address),
        }
    }
}

impl From<CartsServiceError> for OrdersServiceError {
    fn from(error: CartsServiceError) -> Self {
        match error {
            CartsServiceError::Empty => Self::EmptyCart,
            CartsServiceError::ProductNotFound(_) => Self::Cart(error),
        }
    }
}

impl Classify for OrdersServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::AddressNotFound(_) => ErrorKind::NotFound,
            Self::EmptyCart => ErrorKind::BadRequest,
            Self::Cart(_) => ErrorKind::InternalServer,
        }
    }
}
