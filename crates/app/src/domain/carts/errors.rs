//! Carts service errors.

use thiserror::Error;

use crate::{
    domain::catalog::models::ProductUuid,
    errors::{Classify, ErrorKind},
};

#[derive(Debug, Error)]
pub enum CartsServiceError {
    #[error("product {0} does not exist")]
    ProductNotFound(ProductUuid),

    #[error("cart has no available items")]
    Empty,
}

impl Classify for CartsServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::ProductNotFound(_) => ErrorKind::NotFound,
            Self::Empty => ErrorKind::BadRequest,
        }
    }
}
