//! Catalog service errors.

use thiserror::Error;

use crate::{
    domain::catalog::models::ProductUuid,
    errors::{Classify, ErrorKind},
};

#[derive(Debug, Error)]
pub enum CatalogServiceError {
    #[error("product {0} not found")]
    NotFound(ProductUuid),
}

impl Classify for CatalogServiceError {
    fn kind(&self) -> ErrorKind {
        match self {
            Self::NotFound(_) => ErrorKind::NotFound,
        }
    }
}
