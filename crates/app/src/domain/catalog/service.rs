//! Catalog service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;

use crate::domain::catalog::{
    errors::CatalogServiceError,
    models::{Product, ProductUuid},
};

/// Read-only catalog seeded once at start-up.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogService {
    products: FxHashMap<ProductUuid, Product>,
}

impl InMemoryCatalogService {
    #[must_use]
    pub fn new(products: impl IntoIterator<Item = Product>) -> Self {
        Self {
            products: products
                .into_iter()
                .map(|product| (product.uuid, product))
                .collect(),
        }
    }
}

#[async_trait]
impl CatalogService for InMemoryCatalogService {
    async fn product_exists(&self, product: ProductUuid) -> bool {
        self.products.contains_key(&product)
    }

    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError> {
        self.products
            .get(&product)
            .cloned()
            .ok_or(CatalogServiceError::NotFound(product))
    }
}

#[automock]
#[async_trait]
pub trait CatalogService: Send + Sync {
    /// Whether the product is known to the catalog at all.
    async fn product_exists(&self, product: ProductUuid) -> bool;

    /// Retrieve the current attributes of a product.
    async fn get_product(&self, product: ProductUuid) -> Result<Product, CatalogServiceError>;
}
