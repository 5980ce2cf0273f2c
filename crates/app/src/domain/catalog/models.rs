//! Catalog Models

use serde::{Deserialize, Serialize};

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<Product>;

/// Product Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(rename = "id")]
    pub uuid: ProductUuid,
    pub name: String,
    pub image: String,
    /// Net weight in grams.
    pub weight: u32,
    /// Unit price in minor currency units.
    pub price: u64,
    #[serde(default = "available_by_default")]
    pub available: bool,
}

fn available_by_default() -> bool {
    true
}
