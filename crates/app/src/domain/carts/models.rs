//! Cart Models

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{catalog::models::ProductUuid, users::models::UserUuid};

/// Every user's cart lines, keyed by product.
pub type CartsSnapshot = BTreeMap<UserUuid, BTreeMap<ProductUuid, CartLine>>;

/// Desired quantity of one product. Never stored with a zero quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    #[serde(rename = "id")]
    pub product_uuid: ProductUuid,
    pub quantity: u32,
}

/// Priced view of a user's cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    /// Expected delivery time in minutes.
    #[serde(rename = "deliveryTime")]
    pub delivery_minutes: u32,
    pub order_price: u64,
    pub delivery_price: u64,
    pub total_price: u64,
    pub total_items: u32,
    pub items: Vec<CartItem>,
}

impl Cart {
    pub(crate) fn empty(config: &CartsConfig) -> Self {
        Self {
            delivery_minutes: config.delivery_minutes,
            order_price: 0,
            delivery_price: config.delivery_price,
            total_price: config.delivery_price,
            total_items: 0,
            items: Vec::new(),
        }
    }

    /// Append a line, counting it toward the totals only when available.
    pub(crate) fn push(&mut self, item: CartItem) {
        if item.available {
            self.order_price = self.order_price.saturating_add(item.line_price());
            self.total_items = self.total_items.saturating_add(item.quantity);
            self.total_price = self.order_price.saturating_add(self.delivery_price);
        }

        self.items.push(item);
    }

    /// Whether any line can actually be ordered.
    pub fn has_available_items(&self) -> bool {
        self.items.iter().any(|item| item.available)
    }

    /// Drop lines that are currently unavailable.
    #[must_use]
    pub fn into_available(self) -> Self {
        let mut cart = Self {
            items: Vec::with_capacity(self.items.len()),
            order_price: 0,
            total_price: self.delivery_price,
            total_items: 0,
            ..self
        };

        for item in self.items.into_iter().filter(|item| item.available) {
            cart.push(item);
        }

        cart
    }
}

/// Cart line joined with the catalog's current product attributes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    #[serde(rename = "id")]
    pub product_uuid: ProductUuid,
    pub image: String,
    pub name: String,
    pub weight: u32,
    pub price: u64,
    pub quantity: u32,
    pub available: bool,
}

impl CartItem {
    pub fn line_price(&self) -> u64 {
        self.price.saturating_mul(u64::from(self.quantity))
    }
}

/// Flat delivery charge applied when no other price is configured.
pub const DEFAULT_DELIVERY_PRICE: u64 = 150;

pub const DEFAULT_DELIVERY_MINUTES: u32 = 15;

/// Cart pricing settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartsConfig {
    /// Flat delivery charge in minor currency units.
    pub delivery_price: u64,

    /// Delivery time quoted to the customer, in minutes.
    pub delivery_minutes: u32,
}

impl Default for CartsConfig {
    fn default() -> Self {
        Self {
            delivery_price: DEFAULT_DELIVERY_PRICE,
            delivery_minutes: DEFAULT_DELIVERY_MINUTES,
        }
    }
}
