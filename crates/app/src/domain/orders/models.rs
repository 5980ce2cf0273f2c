//! Order Models

use std::collections::BTreeMap;

use jiff::{SignedDuration, Timestamp, tz::TimeZone};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        addresses::models::{Address, AddressUuid},
        carts::models::{Cart, CartItem, DEFAULT_DELIVERY_MINUTES},
        catalog::models::ProductUuid,
        users::models::UserUuid,
    },
    uuids::TypedUuid,
};

/// Format used for the delivery date stamped on completed orders.
pub const DELIVERY_DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Every user's orders in placement order.
pub type OrdersSnapshot = BTreeMap<UserUuid, Vec<Order>>;

/// Order UUID
pub type OrderUuid = TypedUuid<Order>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Active,
    Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    #[default]
    Card,
    Cash,
    Wallet,
}

/// Order Model
///
/// Everything except `status` and `delivery_date` is frozen at checkout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    #[serde(rename = "id")]
    pub uuid: OrderUuid,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_date: Option<String>,
    pub address: Address,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    pub order_price: u64,
    pub delivery_price: u64,
    pub total_price: u64,
    pub total_items: u32,
    pub items: Vec<OrderItem>,
    pub created_at: Timestamp,
}

impl Order {
    pub(crate) fn place(
        address: Address,
        payment_method: PaymentMethod,
        cart: Cart,
        created_at: Timestamp,
    ) -> Self {
        Self {
            uuid: OrderUuid::new(),
            status: OrderStatus::Active,
            delivery_date: None,
            address,
            payment_method,
            order_price: cart.order_price,
            delivery_price: cart.delivery_price,
            total_price: cart.total_price,
            total_items: cart.total_items,
            items: cart.items.into_iter().map(OrderItem::from).collect(),
            created_at,
        }
    }

    /// Moment the delivery window closes.
    pub fn due_at(&self, delivery_duration: SignedDuration) -> Option<Timestamp> {
        self.created_at.checked_add(delivery_duration).ok()
    }

    /// Complete the order if its delivery window has elapsed at
    /// `point_in_time`. Completed orders are never touched again.
    ///
    /// Returns whether the order changed.
    pub(crate) fn advance(&mut self, point_in_time: Timestamp, config: &OrdersConfig) -> bool {
        if self.status == OrderStatus::Completed {
            return false;
        }

        let Some(due_at) = self.due_at(config.delivery_duration) else {
            return false;
        };

        if point_in_time < due_at {
            return false;
        }

        self.status = OrderStatus::Completed;
        self.delivery_date = Some(
            due_at
                .to_zoned(config.time_zone.clone())
                .strftime(DELIVERY_DATE_FORMAT)
                .to_string(),
        );

        true
    }
}

/// Frozen copy of a cart line at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    #[serde(rename = "id")]
    pub product_uuid: ProductUuid,
    pub image: String,
    pub name: String,
    pub weight: u32,
    pub price: u64,
    pub quantity: u32,
}

impl From<CartItem> for OrderItem {
    fn from(item: CartItem) -> Self {
        Self {
            product_uuid: item.product_uuid,
            image: item.image,
            name: item.name,
            weight: item.weight,
            price: item.price,
            quantity: item.quantity,
        }
    }
}

/// New Order Data
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewOrder {
    pub address: AddressUuid,
    pub payment_method: PaymentMethod,
}

/// Order lifecycle settings.
#[derive(Debug, Clone)]
pub struct OrdersConfig {
    /// Time between placement and completion.
    pub delivery_duration: SignedDuration,

    /// Zone used to render delivery dates.
    pub time_zone: TimeZone,
}

impl Default for OrdersConfig {
    fn default() -> Self {
        Self {
            delivery_duration: SignedDuration::from_mins(i64::from(DEFAULT_DELIVERY_MINUTES)),
            time_zone: TimeZone::UTC,
        }
    }
}
