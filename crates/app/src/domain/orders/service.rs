//! Orders service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::{
    domain::{
        addresses::AddressesService,
        carts::CartsService,
        orders::{
            errors::OrdersServiceError,
            models::{NewOrder, Order, OrdersConfig, OrdersSnapshot},
        },
        users::models::UserUuid,
    },
    snapshot::Snapshottable,
};

pub struct InMemoryOrdersService {
    config: OrdersConfig,
    addresses: Arc<dyn AddressesService>,
    carts: Arc<dyn CartsService>,
    orders: RwLock<OrdersSnapshot>,
}

impl InMemoryOrdersService {
    #[must_use]
    pub fn new(
        config: OrdersConfig,
        addresses: Arc<dyn AddressesService>,
        carts: Arc<dyn CartsService>,
    ) -> Self {
        Self::from_snapshot(config, addresses, carts, OrdersSnapshot::new())
    }

    /// Restore orders from a previously taken snapshot.
    #[must_use]
    pub fn from_snapshot(
        config: OrdersConfig,
        addresses: Arc<dyn AddressesService>,
        carts: Arc<dyn CartsService>,
        snapshot: OrdersSnapshot,
    ) -> Self {
        Self {
            config,
            addresses,
            carts,
            orders: RwLock::new(snapshot),
        }
    }
}

#[async_trait]
impl OrdersService for InMemoryOrdersService {
    async fn get_orders(
        &self,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<Order>, OrdersServiceError> {
        // Listing may complete orders, so it takes the write lock: two readers
        // must not both observe and apply the same transition.
        let mut orders = self.orders.write().await;

        let Some(user_orders) = orders.get_mut(&user) else {
            return Ok(Vec::new());
        };

        for order in user_orders.iter_mut() {
            if order.advance(point_in_time, &self.config) {
                debug!(user_uuid = %user, order_uuid = %order.uuid, "order completed");
            }
        }

        let mut listed: Vec<Order> = user_orders.iter().rev().cloned().collect();

        listed.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(listed)
    }

    #[tracing::instrument(
        name = "orders.service.make_order",
        skip_all,
        fields(user_uuid = %user, address_uuid = %order.address),
        err
    )]
    async fn make_order(
        &self,
        user: UserUuid,
        order: NewOrder,
        point_in_time: Timestamp,
    ) -> Result<Order, OrdersServiceError> {
        let address = self.addresses.get_address(user, order.address).await?;

        // Held across checkout so that no reader sees a cleared cart without
        // the order that replaced it. Lock order is always orders -> carts.
        let mut orders = self.orders.write().await;

        let cart = self.carts.checkout(user).await?;

        let placed = Order::place(address, order.payment_method, cart, point_in_time);

        orders.entry(user).or_default().push(placed.clone());

        info!(
            order_uuid = %placed.uuid,
            total_price = placed.total_price,
            total_items = placed.total_items,
            "placed order"
        );

        Ok(placed)
    }
}

#[async_trait]
impl Snapshottable for InMemoryOrdersService {
    const NAME: &'static str = "orders";

    type Snapshot = OrdersSnapshot;

    async fn snapshot(&self) -> OrdersSnapshot {
        self.orders.read().await.clone()
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// List the user's orders, newest first, completing any whose delivery
    /// window has elapsed at `point_in_time`.
    async fn get_orders(
        &self,
        user: UserUuid,
        point_in_time: Timestamp,
    ) -> Result<Vec<Order>, OrdersServiceError>;

    /// Convert the user's cart into a new active order.
    async fn make_order(
        &self,
        user: UserUuid,
        order: NewOrder,
        point_in_time: Timestamp,
    ) -> Result<Order, OrdersServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::SignedDuration;
    use testresult::TestResult;

    use crate::{
        domain::{
            addresses::{MockAddressesService, models::AddressUuid},
            carts::{CartsServiceError, MockCartsService},
            orders::models::{OrderStatus, PaymentMethod},
        },
        test::TestContext,
    };

    use super::*;

    fn new_order(ctx: &TestContext) -> NewOrder {
        NewOrder {
            address: ctx.alice_home.uuid,
            payment_method: PaymentMethod::Card,
        }
    }

    fn at(rfc3339: &str) -> Timestamp {
        rfc3339.parse().unwrap_or_else(|_| Timestamp::UNIX_EPOCH)
    }

    #[tokio::test]
    async fn make_order_copies_cart_totals_and_clears_cart() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        ctx.carts.add_item(ctx.alice, ctx.saffron.uuid).await?;

        let cart = ctx.carts.get_cart(ctx.alice).await?;
        let order = ctx
            .orders
            .make_order(ctx.alice, new_order(&ctx), Timestamp::now())
            .await?;

        assert_eq!(order.status, OrderStatus::Active);
        assert_eq!(order.delivery_date, None);
        assert_eq!(order.address, ctx.alice_home);
        assert_eq!(order.order_price, cart.order_price);
        assert_eq!(order.delivery_price, cart.delivery_price);
        assert_eq!(order.total_price, cart.total_price);
        assert_eq!(order.total_items, 2);
        assert_eq!(order.items.len(), 1, "unavailable items are not ordered");

        assert!(ctx.carts.get_cart(ctx.alice).await?.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn make_order_with_unknown_address_returns_not_found() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;

        let result = ctx
            .orders
            .make_order(
                ctx.alice,
                NewOrder {
                    address: AddressUuid::new(),
                    payment_method: PaymentMethod::Cash,
                },
                Timestamp::now(),
            )
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::AddressNotFound(_))),
            "expected AddressNotFound, got {result:?}"
        );
        assert_eq!(ctx.carts.get_cart(ctx.alice).await?.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn make_order_with_only_unavailable_items_is_rejected() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item(ctx.alice, ctx.saffron.uuid).await?;

        let result = ctx
            .orders
            .make_order(ctx.alice, new_order(&ctx), Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::EmptyCart)),
            "expected EmptyCart, got {result:?}"
        );
        assert_eq!(ctx.carts.get_cart(ctx.alice).await?.items.len(), 1);
        assert!(ctx.orders.get_orders(ctx.alice, Timestamp::now()).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn make_order_does_not_touch_cart_when_address_lookup_fails() -> TestResult {
        let mut addresses = MockAddressesService::new();

        addresses
            .expect_get_address()
            .once()
            .returning(|_, address| {
                Err(crate::domain::addresses::AddressesServiceError::NotFound(address))
            });

        let mut carts = MockCartsService::new();

        carts.expect_checkout().never();
        carts.expect_clear_cart().never();

        let orders = InMemoryOrdersService::new(
            OrdersConfig::default(),
            Arc::new(addresses),
            Arc::new(carts),
        );

        let result = orders
            .make_order(
                UserUuid::new(),
                NewOrder {
                    address: AddressUuid::new(),
                    payment_method: PaymentMethod::Card,
                },
                Timestamp::now(),
            )
            .await;

        assert!(result.is_err(), "expected failure, got {result:?}");

        Ok(())
    }

    #[tokio::test]
    async fn unexpected_cart_failure_is_internal() -> TestResult {
        let ctx = TestContext::new();

        let mut carts = MockCartsService::new();

        carts
            .expect_checkout()
            .once()
            .returning(|_| Err(CartsServiceError::ProductNotFound(Default::default())));

        let orders = InMemoryOrdersService::new(
            OrdersConfig::default(),
            ctx.addresses.clone(),
            Arc::new(carts),
        );

        let result = orders
            .make_order(ctx.alice, new_order(&ctx), Timestamp::now())
            .await;

        assert!(
            matches!(result, Err(OrdersServiceError::Cart(_))),
            "expected Cart error, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn get_orders_for_user_without_orders_is_empty() -> TestResult {
        let ctx = TestContext::new();

        assert!(ctx.orders.get_orders(ctx.bob, Timestamp::now()).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn get_orders_lists_newest_first() -> TestResult {
        let ctx = TestContext::new();
        let first_at = at("2026-03-01T10:00:00Z");
        let second_at = at("2026-03-01T11:00:00Z");

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        let first = ctx.orders.make_order(ctx.alice, new_order(&ctx), first_at).await?;

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        let second = ctx.orders.make_order(ctx.alice, new_order(&ctx), second_at).await?;

        let listed = ctx.orders.get_orders(ctx.alice, second_at).await?;
        let uuids: Vec<_> = listed.iter().map(|order| order.uuid).collect();

        assert_eq!(uuids, vec![second.uuid, first.uuid]);

        Ok(())
    }

    #[tokio::test]
    async fn order_completes_lazily_once_delivery_window_elapses() -> TestResult {
        let ctx = TestContext::new();
        let placed_at = at("2026-03-01T10:00:00Z");
        let window = OrdersConfig::default().delivery_duration;
        let epsilon = SignedDuration::from_secs(1);

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        ctx.orders.make_order(ctx.alice, new_order(&ctx), placed_at).await?;

        let before = ctx
            .orders
            .get_orders(ctx.alice, placed_at.checked_add(window - epsilon)?)
            .await?;

        assert_eq!(before.first().map(|o| o.status), Some(OrderStatus::Active));
        assert_eq!(before.first().and_then(|o| o.delivery_date.clone()), None);

        let after_at = placed_at.checked_add(window + epsilon)?;
        let after = ctx.orders.get_orders(ctx.alice, after_at).await?;

        assert_eq!(after.first().map(|o| o.status), Some(OrderStatus::Completed));
        assert_eq!(
            after.first().and_then(|o| o.delivery_date.clone()).as_deref(),
            Some("2026-03-01 10:15")
        );

        // Reading again, even much later, changes nothing.
        let again = ctx
            .orders
            .get_orders(ctx.alice, after_at.checked_add(SignedDuration::from_hours(48))?)
            .await?;

        assert_eq!(again, after);

        // The transition is persisted, not just rendered.
        let stored = ctx.orders.snapshot().await;

        assert_eq!(
            stored
                .get(&ctx.alice)
                .and_then(|orders| orders.first())
                .map(|o| o.status),
            Some(OrderStatus::Completed)
        );

        Ok(())
    }

    #[tokio::test]
    async fn order_completes_exactly_at_due_time() -> TestResult {
        let ctx = TestContext::new();
        let placed_at = at("2026-03-01T10:00:00Z");
        let window = OrdersConfig::default().delivery_duration;

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        ctx.orders.make_order(ctx.alice, new_order(&ctx), placed_at).await?;

        let listed = ctx
            .orders
            .get_orders(ctx.alice, placed_at.checked_add(window)?)
            .await?;

        assert_eq!(listed.first().map(|o| o.status), Some(OrderStatus::Completed));

        Ok(())
    }

    #[tokio::test]
    async fn placed_order_is_unaffected_by_later_cart_changes() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        let order = ctx
            .orders
            .make_order(ctx.alice, new_order(&ctx), Timestamp::now())
            .await?;

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;

        let listed = ctx.orders.get_orders(ctx.alice, order.created_at).await?;

        assert_eq!(listed, vec![order]);

        Ok(())
    }

    #[tokio::test]
    async fn snapshot_round_trips() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        ctx.orders
            .make_order(ctx.alice, new_order(&ctx), Timestamp::now())
            .await?;

        let snapshot = ctx.orders.snapshot().await;
        let json = serde_json::to_string(&snapshot)?;

        let restored = InMemoryOrdersService::from_snapshot(
            OrdersConfig::default(),
            ctx.addresses.clone(),
            ctx.carts.clone(),
            serde_json::from_str(&json)?,
        );

        assert_eq!(restored.snapshot().await, snapshot);

        Ok(())
    }
}
