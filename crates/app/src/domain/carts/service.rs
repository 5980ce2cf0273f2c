//! Carts service.

use std::{collections::BTreeMap, sync::Arc};

use async_trait::async_trait;
use mockall::automock;
use tokio::sync::RwLock;
use tracing::{error, info};

use crate::{
    domain::{
        carts::{
            errors::CartsServiceError,
            models::{Cart, CartItem, CartLine, CartsConfig, CartsSnapshot},
        },
        catalog::{CatalogService, models::ProductUuid},
        users::models::UserUuid,
    },
    snapshot::Snapshottable,
};

pub struct InMemoryCartsService {
    config: CartsConfig,
    catalog: Arc<dyn CatalogService>,
    lines: RwLock<CartsSnapshot>,
}

impl InMemoryCartsService {
    #[must_use]
    pub fn new(config: CartsConfig, catalog: Arc<dyn CatalogService>) -> Self {
        Self::from_snapshot(config, catalog, CartsSnapshot::new())
    }

    /// Restore carts from a previously taken snapshot.
    #[must_use]
    pub fn from_snapshot(
        config: CartsConfig,
        catalog: Arc<dyn CatalogService>,
        snapshot: CartsSnapshot,
    ) -> Self {
        let lines = snapshot
            .into_iter()
            .map(|(user, lines)| {
                let lines: BTreeMap<_, _> = lines
                    .into_iter()
                    .filter(|(_, line)| line.quantity > 0)
                    .collect();

                (user, lines)
            })
            .filter(|(_, lines)| !lines.is_empty())
            .collect();

        Self {
            config,
            catalog,
            lines: RwLock::new(lines),
        }
    }

    /// Join lines with the catalog. Lines whose product cannot be resolved are
    /// logged and left out rather than failing the whole cart.
    async fn price(&self, user: UserUuid, lines: Option<&BTreeMap<ProductUuid, CartLine>>) -> Cart {
        let mut cart = Cart::empty(&self.config);

        for line in lines.into_iter().flat_map(BTreeMap::values) {
            match self.catalog.get_product(line.product_uuid).await {
                Ok(product) => cart.push(CartItem {
                    product_uuid: product.uuid,
                    image: product.image,
                    name: product.name,
                    weight: product.weight,
                    price: product.price,
                    quantity: line.quantity,
                    available: product.available,
                }),
                Err(source) => {
                    error!(user_uuid = %user, "failed to price cart line: {source}");
                }
            }
        }

        cart
    }
}

#[async_trait]
impl CartsService for InMemoryCartsService {
    #[tracing::instrument(
        name = "carts.service.add_item",
        skip_all,
        fields(user_uuid = %user, product_uuid = %product),
        err
    )]
    async fn add_item(&self, user: UserUuid, product: ProductUuid) -> Result<u32, CartsServiceError> {
        if !self.catalog.product_exists(product).await {
            return Err(CartsServiceError::ProductNotFound(product));
        }

        let mut lines = self.lines.write().await;

        let line = lines
            .entry(user)
            .or_default()
            .entry(product)
            .or_insert(CartLine {
                product_uuid: product,
                quantity: 0,
            });

        line.quantity = line.quantity.saturating_add(1);

        Ok(line.quantity)
    }

    #[tracing::instrument(
        name = "carts.service.remove_item",
        skip_all,
        fields(user_uuid = %user, product_uuid = %product),
        err
    )]
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<u32, CartsServiceError> {
        if !self.catalog.product_exists(product).await {
            return Err(CartsServiceError::ProductNotFound(product));
        }

        let mut lines = self.lines.write().await;

        let Some(user_lines) = lines.get_mut(&user) else {
            return Ok(0);
        };

        let Some(line) = user_lines.get_mut(&product) else {
            return Ok(0);
        };

        line.quantity = line.quantity.saturating_sub(1);

        let quantity = line.quantity;

        if quantity == 0 {
            user_lines.remove(&product);

            if user_lines.is_empty() {
                lines.remove(&user);
            }
        }

        Ok(quantity)
    }

    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let lines = self.lines.read().await;

        Ok(self.price(user, lines.get(&user)).await)
    }

    #[tracing::instrument(name = "carts.service.clear_cart", skip_all, fields(user_uuid = %user))]
    async fn clear_cart(&self, user: UserUuid) {
        self.lines.write().await.remove(&user);
    }

    #[tracing::instrument(
        name = "carts.service.checkout",
        skip_all,
        fields(user_uuid = %user),
        err
    )]
    async fn checkout(&self, user: UserUuid) -> Result<Cart, CartsServiceError> {
        let mut lines = self.lines.write().await;

        let cart = self.price(user, lines.get(&user)).await.into_available();

        if !cart.has_available_items() {
            return Err(CartsServiceError::Empty);
        }

        lines.remove(&user);

        info!(total_items = cart.total_items, "checked out cart");

        Ok(cart)
    }
}

#[async_trait]
impl Snapshottable for InMemoryCartsService {
    const NAME: &'static str = "cart_items";

    type Snapshot = CartsSnapshot;

    async fn snapshot(&self) -> CartsSnapshot {
        self.lines.read().await.clone()
    }
}

#[automock]
#[async_trait]
pub trait CartsService: Send + Sync {
    /// Add one unit of a product, returning the new quantity.
    async fn add_item(&self, user: UserUuid, product: ProductUuid) -> Result<u32, CartsServiceError>;

    /// Remove one unit of a product, returning the new quantity. Removing
    /// a product that is not in the cart is a no-op returning zero.
    async fn remove_item(
        &self,
        user: UserUuid,
        product: ProductUuid,
    ) -> Result<u32, CartsServiceError>;

    /// Retrieve the priced cart.
    async fn get_cart(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;

    /// Delete every line of the user's cart.
    async fn clear_cart(&self, user: UserUuid);

    /// Price the cart, keep only available items and clear it, all under one
    /// lock. Fails without touching the cart if nothing is available.
    async fn checkout(&self, user: UserUuid) -> Result<Cart, CartsServiceError>;
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use crate::{
        domain::catalog::{CatalogServiceError, MockCatalogService},
        test::{TestContext, helpers::product},
    };

    use super::*;

    #[tokio::test]
    async fn adding_same_product_increments_quantity() -> TestResult {
        let ctx = TestContext::new();

        assert_eq!(ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?, 1);
        assert_eq!(ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?, 2);

        let cart = ctx.carts.get_cart(ctx.alice).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.total_items, 2);

        Ok(())
    }

    #[tokio::test]
    async fn adding_unknown_product_returns_not_found() {
        let ctx = TestContext::new();

        let result = ctx.carts.add_item(ctx.alice, ProductUuid::new()).await;

        assert!(
            matches!(result, Err(CartsServiceError::ProductNotFound(_))),
            "expected ProductNotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn removing_every_unit_deletes_the_line() -> TestResult {
        let ctx = TestContext::new();

        for _ in 0..3 {
            ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        }

        assert_eq!(ctx.carts.remove_item(ctx.alice, ctx.flour.uuid).await?, 2);
        assert_eq!(ctx.carts.remove_item(ctx.alice, ctx.flour.uuid).await?, 1);
        assert_eq!(ctx.carts.remove_item(ctx.alice, ctx.flour.uuid).await?, 0);

        assert!(ctx.carts.get_cart(ctx.alice).await?.items.is_empty());
        assert!(ctx.carts.snapshot().await.is_empty());

        // Further removal is a no-op.
        assert_eq!(ctx.carts.remove_item(ctx.alice, ctx.flour.uuid).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn removing_product_not_in_cart_returns_zero() -> TestResult {
        let ctx = TestContext::new();

        assert_eq!(ctx.carts.remove_item(ctx.alice, ctx.flour.uuid).await?, 0);

        Ok(())
    }

    #[tokio::test]
    async fn unavailable_items_are_listed_but_not_priced() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        ctx.carts.add_item(ctx.alice, ctx.saffron.uuid).await?;

        let cart = ctx.carts.get_cart(ctx.alice).await?;

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.order_price, ctx.flour.price * 2);
        assert_eq!(cart.total_items, 2);
        assert_eq!(cart.delivery_price, 150);
        assert_eq!(cart.total_price, ctx.flour.price * 2 + 150);

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_still_quotes_delivery() -> TestResult {
        let ctx = TestContext::new();

        let cart = ctx.carts.get_cart(ctx.bob).await?;

        assert!(cart.items.is_empty());
        assert_eq!(cart.order_price, 0);
        assert_eq!(cart.total_price, cart.delivery_price);
        assert_eq!(cart.delivery_minutes, 15);

        Ok(())
    }

    #[tokio::test]
    async fn failed_product_lookup_skips_only_that_line() -> TestResult {
        let good = product("Milk", 90, true);
        let broken = ProductUuid::new();
        let user = UserUuid::new();

        let mut catalog = MockCatalogService::new();

        catalog.expect_product_exists().return_const(true);

        let good_clone = good.clone();

        catalog.expect_get_product().returning(move |uuid| {
            if uuid == good_clone.uuid {
                Ok(good_clone.clone())
            } else {
                Err(CatalogServiceError::NotFound(uuid))
            }
        });

        let carts = InMemoryCartsService::new(CartsConfig::default(), Arc::new(catalog));

        carts.add_item(user, good.uuid).await?;
        carts.add_item(user, broken).await?;

        let cart = carts.get_cart(user).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.order_price, 90);

        Ok(())
    }

    #[tokio::test]
    async fn clear_cart_removes_all_lines() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        ctx.carts.add_item(ctx.alice, ctx.saffron.uuid).await?;
        ctx.carts.add_item(ctx.bob, ctx.flour.uuid).await?;

        ctx.carts.clear_cart(ctx.alice).await;

        assert!(ctx.carts.get_cart(ctx.alice).await?.items.is_empty());
        assert_eq!(ctx.carts.get_cart(ctx.bob).await?.items.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn checkout_returns_available_items_and_clears_cart() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        ctx.carts.add_item(ctx.alice, ctx.saffron.uuid).await?;

        let cart = ctx.carts.checkout(ctx.alice).await?;

        assert_eq!(cart.items.len(), 1);
        assert_eq!(cart.items.first().map(|i| i.product_uuid), Some(ctx.flour.uuid));
        assert_eq!(cart.order_price, ctx.flour.price);
        assert!(ctx.carts.get_cart(ctx.alice).await?.items.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn checkout_with_only_unavailable_items_leaves_cart_untouched() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item(ctx.alice, ctx.saffron.uuid).await?;

        let result = ctx.carts.checkout(ctx.alice).await;

        assert!(
            matches!(result, Err(CartsServiceError::Empty)),
            "expected Empty, got {result:?}"
        );
        assert_eq!(ctx.carts.get_cart(ctx.alice).await?.items.len(), 1);

        Ok(())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_adds_are_not_lost() -> TestResult {
        let ctx = TestContext::new();
        let carts = Arc::clone(&ctx.carts);

        let handles: Vec<_> = (0..50)
            .map(|_| {
                let carts = Arc::clone(&carts);
                let (user, product) = (ctx.alice, ctx.flour.uuid);

                tokio::spawn(async move { carts.add_item(user, product).await })
            })
            .collect();

        for handle in handles {
            handle.await??;
        }

        assert_eq!(ctx.carts.get_cart(ctx.alice).await?.total_items, 50);

        Ok(())
    }

    #[tokio::test]
    async fn snapshot_round_trips() -> TestResult {
        let ctx = TestContext::new();

        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        ctx.carts.add_item(ctx.alice, ctx.flour.uuid).await?;
        ctx.carts.add_item(ctx.bob, ctx.saffron.uuid).await?;

        let snapshot = ctx.carts.snapshot().await;
        let json = serde_json::to_string(&snapshot)?;

        let restored = InMemoryCartsService::from_snapshot(
            CartsConfig::default(),
            ctx.catalog.clone(),
            serde_json::from_str(&json)?,
        );

        assert_eq!(restored.snapshot().await, snapshot);
        assert_eq!(restored.get_cart(ctx.alice).await?.total_items, 2);

        Ok(())
    }
}
