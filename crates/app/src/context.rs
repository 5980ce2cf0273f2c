//! App Context

use std::{collections::BTreeMap, sync::Arc};

use thiserror::Error;
use tracing::info;

use crate::{
    backup::{BackupError, FileBackup},
    domain::{
        addresses::{AddressesService, InMemoryAddressesService, models::Address},
        carts::{CartsService, InMemoryCartsService, models::CartsConfig},
        catalog::{CatalogService, InMemoryCatalogService, models::Product},
        orders::{InMemoryOrdersService, OrdersService, models::OrdersConfig},
        users::{
            InMemoryUserDirectory, UserDirectory,
            models::{UserProfile, UserUuid},
        },
        wallet::{InMemoryWalletService, WalletService, models::WalletConfig},
    },
};

/// Seed document holding the product catalog.
pub const PRODUCTS_SEED: &str = "products";

/// Seed document holding every user's saved addresses.
pub const ADDRESSES_SEED: &str = "addresses";

/// Seed document holding user profiles.
pub const USER_PROFILES_SEED: &str = "user_profiles";

#[derive(Debug, Error)]
pub enum AppInitError {
    #[error("failed to restore application state")]
    Backup(#[from] BackupError),
}

/// Per-service settings.
#[derive(Debug, Clone, Default)]
pub struct ServicesConfig {
    pub carts: CartsConfig,
    pub orders: OrdersConfig,
    pub wallet: WalletConfig,
}

/// Live services wired together, plus handles to the stateful ones for
/// writing backups.
#[derive(Clone)]
pub struct AppContext {
    pub catalog: Arc<dyn CatalogService>,
    pub addresses: Arc<dyn AddressesService>,
    pub users: Arc<dyn UserDirectory>,
    pub carts: Arc<dyn CartsService>,
    pub orders: Arc<dyn OrdersService>,
    pub wallet: Arc<dyn WalletService>,
    state: StatefulServices,
}

#[derive(Clone)]
struct StatefulServices {
    carts: Arc<InMemoryCartsService>,
    orders: Arc<InMemoryOrdersService>,
    wallet: Arc<InMemoryWalletService>,
}

impl AppContext {
    /// Build application context from the seed documents and the last
    /// snapshots found in `backup`.
    ///
    /// # Errors
    ///
    /// Returns an error when a present document cannot be read or decoded.
    pub async fn restore(backup: &FileBackup, config: ServicesConfig) -> Result<Self, AppInitError> {
        let products: Vec<Product> = backup.load(PRODUCTS_SEED).await?;
        let addresses: BTreeMap<UserUuid, Vec<Address>> = backup.load(ADDRESSES_SEED).await?;
        let profiles: BTreeMap<UserUuid, UserProfile> = backup.load(USER_PROFILES_SEED).await?;

        info!(
            dir = %backup.dir().display(),
            products = products.len(),
            users = profiles.len(),
            "loaded seed data"
        );

        let catalog = Arc::new(InMemoryCatalogService::new(products));
        let addresses = Arc::new(InMemoryAddressesService::new(addresses));
        let users = Arc::new(InMemoryUserDirectory::new(profiles));

        let carts = Arc::new(InMemoryCartsService::from_snapshot(
            config.carts,
            catalog.clone(),
            backup.restore::<InMemoryCartsService>().await?,
        ));

        let orders = Arc::new(InMemoryOrdersService::from_snapshot(
            config.orders,
            addresses.clone(),
            carts.clone(),
            backup.restore::<InMemoryOrdersService>().await?,
        ));

        let wallet = Arc::new(InMemoryWalletService::from_snapshot(
            config.wallet,
            users.clone(),
            backup.restore::<InMemoryWalletService>().await?,
        ));

        Ok(Self {
            catalog,
            addresses,
            users,
            carts: carts.clone(),
            orders: orders.clone(),
            wallet: wallet.clone(),
            state: StatefulServices {
                carts,
                orders,
                wallet,
            },
        })
    }

    /// Write the snapshots of every stateful service.
    ///
    /// # Errors
    ///
    /// Returns an error when a snapshot cannot be written.
    pub async fn persist(&self, backup: &FileBackup) -> Result<(), BackupError> {
        backup.save(self.state.carts.as_ref()).await?;
        backup.save(self.state.orders.as_ref()).await?;
        backup.save(self.state.wallet.as_ref()).await?;

        Ok(())
    }
}
