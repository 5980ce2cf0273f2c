//! Address book service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;

use crate::domain::{
    addresses::{
        errors::AddressesServiceError,
        models::{Address, AddressUuid},
    },
    users::models::UserUuid,
};

#[derive(Debug, Clone, Default)]
pub struct InMemoryAddressesService {
    addresses: FxHashMap<UserUuid, Vec<Address>>,
}

impl InMemoryAddressesService {
    #[must_use]
    pub fn new(addresses: impl IntoIterator<Item = (UserUuid, Vec<Address>)>) -> Self {
        Self {
            addresses: addresses.into_iter().collect(),
        }
    }
}

#[async_trait]
impl AddressesService for InMemoryAddressesService {
    async fn get_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<Address, AddressesServiceError> {
        self.addresses
            .get(&user)
            .and_then(|addresses| addresses.iter().find(|a| a.uuid == address))
            .cloned()
            .ok_or(AddressesServiceError::NotFound(address))
    }
}

#[automock]
#[async_trait]
pub trait AddressesService: Send + Sync {
    /// Resolve one of the user's saved addresses.
    async fn get_address(
        &self,
        user: UserUuid,
        address: AddressUuid,
    ) -> Result<Address, AddressesServiceError>;
}
