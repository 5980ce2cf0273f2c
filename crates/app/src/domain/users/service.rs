//! User directory service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;

use crate::domain::users::{
    errors::UsersServiceError,
    models::{UserProfile, UserUuid},
};

/// Profiles keyed by user, with a reverse phone index.
#[derive(Debug, Clone, Default)]
pub struct InMemoryUserDirectory {
    profiles: FxHashMap<UserUuid, UserProfile>,
    phones: FxHashMap<String, UserUuid>,
}

impl InMemoryUserDirectory {
    #[must_use]
    pub fn new(profiles: impl IntoIterator<Item = (UserUuid, UserProfile)>) -> Self {
        let profiles: FxHashMap<_, _> = profiles.into_iter().collect();

        let phones = profiles
            .iter()
            .map(|(user, profile)| (profile.phone.clone(), *user))
            .collect();

        Self { profiles, phones }
    }
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn find_user_by_phone(&self, phone: &str) -> Option<UserUuid> {
        self.phones.get(phone).copied()
    }

    async fn get_profile(&self, user: UserUuid) -> Result<UserProfile, UsersServiceError> {
        self.profiles
            .get(&user)
            .cloned()
            .ok_or(UsersServiceError::ProfileNotFound(user))
    }
}

#[automock]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Resolve the user owning a phone number.
    async fn find_user_by_phone(&self, phone: &str) -> Option<UserUuid>;

    /// Retrieve a user's profile.
    async fn get_profile(&self, user: UserUuid) -> Result<UserProfile, UsersServiceError>;
}
