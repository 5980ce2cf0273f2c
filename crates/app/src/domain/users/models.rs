//! User Models

use serde::{Deserialize, Serialize};

use crate::uuids::TypedUuid;

/// User UUID, as issued by the identity provider.
pub type UserUuid = TypedUuid<UserProfile>;

/// User Profile Model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    pub phone: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub birthday: String,
    #[serde(default, rename = "imageUri")]
    pub image: String,
}
