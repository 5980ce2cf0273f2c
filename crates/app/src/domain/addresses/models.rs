//! Address Models

use serde::{Deserialize, Serialize};

use crate::uuids::TypedUuid;

/// Address UUID
pub type AddressUuid = TypedUuid<Address>;

/// Address Model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(rename = "id")]
    pub uuid: AddressUuid,
    /// `[longitude, latitude]`
    pub coordinates: [f64; 2],
    pub address_line: String,
    #[serde(default)]
    pub floor: String,
    #[serde(default)]
    pub entrance: String,
    #[serde(default)]
    pub intercom_code: String,
    #[serde(default)]
    pub comment: String,
}
