//! Test Helpers

use crate::domain::{
    addresses::models::{Address, AddressUuid},
    catalog::models::{Product, ProductUuid},
    users::models::UserProfile,
    wallet::models::{Account, AccountKind, AccountUuid},
};

pub(crate) fn product(name: &str, price: u64, available: bool) -> Product {
    Product {
        uuid: ProductUuid::new(),
        name: name.to_string(),
        image: format!("{}.png", name.to_lowercase()),
        weight: 500,
        price,
        available,
    }
}

pub(crate) fn profile(phone: &str) -> UserProfile {
    UserProfile {
        phone: phone.to_string(),
        name: String::new(),
        birthday: String::new(),
        image: String::new(),
    }
}

/// An address whose coordinates survive a JSON round trip exactly.
pub(crate) fn address(line: &str) -> Address {
    Address {
        uuid: AddressUuid::new(),
        coordinates: [37.5, 55.75],
        address_line: line.to_string(),
        floor: "3".to_string(),
        entrance: "1".to_string(),
        intercom_code: String::new(),
        comment: String::new(),
    }
}

pub(crate) fn account(kind: AccountKind, balance: u64) -> Account {
    Account {
        uuid: AccountUuid::new(),
        kind,
        balance,
    }
}
