//! Eats Domain Concerns

pub mod addresses;
pub mod carts;
pub mod catalog;
pub mod orders;
pub mod users;
pub mod wallet;
