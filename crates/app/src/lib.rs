//! Transactional core of the eats commerce backend: carts, orders and
//! wallets over in-memory state with file-backed snapshots.

pub mod backup;
pub mod context;
pub mod domain;
pub mod errors;
pub mod snapshot;
pub mod uuids;

#[cfg(test)]
mod test;
