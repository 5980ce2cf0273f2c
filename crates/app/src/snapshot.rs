//! Snapshots of in-memory service state.

use async_trait::async_trait;
use serde::{Serialize, de::DeserializeOwned};

/// A stateful component whose whole state can be copied out for backup.
///
/// The returned snapshot is a deep copy taken under the component's read
/// lock, so it is internally consistent and unaffected by later mutations.
/// Each implementor also offers a `from_snapshot` constructor that accepts
/// the same shape back, such that restoring a snapshot and snapshotting
/// again yields an equal value.
#[async_trait]
pub trait Snapshottable: Send + Sync {
    /// Stable name used for the backup file of this component.
    const NAME: &'static str;

    type Snapshot: Serialize + DeserializeOwned + Default + Send;

    async fn snapshot(&self) -> Self::Snapshot;
}
