use async_trait::async_trait;
use roster_common::error::RosterResult;
use roster_matching::ContactRecord;

use crate::contacts::models::ContactSnapshotFilter;

#[async_trait]
pub trait ContactRepository: Send + Sync {
    /// Read contacts as one consistent point-in-time snapshot.
    async fn snapshot(&self, filter: ContactSnapshotFilter) -> RosterResult<Vec<ContactRecord>>;
}
