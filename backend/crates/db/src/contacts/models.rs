use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContactSnapshotFilter {
    /// Only contacts touched at or after this instant.
    pub updated_since: Option<DateTime<Utc>>,
    pub limit: Option<i64>,
}
