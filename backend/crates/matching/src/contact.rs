use serde::{Deserialize, Serialize};

use crate::normalize::{
    normalize_address_parts, normalize_email, normalize_full_name, normalize_phone,
};

/// A contact as read from the store, before any normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactRecord {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address_line_1: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
}

impl ContactRecord {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }
}

/// Comparable canonical form of a [`ContactRecord`]. `None` means absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedContact {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl NormalizedContact {
    pub fn from_record(record: &ContactRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: normalize_full_name(record.first_name.as_deref(), record.last_name.as_deref()),
            email: record.email.as_deref().and_then(normalize_email),
            phone: record.phone.as_deref().and_then(normalize_phone),
            address: normalize_address_parts(
                record.address_line_1.as_deref(),
                record.city.as_deref(),
                record.state.as_deref(),
                record.postal_code.as_deref(),
            ),
        }
    }

    /// True when at least one field survived normalization.
    pub fn has_comparable_fields(&self) -> bool {
        self.name.is_some() || self.email.is_some() || self.phone.is_some() || self.address.is_some()
    }
}

impl From<&ContactRecord> for NormalizedContact {
    fn from(record: &ContactRecord) -> Self {
        Self::from_record(record)
    }
}
