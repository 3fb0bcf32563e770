//! Canonical forms for contact fields.
//!
//! Every normalizer is total: malformed input yields `None` (an absent value)
//! rather than an error, and feeding a normalized value back in returns it
//! unchanged.

pub mod address;
pub mod email;
pub mod name;
pub mod phone;

pub use address::{normalize_address, normalize_address_parts};
pub use email::normalize_email;
pub use name::{normalize_full_name, normalize_name};
pub use phone::normalize_phone;

/// Split on whitespace and re-join with single spaces.
/// Returns `None` when nothing is left.
pub(crate) fn collapse_whitespace(raw: &str) -> Option<String> {
    let joined = raw.split_whitespace().collect::<Vec<_>>().join(" ");
    if joined.is_empty() {
        None
    } else {
        Some(joined)
    }
}
