pub mod error;

pub use error::{RosterError, RosterResult};
