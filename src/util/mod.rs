//! Shared utility helpers.

pub mod error;

pub use error::{ClickMatchError, Result as ClickMatchResult};
