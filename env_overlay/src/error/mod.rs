//! Error types produced while overlaying environment values.

mod failures;
mod types;

pub use failures::OverrideFailures;
pub use types::{CoercionFailure, OverlayError, OverlayResult};

#[cfg(test)]
mod tests;
