//! Test helpers shared across crates.
//!
//! Currently provides guards for mutating process environment variables.

pub mod env;
