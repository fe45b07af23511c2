//! Library facade for the `hello-env` demo so tests can reuse its types.

pub mod cli;
pub mod error;
pub mod message;
