//! Error types for the `hello-env` demo.
use thiserror::Error;

/// Errors raised by the demo after configuration has been resolved.
#[derive(Debug, Error)]
pub enum HelloEnvError {
    /// Resolved options failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Writing the greeting failed.
    #[error("failed to write greeting: {0}")]
    Output(#[from] std::io::Error),
}

/// Validation issues detected in resolved options.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// The recipient collapsed to nothing after trimming.
    #[error("recipient must contain visible characters")]
    BlankRecipient,
    /// The salutation collapsed to nothing after trimming.
    #[error("salutation must contain visible characters")]
    BlankSalutation,
    /// Mutually exclusive delivery modes were enabled simultaneously.
    #[error("cannot combine --is-excited with --is-quiet")]
    ConflictingDeliveryModes,
}

/// Convenience alias for demo results.
pub type Result<T, E = HelloEnvError> = std::result::Result<T, E>;
