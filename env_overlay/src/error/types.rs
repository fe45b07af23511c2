//! Primary error enum for overlay flows.

use thiserror::Error;

use super::failures::OverrideFailures;

/// Underlying failure reported when a raw string cannot be converted into
/// an option's type.
pub type CoercionFailure = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used throughout the crate.
pub type OverlayResult<T> = Result<T, OverlayError>;

/// Errors raised while parsing arguments or applying environment overrides.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OverlayError {
    /// Error parsing command-line arguments, including help and version
    /// display requests surfaced by `clap`.
    #[error("failed to parse command-line arguments: {0}")]
    CliParsing(#[from] Box<clap::Error>),

    /// An environment value could not be converted to the option's type.
    #[error("invalid value {value:?} for {key}: {source}")]
    Coercion {
        /// Environment key that supplied the value.
        key: String,
        /// Option the value was destined for.
        option: String,
        /// Raw value read from the environment.
        value: String,
        /// Conversion error reported by the option set.
        #[source]
        source: CoercionFailure,
    },

    /// An environment value was not valid UTF-8.
    #[error("environment variable {key} is not valid UTF-8")]
    NonUnicode {
        /// Environment key holding the invalid value.
        key: String,
    },

    /// The option set does not know an option with this name.
    #[error("unknown option '{name}'")]
    UnknownOption {
        /// Name that failed to resolve.
        name: String,
    },

    /// Writing dump or version output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] std::io::Error),

    /// Several environment values were rejected in one pass.
    #[error("multiple environment override errors:\n{0}")]
    Aggregate(OverrideFailures),
}

impl From<clap::Error> for OverlayError {
    fn from(err: clap::Error) -> Self {
        Self::CliParsing(Box::new(err))
    }
}

impl OverlayError {
    /// Construct a coercion error for `option` fed from `key`.
    ///
    /// # Examples
    ///
    /// ```
    /// use env_overlay::OverlayError;
    /// let source = "abc".parse::<u32>().unwrap_err();
    /// let e = OverlayError::coercion("MYAPP_MAX_RETRIES", "max-retries", "abc", source);
    /// assert_eq!(
    ///     e.to_string(),
    ///     "invalid value \"abc\" for MYAPP_MAX_RETRIES: invalid digit found in string",
    /// );
    /// ```
    #[must_use]
    pub fn coercion(
        key: impl Into<String>,
        option: impl Into<String>,
        value: impl Into<String>,
        source: impl Into<CoercionFailure>,
    ) -> Self {
        Self::Coercion {
            key: key.into(),
            option: option.into(),
            value: value.into(),
            source: source.into(),
        }
    }
}
