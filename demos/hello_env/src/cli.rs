//! Command-line surface of the `hello-env` demo.
//!
//! Every option can also be set through `HELLO_ENV_*` variables; an option
//! given on the command line always wins.

use clap::{Parser, value_parser};

use crate::error::ValidationError;

/// Greets someone, with defaults overridable from the environment.
#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(name = "hello-env")]
pub struct GreetCli {
    /// Who to greet.
    #[arg(long, default_value = "World")]
    pub recipient: String,

    /// Word used to open the greeting.
    #[arg(long, default_value = "Hello")]
    pub salutation: String,

    /// Punctuation closing the greeting.
    #[arg(long, default_value = "!")]
    pub punctuation: String,

    /// Shout the greeting.
    #[arg(long)]
    pub is_excited: bool,

    /// Whisper the greeting.
    #[arg(long)]
    pub is_quiet: bool,

    /// Number of times to repeat the greeting.
    #[arg(long, default_value_t = 1, value_parser = value_parser!(u8).range(1..=5))]
    pub repeat: u8,
}

impl Default for GreetCli {
    fn default() -> Self {
        Self {
            recipient: "World".to_owned(),
            salutation: "Hello".to_owned(),
            punctuation: "!".to_owned(),
            is_excited: false,
            is_quiet: false,
            repeat: 1,
        }
    }
}

/// How the greeting is delivered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    /// Plain greeting.
    Standard,
    /// Uppercase greeting.
    Enthusiastic,
    /// Trailing ellipsis instead of punctuation.
    Quiet,
}

impl GreetCli {
    /// Check the resolved options for contradictions.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] for blank text or conflicting modes.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.recipient.trim().is_empty() {
            return Err(ValidationError::BlankRecipient);
        }
        if self.salutation.trim().is_empty() {
            return Err(ValidationError::BlankSalutation);
        }
        if self.is_excited && self.is_quiet {
            return Err(ValidationError::ConflictingDeliveryModes);
        }
        Ok(())
    }

    /// Delivery mode selected by the flags.
    #[must_use]
    pub const fn delivery_mode(&self) -> DeliveryMode {
        if self.is_excited {
            DeliveryMode::Enthusiastic
        } else if self.is_quiet {
            DeliveryMode::Quiet
        } else {
            DeliveryMode::Standard
        }
    }
}
