//! Greeting planning and rendering.
use std::io::{self, Write};

use crate::cli::{DeliveryMode, GreetCli};
use crate::error::ValidationError;

/// Computed greeting ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GreetingPlan {
    message: String,
    repeat: u8,
}

impl GreetingPlan {
    /// Returns the formatted greeting message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns how many times the greeting is printed.
    #[must_use]
    pub const fn repeat(&self) -> u8 {
        self.repeat
    }
}

/// Builds a [`GreetingPlan`] from resolved options.
///
/// # Errors
///
/// Returns a [`ValidationError`] when the options are inconsistent.
///
/// # Examples
///
/// ```rust
/// use hello_env::cli::GreetCli;
/// use hello_env::message::build_plan;
///
/// let cli = GreetCli { recipient: "Ada".into(), ..GreetCli::default() };
/// let plan = build_plan(&cli).expect("valid options");
/// assert_eq!(plan.message(), "Hello, Ada!");
/// ```
pub fn build_plan(cli: &GreetCli) -> Result<GreetingPlan, ValidationError> {
    cli.validate()?;
    let base = format!("{}, {}", cli.salutation.trim(), cli.recipient.trim());
    let punctuation = cli.punctuation.trim();
    let message = match cli.delivery_mode() {
        DeliveryMode::Standard => format!("{base}{punctuation}"),
        DeliveryMode::Enthusiastic => format!("{}{punctuation}", base.to_uppercase()),
        DeliveryMode::Quiet => format!("{base}..."),
    };
    Ok(GreetingPlan {
        message,
        repeat: cli.repeat,
    })
}

/// Writes the greeting to `out`, once per repetition.
///
/// # Errors
///
/// Returns an [`io::Error`] when writing fails.
pub fn write_plan_to<W: Write>(out: &mut W, plan: &GreetingPlan) -> io::Result<()> {
    for _ in 0..plan.repeat {
        writeln!(out, "{}", plan.message)?;
    }
    out.flush()
}

/// Prints the greeting to standard output.
///
/// # Errors
///
/// Returns an [`io::Error`] when writing to standard output fails.
pub fn print_plan(plan: &GreetingPlan) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    write_plan_to(&mut stdout, plan)
}
