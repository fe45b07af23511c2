//! Environment-variable overrides layered onto a `clap` command line.
//!
//! Values resolve with the precedence **explicit CLI flag > environment
//! variable > registered default**. Environment keys are derived from a
//! program identifier and each option's long name:
//!
//! ```
//! use env_overlay::Prefix;
//!
//! let prefix = Prefix::derive("my-app");
//! assert_eq!(prefix.env_key("max-retries"), "MY_APP_MAX_RETRIES");
//! ```
//!
//! [`EnvOverlay`] wires the pieces together: it registers the `--version`
//! and `--dump-env` meta flags, short-circuits the dump before argument
//! parsing, and applies the overlay exactly once per context.
//!
//! ```rust,no_run
//! use clap::{Arg, Command};
//! use env_overlay::EnvOverlay;
//!
//! let overlay = EnvOverlay::new("myapp", "1.0.0");
//! let command = Command::new("myapp").arg(
//!     Arg::new("max-retries")
//!         .long("max-retries")
//!         .value_parser(clap::value_parser!(u32))
//!         .default_value("3"),
//! );
//! let matches = overlay.parse(command);
//! let retries = matches.get_one::<u32>("max-retries").copied();
//! # let _ = retries;
//! ```

mod driver;
mod env;
mod error;
mod options;
mod overlay;
mod prefix;

pub use driver::{EnvOverlay, OverlaySettings, ParseOutcome};
pub use env::{EnvSource, MapEnv, ProcessEnv};
pub use error::{CoercionFailure, OverlayError, OverlayResult, OverrideFailures};
pub use options::{ClapOptions, DumpExclusions, OptionEntry, OptionSet, describe};
pub use overlay::{AppliedOverride, DefaultLines, apply_env_overrides, render_defaults, should_skip_in_dump};
pub use prefix::Prefix;
