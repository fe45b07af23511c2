//! Views over the option set the overlay writes into.
//!
//! [`OptionSet`] is the seam between the overlay and whichever facility owns
//! option registration and parsing. [`ClapOptions`] implements it for a
//! parsed [`clap::Command`].

mod command;
mod entry;
mod flag;

pub use command::{ClapOptions, describe};
pub use entry::{DumpExclusions, OptionEntry};

use crate::error::CoercionFailure;

/// A registered set of options that environment values can be written into.
pub trait OptionSet {
    /// Snapshot of every option in enumeration order.
    fn entries(&self) -> Vec<OptionEntry>;

    /// Coerce `raw` into the value of the option called `name`.
    ///
    /// Implementations must leave the option untouched when coercion fails.
    ///
    /// # Errors
    ///
    /// Returns the conversion failure when `raw` is not a valid value for
    /// the option, or when no option called `name` exists.
    fn set(&mut self, name: &str, raw: &str) -> Result<(), CoercionFailure>;
}
