//! Application of environment values and rendering of defaults.

use std::fmt;
use std::slice;

use tracing::{debug, warn};

use crate::env::EnvSource;
use crate::error::{OverlayError, OverlayResult, OverrideFailures};
use crate::options::{OptionEntry, OptionSet};
use crate::prefix::Prefix;

/// An environment value that was written into an option.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct AppliedOverride {
    option: String,
    key: String,
}

impl AppliedOverride {
    /// Option that received the value.
    #[must_use]
    pub fn option(&self) -> &str {
        &self.option
    }

    /// Environment key that supplied the value.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }
}

/// Write environment values into every option not set on the command line.
///
/// Each option maps to `prefix.env_key(name)`. Unset and empty variables
/// are skipped, so an empty value can never clear an option. Options marked
/// as explicitly set, or as not accepting environment values, are never
/// touched.
///
/// Every option is visited even after a failure: valid values are still
/// applied and every failure is reported.
///
/// # Errors
///
/// Returns [`OverlayError::Coercion`] or [`OverlayError::NonUnicode`] for a
/// single failure, or [`OverlayError::Aggregate`] holding each failure in
/// enumeration order when several values were rejected.
///
/// # Examples
///
/// ```
/// use clap::{Arg, Command, value_parser};
/// use env_overlay::{ClapOptions, DumpExclusions, MapEnv, Prefix, apply_env_overrides};
///
/// let command = Command::new("myapp").arg(
///     Arg::new("max-retries")
///         .long("max-retries")
///         .value_parser(value_parser!(u32))
///         .default_value("3"),
/// );
/// let mut options =
///     ClapOptions::try_parse_from(command, ["myapp"], DumpExclusions::new()).unwrap();
/// let env = MapEnv::from_iter([("MYAPP_MAX_RETRIES", "7")]);
/// apply_env_overrides(&mut options, &Prefix::derive("myapp"), &env).unwrap();
/// let matches = options.into_matches().unwrap();
/// assert_eq!(matches.get_one::<u32>("max-retries"), Some(&7));
/// ```
pub fn apply_env_overrides<O, E>(
    options: &mut O,
    prefix: &Prefix,
    env: &E,
) -> OverlayResult<Vec<AppliedOverride>>
where
    O: OptionSet + ?Sized,
    E: EnvSource + ?Sized,
{
    let mut applied = Vec::new();
    let mut failures = Vec::new();
    for entry in options.entries() {
        if entry.explicitly_set() {
            continue;
        }
        let key = prefix.env_key(entry.name());
        let Some(raw) = env.get(&key) else {
            continue;
        };
        if raw.is_empty() {
            continue;
        }
        if !entry.accepts_env() {
            debug!(option = entry.name(), key = %key, "environment value ignored for option");
            continue;
        }
        let Ok(value) = raw.into_string() else {
            warn!(key = %key, "ignoring non UTF-8 environment value");
            failures.push(OverlayError::NonUnicode { key });
            continue;
        };
        match options.set(entry.name(), &value) {
            Ok(()) => {
                debug!(option = entry.name(), key = %key, "applied environment override");
                applied.push(AppliedOverride {
                    option: entry.name().to_owned(),
                    key,
                });
            }
            Err(source) => {
                warn!(option = entry.name(), key = %key, "rejected environment override");
                failures.push(OverlayError::coercion(key, entry.name(), value, source));
            }
        }
    }
    OverrideFailures::collapse(failures).map_or(Ok(applied), Err)
}

/// Whether the defaults dump leaves `entry` out.
///
/// Exclusion is an attribute recorded at registration time (see
/// [`DumpExclusions`](crate::DumpExclusions)); the overlay's own meta flags
/// always carry it.
#[must_use]
pub const fn should_skip_in_dump(entry: &OptionEntry) -> bool {
    entry.dump_excluded()
}

/// Lazily render `KEY="default"` for every entry not skipped by the dump.
///
/// Defaults are the registered values, never the current ones, quoted with
/// Rust string escaping. The iterator is cheap to clone and yields the same
/// lines every time for the same entries.
///
/// # Examples
///
/// ```
/// use env_overlay::{OptionEntry, Prefix, render_defaults};
///
/// let entries = [
///     OptionEntry::new("timeout", "30s"),
///     OptionEntry::new("verbose", "false"),
/// ];
/// let prefix = Prefix::verbatim("SVC_");
/// let lines: Vec<_> = render_defaults(&entries, &prefix).collect();
/// assert_eq!(lines, ["SVC_TIMEOUT=\"30s\"", "SVC_VERBOSE=\"false\""]);
/// ```
#[must_use]
pub fn render_defaults<'a>(entries: &'a [OptionEntry], prefix: &'a Prefix) -> DefaultLines<'a> {
    DefaultLines {
        entries: entries.iter(),
        prefix,
    }
}

/// Iterator returned by [`render_defaults`].
#[derive(Clone)]
pub struct DefaultLines<'a> {
    entries: slice::Iter<'a, OptionEntry>,
    prefix: &'a Prefix,
}

impl Iterator for DefaultLines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.entries.find(|entry| !should_skip_in_dump(entry))?;
        Some(format!(
            "{}={:?}",
            self.prefix.env_key(entry.name()),
            entry.default_value()
        ))
    }
}

impl fmt::Debug for DefaultLines<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DefaultLines")
            .field("prefix", &self.prefix)
            .field("remaining", &self.entries.len())
            .finish()
    }
}

#[cfg(test)]
mod tests;
