//! [`OptionSet`] backed by a `clap` command line.

use std::collections::BTreeSet;
use std::ffi::OsString;

use clap::parser::ValueSource;
use clap::{Arg, ArgMatches, Command, Id};
use tracing::debug;

use super::flag::{is_option, option_name, override_tokens, registered_default};
use super::{DumpExclusions, OptionEntry, OptionSet};
use crate::error::{CoercionFailure, OverlayError};

/// List the options registered on `command` without parsing anything.
///
/// Every entry reports `explicitly_set == false`. Positional arguments and
/// `clap`'s built-in help and version actions are not options.
///
/// # Examples
///
/// ```
/// use clap::{Arg, ArgAction, Command};
/// use env_overlay::{DumpExclusions, describe};
///
/// let command = Command::new("svc")
///     .arg(Arg::new("timeout").long("timeout").default_value("30s"))
///     .arg(Arg::new("verbose").long("verbose").action(ArgAction::SetTrue));
/// let entries = describe(&command, &DumpExclusions::new());
/// let defaults: Vec<_> = entries.iter().map(|e| e.default_value()).collect();
/// assert_eq!(defaults, ["30s", "false"]);
/// ```
#[must_use]
pub fn describe(command: &Command, exclusions: &DumpExclusions) -> Vec<OptionEntry> {
    let mut built = command.clone();
    built.build();
    built
        .get_arguments()
        .filter(|arg| is_option(arg))
        .map(|arg| base_entry(arg, exclusions))
        .collect()
}

fn base_entry(arg: &Arg, exclusions: &DumpExclusions) -> OptionEntry {
    let name = option_name(arg);
    OptionEntry::new(name, registered_default(arg)).with_dump_excluded(exclusions.contains(name))
}

#[derive(Debug)]
struct Override {
    id: Id,
    tokens: Vec<OsString>,
}

/// A `clap` command parsed from an argument vector, collecting environment
/// overrides until [`ClapOptions::into_matches`] produces the final matches.
///
/// Overrides are replayed as command-line tokens placed ahead of the
/// caller's own arguments, so `clap` still performs the final conversion and
/// validation. An option that would clash with the explicit arguments never
/// receives an environment value: `conflicts_with` in either direction,
/// `exclusive` on either side, a shared single-member group, or arguments
/// conflicting with a given subcommand.
#[derive(Debug)]
pub struct ClapOptions {
    command: Command,
    argv: Vec<OsString>,
    matches: ArgMatches,
    exclusions: DumpExclusions,
    env_disabled: BTreeSet<String>,
    overrides: Vec<Override>,
}

impl ClapOptions {
    /// Parse `args` with `command`.
    ///
    /// # Errors
    ///
    /// Returns the `clap` error when the arguments do not parse, including
    /// help display requests.
    pub fn try_parse_from<I, T>(
        mut command: Command,
        args: I,
        exclusions: DumpExclusions,
    ) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        command.build();
        let argv: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let matches = command.clone().try_get_matches_from(argv.clone())?;
        Ok(Self {
            command,
            argv,
            matches,
            exclusions,
            env_disabled: BTreeSet::new(),
            overrides: Vec::new(),
        })
    }

    /// Never take environment values for the options called `names`.
    #[must_use]
    pub fn without_env_for<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_disabled.extend(names.into_iter().map(Into::into));
        self
    }

    /// Matches from the initial parse, before any override is applied.
    #[must_use]
    pub const fn initial_matches(&self) -> &ArgMatches {
        &self.matches
    }

    /// Produce the final matches with every recorded override applied.
    ///
    /// Options given on the command line keep their values. In the returned
    /// matches, overridden options report [`ValueSource::CommandLine`]; use
    /// [`ClapOptions::entries`](OptionSet::entries) before this call to learn
    /// what the caller set explicitly.
    ///
    /// # Errors
    ///
    /// Returns the `clap` error when the combined arguments fail to parse,
    /// for example because two environment values name conflicting options.
    pub fn into_matches(self) -> Result<ArgMatches, clap::Error> {
        if self.overrides.is_empty() {
            return Ok(self.matches);
        }
        let mut user_args = self.argv.into_iter();
        let program = if self.command.is_no_binary_name_set() {
            None
        } else {
            Some(
                user_args
                    .next()
                    .unwrap_or_else(|| OsString::from(self.command.get_name())),
            )
        };
        let combined: Vec<OsString> = program
            .into_iter()
            .chain(self.overrides.into_iter().flat_map(|o| o.tokens))
            .chain(user_args)
            .collect();
        self.command.try_get_matches_from(combined)
    }

    fn is_explicit(&self, id: &Id) -> bool {
        self.matches.value_source(id.as_str()) == Some(ValueSource::CommandLine)
    }

    /// Name of the explicit argument or subcommand that `clap` would reject
    /// `arg` alongside.
    fn clash(&self, arg: &Arg) -> Option<String> {
        if self.command.is_args_conflicts_with_subcommands_set()
            && let Some(subcommand) = self.matches.subcommand_name()
        {
            return Some(subcommand.to_owned());
        }
        let declared = self.command.get_arg_conflicts_with(arg);
        self.command
            .get_arguments()
            .filter(|other| other.get_id() != arg.get_id() && self.is_explicit(other.get_id()))
            .find(|other| {
                arg.is_exclusive_set()
                    || other.is_exclusive_set()
                    || declared.iter().any(|d| d.get_id() == other.get_id())
                    || self
                        .command
                        .get_arg_conflicts_with(other)
                        .iter()
                        .any(|d| d.get_id() == arg.get_id())
                    || self.share_single_group(arg.get_id(), other.get_id())
            })
            .map(|other| option_name(other).to_owned())
    }

    /// Whether `a` and `b` belong to a group that admits only one member.
    fn share_single_group(&self, a: &Id, b: &Id) -> bool {
        self.command.get_groups().any(|group| {
            !group.clone().is_multiple()
                && group.get_args().any(|id| id == a)
                && group.get_args().any(|id| id == b)
        })
    }
}

impl OptionSet for ClapOptions {
    fn entries(&self) -> Vec<OptionEntry> {
        self.command
            .get_arguments()
            .filter(|arg| is_option(arg))
            .map(|arg| {
                let disabled =
                    self.env_disabled.contains(option_name(arg)) || self.clash(arg).is_some();
                base_entry(arg, &self.exclusions)
                    .with_explicitly_set(self.is_explicit(arg.get_id()))
                    .with_env_disabled(disabled)
            })
            .collect()
    }

    fn set(&mut self, name: &str, raw: &str) -> Result<(), CoercionFailure> {
        let Some(arg) = self
            .command
            .get_arguments()
            .find(|arg| is_option(arg) && option_name(arg) == name)
        else {
            return Err(Box::new(OverlayError::UnknownOption {
                name: name.to_owned(),
            }));
        };
        let tokens = override_tokens(arg, raw)?;
        if let Some(blocker) = self.clash(arg) {
            debug!(option = name, conflicts_with = %blocker, "override dropped");
            return Ok(());
        }
        let id = arg.get_id().clone();
        self.overrides.retain(|o| o.id != id);
        self.overrides.push(Override { id, tokens });
        Ok(())
    }
}
