//! One-shot command-line entry point.
//!
//! [`EnvOverlay`] holds everything the overlay needs to know about the
//! program and guards the side-effecting parse with a latch so repeated
//! calls reuse the first result.

mod meta;
mod settings;

use std::ffi::OsString;
use std::io::{self, Write};
use std::process;
use std::sync::OnceLock;

use clap::{ArgMatches, Command, CommandFactory, FromArgMatches};
use tracing::{debug, error};

use crate::env::{EnvSource, ProcessEnv};
use crate::error::{OverlayError, OverlayResult};
use crate::options::{ClapOptions, describe};
use crate::overlay::{apply_env_overrides, render_defaults};
use crate::prefix::Prefix;

pub use settings::OverlaySettings;

/// Result of a non-exiting parse.
#[derive(Debug)]
pub enum ParseOutcome<M = ArgMatches> {
    /// Arguments parsed and environment overrides applied.
    Matches(M),
    /// The dump trigger was given; these lines should be printed.
    Dump(Vec<String>),
    /// The version flag was given; this line should be printed.
    Version(String),
}

impl<M> ParseOutcome<M> {
    /// Convert the parsed value, leaving the shortcuts untouched.
    ///
    /// # Errors
    ///
    /// Propagates the error returned by `f`.
    pub fn try_map<N, E, F>(self, f: F) -> Result<ParseOutcome<N>, E>
    where
        F: FnOnce(M) -> Result<N, E>,
    {
        Ok(match self {
            Self::Matches(value) => ParseOutcome::Matches(f(value)?),
            Self::Dump(lines) => ParseOutcome::Dump(lines),
            Self::Version(line) => ParseOutcome::Version(line),
        })
    }
}

/// Environment overlay for a single program.
///
/// # Examples
///
/// ```
/// use clap::{Arg, Command};
/// use env_overlay::{EnvOverlay, MapEnv, ParseOutcome};
///
/// let overlay = EnvOverlay::new("svc", "0.1.0");
/// let command = Command::new("svc").arg(Arg::new("timeout").long("timeout").default_value("30s"));
/// let outcome = overlay.try_parse_from_env(command, ["svc", "--dump-env"], &MapEnv::new());
/// assert!(matches!(outcome, Ok(ParseOutcome::Dump(lines)) if lines == ["SVC_TIMEOUT=\"30s\""]));
/// ```
#[derive(Debug)]
pub struct EnvOverlay {
    settings: OverlaySettings,
    parsed: OnceLock<ArgMatches>,
}

impl EnvOverlay {
    /// Create an overlay for the program `name` at `version`.
    ///
    /// The prefix is derived from `name`; the meta flags are `--version` and
    /// `--dump-env`.
    #[must_use]
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            settings: OverlaySettings::new(name.into(), version.into()),
            parsed: OnceLock::new(),
        }
    }

    /// Replace the derived prefix.
    #[must_use]
    pub fn with_prefix(mut self, prefix: Prefix) -> Self {
        self.settings.prefix = prefix;
        self
    }

    /// Rename the version flag.
    #[must_use]
    pub fn version_flag(mut self, name: impl Into<String>) -> Self {
        self.settings.version_flag = name.into();
        self
    }

    /// Rename the dump flag and trigger token.
    #[must_use]
    pub fn dump_flag(mut self, name: impl Into<String>) -> Self {
        self.settings.dump_flag = name.into();
        self
    }

    /// Leave the option called `name` out of the defaults dump.
    #[must_use]
    pub fn exclude_from_dump(mut self, name: impl Into<String>) -> Self {
        self.settings.exclusions.insert(name);
        self
    }

    /// Settings this overlay was built with.
    #[must_use]
    pub const fn settings(&self) -> &OverlaySettings {
        &self.settings
    }

    /// Add the version and dump flags to `command`.
    ///
    /// Registration is idempotent, so commands that already carry the flags
    /// pass through unchanged.
    #[must_use]
    pub fn register(&self, command: Command) -> Command {
        meta::register(&self.settings, command)
    }

    /// Whether `args` (program name first) request the defaults dump.
    #[must_use]
    pub fn is_dump_request<T: AsRef<std::ffi::OsStr>>(&self, args: &[T]) -> bool {
        meta::is_dump_request(&self.settings, args)
    }

    /// Line printed by the version shortcut.
    #[must_use]
    pub fn version_line(&self) -> String {
        meta::version_line(&self.settings)
    }

    /// Environment assignments for every default registered on `command`.
    #[must_use]
    pub fn render_defaults(&self, command: &Command) -> Vec<String> {
        let entries = describe(&self.register(command.clone()), &self.settings.dump_exclusions());
        render_defaults(&entries, self.settings.prefix()).collect()
    }

    /// Parse `args` against `command`, reading the process environment.
    ///
    /// # Errors
    ///
    /// See [`EnvOverlay::try_parse_from_env`].
    pub fn try_parse_from<I, T>(&self, command: Command, args: I) -> OverlayResult<ParseOutcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.try_parse_from_env(command, args, &ProcessEnv)
    }

    /// Parse `args` against `command` and overlay values from `env`.
    ///
    /// The dump trigger is checked before parsing, so it works even when
    /// the remaining arguments are invalid. The version flag is checked
    /// after parsing and skips the overlay. Neither prints nor exits.
    ///
    /// # Errors
    ///
    /// Returns [`OverlayError::CliParsing`] when `clap` rejects the arguments
    /// (including help requests), and the coercion errors of
    /// [`apply_env_overrides`] when environment values are invalid.
    pub fn try_parse_from_env<I, T, E>(
        &self,
        command: Command,
        args: I,
        env: &E,
    ) -> OverlayResult<ParseOutcome>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
        E: EnvSource + ?Sized,
    {
        let argv: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let registered = self.register(command);
        let exclusions = self.settings.dump_exclusions();
        if self.is_dump_request(&argv) {
            debug!(prefix = %self.settings.prefix(), "dumping defaults");
            let entries = describe(&registered, &exclusions);
            return Ok(ParseOutcome::Dump(
                render_defaults(&entries, self.settings.prefix()).collect(),
            ));
        }

        let mut options = ClapOptions::try_parse_from(registered, argv, exclusions)?
            .without_env_for(self.settings.meta_flags());
        if meta::version_requested(&self.settings, options.initial_matches()) {
            debug!(name = self.settings.name(), "version requested");
            return Ok(ParseOutcome::Version(self.version_line()));
        }

        let applied = apply_env_overrides(&mut options, self.settings.prefix(), env)?;
        debug!(count = applied.len(), "environment overlay applied");
        Ok(ParseOutcome::Matches(options.into_matches()?))
    }

    /// Typed variant of [`EnvOverlay::try_parse_from_env`] for `clap`
    /// derive structs.
    ///
    /// # Errors
    ///
    /// As [`EnvOverlay::try_parse_from_env`], plus
    /// [`OverlayError::CliParsing`] when the final matches do not convert
    /// into `P`.
    pub fn try_parse_typed_from<P, I, T, E>(&self, args: I, env: &E) -> OverlayResult<ParseOutcome<P>>
    where
        P: CommandFactory + FromArgMatches,
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
        E: EnvSource + ?Sized,
    {
        self.try_parse_from_env(P::command(), args, env)?
            .try_map(|matches| P::from_arg_matches(&matches).map_err(OverlayError::from))
    }

    /// Parse the process arguments once, exiting on shortcuts and errors.
    ///
    /// See [`EnvOverlay::parse_from`].
    pub fn parse(&self, command: Command) -> &ArgMatches {
        self.parse_from(command, std::env::args_os())
    }

    /// Parse `args` once, exiting on shortcuts and errors.
    ///
    /// The first call does the work and caches the final matches; later
    /// calls return the cached matches and ignore their arguments.
    ///
    /// Dump and version output go to stdout with exit status 0. `clap`
    /// errors exit through [`clap::Error::exit`] (0 for help, 2 otherwise).
    /// Invalid environment values are logged and reported on stderr with
    /// exit status 1.
    pub fn parse_from<I, T>(&self, command: Command, args: I) -> &ArgMatches
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        self.parsed
            .get_or_init(|| self.resolve_or_exit(command, args))
    }

    /// Typed variant of [`EnvOverlay::parse`] for `clap` derive structs.
    pub fn parse_typed<P>(&self) -> P
    where
        P: CommandFactory + FromArgMatches,
    {
        let matches = self.parse(P::command());
        P::from_arg_matches(matches).unwrap_or_else(|err| err.exit())
    }

    /// Whether the one-shot parse has already run.
    #[must_use]
    pub fn is_parsed(&self) -> bool {
        self.parsed.get().is_some()
    }

    fn resolve_or_exit<I, T>(&self, command: Command, args: I) -> ArgMatches
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        match self.try_parse_from(command, args) {
            Ok(ParseOutcome::Matches(matches)) => matches,
            Ok(ParseOutcome::Dump(lines)) => print_and_exit(&lines),
            Ok(ParseOutcome::Version(line)) => print_and_exit(&[line]),
            Err(OverlayError::CliParsing(err)) => err.exit(),
            Err(err) => fail(&err),
        }
    }
}

/// Write each line followed by a newline.
fn write_lines<W: Write>(out: &mut W, lines: &[String]) -> io::Result<()> {
    for line in lines {
        writeln!(out, "{line}")?;
    }
    out.flush()
}

fn print_and_exit(lines: &[String]) -> ! {
    let mut stdout = io::stdout().lock();
    match write_lines(&mut stdout, lines) {
        Ok(()) => process::exit(0),
        Err(err) => fail(&OverlayError::Output(err)),
    }
}

fn fail(err: &OverlayError) -> ! {
    error!(error = %err, "environment overlay failed");
    let mut stderr = io::stderr().lock();
    // Exiting regardless; a closed stderr leaves nothing to report to.
    writeln!(stderr, "env overlay error: {err}").ok();
    process::exit(1)
}
