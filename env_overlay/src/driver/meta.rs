//! Registration and detection of the version and dump meta flags.

use std::ffi::OsStr;

use clap::{Arg, ArgAction, ArgMatches, Command};

use super::OverlaySettings;

/// Add the meta flags to `command` unless an argument already uses the same
/// id or long name.
///
/// `clap`'s generated version flag is disabled so the overlay's own flag
/// owns `--version`.
pub(super) fn register(settings: &OverlaySettings, command: Command) -> Command {
    let mut registered = command.disable_version_flag(true);
    if !has_arg(&registered, settings.version_flag()) {
        registered = registered.arg(
            Arg::new(settings.version_flag().to_owned())
                .long(settings.version_flag().to_owned())
                .action(ArgAction::SetTrue)
                .help("Print the version and exit"),
        );
    }
    if !has_arg(&registered, settings.dump_flag()) {
        registered = registered.arg(
            Arg::new(settings.dump_flag().to_owned())
                .long(settings.dump_flag().to_owned())
                .action(ArgAction::SetTrue)
                .help("Print every default as an environment assignment and exit"),
        );
    }
    registered
}

fn has_arg(command: &Command, name: &str) -> bool {
    command
        .get_arguments()
        .any(|arg| arg.get_id() == name || arg.get_long() == Some(name))
}

/// Whether the first argument after the program name is the dump trigger.
///
/// The trigger is the dump flag name behind one or two dashes, so both
/// `--dump-env` and `-dump-env` match.
pub(super) fn is_dump_request<T: AsRef<OsStr>>(settings: &OverlaySettings, args: &[T]) -> bool {
    args.get(1)
        .and_then(|arg| arg.as_ref().to_str())
        .and_then(|arg| arg.strip_prefix('-'))
        .is_some_and(|arg| arg.strip_prefix('-').unwrap_or(arg) == settings.dump_flag())
}

/// Whether the version flag was given.
pub(super) fn version_requested(settings: &OverlaySettings, matches: &ArgMatches) -> bool {
    matches!(
        matches.try_get_one::<bool>(settings.version_flag()),
        Ok(Some(true))
    )
}

/// Line printed by the version shortcut.
pub(super) fn version_line(settings: &OverlaySettings) -> String {
    format!(
        "{} version {} {}/{}",
        settings.name(),
        settings.version(),
        std::env::consts::OS,
        std::env::consts::ARCH
    )
}
