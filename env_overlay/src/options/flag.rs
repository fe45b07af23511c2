//! Conversion of raw environment strings into command-line tokens.
//!
//! Every value is validated before any token is produced, so a rejected
//! value never reaches the final parse.

use std::error::Error as _;
use std::ffi::OsString;

use clap::error::{ContextKind, ContextValue};
use clap::{Arg, ArgAction, Command};
use thiserror::Error;

use crate::error::CoercionFailure;

const STAND_IN_ID: &str = "value";

/// Boolean text that is neither a recognised truthy nor falsy spelling.
#[derive(Debug, Error)]
#[error("invalid boolean {0:?}: expected one of 1, t, true, 0, f, false")]
struct InvalidBool(String);

/// Whether `arg` is a named option the overlay can address.
pub(super) fn is_option(arg: &Arg) -> bool {
    !arg.is_positional()
        && matches!(
            arg.get_action(),
            ArgAction::Set
                | ArgAction::Append
                | ArgAction::SetTrue
                | ArgAction::SetFalse
                | ArgAction::Count
        )
}

/// Name used for environment keys: the long flag, or the id when the option
/// only has a short form.
pub(super) fn option_name(arg: &Arg) -> &str {
    arg.get_long().unwrap_or_else(|| arg.get_id().as_str())
}

/// Registered defaults joined with `,`.
pub(super) fn registered_default(arg: &Arg) -> String {
    arg.get_default_values()
        .iter()
        .map(|value| value.to_string_lossy())
        .collect::<Vec<_>>()
        .join(",")
}

/// Tokens that reproduce `raw` on the command line for `arg`.
pub(super) fn override_tokens(arg: &Arg, raw: &str) -> Result<Vec<OsString>, CoercionFailure> {
    match arg.get_action() {
        ArgAction::SetTrue => Ok(repeat_flag(arg, usize::from(parse_bool(raw)?))),
        ArgAction::SetFalse => Ok(repeat_flag(arg, usize::from(!parse_bool(raw)?))),
        ArgAction::Count => {
            let count: u8 = raw.trim().parse()?;
            Ok(repeat_flag(arg, usize::from(count)))
        }
        _ => {
            check_value(arg, raw)?;
            Ok(vec![valued_token(arg, raw)])
        }
    }
}

fn repeat_flag(arg: &Arg, times: usize) -> Vec<OsString> {
    let token = arg.get_long().map_or_else(
        || format!("-{}", arg.get_short().unwrap_or_default()),
        |long| format!("--{long}"),
    );
    vec![OsString::from(token); times]
}

/// Single attached token; `clap` strips exactly one `=` after the flag, so
/// a value that itself starts with `=` survives.
fn valued_token(arg: &Arg, raw: &str) -> OsString {
    arg.get_long().map_or_else(
        || OsString::from(format!("-{}={raw}", arg.get_short().unwrap_or_default())),
        |long| OsString::from(format!("--{long}={raw}")),
    )
}

/// Accepts the spellings Go's `strconv.ParseBool` accepts.
fn parse_bool(raw: &str) -> Result<bool, InvalidBool> {
    match raw.trim() {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Ok(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Ok(false),
        other => Err(InvalidBool(other.to_owned())),
    }
}

/// Run `raw` through the option's own value parser in isolation.
///
/// The stand-in is positional and carries every setting that shapes how a
/// value is read (parser, case folding, delimiter, value count) but none of
/// the relations to other arguments, which would not resolve in a command
/// of one argument. `raw` always follows `--`, so it is read as a value
/// whatever it looks like.
fn check_value(arg: &Arg, raw: &str) -> Result<(), CoercionFailure> {
    let mut stand_in = Arg::new(STAND_IN_ID)
        .value_parser(arg.get_value_parser().clone())
        .ignore_case(arg.is_ignore_case_set())
        .action(ArgAction::Set)
        .required(true);
    if let Some(delimiter) = arg.get_value_delimiter() {
        stand_in = stand_in
            .action(ArgAction::Append)
            .value_delimiter(delimiter)
            .num_args(1..);
    }
    if let Some(range) = arg.get_num_args().filter(|range| range.max_values() > 1) {
        stand_in = stand_in.num_args(range);
    }
    Command::new("check")
        .no_binary_name(true)
        .disable_help_flag(true)
        .disable_version_flag(true)
        .arg(stand_in)
        .try_get_matches_from(["--", raw])
        .map(drop)
        .map_err(|err| check_failure(&err))
}

/// Reduce a stand-in error to its cause; the stand-in's usage text would
/// only confuse.
fn check_failure(err: &clap::Error) -> CoercionFailure {
    if let Some(source) = err.source() {
        return source.to_string().into();
    }
    let reason = err.kind().as_str().unwrap_or("invalid value");
    match err.get(ContextKind::ValidValue) {
        Some(ContextValue::Strings(valid)) => {
            format!("{reason}; possible values: {}", valid.join(", ")).into()
        }
        _ => reason.to_owned().into(),
    }
}
