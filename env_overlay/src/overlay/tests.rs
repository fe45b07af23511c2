//! Unit tests for override application and defaults rendering.

use std::collections::BTreeMap;

use rstest::{fixture, rstest};

use super::{apply_env_overrides, render_defaults, should_skip_in_dump};
use crate::env::MapEnv;
use crate::error::{CoercionFailure, OverlayError};
use crate::options::{OptionEntry, OptionSet};
use crate::prefix::Prefix;

/// Integer-only option set that records every value written into it.
#[derive(Debug, Default)]
struct IntOptions {
    entries: Vec<OptionEntry>,
    values: BTreeMap<String, i64>,
}

impl IntOptions {
    fn with(mut self, name: &str, default: i64, explicit: bool) -> Self {
        self.entries.push(
            OptionEntry::new(name, default.to_string()).with_explicitly_set(explicit),
        );
        self.values.insert(name.to_owned(), default);
        self
    }

    fn value(&self, name: &str) -> Option<i64> {
        self.values.get(name).copied()
    }
}

impl OptionSet for IntOptions {
    fn entries(&self) -> Vec<OptionEntry> {
        self.entries.clone()
    }

    fn set(&mut self, name: &str, raw: &str) -> Result<(), CoercionFailure> {
        let parsed: i64 = raw.parse()?;
        self.values.insert(name.to_owned(), parsed);
        Ok(())
    }
}

#[fixture]
fn prefix() -> Prefix {
    Prefix::derive("myapp")
}

#[rstest]
fn unset_variables_leave_defaults(prefix: Prefix) {
    let mut options = IntOptions::default().with("max-retries", 3, false);
    let applied = apply_env_overrides(&mut options, &prefix, &MapEnv::new());
    assert!(matches!(applied, Ok(ref list) if list.is_empty()));
    assert_eq!(options.value("max-retries"), Some(3));
}

#[rstest]
fn valid_variable_overrides_default(prefix: Prefix) {
    let mut options = IntOptions::default().with("max-retries", 3, false);
    let env = MapEnv::new().with("MYAPP_MAX_RETRIES", "7");
    let applied = apply_env_overrides(&mut options, &prefix, &env).unwrap_or_default();
    assert_eq!(options.value("max-retries"), Some(7));
    assert_eq!(applied.len(), 1);
    assert_eq!(applied.first().map(|a| a.key()), Some("MYAPP_MAX_RETRIES"));
    assert_eq!(applied.first().map(|a| a.option()), Some("max-retries"));
}

#[rstest]
fn explicit_options_ignore_environment(prefix: Prefix) {
    let mut options = IntOptions::default().with("max-retries", 3, true);
    let env = MapEnv::new().with("MYAPP_MAX_RETRIES", "not-a-number");
    assert!(apply_env_overrides(&mut options, &prefix, &env).is_ok());
    assert_eq!(options.value("max-retries"), Some(3));
}

#[rstest]
fn options_refusing_env_are_left_alone(prefix: Prefix) {
    let mut options = IntOptions::default().with("max-retries", 3, false);
    if let Some(entry) = options.entries.pop() {
        options.entries.push(entry.with_env_disabled(true));
    }
    let env = MapEnv::new().with("MYAPP_MAX_RETRIES", "not-a-number");
    let applied = apply_env_overrides(&mut options, &prefix, &env);
    assert!(matches!(applied, Ok(ref list) if list.is_empty()));
    assert_eq!(options.value("max-retries"), Some(3));
}

#[rstest]
fn empty_values_are_treated_as_unset(prefix: Prefix) {
    let mut options = IntOptions::default().with("max-retries", 3, false);
    let env = MapEnv::new().with("MYAPP_MAX_RETRIES", "");
    assert!(apply_env_overrides(&mut options, &prefix, &env).is_ok());
    assert_eq!(options.value("max-retries"), Some(3));
}

#[rstest]
fn single_failure_names_key_and_value(prefix: Prefix) {
    let mut options = IntOptions::default().with("max-retries", 3, false);
    let env = MapEnv::new().with("MYAPP_MAX_RETRIES", "abc");
    match apply_env_overrides(&mut options, &prefix, &env) {
        Err(OverlayError::Coercion {
            key, option, value, ..
        }) => {
            assert_eq!(key, "MYAPP_MAX_RETRIES");
            assert_eq!(option, "max-retries");
            assert_eq!(value, "abc");
        }
        other => panic!("expected coercion error, got {other:?}"),
    }
    assert_eq!(options.value("max-retries"), Some(3));
}

#[rstest]
fn failures_are_collected_and_valid_values_applied(prefix: Prefix) {
    let mut options = IntOptions::default()
        .with("first", 1, false)
        .with("second", 2, false)
        .with("third", 3, false);
    let env = MapEnv::from_iter([
        ("MYAPP_FIRST", "x"),
        ("MYAPP_SECOND", "20"),
        ("MYAPP_THIRD", "y"),
    ]);
    let Err(OverlayError::Aggregate(errors)) = apply_env_overrides(&mut options, &prefix, &env)
    else {
        panic!("expected aggregate error");
    };
    let keys: Vec<_> = errors
        .as_slice()
        .iter()
        .filter_map(|err| match err {
            OverlayError::Coercion { key, .. } => Some(key.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(keys, ["MYAPP_FIRST", "MYAPP_THIRD"]);
    assert_eq!(options.value("second"), Some(20));
    assert_eq!(options.value("first"), Some(1));
}

#[cfg(unix)]
#[rstest]
fn non_unicode_values_are_reported(prefix: Prefix) {
    use std::ffi::OsString;
    use std::os::unix::ffi::OsStringExt;

    let mut options = IntOptions::default().with("max-retries", 3, false);
    let env = MapEnv::new().with("MYAPP_MAX_RETRIES", OsString::from_vec(vec![0xff, 0xfe]));
    assert!(matches!(
        apply_env_overrides(&mut options, &prefix, &env),
        Err(OverlayError::NonUnicode { ref key }) if key == "MYAPP_MAX_RETRIES"
    ));
}

#[test]
fn renders_defaults_in_order() {
    let entries = [
        OptionEntry::new("timeout", "30s"),
        OptionEntry::new("verbose", "false"),
    ];
    let prefix = Prefix::derive("svc");
    let lines: Vec<_> = render_defaults(&entries, &prefix).collect();
    assert_eq!(lines, ["SVC_TIMEOUT=\"30s\"", "SVC_VERBOSE=\"false\""]);
}

#[test]
fn rendering_skips_excluded_entries() {
    let entries = [
        OptionEntry::new("version", "false").with_dump_excluded(true),
        OptionEntry::new("log-level", "info"),
        OptionEntry::new("dump-env", "false").with_dump_excluded(true),
    ];
    assert!(entries.first().is_some_and(should_skip_in_dump));
    let lines: Vec<_> = render_defaults(&entries, &Prefix::derive("svc")).collect();
    assert_eq!(lines, ["SVC_LOG_LEVEL=\"info\""]);
}

#[test]
fn rendering_uses_registered_default_not_current_value() {
    let entries = [OptionEntry::new("name", "guest").with_explicitly_set(true)];
    let lines: Vec<_> = render_defaults(&entries, &Prefix::derive("svc")).collect();
    assert_eq!(lines, ["SVC_NAME=\"guest\""]);
}

#[test]
fn rendering_escapes_quotes_and_empty_defaults() {
    let entries = [
        OptionEntry::new("greeting", "say \"hi\""),
        OptionEntry::new("empty", ""),
    ];
    let lines: Vec<_> = render_defaults(&entries, &Prefix::derive("svc")).collect();
    assert_eq!(lines, [r#"SVC_GREETING="say \"hi\"""#, r#"SVC_EMPTY="""#]);
}

#[test]
fn rendering_is_restartable() {
    let entries = [OptionEntry::new("a", "1"), OptionEntry::new("b", "2")];
    let prefix = Prefix::derive("x");
    let lines = render_defaults(&entries, &prefix);
    let first: Vec<_> = lines.clone().collect();
    let second: Vec<_> = lines.collect();
    assert_eq!(first, second);
    assert_eq!(first, render_defaults(&entries, &prefix).collect::<Vec<_>>());
}
