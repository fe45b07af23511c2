//! End-to-end tests for the `hello-env` binary.
//!
//! Each run starts from an environment with every `HELLO_ENV_*` variable
//! removed, so only the values a test sets are visible to the binary.

use assert_cmd::Command;
use rstest::rstest;

const DUMP: &str = "\
HELLO_ENV_RECIPIENT=\"World\"
HELLO_ENV_SALUTATION=\"Hello\"
HELLO_ENV_PUNCTUATION=\"!\"
HELLO_ENV_IS_EXCITED=\"false\"
HELLO_ENV_IS_QUIET=\"false\"
HELLO_ENV_REPEAT=\"1\"
";

fn hello_env(vars: &[(&str, &str)]) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_hello-env"));
    for (key, _) in std::env::vars() {
        if key.starts_with("HELLO_ENV_") {
            cmd.env_remove(key);
        }
    }
    cmd.env("RUST_BACKTRACE", "0");
    cmd.envs(vars.iter().copied());
    cmd
}

fn stderr_of(cmd: &mut Command) -> String {
    let output = cmd.assert().get_output().clone();
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn greets_with_defaults() {
    hello_env(&[]).assert().success().stdout("Hello, World!\n");
}

#[test]
fn environment_overrides_defaults() {
    hello_env(&[("HELLO_ENV_RECIPIENT", "Ada"), ("HELLO_ENV_IS_EXCITED", "true")])
        .assert()
        .success()
        .stdout("HELLO, ADA!\n");
}

#[test]
fn command_line_overrides_environment() {
    hello_env(&[("HELLO_ENV_RECIPIENT", "Ada")])
        .args(["--recipient", "Grace"])
        .assert()
        .success()
        .stdout("Hello, Grace!\n");
}

#[test]
fn empty_environment_value_keeps_default() {
    hello_env(&[("HELLO_ENV_SALUTATION", "")])
        .assert()
        .success()
        .stdout("Hello, World!\n");
}

#[rstest]
#[case(&[])]
#[case(&["--no-such-flag"])]
#[case(&["--repeat", "99"])]
fn dump_prints_defaults_and_exits_zero(#[case] extra: &[&str]) {
    hello_env(&[("HELLO_ENV_RECIPIENT", "Ada")])
        .arg("--dump-env")
        .args(extra)
        .assert()
        .success()
        .stdout(DUMP);
}

#[test]
fn version_prints_identity() {
    let assert = hello_env(&[("HELLO_ENV_REPEAT", "not-a-number")])
        .arg("--version")
        .assert()
        .success();
    let stdout = String::from_utf8_lossy(&assert.get_output().stdout).into_owned();
    let expected = format!("hello-env version {} ", env!("CARGO_PKG_VERSION"));
    assert!(stdout.starts_with(&expected), "got {stdout}");
}

#[test]
fn invalid_environment_value_fails() {
    let mut cmd = hello_env(&[("HELLO_ENV_REPEAT", "abc")]);
    cmd.assert().failure().code(1).stdout("");
    let stderr = stderr_of(&mut cmd);
    assert!(stderr.contains("HELLO_ENV_REPEAT"), "got {stderr}");
    assert!(stderr.contains("\"abc\""), "got {stderr}");
}

#[test]
fn every_invalid_environment_value_is_reported() {
    let mut cmd = hello_env(&[("HELLO_ENV_REPEAT", "9"), ("HELLO_ENV_IS_QUIET", "maybe")]);
    let stderr = stderr_of(&mut cmd);
    assert!(stderr.contains("HELLO_ENV_REPEAT"), "got {stderr}");
    assert!(stderr.contains("HELLO_ENV_IS_QUIET"), "got {stderr}");
}

#[test]
fn unknown_argument_exits_with_usage_error() {
    hello_env(&[]).arg("--no-such-flag").assert().failure().code(2);
}

#[test]
fn help_exits_zero() {
    hello_env(&[]).arg("--help").assert().success();
}

#[test]
fn conflicting_modes_from_mixed_sources_fail_validation() {
    let mut cmd = hello_env(&[("HELLO_ENV_IS_QUIET", "1")]);
    cmd.arg("--is-excited");
    cmd.assert().failure();
    let stderr = stderr_of(&mut cmd);
    assert!(stderr.contains("cannot combine"), "got {stderr}");
}
