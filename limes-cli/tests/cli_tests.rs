use assert_cmd::Command;
use predicates::prelude::*;

/// The binary with no OpenStack credentials in its environment
fn limesctl() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_limesctl"));
    cmd.env_clear();
    cmd
}

#[test]
fn test_help_command() {
    limesctl()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Command-line client for Limes"))
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("cluster"))
        .stdout(predicate::str::contains("domain"))
        .stdout(predicate::str::contains("project"))
        .stdout(predicate::str::contains("liquid"))
        .stdout(predicate::str::contains("--os-auth-url"));
}

#[test]
fn test_version_flag() {
    limesctl()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("limesctl"));
}

#[test]
fn test_version_command_needs_no_credentials() {
    limesctl()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with(concat!(
            "limesctl ",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn test_invalid_command() {
    limesctl()
        .arg("invalid")
        .assert()
        .failure()
        .stderr(predicate::str::contains("unrecognized subcommand"));
}

#[test]
fn test_missing_auth_url() {
    limesctl()
        .args(["cluster", "show"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Failed to authenticate with Keystone"))
        .stderr(predicate::str::contains("OS_AUTH_URL"));
}

#[test]
fn test_missing_credentials() {
    limesctl()
        .args(["domain", "list"])
        .env("OS_AUTH_URL", "https://keystone.example.com/v3")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("no credentials given"));
}

#[test]
fn test_unreachable_keystone() {
    limesctl()
        .args(["project", "show", "--timeout", "5"])
        .env("OS_AUTH_URL", "http://127.0.0.1:9/v3")
        .env("OS_TOKEN", "gAAAAA")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("cannot reach Keystone"));
}

#[test]
fn test_project_set_requires_quotas() {
    limesctl()
        .args(["project", "set", "web"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_invalid_format() {
    limesctl()
        .args(["cluster", "show", "--format", "yaml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("invalid value"));
}

#[test]
fn test_humanize_conflicts_with_unit() {
    limesctl()
        .args(["domain", "show", "--humanize", "--unit", "GiB"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}

#[test]
fn test_invalid_unit() {
    limesctl()
        .args(["cluster", "show", "--unit", "GB"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("GB"));
}

#[test]
fn test_invalid_interface() {
    limesctl()
        .args(["cluster", "show"])
        .env("OS_INTERFACE", "private")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown interface"));
}

#[test]
fn test_liquid_body_conflicts_with_az() {
    limesctl()
        .args([
            "liquid",
            "report-capacity",
            "compute",
            "--body",
            "request.json",
            "--az",
            "az-a",
        ])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("cannot be used with"));
}
