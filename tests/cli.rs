use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn help_names_the_binary() {
    Command::cargo_bin("h5lens")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("h5lens"))
        .stdout(predicate::str::contains("--demo"));
}

#[test]
fn version_is_printed() {
    Command::cargo_bin("h5lens")
        .unwrap()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn missing_path_fails_before_the_terminal_starts() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.h5");

    Command::cargo_bin("h5lens")
        .unwrap()
        .arg(&missing)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Error: Path not found"));
}
