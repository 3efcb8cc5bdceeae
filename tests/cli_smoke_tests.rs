use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn cli(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("account_wizard").unwrap();
    cmd.env("ACCOUNT_OPENING_HOME", home.path())
        .env("RUST_LOG", "off");
    cmd
}

#[test]
fn rates_prints_the_table() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .arg("rates")
        .assert()
        .success()
        .stdout(contains("HTG   12 months   8.50%"))
        .stdout(contains("USD    3 months   4.50%"))
        .stdout(contains("USD   36 months  10.00%"));
}

#[test]
fn rates_projects_a_deposit() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args([
            "rates",
            "--principal",
            "10000",
            "--term",
            "12",
            "--currency",
            "HTG",
            "--start",
            "2024-06-01",
        ])
        .assert()
        .success()
        .stdout(contains("8.50% a year: interest 850.00, total 10,850.00 on 2025-06-01"));
}

#[test]
fn unknown_term_fails_with_error_line() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["rates", "--principal", "10000", "--term", "7"])
        .assert()
        .failure()
        .stderr(contains("Error: Configuration error"));
}

#[test]
fn config_path_honours_home_override() {
    let home = TempDir::new().unwrap();
    let expected = home.path().join("config").join("config.json");
    cli(&home)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(contains(expected.display().to_string()));
}

#[test]
fn config_show_prints_defaults() {
    let home = TempDir::new().unwrap();
    cli(&home)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("\"defaults_policy\": \"preserve_user_edits\""));
}
