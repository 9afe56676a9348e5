mod common;

use std::{fs, path::Path};

use assert_cmd::Command;
use common::temp_dir;
use predicates::str::contains;

/// Script-mode shell rooted at `home`, with ANSI colours off.
fn shell(home: &Path) -> Command {
    let config_dir = home.join("config");
    fs::create_dir_all(&config_dir).unwrap();
    let config_path = config_dir.join("config.json");
    if !config_path.exists() {
        fs::write(&config_path, r#"{"ui_color_enabled": false}"#).unwrap();
    }
    let mut cmd = Command::cargo_bin("squareone_cli").unwrap();
    cmd.env("SQUAREONE_HOME", home)
        .env("SQUAREONE_CLI_SCRIPT", "1")
        .env("NO_COLOR", "1")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_shows_summary_and_records_transactions() {
    let home = temp_dir();
    let input = "summary\n\
                 transaction add \"description=Morning coffee\" amount=4.50 category=food\n\
                 transaction list expense\n\
                 exit\n";

    shell(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Total balance"))
        .stdout(contains("$3,518.56"))
        .stdout(contains("Added transaction"))
        .stdout(contains("Morning coffee"));

    let raw = fs::read_to_string(home.join("data").join("squareone_transactions.json")).unwrap();
    assert!(raw.contains("Morning coffee"));
    assert!(raw.contains(r#""amount":"-4.5""#), "{raw}");
}

#[test]
fn goals_persist_between_sessions() {
    let home = temp_dir();
    shell(&home)
        .write_stdin("goal add id=boat name=Boat target=5000 current=1250\nexit\n")
        .assert()
        .success()
        .stdout(contains("Added goal `boat`"));

    shell(&home)
        .write_stdin("goal list\n")
        .assert()
        .success()
        .stdout(contains("Boat"))
        .stdout(contains(" 25%"));
}

#[test]
fn typos_get_a_suggestion_and_bad_input_an_error() {
    let home = temp_dir();
    shell(&home)
        .write_stdin("sumary\nbudget add category=food\nbudget remove nope\n")
        .assert()
        .success()
        .stdout(contains("Did you mean `summary`?"))
        .stdout(contains("[x]"))
        .stdout(contains("no budget with id `nope`"));
}

#[test]
fn unreadable_collection_is_reported_and_kept_aside() {
    let home = temp_dir();
    let data = home.join("data");
    fs::create_dir_all(&data).unwrap();
    fs::write(data.join("squareone_budgets.json"), "oops").unwrap();

    shell(&home)
        .write_stdin("budget list\n")
        .assert()
        .success()
        .stdout(contains("replaced with demo data"))
        .stdout(contains("entertainment"));

    assert_eq!(
        fs::read_to_string(data.join("squareone_budgets.corrupt.json")).unwrap(),
        "oops"
    );
}

#[test]
fn config_set_is_saved_to_disk() {
    let home = temp_dir();
    shell(&home)
        .write_stdin("config set currency eur\nconfig show\n")
        .assert()
        .success()
        .stdout(contains("Set currency."))
        .stdout(contains("EUR"));

    let saved = fs::read_to_string(home.join("config").join("config.json")).unwrap();
    assert!(saved.contains("\"EUR\""));
}
