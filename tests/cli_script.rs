use assert_cmd::Command;
use predicates::str::contains;
use tempfile::TempDir;

fn script(home: &TempDir, input: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("expense_tracker_cli").unwrap();
    cmd.env("EXPENSE_TRACKER_CLI_SCRIPT", "1")
        .env("EXPENSE_TRACKER_HOME", home.path())
        .env_remove("RUST_LOG")
        .write_stdin(input.to_string())
        .assert()
        .success()
}

#[test]
fn script_mode_runs_basic_flow() {
    let home = TempDir::new().unwrap();
    let input = "\
expense add 50 food \"Weekly groceries\"
budget add food 200
expense add 30 food Dinner
dashboard
exit
";
    script(&home, input)
        .stdout(contains("Recorded $50.00 for Food & Dining"))
        .stdout(contains("Total budget : $200.00"))
        .stdout(contains("Total spent  : $80.00"))
        .stdout(contains("Savings rate : 60.0%"));

    let json = std::fs::read_to_string(home.path().join("data").join("tracker.json")).unwrap();
    assert!(json.contains("Weekly groceries"));
}

#[test]
fn zero_amounts_render_unsigned() {
    let home = TempDir::new().unwrap();
    let output = script(&home, "dashboard\nbudget add food 100\nbudget list\ntrend\n")
        .stdout(contains("Total budget : $0.00"))
        .stdout(contains("Total spent  : $0.00"))
        .stdout(contains("$0.00 already spent."));
    let stdout = String::from_utf8(output.get_output().stdout.clone()).unwrap();
    assert!(!stdout.contains("-0.00"), "signed zero in output:\n{stdout}");
}

#[test]
fn state_survives_between_runs() {
    let home = TempDir::new().unwrap();
    script(&home, "budget add transport 100 weekly\nexpense add 25 transport Taxi\n");
    script(&home, "budget list\nreconcile\n")
        .stdout(contains("$25.00"))
        .stdout(contains("in sync"));
}

#[test]
fn bad_input_is_reported_and_skipped() {
    let home = TempDir::new().unwrap();
    script(&home, "expense add -5 food Refund\nexpnse list\nexpense list\n")
        .stdout(contains("Suggestion: `expense`?"))
        .stdout(contains("No expenses found."))
        .stderr(contains("amount must be a positive number"));
}

#[test]
fn config_changes_are_persisted() {
    let home = TempDir::new().unwrap();
    script(&home, "config set currency_symbol EUR\nconfig set sync_policy optimistic\n");
    script(&home, "expense add 9 other Stamps\nconfig show\n")
        .stdout(contains("Recorded EUR9.00"))
        .stdout(contains("optimistic"));
}

#[test]
fn backups_are_listed_by_name() {
    let home = TempDir::new().unwrap();
    let pattern = regex::Regex::new(r"tracker_\d{8}_\d{6}(-\d+)?_nightly\.json").unwrap();
    let output = script(&home, "expense add 2 other Gum\nbackup Nightly\nbackups\n")
        .get_output()
        .stdout
        .clone();
    let stdout = String::from_utf8(output).unwrap();
    assert!(pattern.is_match(&stdout), "unexpected output:\n{stdout}");
}
