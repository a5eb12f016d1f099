use assert_cmd::Command;
use assert_fs::TempDir;
use predicates::prelude::*;
use predicates::str::contains;

fn script_command(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("financeflow_cli").unwrap();
    cmd.env("FINANCEFLOW_CLI_SCRIPT", "1")
        .env("FINANCEFLOW_HOME", home.path())
        .env_remove("API_KEY")
        .env_remove("RUST_LOG");
    cmd
}

#[test]
fn script_mode_records_and_summarizes() {
    let home = TempDir::new().unwrap();
    let input = "add income 5000 Salary\n\
                 add expense 1200 Rent\n\
                 add expense 300 \"Weekly groceries\"\n\
                 summary\n\
                 list\n\
                 exit\n";

    script_command(&home)
        .write_stdin(input)
        .assert()
        .success()
        .stdout(contains("Total Income    $5,000.00"))
        .stdout(contains("Total Expenses  $1,500.00"))
        .stdout(contains("Net Savings     $3,500.00"))
        .stdout(contains("+$5000.00  Salary"))
        .stdout(contains("-$300.00  Weekly groceries"));

    let saved = home
        .path()
        .join("data")
        .join("financeFlowTransactions.json");
    let json = std::fs::read_to_string(saved).unwrap();
    assert!(json.contains("\"Weekly groceries\""));
    assert!(home.path().join("config").join("config.json").exists());
}

#[test]
fn transactions_survive_restart() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin("add expense 200 Phone\nadd expense 150 Gas\n")
        .assert()
        .success();

    script_command(&home)
        .write_stdin("summary\nchart\n")
        .assert()
        .success()
        .stdout(contains("Net Savings     -$350.00"))
        .stdout(contains("Deficit Overview"))
        .stdout(contains("Overspending"));
}

#[test]
fn invalid_input_is_reported_and_shell_continues() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin("add expense 0 Nothing\nadd gift 10 Socks\nsumary\nlist\n")
        .assert()
        .success()
        .stdout(contains("Validation failed"))
        .stdout(contains("unknown transaction type `gift`"))
        .stdout(contains("Suggestion: `summary`?"))
        .stdout(contains("No transactions yet."));
}

#[test]
fn advice_without_data_or_credential_uses_fixed_messages() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin("advice\nadd income 100 Allowance\nadvice\n")
        .assert()
        .success()
        .stdout(contains(
            "Please add some transactions first so I can analyze your data!",
        ))
        .stdout(contains(
            "Sorry, I couldn't generate insights right now. Please try again later.",
        ));
}

#[test]
fn remove_accepts_id_prefix() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin("add income 10 Gift\n")
        .assert()
        .success();

    let saved = home
        .path()
        .join("data")
        .join("financeFlowTransactions.json");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&saved).unwrap()).unwrap();
    let id = json[0]["id"].as_str().unwrap().to_string();

    script_command(&home)
        .write_stdin(format!("remove {}\nremove {}\n", &id[..8], &id[..8]))
        .assert()
        .success()
        .stdout(contains("Removed income `Gift` (+$10.00)."))
        .stdout(contains("No transaction matches"));

    let json = std::fs::read_to_string(saved).unwrap();
    assert!(!json.contains("Gift"));
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin("help\nhelp add\n")
        .assert()
        .success()
        .stdout(contains("advice"))
        .stdout(contains("add <income|expense> <amount> <description...>"))
        .stdout(contains("Available commands").and(contains("chart")));
}

#[test]
fn oversized_amounts_are_rejected_and_restart_stays_healthy() {
    let home = TempDir::new().unwrap();
    script_command(&home)
        .write_stdin("add income 5e28 big\nadd income 5e28 big\nsummary\n")
        .assert()
        .success()
        .stdout(contains("amount must not exceed"))
        .stdout(contains("Total Income    $0.00"));

    script_command(&home)
        .write_stdin("add expense 10000000000000 House\nchart\n")
        .assert()
        .success()
        .stdout(contains("Overspending"))
        .stdout(contains(" 100%"));
}
