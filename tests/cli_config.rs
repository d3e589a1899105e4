mod support;

use predicates::str::contains;
use support::DataDir;

#[test]
fn show_without_file_reports_defaults() {
    let data = DataDir::new();
    let shown = data.json(&["config", "show"]);
    assert_eq!(shown["command"], "config show");
    assert_eq!(shown["data"]["exists"], false);
    assert_eq!(shown["data"]["config"]["storage"]["key_prefix"], "tf");
    assert_eq!(shown["data"]["config"]["dashboard"]["recent_limit"], 6);
    assert_eq!(shown["next_steps"][0], "tf config init");
}

#[test]
fn init_writes_defaults_once() {
    let data = DataDir::new();
    let created = data.json(&["config", "init"]);
    assert_eq!(created["command"], "config init");
    assert_eq!(created["data"]["exists"], true);

    let written = std::fs::read_to_string(data.path().join("config.toml")).unwrap();
    assert!(written.contains("key_prefix = \"tf\""));
    assert!(written.contains("priority = \"medium\""));

    let err = data.json_err(&["config", "init"], 2);
    assert!(err["error"]["message"]
        .as_str()
        .unwrap()
        .contains("already exists"));

    data.write_config("[dashboard]\nrecent_limit = 3\n");
    data.json(&["config", "init", "--force"]);
    let shown = data.json(&["config", "show"]);
    assert_eq!(shown["data"]["exists"], true);
    assert_eq!(shown["data"]["config"]["dashboard"]["recent_limit"], 6);
}

#[test]
fn show_edited_file() {
    let data = DataDir::new();
    data.write_config("[defaults]\npriority = \"high\"\n");
    data.tf()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(contains("defaults.priority: high"))
        .stdout(contains("defaults.status: todo"));
}

#[test]
fn show_rejects_invalid_file() {
    let data = DataDir::new();
    data.write_config("[storage]\nkey_prefix = \"no/slash\"\n");
    let err = data.json_err(&["config", "show"], 2);
    assert_eq!(err["error"]["kind"], "user_error");
    assert_eq!(err["next_steps"][0], "fix config.toml then retry");
}
