mod support;

use predicates::str::contains;
use support::DataDir;

#[test]
fn first_login_seeds_five_tasks() {
    let data = DataDir::new();
    data.sign_in();

    let list = data.json(&["task", "list"]);
    assert_eq!(list["command"], "task list");
    assert_eq!(list["data"]["total"], 5);

    let tasks = list["data"]["tasks"].as_array().unwrap();
    let statuses: Vec<&str> = tasks.iter().map(|t| t["status"].as_str().unwrap()).collect();
    assert_eq!(statuses, vec!["todo", "todo", "in-progress", "in-progress", "done"]);
    let overdue: Vec<bool> = tasks.iter().map(|t| t["overdue"].as_bool().unwrap()).collect();
    assert_eq!(overdue, vec![false, false, true, false, false]);
}

#[test]
fn add_uses_config_defaults_and_flags() {
    let data = DataDir::new();
    data.write_config("[defaults]\npriority = \"high\"\nstatus = \"in-progress\"\n");
    data.sign_in();

    let added = data.json(&["task", "add", "  Write report  "]);
    assert_eq!(added["data"]["title"], "Write report");
    assert_eq!(added["data"]["priority"], "high");
    assert_eq!(added["data"]["status"], "in-progress");
    assert_eq!(added["data"]["dueDate"], "");
    assert_eq!(added["data"]["description"], "");

    let explicit = data.json(&[
        "task",
        "add",
        "Plan trip",
        "--description",
        "Book flights",
        "--priority",
        "low",
        "--due",
        "2030-01-15",
        "--status",
        "todo",
    ]);
    assert_eq!(explicit["data"]["priority"], "low");
    assert_eq!(explicit["data"]["dueDate"], "2030-01-15");
    assert_eq!(explicit["data"]["overdue"], false);
}

#[test]
fn add_rejects_blank_title_and_bad_values() {
    let data = DataDir::new();
    data.sign_in();

    data.json_err(&["task", "add", "   "], 2);
    data.json_err(&["task", "add", "x", "--priority", "urgent"], 2);
    data.json_err(&["task", "add", "x", "--status", "blocked"], 2);
    data.json_err(&["task", "add", "x", "--due", "tomorrow"], 2);

    assert_eq!(data.json(&["task", "list"])["data"]["total"], 5);
}

#[test]
fn show_edit_move_and_remove() {
    let data = DataDir::new();
    data.sign_in();
    let id = data.add_task("Draft", &["--due", "2030-02-01"]);

    let shown = data.json(&["task", "show", &id[..8]]);
    assert_eq!(shown["data"]["id"], id.as_str());

    let edited = data.json(&[
        "task",
        "edit",
        &id,
        "--title",
        "Final draft",
        "--clear-due",
        "--priority",
        "high",
    ]);
    assert_eq!(edited["data"]["title"], "Final draft");
    assert_eq!(edited["data"]["dueDate"], "");
    assert_eq!(edited["data"]["priority"], "high");

    let moved = data.json(&["task", "move", &id, "done"]);
    assert_eq!(moved["data"]["status"], "done");
    let titles = data.titles(&["task", "list"]);
    assert_eq!(titles.last().map(String::as_str), Some("Final draft"));

    let done = data.titles(&["task", "list", "--status", "done"]);
    assert_eq!(done, vec!["Update README", "Final draft"]);

    let removed = data.json(&["task", "rm", &id]);
    assert_eq!(removed["data"]["removed"]["id"], id.as_str());
    assert_eq!(data.json(&["task", "list"])["data"]["total"], 5);
}

#[test]
fn unknown_ids_report_not_found() {
    let data = DataDir::new();
    data.sign_in();

    for args in [
        vec!["task", "show", "does-not-exist"],
        vec!["task", "rm", "does-not-exist"],
        vec!["task", "move", "does-not-exist", "done"],
        vec!["task", "edit", "does-not-exist", "--title", "x"],
    ] {
        let err = data.json_err(&args, 2);
        assert_eq!(err["error"]["details"]["id"], "does-not-exist");
        assert_eq!(err["next_steps"][0], "tf task list");
    }
}

#[test]
fn edit_without_changes_is_rejected() {
    let data = DataDir::new();
    data.sign_in();
    let id = data.add_task("Untouched", &[]);
    data.tf()
        .args(["task", "edit", &id])
        .assert()
        .code(2)
        .stderr(contains("nothing to change"));
}

#[test]
fn tasks_are_stored_as_camel_case_records() {
    let data = DataDir::new();
    let login = data.sign_in();
    let user_id = login["data"]["user"]["id"].as_str().unwrap().to_string();
    data.add_task("Stored", &["--due", "2030-03-03"]);

    let record = data.read_record(&format!("tf_tasks_{user_id}"));
    let last = record.as_array().unwrap().last().unwrap().clone();
    assert_eq!(last["title"], "Stored");
    assert_eq!(last["dueDate"], "2030-03-03");
    assert!(last["createdAt"].is_string());
    assert_eq!(last["status"], "todo");
    assert_eq!(last["priority"], "medium");
}

#[test]
fn custom_key_prefix_renames_records() {
    let data = DataDir::new();
    data.write_config("[storage]\nkey_prefix = \"work\"\n");
    data.sign_in();

    assert!(data.record_path("work_users").exists());
    assert!(data.record_path("work_auth").exists());
    assert!(!data.record_path("tf_users").exists());
}

#[test]
fn human_list_output() {
    let data = DataDir::new();
    data.sign_in();
    data.tf()
        .args(["task", "list"])
        .assert()
        .success()
        .stdout(contains("Tasks"))
        .stdout(contains("Write unit tests"))
        .stdout(contains("OVERDUE"));

    data.tf()
        .args(["--quiet", "task", "list"])
        .assert()
        .success()
        .stdout("");
}

#[test]
fn unsaved_changes_fail_the_command() {
    let data = DataDir::new();
    let login = data.sign_in();
    let user_id = login["data"]["user"]["id"].as_str().unwrap().to_string();
    let record = data.record_path(&format!("tf_tasks_{user_id}"));
    std::fs::remove_file(&record).unwrap();
    std::fs::create_dir(&record).unwrap();

    let err = data.json_err(&["task", "add", "Important"], 4);
    assert_eq!(err["error"]["kind"], "operation_failed");
    assert!(err["error"]["message"]
        .as_str()
        .unwrap()
        .contains("could not save tasks"));

    let titles = data.titles(&["task", "list"]);
    assert!(!titles.contains(&"Important".to_string()));

    let relogin = data.json(&["login", "--email", "ada@example.com", "--password", "secret1"]);
    assert!(relogin["warnings"][0]
        .as_str()
        .unwrap()
        .contains("could not save tasks"));
}
