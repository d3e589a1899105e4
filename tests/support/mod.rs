#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// A throwaway data directory for one test.
pub struct DataDir {
    dir: TempDir,
}

impl DataDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn record_path(&self, key: &str) -> PathBuf {
        self.dir.path().join(format!("{key}.json"))
    }

    pub fn read_record(&self, key: &str) -> Value {
        let raw = fs::read_to_string(self.record_path(key)).expect("read record");
        serde_json::from_str(&raw).expect("record json")
    }

    pub fn write_config(&self, contents: &str) {
        fs::write(self.dir.path().join("config.toml"), contents).expect("write config");
    }

    /// `tf` pointed at this data directory.
    pub fn tf(&self) -> Command {
        let mut cmd = Command::cargo_bin("tf").expect("binary");
        cmd.env("TF_DATA_DIR", self.dir.path());
        cmd.env_remove("RUST_LOG");
        cmd
    }

    /// Run with `--json` and parse the envelope, asserting success.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .tf()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json envelope")
    }

    /// Run with `--json` expecting failure with `code`, returning the envelope.
    pub fn json_err(&self, args: &[&str], code: i32) -> Value {
        let output = self
            .tf()
            .args(args)
            .arg("--json")
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json error envelope")
    }

    /// Register and sign in a default account.
    pub fn sign_in(&self) -> Value {
        self.sign_in_as("Ada Lovelace", "ada@example.com", "secret1")
    }

    pub fn sign_in_as(&self, name: &str, email: &str, password: &str) -> Value {
        self.json(&[
            "register",
            "--name",
            name,
            "--email",
            email,
            "--password",
            password,
        ]);
        self.json(&["login", "--email", email, "--password", password])
    }

    pub fn add_task(&self, title: &str, extra: &[&str]) -> String {
        let mut args = vec!["task", "add", title];
        args.extend_from_slice(extra);
        let value = self.json(&args);
        value["data"]["id"].as_str().expect("task id").to_string()
    }

    pub fn titles(&self, args: &[&str]) -> Vec<String> {
        let value = self.json(args);
        value["data"]["tasks"]
            .as_array()
            .expect("tasks array")
            .iter()
            .map(|task| task["title"].as_str().expect("title").to_string())
            .collect()
    }
}
