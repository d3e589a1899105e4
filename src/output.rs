//! Shared output formatting for tf CLI commands.

use serde::Serialize;

use crate::error::Result;

pub const SCHEMA_VERSION: &str = "tf.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

#[derive(Debug, Clone)]
pub struct HumanOutput {
    header: String,
    summary: Vec<(String, String)>,
    sections: Vec<(String, Vec<String>)>,
    details: Vec<String>,
    warnings: Vec<String>,
    next_steps: Vec<String>,
}

impl HumanOutput {
    pub fn new(header: impl Into<String>) -> Self {
        Self {
            header: header.into(),
            summary: Vec::new(),
            sections: Vec::new(),
            details: Vec::new(),
            warnings: Vec::new(),
            next_steps: Vec::new(),
        }
    }

    pub fn push_summary(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.summary.push((key.into(), value.into()));
    }

    /// A titled block of lines, rendered after the summary in insertion order.
    /// Empty sections are still shown with a `(none)` marker.
    pub fn push_section(&mut self, title: impl Into<String>, items: Vec<String>) {
        self.sections.push((title.into(), items));
    }

    pub fn push_detail(&mut self, value: impl Into<String>) {
        self.details.push(value.into());
    }

    pub fn push_warning(&mut self, value: impl Into<String>) {
        self.warnings.push(value.into());
    }

    pub fn push_next_step(&mut self, value: impl Into<String>) {
        self.next_steps.push(value.into());
    }
}

pub fn emit_success<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    human: Option<&HumanOutput>,
) -> Result<()> {
    if options.json {
        let warnings = human.map(|h| h.warnings.clone()).unwrap_or_default();
        let next_steps = human.map(|h| h.next_steps.clone()).unwrap_or_default();

        #[derive(Serialize)]
        struct Envelope<'a, T: Serialize> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            data: &'a T,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            warnings: Vec<String>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data,
            warnings,
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    if options.quiet {
        return Ok(());
    }

    if let Some(human) = human {
        println!("{}", format_human(human));
    }

    Ok(())
}

pub fn emit_error(command: &str, err: &crate::error::Error, json: bool) -> Result<()> {
    let next_steps = error_next_steps(err);
    let hint = next_steps.first().map(|step| step.as_str());
    if json {
        #[derive(Serialize)]
        struct ErrorBody<'a> {
            message: &'a str,
            code: i32,
            kind: &'static str,
            #[serde(skip_serializing_if = "Option::is_none")]
            details: Option<serde_json::Value>,
        }

        #[derive(Serialize)]
        struct Envelope<'a> {
            schema_version: &'static str,
            command: &'a str,
            status: &'static str,
            error: ErrorBody<'a>,
            #[serde(skip_serializing_if = "Vec::is_empty")]
            next_steps: Vec<String>,
        }

        let payload = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            error: ErrorBody {
                message: &err.to_string(),
                code: err.exit_code(),
                kind: error_kind(err),
                details: err.details(),
            },
            next_steps,
        };

        println!("{}", serde_json::to_string_pretty(&payload)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = hint {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

pub fn format_human(output: &HumanOutput) -> String {
    let mut lines = Vec::new();
    lines.push(output.header.clone());

    push_summary(&mut lines, &output.summary);
    for (title, items) in &output.sections {
        lines.push(String::new());
        lines.push(format!("{title}:"));
        if items.is_empty() {
            lines.push("  (none)".to_string());
        }
        for item in items {
            lines.push(format!("  {item}"));
        }
    }
    push_list(&mut lines, "Details", &output.details);
    push_list(&mut lines, "Warnings", &output.warnings);
    push_list(&mut lines, "Next steps", &output.next_steps);

    lines.join("\n")
}

pub fn infer_command_name_from_args() -> String {
    command_name(std::env::args().skip(1))
}

/// `tf task add --priority high x` => `task add`. Values of global options
/// that take an argument are skipped.
fn command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut words = Vec::new();
    let mut skip_value = false;

    for arg in args {
        if skip_value {
            skip_value = false;
            continue;
        }
        if arg == "--data-dir" {
            skip_value = true;
            continue;
        }
        if arg.starts_with('-') {
            continue;
        }
        words.push(arg);
        let grouped = matches!(words[0].as_str(), "task" | "board" | "config");
        if words.len() == 2 || !grouped {
            break;
        }
    }

    if words.is_empty() {
        return "tf".to_string();
    }
    words.join(" ")
}

fn error_kind(err: &crate::error::Error) -> &'static str {
    match err.exit_code() {
        crate::error::exit_codes::USER_ERROR => "user_error",
        _ => "operation_failed",
    }
}

fn error_next_steps(err: &crate::error::Error) -> Vec<String> {
    use crate::error::Error;

    match err {
        Error::NotAuthenticated => vec!["tf login --email <email> --password <password>".to_string()],
        Error::TaskNotFound(_) => vec!["tf task list".to_string()],
        Error::InvalidConfig(_) | Error::TomlParse(_) => {
            vec!["fix config.toml then retry".to_string()]
        }
        Error::LockFailed(_) => vec!["retry once the other tf process finishes".to_string()],
        _ => Vec::new(),
    }
}

fn push_summary(lines: &mut Vec<String>, summary: &[(String, String)]) {
    if summary.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push("Summary:".to_string());
    for (key, value) in summary {
        if value.is_empty() {
            lines.push(format!("- {key}"));
        } else {
            lines.push(format!("- {key}: {value}"));
        }
    }
}

fn push_list(lines: &mut Vec<String>, title: &str, items: &[String]) {
    if items.is_empty() {
        return;
    }

    lines.push(String::new());
    lines.push(format!("{title}:"));
    for item in items {
        lines.push(format!("- {item}"));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn command_name_groups_subcommands() {
        assert_eq!(command_name(args(&[])), "tf");
        assert_eq!(command_name(args(&["--json", "whoami"])), "whoami");
        assert_eq!(command_name(args(&["task", "add", "Buy milk"])), "task add");
        assert_eq!(
            command_name(args(&["--data-dir", "/tmp/x", "task", "--json", "list"])),
            "task list"
        );
        assert_eq!(command_name(args(&["board"])), "board");
        assert_eq!(command_name(args(&["board", "drop", "id"])), "board drop");
        assert_eq!(command_name(args(&["config", "init", "--force"])), "config init");
        assert_eq!(command_name(args(&["login", "--email", "a@b.c"])), "login");
    }

    #[test]
    fn human_output_renders_sections_in_order() {
        let mut out = HumanOutput::new("Board");
        out.push_summary("total", "2");
        out.push_section("To Do", vec!["[high] Ship it".to_string()]);
        out.push_section("Done", Vec::new());
        out.push_next_step("tf task add <title>");

        let text = format_human(&out);
        assert_eq!(
            text,
            "Board\n\nSummary:\n- total: 2\n\nTo Do:\n  [high] Ship it\n\nDone:\n  (none)\n\nNext steps:\n- tf task add <title>"
        );
    }

    #[test]
    fn error_hints() {
        assert_eq!(error_kind(&Error::NotAuthenticated), "user_error");
        assert_eq!(
            error_kind(&Error::OperationFailed("x".to_string())),
            "operation_failed"
        );
        assert_eq!(
            error_next_steps(&Error::TaskNotFound("abc".to_string())),
            vec!["tf task list".to_string()]
        );
        assert!(error_next_steps(&Error::NotAuthenticated)[0].starts_with("tf login"));
        assert!(error_next_steps(&Error::Validation("bad".to_string())).is_empty());
    }
}
