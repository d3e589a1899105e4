//! tf task command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::context::{ensure_saved, load_signed_in, resolve_task, short_id};
use crate::error::{Error, Result};
use crate::model::{parse_due_date, NewTask, Priority, Task, TaskPatch, TaskStatus};
use crate::output::{emit_success, HumanOutput};
use crate::views;

pub struct AddOptions {
    pub title: String,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub status: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub status: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub id: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct EditOptions {
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    pub clear_due: bool,
    pub status: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RmOptions {
    pub id: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct MoveOptions {
    pub id: String,
    pub status: String,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// A task as shown to users: the stored fields plus the overdue flag.
#[derive(Serialize)]
pub(crate) struct TaskView<'a> {
    #[serde(flatten)]
    pub task: &'a Task,
    pub overdue: bool,
}

#[derive(Serialize)]
struct TaskListOutput<'a> {
    total: usize,
    tasks: Vec<TaskView<'a>>,
}

#[derive(Serialize)]
struct RemovedOutput<'a> {
    removed: &'a Task,
}

/// One-line summary used by list, board and dashboard output.
pub(crate) fn task_line(task: &Task, overdue: bool) -> String {
    let mut line = format!("{} [{}] {}", short_id(&task.id), task.priority, task.title);
    if let Some(due) = task.due_date {
        line.push_str(&format!(" (due {due})"));
    }
    if overdue {
        line.push_str(" OVERDUE");
    }
    line
}

fn require_title(title: &str) -> Result<String> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(Error::Validation("title is required".to_string()));
    }
    Ok(trimmed.to_string())
}

fn parse_optional<T: std::str::FromStr<Err = Error>>(value: Option<&str>) -> Result<Option<T>> {
    value.map(str::parse).transpose()
}

fn describe(human: &mut HumanOutput, task: &Task, overdue: bool) {
    human.push_summary("id", task.id.to_string());
    human.push_summary("status", task.status.to_string());
    human.push_summary("priority", task.priority.to_string());
    let due = match task.due_date {
        Some(due) if overdue => format!("{due} (overdue)"),
        Some(due) => due.to_string(),
        None => "none".to_string(),
    };
    human.push_summary("due", due);
    human.push_summary("created", task.created_at.format("%Y-%m-%d %H:%M").to_string());
    if !task.description.is_empty() {
        human.push_detail(task.description.clone());
    }
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let title = require_title(&options.title)?;
    let priority: Option<Priority> = parse_optional(options.priority.as_deref())?;
    let status: Option<TaskStatus> = parse_optional(options.status.as_deref())?;
    let due = options.due.as_deref().map(parse_due_date).transpose()?;

    let mut ctx = load_signed_in(options.data_dir, options.json, options.quiet)?;
    let defaults = &ctx.config.defaults;
    let fields = NewTask::new(title)
        .description(options.description.unwrap_or_default())
        .priority(priority.unwrap_or(defaults.priority))
        .due(due)
        .status(status.unwrap_or(defaults.status));

    let store = ctx.app.store_mut();
    let task = store.create(fields);
    ensure_saved(store)?;
    let overdue = store.is_overdue(&task);

    let mut human = HumanOutput::new(format!("Added: {}", task.title));
    describe(&mut human, &task, overdue);
    human.push_next_step("tf board");

    emit_success(
        ctx.output,
        "task add",
        &TaskView {
            task: &task,
            overdue,
        },
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let status: Option<TaskStatus> = parse_optional(options.status.as_deref())?;
    let ctx = load_signed_in(options.data_dir, options.json, options.quiet)?;
    let store = ctx.app.store();

    let tasks = match status {
        Some(status) => store.column(status),
        None => store.tasks().to_vec(),
    };
    let today = store.today();
    let output = TaskListOutput {
        total: tasks.len(),
        tasks: tasks
            .iter()
            .map(|task| TaskView {
                task,
                overdue: views::is_overdue(task, today),
            })
            .collect(),
    };

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", output.total.to_string());
    if let Some(status) = status {
        human.push_summary("Status", status.to_string());
    }
    for view in &output.tasks {
        human.push_detail(format!(
            "[{}] {}",
            view.task.status,
            task_line(view.task, view.overdue)
        ));
    }
    if output.total == 0 {
        human.push_next_step("tf task add <title>");
    }

    emit_success(ctx.output, "task list", &output, Some(&human))
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = load_signed_in(options.data_dir, options.json, options.quiet)?;
    let store = ctx.app.store();
    let task = resolve_task(store, &options.id)?;
    let overdue = store.is_overdue(&task);

    let mut human = HumanOutput::new(task.title.clone());
    describe(&mut human, &task, overdue);

    emit_success(
        ctx.output,
        "task show",
        &TaskView {
            task: &task,
            overdue,
        },
        Some(&human),
    )
}

pub fn run_edit(options: EditOptions) -> Result<()> {
    let due_date = if options.clear_due {
        Some(None)
    } else {
        options
            .due
            .as_deref()
            .map(parse_due_date)
            .transpose()?
            .map(Some)
    };
    let patch = TaskPatch {
        title: options.title.as_deref().map(require_title).transpose()?,
        description: options.description,
        priority: parse_optional(options.priority.as_deref())?,
        due_date,
        status: parse_optional(options.status.as_deref())?,
    };
    if patch.is_empty() {
        return Err(Error::InvalidArgument(
            "nothing to change (pass --title, --description, --priority, --due, --clear-due or --status)"
                .to_string(),
        ));
    }

    let mut ctx = load_signed_in(options.data_dir, options.json, options.quiet)?;
    let store = ctx.app.store_mut();
    let target = resolve_task(store, &options.id)?;
    store.update(&target.id, &patch);
    ensure_saved(store)?;
    let task = store
        .get(&target.id)
        .ok_or_else(|| Error::TaskNotFound(target.id.to_string()))?;
    let overdue = store.is_overdue(&task);

    let mut human = HumanOutput::new(format!("Updated: {}", task.title));
    describe(&mut human, &task, overdue);

    emit_success(
        ctx.output,
        "task edit",
        &TaskView {
            task: &task,
            overdue,
        },
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut ctx = load_signed_in(options.data_dir, options.json, options.quiet)?;
    let store = ctx.app.store_mut();
    let task = resolve_task(store, &options.id)?;
    store.delete(&task.id);
    ensure_saved(store)?;

    let mut human = HumanOutput::new(format!("Deleted: {}", task.title));
    human.push_summary("id", task.id.to_string());
    human.push_summary("remaining", store.tasks().len().to_string());

    emit_success(
        ctx.output,
        "task rm",
        &RemovedOutput { removed: &task },
        Some(&human),
    )
}

pub fn run_move(options: MoveOptions) -> Result<()> {
    let status: TaskStatus = options.status.parse()?;
    let mut ctx = load_signed_in(options.data_dir, options.json, options.quiet)?;
    let store = ctx.app.store_mut();
    let target = resolve_task(store, &options.id)?;
    store.move_task(&target.id, status);
    ensure_saved(store)?;
    let task = store
        .get(&target.id)
        .ok_or_else(|| Error::TaskNotFound(target.id.to_string()))?;
    let overdue = store.is_overdue(&task);

    let mut human = HumanOutput::new(format!("Moved: {}", task.title));
    human.push_summary("from", target.status.to_string());
    human.push_summary("to", task.status.to_string());

    emit_success(
        ctx.output,
        "task move",
        &TaskView {
            task: &task,
            overdue,
        },
        Some(&human),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    use crate::model::TaskId;

    fn sample() -> Task {
        Task {
            id: TaskId::from("0123456789"),
            title: "Write docs".to_string(),
            description: String::new(),
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 6, 1),
            status: TaskStatus::Todo,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 8, 0, 0).unwrap(),
        }
    }

    #[test]
    fn task_line_marks_overdue() {
        let task = sample();
        assert_eq!(
            task_line(&task, true),
            "01234567 [high] Write docs (due 2024-06-01) OVERDUE"
        );
        assert_eq!(task_line(&task, false), "01234567 [high] Write docs (due 2024-06-01)");
    }

    #[test]
    fn task_view_flattens_wire_fields() {
        let task = sample();
        let json = serde_json::to_value(TaskView {
            task: &task,
            overdue: true,
        })
        .unwrap();
        assert_eq!(json["dueDate"], "2024-06-01");
        assert_eq!(json["status"], "todo");
        assert_eq!(json["overdue"], true);
    }

    #[test]
    fn title_must_not_be_blank() {
        assert_eq!(require_title("  Ship  ").unwrap(), "Ship");
        assert!(matches!(require_title("   "), Err(Error::Validation(_))));
    }
}
