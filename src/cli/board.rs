//! tf board: column view and card drops.

use std::path::PathBuf;

use serde::Serialize;

use crate::board::{apply_drop, column_title, CardDrop, DropEffect, COLUMNS};
use crate::cli::context::{ensure_saved, load_signed_in, resolve_task};
use crate::cli::task::{task_line, TaskView};
use crate::error::Result;
use crate::model::{Task, TaskStatus};
use crate::output::{emit_success, HumanOutput};
use crate::views;

pub struct ShowOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct DropOptions {
    pub id: String,
    pub to: String,
    pub index: usize,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ColumnOutput<'a> {
    status: TaskStatus,
    title: &'static str,
    count: usize,
    tasks: Vec<TaskView<'a>>,
}

#[derive(Serialize)]
struct BoardOutput<'a> {
    columns: Vec<ColumnOutput<'a>>,
}

#[derive(Serialize)]
struct DropOutput<'a> {
    effect: DropEffect,
    task: TaskView<'a>,
    /// Final position of the card within its column
    position: Option<usize>,
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = load_signed_in(options.data_dir, options.json, options.quiet)?;
    let store = ctx.app.store();
    let today = store.today();
    let columns: Vec<(TaskStatus, Vec<Task>)> = COLUMNS
        .iter()
        .map(|column| (column.status, store.column(column.status)))
        .collect();

    let output = BoardOutput {
        columns: columns
            .iter()
            .map(|(status, tasks)| ColumnOutput {
                status: *status,
                title: column_title(*status),
                count: tasks.len(),
                tasks: tasks
                    .iter()
                    .map(|task| TaskView {
                        task,
                        overdue: views::is_overdue(task, today),
                    })
                    .collect(),
            })
            .collect(),
    };

    let mut human = HumanOutput::new("Board");
    for column in &output.columns {
        human.push_section(
            format!("{} ({})", column.title, column.count),
            column
                .tasks
                .iter()
                .map(|view| task_line(view.task, view.overdue))
                .collect(),
        );
    }

    emit_success(ctx.output, "board", &output, Some(&human))
}

pub fn run_drop(options: DropOptions) -> Result<()> {
    let to: TaskStatus = options.to.parse()?;
    let mut ctx = load_signed_in(options.data_dir, options.json, options.quiet)?;
    let store = ctx.app.store_mut();
    let task = resolve_task(store, &options.id)?;

    let effect = apply_drop(
        store,
        &CardDrop {
            task_id: task.id.clone(),
            to,
            index: options.index,
        },
    );
    ensure_saved(store)?;

    let column = store.column(to);
    let position = column.iter().position(|t| t.id == task.id);
    let dropped = position
        .and_then(|idx| column.get(idx).cloned())
        .unwrap_or(task);
    let overdue = store.is_overdue(&dropped);

    let header = match effect {
        DropEffect::Reordered => format!("Reordered {}", column_title(to)),
        DropEffect::Moved => format!("Moved to {}", column_title(to)),
        DropEffect::Ignored => "Nothing to do".to_string(),
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("task", dropped.title.clone());
    if let Some(position) = position {
        human.push_summary("position", position.to_string());
    }
    human.push_next_step("tf board");

    emit_success(
        ctx.output,
        "board drop",
        &DropOutput {
            effect,
            task: TaskView {
                task: &dropped,
                overdue,
            },
            position,
        },
        Some(&human),
    )
}
