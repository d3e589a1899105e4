//! tf dashboard

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::context::load_signed_in;
use crate::cli::task::{task_line, TaskView};
use crate::error::Result;
use crate::model::Priority;
use crate::output::{emit_success, HumanOutput};
use crate::views::{self, DashboardStats};

pub struct DashboardOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct DashboardOutput<'a> {
    user: &'a str,
    stats: DashboardStats,
    recent: Vec<TaskView<'a>>,
}

pub fn run(options: DashboardOptions) -> Result<()> {
    let ctx = load_signed_in(options.data_dir, options.json, options.quiet)?;
    let user = ctx.app.require_user()?;
    let store = ctx.app.store();
    let today = store.today();
    let stats = store.stats();
    let recent = store.recent(ctx.config.dashboard.recent_limit);

    let output = DashboardOutput {
        user: &user.name,
        stats,
        recent: recent
            .iter()
            .map(|task| TaskView {
                task,
                overdue: views::is_overdue(task, today),
            })
            .collect(),
    };

    let mut human = HumanOutput::new(format!("Dashboard for {}", user.name));
    human.push_summary("Total", stats.total.to_string());
    human.push_summary("To Do", stats.todo.to_string());
    human.push_summary("In Progress", stats.in_progress.to_string());
    human.push_summary("Completed", stats.completed.to_string());
    human.push_summary("Overdue", stats.overdue.to_string());
    human.push_summary("Completion", format!("{}%", stats.completion_percentage));
    human.push_section(
        "Priority",
        [Priority::High, Priority::Medium, Priority::Low]
            .into_iter()
            .map(|priority| format!("{priority}: {}", stats.priority_breakdown.get(priority)))
            .collect(),
    );
    human.push_section(
        "Recent",
        output
            .recent
            .iter()
            .map(|view| format!("[{}] {}", view.task.status, task_line(view.task, view.overdue)))
            .collect(),
    );
    if stats.overdue > 0 {
        human.push_warning(format!("{} task(s) overdue", stats.overdue));
    }

    emit_success(ctx.output, "dashboard", &output, Some(&human))
}
