//! Starter tasks for a user with no saved collection.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::model::{NewTask, Priority, Task, TaskStatus};

/// (title, description, priority, due offset in days, status)
const SEED_TASKS: [(&str, &str, Priority, i64, TaskStatus); 5] = [
    (
        "Design landing page",
        "Wireframes + hi-fi mockups for the product page.",
        Priority::High,
        3,
        TaskStatus::Todo,
    ),
    (
        "Set up CI/CD pipeline",
        "Configure GitHub Actions for automated testing.",
        Priority::Medium,
        7,
        TaskStatus::Todo,
    ),
    (
        "Write unit tests",
        "Add tests for all core service methods.",
        Priority::Low,
        -2,
        TaskStatus::InProgress,
    ),
    (
        "API integration",
        "Connect frontend to the REST API endpoints.",
        Priority::High,
        1,
        TaskStatus::InProgress,
    ),
    (
        "Update README",
        "Add setup instructions and architecture notes.",
        Priority::Low,
        -5,
        TaskStatus::Done,
    ),
];

/// Five tasks with due dates relative to `today`, all created at `now`.
pub fn seed_tasks(today: NaiveDate, now: DateTime<Utc>) -> Vec<Task> {
    SEED_TASKS
        .iter()
        .map(|(title, description, priority, offset, status)| {
            let fields = NewTask::new(*title)
                .description(*description)
                .priority(*priority)
                .due(Some(today + Duration::days(*offset)))
                .status(*status);
            Task::new(fields, now)
        })
        .collect()
}
