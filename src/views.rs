//! Read models derived from a task collection.
//!
//! Everything here is a pure function of a task slice (plus "today" for the
//! overdue policy). Nothing is cached: callers recompute on every change.

use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{Priority, Task, TaskStatus};

/// Default number of entries in the dashboard's recent list.
pub const DEFAULT_RECENT_LIMIT: usize = 6;

/// Tasks in one column, in collection order.
pub fn partition(tasks: &[Task], status: TaskStatus) -> Vec<Task> {
    tasks
        .iter()
        .filter(|task| task.status == status)
        .cloned()
        .collect()
}

/// A task is overdue when it is not done and its due day is strictly
/// before `today`. Tasks without a due date are never overdue.
///
/// This is the only overdue rule; card badges and dashboard counters
/// both go through it.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    if task.status == TaskStatus::Done {
        return false;
    }
    match task.due_date {
        Some(due) => due < today,
        None => false,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct PriorityBreakdown {
    pub low: usize,
    pub medium: usize,
    pub high: usize,
}

impl PriorityBreakdown {
    pub fn get(&self, priority: Priority) -> usize {
        match priority {
            Priority::Low => self.low,
            Priority::Medium => self.medium,
            Priority::High => self.high,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total: usize,
    pub completed: usize,
    pub in_progress: usize,
    pub todo: usize,
    pub overdue: usize,
    pub completion_percentage: u32,
    pub priority_breakdown: PriorityBreakdown,
}

impl DashboardStats {
    pub fn compute(tasks: &[Task], today: NaiveDate) -> Self {
        let mut stats = DashboardStats {
            total: tasks.len(),
            ..DashboardStats::default()
        };

        for task in tasks {
            match task.status {
                TaskStatus::Todo => stats.todo += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Done => stats.completed += 1,
            }
            match task.priority {
                Priority::Low => stats.priority_breakdown.low += 1,
                Priority::Medium => stats.priority_breakdown.medium += 1,
                Priority::High => stats.priority_breakdown.high += 1,
            }
            if is_overdue(task, today) {
                stats.overdue += 1;
            }
        }

        stats.completion_percentage = completion_percentage(stats.completed, stats.total);
        stats
    }
}

/// `round(100 * completed / total)` with halves rounded up; 0 for no tasks.
pub fn completion_percentage(completed: usize, total: usize) -> u32 {
    if total == 0 {
        return 0;
    }
    let rounded = (completed * 200 + total) / (total * 2);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}

/// Newest tasks first by creation time, at most `limit` of them.
/// Tasks created at the same instant keep their collection order.
pub fn recent(tasks: &[Task], limit: usize) -> Vec<Task> {
    let mut sorted = tasks.to_vec();
    sorted.sort_by(|left, right| right.created_at.cmp(&left.created_at));
    sorted.truncate(limit);
    sorted
}
