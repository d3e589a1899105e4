//! Kanban board: three fixed columns and drag-and-drop resolution.

use serde::Serialize;

use crate::model::{Task, TaskId, TaskStatus};
use crate::storage::RecordStore;
use crate::store::TaskStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Column {
    pub status: TaskStatus,
    pub title: &'static str,
}

/// Board columns, left to right.
pub const COLUMNS: [Column; 3] = [
    Column {
        status: TaskStatus::Todo,
        title: "To Do",
    },
    Column {
        status: TaskStatus::InProgress,
        title: "In Progress",
    },
    Column {
        status: TaskStatus::Done,
        title: "Done",
    },
];

pub fn column_title(status: TaskStatus) -> &'static str {
    match status {
        TaskStatus::Todo => COLUMNS[0].title,
        TaskStatus::InProgress => COLUMNS[1].title,
        TaskStatus::Done => COLUMNS[2].title,
    }
}

/// Move the item at `from` to position `to`. Out-of-range indices are
/// clamped to the last slot; an empty list is returned unchanged.
pub fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) {
    if items.is_empty() {
        return;
    }
    let last = items.len() - 1;
    let from = from.min(last);
    let to = to.min(last);
    if from == to {
        return;
    }
    let item = items.remove(from);
    items.insert(to, item);
}

/// A card dropped onto a column at a position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardDrop {
    pub task_id: TaskId,
    pub to: TaskStatus,
    pub index: usize,
}

/// What a drop did to the collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum DropEffect {
    Reordered,
    Moved,
    Ignored,
}

/// Resolve a drop against the store.
///
/// Within the card's own column the column is reordered and written back
/// through [`TaskStore::reorder`]. Onto another column only the status
/// changes; the drop index is not kept in that case. Unknown ids are
/// ignored.
pub fn apply_drop<S: RecordStore>(store: &mut TaskStore<S>, drop: &CardDrop) -> DropEffect {
    let Some(task) = store.get(&drop.task_id) else {
        tracing::debug!(task = %drop.task_id, "drop of unknown task ignored");
        return DropEffect::Ignored;
    };

    if task.status != drop.to {
        store.move_task(&task.id, drop.to);
        return DropEffect::Moved;
    }

    let mut column: Vec<Task> = store.column(drop.to);
    let Some(from) = column.iter().position(|t| t.id == task.id) else {
        return DropEffect::Ignored;
    };
    move_item(&mut column, from, drop.index);
    store.reorder(&column);
    DropEffect::Reordered
}
