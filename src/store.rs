//! The per-user task store.
//!
//! [`TaskStore`] owns the task collection of the signed-in user. Every
//! mutation builds a new collection, writes it to the user's durable record
//! and publishes it as an immutable [`Snapshot`] to all subscribers.
//! Snapshots handed out earlier are never modified.
//!
//! Storage trouble never reaches callers: a missing or corrupt record is
//! treated as absent (and reseeded), a failed write is logged and the
//! in-memory collection stays authoritative. The outcome of the latest
//! write is kept for callers that outlive only one change, see
//! [`TaskStore::last_persist_error`].

use std::collections::HashSet;
use std::rc::Rc;
use std::sync::Arc;

use chrono::NaiveDate;

use crate::clock::Clock;
use crate::model::{NewTask, Task, TaskId, TaskPatch, TaskStatus, UserId};
use crate::seed::seed_tasks;
use crate::storage::{read_json, write_json, RecordStore, StorageKeys};
use crate::subject::{Subject, SubscriptionId};
use crate::views::{self, DashboardStats};

/// An immutable view of the whole collection, in collection order.
pub type Snapshot = Arc<[Task]>;

/// Identity changes the store reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    LoggedIn(UserId),
    LoggedOut,
}

pub struct TaskStore<S: RecordStore> {
    records: S,
    keys: StorageKeys,
    clock: Rc<dyn Clock>,
    user: Option<UserId>,
    tasks: Subject<Snapshot>,
    persist_error: Option<String>,
}

impl<S: RecordStore> TaskStore<S> {
    /// An empty store with no user; call [`load`](Self::load) to populate it.
    pub fn new(records: S, keys: StorageKeys, clock: Rc<dyn Clock>) -> Self {
        Self {
            records,
            keys,
            clock,
            user: None,
            tasks: Subject::new(Arc::from(Vec::new())),
            persist_error: None,
        }
    }

    /// The user whose collection is currently held.
    pub fn user(&self) -> Option<&UserId> {
        self.user.as_ref()
    }

    pub fn tasks(&self) -> Snapshot {
        Arc::clone(self.tasks.value())
    }

    pub fn get(&self, id: &TaskId) -> Option<Task> {
        self.tasks.value().iter().find(|task| &task.id == id).cloned()
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn column(&self, status: TaskStatus) -> Vec<Task> {
        views::partition(self.tasks.value(), status)
    }

    pub fn stats(&self) -> DashboardStats {
        DashboardStats::compute(self.tasks.value(), self.clock.today())
    }

    pub fn recent(&self, limit: usize) -> Vec<Task> {
        views::recent(self.tasks.value(), limit)
    }

    pub fn is_overdue(&self, task: &Task) -> bool {
        views::is_overdue(task, self.clock.today())
    }

    /// Why the most recent write of the collection failed, if it did.
    /// Cleared by the next successful write.
    pub fn last_persist_error(&self) -> Option<&str> {
        self.persist_error.as_deref()
    }

    /// Make `user`'s collection current.
    ///
    /// With no user the store is emptied. Otherwise the user's record is
    /// adopted as-is; when there is none (or it cannot be decoded) the
    /// seed tasks are generated, written immediately and adopted.
    pub fn load(&mut self, user: Option<&UserId>) {
        let Some(user) = user else {
            tracing::debug!("no active session, clearing task collection");
            self.user = None;
            self.persist_error = None;
            self.tasks.publish(Arc::from(Vec::new()));
            return;
        };

        self.user = Some(user.clone());
        let key = self.keys.tasks(user);
        let tasks = match read_json::<_, Vec<Task>>(&self.records, &key) {
            Some(tasks) => {
                tracing::debug!(user = %user, count = tasks.len(), "loaded tasks");
                tasks
            }
            None => {
                let seeded = seed_tasks(self.clock.today(), self.clock.now());
                tracing::debug!(user = %user, "no saved tasks, seeding");
                self.persist(&seeded);
                seeded
            }
        };
        self.tasks.publish(Arc::from(tasks));
    }

    /// Append a new task. Fields are taken as given; an empty title is fine.
    pub fn create(&mut self, fields: NewTask) -> Task {
        let task = Task::new(fields, self.clock.now());
        let mut next = self.tasks.value().to_vec();
        next.push(task.clone());
        self.commit(next);
        task
    }

    /// Replace the listed fields of the task with `id`, keeping its position.
    /// An unknown id changes nothing but still persists and republishes.
    pub fn update(&mut self, id: &TaskId, patch: &TaskPatch) {
        let next = self
            .tasks
            .value()
            .iter()
            .map(|task| {
                if &task.id == id {
                    patch.apply(task)
                } else {
                    task.clone()
                }
            })
            .collect();
        self.commit(next);
    }

    pub fn delete(&mut self, id: &TaskId) {
        let next = self
            .tasks
            .value()
            .iter()
            .filter(|task| &task.id != id)
            .cloned()
            .collect();
        self.commit(next);
    }

    /// Change only the workflow state of a task.
    pub fn move_task(&mut self, id: &TaskId, status: TaskStatus) {
        self.update(id, &TaskPatch::status(status));
    }

    /// Pull every task named in `subset` out of the collection and append
    /// `subset`, in the given order, after the remaining tasks.
    ///
    /// The appended values are the ones supplied, so a caller can reorder
    /// and restate a column in one step. Entries whose id is not in the
    /// collection, and repeated ids, are dropped.
    pub fn reorder(&mut self, subset: &[Task]) {
        let current = self.tasks.value();
        let known: HashSet<&TaskId> = current.iter().map(|task| &task.id).collect();

        let mut seen: HashSet<&TaskId> = HashSet::new();
        let moved: Vec<Task> = subset
            .iter()
            .filter(|&task| known.contains(&task.id) && seen.insert(&task.id))
            .cloned()
            .collect();

        let mut next: Vec<Task> = current
            .iter()
            .filter(|task| !seen.contains(&task.id))
            .cloned()
            .collect();
        next.extend(moved);
        self.commit(next);
    }

    /// Receive the current snapshot now and every later one.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: FnMut(&Snapshot) + 'static,
    {
        self.tasks.subscribe(callback)
    }

    /// Receive dashboard statistics recomputed from every snapshot.
    pub fn subscribe_stats<F>(&mut self, mut callback: F) -> SubscriptionId
    where
        F: FnMut(&DashboardStats) + 'static,
    {
        let clock = Rc::clone(&self.clock);
        self.tasks.subscribe(move |tasks: &Snapshot| {
            callback(&DashboardStats::compute(tasks, clock.today()));
        })
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.tasks.unsubscribe(id)
    }

    /// Follow the identity directory: load on sign-in as a different
    /// user, drop the in-memory collection on sign-out. Durable records
    /// are left in place either way.
    pub fn handle_auth_event(&mut self, event: &AuthEvent) {
        match event {
            AuthEvent::LoggedIn(user) => {
                if self.user.as_ref() != Some(user) {
                    self.load(Some(user));
                }
            }
            AuthEvent::LoggedOut => self.load(None),
        }
    }

    fn commit(&mut self, next: Vec<Task>) {
        self.persist(&next);
        self.tasks.publish(Arc::from(next));
    }

    fn persist(&mut self, tasks: &[Task]) {
        let Some(user) = &self.user else {
            tracing::debug!("no active session, task change kept in memory only");
            return;
        };
        let key = self.keys.tasks(user);
        self.persist_error = match write_json(&self.records, &key, tasks) {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "failed to persist tasks");
                Some(err.to_string())
            }
        };
    }
}
