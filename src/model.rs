//! Records persisted by taskflow: tasks, users and the auth session.
//!
//! The serialized shape is camelCase JSON so existing records written by
//! earlier versions of the app keep loading with identical ids and values.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{Error, Result};

/// Opaque task identifier, unique within one user's collection.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Opaque user identifier; also the suffix of the user's task record name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Workflow state of a task. Each state is one board column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 3] = [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Done];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskStatus {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "todo" | "to-do" => Ok(TaskStatus::Todo),
            "in-progress" | "in_progress" | "inprogress" => Ok(TaskStatus::InProgress),
            "done" => Ok(TaskStatus::Done),
            other => Err(Error::InvalidArgument(format!(
                "invalid status '{other}' (expected todo|in-progress|done)"
            ))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(Error::InvalidArgument(format!(
                "invalid priority '{other}' (expected low|medium|high)"
            ))),
        }
    }
}

/// Parse a `YYYY-MM-DD` due date as entered on the command line.
pub fn parse_due_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|err| {
        Error::InvalidArgument(format!("invalid due date '{value}': {err} (expected YYYY-MM-DD)"))
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub priority: Priority,
    #[serde(default, with = "due_date")]
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Build a task with a fresh id, stamped at `now`.
    pub fn new(fields: NewTask, now: DateTime<Utc>) -> Self {
        Self {
            id: TaskId::generate(),
            title: fields.title,
            description: fields.description,
            priority: fields.priority,
            due_date: fields.due_date,
            status: fields.status,
            created_at: now,
        }
    }
}

/// Caller-supplied fields for a new task. The store does not validate them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
}

impl NewTask {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            priority: Priority::Medium,
            due_date: None,
            status: TaskStatus::Todo,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn due(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = due_date;
        self
    }

    pub fn status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }
}

/// Partial update; `None` leaves the field untouched.
///
/// `id` and `created_at` cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    /// `Some(None)` clears the due date.
    pub due_date: Option<Option<NaiveDate>>,
    pub status: Option<TaskStatus>,
}

impl TaskPatch {
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.status.is_none()
    }

    /// Return a copy of `task` with the listed fields replaced.
    pub fn apply(&self, task: &Task) -> Task {
        let mut next = task.clone();
        if let Some(title) = &self.title {
            next.title = title.clone();
        }
        if let Some(description) = &self.description {
            next.description = description.clone();
        }
        if let Some(priority) = self.priority {
            next.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            next.due_date = due_date;
        }
        if let Some(status) = self.status {
            next.status = status;
        }
        next
    }
}

/// A registered account, including its plain-text credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub password: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn public(&self) -> PublicUser {
        PublicUser {
            id: self.id.clone(),
            email: self.email.clone(),
            name: self.name.clone(),
            created_at: self.created_at,
        }
    }
}

/// The profile exposed outside the identity directory (no credential).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: UserId,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthState {
    pub user: Option<PublicUser>,
    pub is_authenticated: bool,
}

impl AuthState {
    pub fn signed_in(user: PublicUser) -> Self {
        Self {
            user: Some(user),
            is_authenticated: true,
        }
    }

    pub fn user_id(&self) -> Option<&UserId> {
        if !self.is_authenticated {
            return None;
        }
        self.user.as_ref().map(|user| &user.id)
    }
}

/// `dueDate` is stored as `"YYYY-MM-DD"`, with `""` meaning no due date.
mod due_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveDate>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(date) => serializer.serialize_str(&date.format("%Y-%m-%d").to_string()),
            None => serializer.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw: Option<String> = Option::deserialize(deserializer)?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(None);
        }
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
            return Ok(Some(date));
        }
        // Full timestamps keep only their calendar day.
        DateTime::parse_from_rfc3339(trimmed)
            .map(|dt| Some(dt.date_naive()))
            .map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Task {
        Task {
            id: TaskId::from("t-1"),
            title: "Write docs".to_string(),
            description: String::new(),
            priority: Priority::High,
            due_date: NaiveDate::from_ymd_opt(2024, 3, 9),
            status: TaskStatus::InProgress,
            created_at: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn task_serializes_with_camel_case_wire_names() {
        let json = serde_json::to_value(sample()).expect("serialize");
        assert_eq!(json["dueDate"], "2024-03-09");
        assert_eq!(json["status"], "in-progress");
        assert_eq!(json["priority"], "high");
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn empty_due_date_reads_as_none() {
        let raw = r#"{"id":"a","title":"x","description":"","priority":"low",
            "dueDate":"","status":"todo","createdAt":"2024-01-01T00:00:00.000Z"}"#;
        let task: Task = serde_json::from_str(raw).expect("parse");
        assert_eq!(task.due_date, None);

        let json = serde_json::to_value(&task).expect("serialize");
        assert_eq!(json["dueDate"], "");
    }

    #[test]
    fn due_date_timestamp_keeps_calendar_day() {
        let raw = r#"{"id":"a","title":"x","priority":"low",
            "dueDate":"2024-05-02T18:30:00Z","status":"done","createdAt":"2024-01-01T00:00:00Z"}"#;
        let task: Task = serde_json::from_str(raw).expect("parse");
        assert_eq!(task.due_date, NaiveDate::from_ymd_opt(2024, 5, 2));
        assert_eq!(task.description, "");
    }

    #[test]
    fn unknown_status_is_rejected() {
        let raw = r#"{"id":"a","title":"x","priority":"low","status":"archived",
            "createdAt":"2024-01-01T00:00:00Z"}"#;
        assert!(serde_json::from_str::<Task>(raw).is_err());
    }

    #[test]
    fn patch_replaces_only_listed_fields() {
        let task = sample();
        let patch = TaskPatch {
            title: Some("Ship docs".to_string()),
            due_date: Some(None),
            ..TaskPatch::default()
        };
        let next = patch.apply(&task);
        assert_eq!(next.title, "Ship docs");
        assert_eq!(next.due_date, None);
        assert_eq!(next.id, task.id);
        assert_eq!(next.created_at, task.created_at);
        assert_eq!(next.priority, task.priority);
        assert_eq!(next.status, task.status);
    }

    #[test]
    fn status_parses_aliases() {
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!(" Done ".parse::<TaskStatus>().unwrap(), TaskStatus::Done);
        assert!("later".parse::<TaskStatus>().is_err());
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn auth_state_hides_user_id_when_signed_out() {
        let state = AuthState {
            user: Some(PublicUser {
                id: UserId::from("u-1"),
                email: "a@b.co".to_string(),
                name: "A".to_string(),
                created_at: Utc::now(),
            }),
            is_authenticated: false,
        };
        assert_eq!(state.user_id(), None);
    }
}
