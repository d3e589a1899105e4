//! taskflow - personal task tracker library
//!
//! This library provides the core of the `tf` CLI: a per-user reactive task
//! store, the views derived from it, and a local identity directory.
//!
//! # Core Concepts
//!
//! - **Task Store**: one ordered task collection per signed-in user,
//!   persisted on every change and published as immutable snapshots
//! - **Derived views**: board columns, overdue policy, dashboard statistics
//!   and the recent-tasks list, all pure functions of a snapshot
//! - **Identity Directory**: registration, login and a restorable session
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `config.toml`
//! - `error`: Error types and result aliases
//! - `storage`: Durable records (`RecordStore`, `FileStore`, `MemoryStore`)
//! - `lock`: File locking and atomic writes for concurrency safety
//! - `model`: Tasks, users and the auth session
//! - `clock`: Source of "now" and "today"
//! - `subject`: Replay-latest multicast used for change notification
//! - `views`: Derived View Engine
//! - `seed`: Starter tasks for new collections
//! - `store`: Task Store
//! - `identity`: Identity Directory
//! - `board`: Board columns and drag-and-drop resolution
//! - `session`: Application context wiring identity to tasks
//! - `output`: Human and JSON output envelopes

pub mod board;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod identity;
pub mod lock;
pub mod model;
pub mod output;
pub mod seed;
pub mod session;
pub mod storage;
pub mod store;
pub mod subject;
pub mod views;

pub use error::{Error, Result};
