//! Shared setup for commands: data directory, config, and the app context.

use std::path::PathBuf;
use std::rc::Rc;

use directories::ProjectDirs;

use crate::clock::SystemClock;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Task, TaskId};
use crate::output::OutputOptions;
use crate::session::App;
use crate::storage::{FileStore, RecordStore};
use crate::store::TaskStore;

/// Fallback when the platform has no data directory
const LOCAL_DATA_DIR: &str = ".taskflow";

/// Pick the data directory: explicit flag/env value first, then the
/// platform data dir, then `./.taskflow`.
pub fn resolve_data_dir(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = explicit {
        return dir;
    }
    match ProjectDirs::from("", "", "taskflow") {
        Some(dirs) => dirs.data_dir().to_path_buf(),
        None => PathBuf::from(LOCAL_DATA_DIR),
    }
}

pub(crate) struct CommandContext {
    pub app: App<FileStore>,
    pub config: Config,
    pub output: OutputOptions,
}

pub(crate) fn load_context(data_dir: Option<PathBuf>, json: bool, quiet: bool) -> CommandContext {
    let data_dir = resolve_data_dir(data_dir);
    tracing::debug!(data_dir = %data_dir.display(), "opening data directory");
    let config = Config::load_from_dir(&data_dir);
    let app = App::open(FileStore::new(data_dir), Rc::new(SystemClock), &config);
    CommandContext {
        app,
        config,
        output: OutputOptions { json, quiet },
    }
}

/// Like [`load_context`], but fails unless someone is signed in.
pub(crate) fn load_signed_in(
    data_dir: Option<PathBuf>,
    json: bool,
    quiet: bool,
) -> Result<CommandContext> {
    let ctx = load_context(data_dir, json, quiet);
    ctx.app.require_user()?;
    Ok(ctx)
}

/// Fail when the store could not write the last change, which would
/// otherwise be lost when the process exits.
pub(crate) fn ensure_saved<S: RecordStore>(store: &TaskStore<S>) -> Result<()> {
    match store.last_persist_error() {
        Some(err) => Err(Error::OperationFailed(format!("could not save tasks: {err}"))),
        None => Ok(()),
    }
}

/// Find a task by full id or by a unique id prefix.
pub(crate) fn resolve_task<S: RecordStore>(store: &TaskStore<S>, input: &str) -> Result<Task> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidArgument("task id cannot be empty".to_string()));
    }

    if let Some(task) = store.get(&TaskId::from(trimmed)) {
        return Ok(task);
    }

    let needle = trimmed.to_ascii_lowercase();
    let mut matches: Vec<Task> = store
        .tasks()
        .iter()
        .filter(|task| task.id.as_str().to_ascii_lowercase().starts_with(&needle))
        .cloned()
        .collect();

    match matches.len() {
        0 => Err(Error::TaskNotFound(trimmed.to_string())),
        1 => Ok(matches.remove(0)),
        _ => {
            let ids: Vec<&str> = matches.iter().map(|task| task.id.as_str()).collect();
            Err(Error::InvalidArgument(format!(
                "ambiguous task id '{trimmed}': {}",
                ids.join(", ")
            )))
        }
    }
}

/// First eight characters of an id, for human output.
pub(crate) fn short_id(id: &TaskId) -> &str {
    let raw = id.as_str();
    match raw.char_indices().nth(8) {
        Some((end, _)) => &raw[..end],
        None => raw,
    }
}
