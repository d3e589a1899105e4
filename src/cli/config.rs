//! tf config: write and inspect `config.toml`.

use std::fs;
use std::path::PathBuf;

use serde::Serialize;

use crate::cli::context::resolve_data_dir;
use crate::config::{Config, CONFIG_FILE};
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};

pub struct InitOptions {
    pub force: bool,
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ConfigReport<'a> {
    path: String,
    exists: bool,
    config: &'a Config,
}

fn describe(human: &mut HumanOutput, config: &Config) {
    human.push_summary("storage.key_prefix", config.storage.key_prefix.clone());
    human.push_summary(
        "dashboard.recent_limit",
        config.dashboard.recent_limit.to_string(),
    );
    human.push_summary("defaults.priority", config.defaults.priority.to_string());
    human.push_summary("defaults.status", config.defaults.status.to_string());
}

pub fn run_init(options: InitOptions) -> Result<()> {
    let data_dir = resolve_data_dir(options.data_dir);
    let path = data_dir.join(CONFIG_FILE);
    if path.exists() && !options.force {
        return Err(Error::InvalidArgument(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }

    fs::create_dir_all(&data_dir)?;
    let config = Config::default();
    config.save(&path)?;
    tracing::debug!(path = %path.display(), "wrote default config");

    let mut human = HumanOutput::new(format!("Wrote {}", path.display()));
    describe(&mut human, &config);
    human.push_next_step("tf config show");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "config init",
        &ConfigReport {
            path: path.display().to_string(),
            exists: true,
            config: &config,
        },
        Some(&human),
    )
}

/// Unlike other commands, an invalid file is an error here rather than
/// a silent fallback to defaults.
pub fn run_show(options: ShowOptions) -> Result<()> {
    let path = resolve_data_dir(options.data_dir).join(CONFIG_FILE);
    let exists = path.exists();
    let config = if exists {
        Config::load(&path)?
    } else {
        Config::default()
    };

    let header = if exists {
        format!("Config: {}", path.display())
    } else {
        "Config: defaults (no config.toml)".to_string()
    };
    let mut human = HumanOutput::new(header);
    describe(&mut human, &config);
    if !exists {
        human.push_next_step("tf config init");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "config show",
        &ConfigReport {
            path: path.display().to_string(),
            exists,
            config: &config,
        },
        Some(&human),
    )
}
