//! Command-line interface for tf
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::error::Result;

mod auth;
mod board;
mod config;
mod context;
mod dashboard;
mod task;

pub use context::resolve_data_dir;

/// tf - personal task tracker
///
/// Tasks live on a three-column board (To Do, In Progress, Done) and are
/// kept per account in a local data directory.
#[derive(Parser, Debug)]
#[command(name = "tf")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Data directory (defaults to the platform data dir)
    #[arg(long, global = true, env = "TF_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create an account
    Register {
        #[arg(long)]
        name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign in and load your tasks
    Login {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,
    },

    /// Sign out
    Logout,

    /// Show the signed-in account
    Whoami,

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Kanban board
    Board {
        #[command(subcommand)]
        command: Option<BoardCommands>,
    },

    /// Statistics and recent tasks
    Dashboard,

    /// Settings file in the data directory
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config.toml with default settings
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the settings in effect
    Show,
}

#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Add a task
    Add {
        title: String,

        #[arg(short, long)]
        description: Option<String>,

        /// low, medium or high (default from config)
        #[arg(short, long)]
        priority: Option<String>,

        /// Due date (YYYY-MM-DD)
        #[arg(long)]
        due: Option<String>,

        /// todo, in-progress or done (default from config)
        #[arg(short, long)]
        status: Option<String>,
    },

    /// List tasks in collection order
    #[command(alias = "ls")]
    List {
        #[arg(short, long)]
        status: Option<String>,
    },

    /// Show one task
    Show {
        /// Task id or unique id prefix
        id: String,
    },

    /// Change task fields
    Edit {
        id: String,

        #[arg(long)]
        title: Option<String>,

        #[arg(short, long)]
        description: Option<String>,

        #[arg(short, long)]
        priority: Option<String>,

        #[arg(long, conflicts_with = "clear_due")]
        due: Option<String>,

        /// Remove the due date
        #[arg(long)]
        clear_due: bool,

        #[arg(short, long)]
        status: Option<String>,
    },

    /// Delete a task
    #[command(alias = "delete")]
    Rm { id: String },

    /// Move a task to another column
    Move { id: String, status: String },
}

#[derive(Subcommand, Debug)]
pub enum BoardCommands {
    /// Drop a card onto a column at a position
    Drop {
        id: String,

        /// Target column
        #[arg(long)]
        to: String,

        /// Position within the target column (0-based)
        #[arg(long, default_value_t = 0)]
        index: usize,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let data_dir = self.data_dir;
        let json = self.json;
        let quiet = self.quiet;

        match self.command {
            Commands::Register {
                name,
                email,
                password,
            } => auth::run_register(auth::RegisterOptions {
                name,
                email,
                password,
                data_dir,
                json,
                quiet,
            }),
            Commands::Login { email, password } => auth::run_login(auth::LoginOptions {
                email,
                password,
                data_dir,
                json,
                quiet,
            }),
            Commands::Logout => auth::run_logout(auth::SessionOptions {
                data_dir,
                json,
                quiet,
            }),
            Commands::Whoami => auth::run_whoami(auth::SessionOptions {
                data_dir,
                json,
                quiet,
            }),
            Commands::Task(cmd) => match cmd {
                TaskCommands::Add {
                    title,
                    description,
                    priority,
                    due,
                    status,
                } => task::run_add(task::AddOptions {
                    title,
                    description,
                    priority,
                    due,
                    status,
                    data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::List { status } => task::run_list(task::ListOptions {
                    status,
                    data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::Show { id } => task::run_show(task::ShowOptions {
                    id,
                    data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::Edit {
                    id,
                    title,
                    description,
                    priority,
                    due,
                    clear_due,
                    status,
                } => task::run_edit(task::EditOptions {
                    id,
                    title,
                    description,
                    priority,
                    due,
                    clear_due,
                    status,
                    data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::Rm { id } => task::run_rm(task::RmOptions {
                    id,
                    data_dir,
                    json,
                    quiet,
                }),
                TaskCommands::Move { id, status } => task::run_move(task::MoveOptions {
                    id,
                    status,
                    data_dir,
                    json,
                    quiet,
                }),
            },
            Commands::Board { command } => match command {
                None => board::run_show(board::ShowOptions {
                    data_dir,
                    json,
                    quiet,
                }),
                Some(BoardCommands::Drop { id, to, index }) => {
                    board::run_drop(board::DropOptions {
                        id,
                        to,
                        index,
                        data_dir,
                        json,
                        quiet,
                    })
                }
            },
            Commands::Dashboard => dashboard::run(dashboard::DashboardOptions {
                data_dir,
                json,
                quiet,
            }),
            Commands::Config(cmd) => match cmd {
                ConfigCommands::Init { force } => config::run_init(config::InitOptions {
                    force,
                    data_dir,
                    json,
                    quiet,
                }),
                ConfigCommands::Show => config::run_show(config::ShowOptions {
                    data_dir,
                    json,
                    quiet,
                }),
            },
        }
    }
}
