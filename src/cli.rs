//! CLI argument parsing and command dispatch

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use taglock::defaults::{default_base_dir, DEFAULT_GIT_PROGRAM};
use taglock::output::OutputConfig;

use crate::commands::{self, Context};

/// taglock - Pin git dependencies to semver tags with a lockfile
#[derive(Parser, Debug)]
#[command(name = "taglock")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Project directory holding .taglock.yaml (defaults to the current directory)
    #[arg(
        short = 'C',
        long,
        global = true,
        value_name = "DIR",
        env = "TAGLOCK_DIR"
    )]
    chdir: Option<PathBuf>,

    /// Colorize output (always, never, auto)
    #[arg(long, global = true, value_name = "WHEN", default_value = "auto")]
    color: String,

    /// Set log level (error, warn, info, debug, trace)
    #[arg(long, global = true, value_name = "LEVEL", default_value = "warn")]
    log_level: String,

    /// Shorthand for --log-level debug
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Git executable used to clone, fetch and check out dependencies
    #[arg(
        long,
        global = true,
        value_name = "PROGRAM",
        env = "TAGLOCK_GIT",
        default_value = DEFAULT_GIT_PROGRAM
    )]
    git: String,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create .taglock.yaml and an empty lockfile
    Init(commands::init::InitArgs),

    /// Add a dependency at the newest tag matching a constraint
    Add(commands::add::AddArgs),

    /// Check out every dependency at its locked commit
    Sync(commands::sync::SyncArgs),

    /// Re-resolve every constraint and move the lockfile forward
    Update(commands::update::UpdateArgs),

    /// Delete a dependency and forget it
    Remove(commands::remove::RemoveArgs),

    /// List dependencies with their locked commits
    #[command(alias = "ls")]
    List(commands::list::ListArgs),

    /// Generate shell completion scripts
    Completions(commands::completions::CompletionsArgs),
}

impl Cli {
    /// Execute the CLI command
    pub fn execute(self) -> Result<()> {
        self.init_logging();

        let ctx = Context {
            base_dir: self.chdir.clone().unwrap_or_else(default_base_dir),
            git: self.git.clone(),
            out: OutputConfig::from_env_and_flag(&self.color),
        };

        match self.command {
            Commands::Init(args) => commands::init::execute(args, &ctx),
            Commands::Add(args) => commands::add::execute(args, &ctx),
            Commands::Sync(args) => commands::sync::execute(args, &ctx),
            Commands::Update(args) => commands::update::execute(args, &ctx),
            Commands::Remove(args) => commands::remove::execute(args, &ctx),
            Commands::List(args) => commands::list::execute(args, &ctx),
            Commands::Completions(args) => commands::completions::execute(args),
        }
    }

    /// Logs go to stderr. `RUST_LOG` takes precedence over the flags.
    fn init_logging(&self) {
        let level = if self.verbose {
            "debug"
        } else {
            self.log_level.as_str()
        };

        let env = env_logger::Env::default().default_filter_or(level);
        let _ = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_target(false)
            .try_init();
    }
}
