//! # Output Configuration
//!
//! Controls how the CLI reports dependency state: status markers are emoji
//! on a color-capable terminal and bracketed words otherwise, and commit
//! hashes are shortened and dimmed.
//!
//! Color follows the `--color=always|never|auto` flag. In auto mode it is
//! off when `NO_COLOR` is set, `CLICOLOR=0`, `TERM=dumb`, or stdout is not
//! a TTY, and forced on by `CLICOLOR_FORCE=1`.
//!
//! ```rust,ignore
//! use taglock::output::{OutputConfig, Status};
//!
//! let out = OutputConfig::from_env_and_flag("auto");
//! println!("{} Added vendor/libfoo", out.marker(Status::Added));
//! ```

use std::env;

use console::style;

/// Number of hash characters shown in human-readable output.
pub const SHORT_HASH_LEN: usize = 12;

/// What a line of output reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    Ok,
    Added,
    Removed,
    Updated,
    Unchanged,
    Missing,
    Warn,
}

impl Status {
    fn emoji(self) -> &'static str {
        match self {
            Status::Ok => "✅",
            Status::Added => "➕",
            Status::Removed => "🗑️",
            Status::Updated => "🔄",
            Status::Unchanged => "✔️",
            Status::Missing => "❓",
            Status::Warn => "⚠️",
        }
    }

    fn plain(self) -> &'static str {
        match self {
            Status::Ok => "[OK]",
            Status::Added => "[ADD]",
            Status::Removed => "[DEL]",
            Status::Updated => "[UPD]",
            Status::Unchanged => "[SAME]",
            Status::Missing => "[MISSING]",
            Status::Warn => "[WARN]",
        }
    }
}

/// Output configuration for controlling colors and emojis.
#[derive(Debug, Clone)]
pub struct OutputConfig {
    pub use_color: bool,
}

impl OutputConfig {
    /// Builds a configuration from the `--color` flag value and the
    /// environment. Unknown flag values behave like `auto`.
    pub fn from_env_and_flag(color_flag: &str) -> Self {
        let use_color = match color_flag.to_lowercase().as_str() {
            "always" => true,
            "never" => false,
            _ => Self::detect_color_support(),
        };

        Self { use_color }
    }

    fn detect_color_support() -> bool {
        // https://no-color.org/: presence alone disables, even when empty
        if env::var_os("NO_COLOR").is_some() {
            return false;
        }

        if env::var("CLICOLOR").is_ok_and(|v| v == "0") {
            return false;
        }

        if env::var("CLICOLOR_FORCE").is_ok_and(|v| v != "0" && !v.is_empty()) {
            return true;
        }

        if env::var("TERM").is_ok_and(|v| v == "dumb") {
            return false;
        }

        console::Term::stdout().features().colors_supported()
    }

    #[cfg(test)]
    pub fn with_color() -> Self {
        Self { use_color: true }
    }

    #[cfg(test)]
    pub fn without_color() -> Self {
        Self { use_color: false }
    }

    /// The marker printed in front of a status line.
    pub fn marker(&self, status: Status) -> &'static str {
        if self.use_color {
            status.emoji()
        } else {
            status.plain()
        }
    }

    /// A commit hash for display: shortened, and dimmed when colored.
    /// An empty hash stands for the repository's default ref.
    pub fn hash(&self, hash: &str) -> String {
        if hash.is_empty() {
            return "default ref".to_string();
        }

        let short: String = hash.chars().take(SHORT_HASH_LEN).collect();
        if self.use_color {
            style(short).dim().to_string()
        } else {
            short
        }
    }

    /// A dependency path for display, bold when colored.
    pub fn path(&self, path: &str) -> String {
        if self.use_color {
            style(path).bold().to_string()
        } else {
            path.to_string()
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::from_env_and_flag("auto")
    }
}
