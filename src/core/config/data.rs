use chrono::format::{Item, StrftimeItems};
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::core::conversation::DEFAULT_TIMESTAMP_FORMAT;

pub const DEFAULT_AGENT_URL: &str = "http://localhost:8000";
pub const AGENT_URL_ENV: &str = "NMAPAI_AGENT_URL";

#[derive(Debug, Serialize, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct Config {
    /// Base address of the agent service (e.g., "http://localhost:8000")
    pub agent_url: Option<String>,
    /// strftime pattern for transcript timestamps
    pub timestamp_format: Option<String>,
}

/// Settings after applying flag, environment and file precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSettings {
    pub agent_url: String,
    pub timestamp_format: String,
}

impl Config {
    /// Resolve the effective settings.
    ///
    /// The agent URL comes from the first non-empty of `cli_agent_url`,
    /// `env_agent_url`, the config file, then [`DEFAULT_AGENT_URL`]. An invalid
    /// timestamp pattern falls back to the default.
    pub fn resolve(
        &self,
        cli_agent_url: Option<&str>,
        env_agent_url: Option<&str>,
    ) -> ResolvedSettings {
        let agent_url = [cli_agent_url, env_agent_url, self.agent_url.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|url| !url.is_empty())
            .unwrap_or(DEFAULT_AGENT_URL)
            .to_string();

        let timestamp_format = match self.timestamp_format.as_deref() {
            Some(format) if is_valid_timestamp_format(format) => format.to_string(),
            Some(format) => {
                warn!(format, "ignoring invalid timestamp-format");
                DEFAULT_TIMESTAMP_FORMAT.to_string()
            }
            None => DEFAULT_TIMESTAMP_FORMAT.to_string(),
        };

        ResolvedSettings {
            agent_url,
            timestamp_format,
        }
    }
}

/// A pattern is valid when it parses and actually renders a time; some
/// parse-only specifiers such as `%#z` fail at format time.
pub fn is_valid_timestamp_format(format: &str) -> bool {
    if format.is_empty() || StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return false;
    }
    let mut rendered = String::new();
    write!(rendered, "{}", Local::now().format(format)).is_ok()
}

/// Get a user-friendly display string for a path
/// Converts absolute paths to use ~ notation on Unix-like systems when possible
pub fn path_display<P: AsRef<Path>>(path: P) -> String {
    let path = path.as_ref();

    #[cfg(unix)]
    {
        if let Some(home) = std::env::var_os("HOME") {
            let home_path = PathBuf::from(home);
            if let Ok(relative) = path.strip_prefix(&home_path) {
                return format!("~/{}", relative.display());
            }
        }
    }

    path.display().to_string()
}
