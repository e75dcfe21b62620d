use std::path::PathBuf;

/// Environment variable overriding the data directory.
pub const HOME_ENV: &str = "DAYPLAN_HOME";
/// Environment variable naming the current user id.
pub const USER_ENV: &str = "DAYPLAN_USER";
/// Environment variable holding the current user's display name.
pub const USER_NAME_ENV: &str = "DAYPLAN_USER_NAME";

/// Runtime settings for the CLI.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Directory holding the JSON data files.
    pub data_dir: PathBuf,
    /// Id stamped on new tasks and reports.
    pub user_id: String,
    /// Display name stored in daily reports.
    pub user_name: String,
}

impl Config {
    /// Resolves settings from the environment.
    ///
    /// The data directory is determined in the following order:
    /// 1. `DAYPLAN_HOME` environment variable.
    /// 2. `~/.local/share/dayplan` (on Linux).
    /// 3. `./dayplan` (fallback).
    ///
    /// The user id comes from `DAYPLAN_USER`, then `USER`/`USERNAME`, then
    /// `local`. The display name defaults to the user id.
    pub fn from_env() -> Config {
        let data_dir = std::env::var(HOME_ENV).map(PathBuf::from).unwrap_or_else(|_| {
            let mut p = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
            p.push("dayplan");
            p
        });
        let user_id = non_empty_var(USER_ENV)
            .or_else(|| non_empty_var("USER"))
            .or_else(|| non_empty_var("USERNAME"))
            .unwrap_or_else(|| "local".to_string());
        let user_name = non_empty_var(USER_NAME_ENV).unwrap_or_else(|| user_id.clone());
        Config { data_dir, user_id, user_name }
    }

    /// Applies command-line overrides on top of the environment.
    pub fn with_overrides(mut self, data_dir: Option<PathBuf>, user: Option<String>) -> Config {
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        if let Some(user) = user {
            if self.user_name == self.user_id {
                self.user_name = user.clone();
            }
            self.user_id = user;
        }
        self
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
