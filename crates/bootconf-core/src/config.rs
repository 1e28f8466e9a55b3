use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable selecting the configuration environment.
pub const ENV_VAR: &str = "BOOTCONF_ENV";

/// Fallback environment variable, shared with Node tooling.
pub const NODE_ENV_VAR: &str = "NODE_ENV";

/// Environment used when nothing else is configured.
pub const DEFAULT_ENV: &str = "development";

/// Runtime configuration for the bootconf CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Current working directory.
    pub cwd: PathBuf,

    /// Environment name used to pick `<name>.<env>.*` variants.
    pub env: String,

    /// Whether to emit JSON logs.
    pub json_logs: bool,

    /// Verbosity level (0 = default filter, 1 = DEBUG, 2+ = TRACE).
    pub verbosity: u8,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cwd: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env: env_from_vars(),
            json_logs: false,
            verbosity: 0,
        }
    }
}

impl Config {
    /// Create a new config with the given working directory.
    #[must_use]
    pub fn new(cwd: PathBuf) -> Self {
        Self {
            cwd,
            ..Default::default()
        }
    }

    /// Override the environment name. `None` keeps the value from the
    /// environment variables.
    #[must_use]
    pub fn with_env(mut self, env: Option<String>) -> Self {
        if let Some(env) = env.filter(|e| !e.is_empty()) {
            self.env = env;
        }
        self
    }

    /// Set verbosity level.
    #[must_use]
    pub fn with_verbosity(mut self, verbosity: u8) -> Self {
        self.verbosity = verbosity;
        self
    }

    /// Set JSON log output.
    #[must_use]
    pub fn with_json_logs(mut self, json: bool) -> Self {
        self.json_logs = json;
        self
    }
}

/// `BOOTCONF_ENV`, else `NODE_ENV`, else `development`.
#[must_use]
pub fn env_from_vars() -> String {
    [ENV_VAR, NODE_ENV_VAR]
        .iter()
        .filter_map(|var| std::env::var(var).ok())
        .find(|value| !value.is_empty())
        .unwrap_or_else(|| DEFAULT_ENV.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_env_precedence() {
        std::env::remove_var(ENV_VAR);
        std::env::remove_var(NODE_ENV_VAR);
        assert_eq!(env_from_vars(), DEFAULT_ENV);

        std::env::set_var(NODE_ENV_VAR, "production");
        assert_eq!(env_from_vars(), "production");

        std::env::set_var(ENV_VAR, "staging");
        assert_eq!(env_from_vars(), "staging");

        std::env::remove_var(ENV_VAR);
        std::env::remove_var(NODE_ENV_VAR);
    }

    #[test]
    #[serial]
    fn test_with_env_overrides() {
        let config = Config::new(PathBuf::from("/app")).with_env(Some("test".to_string()));
        assert_eq!(config.env, "test");

        let config = Config::new(PathBuf::from("/app"))
            .with_env(Some("test".to_string()))
            .with_env(None);
        assert_eq!(config.env, "test");
    }
}
