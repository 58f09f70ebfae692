//! Parser configuration.
//!
//! Every field has a default, so a config file only needs the keys it
//! changes:
//!
//! ```toml
//! cli_cursor = "$ "
//! headless_mode = "ignore-input-arguments"
//! failure_policy = "abort"
//! ```

use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// How [`Parser`](crate::Parser) treats input when run without an
/// interactive prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HeadlessMode {
    /// Input is dispatched as given.
    #[default]
    Disabled,
    /// The headless command always runs; input becomes its arguments.
    AllowInputArguments,
    /// The headless command runs only when there is no input.
    IgnoreInputArguments,
}

/// What the sequential modes do after a command fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailurePolicy {
    /// Run the remaining commands and report every failure at the end.
    #[default]
    Continue,
    /// Stop at the first failure.
    Abort,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Register a short alias (initials) for every command.
    pub generate_short_names: bool,
    /// Prompt printed by the REPL before each line.
    pub cli_cursor: String,
    /// Register the built-in `help` command.
    pub enable_help: bool,
    /// Register the built-in `exit` command.
    pub enable_exit: bool,
    pub headless_mode: HeadlessMode,
    pub headless_command: String,
    pub failure_policy: FailurePolicy,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            generate_short_names: true,
            cli_cursor: "> : ".to_string(),
            enable_help: true,
            enable_exit: true,
            headless_mode: HeadlessMode::Disabled,
            headless_command: "help".to_string(),
            failure_policy: FailurePolicy::Continue,
        }
    }
}

impl ParserConfig {
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content)?;
        info!("Loaded parser config from: {}", path.display());
        Ok(config)
    }

    pub fn with_short_names(mut self, enabled: bool) -> Self {
        self.generate_short_names = enabled;
        self
    }

    pub fn with_cli_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cli_cursor = cursor.into();
        self
    }

    pub fn with_help(mut self, enabled: bool) -> Self {
        self.enable_help = enabled;
        self
    }

    pub fn with_exit(mut self, enabled: bool) -> Self {
        self.enable_exit = enabled;
        self
    }

    pub fn with_headless_mode(mut self, mode: HeadlessMode) -> Self {
        self.headless_mode = mode;
        self
    }

    pub fn with_headless_command(mut self, command: impl Into<String>) -> Self {
        self.headless_command = command.into();
        self
    }

    pub fn with_failure_policy(mut self, policy: FailurePolicy) -> Self {
        self.failure_policy = policy;
        self
    }

    /// Rewrites `input` according to [`headless_mode`](Self::headless_mode).
    ///
    /// ```
    /// use parlance::{HeadlessMode, ParserConfig};
    ///
    /// let config = ParserConfig::default()
    ///     .with_headless_mode(HeadlessMode::IgnoreInputArguments);
    /// assert_eq!(config.adjust_for_headless("  "), "help");
    /// assert_eq!(config.adjust_for_headless("bump"), "bump");
    ///
    /// let config = config.with_headless_mode(HeadlessMode::AllowInputArguments);
    /// assert_eq!(config.adjust_for_headless(" --expand "), "help --expand");
    /// ```
    pub fn adjust_for_headless<'a>(&self, input: &'a str) -> Cow<'a, str> {
        match self.headless_mode {
            HeadlessMode::Disabled => Cow::Borrowed(input),
            HeadlessMode::IgnoreInputArguments if input.trim().is_empty() => {
                Cow::Owned(self.headless_command.clone())
            }
            HeadlessMode::IgnoreInputArguments => Cow::Borrowed(input),
            HeadlessMode::AllowInputArguments => Cow::Owned(format!(
                "{} {}",
                self.headless_command.trim(),
                input.trim()
            )),
        }
    }
}
