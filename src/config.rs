//! Configuration loading for shell-guard
//!
//! Supports TOML configuration with embedded defaults, and resolves the rule
//! source location once so the loader only ever sees a concrete path.

use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the rule source explicitly
pub const RULES_ENV: &str = "SHELL_GUARD_RULES";

/// Directory holding the shared rule source
pub const RULES_DIR: &str = ".shared";

/// File name of the shared rule source
pub const RULES_FILE: &str = "blocked_commands.json";

/// What to do when the rules cannot be trusted (missing, unparsable, empty)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum FailPolicy {
    /// Allow the command and warn. Keeps the agent working, but a deleted
    /// rule file silently disables all blocking.
    #[default]
    Open,

    /// Block every shell command until the rules load cleanly
    Closed,
}

/// Errors reading an explicitly requested config file
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// General configuration section
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Enable audit logging
    pub audit_log: bool,

    /// Path to audit log file
    pub audit_path: Option<String>,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            audit_log: false,
            audit_path: Some("~/.claude/shell-guard/audit.jsonl".to_string()),
        }
    }
}

/// Rule source configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RulesConfig {
    /// Explicit rule source; discovered next to the binary when unset
    pub path: Option<String>,

    /// Behaviour when the rule source is unusable
    pub fail_policy: FailPolicy,
}

/// Main configuration structure
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,
    pub rules: RulesConfig,
}

impl Config {
    /// Load configuration from the standard locations or use defaults
    pub fn load() -> Self {
        let config_paths = [
            // User-specific config
            dirs::home_dir().map(|p| p.join(".claude/shell-guard/config.toml")),
            // System-wide config
            Some(PathBuf::from("/etc/shell-guard/config.toml")),
        ];

        for path in config_paths.into_iter().flatten() {
            if !path.exists() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    log::debug!("Loaded config from {}", path.display());
                    return config;
                }
                Err(e) => log::warn!("{}", e),
            }
        }

        Config::default()
    }

    /// Load from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Expand ~ in path strings
    pub fn expand_path(path: &str) -> PathBuf {
        if let Some(rest) = path.strip_prefix("~/") {
            if let Some(home) = dirs::home_dir() {
                return home.join(rest);
            }
        }
        PathBuf::from(path)
    }

    /// Get the audit log path (expanded), if auditing is enabled
    pub fn audit_path(&self) -> Option<PathBuf> {
        if !self.general.audit_log {
            return None;
        }
        self.general.audit_path.as_deref().map(Self::expand_path)
    }

    /// Resolve the rule source location.
    ///
    /// First hit wins: `cli`, [`RULES_ENV`], `[rules] path`, then discovery
    /// relative to the running executable.
    pub fn resolve_rules_path(&self, cli: Option<&Path>) -> PathBuf {
        if let Some(path) = cli {
            return path.to_path_buf();
        }

        if let Some(path) = env::var_os(RULES_ENV).filter(|v| !v.is_empty()) {
            return PathBuf::from(path);
        }

        if let Some(path) = self.rules.path.as_deref() {
            return Self::expand_path(path);
        }

        let exe_dir = env::current_exe()
            .ok()
            .and_then(|exe| exe.canonicalize().ok())
            .and_then(|exe| exe.parent().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."));

        discover_rules_path(&exe_dir).unwrap_or_else(|| fallback_rules_path(&exe_dir))
    }
}

/// Walk upward from `start` looking for `.shared/blocked_commands.json`
pub fn discover_rules_path(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .map(|dir| dir.join(RULES_DIR).join(RULES_FILE))
        .find(|candidate| candidate.is_file())
}

/// Location assumed when discovery finds nothing: a `.shared` directory next
/// to the directory holding the executable
pub fn fallback_rules_path(exe_dir: &Path) -> PathBuf {
    exe_dir
        .parent()
        .unwrap_or(exe_dir)
        .join(RULES_DIR)
        .join(RULES_FILE)
}

/// Embedded default configuration
pub const DEFAULT_CONFIG_TOML: &str = r#"
[general]
audit_log = false
audit_path = "~/.claude/shell-guard/audit.jsonl"

[rules]
# path = "~/.claude/.shared/blocked_commands.json"
fail_policy = "open"
"#;
