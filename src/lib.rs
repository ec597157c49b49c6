//! shell-guard - Pre-execution guard for agent shell commands
//!
//! Inspects a shell command an AI agent is about to run and blocks it when it
//! matches a rule from the shared rule source.
//!
//! # Features
//!
//! - **Pattern rules**: case-insensitive regex search, `blocked` rules before
//!   `dangerous` rules, first match wins
//! - **Multi-framework input**: Claude Code (`Bash`) and Gemini CLI (`Shell`,
//!   `run_command`, ...) requests, with `command`/`cmd`/`CommandLine` aliases
//! - **Explicit fail policy**: fail-open (default) or fail-closed when the rule
//!   source is missing or broken
//! - **Audit logging**: optional, redacted JSONL log of all decisions
//!
//! # Example
//!
//! ```
//! use shell_guard::{evaluate, rules::loader, Verdict};
//!
//! let loaded = loader::parse(r#"{"blocked_commands":[{"pattern":"rm\\s+-rf\\s+/"}]}"#).unwrap();
//!
//! let verdict = evaluate("RM -RF /", &loaded.rules);
//! assert!(!verdict.is_allowed());
//! assert_eq!(verdict.reason().as_deref(), Some(r"blocked: rm\s+-rf\s+/"));
//!
//! assert_eq!(evaluate("ls -la", &loaded.rules), Verdict::Allow);
//! ```

pub mod audit;
pub mod config;
pub mod engine;
pub mod input;
pub mod logging;
pub mod output;
pub mod redact;
pub mod rules;

// Re-exports for convenience
pub use config::{Config, FailPolicy};
pub use engine::{evaluate, Guard, Outcome};
pub use input::{HookInput, ToolInput};
pub use output::Verdict;
pub use rules::{Rule, RuleSet, Severity};
