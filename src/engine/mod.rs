//! Guard for shell tool calls
//!
//! Filters requests down to shell-executing tools, loads the rule source and
//! runs the evaluator. Configuration problems are handled here according to
//! the configured [`FailPolicy`].

pub mod evaluator;

pub use evaluator::evaluate;

use std::path::{Path, PathBuf};

use crate::config::FailPolicy;
use crate::input::HookInput;
use crate::output::Verdict;
use crate::rules::loader::{self, LoadedRules};

/// Warning emitted when no rules are in effect under the fail-open policy
pub const NO_RULES_WARNING: &str = "No blocking rules loaded, allowing command";

/// What the guard concluded about a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The tool does not execute shell commands
    NotShellTool,

    /// A shell tool was called without any command text
    NoCommand,

    /// No rules were in effect and the fail-open policy allowed the command
    FailedOpen { warnings: Vec<String> },

    /// The command was checked (or refused under fail-closed)
    Checked {
        verdict: Verdict,
        warnings: Vec<String>,
    },
}

impl Outcome {
    pub fn verdict(&self) -> Verdict {
        match self {
            Outcome::Checked { verdict, .. } => verdict.clone(),
            _ => Verdict::Allow,
        }
    }

    pub fn is_allowed(&self) -> bool {
        match self {
            Outcome::Checked { verdict, .. } => verdict.is_allowed(),
            _ => true,
        }
    }

    /// Warnings the caller must surface on stderr
    pub fn warnings(&self) -> &[String] {
        match self {
            Outcome::FailedOpen { warnings } | Outcome::Checked { warnings, .. } => warnings,
            _ => &[],
        }
    }

    /// Whether the evaluator actually looked at the command
    pub fn was_evaluated(&self) -> bool {
        matches!(
            self,
            Outcome::Checked {
                verdict: Verdict::Allow | Verdict::Deny { .. },
                ..
            }
        )
    }
}

/// The guard
pub struct Guard {
    rules_path: PathBuf,
    policy: FailPolicy,
}

impl Guard {
    /// Create a guard reading rules from `rules_path`
    pub fn new(rules_path: impl Into<PathBuf>, policy: FailPolicy) -> Self {
        Self {
            rules_path: rules_path.into(),
            policy,
        }
    }

    pub fn rules_path(&self) -> &Path {
        &self.rules_path
    }

    pub fn policy(&self) -> FailPolicy {
        self.policy
    }

    /// Main entry point: check a request and return the outcome.
    ///
    /// The rule source is only read once the request is known to carry a
    /// shell command.
    pub fn check(&self, input: &HookInput) -> Outcome {
        if !input.is_shell_tool() {
            return Outcome::NotShellTool;
        }

        let Some(command) = input.command() else {
            return Outcome::NoCommand;
        };

        log::debug!("Loading rules from {}", self.rules_path.display());
        let loaded = loader::load(&self.rules_path);
        self.check_command(command, &loaded)
    }

    /// Check a command against already-loaded rules
    pub fn check_command(&self, command: &str, loaded: &LoadedRules) -> Outcome {
        let mut warnings: Vec<String> = loaded.issues.iter().map(ToString::to_string).collect();

        if self.policy == FailPolicy::Closed {
            if let Some(detail) = unusable_reason(loaded) {
                return Outcome::Checked {
                    verdict: Verdict::RulesUnavailable { detail },
                    warnings,
                };
            }
        }

        if loaded.rules.is_empty() {
            warnings.push(NO_RULES_WARNING.to_string());
            return Outcome::FailedOpen { warnings };
        }

        log::debug!(
            "Evaluating against {} blocked and {} dangerous rules",
            loaded.rules.blocked().len(),
            loaded.rules.dangerous().len()
        );

        Outcome::Checked {
            verdict: evaluate(command, &loaded.rules),
            warnings,
        }
    }
}

/// Why a rule load cannot be trusted under the fail-closed policy
fn unusable_reason(loaded: &LoadedRules) -> Option<String> {
    if let Some(error) = loaded.issues.iter().find(|e| e.is_fatal()) {
        return Some(error.to_string());
    }
    if !loaded.issues.is_empty() {
        return Some(format!("{} rule(s) failed to compile", loaded.issues.len()));
    }
    if loaded.rules.is_empty() {
        return Some("rule source defines no patterns".to_string());
    }
    None
}
