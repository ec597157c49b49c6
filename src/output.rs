//! Verdicts and the exit-code protocol
//!
//! The calling framework only sees the process exit code and whatever is
//! written to stderr. Exit 2 blocks the tool call and shows the stderr text to
//! the agent.

use crate::rules::Severity;

/// Exit code: command allowed (or not ours to check)
pub const EXIT_ALLOW: u8 = 0;

/// Exit code: request document was not valid JSON
pub const EXIT_INVALID_INPUT: u8 = 1;

/// Exit code: command blocked
pub const EXIT_BLOCKED: u8 = 2;

/// Number of characters of the command shown in the block message
const PREVIEW_CHARS: usize = 100;

/// Result of checking a command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// No rule matched
    Allow,

    /// A rule matched
    Deny { severity: Severity, pattern: String },

    /// Rules could not be loaded and the fail-closed policy is active
    RulesUnavailable { detail: String },
}

impl Verdict {
    /// Create a deny verdict for a matched rule
    pub fn deny(severity: Severity, pattern: impl Into<String>) -> Self {
        Verdict::Deny {
            severity,
            pattern: pattern.into(),
        }
    }

    pub fn is_allowed(&self) -> bool {
        matches!(self, Verdict::Allow)
    }

    /// Human-readable reason, only present when the command is not allowed
    pub fn reason(&self) -> Option<String> {
        match self {
            Verdict::Allow => None,
            Verdict::Deny { severity, pattern } => Some(format!("{}: {}", severity, pattern)),
            Verdict::RulesUnavailable { detail } => Some(format!("rules unavailable: {}", detail)),
        }
    }

    /// Process exit code for this verdict
    pub fn exit_code(&self) -> u8 {
        if self.is_allowed() {
            EXIT_ALLOW
        } else {
            EXIT_BLOCKED
        }
    }
}

/// First [`PREVIEW_CHARS`] characters of a command, with an ellipsis if cut
pub fn preview(command: &str) -> String {
    let mut chars = command.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

/// The stderr message shown to the agent when a command is blocked
pub fn block_message(command: &str, verdict: &Verdict) -> String {
    let reason = verdict.reason().unwrap_or_default();
    format!(
        "⛔ BLOCKED: This command has been blocked by the security hook.\n   \
         Command: {}\n   \
         Reason: {}\n   \
         To override, ask the user to run this command manually.",
        preview(command),
        reason
    )
}
