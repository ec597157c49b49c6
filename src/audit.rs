//! JSONL audit logging for shell-guard
//!
//! Records every decision to a JSONL file for later review. Command previews
//! are redacted before they are written.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::engine::Outcome;
use crate::input::HookInput;
use crate::output::Verdict;
use crate::rules::Severity;

/// Log level for audit entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Allowed,
    Blocked,
    Skipped,
    Warn,
}

/// An audit log entry
#[derive(Debug, Serialize)]
pub struct AuditEntry {
    /// Timestamp of the decision
    pub timestamp: DateTime<Utc>,

    /// Log level (ALLOWED, BLOCKED, SKIPPED, WARN)
    pub level: LogLevel,

    /// Tool that was invoked
    pub tool: String,

    /// Hook event that triggered the call (if provided)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hook_event: Option<String>,

    /// Severity class of the matching rule
    #[serde(skip_serializing_if = "Option::is_none")]
    pub severity: Option<Severity>,

    /// Pattern that matched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,

    /// Redacted summary of the input
    pub input_summary: String,

    /// Reason for the decision
    pub reason: String,

    /// Session ID (if provided)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}

impl AuditEntry {
    /// Create a new audit entry from input and outcome
    pub fn new(input: &HookInput, outcome: &Outcome, dry_run: bool) -> Self {
        let verdict = outcome.verdict();

        let (level, reason) = match outcome {
            Outcome::NotShellTool => (LogLevel::Skipped, "not a shell tool".to_string()),
            Outcome::NoCommand => (LogLevel::Skipped, "no command text".to_string()),
            Outcome::FailedOpen { warnings } => (LogLevel::Warn, warnings.join("; ")),
            Outcome::Checked { verdict, .. } => match verdict.reason() {
                None => (LogLevel::Allowed, "passed all rules".to_string()),
                Some(reason) if dry_run => (LogLevel::Warn, format!("dry-run: {}", reason)),
                Some(reason) => (LogLevel::Blocked, reason),
            },
        };

        let (severity, pattern) = match verdict {
            Verdict::Deny { severity, pattern } => (Some(severity), Some(pattern)),
            _ => (None, None),
        };

        Self {
            timestamp: Utc::now(),
            level,
            tool: input.tool_name.clone(),
            hook_event: input.hook_event_name.clone(),
            severity,
            pattern,
            input_summary: input.summary(),
            reason,
            session_id: input.session_id.clone(),
        }
    }
}

/// Audit logger
#[derive(Default)]
pub struct AuditLogger {
    writer: Option<BufWriter<File>>,
}

impl AuditLogger {
    /// Create a new audit logger; `None` or an unopenable path disables it
    pub fn new(path: Option<&Path>) -> Self {
        let writer = path.and_then(|p| {
            if let Some(parent) = p.parent() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    log::warn!("Cannot create audit directory {}: {}", parent.display(), e);
                }
            }

            match OpenOptions::new().create(true).append(true).open(p) {
                Ok(file) => Some(BufWriter::new(file)),
                Err(e) => {
                    log::warn!("Cannot open audit log {}: {}", p.display(), e);
                    None
                }
            }
        });

        Self { writer }
    }

    /// Log an audit entry
    pub fn log(&mut self, entry: &AuditEntry) -> Result<(), std::io::Error> {
        if let Some(ref mut writer) = self.writer {
            let json = serde_json::to_string(entry)?;
            writeln!(writer, "{}", json)?;
            writer.flush()?;
        }
        Ok(())
    }

    /// Log an outcome
    pub fn log_outcome(
        &mut self,
        input: &HookInput,
        outcome: &Outcome,
        dry_run: bool,
    ) -> Result<(), std::io::Error> {
        let entry = AuditEntry::new(input, outcome, dry_run);
        self.log(&entry)
    }

    /// Check if logging is enabled
    pub fn is_enabled(&self) -> bool {
        self.writer.is_some()
    }
}
