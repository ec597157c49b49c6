//! Rule definitions for shell-guard
//!
//! A rule set is two ordered lists of compiled patterns, one per severity
//! class. Blocked rules are always consulted before dangerous ones.

pub mod loader;

use regex::{Regex, RegexBuilder};
use serde::Serialize;
use std::fmt;

/// Severity class of a rule
///
/// Both classes block the command; the class only labels the reason.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Listed under `blocked_commands`
    Blocked,

    /// Listed under `dangerous_patterns`
    Dangerous,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Blocked => "blocked",
            Severity::Dangerous => "dangerous",
        }
    }

    /// Name of the list this class is read from in the rule source
    pub fn source_key(self) -> &'static str {
        match self {
            Severity::Blocked => "blocked_commands",
            Severity::Dangerous => "dangerous_patterns",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single compiled rule
#[derive(Debug, Clone)]
pub struct Rule {
    /// Pattern text as written in the rule source
    pattern: String,

    /// Severity class the rule was listed under
    severity: Severity,

    /// Case-insensitive compiled form of `pattern`
    regex: Regex,
}

impl Rule {
    /// Compile a rule. Matching is always case-insensitive.
    pub fn new(pattern: impl Into<String>, severity: Severity) -> Result<Self, regex::Error> {
        let pattern = pattern.into();
        let regex = RegexBuilder::new(&pattern).case_insensitive(true).build()?;
        Ok(Self {
            pattern,
            severity,
            regex,
        })
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    /// Search for the pattern anywhere in `command`.
    ///
    /// Rule sources are written with `$` also matching before one final
    /// newline, so the command is retried without it.
    pub fn is_match(&self, command: &str) -> bool {
        self.regex.is_match(command)
            || command
                .strip_suffix('\n')
                .map_or(false, |trimmed| self.regex.is_match(trimmed))
    }
}

/// Immutable, per-invocation collection of rules
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    blocked: Vec<Rule>,
    dangerous: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a rule set from already-compiled rules.
    ///
    /// Rules are routed to their class by [`Rule::severity`]; order within a
    /// class is preserved.
    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        let mut set = Self::empty();
        for rule in rules {
            match rule.severity {
                Severity::Blocked => set.blocked.push(rule),
                Severity::Dangerous => set.dangerous.push(rule),
            }
        }
        set
    }

    pub fn blocked(&self) -> &[Rule] {
        &self.blocked
    }

    pub fn dangerous(&self) -> &[Rule] {
        &self.dangerous
    }

    /// All rules in evaluation order: blocked first, then dangerous
    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.blocked.iter().chain(self.dangerous.iter())
    }

    pub fn len(&self) -> usize {
        self.blocked.len() + self.dangerous.len()
    }

    /// True when neither class holds a rule
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty() && self.dangerous.is_empty()
    }
}
