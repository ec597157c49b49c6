//! Rule source loading
//!
//! Reads the JSON rule source at an already-resolved path. Loading never
//! fails outright: problems are collected as [`LoadError`]s next to whatever
//! rules could be compiled, and the caller decides what they mean.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use super::{Rule, RuleSet, Severity};

/// One `{ "pattern": ... }` entry in the rule source
#[derive(Debug, Clone, Deserialize)]
pub struct RuleEntry {
    pub pattern: String,
}

/// The rule source document
#[derive(Debug, Clone, Deserialize, Default)]
pub struct RuleSource {
    #[serde(default)]
    pub blocked_commands: Vec<RuleEntry>,

    #[serde(default)]
    pub dangerous_patterns: Vec<RuleEntry>,
}

/// Problems encountered while loading a rule source
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("Shared rules not found at {}", path.display())]
    Missing { path: PathBuf },

    #[error("Failed to read rules from {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Error loading shared rules: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Skipping invalid pattern {}[{index}] {pattern:?}: {source}", severity.source_key())]
    InvalidPattern {
        severity: Severity,
        index: usize,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl LoadError {
    /// True when the whole source was unusable, not just one entry
    pub fn is_fatal(&self) -> bool {
        !matches!(self, LoadError::InvalidPattern { .. })
    }
}

/// Outcome of loading: the usable rules plus every issue met on the way
#[derive(Debug, Default)]
pub struct LoadedRules {
    pub rules: RuleSet,
    pub issues: Vec<LoadError>,
}

impl LoadedRules {
    /// Whether the source itself was missing or unparsable
    pub fn source_unavailable(&self) -> bool {
        self.issues.iter().any(LoadError::is_fatal)
    }

    fn failed(error: LoadError) -> Self {
        Self {
            rules: RuleSet::empty(),
            issues: vec![error],
        }
    }
}

impl RuleSource {
    /// Compile every entry, skipping (and reporting) the ones that do not
    /// compile
    pub fn compile(&self) -> LoadedRules {
        let mut rules = Vec::new();
        let mut issues = Vec::new();

        let classes = [
            (Severity::Blocked, &self.blocked_commands),
            (Severity::Dangerous, &self.dangerous_patterns),
        ];

        for (severity, entries) in classes {
            for (index, entry) in entries.iter().enumerate() {
                match Rule::new(entry.pattern.as_str(), severity) {
                    Ok(rule) => rules.push(rule),
                    Err(source) => issues.push(LoadError::InvalidPattern {
                        severity,
                        index,
                        pattern: entry.pattern.clone(),
                        source,
                    }),
                }
            }
        }

        LoadedRules {
            rules: RuleSet::from_rules(rules),
            issues,
        }
    }
}

/// Parse and compile a rule source document
pub fn parse(json: &str) -> Result<LoadedRules, LoadError> {
    let source: RuleSource = serde_json::from_str(json)?;
    Ok(source.compile())
}

/// Load the rule source at `path`.
///
/// A missing or malformed file yields an empty rule set with the error
/// recorded in [`LoadedRules::issues`].
pub fn load(path: &Path) -> LoadedRules {
    if !path.exists() {
        return LoadedRules::failed(LoadError::Missing {
            path: path.to_path_buf(),
        });
    }

    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(source) => {
            return LoadedRules::failed(LoadError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    parse(&content).unwrap_or_else(LoadedRules::failed)
}
