//! Credential redaction for anything written to disk
//!
//! Commands sometimes carry tokens inline; the audit log must not become a
//! second copy of them.

use once_cell::sync::Lazy;
use regex::Regex;

const SECRET_SOURCES: &[&str] = &[
    // API keys and tokens
    r"(?i)api[_-]?key\s*[=:]\s*['\x22]?[a-zA-Z0-9_]{16,}",
    r"(?i)secret[_-]?key\s*[=:]\s*['\x22]?[a-zA-Z0-9_]{16,}",
    r"(?i)access[_-]?token\s*[=:]\s*['\x22]?[a-zA-Z0-9_]{16,}",
    // AWS
    r"AKIA[0-9A-Z]{16}",
    r"(?i)aws[_-]?secret[_-]?access[_-]?key\s*[=:]\s*['\x22]?[0-9a-zA-Z/+]{20,}",
    // GitHub
    r"gh[pousr]_[A-Za-z0-9_]{36,}",
    r"github_pat_[A-Za-z0-9_]{22,}",
    // Bearer headers
    r"(?i)authorization:\s*bearer\s+[A-Za-z0-9._\-]{16,}",
    // Inline passwords
    r"(?i)(password|passwd|pwd)\s*[=:]\s*['\x22][^'\x22]+['\x22]",
];

static SECRET_PATTERNS: Lazy<Vec<Regex>> = Lazy::new(|| {
    SECRET_SOURCES
        .iter()
        .filter_map(|source| Regex::new(source).ok())
        .collect()
});

/// Replace every detected secret with `[REDACTED]`
pub fn redact_secrets(text: &str) -> String {
    let mut redacted = text.to_string();

    for pattern in SECRET_PATTERNS.iter() {
        redacted = pattern.replace_all(&redacted, "[REDACTED]").into_owned();
    }

    redacted
}
