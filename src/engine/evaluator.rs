//! Command evaluation against a rule set

use crate::output::Verdict;
use crate::rules::RuleSet;

/// Decide whether `command` trips any rule in `rules`.
///
/// Blocked rules are searched before dangerous rules, each class in source
/// order, and the first hit wins. Patterns are case-insensitive and may match
/// anywhere in the command.
pub fn evaluate(command: &str, rules: &RuleSet) -> Verdict {
    rules
        .iter()
        .find(|rule| rule.is_match(command))
        .map(|rule| Verdict::deny(rule.severity(), rule.pattern()))
        .unwrap_or(Verdict::Allow)
}
