//! Integration tests for the request guard

use std::fs;
use std::path::{Path, PathBuf};

use shell_guard::engine::NO_RULES_WARNING;
use shell_guard::{FailPolicy, Guard, HookInput, Outcome, Severity, Verdict};
use tempfile::TempDir;

const RULES: &str = r#"{
    "blocked_commands": [
        { "pattern": "rm\\s+-rf\\s+/", "description": "wipe root" }
    ],
    "dangerous_patterns": [
        { "pattern": "git\\s+push\\s+.*--force" }
    ]
}"#;

struct Fixture {
    _dir: TempDir,
    rules_path: PathBuf,
}

fn fixture(content: Option<&str>) -> Fixture {
    let dir = tempfile::tempdir().unwrap();
    let rules_path = dir.path().join("blocked_commands.json");
    if let Some(content) = content {
        fs::write(&rules_path, content).unwrap();
    }
    Fixture {
        _dir: dir,
        rules_path,
    }
}

fn request(tool: &str, input: serde_json::Value) -> HookInput {
    let json = serde_json::json!({ "tool_name": tool, "tool_input": input });
    HookInput::from_json(&json.to_string()).unwrap()
}

fn bash(command: &str) -> HookInput {
    request("Bash", serde_json::json!({ "command": command }))
}

fn check(rules_path: &Path, policy: FailPolicy, input: &HookInput) -> Outcome {
    Guard::new(rules_path, policy).check(input)
}

// ============================================================================
// Tool filtering and command extraction
// ============================================================================

#[test]
fn test_non_shell_tool_skips_evaluation() {
    let fx = fixture(Some(RULES));
    let input = request("Read", serde_json::json!({ "command": "rm -rf /" }));
    let outcome = check(&fx.rules_path, FailPolicy::Open, &input);
    assert_eq!(outcome, Outcome::NotShellTool);
    assert!(outcome.is_allowed());
}

#[test]
fn test_non_shell_tool_ignores_fail_closed() {
    let fx = fixture(None);
    let input = request("Write", serde_json::json!({ "file_path": "a.txt" }));
    let outcome = check(&fx.rules_path, FailPolicy::Closed, &input);
    assert_eq!(outcome, Outcome::NotShellTool);
}

#[test]
fn test_all_shell_tool_names_checked() {
    let fx = fixture(Some(RULES));
    for tool in ["Bash", "Shell", "run_command", "shell", "bash"] {
        let input = request(tool, serde_json::json!({ "command": "rm -rf /" }));
        let outcome = check(&fx.rules_path, FailPolicy::Open, &input);
        assert!(!outcome.is_allowed(), "tool: {}", tool);
    }
}

#[test]
fn test_tool_name_is_case_sensitive() {
    let fx = fixture(Some(RULES));
    let input = request("BASH", serde_json::json!({ "command": "rm -rf /" }));
    assert_eq!(
        check(&fx.rules_path, FailPolicy::Open, &input),
        Outcome::NotShellTool
    );
}

#[test]
fn test_command_aliases_checked() {
    let fx = fixture(Some(RULES));
    for field in ["command", "cmd", "CommandLine"] {
        let mut tool_input = serde_json::Map::new();
        tool_input.insert(field.to_string(), "rm -rf /".into());
        let input = request("run_command", serde_json::Value::Object(tool_input));
        let outcome = check(&fx.rules_path, FailPolicy::Open, &input);
        assert!(!outcome.is_allowed(), "field: {}", field);
    }
}

#[test]
fn test_missing_command_allowed() {
    let fx = fixture(Some(RULES));
    let input = request("Bash", serde_json::json!({ "description": "rm -rf /" }));
    assert_eq!(
        check(&fx.rules_path, FailPolicy::Open, &input),
        Outcome::NoCommand
    );

    let input = request("Bash", serde_json::json!({ "command": "" }));
    assert_eq!(
        check(&fx.rules_path, FailPolicy::Closed, &input),
        Outcome::NoCommand
    );
}

// ============================================================================
// Evaluation
// ============================================================================

#[test]
fn test_blocked_command_denied() {
    let fx = fixture(Some(RULES));
    let outcome = check(&fx.rules_path, FailPolicy::Open, &bash("rm -rf /"));
    assert_eq!(
        outcome.verdict(),
        Verdict::deny(Severity::Blocked, r"rm\s+-rf\s+/")
    );
    assert!(outcome.warnings().is_empty());
}

#[test]
fn test_dangerous_command_denied() {
    let fx = fixture(Some(RULES));
    let outcome = check(
        &fx.rules_path,
        FailPolicy::Open,
        &bash("git push origin main --force"),
    );
    assert_eq!(
        outcome.verdict().reason().as_deref(),
        Some(r"dangerous: git\s+push\s+.*--force")
    );
}

#[test]
fn test_safe_command_allowed() {
    let fx = fixture(Some(RULES));
    let outcome = check(&fx.rules_path, FailPolicy::Open, &bash("ls -la"));
    assert!(outcome.is_allowed());
    assert!(outcome.was_evaluated());
}

// ============================================================================
// Fail-open is the default, deliberately
// ============================================================================

#[test]
fn test_missing_rules_fail_open_by_default() {
    let fx = fixture(None);
    let outcome = check(&fx.rules_path, FailPolicy::default(), &bash("rm -rf /"));

    assert!(outcome.is_allowed());
    assert!(matches!(outcome, Outcome::FailedOpen { .. }));
    let warnings = outcome.warnings();
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].contains("not found"));
    assert_eq!(warnings[1], NO_RULES_WARNING);
}

#[test]
fn test_malformed_rules_fail_open() {
    let fx = fixture(Some("{ \"blocked_commands\": [ "));
    let outcome = check(&fx.rules_path, FailPolicy::Open, &bash("rm -rf /"));
    assert!(outcome.is_allowed());
    assert!(outcome.warnings()[0].contains("Error loading shared rules"));
}

#[test]
fn test_empty_rules_fail_open_with_warning() {
    let fx = fixture(Some(r#"{"blocked_commands":[],"dangerous_patterns":[]}"#));
    let outcome = check(&fx.rules_path, FailPolicy::Open, &bash("rm -rf /"));
    assert!(outcome.is_allowed());
    assert_eq!(outcome.warnings(), [NO_RULES_WARNING.to_string()]);
}

// ============================================================================
// Fail-closed
// ============================================================================

#[test]
fn test_missing_rules_fail_closed() {
    let fx = fixture(None);
    let outcome = check(&fx.rules_path, FailPolicy::Closed, &bash("ls"));
    assert!(!outcome.is_allowed());
    let reason = outcome.verdict().reason().unwrap();
    assert!(reason.starts_with("rules unavailable"));
    assert!(reason.contains("not found"));
}

#[test]
fn test_invalid_pattern_fail_closed() {
    let fx = fixture(Some(r#"{"blocked_commands":[{"pattern":"rm\\s+(-rf"}]}"#));
    let outcome = check(&fx.rules_path, FailPolicy::Closed, &bash("ls"));
    assert!(!outcome.is_allowed());
    assert_eq!(outcome.warnings().len(), 1);
}

#[test]
fn test_valid_rules_fail_closed_behaves_normally() {
    let fx = fixture(Some(RULES));
    let outcome = check(&fx.rules_path, FailPolicy::Closed, &bash("ls -la"));
    assert!(outcome.is_allowed());
    let outcome = check(&fx.rules_path, FailPolicy::Closed, &bash("rm -rf /"));
    assert!(!outcome.is_allowed());
}
