//! Input parsing for agent hook requests
//!
//! Claude Code and Gemini CLI send a JSON document on stdin before every tool
//! call. Field names for the command differ between frameworks, so the
//! aliases are resolved once here.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::io::Read;

use crate::output::preview;
use crate::redact::redact_secrets;

/// Largest request document accepted on stdin
pub const MAX_REQUEST_BYTES: u64 = 1024 * 1024;

/// Errors reading the request document
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    #[error("Failed to read request: {0}")]
    Io(#[from] std::io::Error),

    #[error("Request exceeds {limit} bytes")]
    TooLarge { limit: u64 },
}

/// Read the request document, refusing anything over `limit` bytes
pub fn read_request<R: Read>(reader: R, limit: u64) -> Result<String, RequestError> {
    let mut json = String::new();
    reader.take(limit + 1).read_to_string(&mut json)?;
    if json.len() as u64 > limit {
        return Err(RequestError::TooLarge { limit });
    }
    Ok(json)
}

/// Tool identities that execute shell commands (exact, case-sensitive).
///
/// Claude Code uses `Bash`; Gemini CLI uses `Shell`, `run_command` and
/// friends.
pub const SHELL_TOOLS: &[&str] = &["Bash", "Shell", "run_command", "shell", "bash"];

/// Whether `tool_name` is one of [`SHELL_TOOLS`]
pub fn is_shell_tool(tool_name: &str) -> bool {
    SHELL_TOOLS.contains(&tool_name)
}

/// Request fields that may carry the command text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandField {
    /// `command` (Claude Code, most Gemini tools)
    Command,

    /// `cmd`
    Cmd,

    /// `CommandLine`
    CommandLine,
}

impl CommandField {
    /// Aliases in priority order
    pub const PRIORITY: [CommandField; 3] = [
        CommandField::Command,
        CommandField::Cmd,
        CommandField::CommandLine,
    ];

    pub fn key(self) -> &'static str {
        match self {
            CommandField::Command => "command",
            CommandField::Cmd => "cmd",
            CommandField::CommandLine => "CommandLine",
        }
    }
}

/// Main input structure from the calling framework
#[derive(Debug, Deserialize)]
pub struct HookInput {
    /// Name of the tool being invoked (e.g., "Bash", "Read", "run_command")
    #[serde(default)]
    pub tool_name: String,

    /// Tool-specific input parameters
    #[serde(default)]
    pub tool_input: ToolInput,

    /// Optional session identifier
    #[serde(default)]
    pub session_id: Option<String>,

    /// Hook event name (e.g., "PreToolUse", "BeforeTool")
    #[serde(default)]
    pub hook_event_name: Option<String>,
}

/// Command text together with the field it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandText {
    pub field: CommandField,
    pub text: String,
}

/// Tool input with the command alias already resolved
#[derive(Debug, Clone, Default)]
pub struct ToolInput {
    /// First non-empty string among [`CommandField::PRIORITY`]
    pub command: Option<CommandText>,
}

impl ToolInput {
    fn from_object(obj: &Map<String, Value>) -> Self {
        let command = CommandField::PRIORITY.iter().find_map(|field| {
            obj.get(field.key())
                .and_then(Value::as_str)
                .filter(|text| !text.is_empty())
                .map(|text| CommandText {
                    field: *field,
                    text: text.to_string(),
                })
        });

        ToolInput { command }
    }
}

impl<'de> Deserialize<'de> for ToolInput {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;

        // Anything that is not an object carries no command
        Ok(value
            .as_object()
            .map(ToolInput::from_object)
            .unwrap_or_default())
    }
}

impl HookInput {
    /// Parse input from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Whether this request targets a shell-executing tool
    pub fn is_shell_tool(&self) -> bool {
        is_shell_tool(&self.tool_name)
    }

    /// The command text, if any
    pub fn command(&self) -> Option<&str> {
        self.tool_input.command.as_ref().map(|c| c.text.as_str())
    }

    /// Get a summary of the input for logging.
    ///
    /// Secrets are redacted over the whole command before it is shortened.
    pub fn summary(&self) -> String {
        match self.command() {
            Some(command) if self.is_shell_tool() => {
                format!("{}: {}", self.tool_name, preview(&redact_secrets(command)))
            }
            _ => format!("{}: (no command)", self.tool_name),
        }
    }
}
