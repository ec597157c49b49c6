//! shell-guard - Pre-execution guard for agent shell commands
//!
//! Reads one hook request as JSON from stdin and answers through the exit
//! code: 0 allow, 1 invalid request, 2 block (reason on stderr).
//!
//! # Usage
//!
//! ```bash
//! echo '{"tool_name":"Bash","tool_input":{"command":"rm -rf /"}}' | shell-guard
//!
//! # Explicit rule source, refuse everything if it is broken
//! shell-guard --rules ~/.claude/.shared/blocked_commands.json --fail-closed
//! ```

use std::env;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use shell_guard::{
    audit::AuditLogger,
    config::{Config, FailPolicy},
    engine::Guard,
    input::{self, HookInput, MAX_REQUEST_BYTES},
    logging,
    output::{self, EXIT_ALLOW, EXIT_INVALID_INPUT},
};

/// Print version information
fn print_version() {
    println!("shell-guard {}", env!("CARGO_PKG_VERSION"));
}

/// Print help message
fn print_help() {
    println!(
        r#"shell-guard - Block dangerous shell commands before an agent runs them

USAGE:
    shell-guard [OPTIONS] < request.json

OPTIONS:
    -h, --help              Print this help message
    -v, --version           Print version information
    -c, --config PATH       Path to config file
    -r, --rules PATH        Path to the rule source (blocked_commands.json)
        --fail-closed       Block shell commands when the rules cannot be loaded
    -d, --dry-run           Report what would be blocked but allow it
        --verbose           Log rule resolution and evaluation details

ENVIRONMENT:
    SHELL_GUARD_RULES=PATH  Rule source, used when --rules is not given

EXIT CODES:
    0  command allowed
    1  request was not valid JSON
    2  command blocked (reason on stderr)

USAGE AS HOOK:
    Claude Code (~/.claude/settings.json):
    {{
      "hooks": {{
        "PreToolUse": [{{
          "matcher": "Bash",
          "hooks": [{{ "type": "command", "command": "~/.claude/hooks/shell-guard" }}]
        }}]
      }}
    }}

    Gemini CLI: register the same binary as a BeforeTool hook.
"#
    );
}

/// Parse command line arguments
struct Args {
    help: bool,
    version: bool,
    config_path: Option<PathBuf>,
    rules_path: Option<PathBuf>,
    fail_closed: bool,
    dry_run: bool,
    verbose: bool,
}

impl Args {
    fn parse() -> Self {
        let args: Vec<String> = env::args().collect();
        let mut result = Args {
            help: false,
            version: false,
            config_path: None,
            rules_path: None,
            fail_closed: false,
            dry_run: false,
            verbose: false,
        };

        let mut i = 1;
        while i < args.len() {
            match args[i].as_str() {
                "-h" | "--help" => result.help = true,
                "-v" | "--version" => result.version = true,
                "-d" | "--dry-run" => result.dry_run = true,
                "--fail-closed" => result.fail_closed = true,
                "--verbose" => result.verbose = true,
                "-c" | "--config" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.config_path = Some(PathBuf::from(&args[i]));
                    }
                }
                "-r" | "--rules" => {
                    if i + 1 < args.len() {
                        i += 1;
                        result.rules_path = Some(PathBuf::from(&args[i]));
                    }
                }
                arg if arg.starts_with("--config=") => {
                    result.config_path = Some(PathBuf::from(arg.trim_start_matches("--config=")));
                }
                arg if arg.starts_with("--rules=") => {
                    result.rules_path = Some(PathBuf::from(arg.trim_start_matches("--rules=")));
                }
                _ => {}
            }
            i += 1;
        }

        result
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if args.help {
        print_help();
        return ExitCode::SUCCESS;
    }

    if args.version {
        print_version();
        return ExitCode::SUCCESS;
    }

    logging::init(args.verbose);

    // Load configuration
    let mut config = match args.config_path {
        Some(ref path) => Config::load_from(path).unwrap_or_else(|e| {
            log::warn!("{}; using defaults", e);
            Config::default()
        }),
        None => Config::load(),
    };

    if args.fail_closed {
        config.rules.fail_policy = FailPolicy::Closed;
    }

    // Read the request
    let input_json = match input::read_request(io::stdin().lock(), MAX_REQUEST_BYTES) {
        Ok(json) => json,
        Err(e) => {
            log::error!("{}", e);
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };

    let input = match HookInput::from_json(&input_json) {
        Ok(input) => input,
        Err(e) => {
            log::error!("Invalid JSON input: {}", e);
            return ExitCode::from(EXIT_INVALID_INPUT);
        }
    };

    let rules_path = config.resolve_rules_path(args.rules_path.as_deref());
    let guard = Guard::new(rules_path, config.rules.fail_policy);
    log::debug!(
        "Rule source {} (fail policy {:?})",
        guard.rules_path().display(),
        guard.policy()
    );

    let outcome = guard.check(&input);

    for warning in outcome.warnings() {
        log::warn!("{}", warning);
    }

    let mut audit = AuditLogger::new(config.audit_path().as_deref());
    if let Err(e) = audit.log_outcome(&input, &outcome, args.dry_run) {
        log::warn!("Failed to write audit log: {}", e);
    }

    let verdict = outcome.verdict();
    log::debug!("{}: {:?}", input.tool_name, verdict);

    if verdict.is_allowed() {
        return ExitCode::from(EXIT_ALLOW);
    }

    let command = input.command().unwrap_or_default();

    if args.dry_run {
        log::warn!(
            "Dry run, would block: {}",
            verdict.reason().unwrap_or_default()
        );
        return ExitCode::from(EXIT_ALLOW);
    }

    let stderr = io::stderr();
    let mut handle = stderr.lock();
    let _ = writeln!(handle, "{}", output::block_message(command, &verdict));
    let _ = handle.flush();

    ExitCode::from(verdict.exit_code())
}
