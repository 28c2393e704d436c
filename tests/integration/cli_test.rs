use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

const UNREACHABLE_URL: &str = "http://127.0.0.1:9";

fn agenthub_command() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_agenthub"));
    cmd.env("NO_COLOR", "1")
        .env("AGENTHUB_LOG_LEVEL", "error")
        .env("AGENTHUB_API_BASE_URL", UNREACHABLE_URL)
        .env_remove("RUST_LOG")
        .env_remove("COLORFGBG");
    cmd
}

fn run_agenthub(args: &[&str]) -> Output {
    agenthub_command()
        .args(args)
        .output()
        .expect("Failed to execute agenthub command")
}

fn run_agenthub_with_env(args: &[&str], env_vars: Vec<(&str, &str)>) -> Output {
    let mut cmd = agenthub_command();
    cmd.args(args);
    for (key, value) in env_vars {
        cmd.env(key, value);
    }
    cmd.output().expect("Failed to execute agenthub command")
}

fn output_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr_to_string(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn run_theme(pref: &Path, args: &[&str]) -> Output {
    let pref = pref.to_string_lossy().to_string();
    run_agenthub_with_env(args, vec![("AGENTHUB_PREFERENCE_FILE", pref.as_str())])
}

mod version_command_tests {
    use super::*;

    #[test]
    fn test_version_command_basic() {
        let output = run_agenthub(&["version"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "version command should succeed");
        assert!(stdout.contains("agenthub"));
        assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_version_command_detailed() {
        let output = run_agenthub(&["version", "--detailed"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "version --detailed should succeed");
        assert!(stdout.contains("Version"));
        assert!(stdout.contains("License"));
        assert!(stdout.contains("Apache-2.0"));
    }
}

mod help_command_tests {
    use super::*;

    #[test]
    fn test_help_lists_commands() {
        let output = run_agenthub(&["--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success(), "--help should succeed");
        for command in ["tasks", "chat", "agents", "theme", "health", "version"] {
            assert!(stdout.contains(command), "help should mention {command}");
        }
    }

    #[test]
    fn test_chat_help() {
        let output = run_agenthub(&["chat", "--help"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("stream"));
        assert!(stdout.contains("agent"));
    }

    #[test]
    fn test_unknown_command_fails() {
        let output = run_agenthub(&["dance"]);
        assert!(!output.status.success());
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let output = run_agenthub(&["agents", "list", "--format", "yaml"]);
        assert!(!output.status.success());
        assert!(stderr_to_string(&output).contains("yaml"));
    }
}

mod agents_command_tests {
    use super::*;

    #[test]
    fn test_agents_list_json() {
        let output = run_agenthub(&["agents", "list", "--format", "json"]);
        assert!(output.status.success(), "{}", stderr_to_string(&output));

        let agents: serde_json::Value =
            serde_json::from_str(&output_to_string(&output)).expect("valid json");
        let ids: Vec<&str> = agents
            .as_array()
            .unwrap()
            .iter()
            .map(|a| a["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["root", "a_demo_1"]);
        assert_eq!(agents[0]["fixed"], true);
    }

    #[test]
    fn test_agents_show_settings() {
        let output = run_agenthub(&["agents", "show", "a_demo_1"]);
        let stdout = output_to_string(&output);

        assert!(output.status.success());
        assert!(stdout.contains("Financial Analyst"));
        assert!(stdout.contains("Justify numbers"));
        assert!(stdout.contains("/reports/finance"));
    }

    #[test]
    fn test_agents_show_unknown() {
        let output = run_agenthub(&["agents", "show", "nobody"]);
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success());
        assert!(stderr.contains("Error"));
        assert!(stderr.contains("Agent not found: nobody"));
    }
}

mod theme_command_tests {
    use super::*;

    fn show_json(pref: &Path) -> serde_json::Value {
        let output = run_theme(pref, &["theme", "show", "--format", "json"]);
        assert!(output.status.success(), "{}", stderr_to_string(&output));
        serde_json::from_str(&output_to_string(&output)).expect("valid json")
    }

    #[test]
    fn test_theme_defaults_to_system() {
        let dir = TempDir::new().unwrap();
        let pref = dir.path().join("preferences.toml");

        let state = show_json(&pref);
        assert_eq!(state["current"], "dark");
        assert!(state["user_preference"].is_null());
        assert!(!pref.exists());
    }

    #[test]
    fn test_theme_set_is_persisted() {
        let dir = TempDir::new().unwrap();
        let pref = dir.path().join("preferences.toml");

        let output = run_theme(&pref, &["theme", "set", "light"]);
        assert!(output.status.success());
        assert!(output_to_string(&output).contains("Light theme"));

        let contents = std::fs::read_to_string(&pref).unwrap();
        assert!(contents.contains("theme-preference"));
        assert!(contents.contains("light"));

        let state = show_json(&pref);
        assert_eq!(state["current"], "light");
        assert_eq!(state["user_preference"], "light");
    }

    #[test]
    fn test_theme_toggle_twice_returns() {
        let dir = TempDir::new().unwrap();
        let pref = dir.path().join("preferences.toml");

        let first = run_theme(&pref, &["theme", "toggle"]);
        assert!(output_to_string(&first).contains("Light theme"));
        let second = run_theme(&pref, &["theme", "toggle"]);
        assert!(output_to_string(&second).contains("Dark theme"));

        assert_eq!(show_json(&pref)["current"], "dark");
    }

    #[test]
    fn test_theme_reset_forgets_preference() {
        let dir = TempDir::new().unwrap();
        let pref = dir.path().join("preferences.toml");

        run_theme(&pref, &["theme", "set", "light"]);
        let output = run_theme(&pref, &["theme", "reset"]);
        assert!(output.status.success());

        let state = show_json(&pref);
        assert_eq!(state["current"], "dark");
        assert!(state["user_preference"].is_null());
    }

    #[test]
    fn test_theme_set_rejects_unknown_mode() {
        let dir = TempDir::new().unwrap();
        let pref = dir.path().join("preferences.toml");

        let output = run_theme(&pref, &["theme", "set", "blue"]);
        assert!(!output.status.success());
        assert!(!pref.exists());
    }
}

mod health_command_tests {
    use super::*;

    #[test]
    fn test_health_unreachable_backend() {
        let output = run_agenthub(&["health"]);
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success());
        assert!(stderr.contains("Error"));
        assert!(stderr.contains("[E50"), "expected a network error: {stderr}");
    }

    #[test]
    fn test_invalid_base_url_is_config_error() {
        let output = run_agenthub_with_env(&["health"], vec![("AGENTHUB_API_BASE_URL", "ftp://hub")]);
        let stderr = stderr_to_string(&output);

        assert!(!output.status.success());
        assert!(stderr.contains("api.base_url"));
    }
}
