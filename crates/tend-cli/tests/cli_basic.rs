//! Basic CLI E2E tests.
//!
//! Each test runs the built `tend` binary against its own temporary data
//! directory.

use std::io::Write;
use std::process::{Command, Stdio};

struct Cli {
    dir: tempfile::TempDir,
}

impl Cli {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tend"));
        cmd.args(args)
            .env("TEND_DATA_DIR", self.dir.path())
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run a command and return (stdout, stderr, exit code).
    fn run(&self, args: &[&str]) -> (String, String, i32) {
        let output = self
            .command(args)
            .output()
            .expect("Failed to execute CLI command");
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.code().unwrap_or(-1),
        )
    }

    fn run_with_stdin(&self, args: &[&str], input: &str) -> (String, String, i32) {
        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to spawn CLI");
        child
            .stdin
            .take()
            .unwrap()
            .write_all(input.as_bytes())
            .unwrap();
        let output = child.wait_with_output().unwrap();
        (
            String::from_utf8_lossy(&output.stdout).to_string(),
            String::from_utf8_lossy(&output.stderr).to_string(),
            output.status.code().unwrap_or(-1),
        )
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let (stdout, stderr, code) = self.run(args);
        assert_eq!(code, 0, "{args:?} failed: {stderr}");
        serde_json::from_str(&stdout).unwrap_or_else(|e| panic!("bad JSON from {args:?}: {e}\n{stdout}"))
    }
}

#[test]
fn test_category_list_has_seeds() {
    let cli = Cli::new();
    let categories = cli.json(&["category", "list", "--json"]);
    assert_eq!(categories, serde_json::json!(["work", "study", "exercise"]));
}

#[test]
fn test_category_add_and_dedupe() {
    let cli = Cli::new();
    let added = cli.json(&["category", "add", "Reading"]);
    assert_eq!(added["type"], "CategoryAdded");
    assert_eq!(added["name"], "reading");

    let (stdout, stderr, code) = cli.run(&["category", "add", "  READING "]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
    assert!(stderr.contains("already exists"));

    let categories = cli.json(&["category", "list", "--json"]);
    assert_eq!(categories.as_array().unwrap().len(), 4);
}

#[test]
fn test_todo_add_list_toggle_remove() {
    let cli = Cli::new();
    let added = cli.json(&["todo", "add", "write report", "--category", "Study"]);
    assert_eq!(added["type"], "TodoAdded");
    assert_eq!(added["category"], "study");
    let id = added["id"].as_str().unwrap().to_string();

    let todos = cli.json(&["todo", "list", "--json"]);
    assert_eq!(todos[0]["title"], "write report");
    assert_eq!(todos[0]["completed"], false);

    let toggled = cli.json(&["todo", "toggle", &id]);
    assert_eq!(toggled["completed"], true);

    let filtered = cli.json(&["todo", "list", "--category", "work", "--json"]);
    assert!(filtered.as_array().unwrap().is_empty());

    let removed = cli.json(&["todo", "remove", &id]);
    assert_eq!(removed["type"], "TodoRemoved");
    assert!(cli.json(&["todo", "list", "--json"]).as_array().unwrap().is_empty());
}

#[test]
fn test_todo_errors() {
    let cli = Cli::new();
    let (_, stderr, code) = cli.run(&["todo", "add", "x", "--category", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown category"));

    let (_, stderr, code) = cli.run(&["todo", "toggle", "00000000-0000-0000-0000-000000000000"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("todo not found"));

    let (stdout, _, code) = cli.run(&["todo", "add", "   "]);
    assert_eq!(code, 0);
    assert!(stdout.is_empty());
}

#[test]
fn test_session_saved_and_archived() {
    let cli = Cli::new();
    cli.json(&["todo", "add", "outline"]);

    let (stdout, stderr, code) = cli.run_with_stdin(&["session", "run", "-c", "study"], "s\ne\ny\n");
    assert_eq!(code, 0, "session failed: {stderr}");
    assert!(stdout.contains("SessionStarted"));
    assert!(stdout.contains("SessionEnded"));
    assert!(stdout.contains("SessionSaved"));
    assert!(stderr.contains("Session Summary"));

    let totals = cli.json(&["archive", "totals", "--json"]);
    assert_eq!(totals["session_count"], 1);

    let sessions = cli.json(&["archive", "sessions", "--json"]);
    assert_eq!(sessions[0]["todos"], serde_json::json!(["outline"]));
    assert!(sessions[0]["categoryTimes"].get("study").is_some());

    // Saving clears the working list.
    assert!(cli.json(&["todo", "list", "--json"]).as_array().unwrap().is_empty());
}

#[test]
fn test_session_marks_completions_before_saving() {
    let cli = Cli::new();
    cli.json(&["todo", "add", "outline"]);
    cli.json(&["todo", "add", "review"]);

    let (stdout, stderr, code) = cli.run_with_stdin(&["session", "run"], "e\nt 2\ns\n");
    assert_eq!(code, 0, "session failed: {stderr}");
    assert!(stderr.contains("Mark Completed Tasks"));
    assert!(stdout.contains("TodoToggled"));
    assert!(stdout.contains("SessionSaved"));

    let sessions = cli.json(&["archive", "sessions", "--json"]);
    assert_eq!(sessions[0]["todos"], serde_json::json!(["outline", "review"]));
    assert_eq!(sessions[0]["completedTodos"], serde_json::json!(["review"]));
}

#[test]
fn test_session_rejects_tick_override() {
    let cli = Cli::new();
    let (_, _, code) = cli.run(&["session", "run", "--tick-ms", "250"]);
    assert_eq!(code, 2);
}

#[test]
fn test_session_abandoned_on_eof() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run_with_stdin(&["session", "run"], "e\n");
    assert_eq!(code, 0);
    assert!(stdout.contains("SessionAbandoned"));

    let totals = cli.json(&["archive", "totals", "--json"]);
    assert_eq!(totals["session_count"], 0);
}

#[test]
fn test_config_get_set() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["config", "get", "focus.default_category"]);
    assert_eq!(code, 0);
    assert_eq!(stdout.trim(), "work");

    let (_, _, code) = cli.run(&["config", "set", "display.capitalize_categories", "false"]);
    assert_eq!(code, 0);
    let (stdout, _, _) = cli.run(&["config", "get", "display.capitalize_categories"]);
    assert_eq!(stdout.trim(), "false");

    let (_, stderr, code) = cli.run(&["config", "set", "focus.tick_interval_ms", "250"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("focus.tick_interval_ms"));

    let (_, stderr, code) = cli.run(&["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}

#[test]
fn test_completions() {
    let cli = Cli::new();
    let (stdout, _, code) = cli.run(&["completions", "bash"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("tend"));
}
