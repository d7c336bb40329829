//! Basic CLI E2E tests.
//!
//! Each test runs the built binary against its own data directory.

use std::path::Path;
use std::process::Command;

/// Run a CLI command and return (stdout, stderr, exit code).
fn run_cli(data_dir: &Path, args: &[&str]) -> (String, String, i32) {
    let output = Command::new(env!("CARGO_BIN_EXE_lifeos"))
        .args(args)
        .env("LIFEOS_DATA_DIR", data_dir)
        .env_remove("LIFEOS_AI_API_KEY")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute CLI command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let code = output.status.code().unwrap_or(-1);

    (stdout, stderr, code)
}

fn run_ok(data_dir: &Path, args: &[&str]) -> String {
    let (stdout, stderr, code) = run_cli(data_dir, args);
    assert_eq!(code, 0, "{args:?} failed: {stderr}");
    stdout
}

fn created_id(stdout: &str) -> String {
    stdout
        .lines()
        .find_map(|l| l.strip_prefix("Task created: "))
        .expect("no task id in output")
        .trim()
        .to_string()
}

#[test]
fn test_task_add_list_done() {
    let dir = tempfile::tempdir().unwrap();
    let out = run_ok(dir.path(), &["task", "add", "Go for a run", "--pillar", "body", "--points", "30"]);
    let id = created_id(&out);

    let list = run_ok(dir.path(), &["task", "list"]);
    assert!(list.contains("Go for a run"));

    let (stdout, stderr, code) = run_cli(dir.path(), &["task", "done", &id]);
    assert_eq!(code, 0);
    assert!(stdout.starts_with("[x]"));
    assert!(stderr.contains("+30 XP for Body!"));

    let open = run_ok(dir.path(), &["task", "list"]);
    assert!(!open.contains("Go for a run"));
    let all = run_ok(dir.path(), &["task", "list", "--all"]);
    assert!(all.contains("Go for a run"));

    let dash: serde_json::Value = serde_json::from_str(&run_ok(dir.path(), &["dashboard"])).unwrap();
    let body = dash["pillars"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["pillar"] == "Body")
        .unwrap();
    assert_eq!(body["xp"], 30);
    assert_eq!(dash["streak"], 0);
}

#[test]
fn test_blank_task_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "add", "   "]);
    assert_eq!(code, 1);
    assert!(stderr.contains("error:"));
}

#[test]
fn test_unknown_pillar_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (_, _, code) = run_cli(dir.path(), &["task", "add", "x", "--pillar", "Spirit"]);
    assert_ne!(code, 0);
}

#[test]
fn test_ai_without_key_notifies_and_fails() {
    let dir = tempfile::tempdir().unwrap();
    let (_, stderr, code) = run_cli(dir.path(), &["task", "split", "Learn Spanish"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("[error] The AI could not respond."));
    let list = run_ok(dir.path(), &["task", "list", "--all"]);
    assert!(list.trim().is_empty());
}

#[test]
fn test_settings_and_review_questions() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["settings", "add-question", "Trained today?", "--pillar", "Body", "--points", "20"]);
    run_ok(dir.path(), &["settings", "add-mentor", "Seneca"]);

    let questions = run_ok(dir.path(), &["review", "questions"]);
    assert!(questions.contains("0: Trained today? (Body, 20 XP)"));

    let settings: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["settings", "show"])).unwrap();
    assert_eq!(settings["mentors"][0], "Seneca");
    assert_eq!(settings["monthlySpend"], 1500.0);
}

#[test]
fn test_settings_remove_kpi_and_mentor() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["settings", "add-kpi", "Weight", "--start", "90", "--current", "85", "--target", "80"]);
    run_ok(dir.path(), &["settings", "add-mentor", "Seneca"]);

    run_ok(dir.path(), &["settings", "remove-kpi", "0"]);
    run_ok(dir.path(), &["settings", "remove-mentor", "Seneca"]);
    let settings: serde_json::Value =
        serde_json::from_str(&run_ok(dir.path(), &["settings", "show"])).unwrap();
    assert_eq!(settings["kpis"], serde_json::json!([]));
    assert_eq!(settings["mentors"], serde_json::json!([]));

    let (_, stderr, code) = run_cli(dir.path(), &["settings", "remove-mentor", "Seneca"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("No mentor with id 'Seneca'"));
}

#[test]
fn test_memory_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["memory", "set", "I train in the morning."]);
    let out = run_ok(dir.path(), &["memory", "show"]);
    assert_eq!(out.trim(), "I train in the morning.");
}

#[test]
fn test_finance_add_and_list() {
    let dir = tempfile::tempdir().unwrap();
    run_ok(dir.path(), &["finance", "add", "2024-02", "--net-worth", "1000", "--income", "3000", "--expenses", "2000"]);
    run_ok(dir.path(), &["finance", "add", "2024-01", "--net-worth", "500"]);
    let list: serde_json::Value = serde_json::from_str(&run_ok(dir.path(), &["finance", "list"])).unwrap();
    assert_eq!(list[0]["month"], "2024-01");
    assert_eq!(list[1]["netWorth"], 1000.0);

    let (_, _, code) = run_cli(dir.path(), &["finance", "add", "February", "--net-worth", "1"]);
    assert_eq!(code, 1);
}

#[test]
fn test_config_get_set() {
    let dir = tempfile::tempdir().unwrap();
    assert_eq!(run_ok(dir.path(), &["config", "get", "tasks.default_points"]).trim(), "10");
    run_ok(dir.path(), &["config", "set", "tasks.default_points", "25"]);
    assert_eq!(run_ok(dir.path(), &["config", "get", "tasks.default_points"]).trim(), "25");

    let out = run_ok(dir.path(), &["task", "add", "Uses new default"]);
    assert!(out.contains("\"points\": 25"));

    let (_, stderr, code) = run_cli(dir.path(), &["config", "get", "nope"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("unknown key"));
}
