use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("weekplan-{nanos}-{file_name}"))
}

fn write_store(store_path: &PathBuf, tasks: Vec<serde_json::Value>) {
    let content = serde_json::json!({ "tasks": tasks });
    std::fs::write(store_path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn read_task(store_path: &PathBuf, id: &str) -> serde_json::Value {
    let stored = std::fs::read_to_string(store_path).expect("store file readable");
    let parsed: serde_json::Value = serde_json::from_str(&stored).expect("store is json");
    parsed["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .find(|t| t["id"] == id)
        .expect("task present")
        .clone()
}

#[test]
fn done_completes_and_forces_full_progress() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-status-done.json");
    write_store(
        &store_path,
        vec![serde_json::json!({
            "id": "task-1",
            "title": "alpha review",
            "due_date": "2026-03-04",
            "status": "in-progress",
            "priority": "medium",
            "assignee_id": "me",
            "assignee": "Me",
            "progress": 40,
            "created_at_utc": 1767225600,
            "updated_at_utc": 1767225600
        })],
    );

    let output = Command::new(exe)
        .args(["--db", store_path.to_str().unwrap(), "done", "task-1"])
        .output()
        .expect("failed to run done command");

    let task = read_task(&store_path, "task-1");
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Completed task-1 (100%)"));
    assert_eq!(task["status"], "done");
    assert_eq!(task["progress"], 100);
}

#[test]
fn done_reports_completion_only_on_the_transition() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-status-done-twice.json");
    write_store(
        &store_path,
        vec![serde_json::json!({
            "id": "task-1",
            "title": "alpha review",
            "status": "todo",
            "priority": "medium",
            "assignee_id": "me",
            "assignee": "Me",
            "created_at_utc": 1767225600,
            "updated_at_utc": 1767225600
        })],
    );

    let first = Command::new(exe)
        .args(["--db", store_path.to_str().unwrap(), "done", "task-1"])
        .output()
        .expect("failed to run done command");
    let second = Command::new(exe)
        .args(["--db", store_path.to_str().unwrap(), "done", "task-1"])
        .output()
        .expect("failed to run done command");

    std::fs::remove_file(&store_path).ok();

    assert!(first.status.success());
    assert!(second.status.success());
    assert!(String::from_utf8_lossy(&first.stdout).contains("Completed task-1 (100%)"));
    let second_out = String::from_utf8_lossy(&second.stdout);
    assert!(!second_out.contains("Completed"));
    assert!(second_out.contains("task-1 is now Done"));
}

#[test]
fn update_progress_is_rejected_when_a_checklist_exists() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-status-derived.json");
    write_store(
        &store_path,
        vec![serde_json::json!({
            "id": "task-1",
            "title": "alpha review",
            "status": "todo",
            "priority": "medium",
            "assignee_id": "me",
            "assignee": "Me",
            "subtasks": [
                { "id": "task-1-s1", "title": "draft", "done": true },
                { "id": "task-1-s2", "title": "send", "done": false }
            ],
            "progress": 50,
            "created_at_utc": 1767225600,
            "updated_at_utc": 1767225600
        })],
    );

    let output = Command::new(exe)
        .args([
            "--db",
            store_path.to_str().unwrap(),
            "update",
            "task-1",
            "--progress",
            "80",
        ])
        .output()
        .expect("failed to run update command");

    let task = read_task(&store_path, "task-1");
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("derives progress from its checklist"));
    assert_eq!(task["progress"], 50);
}

#[test]
fn subtask_toggle_recomputes_progress() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-status-toggle.json");
    write_store(
        &store_path,
        vec![serde_json::json!({
            "id": "task-1",
            "title": "alpha review",
            "status": "todo",
            "priority": "medium",
            "assignee_id": "me",
            "assignee": "Me",
            "subtasks": [
                { "id": "task-1-s1", "title": "draft", "done": false },
                { "id": "task-1-s2", "title": "send", "done": false }
            ],
            "progress": 0,
            "created_at_utc": 1767225600,
            "updated_at_utc": 1767225600
        })],
    );

    let output = Command::new(exe)
        .args([
            "--db",
            store_path.to_str().unwrap(),
            "subtask",
            "toggle",
            "task-1",
            "task-1-s1",
        ])
        .output()
        .expect("failed to run subtask command");

    let task = read_task(&store_path, "task-1");
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("task-1 at 50%"));
    assert_eq!(task["progress"], 50);
}

#[test]
fn execution_state_moves_independently_of_status() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-status-exec.json");
    write_store(
        &store_path,
        vec![serde_json::json!({
            "id": "task-1",
            "title": "alpha review",
            "status": "blocked",
            "priority": "medium",
            "assignee_id": "me",
            "assignee": "Me",
            "created_at_utc": 1767225600,
            "updated_at_utc": 1767225600
        })],
    );

    let output = Command::new(exe)
        .args([
            "--db",
            store_path.to_str().unwrap(),
            "exec",
            "task-1",
            "working",
        ])
        .output()
        .expect("failed to run exec command");

    let task = read_task(&store_path, "task-1");
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("task-1 is now working"));
    assert_eq!(task["execution"], "working");
    assert_eq!(task["status"], "blocked");
}
