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

fn seed_task(id: &str, title: &str, due: Option<&str>) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": title,
        "description": null,
        "project": null,
        "start_date": null,
        "due_date": due,
        "status": "todo",
        "priority": "medium",
        "assignee_id": "me",
        "assignee": "Me",
        "created_at_utc": 1767225600,
        "updated_at_utc": 1767225600
    })
}

fn write_store(store_path: &PathBuf, tasks: Vec<serde_json::Value>) {
    let content = serde_json::json!({ "tasks": tasks });
    std::fs::write(store_path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

fn read_tasks(store_path: &PathBuf) -> Vec<serde_json::Value> {
    let stored = std::fs::read_to_string(store_path).expect("store file readable");
    let parsed: serde_json::Value = serde_json::from_str(&stored).expect("store is json");
    parsed["tasks"].as_array().expect("tasks array").clone()
}

// Week of Monday 2026-03-02 throughout.

#[test]
fn move_to_a_day_appends_after_that_days_cards() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-move-day.json");
    write_store(
        &store_path,
        vec![
            seed_task("task-1", "alpha review", Some("2026-03-04")),
            seed_task("task-2", "beta deploy", Some("2026-03-05")),
        ],
    );

    let output = Command::new(exe)
        .args([
            "--db",
            store_path.to_str().unwrap(),
            "move",
            "task-1",
            "--to",
            "2026-03-05",
        ])
        .output()
        .expect("failed to run move command");

    let tasks = read_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Moved task-1 to 2026-03-05"));

    // The moved card lands after Thursday's existing card
    assert_eq!(tasks[0]["id"], "task-2");
    assert_eq!(tasks[1]["id"], "task-1");
    assert_eq!(tasks[1]["due_date"], "2026-03-05");
}

#[test]
fn move_before_reorders_within_a_day() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-move-before.json");
    write_store(
        &store_path,
        vec![
            seed_task("task-1", "alpha review", Some("2026-03-04")),
            seed_task("task-2", "beta deploy", Some("2026-03-04")),
            seed_task("task-3", "gamma notes", Some("2026-03-04")),
        ],
    );

    let output = Command::new(exe)
        .args([
            "--db",
            store_path.to_str().unwrap(),
            "move",
            "task-3",
            "--to",
            "2026-03-04",
            "--before",
            "task-1",
        ])
        .output()
        .expect("failed to run move command");

    let tasks = read_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    assert_eq!(tasks[0]["id"], "task-3");
    assert_eq!(tasks[1]["id"], "task-1");
    assert_eq!(tasks[2]["id"], "task-2");
    for task in &tasks {
        assert_eq!(task["due_date"], "2026-03-04");
    }
}

#[test]
fn move_before_a_card_on_another_day_follows_that_card() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-move-cross.json");
    write_store(
        &store_path,
        vec![
            seed_task("task-1", "alpha review", Some("2026-03-04")),
            seed_task("task-2", "beta deploy", Some("2026-03-05")),
            seed_task("task-3", "gamma notes", Some("2026-03-05")),
        ],
    );

    // --to names the Wednesday, but the target card sits on the Thursday;
    // the target's day wins.
    let output = Command::new(exe)
        .args([
            "--db",
            store_path.to_str().unwrap(),
            "move",
            "task-1",
            "--to",
            "2026-03-04",
            "--before",
            "task-3",
        ])
        .output()
        .expect("failed to run move command");

    let tasks = read_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Moved task-1 to 2026-03-05"));

    assert_eq!(tasks[0]["id"], "task-2");
    assert_eq!(tasks[1]["id"], "task-1");
    assert_eq!(tasks[2]["id"], "task-3");
    assert_eq!(tasks[1]["due_date"], "2026-03-05");
}

#[test]
fn move_changes_nothing_but_the_due_date() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-move-fields.json");
    write_store(
        &store_path,
        vec![
            seed_task("task-1", "alpha review", Some("2026-03-04")),
            seed_task("task-2", "beta deploy", Some("2026-03-05")),
        ],
    );

    let output = Command::new(exe)
        .args([
            "--db",
            store_path.to_str().unwrap(),
            "move",
            "task-1",
            "--to",
            "2026-03-06",
        ])
        .output()
        .expect("failed to run move command");

    let tasks = read_tasks(&store_path);
    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());

    let moved = tasks.iter().find(|t| t["id"] == "task-1").unwrap();
    assert_eq!(moved["due_date"], "2026-03-06");
    assert_eq!(moved["title"], "alpha review");
    assert_eq!(moved["status"], "todo");
    assert_eq!(moved["priority"], "medium");
    assert_eq!(moved["progress"], 0);
    assert_eq!(moved["start_date"], serde_json::Value::Null);

    // The bystander card is untouched, timestamp included
    let other = tasks.iter().find(|t| t["id"] == "task-2").unwrap();
    assert_eq!(other["due_date"], "2026-03-05");
    assert_eq!(other["updated_at_utc"], 1767225600);
}

#[test]
fn move_unknown_id_fails_and_leaves_store_untouched() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-move-unknown.json");
    write_store(
        &store_path,
        vec![seed_task("task-1", "alpha review", Some("2026-03-04"))],
    );
    let before = std::fs::read_to_string(&store_path).unwrap();

    let output = Command::new(exe)
        .args([
            "--db",
            store_path.to_str().unwrap(),
            "move",
            "task-9",
            "--to",
            "2026-03-05",
        ])
        .output()
        .expect("failed to run move command");

    let after = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Task task-9 not found"));
    assert_eq!(before, after);
}

#[test]
fn move_before_a_vanished_card_fails_and_leaves_store_untouched() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-move-gone-target.json");
    write_store(
        &store_path,
        vec![
            seed_task("task-1", "alpha review", Some("2026-03-02")),
            seed_task("task-2", "beta deploy", Some("2026-03-03")),
        ],
    );
    let before = std::fs::read_to_string(&store_path).unwrap();

    let output = Command::new(exe)
        .args([
            "--db",
            store_path.to_str().unwrap(),
            "move",
            "task-1",
            "--to",
            "2026-03-03",
            "--before",
            "task-9",
        ])
        .output()
        .expect("failed to run move command");

    let after = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Task task-9 not found"));
    assert_eq!(before, after);
}

#[test]
fn move_before_an_unscheduled_card_fails_and_leaves_store_untouched() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-move-unscheduled-target.json");
    write_store(
        &store_path,
        vec![
            seed_task("task-1", "alpha review", Some("2026-03-02")),
            seed_task("task-2", "beta deploy", None),
        ],
    );
    let before = std::fs::read_to_string(&store_path).unwrap();

    let output = Command::new(exe)
        .args([
            "--db",
            store_path.to_str().unwrap(),
            "move",
            "task-1",
            "--to",
            "2026-03-03",
            "--before",
            "task-2",
        ])
        .output()
        .expect("failed to run move command");

    let after = std::fs::read_to_string(&store_path).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Task task-2 is not on the board"));
    assert_eq!(before, after);
}
