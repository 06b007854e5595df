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

// Week of Monday 2026-03-02; the 4th is the Wednesday, the 5th the Thursday.

#[test]
fn week_groups_cards_by_due_day_in_master_order() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-week.json");
    write_store(
        &store_path,
        vec![
            seed_task("task-1", "alpha review", Some("2026-03-04")),
            seed_task("task-2", "beta deploy", Some("2026-03-05")),
            seed_task("task-3", "gamma notes", Some("2026-03-04")),
        ],
    );

    let output = Command::new(exe)
        .args(["--db", store_path.to_str().unwrap(), "week", "2026-03-02"])
        .output()
        .expect("failed to run week command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(stdout.contains("Mon 2026-03-02 (0)"));
    assert!(stdout.contains("Wed 2026-03-04 (2)"));
    assert!(stdout.contains("Thu 2026-03-05 (1)"));

    // Both Wednesday cards keep their master-list order
    let first = stdout.find("task-1").expect("task-1 listed");
    let second = stdout.find("task-3").expect("task-3 listed");
    assert!(first < second);
}

#[test]
fn week_anchor_snaps_to_monday() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-week-anchor.json");
    write_store(
        &store_path,
        vec![seed_task("task-1", "alpha review", Some("2026-03-04"))],
    );

    // Anchoring on the Thursday shows the same Monday-first window
    let output = Command::new(exe)
        .args(["--db", store_path.to_str().unwrap(), "week", "2026-03-05"])
        .output()
        .expect("failed to run week command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Mon 2026-03-02 (0)"));
    assert!(stdout.contains("Wed 2026-03-04 (1)"));
    assert!(stdout.contains("Sun 2026-03-08 (0)"));
}

#[test]
fn week_filter_narrows_without_reordering() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-week-filter.json");
    write_store(
        &store_path,
        vec![
            seed_task("task-1", "alpha review", Some("2026-03-04")),
            seed_task("task-2", "beta deploy", Some("2026-03-04")),
        ],
    );

    let output = Command::new(exe)
        .args([
            "--db",
            store_path.to_str().unwrap(),
            "week",
            "2026-03-02",
            "--search",
            "beta",
        ])
        .output()
        .expect("failed to run week command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wed 2026-03-04 (1)"));
    assert!(stdout.contains("beta deploy"));
    assert!(!stdout.contains("alpha review"));
}

#[test]
fn week_leaves_undated_and_out_of_window_cards_off_the_board() {
    let exe = env!("CARGO_BIN_EXE_wp");
    let store_path = temp_path("cli-week-window.json");
    write_store(
        &store_path,
        vec![
            seed_task("task-1", "someday item", None),
            seed_task("task-2", "next week item", Some("2026-03-12")),
        ],
    );

    let output = Command::new(exe)
        .args(["--db", store_path.to_str().unwrap(), "week", "2026-03-02"])
        .output()
        .expect("failed to run week command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(!stdout.contains("someday item"));
    assert!(!stdout.contains("next week item"));
    for line in stdout.lines().filter(|l| !l.starts_with(' ')) {
        assert!(line.ends_with("(0)"), "expected empty day, got: {line}");
    }
}
