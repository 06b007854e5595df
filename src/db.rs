//! Task store and shared helpers.
//!
//! This module provides the `Database` struct holding the master task list,
//! along with date parsing, relative formatting, and the plain-text table
//! output used by the list commands. Master-list order is significant: it is
//! the display order of cards within a board day.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use chrono::{Datelike, Duration, Local, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::fields::*;
use crate::task::Task;

/// In-memory store for the task collection.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Database {
    pub tasks: Vec<Task>,
}

impl Database {
    /// Load the store from a JSON file, starting empty if the file is missing
    /// or unreadable.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Database::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(db) => db,
                Err(e) => {
                    eprintln!("Error parsing store, starting fresh: {e}");
                    Database::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading store, starting fresh: {e}");
                Database::default()
            }
        }
    }

    /// Save the store to a JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self).unwrap();
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Generate the next available task id in the `task-N` scheme.
    pub fn next_id(&self) -> String {
        let max = self
            .tasks
            .iter()
            .filter_map(|t| t.id.strip_prefix("task-").and_then(|n| n.parse::<u64>().ok()))
            .max()
            .unwrap_or(0);
        format!("task-{}", max + 1)
    }

    /// Get a task by id.
    pub fn get(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by id.
    pub fn get_mut(&mut self, id: &str) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Remove a task by id. Returns `true` if something was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }
}

/// Parse human-readable day input.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - bare weekday names ("monday", "fri") for this week's occurrence
/// - "next monday" etc. for next week's occurrence
/// - "in 3d", "in 2w"
/// - "YYYY-MM-DD" format
pub fn parse_date_input(s: &str) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();
    let today = Local::now().date_naive();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        _ => {}
    }

    // "in X" patterns
    if let Some(rest) = s.strip_prefix("in ") {
        if let Some(nd) = rest.strip_suffix('d') {
            if let Ok(days) = nd.trim().parse::<i64>() {
                return Some(today + Duration::days(days));
            }
        }
        if let Some(nw) = rest.strip_suffix('w') {
            if let Ok(weeks) = nw.trim().parse::<i64>() {
                return Some(today + Duration::weeks(weeks));
            }
        }
    }

    // Weekday patterns
    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];

    for (day_name, target_day) in weekdays {
        if s == day_name {
            // This week's occurrence (today counts).
            let current_day = today.weekday().num_days_from_monday() as i32;
            let days_ahead = (target_day + 7 - current_day) % 7;
            return Some(today + Duration::days(days_ahead as i64));
        }

        if s == format!("next {}", day_name) {
            let current_day = today.weekday().num_days_from_monday() as i32;
            let days_ahead = (target_day + 7 - current_day) % 7;
            let days_to_add = if days_ahead == 0 { 7 } else { days_ahead + 7 };
            return Some(today + Duration::days(days_to_add as i64));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// The Monday of the ISO week containing `today`.
pub fn start_of_week(today: NaiveDate) -> NaiveDate {
    // ISO week: Monday start.
    let weekday = today.weekday().num_days_from_monday() as i64;
    today - Duration::days(weekday)
}

/// Format a due date relative to today ("today", "tomorrow", "in 3d", "2d late").
pub fn format_due_relative(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) => {
            let delta = d - today;
            if delta.num_days() == 0 {
                "today".into()
            } else if delta.num_days() == 1 {
                "tomorrow".into()
            } else if delta.num_days() > 1 {
                format!("in {}d", delta.num_days())
            } else {
                format!("{}d late", -delta.num_days())
            }
        }
    }
}

/// Format a lifecycle status for display.
pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Todo => "Todo",
        Status::InProgress => "InProgress",
        Status::Blocked => "Blocked",
        Status::Review => "Review",
        Status::Done => "Done",
    }
}

/// Format an execution state for display. `Idle` renders as a dash so the
/// table only calls out tasks someone is actually on.
pub fn format_execution(e: Execution) -> &'static str {
    match e {
        Execution::Idle => "-",
        Execution::Working => "Working",
        Execution::Paused => "Paused",
    }
}

/// Format a priority level for display.
pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::Low => "Low",
        Priority::Medium => "Medium",
        Priority::High => "High",
        Priority::Urgent => "Urgent",
    }
}

/// Format an energy rating for display.
pub fn format_energy(e: Option<Energy>) -> &'static str {
    match e {
        Some(Energy::Low) => "Low",
        Some(Energy::High) => "High",
        None => "-",
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[&Task]) {
    // Header.
    println!(
        "{:<9} {:<11} {:<7} {:<8} {:<9} {:<12} {:<5} {}",
        "ID", "Status", "Exec", "Pri", "Due", "Assignee", "Prog", "Title"
    );
    let today = Local::now().date_naive();
    for t in tasks {
        let due = format_due_relative(t.due_date, today);
        println!(
            "{:<9} {:<11} {:<7} {:<8} {:<9} {:<12} {:>3}% {} {}",
            t.id,
            format_status(t.status),
            format_execution(t.execution),
            format_priority(t.priority),
            due,
            truncate(&t.assignee, 12),
            t.progress,
            t.title,
            t.project
                .as_deref()
                .map(|p| format!("[{p}]"))
                .unwrap_or_default()
        );
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}
