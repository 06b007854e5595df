//! Task data structure and lifecycle behaviour.
//!
//! This module defines the core `Task` struct that represents a single work item
//! on the weekly board, together with its checklist, comment thread, attachments,
//! and message provenance. Progress is cached on the task and recomputed whenever
//! the checklist changes.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::fields::*;

/// A checklist entry belonging to a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subtask {
    pub id: String,
    pub title: String,
    pub done: bool,
}

/// A timestamped note on a task's discussion thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub author_id: String,
    pub author: String,
    pub text: String,
    pub posted_at_utc: i64,
}

/// A file or link recorded against a task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub location: String,
    pub size: u64,
}

/// Provenance for tasks created out of a message thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRef {
    pub id: String,
    pub preview: String,
    pub sender: String,
}

/// A work item scheduled on the weekly board.
///
/// `status` tracks where the task sits in its lifecycle; `execution` tracks
/// whether someone is actively on it right now. The two move independently.
/// `due_date` doubles as the task's board day, so rescheduling a card is a
/// due-date change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub project: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
    pub status: Status,
    #[serde(default)]
    pub execution: Execution,
    pub priority: Priority,
    #[serde(default)]
    pub energy: Option<Energy>,
    pub assignee_id: String,
    pub assignee: String,
    #[serde(default)]
    pub subtasks: Vec<Subtask>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
    #[serde(default)]
    pub origin: Option<MessageRef>,
    pub created_at_utc: i64,
    pub updated_at_utc: i64,
}

impl Task {
    /// Apply a lifecycle transition. Entering `Done` forces progress to 100;
    /// leaving `Done` afterwards does not wind it back. Returns `true` when
    /// this call is the one that completed the task.
    pub fn set_status(&mut self, status: Status) -> bool {
        let completed = status == Status::Done && self.status != Status::Done;
        self.status = status;
        if status == Status::Done {
            self.progress = 100;
        }
        completed
    }

    /// Set the live execution state. No transition is rejected.
    pub fn set_execution(&mut self, execution: Execution) {
        self.execution = execution;
    }

    /// Flip one checklist entry and refresh cached progress.
    /// Unknown subtask ids are ignored.
    pub fn toggle_subtask(&mut self, subtask_id: &str) {
        if let Some(sub) = self.subtasks.iter_mut().find(|s| s.id == subtask_id) {
            sub.done = !sub.done;
            self.refresh_progress();
        }
    }

    /// Append a checklist entry and return its id.
    pub fn add_subtask(&mut self, title: &str) -> String {
        let id = format!("{}-s{}", self.id, next_suffix(&self.subtasks, "-s"));
        self.subtasks.push(Subtask {
            id: id.clone(),
            title: title.to_string(),
            done: false,
        });
        self.refresh_progress();
        id
    }

    /// Append a comment and return its id.
    pub fn add_comment(&mut self, author_id: &str, author: &str, text: &str, posted_at_utc: i64) -> String {
        let next = self
            .comments
            .iter()
            .filter_map(|c| suffix_number(&c.id, "-c"))
            .max()
            .unwrap_or(0)
            + 1;
        let id = format!("{}-c{}", self.id, next);
        self.comments.push(Comment {
            id: id.clone(),
            author_id: author_id.to_string(),
            author: author.to_string(),
            text: text.to_string(),
            posted_at_utc,
        });
        id
    }

    /// Record an attachment and return its id.
    pub fn add_attachment(&mut self, name: &str, kind: &str, location: &str, size: u64) -> String {
        let next = self
            .attachments
            .iter()
            .filter_map(|a| suffix_number(&a.id, "-a"))
            .max()
            .unwrap_or(0)
            + 1;
        let id = format!("{}-a{}", self.id, next);
        self.attachments.push(Attachment {
            id: id.clone(),
            name: name.to_string(),
            kind: kind.to_string(),
            location: location.to_string(),
            size,
        });
        id
    }

    /// The day this task occupies on the board, when it has one.
    pub fn board_day(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Recompute cached progress from the checklist. An empty checklist
    /// leaves the last explicit value in place.
    fn refresh_progress(&mut self) {
        if let Some(pct) = progress_of(&self.subtasks) {
            self.progress = pct;
        }
    }
}

/// Completion percentage of a checklist, rounded to the nearest whole number.
/// Returns `None` for an empty checklist so callers can keep a manual value.
pub fn progress_of(subtasks: &[Subtask]) -> Option<u8> {
    if subtasks.is_empty() {
        return None;
    }
    let done = subtasks.iter().filter(|s| s.done).count();
    Some(((done as f64 / subtasks.len() as f64) * 100.0).round() as u8)
}

fn next_suffix(subtasks: &[Subtask], sep: &str) -> u64 {
    subtasks
        .iter()
        .filter_map(|s| suffix_number(&s.id, sep))
        .max()
        .unwrap_or(0)
        + 1
}

fn suffix_number(id: &str, sep: &str) -> Option<u64> {
    id.rsplit_once(sep).and_then(|(_, n)| n.parse().ok())
}
