//! Multi-select over task ids and the bulk operations applied to a selection.
//!
//! A selection is just a set of ids; it survives day moves and filter changes
//! because it never references positions. Bulk operations apply the ordinary
//! single-task logic once per selected id.

use std::collections::BTreeSet;

use chrono::NaiveDate;

use crate::board::move_task;
use crate::task::Task;

/// A set of selected task ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: BTreeSet<String>,
}

impl Selection {
    pub fn new() -> Self {
        Selection::default()
    }

    /// Flip membership of one id. Returns `true` when the id is now selected.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id) {
            false
        } else {
            self.ids.insert(id.to_string());
            true
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.ids.iter().map(String::as_str)
    }

    /// Drop ids that no longer exist in the collection.
    pub fn retain_known(&mut self, tasks: &[Task]) {
        self.ids.retain(|id| tasks.iter().any(|t| &t.id == id));
    }
}

impl FromIterator<String> for Selection {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Selection {
            ids: iter.into_iter().collect(),
        }
    }
}

/// Reschedule every selected task to `day`, each as an empty-region drop.
pub fn reschedule_all(tasks: &[Task], selection: &Selection, day: NaiveDate) -> Vec<Task> {
    let mut out = tasks.to_vec();
    for id in selection.ids() {
        out = move_task(&out, id, None, day);
    }
    out
}

/// Hand every selected task to a new assignee.
pub fn reassign_all(
    tasks: &[Task],
    selection: &Selection,
    assignee_id: &str,
    assignee: &str,
) -> Vec<Task> {
    tasks
        .iter()
        .map(|t| {
            if selection.contains(&t.id) {
                let mut t = t.clone();
                t.assignee_id = assignee_id.to_string();
                t.assignee = assignee.to_string();
                t
            } else {
                t.clone()
            }
        })
        .collect()
}

/// Group every selected task under one project.
pub fn bundle_all(tasks: &[Task], selection: &Selection, project: &str) -> Vec<Task> {
    tasks
        .iter()
        .map(|t| {
            if selection.contains(&t.id) {
                let mut t = t.clone();
                t.project = Some(project.to_string());
                t
            } else {
                t.clone()
            }
        })
        .collect()
}
