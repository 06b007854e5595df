//! Pure task filtering.
//!
//! Criteria combine conjunctively; a criterion left unset matches everything.
//! Filtering never reorders: the output preserves master-list order, so a
//! filtered board buckets exactly like an unfiltered one, minus hidden cards.

use crate::fields::{Energy, Priority};
use crate::task::Task;

/// Filter criteria for narrowing the visible task set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterCriteria {
    /// Case-insensitive substring match against title and assignee name.
    pub search: Option<String>,
    pub priority: Option<Priority>,
    /// Matches on assignee id, not display name.
    pub assignee: Option<String>,
    pub energy: Option<Energy>,
}

impl FilterCriteria {
    /// True when no criterion is set, i.e. the filter passes everything.
    pub fn is_empty(&self) -> bool {
        self.search.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.energy.is_none()
    }

    /// Whether a task passes every set criterion.
    pub fn matches(&self, task: &Task) -> bool {
        if let Some(ref needle) = self.search {
            let needle = needle.to_lowercase();
            if !needle.is_empty()
                && !task.title.to_lowercase().contains(&needle)
                && !task.assignee.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        if let Some(priority) = self.priority {
            if task.priority != priority {
                return false;
            }
        }
        if let Some(ref assignee) = self.assignee {
            if &task.assignee_id != assignee {
                return false;
            }
        }
        if let Some(energy) = self.energy {
            if task.energy != Some(energy) {
                return false;
            }
        }
        true
    }
}

/// Return the tasks passing `criteria`, in their original order.
pub fn filter_tasks(tasks: &[Task], criteria: &FilterCriteria) -> Vec<Task> {
    if criteria.is_empty() {
        return tasks.to_vec();
    }
    tasks
        .iter()
        .filter(|t| criteria.matches(t))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Execution, Status};

    fn task(id: &str, title: &str, priority: Priority, assignee_id: &str, assignee: &str) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            project: None,
            start_date: None,
            due_date: None,
            status: Status::Todo,
            execution: Execution::Idle,
            priority,
            energy: None,
            assignee_id: assignee_id.to_string(),
            assignee: assignee.to_string(),
            subtasks: Vec::new(),
            progress: 0,
            comments: Vec::new(),
            attachments: Vec::new(),
            origin: None,
            created_at_utc: 0,
            updated_at_utc: 0,
        }
    }

    fn crew() -> Vec<Task> {
        vec![
            task("task-1", "Write launch notes", Priority::High, "u1", "Ana"),
            task("task-2", "Fix billing bug", Priority::Urgent, "u2", "Bo"),
            task("task-3", "Plan sprint", Priority::High, "u1", "Ana"),
            task("task-4", "Tidy backlog", Priority::Low, "u3", "Cai"),
        ]
    }

    #[test]
    fn empty_criteria_returns_everything_in_order() {
        let tasks = crew();
        let out = filter_tasks(&tasks, &FilterCriteria::default());
        assert_eq!(out, tasks);
    }

    #[test]
    fn priority_criterion_narrows() {
        let tasks = crew();
        let criteria = FilterCriteria {
            priority: Some(Priority::High),
            ..Default::default()
        };
        let out = filter_tasks(&tasks, &criteria);
        assert_eq!(out.len(), 2);
        assert!(out.iter().all(|t| t.priority == Priority::High));
    }

    #[test]
    fn filtering_is_a_fixed_point() {
        let tasks = crew();
        let criteria = FilterCriteria {
            priority: Some(Priority::High),
            ..Default::default()
        };
        let once = filter_tasks(&tasks, &criteria);
        let twice = filter_tasks(&once, &criteria);
        assert_eq!(once, twice);
    }

    #[test]
    fn search_matches_title_and_assignee_case_insensitively() {
        let tasks = crew();
        let by_title = FilterCriteria {
            search: Some("BILLING".to_string()),
            ..Default::default()
        };
        let out = filter_tasks(&tasks, &by_title);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "task-2");

        let by_name = FilterCriteria {
            search: Some("ana".to_string()),
            ..Default::default()
        };
        let out = filter_tasks(&tasks, &by_name);
        assert_eq!(out.len(), 2);
    }

    #[test]
    fn criteria_combine_conjunctively() {
        let tasks = crew();
        let criteria = FilterCriteria {
            search: Some("sprint".to_string()),
            priority: Some(Priority::High),
            assignee: Some("u1".to_string()),
            ..Default::default()
        };
        let out = filter_tasks(&tasks, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "task-3");

        // Same search with a mismatched assignee yields nothing.
        let criteria = FilterCriteria {
            search: Some("sprint".to_string()),
            assignee: Some("u2".to_string()),
            ..Default::default()
        };
        assert!(filter_tasks(&tasks, &criteria).is_empty());
    }

    #[test]
    fn energy_unset_on_task_fails_energy_criterion() {
        let mut tasks = crew();
        tasks[0].energy = Some(Energy::High);
        let criteria = FilterCriteria {
            energy: Some(Energy::High),
            ..Default::default()
        };
        let out = filter_tasks(&tasks, &criteria);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].id, "task-1");
    }
}
