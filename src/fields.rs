//! Enumerations and field types for scheduling.
//!
//! This module defines the structured data types used to classify tasks on the
//! weekly board, including lifecycle status, execution state, priority, and the
//! energy rating used for matching work to the right part of the day.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Lifecycle status of a task as it moves towards completion.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    #[serde(alias = "Todo")]
    Todo,
    #[serde(alias = "InProgress")]
    InProgress,
    #[serde(alias = "Blocked")]
    Blocked,
    #[serde(alias = "Review")]
    Review,
    #[serde(alias = "Done")]
    Done,
}

impl Status {
    /// The next status in display order, wrapping from `Done` back to `Todo`.
    pub fn cycled(self) -> Status {
        match self {
            Status::Todo => Status::InProgress,
            Status::InProgress => Status::Blocked,
            Status::Blocked => Status::Review,
            Status::Review => Status::Done,
            Status::Done => Status::Todo,
        }
    }
}

/// Live execution state, tracked independently of lifecycle status.
///
/// A task can sit in any lifecycle stage while being actively worked, paused,
/// or untouched. Several tasks may be `Working` at once.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Execution {
    #[default]
    Idle,
    Working,
    Paused,
}

/// Priority classification for task importance.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Priority {
    Low,
    Medium,
    High,
    Urgent,
}

impl Priority {
    /// Sort rank, most important first.
    pub fn rank(self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
        }
    }
}

/// Energy rating: how demanding a task is, for planning around focus levels.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ValueEnum, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum Energy {
    Low,
    High,
}

/// Available sorting options for task lists.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum SortKey {
    Due,
    Priority,
    Id,
}
