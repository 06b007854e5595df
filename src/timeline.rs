//! Date-to-column maths for the Gantt timeline.
//!
//! The axis is a fixed 45-day window of uniform cells. Bar positions are pure
//! arithmetic on the task's dates; the view layer decides clipping and
//! styling. A task with no dates at all has no bar.

use chrono::{Duration, NaiveDate};

use crate::task::Task;

/// Number of day columns on the timeline axis.
pub const AXIS_DAYS: i64 = 45;

/// Zoom presets for the timeline view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zoom {
    /// Wide day cells with a weekday header row.
    Day,
    /// Compact cells, fitting the whole axis on a narrow terminal.
    Week,
}

impl Zoom {
    /// Horizontal width of one day cell, in terminal columns.
    pub fn cell_width(self) -> u16 {
        match self {
            Zoom::Day => 3,
            Zoom::Week => 1,
        }
    }

    pub fn toggled(self) -> Zoom {
        match self {
            Zoom::Day => Zoom::Week,
            Zoom::Week => Zoom::Day,
        }
    }
}

/// A concrete axis: an origin date plus the width of one day cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimelineAxis {
    pub origin: NaiveDate,
    pub cell_width: u16,
}

impl TimelineAxis {
    pub fn new(origin: NaiveDate, zoom: Zoom) -> Self {
        TimelineAxis {
            origin,
            cell_width: zoom.cell_width(),
        }
    }

    /// The last day shown on the axis.
    pub fn last_day(&self) -> NaiveDate {
        self.origin + Duration::days(AXIS_DAYS - 1)
    }

    /// Horizontal offset of a date's cell. Negative for dates before the
    /// origin; the caller clips.
    pub fn date_to_x(&self, date: NaiveDate) -> i64 {
        (date - self.origin).num_days() * self.cell_width as i64
    }

    /// The date rendered in axis column `index`.
    pub fn day_at(&self, index: i64) -> NaiveDate {
        self.origin + Duration::days(index)
    }

    /// Column index of a date when it falls inside the axis window.
    pub fn day_offset(&self, date: NaiveDate) -> Option<usize> {
        let offset = (date - self.origin).num_days();
        (0..AXIS_DAYS).contains(&offset).then_some(offset as usize)
    }
}

/// A bar's horizontal placement: offset and width in terminal columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BarSpan {
    pub left: i64,
    pub width: i64,
}

/// Compute where a task's bar sits on the axis.
///
/// The bar runs from the task's start date to its due date, both inclusive.
/// A task with only one of the two dates renders as a single-day bar at that
/// date; a due date before the start clamps to a single day at the start.
/// Returns `None` when the task has neither date. Width never drops below one
/// cell, so every dated task stays visible at any zoom.
pub fn position_on_timeline(task: &Task, axis: &TimelineAxis) -> Option<BarSpan> {
    let start = task.start_date.or(task.due_date)?;
    let end = task.due_date.unwrap_or(start).max(start);
    let days = (end - start).num_days() + 1;
    Some(BarSpan {
        left: axis.date_to_x(start),
        width: days.max(1) * axis.cell_width as i64,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fields::{Execution, Priority, Status};

    fn origin() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, 2).unwrap()
    }

    fn dated_task(start: Option<i64>, due: Option<i64>) -> Task {
        Task {
            id: "task-1".to_string(),
            title: "Timeline task".to_string(),
            description: None,
            project: None,
            start_date: start.map(|d| origin() + Duration::days(d)),
            due_date: due.map(|d| origin() + Duration::days(d)),
            status: Status::Todo,
            execution: Execution::Idle,
            priority: Priority::Medium,
            energy: None,
            assignee_id: "u1".to_string(),
            assignee: "Ana".to_string(),
            subtasks: Vec::new(),
            progress: 0,
            comments: Vec::new(),
            attachments: Vec::new(),
            origin: None,
            created_at_utc: 0,
            updated_at_utc: 0,
        }
    }

    #[test]
    fn bar_spans_start_through_due_inclusive() {
        let axis = TimelineAxis {
            origin: origin(),
            cell_width: 50,
        };
        let task = dated_task(Some(2), Some(4));
        let span = position_on_timeline(&task, &axis).unwrap();
        assert_eq!(span.left, 100);
        assert_eq!(span.width, 150);
    }

    #[test]
    fn due_only_task_is_a_single_cell_at_its_due_date() {
        let axis = TimelineAxis {
            origin: origin(),
            cell_width: 3,
        };
        let span = position_on_timeline(&dated_task(None, Some(5)), &axis).unwrap();
        assert_eq!(span.left, 15);
        assert_eq!(span.width, 3);
    }

    #[test]
    fn start_only_task_is_a_single_cell_at_its_start() {
        let axis = TimelineAxis {
            origin: origin(),
            cell_width: 3,
        };
        let span = position_on_timeline(&dated_task(Some(1), None), &axis).unwrap();
        assert_eq!(span.left, 3);
        assert_eq!(span.width, 3);
    }

    #[test]
    fn due_before_start_clamps_to_one_day() {
        let axis = TimelineAxis {
            origin: origin(),
            cell_width: 3,
        };
        let span = position_on_timeline(&dated_task(Some(6), Some(2)), &axis).unwrap();
        assert_eq!(span.left, 18);
        assert_eq!(span.width, 3);
    }

    #[test]
    fn dateless_task_has_no_bar() {
        let axis = TimelineAxis {
            origin: origin(),
            cell_width: 3,
        };
        assert_eq!(position_on_timeline(&dated_task(None, None), &axis), None);
    }

    #[test]
    fn bar_before_the_origin_has_negative_left() {
        let axis = TimelineAxis {
            origin: origin(),
            cell_width: 1,
        };
        let span = position_on_timeline(&dated_task(Some(-3), Some(-1)), &axis).unwrap();
        assert_eq!(span.left, -3);
        assert_eq!(span.width, 3);
    }

    #[test]
    fn width_never_drops_below_one_cell() {
        for zoom in [Zoom::Day, Zoom::Week] {
            let axis = TimelineAxis::new(origin(), zoom);
            for (start, due) in [(Some(0), Some(0)), (None, Some(9)), (Some(4), None)] {
                let span = position_on_timeline(&dated_task(start, due), &axis).unwrap();
                assert!(span.width >= axis.cell_width as i64);
            }
        }
    }

    #[test]
    fn axis_window_and_offsets() {
        let axis = TimelineAxis::new(origin(), Zoom::Week);
        assert_eq!(axis.last_day(), origin() + Duration::days(44));
        assert_eq!(axis.day_offset(origin()), Some(0));
        assert_eq!(axis.day_offset(axis.last_day()), Some(44));
        assert_eq!(axis.day_offset(origin() - Duration::days(1)), None);
        assert_eq!(axis.day_offset(origin() + Duration::days(45)), None);
        assert_eq!(axis.day_at(7), origin() + Duration::days(7));
    }

    #[test]
    fn zoom_presets_toggle_between_cell_widths() {
        assert_eq!(Zoom::Day.cell_width(), 3);
        assert_eq!(Zoom::Week.cell_width(), 1);
        assert_eq!(Zoom::Day.toggled(), Zoom::Week);
        assert_eq!(Zoom::Week.toggled(), Zoom::Day);
    }
}
