//! Week bucketing and the card move engine.
//!
//! The board is a projection: seven day buckets computed from the master task
//! list, never stored. All drag outcomes funnel through [`move_task`], which
//! returns a new collection and leaves the input untouched. Card order within
//! a day is exactly master-list order, so reordering a day means splicing the
//! master list.

use chrono::{Duration, NaiveDate};

use crate::task::Task;

/// The seven consecutive days starting at `week_start`.
pub fn week_days(week_start: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|i| week_start + Duration::days(i as i64))
}

/// Bucket tasks into the seven days of the week starting at `week_start`.
///
/// A task lands in the bucket whose date equals its due date; tasks without a
/// due date, or due outside the window, appear in no bucket. Within a bucket,
/// tasks keep their master-list order.
pub fn bucket_by_day(tasks: &[Task], week_start: NaiveDate) -> [Vec<Task>; 7] {
    let days = week_days(week_start);
    let mut buckets: [Vec<Task>; 7] = Default::default();
    for task in tasks {
        let Some(due) = task.board_day() else { continue };
        if let Some(slot) = days.iter().position(|d| *d == due) {
            buckets[slot].push(task.clone());
        }
    }
    buckets
}

/// Apply a card drop to the collection and return the result.
///
/// `target_id` is the card the drag landed on, or `None` for a drop onto a
/// day's empty region; `target_day` is the day of that region. Dropping a
/// card onto itself, moving an unknown id, or naming a target that is gone
/// or off the board returns the collection unchanged.
///
/// Outcomes:
/// - target on the dragged card's own day: reorder within that day, placing
///   the dragged card in the target's slot and shifting the target and
///   everything after it down one;
/// - target on another day: the dragged card takes the target's day as its
///   due date and lands immediately before the target;
/// - no target: the dragged card takes `target_day` as its due date and
///   lands after the last card already on that day, or at the end of the
///   collection if the day is empty.
///
/// Only the dragged card's `due_date` is ever written.
pub fn move_task(
    tasks: &[Task],
    dragged_id: &str,
    target_id: Option<&str>,
    target_day: NaiveDate,
) -> Vec<Task> {
    if target_id == Some(dragged_id) {
        return tasks.to_vec();
    }
    let Some(from) = tasks.iter().position(|t| t.id == dragged_id) else {
        return tasks.to_vec();
    };

    if let Some(tid) = target_id {
        // Stale target reference (removed mid-drag, or off the board): no-op.
        let Some(day) = tasks.iter().find(|t| t.id == tid).and_then(|t| t.board_day()) else {
            return tasks.to_vec();
        };
        if tasks[from].due_date == Some(day) {
            return reorder_within_day(tasks, dragged_id, tid, day);
        }
        return insert_before_target(tasks, from, tid, day);
    }

    append_to_day(tasks, from, target_day)
}

/// Empty-region drop: retag the card to `day` and place it after the day's
/// last card, or at the very end when the day has none.
fn append_to_day(tasks: &[Task], from: usize, day: NaiveDate) -> Vec<Task> {
    let mut out = tasks.to_vec();
    let mut moved = out.remove(from);
    moved.due_date = Some(day);
    let at = out
        .iter()
        .rposition(|t| t.due_date == Some(day))
        .map(|i| i + 1)
        .unwrap_or(out.len());
    out.insert(at, moved);
    out
}

/// Cross-day drop: retag the card to the target's day and place it
/// immediately before the target.
fn insert_before_target(tasks: &[Task], from: usize, target_id: &str, day: NaiveDate) -> Vec<Task> {
    let mut out = tasks.to_vec();
    let mut moved = out.remove(from);
    moved.due_date = Some(day);
    let at = out
        .iter()
        .position(|t| t.id == target_id)
        .unwrap_or(out.len());
    out.insert(at, moved);
    out
}

/// Same-day drop: pull the day's cards out in display order, move the dragged
/// card into the target's slot, and splice the run back in where the day's
/// first card sat.
fn reorder_within_day(tasks: &[Task], dragged_id: &str, target_id: &str, day: NaiveDate) -> Vec<Task> {
    let mut out: Vec<Task> = Vec::with_capacity(tasks.len());
    let mut day_run: Vec<Task> = Vec::new();
    let mut splice_at = None;
    for task in tasks {
        if task.due_date == Some(day) {
            if splice_at.is_none() {
                splice_at = Some(out.len());
            }
            day_run.push(task.clone());
        } else {
            out.push(task.clone());
        }
    }

    let Some(slot_from) = day_run.iter().position(|t| t.id == dragged_id) else {
        return tasks.to_vec();
    };
    let card = day_run.remove(slot_from);
    let slot_to = day_run
        .iter()
        .position(|t| t.id == target_id)
        .unwrap_or(day_run.len());
    day_run.insert(slot_to, card);

    let at = splice_at.unwrap_or(out.len());
    out.splice(at..at, day_run);
    out
}
