//! Command implementations for the CLI interface.
//!
//! This module contains all the command handlers that implement the various
//! subcommands, from basic task CRUD through the board and timeline TUIs.
//! Handlers print plain text, save on mutation, and exit non-zero on errors.

use clap::Subcommand;
use clap_complete::{generate, Shell};

use std::collections::BTreeMap;
use std::path::Path;

use chrono::{Local, NaiveDate, TimeZone, Utc};

use crate::board::{bucket_by_day, move_task, week_days};
use crate::db::*;
use crate::fields::*;
use crate::filter::{filter_tasks, FilterCriteria};
use crate::selection::{bundle_all, reassign_all, reschedule_all, Selection};
use crate::task::Task;
use crate::tui::run::{run_board_tui, run_timeline_tui};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the weekly board interface.
    Board {
        /// Open the week containing this date (default: today).
        #[arg(long)]
        week: Option<String>,
    },

    /// Launch the Gantt timeline interface.
    Timeline {
        /// Axis origin date (default: Monday of this week).
        #[arg(long)]
        origin: Option<String>,
    },

    /// Add a new task.
    Add {
        /// Short title for the task.
        title: String,
        /// Optional longer description.
        #[arg(long)]
        desc: Option<String>,
        /// Project name.
        #[arg(long)]
        project: Option<String>,
        /// Start date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long)]
        start: Option<String>,
        /// Due date, same formats as --start. This is the task's board day.
        #[arg(long)]
        due: Option<String>,
        /// Priority: low | medium | high | urgent.
        #[arg(long, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Energy rating: low | high.
        #[arg(long, value_enum)]
        energy: Option<Energy>,
        /// Assignee id.
        #[arg(long, default_value = "me")]
        assignee_id: String,
        /// Assignee display name.
        #[arg(long, default_value = "Me")]
        assignee: String,
    },

    /// List tasks with optional filters.
    List {
        /// Include completed tasks.
        #[arg(long)]
        all: bool,
        /// Substring match on title or assignee name.
        #[arg(long)]
        search: Option<String>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Filter by assignee id.
        #[arg(long)]
        assignee: Option<String>,
        /// Filter by energy rating.
        #[arg(long, value_enum)]
        energy: Option<Energy>,
        /// Sort key.
        #[arg(long, value_enum, default_value_t = SortKey::Due)]
        sort: SortKey,
        /// Group output by project.
        #[arg(long)]
        by_project: bool,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Print the seven-day board for a week.
    Week {
        /// A date inside the week to print (default: today).
        date: Option<String>,
        /// Substring match on title or assignee name.
        #[arg(long)]
        search: Option<String>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Filter by assignee id.
        #[arg(long)]
        assignee: Option<String>,
        /// Filter by energy rating.
        #[arg(long, value_enum)]
        energy: Option<Energy>,
    },

    /// View a single task in full.
    View {
        /// Task id to view.
        id: String,
    },

    /// Update fields on a task.
    Update {
        /// Task id to update.
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long)]
        project: Option<String>,
        #[arg(long)]
        start: Option<String>,
        #[arg(long)]
        due: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        energy: Option<Energy>,
        #[arg(long)]
        assignee_id: Option<String>,
        #[arg(long)]
        assignee: Option<String>,
        /// Set progress percent directly (only for tasks without a checklist).
        #[arg(long)]
        progress: Option<u8>,
        /// Clear the start date.
        #[arg(long)]
        clear_start: bool,
        /// Clear the due date. The task leaves the board.
        #[arg(long)]
        clear_due: bool,
    },

    /// Set lifecycle status on a task.
    Status {
        /// Task id.
        id: String,
        /// New status: todo | in-progress | blocked | review | done.
        #[arg(value_enum)]
        status: Status,
    },

    /// Mark a task done.
    Done {
        /// Task id.
        id: String,
    },

    /// Set execution state on a task.
    Exec {
        /// Task id.
        id: String,
        /// New state: idle | working | paused.
        #[arg(value_enum)]
        execution: Execution,
    },

    /// Move a card to a day, optionally dropping it onto another card.
    Move {
        /// Task id to move.
        id: String,
        /// Target day: YYYY-MM-DD, "today", "tomorrow", weekday names.
        #[arg(long)]
        to: String,
        /// Land immediately before this card instead of at the day's end.
        #[arg(long)]
        before: Option<String>,
    },

    /// Manage a task's checklist.
    Subtask {
        #[command(subcommand)]
        action: SubtaskAction,
    },

    /// Append a comment to a task's thread.
    Comment {
        /// Task id.
        id: String,
        /// Comment text.
        text: String,
        /// Author id.
        #[arg(long, default_value = "me")]
        author_id: String,
        /// Author display name.
        #[arg(long, default_value = "Me")]
        author: String,
    },

    /// Record an attachment against a task.
    Attach {
        /// Task id.
        id: String,
        /// Attachment display name.
        name: String,
        /// Attachment kind, e.g. pdf | image | link.
        #[arg(long, default_value = "file")]
        kind: String,
        /// Path or URL.
        #[arg(long)]
        location: String,
        /// Size in bytes.
        #[arg(long, default_value_t = 0)]
        size: u64,
    },

    /// Reschedule several tasks to one day.
    Reschedule {
        /// Target day.
        #[arg(long)]
        to: String,
        /// Task ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Hand several tasks to a new assignee.
    Reassign {
        /// New assignee id.
        #[arg(long)]
        assignee_id: String,
        /// New assignee display name.
        #[arg(long)]
        assignee: String,
        /// Task ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Group several tasks under one project.
    Bundle {
        /// Project name.
        project: String,
        /// Task ids.
        #[arg(required = true)]
        ids: Vec<String>,
    },

    /// Delete a task.
    Delete {
        /// Task id.
        id: String,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for.
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum SubtaskAction {
    /// Add a checklist entry.
    Add {
        /// Task id.
        id: String,
        /// Entry title.
        title: String,
    },
    /// Toggle a checklist entry's done state.
    Toggle {
        /// Task id.
        id: String,
        /// Subtask id, e.g. task-3-s2.
        subtask_id: String,
    },
    /// Print a task's checklist.
    List {
        /// Task id.
        id: String,
    },
}

/// Launch the weekly board TUI.
pub fn cmd_board(db_path: &Path, week: Option<String>) {
    let week_start = match week {
        Some(s) => match parse_date_input(&s) {
            Some(d) => start_of_week(d),
            None => {
                eprintln!("Unrecognised date: {s}");
                std::process::exit(1);
            }
        },
        None => start_of_week(Local::now().date_naive()),
    };
    if let Err(e) = run_board_tui(db_path, week_start) {
        eprintln!("Board error: {e}");
        std::process::exit(1);
    }
}

/// Launch the Gantt timeline TUI.
pub fn cmd_timeline(db_path: &Path, origin: Option<String>) {
    let origin = match origin {
        Some(s) => match parse_date_input(&s) {
            Some(d) => d,
            None => {
                eprintln!("Unrecognised date: {s}");
                std::process::exit(1);
            }
        },
        None => start_of_week(Local::now().date_naive()),
    };
    if let Err(e) = run_timeline_tui(db_path, origin) {
        eprintln!("Timeline error: {e}");
        std::process::exit(1);
    }
}

/// Add a new task to the store.
#[allow(clippy::too_many_arguments)]
pub fn cmd_add(
    db: &mut Database,
    db_path: &Path,
    title: String,
    desc: Option<String>,
    project: Option<String>,
    start: Option<String>,
    due: Option<String>,
    priority: Priority,
    energy: Option<Energy>,
    assignee_id: String,
    assignee: String,
) {
    let start_date = parse_date_arg(start.as_deref());
    let due_date = parse_date_arg(due.as_deref());

    let now_utc = Utc::now().timestamp();
    let id = db.next_id();
    let task = Task {
        id: id.clone(),
        title,
        description: desc,
        project: project.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()),
        start_date,
        due_date,
        status: Status::Todo,
        execution: Execution::Idle,
        priority,
        energy,
        assignee_id,
        assignee,
        subtasks: Vec::new(),
        progress: 0,
        comments: Vec::new(),
        attachments: Vec::new(),
        origin: None,
        created_at_utc: now_utc,
        updated_at_utc: now_utc,
    };
    db.tasks.push(task);
    save_or_die(db, db_path);
    println!("Added {}", id);
}

/// List tasks with optional filtering and sorting.
#[allow(clippy::too_many_arguments)]
pub fn cmd_list(
    db: &Database,
    all: bool,
    search: Option<String>,
    priority: Option<Priority>,
    assignee: Option<String>,
    energy: Option<Energy>,
    sort: SortKey,
    by_project: bool,
    limit: Option<usize>,
) {
    let criteria = FilterCriteria {
        search,
        priority,
        assignee,
        energy,
    };
    let mut visible = filter_tasks(&db.tasks, &criteria);
    if !all {
        visible.retain(|t| t.status != Status::Done);
    }

    match sort {
        SortKey::Due => visible.sort_by(|a, b| {
            (a.due_date.unwrap_or(NaiveDate::MAX), &a.id)
                .cmp(&(b.due_date.unwrap_or(NaiveDate::MAX), &b.id))
        }),
        SortKey::Priority => visible.sort_by(|a, b| {
            (a.priority.rank(), &a.id).cmp(&(b.priority.rank(), &b.id))
        }),
        SortKey::Id => visible.sort_by(|a, b| a.id.cmp(&b.id)),
    }

    if let Some(n) = limit {
        visible.truncate(n);
    }

    if by_project {
        let mut groups: BTreeMap<String, Vec<&Task>> = BTreeMap::new();
        for t in &visible {
            let key = t.project.clone().unwrap_or_else(|| "Unassigned".into());
            groups.entry(key).or_default().push(t);
        }
        for (project, tasks) in &groups {
            println!("== {project} ==");
            print_table(tasks);
            println!();
        }
    } else {
        let refs: Vec<&Task> = visible.iter().collect();
        print_table(&refs);
    }
}

/// Print the seven-day board for one week.
pub fn cmd_week(
    db: &Database,
    date: Option<String>,
    search: Option<String>,
    priority: Option<Priority>,
    assignee: Option<String>,
    energy: Option<Energy>,
) {
    let anchor = match date {
        Some(s) => match parse_date_input(&s) {
            Some(d) => d,
            None => {
                eprintln!("Unrecognised date: {s}");
                std::process::exit(1);
            }
        },
        None => Local::now().date_naive(),
    };
    let week_start = start_of_week(anchor);
    let criteria = FilterCriteria {
        search,
        priority,
        assignee,
        energy,
    };
    let visible = filter_tasks(&db.tasks, &criteria);
    let buckets = bucket_by_day(&visible, week_start);
    let days = week_days(week_start);

    for (day, bucket) in days.iter().zip(buckets.iter()) {
        println!("{} ({})", day.format("%a %Y-%m-%d"), bucket.len());
        for t in bucket {
            println!(
                "  {:<9} [{:<10}] {:>3}% {}",
                t.id,
                format_status(t.status),
                t.progress,
                t.title
            );
        }
    }
}

/// View a task in full, including checklist, comments, and attachments.
pub fn cmd_view(db: &Database, id: String) {
    let Some(task) = db.get(&id).cloned() else {
        eprintln!("Task {} not found.", id);
        std::process::exit(1);
    };
    let today = Local::now().date_naive();
    println!("ID:           {}", task.id);
    println!("Title:        {}", task.title);
    println!("Status:       {}", format_status(task.status));
    println!("Execution:    {}", format_execution(task.execution));
    println!("Priority:     {}", format_priority(task.priority));
    println!("Energy:       {}", format_energy(task.energy));
    println!("Assignee:     {} ({})", task.assignee, task.assignee_id);
    println!("Project:      {}", task.project.clone().unwrap_or_else(|| "Unassigned".into()));
    println!("Start:        {}", task.start_date.map(|d| d.to_string()).unwrap_or_else(|| "-".into()));
    println!("Due:          {}", match task.due_date {
        Some(d) => format!("{d} ({})", format_due_relative(Some(d), today)),
        None => "-".into(),
    });
    println!("Progress:     {}%", task.progress);
    println!("Created UTC:  {}", Utc.timestamp_opt(task.created_at_utc, 0).single().unwrap().to_rfc3339());
    println!("Updated UTC:  {}", Utc.timestamp_opt(task.updated_at_utc, 0).single().unwrap().to_rfc3339());
    if let Some(origin) = &task.origin {
        println!("From message: {} \"{}\" ({})", origin.sender, origin.preview, origin.id);
    }
    println!("Description:\n{}", task.description.clone().unwrap_or_else(|| "-".into()));

    if !task.subtasks.is_empty() {
        println!("Checklist:");
        for s in &task.subtasks {
            println!("  [{}] {} ({})", if s.done { "x" } else { " " }, s.title, s.id);
        }
    }
    if !task.comments.is_empty() {
        println!("Comments:");
        for c in &task.comments {
            let when = Utc.timestamp_opt(c.posted_at_utc, 0).single().unwrap().to_rfc3339();
            println!("  {} ({}): {}", c.author, when, c.text);
        }
    }
    if !task.attachments.is_empty() {
        println!("Attachments:");
        for a in &task.attachments {
            println!("  {} [{}] {} ({} bytes)", a.name, a.kind, a.location, a.size);
        }
    }
}

/// Update an existing task's fields.
#[allow(clippy::too_many_arguments)]
pub fn cmd_update(
    db: &mut Database,
    db_path: &Path,
    id: String,
    title: Option<String>,
    desc: Option<String>,
    project: Option<String>,
    start: Option<String>,
    due: Option<String>,
    priority: Option<Priority>,
    energy: Option<Energy>,
    assignee_id: Option<String>,
    assignee: Option<String>,
    progress: Option<u8>,
    clear_start: bool,
    clear_due: bool,
) {
    let start_date = parse_date_arg(start.as_deref());
    let due_date = parse_date_arg(due.as_deref());

    let Some(t) = db.get_mut(&id) else {
        eprintln!("Task {} not found.", id);
        std::process::exit(1);
    };
    if let Some(v) = title {
        t.title = v;
    }
    if let Some(v) = desc {
        t.description = Some(v);
    }
    if let Some(v) = project {
        let v = v.trim().to_string();
        t.project = if v.is_empty() { None } else { Some(v) };
    }
    if let Some(d) = start_date {
        t.start_date = Some(d);
    }
    if clear_start {
        t.start_date = None;
    }
    if let Some(d) = due_date {
        t.due_date = Some(d);
    }
    if clear_due {
        t.due_date = None;
    }
    if let Some(v) = priority {
        t.priority = v;
    }
    if let Some(v) = energy {
        t.energy = Some(v);
    }
    if let Some(v) = assignee_id {
        t.assignee_id = v;
    }
    if let Some(v) = assignee {
        t.assignee = v;
    }
    if let Some(p) = progress {
        if !t.subtasks.is_empty() {
            eprintln!("Task {} derives progress from its checklist.", id);
            std::process::exit(1);
        }
        if p > 100 {
            eprintln!("Progress must be 0-100.");
            std::process::exit(1);
        }
        t.progress = p;
    }
    t.updated_at_utc = Utc::now().timestamp();
    save_or_die(db, db_path);
    println!("Updated {}", id);
}

/// Set lifecycle status on a task.
pub fn cmd_status(db: &mut Database, db_path: &Path, id: String, status: Status) {
    let Some(t) = db.get_mut(&id) else {
        eprintln!("Task {} not found.", id);
        std::process::exit(1);
    };
    let completed = t.set_status(status);
    t.updated_at_utc = Utc::now().timestamp();
    save_or_die(db, db_path);
    if completed {
        println!("Completed {} (100%)", id);
    } else {
        println!("{} is now {}", id, format_status(status));
    }
}

/// Shorthand for `status <id> done`.
pub fn cmd_done(db: &mut Database, db_path: &Path, id: String) {
    cmd_status(db, db_path, id, Status::Done);
}

/// Set execution state on a task.
pub fn cmd_exec(db: &mut Database, db_path: &Path, id: String, execution: Execution) {
    let Some(t) = db.get_mut(&id) else {
        eprintln!("Task {} not found.", id);
        std::process::exit(1);
    };
    t.set_execution(execution);
    t.updated_at_utc = Utc::now().timestamp();
    save_or_die(db, db_path);
    let word = match execution {
        Execution::Idle => "idle",
        Execution::Working => "working",
        Execution::Paused => "paused",
    };
    println!("{} is now {}", id, word);
}

/// Move a card to a day, optionally landing before another card.
pub fn cmd_move(db: &mut Database, db_path: &Path, id: String, to: String, before: Option<String>) {
    let Some(day) = parse_date_input(&to) else {
        eprintln!("Unrecognised date: {to}");
        std::process::exit(1);
    };
    if db.get(&id).is_none() {
        eprintln!("Task {} not found.", id);
        std::process::exit(1);
    }
    if let Some(tid) = before.as_deref() {
        let Some(target) = db.get(tid) else {
            eprintln!("Task {} not found.", tid);
            std::process::exit(1);
        };
        if target.board_day().is_none() {
            eprintln!("Task {} is not on the board.", tid);
            std::process::exit(1);
        }
    }
    db.tasks = move_task(&db.tasks, &id, before.as_deref(), day);
    // A --before target on another day wins over --to, so report the day the
    // card actually landed on.
    let landed = db.get(&id).and_then(|t| t.due_date).unwrap_or(day);
    if let Some(t) = db.get_mut(&id) {
        t.updated_at_utc = Utc::now().timestamp();
    }
    save_or_die(db, db_path);
    println!("Moved {} to {}", id, landed);
}

/// Handle checklist subcommands.
pub fn cmd_subtask(db: &mut Database, db_path: &Path, action: SubtaskAction) {
    match action {
        SubtaskAction::Add { id, title } => {
            let Some(t) = db.get_mut(&id) else {
                eprintln!("Task {} not found.", id);
                std::process::exit(1);
            };
            let sub_id = t.add_subtask(&title);
            t.updated_at_utc = Utc::now().timestamp();
            save_or_die(db, db_path);
            println!("Added {}", sub_id);
        }
        SubtaskAction::Toggle { id, subtask_id } => {
            let Some(t) = db.get_mut(&id) else {
                eprintln!("Task {} not found.", id);
                std::process::exit(1);
            };
            if !t.subtasks.iter().any(|s| s.id == subtask_id) {
                eprintln!("Subtask {} not found on {}.", subtask_id, id);
                std::process::exit(1);
            }
            t.toggle_subtask(&subtask_id);
            t.updated_at_utc = Utc::now().timestamp();
            let progress = t.progress;
            save_or_die(db, db_path);
            println!("{} at {}%", id, progress);
        }
        SubtaskAction::List { id } => {
            let Some(t) = db.get(&id) else {
                eprintln!("Task {} not found.", id);
                std::process::exit(1);
            };
            if t.subtasks.is_empty() {
                println!("No checklist on {}.", id);
                return;
            }
            for s in &t.subtasks {
                println!("[{}] {} ({})", if s.done { "x" } else { " " }, s.title, s.id);
            }
            println!("{}% complete", t.progress);
        }
    }
}

/// Append a comment to a task.
pub fn cmd_comment(
    db: &mut Database,
    db_path: &Path,
    id: String,
    text: String,
    author_id: String,
    author: String,
) {
    let Some(t) = db.get_mut(&id) else {
        eprintln!("Task {} not found.", id);
        std::process::exit(1);
    };
    let now_utc = Utc::now().timestamp();
    let comment_id = t.add_comment(&author_id, &author, &text, now_utc);
    t.updated_at_utc = now_utc;
    save_or_die(db, db_path);
    println!("Added {}", comment_id);
}

/// Record an attachment against a task.
pub fn cmd_attach(
    db: &mut Database,
    db_path: &Path,
    id: String,
    name: String,
    kind: String,
    location: String,
    size: u64,
) {
    let Some(t) = db.get_mut(&id) else {
        eprintln!("Task {} not found.", id);
        std::process::exit(1);
    };
    let attachment_id = t.add_attachment(&name, &kind, &location, size);
    t.updated_at_utc = Utc::now().timestamp();
    save_or_die(db, db_path);
    println!("Added {}", attachment_id);
}

/// Reschedule several tasks to one day.
pub fn cmd_reschedule(db: &mut Database, db_path: &Path, ids: Vec<String>, to: String) {
    let Some(day) = parse_date_input(&to) else {
        eprintln!("Unrecognised date: {to}");
        std::process::exit(1);
    };
    let selection = known_selection(db, &ids);
    db.tasks = reschedule_all(&db.tasks, &selection, day);
    touch_all(db, &selection);
    save_or_die(db, db_path);
    println!("Rescheduled {} task(s) to {}", selection.len(), day);
}

/// Hand several tasks to a new assignee.
pub fn cmd_reassign(
    db: &mut Database,
    db_path: &Path,
    ids: Vec<String>,
    assignee_id: String,
    assignee: String,
) {
    let selection = known_selection(db, &ids);
    db.tasks = reassign_all(&db.tasks, &selection, &assignee_id, &assignee);
    touch_all(db, &selection);
    save_or_die(db, db_path);
    println!("Reassigned {} task(s) to {}", selection.len(), assignee);
}

/// Group several tasks under one project.
pub fn cmd_bundle(db: &mut Database, db_path: &Path, ids: Vec<String>, project: String) {
    let selection = known_selection(db, &ids);
    db.tasks = bundle_all(&db.tasks, &selection, &project);
    touch_all(db, &selection);
    save_or_die(db, db_path);
    println!("Bundled {} task(s) into {}", selection.len(), project);
}

/// Delete a task by id.
pub fn cmd_delete(db: &mut Database, db_path: &Path, id: String) {
    if !db.remove(&id) {
        eprintln!("Task {} not found.", id);
        std::process::exit(1);
    }
    save_or_die(db, db_path);
    println!("Deleted {}", id);
}

/// Generate shell completions for the CLI.
pub fn cmd_completions(shell: Shell) {
    use crate::cli::Cli;
    use clap::CommandFactory;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

/// Parse an optional date argument, exiting loudly on junk input.
fn parse_date_arg(arg: Option<&str>) -> Option<NaiveDate> {
    let s = arg?;
    match parse_date_input(s) {
        Some(d) => Some(d),
        None => {
            eprintln!("Unrecognised date: {s}");
            std::process::exit(1);
        }
    }
}

/// Build a selection from explicit ids, exiting if any id is unknown.
fn known_selection(db: &Database, ids: &[String]) -> Selection {
    for id in ids {
        if db.get(id).is_none() {
            eprintln!("Task {} not found.", id);
            std::process::exit(1);
        }
    }
    ids.iter().cloned().collect()
}

fn touch_all(db: &mut Database, selection: &Selection) {
    let now_utc = Utc::now().timestamp();
    for t in db.tasks.iter_mut() {
        if selection.contains(&t.id) {
            t.updated_at_utc = now_utc;
        }
    }
}

fn save_or_die(db: &Database, db_path: &Path) {
    if let Err(e) = db.save(db_path) {
        eprintln!("Failed to save store: {e}");
        std::process::exit(1);
    }
}
