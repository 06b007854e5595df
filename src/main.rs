//! # wp - Weekly Planning Board
//!
//! A command-line weekly planner with a drag-and-drop style board TUI and a
//! Gantt timeline, for people who schedule their tasks by day rather than by
//! backlog.
//!
//! ## Key Features
//!
//! - **Seven-Day Board**: Tasks bucket into Monday through Sunday by due date;
//! cards reorder within a day and move between days without losing anything else
//! - **Two State Machines**: Lifecycle status (todo → done) and live execution
//! state (idle/working/paused) tracked independently
//! - **Checklist Progress**: Per-task subtask checklists with derived percent-complete
//! - **Gantt Timeline**: A 45-day axis with per-task bars spanning start to due date
//! - **Multiple Interfaces**: Full CLI for scripting + interactive TUIs for planning
//! - **Local File Storage**: One plain JSON file, trivially backed up or synced
//!
//! ## Quick Start
//!
//! ```bash
//! # Launch the weekly board
//! wp board
//!
//! # Launch the Gantt timeline
//! wp timeline
//!
//! # Add a task via CLI
//! wp add "Draft launch notes" --due monday --priority high
//!
//! # Print this week as text
//! wp week
//!
//! # Move a card to another day
//! wp move task-3 --to friday
//! ```
//!
//! ## Key Commands
//!
//! - `wp board` - Interactive weekly board (grab, drop, reorder cards)
//! - `wp timeline` - Gantt view of the next 45 days
//! - `wp add <title>` - Create a task with optional dates and metadata
//! - `wp week` - Print the seven-day board as plain text
//! - `wp subtask add <id> <title>` - Grow a task's checklist
//! - `wp reschedule --to <day> <ids...>` - Bulk move tasks to one day
//!
//! Data is stored locally in `~/.weekplan/tasks.json`. We recommend you source
//! control this folder via `git init` and back it up periodically.

use std::path::PathBuf;

use clap::Parser;

pub mod board;
pub mod cli;
pub mod cmd;
pub mod db;
pub mod fields;
pub mod filter;
pub mod selection;
pub mod task;
pub mod timeline;
pub mod tui {
    pub mod board;
    pub mod colors;
    pub mod run;
    pub mod timeline;
}

use cli::Cli;
use cmd::*;
use db::Database;

fn main() {
    let cli = Cli::parse();

    let db_path = cli.db.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        let dir = PathBuf::from(home).join(".weekplan");
        if let Err(e) = std::fs::create_dir_all(&dir) {
            eprintln!("Failed to create directory {}: {}", dir.display(), e);
            std::process::exit(1);
        }
        dir.join("tasks.json")
    });

    // The TUIs own their load/save cycle.
    match &cli.command {
        Commands::Board { week } => {
            cmd_board(&db_path, week.clone());
            return;
        }
        Commands::Timeline { origin } => {
            cmd_timeline(&db_path, origin.clone());
            return;
        }
        _ => {}
    }

    let mut db = Database::load(&db_path);

    match cli.command {
        Commands::Board { .. } => unreachable!("board command handled above"),
        Commands::Timeline { .. } => unreachable!("timeline command handled above"),

        Commands::Add {
            title, desc, project, start, due, priority, energy, assignee_id, assignee,
        } => cmd_add(&mut db, &db_path, title, desc, project, start, due, priority,
                     energy, assignee_id, assignee),

        Commands::List { all, search, priority, assignee, energy, sort, by_project, limit } =>
            cmd_list(&db, all, search, priority, assignee, energy, sort, by_project, limit),

        Commands::Week { date, search, priority, assignee, energy } =>
            cmd_week(&db, date, search, priority, assignee, energy),

        Commands::View { id } => cmd_view(&db, id),

        Commands::Update {
            id, title, desc, project, start, due, priority, energy, assignee_id,
            assignee, progress, clear_start, clear_due,
        } => cmd_update(&mut db, &db_path, id, title, desc, project, start, due,
                        priority, energy, assignee_id, assignee, progress,
                        clear_start, clear_due),

        Commands::Status { id, status } => cmd_status(&mut db, &db_path, id, status),

        Commands::Done { id } => cmd_done(&mut db, &db_path, id),

        Commands::Exec { id, execution } => cmd_exec(&mut db, &db_path, id, execution),

        Commands::Move { id, to, before } => cmd_move(&mut db, &db_path, id, to, before),

        Commands::Subtask { action } => cmd_subtask(&mut db, &db_path, action),

        Commands::Comment { id, text, author_id, author } =>
            cmd_comment(&mut db, &db_path, id, text, author_id, author),

        Commands::Attach { id, name, kind, location, size } =>
            cmd_attach(&mut db, &db_path, id, name, kind, location, size),

        Commands::Reschedule { to, ids } => cmd_reschedule(&mut db, &db_path, ids, to),

        Commands::Reassign { assignee_id, assignee, ids } =>
            cmd_reassign(&mut db, &db_path, ids, assignee_id, assignee),

        Commands::Bundle { project, ids } => cmd_bundle(&mut db, &db_path, ids, project),

        Commands::Delete { id } => cmd_delete(&mut db, &db_path, id),

        Commands::Completions { shell } => cmd_completions(shell),
    }
}
