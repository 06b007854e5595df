//! Weekly board interface.
//!
//! This module implements the seven-day board view where cards are organised
//! into day columns by due date. Cards are grabbed, carried, and dropped with
//! the keyboard; every drop funnels through the move engine so the outcome
//! always matches the documented drop rules.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::board::{bucket_by_day, move_task, week_days};
use crate::db::{format_execution, format_priority, format_status, start_of_week, Database};
use crate::fields::{Execution, Priority, Status};
use crate::filter::{filter_tasks, FilterCriteria};
use crate::selection::{reschedule_all, Selection};
use crate::task::Task;
use crate::tui::colors::{CARRY_CYAN, DARK_GREEN, GOLD, SLATE, URGENT_RED};

/// Main board application state
pub struct BoardApp {
    db: Database,
    db_path: PathBuf,
    week_start: NaiveDate,
    selected_day: usize,   // Current day column (0-6, Monday first)
    selected_card: usize,  // Selected card within the column
    day_scroll_offsets: [usize; 7], // Scroll offset for each column
    status_message: String,
    show_task_detail: bool, // Whether to show task detail popup
    filter_active: bool,    // Whether filter entry mode is active
    filter_text: String,    // Current filter text
    carrying: Option<String>, // Id of the card currently picked up
    selection: Selection,   // Multi-select for bulk reschedule

    // Day columns computed from the master list
    columns: [Vec<String>; 7],
}

impl BoardApp {
    /// Create a new BoardApp for the week starting at `week_start`.
    pub fn new(db_path: &Path, week_start: NaiveDate) -> io::Result<Self> {
        let db = Database::load(db_path);

        let mut app = BoardApp {
            db,
            db_path: db_path.to_path_buf(),
            week_start,
            selected_day: 0,
            selected_card: 0,
            day_scroll_offsets: [0; 7],
            status_message: String::new(),
            show_task_detail: false,
            filter_active: false,
            filter_text: String::new(),
            carrying: None,
            selection: Selection::new(),
            columns: Default::default(),
        };

        app.update_columns();
        Ok(app)
    }

    /// Accent color for a card, keyed off its priority.
    fn priority_color(priority: Priority) -> Color {
        match priority {
            Priority::Urgent => URGENT_RED,
            Priority::High => GOLD,
            Priority::Medium => Color::Blue,
            Priority::Low => SLATE,
        }
    }

    /// Rebuild the day columns from the master list and the active filter.
    fn update_columns(&mut self) {
        let criteria = FilterCriteria {
            search: if self.filter_text.is_empty() {
                None
            } else {
                Some(self.filter_text.clone())
            },
            ..Default::default()
        };
        let visible = filter_tasks(&self.db.tasks, &criteria);
        let buckets = bucket_by_day(&visible, self.week_start);
        for (i, bucket) in buckets.into_iter().enumerate() {
            self.columns[i] = bucket.into_iter().map(|t| t.id).collect();
            self.day_scroll_offsets[i] = 0;
        }
        self.clamp_selection();
    }

    /// Ensure selected day and card indices are valid
    fn clamp_selection(&mut self) {
        if self.selected_day >= self.columns.len() {
            self.selected_day = 0;
        }

        let column_len = self.columns[self.selected_day].len();
        if column_len == 0 {
            self.selected_card = 0;
            self.day_scroll_offsets[self.selected_day] = 0;
        } else if self.selected_card >= column_len {
            self.selected_card = column_len - 1;
        }
    }

    /// Id of the card the cursor is on, if the focused column has any.
    fn focused_task_id(&self) -> Option<String> {
        self.columns[self.selected_day]
            .get(self.selected_card)
            .cloned()
    }

    /// Save the store to disk and refresh columns
    fn save_db(&mut self) -> io::Result<()> {
        self.db.save(&self.db_path)?;
        self.db = Database::load(&self.db_path); // Reload to ensure consistency
        self.selection.retain_known(&self.db.tasks);
        self.update_columns();
        Ok(())
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    /// Move cursor to a card id within a day column, if present.
    fn focus_card(&mut self, day_index: usize, id: &str) {
        self.selected_day = day_index;
        if let Some(position) = self.columns[day_index].iter().position(|c| c == id) {
            self.selected_card = position;
        } else {
            self.clamp_selection();
        }
    }

    /// Pick up the focused card, or drop the carried one at the cursor.
    fn grab_or_drop(&mut self) {
        match self.carrying.clone() {
            None => {
                if let Some(id) = self.focused_task_id() {
                    self.carrying = Some(id.clone());
                    self.set_status_message(format!(
                        "Carrying {} | move the cursor, then Enter or g to drop, Esc to put back",
                        id
                    ));
                } else {
                    self.set_status_message("Nothing to grab here".to_string());
                }
            }
            Some(carried) => self.drop_carried(&carried),
        }
    }

    /// Drop the carried card at the current cursor position.
    fn drop_carried(&mut self, carried: &str) {
        let day = week_days(self.week_start)[self.selected_day];
        let focused = self.focused_task_id();

        // Dropping a card on itself is a no-op end of the carry.
        if focused.as_deref() == Some(carried) {
            self.carrying = None;
            self.set_status_message("Card stayed put".to_string());
            return;
        }

        self.db.tasks = move_task(&self.db.tasks, carried, focused.as_deref(), day);
        if let Some(t) = self.db.get_mut(carried) {
            t.updated_at_utc = chrono::Utc::now().timestamp();
        }
        self.carrying = None;
        if let Err(e) = self.save_db() {
            self.set_status_message(format!("Error saving: {}", e));
        } else {
            self.focus_card(self.selected_day, carried);
            self.set_status_message(format!("Dropped {} on {}", carried, day.format("%a")));
        }
    }

    /// Cancel an in-flight carry without touching the collection.
    fn cancel_carry(&mut self) {
        self.carrying = None;
        self.set_status_message("Put the card back".to_string());
    }

    /// Shift the focused card one day left or right within the week.
    fn shift_card_day(&mut self, forward: bool) {
        let Some(id) = self.focused_task_id() else {
            return;
        };
        let target_day = if forward {
            if self.selected_day >= self.columns.len() - 1 {
                return;
            }
            self.selected_day + 1
        } else {
            if self.selected_day == 0 {
                return;
            }
            self.selected_day - 1
        };

        let day = week_days(self.week_start)[target_day];
        self.db.tasks = move_task(&self.db.tasks, &id, None, day);
        if let Some(t) = self.db.get_mut(&id) {
            t.updated_at_utc = chrono::Utc::now().timestamp();
        }
        if let Err(e) = self.save_db() {
            self.set_status_message(format!("Error saving: {}", e));
        } else {
            self.focus_card(target_day, &id);
            self.set_status_message(format!("Moved {} to {}", id, day.format("%a")));
        }
    }

    /// Reorder the focused card one slot up or down within its day.
    fn shift_card_slot(&mut self, down: bool) {
        let Some(id) = self.focused_task_id() else {
            return;
        };
        let column = &self.columns[self.selected_day];
        let day = week_days(self.week_start)[self.selected_day];

        let outcome = if down {
            if self.selected_card + 1 >= column.len() {
                return;
            }
            // Landing below the next card means inserting before the one
            // after it, or appending when there is none.
            match column.get(self.selected_card + 2) {
                Some(target) => move_task(&self.db.tasks, &id, Some(target.as_str()), day),
                None => move_task(&self.db.tasks, &id, None, day),
            }
        } else {
            if self.selected_card == 0 {
                return;
            }
            let target = column[self.selected_card - 1].as_str();
            move_task(&self.db.tasks, &id, Some(target), day)
        };

        self.db.tasks = outcome;
        if let Some(t) = self.db.get_mut(&id) {
            t.updated_at_utc = chrono::Utc::now().timestamp();
        }
        if let Err(e) = self.save_db() {
            self.set_status_message(format!("Error saving: {}", e));
        } else {
            self.focus_card(self.selected_day, &id);
        }
    }

    /// Cycle lifecycle status on the focused card.
    fn cycle_status(&mut self) {
        let Some(id) = self.focused_task_id() else {
            return;
        };
        let mut completed_title = None;
        let mut new_status = None;
        if let Some(task) = self.db.get_mut(&id) {
            let next = task.status.cycled();
            if task.set_status(next) {
                completed_title = Some(task.title.clone());
            }
            task.updated_at_utc = chrono::Utc::now().timestamp();
            new_status = Some(next);
        }
        if let Err(e) = self.save_db() {
            self.set_status_message(format!("Error saving: {}", e));
        } else if let Some(title) = completed_title {
            self.set_status_message(format!("Completed '{}'!", title));
        } else if let Some(status) = new_status {
            self.set_status_message(format!("{} is now {}", id, format_status(status)));
        }
        self.focus_card(self.selected_day, &id);
    }

    /// Toggle the focused card between Working and Idle.
    fn toggle_working(&mut self) {
        self.flip_execution(Execution::Working);
    }

    /// Toggle the focused card between Paused and Idle.
    fn toggle_paused(&mut self) {
        self.flip_execution(Execution::Paused);
    }

    fn flip_execution(&mut self, state: Execution) {
        let Some(id) = self.focused_task_id() else {
            return;
        };
        let mut applied = Execution::Idle;
        if let Some(task) = self.db.get_mut(&id) {
            applied = if task.execution == state {
                Execution::Idle
            } else {
                state
            };
            task.set_execution(applied);
            task.updated_at_utc = chrono::Utc::now().timestamp();
        }
        if let Err(e) = self.save_db() {
            self.set_status_message(format!("Error saving: {}", e));
        } else {
            self.set_status_message(format!("{}: {}", id, format_execution(applied)));
        }
        self.focus_card(self.selected_day, &id);
    }

    /// Toggle multi-select membership of the focused card.
    fn toggle_selection(&mut self) {
        let Some(id) = self.focused_task_id() else {
            return;
        };
        let selected = self.selection.toggle(&id);
        let verb = if selected { "Selected" } else { "Unselected" };
        self.set_status_message(format!("{} {} ({} total)", verb, id, self.selection.len()));
    }

    /// Reschedule every selected card to the focused day.
    fn reschedule_selection(&mut self) {
        if self.selection.is_empty() {
            self.set_status_message("Nothing selected (Space marks cards)".to_string());
            return;
        }
        let day = week_days(self.week_start)[self.selected_day];
        let count = self.selection.len();
        self.db.tasks = reschedule_all(&self.db.tasks, &self.selection, day);
        let now_utc = chrono::Utc::now().timestamp();
        for t in self.db.tasks.iter_mut() {
            if self.selection.contains(&t.id) {
                t.updated_at_utc = now_utc;
            }
        }
        if let Err(e) = self.save_db() {
            self.set_status_message(format!("Error saving: {}", e));
        } else {
            self.set_status_message(format!(
                "Rescheduled {} card(s) to {}",
                count,
                day.format("%a %d %b")
            ));
        }
    }

    /// Toggle one checklist entry on the focused card while the detail
    /// popup is open. `index` is zero-based.
    fn toggle_subtask_at(&mut self, index: usize) {
        let Some(id) = self.focused_task_id() else {
            return;
        };
        let mut progress = None;
        if let Some(task) = self.db.get_mut(&id) {
            if let Some(sub_id) = task.subtasks.get(index).map(|s| s.id.clone()) {
                task.toggle_subtask(&sub_id);
                task.updated_at_utc = chrono::Utc::now().timestamp();
                progress = Some(task.progress);
            }
        }
        let Some(progress) = progress else {
            return;
        };
        if let Err(e) = self.save_db() {
            self.set_status_message(format!("Error saving: {}", e));
        } else {
            self.set_status_message(format!("{} at {}%", id, progress));
        }
        self.focus_card(self.selected_day, &id);
    }

    /// Switch the visible week without disturbing carry or selection.
    fn shift_week(&mut self, weeks: i64) {
        self.week_start = self.week_start + chrono::Duration::weeks(weeks);
        self.update_columns();
        self.set_status_message(format!(
            "Week of {}",
            self.week_start.format("%d %b %Y")
        ));
    }

    /// Jump back to the week containing today.
    fn goto_this_week(&mut self) {
        self.week_start = start_of_week(Local::now().date_naive());
        self.update_columns();
        self.set_status_message("This week".to_string());
    }

    /// Handle keyboard input. Returns Ok(true) to exit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                // Handle filter mode input
                if self.filter_active {
                    match key.code {
                        KeyCode::Esc => {
                            self.filter_active = false;
                            self.filter_text.clear();
                            self.update_columns();
                            self.clear_status_message();
                        }
                        KeyCode::Enter => {
                            self.filter_active = false;
                            if self.filter_text.is_empty() {
                                self.set_status_message("Filter cleared".to_string());
                            } else {
                                let shown: usize =
                                    self.columns.iter().map(|col| col.len()).sum();
                                self.set_status_message(format!(
                                    "Filter: '{}' ({} cards shown)",
                                    self.filter_text, shown
                                ));
                            }
                        }
                        KeyCode::Backspace => {
                            if !self.filter_text.is_empty() {
                                self.filter_text.pop();
                                self.update_columns();
                            }
                        }
                        KeyCode::Char(c) => {
                            self.filter_text.push(c);
                            self.update_columns();
                        }
                        _ => {}
                    }
                    return Ok(false);
                }

                // Digits toggle checklist entries while the popup is open
                if self.show_task_detail {
                    if let KeyCode::Char(c) = key.code {
                        if let Some(digit) = c.to_digit(10) {
                            if digit >= 1 {
                                self.toggle_subtask_at(digit as usize - 1);
                                return Ok(false);
                            }
                        }
                    }
                }

                self.clear_status_message();

                match key.code {
                    KeyCode::Char('q') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true)
                    }
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true)
                    }
                    KeyCode::Esc => {
                        if self.carrying.is_some() {
                            self.cancel_carry();
                        } else if self.show_task_detail {
                            self.show_task_detail = false;
                        } else {
                            return Ok(true);
                        }
                    }

                    // Grab, carry, drop
                    KeyCode::Char('g') => {
                        self.grab_or_drop();
                    }
                    KeyCode::Enter => {
                        if let Some(carried) = self.carrying.clone() {
                            self.drop_carried(&carried);
                        } else {
                            self.show_task_detail = !self.show_task_detail;
                        }
                    }

                    // Card movement between days (check first, before navigation)
                    KeyCode::Left if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.shift_card_day(false);
                    }
                    KeyCode::Right if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.shift_card_day(true);
                    }
                    KeyCode::Up if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.shift_card_slot(false);
                    }
                    KeyCode::Down if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        self.shift_card_slot(true);
                    }

                    // Day navigation
                    KeyCode::Left => {
                        if self.selected_day > 0 {
                            self.selected_day -= 1;
                            self.clamp_selection();
                        }
                    }
                    KeyCode::Right => {
                        if self.selected_day < self.columns.len() - 1 {
                            self.selected_day += 1;
                            self.clamp_selection();
                        }
                    }

                    // Card navigation within a column
                    KeyCode::Up => {
                        if self.selected_card > 0 {
                            self.selected_card -= 1;
                        }
                    }
                    KeyCode::Down => {
                        let column_len = self.columns[self.selected_day].len();
                        if column_len > 0 && self.selected_card < column_len - 1 {
                            self.selected_card += 1;
                        }
                    }

                    // Week navigation
                    KeyCode::Char('[') => {
                        self.shift_week(-1);
                    }
                    KeyCode::Char(']') => {
                        self.shift_week(1);
                    }
                    KeyCode::Char('t') => {
                        self.goto_this_week();
                    }

                    // State changes
                    KeyCode::Char('s') => {
                        self.cycle_status();
                    }
                    KeyCode::Char('w') => {
                        self.toggle_working();
                    }
                    KeyCode::Char('p') => {
                        self.toggle_paused();
                    }

                    // Multi-select and bulk reschedule
                    KeyCode::Char(' ') => {
                        self.toggle_selection();
                    }
                    KeyCode::Char('r') => {
                        self.reschedule_selection();
                    }
                    KeyCode::Char('c') => {
                        self.selection.clear();
                        self.set_status_message("Selection cleared".to_string());
                    }

                    // Filter mode
                    KeyCode::Char('/') => {
                        self.filter_active = true;
                        self.set_status_message(
                            "Filter: type to search title/assignee, Enter to apply, Esc to cancel"
                                .to_string(),
                        );
                    }

                    // Help
                    KeyCode::Char('h') => {
                        self.set_status_message(
                            "Help: g: Grab/Drop | Ctrl+Arrows: Move card | Space: Select | r: Reschedule | s: Status | w/p: Work/Pause | [/]: Week | /: Filter | Esc: Exit"
                                .to_string(),
                        );
                    }

                    _ => {}
                }
            }
        }
        Ok(false)
    }

    /// Render the weekly board
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Board
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_board(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        // Render task detail popup if showing
        if self.show_task_detail {
            self.render_task_detail_popup(f);
        }
    }

    /// Render the header
    fn render_header(&self, f: &mut Frame, area: Rect) {
        let week_end = self.week_start + chrono::Duration::days(6);
        let mut spans = vec![
            Span::styled("WEEK BOARD", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!(
                    "{} to {}",
                    self.week_start.format("%d %b"),
                    week_end.format("%d %b %Y")
                ),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
        ];
        if let Some(carried) = &self.carrying {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("carrying {}", carried),
                Style::default().fg(CARRY_CYAN).add_modifier(Modifier::BOLD),
            ));
        }
        if !self.selection.is_empty() {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(
                format!("{} selected", self.selection.len()),
                Style::default().fg(CARRY_CYAN),
            ));
        }

        let header_block = Paragraph::new(vec![Line::from(spans)])
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    /// Render the seven day columns
    fn render_board(&mut self, f: &mut Frame, area: Rect) {
        let column_count = self.columns.len();
        let constraints: Vec<Constraint> = (0..column_count)
            .map(|_| Constraint::Percentage(100 / column_count as u16))
            .collect();

        let columns_layout = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(constraints)
            .split(area);

        let days = week_days(self.week_start);
        let today = Local::now().date_naive();

        for (i, &column_area) in columns_layout.iter().enumerate() {
            let marker = if days[i] == today { "*" } else { "" };
            let title = format!("{}{}", days[i].format("%a %d"), marker);
            self.render_column(f, column_area, i, &title);
        }
    }

    /// Render a single day column
    fn render_column(&mut self, f: &mut Frame, area: Rect, day_index: usize, title: &str) {
        let is_selected = day_index == self.selected_day;

        let border_style = if is_selected {
            Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(title.to_string())
            .border_style(border_style);

        let inner = block.inner(area);
        f.render_widget(block, area);

        let cards = self.columns[day_index].clone();
        if cards.is_empty() {
            return;
        }

        // Borders plus id, two title lines, and a state line.
        let card_height = 6;
        let available_height = inner.height as usize;
        let visible_cards = available_height / card_height;

        // Calculate scroll offset for this column
        let scroll_offset = if is_selected {
            let start_visible = self.day_scroll_offsets[day_index];
            let end_visible = start_visible + visible_cards;

            if self.selected_card < start_visible {
                self.day_scroll_offsets[day_index] = self.selected_card;
                self.selected_card
            } else if self.selected_card >= end_visible && end_visible > 0 {
                let new_offset = self.selected_card - visible_cards + 1;
                self.day_scroll_offsets[day_index] = new_offset;
                new_offset
            } else {
                start_visible
            }
        } else {
            self.day_scroll_offsets[day_index]
        };

        let mut current_y = 0;
        let mut rendered_cards = 0;

        for (card_index, task_id) in cards.iter().enumerate().skip(scroll_offset) {
            if let Some(task) = self.db.get(task_id) {
                if current_y + card_height > available_height {
                    break;
                }

                let is_this_card_selected = is_selected && card_index == self.selected_card;

                let card_area = Rect {
                    x: inner.x,
                    y: inner.y + current_y as u16,
                    width: inner.width,
                    height: card_height as u16,
                };

                self.render_card(f, card_area, task, is_this_card_selected);

                current_y += card_height;
                rendered_cards += 1;
            }
        }

        // Show scroll indicators
        if scroll_offset > 0 {
            let indicator_text = format!("▲ +{} above", scroll_offset);
            let indicator =
                Paragraph::new(indicator_text).style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    x: inner.x,
                    y: inner.y,
                    width: inner.width,
                    height: 1,
                },
            );
        }

        let remaining = cards.len() - scroll_offset - rendered_cards;
        if remaining > 0 {
            let indicator_text = format!("▼ +{} below", remaining);
            let indicator =
                Paragraph::new(indicator_text).style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect {
                    x: inner.x,
                    y: inner.y + inner.height - 1,
                    width: inner.width,
                    height: 1,
                },
            );
        }
    }

    /// Render a single task card
    fn render_card(&self, f: &mut Frame, area: Rect, task: &Task, is_selected: bool) {
        let is_carried = self.carrying.as_deref() == Some(task.id.as_str());

        let style = if is_carried {
            Style::default().bg(CARRY_CYAN).fg(Color::Black).add_modifier(Modifier::BOLD)
        } else if is_selected {
            Style::default()
                .bg(Self::priority_color(task.priority))
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD)
        } else if task.status == Status::Done {
            Style::default().bg(Color::DarkGray).fg(DARK_GREEN)
        } else {
            Style::default().bg(Color::DarkGray)
        };

        let mut card_text = vec![];

        // Id line with selection and execution marks
        let mark = if self.selection.contains(&task.id) { " ●" } else { "" };
        let exec = match task.execution {
            Execution::Working => " ▶",
            Execution::Paused => " ⏸",
            Execution::Idle => "",
        };
        card_text.push(Line::from(format!("{}{}{}", task.id, mark, exec)));

        // Manually wrap the title to fit in the available width (accounting for borders)
        let available_width = area.width.saturating_sub(2) as usize;

        let mut current_line = String::new();
        let mut lines = Vec::new();

        for word in task.title.split_whitespace() {
            if current_line.is_empty() {
                current_line = word.to_string();
            } else if current_line.len() + 1 + word.len() <= available_width {
                current_line.push(' ');
                current_line.push_str(word);
            } else {
                lines.push(current_line.clone());
                current_line = word.to_string();
                if lines.len() >= 2 {
                    break; // Maximum 2 lines of title
                }
            }
        }
        if !current_line.is_empty() && lines.len() < 2 {
            lines.push(current_line);
        }

        for line in lines {
            card_text.push(Line::from(line));
        }

        // State line at the bottom
        card_text.push(Line::from(format!(
            "{} | {}% | {}",
            format_status(task.status),
            task.progress,
            task.assignee
        )));

        let card_block = Paragraph::new(card_text)
            .block(Block::default().borders(Borders::ALL))
            .style(style)
            .wrap(Wrap { trim: true });

        f.render_widget(card_block, area);
    }

    /// Render the status bar
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if self.filter_active {
            format!(
                "Filter: {} | Type to search, Enter to apply, Esc to cancel",
                self.filter_text
            )
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            let total: usize = self.columns.iter().map(|col| col.len()).sum();
            let filter_indicator = if !self.filter_text.is_empty() {
                format!(" [Filter: {}]", self.filter_text)
            } else {
                String::new()
            };
            format!(
                "Cards: {}{} | g: Grab | Space: Select | r: Reschedule | s: Status | /: Filter | h: Help",
                total, filter_indicator
            )
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Render the task detail popup
    fn render_task_detail_popup(&self, f: &mut Frame) {
        let Some(task_id) = self.focused_task_id() else {
            return;
        };
        let Some(task) = self.db.get(&task_id) else {
            return;
        };

        // Centered popup, 80% of the screen
        let popup_area = {
            let area = f.area();
            let popup_width = (area.width * 80) / 100;
            let popup_height = (area.height * 80) / 100;
            let x = (area.width - popup_width) / 2;
            let y = (area.height - popup_height) / 2;
            Rect::new(x, y, popup_width, popup_height)
        };

        f.render_widget(Clear, popup_area);

        use crate::db::{format_due_relative, format_energy};

        let today = Local::now().date_naive();
        let due_str = match task.due_date {
            Some(d) => format!("{} ({})", d, format_due_relative(Some(d), today)),
            None => "-".to_string(),
        };
        let start_str = task
            .start_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());

        let mut detail_lines = vec![
            Line::from(vec![Span::styled(
                format!("{}: {}", task.id, task.title),
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(format!("Status:       {}", format_status(task.status))),
            Line::from(format!("Execution:    {}", format_execution(task.execution))),
            Line::from(format!("Priority:     {}", format_priority(task.priority))),
            Line::from(format!("Energy:       {}", format_energy(task.energy))),
            Line::from(format!("Assignee:     {} ({})", task.assignee, task.assignee_id)),
            Line::from(format!(
                "Project:      {}",
                task.project.as_deref().unwrap_or("Unassigned")
            )),
            Line::from(format!("Start:        {}", start_str)),
            Line::from(format!("Due:          {}", due_str)),
            Line::from(format!("Progress:     {}%", task.progress)),
        ];

        if let Some(origin) = &task.origin {
            detail_lines.push(Line::from(format!(
                "From message: {} \"{}\"",
                origin.sender, origin.preview
            )));
        }

        detail_lines.push(Line::from(""));
        detail_lines.push(Line::from("Description:"));
        detail_lines.push(Line::from(task.description.as_deref().unwrap_or("-").to_string()));

        if !task.subtasks.is_empty() {
            detail_lines.push(Line::from(""));
            detail_lines.push(Line::from("Checklist (press 1-9 to toggle):"));
            for (i, s) in task.subtasks.iter().enumerate() {
                detail_lines.push(Line::from(format!(
                    "  {}. [{}] {}",
                    i + 1,
                    if s.done { "x" } else { " " },
                    s.title
                )));
            }
        }

        if !task.comments.is_empty() {
            detail_lines.push(Line::from(""));
            detail_lines.push(Line::from("Comments:"));
            for c in &task.comments {
                detail_lines.push(Line::from(format!("  {}: {}", c.author, c.text)));
            }
        }

        if !task.attachments.is_empty() {
            detail_lines.push(Line::from(""));
            detail_lines.push(Line::from("Attachments:"));
            for a in &task.attachments {
                detail_lines.push(Line::from(format!("  {} [{}] {}", a.name, a.kind, a.location)));
            }
        }

        let popup_block = Block::default()
            .borders(Borders::ALL)
            .title("Task Details (Press Enter to close)")
            .title_alignment(Alignment::Center)
            .border_style(
                Style::default()
                    .fg(Self::priority_color(task.priority))
                    .add_modifier(Modifier::BOLD),
            );

        let popup_paragraph = Paragraph::new(detail_lines)
            .block(popup_block)
            .wrap(Wrap { trim: true })
            .style(Style::default().bg(Color::Black));

        f.render_widget(popup_paragraph, popup_area);
    }

    /// Main event loop
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
