//! Gantt timeline interface.
//!
//! Every dated task renders as a horizontal bar on a 45-day axis. The window
//! pans by day or by week, and a zoom toggle switches between wide day cells
//! and compact one-column cells. Bar placement comes from the timeline maths
//! module; this file only draws.

use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::{Datelike, Local, NaiveDate, Weekday};
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame, Terminal,
};

use crate::db::{
    format_due_relative, format_priority, format_status, start_of_week, truncate, Database,
};
use crate::fields::{Priority, Status};
use crate::task::Task;
use crate::timeline::{position_on_timeline, TimelineAxis, Zoom, AXIS_DAYS};
use crate::tui::colors::{DARK_GREEN, GOLD, SLATE, TODAY_BLUE, URGENT_RED};

/// Width of the task label gutter to the left of the chart.
const LABEL_WIDTH: u16 = 24;

/// Main timeline application state
pub struct TimelineApp {
    db: Database,
    db_path: PathBuf,
    origin: NaiveDate, // First day on the axis
    zoom: Zoom,
    selected: usize, // Selected row
    scroll: usize,   // First visible row
    status_message: String,
    show_task_detail: bool, // Whether to show the task detail popup

    // Ids of dated tasks, in master-list order
    rows: Vec<String>,
}

impl TimelineApp {
    /// Create a new TimelineApp with the axis starting at `origin`.
    pub fn new(db_path: &Path, origin: NaiveDate) -> io::Result<Self> {
        let db = Database::load(db_path);

        let mut app = TimelineApp {
            db,
            db_path: db_path.to_path_buf(),
            origin,
            zoom: Zoom::Day,
            selected: 0,
            scroll: 0,
            status_message: String::new(),
            show_task_detail: false,
            rows: Vec::new(),
        };

        app.update_rows();
        Ok(app)
    }

    /// Bar colour for a task, keyed off its priority.
    fn bar_color(task: &Task) -> Color {
        if task.status == Status::Done {
            return DARK_GREEN;
        }
        match task.priority {
            Priority::Urgent => URGENT_RED,
            Priority::High => GOLD,
            Priority::Medium => Color::Blue,
            Priority::Low => SLATE,
        }
    }

    /// Rebuild the chart rows from the master list. Undated tasks have no
    /// bar, so they are left off the chart entirely.
    fn update_rows(&mut self) {
        self.rows = self
            .db
            .tasks
            .iter()
            .filter(|t| t.start_date.is_some() || t.due_date.is_some())
            .map(|t| t.id.clone())
            .collect();
        self.clamp_selection();
    }

    fn clamp_selection(&mut self) {
        if self.rows.is_empty() {
            self.selected = 0;
            self.scroll = 0;
        } else if self.selected >= self.rows.len() {
            self.selected = self.rows.len() - 1;
        }
    }

    fn axis(&self) -> TimelineAxis {
        TimelineAxis::new(self.origin, self.zoom)
    }

    /// The task the cursor row points at, if any.
    fn selected_task(&self) -> Option<&Task> {
        self.rows.get(self.selected).and_then(|id| self.db.get(id))
    }

    fn set_status_message(&mut self, msg: String) {
        self.status_message = msg;
    }

    /// Reload from disk and rebuild rows.
    fn reload(&mut self) {
        self.db = Database::load(&self.db_path);
        self.update_rows();
    }

    /// Pan the axis window by whole days.
    fn shift_origin(&mut self, days: i64) {
        self.origin = self.origin + chrono::Duration::days(days);
    }

    /// Jump the axis back to the Monday of the current week.
    fn goto_this_week(&mut self) {
        self.origin = start_of_week(Local::now().date_naive());
        self.set_status_message("This week".to_string());
    }

    fn toggle_zoom(&mut self) {
        self.zoom = self.zoom.toggled();
        let label = match self.zoom {
            Zoom::Day => "day cells",
            Zoom::Week => "compact cells",
        };
        self.set_status_message(format!("Zoom: {}", label));
    }

    /// Handle keyboard input. Returns Ok(true) to exit.
    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                self.status_message.clear();

                match key.code {
                    KeyCode::Char('q') => return Ok(true),
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        return Ok(true)
                    }
                    KeyCode::Esc => {
                        if self.show_task_detail {
                            self.show_task_detail = false;
                        } else {
                            return Ok(true);
                        }
                    }
                    KeyCode::Enter => {
                        if self.selected_task().is_some() {
                            self.show_task_detail = !self.show_task_detail;
                        }
                    }

                    // Row navigation
                    KeyCode::Up => {
                        if self.selected > 0 {
                            self.selected -= 1;
                        }
                    }
                    KeyCode::Down => {
                        if !self.rows.is_empty() && self.selected < self.rows.len() - 1 {
                            self.selected += 1;
                        }
                    }

                    // Axis panning
                    KeyCode::Left => {
                        self.shift_origin(-1);
                    }
                    KeyCode::Right => {
                        self.shift_origin(1);
                    }
                    KeyCode::Char('[') => {
                        self.shift_origin(-7);
                    }
                    KeyCode::Char(']') => {
                        self.shift_origin(7);
                    }
                    KeyCode::Char('t') => {
                        self.goto_this_week();
                    }

                    KeyCode::Char('z') => {
                        self.toggle_zoom();
                    }
                    KeyCode::Char('g') => {
                        self.reload();
                        self.set_status_message("Reloaded".to_string());
                    }

                    KeyCode::Char('h') => {
                        self.set_status_message(
                            "Help: ↑/↓: Row | ←/→: Pan day | [/]: Pan week | z: Zoom | t: Today | Enter: Details | Esc: Exit"
                                .to_string(),
                        );
                    }

                    _ => {}
                }
            }
        }
        Ok(false)
    }

    /// Render the timeline
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Chart
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        self.render_header(f, chunks[0]);
        self.render_chart(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);

        if self.show_task_detail {
            self.render_task_detail_popup(f);
        }
    }

    /// Render the header
    fn render_header(&self, f: &mut Frame, area: Rect) {
        let axis = self.axis();
        let zoom_label = match self.zoom {
            Zoom::Day => "day",
            Zoom::Week => "week",
        };
        let spans = vec![
            Span::styled("TIMELINE", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw("  "),
            Span::styled(
                format!(
                    "{} to {}",
                    axis.origin.format("%d %b"),
                    axis.last_day().format("%d %b %Y")
                ),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::ITALIC),
            ),
            Span::raw("  "),
            Span::styled(
                format!("zoom: {}", zoom_label),
                Style::default().fg(Color::DarkGray),
            ),
        ];

        let header_block = Paragraph::new(vec![Line::from(spans)])
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(header_block, area);
    }

    /// Render the chart: label gutter on the left, axis and bars on the right.
    fn render_chart(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::ALL);
        let inner = block.inner(area);
        f.render_widget(block, area);

        if inner.width <= LABEL_WIDTH || inner.height < 3 {
            return;
        }

        let halves = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(LABEL_WIDTH), Constraint::Min(0)])
            .split(inner);

        let header_height = self.render_axis_header(f, halves[1]);

        let body_top = inner.y + header_height;
        let body_height = inner.height.saturating_sub(header_height) as usize;
        if body_height == 0 {
            return;
        }

        // Keep the cursor row inside the visible window
        if self.selected < self.scroll {
            self.scroll = self.selected;
        } else if self.selected >= self.scroll + body_height {
            self.scroll = self.selected - body_height + 1;
        }

        let today = Local::now().date_naive();
        let axis = self.axis();
        let rows = self.rows.clone();

        let mut rendered_rows = 0;
        for (row_index, task_id) in rows.iter().enumerate().skip(self.scroll) {
            if rendered_rows >= body_height {
                break;
            }
            let Some(task) = self.db.get(task_id) else {
                continue;
            };
            let y = body_top + rendered_rows as u16;
            let is_selected = row_index == self.selected;

            self.render_label(f, Rect::new(halves[0].x, y, LABEL_WIDTH, 1), task, is_selected);
            self.render_bar_row(
                f,
                Rect::new(halves[1].x, y, halves[1].width, 1),
                task,
                &axis,
                today,
                is_selected,
            );
            rendered_rows += 1;
        }

        // Scroll indicators share the gutter's top and bottom lines
        if self.scroll > 0 {
            let indicator = Paragraph::new(format!("▲ +{} above", self.scroll))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(indicator, Rect::new(halves[0].x, body_top, LABEL_WIDTH, 1));
        }
        let remaining = rows.len().saturating_sub(self.scroll + rendered_rows);
        if remaining > 0 && body_height > 0 {
            let indicator = Paragraph::new(format!("▼ +{} below", remaining))
                .style(Style::default().fg(Color::Cyan));
            f.render_widget(
                indicator,
                Rect::new(
                    halves[0].x,
                    body_top + body_height as u16 - 1,
                    LABEL_WIDTH,
                    1,
                ),
            );
        }
    }

    /// Render the month and day rulers above the bars. Returns the number of
    /// lines used.
    fn render_axis_header(&self, f: &mut Frame, area: Rect) -> u16 {
        let axis = self.axis();
        let cw = axis.cell_width as usize;
        let today = Local::now().date_naive();

        // Month row: one padded segment per run of same-month days
        let mut month_spans: Vec<Span> = Vec::new();
        let mut seg_start = 0i64;
        while seg_start < AXIS_DAYS {
            let month = axis.day_at(seg_start).month();
            let mut seg_end = seg_start + 1;
            while seg_end < AXIS_DAYS && axis.day_at(seg_end).month() == month {
                seg_end += 1;
            }
            let seg_cols = (seg_end - seg_start) as usize * cw;
            let label: String = axis
                .day_at(seg_start)
                .format("%b")
                .to_string()
                .chars()
                .take(seg_cols)
                .collect();
            month_spans.push(Span::styled(
                format!("{:<width$}", label, width = seg_cols),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ));
            seg_start = seg_end;
        }

        // Day row: day-of-month numbers at day zoom, week ticks when compact
        let mut day_spans: Vec<Span> = Vec::new();
        for index in 0..AXIS_DAYS {
            let date = axis.day_at(index);
            let cell = match self.zoom {
                Zoom::Day => format!("{:>2} ", date.day()),
                Zoom::Week => {
                    if date.weekday() == Weekday::Mon {
                        "|".to_string()
                    } else {
                        "·".to_string()
                    }
                }
            };
            let style = if date == today {
                Style::default().bg(TODAY_BLUE).fg(Color::White)
            } else {
                Style::default()
            };
            day_spans.push(Span::styled(cell, style));
        }

        f.render_widget(
            Paragraph::new(Line::from(month_spans)),
            Rect::new(area.x, area.y, area.width, 1),
        );
        f.render_widget(
            Paragraph::new(Line::from(day_spans)),
            Rect::new(area.x, area.y + 1, area.width, 1),
        );

        // Weekday initials only fit the wide cells
        if self.zoom == Zoom::Day {
            let mut weekday_spans: Vec<Span> = Vec::new();
            for index in 0..AXIS_DAYS {
                let date = axis.day_at(index);
                let name = date.format("%a").to_string();
                let style = if date == today {
                    Style::default().bg(TODAY_BLUE).fg(Color::White)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                weekday_spans.push(Span::styled(format!("{:<3}", &name[..2]), style));
            }
            f.render_widget(
                Paragraph::new(Line::from(weekday_spans)),
                Rect::new(area.x, area.y + 2, area.width, 1),
            );
            3
        } else {
            2
        }
    }

    /// Render one task label in the gutter
    fn render_label(&self, f: &mut Frame, area: Rect, task: &Task, is_selected: bool) {
        let style = if is_selected {
            Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD)
        } else if task.status == Status::Done {
            Style::default().fg(DARK_GREEN)
        } else {
            Style::default()
        };
        let text = truncate(
            &format!("{} {}", task.id, task.title),
            LABEL_WIDTH as usize - 1,
        );
        f.render_widget(Paragraph::new(text).style(style), area);
    }

    /// Render one task's bar row across the axis
    fn render_bar_row(
        &self,
        f: &mut Frame,
        area: Rect,
        task: &Task,
        axis: &TimelineAxis,
        today: NaiveDate,
        is_selected: bool,
    ) {
        let cw = axis.cell_width as i64;
        let span = position_on_timeline(task, axis);
        let (first_cell, cell_count) = match span {
            Some(s) => (s.left.div_euclid(cw), s.width / cw),
            None => (0, 0),
        };
        // Floor keeps a partly-done bar from reading as finished
        let filled_cells = cell_count * task.progress as i64 / 100;
        let color = Self::bar_color(task);
        let today_cell = axis.day_offset(today);

        let mut spans: Vec<Span> = Vec::new();
        for index in 0..AXIS_DAYS {
            let in_bar = cell_count > 0 && index >= first_cell && index < first_cell + cell_count;

            let cell = if in_bar {
                let k = index - first_cell;
                if k < filled_cells {
                    "█".repeat(cw as usize)
                } else {
                    "▒".repeat(cw as usize)
                }
            } else {
                " ".repeat(cw as usize)
            };

            let mut style = if in_bar {
                Style::default().fg(color)
            } else {
                Style::default()
            };
            if today_cell == Some(index as usize) {
                style = style.bg(TODAY_BLUE);
            } else if is_selected {
                style = style.bg(Color::DarkGray);
            }
            spans.push(Span::styled(cell, style));
        }

        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Render the status bar
    fn render_status_bar(&self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            format!(
                "Bars: {} | ←/→: Pan | [/]: Pan week | z: Zoom | t: Today | Enter: Details | h: Help",
                self.rows.len()
            )
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(Color::Blue).fg(Color::White))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Render the task detail popup
    fn render_task_detail_popup(&self, f: &mut Frame) {
        let Some(task) = self.selected_task() else {
            return;
        };

        // Centered popup, 60% of the screen
        let popup_area = {
            let area = f.area();
            let popup_width = (area.width * 60) / 100;
            let popup_height = (area.height * 60) / 100;
            let x = (area.width - popup_width) / 2;
            let y = (area.height - popup_height) / 2;
            Rect::new(x, y, popup_width, popup_height)
        };

        f.render_widget(Clear, popup_area);

        let today = Local::now().date_naive();
        let due_str = match task.due_date {
            Some(d) => format!("{} ({})", d, format_due_relative(Some(d), today)),
            None => "-".to_string(),
        };
        let start_str = task
            .start_date
            .map(|d| d.to_string())
            .unwrap_or_else(|| "-".to_string());

        let detail_lines = vec![
            Line::from(vec![Span::styled(
                format!("{}: {}", task.id, task.title),
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(""),
            Line::from(format!("Status:    {}", format_status(task.status))),
            Line::from(format!("Priority:  {}", format_priority(task.priority))),
            Line::from(format!("Assignee:  {}", task.assignee)),
            Line::from(format!("Start:     {}", start_str)),
            Line::from(format!("Due:       {}", due_str)),
            Line::from(format!("Progress:  {}%", task.progress)),
        ];

        let popup_block = Block::default()
            .borders(Borders::ALL)
            .title("Task (Enter to close)")
            .title_alignment(Alignment::Center)
            .border_style(Style::default().fg(Self::bar_color(task)));

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
