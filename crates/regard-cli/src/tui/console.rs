//! TUI console view for regard.
//!
//! Full-screen table over the engagement store with:
//! - Per-row marking and batch posting through the outreach command
//! - Key bindings: j/k navigate, space mark, f cycle category filter,
//!   D show/hide dispatched, p post marked, r reload, q quit

use crate::cmd::StoreHandle;
use crate::executor::CommandExecutor;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    symbols::border,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use regard_core::config::{load_project_config, ProjectConfig};
use regard_core::model::{Category, PostStatus, UserEngagement};
use regard_core::pipeline::OutreachExecutor;
use regard_core::store::Store;
use std::{
    collections::HashSet,
    path::{Path, PathBuf},
    time::{Duration, Instant},
};
use tracing::warn;

/// How long the draw loop waits for input before redrawing.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// How long a transient status message stays visible.
const STATUS_TTL: Duration = Duration::from_secs(3);

/// Full-screen console over the engagement store.
pub struct ConsoleView {
    config: ProjectConfig,
    project_root: PathBuf,
    /// Every record currently in the store, newest first.
    all_records: Vec<UserEngagement>,
    /// Records surviving the active filters, in store order.
    visible: Vec<UserEngagement>,
    /// Active category filter; `None` shows every category.
    category_filter: Option<Category>,
    /// Whether dispatched/confirmed records are shown.
    show_dispatched: bool,
    /// User ids marked for posting.
    marked: HashSet<String>,
    table_state: TableState,
    should_quit: bool,
    status_msg: Option<(String, Instant)>,
}

impl ConsoleView {
    /// Create a new console view, loading records from the project store.
    pub fn new(project_root: &Path) -> Result<Self> {
        let config = load_project_config(project_root)?;
        let mut view = Self {
            config,
            project_root: project_root.to_path_buf(),
            all_records: Vec::new(),
            visible: Vec::new(),
            category_filter: None,
            show_dispatched: true,
            marked: HashSet::new(),
            table_state: TableState::default(),
            should_quit: false,
            status_msg: None,
        };
        view.reload()?;
        Ok(view)
    }

    /// Load (or reload) all records from the store file.
    pub fn reload(&mut self) -> Result<()> {
        let store = Store::load(&self.config.store_path(&self.project_root))?;
        self.all_records = store.records().to_vec();
        self.marked
            .retain(|id| store.get(id).is_some_and(|r| r.post_status == PostStatus::Unposted));
        self.apply_filter();
        Ok(())
    }

    /// Recompute `visible` from `all_records` using the current filters.
    fn apply_filter(&mut self) {
        self.visible = self
            .all_records
            .iter()
            .filter(|r| {
                self.category_filter.map_or(true, |c| r.category == c)
                    && (self.show_dispatched || r.post_status == PostStatus::Unposted)
            })
            .cloned()
            .collect();

        if self.visible.is_empty() {
            self.table_state.select(None);
        } else {
            let clamped = self
                .table_state
                .selected()
                .map_or(0, |idx| idx.min(self.visible.len() - 1));
            self.table_state.select(Some(clamped));
        }
    }

    fn selected_record(&self) -> Option<&UserEngagement> {
        self.table_state
            .selected()
            .and_then(|idx| self.visible.get(idx))
    }

    fn select_next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let next = self
            .table_state
            .selected()
            .map_or(0, |idx| (idx + 1).min(self.visible.len() - 1));
        self.table_state.select(Some(next));
    }

    fn select_prev(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let prev = self.table_state.selected().map_or(0, |idx| idx.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    fn select_first(&mut self) {
        if !self.visible.is_empty() {
            self.table_state.select(Some(0));
        }
    }

    fn select_last(&mut self) {
        if !self.visible.is_empty() {
            self.table_state.select(Some(self.visible.len() - 1));
        }
    }

    /// Toggle the mark on the selected row. Only unposted records with a
    /// bound comment and a reachable profile can be marked.
    fn toggle_mark(&mut self) {
        let Some(record) = self.selected_record() else {
            return;
        };
        let user_id = record.user_id.clone();
        if self.marked.contains(&user_id) {
            self.marked.remove(&user_id);
            return;
        }
        if record.post_status != PostStatus::Unposted {
            self.set_status(format!("{user_id} is already {}", record.post_status));
            return;
        }
        if record.comment_text.is_none() {
            self.set_status(format!("{user_id} has no bound comment"));
            return;
        }
        if !record.profile_reachable() {
            self.set_status(format!("{user_id} has no reachable profile"));
            return;
        }
        self.marked.insert(user_id);
    }

    /// Advance the category filter: all, then each category in rank order.
    fn cycle_category_filter(&mut self) {
        self.category_filter = match self.category_filter {
            None => Some(Category::ALL[0]),
            Some(current) => Category::ALL
                .iter()
                .position(|c| *c == current)
                .and_then(|idx| Category::ALL.get(idx + 1))
                .copied(),
        };
        self.apply_filter();
        let label = self
            .category_filter
            .map_or_else(|| "all".to_string(), |c| c.to_string());
        self.set_status(format!("Category: {label}"));
    }

    fn toggle_show_dispatched(&mut self) {
        self.show_dispatched = !self.show_dispatched;
        self.apply_filter();
        self.set_status(format!(
            "Dispatched records {}",
            if self.show_dispatched { "shown" } else { "hidden" }
        ));
    }

    /// Post every marked record through the outreach command.
    ///
    /// Each record's status is flipped and persisted before its command runs,
    /// so an interrupted batch never leaves a sent comment looking unposted.
    fn post_marked(&mut self) -> Result<()> {
        if self.marked.is_empty() {
            self.set_status("Nothing marked; press space to mark rows".to_string());
            return Ok(());
        }
        let mut executor = match CommandExecutor::new(self.config.outreach.command.clone()) {
            Ok(exec) => exec,
            Err(err) => {
                self.set_status(err.to_string());
                return Ok(());
            }
        };

        let targets: Vec<String> = self
            .visible
            .iter()
            .filter(|r| self.marked.contains(&r.user_id))
            .map(|r| r.user_id.clone())
            .collect();

        let mut handle = StoreHandle::open(&self.config, &self.project_root)?;
        let mut dispatched = 0usize;
        let mut failures = 0usize;
        for user_id in &targets {
            let Some(record) = handle.store.get(user_id).cloned() else {
                failures += 1;
                continue;
            };
            let (Some(url), Some(comment)) =
                (record.profile_url.as_deref(), record.comment_text.as_deref())
            else {
                failures += 1;
                continue;
            };
            if handle
                .store
                .update_status(user_id, PostStatus::Dispatched)
                .is_err()
            {
                failures += 1;
                continue;
            }
            handle.save()?;
            match executor.post(url, comment) {
                Ok(()) => dispatched += 1,
                Err(err) => {
                    warn!(user_id = %user_id, error = %err, "outreach command failed");
                    failures += 1;
                }
            }
        }
        drop(handle);

        self.marked.clear();
        self.reload()?;
        self.set_status(format!(
            "Dispatched {dispatched} comment(s), {failures} failed"
        ));
        Ok(())
    }

    fn set_status(&mut self, msg: String) {
        self.status_msg = Some((msg, Instant::now()));
    }

    /// Dispatch one key event against the current view state.
    pub fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('c') if ctrl => self.should_quit = true,

            KeyCode::Char('j') | KeyCode::Down => self.select_next(),
            KeyCode::Char('k') | KeyCode::Up => self.select_prev(),
            KeyCode::Char('g') | KeyCode::Home => self.select_first(),
            KeyCode::Char('G') | KeyCode::End => self.select_last(),

            KeyCode::Char(' ') => self.toggle_mark(),
            KeyCode::Char('f') => self.cycle_category_filter(),
            KeyCode::Char('D') => self.toggle_show_dispatched(),
            KeyCode::Char('p') => self.post_marked()?,
            KeyCode::Char('r') => {
                self.reload()?;
                self.set_status("Reloaded".to_string());
            }

            KeyCode::Esc => {
                if self.category_filter.is_some() {
                    self.category_filter = None;
                    self.apply_filter();
                    self.set_status("Filter cleared".to_string());
                } else if !self.marked.is_empty() {
                    self.marked.clear();
                    self.set_status("Marks cleared".to_string());
                }
            }

            _ => {}
        }
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let header = Row::new(["", "user", "name", "likes", "category", "status", "comment"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows: Vec<Row<'static>> = self
            .visible
            .iter()
            .map(|r| {
                let mark = if self.marked.contains(&r.user_id) { "*" } else { " " };
                let status_style = match r.post_status {
                    PostStatus::Unposted => Style::default(),
                    PostStatus::Dispatched => Style::default().fg(Color::Yellow),
                    PostStatus::Confirmed => Style::default().fg(Color::Green),
                };
                Row::new([
                    Cell::from(mark.to_string()),
                    Cell::from(r.user_id.clone()),
                    Cell::from(r.display_name.clone()),
                    Cell::from(r.like_count.to_string()),
                    Cell::from(r.category.to_string()),
                    Cell::from(Span::styled(r.post_status.to_string(), status_style)),
                    Cell::from(r.comment_text.clone().unwrap_or_else(|| "-".to_string())),
                ])
            })
            .collect();

        let filter_label = self
            .category_filter
            .map_or_else(|| "all".to_string(), |c| c.to_string());
        let title = format!(
            " regard — {} of {} users  [category: {filter_label}] ",
            self.visible.len(),
            self.all_records.len()
        );

        let table = Table::new(
            rows,
            [
                Constraint::Length(1),
                Constraint::Length(14),
                Constraint::Length(16),
                Constraint::Length(5),
                Constraint::Length(26),
                Constraint::Length(10),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_set(border::ROUNDED)
                .title(title)
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        );
        frame.render_stateful_widget(table, chunks[0], &mut self.table_state);

        let status = self.status_bar();
        frame.render_widget(Paragraph::new(status).alignment(Alignment::Left), chunks[1]);
    }

    fn status_bar(&self) -> Line<'static> {
        if let Some((msg, at)) = &self.status_msg {
            if at.elapsed() < STATUS_TTL {
                return Line::from(Span::styled(
                    msg.clone(),
                    Style::default().fg(Color::Cyan),
                ));
            }
        }

        let key_style = Style::default().fg(Color::Cyan);
        let dim_style = Style::default().fg(Color::DarkGray);
        let mut spans = vec![
            Span::styled("j/k", key_style),
            Span::styled(" move  ", dim_style),
            Span::styled("SPACE", key_style),
            Span::styled(" mark  ", dim_style),
            Span::styled("f", key_style),
            Span::styled(" category  ", dim_style),
            Span::styled("D", key_style),
            Span::styled(" dispatched  ", dim_style),
            Span::styled("p", key_style),
            Span::styled(" post  ", dim_style),
            Span::styled("r", key_style),
            Span::styled(" reload  ", dim_style),
            Span::styled("q", key_style),
            Span::styled(" quit", dim_style),
        ];
        if !self.marked.is_empty() {
            spans.push(Span::styled(
                format!("   {} marked", self.marked.len()),
                Style::default().fg(Color::Yellow),
            ));
        }
        Line::from(spans)
    }
}

/// Run the interactive store console until the user quits.
pub fn run_console_tui(project_root: &Path) -> Result<()> {
    let mut view = ConsoleView::new(project_root)?;
    let mut terminal = ratatui::init();
    let result = run_loop(&mut terminal, &mut view);
    ratatui::restore();
    result
}

fn run_loop(terminal: &mut ratatui::DefaultTerminal, view: &mut ConsoleView) -> Result<()> {
    while !view.should_quit {
        terminal.draw(|frame| view.draw(frame))?;
        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    view.handle_key(key)?;
                }
            }
        }
    }
    Ok(())
}
