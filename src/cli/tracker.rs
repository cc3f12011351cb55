use crossterm::event::KeyCode;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tracing::debug;

use crate::aggregate::{DashboardSummary, SummaryCache};
use crate::categories::CATEGORIES;
use crate::error::Result;
use crate::fmt::{month_label, rupees, short_date};
use crate::form::EntryForm;
use crate::settings::load_settings;
use crate::storage::{FileStorage, KeyValueStorage};
use crate::store::{ExpenseStore, CLEAR_CONFIRM_MESSAGE};
use crate::tui::{
    hex_color, money_span, run_screen, wrap_text, Screen, ScreenAction, ERROR_STYLE, FOCUS_STYLE,
    FOOTER_STYLE, HEADER_STYLE, SELECTED_STYLE, TOTAL_STYLE,
};
use crate::view::{View, ViewController};

use super::today;

/// Categories per row in the picker grid.
const GRID_COLUMNS: usize = 4;

/// Width of the longest breakdown bar, in cells.
const BAR_WIDTH: usize = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Amount,
    Category,
    Date,
    Note,
}

impl Focus {
    fn next(self) -> Self {
        match self {
            Focus::Amount => Focus::Category,
            Focus::Category => Focus::Date,
            Focus::Date => Focus::Note,
            Focus::Note => Focus::Amount,
        }
    }

    fn prev(self) -> Self {
        match self {
            Focus::Amount => Focus::Note,
            Focus::Category => Focus::Amount,
            Focus::Date => Focus::Category,
            Focus::Note => Focus::Date,
        }
    }
}

pub struct Tracker<S: KeyValueStorage> {
    store: ExpenseStore<S>,
    form: EntryForm,
    views: ViewController,
    focus: Focus,
    category_cursor: usize,
    summary: SummaryCache,
    recent_limit: usize,
    today: String,
    confirming_clear: bool,
    status_message: Option<String>,
}

impl<S: KeyValueStorage> Tracker<S> {
    pub fn new(store: ExpenseStore<S>, today: String, recent_limit: usize) -> Self {
        let load = store.load_report();
        let status_message = if load.malformed {
            Some("Saved data could not be read; starting with an empty list.".to_string())
        } else if load.dropped > 0 {
            Some(format!("Skipped {} unreadable saved entries.", load.dropped))
        } else {
            None
        };
        Self {
            form: EntryForm::new(today.clone()),
            store,
            views: ViewController::new(),
            focus: Focus::Amount,
            category_cursor: 0,
            summary: SummaryCache::new(),
            recent_limit,
            today,
            confirming_clear: false,
            status_message,
        }
    }

    fn current_summary(&mut self) -> &DashboardSummary {
        self.summary.get(
            self.store.revision(),
            self.store.expenses(),
            &self.today,
            self.recent_limit,
        )
    }

    // -----------------------------------------------------------------------
    // Key handling
    // -----------------------------------------------------------------------

    fn handle_tracker_key(&mut self, code: KeyCode) -> ScreenAction {
        if self.confirming_clear {
            self.confirming_clear = false;
            if matches!(code, KeyCode::Char('y') | KeyCode::Char('Y')) {
                self.clear_all();
            } else {
                self.status_message = Some("Clear cancelled.".to_string());
            }
            return ScreenAction::Continue;
        }

        match code {
            KeyCode::Tab | KeyCode::BackTab => {
                self.views.toggle();
                return ScreenAction::Continue;
            }
            KeyCode::F(1) => {
                self.views.select(View::Entry);
                return ScreenAction::Continue;
            }
            KeyCode::F(2) => {
                self.views.select(View::Dashboard);
                return ScreenAction::Continue;
            }
            _ => {}
        }

        match self.views.current() {
            View::Entry => self.handle_entry_key(code),
            View::Dashboard => self.handle_dashboard_key(code),
        }
    }

    fn handle_entry_key(&mut self, code: KeyCode) -> ScreenAction {
        match code {
            KeyCode::Esc => return ScreenAction::Quit,
            KeyCode::Enter => {
                self.submit();
                return ScreenAction::Continue;
            }
            KeyCode::Up => {
                self.focus = self.focus.prev();
                return ScreenAction::Continue;
            }
            KeyCode::Down => {
                self.focus = self.focus.next();
                return ScreenAction::Continue;
            }
            _ => {}
        }

        self.status_message = None;
        match self.focus {
            Focus::Amount => match code {
                KeyCode::Char(c) if c.is_ascii_digit() => self.form.press_digit(c),
                KeyCode::Char('c') => self.form.press_clear(),
                KeyCode::Backspace | KeyCode::Delete => self.form.press_delete(),
                _ => {}
            },
            Focus::Category => match code {
                KeyCode::Left => {
                    self.category_cursor =
                        (self.category_cursor + CATEGORIES.len() - 1) % CATEGORIES.len();
                }
                KeyCode::Right => {
                    self.category_cursor = (self.category_cursor + 1) % CATEGORIES.len();
                }
                KeyCode::Char(' ') => self.form.select_category(CATEGORIES[self.category_cursor].name),
                KeyCode::Char(c @ '1'..='8') => {
                    let idx = c as usize - '1' as usize;
                    if let Some(cat) = CATEGORIES.get(idx) {
                        self.category_cursor = idx;
                        self.form.select_category(cat.name);
                    }
                }
                _ => {}
            },
            Focus::Date => {
                let mut date = self.form.date().to_string();
                if edit_text(&mut date, code) {
                    self.form.set_date(date);
                }
            }
            Focus::Note => {
                let mut note = self.form.note().to_string();
                if edit_text(&mut note, code) {
                    self.form.set_note(note);
                }
            }
        }
        ScreenAction::Continue
    }

    fn handle_dashboard_key(&mut self, code: KeyCode) -> ScreenAction {
        match code {
            KeyCode::Char('q') | KeyCode::Esc => return ScreenAction::Quit,
            KeyCode::Char('a') => self.views.select(View::Entry),
            KeyCode::Char('x') => {
                if self.store.is_empty() {
                    self.status_message = Some("Nothing to clear.".to_string());
                } else {
                    self.confirming_clear = true;
                }
            }
            KeyCode::Char('r') => {
                self.today = today();
                self.summary.invalidate();
                self.status_message = None;
            }
            _ => {}
        }
        ScreenAction::Continue
    }

    fn submit(&mut self) {
        let draft = match self.form.submit() {
            Ok(d) => d,
            Err(e) => {
                self.status_message = Some(e.to_string());
                return;
            }
        };
        let label = format!("Added {} to {}.", rupees(draft.amount), draft.category);
        self.status_message = match self.store.add(draft) {
            Ok(_) => Some(label),
            Err(e) => Some(format!("{label} Could not save: {e}")),
        };
        self.focus = Focus::Amount;
        self.views.on_submitted();
    }

    fn clear_all(&mut self) {
        self.status_message = match self.store.clear_with(|_| true) {
            Ok(_) => Some("All data cleared.".to_string()),
            Err(e) => Some(format!("Cleared, but could not save: {e}")),
        };
    }

    // -----------------------------------------------------------------------
    // Drawing
    // -----------------------------------------------------------------------

    fn draw_tracker(&mut self, frame: &mut Frame) {
        let area = frame.area();

        let [title_area, subtitle_area, tabs_area, sep, content_area, status_area, footer_area] =
            Layout::vertical([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Fill(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);

        frame.render_widget(
            Paragraph::new(" \u{20b9} PaisaWise").style(HEADER_STYLE),
            title_area,
        );
        frame.render_widget(
            Paragraph::new(" Your Personal Expense Tracker").style(FOOTER_STYLE),
            subtitle_area,
        );
        self.draw_tabs(frame, tabs_area);

        let sep_line = "\u{2501}".repeat(area.width as usize);
        frame.render_widget(
            Paragraph::new(sep_line).style(Style::default().fg(Color::DarkGray)),
            sep,
        );

        match self.views.current() {
            View::Entry => self.draw_entry(frame, content_area),
            View::Dashboard => self.draw_dashboard(frame, content_area),
        }

        if let Some(msg) = &self.status_message {
            frame.render_widget(Paragraph::new(format!(" {msg}")).style(ERROR_STYLE), status_area);
        }
        self.draw_footer(frame, footer_area);

        if self.confirming_clear {
            draw_confirm(frame, area);
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" ")];
        for view in [View::Entry, View::Dashboard] {
            let style = if self.views.current() == view {
                SELECTED_STYLE
            } else {
                Style::default()
            };
            spans.push(Span::styled(format!(" {} ", view.title()), style));
            spans.push(Span::raw(" "));
        }
        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_entry(&self, frame: &mut Frame, area: Rect) {
        let grid_rows = CATEGORIES.len().div_ceil(GRID_COLUMNS) as u16;
        let [amount_area, keypad_area, cat_title, grid_area, date_area, note_area, _, button_area] =
            Layout::vertical([
                Constraint::Length(3),
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(grid_rows),
                Constraint::Length(2),
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .areas(area);

        // Amount display
        let amount_text = match self.form.amount() {
            Some(a) => rupees(a),
            None if self.form.digits().is_empty() => "\u{20b9}0".to_string(),
            None => format!("\u{20b9}{}", self.form.digits()),
        };
        let amount_block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.focus_border(Focus::Amount));
        frame.render_widget(
            Paragraph::new(Span::styled(amount_text, HEADER_STYLE))
                .centered()
                .block(amount_block),
            amount_area,
        );
        frame.render_widget(
            Paragraph::new(" 0-9 = type amount   Backspace = Del   c = Clear").style(FOOTER_STYLE),
            keypad_area,
        );

        // Category picker
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    " Select Category",
                    self.focus_label(Focus::Category),
                )),
            ]),
            cat_title,
        );
        let cell_width = (grid_area.width as usize / GRID_COLUMNS).max(1);
        let grid_lines: Vec<Line> = CATEGORIES
            .chunks(GRID_COLUMNS)
            .enumerate()
            .map(|(row, chunk)| {
                let spans: Vec<Span> = chunk
                    .iter()
                    .enumerate()
                    .map(|(col, cat)| {
                        let idx = row * GRID_COLUMNS + col;
                        let selected = self.form.category() == Some(cat.name);
                        let cursor = self.focus == Focus::Category && idx == self.category_cursor;
                        let marker = if cursor { ">" } else { " " };
                        let style = if selected {
                            SELECTED_STYLE
                        } else if cursor {
                            FOCUS_STYLE
                        } else {
                            Style::default()
                        };
                        let label = format!("{marker}{} {} {}", idx + 1, cat.emoji, cat.name);
                        Span::styled(format!("{label:<cell_width$}"), style)
                    })
                    .collect();
                Line::from(spans)
            })
            .collect();
        frame.render_widget(Paragraph::new(grid_lines), grid_area);

        // Date and note
        let cursor = |focus: Focus| if self.focus == focus { "\u{2588}" } else { "" };
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(vec![
                    Span::styled(" Date: ", self.focus_label(Focus::Date)),
                    Span::raw(format!("{}{}", self.form.date(), cursor(Focus::Date))),
                ]),
            ]),
            date_area,
        );
        let note = if self.form.note().is_empty() && self.focus != Focus::Note {
            Span::styled("Add a note (optional)...", FOOTER_STYLE)
        } else {
            Span::raw(format!("{}{}", self.form.note(), cursor(Focus::Note)))
        };
        frame.render_widget(
            Paragraph::new(Line::from(vec![
                Span::styled(" Note: ", self.focus_label(Focus::Note)),
                note,
            ])),
            note_area,
        );

        // Add button: dimmed until the form can be submitted
        let button_style = if self.form.can_submit() {
            SELECTED_STYLE
        } else {
            Style::default().fg(Color::Black).bg(Color::DarkGray)
        };
        frame.render_widget(
            Paragraph::new(Span::styled("  Add Expense (Enter)  ", button_style)).centered(),
            button_area,
        );
    }

    fn draw_dashboard(&mut self, frame: &mut Frame, area: Rect) {
        let summary = self.current_summary().clone();
        let breakdown_rows = summary.breakdown.len().max(1) as u16;

        let [total_area, breakdown_area, recent_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Length(breakdown_rows + 2),
            Constraint::Fill(1),
        ])
        .areas(area);

        let month = month_label(&summary.month);
        frame.render_widget(
            Paragraph::new(vec![
                Line::from(""),
                Line::from(Span::styled(
                    format!(" This Month's Spending ({month})"),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(Span::styled(format!(" {}", rupees(summary.total)), TOTAL_STYLE)),
            ]),
            total_area,
        );

        // Category breakdown: one proportional bar per category in its color.
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                " Category Breakdown",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        if summary.breakdown.is_empty() {
            lines.push(Line::from(Span::styled(
                " No spending data for this month.",
                FOOTER_STYLE,
            )));
        } else {
            let max = summary.breakdown.first().map(|t| t.value).unwrap_or(1).max(1);
            let name_width = summary
                .breakdown
                .iter()
                .map(|t| t.name.len())
                .max()
                .unwrap_or(10);
            let bar_width = BAR_WIDTH;
            for item in &summary.breakdown {
                let filled = ((item.value as f64 / max as f64) * bar_width as f64).ceil() as usize;
                lines.push(Line::from(vec![
                    Span::styled(
                        format!(" {:<bar_width$} ", "\u{2588}".repeat(filled.max(1))),
                        Style::default().fg(hex_color(item.color)),
                    ),
                    Span::raw(format!("{} {:<name_width$}  ", item.emoji, item.name)),
                    money_span(item.value),
                    Span::styled(
                        format!("  {:.0}%", item.share(summary.total)),
                        FOOTER_STYLE,
                    ),
                ]));
            }
        }
        frame.render_widget(Paragraph::new(lines), breakdown_area);

        // Recent transactions
        let mut lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                " Recent Transactions",
                Style::default().add_modifier(Modifier::BOLD),
            )),
        ];
        if summary.recent.is_empty() {
            lines.push(Line::from(Span::styled(" No transactions yet.", FOOTER_STYLE)));
        } else {
            let detail_width = (recent_area.width as usize).saturating_sub(36).max(10);
            for expense in &summary.recent {
                let detail = if expense.note.is_empty() {
                    short_date(&expense.date)
                } else {
                    let (wrapped, _) = wrap_text(&expense.note, detail_width);
                    wrapped.lines().next().unwrap_or_default().to_string()
                };
                lines.push(Line::from(vec![
                    Span::raw(format!(" {} {:<14}", expense.emoji, expense.category)),
                    Span::styled(format!("{detail:<detail_width$}  "), FOOTER_STYLE),
                    money_span(expense.amount),
                ]));
            }
        }
        frame.render_widget(Paragraph::new(lines), recent_area);
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let count = self.store.len();
        let hints = match self.views.current() {
            View::Entry => "Up/Down=field  Enter=add  Tab=dashboard  Esc=quit",
            View::Dashboard if count > 0 => "Tab=quick add  x=Clear All  r=refresh  q=quit",
            View::Dashboard => "Tab=quick add  r=refresh  q=quit",
        };
        frame.render_widget(
            Paragraph::new(format!(" Total Entries: {count}   {hints}")).style(FOOTER_STYLE),
            area,
        );
    }

    fn focus_border(&self, focus: Focus) -> Style {
        if self.focus == focus {
            FOCUS_STYLE
        } else {
            Style::default().fg(Color::DarkGray)
        }
    }

    fn focus_label(&self, focus: Focus) -> Style {
        if self.focus == focus {
            FOCUS_STYLE.add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        }
    }
}

impl<S: KeyValueStorage> Screen for Tracker<S> {
    fn draw(&mut self, frame: &mut Frame) {
        self.draw_tracker(frame);
    }

    fn handle_key(&mut self, code: KeyCode) -> ScreenAction {
        self.handle_tracker_key(code)
    }
}

/// Apply a key to a single-line text field. Returns true if the text changed.
fn edit_text(text: &mut String, code: KeyCode) -> bool {
    match code {
        KeyCode::Char(c) => {
            text.push(c);
            true
        }
        KeyCode::Backspace => text.pop().is_some(),
        _ => false,
    }
}

fn draw_confirm(frame: &mut Frame, area: Rect) {
    let width = 44.min(area.width);
    let (message, lines) = wrap_text(CLEAR_CONFIRM_MESSAGE, width.saturating_sub(4) as usize);
    let height = (lines + 4).min(area.height);

    let [row] = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .areas(row);

    let mut text: Vec<Line> = message.lines().map(|l| Line::from(l.to_string())).collect();
    text.push(Line::from(""));
    text.push(Line::from(Span::styled(
        "y = clear everything   any other key = cancel",
        FOOTER_STYLE,
    )));

    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(text).block(
            Block::default()
                .title(" Clear All ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        ),
        popup,
    );
}

pub fn run() -> Result<()> {
    let settings = load_settings();
    let mut store = ExpenseStore::load(FileStorage::new(&settings.data_dir));
    store.on_change(|all| debug!(entries = all.len(), "expenses changed"));

    let mut tracker = Tracker::new(store, today(), settings.recent_limit);
    run_screen(&mut tracker)
}
