use crate::help::Help;
use crate::theme::{BASE_STYLE, STATUS_STYLE, WARNING_STYLE};
use crate::widget::HeatmapView;
use calheat::{DragRange, Heatmap, Orientation};
use crossterm::event::{read, KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Layout, Rect},
    widgets::Widget,
    Terminal,
};
use std::io::{self, Write};
use time::Date;

const WEEK: i64 = 7;

/// Interactive browser for a heatmap of values read from a file
#[derive(Debug)]
pub(crate) struct App {
    heatmap: Heatmap<Option<String>>,
    home: Date,
    cursor: Option<u32>,
    selected: Option<DragRange>,
    state: AppState,
}

impl App {
    pub(crate) fn new(heatmap: Heatmap<Option<String>>) -> App {
        let home = heatmap.layout().end_date();
        let cursor = heatmap.layout().index_for_date(home);
        App {
            heatmap,
            home,
            cursor,
            selected: None,
            state: AppState::Browsing,
        }
    }

    pub(crate) fn run<B: Backend>(mut self, mut terminal: Terminal<B>) -> io::Result<()> {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(())
    }

    fn draw<B: Backend>(&self, terminal: &mut Terminal<B>) -> io::Result<()> {
        terminal.draw(|frame| frame.render_widget(self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = read()?.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        }
        Ok(())
    }

    // Returns `false` if the key was invalid or could not be acted on
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Browsing => {
                let (across, down) = match self.heatmap.config().orientation {
                    Orientation::Horizontal => (WEEK, 1),
                    Orientation::Vertical => (1, WEEK),
                };
                match key {
                    KeyCode::Char('h') | KeyCode::Left => self.move_cursor(-across),
                    KeyCode::Char('l') | KeyCode::Right => self.move_cursor(across),
                    KeyCode::Char('k') | KeyCode::Up => self.move_cursor(-down),
                    KeyCode::Char('j') | KeyCode::Down => self.move_cursor(down),
                    KeyCode::Char('[') | KeyCode::PageUp => self.scroll(-WEEK),
                    KeyCode::Char(']') | KeyCode::PageDown => self.scroll(WEEK),
                    KeyCode::Char('0') | KeyCode::Home => self.go_home(),
                    KeyCode::Char('v' | ' ') => self.toggle_drag(),
                    KeyCode::Esc if self.heatmap.selection().is_dragging() => {
                        self.heatmap.cancel_drag();
                        true
                    }
                    KeyCode::Char('q') | KeyCode::Esc => {
                        self.state = AppState::Quitting;
                        true
                    }
                    KeyCode::Char('?') => {
                        self.state = AppState::Helping;
                        true
                    }
                    _ => false,
                }
            }
            AppState::Helping => {
                self.state = AppState::Browsing;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }

    fn selectable(&self, index: u32) -> bool {
        let layout = self.heatmap.layout();
        index < layout.cell_count()
            && (self.heatmap.config().show_out_of_range_days || layout.in_range(index))
    }

    fn move_cursor(&mut self, delta: i64) -> bool {
        let Some(target) = self
            .cursor
            .and_then(|c| i64::from(c).checked_add(delta))
            .and_then(|t| u32::try_from(t).ok())
            .filter(|&t| self.selectable(t))
        else {
            return false;
        };
        self.cursor = Some(target);
        self.heatmap.drag_hover(target);
        true
    }

    fn cursor_date(&self) -> Option<Date> {
        self.cursor
            .and_then(|c| self.heatmap.layout().date_for_index(c))
    }

    // After the grid moves, keep the cursor on the same day if it is still
    // shown, else put it on the last day.
    fn relocate_cursor(&mut self, date: Option<Date>) {
        let layout = self.heatmap.layout();
        self.cursor = date
            .and_then(|d| layout.index_for_date(d))
            .filter(|&i| self.selectable(i))
            .or_else(|| layout.index_for_date(layout.end_date()));
    }

    fn scroll(&mut self, days: i64) -> bool {
        let date = self.cursor_date();
        match self.heatmap.scroll(days) {
            Ok(()) => {
                tracing::debug!(end = %self.heatmap.layout().end_date(), "Scrolled heatmap");
                self.relocate_cursor(date);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Cannot scroll heatmap");
                false
            }
        }
    }

    fn go_home(&mut self) -> bool {
        let date = self.cursor_date();
        if self.heatmap.set_end_date(self.home).is_err() {
            return false;
        }
        self.relocate_cursor(date);
        true
    }

    fn toggle_drag(&mut self) -> bool {
        let Some(cursor) = self.cursor else {
            return false;
        };
        if self.heatmap.selection().is_dragging() {
            self.selected = self.heatmap.drag_release(cursor);
            if let Some(range) = self.selected {
                tracing::info!(start = %range.start, end = %range.end, "Selected dates");
            }
        } else {
            self.heatmap.drag_press(cursor);
        }
        true
    }

    fn status(&self) -> String {
        let mut parts = Vec::new();
        if let Some(date) = self.cursor_date() {
            let title = self
                .cursor
                .and_then(|c| self.heatmap.title_at(c))
                .unwrap_or("no data");
            parts.push(format!("{date}: {title}"));
        }
        let selection = self.heatmap.selection();
        if let Some(range) = selection.current() {
            parts.push(format!("selecting {} to {}", range.start, range.end));
        } else if selection.is_dragging() {
            parts.push(String::from("selecting"));
        } else if let Some(range) = self.selected {
            parts.push(format!("selected {} to {}", range.start, range.end));
        }
        parts.join("  ")
    }

    fn warnings(&self) -> Option<String> {
        match self.heatmap.cache().diagnostics().len() {
            0 => None,
            1 => Some(String::from("1 warning")),
            n => Some(format!("{n} warnings")),
        }
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        let [grid_area, status_area] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(1)]).areas(area);
        HeatmapView::new(&self.heatmap, self.cursor).render(grid_area, buf);
        if status_area.height > 0 && status_area.width > 0 {
            let width = usize::from(status_area.width);
            buf.set_stringn(
                status_area.x,
                status_area.y,
                self.status(),
                width,
                STATUS_STYLE,
            );
            if let Some(warnings) = self.warnings() {
                let len = u16::try_from(warnings.len()).unwrap_or(u16::MAX);
                let x = status_area.right().saturating_sub(len).max(status_area.x);
                buf.set_stringn(x, status_area.y, warnings, width, WARNING_STYLE);
            }
        }
        if self.state == AppState::Helping {
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Browsing,
    Helping,
    Quitting,
}
