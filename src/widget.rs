use crate::theme::{BASE_STYLE, MONTH_STYLE, WEEKDAY_STYLE};
use calheat::{GridLayout, Heatmap, Rgb};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::Widget,
};

/// Columns taken up by one day, gutter included
const CELL_WIDTH: u16 = 3;

const SQUARE: &str = "██";

const DRAGGED_SQUARE: &str = "▒▒";

static WEEKDAYS: [&str; 7] = ["Su", "Mo", "Tu", "We", "Th", "Fr", "Sa"];

/// Draws a heatmap as rows or columns of colored squares, one character cell
/// pair per day.  When the grid is too big for the area, the weeks nearest
/// the end of the range are shown, shifted back as needed to keep the cursor
/// in view.
#[derive(Debug)]
pub(crate) struct HeatmapView<'a, M> {
    heatmap: &'a Heatmap<M>,
    cursor: Option<u32>,
}

impl<'a, M> HeatmapView<'a, M> {
    pub(crate) fn new(heatmap: &'a Heatmap<M>, cursor: Option<u32>) -> Self {
        HeatmapView { heatmap, cursor }
    }

    fn first_visible_week(&self, visible_weeks: u32) -> u32 {
        let layout = self.heatmap.layout();
        let first = layout.week_count().saturating_sub(visible_weeks);
        match self.cursor {
            Some(c) => first.min(GridLayout::week_and_day(c).0),
            None => first,
        }
    }
}

impl<M> Widget for HeatmapView<'_, M> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let layout = self.heatmap.layout();
        let mut canvas = Canvas { area, buf };
        let labels = self.heatmap.month_labels();
        if layout.is_horizontal() {
            let top = u16::from(!labels.is_empty());
            for (y, name) in (top..).zip(WEEKDAYS) {
                canvas.put(0, y, name, WEEKDAY_STYLE);
            }
            let visible = u32::from(area.width.saturating_sub(CELL_WIDTH) / CELL_WIDTH);
            let first = self.first_visible_week(visible);
            let column = |week: u32| -> Option<u16> {
                let offset = u16::try_from(week.checked_sub(first)?).ok()?;
                offset.checked_mul(CELL_WIDTH)?.checked_add(CELL_WIDTH)
            };
            for label in &labels {
                if let Some(x) = column(label.week_index) {
                    canvas.put(x, 0, label.text, MONTH_STYLE);
                }
            }
            for cell in self.heatmap.cells() {
                let Some(x) = column(cell.week_index) else {
                    continue;
                };
                let y = top + day_offset(cell.day_index);
                canvas.put(x, y, self.symbol(cell.index), self.style(cell.index));
            }
        } else {
            for (x, name) in (0..).step_by(usize::from(CELL_WIDTH)).zip(WEEKDAYS) {
                canvas.put(x, 0, name, WEEKDAY_STYLE);
            }
            let visible = u32::from(area.height.saturating_sub(1));
            let first = self.first_visible_week(visible);
            let row = |week: u32| -> Option<u16> {
                u16::try_from(week.checked_sub(first)?).ok()?.checked_add(1)
            };
            // A month label sits beside the first week that starts in its
            // month, which is the week after the one it is attached to.
            let label_x = CELL_WIDTH * 7 + 1;
            for label in &labels {
                if let Some(y) = row(label.week_index + 1) {
                    canvas.put(label_x, y, label.text, MONTH_STYLE);
                }
            }
            for cell in self.heatmap.cells() {
                let Some(y) = row(cell.week_index) else {
                    continue;
                };
                let x = day_offset(cell.day_index) * CELL_WIDTH;
                canvas.put(x, y, self.symbol(cell.index), self.style(cell.index));
            }
        }
    }
}

impl<M> HeatmapView<'_, M> {
    fn symbol(&self, index: u32) -> &'static str {
        if self.heatmap.is_dragged_over(index) {
            DRAGGED_SQUARE
        } else {
            SQUARE
        }
    }

    fn style(&self, index: u32) -> Style {
        let style = BASE_STYLE.fg(rgb_color(self.heatmap.fill_color_at(index)));
        if self.cursor == Some(index) {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }
}

pub(crate) fn rgb_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.red, rgb.green, rgb.blue)
}

fn day_offset(day_index: u32) -> u16 {
    u16::try_from(day_index).unwrap_or(u16::MAX)
}

/// A buffer region that silently drops anything drawn outside of it
struct Canvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl Canvas<'_> {
    fn put(&mut self, x: u16, y: u16, s: &str, style: Style) {
        let (Some(x), Some(y)) = (self.area.x.checked_add(x), self.area.y.checked_add(y)) else {
            return;
        };
        if x < self.area.right() && y < self.area.bottom() {
            let width = usize::from(self.area.right() - x);
            self.buf.set_stringn(x, y, s, width, style);
        }
    }
}
